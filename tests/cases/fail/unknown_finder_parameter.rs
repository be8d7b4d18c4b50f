// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! expect: find_by_age: parameter `age` does not match any column

pub struct User {
    #[id]
    pub id: i64,
    pub name: String,
}

pub trait UserRepository: Repository<User> {
    fn find_by_age(&self, age: i32) -> Vec<User>;
}
