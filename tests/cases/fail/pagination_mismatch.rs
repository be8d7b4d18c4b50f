// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! expect: find_by_name: a Pageable parameter requires a Page return type and vice versa

pub struct User {
    #[id]
    pub id: i64,
    pub name: String,
}

pub trait UserRepository: Repository<User> {
    fn find_by_name(&self, name: String, pageable: Pageable) -> Vec<User>;
}
