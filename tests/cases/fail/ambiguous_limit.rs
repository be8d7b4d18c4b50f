// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! expect: find_top: conflicting limits (Limit annotation, Limit parameter)

pub struct User {
    #[id]
    pub id: i64,
    pub name: String,
}

pub trait UserRepository: Repository<User> {
    #[limit(10)]
    fn find_top(&self, #[limit] n: i64) -> Vec<User>;
}
