// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! expect: search: unused parameters: limit_hint

pub struct User {
    #[id]
    pub id: i64,
    pub name: String,
}

pub trait UserRepository: Repository<User> {
    #[where_clause("name = :name")]
    fn search(&self, name: String, limit_hint: i64) -> Vec<User>;
}
