// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Nested value object, enum, JSON list and optimistic locking.

#[table(name = "people", schema = "crm")]
pub struct Person {
    #[id]
    pub id: Uuid,
    pub name: String,
    pub nickname: Option<String>,
    pub address: Address,
    pub tags: Vec<String>,
    pub status: Status,
    #[version]
    pub version: i64,
}

pub struct Address {
    pub street: String,
    pub city: String,
}

pub enum Status {
    Active,
    Retired,
}

pub trait PersonRepository: Repository<Person> {
    fn find_by_id(&self, id: Uuid) -> Result<Option<Person>, RepositoryError>;

    fn find_by_address_city(&self, city: String) -> Vec<Person>;

    fn count_by_status(&self, status: Status) -> i64;
}
