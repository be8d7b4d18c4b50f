// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! expect: find_by_id: `city` matches several columns: home_city, work_city

pub struct Person {
    #[id]
    pub id: i64,
    pub home: Address,
    pub work: Address,
}

pub struct Address {
    pub city: String,
}

pub struct CityOnly {
    pub city: String,
}

pub trait PersonRepository: Repository<Person> {
    fn find_by_id(&self, id: i64) -> Option<CityOnly>;
}
