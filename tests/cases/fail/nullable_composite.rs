// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! expect: nullable composite field `address`

pub struct Customer {
    #[id]
    pub id: i64,
    pub address: Option<Address>,
}

pub struct Address {
    pub city: String,
}

pub trait CustomerRepository: Repository<Customer> {}
