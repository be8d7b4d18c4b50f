// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! expect: tuple structs cannot be mapped

pub struct Item(Uuid, String);

pub trait ItemRepository: Repository<Item> {}
