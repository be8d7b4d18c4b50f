// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! expect: repository `Orphans` does not declare an entity

#[repository(database = "main")]
pub trait Orphans {
    fn find_all(&self) -> Vec<String>;
}
