// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! A local value object named like a catalog type is still flattened.

pub struct Shift {
    #[id]
    pub id: i64,
    pub start: Value,
    pub stop: Value,
}

pub struct Value {
    pub hour: i16,
    pub minute: i16,
}

pub trait ShiftRepository: Repository<Shift> {
    fn find_by_start_hour(&self, start_hour: i16) -> Vec<Shift>;
}
