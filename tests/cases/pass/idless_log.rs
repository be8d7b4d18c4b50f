// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Table without id columns: plain INSERT, delete matches every column.

pub struct AuditEntry {
    pub actor: String,
    pub action: String,
    pub at: DateTime<Utc>,
    pub detail: Option<serde_json::Value>,
}

#[repository(database = "audit")]
pub trait AuditRepository: Repository<AuditEntry> {
    fn delete(&self, entry: AuditEntry);

    #[where_clause("at < :before")]
    #[delete]
    fn purge(&self, before: DateTime<Utc>);
}
