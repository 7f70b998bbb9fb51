//! redb table definitions for the ledger store.

use redb::TableDefinition;

/// World state: caller-chosen keys to raw record bytes.
pub const LEDGER: TableDefinition<&str, &[u8]> = TableDefinition::new("ledger");
