//! RedbLedger: redb-backed world state.
//!
//! Keys are caller-chosen strings and values are opaque bytes, so range
//! scans follow redb's byte-wise `&str` ordering. The store supports both
//! on-disk and in-memory backends (the latter for testing).

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase};
use tracing::debug;

use crate::error::{StateError, StateResult};
use crate::ledger::{LedgerStore, QueryResultEntry, StateIter};
use crate::selector::Selector;
use crate::tables::LEDGER;

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// Thread-safe ledger store backed by redb.
#[derive(Clone)]
pub struct RedbLedger {
    db: Arc<Database>,
}

/// Wraps a result iterator so that its release is logged.
struct TrackedIter<I> {
    inner: I,
    kind: &'static str,
    yielded: usize,
}

impl<I> TrackedIter<I> {
    fn new(kind: &'static str, inner: I) -> Self {
        Self {
            inner,
            kind,
            yielded: 0,
        }
    }
}

impl<I> Iterator for TrackedIter<I>
where
    I: Iterator<Item = StateResult<QueryResultEntry>>,
{
    type Item = StateResult<QueryResultEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next();
        if item.is_some() {
            self.yielded += 1;
        }
        item
    }
}

impl<I> Drop for TrackedIter<I> {
    fn drop(&mut self) {
        debug!(kind = self.kind, yielded = self.yielded, "result iterator released");
    }
}

impl RedbLedger {
    /// Open (or create) a persistent ledger at the given path.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "ledger store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory ledger (for testing).
    pub fn open_in_memory() -> StateResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory ledger store opened");
        Ok(store)
    }

    fn ensure_tables(&self) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(LEDGER).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }
}

type RawEntry<'a> = Result<
    (
        redb::AccessGuard<'a, &'static str>,
        redb::AccessGuard<'a, &'static [u8]>,
    ),
    redb::StorageError,
>;

fn to_entry(entry: RawEntry<'_>) -> StateResult<QueryResultEntry> {
    let (key, value) = entry.map_err(map_err!(Read))?;
    Ok(QueryResultEntry {
        key: key.value().to_string(),
        value: value.value().to_vec(),
    })
}

impl LedgerStore for RedbLedger {
    fn get_state(&self, key: &str) -> StateResult<Option<Vec<u8>>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(LEDGER).map_err(map_err!(Table))?;
        let value = table
            .get(key)
            .map_err(map_err!(Read))?
            .map(|guard| guard.value().to_vec());
        Ok(value)
    }

    fn put_state(&self, key: &str, value: &[u8]) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(LEDGER).map_err(map_err!(Table))?;
            table.insert(key, value).map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%key, bytes = value.len(), "state stored");
        Ok(())
    }

    fn get_state_by_range(&self, start: &str, end: &str) -> StateResult<StateIter<'_>> {
        debug!(%start, %end, "range scan");
        if start >= end {
            return Ok(Box::new(TrackedIter::new(
                "range",
                std::iter::empty::<StateResult<QueryResultEntry>>(),
            )));
        }
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(LEDGER).map_err(map_err!(Table))?;
        let range = table.range::<&str>(start..end).map_err(map_err!(Read))?;
        Ok(Box::new(TrackedIter::new("range", range.map(to_entry))))
    }

    fn get_query_result(&self, selector: &Selector) -> StateResult<StateIter<'_>> {
        debug!(query = %selector, "rich query");
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(LEDGER).map_err(map_err!(Table))?;
        let rows = table.range::<&str>(..).map_err(map_err!(Read))?;
        let selector = selector.clone();
        let matching = rows.map(to_entry).filter(move |entry| match entry {
            Ok(entry) => selector.matches_bytes(&entry.value),
            Err(_) => true,
        });
        Ok(Box::new(TrackedIter::new("query", matching)))
    }
}
