//! The store interface consumed by the maintenance contract.

use crate::error::StateResult;
use crate::selector::Selector;

/// One `(key, value)` pair yielded by a range scan or rich query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResultEntry {
    pub key: String,
    /// Stored bytes, exactly as written.
    pub value: Vec<u8>,
}

/// Iterator over scan or query results, in store key order.
///
/// The iterator owns its read handle; dropping it releases the handle, so
/// every exit path of a consumer (including `?`) closes the cursor.
pub type StateIter<'a> = Box<dyn Iterator<Item = StateResult<QueryResultEntry>> + 'a>;

/// Ordered key-value world state.
///
/// Implementations decide durability and isolation; the contract issues each
/// call as an independent single attempt.
pub trait LedgerStore {
    /// Read the value at `key`, or `None` if nothing is stored there.
    fn get_state(&self, key: &str) -> StateResult<Option<Vec<u8>>>;

    /// Write `value` at `key`, replacing any previous value.
    fn put_state(&self, key: &str, value: &[u8]) -> StateResult<()>;

    /// Iterate keys `k` with `start <= k < end` in byte-wise order.
    ///
    /// An empty or inverted range yields nothing.
    fn get_state_by_range(&self, start: &str, end: &str) -> StateResult<StateIter<'_>>;

    /// Iterate entries whose JSON value satisfies `selector`, in key order.
    fn get_query_result(&self, selector: &Selector) -> StateResult<StateIter<'_>>;
}
