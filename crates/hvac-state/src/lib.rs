//! hvac-state: the ordered key-value ledger the maintenance contract runs on.
//!
//! # Architecture
//!
//! [`LedgerStore`] is the contract's view of the store: point get/put, a
//! half-open key range scan, and a rich query driven by a [`Selector`].
//! Scans and queries hand back owning iterators; dropping one releases the
//! underlying read transaction.
//!
//! [`RedbLedger`] is the bundled backend. Values are opaque bytes in a single
//! redb table keyed by `&str`, so range scans follow byte-wise key order.
//! The store is `Clone` + `Send` + `Sync` (backed by `Arc<Database>`).

pub mod error;
pub mod ledger;
pub mod selector;
pub mod store;
pub mod tables;

pub use error::{StateError, StateResult};
pub use ledger::{LedgerStore, QueryResultEntry, StateIter};
pub use selector::{Condition, Selector};
pub use store::RedbLedger;
