//! Label resolution with two-tier caching
//!
//! Maps Q/P identifiers to human-readable labels. Resolution goes
//! through an in-memory cache backed by a persisted JSON document and
//! falls back to a single remote SPARQL lookup per unknown identifier.
//! Identifiers confirmed to have no label are remembered in a no-label
//! set so repeated misses never re-query the remote service.
//!
//! The crate also owns the banned-property ledger: properties whose
//! resolved label matches a configured denylist are excluded permanently
//! and the ban survives restarts.

pub mod error;
pub mod resolver;
pub mod store;

pub use error::{LabelError, Result};
pub use resolver::{is_entity_id, LabelQuery, LabelResolver};
pub use store::{BanLedger, LabelStore};
