//! Data model: records, snapshots, and change sets.

pub mod change;
pub mod json_record;
pub mod record;

pub use change::{Change, ChangeSet};
pub use json_record::JsonRecord;
pub use record::{snapshot_from, Record, Snapshot};
