use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// An identity-bearing record tracked across polling cycles.
///
/// Implementors are immutable value objects: the store and the monitor
/// replace records, they never mutate one in place. Equality is structural
/// (all fields, including the id, compared by value), and the id must stay
/// stable for the lifetime of the entity it names.
pub trait Record: Clone + PartialEq + Serialize + DeserializeOwned + Send + 'static {
    /// Stable identifier, unique within one watched collection.
    fn id(&self) -> &str;
}

/// The full collection of records as fetched (or stored) at one instant,
/// keyed by record id.
///
/// A `BTreeMap` keeps iteration order deterministic, which makes reports
/// and test assertions stable without any sorting at the call sites.
pub type Snapshot<T> = BTreeMap<String, T>;

/// Build a snapshot from a sequence of records, keying each by its own id.
///
/// Later records silently win on duplicate ids; fetchers that care about
/// duplicates must reject them before this point.
pub fn snapshot_from<T, I>(records: I) -> Snapshot<T>
where
    T: Record,
    I: IntoIterator<Item = T>,
{
    records
        .into_iter()
        .map(|record| (record.id().to_string(), record))
        .collect()
}
