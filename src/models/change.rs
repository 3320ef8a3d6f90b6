use std::collections::BTreeMap;

/// A single detected change for one record id.
///
/// `Deleted` carries the last known value so reports can still describe
/// what disappeared; `Updated` carries both sides of the transition. The
/// id itself never changes across an update.
#[derive(Debug, Clone, PartialEq)]
pub enum Change<T> {
    /// Record newly present in the fetched snapshot.
    Created(T),
    /// Record newly absent; the payload is its last persisted value.
    Deleted(T),
    /// Record present in both snapshots with different field values.
    Updated { before: T, after: T },
}

impl<T> Change<T> {
    /// Short lowercase label, used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Change::Created(_) => "created",
            Change::Deleted(_) => "deleted",
            Change::Updated { .. } => "updated",
        }
    }
}

/// Every change between two snapshots, keyed by record id.
///
/// Empty iff the two snapshots were equal as id→record mappings. Ids absent
/// from both snapshots never appear.
pub type ChangeSet<T> = BTreeMap<String, Change<T>>;
