use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::record::Record;

/// Schema-free record for sources that expose plain JSON objects.
///
/// `fields` holds the object exactly as fetched (field names preserved),
/// so the persisted record file round-trips the source representation.
/// The id is extracted from a configured field by the fetcher and kept
/// separately to avoid guessing at serialization time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRecord {
    pub id: String,
    pub fields: BTreeMap<String, Value>,
}

impl JsonRecord {
    pub fn new(id: impl Into<String>, fields: BTreeMap<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

impl Record for JsonRecord {
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for JsonRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in &self.fields {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            match value {
                Value::String(s) => write!(f, "{name}: '{s}'")?,
                other => write!(f, "{name}: {other}")?,
            }
        }
        if first {
            write!(f, "id: '{}'", self.id)?;
        }
        Ok(())
    }
}
