//! Bundled HTTP source adapter.
//!
//! Fetches a JSON array of objects and turns each element into a
//! [`JsonRecord`], taking the record id from a configurable field. Every
//! failure mode (transport, status, body shape) collapses into a
//! [`FetchError`] value, so a flaky source can never take the monitor loop
//! down.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde_json::Value;

use crate::models::{JsonRecord, Snapshot};
use crate::monitor::{FetchError, Fetcher};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Polls one URL for the current state of a collection.
pub struct HttpJsonFetcher {
    client: Client,
    url: String,
    id_field: String,
}

impl HttpJsonFetcher {
    pub fn new(url: impl Into<String>, id_field: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            url: url.into(),
            id_field: id_field.into(),
        })
    }
}

impl Fetcher<JsonRecord> for HttpJsonFetcher {
    fn fetch(&mut self) -> Result<Snapshot<JsonRecord>, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| FetchError::new(format!("request to {} failed: {e}", self.url)))?;

        let response = response
            .error_for_status()
            .map_err(|e| FetchError::new(format!("{} answered with an error: {e}", self.url)))?;

        let body: Value = response
            .json()
            .map_err(|e| FetchError::new(format!("{} returned invalid JSON: {e}", self.url)))?;

        parse_records(body, &self.id_field)
    }
}

/// Interpret a JSON body as a snapshot of identity-bearing records.
///
/// The body must be an array of objects, each carrying `id_field` as a
/// string or number. Duplicate ids make the snapshot ambiguous and are
/// rejected rather than letting one record silently shadow another.
fn parse_records(body: Value, id_field: &str) -> Result<Snapshot<JsonRecord>, FetchError> {
    let Value::Array(elements) = body else {
        return Err(FetchError::new("response body is not a JSON array"));
    };

    let mut snapshot = Snapshot::new();
    for (index, element) in elements.into_iter().enumerate() {
        let Value::Object(object) = element else {
            return Err(FetchError::new(format!(
                "element {index} is not a JSON object"
            )));
        };

        let id = match object.get(id_field) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(_) => {
                return Err(FetchError::new(format!(
                    "element {index}: field '{id_field}' is not a string or number"
                )));
            }
            None => {
                return Err(FetchError::new(format!(
                    "element {index}: missing id field '{id_field}'"
                )));
            }
        };

        let fields: BTreeMap<String, Value> = object.into_iter().collect();
        if snapshot
            .insert(id.clone(), JsonRecord::new(id.clone(), fields))
            .is_some()
        {
            return Err(FetchError::new(format!("duplicate record id '{id}'")));
        }
    }

    Ok(snapshot)
}
