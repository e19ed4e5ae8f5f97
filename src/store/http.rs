//! Hosted record store client.
//!
//! Talks to a hosted tabular backend over HTTP: one REST resource per
//! table, bearer-token auth, JSON bodies shaped as
//! `{"records": [{"id": ..., "fields": {...}}]}`. Endpoint and credentials
//! are environment-supplied via configuration; timeouts are the HTTP
//! library's defaults.
//!
//! Reads that fail map to `StoreUnavailable` (fatal for that load); writes
//! that fail map to `WriteFailed` (recoverable, the caller retries).

use crate::error::{Result, SprintError};
use crate::store::{FieldMap, Record, RecordStore, RecordUpdate, Table};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct RecordsResponse {
    records: Vec<Record>,
}

#[derive(Debug, Serialize)]
struct CreateBody {
    records: Vec<CreateEntry>,
}

#[derive(Debug, Serialize)]
struct CreateEntry {
    fields: FieldMap,
}

#[derive(Debug, Serialize)]
struct UpdateBody {
    records: Vec<RecordUpdate>,
}

/// HTTP client for the hosted record store.
#[derive(Debug)]
pub struct HttpStore {
    client: Client,
    endpoint: reqwest::Url,
    api_key: String,
}

impl HttpStore {
    /// Build a store client for the given endpoint and API key.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the endpoint is not a valid URL.
    pub fn new(endpoint: &str, api_key: impl Into<String>) -> Result<Self> {
        let endpoint = reqwest::Url::parse(endpoint)
            .map_err(|e| SprintError::Config(format!("bad store endpoint '{endpoint}': {e}")))?;
        Ok(Self {
            client: Client::new(),
            endpoint,
            api_key: api_key.into(),
        })
    }

    fn table_url(&self, table: Table) -> Result<reqwest::Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| SprintError::Config("store endpoint cannot be a base URL".to_string()))?
            .push(table.as_str());
        Ok(url)
    }

    fn record_url(&self, table: Table, id: &str) -> Result<reqwest::Url> {
        let mut url = self.table_url(table)?;
        url.path_segments_mut()
            .map_err(|()| SprintError::Config("store endpoint cannot be a base URL".to_string()))?
            .push(id);
        Ok(url)
    }

    fn write_failed(table: Table, detail: impl Into<String>) -> SprintError {
        SprintError::WriteFailed {
            table: table.as_str().to_string(),
            detail: detail.into(),
        }
    }
}

impl RecordStore for HttpStore {
    fn list_records(&self, table: Table) -> Result<Vec<Record>> {
        let url = self.table_url(table)?;
        debug!(table = %table, "Listing records");
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .map_err(|e| SprintError::StoreUnavailable {
                detail: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(SprintError::StoreUnavailable {
                detail: format!("{} returned {}", table, response.status()),
            });
        }

        let body: RecordsResponse = response.json()?;
        Ok(body.records)
    }

    fn create_records(&mut self, table: Table, fields: Vec<FieldMap>) -> Result<Vec<Record>> {
        let url = self.table_url(table)?;
        let body = CreateBody {
            records: fields.into_iter().map(|f| CreateEntry { fields: f }).collect(),
        };
        debug!(table = %table, count = body.records.len(), "Creating records");
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| Self::write_failed(table, e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::write_failed(
                table,
                format!("create returned {}", response.status()),
            ));
        }

        let body: RecordsResponse = response.json()?;
        Ok(body.records)
    }

    fn update_records(&mut self, table: Table, updates: Vec<RecordUpdate>) -> Result<Vec<Record>> {
        let url = self.table_url(table)?;
        let body = UpdateBody { records: updates };
        debug!(table = %table, count = body.records.len(), "Updating records");
        let response = self
            .client
            .patch(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| Self::write_failed(table, e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::write_failed(
                table,
                format!("update returned {}", response.status()),
            ));
        }

        let body: RecordsResponse = response.json()?;
        Ok(body.records)
    }

    fn delete_record(&mut self, table: Table, id: &str) -> Result<bool> {
        let url = self.record_url(table, id)?;
        debug!(table = %table, id, "Deleting record");
        let response = self
            .client
            .delete(url)
            .bearer_auth(&self.api_key)
            .send()
            .map_err(|e| Self::write_failed(table, e.to_string()))?;

        // A missing record is not a cascade-stopping failure.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !response.status().is_success() {
            return Err(Self::write_failed(
                table,
                format!("delete returned {}", response.status()),
            ));
        }
        Ok(true)
    }
}
