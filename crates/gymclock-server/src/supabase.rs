//! Supabase REST data-store client.
//!
//! Thin wrapper over the PostgREST endpoints: select and insert on one
//! table, no domain logic. Failures carry the data store's own message
//! so the routes can surface it verbatim.

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataStoreError {
    /// The request never produced a response
    #[error("Data store unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    /// The data store answered with an error status
    #[error("{message}")]
    Rejected { status: u16, message: String },
}

/// Client for one Supabase project's REST interface.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    base_url: String,
    api_key: String,
    http: Client,
}

impl SupabaseClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            http: Client::new(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    /// `SELECT *` on a table.
    pub async fn select_all(&self, table: &str) -> Result<Vec<Value>, DataStoreError> {
        let resp = self
            .http
            .get(self.table_url(table))
            .query(&[("select", "*")])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        Self::read_rows(resp).await
    }

    /// Insert rows into a table, returning the inserted representation.
    pub async fn insert(&self, table: &str, rows: &Value) -> Result<Vec<Value>, DataStoreError> {
        let resp = self
            .http
            .post(self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=representation")
            .json(rows)
            .send()
            .await?;
        Self::read_rows(resp).await
    }

    /// Startup reachability probe: one row from the table is enough.
    pub async fn probe(&self, table: &str) -> Result<(), DataStoreError> {
        let resp = self
            .http
            .get(self.table_url(table))
            .query(&[("select", "*"), ("limit", "1")])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        Self::read_rows(resp).await.map(|_| ())
    }

    async fn read_rows(resp: reqwest::Response) -> Result<Vec<Value>, DataStoreError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
                .unwrap_or(body);
            return Err(DataStoreError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        let rows: Vec<Value> = resp.json().await?;
        Ok(rows)
    }
}
