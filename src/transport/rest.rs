use super::DurableStore;
use crate::error::StoreError;
use crate::protocol::DurableRecord;
use async_trait::async_trait;
use serde::Deserialize;

/// Durable upserts against a PostgREST-style endpoint
#[derive(Debug, Clone)]
pub struct RestStore {
    base_url: String,
    access_key: String,
    client: reqwest::Client,
}

/// Error body returned by the REST backend
#[derive(Debug, Deserialize)]
struct BackendError {
    code: Option<String>,
    message: Option<String>,
}

impl RestStore {
    pub fn new(base_url: String, access_key: String) -> Self {
        Self {
            base_url,
            access_key,
            client: reqwest::Client::new(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }
}

/// Turn a non-success response into a [`StoreError::Rejected`]
fn rejection(status: u16, body: &str) -> StoreError {
    let parsed = serde_json::from_str::<BackendError>(body).ok();
    let code = parsed.as_ref().and_then(|e| e.code.clone());
    let message = parsed
        .and_then(|e| e.message)
        .unwrap_or_else(|| body.trim().to_string());

    StoreError::Rejected {
        status,
        code,
        message,
    }
}

#[async_trait]
impl DurableStore for RestStore {
    async fn upsert(&self, record: &DurableRecord) -> Result<(), StoreError> {
        let request = self
            .client
            .post(self.table_url(record.table()))
            .header("apikey", &self.access_key)
            .bearer_auth(&self.access_key)
            .header("Prefer", "resolution=merge-duplicates,return=minimal");

        let request = match record {
            DurableRecord::Placement(row) => request.json(row),
            DurableRecord::Score(row) => request.json(row),
        };

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(rejection(status.as_u16(), &body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_url() {
        let store = RestStore::new("https://db.example.org/".to_string(), "key".to_string());
        assert_eq!(
            store.table_url("scores"),
            "https://db.example.org/rest/v1/scores"
        );
    }

    #[test]
    fn test_rejection_parses_backend_code() {
        let err = rejection(
            404,
            r#"{"code":"42P01","message":"relation \"public.placements\" does not exist"}"#,
        );
        assert!(err.is_missing_relation());
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_rejection_without_json_body() {
        let err = rejection(502, "Bad Gateway");
        assert!(!err.is_missing_relation());
        match err {
            StoreError::Rejected {
                status, message, ..
            } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("Expected rejection, got {:?}", other),
        }
    }
}
