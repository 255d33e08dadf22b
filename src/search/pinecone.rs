//! Pinecone data-plane client (`/vectors/upsert`, `/query`, `/describe_index_stats`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::CofounderError;

use super::{IdeaMetadata, SearchMatch, VectorIndex, VectorRecord};

#[derive(Serialize)]
struct UpsertVector<'a> {
    id: &'a str,
    values: &'a [f32],
    metadata: &'a IdeaMetadata,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    filter: Value,
    include_metadata: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<Value>,
}

/// Client bound to one index host.
#[derive(Clone)]
pub struct PineconeIndex {
    http: reqwest::Client,
    host: String,
    api_key: String,
}

impl PineconeIndex {
    pub fn new(http: reqwest::Client, host: impl Into<String>, api_key: impl Into<String>) -> Self {
        let host = host.into();
        let host = if host.starts_with("http://") || host.starts_with("https://") {
            host
        } else {
            format!("https://{}", host)
        };
        Self {
            http,
            host: host.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    async fn post(&self, path: &str, body: &impl Serialize) -> Result<reqwest::Response, CofounderError> {
        let response = self
            .http
            .post(format!("{}/{}", self.host, path))
            .header("Api-Key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| CofounderError::upstream("pinecone", e))?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(CofounderError::upstream(
                "pinecone",
                format!("{} {}", status, body.trim()),
            ))
        }
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<(), CofounderError> {
        let vectors: Vec<UpsertVector<'_>> = records
            .iter()
            .map(|r| UpsertVector {
                id: &r.id,
                values: &r.values,
                metadata: &r.metadata,
            })
            .collect();
        self.post("vectors/upsert", &json!({ "vectors": vectors }))
            .await?;
        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        user_id: &str,
    ) -> Result<Vec<SearchMatch>, CofounderError> {
        let request = QueryRequest {
            vector,
            top_k,
            filter: json!({ "userId": { "$eq": user_id } }),
            include_metadata: true,
        };
        let response: QueryResponse = self
            .post("query", &request)
            .await?
            .json()
            .await
            .map_err(|e| CofounderError::upstream("pinecone", e))?;
        Ok(response.matches.into_iter().map(QueryMatch::into_match).collect())
    }

    async fn health(&self) -> Result<(), CofounderError> {
        self.post("describe_index_stats", &json!({})).await?;
        Ok(())
    }
}

impl QueryMatch {
    fn into_match(self) -> SearchMatch {
        SearchMatch {
            id: self.id,
            score: self.score,
            // Vectors written by other tools may carry partial metadata.
            metadata: self.metadata.and_then(|m| serde_json::from_value(m).ok()),
        }
    }
}
