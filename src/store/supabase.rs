//! Supabase backend: PostgREST tables plus the GoTrue auth endpoints.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::auth::{AuthProvider, AuthUser};
use crate::error::CofounderError;
use crate::shape::{Shape, ShapeRecord, StoredShape};

use super::{NewUser, ShapeStore, UserProfile, UserStore};

const SHAPES_TABLE: &str = "canvas_objects";
const USERS_TABLE: &str = "users";

/// Row layout of the `canvas_objects` table.
#[derive(Debug, Deserialize)]
struct CanvasRow {
    id: i64,
    user_id: String,
    object_type: String,
    object_data: Value,
    created_at: DateTime<Utc>,
}

impl CanvasRow {
    fn into_stored(self) -> Option<StoredShape> {
        let Some(shape) = Shape::from_parts(&self.object_type, &self.object_data) else {
            warn!(
                "ignoring canvas object #{} with unknown type '{}'",
                self.id, self.object_type
            );
            return None;
        };
        Some(StoredShape {
            id: self.id,
            shape,
            owner_id: self.user_id,
            created_at: self.created_at,
        })
    }
}

/// Sign-up answers either with the user at top level or under `user`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Wrapped { user: AuthUser },
    Bare(AuthUser),
}

/// Client for a Supabase project, authenticated with a service key.
#[derive(Clone)]
pub struct SupabaseBackend {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SupabaseBackend {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn rest(&self, method: reqwest::Method, table: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}/rest/v1/{}", self.base_url, table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn auth(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}/auth/v1/{}", self.base_url, path))
            .header("apikey", &self.api_key)
    }

    async fn send_rows<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Vec<T>, CofounderError> {
        let response = request.send().await.map_err(CofounderError::storage)?;
        let response = check_status(response, CofounderError::Storage).await?;
        response.json().await.map_err(CofounderError::storage)
    }
}

async fn check_status(
    response: Response,
    wrap: fn(String) -> CofounderError,
) -> Result<Response, CofounderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(wrap(format!("{}: {}", status, error_message(&body))))
}

/// Pull the human readable message out of a Supabase error body.
fn error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            ["msg", "message", "error_description", "error"]
                .iter()
                .find_map(|key| v.get(*key).and_then(Value::as_str))
        })
        .map(str::to_string)
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl ShapeStore for SupabaseBackend {
    async fn save(&self, record: ShapeRecord) -> Result<StoredShape, CofounderError> {
        let body = json!({
            "user_id": record.owner_id,
            "object_type": record.shape.shape_type().as_str(),
            "object_data": record.shape.parameters(),
        });
        let rows: Vec<CanvasRow> = self
            .send_rows(
                self.rest(reqwest::Method::POST, SHAPES_TABLE)
                    .header("Prefer", "return=representation")
                    .json(&body),
            )
            .await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| CofounderError::Storage("insert returned no row".to_string()))?;
        debug!("stored canvas object #{} for {}", row.id, row.user_id);
        row.into_stored()
            .ok_or_else(|| CofounderError::Storage("stored row has unknown type".to_string()))
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<StoredShape>, CofounderError> {
        let rows: Vec<CanvasRow> = self
            .send_rows(self.rest(reqwest::Method::GET, SHAPES_TABLE).query(&[
                ("select", "*".to_string()),
                ("user_id", format!("eq.{}", owner_id)),
                ("order", "created_at.asc".to_string()),
            ]))
            .await?;
        Ok(rows.into_iter().filter_map(CanvasRow::into_stored).collect())
    }

    async fn delete(&self, owner_id: &str, id: i64) -> Result<bool, CofounderError> {
        let rows: Vec<Value> = self
            .send_rows(
                self.rest(reqwest::Method::DELETE, SHAPES_TABLE)
                    .header("Prefer", "return=representation")
                    .query(&[
                        ("id", format!("eq.{}", id)),
                        ("user_id", format!("eq.{}", owner_id)),
                    ]),
            )
            .await?;
        Ok(!rows.is_empty())
    }

    async fn ping(&self) -> Result<(), CofounderError> {
        let _: Vec<Value> = self
            .send_rows(
                self.rest(reqwest::Method::GET, USERS_TABLE)
                    .query(&[("select", "id"), ("limit", "1")]),
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for SupabaseBackend {
    async fn create_user(&self, user: NewUser) -> Result<UserProfile, CofounderError> {
        let rows: Vec<UserProfile> = self
            .send_rows(
                self.rest(reqwest::Method::POST, USERS_TABLE)
                    .header("Prefer", "return=representation")
                    .json(&user),
            )
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| CofounderError::Storage("insert returned no row".to_string()))
    }
}

#[async_trait]
impl AuthProvider for SupabaseBackend {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, CofounderError> {
        let response = self
            .auth(reqwest::Method::POST, "signup")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| CofounderError::upstream("auth", e))?;
        let response = check_status(response, CofounderError::Auth).await?;
        let parsed: SignUpResponse = response
            .json()
            .await
            .map_err(|e| CofounderError::upstream("auth", e))?;
        Ok(match parsed {
            SignUpResponse::Wrapped { user } | SignUpResponse::Bare(user) => user,
        })
    }

    async fn verify_token(&self, token: &str) -> Result<AuthUser, CofounderError> {
        let response = self
            .auth(reqwest::Method::GET, "user")
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| CofounderError::upstream("auth", e))?;
        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            return Err(CofounderError::Auth("Invalid token".to_string()));
        }
        let response = check_status(response, CofounderError::Auth).await?;
        response
            .json()
            .await
            .map_err(|e| CofounderError::upstream("auth", e))
    }
}
