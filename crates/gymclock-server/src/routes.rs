//! HTTP routes: a health text plus the generic todos passthrough.
//!
//! Any data-store failure maps to a 500 with `{"error": message}`; there
//! is no retry and no partial-success handling.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::supabase::SupabaseClient;

pub const TODOS_TABLE: &str = "todos";

#[derive(Debug, Deserialize)]
pub struct NewTodo {
    pub title: String,
}

pub fn router(client: SupabaseClient) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/todos", get(list_todos).post(create_todo))
        .with_state(Arc::new(client))
}

async fn root() -> &'static str {
    "gymclock server is running"
}

async fn list_todos(
    State(client): State<Arc<SupabaseClient>>,
) -> Result<Json<Vec<Value>>, (StatusCode, Json<Value>)> {
    let rows = client
        .select_all(TODOS_TABLE)
        .await
        .map_err(internal_error)?;
    Ok(Json(rows))
}

async fn create_todo(
    State(client): State<Arc<SupabaseClient>>,
    Json(todo): Json<NewTodo>,
) -> Result<Json<Vec<Value>>, (StatusCode, Json<Value>)> {
    let rows = client
        .insert(TODOS_TABLE, &json!([{ "title": todo.title }]))
        .await
        .map_err(internal_error)?;
    Ok(Json(rows))
}

fn internal_error(err: crate::supabase::DataStoreError) -> (StatusCode, Json<Value>) {
    tracing::error!(error = %err, "data store request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": err.to_string() })),
    )
}
