//! Employee registry routes.
//!
//! A GET under `/employees/` reads one row keyed by the last path segment, so
//! `/employees/` and `/employees/5/` look up an empty id and answer `null`.
//! Every other GET lists the table and every POST, whatever its path, creates
//! an employee.

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tracing::info;

use super::{last_segment, preflight, AppState};
use crate::db;
use crate::error::{ApiError, Result};
use crate::model::{Message, NewEmployee};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/employees/", get(get_employee).fallback(dispatch))
        .route("/employees/{*rest}", get(get_employee).fallback(dispatch))
        .fallback(dispatch)
}

async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Result<Response> {
    match method {
        Method::GET => Ok(list_employees(&state).await?.into_response()),
        Method::POST => Ok(create_employee(&state, &body).await?.into_response()),
        Method::OPTIONS => Ok(preflight().await.into_response()),
        other => Err(ApiError::UnsupportedMethod(other)),
    }
}

/// A missing row is `null`, not 404.
async fn get_employee(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Json<Option<Value>>> {
    let mut conn = state.acquire().await.map_err(ApiError::Query)?;
    let row = db::fetch_employee(&mut conn, last_segment(&uri))
        .await
        .map_err(ApiError::Query)?;
    Ok(Json(row))
}

async fn list_employees(state: &AppState) -> Result<Json<Vec<Value>>> {
    let mut conn = state.acquire().await.map_err(ApiError::Query)?;
    let rows = db::list_employees(&mut conn).await.map_err(ApiError::Query)?;
    Ok(Json(rows))
}

async fn create_employee(state: &AppState, body: &[u8]) -> Result<(StatusCode, Json<Message>)> {
    let employee: NewEmployee = serde_json::from_slice(body)?;
    let mut conn = state.acquire().await.map_err(ApiError::Write)?;
    let employee_id = db::insert_employee(&mut conn, &employee)
        .await
        .map_err(ApiError::Write)?;
    info!(employee_id, "employee created");
    Ok((
        StatusCode::CREATED,
        Json(Message::new("Employee created successfully")),
    ))
}
