//! Transit registry routes: buses, routes and bookings.
//!
//! GETs under `/buses/` and `/routes/` read one row keyed by the last path
//! segment; any other GET lists the buses.

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
use crate::model::{Message, NewBooking};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/buses/", get(get_bus).fallback(dispatch))
        .route("/buses/{*rest}", get(get_bus).fallback(dispatch))
        .route("/routes/", get(get_route).fallback(dispatch))
        .route("/routes/{*rest}", get(get_route).fallback(dispatch))
        .fallback(dispatch)
}

async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Result<Response> {
    match method {
        Method::GET => Ok(list_buses(&state).await?.into_response()),
        Method::POST if uri.path().starts_with("/bookings") => {
            Ok(create_booking(&state, &body).await?.into_response())
        }
        Method::POST => Err(ApiError::InvalidPath),
        Method::OPTIONS => Ok(preflight().await.into_response()),
        other => Err(ApiError::UnsupportedMethod(other)),
    }
}

async fn get_bus(State(state): State<AppState>, uri: Uri) -> Result<Json<Option<Value>>> {
    let mut conn = state.acquire().await.map_err(ApiError::Query)?;
    let row = db::fetch_bus(&mut conn, last_segment(&uri))
        .await
        .map_err(ApiError::Query)?;
    Ok(Json(row))
}

async fn get_route(State(state): State<AppState>, uri: Uri) -> Result<Json<Option<Value>>> {
    let mut conn = state.acquire().await.map_err(ApiError::Query)?;
    let row = db::fetch_route(&mut conn, last_segment(&uri))
        .await
        .map_err(ApiError::Query)?;
    Ok(Json(row))
}

async fn list_buses(state: &AppState) -> Result<Json<Vec<Value>>> {
    let mut conn = state.acquire().await.map_err(ApiError::Query)?;
    let rows = db::list_buses(&mut conn).await.map_err(ApiError::Query)?;
    Ok(Json(rows))
}

async fn create_booking(state: &AppState, body: &[u8]) -> Result<(StatusCode, Json<Message>)> {
    let booking: NewBooking = serde_json::from_slice(body)?;
    let mut conn = state.acquire().await.map_err(ApiError::Write)?;
    let booking_id = db::insert_booking(&mut conn, &booking)
        .await
        .map_err(ApiError::Write)?;
    info!(booking_id, seats = booking.seats_booked, "booking created");
    Ok((
        StatusCode::CREATED,
        Json(Message::new("Booking created successfully")),
    ))
}
