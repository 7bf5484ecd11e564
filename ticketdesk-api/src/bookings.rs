use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use uuid::Uuid;
use ticketdesk_core::{Booking, CreateBookingRequest};
use crate::error::AppError;
use crate::extract::{AppJson, AppPath};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/bookings", get(list_bookings).post(create_booking))
        .route("/api/bookings/export/excel", get(export_excel))
        .route(
            "/api/bookings/by-number/{booking_number}",
            get(get_booking_by_number).delete(delete_booking_by_number),
        )
        .route("/api/bookings/{id}", get(get_booking))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/bookings
/// All bookings, newest first
async fn list_bookings(State(state): State<AppState>) -> Result<Json<Vec<Booking>>, AppError> {
    Ok(Json(state.bookings.list_bookings().await?))
}

/// GET /api/bookings/{id}
async fn get_booking(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(state.bookings.get_booking(id).await?))
}

/// GET /api/bookings/by-number/{booking_number}
async fn get_booking_by_number(
    State(state): State<AppState>,
    AppPath(booking_number): AppPath<String>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(state.bookings.get_booking_by_number(&booking_number).await?))
}

/// GET /api/bookings/export/excel
/// Download every booking as an xlsx workbook
async fn export_excel(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let file = state.bookings.export_bookings().await?;
    let disposition = format!("attachment; filename=\"{}\"", file.filename);

    Ok((
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    ))
}

/// POST /api/bookings
/// Create a booking; responds 201 with a Location pointing at the new record
async fn create_booking(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.bookings.create_booking(req).await?;
    let location = format!("/api/bookings/{}", booking.id);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(booking)))
}

/// DELETE /api/bookings/by-number/{booking_number}
async fn delete_booking_by_number(
    State(state): State<AppState>,
    AppPath(booking_number): AppPath<String>,
) -> Result<StatusCode, AppError> {
    state.bookings.delete_booking_by_number(&booking_number).await?;
    Ok(StatusCode::NO_CONTENT)
}
