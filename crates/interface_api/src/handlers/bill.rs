//! Bill handlers

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Extension, Json,
};
use tracing::info;
use validator::Validate;

use core_kernel::BillId;

use crate::auth::Claims;
use crate::dto::bill::{BillCreatedResponse, BillRequest, BillResponse};
use crate::dto::ApiResponse;
use crate::{error::ApiError, AppState};

/// Creates a new bill
///
/// The bill number and total are assigned server-side; the caller's token
/// subject is recorded as the creator.
pub async fn create_bill(
    State(state): State<AppState>,
    claims: Option<Extension<Claims>>,
    payload: Result<Json<BillRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<BillCreatedResponse>>), ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    let caller = claims.as_ref().map(|Extension(c)| c.sub.as_str());
    let bill = state.bills.create(caller, request.into_create()).await?;

    info!(bill_id = %bill.id, bill_number = %bill.bill_number, "Bill created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(BillCreatedResponse::from(&bill))),
    ))
}

/// Gets a bill by ID
pub async fn get_bill(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<BillResponse>>, ApiError> {
    let Path(id) = id?;
    let bill = state.bills.get(BillId::new(id)).await?;
    Ok(Json(ApiResponse::data(BillResponse::from(&bill))))
}

/// Lists all bills
pub async fn list_bills(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<BillResponse>>>, ApiError> {
    let bills: Vec<BillResponse> = state.bills.list().await?.iter().map(BillResponse::from).collect();
    let count = bills.len();
    Ok(Json(ApiResponse::data(bills).with_count(count)))
}

/// Applies a partial update to a bill
pub async fn update_bill(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<BillRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<BillResponse>>, ApiError> {
    let Path(id) = id?;
    let Json(request) = payload?;
    request.validate()?;

    let bill = state.bills.update(BillId::new(id), request.into_patch()).await?;
    Ok(Json(
        ApiResponse::data(BillResponse::from(&bill)).with_message("Bill updated successfully"),
    ))
}

/// Deletes a bill
pub async fn delete_bill(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let Path(id) = id?;
    state.bills.delete(BillId::new(id)).await?;
    Ok(Json(ApiResponse::message("Bill deleted successfully")))
}
