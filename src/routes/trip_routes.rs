use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::trip_controller::TripController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::trip_dto::{
    AdvanceStatusRequest, BillOfLadingRequest, CancelTripRequest, CreateTripRequest,
    ResetExpensesRequest, StatusAdvanceResponse, TripDetailResponse, TripResponse,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_trip_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_trip))
        .route("/reset-expenses", post(reset_expenses))
        .route("/order/:order_id", get(list_trips_by_order))
        .route("/:id", get(get_trip))
        .route("/:id/status", post(advance_status))
        .route("/:id/cancel", post(cancel_trip))
        .route("/:id/bill-of-lading", put(update_bill_of_lading))
        .route("/:id/reset-notification", post(reset_notification))
}

async fn create_trip(
    State(state): State<AppState>,
    Json(request): Json<CreateTripRequest>,
) -> Result<Json<ApiResponse<TripResponse>>, AppError> {
    let controller = TripController::new(state.trips.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn get_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TripDetailResponse>, AppError> {
    let controller = TripController::new(state.trips.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn list_trips_by_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Vec<TripResponse>>, AppError> {
    let controller = TripController::new(state.trips.clone());
    let response = controller.list_by_order(order_id).await?;
    Ok(Json(response))
}

async fn advance_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AdvanceStatusRequest>,
) -> Result<Json<ApiResponse<StatusAdvanceResponse>>, AppError> {
    let controller = TripController::new(state.trips.clone());
    let response = controller.advance_status(id, request).await?;
    Ok(Json(response))
}

async fn cancel_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CancelTripRequest>,
) -> Result<Json<ApiResponse<TripResponse>>, AppError> {
    let controller = TripController::new(state.trips.clone());
    let response = controller.cancel(id, request).await?;
    Ok(Json(response))
}

async fn update_bill_of_lading(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<BillOfLadingRequest>,
) -> Result<Json<ApiResponse<TripResponse>>, AppError> {
    let controller = TripController::new(state.trips.clone());
    let response = controller.update_bill_of_lading(id, request).await?;
    Ok(Json(response))
}

async fn reset_notification(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TripResponse>>, AppError> {
    let controller = TripController::new(state.trips.clone());
    let response = controller.reset_notification(id).await?;
    Ok(Json(response))
}

async fn reset_expenses(
    State(state): State<AppState>,
    Json(request): Json<ResetExpensesRequest>,
) -> Result<Json<ApiResponse<Vec<TripResponse>>>, AppError> {
    let controller = TripController::new(state.trips.clone());
    let response = controller.reset_expenses(request).await?;
    Ok(Json(response))
}
