use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::payroll_controller::PayrollController;
use crate::dto::payroll_dto::{SettlementQueryParams, SettlementResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_payroll_router() -> Router<AppState> {
    Router::new().route("/driver/:driver_id/settlements", get(driver_settlements))
}

async fn driver_settlements(
    State(state): State<AppState>,
    Path(driver_id): Path<Uuid>,
    Query(params): Query<SettlementQueryParams>,
) -> Result<Json<Vec<SettlementResponse>>, AppError> {
    let controller = PayrollController::new(state.payroll.clone());
    let response = controller.driver_settlements(driver_id, params).await?;
    Ok(Json(response))
}
