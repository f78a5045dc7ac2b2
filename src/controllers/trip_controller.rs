use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::dto::common_dto::ApiResponse;
use crate::dto::trip_dto::{
    AdvanceStatusRequest, BillOfLadingRequest, CancelTripRequest, CreateTripRequest,
    ResetExpensesRequest, StatusAdvanceResponse, TripDetailResponse, TripResponse,
};
use crate::services::trip_service::{CreateTripCommand, TripService};
use crate::utils::errors::AppError;

pub struct TripController {
    service: Arc<TripService>,
}

impl TripController {
    pub fn new(service: Arc<TripService>) -> Self {
        Self { service }
    }

    pub async fn create(
        &self,
        request: CreateTripRequest,
    ) -> Result<ApiResponse<TripResponse>, AppError> {
        let command = CreateTripCommand {
            order_id: request.order_id,
            vehicle_id: request.vehicle_id,
            driver_id: request.driver_id,
            weight: request.weight,
            pickup_date: request.pickup_date,
            delivery_date: request.delivery_date,
            driver_cost: request.driver_cost,
            subcontractor_cost: request.subcontractor_cost,
            bridge_toll: request.bridge_toll,
            other_cost: request.other_cost,
            use_route_defaults: request.use_route_defaults,
            created_by: request.created_by,
        };

        let trip = self.service.create_trip(command).await?;

        Ok(ApiResponse::success_with_message(
            trip.into(),
            "Viaje creado exitosamente".to_string(),
        ))
    }

    pub async fn advance_status(
        &self,
        id: Uuid,
        request: AdvanceStatusRequest,
    ) -> Result<ApiResponse<StatusAdvanceResponse>, AppError> {
        request.validate()?;

        let (trip, event) = self
            .service
            .advance_status(
                id,
                &request.status_type,
                request.note,
                request.driver_report_id,
                request.expected_updated_at,
                request.actor,
            )
            .await?;

        Ok(ApiResponse::success(StatusAdvanceResponse {
            trip: trip.into(),
            event: event.into(),
        }))
    }

    pub async fn cancel(
        &self,
        id: Uuid,
        request: CancelTripRequest,
    ) -> Result<ApiResponse<TripResponse>, AppError> {
        let trip = self
            .service
            .cancel_trip(id, request.expected_updated_at, request.actor)
            .await?;

        Ok(ApiResponse::success_with_message(
            trip.into(),
            "Viaje cancelado".to_string(),
        ))
    }

    pub async fn update_bill_of_lading(
        &self,
        id: Uuid,
        request: BillOfLadingRequest,
    ) -> Result<ApiResponse<TripResponse>, AppError> {
        request.validate()?;

        let trip = self
            .service
            .update_bill_of_lading(
                id,
                request.code,
                request.images_added,
                request.images_removed,
                request.received,
                request.actor,
            )
            .await?;

        Ok(ApiResponse::success(trip.into()))
    }

    pub async fn reset_notification(&self, id: Uuid) -> Result<ApiResponse<TripResponse>, AppError> {
        let trip = self.service.reset_notification_schedule(id, None).await?;
        Ok(ApiResponse::success(trip.into()))
    }

    pub async fn reset_expenses(
        &self,
        request: ResetExpensesRequest,
    ) -> Result<ApiResponse<Vec<TripResponse>>, AppError> {
        request.validate()?;

        let trips = self.service.reset_expenses(request.trip_ids).await?;

        Ok(ApiResponse::success_with_message(
            trips.into_iter().map(Into::into).collect(),
            "Gastos restablecidos a los defaults de la ruta".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<TripDetailResponse, AppError> {
        let detail = self.service.get_trip_detail(id).await?;
        Ok(detail.into())
    }

    pub async fn list_by_order(&self, order_id: Uuid) -> Result<Vec<TripResponse>, AppError> {
        let trips = self.service.list_trips(order_id).await?;
        Ok(trips.into_iter().map(Into::into).collect())
    }
}
