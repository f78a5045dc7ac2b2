use std::sync::Arc;

use uuid::Uuid;

use crate::dto::payroll_dto::{SettlementQueryParams, SettlementResponse};
use crate::models::trip::status_types;
use crate::services::payroll_service::{PayrollService, SettlementQuery};
use crate::utils::errors::AppError;

pub struct PayrollController {
    service: Arc<PayrollService>,
}

impl PayrollController {
    pub fn new(service: Arc<PayrollService>) -> Self {
        Self { service }
    }

    pub async fn driver_settlements(
        &self,
        driver_id: Uuid,
        params: SettlementQueryParams,
    ) -> Result<Vec<SettlementResponse>, AppError> {
        let payable_types = match params.stages.as_deref() {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => vec![
                status_types::WAITING_FOR_PICKUP.to_string(),
                status_types::DELIVERED.to_string(),
            ],
        };

        let settlements = self
            .service
            .driver_settlements(SettlementQuery {
                company_id: params.company_id,
                driver_id,
                from: params.from,
                to: params.to,
                payable_types,
            })
            .await?;

        Ok(settlements.into_iter().map(Into::into).collect())
    }
}
