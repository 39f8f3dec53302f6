//! Claim limit DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::UserId;

use super::claims::MoneyResponse;

#[derive(Debug, Deserialize)]
pub struct SetLimitRequest {
    pub ceiling: Decimal,
    /// Defaults to the manager's home currency
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LimitResponse {
    pub manager_id: UserId,
    pub manager_name: String,
    pub ceiling: MoneyResponse,
    /// False until an admin sets the ceiling
    pub explicit: bool,
    pub updated_by: Option<UserId>,
    pub updated_at: Option<DateTime<Utc>>,
}
