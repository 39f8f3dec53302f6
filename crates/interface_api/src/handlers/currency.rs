//! Currency handlers

use axum::{extract::State, Extension, Json};
use serde::Serialize;

use core_kernel::Currency;
use domain_currency::CurrencyInfo;

use crate::auth::AuthUser;
use crate::{error::ApiError, AppState};

#[derive(Debug, Serialize)]
pub struct CurrencyListResponse {
    pub loaded: bool,
    /// The caller's default display currency
    pub default: Currency,
    pub currencies: Vec<CurrencyInfo>,
}

/// Lists the currencies resolved from the country directory
pub async fn list_currencies(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<CurrencyListResponse>, ApiError> {
    let account = state.users.get(user.user_id)?;
    Ok(Json(CurrencyListResponse {
        loaded: state.currency.is_loaded(),
        default: state.currency.default_currency(user.role, account.nationality),
        currencies: state.currency.currencies(),
    }))
}
