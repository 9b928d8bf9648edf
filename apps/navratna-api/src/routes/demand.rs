use axum::extract::Path;
use axum::Json;

use navratna_core::demand::{self, DemandForecast};
use navratna_core::validation::validate_required;

use crate::error::ApiResult;

/// Monthly demand curve. Gems without a curve get the flat baseline
/// with `known: false`.
pub async fn forecast(Path(gem_type): Path<String>) -> ApiResult<Json<DemandForecast>> {
    validate_required("gemType", &gem_type, 100)?;
    Ok(Json(demand::forecast(&gem_type)))
}
