//! Order validation and composition
//!
//! Turns a raw submission into normalized [`OrderFields`] by resolving the
//! brand and every requested service against the reference collections.
//! Performs the two reference reads and nothing else; the caller owns the
//! subsequent write, and no atomicity spans the three operations.

use crate::core::error::ApiError;
use crate::core::order::{OrderFields, OrderSubmission};
use crate::core::service::ReferenceStore;

/// Validate a submission and compose the normalized order fields.
///
/// Rejections, in check order:
/// 1. any required field absent or empty → [`ApiError::MissingFields`]
/// 2. brand name unknown → [`ApiError::InvalidBrand`]
/// 3. any service name unknown → [`ApiError::InvalidServices`]; the check
///    compares resolved count to requested count, so a request repeating a
///    service name is rejected as well (duplicates collapse in the lookup)
///
/// Embedded services follow the reference-set lookup order, not the order
/// the client sent them in.
pub async fn compose_order(
    references: &dyn ReferenceStore,
    submission: OrderSubmission,
) -> Result<OrderFields, ApiError> {
    let name = submission
        .name
        .filter(|s| !s.is_empty())
        .ok_or(ApiError::MissingFields)?;
    let brand_name = submission
        .brand
        .map(|b| b.into_name())
        .filter(|s| !s.is_empty())
        .ok_or(ApiError::MissingFields)?;
    let year = submission.year.ok_or(ApiError::MissingFields)?;
    let received_date = submission
        .received_date
        .filter(|s| !s.is_empty())
        .ok_or(ApiError::MissingFields)?;
    let breakdown = submission
        .breakdown
        .filter(|s| !s.is_empty())
        .ok_or(ApiError::MissingFields)?;
    let requested: Vec<String> = submission
        .services
        .filter(|s| !s.is_empty())
        .ok_or(ApiError::MissingFields)?
        .into_iter()
        .map(|s| s.into_name())
        .collect();

    let brand = references
        .brand_by_name(&brand_name)
        .await?
        .ok_or(ApiError::InvalidBrand)?;

    let services = references.services_by_names(&requested).await?;
    if services.len() != requested.len() {
        return Err(ApiError::InvalidServices);
    }

    Ok(OrderFields {
        name,
        brand,
        year,
        received_date,
        breakdown,
        services,
    })
}
