use serde::Serialize;
use thiserror::Error;

/// Platform commission charged on every booking, in basis points.
pub const PLATFORM_FEE_BASIS_POINTS: i64 = 1_000;
/// Extra surcharge charged to guest (unauthenticated) customers, in basis points.
pub const GUEST_SURCHARGE_BASIS_POINTS: i64 = 1_000;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FeeError {
    #[error("base price must not be negative")]
    NegativeBasePrice,
}

/// Fee breakdown for one booking, in integer minor units.
///
/// `platform_fee + guest_surcharge + provider_payout == customer_total` holds
/// exactly: the percentages are rounded half-up independently and the totals
/// are then derived by addition/subtraction.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct FeeBreakdown {
    pub platform_fee_minor: i64,
    pub guest_surcharge_minor: i64,
    pub provider_payout_minor: i64,
    pub customer_total_minor: i64,
}

pub fn compute_fees(base_price_minor: i64, is_guest: bool) -> Result<FeeBreakdown, FeeError> {
    if base_price_minor < 0 {
        return Err(FeeError::NegativeBasePrice);
    }

    let platform_fee_minor = basis_points_of(base_price_minor, PLATFORM_FEE_BASIS_POINTS);
    let guest_surcharge_minor = if is_guest {
        basis_points_of(base_price_minor, GUEST_SURCHARGE_BASIS_POINTS)
    } else {
        0
    };

    // The surcharge is customer-borne: the provider payout only ever gives up
    // the platform fee.
    let provider_payout_minor = base_price_minor - platform_fee_minor;
    let customer_total_minor = base_price_minor + guest_surcharge_minor;

    Ok(FeeBreakdown {
        platform_fee_minor,
        guest_surcharge_minor,
        provider_payout_minor,
        customer_total_minor,
    })
}

/// One booking's fee inputs, used by the reporting aggregates.
#[derive(Debug, Clone, Copy)]
pub struct BookingFeeLine {
    pub base_price_minor: i64,
    pub is_guest: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct PlatformRevenueSummary {
    pub total_platform_fees_minor: i64,
    pub total_guest_surcharges_minor: i64,
    pub total_revenue_minor: i64,
    pub booking_count: usize,
    pub guest_booking_count: usize,
    pub authenticated_booking_count: usize,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct ProviderEarningsSummary {
    pub total_payout_minor: i64,
    pub total_base_minor: i64,
    pub total_platform_fees_minor: i64,
    pub booking_count: usize,
    pub guest_booking_count: usize,
    pub authenticated_booking_count: usize,
}

/// Folds booking fee lines into platform revenue totals. Reporting only, not
/// authoritative ledger state.
pub fn calculate_platform_revenue(
    lines: &[BookingFeeLine],
) -> Result<PlatformRevenueSummary, FeeError> {
    let mut summary = PlatformRevenueSummary::default();
    for line in lines {
        let fees = compute_fees(line.base_price_minor, line.is_guest)?;
        summary.total_platform_fees_minor += fees.platform_fee_minor;
        summary.total_guest_surcharges_minor += fees.guest_surcharge_minor;
        summary.total_revenue_minor += fees.platform_fee_minor + fees.guest_surcharge_minor;
        summary.booking_count += 1;
        if line.is_guest {
            summary.guest_booking_count += 1;
        } else {
            summary.authenticated_booking_count += 1;
        }
    }
    Ok(summary)
}

/// Folds booking fee lines into provider earnings totals. Reporting only.
pub fn calculate_provider_earnings(
    lines: &[BookingFeeLine],
) -> Result<ProviderEarningsSummary, FeeError> {
    let mut summary = ProviderEarningsSummary::default();
    for line in lines {
        let fees = compute_fees(line.base_price_minor, line.is_guest)?;
        summary.total_payout_minor += fees.provider_payout_minor;
        summary.total_base_minor += line.base_price_minor;
        summary.total_platform_fees_minor += fees.platform_fee_minor;
        summary.booking_count += 1;
        if line.is_guest {
            summary.guest_booking_count += 1;
        } else {
            summary.authenticated_booking_count += 1;
        }
    }
    Ok(summary)
}

fn basis_points_of(amount_minor: i64, basis_points: i64) -> i64 {
    ((amount_minor as i128 * basis_points as i128 + 5_000) / 10_000) as i64
}
