pub mod bookings;
pub mod payment_webhook;
pub mod payout_sweep;
pub mod payouts;
pub mod reports;
