pub mod actor_roles;
pub mod booking_statuses;
pub mod payment_statuses;
pub mod payout_schedule_statuses;
pub mod transaction_statuses;
