pub mod bookings;
pub mod payout_schedules;
pub mod processed_webhook_events;
pub mod providers;
pub mod transaction_records;
