pub mod bookings;
pub mod providers;
pub mod settlements;
pub mod webhook_events;
