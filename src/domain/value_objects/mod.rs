pub mod actors;
pub mod bookings;
pub mod enums;
pub mod fees;
pub mod money;
pub mod payouts;
pub mod settlement_events;
pub mod time_slots;
