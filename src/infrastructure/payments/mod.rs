pub mod stripe_transfer;
