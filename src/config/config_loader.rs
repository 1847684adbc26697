use anyhow::{Ok, Result};

use super::config_model::{Auth, Database, DotEnvyConfig, Payouts, Server, Stripe};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = Server {
        port: std::env::var("SERVER_PORT")
            .expect("SERVER_PORT is invalid")
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .expect("SERVER_BODY_LIMIT is invalid")
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .expect("SERVER_TIMEOUT is invalid")
            .parse()?,
    };

    let database = Database {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL is invalid"),
    };

    let auth = Auth {
        jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET is invalid"),
    };

    let stripe = Stripe {
        secret_key: std::env::var("STRIPE_SECRET_KEY").expect("STRIPE_SECRET_KEY is invalid"),
        webhook_secret: std::env::var("STRIPE_WEBHOOK_SECRET")
            .expect("STRIPE_WEBHOOK_SECRET is invalid"),
    };

    let payouts = Payouts {
        internal_sweep_token: std::env::var("INTERNAL_SWEEP_TOKEN")
            .ok()
            .filter(|token| !token.is_empty()),
        notify_webhook_url: std::env::var("PAYOUT_NOTIFY_WEBHOOK_URL")
            .ok()
            .filter(|u| !u.is_empty()),
        release_rate_per_minute: std::env::var("PAYOUT_RELEASE_RATE_PER_MINUTE")
            .unwrap_or_else(|_| "30".to_string())
            .parse()?,
    };

    Ok(DotEnvyConfig {
        server,
        database,
        auth,
        stripe,
        payouts,
    })
}
