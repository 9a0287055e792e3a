//! Crate entrypoint wiring together configuration, PowerDNS, and the event API.

pub mod api;
pub mod config;
pub mod error;
pub mod inventory;
pub mod powerdns;

use config::Config;
use powerdns::client::PowerDnsClient;

use std::sync::Arc;

/// Complete application dependencies shared across handlers.
pub struct AppState {
    pub config: Config,
    pub pdns: PowerDnsClient,
}

/// Arc-wrapped version of `AppState` passed into Axum extensions.
pub type SharedState = Arc<AppState>;
