use std::sync::Arc;

use wayfare_core::repository::{BookingStore, ShareStore};
use wayfare_core::validate::BookingPolicy;
use wayfare_core::QrSigner;
use wayfare_planner::PlannerClient;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub bookings: Arc<dyn BookingStore>,
    pub shares: Arc<dyn ShareStore>,
    pub qr: Arc<QrSigner>,
    /// Absent when no planner gateway is configured.
    pub planner: Option<Arc<PlannerClient>>,
    pub auth: AuthConfig,
    pub policy: BookingPolicy,
}
