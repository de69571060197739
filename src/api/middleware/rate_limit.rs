//! Token-bucket rate limiting for the administrative API.
//!
//! The public redirect and tracking endpoints use the fixed-window guards in
//! [`super::admission`] instead.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

/// Requests replenished per second for each peer.
const REPLENISH_PER_SECOND: u64 = 1;
const BURST_SIZE: u32 = 20;

/// Creates the limiter wrapped around `/api` management routes.
///
/// Keys on the socket peer address, so the server must be started with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn secure_layer()
-> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(REPLENISH_PER_SECOND)
            .burst_size(BURST_SIZE)
            .finish()
            .expect("governor period and burst are non-zero"),
    );

    GovernorLayer::new(config)
}
