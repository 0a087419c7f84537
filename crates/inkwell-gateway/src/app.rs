use std::sync::Arc;

use axum::{routing::post, Router};
use chrono::FixedOffset;
use inkwell_core::{InkwellConfig, InkwellError};
use inkwell_discord::{FollowUpSender, SignatureVerifier};
use inkwell_github::{HostingPlatform, Publisher};

/// Central shared state, passed as `Arc<AppState>` to every handler and
/// background task. Immutable after startup.
pub struct AppState {
    pub config: InkwellConfig,
    pub verifier: SignatureVerifier,
    pub publisher: Publisher,
    pub followups: Arc<dyn FollowUpSender>,
    /// Parsed `site.utc_offset`.
    pub offset: FixedOffset,
}

impl AppState {
    pub fn new(
        config: InkwellConfig,
        host: Arc<dyn HostingPlatform>,
        followups: Arc<dyn FollowUpSender>,
    ) -> Result<Self, InkwellError> {
        let verifier = SignatureVerifier::from_hex(&config.discord.public_key)
            .map_err(|e| InkwellError::Config(format!("discord.public_key: {e}")))?;
        let offset = config.site.offset()?;
        let publisher = Publisher::new(
            host,
            config.github.base_branch.clone(),
            config.site.branch_source.clone(),
            offset,
        );

        Ok(Self {
            config,
            verifier,
            publisher,
            followups,
            offset,
        })
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/interactions",
            post(crate::http::interactions::interactions_handler),
        )
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
