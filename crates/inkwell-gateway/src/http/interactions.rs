//! Discord interaction endpoint: POST /interactions.
//!
//! Every request is signature-checked before anything else. After that the
//! interaction type decides the answer:
//!
//! - PING: PONG
//! - APPLICATION_COMMAND: allowlist check, then the publish modal
//! - MODAL_SUBMIT: allowlist check, deferred ack, then a background publish
//!   that starts only once the ack body has been sent
//! - anything else: ephemeral "unsupported" message

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use inkwell_core::InkwellError;
use inkwell_discord::allow::is_authorized;
use inkwell_discord::commands::{post_modal, COMMAND_NAME};
use inkwell_discord::extract::command_request;
use inkwell_discord::verify::{SIGNATURE_HEADER, TIMESTAMP_HEADER};
use inkwell_discord::{Interaction, InteractionResponse, InteractionType};
use serde_json::json;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::app::AppState;
use crate::http::ack;
use crate::pipeline;

/// A response plus, for deferred acks, the signal the background task waits on.
struct Reply {
    response: InteractionResponse,
    on_sent: Option<oneshot::Sender<()>>,
}

impl From<InteractionResponse> for Reply {
    fn from(response: InteractionResponse) -> Self {
        Self {
            response,
            on_sent: None,
        }
    }
}

/// POST /interactions
///
/// 401 on a bad signature, 400 on an unparseable body, otherwise 200 with an
/// interaction response.
pub async fn interactions_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let timestamp = header(&headers, TIMESTAMP_HEADER);
    let signature = header(&headers, SIGNATURE_HEADER);
    if let Err(e) = state.verifier.verify(timestamp, signature, &body) {
        warn!(
            code = InkwellError::SignatureInvalid.code(),
            reason = %e,
            "rejected interaction"
        );
        return (StatusCode::UNAUTHORIZED, "invalid request signature").into_response();
    }

    let interaction: Interaction = match serde_json::from_slice(&body) {
        Ok(i) => i,
        Err(e) => {
            warn!(error = %e, "invalid JSON in interaction body");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "invalid JSON body"})),
            )
                .into_response();
        }
    };

    let reply = route(&state, interaction);
    match reply.on_sent {
        Some(sent) => ack::notify_when_sent(reply.response.to_json(), sent),
        None => Json(reply.response.to_json()).into_response(),
    }
}

fn route(state: &Arc<AppState>, interaction: Interaction) -> Reply {
    match interaction.kind {
        InteractionType::Ping => {
            debug!(interaction_id = %interaction.id, "ping");
            InteractionResponse::Pong.into()
        }
        InteractionType::ApplicationCommand => on_command(state, &interaction).into(),
        InteractionType::ModalSubmit => on_modal_submit(state, interaction),
        other => {
            debug!(interaction_id = %interaction.id, kind = ?other, "unsupported interaction");
            InteractionResponse::ephemeral("This interaction is not supported.").into()
        }
    }
}

fn on_command(state: &AppState, interaction: &Interaction) -> InteractionResponse {
    if let Err(denied) = authorize(state, interaction) {
        return denied;
    }

    let Some(data) = interaction.data.as_ref() else {
        return InteractionResponse::ephemeral("The command arrived without any data.");
    };
    let name = data.name.as_deref().unwrap_or_default();
    if name != COMMAND_NAME {
        info!(interaction_id = %interaction.id, command = name, "unknown command");
        return InteractionResponse::ephemeral(format!("Unknown command `/{name}`."));
    }

    match command_request(data) {
        Ok(request) => {
            info!(
                interaction_id = %interaction.id,
                custom_id = %request.submission.custom_id(),
                "opening publish form"
            );
            InteractionResponse::Modal(post_modal(
                &request.submission,
                request.media_url.as_deref(),
            ))
        }
        Err(e) => {
            let err = InkwellError::from(e);
            warn!(interaction_id = %interaction.id, code = err.code(), error = %err, "command rejected");
            InteractionResponse::ephemeral(format!("❌ {err}"))
        }
    }
}

fn on_modal_submit(state: &Arc<AppState>, interaction: Interaction) -> Reply {
    if let Err(denied) = authorize(state, &interaction) {
        return denied.into();
    }

    let ctx = interaction.context();
    let Some(data) = interaction.data else {
        return InteractionResponse::ephemeral("The form arrived without any data.").into();
    };

    info!(
        interaction_id = %ctx.interaction_id,
        custom_id = data.custom_id.as_deref().unwrap_or_default(),
        "form submitted, publishing in background"
    );
    let (sent_tx, sent_rx) = oneshot::channel();
    tokio::spawn(pipeline::run_submission(Arc::clone(state), ctx, data, sent_rx));
    Reply {
        response: InteractionResponse::Deferred,
        on_sent: Some(sent_tx),
    }
}

fn authorize(state: &AppState, interaction: &Interaction) -> Result<(), InteractionResponse> {
    let user_id = interaction.user_id().unwrap_or_default();
    if is_authorized(&state.config.discord.authorized_users, user_id) {
        return Ok(());
    }

    let err = InkwellError::AuthorizationDenied {
        user_id: user_id.to_string(),
    };
    warn!(interaction_id = %interaction.id, code = err.code(), user_id, "unauthorized interaction");
    Err(InteractionResponse::ephemeral(
        "You are not authorized to publish to this site.",
    ))
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
