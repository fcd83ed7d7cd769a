//! HTTP handlers.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::{debug, info, warn};

use dutybot_types::{
    EVENT_GROUP_MENTION, EVENT_SUBSCRIBER_MESSAGE, EVENT_VERIFICATION, EventCallbackRequest,
    EventCallbackResponse, OutboundMessage,
};

use crate::GatewayState;
use crate::signature::{self, SIGNATURE_HEADER};

/// GET /health: simple HTTP health check.
pub async fn health_handler(State(state): State<Arc<GatewayState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "channel": state.channel.channel_id(),
        "channel_status": state.channel.status(),
    }))
}

/// POST /event-callback: SeaTalk event subscription endpoint.
///
/// Verification events echo the challenge. Subscriber messages and group
/// mentions get the canned reply, in the sender's thread when there is one,
/// then the challenge is echoed.
pub async fn event_callback_handler(
    State(state): State<Arc<GatewayState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(secret) = &state.signing_secret {
        let provided = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if !signature::verify(&body, secret, provided) {
            warn!("Event callback signature mismatch");
            return (StatusCode::UNAUTHORIZED, "Invalid signature").into_response();
        }
    }

    let event: EventCallbackRequest = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            debug!("Undecodable event callback: {e}");
            return (StatusCode::BAD_REQUEST, "Bad request").into_response();
        }
    };

    info!(
        event_id = %event.event_id,
        event_type = %event.event_type,
        "Event callback received"
    );

    let reply = match event.event_type.as_str() {
        EVENT_VERIFICATION => None,
        EVENT_SUBSCRIBER_MESSAGE => Some(OutboundMessage::to_subscriber(
            event.event.employee_code.clone(),
            state.reply_text.clone(),
        )),
        EVENT_GROUP_MENTION => Some(OutboundMessage::to_group(
            event.event.group_id.clone(),
            state.reply_text.clone(),
        )),
        other => {
            debug!(event_type = other, "Unsupported event type");
            return (StatusCode::BAD_REQUEST, "Unsupported event type").into_response();
        }
    };

    if let Some(mut reply) = reply {
        if let Some(message) = &event.event.message {
            reply = reply.in_thread(message.thread_id.clone());
        }
        if let Err(e) = state.channel.send(reply).await {
            warn!(event_id = %event.event_id, "Failed to send reply: {e:#}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to send message").into_response();
        }
    }

    Json(EventCallbackResponse {
        seatalk_challenge: event.event.seatalk_challenge,
    })
    .into_response()
}
