//! JSON response body that signals once the server has taken all of it.
//!
//! Used for the deferred ack: the background publish waits on the signal so
//! no GitHub call can start before the ack is on its way to Discord.

use std::convert::Infallible;
use std::task::Poll;

use axum::{
    body::{Body, Bytes},
    http::header,
    response::{IntoResponse, Response},
};
use futures_util::stream;
use serde_json::Value;
use tokio::sync::oneshot;

/// `payload` as a JSON response; `sent` fires after the last chunk has been
/// pulled. Dropping the response without sending it drops `sent` instead.
pub fn notify_when_sent(payload: Value, sent: oneshot::Sender<()>) -> Response {
    let mut chunk = Some(Bytes::from(payload.to_string()));
    let mut sent = Some(sent);

    let body = stream::poll_fn(move |_cx| {
        if let Some(bytes) = chunk.take() {
            return Poll::Ready(Some(Ok::<_, Infallible>(bytes)));
        }
        if let Some(tx) = sent.take() {
            let _ = tx.send(());
        }
        Poll::Ready(None)
    });

    (
        [(header::CONTENT_TYPE, "application/json")],
        Body::from_stream(body),
    )
        .into_response()
}
