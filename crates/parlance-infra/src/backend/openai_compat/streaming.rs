//! OpenAI SSE stream to [`CompletionEvent`] adapter.
//!
//! Consumes a [`reqwest_eventsource::EventSource`] and maps its events onto
//! the backend-agnostic completion stream:
//!
//! - `data: {...}` chunks become [`CompletionEvent::Fragment`]s (the empty
//!   ones -- role openers, finish markers -- pass through and are dropped by
//!   the orchestrator).
//! - `data: [DONE]` becomes the [`CompletionEvent::Done`] sentinel.
//! - A transport or HTTP failure becomes a terminal `Err` item.
//! - The connection closing without `[DONE]` just ends the stream: no
//!   sentinel, which downstream treats as an abandoned generation.
//!
//! The event source is closed on every exit path so it never attempts the
//! SSE auto-reconnect, which would replay the completion from the start.

use futures_util::StreamExt;
use reqwest_eventsource::{Event, EventSource};

use parlance_core::backend::adapter::CompletionStream;
use parlance_types::backend::{BackendError, CompletionEvent};

use super::types::ChatCompletionChunk;

/// End-of-stream marker in the OpenAI streaming protocol.
const DONE_MARKER: &str = "[DONE]";

/// Map a live event source onto a [`CompletionStream`].
pub fn completion_events(event_source: EventSource) -> CompletionStream {
    Box::pin(async_stream::stream! {
        let mut event_source = event_source;

        while let Some(event) = event_source.next().await {
            match event {
                Ok(Event::Open) => continue,
                Ok(Event::Message(message)) => {
                    if message.data == DONE_MARKER {
                        yield Ok(CompletionEvent::Done);
                        break;
                    }
                    match serde_json::from_str::<ChatCompletionChunk>(&message.data) {
                        Ok(chunk) => {
                            let content = chunk.content().unwrap_or_default().to_string();
                            yield Ok(CompletionEvent::Fragment(content));
                        }
                        Err(e) => {
                            yield Err(BackendError::Decode(e.to_string()));
                            break;
                        }
                    }
                }
                // Server closed the connection without [DONE]: end without
                // the sentinel.
                Err(reqwest_eventsource::Error::StreamEnded) => break,
                Err(reqwest_eventsource::Error::InvalidStatusCode(status, response)) => {
                    let body = response.text().await.unwrap_or_default();
                    yield Err(BackendError::Http {
                        status: status.as_u16(),
                        body,
                    });
                    break;
                }
                Err(e) => {
                    yield Err(BackendError::Stream(e.to_string()));
                    break;
                }
            }
        }

        event_source.close();
    })
}
