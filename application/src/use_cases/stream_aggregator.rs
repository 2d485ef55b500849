//! Streaming aggregator
//!
//! Turns a push-based [`ProviderStream`] into three independent handles:
//!
//! | Handle | Type | Content |
//! |--------|------|---------|
//! | `raw` | `broadcast::Receiver<StreamEvent>` | every provider event |
//! | `chunks` | [`ItemStream`] (`Stream<Item = StreamItem>`) | text, refusal, error |
//! | `final_response` | [`FinalResponse`] (`Future`) | final structured value |
//!
//! A pump task forwards provider events in arrival order. When the
//! completion resolves, events the provider already delivered are drained
//! into the item channel before it is closed, so `chunks` ends exactly once
//! and never loses an item that raced with completion.
//!
//! ```text
//! provider ──events──▶ pump ──▶ raw (broadcast)
//!          ──completion─┘  └──▶ chunks (mpsc) ─▶ closed after drain
//!                          └──▶ final_response (oneshot)
//! ```

use crate::ports::llm_gateway::{GatewayError, ProviderStream};
use enzymeml_domain::{StreamEvent, StreamItem};
use futures::Stream;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, warn};

/// Capacity of the raw event broadcast. Raw receivers that fall further
/// behind observe `RecvError::Lagged`; `chunks` is unbounded and unaffected.
pub const RAW_EVENT_CAPACITY: usize = 1024;

/// Errors surfaced through the final-result future
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error("Streaming request failed: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Failed to decode final response: {0}")]
    Decode(String),

    #[error("Stream aggregator stopped before the response completed")]
    Aborted,
}

/// Pull-based sequence of stream items.
pub struct ItemStream {
    receiver: mpsc::UnboundedReceiver<StreamItem>,
}

impl ItemStream {
    /// Next item, or `None` once the stream is complete and drained.
    pub async fn next_item(&mut self) -> Option<StreamItem> {
        self.receiver.recv().await
    }

    /// Drain the sequence and concatenate its text deltas.
    pub async fn collect_text(mut self) -> String {
        let mut text = String::new();
        while let Some(item) = self.receiver.recv().await {
            if let Some(delta) = item.text() {
                text.push_str(delta);
            }
        }
        text
    }
}

impl Stream for ItemStream {
    type Item = StreamItem;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

/// Future of the final structured response.
pub struct FinalResponse {
    receiver: oneshot::Receiver<Result<Value, StreamError>>,
}

impl FinalResponse {
    /// Await the final value and decode it into `T`.
    pub async fn into_typed<T: DeserializeOwned>(self) -> Result<T, StreamError> {
        let value = self.await?;
        serde_json::from_value(value).map_err(|e| StreamError::Decode(e.to_string()))
    }
}

impl Future for FinalResponse {
    type Output = Result<Value, StreamError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(StreamError::Aborted)),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// The three views over one streaming response.
pub struct AggregatedStream {
    pub raw: broadcast::Receiver<StreamEvent>,
    pub chunks: ItemStream,
    pub final_response: FinalResponse,
}

impl AggregatedStream {
    pub fn into_parts(self) -> (broadcast::Receiver<StreamEvent>, ItemStream, FinalResponse) {
        (self.raw, self.chunks, self.final_response)
    }
}

impl std::fmt::Debug for AggregatedStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregatedStream").finish_non_exhaustive()
    }
}

/// Start aggregating a provider stream.
///
/// Must be called from within a Tokio runtime: the pump runs as a task.
pub fn aggregate(stream: ProviderStream) -> AggregatedStream {
    let (item_tx, item_rx) = mpsc::unbounded_channel();
    let (raw_tx, raw_rx) = broadcast::channel(RAW_EVENT_CAPACITY);
    let (final_tx, final_rx) = oneshot::channel();

    tokio::spawn(pump(stream, item_tx, raw_tx, final_tx));

    AggregatedStream {
        raw: raw_rx,
        chunks: ItemStream { receiver: item_rx },
        final_response: FinalResponse { receiver: final_rx },
    }
}

async fn pump(
    stream: ProviderStream,
    item_tx: mpsc::UnboundedSender<StreamItem>,
    raw_tx: broadcast::Sender<StreamEvent>,
    final_tx: oneshot::Sender<Result<Value, StreamError>>,
) {
    let ProviderStream {
        mut events,
        mut completion,
    } = stream;
    let mut events_open = true;
    let mut forwarded = 0usize;

    let outcome = loop {
        tokio::select! {
            biased;
            event = events.recv(), if events_open => match event {
                Some(event) => {
                    forward(event, &item_tx, &raw_tx);
                    forwarded += 1;
                }
                None => events_open = false,
            },
            outcome = &mut completion => break outcome,
        }
    };

    while let Ok(event) = events.try_recv() {
        forward(event, &item_tx, &raw_tx);
        forwarded += 1;
    }
    drop(item_tx);

    match &outcome {
        Ok(_) => debug!(events = forwarded, "Streaming response complete"),
        Err(e) => warn!(events = forwarded, "Streaming response failed: {}", e),
    }
    // The caller may have dropped the final-response handle
    let _ = final_tx.send(outcome.map_err(StreamError::from));
}

fn forward(
    event: StreamEvent,
    item_tx: &mpsc::UnboundedSender<StreamItem>,
    raw_tx: &broadcast::Sender<StreamEvent>,
) {
    if let Some(item) = event.to_item() {
        // Dropped receivers only mean nobody is iterating
        let _ = item_tx.send(item);
    }
    let _ = raw_tx.send(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use serde::Deserialize;
    use serde_json::json;
    use std::time::Duration;

    fn text(delta: &str) -> StreamEvent {
        StreamEvent::TextDelta(delta.to_string())
    }

    fn text_item(delta: &str) -> StreamItem {
        StreamItem::Text {
            delta: delta.to_string(),
        }
    }

    #[tokio::test]
    async fn test_items_arrive_in_order_then_end() {
        let aggregated = aggregate(ProviderStream::replay(
            vec![text("Hel"), text("lo")],
            Ok(json!({"name": "x"})),
        ));
        let (_, chunks, final_response) = aggregated.into_parts();

        let items: Vec<StreamItem> = chunks.collect().await;
        assert_eq!(items, vec![text_item("Hel"), text_item("lo")]);
        assert_eq!(final_response.await.unwrap(), json!({"name": "x"}));
    }

    #[tokio::test]
    async fn test_fifo_over_many_events() {
        let deltas: Vec<String> = (0..500).map(|i| i.to_string()).collect();
        let events = deltas.iter().map(|d| text(d)).collect();
        let aggregated = aggregate(ProviderStream::replay(events, Ok(Value::Null)));

        let items: Vec<StreamItem> = aggregated.chunks.collect().await;
        let received: Vec<String> = items
            .iter()
            .filter_map(|i| i.text().map(str::to_string))
            .collect();
        assert_eq!(received, deltas);
    }

    #[tokio::test(start_paused = true)]
    async fn test_live_events_and_late_completion() {
        let (tx, rx) = mpsc::unbounded_channel();
        let (done_tx, done_rx) = oneshot::channel::<()>();
        let aggregated = aggregate(ProviderStream::new(rx, async move {
            let _ = done_rx.await;
            Ok(json!({"ok": true}))
        }));
        let mut chunks = aggregated.chunks;

        tx.send(text("a")).unwrap();
        assert_eq!(chunks.next_item().await, Some(text_item("a")));

        tx.send(StreamEvent::Other {
            kind: "response.in_progress".to_string(),
        })
        .unwrap();
        tx.send(StreamEvent::RefusalDelta("no".to_string())).unwrap();
        assert_eq!(
            chunks.next_item().await,
            Some(StreamItem::Refusal {
                delta: "no".to_string()
            })
        );

        // Nothing pending: the sequence waits instead of ending
        let pending = tokio::time::timeout(Duration::from_secs(5), chunks.next_item()).await;
        assert!(pending.is_err());

        // Delivered in the same tick as completion, still yielded
        tx.send(text("b")).unwrap();
        done_tx.send(()).unwrap();
        assert_eq!(chunks.next_item().await, Some(text_item("b")));
        assert_eq!(chunks.next_item().await, None);
        assert_eq!(chunks.next_item().await, None);
        assert_eq!(aggregated.final_response.await.unwrap(), json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_raw_handle_sees_every_event() {
        let aggregated = aggregate(ProviderStream::replay(
            vec![
                StreamEvent::Other {
                    kind: "response.created".to_string(),
                },
                text("x"),
                StreamEvent::Error("overloaded".to_string()),
            ],
            Ok(Value::Null),
        ));
        let (mut raw, chunks, _) = aggregated.into_parts();

        let items: Vec<StreamItem> = chunks.collect().await;
        assert_eq!(items.len(), 2);
        assert!(items[1].is_error());

        let mut kinds = Vec::new();
        while let Ok(event) = raw.recv().await {
            kinds.push(event.kind().to_string());
        }
        assert_eq!(
            kinds,
            vec!["response.created", "response.output_text.delta", "error"]
        );
    }

    #[tokio::test]
    async fn test_failed_completion_surfaces_on_final() {
        let aggregated = aggregate(ProviderStream::replay(
            vec![text("partial")],
            Err(GatewayError::ConnectionError("reset".to_string())),
        ));

        assert_eq!(aggregated.chunks.collect_text().await, "partial");
        assert_eq!(
            aggregated.final_response.await.unwrap_err(),
            StreamError::Gateway(GatewayError::ConnectionError("reset".to_string()))
        );
    }

    #[tokio::test]
    async fn test_typed_final_response() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Document {
            name: String,
        }

        let aggregated = aggregate(ProviderStream::replay(Vec::new(), Ok(json!({"name": "x"}))));
        let document: Document = aggregated.final_response.into_typed().await.unwrap();
        assert_eq!(
            document,
            Document {
                name: "x".to_string()
            }
        );

        let aggregated = aggregate(ProviderStream::replay(Vec::new(), Ok(json!([1, 2]))));
        let error = aggregated
            .final_response
            .into_typed::<Document>()
            .await
            .unwrap_err();
        assert!(matches!(error, StreamError::Decode(_)));
    }
}
