//! Server-sent event session stream.
//!
//! One long-lived `GET /stream` request delivers every inbound event.
//! The stream runs as a spawned task that forwards decoded
//! [`SessionEvent`]s over a channel and re-opens the request after any
//! failure, mirroring the automatic retry a browser `EventSource`
//! would provide: fixed delay, no cap, no manual close.
//!
//! Malformed payloads are dropped and logged; a bad event is not worth
//! tearing down the connection the server would only replay history
//! over.

use std::time::Duration;

use eventsource_stream::Eventsource;
use futures::StreamExt;
use tokio::sync::mpsc;

use dropwire_proto::SessionEvent;

use crate::ClientConfig;

/// Updates emitted by the stream task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamUpdate {
    /// A connection attempt is starting.
    Connecting,
    /// The stream request was accepted; events follow.
    Opened,
    /// A decoded event from the server.
    Event(SessionEvent),
    /// The stream failed or ended; a retry is scheduled.
    Lost,
}

/// Handle to a running session stream.
pub struct StreamHandle {
    /// Updates in arrival order.
    pub updates: mpsc::Receiver<StreamUpdate>,
    abort_handle: tokio::task::AbortHandle,
}

impl StreamHandle {
    /// Stop the stream task.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Open the session stream.
///
/// `device_name` is passed as the `name` query parameter so the server
/// can assign a readable display name to this session.
pub fn connect(config: &ClientConfig, device_name: &str) -> StreamHandle {
    let (tx, rx) = mpsc::channel(64);
    let url = format!("{}/stream", config.base_url);
    let handle = tokio::spawn(run(url, device_name.to_owned(), config.retry_delay, tx));
    StreamHandle { updates: rx, abort_handle: handle.abort_handle() }
}

async fn run(
    url: String,
    device_name: String,
    retry_delay: Duration,
    tx: mpsc::Sender<StreamUpdate>,
) {
    let http = reqwest::Client::new();

    loop {
        if tx.send(StreamUpdate::Connecting).await.is_err() {
            return;
        }

        let request = http.get(&url).query(&[("name", device_name.as_str())]);
        match request.send().await.and_then(reqwest::Response::error_for_status) {
            Ok(response) => {
                if tx.send(StreamUpdate::Opened).await.is_err() {
                    return;
                }
                if read_events(response, &tx).await.is_err() {
                    return;
                }
            },
            Err(e) => {
                tracing::debug!(error = %e, "stream connect failed");
            },
        }

        if tx.send(StreamUpdate::Lost).await.is_err() {
            return;
        }
        tokio::time::sleep(retry_delay).await;
    }
}

/// Forward events until the stream ends or errors.
///
/// `Err(())` means the receiving side went away and the task should
/// exit; stream failures return `Ok(())` so the caller can retry.
async fn read_events(
    response: reqwest::Response,
    tx: &mpsc::Sender<StreamUpdate>,
) -> Result<(), ()> {
    let mut events = response.bytes_stream().eventsource();

    while let Some(item) = events.next().await {
        match item {
            Ok(event) => match SessionEvent::decode(&event.data) {
                Ok(decoded) => {
                    if tx.send(StreamUpdate::Event(decoded)).await.is_err() {
                        return Err(());
                    }
                },
                Err(e) => {
                    tracing::warn!(error = %e, "dropping malformed stream payload");
                },
            },
            Err(e) => {
                tracing::debug!(error = %e, "event stream interrupted");
                break;
            },
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn sse_response(body: &str) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .insert_header("content-type", "text/event-stream")
            .set_body_string(body.to_owned())
    }

    fn test_config(server: &MockServer) -> ClientConfig {
        let mut config = ClientConfig::new(server.uri());
        config.retry_delay = Duration::from_millis(10);
        config
    }

    #[tokio::test]
    async fn stream_delivers_decoded_events_in_order() {
        let server = MockServer::start().await;
        let body = concat!(
            "data: {\"type\":\"welcome\",\"assigned_name\":\"Linux PC\"}\n\n",
            "data: {\"type\":\"user_count\",\"count\":2}\n\n",
            "data: {\"type\":\"text\",\"content\":\"hi\",\"sender_id\":\"abc\"}\n\n",
        );
        Mock::given(method("GET"))
            .and(path("/stream"))
            .and(query_param("name", "Test Device"))
            .respond_with(sse_response(body))
            .mount(&server)
            .await;

        let mut handle = connect(&test_config(&server), "Test Device");

        assert_eq!(handle.updates.recv().await, Some(StreamUpdate::Connecting));
        assert_eq!(handle.updates.recv().await, Some(StreamUpdate::Opened));
        assert_eq!(
            handle.updates.recv().await,
            Some(StreamUpdate::Event(SessionEvent::Welcome { assigned_name: "Linux PC".into() }))
        );
        assert_eq!(
            handle.updates.recv().await,
            Some(StreamUpdate::Event(SessionEvent::UserCount { count: 2 }))
        );
        assert!(matches!(
            handle.updates.recv().await,
            Some(StreamUpdate::Event(SessionEvent::Message(_)))
        ));
    }

    #[tokio::test]
    async fn stream_reconnects_after_loss() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stream"))
            .respond_with(sse_response("data: {\"type\":\"user_count\",\"count\":1}\n\n"))
            .mount(&server)
            .await;

        let mut handle = connect(&test_config(&server), "Test Device");

        // First connection runs to end-of-body, then the loop retries.
        assert_eq!(handle.updates.recv().await, Some(StreamUpdate::Connecting));
        assert_eq!(handle.updates.recv().await, Some(StreamUpdate::Opened));
        assert!(matches!(handle.updates.recv().await, Some(StreamUpdate::Event(_))));
        assert_eq!(handle.updates.recv().await, Some(StreamUpdate::Lost));
        assert_eq!(handle.updates.recv().await, Some(StreamUpdate::Connecting));
        assert_eq!(handle.updates.recv().await, Some(StreamUpdate::Opened));
    }

    #[tokio::test]
    async fn malformed_payload_is_dropped_without_losing_the_stream() {
        let server = MockServer::start().await;
        let body = concat!(
            "data: this is not json\n\n",
            "data: {\"type\":\"user_count\",\"count\":4}\n\n",
        );
        Mock::given(method("GET"))
            .and(path("/stream"))
            .respond_with(sse_response(body))
            .mount(&server)
            .await;

        let mut handle = connect(&test_config(&server), "Test Device");

        assert_eq!(handle.updates.recv().await, Some(StreamUpdate::Connecting));
        assert_eq!(handle.updates.recv().await, Some(StreamUpdate::Opened));
        // The bad payload is skipped; the next event still arrives on
        // the same connection (no Lost in between).
        assert_eq!(
            handle.updates.recv().await,
            Some(StreamUpdate::Event(SessionEvent::UserCount { count: 4 }))
        );
    }

    #[tokio::test]
    async fn connect_failure_emits_lost_then_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/stream"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut handle = connect(&test_config(&server), "Test Device");

        assert_eq!(handle.updates.recv().await, Some(StreamUpdate::Connecting));
        assert_eq!(handle.updates.recv().await, Some(StreamUpdate::Lost));
        assert_eq!(handle.updates.recv().await, Some(StreamUpdate::Connecting));
    }
}
