//! Queue-backed message bus with a single consumer.

use crate::a2a::error::BusError;
use crate::a2a::handler::{BoxedHandler, HandlerRegistry};
use crate::observability::EventTracker;
use parking_lot::Mutex;
use serde_json::json;
use st_protocol::{A2AMessage, BusConfig, EventKind, OverflowPolicy};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

/// Event source used for bus-level failures.
pub const A2A_PROTOCOL_SOURCE: &str = "A2AProtocol";

/// Cloneable sending half of a [`MessageBus`].
///
/// Handlers hold an `Outbox` to send replies without keeping the bus alive.
#[derive(Clone)]
pub struct Outbox {
    sender: mpsc::Sender<A2AMessage>,
    tracker: Arc<EventTracker>,
    queued: Arc<AtomicUsize>,
    capacity: usize,
    overflow: OverflowPolicy,
    stopped: watch::Receiver<bool>,
}

impl Outbox {
    /// Enqueue a message without waiting for delivery.
    ///
    /// Under [`OverflowPolicy::Block`] this waits for queue space, giving up
    /// with [`BusError::Closed`] once the bus is stopped. Handlers reply from
    /// inside the consumer, so nothing else would free the space. Under
    /// [`OverflowPolicy::DropNewest`] a full queue rejects the message.
    pub async fn send(&self, message: A2AMessage) -> Result<(), BusError> {
        let permit = match self.overflow {
            OverflowPolicy::Block => {
                let mut stopped = self.stopped.clone();
                tokio::select! {
                    biased;
                    permit = self.sender.reserve() => permit.map_err(|_| BusError::Closed)?,
                    _ = async { stopped.wait_for(|stopped| *stopped).await.map(|_| ()) } => {
                        tracing::debug!(
                            to_agent = %message.to_agent,
                            message_type = %message.message_type,
                            "bus stopped while waiting for queue space"
                        );
                        return Err(BusError::Closed);
                    }
                }
            }
            OverflowPolicy::DropNewest => match self.sender.try_reserve() {
                Ok(permit) => permit,
                Err(TrySendError::Full(())) => {
                    self.tracker.log_event(
                        EventKind::Error,
                        message.from_agent.as_str(),
                        json!({
                            "action": "message_dropped",
                            "to_agent": message.to_agent,
                            "message_type": message.message_type,
                            "message_id": message.message_id.to_string(),
                        }),
                    );
                    return Err(BusError::QueueFull {
                        capacity: self.capacity,
                    });
                }
                Err(TrySendError::Closed(())) => return Err(BusError::Closed),
            },
        };

        self.queued.fetch_add(1, Ordering::SeqCst);
        self.tracker.log_event(
            EventKind::A2ACommunication,
            message.from_agent.as_str(),
            json!({
                "action": "message_sent",
                "to_agent": message.to_agent,
                "message_type": message.message_type,
                "message_id": message.message_id.to_string(),
            }),
        );
        permit.send(message);
        Ok(())
    }

    /// Messages enqueued but not yet dequeued.
    pub fn queued_len(&self) -> usize {
        self.queued.load(Ordering::SeqCst)
    }
}

/// In-process A2A message bus.
///
/// Strict FIFO with one consumer: handlers never run concurrently with each
/// other, and a slow handler delays every message behind it.
pub struct MessageBus {
    outbox: Outbox,
    receiver: Mutex<Option<mpsc::Receiver<A2AMessage>>>,
    handlers: HandlerRegistry,
    tracker: Arc<EventTracker>,
    stopped: watch::Sender<bool>,
    poll_interval: Duration,
}

impl MessageBus {
    pub fn new(tracker: Arc<EventTracker>, config: &BusConfig) -> Self {
        let capacity = config.queue_capacity.max(1);
        let (sender, receiver) = mpsc::channel(capacity);
        let (stopped, stop_signal) = watch::channel(false);
        Self {
            outbox: Outbox {
                sender,
                tracker: tracker.clone(),
                queued: Arc::new(AtomicUsize::new(0)),
                capacity,
                overflow: config.overflow,
                stopped: stop_signal,
            },
            receiver: Mutex::new(Some(receiver)),
            handlers: HandlerRegistry::new(),
            tracker,
            stopped,
            poll_interval: Duration::from_millis(config.poll_interval_ms.max(1)),
        }
    }

    /// Register the handler for `agent_name`, replacing any previous one.
    pub fn register_agent(&self, agent_name: impl Into<String>, handler: BoxedHandler) {
        let agent_name = agent_name.into();
        tracing::debug!(agent = %agent_name, "registered A2A handler");
        self.handlers.register(agent_name, handler);
    }

    pub fn registered_agents(&self) -> Vec<String> {
        self.handlers.names()
    }

    pub fn has_agent(&self, agent_name: &str) -> bool {
        self.handlers.contains(agent_name)
    }

    pub async fn send(&self, message: A2AMessage) -> Result<(), BusError> {
        self.outbox.send(message).await
    }

    pub fn outbox(&self) -> Outbox {
        self.outbox.clone()
    }

    pub fn queued_len(&self) -> usize {
        self.outbox.queued_len()
    }

    pub fn tracker(&self) -> &Arc<EventTracker> {
        &self.tracker
    }

    /// Spawn [`run`](Self::run) on the current runtime.
    pub fn start(self: &Arc<Self>) -> JoinHandle<Result<(), BusError>> {
        let bus = Arc::clone(self);
        tokio::spawn(async move { bus.run().await })
    }

    /// Ask the processing loop to exit.
    ///
    /// The loop notices within one poll interval. Messages still queued are
    /// discarded, not delivered. Calling `stop` before `run` makes `run`
    /// return immediately. Senders blocked on a full queue are released
    /// with [`BusError::Closed`].
    pub fn stop(&self) {
        self.stopped.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.stopped.borrow()
    }

    /// Process messages until [`stop`](Self::stop) is called.
    ///
    /// The loop can run once per bus; a second call returns
    /// [`BusError::AlreadyRunning`]. When the loop exits the queue is
    /// closed and further sends fail with [`BusError::Closed`].
    pub async fn run(&self) -> Result<(), BusError> {
        let mut receiver = self.receiver.lock().take().ok_or(BusError::AlreadyRunning)?;
        tracing::info!(poll_ms = self.poll_interval.as_millis() as u64, "A2A message processor started");

        let mut discarded = 0usize;
        while !self.is_stopped() {
            match tokio::time::timeout(self.poll_interval, receiver.recv()).await {
                Err(_) => continue,
                Ok(None) => break,
                Ok(Some(message)) => {
                    self.outbox.queued.fetch_sub(1, Ordering::SeqCst);
                    if self.is_stopped() {
                        discarded += 1;
                        break;
                    }
                    self.dispatch(message).await;
                }
            }
        }

        receiver.close();
        discarded += self.outbox.queued.swap(0, Ordering::SeqCst);
        tracing::info!(discarded, "A2A message processor stopped");
        Ok(())
    }

    /// Deliver one message to its recipient's handler and return it.
    ///
    /// `delivered` is set only when the handler succeeds. Failures and
    /// unknown recipients are logged as `ERROR` events, never returned.
    pub async fn dispatch(&self, mut message: A2AMessage) -> A2AMessage {
        let Some(handler) = self.handlers.get(&message.to_agent) else {
            self.tracker.log_event(
                EventKind::Error,
                A2A_PROTOCOL_SOURCE,
                json!({
                    "action": "agent_not_found",
                    "to_agent": message.to_agent,
                    "message_id": message.message_id.to_string(),
                }),
            );
            return message;
        };

        match handler.handle(&message).await {
            Ok(()) => {
                message.delivered = true;
                self.tracker.log_event(
                    EventKind::A2ACommunication,
                    message.to_agent.as_str(),
                    json!({
                        "action": "message_processed",
                        "from_agent": message.from_agent,
                        "message_type": message.message_type,
                        "message_id": message.message_id.to_string(),
                    }),
                );
            }
            Err(e) => {
                self.tracker.log_event(
                    EventKind::Error,
                    message.to_agent.as_str(),
                    json!({
                        "action": "message_processing_error",
                        "error": e.to_string(),
                        "message_id": message.message_id.to_string(),
                    }),
                );
            }
        }
        message
    }
}
