//! # Relay Service
//!
//! Single entry point for message storage and dispatch. Inbound messages
//! are enqueued by `store` and drained by one worker task, which gates
//! every message through the authorization adapter before handing it to
//! the bus. The single queue plus the single broadcast channel preserve
//! FIFO ordering per sender/subject pair.

use relay_auth::RoleBasedAdapter;
use relay_bus::{InMemoryMessageBus, MessageSender};
use shared_types::{Command, Message, AUTHORIZATION_SERVICE_SUBJECT, LOGIN_CLIENT_SUBJECT};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// Façade combining bus access and the message dispatch entry point.
pub trait MessageService: Send + Sync {
    /// Enqueue a message for routing. Non-blocking; delivery happens on
    /// the dispatch worker.
    fn store(&self, message: Message);

    /// Shared bus instance, for subscribers.
    fn bus(&self) -> Arc<InMemoryMessageBus>;
}

/// The Relay message service.
///
/// Owns the bus, the authorization adapter, and the dispatch queue. The
/// worker task started at construction runs until `shutdown` is called or
/// the service is dropped.
pub struct RelayService {
    bus: Arc<InMemoryMessageBus>,
    adapter: Arc<RoleBasedAdapter>,
    queue: mpsc::UnboundedSender<Message>,
    shutdown_tx: watch::Sender<bool>,
}

impl RelayService {
    /// Create the service and start its dispatch worker.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(bus: Arc<InMemoryMessageBus>, adapter: Arc<RoleBasedAdapter>) -> Self {
        let (queue, queue_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let worker = DispatchWorker {
            bus: Arc::clone(&bus),
            adapter: Arc::clone(&adapter),
        };
        tokio::spawn(worker.run(queue_rx, shutdown_rx));

        Self {
            bus,
            adapter,
            queue,
            shutdown_tx,
        }
    }

    /// The authorization adapter, for configuration (security rules) and
    /// direct lifecycle queries.
    #[must_use]
    pub fn adapter(&self) -> Arc<RoleBasedAdapter> {
        Arc::clone(&self.adapter)
    }

    /// Stop the dispatch worker. Messages stored afterwards are dropped.
    pub fn shutdown(&self) {
        if self.shutdown_tx.send(true).is_err() {
            debug!("Dispatch worker already stopped");
        }
    }
}

impl MessageService for RelayService {
    fn store(&self, message: Message) {
        if self.queue.send(message).is_err() {
            warn!("Dispatch queue closed; message dropped");
        }
    }

    fn bus(&self) -> Arc<InMemoryMessageBus> {
        Arc::clone(&self.bus)
    }
}

/// The single dispatch worker draining the service queue.
struct DispatchWorker {
    bus: Arc<InMemoryMessageBus>,
    adapter: Arc<RoleBasedAdapter>,
}

impl DispatchWorker {
    async fn run(
        self,
        mut queue: mpsc::UnboundedReceiver<Message>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        info!("Dispatch worker started");
        loop {
            tokio::select! {
                maybe = queue.recv() => {
                    match maybe {
                        Some(message) => self.dispatch(message).await,
                        None => break,
                    }
                }
                _ = shutdown.changed() => {
                    info!("Dispatch worker shutting down");
                    break;
                }
            }
        }
    }

    /// Route one inbound message through the authorization gate.
    async fn dispatch(&self, message: Message) {
        // The authorization service subject is consumed here, never
        // delivered to subscribers.
        if message.subject() == AUTHORIZATION_SERVICE_SUBJECT {
            self.handle_authorization(message).await;
            return;
        }

        if self.adapter.requires_authorization(&message)
            && !self.adapter.is_authenticated(&message)
        {
            warn!(
                subject = message.subject(),
                "Rejected message from unauthenticated session"
            );
            let denial = Message::conversation(LOGIN_CLIENT_SUBJECT, Command::FailedAuth, &message);
            self.bus.send(denial).await;
            return;
        }

        self.adapter.process(&message);
        self.bus.send(message).await;
    }

    async fn handle_authorization(&self, message: Message) {
        match message.command() {
            Some(Command::AuthRequest) => {
                // The adapter already emitted the failure reply; the error
                // only needs logging here.
                if let Err(err) = self.adapter.challenge(&message).await {
                    warn!(error = %err, "Challenge failed");
                }
            }
            Some(Command::EndSession) => {
                let ended = self.adapter.end_session(&message);
                debug!(ended, "End-session request processed");
            }
            other => {
                warn!(command = ?other, "Unsupported authorization command");
            }
        }
    }
}
