//! # Message Sender
//!
//! Defines the sending side of the bus.

use crate::filter::SubjectFilter;
use crate::subscriber::{MessageStream, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use shared_types::Message;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Trait for sending messages onto the bus.
///
/// Callers construct a well-formed envelope (the destination subject is
/// part of the message) and hand it off; delivery is fire-and-forget.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send a message to its subject's subscribers.
    ///
    /// # Returns
    ///
    /// The number of active subscribers that received the message.
    async fn send(&self, message: Message) -> usize;

    /// Get the total number of messages sent.
    fn messages_sent(&self) -> u64;
}

/// In-memory implementation of the message bus.
///
/// Uses `tokio::sync::broadcast` for multi-producer, multi-consumer
/// semantics. Suitable for single-process operation; distributed
/// deployments would use a different implementation.
pub struct InMemoryMessageBus {
    /// Broadcast sender for messages.
    sender: broadcast::Sender<Message>,

    /// Active subscription count by subject key.
    subscriptions: Arc<RwLock<HashMap<String, usize>>>,

    /// Total messages sent.
    messages_sent: AtomicU64,

    /// Channel capacity.
    capacity: usize,
}

impl InMemoryMessageBus {
    /// Create a new in-memory bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new in-memory bus with specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            subscriptions: Arc::new(RwLock::new(HashMap::new())),
            messages_sent: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to messages matching a filter.
    ///
    /// Returns a `Subscription` handle that can be used to receive messages.
    #[must_use]
    pub fn subscribe(&self, filter: SubjectFilter) -> Subscription {
        let receiver = self.sender.subscribe();
        let subject_key = format!("{:?}", filter.subjects);

        // Track subscription
        {
            if let Ok(mut subs) = self.subscriptions.write() {
                *subs.entry(subject_key.clone()).or_insert(0) += 1;
            }
        }

        debug!(subjects = ?filter.subjects, "New subscription created");

        Subscription::new(receiver, filter, self.subscriptions.clone(), subject_key)
    }

    /// Get a stream of messages matching a filter.
    ///
    /// This is a convenience method that returns a `MessageStream`.
    #[must_use]
    pub fn message_stream(&self, filter: SubjectFilter) -> MessageStream {
        MessageStream::new(self.subscribe(filter))
    }

    /// Get the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get the channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryMessageBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageSender for InMemoryMessageBus {
    async fn send(&self, message: Message) -> usize {
        let subject = message.subject().to_owned();

        // Always increment counter (delivery was attempted)
        self.messages_sent.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(message) {
            Ok(receiver_count) => {
                debug!(
                    subject = %subject,
                    receivers = receiver_count,
                    "Message sent"
                );
                receiver_count
            }
            Err(e) => {
                // No receivers - message is dropped
                warn!(
                    subject = %subject,
                    error = %e,
                    "Message dropped (no receivers)"
                );
                0
            }
        }
    }

    fn messages_sent(&self) -> u64 {
        self.messages_sent.load(Ordering::Relaxed)
    }
}
