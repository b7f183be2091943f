//! PANDAMONIUM Events - Realtime Fan-out
//!
//! Event types broadcast to connected clients, and the in-process bus that
//! carries them. The bus makes no ordering or delivery guarantee: slow
//! subscribers can lose events, and publishing with nobody listening is
//! not an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use pandamonium_core::entities::{Entity, Message};

/// Payload of a `user_message` event: the posted message, flattened for
/// clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagePayload {
    pub uuid: Uuid,
    pub branch_uuid: Option<Uuid>,
    pub sender_uuid: Option<Uuid>,
    pub content: String,
    pub date_sent: Option<DateTime<Utc>>,
    pub response_to_message_uuid: Option<Uuid>,
}

impl From<&Message> for MessagePayload {
    fn from(message: &Message) -> Self {
        Self {
            uuid: message.uuid(),
            branch_uuid: message.branch_uuid(),
            sender_uuid: message.sender_uuid(),
            content: message.content().unwrap_or_default().to_string(),
            date_sent: message.date_sent(),
            response_to_message_uuid: message.response_to(),
        }
    }
}

/// Events broadcast to connected clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A user signed in.
    UserLogged { username: String },

    /// A message was posted in a branch.
    UserMessage(MessagePayload),
}

impl Event {
    /// Event name as seen on the wire, for logging.
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::UserLogged { .. } => "user_logged",
            Event::UserMessage(_) => "user_message",
        }
    }
}

/// In-process broadcast bus.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    /// Bus holding at most `capacity` in-flight events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Publish an event to every current subscriber. Returns how many
    /// subscribers received it; zero subscribers is not an error.
    pub fn publish(&self, event: Event) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

// =============================================================================
// TESTS
// =============================================================================
