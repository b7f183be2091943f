//! Realtime glue
//!
//! Persist-then-broadcast: a message is written through the repository
//! first, and the event goes out only for rows that actually exist.

use uuid::Uuid;

use pandamonium_core::entities::{Branch, Entity, Message, User};
use pandamonium_core::PandaResult;
use pandamonium_events::{Event, EventBus, MessagePayload};
use pandamonium_storage::repository::messages;
use pandamonium_storage::Store;

/// Announce a successful login to connected clients.
pub fn announce_login(bus: &EventBus, user: &User) -> usize {
    bus.publish(Event::UserLogged {
        username: user.username().unwrap_or_default().to_string(),
    })
}

/// Post a message in a branch and broadcast it.
pub fn post_message(
    store: &dyn Store,
    bus: &EventBus,
    content: &str,
    sender: &User,
    branch: &Branch,
    response_to: Option<Uuid>,
) -> PandaResult<Message> {
    let message = messages::post(store, content, sender.uuid(), branch.uuid(), response_to)?;
    bus.publish(Event::UserMessage(MessagePayload::from(&message)));
    Ok(message)
}

// =============================================================================
// TESTS
// =============================================================================
