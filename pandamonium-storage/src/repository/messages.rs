//! Message operations
//!
//! Posting validates the content before anything is written. Editing
//! rewrites the content and flips the `modified` flag in the same UPDATE.

use uuid::Uuid;

use pandamonium_core::entities::{Entity, Message};
use pandamonium_core::PandaResult;

use crate::Store;

/// Persist a new message.
pub fn post(
    store: &dyn Store,
    content: &str,
    sender_uuid: Uuid,
    branch_uuid: Uuid,
    response_to: Option<Uuid>,
) -> PandaResult<Message> {
    let message = super::create(store, Message::new(content, sender_uuid, branch_uuid, response_to))?;
    tracing::debug!(
        uuid = %message.uuid(),
        branch = %branch_uuid,
        sender = %sender_uuid,
        "message posted"
    );
    Ok(message)
}

/// Fetch a message by UUID.
pub fn fetch(store: &dyn Store, uuid: Uuid) -> PandaResult<Option<Message>> {
    super::fetch_one(store, "uuid", uuid.into())
}

/// Every message posted in a branch. No ordering guarantee; callers sort by
/// `date_sent` when they need a timeline.
pub fn list_by_branch(store: &dyn Store, branch_uuid: Uuid) -> PandaResult<Vec<Message>> {
    super::list(store, "branch_uuid", branch_uuid.into())
}

/// Replace the content of a stored message and mark it modified.
pub fn edit(store: &dyn Store, message: &mut Message, new_content: &str) -> PandaResult<()> {
    message.edit(new_content)?;

    store.update(
        Message::SCHEMA,
        message.uuid(),
        &[
            ("content", new_content.into()),
            ("modified", true.into()),
        ],
    )
}

// =============================================================================
// TESTS
// =============================================================================
