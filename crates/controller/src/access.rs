// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Access rules for events
//!
//! An event is readable by its admin and its guests. The admin is not required to be part of the
//! guest list but is always treated as a guest.
use crate::membership::{Denied, MembershipError, Resource};
use db_storage::events::EventId;
use db_storage::store::{EventDocument, Store};
use db_storage::users::UserId;

/// Role a caller needs on an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Admin or guest
    Invited,
    Admin,
}

impl Requirement {
    pub fn is_met(self, user_id: UserId, event: &EventDocument) -> bool {
        match self {
            Self::Invited => is_invited(user_id, event),
            Self::Admin => is_admin(user_id, event),
        }
    }
}

pub fn is_invited(user_id: UserId, event: &EventDocument) -> bool {
    is_admin(user_id, event) || event.guests.contains(&user_id)
}

pub fn is_admin(user_id: UserId, event: &EventDocument) -> bool {
    event.event.admin == user_id
}

/// Load the event and check that the user meets the requirement
///
/// A missing event is always reported as not found, even to users who could not access it.
#[tracing::instrument(err, skip(store))]
pub fn authorize(
    store: &dyn Store,
    user_id: UserId,
    event_id: EventId,
    requirement: Requirement,
) -> Result<EventDocument, MembershipError> {
    let event = store
        .get_event(event_id)?
        .ok_or(MembershipError::NotFound(Resource::Event))?;

    if requirement.is_met(user_id, &event) {
        Ok(event)
    } else {
        Err(MembershipError::Forbidden(Denied::NotPermitted))
    }
}
