// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Contains the event specific database structs and queries
use crate::schema::{event_guests, events, tasks};
use crate::users::UserId;
use chrono::{DateTime, Utc};
use database::{DbConnection, Result};
use diesel::prelude::*;
use types::core::TaskId;

pub use types::core::EventId;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable)]
#[diesel(table_name = events)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub address: String,
    pub date: String,
    pub admin: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    #[tracing::instrument(err, skip_all, fields(%event_id))]
    pub fn get(conn: &mut DbConnection, event_id: EventId) -> Result<Event> {
        let event = events::table
            .filter(events::id.eq(event_id))
            .get_result(conn)?;

        Ok(event)
    }

    /// Get every event the user administrates or is a guest of, newest first
    #[tracing::instrument(err, skip_all, fields(%user_id))]
    pub fn get_all_for_user(conn: &mut DbConnection, user_id: UserId) -> Result<Vec<Event>> {
        let guest_of = event_guests::table
            .select(event_guests::event_id)
            .filter(event_guests::user_id.eq(user_id));

        let events = events::table
            .filter(events::admin.eq(user_id).or(events::id.eq_any(guest_of)))
            .order_by(events::created_at.desc())
            .load(conn)?;

        Ok(events)
    }

    /// Guest ids of the event in the order they were added
    #[tracing::instrument(err, skip_all, fields(%event_id))]
    pub fn get_guest_ids(conn: &mut DbConnection, event_id: EventId) -> Result<Vec<UserId>> {
        let guest_ids = event_guests::table
            .filter(event_guests::event_id.eq(event_id))
            .order_by(event_guests::joined_at.asc())
            .select(event_guests::user_id)
            .load(conn)?;

        Ok(guest_ids)
    }

    /// Task ids of the event in the order they were created
    #[tracing::instrument(err, skip_all, fields(%event_id))]
    pub fn get_task_ids(conn: &mut DbConnection, event_id: EventId) -> Result<Vec<TaskId>> {
        let task_ids = tasks::table
            .filter(tasks::event_id.eq(event_id))
            .order_by(tasks::created_at.asc())
            .select(tasks::id)
            .load(conn)?;

        Ok(task_ids)
    }

    /// Delete the event, its guest rows are removed by the database
    ///
    /// Returns false if the event did not exist.
    #[tracing::instrument(err, skip_all, fields(%event_id))]
    pub fn delete_by_id(conn: &mut DbConnection, event_id: EventId) -> Result<bool> {
        let deleted = diesel::delete(events::table.filter(events::id.eq(event_id))).execute(conn)?;

        Ok(deleted > 0)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = events)]
pub struct NewEvent {
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub address: String,
    pub date: String,
    pub admin: UserId,
}

impl NewEvent {
    #[tracing::instrument(err, skip_all)]
    pub fn insert(self, conn: &mut DbConnection) -> Result<Event> {
        let event = diesel::insert_into(events::table)
            .values((events::id.eq(EventId::generate()), self))
            .get_result(conn)?;

        Ok(event)
    }
}

/// Changeset for the editable event fields, `None` leaves a field untouched
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = events)]
pub struct UpdateEvent {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub address: Option<String>,
    pub date: Option<String>,
}

impl UpdateEvent {
    #[tracing::instrument(err, skip_all, fields(%event_id))]
    pub fn apply(self, conn: &mut DbConnection, event_id: EventId) -> Result<Event> {
        let event = diesel::update(events::table.filter(events::id.eq(event_id)))
            .set((self, events::updated_at.eq(Utc::now())))
            .get_result(conn)?;

        Ok(event)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = event_guests)]
pub struct NewEventGuest {
    pub event_id: EventId,
    pub user_id: UserId,
}

impl NewEventGuest {
    /// Add the user to the guest list, returns false if they already were on it
    #[tracing::instrument(err, skip_all)]
    pub fn try_insert(self, conn: &mut DbConnection) -> Result<bool> {
        let inserted = diesel::insert_into(event_guests::table)
            .values(self)
            .on_conflict_do_nothing()
            .execute(conn)?;

        Ok(inserted > 0)
    }
}

/// Remove the user from the guest list, returns false if they were not on it
#[tracing::instrument(err, skip_all)]
pub fn delete_guest(conn: &mut DbConnection, event_id: EventId, user_id: UserId) -> Result<bool> {
    let deleted = diesel::delete(
        event_guests::table
            .filter(event_guests::event_id.eq(event_id))
            .filter(event_guests::user_id.eq(user_id)),
    )
    .execute(conn)?;

    Ok(deleted > 0)
}
