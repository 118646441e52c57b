// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Contains the user specific database structs and queries
use crate::schema::{event_guests, user_friends, users};
use chrono::{DateTime, Utc};
use database::{DbConnection, Result};
use diesel::prelude::*;
use types::core::EventId;

pub use types::core::UserId;

/// Diesel user struct
///
/// Is used as a result in various queries. Represents a user column
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable)]
#[diesel(table_name = users)]
pub struct User {
    pub id: UserId,
    pub handle: String,
    pub firstname: String,
    pub lastname: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    #[tracing::instrument(err, skip_all, fields(%user_id))]
    pub fn get(conn: &mut DbConnection, user_id: UserId) -> Result<User> {
        let user = users::table
            .filter(users::id.eq(user_id))
            .get_result(conn)?;

        Ok(user)
    }

    #[tracing::instrument(err, skip_all)]
    pub fn get_by_handle(conn: &mut DbConnection, handle: &str) -> Result<Option<User>> {
        let user = users::table
            .filter(users::handle.eq(handle))
            .get_result(conn)
            .optional()?;

        Ok(user)
    }

    /// Get all users with the given ids, unknown ids are skipped
    #[tracing::instrument(err, skip_all)]
    pub fn get_all_by_ids(conn: &mut DbConnection, ids: &[UserId]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let users = users::table.filter(users::id.eq_any(ids)).load(conn)?;

        Ok(users)
    }

    /// Ids of the events the user joined as a guest, in the order they were joined
    #[tracing::instrument(err, skip_all, fields(%user_id))]
    pub fn get_event_ids(conn: &mut DbConnection, user_id: UserId) -> Result<Vec<EventId>> {
        let event_ids = event_guests::table
            .filter(event_guests::user_id.eq(user_id))
            .order_by(event_guests::joined_at.asc())
            .select(event_guests::event_id)
            .load(conn)?;

        Ok(event_ids)
    }

    #[tracing::instrument(err, skip_all, fields(%user_id))]
    pub fn get_friend_ids(conn: &mut DbConnection, user_id: UserId) -> Result<Vec<UserId>> {
        let friend_ids = user_friends::table
            .filter(user_friends::user_id.eq(user_id))
            .order_by(user_friends::created_at.asc())
            .select(user_friends::friend_id)
            .load(conn)?;

        Ok(friend_ids)
    }
}

/// Diesel insertable user struct
///
/// Represents fields that have to be provided on user insertion.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub handle: String,
    pub firstname: String,
    pub lastname: String,
    pub email: Option<String>,
}

impl NewUser {
    #[tracing::instrument(err, skip_all)]
    pub fn insert(self, conn: &mut DbConnection) -> Result<User> {
        let user = diesel::insert_into(users::table)
            .values((users::id.eq(UserId::generate()), self))
            .get_result(conn)?;

        Ok(user)
    }
}

/// A directed friendship, `friend_id` is in the friend set of `user_id`
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_friends)]
pub struct NewUserFriend {
    pub user_id: UserId,
    pub friend_id: UserId,
}

impl NewUserFriend {
    /// Insert the friendship, returns false if it already existed
    #[tracing::instrument(err, skip_all)]
    pub fn try_insert(self, conn: &mut DbConnection) -> Result<bool> {
        let inserted = diesel::insert_into(user_friends::table)
            .values(self)
            .on_conflict_do_nothing()
            .execute(conn)?;

        Ok(inserted > 0)
    }
}

/// Remove `friend_id` from the friend set of `user_id`, returns false if it was not present
#[tracing::instrument(err, skip_all)]
pub fn delete_friend(conn: &mut DbConnection, user_id: UserId, friend_id: UserId) -> Result<bool> {
    let deleted = diesel::delete(
        user_friends::table
            .filter(user_friends::user_id.eq(user_id))
            .filter(user_friends::friend_id.eq(friend_id)),
    )
    .execute(conn)?;

    Ok(deleted > 0)
}
