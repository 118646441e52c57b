// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use super::users::PublicUserProfile;
use database::Result;
use db_storage::store::Store;
use db_storage::users::UserId;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use validator::ValidationError;

/// Utility to fetch user profiles batched
#[derive(Default)]
pub struct GetUserProfilesBatched {
    users: Vec<UserId>,
}

impl GetUserProfilesBatched {
    pub fn new() -> Self {
        Self { users: vec![] }
    }

    pub fn add<'a>(&mut self, user_ids: impl IntoIterator<Item = &'a UserId>) -> &mut Self {
        self.users.extend(user_ids);
        self
    }

    pub fn fetch(&mut self, store: &dyn Store) -> Result<UserProfilesBatch> {
        if self.users.is_empty() {
            return Ok(UserProfilesBatch {
                users: HashMap::new(),
            });
        }

        self.users.sort_unstable();
        self.users.dedup();

        let users = store
            .get_users(&self.users)?
            .into_iter()
            .map(|user| (user.id, PublicUserProfile::from(user)))
            .collect();

        Ok(UserProfilesBatch { users })
    }
}

pub struct UserProfilesBatch {
    users: HashMap<UserId, PublicUserProfile>,
}

impl UserProfilesBatch {
    pub fn get(&self, id: UserId) -> Option<PublicUserProfile> {
        self.users.get(&id).cloned()
    }

    /// Profiles of `ids` in the given order, users that no longer exist are skipped
    pub fn get_all(&self, ids: &[UserId]) -> Vec<PublicUserProfile> {
        ids.iter().filter_map(|id| self.get(*id)).collect()
    }
}

/// Custom validator for names that must contain more than whitespace
pub(super) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("empty"));
    }

    Ok(())
}

/// Helper function to deserialize a field that is either a single value or a list of values
pub(super) fn one_or_many<'de, T, D>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        One(T),
        Many(Vec<T>),
    }

    Ok(match OneOrMany::<T>::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}

/// Like [`one_or_many`] but for optional fields, use with `#[serde(default)]`
pub(super) fn option_one_or_many<'de, T, D>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    one_or_many(deserializer).map(Some)
}
