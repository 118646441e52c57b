// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use database::DatabaseError;
use std::fmt;
use validator::{ValidationError, ValidationErrors};

/// Kind of document a lookup failed for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Event,
    User,
    Task,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Event => f.write_str("event"),
            Self::User => f.write_str("user"),
            Self::Task => f.write_str("task"),
        }
    }
}

/// Set-valued relation a membership check failed for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum List {
    Guests,
    Tasks,
    Friends,
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Guests => f.write_str("guest list"),
            Self::Tasks => f.write_str("task list"),
            Self::Friends => f.write_str("friend list"),
        }
    }
}

/// Set-valued relation a user can join
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joinable {
    Guests,
    Friends,
}

impl fmt::Display for Joinable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Guests => f.write_str("guest list"),
            Self::Friends => f.write_str("friend list"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denied {
    /// The caller lacks the required role on the event
    NotPermitted,
    RemoveAdmin,
    BefriendSelf,
}

impl fmt::Display for Denied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPermitted => f.write_str("not permitted to access the event"),
            Self::RemoveAdmin => f.write_str("the admin cannot be removed from the event"),
            Self::BefriendSelf => f.write_str("users cannot befriend themselves"),
        }
    }
}

/// Failure of an authorization check or membership operation
#[derive(Debug, thiserror::Error)]
pub enum MembershipError {
    #[error("the requested {0} does not exist")]
    NotFound(Resource),
    #[error("forbidden, {0}")]
    Forbidden(Denied),
    #[error("already part of the {0}")]
    AlreadyMember(Joinable),
    #[error("not part of the {0}")]
    NotInList(List),
    #[error("invalid input")]
    InvalidInput(#[source] ValidationErrors),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl MembershipError {
    /// Invalid input with a single failed field
    pub(crate) fn invalid_field(field: &'static str, code: &'static str) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, ValidationError::new(code));

        Self::InvalidInput(errors)
    }
}

impl From<ValidationErrors> for MembershipError {
    fn from(errors: ValidationErrors) -> Self {
        Self::InvalidInput(errors)
    }
}
