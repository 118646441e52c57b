// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

#![allow(clippy::extra_unused_lifetimes)]

//! Contains the database ORM, the database migrations and the [`Store`](store::Store)
//! abstraction used by the controller.
//! Builds upon primal-party-database
//!
//! The three collections (users, events, tasks) are exposed as documents which carry their
//! set-valued relations (guests, tasks, assignees, friends). Set mutations are submitted as
//! batches of [`Mutation`](store::Mutation)s and are applied atomically by every store
//! implementation.

mod schema;

pub mod events;
pub mod migrations;
pub mod store;
pub mod tasks;
pub mod users;
