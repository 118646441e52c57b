// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! This module contains the identifier types of the three collections.
//!
//! All core types are simple newtypes and are used by the storage layer as
//! well as the web API.

mod event_id;
mod task_id;
mod user_id;

pub use event_id::EventId;
pub use task_id::TaskId;
pub use user_id::UserId;
