// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Storage abstraction over the users, events and tasks collections
//!
//! A [`Store`] hands out documents: a row together with the ids of its set-valued relations.
//! Relations are never changed through the documents themselves, but through batches of
//! [`Mutation`]s passed to [`Store::apply`]. A batch is applied completely or not at all.
use crate::events::{Event, EventId, NewEvent, UpdateEvent};
use crate::tasks::{NewTask, Task, TaskId, UpdateTask};
use crate::users::{NewUser, User, UserId};
use database::Result;

mod memory;
mod postgres;

pub use memory::MemoryStore;

/// A user together with the events they joined as a guest and their friends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDocument {
    pub user: User,
    pub events: Vec<EventId>,
    pub friends: Vec<UserId>,
}

/// An event together with its guest list and its tasks
///
/// The admin is not part of `guests` unless added explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDocument {
    pub event: Event,
    pub guests: Vec<UserId>,
    pub tasks: Vec<TaskId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDocument {
    pub task: Task,
    pub assignees: Vec<UserId>,
}

/// A single change of a set-valued relation
///
/// Every variant keeps both sides of the relation it touches in sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// Add the user to the guests of the event and the event to the events of the user
    AddGuest { event_id: EventId, user_id: UserId },
    /// Inverse of [`Mutation::AddGuest`]
    RemoveGuest { event_id: EventId, user_id: UserId },
    /// Remove the user from the assignees of every task of the event
    UnassignFromEventTasks { event_id: EventId, user_id: UserId },
    AddFriend { user_id: UserId, friend_id: UserId },
    RemoveFriend { user_id: UserId, friend_id: UserId },
    /// Remove the task from the event and delete the task
    RemoveTask { event_id: EventId, task_id: TaskId },
    /// Delete the event and every guest membership of it, its tasks are kept
    DeleteEvent { event_id: EventId },
}

/// Access to the persisted collections
///
/// All methods block, callers in async contexts have to move them onto a blocking thread.
/// Lookups of single documents return `Ok(None)` when the document does not exist.
pub trait Store: Send + Sync + 'static {
    fn insert_user(&self, new_user: NewUser) -> Result<UserDocument>;

    fn get_user(&self, user_id: UserId) -> Result<Option<UserDocument>>;

    fn get_user_by_handle(&self, handle: &str) -> Result<Option<UserDocument>>;

    /// Get the users with the given ids in the order of `user_ids`, unknown ids are skipped
    fn get_users(&self, user_ids: &[UserId]) -> Result<Vec<User>>;

    fn insert_event(&self, new_event: NewEvent) -> Result<EventDocument>;

    fn get_event(&self, event_id: EventId) -> Result<Option<EventDocument>>;

    /// Get all events the user administrates or is a guest of, newest first
    fn get_events_for_user(&self, user_id: UserId) -> Result<Vec<EventDocument>>;

    fn update_event(
        &self,
        event_id: EventId,
        changeset: UpdateEvent,
    ) -> Result<Option<EventDocument>>;

    /// Insert the task and register it on its event in one step
    fn insert_task(&self, new_task: NewTask, assignees: &[UserId]) -> Result<TaskDocument>;

    fn get_task(&self, task_id: TaskId) -> Result<Option<TaskDocument>>;

    /// Get the tasks with the given ids in the order of `task_ids`, unknown ids are skipped
    fn get_tasks(&self, task_ids: &[TaskId]) -> Result<Vec<TaskDocument>>;

    /// Update the task fields and, if given, replace its assignees
    fn update_task(
        &self,
        task_id: TaskId,
        changeset: UpdateTask,
        assignees: Option<&[UserId]>,
    ) -> Result<Option<TaskDocument>>;

    /// Apply all mutations atomically
    fn apply(&self, mutations: &[Mutation]) -> Result<()>;
}

/// Sort `items` by the position of their key in `order`, dropping items whose key is missing
fn order_by_ids<T, K, F>(items: Vec<T>, order: &[K], key: F) -> Vec<T>
where
    K: Eq + std::hash::Hash + Copy,
    F: Fn(&T) -> K,
{
    let mut by_id: std::collections::HashMap<K, T> =
        items.into_iter().map(|item| (key(&item), item)).collect();

    order.iter().filter_map(|id| by_id.remove(id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_follows_requested_ids() {
        let items = vec![(1, "a"), (2, "b"), (3, "c")];

        let ordered = order_by_ids(items, &[3, 4, 1], |item| item.0);

        assert_eq!(ordered, vec![(3, "c"), (1, "a")]);
    }
}
