// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use super::{EventDocument, Mutation, Store, TaskDocument, UserDocument};
use crate::events::{Event, EventId, NewEvent, UpdateEvent};
use crate::tasks::{NewTask, Task, TaskId, UpdateTask};
use crate::users::{NewUser, User, UserId};
use chrono::Utc;
use database::{DatabaseError, Result};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
struct State {
    users: HashMap<UserId, UserDocument>,
    events: HashMap<EventId, EventDocument>,
    /// Event ids in creation order
    event_order: Vec<EventId>,
    tasks: HashMap<TaskId, TaskDocument>,
}

fn insert_unique<T: PartialEq>(set: &mut Vec<T>, value: T) {
    if !set.contains(&value) {
        set.push(value);
    }
}

fn remove_value<T: PartialEq>(set: &mut Vec<T>, value: &T) {
    set.retain(|v| v != value);
}

impl State {
    fn user_mut(&mut self, user_id: UserId) -> Result<&mut UserDocument> {
        self.users.get_mut(&user_id).ok_or(DatabaseError::NotFound)
    }

    fn event_mut(&mut self, event_id: EventId) -> Result<&mut EventDocument> {
        self.events.get_mut(&event_id).ok_or(DatabaseError::NotFound)
    }

    /// Verify that every mutation of the batch finds the documents it touches
    ///
    /// Users are never removed by a mutation, events only by [`Mutation::DeleteEvent`], so
    /// tracking the deleted events is enough to replay the batch without touching the state.
    fn check(&self, mutations: &[Mutation]) -> Result<()> {
        let mut deleted = HashSet::new();

        let event_exists = |deleted: &HashSet<EventId>, event_id: EventId| {
            if self.events.contains_key(&event_id) && !deleted.contains(&event_id) {
                Ok(())
            } else {
                Err(DatabaseError::NotFound)
            }
        };
        let user_exists = |user_id: UserId| {
            if self.users.contains_key(&user_id) {
                Ok(())
            } else {
                Err(DatabaseError::NotFound)
            }
        };

        for mutation in mutations {
            match *mutation {
                Mutation::AddGuest { event_id, user_id } => {
                    event_exists(&deleted, event_id)?;
                    user_exists(user_id)?;
                }
                Mutation::RemoveGuest { event_id, .. }
                | Mutation::UnassignFromEventTasks { event_id, .. }
                | Mutation::RemoveTask { event_id, .. } => event_exists(&deleted, event_id)?,
                Mutation::AddFriend { user_id, friend_id } => {
                    user_exists(user_id)?;
                    user_exists(friend_id)?;
                }
                Mutation::RemoveFriend { user_id, .. } => user_exists(user_id)?,
                Mutation::DeleteEvent { event_id } => {
                    event_exists(&deleted, event_id)?;
                    let _ = deleted.insert(event_id);
                }
            }
        }

        Ok(())
    }

    /// Apply a single mutation, the batch must have passed [`State::check`] before
    fn apply(&mut self, mutation: &Mutation) -> Result<()> {
        match *mutation {
            Mutation::AddGuest { event_id, user_id } => {
                insert_unique(&mut self.event_mut(event_id)?.guests, user_id);
                insert_unique(&mut self.user_mut(user_id)?.events, event_id);
            }
            Mutation::RemoveGuest { event_id, user_id } => {
                remove_value(&mut self.event_mut(event_id)?.guests, &user_id);

                if let Some(user) = self.users.get_mut(&user_id) {
                    remove_value(&mut user.events, &event_id);
                }
            }
            Mutation::UnassignFromEventTasks { event_id, user_id } => {
                let Self { events, tasks, .. } = self;
                let event = events.get(&event_id).ok_or(DatabaseError::NotFound)?;

                for task_id in &event.tasks {
                    if let Some(task) = tasks.get_mut(task_id) {
                        remove_value(&mut task.assignees, &user_id);
                    }
                }
            }
            Mutation::AddFriend { user_id, friend_id } => {
                insert_unique(&mut self.user_mut(user_id)?.friends, friend_id);
            }
            Mutation::RemoveFriend { user_id, friend_id } => {
                remove_value(&mut self.user_mut(user_id)?.friends, &friend_id);
            }
            Mutation::RemoveTask { event_id, task_id } => {
                remove_value(&mut self.event_mut(event_id)?.tasks, &task_id);
                let _ = self.tasks.remove(&task_id);
            }
            Mutation::DeleteEvent { event_id } => {
                let event = self.events.remove(&event_id).ok_or(DatabaseError::NotFound)?;
                remove_value(&mut self.event_order, &event_id);

                for guest in event.guests {
                    if let Some(user) = self.users.get_mut(&guest) {
                        remove_value(&mut user.events, &event_id);
                    }
                }
            }
        }

        Ok(())
    }
}

/// A [`Store`] keeping all documents in memory
///
/// Used by tests and for local development without a database. Both sides of every relation
/// are stored. A batch of mutations is checked against the current state first and only applied
/// under the same write lock once every mutation is known to succeed.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn insert_user(&self, new_user: NewUser) -> Result<UserDocument> {
        let mut state = self.state.write();

        if state.users.values().any(|doc| doc.user.handle == new_user.handle) {
            return Err(DatabaseError::Custom(format!(
                "handle {} is already taken",
                new_user.handle
            )));
        }

        let user = User {
            id: UserId::generate(),
            handle: new_user.handle,
            firstname: new_user.firstname,
            lastname: new_user.lastname,
            email: new_user.email,
            created_at: Utc::now(),
        };

        let document = UserDocument {
            user,
            events: vec![],
            friends: vec![],
        };

        let _ = state.users.insert(document.user.id, document.clone());

        Ok(document)
    }

    fn get_user(&self, user_id: UserId) -> Result<Option<UserDocument>> {
        Ok(self.state.read().users.get(&user_id).cloned())
    }

    fn get_user_by_handle(&self, handle: &str) -> Result<Option<UserDocument>> {
        Ok(self
            .state
            .read()
            .users
            .values()
            .find(|doc| doc.user.handle == handle)
            .cloned())
    }

    fn get_users(&self, user_ids: &[UserId]) -> Result<Vec<User>> {
        let state = self.state.read();

        Ok(user_ids
            .iter()
            .filter_map(|id| state.users.get(id))
            .map(|doc| doc.user.clone())
            .collect())
    }

    fn insert_event(&self, new_event: NewEvent) -> Result<EventDocument> {
        let mut state = self.state.write();

        let now = Utc::now();

        let event = Event {
            id: EventId::generate(),
            name: new_event.name,
            description: new_event.description,
            tags: new_event.tags,
            address: new_event.address,
            date: new_event.date,
            admin: new_event.admin,
            created_at: now,
            updated_at: now,
        };

        let document = EventDocument {
            event,
            guests: vec![],
            tasks: vec![],
        };

        state.event_order.push(document.event.id);
        let _ = state.events.insert(document.event.id, document.clone());

        Ok(document)
    }

    fn get_event(&self, event_id: EventId) -> Result<Option<EventDocument>> {
        Ok(self.state.read().events.get(&event_id).cloned())
    }

    fn get_events_for_user(&self, user_id: UserId) -> Result<Vec<EventDocument>> {
        let state = self.state.read();

        Ok(state
            .event_order
            .iter()
            .rev()
            .filter_map(|id| state.events.get(id))
            .filter(|doc| doc.event.admin == user_id || doc.guests.contains(&user_id))
            .cloned()
            .collect())
    }

    fn update_event(
        &self,
        event_id: EventId,
        changeset: UpdateEvent,
    ) -> Result<Option<EventDocument>> {
        let mut state = self.state.write();

        let document = match state.events.get_mut(&event_id) {
            Some(document) => document,
            None => return Ok(None),
        };

        let event = &mut document.event;
        if let Some(name) = changeset.name {
            event.name = name;
        }
        if let Some(description) = changeset.description {
            event.description = description;
        }
        if let Some(tags) = changeset.tags {
            event.tags = tags;
        }
        if let Some(address) = changeset.address {
            event.address = address;
        }
        if let Some(date) = changeset.date {
            event.date = date;
        }
        event.updated_at = Utc::now();

        Ok(Some(document.clone()))
    }

    fn insert_task(&self, new_task: NewTask, assignees: &[UserId]) -> Result<TaskDocument> {
        let mut state = self.state.write();

        let task = Task {
            id: TaskId::generate(),
            event_id: new_task.event_id,
            name: new_task.name,
            description: new_task.description,
            done: new_task.done,
            created_at: Utc::now(),
        };

        let mut document = TaskDocument {
            task,
            assignees: vec![],
        };
        for &assignee in assignees {
            insert_unique(&mut document.assignees, assignee);
        }

        state
            .event_mut(document.task.event_id)?
            .tasks
            .push(document.task.id);
        let _ = state.tasks.insert(document.task.id, document.clone());

        Ok(document)
    }

    fn get_task(&self, task_id: TaskId) -> Result<Option<TaskDocument>> {
        Ok(self.state.read().tasks.get(&task_id).cloned())
    }

    fn get_tasks(&self, task_ids: &[TaskId]) -> Result<Vec<TaskDocument>> {
        let state = self.state.read();

        Ok(task_ids
            .iter()
            .filter_map(|id| state.tasks.get(id))
            .cloned()
            .collect())
    }

    fn update_task(
        &self,
        task_id: TaskId,
        changeset: UpdateTask,
        assignees: Option<&[UserId]>,
    ) -> Result<Option<TaskDocument>> {
        let mut state = self.state.write();

        let document = match state.tasks.get_mut(&task_id) {
            Some(document) => document,
            None => return Ok(None),
        };

        if let Some(name) = changeset.name {
            document.task.name = name;
        }
        if let Some(description) = changeset.description {
            document.task.description = description;
        }
        if let Some(done) = changeset.done {
            document.task.done = done;
        }
        if let Some(assignees) = assignees {
            document.assignees.clear();
            for &assignee in assignees {
                insert_unique(&mut document.assignees, assignee);
            }
        }

        Ok(Some(document.clone()))
    }

    fn apply(&self, mutations: &[Mutation]) -> Result<()> {
        let mut state = self.state.write();

        state.check(mutations)?;

        for mutation in mutations {
            log::trace!("applying {:?}", mutation);
            state.apply(mutation)?;
        }

        Ok(())
    }
}
