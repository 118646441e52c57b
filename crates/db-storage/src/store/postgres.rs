// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use super::{order_by_ids, EventDocument, Mutation, Store, TaskDocument, UserDocument};
use crate::events::{self, Event, EventId, NewEvent, NewEventGuest, UpdateEvent};
use crate::tasks::{self, NewTask, Task, TaskId, UpdateTask};
use crate::users::{self, NewUser, NewUserFriend, User, UserId};
use database::{DatabaseError, Db, DbConnection, OptionalExt, Result};
use diesel::Connection;
use std::collections::HashMap;

fn user_document(conn: &mut DbConnection, user: User) -> Result<UserDocument> {
    let events = User::get_event_ids(conn, user.id)?;
    let friends = User::get_friend_ids(conn, user.id)?;

    Ok(UserDocument {
        user,
        events,
        friends,
    })
}

fn event_document(conn: &mut DbConnection, event: Event) -> Result<EventDocument> {
    let guests = Event::get_guest_ids(conn, event.id)?;
    let tasks = Event::get_task_ids(conn, event.id)?;

    Ok(EventDocument {
        event,
        guests,
        tasks,
    })
}

fn task_document(conn: &mut DbConnection, task: Task) -> Result<TaskDocument> {
    let assignees = Task::get_assignee_ids(conn, task.id)?;

    Ok(TaskDocument { task, assignees })
}

fn apply_mutation(conn: &mut DbConnection, mutation: &Mutation) -> Result<()> {
    log::trace!("applying {:?}", mutation);

    match *mutation {
        Mutation::AddGuest { event_id, user_id } => {
            let _ = NewEventGuest { event_id, user_id }.try_insert(conn)?;
        }
        Mutation::RemoveGuest { event_id, user_id } => {
            let _ = events::delete_guest(conn, event_id, user_id)?;
        }
        Mutation::UnassignFromEventTasks { event_id, user_id } => {
            let _ = tasks::unassign_from_event_tasks(conn, event_id, user_id)?;
        }
        Mutation::AddFriend { user_id, friend_id } => {
            let _ = NewUserFriend { user_id, friend_id }.try_insert(conn)?;
        }
        Mutation::RemoveFriend { user_id, friend_id } => {
            let _ = users::delete_friend(conn, user_id, friend_id)?;
        }
        Mutation::RemoveTask { task_id, .. } => {
            // the event side is derived from `tasks.event_id`
            let _ = Task::delete_by_id(conn, task_id)?;
        }
        Mutation::DeleteEvent { event_id } => {
            let _ = Event::delete_by_id(conn, event_id)?;
        }
    }

    Ok(())
}

impl Store for Db {
    #[tracing::instrument(err, skip_all)]
    fn insert_user(&self, new_user: NewUser) -> Result<UserDocument> {
        let mut conn = self.get_conn()?;

        let user = new_user.insert(&mut conn)?;

        Ok(UserDocument {
            user,
            events: vec![],
            friends: vec![],
        })
    }

    #[tracing::instrument(err, skip(self))]
    fn get_user(&self, user_id: UserId) -> Result<Option<UserDocument>> {
        let mut conn = self.get_conn()?;

        match User::get(&mut conn, user_id).optional()? {
            Some(user) => user_document(&mut conn, user).map(Some),
            None => Ok(None),
        }
    }

    #[tracing::instrument(err, skip(self))]
    fn get_user_by_handle(&self, handle: &str) -> Result<Option<UserDocument>> {
        let mut conn = self.get_conn()?;

        match User::get_by_handle(&mut conn, handle)? {
            Some(user) => user_document(&mut conn, user).map(Some),
            None => Ok(None),
        }
    }

    #[tracing::instrument(err, skip_all)]
    fn get_users(&self, user_ids: &[UserId]) -> Result<Vec<User>> {
        let mut conn = self.get_conn()?;

        let users = User::get_all_by_ids(&mut conn, user_ids)?;

        Ok(order_by_ids(users, user_ids, |user| user.id))
    }

    #[tracing::instrument(err, skip_all)]
    fn insert_event(&self, new_event: NewEvent) -> Result<EventDocument> {
        let mut conn = self.get_conn()?;

        let event = new_event.insert(&mut conn)?;

        Ok(EventDocument {
            event,
            guests: vec![],
            tasks: vec![],
        })
    }

    #[tracing::instrument(err, skip(self))]
    fn get_event(&self, event_id: EventId) -> Result<Option<EventDocument>> {
        let mut conn = self.get_conn()?;

        match Event::get(&mut conn, event_id).optional()? {
            Some(event) => event_document(&mut conn, event).map(Some),
            None => Ok(None),
        }
    }

    #[tracing::instrument(err, skip(self))]
    fn get_events_for_user(&self, user_id: UserId) -> Result<Vec<EventDocument>> {
        let mut conn = self.get_conn()?;

        Event::get_all_for_user(&mut conn, user_id)?
            .into_iter()
            .map(|event| event_document(&mut conn, event))
            .collect()
    }

    #[tracing::instrument(err, skip(self, changeset))]
    fn update_event(
        &self,
        event_id: EventId,
        changeset: UpdateEvent,
    ) -> Result<Option<EventDocument>> {
        let mut conn = self.get_conn()?;

        match changeset.apply(&mut conn, event_id).optional()? {
            Some(event) => event_document(&mut conn, event).map(Some),
            None => Ok(None),
        }
    }

    #[tracing::instrument(err, skip_all, fields(event_id = %new_task.event_id))]
    fn insert_task(&self, new_task: NewTask, assignees: &[UserId]) -> Result<TaskDocument> {
        let mut conn = self.get_conn()?;

        conn.transaction::<_, DatabaseError, _>(|conn| {
            // tasks.event_id carries no foreign key, so the event is checked here
            let _ = Event::get(conn, new_task.event_id)?;

            let task = new_task.insert(conn)?;
            Task::set_assignees(conn, task.id, assignees)?;

            task_document(conn, task)
        })
    }

    #[tracing::instrument(err, skip(self))]
    fn get_task(&self, task_id: TaskId) -> Result<Option<TaskDocument>> {
        let mut conn = self.get_conn()?;

        match Task::get(&mut conn, task_id).optional()? {
            Some(task) => task_document(&mut conn, task).map(Some),
            None => Ok(None),
        }
    }

    #[tracing::instrument(err, skip_all)]
    fn get_tasks(&self, task_ids: &[TaskId]) -> Result<Vec<TaskDocument>> {
        let mut conn = self.get_conn()?;

        let tasks = Task::get_all_by_ids(&mut conn, task_ids)?;

        let mut assignees: HashMap<TaskId, Vec<UserId>> = HashMap::new();
        for (task_id, user_id) in Task::get_assignees_for_tasks(&mut conn, task_ids)? {
            assignees.entry(task_id).or_default().push(user_id);
        }

        let documents = tasks
            .into_iter()
            .map(|task| TaskDocument {
                assignees: assignees.remove(&task.id).unwrap_or_default(),
                task,
            })
            .collect();

        Ok(order_by_ids(documents, task_ids, |doc| doc.task.id))
    }

    #[tracing::instrument(err, skip(self, changeset, assignees))]
    fn update_task(
        &self,
        task_id: TaskId,
        changeset: UpdateTask,
        assignees: Option<&[UserId]>,
    ) -> Result<Option<TaskDocument>> {
        let mut conn = self.get_conn()?;

        conn.transaction::<_, DatabaseError, _>(|conn| {
            let task = match changeset.apply(conn, task_id).optional()? {
                Some(task) => task,
                None => return Ok(None),
            };

            if let Some(assignees) = assignees {
                Task::set_assignees(conn, task_id, assignees)?;
            }

            task_document(conn, task).map(Some)
        })
    }

    #[tracing::instrument(err, skip(self))]
    fn apply(&self, mutations: &[Mutation]) -> Result<()> {
        let mut conn = self.get_conn()?;

        conn.transaction::<_, DatabaseError, _>(|conn| {
            for mutation in mutations {
                apply_mutation(conn, mutation)?;
            }

            Ok(())
        })
    }
}
