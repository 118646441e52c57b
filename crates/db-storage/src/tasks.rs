// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Contains the task specific database structs and queries
use crate::events::EventId;
use crate::schema::{task_assignees, tasks};
use crate::users::UserId;
use chrono::{DateTime, Utc};
use database::{DbConnection, Result};
use diesel::prelude::*;

pub use types::core::TaskId;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable)]
#[diesel(table_name = tasks)]
pub struct Task {
    pub id: TaskId,
    pub event_id: EventId,
    pub name: String,
    pub description: String,
    pub done: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    #[tracing::instrument(err, skip_all, fields(%task_id))]
    pub fn get(conn: &mut DbConnection, task_id: TaskId) -> Result<Task> {
        let task = tasks::table.filter(tasks::id.eq(task_id)).get_result(conn)?;

        Ok(task)
    }

    /// Get all tasks with the given ids, unknown ids are skipped
    #[tracing::instrument(err, skip_all)]
    pub fn get_all_by_ids(conn: &mut DbConnection, ids: &[TaskId]) -> Result<Vec<Task>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let tasks = tasks::table
            .filter(tasks::id.eq_any(ids))
            .order_by(tasks::created_at.asc())
            .load(conn)?;

        Ok(tasks)
    }

    /// Returns false if the task did not exist
    #[tracing::instrument(err, skip_all, fields(%task_id))]
    pub fn delete_by_id(conn: &mut DbConnection, task_id: TaskId) -> Result<bool> {
        let deleted = diesel::delete(tasks::table.filter(tasks::id.eq(task_id))).execute(conn)?;

        Ok(deleted > 0)
    }

    #[tracing::instrument(err, skip_all, fields(%task_id))]
    pub fn get_assignee_ids(conn: &mut DbConnection, task_id: TaskId) -> Result<Vec<UserId>> {
        let assignees = task_assignees::table
            .filter(task_assignees::task_id.eq(task_id))
            .select(task_assignees::user_id)
            .load(conn)?;

        Ok(assignees)
    }

    /// Get `(task_id, user_id)` assignment pairs of all given tasks
    #[tracing::instrument(err, skip_all)]
    pub fn get_assignees_for_tasks(
        conn: &mut DbConnection,
        task_ids: &[TaskId],
    ) -> Result<Vec<(TaskId, UserId)>> {
        if task_ids.is_empty() {
            return Ok(vec![]);
        }

        let pairs = task_assignees::table
            .filter(task_assignees::task_id.eq_any(task_ids))
            .select((task_assignees::task_id, task_assignees::user_id))
            .load(conn)?;

        Ok(pairs)
    }

    /// Replace the assignee set of the task
    #[tracing::instrument(err, skip_all, fields(%task_id))]
    pub fn set_assignees(
        conn: &mut DbConnection,
        task_id: TaskId,
        assignees: &[UserId],
    ) -> Result<()> {
        let _ = diesel::delete(task_assignees::table.filter(task_assignees::task_id.eq(task_id)))
            .execute(conn)?;

        if assignees.is_empty() {
            return Ok(());
        }

        let rows: Vec<_> = assignees
            .iter()
            .map(|&user_id| NewTaskAssignee { task_id, user_id })
            .collect();

        let _ = diesel::insert_into(task_assignees::table)
            .values(rows)
            .on_conflict_do_nothing()
            .execute(conn)?;

        Ok(())
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTask {
    pub event_id: EventId,
    pub name: String,
    pub description: String,
    pub done: bool,
}

impl NewTask {
    #[tracing::instrument(err, skip_all)]
    pub fn insert(self, conn: &mut DbConnection) -> Result<Task> {
        let task = diesel::insert_into(tasks::table)
            .values((tasks::id.eq(TaskId::generate()), self))
            .get_result(conn)?;

        Ok(task)
    }
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = tasks)]
pub struct UpdateTask {
    pub name: Option<String>,
    pub description: Option<String>,
    pub done: Option<bool>,
}

impl UpdateTask {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.done.is_none()
    }

    #[tracing::instrument(err, skip_all, fields(%task_id))]
    pub fn apply(self, conn: &mut DbConnection, task_id: TaskId) -> Result<Task> {
        // diesel refuses an update without any columns to set
        if self.is_empty() {
            return Task::get(conn, task_id);
        }

        let task = diesel::update(tasks::table.filter(tasks::id.eq(task_id)))
            .set(self)
            .get_result(conn)?;

        Ok(task)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_assignees)]
pub struct NewTaskAssignee {
    pub task_id: TaskId,
    pub user_id: UserId,
}

/// Remove the user from the assignee sets of every task that belongs to the event
///
/// Returns the number of removed assignments.
#[tracing::instrument(err, skip_all, fields(%event_id, %user_id))]
pub fn unassign_from_event_tasks(
    conn: &mut DbConnection,
    event_id: EventId,
    user_id: UserId,
) -> Result<usize> {
    let event_tasks = tasks::table
        .select(tasks::id)
        .filter(tasks::event_id.eq(event_id));

    let removed = diesel::delete(
        task_assignees::table
            .filter(task_assignees::user_id.eq(user_id))
            .filter(task_assignees::task_id.eq_any(event_tasks)),
    )
    .execute(conn)?;

    Ok(removed)
}
