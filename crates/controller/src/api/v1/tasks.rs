// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Task related API structs and Endpoints
//!
//! Tasks are always addressed through their event. Reading and updating a task requires the
//! caller to be invited to the event, adding and removing one requires the admin.
use super::response::ApiError;
use super::users::PublicUserProfile;
use super::util::{
    not_blank, one_or_many, option_one_or_many, GetUserProfilesBatched, UserProfilesBatch,
};
use crate::access::{authorize, Requirement};
use crate::membership::{self, TaskInput};
use actix_web::web::{Data, Json, Path, ReqData};
use actix_web::{delete, get, post, put};
use chrono::{DateTime, Utc};
use db_storage::events::EventId;
use db_storage::store::{Store, TaskDocument};
use db_storage::tasks::{TaskId, UpdateTask};
use db_storage::users::{User, UserId};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A task with the ids of its assignees
#[derive(Debug, Serialize)]
pub struct TaskResource {
    pub id: TaskId,
    pub event_id: EventId,
    pub name: String,
    pub description: String,
    pub done: bool,
    pub assignees: Vec<UserId>,
    pub created_at: DateTime<Utc>,
}

impl From<TaskDocument> for TaskResource {
    fn from(document: TaskDocument) -> Self {
        let TaskDocument { task, assignees } = document;

        Self {
            id: task.id,
            event_id: task.event_id,
            name: task.name,
            description: task.description,
            done: task.done,
            assignees,
            created_at: task.created_at,
        }
    }
}

/// A task with the profiles of its assignees
#[derive(Debug, Serialize)]
pub struct TaskDetails {
    pub id: TaskId,
    pub event_id: EventId,
    pub name: String,
    pub description: String,
    pub done: bool,
    pub assignees: Vec<PublicUserProfile>,
    pub created_at: DateTime<Utc>,
}

impl TaskDetails {
    pub fn from_document(document: TaskDocument, users: &UserProfilesBatch) -> Self {
        let TaskDocument { task, assignees } = document;

        Self {
            id: task.id,
            event_id: task.event_id,
            name: task.name,
            description: task.description,
            done: task.done,
            assignees: users.get_all(&assignees),
            created_at: task.created_at,
        }
    }
}

/// Fetch the assignee profiles of all `tasks` at once
pub(super) fn task_details(
    store: &dyn Store,
    tasks: Vec<TaskDocument>,
) -> database::Result<Vec<TaskDetails>> {
    let users = GetUserProfilesBatched::new()
        .add(tasks.iter().flat_map(|task| &task.assignees))
        .fetch(store)?;

    Ok(tasks
        .into_iter()
        .map(|task| TaskDetails::from_document(task, &users))
        .collect())
}

#[derive(Debug, Serialize)]
pub struct TaskResponse<T> {
    pub task: T,
}

#[derive(Debug, Serialize)]
pub struct TasksResponse<T> {
    pub tasks: Vec<T>,
}

/// API request body to create a new task
#[derive(Debug, Deserialize, Validate)]
pub struct PostTaskBody {
    #[serde(default)]
    #[validate(custom = "not_blank", length(max = 255))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 4096))]
    pub description: String,
    /// A single user id or a list of user ids
    #[serde(default, deserialize_with = "one_or_many")]
    pub assignees: Vec<UserId>,
}

/// API request body to update a task
///
/// Missing fields are left unchanged, `assignees` replaces the whole assignee list.
#[derive(Debug, Deserialize, Validate)]
pub struct PutTaskBody {
    #[validate(custom = "not_blank", length(max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 4096))]
    pub description: Option<String>,
    pub done: Option<bool>,
    #[serde(default, deserialize_with = "option_one_or_many")]
    pub assignees: Option<Vec<UserId>>,
}

/// API Endpoint *GET /events/{event_id}/tasks*
///
/// Returns all tasks of the event with the profiles of their assignees
#[get("/events/{event_id}/tasks")]
pub async fn get_tasks(
    store: Data<dyn Store>,
    current_user: ReqData<User>,
    event_id: Path<EventId>,
) -> Result<Json<TasksResponse<TaskDetails>>, ApiError> {
    let event_id = event_id.into_inner();
    let current_user_id = current_user.id;

    let tasks = crate::block(move || -> membership::Result<_> {
        let store = store.get_ref();

        let event = authorize(store, current_user_id, event_id, Requirement::Invited)?;
        let tasks = store.get_tasks(&event.tasks)?;

        Ok(task_details(store, tasks)?)
    })
    .await??;

    Ok(Json(TasksResponse { tasks }))
}

/// API Endpoint *POST /events/{event_id}/tasks*
///
/// Creates a task for the event, only the admin may do that
#[post("/events/{event_id}/tasks")]
pub async fn add_task(
    store: Data<dyn Store>,
    current_user: ReqData<User>,
    event_id: Path<EventId>,
    body: Json<PostTaskBody>,
) -> Result<Json<TaskResponse<TaskResource>>, ApiError> {
    let event_id = event_id.into_inner();
    let current_user_id = current_user.id;
    let body = body.into_inner();

    body.validate()?;

    let task = crate::block(move || -> membership::Result<_> {
        let store = store.get_ref();

        let _ = authorize(store, current_user_id, event_id, Requirement::Admin)?;

        membership::add_task(
            store,
            event_id,
            TaskInput {
                name: body.name,
                description: body.description,
                assignees: body.assignees,
            },
        )
    })
    .await??;

    Ok(Json(TaskResponse {
        task: TaskResource::from(task),
    }))
}

/// API Endpoint *GET /events/{event_id}/tasks/{task_id}*
#[get("/events/{event_id}/tasks/{task_id}")]
pub async fn get_task(
    store: Data<dyn Store>,
    current_user: ReqData<User>,
    path: Path<(EventId, TaskId)>,
) -> Result<Json<TaskResponse<TaskDetails>>, ApiError> {
    let (event_id, task_id) = path.into_inner();
    let current_user_id = current_user.id;

    let mut tasks = crate::block(move || -> membership::Result<_> {
        let store = store.get_ref();

        let event = authorize(store, current_user_id, event_id, Requirement::Invited)?;
        let task = membership::get_task(store, &event, task_id)?;

        Ok(task_details(store, vec![task])?)
    })
    .await??;

    let task = tasks.pop().ok_or_else(ApiError::internal)?;

    Ok(Json(TaskResponse { task }))
}

/// API Endpoint *PUT /events/{event_id}/tasks/{task_id}*
///
/// Any invited user may update a task, e.g. to mark it as done
#[put("/events/{event_id}/tasks/{task_id}")]
pub async fn update_task(
    store: Data<dyn Store>,
    current_user: ReqData<User>,
    path: Path<(EventId, TaskId)>,
    body: Json<PutTaskBody>,
) -> Result<Json<TaskResponse<TaskResource>>, ApiError> {
    let (event_id, task_id) = path.into_inner();
    let current_user_id = current_user.id;
    let body = body.into_inner();

    body.validate()?;

    let task = crate::block(move || -> membership::Result<_> {
        let store = store.get_ref();

        let event = authorize(store, current_user_id, event_id, Requirement::Invited)?;

        let changeset = UpdateTask {
            name: body.name,
            description: body.description,
            done: body.done,
        };

        membership::update_task(store, &event, task_id, changeset, body.assignees)
    })
    .await??;

    Ok(Json(TaskResponse {
        task: TaskResource::from(task),
    }))
}

/// API Endpoint *DELETE /events/{event_id}/tasks/{task_id}*
///
/// Deletes the task and returns the ids of the remaining tasks of the event
#[delete("/events/{event_id}/tasks/{task_id}")]
pub async fn remove_task(
    store: Data<dyn Store>,
    current_user: ReqData<User>,
    path: Path<(EventId, TaskId)>,
) -> Result<Json<TasksResponse<TaskId>>, ApiError> {
    let (event_id, task_id) = path.into_inner();
    let current_user_id = current_user.id;

    let tasks = crate::block(move || -> membership::Result<_> {
        let store = store.get_ref();

        let _ = authorize(store, current_user_id, event_id, Requirement::Admin)?;

        membership::remove_task(store, event_id, task_id)
    })
    .await??;

    Ok(Json(TasksResponse { tasks }))
}
