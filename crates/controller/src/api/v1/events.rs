// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Event related API structs and Endpoints
use super::response::ApiError;
use super::tasks::{task_details, TaskDetails};
use super::users::PublicUserProfile;
use super::util::{not_blank, one_or_many, option_one_or_many, GetUserProfilesBatched};
use crate::access::{authorize, Requirement};
use crate::membership::{self, DeleteOutcome, EventInput};
use actix_web::web::{Data, Json, Path, ReqData};
use actix_web::{delete, get, post, put};
use chrono::{DateTime, Utc};
use db_storage::events::{EventId, UpdateEvent};
use db_storage::store::{EventDocument, Store};
use db_storage::tasks::TaskId;
use db_storage::users::{User, UserId};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// An event with the ids of its admin, guests and tasks
#[derive(Debug, Serialize)]
pub struct EventResource {
    pub id: EventId,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub address: String,
    pub date: String,
    pub admin: UserId,
    pub guests: Vec<UserId>,
    pub tasks: Vec<TaskId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventDocument> for EventResource {
    fn from(document: EventDocument) -> Self {
        let EventDocument {
            event,
            guests,
            tasks,
        } = document;

        Self {
            id: event.id,
            name: event.name,
            description: event.description,
            tags: event.tags,
            address: event.address,
            date: event.date,
            admin: event.admin,
            guests,
            tasks,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

/// An event with the admin, guests and tasks populated
#[derive(Debug, Serialize)]
pub struct EventDetails {
    pub id: EventId,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub address: String,
    pub date: String,
    pub admin: PublicUserProfile,
    pub guests: Vec<PublicUserProfile>,
    pub tasks: Vec<TaskDetails>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct EventResponse<T> {
    pub event: T,
}

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub events: Vec<EventResource>,
}

#[derive(Debug, Serialize)]
pub struct GuestsResponse {
    pub guests: Vec<PublicUserProfile>,
}

/// A guest together with the events they joined
#[derive(Debug, Serialize)]
pub struct GuestResource {
    #[serde(flatten)]
    pub profile: PublicUserProfile,
    pub events: Vec<EventId>,
}

#[derive(Debug, Serialize)]
pub struct GuestResponse {
    pub guest: GuestResource,
}

#[derive(Debug, Serialize)]
pub struct RemainingGuestsResponse {
    pub remaining_guests: Vec<UserId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteStatus {
    Deleted,
    Left,
}

#[derive(Debug, Serialize)]
pub struct DeleteEventResponse {
    pub status: DeleteStatus,
}

/// API request body to create a new event
#[derive(Debug, Deserialize, Validate)]
pub struct PostEventBody {
    #[serde(default)]
    #[validate(custom = "not_blank", length(max = 255))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 4096))]
    pub description: String,
    /// A single tag or a list of tags
    #[serde(default, deserialize_with = "one_or_many")]
    pub tags: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 512))]
    pub address: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub date: String,
}

/// API request body to update an event
///
/// Missing fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct PutEventBody {
    #[validate(custom = "not_blank", length(max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 4096))]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "option_one_or_many")]
    pub tags: Option<Vec<String>>,
    #[validate(length(max = 512))]
    pub address: Option<String>,
    #[validate(length(max = 255))]
    pub date: Option<String>,
}

/// API Endpoint *GET /events*
///
/// Returns all events the requesting user administrates or joined, newest first
#[get("/events")]
pub async fn get_events(
    store: Data<dyn Store>,
    current_user: ReqData<User>,
) -> Result<Json<EventsResponse>, ApiError> {
    let current_user_id = current_user.id;

    let events = crate::block(move || store.get_events_for_user(current_user_id)).await??;

    Ok(Json(EventsResponse {
        events: events.into_iter().map(EventResource::from).collect(),
    }))
}

/// API Endpoint *POST /events*
///
/// Creates a new event with the requesting user as admin
#[post("/events")]
pub async fn new_event(
    store: Data<dyn Store>,
    current_user: ReqData<User>,
    body: Json<PostEventBody>,
) -> Result<Json<EventResponse<EventResource>>, ApiError> {
    let current_user_id = current_user.id;
    let body = body.into_inner();

    body.validate()?;

    let event = crate::block(move || {
        membership::create_event(
            store.get_ref(),
            current_user_id,
            EventInput {
                name: body.name,
                description: body.description,
                tags: body.tags,
                address: body.address,
                date: body.date,
            },
        )
    })
    .await??;

    Ok(Json(EventResponse {
        event: EventResource::from(event),
    }))
}

/// API Endpoint *GET /events/{event_id}*
///
/// Returns the event with the profiles of its admin and guests and all of its tasks
#[get("/events/{event_id}")]
pub async fn get_event(
    store: Data<dyn Store>,
    current_user: ReqData<User>,
    event_id: Path<EventId>,
) -> Result<Json<EventResponse<EventDetails>>, ApiError> {
    let event_id = event_id.into_inner();
    let current_user_id = current_user.id;

    let (event, users, tasks) = crate::block(move || -> membership::Result<_> {
        let store = store.get_ref();

        let event = authorize(store, current_user_id, event_id, Requirement::Invited)?;

        let users = GetUserProfilesBatched::new()
            .add(&[event.event.admin])
            .add(&event.guests)
            .fetch(store)?;

        let tasks = store.get_tasks(&event.tasks)?;
        let tasks = task_details(store, tasks)?;

        Ok((event, users, tasks))
    })
    .await??;

    let EventDocument { event, guests, .. } = event;

    let admin = users.get(event.admin).ok_or_else(|| {
        log::error!("Admin {} of event {} does not exist", event.admin, event.id);
        ApiError::internal()
    })?;

    Ok(Json(EventResponse {
        event: EventDetails {
            id: event.id,
            name: event.name,
            description: event.description,
            tags: event.tags,
            address: event.address,
            date: event.date,
            admin,
            guests: users.get_all(&guests),
            tasks,
            created_at: event.created_at,
            updated_at: event.updated_at,
        },
    }))
}

/// API Endpoint *PUT /events/{event_id}*
///
/// Updates the fields of the event, only the admin may do that
#[put("/events/{event_id}")]
pub async fn update_event(
    store: Data<dyn Store>,
    current_user: ReqData<User>,
    event_id: Path<EventId>,
    body: Json<PutEventBody>,
) -> Result<Json<EventResponse<EventResource>>, ApiError> {
    let event_id = event_id.into_inner();
    let current_user_id = current_user.id;
    let body = body.into_inner();

    body.validate()?;

    let event = crate::block(move || -> membership::Result<_> {
        let store = store.get_ref();

        let _ = authorize(store, current_user_id, event_id, Requirement::Admin)?;

        let changeset = UpdateEvent {
            name: body.name,
            description: body.description,
            tags: body.tags,
            address: body.address,
            date: body.date,
        };

        membership::update_event(store, event_id, changeset)
    })
    .await??;

    Ok(Json(EventResponse {
        event: EventResource::from(event),
    }))
}

/// API Endpoint *DELETE /events/{event_id}*
///
/// Deletes the event when called by the admin. Any other invited user leaves the event instead.
#[delete("/events/{event_id}")]
pub async fn delete_event(
    store: Data<dyn Store>,
    current_user: ReqData<User>,
    event_id: Path<EventId>,
) -> Result<Json<DeleteEventResponse>, ApiError> {
    let event_id = event_id.into_inner();
    let current_user_id = current_user.id;

    let outcome = crate::block(move || -> membership::Result<_> {
        let store = store.get_ref();

        let _ = authorize(store, current_user_id, event_id, Requirement::Invited)?;

        membership::delete_event(store, event_id, current_user_id)
    })
    .await??;

    let status = match outcome {
        DeleteOutcome::Deleted => DeleteStatus::Deleted,
        DeleteOutcome::Left => DeleteStatus::Left,
    };

    Ok(Json(DeleteEventResponse { status }))
}

/// API Endpoint *GET /events/{event_id}/guests*
#[get("/events/{event_id}/guests")]
pub async fn get_guests(
    store: Data<dyn Store>,
    current_user: ReqData<User>,
    event_id: Path<EventId>,
) -> Result<Json<GuestsResponse>, ApiError> {
    let event_id = event_id.into_inner();
    let current_user_id = current_user.id;

    let guests = crate::block(move || -> membership::Result<_> {
        let store = store.get_ref();

        let event = authorize(store, current_user_id, event_id, Requirement::Invited)?;

        let users = GetUserProfilesBatched::new()
            .add(&event.guests)
            .fetch(store)?;

        Ok(users.get_all(&event.guests))
    })
    .await??;

    Ok(Json(GuestsResponse { guests }))
}

/// API Endpoint *POST /events/{event_id}/guests/{guest_id}*
///
/// Adds a user to the guests of the event, only the admin may do that
#[post("/events/{event_id}/guests/{guest_id}")]
pub async fn add_guest(
    store: Data<dyn Store>,
    current_user: ReqData<User>,
    path: Path<(EventId, UserId)>,
) -> Result<Json<GuestResponse>, ApiError> {
    let (event_id, guest_id) = path.into_inner();
    let current_user_id = current_user.id;

    let guest = crate::block(move || -> membership::Result<_> {
        let store = store.get_ref();

        let _ = authorize(store, current_user_id, event_id, Requirement::Admin)?;

        membership::add_guest(store, event_id, guest_id)
    })
    .await??;

    Ok(Json(GuestResponse {
        guest: GuestResource {
            profile: PublicUserProfile::from(guest.user),
            events: guest.events,
        },
    }))
}

/// API Endpoint *DELETE /events/{event_id}/guests/{guest_id}*
///
/// Removes a guest from the event and from the assignees of its tasks
#[delete("/events/{event_id}/guests/{guest_id}")]
pub async fn remove_guest(
    store: Data<dyn Store>,
    current_user: ReqData<User>,
    path: Path<(EventId, UserId)>,
) -> Result<Json<RemainingGuestsResponse>, ApiError> {
    let (event_id, guest_id) = path.into_inner();
    let current_user_id = current_user.id;

    let remaining_guests = crate::block(move || -> membership::Result<_> {
        let store = store.get_ref();

        let _ = authorize(store, current_user_id, event_id, Requirement::Admin)?;

        membership::remove_guest(store, event_id, guest_id)
    })
    .await??;

    Ok(Json(RemainingGuestsResponse { remaining_guests }))
}
