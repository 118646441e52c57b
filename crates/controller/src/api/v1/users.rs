// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! User related API structs and Endpoints
//!
//! The defined structs are exposed to the REST API and will be serialized/deserialized. Similar
//! structs are defined in the Database crate [`db_storage`] for database operations.
use super::response::ApiError;
use crate::membership::{MembershipError, Resource};
use actix_web::get;
use actix_web::web::{Data, Json, Path, ReqData};
use db_storage::events::EventId;
use db_storage::store::{Store, UserDocument};
use db_storage::users::{User, UserId};
use serde::Serialize;

/// Public user details.
///
/// Contains general "public" information about a user. Is accessible to all other users.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUserProfile {
    pub id: UserId,
    pub handle: String,
    pub firstname: String,
    pub lastname: String,
    pub display_name: String,
}

impl From<User> for PublicUserProfile {
    fn from(user: User) -> Self {
        let display_name = format!("{} {}", user.firstname, user.lastname);

        Self {
            id: user.id,
            handle: user.handle,
            firstname: user.firstname,
            lastname: user.lastname,
            display_name,
        }
    }
}

/// Private user profile.
///
/// Similar to [`PublicUserProfile`], but contains the email address and the events and
/// friends of the user.
/// Is used on */users/me* endpoints and whenever a membership of the user changed.
#[derive(Debug, Serialize)]
pub struct PrivateUserProfile {
    pub id: UserId,
    pub handle: String,
    pub firstname: String,
    pub lastname: String,
    pub display_name: String,
    pub email: Option<String>,
    pub events: Vec<EventId>,
    pub friends: Vec<UserId>,
}

impl From<UserDocument> for PrivateUserProfile {
    fn from(document: UserDocument) -> Self {
        let UserDocument {
            user,
            events,
            friends,
        } = document;

        let email = user.email.clone();
        let public = PublicUserProfile::from(user);

        Self {
            id: public.id,
            handle: public.handle,
            firstname: public.firstname,
            lastname: public.lastname,
            display_name: public.display_name,
            email,
            events,
            friends,
        }
    }
}

/// API Endpoint *GET /users/me*
///
/// Returns the [`PrivateUserProfile`] of the requesting user.
#[get("/users/me")]
pub async fn get_me(
    store: Data<dyn Store>,
    current_user: ReqData<User>,
) -> Result<Json<PrivateUserProfile>, ApiError> {
    let current_user_id = current_user.id;

    let user = crate::block(move || store.get_user(current_user_id))
        .await??
        .ok_or(MembershipError::NotFound(Resource::User))?;

    Ok(Json(PrivateUserProfile::from(user)))
}

/// API Endpoint *GET /users/{user_id}*
///
/// Returns [`PublicUserProfile`] of the specified user
#[get("/users/{user_id}")]
pub async fn get_user(
    store: Data<dyn Store>,
    user_id: Path<UserId>,
) -> Result<Json<PublicUserProfile>, ApiError> {
    let user_id = user_id.into_inner();

    let user = crate::block(move || store.get_user(user_id))
        .await??
        .ok_or(MembershipError::NotFound(Resource::User))?;

    Ok(Json(PublicUserProfile::from(user.user)))
}
