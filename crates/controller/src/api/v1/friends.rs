// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Friend list of the requesting user
//!
//! Friendship is one-sided, adding a friend does not change the friend list of the other user.
use super::response::ApiError;
use super::users::PublicUserProfile;
use super::util::GetUserProfilesBatched;
use crate::membership::{self, MembershipError, Resource};
use actix_web::web::{Data, Json, Path, ReqData};
use actix_web::{delete, get, post};
use db_storage::store::Store;
use db_storage::users::{User, UserId};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct FriendsResponse<T> {
    pub friends: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct FriendResponse {
    pub friend: PublicUserProfile,
}

/// API Endpoint *GET /friends*
#[get("/friends")]
pub async fn get_friends(
    store: Data<dyn Store>,
    current_user: ReqData<User>,
) -> Result<Json<FriendsResponse<PublicUserProfile>>, ApiError> {
    let current_user_id = current_user.id;

    let friends = crate::block(move || -> membership::Result<_> {
        let store = store.get_ref();

        let user = store
            .get_user(current_user_id)?
            .ok_or(MembershipError::NotFound(Resource::User))?;

        let users = GetUserProfilesBatched::new()
            .add(&user.friends)
            .fetch(store)?;

        Ok(users.get_all(&user.friends))
    })
    .await??;

    Ok(Json(FriendsResponse { friends }))
}

/// API Endpoint *GET /friends/{friend_id}*
///
/// Users that are not friends of the requesting user are not found
#[get("/friends/{friend_id}")]
pub async fn get_friend(
    store: Data<dyn Store>,
    current_user: ReqData<User>,
    friend_id: Path<UserId>,
) -> Result<Json<FriendResponse>, ApiError> {
    let friend_id = friend_id.into_inner();
    let current_user_id = current_user.id;

    let friend = crate::block(move || -> membership::Result<_> {
        let store = store.get_ref();

        let user = store
            .get_user(current_user_id)?
            .ok_or(MembershipError::NotFound(Resource::User))?;

        membership::get_friend(store, &user, friend_id)
    })
    .await??;

    Ok(Json(FriendResponse {
        friend: PublicUserProfile::from(friend),
    }))
}

/// API Endpoint *POST /friends/{friend_id}*
///
/// Returns the updated friend list
#[post("/friends/{friend_id}")]
pub async fn add_friend(
    store: Data<dyn Store>,
    current_user: ReqData<User>,
    friend_id: Path<UserId>,
) -> Result<Json<FriendsResponse<UserId>>, ApiError> {
    let friend_id = friend_id.into_inner();
    let current_user_id = current_user.id;

    let user = crate::block(move || {
        membership::add_friend(store.get_ref(), current_user_id, friend_id)
    })
    .await??;

    Ok(Json(FriendsResponse {
        friends: user.friends,
    }))
}

/// API Endpoint *DELETE /friends/{friend_id}*
///
/// Returns the remaining friends
#[delete("/friends/{friend_id}")]
pub async fn remove_friend(
    store: Data<dyn Store>,
    current_user: ReqData<User>,
    friend_id: Path<UserId>,
) -> Result<Json<FriendsResponse<UserId>>, ApiError> {
    let friend_id = friend_id.into_inner();
    let current_user_id = current_user.id;

    let friends = crate::block(move || {
        membership::remove_friend(store.get_ref(), current_user_id, friend_id)
    })
    .await??;

    Ok(Json(FriendsResponse { friends }))
}
