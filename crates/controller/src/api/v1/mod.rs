// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! REST API v1
//!
//! Current Endpoints. See their respective function:
//! - `/events` ([GET](events::get_events), [POST](events::new_event))
//! - `/events/{event_id}` ([GET](events::get_event), [PUT](events::update_event), [DELETE](events::delete_event))
//! - `/events/{event_id}/guests` ([GET](events::get_guests))
//! - `/events/{event_id}/guests/{guest_id}` ([POST](events::add_guest), [DELETE](events::remove_guest))
//! - `/events/{event_id}/tasks` ([GET](tasks::get_tasks), [POST](tasks::add_task))
//! - `/events/{event_id}/tasks/{task_id}` ([GET](tasks::get_task), [PUT](tasks::update_task), [DELETE](tasks::remove_task))
//! - `/users/me` ([GET](users::get_me))
//! - `/users/{user_id}` ([GET](users::get_user))
//! - `/friends` ([GET](friends::get_friends))
//! - `/friends/{friend_id}` ([GET](friends::get_friend), [POST](friends::add_friend), [DELETE](friends::remove_friend))
//!
//! Every endpoint requires a bearer token, see [`middleware::user_auth`].
use actix_web::web;

pub mod events;
pub mod friends;
pub mod middleware;
pub mod response;
pub mod tasks;
pub mod users;
mod util;

/// Register all v1 endpoints
pub fn services(cfg: &mut web::ServiceConfig) {
    cfg.service(events::get_events)
        .service(events::new_event)
        .service(events::get_event)
        .service(events::update_event)
        .service(events::delete_event)
        .service(events::get_guests)
        .service(events::add_guest)
        .service(events::remove_guest)
        .service(tasks::get_tasks)
        .service(tasks::add_task)
        .service(tasks::get_task)
        .service(tasks::update_task)
        .service(tasks::remove_task)
        .service(users::get_me)
        .service(users::get_user)
        .service(friends::get_friends)
        .service(friends::get_friend)
        .service(friends::add_friend)
        .service(friends::remove_friend);
}
