// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Handles user Authentication in API requests
use crate::api::v1::response::{ApiError, AuthenticationError};
use crate::auth;
use crate::settings::SharedSettings;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::Error;
use actix_web::http::header::{self, Header};
use actix_web::web::Data;
use actix_web::{HttpMessage, ResponseError};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use core::future::ready;
use db_storage::store::Store;
use db_storage::users::User;
use std::future::{Future, Ready};
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

/// Middleware factory
///
/// Transforms into [`BearerAuthMiddleware`]
pub struct BearerAuth {
    pub store: Data<dyn Store>,
    pub settings: SharedSettings,
}

impl<S> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse;
    type Error = Error;
    type Transform = BearerAuthMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthMiddleware {
            service: Rc::new(service),
            store: self.store.clone(),
            settings: self.settings.clone(),
        }))
    }
}

/// Authentication middleware
///
/// Whenever an API request is received, the BearerAuthMiddleware will validate the access
/// token and provide the associated user as [`ReqData`](actix_web::web::ReqData) for the subsequent services.
pub struct BearerAuthMiddleware<S> {
    service: Rc<S>,
    store: Data<dyn Store>,
    settings: SharedSettings,
}

type ResultFuture<O, E> = Pin<Box<dyn Future<Output = Result<O, E>>>>;

impl<S> Service<ServiceRequest> for BearerAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = Error> + 'static,
    S::Future: 'static,
{
    type Response = ServiceResponse;
    type Error = Error;
    type Future = ResultFuture<Self::Response, Self::Error>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let store = self.store.clone();
        let settings = self.settings.clone();

        let auth = match Authorization::<Bearer>::parse(&req) {
            Ok(a) => a,
            Err(e) => {
                let authentication_error = if req.headers().contains_key(header::AUTHORIZATION) {
                    log::warn!("Unable to parse access token, {}", e);
                    AuthenticationError::InvalidAccessToken
                } else {
                    AuthenticationError::MissingAccessToken
                };

                let error = ApiError::bearer(authentication_error);
                let response = req.into_response(error.error_response());
                return Box::pin(ready(Ok(response)));
            }
        };

        let access_token = auth.into_scheme().token().to_string();

        Box::pin(async move {
            let current_user = match check_access_token(store, settings, access_token).await {
                Ok(user) => user,
                Err(error) => return Ok(req.into_response(error.error_response())),
            };

            req.extensions_mut().insert(current_user);
            service.call(req).await
        })
    }
}

/// Verify the access token and load the user it was issued for
pub async fn check_access_token(
    store: Data<dyn Store>,
    settings: SharedSettings,
    access_token: String,
) -> Result<User, ApiError> {
    let claims = auth::verify(&settings.load().auth, &access_token)?;

    let user_id = claims.sub;

    let mut users = crate::block(move || store.get_users(&[user_id])).await??;

    match users.pop() {
        Some(user) => Ok(user),
        None => {
            log::warn!("The requesting user {} could not be found", user_id);
            Err(ApiError::bearer(AuthenticationError::UnknownUser))
        }
    }
}
