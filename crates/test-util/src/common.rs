// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use actix_web::web::{Data, ServiceConfig};
use arc_swap::ArcSwap;
use controller::auth::Claims;
use controller::settings::{Auth, Settings, SharedSettings, Storage, StorageBackend};
use db_storage::store::{MemoryStore, Store};
use db_storage::users::{NewUser, User, UserId};
use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::Arc;

pub const SECRET: &str = "primal-party-test-secret";

/// Controller test setup backed by the in-memory storage
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub settings: SharedSettings,
}

impl TestContext {
    pub fn new() -> Self {
        let settings = Settings {
            database: None,
            auth: Auth {
                secret: SECRET.into(),
                issuer: None,
                leeway_secs: 0,
            },
            http: Default::default(),
            logging: Default::default(),
            storage: Storage {
                backend: StorageBackend::Memory,
            },
        };

        Self {
            store: Arc::new(MemoryStore::new()),
            settings: Arc::new(ArcSwap::from_pointee(settings)),
        }
    }

    pub fn create_user(&self, handle: &str) -> User {
        self.store
            .insert_user(NewUser {
                handle: handle.into(),
                firstname: handle.into(),
                lastname: "Tester".into(),
                email: Some(format!("{handle}@example.org")),
            })
            .expect("Unable to create test user")
            .user
    }

    /// A valid access token for the user
    pub fn token_for(&self, user_id: UserId) -> String {
        sign(user_id, chrono::Utc::now().timestamp() + 3600)
    }

    pub fn expired_token(&self, user_id: UserId) -> String {
        sign(user_id, chrono::Utc::now().timestamp() - 3600)
    }

    pub fn store_data(&self) -> Data<dyn Store> {
        let store: Arc<dyn Store> = self.store.clone();
        Data::from(store)
    }

    /// Configuration of the REST API for `actix_web::test::init_service`
    pub fn api_config(&self) -> impl FnOnce(&mut ServiceConfig) {
        controller::api_config(self.store_data(), self.settings.clone())
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

fn sign(sub: UserId, exp: i64) -> String {
    let claims = Claims {
        sub,
        exp,
        iss: None,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("Unable to sign test token")
}
