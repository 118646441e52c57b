// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

crate::diesel_newtype! {
    #[derive(Copy)] UserId(uuid::Uuid) => diesel::sql_types::Uuid
}

impl UserId {
    /// Create a new random user id
    pub fn generate() -> Self {
        Self::from(uuid::Uuid::new_v4())
    }
}
