// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

crate::diesel_newtype! {
    #[derive(Copy)] TaskId(uuid::Uuid) => diesel::sql_types::Uuid
}

impl TaskId {
    /// Create a new random task id
    pub fn generate() -> Self {
        Self::from(uuid::Uuid::new_v4())
    }
}
