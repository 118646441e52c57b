// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use crate::settings::Database;
use anyhow::{bail, Context, Result};
use database::Db;
use db_storage::store::Store;
use db_storage::users::NewUser;

/// Implementation of the `primal-party create-user` command
pub(super) fn create_user(
    settings: &Database,
    handle: String,
    firstname: String,
    lastname: String,
    email: Option<String>,
) -> Result<()> {
    let db = Db::connect_url(&settings.url, 1, None).context("Failed to connect to database")?;

    if db.get_user_by_handle(&handle)?.is_some() {
        bail!("A user with the handle {handle:?} already exists");
    }

    let user = db
        .insert_user(NewUser {
            handle,
            firstname,
            lastname,
            email,
        })
        .context("Failed to create user")?;

    println!("{}", user.user.id);

    Ok(())
}
