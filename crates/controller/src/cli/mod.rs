// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use crate::settings::Settings;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod users;

#[derive(Parser, Debug, Clone)]
#[clap(name = "primal-party", version)]
pub struct Args {
    #[clap(
        short,
        long,
        default_value = "config.toml",
        help = "Specify path to configuration file"
    )]
    pub config: PathBuf,

    #[clap(subcommand)]
    cmd: Option<SubCommand>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
#[clap(rename_all = "kebab_case")]
enum SubCommand {
    /// Migrate the db. This is done automatically during start of the controller,
    /// but can be done without starting the controller using this command.
    MigrateDb,
    /// Register a new user account and print its id
    CreateUser {
        #[clap(long)]
        handle: String,
        #[clap(long)]
        firstname: String,
        #[clap(long)]
        lastname: String,
        #[clap(long)]
        email: Option<String>,
    },
}

impl Args {
    /// Returns true if we want to startup the controller after we finished the cli part
    pub fn controller_should_start(&self) -> bool {
        self.cmd.is_none()
    }
}

/// Parses the CLI-Arguments into [`Args`]
///
/// Also runs (optional) cli commands if necessary
pub async fn parse_args() -> Result<Args> {
    let args = Args::parse();

    if let Some(sub_command) = args.cmd.clone() {
        let settings = Settings::load(&args.config)?;
        let database = settings
            .database
            .context("The `database` section is required for this command")?;

        match sub_command {
            SubCommand::MigrateDb => {
                db_storage::migrations::migrate_from_url(&database.url)
                    .await
                    .context("Failed to migrate database")?;
            }
            SubCommand::CreateUser {
                handle,
                firstname,
                lastname,
                email,
            } => {
                users::create_user(&database, handle, firstname, lastname, email)?;
            }
        }
    }

    Ok(args)
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn server_starts_without_sub_command() {
        let args = Args::try_parse_from(["primal-party"]).unwrap();

        assert_eq!(args.config, PathBuf::from("config.toml"));
        assert!(args.controller_should_start());
    }

    #[test]
    fn create_user_arguments() {
        let args = Args::try_parse_from([
            "primal-party",
            "--config",
            "other.toml",
            "create-user",
            "--handle",
            "nick",
            "--firstname",
            "Nick",
            "--lastname",
            "Doe",
        ])
        .unwrap();

        assert_eq!(args.config, PathBuf::from("other.toml"));
        assert!(!args.controller_should_start());
        assert_eq!(
            args.cmd,
            Some(SubCommand::CreateUser {
                handle: "nick".into(),
                firstname: "Nick".into(),
                lastname: "Doe".into(),
                email: None,
            })
        );
    }

    #[test]
    fn create_user_requires_handle() {
        assert!(Args::try_parse_from([
            "primal-party",
            "create-user",
            "--firstname",
            "Nick",
            "--lastname",
            "Doe",
        ])
        .is_err());
    }
}
