// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

use barrel::backend::Pg;
use barrel::{types, Migration};

pub fn migration() -> String {
    let mut migr = Migration::new();

    migr.create_table("users", |table| {
        table.add_column("id", types::uuid().primary(true));
        table.add_column("handle", types::varchar(255).unique(true).nullable(false));
        table.add_column("firstname", types::varchar(255).nullable(false));
        table.add_column("lastname", types::varchar(255).nullable(false));
        table.add_column("email", types::varchar(255).nullable(true));
        table.add_column("created_at", types::custom("TIMESTAMPTZ DEFAULT now()"));
    });

    migr.create_table("user_friends", |table| {
        table.add_column("user_id", types::custom("UUID REFERENCES users(id)"));
        table.add_column("friend_id", types::custom("UUID REFERENCES users(id)"));
        table.add_column("created_at", types::custom("TIMESTAMPTZ DEFAULT now()"));
        table.inject_custom("PRIMARY KEY (user_id, friend_id)");
    });

    migr.create_table("events", |table| {
        table.add_column("id", types::uuid().primary(true));
        table.add_column("name", types::varchar(255).nullable(false));
        table.add_column("description", types::text().nullable(false));
        table.add_column("tags", types::custom("TEXT[]"));
        table.add_column("address", types::text().nullable(false));
        table.add_column("date", types::varchar(255).nullable(false));
        table.add_column("admin", types::custom("UUID REFERENCES users(id)"));
        table.add_column("created_at", types::custom("TIMESTAMPTZ DEFAULT now()"));
        table.add_column("updated_at", types::custom("TIMESTAMPTZ DEFAULT now()"));
    });

    // Deleting an event removes its memberships, but not its tasks
    migr.create_table("event_guests", |table| {
        table.add_column(
            "event_id",
            types::custom("UUID REFERENCES events(id) ON DELETE CASCADE"),
        );
        table.add_column("user_id", types::custom("UUID REFERENCES users(id)"));
        table.add_column("joined_at", types::custom("TIMESTAMPTZ DEFAULT now()"));
        table.inject_custom("PRIMARY KEY (event_id, user_id)");
    });

    migr.create_table("tasks", |table| {
        table.add_column("id", types::uuid().primary(true));
        table.add_column("event_id", types::uuid().nullable(false));
        table.add_column("name", types::varchar(255).nullable(false));
        table.add_column("description", types::text().nullable(false));
        table.add_column("done", types::boolean().nullable(false));
        table.add_column("created_at", types::custom("TIMESTAMPTZ DEFAULT now()"));
        table.add_index("tasks_event_id_idx", types::index(vec!["event_id"]));
    });

    migr.create_table("task_assignees", |table| {
        table.add_column(
            "task_id",
            types::custom("UUID REFERENCES tasks(id) ON DELETE CASCADE"),
        );
        table.add_column("user_id", types::custom("UUID REFERENCES users(id)"));
        table.inject_custom("PRIMARY KEY (task_id, user_id)");
    });

    migr.make::<Pg>()
}
