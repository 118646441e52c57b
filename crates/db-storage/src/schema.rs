// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

diesel::table! {
    users (id) {
        id -> Uuid,
        handle -> Varchar,
        firstname -> Varchar,
        lastname -> Varchar,
        email -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    user_friends (user_id, friend_id) {
        user_id -> Uuid,
        friend_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    events (id) {
        id -> Uuid,
        name -> Varchar,
        description -> Text,
        tags -> Array<Text>,
        address -> Text,
        date -> Varchar,
        admin -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    event_guests (event_id, user_id) {
        event_id -> Uuid,
        user_id -> Uuid,
        joined_at -> Timestamptz,
    }
}

diesel::table! {
    tasks (id) {
        id -> Uuid,
        event_id -> Uuid,
        name -> Varchar,
        description -> Text,
        done -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    task_assignees (task_id, user_id) {
        task_id -> Uuid,
        user_id -> Uuid,
    }
}

diesel::joinable!(events -> users (admin));
diesel::joinable!(event_guests -> events (event_id));
diesel::joinable!(event_guests -> users (user_id));
diesel::joinable!(tasks -> events (event_id));
diesel::joinable!(task_assignees -> tasks (task_id));
diesel::joinable!(task_assignees -> users (user_id));
diesel::joinable!(user_friends -> users (friend_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    user_friends,
    events,
    event_guests,
    tasks,
    task_assignees,
);
