// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Membership and containment changes of events, tasks and friends
//!
//! Every function expects the caller to be authorized already (see [`crate::access`]). Changes to
//! a relation are committed as a single [`Mutation`] batch, so both sides of the relation are
//! always updated together.
//!
//! All functions block on the store and must run inside [`crate::block`] when called from a
//! request handler.
use db_storage::events::{EventId, NewEvent, UpdateEvent};
use db_storage::store::{EventDocument, Mutation, Store, TaskDocument, UserDocument};
use db_storage::tasks::{NewTask, TaskId, UpdateTask};
use db_storage::users::{User, UserId};
use itertools::Itertools;

mod error;

pub use error::{Denied, Joinable, List, MembershipError, Resource};

pub type Result<T, E = MembershipError> = std::result::Result<T, E>;

/// Fields of a new event
#[derive(Debug, Clone)]
pub struct EventInput {
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub address: String,
    pub date: String,
}

/// Fields of a new task
#[derive(Debug, Clone)]
pub struct TaskInput {
    pub name: String,
    pub description: String,
    pub assignees: Vec<UserId>,
}

/// What happened to the event on [`delete_event`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The admin deleted the event
    Deleted,
    /// A guest left the event
    Left,
}

fn ensure_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(MembershipError::invalid_field("name", "empty"));
    }

    Ok(())
}

fn get_event(store: &dyn Store, event_id: EventId) -> Result<EventDocument> {
    store
        .get_event(event_id)?
        .ok_or(MembershipError::NotFound(Resource::Event))
}

fn get_user(store: &dyn Store, user_id: UserId) -> Result<UserDocument> {
    store
        .get_user(user_id)?
        .ok_or(MembershipError::NotFound(Resource::User))
}

/// Deduplicate `user_ids` and make sure every user exists
fn existing_users(store: &dyn Store, user_ids: Vec<UserId>) -> Result<Vec<UserId>> {
    let user_ids: Vec<UserId> = user_ids.into_iter().unique().collect();

    let found = store.get_users(&user_ids)?;

    if found.len() != user_ids.len() {
        return Err(MembershipError::NotFound(Resource::User));
    }

    Ok(user_ids)
}

/// Create an event administrated by `admin`
#[tracing::instrument(err, skip(store, input))]
pub fn create_event(store: &dyn Store, admin: UserId, input: EventInput) -> Result<EventDocument> {
    ensure_name(&input.name)?;

    let event = store.insert_event(NewEvent {
        name: input.name,
        description: input.description,
        tags: input.tags.into_iter().unique().collect(),
        address: input.address,
        date: input.date,
        admin,
    })?;

    Ok(event)
}

#[tracing::instrument(err, skip(store, changeset))]
pub fn update_event(
    store: &dyn Store,
    event_id: EventId,
    mut changeset: UpdateEvent,
) -> Result<EventDocument> {
    if let Some(name) = &changeset.name {
        ensure_name(name)?;
    }

    changeset.tags = changeset
        .tags
        .map(|tags| tags.into_iter().unique().collect());

    store
        .update_event(event_id, changeset)?
        .ok_or(MembershipError::NotFound(Resource::Event))
}

/// Add `guest_id` to the guests of the event
///
/// Returns the guest with the updated list of events they joined.
#[tracing::instrument(err, skip(store))]
pub fn add_guest(store: &dyn Store, event_id: EventId, guest_id: UserId) -> Result<UserDocument> {
    let event = get_event(store, event_id)?;
    let _ = get_user(store, guest_id)?;

    if event.guests.contains(&guest_id) {
        return Err(MembershipError::AlreadyMember(Joinable::Guests));
    }

    store.apply(&[Mutation::AddGuest {
        event_id,
        user_id: guest_id,
    }])?;

    get_user(store, guest_id)
}

/// Remove `guest_id` from the guests of the event and from the assignees of its tasks
///
/// Returns the remaining guests.
#[tracing::instrument(err, skip(store))]
pub fn remove_guest(store: &dyn Store, event_id: EventId, guest_id: UserId) -> Result<Vec<UserId>> {
    let event = get_event(store, event_id)?;

    // the admin is never removable, whether listed as guest or not
    if event.event.admin == guest_id {
        return Err(MembershipError::Forbidden(Denied::RemoveAdmin));
    }

    if !event.guests.contains(&guest_id) {
        return Err(MembershipError::NotInList(List::Guests));
    }

    store.apply(&[
        Mutation::RemoveGuest {
            event_id,
            user_id: guest_id,
        },
        Mutation::UnassignFromEventTasks {
            event_id,
            user_id: guest_id,
        },
    ])?;

    Ok(get_event(store, event_id)?.guests)
}

/// Delete the event if `caller` is its admin, otherwise remove the caller from the guests
///
/// Tasks of a deleted event are kept.
#[tracing::instrument(err, skip(store))]
pub fn delete_event(store: &dyn Store, event_id: EventId, caller: UserId) -> Result<DeleteOutcome> {
    let event = get_event(store, event_id)?;

    if event.event.admin == caller {
        store.apply(&[Mutation::DeleteEvent { event_id }])?;

        return Ok(DeleteOutcome::Deleted);
    }

    let _ = remove_guest(store, event_id, caller)?;

    Ok(DeleteOutcome::Left)
}

/// Create a task for the event
///
/// Nothing is stored unless the name is valid and the event and all assignees exist.
#[tracing::instrument(err, skip(store, input))]
pub fn add_task(store: &dyn Store, event_id: EventId, input: TaskInput) -> Result<TaskDocument> {
    ensure_name(&input.name)?;

    let _ = get_event(store, event_id)?;
    let assignees = existing_users(store, input.assignees)?;

    let task = store.insert_task(
        NewTask {
            event_id,
            name: input.name,
            description: input.description,
            done: false,
        },
        &assignees,
    )?;

    Ok(task)
}

/// Remove the task from the event and delete it
///
/// Returns the remaining tasks of the event.
#[tracing::instrument(err, skip(store))]
pub fn remove_task(store: &dyn Store, event_id: EventId, task_id: TaskId) -> Result<Vec<TaskId>> {
    let event = get_event(store, event_id)?;

    if !event.tasks.contains(&task_id) {
        return Err(MembershipError::NotInList(List::Tasks));
    }

    store.apply(&[Mutation::RemoveTask { event_id, task_id }])?;

    Ok(get_event(store, event_id)?.tasks)
}

/// Get a task of the event, tasks of other events are not found
pub fn get_task(store: &dyn Store, event: &EventDocument, task_id: TaskId) -> Result<TaskDocument> {
    if !event.tasks.contains(&task_id) {
        return Err(MembershipError::NotFound(Resource::Task));
    }

    store
        .get_task(task_id)?
        .ok_or(MembershipError::NotFound(Resource::Task))
}

#[tracing::instrument(err, skip(store, event, changeset))]
pub fn update_task(
    store: &dyn Store,
    event: &EventDocument,
    task_id: TaskId,
    changeset: UpdateTask,
    assignees: Option<Vec<UserId>>,
) -> Result<TaskDocument> {
    if let Some(name) = &changeset.name {
        ensure_name(name)?;
    }

    if !event.tasks.contains(&task_id) {
        return Err(MembershipError::NotFound(Resource::Task));
    }

    let assignees = assignees
        .map(|assignees| existing_users(store, assignees))
        .transpose()?;

    store
        .update_task(task_id, changeset, assignees.as_deref())?
        .ok_or(MembershipError::NotFound(Resource::Task))
}

/// Add `friend_id` to the friends of `user_id`
///
/// Friendship is one-sided, the friend's own list is not touched.
#[tracing::instrument(err, skip(store))]
pub fn add_friend(store: &dyn Store, user_id: UserId, friend_id: UserId) -> Result<UserDocument> {
    if user_id == friend_id {
        return Err(MembershipError::Forbidden(Denied::BefriendSelf));
    }

    let user = get_user(store, user_id)?;
    let _ = get_user(store, friend_id)?;

    if user.friends.contains(&friend_id) {
        return Err(MembershipError::AlreadyMember(Joinable::Friends));
    }

    store.apply(&[Mutation::AddFriend { user_id, friend_id }])?;

    get_user(store, user_id)
}

/// Returns the remaining friends
#[tracing::instrument(err, skip(store))]
pub fn remove_friend(store: &dyn Store, user_id: UserId, friend_id: UserId) -> Result<Vec<UserId>> {
    let user = get_user(store, user_id)?;

    if !user.friends.contains(&friend_id) {
        return Err(MembershipError::NotInList(List::Friends));
    }

    store.apply(&[Mutation::RemoveFriend { user_id, friend_id }])?;

    Ok(get_user(store, user_id)?.friends)
}

/// Get a single friend of the user, other users are not found
pub fn get_friend(store: &dyn Store, user: &UserDocument, friend_id: UserId) -> Result<User> {
    if !user.friends.contains(&friend_id) {
        return Err(MembershipError::NotFound(Resource::User));
    }

    Ok(get_user(store, friend_id)?.user)
}

#[cfg(test)]
mod test {
    use super::*;
    use db_storage::store::MemoryStore;
    use db_storage::users::NewUser;
    use pretty_assertions::assert_eq;

    fn user(store: &MemoryStore, handle: &str) -> UserId {
        store
            .insert_user(NewUser {
                handle: handle.into(),
                firstname: handle.into(),
                lastname: "Doe".into(),
                email: None,
            })
            .unwrap()
            .user
            .id
    }

    fn movienight() -> EventInput {
        EventInput {
            name: "movienight".into(),
            description: "movie night with the boys".into(),
            tags: vec!["movie".into()],
            address: "1333 something lane".into(),
            date: "Monday".into(),
        }
    }

    fn soda(assignees: Vec<UserId>) -> TaskInput {
        TaskInput {
            name: "Bring Soda".into(),
            description: String::new(),
            assignees,
        }
    }

    struct Setup {
        store: MemoryStore,
        admin: UserId,
        guest: UserId,
        event_id: EventId,
    }

    fn setup() -> Setup {
        let store = MemoryStore::new();
        let admin = user(&store, "admin");
        let guest = user(&store, "guest");
        let event_id = create_event(&store, admin, movienight())
            .unwrap()
            .event
            .id;

        Setup {
            store,
            admin,
            guest,
            event_id,
        }
    }

    #[test]
    fn created_event_has_no_guests() {
        let s = setup();

        let event = s.store.get_event(s.event_id).unwrap().unwrap();

        assert_eq!(event.event.admin, s.admin);
        assert_eq!(event.event.tags, vec!["movie".to_owned()]);
        assert!(event.guests.is_empty());
        assert!(event.tasks.is_empty());
    }

    #[test]
    fn blank_event_name_is_rejected() {
        let s = setup();

        let input = EventInput {
            name: "  ".into(),
            ..movienight()
        };

        assert!(matches!(
            create_event(&s.store, s.admin, input),
            Err(MembershipError::InvalidInput(_))
        ));
        assert_eq!(s.store.get_events_for_user(s.admin).unwrap().len(), 1);
    }

    #[test]
    fn add_guest_links_both_sides() {
        let s = setup();

        let guest = add_guest(&s.store, s.event_id, s.guest).unwrap();

        assert_eq!(guest.events, vec![s.event_id]);
        assert_eq!(
            s.store.get_event(s.event_id).unwrap().unwrap().guests,
            vec![s.guest]
        );
    }

    #[test]
    fn add_guest_twice_is_rejected() {
        let s = setup();

        add_guest(&s.store, s.event_id, s.guest).unwrap();

        assert!(matches!(
            add_guest(&s.store, s.event_id, s.guest),
            Err(MembershipError::AlreadyMember(Joinable::Guests))
        ));
        assert_eq!(
            s.store.get_event(s.event_id).unwrap().unwrap().guests,
            vec![s.guest]
        );
        assert_eq!(
            s.store.get_user(s.guest).unwrap().unwrap().events,
            vec![s.event_id]
        );
    }

    #[test]
    fn add_guest_requires_existing_event_and_user() {
        let s = setup();

        assert!(matches!(
            add_guest(&s.store, EventId::generate(), s.guest),
            Err(MembershipError::NotFound(Resource::Event))
        ));
        assert!(matches!(
            add_guest(&s.store, s.event_id, UserId::generate()),
            Err(MembershipError::NotFound(Resource::User))
        ));
    }

    #[test]
    fn remove_guest_unlinks_both_sides() {
        let s = setup();
        add_guest(&s.store, s.event_id, s.guest).unwrap();

        let remaining = remove_guest(&s.store, s.event_id, s.guest).unwrap();

        assert!(remaining.is_empty());
        assert!(s.store.get_user(s.guest).unwrap().unwrap().events.is_empty());
    }

    #[test]
    fn remove_guest_prunes_only_this_events_tasks() {
        let s = setup();
        let other_event = create_event(&s.store, s.admin, movienight())
            .unwrap()
            .event
            .id;
        add_guest(&s.store, s.event_id, s.guest).unwrap();
        add_guest(&s.store, other_event, s.guest).unwrap();

        let here = add_task(&s.store, s.event_id, soda(vec![s.guest])).unwrap();
        let there = add_task(&s.store, other_event, soda(vec![s.guest])).unwrap();

        remove_guest(&s.store, s.event_id, s.guest).unwrap();

        let here = s.store.get_task(here.task.id).unwrap().unwrap();
        let there = s.store.get_task(there.task.id).unwrap().unwrap();
        assert!(here.assignees.is_empty());
        assert_eq!(there.assignees, vec![s.guest]);
    }

    #[test]
    fn admin_can_never_be_removed() {
        let s = setup();

        assert!(matches!(
            remove_guest(&s.store, s.event_id, s.admin),
            Err(MembershipError::Forbidden(Denied::RemoveAdmin))
        ));

        // not even if listed as a guest explicitly
        add_guest(&s.store, s.event_id, s.admin).unwrap();

        assert!(matches!(
            remove_guest(&s.store, s.event_id, s.admin),
            Err(MembershipError::Forbidden(Denied::RemoveAdmin))
        ));
    }

    #[test]
    fn remove_unknown_guest() {
        let s = setup();

        assert!(matches!(
            remove_guest(&s.store, s.event_id, s.guest),
            Err(MembershipError::NotInList(List::Guests))
        ));
        assert!(matches!(
            remove_guest(&s.store, EventId::generate(), s.guest),
            Err(MembershipError::NotFound(Resource::Event))
        ));
    }

    #[test]
    fn admin_deletes_event_and_keeps_tasks() {
        let s = setup();
        add_guest(&s.store, s.event_id, s.guest).unwrap();
        let task = add_task(&s.store, s.event_id, soda(vec![])).unwrap();

        let outcome = delete_event(&s.store, s.event_id, s.admin).unwrap();

        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert_eq!(s.store.get_event(s.event_id).unwrap(), None);
        assert!(s.store.get_user(s.guest).unwrap().unwrap().events.is_empty());
        assert!(s.store.get_task(task.task.id).unwrap().is_some());
    }

    #[test]
    fn guest_delete_only_leaves() {
        let s = setup();
        add_guest(&s.store, s.event_id, s.guest).unwrap();

        let outcome = delete_event(&s.store, s.event_id, s.guest).unwrap();

        assert_eq!(outcome, DeleteOutcome::Left);
        let event = s.store.get_event(s.event_id).unwrap().unwrap();
        assert!(event.guests.is_empty());
        assert!(s.store.get_user(s.guest).unwrap().unwrap().events.is_empty());
    }

    #[test]
    fn add_task_registers_on_event() {
        let s = setup();

        let task = add_task(&s.store, s.event_id, soda(vec![s.guest, s.guest])).unwrap();

        assert_eq!(task.assignees, vec![s.guest]);
        assert!(!task.task.done);
        assert_eq!(
            s.store.get_event(s.event_id).unwrap().unwrap().tasks,
            vec![task.task.id]
        );
    }

    #[test]
    fn add_task_with_blank_name_stores_nothing() {
        let s = setup();

        let input = TaskInput {
            name: String::new(),
            ..soda(vec![])
        };

        assert!(matches!(
            add_task(&s.store, s.event_id, input),
            Err(MembershipError::InvalidInput(_))
        ));
        assert!(s.store.get_event(s.event_id).unwrap().unwrap().tasks.is_empty());
    }

    #[test]
    fn add_task_checks_event_and_assignees_first() {
        let s = setup();

        assert!(matches!(
            add_task(&s.store, EventId::generate(), soda(vec![])),
            Err(MembershipError::NotFound(Resource::Event))
        ));
        assert!(matches!(
            add_task(&s.store, s.event_id, soda(vec![UserId::generate()])),
            Err(MembershipError::NotFound(Resource::User))
        ));
        assert!(s.store.get_event(s.event_id).unwrap().unwrap().tasks.is_empty());
    }

    #[test]
    fn remove_task_deletes_it() {
        let s = setup();
        let task = add_task(&s.store, s.event_id, soda(vec![])).unwrap();

        let remaining = remove_task(&s.store, s.event_id, task.task.id).unwrap();

        assert!(remaining.is_empty());
        assert_eq!(s.store.get_task(task.task.id).unwrap(), None);
    }

    #[test]
    fn remove_task_of_other_event() {
        let s = setup();
        let other_event = create_event(&s.store, s.admin, movienight())
            .unwrap()
            .event
            .id;
        let task = add_task(&s.store, other_event, soda(vec![])).unwrap();

        assert!(matches!(
            remove_task(&s.store, s.event_id, task.task.id),
            Err(MembershipError::NotInList(List::Tasks))
        ));
        assert!(s.store.get_task(task.task.id).unwrap().is_some());
    }

    #[test]
    fn task_lookup_is_scoped_to_event() {
        let s = setup();
        let other_event = create_event(&s.store, s.admin, movienight()).unwrap();
        let task = add_task(&s.store, other_event.event.id, soda(vec![])).unwrap();

        let event = s.store.get_event(s.event_id).unwrap().unwrap();

        assert!(matches!(
            get_task(&s.store, &event, task.task.id),
            Err(MembershipError::NotFound(Resource::Task))
        ));
    }

    #[test]
    fn update_task_toggles_done() {
        let s = setup();
        let task = add_task(&s.store, s.event_id, soda(vec![s.guest])).unwrap();
        let event = s.store.get_event(s.event_id).unwrap().unwrap();

        let changeset = UpdateTask {
            done: Some(true),
            ..Default::default()
        };
        let updated = update_task(&s.store, &event, task.task.id, changeset, None).unwrap();

        assert!(updated.task.done);
        assert_eq!(updated.task.name, "Bring Soda");
        assert_eq!(updated.assignees, vec![s.guest]);
    }

    #[test]
    fn update_task_replaces_assignees() {
        let s = setup();
        let task = add_task(&s.store, s.event_id, soda(vec![s.guest])).unwrap();
        let event = s.store.get_event(s.event_id).unwrap().unwrap();

        let updated = update_task(
            &s.store,
            &event,
            task.task.id,
            UpdateTask::default(),
            Some(vec![s.admin]),
        )
        .unwrap();

        assert_eq!(updated.assignees, vec![s.admin]);
    }

    #[test]
    fn update_event_fields() {
        let s = setup();

        let changeset = UpdateEvent {
            date: Some("Tuesday".into()),
            tags: Some(vec!["movie".into(), "movie".into(), "snacks".into()]),
            ..Default::default()
        };
        let event = update_event(&s.store, s.event_id, changeset).unwrap();

        assert_eq!(event.event.date, "Tuesday");
        assert_eq!(event.event.name, "movienight");
        assert_eq!(
            event.event.tags,
            vec!["movie".to_owned(), "snacks".to_owned()]
        );
    }

    #[test]
    fn friends_are_one_sided() {
        let s = setup();

        let admin = add_friend(&s.store, s.admin, s.guest).unwrap();

        assert_eq!(admin.friends, vec![s.guest]);
        assert!(s.store.get_user(s.guest).unwrap().unwrap().friends.is_empty());
        assert_eq!(get_friend(&s.store, &admin, s.guest).unwrap().id, s.guest);

        assert!(matches!(
            add_friend(&s.store, s.admin, s.guest),
            Err(MembershipError::AlreadyMember(Joinable::Friends))
        ));

        let remaining = remove_friend(&s.store, s.admin, s.guest).unwrap();
        assert!(remaining.is_empty());

        assert!(matches!(
            remove_friend(&s.store, s.admin, s.guest),
            Err(MembershipError::NotInList(List::Friends))
        ));
    }

    #[test]
    fn cannot_befriend_self() {
        let s = setup();

        assert!(matches!(
            add_friend(&s.store, s.admin, s.admin),
            Err(MembershipError::Forbidden(Denied::BefriendSelf))
        ));
    }
}
