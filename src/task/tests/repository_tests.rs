//! Repository tests for task indexing, queries, statistics and write-through.

use std::sync::Arc;

use crate::storage::{
    EntityStore, InMemoryStore, StorageError, TASKS_KEY, ports::MockEntityStore,
};
use crate::task::domain::{
    NewTask, TaskCategory, TaskDomainError, TaskId, TaskPriority, TaskStatus, TaskUpdate,
};
use crate::task::query::TaskFilter;
use crate::task::repository::{TaskRepository, TaskRepositoryError};
use crate::test_support::FixedClock;
use crate::user::domain::UserId;
use chrono::Duration;
use rstest::{fixture, rstest};
use serde_json::json;

type TestRepository = TaskRepository<InMemoryStore, FixedClock>;

#[fixture]
fn store() -> InMemoryStore {
    InMemoryStore::new()
}

#[fixture]
fn repo(store: InMemoryStore) -> TestRepository {
    TaskRepository::load(Arc::new(store), Arc::new(FixedClock::noon()))
}

fn now() -> chrono::DateTime<chrono::Utc> {
    FixedClock::noon().0
}

#[rstest]
fn find_by_id_returns_none_for_unknown_id(repo: TestRepository) {
    assert_eq!(repo.find_by_id(TaskId::new()).expect("lookup"), None);
}

#[rstest]
fn find_by_owner_counts_each_owner_separately(repo: TestRepository) {
    let (first, second) = (UserId::new(), UserId::new());
    for index in 0..3 {
        repo.create(NewTask::new(format!("first {index}"), first))
            .expect("create");
    }
    for index in 0..2 {
        repo.create(NewTask::new(format!("second {index}"), second))
            .expect("create");
    }

    assert_eq!(repo.find_by_owner(first).expect("query").len(), 3);
    assert_eq!(repo.find_by_owner(second).expect("query").len(), 2);
    assert_eq!(repo.find_all().expect("query").len(), 5);
}

#[rstest]
fn equality_finders_match_single_fields(repo: TestRepository) {
    let owner = UserId::new();
    let assignee = UserId::new();
    repo.create(
        NewTask::new("Gym", owner)
            .with_category("health")
            .with_priority("low")
            .with_assignee(assignee),
    )
    .expect("create");
    repo.create(NewTask::new("Budget", owner).with_category("finance"))
        .expect("create");

    assert_eq!(repo.find_by_assignee(assignee).expect("query").len(), 1);
    assert_eq!(repo.find_by_category(TaskCategory::Finance).expect("query").len(), 1);
    assert_eq!(repo.find_by_priority(TaskPriority::Low).expect("query").len(), 1);
    assert_eq!(repo.find_by_status(TaskStatus::Pending).expect("query").len(), 2);
}

#[rstest]
fn find_overdue_skips_closed_and_future_tasks(repo: TestRepository) {
    let owner = UserId::new();
    let yesterday = now() - Duration::days(1);
    let late = repo
        .create(NewTask::new("late", owner).with_due_date(yesterday))
        .expect("create");
    let done = repo
        .create(NewTask::new("done", owner).with_due_date(yesterday))
        .expect("create");
    repo.update(done.id(), &TaskUpdate::new().with_status("completed"))
        .expect("update");
    repo.create(NewTask::new("future", owner).with_due_date(now() + Duration::days(1)))
        .expect("create");
    repo.create(NewTask::new("undated", owner)).expect("create");

    let overdue = repo.find_overdue().expect("query");

    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue.first().map(|task| task.id()), Some(late.id()));
}

#[rstest]
fn find_due_soon_honours_window(repo: TestRepository) {
    let owner = UserId::new();
    repo.create(NewTask::new("two days", owner).with_due_date(now() + Duration::days(2)))
        .expect("create");
    repo.create(NewTask::new("six days", owner).with_due_date(now() + Duration::days(6)))
        .expect("create");

    assert_eq!(repo.find_due_soon(3).expect("query").len(), 1);
    assert_eq!(repo.find_due_soon(7).expect("query").len(), 2);
}

#[rstest]
fn find_by_tag_and_search(repo: TestRepository) {
    let owner = UserId::new();
    repo.create(
        NewTask::new("Buy milk", owner)
            .with_description("Semi-skimmed")
            .with_tags(["Groceries".to_owned()]),
    )
    .expect("create");
    repo.create(NewTask::new("Call plumber", owner)).expect("create");

    assert_eq!(repo.find_by_tag("Groceries").expect("query").len(), 1);
    assert!(repo.find_by_tag("groceries").expect("query").is_empty());
    assert_eq!(repo.search("MILK").expect("search").len(), 1);
    assert_eq!(repo.search("skimmed").expect("search").len(), 1);
    assert_eq!(repo.search("grocer").expect("search").len(), 1);
    assert!(repo.search("dentist").expect("search").is_empty());
}

#[rstest]
fn filter_combines_options(repo: TestRepository) {
    let owner = UserId::new();
    repo.create(NewTask::new("a", owner).with_priority("high"))
        .expect("create");
    repo.create(NewTask::new("b", owner).with_priority("low"))
        .expect("create");
    repo.create(NewTask::new("c", UserId::new()).with_priority("high"))
        .expect("create");

    let filter = TaskFilter::new()
        .owned_by(owner)
        .with_priority(TaskPriority::High);

    let found = repo.filter(&filter).expect("filter");
    assert_eq!(found.len(), 1);
    assert_eq!(found.first().map(|task| task.title()), Some("a"));
}

#[rstest]
fn update_returns_none_for_unknown_id(repo: TestRepository) {
    let result = repo
        .update(TaskId::new(), &TaskUpdate::new().with_title("x"))
        .expect("update");
    assert_eq!(result, None);
}

#[rstest]
fn failed_update_leaves_task_untouched(repo: TestRepository) {
    let task = repo
        .create(NewTask::new("Original", UserId::new()))
        .expect("create");
    let update = TaskUpdate::new()
        .with_title("Renamed")
        .with_priority("critical");

    let result = repo.update(task.id(), &update);

    assert!(matches!(
        result,
        Err(TaskRepositoryError::Domain(TaskDomainError::InvalidPriority(ref value))) if value == "critical"
    ));
    let stored = repo.find_by_id(task.id()).expect("lookup");
    assert_eq!(stored, Some(task));
}

#[rstest]
fn explicit_null_due_date_clears_it(repo: TestRepository) {
    let task = repo
        .create(NewTask::new("Renew passport", UserId::new()).with_due_date(now() - Duration::days(1)))
        .expect("create");
    assert_eq!(repo.find_overdue().expect("overdue").len(), 1);

    let update: TaskUpdate =
        serde_json::from_value(json!({ "dueDate": null })).expect("valid update payload");
    let updated = repo
        .update(task.id(), &update)
        .expect("update")
        .expect("task exists");

    assert_eq!(updated.due_date(), None);
    assert!(repo.find_overdue().expect("overdue").is_empty());
}

#[rstest]
fn absent_due_date_key_keeps_it(repo: TestRepository) {
    let due = now() + Duration::days(2);
    let task = repo
        .create(NewTask::new("Renew passport", UserId::new()).with_due_date(due))
        .expect("create");

    let update: TaskUpdate =
        serde_json::from_value(json!({ "title": "Renew passport early" })).expect("valid update payload");
    let updated = repo
        .update(task.id(), &update)
        .expect("update")
        .expect("task exists");

    assert_eq!(updated.due_date(), Some(due));
}

#[rstest]
fn delete_reports_whether_task_existed(repo: TestRepository) {
    let task = repo
        .create(NewTask::new("Temporary", UserId::new()))
        .expect("create");

    assert!(repo.delete(task.id()).expect("delete"));
    assert!(!repo.delete(task.id()).expect("delete again"));
    assert_eq!(repo.find_by_id(task.id()).expect("lookup"), None);
}

#[rstest]
fn stats_zero_fill_every_enumerated_value(repo: TestRepository) {
    let owner = UserId::new();
    repo.create(NewTask::new("only", owner).with_priority("urgent"))
        .expect("create");

    let stats = repo.stats(None).expect("stats");

    assert_eq!(stats.total, 1);
    assert_eq!(stats.by_status.len(), TaskStatus::ALL.len());
    assert_eq!(stats.by_priority.len(), TaskPriority::ALL.len());
    assert_eq!(stats.by_category.len(), TaskCategory::ALL.len());
    assert_eq!(stats.priority_count(TaskPriority::Urgent), 1);
    assert_eq!(stats.priority_count(TaskPriority::Low), 0);
    assert_eq!(stats.status_count(TaskStatus::Blocked), 0);
    assert_eq!(stats.category_count(TaskCategory::Personal), 1);
}

#[rstest]
fn stats_can_be_scoped_to_an_owner(repo: TestRepository) {
    let owner = UserId::new();
    let done = repo.create(NewTask::new("done", owner)).expect("create");
    repo.update(done.id(), &TaskUpdate::new().with_status("completed"))
        .expect("update");
    repo.create(NewTask::new("late", owner).with_due_date(now() - Duration::days(1)))
        .expect("create");
    repo.create(NewTask::new("soon", owner).with_due_date(now() + Duration::days(1)))
        .expect("create");
    repo.create(NewTask::new("someone else", UserId::new()))
        .expect("create");

    let stats = repo.stats(Some(owner)).expect("stats");

    assert_eq!(stats.total, 3);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.overdue, 1);
    assert_eq!(stats.due_soon, 1);
    assert_eq!(repo.stats(None).expect("stats").total, 4);
}

#[rstest]
fn tasks_round_trip_through_storage(store: InMemoryStore) {
    let clock = Arc::new(FixedClock::noon());
    let first = TaskRepository::load(Arc::new(store.clone()), Arc::clone(&clock));
    let created = first
        .create(
            NewTask::new("Buy milk", UserId::new())
                .with_priority("high")
                .with_due_date(now() - Duration::days(1))
                .with_tags(["errand".to_owned()]),
        )
        .expect("create");
    let updated = first
        .update(created.id(), &TaskUpdate::new().with_note("2 litres"))
        .expect("update")
        .expect("task exists");

    let second = TaskRepository::load(Arc::new(store), clock);
    let reloaded = second
        .find_by_id(created.id())
        .expect("lookup")
        .expect("task should be reloaded");

    assert_eq!(reloaded, updated);
    assert!(reloaded.is_overdue_at(now()));
    assert_eq!(reloaded.days_until_due_at(now()), Some(-1));
}

#[rstest]
fn every_mutation_writes_the_whole_index(store: InMemoryStore) {
    let repo = TaskRepository::load(Arc::new(store.clone()), Arc::new(FixedClock::noon()));
    let saved_len = || {
        store
            .load(TASKS_KEY)
            .expect("load")
            .and_then(|value| value.as_array().map(Vec::len))
    };
    let owner = UserId::new();

    let first = repo.create(NewTask::new("one", owner)).expect("create");
    assert_eq!(saved_len(), Some(1));
    repo.create(NewTask::new("two", owner)).expect("create");
    assert_eq!(saved_len(), Some(2));
    repo.delete(first.id()).expect("delete");
    assert_eq!(saved_len(), Some(1));
}

#[rstest]
fn malformed_stored_tasks_start_empty() {
    let store = InMemoryStore::with_entry(TASKS_KEY, json!([{"title": 42}]));
    let repo = TaskRepository::load(Arc::new(store), Arc::new(FixedClock::noon()));

    assert!(repo.find_all().expect("query").is_empty());
}

#[rstest]
fn load_failure_starts_empty_and_writes_still_flow() {
    let mut store = MockEntityStore::new();
    store
        .expect_load()
        .times(1)
        .returning(|key| Err(StorageError::poisoned(key)));
    store.expect_save().times(1).returning(|_, _| Ok(()));
    let repo = TaskRepository::load(Arc::new(store), Arc::new(FixedClock::noon()));

    assert!(repo.find_all().expect("query").is_empty());
    repo.create(NewTask::new("after failure", UserId::new()))
        .expect("create should persist");
}

#[rstest]
fn failed_lookups_do_not_write() {
    let mut store = MockEntityStore::new();
    store.expect_load().returning(|_| Ok(None));
    store.expect_save().never();
    let repo = TaskRepository::load(Arc::new(store), Arc::new(FixedClock::noon()));

    assert!(!repo.delete(TaskId::new()).expect("delete"));
    assert_eq!(
        repo.update(TaskId::new(), &TaskUpdate::new()).expect("update"),
        None
    );
}
