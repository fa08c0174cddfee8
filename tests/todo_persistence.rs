mod test_util;

use speculoos::prelude::*;
use todo_service::domain::timestamp::Timestamp;
use todo_service::domain::todo::driving_ports::ToDoPort;
use todo_service::domain::todo::{NewToDo, ToDoItem, ToDoService};
use todo_service::domain::{ErrorKind, ToDoError};
use todo_service::persistence::ExternalConnectivity;
use todo_service::persistence::db_todo_driven_ports::{DbToDoReader, DbToDoWriter};

/// 2024-01-01T09:00:00Z
const NINE_AM_NEW_YEARS: i64 = 1_704_099_600;

fn reminder(seconds: i64, nanos: i32) -> Option<Timestamp> {
    Some(Timestamp { seconds, nanos })
}

fn buy_milk() -> NewToDo {
    NewToDo {
        title: "Buy milk".to_owned(),
        description: "2%".to_owned(),
        reminder: reminder(NINE_AM_NEW_YEARS, 0),
    }
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn create_read_delete_read() {
    test_util::prepare_db_and_test(|db| async move {
        let mut ext_cxn = ExternalConnectivity::new(db);
        let service = ToDoService {};

        let created_id = service
            .create("v1", &buy_milk(), &mut ext_cxn, &DbToDoWriter)
            .await
            .expect("create should succeed");

        let read_result = service
            .read("v1", created_id, &mut ext_cxn, &DbToDoReader)
            .await;
        assert_that!(read_result).is_ok_containing(ToDoItem {
            id: created_id,
            title: "Buy milk".to_owned(),
            description: "2%".to_owned(),
            reminder: reminder(NINE_AM_NEW_YEARS, 0),
        });

        let delete_result = service
            .delete("v1", created_id, &mut ext_cxn, &DbToDoWriter)
            .await;
        assert_that!(delete_result).is_ok_containing(1);

        let reread_result = service
            .read("v1", created_id, &mut ext_cxn, &DbToDoReader)
            .await;
        let Err(ToDoError::NotFound(missing_id)) = reread_result else {
            panic!("Did not get expected error, instead got this: {reread_result:#?}");
        };
        assert_eq!(created_id, missing_id);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn reminders_round_trip_at_microsecond_resolution() {
    test_util::prepare_db_and_test(|db| async move {
        let mut ext_cxn = ExternalConnectivity::new(db);
        let service = ToDoService {};
        let precise = NewToDo {
            reminder: reminder(NINE_AM_NEW_YEARS, 123_456_789),
            ..buy_milk()
        };

        let created_id = service
            .create("", &precise, &mut ext_cxn, &DbToDoWriter)
            .await
            .expect("create should succeed");
        let item = service
            .read("", created_id, &mut ext_cxn, &DbToDoReader)
            .await
            .expect("read should succeed");

        assert_eq!(reminder(NINE_AM_NEW_YEARS, 123_456_000), item.reminder);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn update_overwrites_and_reports_missing_rows() {
    test_util::prepare_db_and_test(|db| async move {
        let mut ext_cxn = ExternalConnectivity::new(db);
        let service = ToDoService {};
        let created_id = service
            .create("v1", &buy_milk(), &mut ext_cxn, &DbToDoWriter)
            .await
            .expect("create should succeed");
        let replacement = ToDoItem {
            id: created_id,
            title: "Buy oat milk".to_owned(),
            description: String::new(),
            reminder: reminder(NINE_AM_NEW_YEARS + 3_600, 0),
        };

        let update_result = service
            .update("v1", &replacement, &mut ext_cxn, &DbToDoWriter)
            .await;
        assert_that!(update_result).is_ok_containing(1);
        let read_result = service
            .read("v1", created_id, &mut ext_cxn, &DbToDoReader)
            .await;
        assert_that!(read_result).is_ok_containing(replacement.clone());

        let missing = ToDoItem {
            id: created_id + 100,
            ..replacement
        };
        let missing_result = service
            .update("v1", &missing, &mut ext_cxn, &DbToDoWriter)
            .await;
        assert_that!(missing_result)
            .is_err()
            .matches(|err| err.kind() == ErrorKind::NotFound);
    });
}

#[test]
#[cfg_attr(not(feature = "integration_test"), ignore)]
fn read_all_reflects_creates_and_deletes() {
    test_util::prepare_db_and_test(|db| async move {
        let mut ext_cxn = ExternalConnectivity::new(db);
        let service = ToDoService {};
        let mut created_ids = Vec::new();
        for idx in 0..4 {
            let todo = NewToDo {
                title: format!("Task {idx}"),
                ..buy_milk()
            };
            created_ids.push(
                service
                    .create("v1", &todo, &mut ext_cxn, &DbToDoWriter)
                    .await
                    .expect("create should succeed"),
            );
        }
        service
            .delete("v1", created_ids[1], &mut ext_cxn, &DbToDoWriter)
            .await
            .expect("delete should succeed");

        let mut todos = service
            .read_all("v1", &mut ext_cxn, &DbToDoReader)
            .await
            .expect("read all should succeed");
        todos.sort_by_key(|todo| todo.id);

        let titles: Vec<&str> = todos.iter().map(|todo| todo.title.as_str()).collect();
        assert_eq!(vec!["Task 0", "Task 2", "Task 3"], titles);
    });
}
