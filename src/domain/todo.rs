use crate::domain::ToDoError;
use crate::domain::timestamp::{self, Timestamp};
use crate::domain::todo::driven_ports::{ToDoReader, ToDoWriter};
use crate::external_connections::ExternalConnectivity;
use anyhow::anyhow;
use chrono::{DateTime, Utc};
use tracing::error;

/// The API version this service implements
pub const API_VERSION: &str = "v1";

/// A to-do item as callers see it, with its reminder in wire form
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct ToDoItem {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub reminder: Option<Timestamp>,
}

/// A to-do item which has not been assigned an ID yet
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct NewToDo {
    pub title: String,
    pub description: String,
    pub reminder: Option<Timestamp>,
}

/// A to-do row as the store keeps it
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct StoredToDo {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub reminder: DateTime<Utc>,
}

/// The mutable columns of a to-do row, ready to be written to the store
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct ToDoFields<'data> {
    pub title: &'data str,
    pub description: &'data str,
    pub reminder: DateTime<Utc>,
}

pub mod driven_ports {
    use super::*;
    use crate::external_connections::ConnectionHandle;

    pub trait ToDoReader {
        /// Fetches rows with the given ID. Implementations pull at most two rows,
        /// which is enough for the caller to detect duplicated IDs.
        async fn todos_with_id(
            &self,
            id: i64,
            cxn: &mut impl ConnectionHandle,
        ) -> Result<Vec<StoredToDo>, anyhow::Error>;

        /// Fetches every row in the store's natural scan order
        async fn all_todos(
            &self,
            cxn: &mut impl ConnectionHandle,
        ) -> Result<Vec<StoredToDo>, anyhow::Error>;
    }

    pub trait ToDoWriter {
        /// Inserts a row and returns its generated ID
        async fn insert_todo(
            &self,
            fields: &ToDoFields<'_>,
            cxn: &mut impl ConnectionHandle,
        ) -> Result<i64, anyhow::Error>;

        /// Overwrites the row with the given ID, returning the number of rows affected
        async fn update_todo(
            &self,
            id: i64,
            fields: &ToDoFields<'_>,
            cxn: &mut impl ConnectionHandle,
        ) -> Result<u64, anyhow::Error>;

        /// Removes the row with the given ID, returning the number of rows affected
        async fn delete_todo(
            &self,
            id: i64,
            cxn: &mut impl ConnectionHandle,
        ) -> Result<u64, anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;

    pub trait ToDoPort {
        async fn create(
            &self,
            api: &str,
            new_todo: &NewToDo,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::ToDoWriter,
        ) -> Result<i64, ToDoError>;
        async fn read(
            &self,
            api: &str,
            id: i64,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_read: &impl driven_ports::ToDoReader,
        ) -> Result<ToDoItem, ToDoError>;
        async fn update(
            &self,
            api: &str,
            todo: &ToDoItem,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::ToDoWriter,
        ) -> Result<u64, ToDoError>;
        async fn delete(
            &self,
            api: &str,
            id: i64,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_write: &impl driven_ports::ToDoWriter,
        ) -> Result<u64, ToDoError>;
        async fn read_all(
            &self,
            api: &str,
            ext_cxn: &mut impl ExternalConnectivity,
            todo_read: &impl driven_ports::ToDoReader,
        ) -> Result<Vec<ToDoItem>, ToDoError>;
    }
}

/// Rejects calls declaring an API version other than the one this service implements.
/// An empty version opts out of the check.
pub fn check_api(api: &str) -> Result<(), ToDoError> {
    if api.is_empty() || api == API_VERSION {
        return Ok(());
    }

    Err(ToDoError::UnsupportedApi {
        requested: api.to_owned(),
        supported: API_VERSION,
    })
}

/// Checks out one connection for the duration of a single call
async fn connect<C: ExternalConnectivity>(
    ext_cxn: &mut C,
) -> Result<C::DbHandle<'_>, ToDoError> {
    ext_cxn
        .database_cxn()
        .await
        .map_err(ToDoError::StoreUnavailable)
}

fn native_reminder(reminder: Option<&Timestamp>) -> Result<DateTime<Utc>, ToDoError> {
    timestamp::require_native(reminder).map_err(|cause| ToDoError::InvalidField {
        field: "reminder",
        cause,
    })
}

fn item_from_stored(stored: StoredToDo) -> Result<ToDoItem, ToDoError> {
    let reminder = Timestamp::from_native(&stored.reminder).map_err(|err| {
        ToDoError::store_failure(
            &format!("decode the reminder of ToDo {}", stored.id),
            anyhow::Error::new(err),
        )
    })?;

    Ok(ToDoItem {
        id: stored.id,
        title: stored.title,
        description: stored.description,
        reminder: Some(reminder),
    })
}

/// Stateless implementation of the to-do operations. Each call checks out its own
/// connection and issues a single statement against the store.
pub struct ToDoService {}

impl driving_ports::ToDoPort for ToDoService {
    #[tracing::instrument(skip_all)]
    async fn create(
        &self,
        api: &str,
        new_todo: &NewToDo,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl ToDoWriter,
    ) -> Result<i64, ToDoError> {
        check_api(api)?;
        let mut cxn = connect(&mut *ext_cxn).await?;

        let fields = ToDoFields {
            title: &new_todo.title,
            description: &new_todo.description,
            reminder: native_reminder(new_todo.reminder.as_ref())?,
        };
        let created_id = todo_write
            .insert_todo(&fields, &mut cxn)
            .await
            .map_err(|err| ToDoError::store_failure("insert into ToDo", err))?;

        Ok(created_id)
    }

    #[tracing::instrument(skip(self, ext_cxn, todo_read))]
    async fn read(
        &self,
        api: &str,
        id: i64,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_read: &impl ToDoReader,
    ) -> Result<ToDoItem, ToDoError> {
        check_api(api)?;
        let mut cxn = connect(&mut *ext_cxn).await?;

        let mut rows = todo_read
            .todos_with_id(id, &mut cxn)
            .await
            .map_err(|err| ToDoError::store_failure("select from ToDo", err))?
            .into_iter();

        let Some(first_row) = rows.next() else {
            return Err(ToDoError::NotFound(id));
        };
        let item = item_from_stored(first_row)?;

        if rows.next().is_some() {
            error!("Data integrity violation: multiple ToDo rows share id {id}");
            return Err(ToDoError::store_failure(
                "read ToDo",
                anyhow!("found multiple ToDo rows for id {id}"),
            ));
        }

        Ok(item)
    }

    #[tracing::instrument(skip_all, fields(id = todo.id))]
    async fn update(
        &self,
        api: &str,
        todo: &ToDoItem,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl ToDoWriter,
    ) -> Result<u64, ToDoError> {
        check_api(api)?;
        let mut cxn = connect(&mut *ext_cxn).await?;

        let fields = ToDoFields {
            title: &todo.title,
            description: &todo.description,
            reminder: native_reminder(todo.reminder.as_ref())?,
        };
        let updated = todo_write
            .update_todo(todo.id, &fields, &mut cxn)
            .await
            .map_err(|err| ToDoError::store_failure("update ToDo", err))?;

        if updated == 0 {
            return Err(ToDoError::NotFound(todo.id));
        }

        Ok(updated)
    }

    #[tracing::instrument(skip(self, ext_cxn, todo_write))]
    async fn delete(
        &self,
        api: &str,
        id: i64,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_write: &impl ToDoWriter,
    ) -> Result<u64, ToDoError> {
        check_api(api)?;
        let mut cxn = connect(&mut *ext_cxn).await?;

        let deleted = todo_write
            .delete_todo(id, &mut cxn)
            .await
            .map_err(|err| ToDoError::store_failure("delete ToDo", err))?;

        if deleted == 0 {
            return Err(ToDoError::NotFound(id));
        }

        Ok(deleted)
    }

    #[tracing::instrument(skip_all)]
    async fn read_all(
        &self,
        api: &str,
        ext_cxn: &mut impl ExternalConnectivity,
        todo_read: &impl ToDoReader,
    ) -> Result<Vec<ToDoItem>, ToDoError> {
        check_api(api)?;
        let mut cxn = connect(&mut *ext_cxn).await?;

        let rows = todo_read
            .all_todos(&mut cxn)
            .await
            .map_err(|err| ToDoError::store_failure("get ToDo list", err))?;

        rows.into_iter().map(item_from_stored).collect()
    }
}
