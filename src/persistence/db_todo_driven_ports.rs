use crate::domain;
use crate::domain::todo::{StoredToDo, ToDoFields};
use crate::external_connections::ConnectionHandle;
use anyhow::{Context, Error};
use futures::{StreamExt, TryStreamExt};
use sqlx::{query, query_as};

pub struct DbToDoReader;

#[derive(sqlx::FromRow)]
struct ToDoRow {
    id: i64,
    title: String,
    description: String,
    reminder: chrono::DateTime<chrono::Utc>,
}

impl From<ToDoRow> for StoredToDo {
    fn from(value: ToDoRow) -> Self {
        StoredToDo {
            id: value.id,
            title: value.title,
            description: value.description,
            reminder: value.reminder,
        }
    }
}

impl domain::todo::driven_ports::ToDoReader for DbToDoReader {
    async fn todos_with_id(
        &self,
        id: i64,
        cxn: &mut impl ConnectionHandle,
    ) -> Result<Vec<StoredToDo>, Error> {
        let todos: Vec<StoredToDo> = query_as::<_, ToDoRow>(
            "SELECT id, title, description, reminder FROM todo WHERE id = $1",
        )
        .bind(id)
        .fetch(cxn.borrow_connection())
        .take(2)
        .map_ok(StoredToDo::from)
        .try_collect()
        .await
        .context("trying to fetch a todo by ID")?;

        Ok(todos)
    }

    async fn all_todos(&self, cxn: &mut impl ConnectionHandle) -> Result<Vec<StoredToDo>, Error> {
        let todos: Vec<StoredToDo> =
            query_as::<_, ToDoRow>("SELECT id, title, description, reminder FROM todo")
                .fetch_all(cxn.borrow_connection())
                .await
                .context("trying to fetch every todo")?
                .into_iter()
                .map(StoredToDo::from)
                .collect();

        Ok(todos)
    }
}

pub struct DbToDoWriter;

impl domain::todo::driven_ports::ToDoWriter for DbToDoWriter {
    async fn insert_todo(
        &self,
        fields: &ToDoFields<'_>,
        cxn: &mut impl ConnectionHandle,
    ) -> Result<i64, Error> {
        let new_id = query_as::<_, super::NewId>(
            "INSERT INTO todo(title, description, reminder) VALUES ($1, $2, $3) RETURNING todo.id",
        )
        .bind(fields.title)
        .bind(fields.description)
        .bind(fields.reminder)
        .fetch_one(cxn.borrow_connection())
        .await
        .context("trying to insert a new todo into the database")?;

        Ok(new_id.id)
    }

    async fn update_todo(
        &self,
        id: i64,
        fields: &ToDoFields<'_>,
        cxn: &mut impl ConnectionHandle,
    ) -> Result<u64, Error> {
        let result =
            query("UPDATE todo SET title = $1, description = $2, reminder = $3 WHERE id = $4")
                .bind(fields.title)
                .bind(fields.description)
                .bind(fields.reminder)
                .bind(id)
                .execute(cxn.borrow_connection())
                .await
                .context("trying to update a todo in the database")?;

        Ok(result.rows_affected())
    }

    async fn delete_todo(&self, id: i64, cxn: &mut impl ConnectionHandle) -> Result<u64, Error> {
        let result = query("DELETE FROM todo WHERE id = $1")
            .bind(id)
            .execute(cxn.borrow_connection())
            .await
            .context("trying to remove a todo from the database")?;

        Ok(result.rows_affected())
    }
}
