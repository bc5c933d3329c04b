//! Actor directory repository.
//!
//! Display names for the people acting on requests. The timeline only ever
//! reads names through [`XferService::actor_names`]; a missing actor is not
//! an error.

use std::collections::HashMap;

use xfer_core::entities::Actor;
use xfer_core::errors::CoreError;

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, get_opt_string, parse_datetime};
use crate::service::XferService;

const SELECT_COLS: &str = "id, display_name, role, created_at";

fn row_to_actor(row: &libsql::Row) -> Result<Actor, DatabaseError> {
    Ok(Actor {
        id: row.get(0)?,
        display_name: row.get(1)?,
        role: get_opt_string(row, 2)?,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
    })
}

impl XferService {
    /// Add an actor to the directory.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Core` for a blank name, or `DatabaseError`
    /// if the insert fails.
    pub async fn register_actor(
        &self,
        display_name: &str,
        role: Option<&str>,
    ) -> Result<Actor, DatabaseError> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(CoreError::Validation("actor display name must not be empty".into()).into());
        }

        let now = self.now();
        self.db()
            .conn()
            .execute(
                "INSERT INTO actors (display_name, role, created_at) VALUES (?1, ?2, ?3)",
                libsql::params![display_name, role, format_datetime(now)],
            )
            .await?;

        Ok(Actor {
            id: self.db().conn().last_insert_rowid(),
            display_name: display_name.to_string(),
            role: role.map(str::to_string),
            created_at: now,
        })
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn get_actor(&self, id: i64) -> Result<Option<Actor>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM actors WHERE id = ?1"),
                [id],
            )
            .await?;

        rows.next().await?.map(|row| row_to_actor(&row)).transpose()
    }

    /// Display names for the given actor ids. Unknown ids are simply absent.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn actor_names(&self, ids: &[i64]) -> Result<HashMap<i64, String>, DatabaseError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = (1..=ids.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let params: Vec<libsql::Value> = ids.iter().map(|&id| libsql::Value::Integer(id)).collect();

        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT id, display_name FROM actors WHERE id IN ({placeholders})"),
                libsql::params_from_iter(params),
            )
            .await?;

        let mut names = HashMap::new();
        while let Some(row) = rows.next().await? {
            names.insert(row.get::<i64>(0)?, row.get::<String>(1)?);
        }
        Ok(names)
    }
}
