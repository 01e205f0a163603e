//! Settings table queries

use sqlx::{Row, SqlitePool};

use stowage_types::prelude::*;

fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

/// List all entries in insertion order
pub(crate) async fn list(db: &SqlitePool, table: &str) -> StResult<Vec<SettingEntry>> {
	let rows = sqlx::query(&format!("SELECT key, value FROM {} ORDER BY rowid", table))
		.fetch_all(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	let mut entries = Vec::with_capacity(rows.len());
	for row in rows {
		let key: String = row.try_get("key").inspect_err(inspect).or(Err(Error::DbError))?;
		let value: Option<String> =
			row.try_get("value").inspect_err(inspect).or(Err(Error::DbError))?;
		entries.push(SettingEntry::stored(key, value.unwrap_or_default()));
	}

	Ok(entries)
}

/// Read a single entry by key
pub(crate) async fn read(db: &SqlitePool, table: &str, key: &str) -> StResult<Option<SettingEntry>> {
	let row = sqlx::query(&format!("SELECT value FROM {} WHERE key = ?", table))
		.bind(key)
		.fetch_optional(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	match row {
		Some(row) => {
			let value: Option<String> =
				row.try_get("value").inspect_err(inspect).or(Err(Error::DbError))?;
			Ok(Some(SettingEntry::stored(key, value.unwrap_or_default())))
		}
		None => Ok(None),
	}
}

/// Insert a new entry
pub(crate) async fn create(db: &SqlitePool, table: &str, key: &str, value: &str) -> StResult<()> {
	let res = sqlx::query(&format!("INSERT INTO {} (key, value) VALUES (?, ?)", table))
		.bind(key)
		.bind(value)
		.execute(db)
		.await;

	match res {
		Ok(_) => Ok(()),
		Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
			Err(Error::ValidationError(format!("Setting '{}' already exists", key)))
		}
		Err(err) => {
			inspect(&err);
			Err(Error::DbError)
		}
	}
}

/// Update the value of an existing entry
pub(crate) async fn update(db: &SqlitePool, table: &str, key: &str, value: &str) -> StResult<()> {
	let res = sqlx::query(&format!("UPDATE {} SET value = ? WHERE key = ?", table))
		.bind(value)
		.bind(key)
		.execute(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}
	Ok(())
}

/// Delete an entry, missing keys are not an error
pub(crate) async fn delete(db: &SqlitePool, table: &str, key: &str) -> StResult<()> {
	sqlx::query(&format!("DELETE FROM {} WHERE key = ?", table))
		.bind(key)
		.execute(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	Ok(())
}

// vim: ts=4
