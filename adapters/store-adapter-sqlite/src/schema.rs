//! Database schema initialization
//!
//! Creating the table is what the schema-ready signal waits for in deferred
//! setups. Safe to run repeatedly.

use sqlx::SqlitePool;

/// Initialize the settings table
pub(crate) async fn init_db(db: &SqlitePool, table: &str) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	sqlx::query(&format!(
		"CREATE TABLE IF NOT EXISTS {} (
		key text NOT NULL,
		value text,
		PRIMARY KEY(key)
	)",
		table
	))
	.execute(&mut *tx)
	.await?;

	tx.commit().await?;
	Ok(())
}

/// Table names are interpolated into SQL, so only plain identifiers are allowed
pub(crate) fn is_valid_table_name(name: &str) -> bool {
	let mut chars = name.chars();
	match chars.next() {
		Some(c) if c.is_ascii_alphabetic() || c == '_' => {
			chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
		}
		_ => false,
	}
}


// vim: ts=4
