//! SQLite-backed settings store
//!
//! Entries live in a single `(key, value)` table. The table name can be
//! chosen, so several independent settings sets can share one database file.

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};
use std::path::Path;

use stowage_types::notify::SavedNotifier;
use stowage_types::prelude::*;
use stowage_types::store_adapter::SettingsStore;

mod schema;
mod setting;

pub const DEFAULT_TABLE: &str = "settings";

#[derive(Debug)]
pub struct StoreAdapterSqlite {
	db: SqlitePool,
	table: Box<str>,
	saved: SavedNotifier,
}

impl StoreAdapterSqlite {
	/// Open the database and make sure the default table exists
	pub async fn new(path: impl AsRef<Path>) -> StResult<Self> {
		let adapter = Self::connect(path).await?;
		adapter.migrate().await?;
		Ok(adapter)
	}

	/// Open the database without touching the schema
	///
	/// Call `migrate()` before the first query.
	pub async fn connect(path: impl AsRef<Path>) -> StResult<Self> {
		let opts = sqlite::SqliteConnectOptions::new()
			.filename(path.as_ref())
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(|err| warn!("DbError: {:#?}", err))
			.or(Err(Error::DbError))?;

		Ok(Self { db, table: DEFAULT_TABLE.into(), saved: SavedNotifier::new() })
	}

	/// Use another table for all queries
	pub fn with_table(mut self, table: &str) -> StResult<Self> {
		if !schema::is_valid_table_name(table) {
			return Err(Error::ConfigError(format!("Invalid settings table name: '{}'", table)));
		}
		self.table = table.into();
		Ok(self)
	}

	pub fn table(&self) -> &str {
		&self.table
	}

	/// Create the settings table if it does not exist yet
	pub async fn migrate(&self) -> StResult<()> {
		schema::init_db(&self.db, &self.table)
			.await
			.inspect_err(|err| warn!("DbError: {:#?}", err))
			.or(Err(Error::DbError))?;
		info!("Settings table '{}' ready", self.table);
		Ok(())
	}
}

#[async_trait]
impl SettingsStore for StoreAdapterSqlite {
	async fn list_settings(&self) -> StResult<Vec<SettingEntry>> {
		setting::list(&self.db, &self.table).await
	}

	async fn read_setting(&self, key: &str) -> StResult<Option<SettingEntry>> {
		setting::read(&self.db, &self.table, key).await
	}

	async fn create_setting(&self, entry: &SettingEntry) -> StResult<()> {
		setting::create(&self.db, &self.table, &entry.key, &entry.value).await?;
		self.saved.notify(&SettingEntry::stored(entry.key.clone(), entry.value.clone()));
		Ok(())
	}

	async fn update_setting(&self, entry: &SettingEntry) -> StResult<()> {
		setting::update(&self.db, &self.table, &entry.key, &entry.value).await?;
		self.saved.notify(&SettingEntry::stored(entry.key.clone(), entry.value.clone()));
		Ok(())
	}

	async fn delete_setting(&self, key: &str) -> StResult<()> {
		setting::delete(&self.db, &self.table, key).await
	}

	fn subscribe_saved(&self) -> flume::Receiver<SettingEntry> {
		self.saved.subscribe()
	}
}

// vim: ts=4
