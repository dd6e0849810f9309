use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use crate::types::{Restaurant, RestaurantForm, Rid};

pub type Db = Pool<Sqlite>;

// AUTOINCREMENT so a deleted id is never handed out again
pub const TABLE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS restaurants (
	id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
	name TEXT NOT NULL,
	location TEXT NOT NULL,
	price_range INTEGER NOT NULL,
	CHECK(price_range BETWEEN 1 AND 5)
);
"#;

const INSERT_RESTAURANT: &str = r#"
INSERT INTO restaurants
	(name, location, price_range)
VALUES
	(?, ?, ?)
RETURNING
	id, name, location, price_range;
"#;

const SELECT_RESTAURANTS: &str = r#"
SELECT
	id, name, location, price_range
FROM
	restaurants;
"#;

const SELECT_RESTAURANT: &str = r#"
SELECT
	id, name, location, price_range
FROM
	restaurants
WHERE
	(id == ?);
"#;

const UPDATE_RESTAURANT: &str = r#"
UPDATE restaurants SET
	(name, location, price_range) = (?, ?, ?)
WHERE
	(id == ?)
RETURNING
	id, name, location, price_range;
"#;

const DELETE_RESTAURANT: &str = r#"
DELETE FROM restaurants
WHERE
	(id == ?);
"#;

pub async fn open(url: &str, max_connections: u32) -> Result<Db, sqlx::Error> {
	let options = SqliteConnectOptions::from_str(url)?
		.create_if_missing(true);

	SqlitePoolOptions::new()
		.max_connections(max_connections)
		.acquire_timeout(Duration::from_secs(3))
		.connect_with(options).await
}

pub async fn migrate(db: &Db) -> Result<(), sqlx::Error> {
	sqlx::query(TABLE_SCHEMA).execute(db).await?;
	Ok(())
}

pub async fn insert_restaurant(db: &Db, form: &RestaurantForm) -> Result<Restaurant, sqlx::Error> {
	sqlx::query_as::<_, Restaurant>(INSERT_RESTAURANT)
		.bind(form.name.as_deref())
		.bind(form.location.as_deref())
		.bind(form.price_range)
		.fetch_one(db).await
}

pub async fn select_restaurants(db: &Db) -> Result<Vec<Restaurant>, sqlx::Error> {
	sqlx::query_as::<_, Restaurant>(SELECT_RESTAURANTS)
		.fetch_all(db).await
}

pub async fn select_restaurant(db: &Db, id: Rid) -> Result<Option<Restaurant>, sqlx::Error> {
	sqlx::query_as::<_, Restaurant>(SELECT_RESTAURANT)
		.bind(id)
		.fetch_optional(db).await
}

pub async fn update_restaurant(
	db: &Db,
	id: Rid,
	form: &RestaurantForm,
) -> Result<Option<Restaurant>, sqlx::Error> {
	sqlx::query_as::<_, Restaurant>(UPDATE_RESTAURANT)
		.bind(form.name.as_deref())
		.bind(form.location.as_deref())
		.bind(form.price_range)
		.bind(id)
		.fetch_optional(db).await
}

/// Returns how many rows went away, 0 when `id` never existed.
pub async fn delete_restaurant(db: &Db, id: Rid) -> Result<u64, sqlx::Error> {
	let done = sqlx::query(DELETE_RESTAURANT)
		.bind(id)
		.execute(db).await?;
	Ok(done.rows_affected())
}

#[cfg(test)]
pub async fn memory() -> Db {
	// one connection, every sqlite::memory: connection is its own database
	let db = open("sqlite::memory:", 1).await.unwrap();
	migrate(&db).await.unwrap();
	db
}

#[cfg(test)]
mod tests {
	use super::*;
	use sqlx::error::ErrorKind;

	fn form(name: &str, location: &str, price_range: i64) -> RestaurantForm {
		RestaurantForm {
			name: Some(name.to_string()),
			location: Some(location.to_string()),
			price_range: Some(price_range),
		}
	}

	fn kind(err: sqlx::Error) -> ErrorKind {
		match err {
			sqlx::Error::Database(db_err) => db_err.kind(),
			other => panic!("expected a database error, got {other:?}"),
		}
	}

	#[tokio::test]
	async fn migrate_twice_keeps_rows() {
		let db = memory().await;
		insert_restaurant(&db, &form("Pasta House", "Main St", 2)).await.unwrap();
		migrate(&db).await.unwrap();
		assert_eq!(select_restaurants(&db).await.unwrap().len(), 1);
	}

	#[tokio::test]
	async fn insert_assigns_fresh_ids() {
		let db = memory().await;
		let a = insert_restaurant(&db, &form("Pasta House", "Main St", 2)).await.unwrap();
		let b = insert_restaurant(&db, &form("Taco Stand", "Elm St", 1)).await.unwrap();
		assert_ne!(a.id, b.id);
		assert_eq!(select_restaurant(&db, a.id).await.unwrap(), Some(a));
	}

	#[tokio::test]
	async fn deleted_ids_are_not_reused() {
		let db = memory().await;
		let first = insert_restaurant(&db, &form("Pasta House", "Main St", 2)).await.unwrap();
		assert_eq!(delete_restaurant(&db, first.id).await.unwrap(), 1);
		let second = insert_restaurant(&db, &form("Pasta House", "Main St", 2)).await.unwrap();
		assert!(second.id > first.id);
	}

	#[tokio::test]
	async fn update_missing_row_is_none() {
		let db = memory().await;
		let updated = update_restaurant(&db, 42, &form("Ghost", "Nowhere", 1)).await.unwrap();
		assert!(updated.is_none());
	}

	#[tokio::test]
	async fn delete_missing_row_affects_nothing() {
		let db = memory().await;
		assert_eq!(delete_restaurant(&db, 42).await.unwrap(), 0);
	}

	#[tokio::test]
	async fn missing_name_violates_not_null() {
		let db = memory().await;
		let mut incomplete = form("", "Main St", 2);
		incomplete.name = None;
		let err = insert_restaurant(&db, &incomplete).await.unwrap_err();
		assert!(matches!(kind(err), ErrorKind::NotNullViolation));
	}

	#[tokio::test]
	async fn price_range_outside_tiers_violates_check() {
		let db = memory().await;
		for price_range in [0, 6] {
			let err = insert_restaurant(&db, &form("Pasta House", "Main St", price_range))
				.await
				.unwrap_err();
			assert!(matches!(kind(err), ErrorKind::CheckViolation));
		}
		assert!(select_restaurants(&db).await.unwrap().is_empty());
	}
}
