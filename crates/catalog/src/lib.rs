use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::RwLock;
use sqlx::{Row, SqlitePool};
use wayfinder_core::HotelRecord;

/// Read-mostly view over the hotel inventory.
///
/// `list_cities` returns the distinct set of locations sorted ascending, case
/// as stored. `hotels_by_location` matches location by case-insensitive exact
/// equality, never substring. Any store-level failure surfaces as `Err` here
/// and is recovered into degraded reply text by the caller.
pub trait HotelInventory: Send + Sync {
    async fn list_cities(&self) -> Result<Vec<String>>;
    async fn hotels_by_location(&self, location: &str) -> Result<Vec<HotelRecord>>;
    async fn upsert_hotel(&self, record: HotelRecord) -> Result<()>;
}

#[derive(Clone, Default)]
pub struct MemoryCatalog {
    hotels: Arc<RwLock<HashMap<String, HotelRecord>>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HotelInventory for MemoryCatalog {
    async fn list_cities(&self) -> Result<Vec<String>> {
        let cities: BTreeSet<String> = self
            .hotels
            .read()
            .values()
            .map(|hotel| hotel.location.clone())
            .collect();

        Ok(cities.into_iter().collect())
    }

    async fn hotels_by_location(&self, location: &str) -> Result<Vec<HotelRecord>> {
        let wanted = location.to_lowercase();
        let mut hotels: Vec<HotelRecord> = self
            .hotels
            .read()
            .values()
            .filter(|hotel| hotel.location.to_lowercase() == wanted)
            .cloned()
            .collect();

        hotels.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(hotels)
    }

    async fn upsert_hotel(&self, record: HotelRecord) -> Result<()> {
        self.hotels.write().insert(record.name.clone(), record);
        Ok(())
    }
}

#[derive(Clone)]
pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .with_context(|| format!("failed connecting to sqlite at {}", database_url))?;

        let catalog = Self { pool };
        catalog.ensure_schema().await?;
        Ok(catalog)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS hotels (
              name TEXT PRIMARY KEY,
              location TEXT NOT NULL,
              price_tier TEXT NOT NULL,
              checkin_date TEXT NOT NULL,
              checkout_date TEXT NOT NULL,
              booked INTEGER NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

impl HotelInventory for SqliteCatalog {
    async fn list_cities(&self) -> Result<Vec<String>> {
        // One pooled connection per call, released on every exit path.
        let mut conn = self.pool.acquire().await?;

        let rows = sqlx::query("SELECT DISTINCT location FROM hotels ORDER BY location")
            .fetch_all(&mut *conn)
            .await?;

        Ok(rows.into_iter().map(|row| row.get("location")).collect())
    }

    async fn hotels_by_location(&self, location: &str) -> Result<Vec<HotelRecord>> {
        let mut conn = self.pool.acquire().await?;

        let rows = sqlx::query(
            r#"
            SELECT name, location, price_tier, checkin_date, checkout_date, booked
            FROM hotels
            WHERE LOWER(location) = LOWER(?1)
            ORDER BY name
            "#,
        )
        .bind(location)
        .fetch_all(&mut *conn)
        .await?;

        let hotels = rows
            .into_iter()
            .map(|row| HotelRecord {
                name: row.get("name"),
                location: row.get("location"),
                price_tier: row.get("price_tier"),
                checkin_date: row.get("checkin_date"),
                checkout_date: row.get("checkout_date"),
                booked: row.get("booked"),
            })
            .collect();

        Ok(hotels)
    }

    async fn upsert_hotel(&self, record: HotelRecord) -> Result<()> {
        let mut conn = self.pool.acquire().await?;

        sqlx::query(
            r#"
            INSERT INTO hotels (name, location, price_tier, checkin_date, checkout_date, booked)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(name) DO UPDATE SET
              location=excluded.location,
              price_tier=excluded.price_tier,
              checkin_date=excluded.checkin_date,
              checkout_date=excluded.checkout_date,
              booked=excluded.booked
            "#,
        )
        .bind(&record.name)
        .bind(&record.location)
        .bind(&record.price_tier)
        .bind(record.checkin_date)
        .bind(record.checkout_date)
        .bind(record.booked)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}

#[derive(Clone)]
pub enum Store {
    Memory(MemoryCatalog),
    Sqlite(SqliteCatalog),
}

impl Store {
    pub fn memory() -> Self {
        Self::Memory(MemoryCatalog::new())
    }

    pub async fn sqlite(database_url: &str) -> Result<Self> {
        let sqlite = SqliteCatalog::connect(database_url).await?;
        Ok(Self::Sqlite(sqlite))
    }
}

impl HotelInventory for Store {
    async fn list_cities(&self) -> Result<Vec<String>> {
        match self {
            Store::Memory(catalog) => catalog.list_cities().await,
            Store::Sqlite(catalog) => catalog.list_cities().await,
        }
    }

    async fn hotels_by_location(&self, location: &str) -> Result<Vec<HotelRecord>> {
        match self {
            Store::Memory(catalog) => catalog.hotels_by_location(location).await,
            Store::Sqlite(catalog) => catalog.hotels_by_location(location).await,
        }
    }

    async fn upsert_hotel(&self, record: HotelRecord) -> Result<()> {
        match self {
            Store::Memory(catalog) => catalog.upsert_hotel(record).await,
            Store::Sqlite(catalog) => catalog.upsert_hotel(record).await,
        }
    }
}
