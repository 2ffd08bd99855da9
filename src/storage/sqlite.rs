use crate::model::{Listing, StorageError};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        Self::with_connection(Connection::open(db_path)?)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS listings (
                external_id TEXT PRIMARY KEY,
                source TEXT NOT NULL,
                link TEXT NOT NULL,
                year INTEGER NOT NULL,
                price REAL NOT NULL,
                mileage REAL NOT NULL,
                original_title TEXT NOT NULL DEFAULT '',
                processed_title TEXT NOT NULL DEFAULT '',
                brand TEXT NOT NULL DEFAULT 'UNKNOWN',
                series TEXT NOT NULL DEFAULT '其他',
                location TEXT NOT NULL DEFAULT '',
                crawled_at TEXT NOT NULL
            );
            ",
        )?;

        Ok(Self { conn })
    }

    /// Saves a listing, replacing any previous row with the same external_id.
    /// Re-running a crawl is therefore idempotent.
    pub fn upsert_listing(&self, listing: &Listing) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO listings (
                external_id, source, link, year, price, mileage,
                original_title, processed_title, brand, series,
                location, crawled_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                &listing.external_id,
                &listing.source,
                &listing.link,
                &listing.year,
                &listing.price,
                &listing.mileage,
                &listing.original_title,
                &listing.processed_title,
                &listing.brand,
                &listing.series,
                &listing.location,
                &listing.crawled_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_listing(&self, external_id: &str) -> Result<Option<Listing>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT external_id, source, link, year, price, mileage,
                    original_title, processed_title, brand, series,
                    location, crawled_at
             FROM listings WHERE external_id = ?1",
        )?;

        let mut rows = stmt.query(params![external_id])?;
        match rows.next()? {
            Some(row) => Ok(Some(Self::map_listing(row)?)),
            None => Ok(None),
        }
    }

    pub fn count_listings(&self) -> Result<i64, StorageError> {
        let count =
            self.conn
                .query_row("SELECT COUNT(*) FROM listings", [], |row| row.get(0))?;
        Ok(count)
    }

    fn map_listing(row: &Row<'_>) -> Result<Listing, rusqlite::Error> {
        let crawled_at: DateTime<Utc> = row.get(11)?;
        Ok(Listing {
            external_id: row.get(0)?,
            source: row.get(1)?,
            link: row.get(2)?,
            year: row.get(3)?,
            price: row.get(4)?,
            mileage: row.get(5)?,
            original_title: row.get(6)?,
            processed_title: row.get(7)?,
            brand: row.get(8)?,
            series: row.get(9)?,
            location: row.get(10)?,
            crawled_at,
        })
    }
}
