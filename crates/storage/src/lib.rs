use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dayplan_core::{Catalog, GeoPoint, Place, PlaceId, Zone, ZoneId};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("duplicate zone id {0}")]
    DuplicateZone(ZoneId),
    #[error("duplicate place id {0}")]
    DuplicatePlace(PlaceId),
    #[error("place {id} has invalid estimated duration {hours}")]
    InvalidDuration { id: PlaceId, hours: f64 },
}

/// Serialized catalog contents, as stored in a JSON seed file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSeed {
    pub zones: Vec<Zone>,
    pub places: Vec<Place>,
}

/// Immutable in-memory catalog. Lookups preserve insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    zones: Vec<Zone>,
    places: Vec<Place>,
}

impl MemoryCatalog {
    pub fn new(zones: Vec<Zone>, places: Vec<Place>) -> Result<Self, CatalogError> {
        let mut zone_ids = HashSet::new();
        for zone in &zones {
            if !zone_ids.insert(zone.id) {
                return Err(CatalogError::DuplicateZone(zone.id));
            }
        }

        let mut place_ids = HashSet::new();
        for place in &places {
            if !place_ids.insert(place.id) {
                return Err(CatalogError::DuplicatePlace(place.id));
            }
            let hours = place.estimated_duration_hours;
            if !hours.is_finite() || hours < 0.0 {
                return Err(CatalogError::InvalidDuration { id: place.id, hours });
            }
        }

        Ok(Self { zones, places })
    }

    pub fn from_seed(seed: CatalogSeed) -> Result<Self, CatalogError> {
        Self::new(seed.zones, seed.places)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("failed reading catalog seed at {}", path.as_ref().display())
        })?;
        let seed: CatalogSeed = serde_json::from_str(&raw).context("invalid catalog seed json")?;
        Ok(Self::from_seed(seed)?)
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn to_seed(&self) -> CatalogSeed {
        CatalogSeed {
            zones: self.zones.clone(),
            places: self.places.clone(),
        }
    }
}

impl Catalog for MemoryCatalog {
    fn find_zones_all(&self) -> Vec<Zone> {
        self.zones.clone()
    }

    fn find_zone_by_name(&self, name: &str) -> Option<Zone> {
        self.zones.iter().find(|zone| zone.name == name).cloned()
    }

    fn find_places_by_zone_and_category(&self, zone_id: ZoneId, category: &str) -> Vec<Place> {
        self.places
            .iter()
            .filter(|place| place.zone_id == zone_id && place.category == category)
            .cloned()
            .collect()
    }

    fn find_places_by_category(&self, category: &str) -> Vec<Place> {
        self.places
            .iter()
            .filter(|place| place.category == category)
            .cloned()
            .collect()
    }
}

#[derive(Clone)]
pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await
            .with_context(|| format!("failed connecting to sqlite at {}", database_url))?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS zones (
              zone_id INTEGER PRIMARY KEY,
              zone_name TEXT NOT NULL,
              central_lat REAL NOT NULL,
              central_lon REAL NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS places (
              place_id INTEGER PRIMARY KEY,
              place_name TEXT NOT NULL,
              lat REAL NOT NULL,
              lon REAL NOT NULL,
              zone_id INTEGER NOT NULL REFERENCES zones(zone_id),
              category TEXT NOT NULL,
              estimated_duration REAL NOT NULL CHECK (estimated_duration >= 0),
              price_level TEXT
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS places_zone_category ON places (zone_id, category)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn upsert_zone(&self, zone: &Zone) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO zones (zone_id, zone_name, central_lat, central_lon)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(zone_id) DO UPDATE SET
              zone_name=excluded.zone_name,
              central_lat=excluded.central_lat,
              central_lon=excluded.central_lon
            "#,
        )
        .bind(zone.id)
        .bind(&zone.name)
        .bind(zone.centroid.lat)
        .bind(zone.centroid.lon)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn upsert_place(&self, place: &Place) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO places (place_id, place_name, lat, lon, zone_id, category, estimated_duration, price_level)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(place_id) DO UPDATE SET
              place_name=excluded.place_name,
              lat=excluded.lat,
              lon=excluded.lon,
              zone_id=excluded.zone_id,
              category=excluded.category,
              estimated_duration=excluded.estimated_duration,
              price_level=excluded.price_level
            "#,
        )
        .bind(place.id)
        .bind(&place.name)
        .bind(place.location.lat)
        .bind(place.location.lon)
        .bind(place.zone_id)
        .bind(&place.category)
        .bind(place.estimated_duration_hours)
        .bind(&place.price_level)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn import_seed(&self, seed: &CatalogSeed) -> Result<()> {
        for zone in &seed.zones {
            self.upsert_zone(zone).await?;
        }
        for place in &seed.places {
            self.upsert_place(place).await?;
        }
        Ok(())
    }

    /// Reads both tables into an immutable catalog, ordered by id.
    pub async fn load_snapshot(&self) -> Result<MemoryCatalog> {
        let zone_rows = sqlx::query(
            r#"
            SELECT zone_id, zone_name, central_lat, central_lon
            FROM zones
            ORDER BY zone_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let zones = zone_rows
            .into_iter()
            .map(|row| Zone {
                id: row.get("zone_id"),
                name: row.get("zone_name"),
                centroid: GeoPoint::new(row.get("central_lat"), row.get("central_lon")),
            })
            .collect::<Vec<_>>();

        let place_rows = sqlx::query(
            r#"
            SELECT place_id, place_name, lat, lon, zone_id, category, estimated_duration, price_level
            FROM places
            ORDER BY place_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let places = place_rows
            .into_iter()
            .map(|row| Place {
                id: row.get("place_id"),
                name: row.get("place_name"),
                location: GeoPoint::new(row.get("lat"), row.get("lon")),
                category: row.get("category"),
                zone_id: row.get("zone_id"),
                estimated_duration_hours: row.get("estimated_duration"),
                price_level: row.get("price_level"),
            })
            .collect::<Vec<_>>();

        Ok(MemoryCatalog::new(zones, places)?)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogSource {
    Empty,
    JsonFile(PathBuf),
    Sqlite(String),
}

impl CatalogSource {
    pub fn from_options(json_file: Option<PathBuf>, database_url: Option<String>) -> Self {
        match (database_url, json_file) {
            (Some(url), _) => Self::Sqlite(url),
            (None, Some(path)) => Self::JsonFile(path),
            (None, None) => Self::Empty,
        }
    }
}

pub async fn load_catalog(source: &CatalogSource) -> Result<MemoryCatalog> {
    let catalog = match source {
        CatalogSource::Empty => MemoryCatalog::default(),
        CatalogSource::JsonFile(path) => MemoryCatalog::from_json_file(path)?,
        CatalogSource::Sqlite(url) => SqliteCatalog::connect(url).await?.load_snapshot().await?,
    };

    info!(
        zones = catalog.zones().len(),
        places = catalog.places().len(),
        source = ?source,
        "catalog loaded"
    );
    Ok(catalog)
}
