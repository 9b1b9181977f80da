//! PostgreSQL-backed catalog store.

use crate::store::CatalogStore;
use crate::types::{
    CanonicalEvent, EventStatus, NormalizedMarketSnapshot, TeamAlias, TeamRef,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::env;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Connection pool settings, overridable from the environment.
#[derive(Debug, Clone)]
pub struct DbPoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
}

impl Default for DbPoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(300),
        }
    }
}

impl DbPoolConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_connections),
            min_connections: env::var("DB_MIN_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.min_connections),
            acquire_timeout: env::var("DB_ACQUIRE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.acquire_timeout),
            idle_timeout: env::var("DB_IDLE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.idle_timeout),
        }
    }
}

/// Catalog store over a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and build a pool with the given settings.
    pub async fn connect(database_url: &str, config: &DbPoolConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(config.idle_timeout)
            .connect(database_url)
            .await
            .context("failed to create database connection pool")?;

        tracing::info!(
            "catalog pool created: max={}, min={}",
            config.max_connections,
            config.min_connections
        );

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn get_event_window(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<CanonicalEvent>> {
        let rows = sqlx::query(
            r#"
            SELECT e.id, e.scheduled_time, e.status,
                   ht.id AS home_team_id, ht.name AS home_team_name,
                   at.id AS away_team_id, at.name AS away_team_name
            FROM events e
            JOIN teams ht ON e.home_team_id = ht.id
            JOIN teams at ON e.away_team_id = at.id
            WHERE e.scheduled_time BETWEEN $1 AND $2
            ORDER BY e.scheduled_time
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .context("failed to read event window")?;

        let events = rows
            .iter()
            .map(|row| -> Result<CanonicalEvent> {
                let status: String = row.try_get("status")?;
                Ok(CanonicalEvent {
                    id: row.try_get("id")?,
                    scheduled_time: row.try_get("scheduled_time")?,
                    status: EventStatus::from_str_or_scheduled(&status),
                    home: TeamRef {
                        id: row.try_get("home_team_id")?,
                        name: row.try_get("home_team_name")?,
                    },
                    away: TeamRef {
                        id: row.try_get("away_team_id")?,
                        name: row.try_get("away_team_name")?,
                    },
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("event window [{} .. {}]: {} events", from, to, events.len());
        Ok(events)
    }

    async fn get_all_aliases(&self) -> Result<Vec<TeamAlias>> {
        let rows = sqlx::query("SELECT team_id, alias FROM team_aliases")
            .fetch_all(&self.pool)
            .await
            .context("failed to read team aliases")?;

        rows.iter()
            .map(|row| -> Result<TeamAlias> {
                let team_id: Uuid = row.try_get("team_id")?;
                let alias: String = row.try_get("alias")?;
                Ok(TeamAlias { team_id, alias })
            })
            .collect()
    }

    async fn upsert_market_snapshot(&self, snapshot: &NormalizedMarketSnapshot) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO market_snapshots (
                event_id, bookmaker, market_kind, source_market_id,
                home_price, draw_price, away_price, recorded_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (event_id, bookmaker, market_kind) DO UPDATE SET
                source_market_id = EXCLUDED.source_market_id,
                home_price = EXCLUDED.home_price,
                draw_price = EXCLUDED.draw_price,
                away_price = EXCLUDED.away_price,
                recorded_at = EXCLUDED.recorded_at
            "#,
        )
        .bind(snapshot.event_id)
        .bind(snapshot.bookmaker.as_str())
        .bind(snapshot.market_kind.as_str())
        .bind(&snapshot.source_market_id)
        .bind(snapshot.home_price)
        .bind(snapshot.draw_price)
        .bind(snapshot.away_price)
        .bind(snapshot.recorded_at)
        .execute(&self.pool)
        .await
        .context("failed to upsert market snapshot")?;

        Ok(())
    }
}
