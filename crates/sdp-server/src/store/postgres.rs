//! PostgreSQL-backed reading store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sdp_common::SensorReading;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::StoreError;
use crate::store::ReadingStore;

/// [`ReadingStore`] over a PostgreSQL connection pool.
///
/// The pool serves the batch writer and the retention sweeper concurrently;
/// no coordination between their statements is needed.
#[derive(Clone)]
pub struct PgReadingStore {
    pool: PgPool,
}

impl PgReadingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReadingStore for PgReadingStore {
    async fn insert_batch(&self, readings: Vec<SensorReading>) -> Result<(), StoreError> {
        if readings.is_empty() {
            return Ok(());
        }

        let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO sensor_readings (humidity, temperature, location, recorded_at) ",
        );

        query_builder.push_values(readings, |mut row, reading| {
            row.push_bind(reading.humidity)
                .push_bind(reading.temperature)
                .push_bind(reading.location)
                .push_bind(reading.recorded_at);
        });

        query_builder.build().execute(&self.pool).await?;

        Ok(())
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM sensor_readings WHERE recorded_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
