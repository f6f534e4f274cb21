use anyhow::Context;
use axum::async_trait;
use sqlx::PgPool;
use time::Date;

use crate::times::repo_types::{NewTimeEntry, TimeEntry};

#[async_trait]
pub trait TimeRepository: Send + Sync {
    async fn find_all(&self) -> anyhow::Result<Vec<TimeEntry>>;
    /// Entries owned by `user_id`; empty when there are none.
    async fn find_by_user_id(&self, user_id: i32) -> anyhow::Result<Vec<TimeEntry>>;
    /// Exact date match. With several candidates the lowest id wins.
    async fn find_by_date(&self, date: Date) -> anyhow::Result<Option<TimeEntry>>;
    /// Insert, or update when `entry.id` names an existing row. Ids must be positive.
    async fn save(&self, entry: NewTimeEntry) -> anyhow::Result<TimeEntry>;
}

#[derive(Clone)]
pub struct PgTimeRepository {
    db: PgPool,
}

impl PgTimeRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TimeRepository for PgTimeRepository {
    async fn find_all(&self) -> anyhow::Result<Vec<TimeEntry>> {
        let rows = sqlx::query_as::<_, TimeEntry>(
            r#"
            SELECT id, user_id, start_time, end_time, deduction, date
            FROM "time"
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list time entries")?;
        Ok(rows)
    }

    async fn find_by_user_id(&self, user_id: i32) -> anyhow::Result<Vec<TimeEntry>> {
        let rows = sqlx::query_as::<_, TimeEntry>(
            r#"
            SELECT id, user_id, start_time, end_time, deduction, date
            FROM "time"
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list time entries by user")?;
        Ok(rows)
    }

    async fn find_by_date(&self, date: Date) -> anyhow::Result<Option<TimeEntry>> {
        let row = sqlx::query_as::<_, TimeEntry>(
            r#"
            SELECT id, user_id, start_time, end_time, deduction, date
            FROM "time"
            WHERE date = $1
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .bind(date)
        .fetch_optional(&self.db)
        .await
        .context("find time entry by date")?;
        Ok(row)
    }

    async fn save(&self, entry: NewTimeEntry) -> anyhow::Result<TimeEntry> {
        let Some(id) = entry.id else {
            let saved = sqlx::query_as::<_, TimeEntry>(
                r#"
                INSERT INTO "time" (user_id, start_time, end_time, deduction, date)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, user_id, start_time, end_time, deduction, date
                "#,
            )
            .bind(entry.user_id)
            .bind(&entry.start_time)
            .bind(&entry.end_time)
            .bind(&entry.deduction)
            .bind(entry.date)
            .fetch_one(&self.db)
            .await
            .context("insert time entry")?;
            return Ok(saved);
        };

        anyhow::ensure!(id > 0, "time entry id must be positive, got {id}");

        let mut tx = self.db.begin().await.context("begin time entry upsert")?;
        sqlx::query(r#"LOCK TABLE "time" IN SHARE ROW EXCLUSIVE MODE"#)
            .execute(&mut *tx)
            .await
            .context("lock time")?;

        let saved = sqlx::query_as::<_, TimeEntry>(
            r#"
            INSERT INTO "time" (id, user_id, start_time, end_time, deduction, date)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE
               SET user_id = EXCLUDED.user_id,
                   start_time = EXCLUDED.start_time,
                   end_time = EXCLUDED.end_time,
                   deduction = EXCLUDED.deduction,
                   date = EXCLUDED.date
            RETURNING id, user_id, start_time, end_time, deduction, date
            "#,
        )
        .bind(id)
        .bind(entry.user_id)
        .bind(&entry.start_time)
        .bind(&entry.end_time)
        .bind(&entry.deduction)
        .bind(entry.date)
        .fetch_one(&mut *tx)
        .await
        .context("upsert time entry")?;

        sqlx::query(
            r#"
            SELECT setval('time_id_seq', GREATEST((SELECT MAX(id) FROM "time"),
                                                  (SELECT last_value FROM time_id_seq)))
            "#,
        )
        .execute(&mut *tx)
        .await
        .context("advance time id sequence")?;

        tx.commit().await.context("commit time entry upsert")?;
        Ok(saved)
    }
}
