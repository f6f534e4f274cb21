use anyhow::Context;
use axum::async_trait;
use sqlx::PgPool;

use crate::users::repo_types::{NewUser, User};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Every stored user, in no particular order.
    async fn find_all(&self) -> anyhow::Result<Vec<User>>;
    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<User>>;
    /// Insert only. A supplied id that is not positive or already taken is an error.
    async fn save(&self, user: NewUser) -> anyhow::Result<User>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_all(&self) -> anyhow::Result<Vec<User>> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, email, password_hash, role
            FROM users
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list users")?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, email, password_hash, role
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    async fn save(&self, user: NewUser) -> anyhow::Result<User> {
        let Some(id) = user.id else {
            let saved = sqlx::query_as::<_, User>(
                r#"
                INSERT INTO users (first_name, last_name, email, password_hash, role)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, first_name, last_name, email, password_hash, role
                "#,
            )
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role)
            .fetch_one(&self.db)
            .await
            .context("insert user")?;
            return Ok(saved);
        };

        anyhow::ensure!(id > 0, "user id must be positive, got {id}");

        let mut tx = self.db.begin().await.context("begin user insert")?;
        // generated inserts wait until the sequence is moved past `id`
        sqlx::query("LOCK TABLE users IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await
            .context("lock users")?;

        let saved = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, first_name, last_name, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO NOTHING
            RETURNING id, first_name, last_name, email, password_hash, role
            "#,
        )
        .bind(id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .fetch_optional(&mut *tx)
        .await
        .context("insert user with id")?
        .with_context(|| format!("user {id} already exists"))?;

        sqlx::query(
            r#"
            SELECT setval('users_id_seq', GREATEST((SELECT MAX(id) FROM users),
                                                   (SELECT last_value FROM users_id_seq)))
            "#,
        )
        .execute(&mut *tx)
        .await
        .context("advance users id sequence")?;

        tx.commit().await.context("commit user insert")?;
        Ok(saved)
    }
}
