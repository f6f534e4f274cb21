use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::users::{
    dto::CreateUserRequest,
    repo::UserRepository,
    repo_types::{NewUser, User},
};

#[derive(Debug, Error)]
pub enum CreateUserError {
    #[error("malformed user payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("failed to persist user: {0:#}")]
    Persist(anyhow::Error),
}

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Always `Some` on success; repository failures come back as `Err`.
    pub async fn get_all_users(&self) -> anyhow::Result<Option<Vec<User>>> {
        let users = self.repo.find_all().await?;
        Ok(Some(users))
    }

    pub async fn get_user_by_id(&self, id: i32) -> anyhow::Result<Option<User>> {
        self.repo.find_by_id(id).await
    }

    /// Decodes a raw JSON body and inserts it, returning the stored row.
    /// A supplied id that is taken or not positive fails as `Persist`.
    pub async fn create_user(&self, body: &[u8]) -> Result<User, CreateUserError> {
        let req: CreateUserRequest = serde_json::from_slice(body)?;
        let user = self
            .repo
            .save(NewUser::from(req))
            .await
            .map_err(CreateUserError::Persist)?;
        info!(user_id = user.id, "user created");
        Ok(user)
    }
}
