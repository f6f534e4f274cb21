use std::sync::Arc;

use time::Date;

use crate::times::{repo::TimeRepository, repo_types::TimeEntry};

#[derive(Clone)]
pub struct TimeService {
    repo: Arc<dyn TimeRepository>,
}

impl TimeService {
    pub fn new(repo: Arc<dyn TimeRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_all_times(&self) -> anyhow::Result<Vec<TimeEntry>> {
        self.repo.find_all().await
    }

    pub async fn get_times_by_user_id(&self, uid: i32) -> anyhow::Result<Vec<TimeEntry>> {
        self.repo.find_by_user_id(uid).await
    }

    pub async fn get_time_by_date(&self, date: Date) -> anyhow::Result<Option<TimeEntry>> {
        self.repo.find_by_date(date).await
    }
}
