//! In-memory repositories standing in for PostgreSQL in unit tests.

use std::sync::Mutex;

use axum::async_trait;
use time::Date;

use crate::times::{
    repo::TimeRepository,
    repo_types::{NewTimeEntry, TimeEntry},
};
use crate::users::{
    repo::UserRepository,
    repo_types::{NewUser, User},
};

struct Table<T> {
    rows: Vec<T>,
    next_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
        }
    }
}

impl<T: Clone> Table<T> {
    /// Mirrors the PostgreSQL repositories: ids must be positive, generated ids stay
    /// ahead of explicit ones, and an existing id is replaced only when `overwrite`.
    fn save(
        &mut self,
        id: Option<i32>,
        overwrite: bool,
        id_of: impl Fn(&T) -> i32,
        build: impl FnOnce(i32) -> T,
    ) -> anyhow::Result<T> {
        let id = match id {
            None => self.next_id,
            Some(id) if id <= 0 => anyhow::bail!("id must be positive, got {id}"),
            Some(id) => id,
        };
        let existing = self.rows.iter().position(|r| id_of(r) == id);
        if existing.is_some() && !overwrite {
            anyhow::bail!("id {id} already exists");
        }
        self.next_id = self.next_id.max(id.saturating_add(1));
        let row = build(id);
        match existing {
            Some(i) => self.rows[i] = row.clone(),
            None => self.rows.push(row.clone()),
        }
        Ok(row)
    }
}

#[derive(Default)]
pub struct MemoryUserRepository {
    table: Mutex<Table<User>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_all(&self) -> anyhow::Result<Vec<User>> {
        Ok(self.table.lock().unwrap().rows.clone())
    }

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<User>> {
        let table = self.table.lock().unwrap();
        Ok(table.rows.iter().find(|u| u.id == id).cloned())
    }

    async fn save(&self, user: NewUser) -> anyhow::Result<User> {
        let mut table = self.table.lock().unwrap();
        table.save(user.id, false, |u| u.id, |id| User {
            id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
        })
    }
}

#[derive(Default)]
pub struct MemoryTimeRepository {
    table: Mutex<Table<TimeEntry>>,
}

impl MemoryTimeRepository {
    pub async fn seeded(entries: Vec<NewTimeEntry>) -> Self {
        let repo = Self::default();
        for e in entries {
            repo.save(e).await.unwrap();
        }
        repo
    }
}

#[async_trait]
impl TimeRepository for MemoryTimeRepository {
    async fn find_all(&self) -> anyhow::Result<Vec<TimeEntry>> {
        Ok(self.table.lock().unwrap().rows.clone())
    }

    async fn find_by_user_id(&self, user_id: i32) -> anyhow::Result<Vec<TimeEntry>> {
        let table = self.table.lock().unwrap();
        Ok(table.rows.iter().filter(|e| e.user_id == user_id).cloned().collect())
    }

    async fn find_by_date(&self, date: Date) -> anyhow::Result<Option<TimeEntry>> {
        let table = self.table.lock().unwrap();
        Ok(table
            .rows
            .iter()
            .filter(|e| e.date == date)
            .min_by_key(|e| e.id)
            .cloned())
    }

    async fn save(&self, entry: NewTimeEntry) -> anyhow::Result<TimeEntry> {
        let mut table = self.table.lock().unwrap();
        table.save(entry.id, true, |e| e.id, |id| TimeEntry {
            id,
            user_id: entry.user_id,
            start_time: entry.start_time,
            end_time: entry.end_time,
            deduction: entry.deduction,
            date: entry.date,
        })
    }
}

/// Every call fails, as if the database were unreachable.
pub struct FailingRepository;

#[async_trait]
impl UserRepository for FailingRepository {
    async fn find_all(&self) -> anyhow::Result<Vec<User>> {
        anyhow::bail!("connection refused")
    }
    async fn find_by_id(&self, _id: i32) -> anyhow::Result<Option<User>> {
        anyhow::bail!("connection refused")
    }
    async fn save(&self, _user: NewUser) -> anyhow::Result<User> {
        anyhow::bail!("connection refused")
    }
}

#[async_trait]
impl TimeRepository for FailingRepository {
    async fn find_all(&self) -> anyhow::Result<Vec<TimeEntry>> {
        anyhow::bail!("connection refused")
    }
    async fn find_by_user_id(&self, _user_id: i32) -> anyhow::Result<Vec<TimeEntry>> {
        anyhow::bail!("connection refused")
    }
    async fn find_by_date(&self, _date: Date) -> anyhow::Result<Option<TimeEntry>> {
        anyhow::bail!("connection refused")
    }
    async fn save(&self, _entry: NewTimeEntry) -> anyhow::Result<TimeEntry> {
        anyhow::bail!("connection refused")
    }
}

pub fn entry(user_id: i32, date: Date) -> NewTimeEntry {
    NewTimeEntry {
        id: None,
        user_id,
        start_time: "09:00".into(),
        end_time: "17:00".into(),
        deduction: "0:30".into(),
        date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[tokio::test]
    async fn explicit_id_keeps_generated_ids_ahead() {
        let repo = MemoryTimeRepository::default();
        let mut e = entry(1, date!(2024 - 01 - 01));
        e.id = Some(10);
        repo.save(e).await.unwrap();
        let next = repo.save(entry(1, date!(2024 - 01 - 02))).await.unwrap();
        assert_eq!(next.id, 11);
        assert_eq!(repo.find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn non_positive_ids_are_rejected_without_storing() {
        let repo = MemoryTimeRepository::default();
        for id in [0, -3] {
            let mut e = entry(1, date!(2024 - 01 - 01));
            e.id = Some(id);
            assert!(repo.save(e).await.is_err());
        }
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn time_save_with_existing_id_updates_in_place() {
        let repo = MemoryTimeRepository::default();
        let first = repo.save(entry(1, date!(2024 - 01 - 01))).await.unwrap();
        let mut e = entry(2, date!(2024 - 01 - 05));
        e.id = Some(first.id);
        let updated = repo.save(e).await.unwrap();
        assert_eq!(updated.id, first.id);
        assert_eq!(repo.find_all().await.unwrap(), vec![updated]);
    }

    #[tokio::test]
    async fn max_id_does_not_overflow() {
        let repo = MemoryUserRepository::default();
        let user = NewUser {
            id: Some(i32::MAX),
            ..NewUser::default()
        };
        let saved = repo.save(user).await.unwrap();
        assert_eq!(saved.id, i32::MAX);
    }
}
