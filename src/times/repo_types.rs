use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::Date;

/// Row in the `time` table. Times of day and deduction are stored as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub id: i32,
    pub user_id: i32,
    pub start_time: String,
    pub end_time: String,
    pub deduction: String,
    #[serde(with = "super::iso_date")]
    pub date: Date,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTimeEntry {
    pub id: Option<i32>,
    pub user_id: i32,
    pub start_time: String,
    pub end_time: String,
    pub deduction: String,
    pub date: Date,
}
