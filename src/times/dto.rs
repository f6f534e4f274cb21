use serde::Deserialize;
use time::Date;

/// Query for `GET /time?uid=`.
#[derive(Debug, Deserialize)]
pub struct UserTimesQuery {
    pub uid: i32,
}

/// Query for `GET /time/by-date?date=YYYY-MM-DD`.
#[derive(Debug, Deserialize)]
pub struct DateQuery {
    #[serde(with = "super::iso_date")]
    pub date: Date,
}
