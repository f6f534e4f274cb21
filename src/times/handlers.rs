use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::{error, instrument};

use crate::{
    error::ApiError,
    state::AppState,
    times::{
        dto::{DateQuery, UserTimesQuery},
        repo_types::TimeEntry,
        services::TimeService,
    },
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/times", get(list_times))
        .route("/time", get(times_by_user))
        .route("/time/by-date", get(time_by_date))
}

#[instrument(skip(times))]
pub async fn list_times(
    State(times): State<TimeService>,
) -> Result<Json<Vec<TimeEntry>>, ApiError> {
    let all = times.get_all_times().await.map_err(|e| {
        error!(error = %e, "list_times failed");
        ApiError::NotFound
    })?;
    Ok(Json(all))
}

#[instrument(skip(times))]
pub async fn times_by_user(
    State(times): State<TimeService>,
    Query(q): Query<UserTimesQuery>,
) -> Result<Json<Vec<TimeEntry>>, ApiError> {
    let entries = times.get_times_by_user_id(q.uid).await.map_err(|e| {
        error!(error = %e, uid = q.uid, "times_by_user failed");
        ApiError::NotFound
    })?;
    Ok(Json(entries))
}

#[instrument(skip(times))]
pub async fn time_by_date(
    State(times): State<TimeService>,
    Query(q): Query<DateQuery>,
) -> Result<Json<TimeEntry>, ApiError> {
    match times.get_time_by_date(q.date).await {
        Ok(Some(entry)) => Ok(Json(entry)),
        Ok(None) => Err(ApiError::NotFound),
        Err(e) => {
            error!(error = %e, date = %q.date, "time_by_date failed");
            Err(ApiError::NotFound)
        }
    }
}
