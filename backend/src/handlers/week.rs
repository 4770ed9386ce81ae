use axum::{
    extract::{Query, State},
    Json,
};
use shared::api::WeekQuery;
use shared::WeekData;

use crate::state::AppState;

/// Collect the week at `week_offset` without pushing it anywhere.
///
/// A missing or non-numeric offset means the current week.
pub async fn get_week(
    State(state): State<AppState>,
    Query(query): Query<WeekQuery>,
) -> Json<WeekData> {
    let offset = query.offset();
    tracing::debug!("On-demand pull for week offset {}", offset);

    Json(state.pipeline.fetch_week(offset).await)
}
