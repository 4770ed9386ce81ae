use axum::{
    extract::{Query, State},
    Json,
};
use shared::api::{SyncRunQuery, SyncRunResponse};

use crate::state::AppState;

/// Run the sync pipeline now, outside the schedule
pub async fn run_sync(
    State(state): State<AppState>,
    Query(query): Query<SyncRunQuery>,
) -> Json<SyncRunResponse> {
    let scope = query.scope.unwrap_or_default();
    tracing::info!("Manual sync requested ({:?})", scope);

    Json(SyncRunResponse {
        reports: state.pipeline.run(scope).await,
    })
}
