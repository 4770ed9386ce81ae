use axum::{
    extract::{rejection::QueryRejection, Query},
    Json,
};
use shared::api::ChunkQuery;
use shared::{extract_chunk_from_document, ReducedEvent};

use crate::error::ApiResult;

/// Slice `[start, start + count)` out of a rendered week document
pub async fn extract_chunk(
    query: Result<Query<ChunkQuery>, QueryRejection>,
    body: String,
) -> ApiResult<Json<Vec<ReducedEvent>>> {
    let Query(query) = query?;
    let chunk = extract_chunk_from_document(&body, query.start, query.count)?;
    Ok(Json(chunk))
}
