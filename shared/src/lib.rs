//! Domain model and pure helpers shared by the sync service and the API server.

pub mod api;
pub mod chunk;
pub mod models;
pub mod timestamp;
pub mod week;

pub use chunk::{
    extract_chunk, extract_chunk_from_document, read_cached_week, CachedWeek, ChunkError,
};
pub use models::{CalendarSource, Event, EventRecord, RawEvent, ReducedEvent, WeekData};
pub use week::{parse_week_key, week_key, Clock, WeekWindow};
