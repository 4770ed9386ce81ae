pub mod chunk;
pub mod health;
pub mod sync;
pub mod week;
