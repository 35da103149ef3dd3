pub mod collision;
pub mod compute;
pub mod config;
pub mod engine;
pub mod entities;
pub mod error;
pub mod feedback;
pub mod games;
pub mod input;
pub mod pool;
pub mod render;
pub mod scheduler;
pub mod store;
pub mod surface;
