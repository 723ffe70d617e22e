pub mod error;
pub mod geometry;
pub mod host;
pub mod input;
pub mod math;
pub mod operations;
pub mod pipeline;
pub mod profile;
pub mod shape;

pub use error::{Result, TrackgenError};
