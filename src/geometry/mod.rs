pub mod centerline;
pub mod crossing;

pub use centerline::{CenterLine, Sample};
pub use crossing::{find_crossing, has_crossing, Crossing};
