pub mod assemble;
pub mod sweep;

pub use assemble::{AssembleCrossing, AssembleSwitch, PartLine, PointAnimation};
pub use sweep::{Lighting, Mesh, SweepSection, Transparency};
