pub mod model;
pub mod quality;
pub mod ty;

pub use model::{Memory, MemoryId};
pub use quality::QualityFactors;
pub use ty::MemoryType;
