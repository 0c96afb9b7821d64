pub mod centrality;
pub mod chunk;
pub mod degradation_event;
pub mod link;
pub mod namespace;
pub mod token_event;

pub use centrality::CentralityScore;
pub use chunk::Chunk;
pub use degradation_event::DegradationEvent;
pub use link::{MemoryLink, RelationType};
pub use namespace::Namespace;
pub use token_event::{EventType, TokenEvent};
