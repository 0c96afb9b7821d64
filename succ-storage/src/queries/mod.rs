pub mod blob;
pub mod chunk_ops;
pub mod link_ops;
pub mod maintenance;
pub mod memory_crud;
pub mod token_events;
pub mod vector_search;
