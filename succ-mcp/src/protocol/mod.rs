pub mod stdio;
pub mod types;
