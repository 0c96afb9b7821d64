//! Session registry for the daemon router (C11, spec.md §4.11).

pub mod registry;

pub use registry::{SessionEntry, SessionRegistry};
