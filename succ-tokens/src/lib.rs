//! Token counting and the append-only token-event ledger (spec.md §3).
//!
//! Counting goes through `tiktoken-rs` (the cl100k_base encoding, shared
//! by the chat-completion models the `Llm` capability targets) with a
//! content-hash-keyed cache so repeated counts of the same text (e.g.
//! re-packing a working set) don't re-tokenize.

mod counter;
mod events;

pub use counter::TokenCounter;
pub use events::{EventTally, TokenLedger};
