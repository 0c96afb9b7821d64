//! Library surface of the daemon binary (C11): `AppState` and the
//! transport-agnostic `router::route` are exported so other process
//! roles — notably `succ-mcp` (C12) — can link the same engine without
//! going through the socket (spec.md §5: "both link the same engine").

pub mod connection;
pub mod idle_timeout;
pub mod protocol;
pub mod router;
pub mod state;
pub mod transport;
