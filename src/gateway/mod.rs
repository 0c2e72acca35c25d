// Gateway Module
//
// Talks to the local API gateway (`/api/otakudesu/<resource>`), which proxies
// the upstream catalog. Handles:
// - Single-attempt JSON fetches with status/transport error mapping
// - The response envelope and the view models the pages read

pub mod client;
pub mod types;

pub use client::{GatewayClient, JsonSource};
pub use types::*;
