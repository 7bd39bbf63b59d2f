//! Weather API proxy.
//!
//! A small HTTP server that keeps the upstream API key on the server side.
//! The dashboard calls `GET /api/weather?city=<name>`; the proxy adds the
//! key and the fixed query parameters, forwards to the upstream service and
//! relays the answer. Enabled by the `proxy` feature.

mod server;

pub use server::{ProxyState, router, start_server};
