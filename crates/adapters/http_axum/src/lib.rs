//! # smartspace-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum) that impersonates a
//! controller, backed by the virtual devices of `smartspace-adapter-virtual`.
//!
//! ## Routes
//! - `GET /ping` answers `pong`
//! - `GET /device?venue=..&name=..&state=on|off` or `..&value=0..100` applies
//!   the command and answers with the device as JSON
//! - `GET /health` answers `OK`
//!
//! ## Dependency rule
//! Depends on `smartspace-domain` for request parsing and on the virtual
//! controller for behaviour. Never leaks axum types into the domain.

mod device;
mod error;
pub mod router;
pub mod state;
