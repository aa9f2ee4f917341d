//! # smartspace-adapter-http-reqwest
//!
//! HTTP client adapter: implements the `DeviceController` port against a
//! real controller using `reqwest`.
//!
//! ## Wire contract
//! - `GET http://{ip}:{port}/ping` answers `pong` when the controller is up.
//! - `GET http://{ip}:{port}/device?venue=..&name=..&state=on|off` or
//!   `..&value=0..100` drives one device and answers with JSON.
//!
//! Every request is bounded by a timeout ([`REQUEST_TIMEOUT`] unless
//! configured otherwise). Nothing is retried.
//!
//! ## Dependency rule
//! Depends on `smartspace-app` (for the port trait) and `smartspace-domain`.

mod client;
mod error;

pub use client::{REQUEST_TIMEOUT, ReqwestDeviceController};
