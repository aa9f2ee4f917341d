//! # smartspace-domain
//!
//! Pure domain model for smartspace, a controller client for lights and
//! switches hosted on a microcontroller.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Devices** (`NORMAL` on/off switches and `REGULATABLE` dimmers)
//!   and the patches applied to their local copy
//! - Define the **Connection config** and address sanitisation
//! - Define **Device commands** (the wire parameters of a mutation)
//! - Define **Notifications** surfaced to the user
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod command;
pub mod connection;
pub mod device;
pub mod notification;
