//! Streamed notification framing for the deployment dashboard API.
//!
//! Long-running dashboard actions answer with one response body that carries
//! many tagged notifications. This crate bundles the pieces needed to consume
//! them.
//!
//! # Crate Structure
//!
//! - [`frame`] — Incremental decoder and encoder for the framed stream
//! - [`notify`] — Channel-to-severity dispatch and handler registration (behind `notify` feature)
//! - [`api`] — Typed commands, transport trait, client and poller (behind `api` feature)

/// Re-export frame types.
pub mod frame {
    pub use mmwire_frame::*;
}

/// Re-export notification types (requires `notify` feature).
#[cfg(feature = "notify")]
pub mod notify {
    pub use mmwire_notify::*;
}

/// Re-export API types (requires `api` feature).
#[cfg(feature = "api")]
pub mod api {
    pub use mmwire_api::*;
}
