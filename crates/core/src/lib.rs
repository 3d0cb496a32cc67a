//! Domain types and pure functions shared by every calmcast crate.
//!
//! Nothing in here performs I/O: the record store, providers and HTTP layer
//! all build on these definitions.

pub mod error;
pub mod meditation;
pub mod status;
pub mod types;
pub mod voice;
