//! Object storage for synthesized audio.
//!
//! Talks to the Supabase Storage REST API with a service key and hands back
//! public URLs for uploaded objects.

pub mod client;

pub use client::{StorageClient, StorageError, DEFAULT_BUCKET};
