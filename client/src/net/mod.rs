//! Networking modules for the REST backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` owns the request pipeline and its interceptors, `api_resources`
//! maps backend nouns onto typed handles, `transport` is the wire seam, and
//! `types` defines the shared wire schema.

pub mod api;
pub mod api_resources;
pub mod transport;
pub mod types;
