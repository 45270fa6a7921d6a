//! Container entrypoint for an ASGI application server.
//!
//! One-shot start sequence: run the schema migration gate, size the
//! worker pool from the host's logical CPUs, then replace this process
//! with the server.

pub mod admin;
pub mod bootstrap;
pub mod config;
pub mod deployment;
pub mod error;
pub mod launcher;
pub mod migrate;
pub mod sizer;
pub mod util;
