//! Markdown blog builder and the server for its output.

pub mod config;
pub mod error;
pub mod generator;
pub mod index;
pub mod metadata;
pub mod page;
pub mod renderer;
pub mod server;
