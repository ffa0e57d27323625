#![allow(clippy::uninlined_format_args)]

pub mod api;
pub mod app;
pub mod config;
pub mod http;
pub mod interaction;
pub mod logging;
#[cfg(test)]
mod mock;
pub mod models;
pub mod optimistic;
pub mod pagination;
pub mod session;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use app::run;
