//! Portfolio API server, client library and admin CLI.
//!
//! The server side (`app`, `auth`, `projects`, `images`) exposes a small JSON
//! REST surface over pluggable repositories. The client side (`client`,
//! `session`, `render`) talks to it and keeps the signed-in session on disk.

pub mod app;
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod images;
pub mod projects;
pub mod render;
pub mod session;
pub mod state;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;
