//! HTTP API for Folio.
//!
//! Build an [`AppState`], then either mount [`router`] in your own server
//! or call [`start_server`].

#![doc = include_str!("../README.md")]

pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use server::{router, start_server};
pub use state::AppState;
