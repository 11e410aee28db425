//! External link previews and video metadata.
//!
//! # Modules
//!
//! - [`fetch`]: The [`Fetcher`] seam over outbound HTTP
//! - [`head`]: Ordered head-field extractors for HTML
//! - [`link`]: [`LinkPreviewer`] producing [`ExternalMeta`]
//! - [`video`]: [`VideoResolver`] producing [`VideoMeta`]
//! - [`cache`]: [`TtlCache`] used by the video resolver
//! - [`error`]: Error types

#![doc = include_str!("../README.md")]

pub mod cache;
pub mod error;
pub mod fetch;
pub mod head;
pub mod link;
pub mod video;

pub use cache::TtlCache;
pub use error::{FetchError, MetaError, VideoError};
pub use fetch::{FetchOptions, FetchResponse, Fetcher, HttpFetcher, StaticFetcher};
pub use link::{ExternalMeta, LinkPreviewer};
pub use video::{VideoMeta, VideoResolver};
