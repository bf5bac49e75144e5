//! Content module - fetches posts from the headless CMS and normalizes them

pub mod adapter;
mod client;
mod error;
mod markdown;
mod post;
pub mod query;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{ContentClient, ContentTransport, HttpTransport};
pub use error::ContentError;
pub use markdown::MarkdownRenderer;
pub use post::{
    BlockKind, ContentBlock, MediaAsset, PaginatedPosts, Pagination, Post, SlugTimestamp,
};
