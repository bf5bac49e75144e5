//! Rendering of post content blocks

mod blocks;
pub mod rich_text;
pub mod video;

pub use blocks::BlockRenderer;
