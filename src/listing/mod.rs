//! Incremental post list
//!
//! Paging state for a scroll-driven list: page 1 is rendered by the server,
//! later pages are appended each time the sentinel element becomes visible.
//! [`ListPhase`] is the only source of truth for "loading" and "has more".

use async_trait::async_trait;

use crate::content::{ContentClient, ContentError, PaginatedPosts, Post};

/// Source of post pages
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<PaginatedPosts, ContentError>;
}

#[async_trait]
impl PageSource for ContentClient {
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<PaginatedPosts, ContentError> {
        Ok(self.list_posts(page, page_size).await)
    }
}

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPhase {
    Idle,
    Loading,
    /// Terminal: out of pages, or a load failed
    Exhausted,
}

/// A page fetch handed out by [`IncrementalList::begin_load`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

/// Accumulated posts plus paging state.
///
/// Posts are append-only and not deduplicated by id: if upstream content
/// changes mid-session, items can repeat or be skipped.
#[derive(Debug, Clone)]
pub struct IncrementalList {
    posts: Vec<Post>,
    next_page: u32,
    page_size: u32,
    phase: ListPhase,
}

impl IncrementalList {
    /// Start from the server-rendered first page
    pub fn seeded(first_page: PaginatedPosts, page_size: u32) -> Self {
        let phase = if first_page.pagination.has_more() {
            ListPhase::Idle
        } else {
            ListPhase::Exhausted
        };
        Self {
            posts: first_page.posts,
            next_page: 2,
            page_size: page_size.max(1),
            phase,
        }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn into_posts(self) -> Vec<Post> {
        self.posts
    }

    pub fn phase(&self) -> ListPhase {
        self.phase
    }

    pub fn next_page(&self) -> u32 {
        self.next_page
    }

    pub fn is_loading(&self) -> bool {
        self.phase == ListPhase::Loading
    }

    pub fn has_more(&self) -> bool {
        self.phase != ListPhase::Exhausted
    }

    /// `Idle -> Loading`. Returns `None` (and changes nothing) when already
    /// loading or exhausted.
    pub fn begin_load(&mut self) -> Option<PageRequest> {
        if self.phase != ListPhase::Idle {
            return None;
        }
        self.phase = ListPhase::Loading;
        Some(PageRequest {
            page: self.next_page,
            page_size: self.page_size,
        })
    }

    /// Apply the outcome of the fetch started by [`begin_load`](Self::begin_load)
    pub fn finish_load(&mut self, outcome: Result<PaginatedPosts, ContentError>) {
        if self.phase != ListPhase::Loading {
            tracing::warn!("Ignoring page result while {:?}", self.phase);
            return;
        }

        match outcome {
            Ok(result) => {
                self.posts.extend(result.posts);
                self.next_page += 1;
                self.phase = if result.pagination.page >= result.pagination.page_count {
                    ListPhase::Exhausted
                } else {
                    ListPhase::Idle
                };
            }
            Err(e) => {
                tracing::error!("Failed to load page {}: {}", self.next_page, e);
                self.phase = ListPhase::Exhausted;
            }
        }
    }

    /// Sentinel became visible: load the next page if allowed.
    ///
    /// Returns whether a fetch was issued.
    pub async fn on_sentinel_visible<S>(&mut self, source: &S) -> bool
    where
        S: PageSource + ?Sized,
    {
        let Some(request) = self.begin_load() else {
            return false;
        };
        let outcome = source.fetch_page(request.page, request.page_size).await;
        self.finish_load(outcome);
        true
    }
}
