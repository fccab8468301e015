//! Providers module - the host capabilities the popup consumes
//!
//! The popup never talks to a browser directly. It asks three providers for
//! candidates and one opener to activate links:
//!
//! - `TabProvider` - every open tab at call time
//! - `BookmarkProvider` - bookmark nodes matching a query (folders have no url)
//! - `HistoryProvider` - history entries matching a query, capped
//! - `LinkOpener` - opens a URL in a new browsing context
//!
//! Provider futures are `!Send`: they run as local tasks on the popup thread.
//!
//! # Module Structure
//!
//! - `fixture` - JSON fixture backed providers (all three sources)
//! - `chromium` - Chromium profile `Bookmarks` file and `History` database
//! - `opener` - System and recording link openers

mod chromium;
mod fixture;
mod opener;

use std::rc::Rc;

use async_trait::async_trait;

use crate::error::Result;
use crate::search::{Bookmark, HistoryItem, Tab};

pub use chromium::{ChromiumBookmarks, ChromiumHistory};
pub use fixture::{FixtureData, FixtureProviders};
pub use opener::{RecordingLinkOpener, SystemLinkOpener};

#[async_trait(?Send)]
pub trait TabProvider {
    async fn query_all_tabs(&self) -> Result<Vec<Tab>>;
}

#[async_trait(?Send)]
pub trait BookmarkProvider {
    async fn search_bookmarks(&self, query: &str) -> Result<Vec<Bookmark>>;
}

#[async_trait(?Send)]
pub trait HistoryProvider {
    async fn search_history(&self, query: &str, max_results: usize) -> Result<Vec<HistoryItem>>;
}

pub trait LinkOpener {
    fn open(&self, url: &str) -> Result<()>;
}

/// The three candidate providers a popup queries
#[derive(Clone)]
pub struct Providers {
    pub tabs: Rc<dyn TabProvider>,
    pub bookmarks: Rc<dyn BookmarkProvider>,
    pub history: Rc<dyn HistoryProvider>,
}

impl Providers {
    /// Use one fixture for all three sources
    pub fn from_fixture(fixture: FixtureProviders) -> Self {
        let shared = Rc::new(fixture);
        Providers {
            tabs: shared.clone(),
            bookmarks: shared.clone(),
            history: shared,
        }
    }
}
