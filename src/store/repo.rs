use std::time::Duration;

use anyhow::Result;

use crate::domain::page::Page;

pub trait PageRegistry: Send + Sync {
    /// Insert one page. The first write for an id wins; a later write with
    /// the same id is dropped without error.
    fn save_page(&self, page: &Page) -> Result<()>;

    /// Every stored page strictly newer than the trailing window, newest
    /// first.
    fn recent_pages(&self, window: Duration) -> Result<Vec<Page>>;
}
