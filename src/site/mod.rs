pub mod html;

use anyhow::Result;

use crate::domain::page::Page;

pub trait SiteBuilder {
    /// Write one file per page plus a regenerated index, in the given order.
    fn build_site(&self, pages: &[Page]) -> Result<()>;
}
