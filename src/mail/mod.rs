pub mod decoders;
pub mod parser;

use std::io::Read;

use anyhow::Result;

use crate::domain::page::Page;

/// Where pages come from. There is exactly one source today (stdin), but the
/// seam keeps the orchestration independent of it.
pub trait PageSource {
    fn read_page(&mut self) -> Result<Page>;
}

/// Reads one raw message from stdin, consuming it fully.
pub struct StdinSource;

impl PageSource for StdinSource {
    fn read_page(&mut self) -> Result<Page> {
        let mut raw = Vec::new();
        std::io::stdin().read_to_end(&mut raw)?;
        Ok(parser::parse_page(&raw)?)
    }
}
