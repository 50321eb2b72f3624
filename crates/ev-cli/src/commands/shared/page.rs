use anyhow::Context;
use ev_core::query::PageSpec;

/// Compute the page window with precedence: `--size` -> `query.default_page_size`.
/// A size of 0 means unpaged.
pub fn page_spec(page: Option<i64>, size: Option<i64>, default_size: u64) -> anyhow::Result<PageSpec> {
    let size = match size {
        Some(size) => size,
        None => i64::try_from(default_size).context("query.default_page_size is out of range")?,
    };
    Ok(PageSpec::of(page.unwrap_or(0), size))
}
