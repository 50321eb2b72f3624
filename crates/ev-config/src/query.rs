//! Query engine limits.

use serde::{Deserialize, Serialize};

const fn default_max_page_size() -> u64 {
    1000
}

const fn default_page_size() -> u64 {
    20
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueryConfig {
    /// Largest `page_size` a caller may request.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,

    /// Page size the CLI uses when none is given. 0 lists unpaged.
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            max_page_size: default_max_page_size(),
            default_page_size: default_page_size(),
        }
    }
}
