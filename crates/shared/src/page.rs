use serde::Deserialize;

pub const DEFAULT_LIMIT: u32 = 6;
pub const MAX_LIMIT: u32 = 100;

/// Page-number pagination arguments, 1-based.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageArgs {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl Default for PageArgs {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PageArgs {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    pub fn page(&self) -> u32 {
        self.page.max(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit.clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page() - 1) * u64::from(self.limit())
    }
}

#[derive(Debug)]
pub struct Page<T> {
    pub count: u64,
    pub args: PageArgs,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.args.offset() + (self.results.len() as u64) < self.count
    }

    pub fn has_previous(&self) -> bool {
        self.args.page() > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            args: self.args,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}
