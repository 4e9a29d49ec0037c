use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 100;

/// Raw `?page=&limit=` values. Kept as strings so malformed input falls back
/// to the defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: usize,
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PageMeta {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
}

fn positive(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&v| v > 0)
}

impl PageQuery {
    pub fn resolve(&self) -> Page {
        Page {
            page: positive(self.page.as_deref()).unwrap_or(DEFAULT_PAGE),
            limit: positive(self.limit.as_deref())
                .unwrap_or(DEFAULT_LIMIT)
                .min(MAX_LIMIT),
        }
    }
}

impl Page {
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Slices an already-filtered list, keeping its order.
    pub fn slice<T>(&self, items: Vec<T>) -> (Vec<T>, PageMeta) {
        let total = items.len();
        let page = items
            .into_iter()
            .skip(self.offset())
            .take(self.limit)
            .collect();
        (page, self.meta(total))
    }

    pub fn meta(&self, total: usize) -> PageMeta {
        PageMeta {
            page: self.page,
            limit: self.limit,
            total,
        }
    }
}
