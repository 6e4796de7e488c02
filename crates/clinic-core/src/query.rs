use crate::entity::Entity;
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Raw `page` / `limit` query parameters of a list request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageRequest {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

/// Server-side paging bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for PageBounds {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

/// A validated page window: 1-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: usize,
    pub limit: usize,
}

impl PageWindow {
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl PageRequest {
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// Applies defaults and clamps `limit` to the configured maximum.
    pub fn resolve(&self, bounds: PageBounds) -> Result<PageWindow> {
        let page = self.page.unwrap_or(1);
        if page == 0 {
            return Err(CoreError::invalid_query("page", "must be >= 1"));
        }
        let limit = self.limit.unwrap_or(bounds.default_limit);
        if limit == 0 {
            return Err(CoreError::invalid_query("limit", "must be >= 1"));
        }
        Ok(PageWindow {
            page,
            limit: limit.min(bounds.max_limit),
        })
    }
}

/// Pagination metadata returned next to a list of entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_more: bool,
}

/// One page of a filtered collection.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub info: PageInfo,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Filters, orders and slices a snapshot of a collection.
///
/// Map iteration order is unspecified, so entities are ordered by
/// `createdAt` and then `id` before slicing; the same request against the same
/// data always yields the same page.
pub fn paginate<E: Entity>(items: Vec<E>, filter: &E::Filter, window: PageWindow) -> Page<E> {
    let mut matching: Vec<E> = items.into_iter().filter(|e| e.matches(filter)).collect();
    matching.sort_by(|a, b| {
        a.created_at()
            .cmp(&b.created_at())
            .then_with(|| a.id().cmp(b.id()))
    });

    let total = matching.len();
    let offset = window.offset().min(total);
    let items: Vec<E> = matching
        .into_iter()
        .skip(offset)
        .take(window.limit)
        .collect();
    let has_more = offset + items.len() < total;

    Page {
        items,
        info: PageInfo {
            page: window.page,
            limit: window.limit,
            total,
            total_pages: total.div_ceil(window.limit),
            has_more,
        },
    }
}
