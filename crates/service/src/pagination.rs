//! Pagination utilities for service layer
//!
//! Zero-based page index, bounded page size and an optional `field,direction` sort.

use serde::Serialize;

use crate::errors::ServiceError;

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// Caller-supplied ordering, e.g. `honorName,desc`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: Direction,
}

impl Sort {
    pub fn parse(raw: &str) -> Result<Self, ServiceError> {
        let mut parts = raw.split(',').map(str::trim);
        let field = parts.next().filter(|f| !f.is_empty())
            .ok_or_else(|| ServiceError::Validation("sort field required".into()))?;
        let direction = match parts.next().map(str::to_ascii_lowercase).as_deref() {
            None | Some("") | Some("asc") => Direction::Asc,
            Some("desc") => Direction::Desc,
            Some(other) => return Err(ServiceError::Validation(format!("invalid sort direction: {other}"))),
        };
        if parts.next().is_some() {
            return Err(ServiceError::Validation(format!("invalid sort: {raw}")));
        }
        Ok(Self { field: field.to_string(), direction })
    }
}

/// Pagination parameters
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    /// 0-based page index
    pub page: u64,
    /// items per page
    pub size: u64,
    pub sort: Option<Sort>,
}

impl PageRequest {
    pub fn new(page: u64, size: u64) -> Self { Self { page, size, sort: None } }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Clamp size into `1..=MAX_PAGE_SIZE`; a zero size means the default.
    pub fn normalize(&self) -> (u64, u64) {
        let size = if self.size == 0 { DEFAULT_PAGE_SIZE } else { self.size.min(MAX_PAGE_SIZE) };
        (self.page, size)
    }
}

impl Default for PageRequest {
    fn default() -> Self { Self::new(0, DEFAULT_PAGE_SIZE) }
}

/// One window of a larger result set.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, total_elements: u64, size: u64) -> Self {
        Self { content, total_elements, total_pages: total_pages(total_elements, size) }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

pub fn total_pages(total_elements: u64, size: u64) -> u64 {
    if size == 0 { 0 } else { total_elements.div_ceil(size) }
}
