//! Declarative parameters for the paginated service listing.
//!
//! Unrecognized sort inputs fall back to defaults rather than erroring, and
//! pagination is normalized to the `1..=MAX_PAGE_SIZE` window before any SQL
//! is built.

use std::time::Duration;

use sea_orm::Order;

use models::service;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Upper bound on a single builder invocation when the caller supplies no
/// deadline of its own.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Sortable columns; anything else resolves to `Id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    Id,
    Name,
    Description,
}

impl SortBy {
    pub fn parse(s: &str) -> Self {
        match s {
            "name" => Self::Name,
            "description" => Self::Description,
            _ => Self::Id,
        }
    }

    pub(crate) fn column(self) -> service::Column {
        match self {
            Self::Id => service::Column::Id,
            Self::Name => service::Column::Name,
            Self::Description => service::Column::Description,
        }
    }
}

/// Sort direction; anything other than "desc" resolves to ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn parse(s: &str) -> Self {
        match s {
            "desc" => Self::Desc,
            _ => Self::Asc,
        }
    }

    pub(crate) fn order(self) -> Order {
        match self {
            Self::Asc => Order::Asc,
            Self::Desc => Order::Desc,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListParams {
    /// 1-based page index
    pub page: u64,
    /// items per page
    pub page_size: u64,
    /// free-text filter on name and description; empty means no filter
    pub search: String,
    pub sort_by: SortBy,
    pub sort_dir: SortDir,
    /// include soft-deleted services when true
    pub show_deleted: bool,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            search: String::new(),
            sort_by: SortBy::default(),
            sort_dir: SortDir::default(),
            show_deleted: false,
        }
    }
}

impl ListParams {
    /// Clamp pagination to sane bounds.
    pub fn normalized(mut self) -> Self {
        if self.page == 0 {
            self.page = DEFAULT_PAGE;
        }
        self.page_size = self.page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    pub fn offset(&self) -> u64 {
        // Saturate: page is client-supplied and may be absurdly large
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_by_parses_known_columns() {
        assert_eq!(SortBy::parse("id"), SortBy::Id);
        assert_eq!(SortBy::parse("name"), SortBy::Name);
        assert_eq!(SortBy::parse("description"), SortBy::Description);
    }

    #[test]
    fn unrecognized_sort_column_falls_back_to_id() {
        assert_eq!(SortBy::parse("created_at"), SortBy::Id);
        assert_eq!(SortBy::parse(""), SortBy::Id);
        assert_eq!(SortBy::parse("NAME"), SortBy::Id);
    }

    #[test]
    fn sort_dir_defaults_to_asc() {
        assert_eq!(SortDir::parse("desc"), SortDir::Desc);
        assert_eq!(SortDir::parse("asc"), SortDir::Asc);
        assert_eq!(SortDir::parse("sideways"), SortDir::Asc);
    }

    #[test]
    fn normalize_clamps_page_and_page_size() {
        let p = ListParams { page: 0, page_size: 0, ..Default::default() }.normalized();
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, 1);

        let p = ListParams { page: 3, page_size: 1000, ..Default::default() }.normalized();
        assert_eq!(p.page, 3);
        assert_eq!(p.page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn offset_math() {
        let p = ListParams { page: 1, page_size: 10, ..Default::default() };
        assert_eq!(p.offset(), 0);
        let p = ListParams { page: 4, page_size: 25, ..Default::default() };
        assert_eq!(p.offset(), 75);
    }

    #[test]
    fn offset_saturates_instead_of_overflowing() {
        let p = ListParams { page: u64::MAX, page_size: 10, ..Default::default() };
        assert_eq!(p.offset(), u64::MAX);

        let p = ListParams { page: u64::MAX, page_size: u64::MAX, ..Default::default() };
        assert_eq!(p.offset(), u64::MAX);

        // page 0 is normalized upstream, but offset alone must not underflow
        let p = ListParams { page: 0, page_size: 10, ..Default::default() };
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn defaults_match_documented_values() {
        let p = ListParams::default();
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, 10);
        assert!(p.search.is_empty());
        assert!(!p.show_deleted);
    }
}
