//! Immutable dashboard UI state.
//!
//! Every transition consumes the current state and returns a new one, so
//! a rendered view can always be traced back to exactly one state value.
//! The page-reset rules live here rather than in the pipeline stages:
//! changing filters, sort, or page size goes back to page 1.

use serde::{Deserialize, Serialize};

use crate::models::{DashboardFilters, PaginationState, SortField, SortState};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardState {
    pub filters: DashboardFilters,
    pub sort: SortState,
    pub pagination: PaginationState,
}

impl DashboardState {
    /// Replace the filters and return to page 1.
    pub fn with_filters(self, filters: DashboardFilters) -> Self {
        Self {
            filters,
            pagination: PaginationState {
                current_page: 1,
                ..self.pagination
            },
            ..self
        }
    }

    /// Apply a sort-column selection (see [`SortState::select`]) and return
    /// to page 1.
    pub fn with_sort_field(self, field: SortField) -> Self {
        Self {
            sort: self.sort.select(field),
            pagination: PaginationState {
                current_page: 1,
                ..self.pagination
            },
            ..self
        }
    }

    /// Move to `page` as given; out-of-range pages render empty.
    pub fn with_page(self, page: usize) -> Self {
        Self {
            pagination: PaginationState {
                current_page: page,
                ..self.pagination
            },
            ..self
        }
    }

    /// Change the page size and return to page 1.
    pub fn with_page_size(self, page_size: usize) -> Self {
        Self {
            pagination: PaginationState {
                current_page: 1,
                page_size,
                ..self.pagination
            },
            ..self
        }
    }

    /// Record the derived item count of the current filter result.
    pub fn with_total_items(self, total_items: usize) -> Self {
        Self {
            pagination: PaginationState {
                total_items,
                ..self.pagination
            },
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SortOrder;

    #[test]
    fn test_filter_change_resets_page() {
        let state = DashboardState::default().with_page(4);
        let next = state.clone().with_filters(DashboardFilters {
            search: "aoi".to_string(),
            ..DashboardFilters::default()
        });
        assert_eq!(next.pagination.current_page, 1);
        assert_eq!(next.filters.search, "aoi");
        assert_eq!(state.pagination.current_page, 4);
    }

    #[test]
    fn test_sort_toggle_and_switch() {
        let state = DashboardState::default().with_page(3);
        let toggled = state.with_sort_field(SortField::Subscribers);
        assert_eq!(toggled.sort.order, SortOrder::Asc);
        assert_eq!(toggled.pagination.current_page, 1);

        let switched = toggled.with_sort_field(SortField::TotalViews);
        assert_eq!(switched.sort.field, SortField::TotalViews);
        assert_eq!(switched.sort.order, SortOrder::Desc);
    }

    #[test]
    fn test_page_size_change_resets_page() {
        let state = DashboardState::default().with_page(2).with_page_size(50);
        assert_eq!(state.pagination.page_size, 50);
        assert_eq!(state.pagination.current_page, 1);
    }

    #[test]
    fn test_page_is_not_clamped() {
        let state = DashboardState::default().with_total_items(10).with_page(99);
        assert_eq!(state.pagination.current_page, 99);
        assert_eq!(state.pagination.total_items, 10);
    }
}
