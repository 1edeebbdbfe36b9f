//! Client table state machine
//!
//! Single source of truth for everything a data table tracks between
//! renders: filters, sort, search, pagination, column layout, selection,
//! and grouping. State changes go through [`TableState::apply`] so the
//! invariants live in one place; fetching on state change is the caller's
//! concern.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::types::{Filter, FilterOperator, FilterValue, SortSpec};

/// A filter condition plus the client-only id used to address it in the UI.
/// The id never travels over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableFilter {
    pub id: String,
    pub field: String,
    pub operator: FilterOperator,
    pub value: FilterValue,
}

impl TableFilter {
    /// Create a filter with a fresh client id.
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: FilterValue) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            field: field.into(),
            operator,
            value,
        }
    }

    /// Strip the client id down to the wire shape.
    pub fn to_wire(&self) -> Filter {
        Filter {
            field: self.field.clone(),
            operator: self.operator,
            value: self.value.clone(),
        }
    }

    /// Wrap a wire filter with a fresh client id.
    pub fn from_wire(filter: Filter) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            field: filter.field,
            operator: filter.operator,
            value: filter.value,
        }
    }
}

/// Pagination slice of the table state. `page_index` is 0-based; the codec
/// converts to the wire's 1-based `page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    pub page_index: u32,
    pub page_size: u32,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: 50,
        }
    }
}

/// Complete in-memory description of a table's view state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableState {
    pub filters: Vec<TableFilter>,
    pub sort: Vec<SortSpec>,
    pub search: Option<String>,
    #[serde(default)]
    pub pagination: PaginationState,
    pub column_visibility: BTreeMap<String, bool>,
    pub column_order: Vec<String>,
    pub column_widths: BTreeMap<String, u32>,
    pub selected_rows: BTreeSet<String>,
    pub grouping: Vec<String>,
}

/// Every transition the table state supports.
#[derive(Debug, Clone, PartialEq)]
pub enum TableAction {
    FilterAdd(TableFilter),
    FilterRemove { id: String },
    FilterUpdate(TableFilter),
    FilterClear,
    ColumnToggle { column: String },
    ColumnReorder { order: Vec<String> },
    ColumnResize { column: String, width: u32 },
    /// Replace the sort list with a single entry.
    Sort(SortSpec),
    SortClear,
    SearchSet(Option<String>),
    PaginationSet { page_index: u32, page_size: u32 },
    SelectionSet { ids: Vec<String>, selected: bool },
    SelectionClear,
    GroupingSet(Vec<String>),
    GroupingClear,
    StateReset,
    StateRestore(Box<TableState>),
}

impl TableState {
    /// Apply one action. Changing the search criteria resets pagination to
    /// the first page so the user is never stranded past the new result set;
    /// filter and sort changes deliberately leave pagination alone.
    pub fn apply(&mut self, action: TableAction) {
        match action {
            TableAction::FilterAdd(filter) => {
                self.filters.push(filter);
            }
            TableAction::FilterRemove { id } => {
                self.filters.retain(|f| f.id != id);
            }
            TableAction::FilterUpdate(filter) => {
                if let Some(existing) = self.filters.iter_mut().find(|f| f.id == filter.id) {
                    *existing = filter;
                }
            }
            TableAction::FilterClear => {
                self.filters.clear();
            }
            TableAction::ColumnToggle { column } => {
                let visible = self.column_visibility.entry(column).or_insert(true);
                *visible = !*visible;
            }
            TableAction::ColumnReorder { order } => {
                self.column_order = order;
            }
            TableAction::ColumnResize { column, width } => {
                self.column_widths.insert(column, width);
            }
            TableAction::Sort(spec) => {
                self.sort = vec![spec];
            }
            TableAction::SortClear => {
                self.sort.clear();
            }
            TableAction::SearchSet(search) => {
                self.search = search.filter(|s| !s.is_empty());
                self.pagination.page_index = 0;
            }
            TableAction::PaginationSet {
                page_index,
                page_size,
            } => {
                self.pagination = PaginationState {
                    page_index,
                    page_size,
                };
            }
            TableAction::SelectionSet { ids, selected } => {
                if selected {
                    self.selected_rows.extend(ids);
                } else {
                    for id in &ids {
                        self.selected_rows.remove(id);
                    }
                }
            }
            TableAction::SelectionClear => {
                self.selected_rows.clear();
            }
            TableAction::GroupingSet(columns) => {
                self.grouping = columns;
            }
            TableAction::GroupingClear => {
                self.grouping.clear();
            }
            TableAction::StateReset => {
                *self = TableState::default();
            }
            TableAction::StateRestore(state) => {
                *self = *state;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::types::Scalar;

    fn category_filter() -> TableFilter {
        TableFilter::new(
            "category",
            FilterOperator::Equals,
            FilterValue::Scalar(Scalar::Text("Electronics".into())),
        )
    }

    #[test]
    fn filter_add_remove_update() {
        let mut state = TableState::default();
        let filter = category_filter();
        let id = filter.id.clone();

        state.apply(TableAction::FilterAdd(filter));
        assert_eq!(state.filters.len(), 1);

        let mut updated = state.filters[0].clone();
        updated.value = FilterValue::Scalar(Scalar::Text("Toys".into()));
        state.apply(TableAction::FilterUpdate(updated));
        assert_eq!(
            state.filters[0].value,
            FilterValue::Scalar(Scalar::Text("Toys".into()))
        );

        state.apply(TableAction::FilterRemove { id });
        assert!(state.filters.is_empty());
    }

    #[test]
    fn filter_update_ignores_unknown_id() {
        let mut state = TableState::default();
        state.apply(TableAction::FilterAdd(category_filter()));
        let before = state.filters.clone();

        state.apply(TableAction::FilterUpdate(category_filter()));
        assert_eq!(state.filters, before);
    }

    #[test]
    fn search_set_resets_page_index() {
        let mut state = TableState::default();
        state.apply(TableAction::PaginationSet {
            page_index: 3,
            page_size: 25,
        });
        assert_eq!(state.pagination.page_index, 3);

        state.apply(TableAction::SearchSet(Some("widget".into())));
        assert_eq!(state.pagination.page_index, 0);
        assert_eq!(state.pagination.page_size, 25);
        assert_eq!(state.search.as_deref(), Some("widget"));
    }

    #[test]
    fn empty_search_clears_but_still_resets_page() {
        let mut state = TableState::default();
        state.search = Some("widget".into());
        state.pagination.page_index = 2;

        state.apply(TableAction::SearchSet(Some(String::new())));
        assert_eq!(state.search, None);
        assert_eq!(state.pagination.page_index, 0);
    }

    #[test]
    fn filter_and_sort_changes_leave_pagination_alone() {
        let mut state = TableState::default();
        state.pagination.page_index = 4;

        state.apply(TableAction::FilterAdd(category_filter()));
        assert_eq!(state.pagination.page_index, 4);

        state.apply(TableAction::Sort(SortSpec::asc("name")));
        assert_eq!(state.pagination.page_index, 4);

        state.apply(TableAction::FilterClear);
        state.apply(TableAction::SortClear);
        assert_eq!(state.pagination.page_index, 4);
    }

    #[test]
    fn sort_replaces_previous_entry() {
        let mut state = TableState::default();
        state.apply(TableAction::Sort(SortSpec::asc("name")));
        state.apply(TableAction::Sort(SortSpec::desc("price")));
        assert_eq!(state.sort, vec![SortSpec::desc("price")]);
    }

    #[test]
    fn column_toggle_flips_visibility() {
        let mut state = TableState::default();
        state.apply(TableAction::ColumnToggle {
            column: "price".into(),
        });
        assert_eq!(state.column_visibility.get("price"), Some(&false));

        state.apply(TableAction::ColumnToggle {
            column: "price".into(),
        });
        assert_eq!(state.column_visibility.get("price"), Some(&true));
    }

    #[test]
    fn selection_set_and_clear() {
        let mut state = TableState::default();
        state.apply(TableAction::SelectionSet {
            ids: vec!["a".into(), "b".into()],
            selected: true,
        });
        assert_eq!(state.selected_rows.len(), 2);

        state.apply(TableAction::SelectionSet {
            ids: vec!["a".into()],
            selected: false,
        });
        assert!(!state.selected_rows.contains("a"));
        assert!(state.selected_rows.contains("b"));

        state.apply(TableAction::SelectionClear);
        assert!(state.selected_rows.is_empty());
    }

    #[test]
    fn reset_and_restore() {
        let mut state = TableState::default();
        state.apply(TableAction::FilterAdd(category_filter()));
        state.apply(TableAction::SearchSet(Some("widget".into())));
        let snapshot = state.clone();

        state.apply(TableAction::StateReset);
        assert_eq!(state, TableState::default());

        state.apply(TableAction::StateRestore(Box::new(snapshot.clone())));
        assert_eq!(state, snapshot);
    }
}
