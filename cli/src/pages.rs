//! List screen state
//!
//! One [`PageState`] per resource screen holds everything the screen shows:
//! the query being displayed, the last page fetched for it, the bulk-select
//! set, and an inline error slot. Mutators only touch the query and report
//! whether a refetch is needed; the caller performs at most one fetch per
//! command.
//!
//! Fetches are tied to a generation counter. Every fetch takes a
//! [`FetchTicket`] and a response is only applied when its ticket is still
//! current, so a slow response can never overwrite the state of a newer
//! query.

use std::collections::HashSet;

use moneta_link::{ApiResource, ListQuery, Page, SortOrder};

/// Proof of which fetch a response belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// State behind one resource list screen
#[derive(Debug, Clone)]
pub struct PageState<R> {
    query: ListQuery,
    page: Option<Page<R>>,
    selection: HashSet<u64>,
    error: Option<String>,
    generation: u64,
}

impl<R: ApiResource> PageState<R> {
    pub fn new(page_size: u32) -> Self {
        Self {
            query: ListQuery::new(page_size),
            page: None,
            selection: HashSet::new(),
            error: None,
            generation: 0,
        }
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    /// The page currently displayed, when one has loaded
    pub fn page(&self) -> Option<&Page<R>> {
        self.page.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selection(&self) -> &HashSet<u64> {
        &self.selection
    }

    /// Start a fetch for the current query
    ///
    /// Invalidates every ticket handed out before, so responses still in
    /// flight for older queries are dropped on arrival.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket(self.generation)
    }

    /// Apply a fetched page; returns false when the ticket is stale
    pub fn apply(&mut self, ticket: FetchTicket, page: Page<R>) -> bool {
        if ticket.0 != self.generation {
            log::debug!("[SCREEN] Dropping stale {} page response", R::LABEL);
            return false;
        }
        self.query.page = page.page;
        self.page = Some(page);
        self.error = None;
        true
    }

    /// Record a failed fetch; returns false when the ticket is stale
    ///
    /// The previous page stays on screen next to the error, a failed refetch
    /// never blanks data the user is looking at.
    pub fn fail(&mut self, ticket: FetchTicket, message: String) -> bool {
        if ticket.0 != self.generation {
            log::debug!("[SCREEN] Dropping stale {} page error", R::LABEL);
            return false;
        }
        self.error = Some(message);
        true
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Advance one page; false when already on the last known page
    pub fn next_page(&mut self) -> bool {
        match &self.page {
            Some(page) if page.has_next() => {
                self.query.page += 1;
                true
            }
            _ => false,
        }
    }

    /// Go back one page; false when already on the first
    pub fn prev_page(&mut self) -> bool {
        if self.query.page > 1 {
            self.query.page -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to a page, clamped to the known page range
    pub fn goto_page(&mut self, page: u32) -> bool {
        let mut target = page.max(1);
        if let Some(current) = &self.page {
            target = target.min(current.total_pages().max(1));
        }
        if target == self.query.page {
            return false;
        }
        self.query.page = target;
        true
    }

    /// Set or clear the free-text search; resets to page 1 on change
    pub fn set_search(&mut self, search: Option<String>) -> bool {
        let search = search.filter(|s| !s.trim().is_empty());
        if self.query.search == search {
            return false;
        }
        self.query.search = search;
        self.query.page = 1;
        true
    }

    /// Toggle a field filter on or off; resets to page 1
    pub fn toggle_filter(&mut self, key: &str, value: &str) -> bool {
        let entry = (key.to_string(), value.to_string());
        if let Some(pos) = self.query.filters.iter().position(|f| *f == entry) {
            self.query.filters.remove(pos);
        } else {
            self.query.filters.push(entry);
        }
        self.query.page = 1;
        true
    }

    /// Drop the search and all field filters; false when none were set
    pub fn clear_filters(&mut self) -> bool {
        if self.query.search.is_none() && self.query.filters.is_empty() {
            return false;
        }
        self.query.search = None;
        self.query.filters.clear();
        self.query.page = 1;
        true
    }

    /// Change the sort column and direction; resets to page 1 on change
    pub fn set_sort(&mut self, field: Option<String>, order: SortOrder) -> bool {
        if self.query.sort == field && (field.is_none() || self.query.order == order) {
            return false;
        }
        self.query.sort = field;
        self.query.order = order;
        self.query.page = 1;
        true
    }

    /// Toggle one record in the bulk-select set; returns whether it is now selected
    pub fn toggle_select(&mut self, id: u64) -> bool {
        if self.selection.remove(&id) {
            false
        } else {
            self.selection.insert(id);
            true
        }
    }

    /// Select every record on the current page
    pub fn select_page(&mut self) -> usize {
        if let Some(page) = &self.page {
            for item in &page.items {
                self.selection.insert(item.id());
            }
        }
        self.selection.len()
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Drop one id from the selection, e.g. after its record is deleted
    pub fn deselect(&mut self, id: u64) {
        self.selection.remove(&id);
    }

    /// Selected ids in ascending order, for a bulk-delete request
    pub fn selected_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.selection.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Reset after a bulk delete: the selection is gone and the screen needs
    /// exactly one refetch to show the surviving records.
    pub fn after_bulk_delete(&mut self) -> bool {
        self.selection.clear();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moneta_link::Product;

    fn product(id: u64) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("Item {id}"),
            "sku": format!("SKU-{id}"),
            "unit_price": 10.0,
            "quantity_on_hand": 3,
            "created_at": "2026-01-05T09:00:00Z",
            "updated_at": "2026-01-05T09:00:00Z",
        }))
        .unwrap()
    }

    fn page(page_no: u32, ids: &[u64], total: u64) -> Page<Product> {
        Page {
            items: ids.iter().map(|id| product(*id)).collect(),
            total_count: total,
            page: page_no,
            page_size: 10,
        }
    }

    fn loaded_state() -> PageState<Product> {
        let mut state = PageState::new(10);
        let ticket = state.begin_fetch();
        state.apply(ticket, page(1, &[1, 2, 3], 30));
        state
    }

    #[test]
    fn test_apply_sets_page_and_clears_error() {
        let mut state: PageState<Product> = PageState::new(10);
        let ticket = state.begin_fetch();
        state.fail(ticket, "boom".to_string());
        assert_eq!(state.error(), Some("boom"));

        let ticket = state.begin_fetch();
        assert!(state.apply(ticket, page(1, &[1], 1)));

        assert!(state.error().is_none());
        assert_eq!(state.page().unwrap().items.len(), 1);
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut state: PageState<Product> = PageState::new(10);
        let old_ticket = state.begin_fetch();
        let new_ticket = state.begin_fetch();

        // The response for the superseded fetch arrives late
        assert!(!state.apply(old_ticket, page(1, &[99], 1)));
        assert!(state.page().is_none());

        assert!(state.apply(new_ticket, page(1, &[1], 1)));
        assert_eq!(state.page().unwrap().items[0].id, 1);
    }

    #[test]
    fn test_stale_error_is_dropped() {
        let mut state: PageState<Product> = PageState::new(10);
        let old_ticket = state.begin_fetch();
        let _new_ticket = state.begin_fetch();

        assert!(!state.fail(old_ticket, "late failure".to_string()));
        assert!(state.error().is_none());
    }

    #[test]
    fn test_failed_refetch_keeps_previous_page() {
        let mut state = loaded_state();

        let ticket = state.begin_fetch();
        state.fail(ticket, "server error".to_string());

        assert_eq!(state.error(), Some("server error"));
        assert_eq!(state.page().unwrap().items.len(), 3);
    }

    #[test]
    fn test_next_page_requires_more_pages() {
        let mut state = loaded_state();
        assert!(state.next_page());
        assert_eq!(state.query().page, 2);

        // Single-page result: next is a no-op
        let mut state: PageState<Product> = PageState::new(10);
        let ticket = state.begin_fetch();
        state.apply(ticket, page(1, &[1], 1));
        assert!(!state.next_page());
        assert_eq!(state.query().page, 1);
    }

    #[test]
    fn test_prev_page_stops_at_first() {
        let mut state = loaded_state();
        assert!(!state.prev_page());
        state.next_page();
        assert!(state.prev_page());
        assert_eq!(state.query().page, 1);
    }

    #[test]
    fn test_goto_page_clamps_to_known_range() {
        let mut state = loaded_state();
        assert!(state.goto_page(99));
        assert_eq!(state.query().page, 3);

        assert!(state.goto_page(0));
        assert_eq!(state.query().page, 1);

        // Already there: no refetch
        assert!(!state.goto_page(1));
    }

    #[test]
    fn test_search_change_resets_to_first_page() {
        let mut state = loaded_state();
        state.goto_page(3);

        assert!(state.set_search(Some("chair".to_string())));
        assert_eq!(state.query().page, 1);
        assert_eq!(state.query().search.as_deref(), Some("chair"));

        // Same search again: no refetch
        assert!(!state.set_search(Some("chair".to_string())));

        // Blank search counts as cleared
        assert!(state.set_search(Some("  ".to_string())));
        assert!(state.query().search.is_none());
    }

    #[test]
    fn test_filter_toggle_resets_to_first_page() {
        let mut state = loaded_state();
        state.goto_page(2);

        assert!(state.toggle_filter("category", "furniture"));
        assert_eq!(state.query().page, 1);
        assert_eq!(state.query().filters.len(), 1);

        // Toggling the same pair removes it
        assert!(state.toggle_filter("category", "furniture"));
        assert!(state.query().filters.is_empty());
    }

    #[test]
    fn test_sort_change_resets_to_first_page() {
        let mut state = loaded_state();
        state.goto_page(2);

        assert!(state.set_sort(Some("name".to_string()), SortOrder::Desc));
        assert_eq!(state.query().page, 1);

        // Same sort again: no refetch
        assert!(!state.set_sort(Some("name".to_string()), SortOrder::Desc));

        // Direction flip alone still counts
        assert!(state.set_sort(Some("name".to_string()), SortOrder::Asc));
    }

    #[test]
    fn test_clear_filters_only_refetches_when_something_was_set() {
        let mut state = loaded_state();
        assert!(!state.clear_filters());

        state.set_search(Some("desk".to_string()));
        state.toggle_filter("category", "furniture");
        assert!(state.clear_filters());
        assert!(state.query().search.is_none());
        assert!(state.query().filters.is_empty());
    }

    #[test]
    fn test_selection_toggle_and_select_page() {
        let mut state = loaded_state();

        assert!(state.toggle_select(2));
        assert!(!state.toggle_select(2));
        assert!(state.selection().is_empty());

        assert_eq!(state.select_page(), 3);
        assert_eq!(state.selected_ids(), vec![1, 2, 3]);
    }

    #[test]
    fn test_bulk_delete_clears_selection_and_needs_one_refetch() {
        let mut state = loaded_state();
        state.toggle_select(1);
        state.toggle_select(3);

        let mut refetches = 0;
        if state.after_bulk_delete() {
            refetches += 1;
        }

        assert!(state.selection().is_empty());
        assert_eq!(refetches, 1);
    }

    #[test]
    fn test_selection_survives_paging() {
        let mut state = loaded_state();
        state.toggle_select(2);

        state.next_page();
        let ticket = state.begin_fetch();
        state.apply(ticket, page(2, &[4, 5], 30));

        assert!(state.selection().contains(&2));
    }
}
