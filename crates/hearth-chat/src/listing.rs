//! All-properties listing with debounced filter-driven fetching.
//!
//! Filter edits replace the set wholesale, reset the page to 1, and
//! schedule a fetch after a quiet period; a new edit inside the window
//! cancels and restarts the timer. Page changes fetch immediately and do
//! not reset. A failed fetch empties the result set rather than keeping
//! stale rows, and raises a notification.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tracing::{debug, error};

use hearth_client::ApiClient;
use hearth_core::config::ListingConfig;
use hearth_core::filters::Filters;
use hearth_core::types::{PageInfo, Property};

use crate::debounce::Debouncer;
use crate::notify::NotificationSink;

#[derive(Debug)]
struct ListingState {
    filters: Filters,
    page_info: PageInfo,
    properties: Vec<Property>,
    loading: bool,
}

/// Controller for the paginated all-properties view.
pub struct ListingController {
    client: ApiClient,
    sink: Arc<dyn NotificationSink>,
    debouncer: Debouncer,
    state: Mutex<ListingState>,
}

impl ListingController {
    pub fn new(client: ApiClient, sink: Arc<dyn NotificationSink>, config: &ListingConfig) -> Self {
        Self {
            client,
            sink,
            debouncer: Debouncer::new(Duration::from_millis(config.debounce_ms)),
            state: Mutex::new(ListingState {
                filters: Filters::default(),
                page_info: PageInfo::first(config.page_size),
                properties: Vec::new(),
                loading: false,
            }),
        }
    }

    /// Replace the filter set wholesale, reset to page 1, and schedule a
    /// debounced fetch.
    pub fn set_filters(self: &Arc<Self>, filters: Filters) {
        {
            let mut state = self.lock_state();
            state.filters = filters;
            state.page_info.page = 1;
        }
        let this = Arc::clone(self);
        self.debouncer.call(async move {
            this.fetch_now().await;
        });
    }

    /// Drop all filter constraints (page resets like any filter change).
    pub fn clear_filters(self: &Arc<Self>) {
        self.set_filters(Filters::default());
    }

    /// Replace the filter set and reset to page 1 without scheduling a
    /// fetch. For one-shot callers that fetch explicitly afterwards.
    pub fn replace_filters(&self, filters: Filters) {
        let mut state = self.lock_state();
        state.filters = filters;
        state.page_info.page = 1;
    }

    /// Jump to a page and fetch immediately. Page-only changes do not
    /// reset or debounce.
    pub async fn set_page(self: &Arc<Self>, page: u32) {
        {
            let mut state = self.lock_state();
            state.page_info.page = page.max(1);
        }
        self.fetch_now().await;
    }

    /// Fetch the current page with the current filters.
    pub async fn fetch_now(self: &Arc<Self>) {
        let (page, limit, filters) = {
            let mut state = self.lock_state();
            state.loading = true;
            (
                state.page_info.page,
                state.page_info.limit,
                state.filters.clone(),
            )
        };

        match self.client.list_properties(page, limit, &filters).await {
            Ok(result) => {
                debug!(
                    "Fetched {} properties (page {} of {})",
                    result.properties.len(),
                    result.pagination.page,
                    result.pagination.total_pages
                );
                let mut state = self.lock_state();
                state.properties = result.properties;
                state.page_info.total = result.pagination.total;
                state.page_info.total_pages = result.pagination.total_pages;
                state.loading = false;
            }
            Err(e) => {
                error!("Failed to fetch properties: {}", e);
                {
                    let mut state = self.lock_state();
                    state.properties.clear();
                    state.loading = false;
                }
                self.sink
                    .notify("Error", "Failed to fetch properties. Please try again.");
            }
        }
    }

    // -- Accessors --

    pub fn properties(&self) -> Vec<Property> {
        self.lock_state().properties.clone()
    }

    pub fn page_info(&self) -> PageInfo {
        self.lock_state().page_info.clone()
    }

    pub fn filters(&self) -> Filters {
        self.lock_state().filters.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock_state().loading
    }

    fn lock_state(&self) -> MutexGuard<'_, ListingState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
