//! Product list screen state.
//!
//! # Responsibility
//! - Own the fetched catalog, free-text query and pagination parameters.
//! - Derive the filtered, paginated view.
//! - Drive row menus, delete confirmation and reload-after-delete.
//!
//! # Invariants
//! - `page` stays within `[1, total_pages]`; query and page-size changes
//!   reset it to 1.
//! - A successful delete is followed by a full reload, never a local removal.
//! - A failed delete leaves the list untouched.

use crate::gateway::{GatewayResult, ProductsGateway};
use crate::model::product::{Product, ProductId};
use crate::route::Navigation;
use log::{info, warn};

pub const LOAD_ERROR_MESSAGE: &str = "Could not load products.";
pub const DELETE_ERROR_MESSAGE: &str = "Could not delete the product.";
/// Placeholder rows rendered while a load is in flight.
pub const SKELETON_ROWS: usize = 5;

/// Data from which the visible page is derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListViewState {
    pub products: Vec<Product>,
    pub query: String,
    /// 1-based.
    pub page: usize,
    /// Always >= 1.
    pub page_size: usize,
}

impl ListViewState {
    pub fn new(page_size: usize) -> Self {
        Self {
            products: Vec::new(),
            query: String::new(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn filtered(&self) -> Vec<&Product> {
        filter_products(&self.products, &self.query)
    }

    pub fn total(&self) -> usize {
        self.filtered().len()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total(), self.page_size)
    }

    fn clamp_page(&mut self) {
        self.page = self.page.clamp(1, self.total_pages());
    }
}

/// Derived page of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub rows: Vec<Product>,
    pub total: usize,
    pub total_pages: usize,
    pub page: usize,
    pub page_size: usize,
}

/// Full list screen view model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub page: PageView,
    pub query: String,
    pub loading: bool,
    pub error: Option<String>,
    pub skeleton_rows: usize,
    pub menu_open_id: Option<String>,
    pub delete_modal_open: bool,
    pub delete_target: Option<Product>,
}

/// Result of a delete confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// No product was selected; nothing was sent.
    Skipped,
    /// Deleted and reloaded.
    Deleted,
    Failed,
}

/// Filters by case-insensitive substring over id, name and description.
///
/// A blank query returns every product in original order.
pub fn filter_products<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return products.iter().collect();
    }
    products
        .iter()
        .filter(|product| product.matches_needle(&needle))
        .collect()
}

/// `max(1, ceil(total / page_size))`; a zero page size counts as 1.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// Contiguous slice `[(page-1)*size, page*size)` clipped to `items`.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let page_size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Pure derivation of the visible page.
pub fn derive_view(state: &ListViewState) -> PageView {
    let filtered = state.filtered();
    let total = filtered.len();
    PageView {
        rows: page_slice(&filtered, state.page, state.page_size)
            .iter()
            .map(|product| (*product).clone())
            .collect(),
        total,
        total_pages: total_pages(total, state.page_size),
        page: state.page,
        page_size: state.page_size,
    }
}

/// List screen state bound to a gateway.
pub struct ProductListState<G: ProductsGateway> {
    gateway: G,
    view: ListViewState,
    loading: bool,
    error: Option<String>,
    menu_open_id: Option<String>,
    delete_modal_open: bool,
    product_to_delete: Option<Product>,
}

impl<G: ProductsGateway> ProductListState<G> {
    pub fn new(gateway: G, page_size: usize) -> Self {
        Self {
            gateway,
            view: ListViewState::new(page_size),
            loading: false,
            error: None,
            menu_open_id: None,
            delete_modal_open: false,
            product_to_delete: None,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn state(&self) -> &ListViewState {
        &self.view
    }

    pub fn products(&self) -> &[Product] {
        &self.view.products
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn menu_open_id(&self) -> Option<&str> {
        self.menu_open_id.as_deref()
    }

    pub fn is_delete_modal_open(&self) -> bool {
        self.delete_modal_open
    }

    pub fn product_to_delete(&self) -> Option<&Product> {
        self.product_to_delete.as_ref()
    }

    /// Fetches the full catalog.
    ///
    /// Equivalent to [`Self::begin_load`], a gateway `list()` call and
    /// [`Self::finish_load`].
    pub async fn load(&mut self) {
        self.begin_load();
        let result = self.gateway.list().await;
        self.finish_load(result);
    }

    /// Marks a catalog fetch as in flight and clears the previous error.
    ///
    /// The loading flag stays set until a result is applied.
    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Applies a finished catalog fetch.
    ///
    /// On success the products are replaced and the page resets to 1; on
    /// failure the previous products stay and a generic error is set. The
    /// loading flag is cleared in both cases. Overlapping fetches are not
    /// sequenced: the last result applied wins.
    pub fn finish_load(&mut self, result: GatewayResult<Vec<Product>>) {
        self.loading = false;

        match result {
            Ok(products) => {
                info!(
                    "event=products_load module=list status=ok count={}",
                    products.len()
                );
                self.replace_products(products);
            }
            Err(err) => {
                warn!(
                    "event=products_load module=list status=error error={}",
                    err
                );
                self.error = Some(LOAD_ERROR_MESSAGE.to_string());
            }
        }
    }

    /// Replaces the catalog and returns to the first page.
    pub fn replace_products(&mut self, products: Vec<Product>) {
        self.view.products = products;
        self.view.page = 1;
    }

    /// Sets the free-text query (`None` clears it) and returns to the
    /// first page.
    pub fn set_query(&mut self, query: Option<&str>) {
        self.view.query = query.unwrap_or_default().to_string();
        self.view.page = 1;
    }

    /// Sets the page size (0 counts as 1) and returns to the first page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.view.page_size = page_size.max(1);
        self.view.page = 1;
    }

    /// Jumps to `page`, clamped into `[1, total_pages]`.
    pub fn set_page(&mut self, page: usize) {
        self.view.page = page;
        self.view.clamp_page();
    }

    pub fn prev_page(&mut self) {
        self.view.page = self.view.page.saturating_sub(1).max(1);
    }

    pub fn next_page(&mut self) {
        self.view.page = self
            .view
            .page
            .saturating_add(1)
            .min(self.view.total_pages());
    }

    pub fn filtered_products(&self) -> Vec<&Product> {
        self.view.filtered()
    }

    pub fn total(&self) -> usize {
        self.view.total()
    }

    pub fn total_pages(&self) -> usize {
        self.view.total_pages()
    }

    pub fn paged_products(&self) -> Vec<Product> {
        derive_view(&self.view).rows
    }

    /// Opens the row menu for `id`, or closes it if it is already open.
    pub fn toggle_menu(&mut self, id: &str) {
        if self.menu_open_id.as_deref() == Some(id) {
            self.menu_open_id = None;
        } else {
            self.menu_open_id = Some(id.to_string());
        }
    }

    pub fn close_menu(&mut self) {
        self.menu_open_id = None;
    }

    /// Closes the menu and returns navigation to the edit screen, carrying
    /// `product` so the form can skip its fetch.
    pub fn edit_product(&mut self, product: &Product) -> Navigation {
        self.close_menu();
        Navigation::edit(product.clone())
    }

    /// Captures `product` as the delete target and opens confirmation.
    pub fn open_delete_modal(&mut self, product: &Product) {
        self.close_menu();
        self.product_to_delete = Some(product.clone());
        self.delete_modal_open = true;
    }

    pub fn close_delete_modal(&mut self) {
        self.delete_modal_open = false;
        self.product_to_delete = None;
    }

    /// Deletes the selected product.
    ///
    /// Success closes the confirmation and reloads the catalog. Failure
    /// closes the confirmation and sets a generic error without reloading.
    pub async fn confirm_delete(&mut self) -> DeleteOutcome {
        let Some(target_id) = self.begin_delete() else {
            return DeleteOutcome::Skipped;
        };

        let result = self.gateway.delete(&target_id).await;
        let outcome = self.finish_delete(&target_id, result);
        if outcome == DeleteOutcome::Deleted {
            let reloaded = self.gateway.list().await;
            self.finish_load(reloaded);
        }
        outcome
    }

    /// Id of the product a confirmed delete should remove; `None` when
    /// nothing is selected.
    pub fn begin_delete(&self) -> Option<ProductId> {
        let target = self.product_to_delete.as_ref().map(|p| p.id.clone());
        if target.is_none() {
            info!("event=product_delete module=list status=skipped reason=no_target");
        }
        target
    }

    /// Applies a finished delete of `target_id`.
    ///
    /// Both outcomes close the confirmation. On success the reload is begun
    /// (see [`Self::begin_load`]) and must be completed with
    /// [`Self::finish_load`]; on failure the generic error is set and the
    /// list is left as is.
    pub fn finish_delete(&mut self, target_id: &str, result: GatewayResult<()>) -> DeleteOutcome {
        self.close_delete_modal();
        match result {
            Ok(()) => {
                info!(
                    "event=product_delete module=list status=ok id={}",
                    target_id
                );
                self.begin_load();
                DeleteOutcome::Deleted
            }
            Err(err) => {
                warn!(
                    "event=product_delete module=list status=error id={} error={}",
                    target_id, err
                );
                self.error = Some(DELETE_ERROR_MESSAGE.to_string());
                DeleteOutcome::Failed
            }
        }
    }

    /// Synchronous view model for rendering.
    pub fn view(&self) -> ListView {
        ListView {
            page: derive_view(&self.view),
            query: self.view.query.clone(),
            loading: self.loading,
            error: self.error.clone(),
            skeleton_rows: SKELETON_ROWS,
            menu_open_id: self.menu_open_id.clone(),
            delete_modal_open: self.delete_modal_open,
            delete_target: self.product_to_delete.clone(),
        }
    }
}
