//! Client-side products store.
//!
//! Holds the page of products last received from the server together with
//! its pagination metadata, and forwards writes to the [`ProductApi`].

use std::sync::Arc;

use shelf_core::{Product, ProductInput, ProductQuery};
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::api::http::HttpProductApi;
use crate::api::{PaginatedProducts, ProductApi};
use crate::config::Config;
use crate::error::Result;
use crate::form::{ImageFile, ProductForm};

/// Snapshot of the store's state.
///
/// `products` and the three page fields always describe the same,
/// last successfully received page.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreState {
    pub products: Vec<Product>,
    pub total_records: u32,
    pub page_number: u32,
    pub page_size: u32,
    /// Set once any page has been received.
    pub initialized: bool,
}

impl StoreState {
    fn new(page_size: u32) -> Self {
        Self {
            products: Vec::new(),
            total_records: 0,
            page_number: 1,
            page_size,
            initialized: false,
        }
    }

    fn replace(&mut self, page: PaginatedProducts) {
        self.products = page.data;
        self.total_records = page.total_records;
        self.page_number = page.page_number;
        self.page_size = page.page_size;
        self.initialized = true;
    }

    pub fn total_pages(&self) -> u32 {
        shelf_core::total_pages(self.total_records, self.page_size)
    }
}

/// Products store bound to one API backend.
///
/// The lock is only held while state is read or replaced, never across a
/// request, so overlapping fetches are not serialised: whichever response
/// lands last wins.
pub struct ProductsStore {
    api: Arc<dyn ProductApi>,
    state: RwLock<StoreState>,
}

impl ProductsStore {
    /// Create a store talking HTTP to `base_url`.
    pub fn new(base_url: impl Into<String>, page_size: u32) -> Self {
        Self::with_api(Arc::new(HttpProductApi::new(base_url)), page_size)
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.base_url.clone(), config.page_size)
    }

    /// Create a store with a custom API implementation.
    pub fn with_api(api: Arc<dyn ProductApi>, page_size: u32) -> Self {
        Self {
            api,
            state: RwLock::new(StoreState::new(page_size)),
        }
    }

    /// Fetch one page and replace the held page with it.
    ///
    /// On failure the error is logged and returned; state is untouched.
    pub async fn fetch_products(&self, query: ProductQuery) -> Result<()> {
        match self.api.list(&query).await {
            Ok(page) => {
                info!(
                    "Loaded products page {} ({} items, {} total)",
                    page.page_number,
                    page.data.len(),
                    page.total_records
                );
                self.state.write().await.replace(page);
                Ok(())
            }
            Err(e) => {
                error!("Failed to fetch products: {}", e);
                Err(e)
            }
        }
    }

    /// Fetch the first page unless one has already been received.
    pub async fn initialize_products(&self, page_number: u32, page_size: u32) -> Result<()> {
        if self.state.read().await.initialized {
            debug!("Products already initialized, skipping fetch");
            return Ok(());
        }
        self.fetch_products(ProductQuery::new(page_number, page_size)).await
    }

    /// Delete a product, then reload the current page.
    ///
    /// The reload uses the page number and size held after the delete
    /// returns. It does not step back when the page comes back empty.
    pub async fn delete_product(&self, id: i64) -> Result<()> {
        if let Err(e) = self.api.delete(id).await {
            error!("Failed to delete product {}: {}", id, e);
            return Err(e);
        }

        let query = {
            let state = self.state.read().await;
            ProductQuery::new(state.page_number, state.page_size)
        };
        self.fetch_products(query).await
    }

    /// Register a new product with its image. Does not reload the page.
    pub async fn create_product(&self, input: &ProductInput, image: ImageFile) -> Result<()> {
        let form = ProductForm::new(input, image);
        self.api.create(form).await.inspect_err(|e| {
            error!("Failed to create product: {}", e);
        })
    }

    /// Replace a product's fields and image. Does not reload the page.
    pub async fn update_product(&self, id: i64, input: &ProductInput, image: ImageFile) -> Result<()> {
        let form = ProductForm::new(input, image);
        self.api.update(id, form).await.inspect_err(|e| {
            error!("Failed to update product {}: {}", id, e);
        })
    }

    pub async fn state(&self) -> StoreState {
        self.state.read().await.clone()
    }

    pub async fn products(&self) -> Vec<Product> {
        self.state.read().await.products.clone()
    }

    pub async fn page_number(&self) -> u32 {
        self.state.read().await.page_number
    }

    pub async fn page_size(&self) -> u32 {
        self.state.read().await.page_size
    }

    pub async fn total_records(&self) -> u32 {
        self.state.read().await.total_records
    }

    pub async fn total_pages(&self) -> u32 {
        self.state.read().await.total_pages()
    }

    pub async fn is_initialized(&self) -> bool {
        self.state.read().await.initialized
    }
}
