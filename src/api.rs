use async_trait::async_trait;

pub use shelf_core::{PaginatedProducts, ProductQuery};

use crate::error::Result;
use crate::form::ProductForm;

pub mod http;

/// Products API endpoints
///
/// One method per endpoint; none of them touch client-side state.
#[async_trait]
pub trait ProductApi: Send + Sync {
    /// GET /Products with pagination and optional filters
    async fn list(&self, query: &ProductQuery) -> Result<PaginatedProducts>;

    /// POST /Products/register-with-image
    async fn create(&self, form: ProductForm) -> Result<()>;

    /// PUT /Products/{id}
    async fn update(&self, id: i64, form: ProductForm) -> Result<()>;

    /// DELETE /Products/{id}
    async fn delete(&self, id: i64) -> Result<()>;
}
