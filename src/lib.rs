//! Client-side store for the products catalogue REST API.
//!
//! Holds the current page of products plus pagination metadata, and
//! forwards create, update and delete requests to the backend.
//!
//! # Example
//!
//! ```ignore
//! use shelf::{ProductQuery, ProductsStore};
//!
//! let store = ProductsStore::new("http://localhost:5086/api", 4);
//! store.initialize_products(1, 4).await?;
//! store.fetch_products(ProductQuery::new(2, 4).name("mug")).await?;
//!
//! for product in store.products().await {
//!     println!("{} {}", product.id, product.title);
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod store;

pub use api::http::HttpProductApi;
pub use api::ProductApi;
pub use config::Config;
pub use error::{Error, Result};
pub use form::{ImageFile, ProductForm};
pub use shelf_core::{PaginatedProducts, Product, ProductInput, ProductQuery};
pub use store::{ProductsStore, StoreState};
