//! Core types for the shelf product catalogue client.
//!
//! This crate provides the data types exchanged with the products REST
//! API, shared by the `shelf` store and any other client that talks to
//! the same backend.
//!
//! # Overview
//!
//! The main types are:
//!
//! - [`Product`] - A product record as returned by the server
//! - [`PaginatedProducts`] - One page of products plus pagination metadata
//! - [`ProductInput`] - The write-side payload for create and update
//! - [`ProductQuery`] - Query parameters for listing products
//!
//! # Example
//!
//! Fetching a page of products:
//!
//! ```ignore
//! use shelf_core::{PaginatedProducts, ProductQuery};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = reqwest::Client::new();
//!
//! let page: PaginatedProducts = client
//!     .get("http://localhost:5086/api/Products")
//!     .query(&ProductQuery::new(1, 4).name("mug"))
//!     .send()
//!     .await?
//!     .json()
//!     .await?;
//!
//! for product in &page.data {
//!     println!("{} {}: {}", product.id, product.title, product.price);
//! }
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Deserializer, Serialize};

/// A product record owned by the server.
///
/// The client only ever holds a read-only copy; all changes go through
/// [`ProductInput`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Server-assigned primary key.
    pub id: i64,
    /// Identifier in the upstream catalogue the product was imported from.
    #[serde(default, deserialize_with = "null_as_default")]
    pub external_id: i64,
    pub title: String,
    /// Barcode, always held as text.
    ///
    /// Some server revisions send this as a JSON number; both forms are
    /// accepted. A missing or `null` barcode becomes the empty string.
    #[serde(default, deserialize_with = "barcode_from_wire")]
    pub barcode: String,
    pub price: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    /// URL of the stored image asset.
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn barcode_from_wire<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Wire>::deserialize(deserializer)? {
        Some(Wire::Text(text)) => text,
        Some(Wire::Number(number)) => number.to_string(),
        None => String::new(),
    })
}

/// One page of products.
///
/// Returned by `GET /Products`. `data` keeps the order the server sent.
///
/// # Example
///
/// ```
/// use shelf_core::PaginatedProducts;
///
/// let page = PaginatedProducts {
///     page_number: 1,
///     page_size: 4,
///     total_records: 10,
///     data: Vec::new(),
/// };
///
/// assert_eq!(page.total_pages(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedProducts {
    /// Page number (1-indexed).
    pub page_number: u32,
    /// Number of records per page.
    pub page_size: u32,
    /// Total number of records across all pages.
    pub total_records: u32,
    /// The products in this page.
    #[serde(default)]
    pub data: Vec<Product>,
}

impl PaginatedProducts {
    /// Number of pages needed to hold `total_records`. Never less than 1.
    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_records, self.page_size)
    }
}

/// Page count for `total_records` split into pages of `page_size`.
pub fn total_pages(total_records: u32, page_size: u32) -> u32 {
    if total_records == 0 || page_size == 0 {
        1
    } else {
        total_records.div_ceil(page_size)
    }
}

/// Write-side payload for creating or updating a product.
///
/// The image is not part of this type; it travels as a separate binary
/// attachment next to these fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub title: String,
    pub price: f64,
    pub description: String,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Query parameters for `GET /Products`.
///
/// `name` and `barcode` are only sent when they hold a non-empty value.
///
/// # Example
///
/// ```
/// use shelf_core::ProductQuery;
///
/// let query = ProductQuery::new(2, 4).name("mug").barcode("");
///
/// assert_eq!(query.page_number, 2);
/// assert_eq!(query.name.as_deref(), Some("mug"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub page_number: u32,
    pub page_size: u32,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub barcode: Option<String>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

impl ProductQuery {
    /// Query for one page with no filters.
    pub fn new(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number,
            page_size,
            name: None,
            barcode: None,
        }
    }

    /// Filter by product name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Filter by barcode.
    pub fn barcode(mut self, barcode: impl Into<String>) -> Self {
        self.barcode = Some(barcode.into());
        self
    }
}
