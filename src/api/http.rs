use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::{debug, info};

use crate::api::{PaginatedProducts, ProductApi, ProductQuery};
use crate::error::{Error, Result};
use crate::form::ProductForm;

/// reqwest-backed products API
///
/// Endpoints, relative to the base URL:
/// ```text
/// GET    {base_url}/Products?pageNumber=&pageSize=&name=&barcode=
/// POST   {base_url}/Products/register-with-image
/// PUT    {base_url}/Products/{id}
/// DELETE {base_url}/Products/{id}
/// ```
pub struct HttpProductApi {
    client: Client,
    base_url: String,
}

impl HttpProductApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn products_url(&self) -> String {
        format!("{}/Products", self.base_url)
    }

    fn product_url(&self, id: i64) -> String {
        format!("{}/Products/{}", self.base_url, id)
    }

    fn register_url(&self) -> String {
        format!("{}/Products/register-with-image", self.base_url)
    }
}

/// Turn a non-success response into `Error::Status`, keeping the body text.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::Status { status, body })
}

#[async_trait]
impl ProductApi for HttpProductApi {
    async fn list(&self, query: &ProductQuery) -> Result<PaginatedProducts> {
        let url = self.products_url();
        debug!("GET {} page={} size={}", url, query.page_number, query.page_size);

        let response = self.client.get(&url).query(query).send().await?;
        let body = check_status(response).await?.text().await?;
        let page: PaginatedProducts = serde_json::from_str(&body)?;

        debug!(
            "Received page {} ({} of {} records)",
            page.page_number,
            page.data.len(),
            page.total_records
        );
        Ok(page)
    }

    async fn create(&self, form: ProductForm) -> Result<()> {
        let url = self.register_url();
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .multipart(form.into_multipart()?)
            .send()
            .await?;
        check_status(response).await?;

        info!("Created product");
        Ok(())
    }

    async fn update(&self, id: i64, form: ProductForm) -> Result<()> {
        let url = self.product_url(id);
        debug!("PUT {}", url);

        let response = self
            .client
            .put(&url)
            .multipart(form.into_multipart()?)
            .send()
            .await?;
        check_status(response).await?;

        info!("Updated product {}", id);
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let url = self.product_url(id);
        debug!("DELETE {}", url);

        let response = self.client.delete(&url).send().await?;
        check_status(response).await?;

        info!("Deleted product {}", id);
        Ok(())
    }
}
