use reqwest::Method;
use serde_json::json;

use salla_core::{CreateProductRequest, ListOptions, Page, Product, UpdateProductRequest};

use super::NoBody;
use crate::client::SallaClient;
use crate::error::ApiResult;

/// Product endpoints.
#[derive(Debug, Clone, Copy)]
pub struct ProductsService<'a> {
    client: &'a SallaClient,
}

impl<'a> ProductsService<'a> {
    pub(crate) fn new(client: &'a SallaClient) -> Self {
        Self { client }
    }

    /// Lists products.
    pub async fn list(&self, options: Option<ListOptions>) -> ApiResult<Page<Product>> {
        self.client.fetch_page("/products", options).await
    }

    /// Fetches a product by id.
    pub async fn get(&self, id: i64) -> ApiResult<Product> {
        self.client
            .fetch_data(Method::GET, &format!("/products/{}", id), None::<&NoBody>)
            .await
    }

    /// Fetches a product by SKU. The SKU is percent-encoded as a single path segment.
    pub async fn get_by_sku(&self, sku: &str) -> ApiResult<Product> {
        let path = format!("/products/sku/{}", urlencoding::encode(sku));
        self.client
            .fetch_data(Method::GET, &path, None::<&NoBody>)
            .await
    }

    pub async fn create(&self, product: &CreateProductRequest) -> ApiResult<Product> {
        self.client
            .fetch_data(Method::POST, "/products", Some(product))
            .await
    }

    /// Updates the fields set in `product`.
    pub async fn update(&self, id: i64, product: &UpdateProductRequest) -> ApiResult<Product> {
        self.client
            .fetch_data(Method::PUT, &format!("/products/{}", id), Some(product))
            .await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.client
            .send_only(Method::DELETE, &format!("/products/{}", id), None::<&NoBody>)
            .await
    }

    /// Sets the product status (e.g. `sale`, `hidden`, `out`).
    pub async fn change_status(&self, id: i64, status: &str) -> ApiResult<()> {
        self.client
            .send_only(
                Method::POST,
                &format!("/products/{}/status", id),
                Some(&json!({ "status": status })),
            )
            .await
    }
}
