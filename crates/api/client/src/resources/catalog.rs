//! Category and brand endpoints.

use reqwest::Method;

use salla_core::{
    Brand, Category, CreateBrandRequest, CreateCategoryRequest, ListOptions, Page,
    UpdateBrandRequest, UpdateCategoryRequest,
};

use super::NoBody;
use crate::client::SallaClient;
use crate::error::ApiResult;

#[derive(Debug, Clone, Copy)]
pub struct CategoriesService<'a> {
    client: &'a SallaClient,
}

impl<'a> CategoriesService<'a> {
    pub(crate) fn new(client: &'a SallaClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, options: Option<ListOptions>) -> ApiResult<Page<Category>> {
        self.client.fetch_page("/categories", options).await
    }

    pub async fn get(&self, id: i64) -> ApiResult<Category> {
        self.client
            .fetch_data(Method::GET, &format!("/categories/{}", id), None::<&NoBody>)
            .await
    }

    pub async fn create(&self, category: &CreateCategoryRequest) -> ApiResult<Category> {
        self.client
            .fetch_data(Method::POST, "/categories", Some(category))
            .await
    }

    pub async fn update(&self, id: i64, category: &UpdateCategoryRequest) -> ApiResult<Category> {
        self.client
            .fetch_data(Method::PUT, &format!("/categories/{}", id), Some(category))
            .await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.client
            .send_only(Method::DELETE, &format!("/categories/{}", id), None::<&NoBody>)
            .await
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BrandsService<'a> {
    client: &'a SallaClient,
}

impl<'a> BrandsService<'a> {
    pub(crate) fn new(client: &'a SallaClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, options: Option<ListOptions>) -> ApiResult<Page<Brand>> {
        self.client.fetch_page("/brands", options).await
    }

    pub async fn get(&self, id: i64) -> ApiResult<Brand> {
        self.client
            .fetch_data(Method::GET, &format!("/brands/{}", id), None::<&NoBody>)
            .await
    }

    pub async fn create(&self, brand: &CreateBrandRequest) -> ApiResult<Brand> {
        self.client
            .fetch_data(Method::POST, "/brands", Some(brand))
            .await
    }

    pub async fn update(&self, id: i64, brand: &UpdateBrandRequest) -> ApiResult<Brand> {
        self.client
            .fetch_data(Method::PUT, &format!("/brands/{}", id), Some(brand))
            .await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.client
            .send_only(Method::DELETE, &format!("/brands/{}", id), None::<&NoBody>)
            .await
    }
}
