use reqwest::Method;

use salla_core::{CreateCustomerRequest, Customer, ListOptions, Page, UpdateCustomerRequest};

use super::NoBody;
use crate::client::SallaClient;
use crate::error::ApiResult;

/// Customer endpoints.
#[derive(Debug, Clone, Copy)]
pub struct CustomersService<'a> {
    client: &'a SallaClient,
}

impl<'a> CustomersService<'a> {
    pub(crate) fn new(client: &'a SallaClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, options: Option<ListOptions>) -> ApiResult<Page<Customer>> {
        self.client.fetch_page("/customers", options).await
    }

    pub async fn get(&self, id: i64) -> ApiResult<Customer> {
        self.client
            .fetch_data(Method::GET, &format!("/customers/{}", id), None::<&NoBody>)
            .await
    }

    pub async fn create(&self, customer: &CreateCustomerRequest) -> ApiResult<Customer> {
        self.client
            .fetch_data(Method::POST, "/customers", Some(customer))
            .await
    }

    pub async fn update(&self, id: i64, customer: &UpdateCustomerRequest) -> ApiResult<Customer> {
        self.client
            .fetch_data(Method::PUT, &format!("/customers/{}", id), Some(customer))
            .await
    }
}
