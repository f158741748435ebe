//! Per-resource services built on the authorized request pipeline.

mod catalog;
mod customers;
mod orders;
mod products;

pub use catalog::{BrandsService, CategoriesService};
pub use customers::CustomersService;
pub use orders::OrdersService;
pub use products::ProductsService;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use salla_core::{DataResponse, ListOptions, ListResponse, Page};

use crate::client::SallaClient;
use crate::error::ApiResult;

/// Stand-in body type for requests without a body.
type NoBody = ();

impl SallaClient {
    /// GETs a list endpoint and unwraps the `data` array and pagination.
    pub(crate) async fn fetch_page<T: DeserializeOwned>(
        &self,
        path: &str,
        options: Option<ListOptions>,
    ) -> ApiResult<Page<T>> {
        let mut request = self
            .prepare_authorized_request(Method::GET, path, None::<&NoBody>)
            .await?;
        if let Some(options) = options {
            request = request.query(&options);
        }

        let response: ListResponse<T> = self.execute_and_decode(request).await?;
        Ok(Page {
            items: response.data,
            pagination: response.pagination,
        })
    }

    /// Sends a request and unwraps the `data` field of the response.
    pub(crate) async fn fetch_data<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.prepare_authorized_request(method, path, body).await?;
        let response: DataResponse<T> = self.execute_and_decode(request).await?;
        Ok(response.data)
    }

    /// Sends a request whose response body is not needed.
    pub(crate) async fn send_only<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<()>
    where
        B: Serialize + ?Sized,
    {
        let request = self.prepare_authorized_request(method, path, body).await?;
        self.execute(request).await
    }
}
