use reqwest::Method;

use salla_core::{ListOptions, Order, OrderReservation, Page};

use super::NoBody;
use crate::client::SallaClient;
use crate::error::ApiResult;

/// Order endpoints.
#[derive(Debug, Clone, Copy)]
pub struct OrdersService<'a> {
    client: &'a SallaClient,
}

impl<'a> OrdersService<'a> {
    pub(crate) fn new(client: &'a SallaClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, options: Option<ListOptions>) -> ApiResult<Page<Order>> {
        self.client.fetch_page("/orders", options).await
    }

    pub async fn get(&self, id: i64) -> ApiResult<Order> {
        self.client
            .fetch_data(Method::GET, &format!("/orders/{}", id), None::<&NoBody>)
            .await
    }

    /// Lists stock reservations held by pending orders.
    pub async fn list_reservations(
        &self,
        options: Option<ListOptions>,
    ) -> ApiResult<Page<OrderReservation>> {
        self.client.fetch_page("/orders/reservations", options).await
    }
}
