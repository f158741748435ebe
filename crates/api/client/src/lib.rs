//! # Salla Client
//!
//! Async client for the Salla Admin API. Requests are authorized with the
//! merchant's OAuth token, which is refreshed transparently before it
//! expires.
//!
//! Resource services (`products()`, `orders()`, `customers()`,
//! `categories()`, `brands()`) sit on top of two primitives that can also be
//! used directly for endpoints the services don't cover:
//! [`SallaClient::prepare_authorized_request`] and
//! [`SallaClient::execute_and_decode`].

mod client;
mod error;
mod resources;

pub use client::{
    SallaClient, SallaClientBuilder, DEFAULT_BASE_URL, DEFAULT_USER_AGENT, REQUEST_TIMEOUT,
};
pub use error::{ApiError, ApiResult, RemoteApiError};
pub use resources::{
    BrandsService, CategoriesService, CustomersService, OrdersService, ProductsService,
};

pub use reqwest::Method;
