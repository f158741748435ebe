//! # Salla Core
//!
//! Shared domain types for the Salla SDK: the merchant resources returned by
//! the Admin API (`Product`, `Order`, `Customer`, `Category`, `Brand`), the
//! standard response envelopes, and pagination metadata.
//!
//! Every resource struct decodes leniently: fields the platform omits fall
//! back to their default values, so partial payloads (such as the `data`
//! object of a webhook) still decode.

pub mod pagination;
pub mod response;
pub mod types;

// Re-export commonly used items at the crate root
pub use pagination::{ListOptions, Page, Pagination};
pub use response::{DataResponse, ErrorResponse, ListResponse};
pub use types::{
    Address, Brand, Category, CreateBrandRequest, CreateCategoryRequest, CreateCustomerRequest,
    CreateProductRequest, Customer, CustomerAddress, Metadata, Order, OrderAmount, OrderCustomer,
    OrderItem, OrderPayment, OrderReservation, OrderShipping, Product, ProductImage,
    ProductOption, UpdateBrandRequest, UpdateCategoryRequest, UpdateCustomerRequest,
    UpdateProductRequest,
};
