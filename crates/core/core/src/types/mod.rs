//! Merchant resources exposed by the Salla Admin API.
//!
//! Resource structs use `#[serde(default)]` so that payloads carrying only a
//! subset of fields still decode. Update requests use `Option` fields and
//! skip `None` values, so only the fields being changed are sent.

mod catalog;
mod customer;
mod order;
mod product;

pub use catalog::{
    Brand, Category, CreateBrandRequest, CreateCategoryRequest, UpdateBrandRequest,
    UpdateCategoryRequest,
};
pub use customer::{CreateCustomerRequest, Customer, CustomerAddress, UpdateCustomerRequest};
pub use order::{
    Address, Order, OrderAmount, OrderCustomer, OrderItem, OrderPayment, OrderReservation,
    OrderShipping,
};
pub use product::{
    CreateProductRequest, Product, ProductImage, ProductOption, UpdateProductRequest,
};

use serde_json::Value;
use std::collections::HashMap;

/// Free-form metadata attached to a resource.
pub type Metadata = HashMap<String, Value>;
