//! Standard Admin API response envelopes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::pagination::Pagination;

/// Response wrapping a single resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub code: u16,
    pub data: T,
}

/// Response wrapping a page of resources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub code: u16,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// Error body returned by the Admin API on 4xx/5xx responses.
///
/// `data` carries per-field validation errors when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorResponse {
    pub success: bool,
    pub code: u16,
    pub message: String,
    pub data: Option<Map<String, Value>>,
}
