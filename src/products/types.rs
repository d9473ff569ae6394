//! Types for product operations

use catalog_admin_auth::ServerMessage;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// A catalog product as the server reports it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// The product ID
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub category: String,

    /// List price
    #[serde(default)]
    pub origin_price: f64,

    /// Selling price
    #[serde(default)]
    pub price: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Reported as 0/1 or as a boolean
    #[serde(
        default,
        deserialize_with = "deserialize_enabled",
        serialize_with = "serialize_enabled"
    )]
    pub is_enabled: bool,

    /// Main image
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Additional images
    #[serde(rename = "imagesUrl", default, skip_serializing_if = "Option::is_none")]
    pub images_url: Option<Vec<String>>,

    /// Fields this client does not model, kept so they survive an edit
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn deserialize_enabled<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Number(f64),
        Null(()),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Number(value) => value != 0.0,
        Flag::Null(()) => false,
    })
}

fn serialize_enabled<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u8(u8::from(*value))
}

/// Page information returned with a product listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub total_pages: u32,

    #[serde(default)]
    pub current_page: u32,

    #[serde(default)]
    pub has_pre: bool,

    #[serde(default)]
    pub has_next: bool,

    #[serde(default)]
    pub category: String,
}

/// Response of the product listing endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ProductList {
    pub products: Vec<Product>,

    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Body sent to the create and update endpoints, inside `{"data": ...}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPayload {
    pub id: String,
    pub title: String,
    pub category: String,
    pub origin_price: f64,
    pub price: f64,
    pub unit: String,
    pub description: String,
    pub content: String,
    /// 1 when enabled, 0 otherwise
    pub is_enabled: u8,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    #[serde(rename = "imagesUrl")]
    pub images_url: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DataEnvelope<'a> {
    pub data: &'a ProductPayload,
}

/// Acknowledgement returned by the mutating endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default)]
    pub message: Option<ServerMessage>,
}

impl MessageResponse {
    /// The server's message, or `fallback` when it sent none
    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }
}
