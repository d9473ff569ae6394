//! The scratch product record bound to the product dialog

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::products::{Product, ProductPayload};

/// Form values of the product dialog.
///
/// Prices are kept as typed; they become numbers only in [`Draft::to_payload`].
/// The default value is the empty template used by the create button.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    pub id: String,
    pub title: String,
    pub category: String,
    pub origin_price: String,
    pub price: String,
    pub unit: String,
    pub description: String,
    pub content: String,
    pub is_enabled: bool,
    pub image_url: String,
    pub images_url: Vec<String>,
    pub extra: Map<String, Value>,
}

/// Values merged over the draft when the dialog opens.
///
/// `None` leaves the draft's current value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftSeed {
    pub id: Option<String>,
    pub title: Option<String>,
    pub category: Option<String>,
    pub origin_price: Option<String>,
    pub price: Option<String>,
    pub unit: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub is_enabled: Option<bool>,
    pub image_url: Option<String>,
    pub images_url: Option<Vec<String>>,
    pub extra: Map<String, Value>,
}

impl DraftSeed {
    /// Every field set to its empty value
    pub fn template() -> Self {
        let empty = Draft::default();
        Self {
            id: Some(empty.id),
            title: Some(empty.title),
            category: Some(empty.category),
            origin_price: Some(empty.origin_price),
            price: Some(empty.price),
            unit: Some(empty.unit),
            description: Some(empty.description),
            content: Some(empty.content),
            is_enabled: Some(empty.is_enabled),
            image_url: Some(empty.image_url),
            images_url: Some(empty.images_url),
            extra: empty.extra,
        }
    }
}

impl From<&Product> for DraftSeed {
    fn from(product: &Product) -> Self {
        Self {
            id: Some(product.id.clone()),
            title: Some(product.title.clone()),
            category: Some(product.category.clone()),
            origin_price: Some(product.origin_price.to_string()),
            price: Some(product.price.to_string()),
            unit: product.unit.clone(),
            description: product.description.clone(),
            content: product.content.clone(),
            is_enabled: Some(product.is_enabled),
            image_url: product.image_url.clone(),
            images_url: product.images_url.clone(),
            extra: product.extra.clone(),
        }
    }
}

/// A single form control change
#[derive(Debug, Clone, PartialEq)]
pub enum DraftEdit {
    Title(String),
    Category(String),
    Unit(String),
    OriginPrice(String),
    Price(String),
    Description(String),
    Content(String),
    ImageUrl(String),
    Enabled(bool),
}

fn merge<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

impl Draft {
    /// Overwrites the fields `seed` carries
    pub fn merge(&mut self, seed: DraftSeed) {
        merge(&mut self.id, seed.id);
        merge(&mut self.title, seed.title);
        merge(&mut self.category, seed.category);
        merge(&mut self.origin_price, seed.origin_price);
        merge(&mut self.price, seed.price);
        merge(&mut self.unit, seed.unit);
        merge(&mut self.description, seed.description);
        merge(&mut self.content, seed.content);
        merge(&mut self.is_enabled, seed.is_enabled);
        merge(&mut self.image_url, seed.image_url);
        merge(&mut self.images_url, seed.images_url);
        self.extra.extend(seed.extra);
    }

    pub fn apply(&mut self, edit: DraftEdit) {
        match edit {
            DraftEdit::Title(value) => self.title = value,
            DraftEdit::Category(value) => self.category = value,
            DraftEdit::Unit(value) => self.unit = value,
            DraftEdit::OriginPrice(value) => self.origin_price = value,
            DraftEdit::Price(value) => self.price = value,
            DraftEdit::Description(value) => self.description = value,
            DraftEdit::Content(value) => self.content = value,
            DraftEdit::ImageUrl(value) => self.image_url = value,
            DraftEdit::Enabled(value) => self.is_enabled = value,
        }
    }

    /// Sets the additional image at `index`
    pub fn set_image_url(&mut self, index: usize, value: String) -> Result<()> {
        match self.images_url.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Error::validation(format!("no image slot {}", index + 1))),
        }
    }

    /// Appends an empty image slot
    pub fn add_image_slot(&mut self) {
        self.images_url.push(String::new());
    }

    /// Drops the last image slot, if any
    pub fn remove_image_slot(&mut self) {
        self.images_url.pop();
    }

    /// Converts the form values into the body sent to the server.
    ///
    /// Empty price text counts as 0. Empty image slots are dropped.
    pub fn to_payload(&self) -> Result<ProductPayload> {
        Ok(ProductPayload {
            id: self.id.clone(),
            title: self.title.clone(),
            category: self.category.clone(),
            origin_price: parse_price("origin price", &self.origin_price)?,
            price: parse_price("price", &self.price)?,
            unit: self.unit.clone(),
            description: self.description.clone(),
            content: self.content.clone(),
            is_enabled: u8::from(self.is_enabled),
            image_url: self.image_url.clone(),
            images_url: self
                .images_url
                .iter()
                .filter(|url| !url.is_empty())
                .cloned()
                .collect(),
            extra: self.extra.clone(),
        })
    }
}

fn parse_price(field: &str, text: &str) -> Result<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(0.0);
    }

    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(Error::validation(format!("{} '{}' is not a number", field, text))),
    }
}
