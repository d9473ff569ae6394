//! Admin product endpoints

mod types;

use catalog_admin_auth::Session;
use log::info;
use reqwest::Client;
use url::Url;

use crate::config::ConsoleConfig;
use crate::error::{Error, Result};
use crate::fetch::Fetch;

pub use types::*;

/// Client for the `/api/{path}/admin/product(s)` endpoints.
///
/// Every call takes the [`Session`] it runs under.
#[derive(Debug, Clone)]
pub struct ProductsClient {
    base_url: String,
    api_path: String,
    http_client: Client,
}

impl ProductsClient {
    pub fn new(config: &ConsoleConfig, http_client: Client) -> Self {
        Self {
            base_url: config.api_base.clone(),
            api_path: config.api_path.clone(),
            http_client,
        }
    }

    fn admin_url(&self, resource: &str) -> String {
        format!("{}/api/{}/admin/{}", self.base_url, self.api_path, resource)
    }

    fn item_url(&self, id: &str) -> Result<String> {
        if id.is_empty() {
            return Err(Error::validation("product id is empty"));
        }

        let mut url = Url::parse(&self.admin_url("product"))?;
        url.path_segments_mut()
            .map_err(|_| Error::config("API base cannot hold a path"))?
            .push(id);
        Ok(url.into())
    }

    /// Fetches the product listing; `page` selects a page, `None` uses the server default
    pub async fn list(&self, session: &Session, page: Option<u32>) -> Result<ProductList> {
        let mut request = Fetch::get(&self.http_client, &self.admin_url("products"))
            .authorization(session)?;
        if let Some(page) = page {
            request = request.query("page", page);
        }

        let list: ProductList = request.execute().await?;
        info!("Fetched {} products", list.products.len());
        Ok(list)
    }

    /// Creates a product
    pub async fn create(&self, session: &Session, payload: &ProductPayload) -> Result<MessageResponse> {
        Fetch::post(&self.http_client, &self.admin_url("product"))
            .authorization(session)?
            .json(&DataEnvelope { data: payload })?
            .execute()
            .await
    }

    /// Replaces the product stored under `id`
    pub async fn update(
        &self,
        session: &Session,
        id: &str,
        payload: &ProductPayload,
    ) -> Result<MessageResponse> {
        Fetch::put(&self.http_client, &self.item_url(id)?)
            .authorization(session)?
            .json(&DataEnvelope { data: payload })?
            .execute()
            .await
    }

    /// Deletes the product stored under `id`
    pub async fn delete(&self, session: &Session, id: &str) -> Result<MessageResponse> {
        Fetch::delete(&self.http_client, &self.item_url(id)?)
            .authorization(session)?
            .execute()
            .await
    }
}
