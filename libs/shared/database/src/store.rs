use anyhow::{Result, anyhow};
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

/// HTTP client for the document-oriented Entity Store. Each entity kind lives
/// in its own collection and is addressed with equality filters on document
/// fields (`?id=eq.<uuid>`).
pub struct EntityStoreClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl EntityStoreClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.entity_store_url.clone(),
            api_key: config.entity_store_api_key.clone(),
        }
    }

    fn get_headers(&self, extra: Option<HeaderMap>) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Ok(key) = HeaderValue::from_str(&self.api_key) {
            headers.insert("apikey", key);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(extra) = extra {
            headers.extend(extra);
        }

        headers
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T>
    where T: DeserializeOwned {
        self.request_with_headers(method, path, body, None).await
    }

    pub async fn request_with_headers<T>(&self, method: Method, path: &str,
                                         body: Option<Value>, extra_headers: Option<HeaderMap>)
                                         -> Result<T>
    where T: DeserializeOwned {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let headers = self.get_headers(extra_headers);

        let mut req = self.client.request(method, &url)
            .headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Entity store error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                404 => anyhow!("Collection not found: {}", error_text),
                _ => anyhow!("Entity store error ({}): {}", status, error_text),
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// Fetch a single document by id, `None` when the collection holds no
    /// document under that id.
    pub async fn fetch_by_id<T>(&self, collection: &str, id: &str) -> Result<Option<T>>
    where T: DeserializeOwned {
        let path = format!("/rest/v1/{}?id=eq.{}", collection, id);
        let mut result: Vec<T> = self.request(Method::GET, &path, None).await?;

        if result.is_empty() {
            return Ok(None);
        }

        Ok(Some(result.swap_remove(0)))
    }

    /// Fetch every document in a collection.
    pub async fn fetch_all<T>(&self, collection: &str) -> Result<Vec<T>>
    where T: DeserializeOwned {
        let path = format!("/rest/v1/{}", collection);
        self.request(Method::GET, &path, None).await
    }

    /// Fetch documents matching every supplied equality filter (conjunctive).
    pub async fn fetch_matching<T>(&self, collection: &str, filters: &[(&str, String)]) -> Result<Vec<T>>
    where T: DeserializeOwned {
        let query = filters.iter()
            .map(|(field, value)| format!("{}=eq.{}", field, value))
            .collect::<Vec<_>>()
            .join("&");

        let path = format!("/rest/v1/{}?{}", collection, query);
        self.request(Method::GET, &path, None).await
    }

    /// Insert a document; the store assigns the id. Returns the stored
    /// representation.
    pub async fn insert<T>(&self, collection: &str, body: Value) -> Result<T>
    where T: DeserializeOwned {
        let path = format!("/rest/v1/{}", collection);

        let mut result: Vec<T> = self.request_with_headers(
            Method::POST,
            &path,
            Some(body),
            Some(representation_headers()),
        ).await?;

        if result.is_empty() {
            return Err(anyhow!("Entity store returned no representation for insert into {}", collection));
        }

        Ok(result.swap_remove(0))
    }

    /// Overwrite the document stored under `id` and return the stored
    /// representation.
    pub async fn update_by_id<T>(&self, collection: &str, id: &str, body: Value) -> Result<T>
    where T: DeserializeOwned {
        let path = format!("/rest/v1/{}?id=eq.{}", collection, id);

        let mut result: Vec<T> = self.request_with_headers(
            Method::PATCH,
            &path,
            Some(body),
            Some(representation_headers()),
        ).await?;

        if result.is_empty() {
            return Err(anyhow!("Entity store returned no representation for update of {} in {}", id, collection));
        }

        Ok(result.swap_remove(0))
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}

fn representation_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Prefer", HeaderValue::from_static("return=representation"));
    headers
}
