use std::marker::PhantomData;

use actix_web::web::Bytes;
use awc::{
    http::{header, Method, StatusCode},
    Client,
};
use serde_json::Value;

use crate::core::settings::Settings;
use crate::error::{Error, Result};
use crate::schema::Resource;

const MAX_BODY_SIZE: usize = 4 * 1024 * 1024;

/// HTTP client for one singleton resource endpoint.
///
/// No retries and no caching: every call is exactly one request.
pub struct ResourceClient<R> {
    client: Client,
    url: String,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> ResourceClient<R> {
    pub fn new(settings: &Settings) -> Self {
        let client = Client::builder().timeout(settings.timeout()).finish();
        Self::with_client(&settings.api_base_url.value, client)
    }

    pub fn with_client(base_url: &str, client: Client) -> Self {
        ResourceClient {
            client,
            url: format!("{}{}", base_url.trim_end_matches('/'), R::SCHEMA.path),
            _resource: PhantomData,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// `Ok(None)` when the server answers 404: no document exists yet.
    pub async fn get(&self) -> Result<Option<R>> {
        let (status, body) = self.send(Method::GET, None).await?;
        if status == StatusCode::NOT_FOUND {
            tracing::debug!("No {} document on the server", R::SCHEMA.noun);
            return Ok(None);
        }
        if !status.is_success() {
            return Err(failure(status, &body));
        }
        match serde_json::from_slice::<R>(&body) {
            Ok(document) => Ok(Some(document)),
            Err(error) => {
                tracing::error!("{} data structure is incorrect: {}", R::SCHEMA.name, error);
                Err(error.into())
            }
        }
    }

    pub async fn create(&self, document: &R) -> Result<R> {
        self.write(Method::POST, document).await
    }

    pub async fn replace(&self, document: &R) -> Result<R> {
        self.write(Method::PUT, document).await
    }

    pub async fn delete(&self) -> Result<()> {
        let (status, body) = self.send(Method::DELETE, None).await?;
        if !status.is_success() {
            return Err(failure(status, &body));
        }
        Ok(())
    }

    async fn write(&self, method: Method, document: &R) -> Result<R> {
        let (status, body) = self.send(method, Some(document)).await?;
        if !status.is_success() {
            return Err(failure(status, &body));
        }
        Ok(serde_json::from_slice::<R>(&body)?)
    }

    async fn send(&self, method: Method, document: Option<&R>) -> Result<(StatusCode, Bytes)> {
        let request = self
            .client
            .request(method.clone(), &self.url)
            .insert_header((header::CONTENT_TYPE, "application/json"));
        let response = match document {
            Some(document) => request.send_json(document).await,
            None => request.send().await,
        };
        let mut response = match response {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!("{} {} could not be sent: {}", method, self.url, error);
                return Err(Error::request_failed(None, error.to_string()));
            }
        };
        let status = response.status();
        let body = match response.body().limit(MAX_BODY_SIZE).await {
            Ok(body) => body,
            Err(error) => {
                tracing::warn!("{} {} response unreadable: {}", method, self.url, error);
                return Err(Error::request_failed(Some(status.as_u16()), error.to_string()));
            }
        };
        tracing::debug!(
            "{} {} -> {} ({} bytes)",
            method,
            self.url,
            status.as_u16(),
            body.len()
        );
        Ok((status, body))
    }
}

fn failure(status: StatusCode, body: &[u8]) -> Error {
    let message = server_message(body)
        .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
    Error::request_failed(Some(status.as_u16()), message)
}

/// Reads `{"error": "..."}` or `{"error": {"message": "..."}}` from a body.
pub(crate) fn server_message(body: &[u8]) -> Option<String> {
    let json: Value = serde_json::from_slice(body).ok()?;
    match json.get("error")? {
        Value::String(message) => Some(message.clone()),
        Value::Object(error) => error.get("message")?.as_str().map(str::to_string),
        _ => None,
    }
}
