use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    domain::{Customer, Customers},
    error::ApiError,
    protocol::CreateCustomerRequest,
};
use tracing::debug;
use url::Url;

use crate::{
    config::{ClientSettings, ConfigError},
    error::RequestError,
};

/// The customers collection endpoint, as seen by the list store and the add form.
#[async_trait]
pub trait CustomersApi: Send + Sync {
    async fn list_customers(&self) -> Result<Customers, RequestError>;
    /// Returns the created record when the server echoes one back.
    async fn create_customer(
        &self,
        request: &CreateCustomerRequest,
    ) -> Result<Option<Customer>, RequestError>;
}

pub struct HttpCustomersApi {
    http: Client,
    endpoint: Url,
}

impl HttpCustomersApi {
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: Client::new(),
            endpoint,
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, ConfigError> {
        Ok(Self::new(settings.endpoint_url()?))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Reads the whole body and splits non-success statuses into `RequestError::Status`.
async fn read_body(res: Response) -> Result<Vec<u8>, RequestError> {
    let status = res.status();
    let bytes = res.bytes().await.map_err(RequestError::transport)?;
    if !status.is_success() {
        let body = serde_json::from_slice::<ApiError>(&bytes).ok();
        debug!(
            status = status.as_u16(),
            has_error_body = body.is_some(),
            "customers endpoint returned failure"
        );
        return Err(RequestError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(bytes.to_vec())
}

#[async_trait]
impl CustomersApi for HttpCustomersApi {
    async fn list_customers(&self) -> Result<Customers, RequestError> {
        let res = self
            .http
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(RequestError::transport)?;
        let bytes = read_body(res).await?;
        serde_json::from_slice(&bytes).map_err(|err| RequestError::Decode(err.to_string()))
    }

    async fn create_customer(
        &self,
        request: &CreateCustomerRequest,
    ) -> Result<Option<Customer>, RequestError> {
        let res = self
            .http
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(RequestError::transport)?;
        let bytes = read_body(res).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        match serde_json::from_slice::<Customer>(&bytes) {
            Ok(customer) => Ok(Some(customer)),
            Err(err) => {
                debug!(error = %err, "create succeeded with an unrecognised body");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
