use crate::config::GatewayConfig;
use crate::domain::payment::{PaymentRequest, TransactionReference};
use crate::domain::ports::PaymentGateway;
use crate::domain::transaction::{CollectResponse, TransactionSnapshot};
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

/// HTTP adapter for the CamPay collection API.
///
/// One `reqwest::Client` is shared by every call; it carries the `Authorization: Token`
/// header and the request timeout. Response bodies are read in full and parsed whatever
/// the HTTP status, because the gateway reports rejections in 4xx bodies. The status of a
/// collect response is kept on it so a bodiless refusal (e.g. 401) can still be named.
#[derive(Clone)]
pub struct CampayGateway {
    client: reqwest::Client,
    base_url: String,
}

impl CampayGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut token = HeaderValue::from_str(&format!("Token {}", config.api_key))
            .map_err(|e| PaymentError::ConfigError(format!("invalid API_KEY: {e}")))?;
        token.set_sensitive(true);
        headers.insert(AUTHORIZATION, token);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn collect_url(&self) -> String {
        format!("{}/api/collect/", self.base_url)
    }

    fn status_url(&self, reference: &TransactionReference) -> String {
        format!("{}/api/transaction/{}/", self.base_url, reference)
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<(u16, T)> {
        let status = response.status();
        // Consumes the response, so the connection is released on every path below.
        let body = response.bytes().await?;
        log::trace!("Gateway responded {status}: {}", String::from_utf8_lossy(&body));
        let parsed = serde_json::from_slice(&body)?;
        Ok((status.as_u16(), parsed))
    }
}

#[async_trait]
impl PaymentGateway for CampayGateway {
    async fn collect(&self, request: &PaymentRequest) -> Result<CollectResponse> {
        let response = self
            .client
            .post(self.collect_url())
            .json(request)
            .send()
            .await?;
        let (status, mut parsed): (u16, CollectResponse) = Self::read_json(response).await?;
        parsed.http_status = Some(status);
        Ok(parsed)
    }

    async fn transaction_status(
        &self,
        reference: &TransactionReference,
    ) -> Result<TransactionSnapshot> {
        let response = self.client.get(self.status_url(reference)).send().await?;
        let (_, snapshot) = Self::read_json(response).await?;
        Ok(snapshot)
    }
}
