use crate::config::{Credentials, GrouperConfig};
use crate::domain::ports::{HttpMethod, HttpRequest, HttpTransport, TransportError};
use crate::utils::error::{GrouperError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};

/// `HttpTransport` backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
    credentials: Option<Credentials>,
}

impl ReqwestTransport {
    pub fn new(config: &GrouperConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| GrouperError::ConfigError {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials: config.credentials.clone(),
        })
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
    }
}

// Timeouts count as connectivity failures so the caller retries them.
fn classify(err: reqwest::Error) -> TransportError {
    if err.is_connect() || err.is_timeout() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> std::result::Result<String, TransportError> {
        let url = self.url_for(&request.path);

        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &url)
            .timeout(request.timeout)
            .header(CONTENT_TYPE, "application/json");

        if let Some(credentials) = &self.credentials {
            builder = builder.basic_auth(&credentials.username, Some(&credentials.password));
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status();
        tracing::debug!("{} {} -> {}", request.method, url, status);

        if !status.is_success() {
            return Err(TransportError::Other(format!(
                "Grouper returned HTTP {} for {}",
                status, url
            )));
        }

        response.text().await.map_err(classify)
    }
}
