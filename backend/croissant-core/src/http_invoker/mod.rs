use crate::command::{CommandKind, HealthStatus, HttpMethod};
use crate::error::http_invoker::HttpInvokerError;

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;
use std::time::Duration;

use log::{debug, trace};
use reqwest::{Client, Response};
use serde_json::Value;
use url::Url;

pub const DEFAULT_TIMEOUT_DURATION: Duration = Duration::from_secs(30);
const HEALTH_ENDPOINT: &str = "health";
const SERVER_ERROR_FIELD: &str = "error";

/// Serves commands over the remote HTTP API.
///
/// Each command maps to exactly one request. Nothing is retried here.
#[derive(Clone)]
pub struct HttpInvoker {
    base_url: Url,
    client: Client,
}

impl HttpInvoker {
    pub fn new(base_url_str: &str, timeout: Duration) -> Result<Self, HttpInvokerError> {
        // Url::join replaces the last segment unless the base ends with '/'.
        let base_url = if base_url_str.ends_with('/') {
            Url::parse(base_url_str)?
        } else {
            Url::parse(&format!("{base_url_str}/"))?
        };

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { base_url, client })
    }

    pub fn with_default_timeout(base_url_str: &str) -> Result<Self, HttpInvokerError> {
        Self::new(base_url_str, DEFAULT_TIMEOUT_DURATION)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint(&self, kind: CommandKind) -> Result<Url, HttpInvokerError> {
        Ok(self.base_url.join(kind.name())?)
    }

    /// Issue the request for `kind`. `args` becomes the JSON body, except on GET.
    pub async fn invoke(&self, kind: CommandKind, args: &Value) -> Result<Value, HttpInvokerError> {
        let url = self.endpoint(kind)?;
        debug!("{:?} {} -> {url}", kind.method(), kind.path());

        let request = match kind.method() {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url).json(args),
            HttpMethod::Delete => self.client.delete(url).json(args),
        };

        let response = request.send().await?;
        read_json(response).await
    }

    /// `GET /health`. Not a command; always served over HTTP.
    pub async fn health(&self) -> Result<HealthStatus, HttpInvokerError> {
        let url = self.base_url.join(HEALTH_ENDPOINT)?;

        let response = self.client.get(url).send().await?;
        let json = read_json(response).await?;
        let status: HealthStatus = serde_json::from_value(json)?;

        Ok(status)
    }
}

async fn read_json(response: Response) -> Result<Value, HttpInvokerError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        trace!("Rejected body: {body}");
        return Err(HttpInvokerError::Rejected {
            status: HttpStatusCode(status.as_u16()),
            message: rejection_message(status.as_u16(), &body),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    Ok(response.json().await?)
}

/// The server's `{"error": "..."}` text when present, else a generic message.
pub(crate) fn rejection_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(|json| json.get(SERVER_ERROR_FIELD))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {status} - request failed"))
}
