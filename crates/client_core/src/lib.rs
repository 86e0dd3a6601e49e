use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::Operator,
    error::ServiceErrorBody,
    protocol::{
        CalcRequest, CalcResponse, ComputeRequest, ComputeResponse, StatsResponse, CALC_PATH,
        COMPUTE_PATH, STATS_PATH,
    },
};
use tracing::{debug, warn};
use url::Url;

pub mod error;
pub mod keypad;
pub mod locale;
pub mod settings;

pub use error::{ClientError, EvalFailure};
pub use keypad::{EvaluationRequest, KeyPress, Keypad, Phase};
pub use locale::{Locale, Messages};
pub use settings::{load_settings, ClientSettings};

/// Operations offered by the remote compute service.
#[async_trait]
pub trait CalcApi: Send + Sync {
    /// Number of evaluations the service performed today.
    async fn fetch_stats(&self) -> Result<StatsResponse, ClientError>;
    async fn calculate(&self, a: f64, b: f64, op: Operator) -> Result<f64, ClientError>;
    /// Legacy free-form expression endpoint.
    async fn compute_expression(&self, expression: &str) -> Result<ComputeResponse, ClientError>;
}

/// Runs a keypad evaluation request against `api` and converts the outcome
/// into what [`Keypad::finish_evaluation`] expects.
pub async fn evaluate<A: CalcApi + ?Sized>(
    api: &A,
    request: EvaluationRequest,
) -> Result<f64, EvalFailure> {
    api.calculate(request.a, request.b, request.op)
        .await
        .map_err(|err| {
            if err.is_transport() {
                warn!(error = %err, "compute service unreachable");
            } else {
                warn!(error = %err, op = request.op.wire_name(), "evaluation failed");
            }
            EvalFailure::from(err)
        })
}

#[derive(Debug, Clone)]
pub struct CalcClient {
    http: Client,
    base_url: Url,
}

impl CalcClient {
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = settings::normalize_base_url(server_url).map_err(|source| {
            ClientError::InvalidBaseUrl {
                url: server_url.to_string(),
                source,
            }
        })?;
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, ClientError> {
        Self::new(&settings.server_url, settings.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|source| ClientError::InvalidBaseUrl {
                url: format!("{}{path}", self.base_url),
                source,
            })
    }
}

#[async_trait]
impl CalcApi for CalcClient {
    async fn fetch_stats(&self) -> Result<StatsResponse, ClientError> {
        let url = self.endpoint(STATS_PATH)?;
        debug!(%url, "fetching calculation stats");
        let response = self.http.get(url).send().await?;
        read_json(response).await
    }

    async fn calculate(&self, a: f64, b: f64, op: Operator) -> Result<f64, ClientError> {
        let url = self.endpoint(CALC_PATH)?;
        debug!(%url, a, b, op = op.wire_name(), "posting calculation");
        let response = self
            .http
            .post(url)
            .json(&CalcRequest { a, b, op })
            .send()
            .await?;
        let body: CalcResponse = read_json(response).await?;
        Ok(body.result)
    }

    async fn compute_expression(&self, expression: &str) -> Result<ComputeResponse, ClientError> {
        let url = self.endpoint(COMPUTE_PATH)?;
        debug!(%url, expression, "posting expression");
        let response = self
            .http
            .post(url)
            .json(&ComputeRequest {
                expression: expression.to_string(),
            })
            .send()
            .await?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        let message = ServiceErrorBody::from_slice(&bytes).and_then(|body| body.message());
        return Err(ClientError::Service { status, message });
    }

    serde_json::from_slice(&bytes).map_err(|err| ClientError::Decode(err.to_string()))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
