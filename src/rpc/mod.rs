//! RPC client adapter for the analysis server.
//!
//! Wraps the two unary calls the client needs behind [`AnalysisService`] and folds every
//! transport, timeout and server-side failure into a single [`RpcError`]. Nothing in here knows
//! about the session state machine.

mod proto;
#[cfg(test)]
pub(crate) mod testing;

use crate::config::ServerConfig;
use crate::model::{AnalysisOutput, ItemOutput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use proto::analyzer_client::AnalyzerClient;
use tonic::transport::{Channel, Endpoint};
use tonic::{Code, Status};

/// SVG plots for large datasets exceed tonic's 4 MiB default.
const MAX_MESSAGE_BYTES: usize = 64 * 1024 * 1024;

/// Normalized failure of a remote call.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("empty {0}")]
    EmptyPayload(&'static str),
    #[error("item id {0:?} is not a clonotype number")]
    InvalidItemId(String),
    #[error("server unavailable: {0}")]
    Transport(String),
    #[error("request timed out")]
    Timeout,
    #[error("server reported {code:?}: {message}")]
    Service { code: Code, message: String },
    #[error("request task aborted")]
    Aborted,
}

impl From<Status> for RpcError {
    fn from(status: Status) -> Self {
        let message = status.message().to_string();
        match status.code() {
            Code::DeadlineExceeded => RpcError::Timeout,
            // tower's timeout layer surfaces as a cancelled status
            Code::Cancelled if message.contains("Timeout expired") => RpcError::Timeout,
            Code::Unavailable => RpcError::Transport(message),
            Code::Unknown if message.starts_with("Service was not ready") => {
                RpcError::Transport(message)
            }
            Code::Unknown if message.contains("transport error") => RpcError::Transport(message),
            code => RpcError::Service { code, message },
        }
    }
}

/// The two calls the bridge worker performs on behalf of the UI.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Run an analysis with opaque, whitespace-separated params.
    async fn run_analysis(&self, args: &str) -> Result<AnalysisOutput, RpcError>;

    /// Fetch one item of the last analysis run on the server.
    async fn fetch_item(&self, id: &str) -> Result<ItemOutput, RpcError>;
}

/// tonic-backed [`AnalysisService`] talking to `enclone_server.Analyzer`.
///
/// The channel is created lazily and shared by every call; cloning the client is cheap.
#[derive(Debug, Clone)]
pub struct GrpcAnalyzer {
    client: AnalyzerClient<Channel>,
    address: String,
}

impl GrpcAnalyzer {
    /// Build a client for the configured endpoint without touching the network.
    ///
    /// Must be called from within a tokio runtime.
    pub fn connect_lazy(cfg: &ServerConfig) -> Result<Self> {
        let mut endpoint = Endpoint::from_shared(cfg.uri())
            .with_context(|| format!("invalid server address {}", cfg.address()))?
            .connect_timeout(cfg.connect_timeout);
        if let Some(timeout) = cfg.request_timeout {
            endpoint = endpoint.timeout(timeout);
        }
        let channel = endpoint.connect_lazy();
        Ok(Self {
            client: AnalyzerClient::new(channel).max_decoding_message_size(MAX_MESSAGE_BYTES),
            address: cfg.address(),
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Round-trip the server's `Ping` method.
    pub async fn ping(&self) -> Result<(), RpcError> {
        self.client.clone().ping(proto::Unit {}).await?;
        Ok(())
    }
}

#[async_trait]
impl AnalysisService for GrpcAnalyzer {
    async fn run_analysis(&self, args: &str) -> Result<AnalysisOutput, RpcError> {
        if args.is_empty() {
            return Err(RpcError::EmptyPayload("analysis params"));
        }
        let request = proto::EncloneRequest {
            args: args.to_string(),
        };
        let response = self.client.clone().enclone(request).await?.into_inner();
        Ok(AnalysisOutput {
            args: response.args,
            plot: response.plot,
            table: response.table,
        })
    }

    async fn fetch_item(&self, id: &str) -> Result<ItemOutput, RpcError> {
        if id.is_empty() {
            return Err(RpcError::EmptyPayload("item id"));
        }
        let clonotype_number = id
            .trim()
            .parse::<u32>()
            .map_err(|_| RpcError::InvalidItemId(id.to_string()))?;
        let request = proto::ClonotypeRequest { clonotype_number };
        let response = self.client.clone().get_clonotype(request).await?.into_inner();
        Ok(ItemOutput {
            table: response.table,
        })
    }
}
