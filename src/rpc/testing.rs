//! In-process analysis server used by the adapter and bridge tests.

use super::proto::analyzer_server::{Analyzer, AnalyzerServer};
use super::proto::{ClonotypeRequest, ClonotypeResponse, EncloneRequest, EncloneResponse, Unit};
use crate::config::ServerConfig;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::{Request, Response, Status};

/// Scriptable stand-in for the analysis server.
///
/// Params containing `FAIL` produce an internal error, params containing `SLOW` are answered
/// after `slow_delay`. Item ids at or above `item_count` are rejected the way the real server
/// rejects out-of-range clonotype numbers.
#[derive(Debug, Clone)]
pub(crate) struct FakeAnalyzer {
    pub plot: String,
    pub table: String,
    pub item_count: u32,
    pub slow_delay: Duration,
    pub analysis_calls: Arc<AtomicUsize>,
    pub item_calls: Arc<AtomicUsize>,
}

impl Default for FakeAnalyzer {
    fn default() -> Self {
        Self {
            plot: r##"<svg width="100" height="100"><circle cx="10" cy="10" r="4" fill="#ff0000" data-tooltip='{"clonotype":"3"}'/></svg>"##.to_string(),
            table: "clonotype table".to_string(),
            item_count: 10,
            slow_delay: Duration::from_millis(300),
            analysis_calls: Arc::new(AtomicUsize::new(0)),
            item_calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[tonic::async_trait]
impl Analyzer for FakeAnalyzer {
    async fn ping(&self, _request: Request<Unit>) -> Result<Response<Unit>, Status> {
        Ok(Response::new(Unit {}))
    }

    async fn enclone(
        &self,
        request: Request<EncloneRequest>,
    ) -> Result<Response<EncloneResponse>, Status> {
        self.analysis_calls.fetch_add(1, Ordering::SeqCst);
        let req = request.into_inner();
        if req.args.contains("SLOW") {
            tokio::time::sleep(self.slow_delay).await;
        }
        if req.args.contains("FAIL") {
            return Err(Status::internal("enclone failed"));
        }
        Ok(Response::new(EncloneResponse {
            args: req.args,
            plot: self.plot.clone(),
            table: self.table.clone(),
        }))
    }

    async fn get_clonotype(
        &self,
        request: Request<ClonotypeRequest>,
    ) -> Result<Response<ClonotypeResponse>, Status> {
        self.item_calls.fetch_add(1, Ordering::SeqCst);
        let id = request.into_inner().clonotype_number;
        if id >= self.item_count {
            return Err(Status::internal("clonotype id too large"));
        }
        Ok(Response::new(ClonotypeResponse {
            table: format!("item {id} detail"),
        }))
    }
}

/// Serve `analyzer` on an ephemeral localhost port and return a config pointing at it.
pub(crate) async fn spawn_server(analyzer: FakeAnalyzer) -> ServerConfig {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("test listener address");
    tokio::spawn(async move {
        tonic::transport::Server::builder()
            .add_service(AnalyzerServer::new(analyzer))
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
    });
    ServerConfig {
        host: addr.ip().to_string(),
        port: addr.port(),
        ..ServerConfig::default()
    }
}
