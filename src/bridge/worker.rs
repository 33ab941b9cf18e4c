//! Worker side of the bridge.
//!
//! Decodes outbound frames, runs one RPC task per request and answers each request with exactly
//! one inbound frame, whatever happens to the call.

use super::wire::{self, Frame};
use crate::model::{Envelope, Inbound, Outbound};
use crate::rpc::{AnalysisService, RpcError};
use anyhow::Result;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Serve requests until the UI side drops its sender.
pub async fn run_worker<S>(
    service: Arc<S>,
    mut outbound_rx: UnboundedReceiver<Frame>,
    inbound_tx: UnboundedSender<Frame>,
) -> Result<()>
where
    S: AnalysisService + ?Sized + 'static,
{
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            frame = outbound_rx.recv() => {
                let Some(frame) = frame else { break };
                match wire::decode::<Outbound>(&frame) {
                    Ok(msg) => {
                        in_flight.spawn(answer(service.clone(), msg, inbound_tx.clone()));
                    }
                    // Without a decoded request id there is no caller to answer.
                    Err(e) => warn!("dropping undecodable outbound frame: {e}"),
                }
            }
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(e) = joined {
                    warn!("request task ended abnormally: {e}");
                }
            }
        }
    }

    if inbound_tx.is_closed() {
        // Nobody is left to read the answers.
        in_flight.abort_all();
    }
    while let Some(joined) = in_flight.join_next().await {
        if let Err(e) = joined {
            debug!("request task ended during shutdown: {e}");
        }
    }
    debug!("bridge worker stopped");
    Ok(())
}

/// Turn a panicking call into an ordinary failure so the caller still gets its envelope.
async fn guarded<T, F>(call: F) -> Result<T, RpcError>
where
    F: Future<Output = Result<T, RpcError>>,
{
    AssertUnwindSafe(call)
        .catch_unwind()
        .await
        .unwrap_or(Err(RpcError::Aborted))
}

fn envelope<T>(kind: &str, request_id: u64, res: Result<T, RpcError>) -> Envelope<T> {
    match &res {
        Ok(_) => info!(request_id, "{kind} request completed"),
        Err(e) => warn!(request_id, "{kind} request failed: {e}"),
    }
    res.into()
}

async fn answer<S>(service: Arc<S>, msg: Outbound, inbound_tx: UnboundedSender<Frame>)
where
    S: AnalysisService + ?Sized,
{
    let reply = match msg {
        Outbound::PrimaryRequest { request_id, args } => {
            info!(request_id, %args, "running analysis");
            let res = guarded(service.run_analysis(&args)).await;
            Inbound::PrimaryResponse {
                request_id,
                result: envelope("analysis", request_id, res),
            }
        }
        Outbound::SecondaryRequest { request_id, id } => {
            info!(request_id, %id, "fetching item");
            let res = guarded(service.fetch_item(&id)).await;
            Inbound::SecondaryResponse {
                request_id,
                result: envelope("item", request_id, res),
            }
        }
    };

    let request_id = reply.request_id();
    match wire::encode(&reply) {
        Ok(frame) => {
            if inbound_tx.send(frame).is_err() {
                debug!(request_id, "ui side gone; response dropped");
            }
        }
        Err(e) => warn!(request_id, "could not encode response: {e}"),
    }
}
