//! Boundary between the UI thread and the task that owns the RPC client.
//!
//! The UI side holds a [`BridgeSender`] (two fire-and-forget actions) and a [`BridgeReceiver`]
//! (two inbound subscriptions). The worker side runs [`worker::run_worker`] on the tokio runtime.
//! Only serialized frames cross between them.

pub mod wire;
mod worker;


use crate::model::{AnalysisOutput, Envelope, Inbound, ItemOutput, Outbound, RequestId};
use crate::rpc::AnalysisService;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};
use wire::{Frame, WireError};

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error(transparent)]
    Wire(#[from] WireError),
    #[error("bridge worker has stopped")]
    Closed,
}

/// Spawn the worker side on the current runtime and return the UI side's ends.
pub fn spawn<S>(
    service: Arc<S>,
) -> (
    BridgeSender,
    InboundFrames,
    tokio::task::JoinHandle<Result<()>>,
)
where
    S: AnalysisService + ?Sized + 'static,
{
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel::<Frame>();
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel::<Frame>();
    let handle = tokio::spawn(worker::run_worker(service, outbound_rx, inbound_tx));
    (
        BridgeSender {
            outbound: outbound_tx,
        },
        InboundFrames(inbound_rx),
        handle,
    )
}

/// Outbound half: serializes actions and hands them to the worker without waiting.
#[derive(Debug, Clone)]
pub struct BridgeSender {
    outbound: UnboundedSender<Frame>,
}

impl BridgeSender {
    pub fn send(&self, msg: &Outbound) -> Result<(), BridgeError> {
        let frame = wire::encode(msg)?;
        self.outbound.send(frame).map_err(|_| BridgeError::Closed)
    }

    pub fn send_primary(&self, request_id: RequestId, args: &str) -> Result<(), BridgeError> {
        self.send(&Outbound::PrimaryRequest {
            request_id,
            args: args.to_string(),
        })
    }

    pub fn send_secondary(&self, request_id: RequestId, id: &str) -> Result<(), BridgeError> {
        self.send(&Outbound::SecondaryRequest {
            request_id,
            id: id.to_string(),
        })
    }
}

/// Raw inbound frames, movable to whichever thread will own the [`BridgeReceiver`].
#[derive(Debug)]
pub struct InboundFrames(UnboundedReceiver<Frame>);

type PrimaryHandler = Box<dyn FnMut(RequestId, Envelope<AnalysisOutput>)>;
type SecondaryHandler = Box<dyn FnMut(RequestId, Envelope<ItemOutput>)>;

/// Outcome of registering an inbound handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Installed,
    /// A handler was already present; it stays in place and the new one is dropped.
    AlreadyInstalled,
}

/// Inbound half: decodes frames and hands each envelope to its handler exactly once.
pub struct BridgeReceiver {
    inbound: UnboundedReceiver<Frame>,
    primary: Option<PrimaryHandler>,
    secondary: Option<SecondaryHandler>,
}

impl BridgeReceiver {
    pub fn new(frames: InboundFrames) -> Self {
        Self {
            inbound: frames.0,
            primary: None,
            secondary: None,
        }
    }

    pub fn on_primary_result<F>(&mut self, handler: F) -> Registration
    where
        F: FnMut(RequestId, Envelope<AnalysisOutput>) + 'static,
    {
        if self.primary.is_some() {
            debug!("primary result handler already registered");
            return Registration::AlreadyInstalled;
        }
        self.primary = Some(Box::new(handler));
        Registration::Installed
    }

    pub fn on_secondary_result<F>(&mut self, handler: F) -> Registration
    where
        F: FnMut(RequestId, Envelope<ItemOutput>) + 'static,
    {
        if self.secondary.is_some() {
            debug!("secondary result handler already registered");
            return Registration::AlreadyInstalled;
        }
        self.secondary = Some(Box::new(handler));
        Registration::Installed
    }

    /// Deliver every frame that has already arrived. Never blocks; returns the number delivered.
    #[cfg(any(feature = "tui", test))]
    pub fn pump(&mut self) -> usize {
        let mut delivered = 0;
        while let Ok(frame) = self.inbound.try_recv() {
            if self.deliver(&frame) {
                delivered += 1;
            }
        }
        delivered
    }

    /// Wait for the next frame and deliver it. Returns `false` once the worker side is gone.
    pub async fn pump_next(&mut self) -> bool {
        match self.inbound.recv().await {
            Some(frame) => {
                self.deliver(&frame);
                true
            }
            None => false,
        }
    }

    fn deliver(&mut self, frame: &str) -> bool {
        let msg = match wire::decode::<Inbound>(frame) {
            Ok(msg) => msg,
            Err(e) => {
                warn!("dropping undecodable inbound frame: {e}");
                return false;
            }
        };
        match msg {
            Inbound::PrimaryResponse { request_id, result } => match self.primary.as_mut() {
                Some(handler) => handler(request_id, result),
                None => {
                    warn!(request_id, "primary response with no handler registered");
                    return false;
                }
            },
            Inbound::SecondaryResponse { request_id, result } => match self.secondary.as_mut() {
                Some(handler) => handler(request_id, result),
                None => {
                    warn!(request_id, "secondary response with no handler registered");
                    return false;
                }
            },
        }
        true
    }
}
