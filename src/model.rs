use serde::{Deserialize, Serialize};

/// Identifier attached to every request that crosses the bridge.
///
/// Ids are allocated by the session state machine, start at 1 and only grow, so a response can
/// be matched against the most recent dispatch of its kind.
pub type RequestId = u64;

/// Successful result of running an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOutput {
    /// Params echoed back by the server; these become the session's loaded params.
    pub args: String,
    /// SVG markup of the diagram.
    pub plot: String,
    pub table: String,
}

/// Successful result of an item lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemOutput {
    pub table: String,
}

/// Terminal outcome of one request, as it travels back across the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "payload", rename_all = "lowercase")]
pub enum Envelope<T> {
    Ok(T),
    Err(String),
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for Envelope<T> {
    fn from(res: Result<T, E>) -> Self {
        match res {
            Ok(v) => Envelope::Ok(v),
            Err(e) => Envelope::Err(e.to_string()),
        }
    }
}

/// Messages sent from the UI side to the worker side of the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Outbound {
    PrimaryRequest { request_id: RequestId, args: String },
    SecondaryRequest { request_id: RequestId, id: String },
}

impl Outbound {
    pub fn request_id(&self) -> RequestId {
        match self {
            Outbound::PrimaryRequest { request_id, .. }
            | Outbound::SecondaryRequest { request_id, .. } => *request_id,
        }
    }
}

/// Messages sent from the worker side back to the UI side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Inbound {
    PrimaryResponse {
        request_id: RequestId,
        result: Envelope<AnalysisOutput>,
    },
    SecondaryResponse {
        request_id: RequestId,
        result: Envelope<ItemOutput>,
    },
}

impl Inbound {
    pub fn request_id(&self) -> RequestId {
        match self {
            Inbound::PrimaryResponse { request_id, .. }
            | Inbound::SecondaryResponse { request_id, .. } => *request_id,
        }
    }
}
