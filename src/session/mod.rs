//! Session state machine.
//!
//! [`reduce`] is the only place session state changes. It is pure: given the current session and
//! an event it returns the next session and, at most, one request to dispatch. Request ids are
//! allocated here, so staleness and single-flight are decided without looking at the transport.

mod store;
mod view;

pub use store::{attach, SessionStore};
#[cfg(feature = "tui")]
pub use view::SessionView;
pub use view::ERROR_BANNER;

use crate::model::{AnalysisOutput, Envelope, ItemOutput, Outbound, RequestId};
use serde::Serialize;
use tracing::debug;

/// Lifecycle of the primary (analysis) request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryStatus {
    #[default]
    Idle,
    Pending,
    Ready,
    Errored,
}

/// Everything the presentation layer is allowed to see.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Params as most recently edited or submitted.
    pub raw_params: String,
    /// Params echoed by the server for the result currently shown; empty when none.
    pub loaded_params: String,
    pub status: PrimaryStatus,
    pub item_id: String,
    /// SVG of the current result.
    pub diagram: String,
    /// Either the analysis table or the table of the last looked-up item.
    pub table: String,

    #[serde(skip)]
    next_request_id: RequestId,
    #[serde(skip)]
    inflight_primary: Option<RequestId>,
    #[serde(skip)]
    latest_secondary: Option<RequestId>,
    #[serde(skip)]
    result_id: Option<RequestId>,
    #[serde(skip)]
    revision: u64,
}

impl Session {
    /// Id of the primary request whose result is currently displayed.
    #[cfg(any(feature = "tui", test))]
    pub fn result_id(&self) -> Option<RequestId> {
        self.result_id
    }

    /// Bumped on every state change; lets the UI skip work when nothing moved.
    #[cfg(any(feature = "tui", test))]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn secondary_in_flight(&self) -> bool {
        self.latest_secondary.is_some()
    }

    fn allocate_id(&mut self) -> RequestId {
        self.next_request_id += 1;
        self.next_request_id
    }

    fn touch(mut self) -> Self {
        self.revision += 1;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    ParamsEdited(String),
    ItemIdEdited(String),
    PrimarySubmitted(String),
    SecondarySubmitted(String),
    PrimaryResponded {
        request_id: RequestId,
        result: Envelope<AnalysisOutput>,
    },
    SecondaryResponded {
        request_id: RequestId,
        result: Envelope<ItemOutput>,
    },
}

/// Advance the session by one event.
pub fn reduce(mut s: Session, event: SessionEvent) -> (Session, Option<Outbound>) {
    match event {
        SessionEvent::ParamsEdited(text) => {
            if s.raw_params == text {
                return (s, None);
            }
            s.raw_params = text;
            (s.touch(), None)
        }
        SessionEvent::ItemIdEdited(text) => {
            if s.item_id == text {
                return (s, None);
            }
            s.item_id = text;
            (s.touch(), None)
        }
        SessionEvent::PrimarySubmitted(params) => {
            if params.is_empty() {
                debug!("ignoring submit with empty params");
                return (s, None);
            }
            if s.status == PrimaryStatus::Pending {
                debug!("analysis already in flight; submit ignored");
                return (s, None);
            }
            let request_id = s.allocate_id();
            s.raw_params = params.clone();
            s.loaded_params.clear();
            s.item_id.clear();
            s.diagram.clear();
            s.table.clear();
            s.status = PrimaryStatus::Pending;
            s.inflight_primary = Some(request_id);
            s.latest_secondary = None;
            s.result_id = None;
            (
                s.touch(),
                Some(Outbound::PrimaryRequest {
                    request_id,
                    args: params,
                }),
            )
        }
        SessionEvent::PrimaryResponded { request_id, result } => {
            if s.status != PrimaryStatus::Pending || s.inflight_primary != Some(request_id) {
                debug!(request_id, "discarding stale analysis response");
                return (s, None);
            }
            s.inflight_primary = None;
            match result {
                Envelope::Ok(out) => {
                    s.loaded_params = out.args;
                    s.diagram = out.plot;
                    s.table = out.table;
                    s.status = PrimaryStatus::Ready;
                    s.result_id = Some(request_id);
                }
                Envelope::Err(msg) => {
                    debug!(request_id, "analysis failed: {msg}");
                    s.raw_params.clear();
                    s.loaded_params.clear();
                    s.status = PrimaryStatus::Errored;
                }
            }
            (s.touch(), None)
        }
        SessionEvent::SecondarySubmitted(id) => {
            if s.loaded_params.is_empty() || id.is_empty() {
                debug!("item lookup needs a loaded result and an id");
                return (s, None);
            }
            let request_id = s.allocate_id();
            s.item_id = id.clone();
            s.latest_secondary = Some(request_id);
            (
                s.touch(),
                Some(Outbound::SecondaryRequest { request_id, id }),
            )
        }
        SessionEvent::SecondaryResponded { request_id, result } => {
            if s.latest_secondary != Some(request_id) || s.status != PrimaryStatus::Ready {
                debug!(request_id, "discarding stale item response");
                return (s, None);
            }
            s.latest_secondary = None;
            match result {
                Envelope::Ok(item) => s.table = item.table,
                Envelope::Err(msg) => {
                    debug!(request_id, "item lookup failed: {msg}");
                    s.table.clear();
                }
            }
            (s.touch(), None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn analysis(args: &str) -> Envelope<AnalysisOutput> {
        Envelope::Ok(AnalysisOutput {
            args: args.to_string(),
            plot: format!("<svg>{args}</svg>"),
            table: format!("table for {args}"),
        })
    }

    fn item(table: &str) -> Envelope<ItemOutput> {
        Envelope::Ok(ItemOutput {
            table: table.to_string(),
        })
    }

    fn submit(s: Session, params: &str) -> (Session, RequestId) {
        let (s, out) = reduce(s, SessionEvent::PrimarySubmitted(params.to_string()));
        let id = out.expect("submit dispatches").request_id();
        (s, id)
    }

    fn loaded(params: &str) -> Session {
        let (s, id) = submit(Session::default(), params);
        reduce(
            s,
            SessionEvent::PrimaryResponded {
                request_id: id,
                result: analysis(params),
            },
        )
        .0
    }

    #[test]
    fn submit_moves_to_pending_and_clears_previous_result() {
        let s = loaded("BCR=1");
        let (s, out) = reduce(s, SessionEvent::PrimarySubmitted("BCR=2".into()));
        assert_eq!(s.status, PrimaryStatus::Pending);
        assert_eq!(s.raw_params, "BCR=2");
        assert_eq!(s.loaded_params, "");
        assert_eq!(s.diagram, "");
        assert_eq!(s.table, "");
        assert_eq!(s.item_id, "");
        assert_eq!(
            out,
            Some(Outbound::PrimaryRequest {
                request_id: 2,
                args: "BCR=2".into()
            })
        );
    }

    #[test]
    fn empty_params_do_nothing() {
        let before = Session::default();
        let (after, out) = reduce(before.clone(), SessionEvent::PrimarySubmitted(String::new()));
        assert_eq!(after, before);
        assert_eq!(out, None);
    }

    #[test]
    fn whitespace_params_are_not_empty() {
        let (s, out) = reduce(Session::default(), SessionEvent::PrimarySubmitted(" ".into()));
        assert_eq!(s.status, PrimaryStatus::Pending);
        assert!(out.is_some());
    }

    #[test]
    fn only_one_analysis_in_flight() {
        let (s, first) = submit(Session::default(), "BCR=1");
        let (s, out) = reduce(s, SessionEvent::PrimarySubmitted("BCR=2".into()));
        assert_eq!(out, None);
        assert_eq!(s.raw_params, "BCR=1");

        let (s, _) = reduce(
            s,
            SessionEvent::PrimaryResponded {
                request_id: first,
                result: analysis("BCR=1"),
            },
        );
        assert_eq!(s.status, PrimaryStatus::Ready);
        assert_eq!(s.loaded_params, "BCR=1");
    }

    #[test]
    fn successful_analysis_is_ready() {
        let s = loaded("BCR=~/data/1031851");
        assert_eq!(s.status, PrimaryStatus::Ready);
        assert_eq!(s.loaded_params, "BCR=~/data/1031851");
        assert_eq!(s.diagram, "<svg>BCR=~/data/1031851</svg>");
        assert_eq!(s.table, "table for BCR=~/data/1031851");
        assert_eq!(s.result_id(), Some(1));
    }

    #[test]
    fn failed_analysis_clears_params() {
        let (s, id) = submit(Session::default(), "BCR=1");
        let (s, _) = reduce(
            s,
            SessionEvent::PrimaryResponded {
                request_id: id,
                result: Envelope::Err("server unavailable".into()),
            },
        );
        assert_eq!(s.status, PrimaryStatus::Errored);
        assert_eq!(s.raw_params, "");
        assert_eq!(s.loaded_params, "");
        assert_eq!(s.diagram, "");

        // Errored is not terminal.
        let (s, out) = reduce(s, SessionEvent::PrimarySubmitted("BCR=2".into()));
        assert_eq!(s.status, PrimaryStatus::Pending);
        assert!(out.is_some());
    }

    #[test]
    fn stale_analysis_response_is_discarded() {
        let s = loaded("BCR=1");
        let before = s.clone();
        let (after, _) = reduce(
            s,
            SessionEvent::PrimaryResponded {
                request_id: 1,
                result: analysis("BCR=other"),
            },
        );
        assert_eq!(after, before);

        let (s, current) = submit(after, "BCR=2");
        let (s, _) = reduce(
            s,
            SessionEvent::PrimaryResponded {
                request_id: current + 10,
                result: analysis("BCR=bogus"),
            },
        );
        assert_eq!(s.status, PrimaryStatus::Pending);
        assert_eq!(s.loaded_params, "");
    }

    #[test]
    fn item_lookup_requires_a_loaded_result() {
        let (s, out) = reduce(Session::default(), SessionEvent::SecondarySubmitted("3".into()));
        assert_eq!(out, None);
        assert_eq!(s.item_id, "");

        let (s, _) = submit(Session::default(), "BCR=1");
        let (_, out) = reduce(s, SessionEvent::SecondarySubmitted("3".into()));
        assert_eq!(out, None);
    }

    #[test]
    fn item_lookup_needs_an_id() {
        let (_, out) = reduce(loaded("BCR=1"), SessionEvent::SecondarySubmitted(String::new()));
        assert_eq!(out, None);
    }

    #[test]
    fn item_response_replaces_table_only() {
        let s = loaded("BCR=1");
        let diagram = s.diagram.clone();
        let (s, out) = reduce(s, SessionEvent::SecondarySubmitted("3".into()));
        let request_id = out.unwrap().request_id();
        assert!(s.secondary_in_flight());

        let (s, _) = reduce(
            s,
            SessionEvent::SecondaryResponded {
                request_id,
                result: item("item 3 detail"),
            },
        );
        assert_eq!(s.table, "item 3 detail");
        assert_eq!(s.diagram, diagram);
        assert_eq!(s.loaded_params, "BCR=1");
        assert_eq!(s.status, PrimaryStatus::Ready);
        assert!(!s.secondary_in_flight());
    }

    #[test]
    fn failed_item_lookup_clears_table() {
        let s = loaded("BCR=1");
        let (s, out) = reduce(s, SessionEvent::SecondarySubmitted("999".into()));
        let request_id = out.unwrap().request_id();
        let (s, _) = reduce(
            s,
            SessionEvent::SecondaryResponded {
                request_id,
                result: Envelope::Err("clonotype id too large".into()),
            },
        );
        assert_eq!(s.table, "");
        assert_eq!(s.status, PrimaryStatus::Ready);
    }

    #[test]
    fn only_latest_item_lookup_wins() {
        let s = loaded("BCR=1");
        let (s, a) = reduce(s, SessionEvent::SecondarySubmitted("1".into()));
        let (s, b) = reduce(s, SessionEvent::SecondarySubmitted("2".into()));
        let (a, b) = (a.unwrap().request_id(), b.unwrap().request_id());

        let (s, _) = reduce(
            s,
            SessionEvent::SecondaryResponded {
                request_id: b,
                result: item("item 2 detail"),
            },
        );
        let (s, _) = reduce(
            s,
            SessionEvent::SecondaryResponded {
                request_id: a,
                result: item("item 1 detail"),
            },
        );
        assert_eq!(s.table, "item 2 detail");
        assert_eq!(s.item_id, "2");
    }

    #[test]
    fn item_response_after_new_submit_is_discarded() {
        let s = loaded("BCR=1");
        let (s, out) = reduce(s, SessionEvent::SecondarySubmitted("3".into()));
        let item_request = out.unwrap().request_id();
        let (s, _) = submit(s, "BCR=2");
        let (s, _) = reduce(
            s,
            SessionEvent::SecondaryResponded {
                request_id: item_request,
                result: item("item 3 detail"),
            },
        );
        assert_eq!(s.status, PrimaryStatus::Pending);
        assert_eq!(s.table, "");
    }

    #[test]
    fn request_ids_only_grow() {
        let (s, a) = submit(Session::default(), "BCR=1");
        let (s, _) = reduce(
            s,
            SessionEvent::PrimaryResponded {
                request_id: a,
                result: analysis("BCR=1"),
            },
        );
        let (s, out) = reduce(s, SessionEvent::SecondarySubmitted("3".into()));
        let b = out.unwrap().request_id();
        let (_, c) = submit(s, "BCR=2");
        assert!(a < b && b < c);
    }

    #[test]
    fn edits_bump_revision_only_on_change() {
        let s = Session::default();
        let (s, _) = reduce(s, SessionEvent::ParamsEdited("BCR".into()));
        assert_eq!(s.revision(), 1);
        let (s, _) = reduce(s, SessionEvent::ParamsEdited("BCR".into()));
        assert_eq!(s.revision(), 1);
        let (s, _) = reduce(s, SessionEvent::ItemIdEdited("4".into()));
        assert_eq!(s.revision(), 2);
        assert_eq!(s.item_id, "4");
    }
}
