use super::{reduce, Session, SessionEvent};
use crate::bridge::{BridgeReceiver, BridgeSender, Registration};
use crate::model::{Envelope, Outbound};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::warn;

/// Owns the live session on the UI thread and forwards dispatched requests to the bridge.
pub struct SessionStore {
    session: Session,
    sender: BridgeSender,
}

impl SessionStore {
    pub fn new(sender: BridgeSender) -> Self {
        Self {
            session: Session::default(),
            sender,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn apply(&mut self, event: SessionEvent) {
        let (next, outbound) = reduce(std::mem::take(&mut self.session), event);
        self.session = next;
        if let Some(msg) = outbound {
            self.dispatch(msg);
        }
    }

    fn dispatch(&mut self, msg: Outbound) {
        let sent = match &msg {
            Outbound::PrimaryRequest { request_id, args } => {
                self.sender.send_primary(*request_id, args)
            }
            Outbound::SecondaryRequest { request_id, id } => {
                self.sender.send_secondary(*request_id, id)
            }
        };
        let Err(e) = sent else { return };

        // The request never left; settle it here so the session does not wait forever.
        warn!(request_id = msg.request_id(), "could not dispatch request: {e}");
        let reason = e.to_string();
        let event = match msg {
            Outbound::PrimaryRequest { request_id, .. } => SessionEvent::PrimaryResponded {
                request_id,
                result: Envelope::Err(reason),
            },
            Outbound::SecondaryRequest { request_id, .. } => SessionEvent::SecondaryResponded {
                request_id,
                result: Envelope::Err(reason),
            },
        };
        let (next, _) = reduce(std::mem::take(&mut self.session), event);
        self.session = next;
    }
}

/// Subscribe `store` to both inbound streams.
///
/// The handlers hold only a weak reference, so responses arriving after the store is dropped are
/// ignored. Attaching twice leaves the first handlers in place.
pub fn attach(
    store: &Rc<RefCell<SessionStore>>,
    receiver: &mut BridgeReceiver,
) -> (Registration, Registration) {
    let weak: Weak<RefCell<SessionStore>> = Rc::downgrade(store);
    let primary = receiver.on_primary_result(move |request_id, result| {
        if let Some(store) = weak.upgrade() {
            store
                .borrow_mut()
                .apply(SessionEvent::PrimaryResponded { request_id, result });
        }
    });

    let weak = Rc::downgrade(store);
    let secondary = receiver.on_secondary_result(move |request_id, result| {
        if let Some(store) = weak.upgrade() {
            store
                .borrow_mut()
                .apply(SessionEvent::SecondaryResponded { request_id, result });
        }
    });
    (primary, secondary)
}
