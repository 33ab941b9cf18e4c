#[cfg(any(feature = "tui", test))]
use super::{PrimaryStatus, Session};

pub const ERROR_BANNER: &str =
    "Something went wrong. If the error persists, restart the server";

/// What the presentation layer shows for a given session. Borrowed from the session, rebuilt on
/// every frame.
#[cfg(any(feature = "tui", test))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView<'a> {
    pub params: &'a str,
    pub submit_enabled: bool,
    pub loading: bool,
    pub error_banner: Option<&'static str>,
    /// "Running with args ..." line for the result on screen.
    pub loaded_banner: Option<String>,
    /// Item-lookup control; present once a result has loaded.
    pub item_lookup: Option<&'a str>,
    pub diagram: Option<&'a str>,
    pub table: Option<&'a str>,
}

#[cfg(any(feature = "tui", test))]
impl<'a> SessionView<'a> {
    pub fn of(s: &'a Session) -> Self {
        let ready = s.status == PrimaryStatus::Ready;
        let loaded = !s.loaded_params.is_empty();
        Self {
            params: &s.raw_params,
            submit_enabled: s.status != PrimaryStatus::Pending,
            loading: s.status == PrimaryStatus::Pending,
            error_banner: (s.status == PrimaryStatus::Errored).then_some(ERROR_BANNER),
            loaded_banner: loaded.then(|| format!("Running with args {}", s.loaded_params)),
            item_lookup: loaded.then_some(s.item_id.as_str()),
            diagram: ready.then_some(s.diagram.as_str()),
            table: ready.then_some(s.table.as_str()),
        }
    }
}
