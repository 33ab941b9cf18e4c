//! Text summary builder for CLI output.
//!
//! Formats the final session for `--text` mode. The table is passed through untouched so the
//! server's colouring reaches the terminal.

use crate::diagram::Diagram;
use crate::session::{PrimaryStatus, Session, ERROR_BANNER};

/// Build the lines printed by text mode.
pub(crate) fn build_text_summary(
    session: &Session,
    server: &str,
    diagram: Option<&Diagram>,
) -> Vec<String> {
    let mut lines = vec![format!("Server: {server}")];

    match session.status {
        PrimaryStatus::Ready => {}
        PrimaryStatus::Errored => {
            lines.push(ERROR_BANNER.to_string());
            return lines;
        }
        PrimaryStatus::Idle | PrimaryStatus::Pending => {
            lines.push("No result".to_string());
            return lines;
        }
    }

    lines.push(format!("Args: {}", session.loaded_params));
    match diagram {
        Some(d) => lines.push(format!(
            "Diagram: {} shapes, {} with details ({:.0}x{:.0})",
            d.shapes.len(),
            d.hover_targets().len(),
            d.view.width,
            d.view.height
        )),
        None if session.diagram.is_empty() => lines.push("Diagram: none".to_string()),
        None => lines.push("Diagram: not drawable".to_string()),
    }
    if !session.item_id.is_empty() {
        lines.push(format!("Clonotype: {}", session.item_id));
    }
    if session.table.is_empty() {
        lines.push("Table: empty".to_string());
    } else {
        lines.push(String::new());
        lines.extend(session.table.lines().map(str::to_string));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnalysisOutput, Envelope};
    use crate::session::{reduce, SessionEvent};
    use pretty_assertions::assert_eq;

    fn finished(result: Envelope<AnalysisOutput>) -> Session {
        let (s, out) = reduce(Session::default(), SessionEvent::PrimarySubmitted("BCR=1".into()));
        reduce(
            s,
            SessionEvent::PrimaryResponded {
                request_id: out.unwrap().request_id(),
                result,
            },
        )
        .0
    }

    #[test]
    fn ready_session_lists_args_diagram_and_table() {
        let s = finished(Envelope::Ok(AnalysisOutput {
            args: "BCR=1".into(),
            plot: r#"<svg width="20" height="10"><circle cx="1" cy="1" r="1" data-tooltip="{}"/></svg>"#
                .into(),
            table: "row 1\nrow 2".into(),
        }));
        let diagram = Diagram::parse(&s.diagram).ok();
        assert_eq!(
            build_text_summary(&s, "127.0.0.1:7000", diagram.as_ref()),
            vec![
                "Server: 127.0.0.1:7000",
                "Args: BCR=1",
                "Diagram: 1 shapes, 1 with details (20x10)",
                "",
                "row 1",
                "row 2",
            ]
        );
    }

    #[test]
    fn errored_session_shows_only_the_banner() {
        let s = finished(Envelope::Err("boom".into()));
        let lines = build_text_summary(&s, "h:1", None);
        assert_eq!(lines.len(), 2);
        assert!(!lines.join("\n").contains("boom"));
    }
}
