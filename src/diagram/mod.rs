//! Diagram model for the SVG returned with an analysis.
//!
//! The markup is reduced to a flat list of primitive shapes in SVG user coordinates. Shapes keep
//! the raw hover metadata of their element (or nearest annotated ancestor); [`tooltip`] turns that
//! into key/value rows.

mod svg;
#[cfg(any(feature = "tui", test))]
pub mod tooltip;

pub use svg::DiagramError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    /// Open or closed (polygon) run of segments.
    Polyline(Vec<(f64, f64)>),
    Text {
        x: f64,
        y: f64,
        size: f64,
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub color: Rgb,
    /// Raw `data-tooltip` value.
    pub tooltip: Option<String>,
}

/// Visible region in SVG user units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    pub view: ViewBox,
    pub shapes: Vec<Shape>,
}

impl Shape {
    /// Whether `(x, y)` lies on the shape, allowing `tol` user units of slack.
    #[cfg(any(feature = "tui", test))]
    pub fn contains(&self, x: f64, y: f64, tol: f64) -> bool {
        match &self.kind {
            ShapeKind::Circle { cx, cy, r } => (x - cx).hypot(y - cy) <= r + tol,
            ShapeKind::Rect {
                x: rx,
                y: ry,
                width,
                height,
            } => {
                x >= rx - tol && x <= rx + width + tol && y >= ry - tol && y <= ry + height + tol
            }
            ShapeKind::Line { x1, y1, x2, y2 } => {
                segment_distance((x, y), (*x1, *y1), (*x2, *y2)) <= tol
            }
            ShapeKind::Polyline(points) => points
                .windows(2)
                .any(|w| segment_distance((x, y), w[0], w[1]) <= tol),
            ShapeKind::Text {
                x: tx,
                y: ty,
                size,
                text,
            } => {
                // Baseline-anchored box with an average glyph width.
                let width = text.chars().count() as f64 * size * 0.6;
                x >= tx - tol && x <= tx + width + tol && y >= ty - size - tol && y <= ty + tol
            }
        }
    }

    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        match &self.kind {
            ShapeKind::Circle { cx, cy, r } => (cx - r, cy - r, cx + r, cy + r),
            ShapeKind::Rect {
                x,
                y,
                width,
                height,
            } => (*x, *y, x + width, y + height),
            ShapeKind::Line { x1, y1, x2, y2 } => {
                (x1.min(*x2), y1.min(*y2), x1.max(*x2), y1.max(*y2))
            }
            ShapeKind::Polyline(points) => points.iter().fold(
                (f64::MAX, f64::MAX, f64::MIN, f64::MIN),
                |(a, b, c, d), &(px, py)| (a.min(px), b.min(py), c.max(px), d.max(py)),
            ),
            ShapeKind::Text { x, y, size, text } => {
                let width = text.chars().count() as f64 * size * 0.6;
                (*x, y - size, x + width, *y)
            }
        }
    }
}

#[cfg(any(feature = "tui", test))]
fn segment_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len2 = dx * dx + dy * dy;
    if len2 == 0.0 {
        return (p.0 - a.0).hypot(p.1 - a.1);
    }
    let t = (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len2).clamp(0.0, 1.0);
    (p.0 - (a.0 + t * dx)).hypot(p.1 - (a.1 + t * dy))
}

impl Diagram {
    pub fn parse(markup: &str) -> Result<Self, DiagramError> {
        svg::parse(markup)
    }

    /// Topmost shape under `(x, y)` that carries hover metadata.
    #[cfg(any(feature = "tui", test))]
    pub fn hit_test(&self, x: f64, y: f64, tol: f64) -> Option<usize> {
        self.shapes
            .iter()
            .enumerate()
            .rev()
            .find(|(_, s)| s.tooltip.is_some() && s.contains(x, y, tol))
            .map(|(i, _)| i)
    }

    /// Indices of every shape with hover metadata, in document order.
    pub fn hover_targets(&self) -> Vec<usize> {
        self.shapes
            .iter()
            .enumerate()
            .filter(|(_, s)| s.tooltip.is_some())
            .map(|(i, _)| i)
            .collect()
    }

    /// Key/value rows for the shape at `idx`; empty when it has none or they do not parse.
    #[cfg(any(feature = "tui", test))]
    pub fn tooltip_entries(&self, idx: usize) -> Vec<(String, String)> {
        self.shapes
            .get(idx)
            .and_then(|s| s.tooltip.as_deref())
            .map(tooltip::parse_tooltip)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn diagram(shapes: Vec<Shape>) -> Diagram {
        Diagram {
            view: ViewBox {
                x: 0.0,
                y: 0.0,
                width: 100.0,
                height: 100.0,
            },
            shapes,
        }
    }

    fn circle(cx: f64, cy: f64, r: f64, tooltip: Option<&str>) -> Shape {
        Shape {
            kind: ShapeKind::Circle { cx, cy, r },
            color: Rgb::BLACK,
            tooltip: tooltip.map(str::to_string),
        }
    }

    #[test]
    fn hit_test_prefers_topmost_annotated_shape() {
        let d = diagram(vec![
            circle(50.0, 50.0, 10.0, Some(r#"{"n":"below"}"#)),
            circle(50.0, 50.0, 10.0, Some(r#"{"n":"above"}"#)),
            circle(50.0, 50.0, 20.0, None),
        ]);
        assert_eq!(d.hit_test(52.0, 50.0, 0.0), Some(1));
        assert_eq!(d.hit_test(90.0, 90.0, 0.0), None);
        assert_eq!(d.hover_targets(), vec![0, 1]);
    }

    #[test]
    fn tolerance_widens_thin_shapes() {
        let d = diagram(vec![Shape {
            kind: ShapeKind::Line {
                x1: 0.0,
                y1: 0.0,
                x2: 100.0,
                y2: 0.0,
            },
            color: Rgb::BLACK,
            tooltip: Some("{}".into()),
        }]);
        assert_eq!(d.hit_test(40.0, 1.5, 0.5), None);
        assert_eq!(d.hit_test(40.0, 1.5, 2.0), Some(0));
    }

    #[test]
    fn entries_for_missing_or_bad_metadata_are_empty() {
        let d = diagram(vec![
            circle(10.0, 10.0, 1.0, None),
            circle(20.0, 20.0, 1.0, Some("{oops")),
            circle(30.0, 30.0, 1.0, Some(r#"{"clonotype":"3","cells":12}"#)),
        ]);
        assert!(d.tooltip_entries(0).is_empty());
        assert!(d.tooltip_entries(1).is_empty());
        assert!(d.tooltip_entries(9).is_empty());
        assert_eq!(
            d.tooltip_entries(2),
            vec![
                ("clonotype".to_string(), "3".to_string()),
                ("cells".to_string(), "12".to_string())
            ]
        );
    }
}
