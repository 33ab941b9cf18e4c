use super::{Diagram, Rgb, Shape, ShapeKind, ViewBox};
use roxmltree::{Document, Node, ParsingOptions};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum DiagramError {
    #[error("diagram markup is not XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("diagram root is <{0}>, expected <svg>")]
    NotSvg(String),
}

const DEFAULT_FONT_SIZE: f64 = 12.0;

/// Inherited drawing context while walking the tree.
#[derive(Clone, Copy)]
struct Ctx<'a> {
    dx: f64,
    dy: f64,
    color: Option<Rgb>,
    tooltip: Option<&'a str>,
}

pub(super) fn parse(markup: &str) -> Result<Diagram, DiagramError> {
    let opts = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(markup, opts)?;
    let root = doc.root_element();
    if root.tag_name().name() != "svg" {
        return Err(DiagramError::NotSvg(root.tag_name().name().to_string()));
    }

    let mut shapes = Vec::new();
    let ctx = Ctx {
        dx: 0.0,
        dy: 0.0,
        color: None,
        tooltip: None,
    };
    for child in root.children().filter(Node::is_element) {
        walk(child, ctx, &mut shapes);
    }

    let view = view_box(root).unwrap_or_else(|| fit(&shapes));
    Ok(Diagram { view, shapes })
}

fn walk<'a>(node: Node<'a, '_>, parent: Ctx<'a>, out: &mut Vec<Shape>) {
    let (tx, ty) = node.attribute("transform").map(translate).unwrap_or((0.0, 0.0));
    let ctx = Ctx {
        dx: parent.dx + tx,
        dy: parent.dy + ty,
        color: paint(node).or(parent.color),
        tooltip: node.attribute("data-tooltip").or(parent.tooltip),
    };

    let name = node.tag_name().name();
    let kind = match name {
        "g" | "a" | "svg" => {
            for child in node.children().filter(Node::is_element) {
                walk(child, ctx, out);
            }
            return;
        }
        "circle" => Some(ShapeKind::Circle {
            cx: num(node, "cx") + ctx.dx,
            cy: num(node, "cy") + ctx.dy,
            r: num(node, "r"),
        }),
        "ellipse" => Some(ShapeKind::Circle {
            cx: num(node, "cx") + ctx.dx,
            cy: num(node, "cy") + ctx.dy,
            r: (num(node, "rx") + num(node, "ry")) / 2.0,
        }),
        "rect" => Some(ShapeKind::Rect {
            x: num(node, "x") + ctx.dx,
            y: num(node, "y") + ctx.dy,
            width: num(node, "width"),
            height: num(node, "height"),
        }),
        "line" => Some(ShapeKind::Line {
            x1: num(node, "x1") + ctx.dx,
            y1: num(node, "y1") + ctx.dy,
            x2: num(node, "x2") + ctx.dx,
            y2: num(node, "y2") + ctx.dy,
        }),
        "polyline" | "polygon" => node.attribute("points").map(|raw| {
            let mut points: Vec<(f64, f64)> = numbers(raw)
                .chunks_exact(2)
                .map(|p| (p[0] + ctx.dx, p[1] + ctx.dy))
                .collect();
            if name == "polygon" {
                if let Some(&first) = points.first() {
                    points.push(first);
                }
            }
            ShapeKind::Polyline(points)
        }),
        "text" => {
            let text: String = node
                .descendants()
                .filter(|n| n.is_text())
                .filter_map(|n| n.text())
                .collect();
            let text = text.trim();
            (!text.is_empty()).then(|| ShapeKind::Text {
                x: num(node, "x") + ctx.dx,
                y: num(node, "y") + ctx.dy,
                size: length(node.attribute("font-size")).unwrap_or(DEFAULT_FONT_SIZE),
                text: text.to_string(),
            })
        }
        other => {
            debug!("skipping unsupported svg element <{other}>");
            None
        }
    };

    if let Some(kind) = kind {
        out.push(Shape {
            kind,
            color: ctx.color.unwrap_or(Rgb::BLACK),
            tooltip: ctx.tooltip.map(str::to_string),
        });
    }
}

fn num(node: Node, attr: &str) -> f64 {
    length(node.attribute(attr)).unwrap_or(0.0)
}

/// Parse a length, ignoring a trailing unit such as `px` or `pt`.
fn length(raw: Option<&str>) -> Option<f64> {
    let raw = raw?.trim();
    let end = raw
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')))
        .unwrap_or(raw.len());
    raw[..end].parse().ok()
}

fn numbers(raw: &str) -> Vec<f64> {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect()
}

/// Offset of a `translate(...)` transform. Other transforms are ignored.
fn translate(raw: &str) -> (f64, f64) {
    let Some(start) = raw.find("translate(") else {
        return (0.0, 0.0);
    };
    let rest = &raw[start + "translate(".len()..];
    let args = rest.split(')').next().unwrap_or_default();
    match numbers(args).as_slice() {
        [x] => (*x, 0.0),
        [x, y, ..] => (*x, *y),
        [] => (0.0, 0.0),
    }
}

fn view_box(root: Node) -> Option<ViewBox> {
    if let Some(raw) = root.attribute("viewBox") {
        if let [x, y, width, height] = numbers(raw).as_slice() {
            if *width > 0.0 && *height > 0.0 {
                return Some(ViewBox {
                    x: *x,
                    y: *y,
                    width: *width,
                    height: *height,
                });
            }
        }
    }
    let width = length(root.attribute("width"))?;
    let height = length(root.attribute("height"))?;
    (width > 0.0 && height > 0.0).then_some(ViewBox {
        x: 0.0,
        y: 0.0,
        width,
        height,
    })
}

fn fit(shapes: &[Shape]) -> ViewBox {
    let (x0, y0, x1, y1) = shapes.iter().map(Shape::bounds).fold(
        (f64::MAX, f64::MAX, f64::MIN, f64::MIN),
        |(a, b, c, d), (x0, y0, x1, y1)| (a.min(x0), b.min(y0), c.max(x1), d.max(y1)),
    );
    if x0 > x1 || y0 > y1 {
        return ViewBox {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        };
    }
    ViewBox {
        x: x0,
        y: y0,
        width: (x1 - x0).max(1.0),
        height: (y1 - y0).max(1.0),
    }
}

/// Colour of an element from `fill`, then `stroke`, then the same keys in `style`.
fn paint(node: Node) -> Option<Rgb> {
    let style = node.attribute("style").unwrap_or_default();
    let from_style = |key: &str| {
        style.split(';').find_map(|decl| {
            let (k, v) = decl.split_once(':')?;
            (k.trim() == key).then(|| v.trim())
        })
    };
    [
        node.attribute("fill"),
        from_style("fill"),
        node.attribute("stroke"),
        from_style("stroke"),
    ]
    .into_iter()
    .flatten()
    .find_map(color)
}

fn color(raw: &str) -> Option<Rgb> {
    let raw = raw.trim();
    if let Some(hex) = raw.strip_prefix('#') {
        let digit = |i: usize, n: usize| u8::from_str_radix(hex.get(i..i + n)?, 16).ok();
        return match hex.len() {
            3 => Some(Rgb(digit(0, 1)? * 17, digit(1, 1)? * 17, digit(2, 1)? * 17)),
            6 => Some(Rgb(digit(0, 2)?, digit(2, 2)?, digit(4, 2)?)),
            _ => None,
        };
    }
    if let Some(args) = raw.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
        let parts: Vec<u8> = args
            .split(',')
            .filter_map(|p| p.trim().parse::<f64>().ok())
            .map(|v| v.clamp(0.0, 255.0) as u8)
            .collect();
        return match parts.as_slice() {
            [r, g, b] => Some(Rgb(*r, *g, *b)),
            _ => None,
        };
    }
    let rgb = match raw.to_ascii_lowercase().as_str() {
        "black" => Rgb(0, 0, 0),
        "white" => Rgb(255, 255, 255),
        "red" => Rgb(255, 0, 0),
        "green" => Rgb(0, 128, 0),
        "lime" => Rgb(0, 255, 0),
        "blue" => Rgb(0, 0, 255),
        "navy" => Rgb(0, 0, 128),
        "yellow" => Rgb(255, 255, 0),
        "orange" => Rgb(255, 165, 0),
        "purple" => Rgb(128, 0, 128),
        "magenta" | "fuchsia" => Rgb(255, 0, 255),
        "cyan" | "aqua" => Rgb(0, 255, 255),
        "teal" => Rgb(0, 128, 128),
        "gray" | "grey" => Rgb(128, 128, 128),
        "silver" => Rgb(192, 192, 192),
        "maroon" => Rgb(128, 0, 0),
        "olive" => Rgb(128, 128, 0),
        "brown" => Rgb(165, 42, 42),
        "pink" => Rgb(255, 192, 203),
        _ => return None,
    };
    Some(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_primitives_with_tooltips() {
        let d = parse(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="400" height="300">
                <rect x="0" y="0" width="400" height="300" style="fill:white"/>
                <circle cx="10" cy="20" r="4" fill="#f00" data-tooltip='{"clonotype":"3"}'/>
                <line x1="0" y1="0" x2="5" y2="5" stroke="rgb(0, 0, 255)"/>
                <text x="1" y="2" font-size="10px">clonotype <tspan>3</tspan></text>
            </svg>"##,
        )
        .unwrap();
        assert_eq!(
            d.view,
            ViewBox {
                x: 0.0,
                y: 0.0,
                width: 400.0,
                height: 300.0
            }
        );
        assert_eq!(d.shapes.len(), 4);
        assert_eq!(d.shapes[0].color, Rgb(255, 255, 255));
        assert_eq!(
            d.shapes[1],
            Shape {
                kind: ShapeKind::Circle {
                    cx: 10.0,
                    cy: 20.0,
                    r: 4.0
                },
                color: Rgb(255, 0, 0),
                tooltip: Some(r#"{"clonotype":"3"}"#.to_string()),
            }
        );
        assert_eq!(d.shapes[2].color, Rgb(0, 0, 255));
        assert_eq!(
            d.shapes[3].kind,
            ShapeKind::Text {
                x: 1.0,
                y: 2.0,
                size: 10.0,
                text: "clonotype 3".to_string()
            }
        );
    }

    #[test]
    fn groups_pass_down_offset_color_and_tooltip() {
        let d = parse(
            r#"<svg viewBox="0 0 50 50">
                <g transform="translate(10, 5)" fill="green" data-tooltip='{"group":"a"}'>
                    <circle cx="1" cy="1" r="1"/>
                    <polygon points="0,0 2,0 2,2"/>
                </g>
            </svg>"#,
        )
        .unwrap();
        assert_eq!(
            d.shapes[0].kind,
            ShapeKind::Circle {
                cx: 11.0,
                cy: 6.0,
                r: 1.0
            }
        );
        assert_eq!(d.shapes[0].color, Rgb(0, 128, 0));
        assert_eq!(d.shapes[0].tooltip.as_deref(), Some(r#"{"group":"a"}"#));
        assert_eq!(
            d.shapes[1].kind,
            ShapeKind::Polyline(vec![(10.0, 5.0), (12.0, 5.0), (12.0, 7.0), (10.0, 5.0)])
        );
    }

    #[test]
    fn size_falls_back_to_content_bounds() {
        let d = parse(r#"<svg><rect x="5" y="5" width="10" height="20"/></svg>"#).unwrap();
        assert_eq!(
            d.view,
            ViewBox {
                x: 5.0,
                y: 5.0,
                width: 10.0,
                height: 20.0
            }
        );
        let empty = parse("<svg/>").unwrap();
        assert!(empty.shapes.is_empty());
        assert_eq!(empty.view.width, 1.0);
    }

    #[test]
    fn rejects_non_svg_markup() {
        assert!(matches!(parse("<html/>"), Err(DiagramError::NotSvg(_))));
        assert!(matches!(parse("<svg"), Err(DiagramError::Xml(_))));
        assert!(matches!(parse(""), Err(DiagramError::Xml(_))));
    }

    #[test]
    fn colors() {
        assert_eq!(color("#0a0B0c"), Some(Rgb(10, 11, 12)));
        assert_eq!(color("#abc"), Some(Rgb(0xaa, 0xbb, 0xcc)));
        assert_eq!(color("Purple"), Some(Rgb(128, 0, 128)));
        assert_eq!(color("none"), None);
        assert_eq!(color("url(#grad)"), None);
    }
}
