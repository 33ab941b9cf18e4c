use crate::diagram::{Diagram, Rgb, ShapeKind};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine, Rectangle},
        Block,
    },
    Frame,
};

fn terminal_color(rgb: Rgb) -> Color {
    // Black strokes vanish on dark terminals.
    if rgb == Rgb::BLACK {
        Color::Gray
    } else {
        Color::Rgb(rgb.0, rgb.1, rgb.2)
    }
}

/// Draw `diagram` inside `block`, highlighting the hovered shape.
pub fn draw_diagram(area: Rect, f: &mut Frame, block: Block, diagram: &Diagram, hover: Option<usize>) {
    let view = diagram.view;
    // SVG y grows downwards, canvas y grows upwards.
    let flip = |y: f64| 2.0 * view.y + view.height - y;

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([view.x, view.x + view.width])
        .y_bounds([view.y, view.y + view.height])
        .paint(|ctx| {
            for (idx, shape) in diagram.shapes.iter().enumerate() {
                let color = if hover == Some(idx) {
                    Color::Yellow
                } else {
                    terminal_color(shape.color)
                };
                match &shape.kind {
                    ShapeKind::Circle { cx, cy, r } => ctx.draw(&Circle {
                        x: *cx,
                        y: flip(*cy),
                        radius: *r,
                        color,
                    }),
                    ShapeKind::Rect {
                        x,
                        y,
                        width,
                        height,
                    } => ctx.draw(&Rectangle {
                        x: *x,
                        y: flip(y + height),
                        width: *width,
                        height: *height,
                        color,
                    }),
                    ShapeKind::Line { x1, y1, x2, y2 } => {
                        ctx.draw(&CanvasLine::new(*x1, flip(*y1), *x2, flip(*y2), color))
                    }
                    ShapeKind::Polyline(points) => {
                        for w in points.windows(2) {
                            ctx.draw(&CanvasLine::new(
                                w[0].0,
                                flip(w[0].1),
                                w[1].0,
                                flip(w[1].1),
                                color,
                            ));
                        }
                    }
                    ShapeKind::Text { x, y, text, .. } => {
                        ctx.print(
                            *x,
                            flip(*y),
                            ratatui::text::Line::styled(text.clone(), Style::default().fg(color)),
                        );
                    }
                }
            }
        });
    f.render_widget(canvas, area);
}
