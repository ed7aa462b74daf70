//! ASCII rendering of a scene.

use std::f64::consts::TAU;

use textplots::{Chart, Plot, Shape};

use collision2d::{
    geometry::{Ellipse, Position, Primitive},
    scene::{Canvas, Colour},
};

const ELLIPSE_SEGMENTS: usize = 48;

/// Collects outlines and renders them into a text chart. The y-axis is flipped so the chart
/// shows the scene the way it is laid out on screen.
pub struct TextPlotCanvas {
    size: Position,
    stroke: Colour,
    lines: Vec<Vec<(f32, f32)>>,
    points: Vec<(f32, f32)>,
    labels: Vec<String>,
}

impl TextPlotCanvas {
    pub fn new(size: Position) -> Self {
        Self {
            size,
            stroke: Colour::BLACK,
            lines: vec![],
            points: vec![],
            labels: vec![],
        }
    }

    pub fn render(&self) -> String {
        let mut chart = Chart::new_with_y_range(
            200,
            100,
            0.0,
            self.size.x() as f32,
            -self.size.y() as f32,
            0.0,
        );
        let chart = chart.lineplot(&Shape::Lines(&[]));
        let mut shapes = self
            .lines
            .iter()
            .map(|l| Shape::Lines(l))
            .collect::<Vec<_>>();
        shapes.push(Shape::Points(&self.points));
        let chart = shapes.iter().fold(chart, |c, s| c.lineplot(s));
        chart.figures();
        let mut rendered = chart.to_string();
        for label in &self.labels {
            rendered.push('\n');
            rendered.push_str(label);
        }
        rendered
    }

    fn plotted(position: Position) -> (f32, f32) {
        let (x, y): (f32, f32) = position.into();
        (x, -y)
    }

    fn outline(ellipse: &Ellipse) -> Vec<(f32, f32)> {
        let (rx, ry) = (ellipse.radii().x(), ellipse.radii().y());
        (0..=ELLIPSE_SEGMENTS)
            .map(|i| {
                let t = TAU * i as f64 / ELLIPSE_SEGMENTS as f64;
                let local = Position::new(rx * t.cos(), ry * t.sin());
                Self::plotted(ellipse.position() + local.rotate_vector(ellipse.rotation()))
            })
            .collect()
    }
}

impl Canvas for TextPlotCanvas {
    fn set_fill_colour(&mut self, _colour: Colour) {}

    fn set_stroke_colour(&mut self, colour: Colour) {
        self.stroke = colour;
    }

    fn set_line_width(&mut self, _width: u32) {}

    fn draw_primitive(&mut self, primitive: &Primitive) {
        if self.stroke.alpha == 0 {
            return;
        }
        match primitive {
            Primitive::Point(point) => self.points.push(Self::plotted(point.position())),
            Primitive::PolyLine(polyline) => self
                .lines
                .push(polyline.vertices().iter().copied().map(Self::plotted).collect()),
            Primitive::Polygon(polygon) => {
                let mut outline = polygon
                    .vertices()
                    .iter()
                    .copied()
                    .map(Self::plotted)
                    .collect::<Vec<_>>();
                if let Some(&first) = outline.first() {
                    outline.push(first);
                }
                self.lines.push(outline);
            }
            Primitive::Ellipse(ellipse) => self.lines.push(Self::outline(ellipse)),
        }
    }

    fn draw_text(&mut self, text: &str, position: Position) {
        self.labels
            .push(format!("{text} at ({:.1}, {:.1})", position.x(), position.y()));
    }
}
