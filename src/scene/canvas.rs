//! Styling and the drawing surface components render onto.

use crate::geometry::{Position, Primitive};

pub const DEFAULT_BORDER_THICKNESS: u32 = 1;

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Colour {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Colour {
    pub const BLACK: Colour = Colour::rgb(0, 0, 0);
    pub const WHITE: Colour = Colour::rgb(255, 255, 255);
    pub const TRANSPARENT: Colour = Colour::rgba(0, 0, 0, 0);

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::rgba(red, green, blue, u8::MAX)
    }

    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Style {
    pub border_colour: Colour,
    pub fill_colour: Colour,
    pub border_thickness: u32,
}

impl Style {
    pub const fn new(border_colour: Colour, fill_colour: Colour, border_thickness: u32) -> Self {
        Self {
            border_colour,
            fill_colour,
            border_thickness,
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::new(Colour::BLACK, Colour::WHITE, DEFAULT_BORDER_THICKNESS)
    }
}

/// Drawing surface. Components set the style before painting their content.
pub trait Canvas {
    fn set_fill_colour(&mut self, colour: Colour);

    fn set_stroke_colour(&mut self, colour: Colour);

    fn set_line_width(&mut self, width: u32);

    fn draw_primitive(&mut self, primitive: &Primitive);

    fn draw_text(&mut self, text: &str, position: Position);
}
