use crace::Pos;
use crossterm::style::ContentStyle;

use super::Frame;

pub trait Drawable {
    fn draw(&self, pos: Pos, frame: &mut Frame) {
        self.draw_with_style(pos, frame, ContentStyle::default());
    }

    fn draw_with_style(&self, pos: Pos, frame: &mut Frame, style: ContentStyle);
}

impl Drawable for char {
    fn draw_with_style(&self, pos: Pos, frame: &mut Frame, style: ContentStyle) {
        frame.put_char(pos, *self, style);
    }
}

impl Drawable for &'_ str {
    fn draw_with_style(&self, pos: Pos, frame: &mut Frame, style: ContentStyle) {
        frame.put_str(pos, self, style);
    }
}

impl Drawable for String {
    fn draw_with_style(&self, pos: Pos, frame: &mut Frame, style: ContentStyle) {
        frame.put_str(pos, self, style);
    }
}
