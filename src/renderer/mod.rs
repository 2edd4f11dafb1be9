pub mod drawable;

use std::{
    io::{self, stdout, Write},
    panic, thread,
};

use crace::{array::Array2D, Pos, Size};
use crossterm::{
    event::Event, execute, style::ContentStyle, terminal, QueueableCommand, SynchronizedUpdate,
};
use unicode_width::UnicodeWidthChar;

pub use drawable::Drawable;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Cell {
    pub character: char,
    pub style: ContentStyle,
}

impl Cell {
    pub fn styled(character: char, style: ContentStyle) -> Self {
        Cell { character, style }
    }

    pub fn empty() -> Self {
        Cell::styled(' ', ContentStyle::default())
    }
}

/// Screen sized character buffer, addressed by `Pos(row, col)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame(Array2D<Cell>);

impl Frame {
    pub fn new(size: Size) -> Self {
        Frame(Array2D::new(Cell::empty(), size))
    }

    pub fn size(&self) -> Size {
        self.0.size()
    }

    pub fn resize(&mut self, size: Size) {
        if self.size() != size {
            self.0 = Array2D::new(Cell::empty(), size);
        }
    }

    pub fn clear(&mut self) {
        self.0.fill(Cell::empty());
    }

    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        self.0.row(row)
    }

    /// Writes one character, returns how many columns it takes. Characters
    /// outside of the frame are dropped.
    pub fn put_char(&mut self, pos: Pos, character: char, style: ContentStyle) -> i32 {
        let width = character.width().unwrap_or(1).max(1) as i32;
        if let Some(cell) = self.0.get_mut(pos) {
            *cell = Cell::styled(character, style);
        }
        width
    }

    pub fn put_str(&mut self, pos: Pos, text: &str, style: ContentStyle) -> i32 {
        let mut col = 0;
        for character in text.chars() {
            col += self.put_char(Pos(pos.0, pos.1 + col), character, style);
        }
        col
    }

    pub fn get(&self, pos: Pos) -> Option<&Cell> {
        self.0.get(pos)
    }
}

pub struct Renderer {
    size: Size,
    shown: Frame,
    hidden: Frame,
    full_redraw: bool,
}

impl Renderer {
    pub fn new() -> io::Result<Self> {
        let size = term_size();
        let mut ren = Renderer {
            size,
            shown: Frame::new(size),
            hidden: Frame::new(size),
            full_redraw: true,
        };

        ren.turn_on()?;

        Ok(ren)
    }

    fn turn_on(&mut self) -> io::Result<()> {
        self.register_panic_hook();

        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            crossterm::cursor::Hide,
            terminal::EnterAlternateScreen,
        )?;

        self.on_resize(None);

        Ok(())
    }

    fn turn_off(&mut self) -> io::Result<()> {
        self.unregister_panic_hook();

        execute!(
            stdout(),
            crossterm::cursor::Show,
            terminal::LeaveAlternateScreen,
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn register_panic_hook(&self) {
        let prev = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let _ = execute!(
                stdout(),
                terminal::LeaveAlternateScreen,
                crossterm::cursor::Show,
            );
            let _ = terminal::disable_raw_mode();

            prev(info)
        }));
    }

    fn unregister_panic_hook(&self) {
        if !thread::panicking() {
            let _ = panic::take_hook();
        }
    }

    fn on_resize(&mut self, size: Option<Size>) {
        self.size = size.unwrap_or_else(term_size);
        self.shown.resize(self.size);
        self.hidden.resize(self.size);
        self.full_redraw = true;
    }

    pub fn on_event(&mut self, event: &Event) {
        if let Event::Resize(cols, rows) = event {
            self.on_resize(Some(Size(*rows as usize, *cols as usize)))
        }
    }

    pub fn frame(&mut self) -> &mut Frame {
        &mut self.hidden
    }

    pub fn frame_size(&self) -> Size {
        self.size
    }

    /// Writes the rows that changed since the last call to the terminal.
    pub fn show(&mut self) -> io::Result<()> {
        let mut tty = stdout();

        tty.sync_update(|tty| {
            use crossterm::style;

            let mut style = ContentStyle::default();
            tty.queue(style::ResetColor)?;

            for row in 0..self.size.0 {
                if self.hidden.row(row) == self.shown.row(row) && !self.full_redraw {
                    continue;
                }

                tty.queue(crossterm::cursor::MoveTo(0, row as u16))?;

                for cell in self.hidden.row(row).unwrap_or_default() {
                    if style != cell.style {
                        tty.queue(style::SetAttribute(style::Attribute::Reset))?;
                        tty.queue(style::SetForegroundColor(
                            cell.style.foreground_color.unwrap_or(style::Color::Reset),
                        ))?;
                        tty.queue(style::SetBackgroundColor(
                            cell.style.background_color.unwrap_or(style::Color::Reset),
                        ))?;
                        tty.queue(style::SetAttributes(cell.style.attributes))?;
                        style = cell.style;
                    }
                    tty.queue(style::Print(cell.character))?;
                }
            }

            tty.flush()?;
            self.full_redraw = false;

            io::Result::Ok(())
        })??;

        std::mem::swap(&mut self.shown, &mut self.hidden);
        self.hidden.clear();

        Ok(())
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        let _ = self.turn_off();
    }
}

pub fn term_size() -> Size {
    let (cols, rows) = terminal::size().unwrap_or((100, 100));
    Size(rows as usize, cols as usize)
}
