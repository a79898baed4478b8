use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;
const BYTE_PIXELS: usize = 8;

/// The logical monochrome screen. Only CLS and DRW change it; whatever does
/// the presenting reads it through `get` or `rows`.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    pixels: [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
    dirty: bool,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        FrameBuffer {
            pixels: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            dirty: false,
        }
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer::default()
    }

    /// pixels off the grid read as unset
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < DISPLAY_WIDTH && y < DISPLAY_HEIGHT && self.pixels[y][x]
    }

    pub fn set(&mut self, x: usize, y: usize, on: bool) {
        if x < DISPLAY_WIDTH && y < DISPLAY_HEIGHT && self.pixels[y][x] != on {
            self.pixels[y][x] = on;
            self.dirty = true;
        }
    }

    pub fn clear(&mut self) {
        for row in self.pixels.iter_mut() {
            row.fill(false);
        }
        self.dirty = true;
    }

    /// XOR a sprite onto the screen with its top-left corner at (x, y), taken
    /// modulo the screen size. rows and columns that would fall off the
    /// right or bottom edge are clipped. returns true if any lit pixel was
    /// turned off
    pub fn draw_sprite(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let x0 = x as usize % DISPLAY_WIDTH;
        let y0 = y as usize % DISPLAY_HEIGHT;
        let mut collision = false;

        for (row, bits) in sprite.iter().enumerate() {
            let py = y0 + row;
            if py >= DISPLAY_HEIGHT {
                break;
            }
            for col in 0..BYTE_PIXELS {
                let px = x0 + col;
                if px >= DISPLAY_WIDTH {
                    break;
                }
                if (bits >> (BYTE_PIXELS - 1 - col)) & 1 == 1 {
                    let pixel = &mut self.pixels[py][px];
                    collision |= *pixel;
                    *pixel = !*pixel;
                    self.dirty = true;
                }
            }
        }
        collision
    }

    /// full snapshot, row-major
    pub fn rows(&self) -> &[[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT] {
        &self.pixels
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// report whether anything changed since the last call, and reset
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// coordinates of every pixel in the given state, y pointing up as the
    /// tui canvas expects
    fn points(&self, on: bool) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.pixels.iter().enumerate().flat_map(move |(y, row)| {
            row.iter()
                .enumerate()
                .filter(move |(_, px)| **px == on)
                .map(move |(x, _)| (x as f64, -1.0 * y as f64))
        })
    }
}

/// Display is used by the environment to draw the frame buffer on the
/// screen. It should abstract the implementation details, so a variety of
/// kinds of screen would work.
pub trait Display {
    fn draw(&mut self, frame: &FrameBuffer) -> Result<(), io::Error>;
}

// store useful metadata about the terminal
struct Resolution(usize, usize);

impl Resolution {
    fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.0 - 1) as f64]
    }

    fn y_bounds(&self) -> [f64; 2] {
        [-1.0 * (self.1 - 1) as f64, 0.0]
    }
}

/// monochrome display in a terminal, rendered using TUI and crossterm
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    resolution: Resolution,
}

impl MonoTermDisplay {
    pub fn new() -> Result<MonoTermDisplay, io::Error> {
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        Ok(MonoTermDisplay {
            terminal,
            resolution: Resolution(DISPLAY_WIDTH, DISPLAY_HEIGHT),
        })
    }
}

impl Display for MonoTermDisplay {
    fn draw(&mut self, frame: &FrameBuffer) -> Result<(), io::Error> {
        let off: Vec<_> = frame.points(false).collect();
        let on: Vec<_> = frame.points(true).collect();
        let resolution = &self.resolution;

        // for now this assumes a 1:1 ratio between terminal, chip8 and the
        // internal TUI canvas
        self.terminal.draw(|f| {
            let size = Rect::new(0, 0, 2 + resolution.0 as u16, 2 + resolution.1 as u16);

            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title("CHIP-8")
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(resolution.x_bounds())
                .y_bounds(resolution.y_bounds())
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &off,
                        color: Color::Black,
                    });
                    ctx.draw(&Points {
                        coords: &on,
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }
}

/// useful for testing non-display routines; counts frames it was given
#[derive(Default)]
pub struct DummyDisplay {
    pub frames: usize,
}

impl DummyDisplay {
    pub fn new() -> DummyDisplay {
        DummyDisplay::default()
    }
}

impl Display for DummyDisplay {
    fn draw(&mut self, _frame: &FrameBuffer) -> Result<(), io::Error> {
        self.frames += 1;
        Ok(())
    }
}
