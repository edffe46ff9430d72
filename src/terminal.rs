use std::io::{self, Write};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};
use tracing::debug;

use image_slider::image_source::{Rgb, SourceImage, TileSet};
use image_slider::layout::GridLayout;
use image_slider::{Direction, Engine, Frame, Gesture, Pace, Scrambler};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const HELP: &str = "space scramble  s solve  c clear  r reset  arrows/drag move  q quit";

/// Raw mode, alternate screen and mouse capture for as long as it lives.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(
            io::stdout(),
            EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            Clear(ClearType::All)
        )?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            io::stdout(),
            ResetColor,
            cursor::Show,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

struct Shell<'a, W: Write> {
    engine: Arc<Engine>,
    scrambler: &'a Scrambler,
    image: &'a SourceImage,
    layout: GridLayout,
    tiles: TileSet,
    screen: (u16, u16),
    press: Option<(u16, u16)>,
    out: W,
}

pub fn run(
    engine: Arc<Engine>,
    scrambler: &Scrambler,
    image: &SourceImage,
    layout: GridLayout,
) -> io::Result<()> {
    let _guard = TerminalGuard::enter()?;
    let mut shell = Shell::new(engine, scrambler, image, layout, terminal::size()?, io::stdout());

    loop {
        let frame = shell.engine.frame();
        shell.draw(&frame)?;

        if !event::poll(FRAME_INTERVAL)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                if shell.on_key(key) == Flow::Quit {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => shell.on_mouse(mouse),
            Event::Resize(width, height) => shell.resize((width, height))?,
            _ => {}
        }
    }
}

impl<'a, W: Write> Shell<'a, W> {
    fn new(
        engine: Arc<Engine>,
        scrambler: &'a Scrambler,
        image: &'a SourceImage,
        layout: GridLayout,
        screen: (u16, u16),
        out: W,
    ) -> Self {
        let (cols, rows) = fit_tiles(screen, &layout);
        Self {
            engine,
            scrambler,
            image,
            layout,
            tiles: TileSet::sample(image, &layout, cols, rows),
            screen,
            press: None,
            out,
        }
    }

    fn resize(&mut self, screen: (u16, u16)) -> io::Result<()> {
        self.screen = screen;
        let (cols, rows) = fit_tiles(screen, &self.layout);
        self.tiles = TileSet::sample(self.image, &self.layout, cols, rows);
        queue!(self.out, ResetColor, Clear(ClearType::All))
    }

    fn on_key(&mut self, key: KeyEvent) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Flow::Quit,
                _ => Flow::Continue,
            };
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Flow::Quit,
            KeyCode::Char(' ') => {
                self.scrambler.toggle();
            }
            KeyCode::Char('s') => {
                let engine = Arc::clone(&self.engine);
                thread::spawn(move || {
                    engine.solve(Pace::Animated);
                });
            }
            KeyCode::Char('c') => self.engine.clear(),
            KeyCode::Char('r') => self.engine.reset(),
            KeyCode::Left => self.nudge(Direction::Left),
            KeyCode::Right => self.nudge(Direction::Right),
            KeyCode::Up => self.nudge(Direction::Up),
            KeyCode::Down => self.nudge(Direction::Down),
            _ => {}
        }
        Flow::Continue
    }

    fn nudge(&self, direction: Direction) {
        let engine = Arc::clone(&self.engine);
        thread::spawn(move || {
            if let Err(err) = engine.nudge(direction, Pace::Animated) {
                debug!(%err, %direction, "key move dropped");
            }
        });
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.press = Some((mouse.column, mouse.row));
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let Some(press) = self.press.take() else {
                    return;
                };
                let gesture = Gesture::new(
                    to_points(press),
                    to_points((mouse.column, mouse.row)),
                );
                let (cols, rows) = self.tiles.tile_size();
                let piece_size = (f64::from(cols), f64::from(rows) * CELL_ASPECT);
                let engine = Arc::clone(&self.engine);
                thread::spawn(move || {
                    if let Err(err) = engine.play_gesture(gesture, piece_size, Pace::Animated) {
                        debug!(%err, "gesture dropped");
                    }
                });
            }
            _ => {}
        }
    }

    fn draw(&mut self, frame: &Frame) -> io::Result<()> {
        let (cols, rows) = self.tiles.tile_size();
        let canvas_width = frame.width * cols as usize;
        let canvas_height = frame.height * rows as usize;
        let mut canvas: Vec<Option<Rgb>> = vec![None; canvas_width * canvas_height];

        for piece in &frame.pieces {
            let Some(tile) = self.tiles.get(piece.id) else {
                continue;
            };
            let left = ((piece.x as f32 + piece.offset.0) * cols as f32).round() as i64;
            let top = ((piece.y as f32 + piece.offset.1) * rows as f32).round() as i64;
            for dy in 0..rows {
                for dx in 0..cols {
                    let x = left + i64::from(dx);
                    let y = top + i64::from(dy);
                    if x < 0 || y < 0 || x >= canvas_width as i64 || y >= canvas_height as i64 {
                        continue;
                    }
                    canvas[y as usize * canvas_width + x as usize] = tile.pixel(dx, dy);
                }
            }
        }

        let (screen_width, screen_height) = (self.screen.0 as usize, self.screen.1 as usize);
        let visible_rows = canvas_height.min(screen_height.saturating_sub(1));
        let visible_cols = canvas_width.min(screen_width);
        for y in 0..visible_rows {
            queue!(self.out, cursor::MoveTo(0, y as u16))?;
            let mut current = None;
            for x in 0..visible_cols {
                let color = canvas[y * canvas_width + x];
                if color != current || x == 0 {
                    let [r, g, b] = color.unwrap_or([0, 0, 0]);
                    queue!(self.out, SetBackgroundColor(Color::Rgb { r, g, b }))?;
                    current = color;
                }
                queue!(self.out, Print(' '))?;
            }
        }

        let mut status = format!(
            "{} moves | scramble {} | {}{}",
            frame.history_len,
            if frame.scrambling { "on" } else { "off" },
            if frame.solved { "solved | " } else { "" },
            HELP
        );
        status.truncate(screen_width);
        queue!(
            self.out,
            ResetColor,
            cursor::MoveTo(0, visible_rows as u16),
            Clear(ClearType::CurrentLine),
            Print(status)
        )?;
        self.out.flush()
    }
}

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f64 = 2.0;

/// Cell centre in square units, so drag angles match what the eye sees.
fn to_points((column, row): (u16, u16)) -> (f64, f64) {
    (f64::from(column) + 0.5, (f64::from(row) + 0.5) * CELL_ASPECT)
}

/// Largest whole-cell tile size that fits the grid on screen (one line is
/// kept for the status bar) while keeping the piece aspect ratio close.
fn fit_tiles((width, height): (u16, u16), layout: &GridLayout) -> (u32, u32) {
    let max_cols = (u32::from(width) / layout.columns as u32).max(1);
    let max_rows = (u32::from(height.saturating_sub(1)) / layout.rows as u32).max(1);
    let aspect = layout.piece_width / layout.piece_height;

    let cols_for_rows = (f64::from(max_rows) * CELL_ASPECT * aspect).round() as u32;
    if cols_for_rows >= 1 && cols_for_rows <= max_cols {
        (cols_for_rows, max_rows)
    } else {
        let rows = (f64::from(max_cols) / (CELL_ASPECT * aspect)).round() as u32;
        (max_cols, rows.clamp(1, max_rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;
    use image_slider::{EngineConfig, Puzzle};

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn resize_reports_write_failures() {
        let image = SourceImage::from_image(DynamicImage::new_rgb8(100, 100)).unwrap();
        let layout = GridLayout::for_image(100, 100, 50).unwrap();
        let config = EngineConfig {
            scramble_on_start: false,
            ..EngineConfig::immediate()
        };
        let engine = Arc::new(Engine::new(Puzzle::new(2, 2).unwrap(), config));
        let scrambler = Scrambler::spawn(Arc::clone(&engine), Some(0));

        let mut shell = Shell::new(engine, &scrambler, &image, layout, (40, 20), BrokenPipe);
        let err = shell.resize((80, 24)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(shell.screen, (80, 24));
    }

    #[test]
    fn square_pieces_are_twice_as_wide_in_cells() {
        let layout = GridLayout::for_image(200, 200, 50).unwrap();
        // 4x4 grid on a roomy screen: rows limit, columns follow.
        assert_eq!(fit_tiles((200, 41), &layout), (20, 10));
        // Narrow screen: columns limit, rows follow.
        assert_eq!(fit_tiles((40, 81), &layout), (10, 5));
    }

    #[test]
    fn tiny_screens_still_get_one_cell() {
        let layout = GridLayout::for_image(1000, 1000, 50).unwrap();
        assert_eq!(fit_tiles((10, 5), &layout), (1, 1));
    }

    #[test]
    fn drag_points_are_square() {
        let gesture = Gesture::new(to_points((10, 5)), to_points((12, 4)));
        // Two columns right and one row up is a 45 degree drag once rows
        // are stretched; it lands on the Up/Right boundary.
        assert_eq!(gesture.direction(), Direction::Right);
    }
}
