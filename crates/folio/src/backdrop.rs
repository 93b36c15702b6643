//! The `backdrop` subcommand: effects on a full-screen braille canvas.

use std::io::stdout;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use folio_background::{BackgroundState, TerminalSurface};
use folio_config::BackgroundConfig;
use ratatui::{
    DefaultTerminal, Frame,
    layout::Rect,
    style::Stylize,
    text::Line,
};

/// Time left in a frame that began at `started`, or `None` once it is over.
fn frame_time_left(started: Instant, interval: Duration, now: Instant) -> Option<Duration> {
    interval
        .checked_sub(now.saturating_duration_since(started))
        .filter(|left| !left.is_zero())
}

/// Runs the backdrop until the user quits.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    state: BackgroundState,
    surface: TerminalSurface,
    frame_interval: Duration,
    started: Instant,
}

impl App {
    pub fn new(config: &BackgroundConfig) -> Self {
        Self {
            running: false,
            state: BackgroundState::new(config.effect),
            surface: TerminalSurface::default(),
            frame_interval: Duration::from_millis(config.frame_interval_ms.max(1)),
            started: Instant::now(),
        }
    }

    /// Run the main loop with mouse capture enabled.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        execute!(stdout(), EnableMouseCapture)?;
        self.running = true;
        let result = self.event_loop(&mut terminal);
        self.state.teardown();
        execute!(stdout(), DisableMouseCapture)?;
        result
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        while self.running {
            let frame_started = Instant::now();
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events(frame_started)?;
        }
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.surface.set_area(area);
        let now_ms = self.started.elapsed().as_millis() as u64;
        self.state.render(&mut self.surface, now_ms);
        self.surface.render(frame);

        if area.height > 0 {
            let help = Line::from(vec![
                "q".bold(),
                " quit  ".dark_gray(),
                "e".bold(),
                format!(" effect: {}", self.state.selection().name()).dark_gray(),
            ])
            .centered();
            let bottom = Rect::new(area.x, area.y + area.height - 1, area.width, 1);
            frame.render_widget(help, bottom);
        }
    }

    /// Handle input until the current frame's interval has elapsed.
    ///
    /// Events never cut a frame short, so a burst of mouse moves does not
    /// speed the animation up.
    fn handle_crossterm_events(&mut self, frame_started: Instant) -> color_eyre::Result<()> {
        while self.running {
            let Some(timeout) = frame_time_left(frame_started, self.frame_interval, Instant::now())
            else {
                break;
            };
            if !event::poll(timeout)? {
                break;
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                // the next frame picks up the new size and rebuilds the pools
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
        Ok(())
    }

    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('e')) => self.cycle_effect(),
            _ => {}
        }
    }

    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        if let MouseEventKind::Moved | MouseEventKind::Drag(_) = mouse.kind {
            let pointer = self.surface.cell_center(mouse.column, mouse.row);
            self.state.pointer_moved(pointer);
        }
    }

    fn cycle_effect(&mut self) {
        let next = self.state.selection().next();
        self.state.set_selection(next);
    }

    fn quit(&mut self) {
        self.running = false;
    }
}
