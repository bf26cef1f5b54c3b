use std::io::{self, Write};
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use thiserror::Error;

use crate::dashboard::Dashboard;
use crate::error::GridError;
use crate::geometry::Point;
use crate::model::CardId;
use crate::render::{TextRenderer, fit_to_width, status_line};

pub type DriverResult<T> = std::result::Result<T, CliDriverError>;

#[derive(Debug, Error)]
pub enum CliDriverError {
    #[error("grid error: {0}")]
    Grid(#[from] GridError),
    #[error("terminal error: {0}")]
    Terminal(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Pointer phase decoded from a terminal mouse event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Press(Point),
    Move(Point),
    Release(Point),
}

/// What a left press lands on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PressTarget {
    /// The resize handle on the right edge of a half card.
    ResizeHandle(CardId),
    Card(CardId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverFlow {
    Continue,
    Exit,
}

/// Map a terminal mouse event to grid coordinates.
///
/// Cells map to their centres. `origin_row` is the terminal row of the first
/// painted line and `margin` the number of lines above the first card row.
pub fn pointer_input(event: &MouseEvent, origin_row: u16, margin: f64) -> Option<PointerInput> {
    let point = Point::new(
        f64::from(event.column) + 0.5,
        f64::from(event.row) - f64::from(origin_row) - margin + 0.5,
    );
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(PointerInput::Press(point)),
        MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
            Some(PointerInput::Move(point))
        }
        MouseEventKind::Up(MouseButton::Left) => Some(PointerInput::Release(point)),
        _ => None,
    }
}

/// Hit-test a press. Resize handles win over card bodies.
pub fn press_target(dashboard: &Dashboard, at: Point) -> Option<PressTarget> {
    let regions = dashboard.card_regions();
    if let Some(region) = regions
        .iter()
        .find(|region| region.resize_handle.is_some_and(|handle| handle.contains(at)))
    {
        return Some(PressTarget::ResizeHandle(region.id.clone()));
    }
    regions
        .iter()
        .find(|region| region.rect.contains(at))
        .map(|region| PressTarget::Card(region.id.clone()))
}

/// Terminal host for a [`Dashboard`] built on the terminal grid preset.
///
/// Left press on a card starts a move, on its right edge a resize. Digits
/// `1`-`9` pick up the matching palette template; the next click drops it.
pub struct CliDriver {
    dashboard: Dashboard,
    renderer: TextRenderer,
    last_pointer: Point,
}

impl CliDriver {
    pub fn new(dashboard: Dashboard) -> Self {
        let mut renderer = TextRenderer::with_default();
        // Row 0 holds the status line.
        renderer.settings_mut().origin_row = 1;
        Self {
            dashboard,
            renderer,
            last_pointer: Point::default(),
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// Run until the user quits and hand the dashboard back.
    pub fn run(mut self) -> DriverResult<Dashboard> {
        let mut stdout = io::stdout();
        self.enter(&mut stdout)?;
        let result = self.run_inner(&mut stdout);
        self.exit(&mut stdout);
        result.map(|()| self.dashboard)
    }

    fn run_inner(&mut self, stdout: &mut impl Write) -> DriverResult<()> {
        let (width, _) = terminal::size()?;
        self.dashboard.set_grid_width(f64::from(width));
        self.draw(stdout)?;

        loop {
            if !event::poll(Duration::from_millis(250))? {
                continue;
            }
            let event = event::read()?;
            if self.handle_event(&event) == DriverFlow::Exit {
                return Ok(());
            }
            self.draw(stdout)?;
        }
    }

    /// Apply one terminal event to the dashboard.
    pub fn handle_event(&mut self, event: &Event) -> DriverFlow {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => {
                self.handle_mouse(mouse);
                DriverFlow::Continue
            }
            Event::Resize(width, _) => {
                self.dashboard.set_grid_width(f64::from(*width));
                DriverFlow::Continue
            }
            _ => DriverFlow::Continue,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> DriverFlow {
        if key.kind != KeyEventKind::Press {
            return DriverFlow::Continue;
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => DriverFlow::Exit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => DriverFlow::Exit,
            KeyCode::Char(digit @ '1'..='9') => {
                let slot = digit as usize - '1' as usize;
                let template = self
                    .dashboard
                    .palette()
                    .iter()
                    .nth(slot)
                    .map(|template| template.id.clone());
                if let Some(template) = template {
                    self.dashboard
                        .begin_template_drag(&template, self.last_pointer);
                }
                DriverFlow::Continue
            }
            _ => DriverFlow::Continue,
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) {
        let margin = self.dashboard.geometry().gap_px.max(0.0).ceil();
        let origin = self.renderer.settings().origin_row;
        let Some(input) = pointer_input(mouse, origin, margin) else {
            return;
        };

        match input {
            PointerInput::Press(at) => {
                self.last_pointer = at;
                if self.dashboard.drag().is_active() {
                    // A palette pick is waiting for its drop click.
                    self.dashboard.pointer_up(at);
                    return;
                }
                match press_target(&self.dashboard, at) {
                    Some(PressTarget::ResizeHandle(id)) => {
                        self.dashboard.begin_resize(&id, at.x);
                    }
                    Some(PressTarget::Card(id)) => {
                        self.dashboard.begin_card_drag(&id, at);
                    }
                    None => {}
                }
            }
            PointerInput::Move(at) => {
                self.last_pointer = at;
                if self.dashboard.active_session().is_some() {
                    self.dashboard.pointer_move(at);
                }
            }
            PointerInput::Release(at) => {
                self.last_pointer = at;
                if self.dashboard.active_session().is_some() {
                    self.dashboard.pointer_up(at);
                }
            }
        }
    }

    fn draw(&mut self, stdout: &mut impl Write) -> DriverResult<()> {
        if self.dashboard.take_dirty() {
            execute!(stdout, Clear(ClearType::All))?;
        }
        let (width, _) = terminal::size().unwrap_or((80, 24));
        let status = fit_to_width(&status_line(&self.dashboard), usize::from(width));
        execute!(stdout, MoveTo(0, 0), Clear(ClearType::CurrentLine))?;
        write!(stdout, "{status}")?;
        self.renderer.render(stdout, &self.dashboard)?;
        Ok(())
    }

    fn enter(&self, stdout: &mut impl Write) -> DriverResult<()> {
        terminal::enable_raw_mode().map_err(|err| CliDriverError::Terminal(err.to_string()))?;
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            Hide,
            Clear(ClearType::All)
        )?;
        Ok(())
    }

    fn exit(&self, stdout: &mut impl Write) {
        execute!(stdout, Show, DisableMouseCapture, LeaveAlternateScreen).ok();
        terminal::disable_raw_mode().ok();
    }
}
