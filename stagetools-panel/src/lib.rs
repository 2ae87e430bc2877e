/// Terminal panel for measuring, aligning, and referencing stage prims
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute,
    terminal::{self},
};
use std::io::{self, stdout};
use std::time::Duration;

use stagetools_core::{
    align, apply_reference_by_prefix, drop_to_ground, AlignMode, Axis, MeasureSession, PrimPath,
    Stage, UnionResult,
};
use tracing::debug;

pub mod panel;

pub use panel::{PanelRenderer, PanelView, PrimRow};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Main application struct for the interactive stage panel.
pub struct PanelApp {
    stage: Stage,
    session: MeasureSession,
    paths: Vec<PrimPath>,
    cursor: usize,
    align_axis: Axis,
    result: UnionResult,
    dimensions: [String; 3],
    status: String,
    renderer: PanelRenderer,
    running: bool,
}

impl PanelApp {
    pub fn new(stage: Stage) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let paths: Vec<PrimPath> = stage.paths().cloned().collect();

        let mut app = Self {
            stage,
            session: MeasureSession::new(),
            paths,
            cursor: 0,
            align_axis: Axis::X,
            result: UnionResult::none(),
            dimensions: Default::default(),
            status: String::new(),
            renderer: PanelRenderer::new(width as usize, height as usize),
            running: true,
        };
        app.remeasure();
        Ok(app)
    }

    /// Apply a reference batch before entering the interactive loop.
    pub fn apply_reference(&mut self, target_prefix: &str, asset_url: &str) {
        match apply_reference_by_prefix(Some(&mut self.stage), target_prefix, asset_url) {
            Ok(count) => self.status = format!("referenced {count} prims"),
            Err(e) => self.status = e.to_string(),
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        self.render()?;

        while self.running {
            if event::poll(POLL_INTERVAL)? {
                match event::read()? {
                    Event::Key(KeyEvent { code, .. }) => {
                        self.handle_key(code);
                        self.render()?;
                    }
                    Event::Resize(width, height) => {
                        self.renderer.resize(width as usize, height as usize);
                        self.render()?;
                    }
                    _ => {}
                }
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < self.paths.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Char(' ') => {
                self.toggle_selection();
                self.remeasure();
            }
            KeyCode::Char('u') => {
                self.session.cycle_display_unit();
                self.reformat();
            }
            KeyCode::Char('r') => {
                self.remeasure();
            }
            KeyCode::Char('c') => {
                self.stage.clear_selection();
                self.remeasure();
            }
            KeyCode::Char('a') => {
                self.align_axis = match self.align_axis {
                    Axis::X => Axis::Y,
                    Axis::Y => Axis::Z,
                    Axis::Z => Axis::X,
                };
            }
            KeyCode::Char('n') => self.run_align(AlignMode::Min),
            KeyCode::Char('m') => self.run_align(AlignMode::Center),
            KeyCode::Char(',') => self.run_align(AlignMode::Max),
            KeyCode::Char('g') => {
                match drop_to_ground(Some(&mut self.stage)) {
                    Ok(moved) => self.status = format!("dropped {moved} prims to ground"),
                    Err(e) => self.status = e.to_string(),
                }
                self.remeasure();
            }
            _ => {}
        }
    }

    fn run_align(&mut self, mode: AlignMode) {
        match align(Some(&mut self.stage), self.align_axis, mode) {
            Ok(moved) => {
                self.status = format!(
                    "aligned {} prims ({} {})",
                    moved,
                    mode.label(),
                    self.align_axis.label()
                );
            }
            Err(e) => self.status = e.to_string(),
        }
        self.remeasure();
    }

    fn toggle_selection(&mut self) {
        let Some(path) = self.paths.get(self.cursor) else {
            return;
        };
        let mut selection = self.stage.selected_paths().to_vec();
        match selection.iter().position(|p| p == path) {
            Some(idx) => {
                selection.remove(idx);
            }
            None => selection.push(path.clone()),
        }
        self.stage.select(selection);
        debug!(selected = self.stage.selected_paths().len(), "selection changed");
    }

    /// Recompute the union bounds for the current selection and reformat.
    fn remeasure(&mut self) {
        let selected = self.stage.selected_paths().to_vec();
        self.result = self.session.measure(Some(&self.stage), &selected);
        self.reformat();
    }

    fn reformat(&mut self) {
        match self
            .session
            .format_size(&self.result, self.stage.meters_per_unit())
        {
            Ok(lines) => self.dimensions = lines,
            Err(e) => {
                // refuse to render a measurement under a bad unit setup
                let blank = stagetools_core::measure::NO_MEASUREMENT.to_string();
                self.dimensions = [blank.clone(), blank.clone(), blank];
                self.status = e.to_string();
            }
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let rows: Vec<PrimRow> = self
            .paths
            .iter()
            .map(|p| PrimRow {
                path: p.as_str().to_string(),
                selected: self.stage.selected_paths().contains(p),
            })
            .collect();

        let stage_unit =
            stagetools_core::units::stage_unit_label(self.stage.meters_per_unit());

        let view = PanelView {
            prims: &rows,
            cursor: self.cursor,
            dimensions: &self.dimensions,
            measured_count: self.result.count,
            unit_name: self.session.display_unit().name,
            align_axis: self.align_axis.label(),
            stage_unit: &stage_unit,
            up_axis: self.stage.up_axis().label(),
            status: &self.status,
        };

        self.renderer.draw(&mut stdout(), &view)
    }
}
