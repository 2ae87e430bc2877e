/// Text dashboard renderer for the stage tools panel
use crossterm::{
    cursor::MoveTo,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
    QueueableCommand,
};
use std::io::Write;

/// One row of the prim list.
pub struct PrimRow {
    pub path: String,
    pub selected: bool,
}

/// Everything the renderer needs for one frame.
pub struct PanelView<'a> {
    pub prims: &'a [PrimRow],
    pub cursor: usize,
    pub dimensions: &'a [String; 3],
    pub measured_count: usize,
    pub unit_name: &'a str,
    pub align_axis: &'a str,
    pub stage_unit: &'a str,
    pub up_axis: &'a str,
    pub status: &'a str,
}

const AXIS_CAPTIONS: [&str; 3] = ["X length", "Y width ", "Z height"];

/// Draws the panel as fixed text rows in the alternate screen.
pub struct PanelRenderer {
    width: usize,
    height: usize,
}

impl PanelRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    fn clip<'a>(&self, text: &'a str) -> &'a str {
        let limit = self.width.saturating_sub(1);
        match text.char_indices().nth(limit) {
            Some((idx, _)) => &text[..idx],
            None => text,
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W, view: &PanelView) -> std::io::Result<()> {
        writer.queue(Clear(ClearType::All))?;
        let mut row: u16 = 0;

        // Header
        writer.queue(MoveTo(0, row))?;
        writer.queue(SetForegroundColor(Color::Yellow))?;
        writer.queue(Print(self.clip(&format!(
            "Stage Tools Panel | unit: {} | align axis: {}",
            view.unit_name, view.align_axis
        ))))?;
        writer.queue(ResetColor)?;
        row += 2;

        // Prim list with selection marks
        writer.queue(MoveTo(0, row))?;
        writer.queue(SetForegroundColor(Color::Cyan))?;
        writer.queue(Print("Prims"))?;
        writer.queue(ResetColor)?;
        row += 1;

        let list_rows = self.height.saturating_sub(12).max(3);
        let first = view.cursor.saturating_sub(list_rows.saturating_sub(1));
        for (idx, prim) in view.prims.iter().enumerate().skip(first).take(list_rows) {
            let pointer = if idx == view.cursor { '>' } else { ' ' };
            let mark = if prim.selected { 'x' } else { ' ' };
            writer.queue(MoveTo(0, row))?;
            if prim.selected {
                writer.queue(SetForegroundColor(Color::Green))?;
            }
            writer.queue(Print(self.clip(&format!(
                " {} [{}] {}",
                pointer, mark, prim.path
            ))))?;
            if prim.selected {
                writer.queue(ResetColor)?;
            }
            row += 1;
        }
        row += 1;

        // Dimensions
        writer.queue(MoveTo(0, row))?;
        writer.queue(SetForegroundColor(Color::Cyan))?;
        if view.measured_count > 0 {
            writer.queue(Print(format!("Dimensions ({} prims)", view.measured_count)))?;
        } else {
            writer.queue(Print("Dimensions"))?;
        }
        writer.queue(ResetColor)?;
        row += 1;

        for (caption, value) in AXIS_CAPTIONS.iter().zip(view.dimensions.iter()) {
            writer.queue(MoveTo(0, row))?;
            writer.queue(Print(self.clip(&format!("  {}: {}", caption, value))))?;
            row += 1;
        }
        row += 1;

        // Footer
        writer.queue(MoveTo(0, row))?;
        writer.queue(Print(self.clip(&format!(
            "Stage unit: {}   Up-Axis: {}",
            view.stage_unit, view.up_axis
        ))))?;
        row += 1;

        writer.queue(MoveTo(0, row))?;
        writer.queue(SetForegroundColor(Color::DarkGrey))?;
        writer.queue(Print(self.clip(
            "keys: up/down move  space select  u unit  r refresh  c clear  \
             a axis  n/m/, align min/center/max  g ground  q quit",
        )))?;
        writer.queue(ResetColor)?;
        row += 1;

        if !view.status.is_empty() {
            writer.queue(MoveTo(0, row))?;
            writer.queue(SetForegroundColor(Color::Magenta))?;
            writer.queue(Print(self.clip(view.status)))?;
            writer.queue(ResetColor)?;
        }

        writer.flush()?;
        Ok(())
    }
}
