/// Example: Load a stage file and measure it interactively
///
/// Usage: cargo run --example measure_stage -- path/to/file.stage

use std::env;
use std::fs;
use std::io;

use stagetools_core::parse_stage;
use stagetools_panel::PanelApp;

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <stage-file>", args[0]);
        return Ok(());
    }

    let stage_path = &args[1];
    println!("Loading stage file: {}", stage_path);

    let text = fs::read_to_string(stage_path).map_err(|e| {
        io::Error::new(io::ErrorKind::NotFound, format!("Failed to read stage file: {}", e))
    })?;

    let stage = parse_stage(&text).map_err(|e| {
        io::Error::new(io::ErrorKind::InvalidData, format!("Failed to parse stage: {}", e))
    })?;

    println!("Loaded {} prims", stage.prim_count());

    let mut app = PanelApp::new(stage)?;
    app.run()
}
