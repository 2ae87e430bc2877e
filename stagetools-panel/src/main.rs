/// Stage Tools Panel - interactive stage measurement and alignment
///
/// Usage: stagetools-panel [stage-file] [--reference <prefix> <url>]
/// Controls:
///   - Up/Down: move the prim cursor, Space: toggle selection
///   - u: cycle display unit, r: refresh, c: clear
///   - a: cycle align axis, n/m/,: align min/center/max, g: drop to ground
///   - q/ESC: quit

use std::env;
use std::fs;
use std::io;

use stagetools_core::{parse_stage, Stage};
use stagetools_panel::PanelApp;
use tracing_subscriber::EnvFilter;

const DEMO_STAGE: &str = "
stage mpu 0.01 upaxis Z
prim /World/Crate_01
    translate 0 0 50
    extent -50 -50 -50 50 50 50
endprim
prim /World/Crate_02
    translate 180 40 50
    extent -50 -50 -50 50 50 50
endprim
prim /World/Pallet
    translate 90 0 7.5
    extent -120 -80 -7.5 120 80 7.5
endprim
prim /World/Floor
    extent -500 -500 0 500 500 0
endprim
";

fn load_stage(path: Option<&str>) -> io::Result<Stage> {
    let text = match path {
        Some(p) => {
            println!("Loading stage file: {}", p);
            fs::read_to_string(p).map_err(|e| {
                io::Error::new(io::ErrorKind::NotFound, format!("Failed to read stage file: {}", e))
            })?
        }
        None => {
            eprintln!("No stage file provided, using built-in demo stage...");
            DEMO_STAGE.to_string()
        }
    };

    parse_stage(&text).map_err(|e| {
        io::Error::new(io::ErrorKind::InvalidData, format!("Failed to parse stage: {}", e))
    })
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let mut stage_path: Option<&str> = None;
    let mut reference: Option<(&str, &str)> = None;

    let mut i = 0;
    while i < args.len() {
        if args[i] == "--reference" {
            if i + 3 > args.len() {
                eprintln!("Usage: stagetools-panel [stage-file] [--reference <prefix> <url>]");
                return Ok(());
            }
            reference = Some((args[i + 1].as_str(), args[i + 2].as_str()));
            i += 3;
        } else {
            stage_path = Some(args[i].as_str());
            i += 1;
        }
    }

    let stage = load_stage(stage_path)?;
    println!("Loaded {} prims", stage.prim_count());

    let mut app = PanelApp::new(stage)?;
    if let Some((prefix, url)) = reference {
        app.apply_reference(prefix, url);
    }
    app.run()?;

    println!("Stage tools panel closed.");
    Ok(())
}
