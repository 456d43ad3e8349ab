//! Headless polygon editor.
//!
//! Usage:
//!   poly-editor [OPTIONS] [SCRIPT]
//!
//! Replays a gesture script (see `poly_editor::script`) and prints every
//! polygon's edges with their constraint labels. `RUST_LOG=debug` shows
//! the routing and propagation decisions.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use poly_core::{EngineConfig, Polygon};
use poly_editor::{Editor, EditorConfig, parse_script};
use poly_render::{CanvasConfig, Color, Framebuffer, Palette, paint_polygons};

#[derive(Parser)]
#[command(name = "poly-editor")]
#[command(about = "Replay polygon editing gestures and print the result")]
struct Cli {
    /// Gesture script (reads from stdin if not provided)
    script: Option<PathBuf>,

    /// Canvas width in pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Propagation hops allowed per vertex for one gesture
    #[arg(long, default_value_t = 3)]
    budget: i32,

    /// Edge color as #RGB or #RRGGBB
    #[arg(long)]
    edge_color: Option<String>,

    /// Also print the canvas as ASCII art
    #[arg(long)]
    ascii: bool,
}

impl Cli {
    fn editor_config(&self) -> Result<EditorConfig, String> {
        let mut palette = Palette::default();
        if let Some(hex) = &self.edge_color {
            palette.edge = Color::from_hex(hex).ok_or_else(|| format!("invalid color `{hex}`"))?;
        }
        Ok(EditorConfig::default()
            .with_engine(EngineConfig {
                budget_per_vertex: self.budget,
                ..EngineConfig::default()
            })
            .with_palette(palette)
            .with_canvas(CanvasConfig {
                width: self.width,
                height: self.height,
            }))
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let config = match cli.editor_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let source = match &cli.script {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading script '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                eprintln!("Error reading from stdin: {e}");
                return ExitCode::FAILURE;
            }
            buffer
        }
    };

    let events = match parse_script(&source) {
        Ok(events) => events,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut editor = Editor::new(config);
    for event in &events {
        editor.handle(event);
        if let Some(warning) = editor.take_warning() {
            eprintln!("warning: {warning}");
        }
    }

    println!("{}", editor.title());
    for (i, polygon) in editor.polygons().iter().enumerate() {
        print_polygon(i, polygon);
    }

    if cli.ascii {
        let mut canvas = Framebuffer::new(config.canvas);
        paint_polygons(&mut canvas, editor.polygons(), &config.palette);
        print!("{}", canvas.to_ascii(config.palette.vertex));
    }
    ExitCode::SUCCESS
}

fn print_polygon(index: usize, polygon: &Polygon) {
    println!("polygon {index} ({} vertices)", polygon.vertex_count());
    for (id, edge) in polygon.edges() {
        let label = edge
            .constraint()
            .map(|c| format!(" {}{} with {}", c.kind.symbol(), c.id, c.partner))
            .unwrap_or_default();
        println!("  {id}: {} -> {}{label}", edge.begin(), edge.end());
    }
}
