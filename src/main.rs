use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use tracing_subscriber::EnvFilter;

use tui_vote_map::app::App;
use tui_vote_map::data;
use tui_vote_map::dispatch::Modifiers;
use tui_vote_map::map::MapRenderer;
use tui_vote_map::ui;

const DEFAULT_DATA: &str = "data/countries.geojson";

#[derive(Parser, Debug)]
#[command(author, version, about = "Click world regions through neutral and party affiliations")]
struct Args {
    /// GeoJSON boundary dataset (countries or states)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Region names to leave off the map (repeatable)
    #[arg(long, default_value = "Antarctica")]
    exclude: Vec<String>,

    /// Start with region labels hidden
    #[arg(long)]
    no_labels: bool,

    /// Write logs here (filtered by RUST_LOG, default "info")
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    // Load before touching the terminal so failures print normally
    let shapes = data::load_or_builtin(args.data.as_deref(), Path::new(DEFAULT_DATA), &args.exclude)?;
    let mut renderer = MapRenderer::new(shapes);
    renderer.settings.show_labels = !args.no_labels;

    let mut terminal = ratatui::init();
    terminal.clear()?;
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = run(&mut terminal, renderer);

    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn modifiers(mouse: &MouseEvent) -> Modifiers {
    Modifiers {
        shift: mouse.modifiers.contains(KeyModifiers::SHIFT),
    }
}

/// Handle mouse events: clicks cycle regions, drag pans, scroll zooms
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let (col, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Moved => app.hover_at(col, row),
        MouseEventKind::ScrollUp => app.zoom_in_at(col, row),
        MouseEventKind::ScrollDown => app.zoom_out_at(col, row),
        // Horizontal scroll for panning (trackpad two-finger swipe)
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        MouseEventKind::Down(MouseButton::Left) => app.press(col, row),
        MouseEventKind::Drag(MouseButton::Left) => app.handle_drag(col, row),
        MouseEventKind::Up(MouseButton::Left) => app.release(col, row, modifiers(&mouse)),
        // Many terminals keep shift-click for text selection
        MouseEventKind::Down(MouseButton::Right) => app.reset_at(col, row),
        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, renderer: MapRenderer) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(size.width as usize, size.height as usize, renderer);

    loop {
        terminal.draw(|frame| ui::render(frame, &app))?;

        // ~60fps
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.quit(),

                    KeyCode::Left | KeyCode::Char('h') => app.pan(-10, 0),
                    KeyCode::Right | KeyCode::Char('l') => app.pan(10, 0),
                    KeyCode::Up | KeyCode::Char('k') => app.pan(0, -6),
                    KeyCode::Down | KeyCode::Char('j') => app.pan(0, 6),

                    KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
                    KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

                    KeyCode::Char('f') | KeyCode::Char('F') => app.toggle_fullscreen(),
                    KeyCode::Char('b') | KeyCode::Char('B') => app.map_renderer.toggle_borders(),
                    KeyCode::Char('L') => app.map_renderer.toggle_labels(),
                    KeyCode::Char('r') | KeyCode::Char('0') => app.reset_view(),
                    _ => {}
                },
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                Event::Resize(width, height) => app.resize(width as usize, height as usize),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
