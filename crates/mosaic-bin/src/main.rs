//! Mosaic entrypoint: CLI args, logging, config discovery, terminal
//! acquisition, and the single-threaded cooperative event loop (§2, §5):
//! block for input, decode, dispatch, render, repeat until `ctrl-Q`.

use std::io::{Read, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use mosaic_actions::{dispatcher, App};
use mosaic_input::KeyCode;
use mosaic_keymap::Action;
use mosaic_layout::LayoutTree;
use mosaic_state::EditorState;
use mosaic_terminal::{Framebuffer, Terminal};
use mosaic_text::highlight::built_in_rules;
use mosaic_view::Window;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

/// How long each input poll waits before re-checking terminal size, in
/// lieu of the original's `VMIN=0, VTIME=1` (~100ms) read timeout.
const POLL_TIMEOUT: Duration = Duration::from_millis(100);
/// Bytes read per input poll (§4.2: "read up to 64 bytes per call").
const READ_CHUNK: usize = 64;

#[derive(Parser, Debug)]
#[command(name = "mosaic", version, about = "Mosaic editor")]
struct Args {
    /// File to open at startup. A fresh untitled buffer is used if omitted.
    path: Option<PathBuf>,
    /// Path to a `mosaic.toml` config file (overrides discovery).
    #[arg(long = "config")]
    config: Option<PathBuf>,
    /// Path to the log file (overrides the default config-dir location).
    #[arg(long = "log")]
    log: Option<PathBuf>,
}

/// `dirs::config_dir()/mosaic/mosaic.log`, falling back to `./mosaic.log`
/// when no platform config directory is available — the same fallback
/// `mosaic-config::discover` uses for `mosaic.toml`.
fn default_log_path() -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join("mosaic").join("mosaic.log"),
        None => PathBuf::from("mosaic.log"),
    }
}

fn configure_logging(path: Option<PathBuf>) -> Option<WorkerGuard> {
    let log_path = path.unwrap_or_else(default_log_path);
    let log_dir = log_path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| std::path::Path::new("."));
    let log_file = log_path.file_name()?.to_owned();
    let _ = std::fs::create_dir_all(log_dir);
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(writer)
        .try_init()
    {
        Ok(()) => Some(guard),
        Err(_) => None,
    }
}

/// Builds the editor runtime around either the file named on the command
/// line or a fresh `"untitled"` buffer, laid out as a single full-screen
/// pane.
fn bootstrap(args: &Args, rules: Vec<mosaic_text::highlight::HighlightRule>, themes: Vec<mosaic_state::Theme>, width: i32, height: i32) -> App {
    let mut state = EditorState::new(themes);

    let file_id = match &args.path {
        Some(path) => match state.open_or_get_file(path, &rules) {
            Ok(id) => id,
            Err(err) => {
                warn!(target: "io", %err, "open_failed");
                state.create_file("untitled", &rules)
            }
        },
        None => state.create_file("untitled", &rules),
    };

    let window_id = state.alloc_window(file_id);
    let layout = LayoutTree::new(width, height, window_id);
    let mut app = App::new(state, layout, rules, window_id);
    app.insert_window(window_id, Window::new(Some(file_id)));
    app
}

/// Forces every open file and every laid-out pane to repaint on the next
/// frame, used after a terminal resize (§5: "window-change signals fire
/// an out-of-band `resize`").
fn force_full_redraw(app: &mut App) {
    for (_, window_id) in app.panes() {
        app.window_mut(window_id).redraw = true;
    }
    for i in 0..app.state.file_count() {
        let file = app.state.file_mut(mosaic_state::FileId(i));
        file.redraw = true;
        for line in file.lines.as_mut_slice() {
            line.redraw = true;
        }
    }
}

fn apply_resize(app: &mut App, width: i32, height: i32) {
    app.layout.resize_root(width, height);
    force_full_redraw(app);
    info!(target: "runtime", width, height, "resized");
}

/// Reads one chunk of raw bytes from standard input, blocking until at
/// least one is available. Returns an empty slice only on EOF.
fn read_input(stdin: &mut impl Read, buf: &mut [u8; READ_CHUNK]) -> usize {
    match stdin.read(buf) {
        Ok(n) => n,
        Err(_) => 0,
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging(args.log.clone());

    info!(target: "runtime", "startup");

    let config = mosaic_config::load_from(args.config.clone());
    let rules = built_in_rules();

    let mut terminal = Terminal::new();
    let guard = terminal.enter_guard()?;

    let (width, height) = mosaic_terminal::terminal_size().unwrap_or((120, 40));
    let mut app = bootstrap(&args, rules, config.themes.clone(), width, height);

    let mut fb = Framebuffer::new();
    mosaic_render::render(&mut fb, &mut app);
    let mut stdout = std::io::stdout();
    fb.flush_to(&mut stdout)?;

    let mut stdin = std::io::stdin();
    let mut last_size = (width, height);
    let mut buf = [0u8; READ_CHUNK];

    while app.state.running {
        if let Ok(current) = mosaic_terminal::terminal_size()
            && current != last_size
        {
            last_size = current;
            apply_resize(&mut app, current.0, current.1);
            fb.clear();
            mosaic_render::render(&mut fb, &mut app);
            fb.flush_to(&mut stdout)?;
        }

        let ready = matches!(crossterm::event::poll(POLL_TIMEOUT), Ok(true));
        if !ready {
            continue;
        }

        let n = read_input(&mut stdin, &mut buf);
        if n == 0 {
            continue;
        }

        let code = mosaic_input::decode(&buf[..n]);
        if code == KeyCode::None || code == KeyCode::Unknown {
            continue;
        }
        if code == KeyCode::CtrlQ {
            info!(target: "runtime", "exit_requested");
            app.state.running = false;
            break;
        }

        let mode = dispatcher::mode(&app);
        let action = mosaic_keymap::dispatch(mode, code);
        if action != Action::Noop {
            debug!(target: "actions.dispatch", ?mode, ?code, ?action, "dispatch");
        }
        dispatcher::dispatch(&mut app, action);

        mosaic_render::render(&mut fb, &mut app);
        fb.flush_to(&mut stdout)?;
    }

    drop(guard);
    info!(target: "runtime", "shutdown");
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_state::built_in_themes;

    #[test]
    fn bootstrap_without_path_creates_untitled_buffer() {
        let args = Args { path: None, config: None, log: None };
        let app = bootstrap(&args, built_in_rules(), built_in_themes(), 120, 40);
        let file_id = app.focused_window().file.expect("single pane has a file");
        assert_eq!(app.file(file_id).path, PathBuf::from("untitled"));
    }

    #[test]
    fn bootstrap_opens_missing_path_as_untitled_fallback() {
        let args = Args {
            path: Some(PathBuf::from("__definitely_missing_mosaic_file__.c")),
            config: None,
            log: None,
        };
        let app = bootstrap(&args, built_in_rules(), built_in_themes(), 120, 40);
        let file_id = app.focused_window().file.expect("single pane has a file");
        assert_eq!(app.file(file_id).path, PathBuf::from("untitled"));
    }

    #[test]
    fn force_full_redraw_clears_nothing_but_sets_every_flag() {
        let args = Args { path: None, config: None, log: None };
        let mut app = bootstrap(&args, built_in_rules(), built_in_themes(), 120, 40);
        for (_, window_id) in app.panes() {
            app.window_mut(window_id).redraw = false;
        }
        force_full_redraw(&mut app);
        for (_, window_id) in app.panes() {
            assert!(app.window(window_id).redraw);
        }
    }
}
