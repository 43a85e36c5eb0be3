//! Scrollable portfolio page with staggered section reveals.
//!
//! ```text
//! cargo run --example portfolio [preset.ron]
//! RUST_LOG=spark_reveal=debug cargo run --example portfolio 2> reveal.log
//! ```
//!
//! Keys: j/k or arrows scroll, space/PageDown and PageUp page, g/G jump to
//! top/bottom, 1-9 jump to a section, q quits. The mouse wheel scrolls.

use std::error::Error;
use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use crossterm::terminal;
use tracing_subscriber::EnvFilter;

use spark_reveal::state::{scroll, timers};
use spark_reveal::{paint_page, DiffRenderer, Page, PagePreset};

/// Longest the loop sleeps when no reveal is pending.
const IDLE_POLL: Duration = Duration::from_millis(250);

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let preset = match std::env::args().nth(1) {
        Some(path) => PagePreset::load(path)?,
        None => PagePreset::portfolio()?,
    };

    let (width, height) = terminal::size()?;
    let mut page = Page::mount(&preset, width, height)?;

    terminal::enable_raw_mode()?;
    let mut renderer = DiffRenderer::new(io::stdout());
    renderer.enter_fullscreen()?;
    renderer.enable_mouse()?;

    let result = run(&mut page, &mut renderer);

    renderer.disable_mouse()?;
    renderer.exit_fullscreen()?;
    terminal::disable_raw_mode()?;
    page.unmount();

    result
}

/// Log to stderr, only when `RUST_LOG` is set.
fn init_tracing() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

fn run(page: &mut Page, renderer: &mut DiffRenderer<Stdout>) -> Result<(), Box<dyn Error>> {
    loop {
        page.tick();
        renderer.render(&paint_page(page))?;

        let timeout = timers::time_until_next_timer().map_or(IDLE_POLL, |next| next.min(IDLE_POLL));
        if !event::poll(timeout)? {
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if !handle_key(page, key) {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollDown => {
                    page.scroll_by(scroll::WHEEL_SCROLL);
                }
                MouseEventKind::ScrollUp => {
                    page.scroll_by(-scroll::WHEEL_SCROLL);
                }
                _ => {}
            },
            Event::Resize(width, height) => {
                page.resize(width, height)?;
                renderer.invalidate();
            }
            _ => {}
        }
    }
}

/// Returns `false` to quit.
fn handle_key(page: &Page, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return false,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return false,
        KeyCode::Down | KeyCode::Char('j') => {
            page.scroll_by(scroll::LINE_SCROLL);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            page.scroll_by(-scroll::LINE_SCROLL);
        }
        KeyCode::PageDown | KeyCode::Char(' ') => {
            page.page_down();
        }
        KeyCode::PageUp => {
            page.page_up();
        }
        KeyCode::Home | KeyCode::Char('g') => {
            page.scroll_to_top();
        }
        KeyCode::End | KeyCode::Char('G') => {
            page.scroll_to_bottom();
        }
        KeyCode::Char(c @ '1'..='9') => {
            let nth = c as usize - '1' as usize;
            if let Some(id) = page.sections().get(nth).map(|s| s.id().to_string()) {
                page.scroll_to_section(&id);
            }
        }
        _ => {}
    }
    true
}
