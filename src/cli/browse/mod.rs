//! `iconpack browse`: interactive terminal catalog.
//!
//! ```text
//! loop
//!   ├── ensure pass for changes the watch recorded
//!   ├── queue pending document loads (FuturesUnordered)
//!   ├── draw
//!   ├── apply one finished load, or wait for input until the next deadline
//!   ├── key ──► action ──► app (status row redrawn while it runs)
//!   └── resize ──► debounced renderer re-init
//! ```
//!
//! Everything runs on one current-thread runtime. Loads from an older render
//! are dropped by the renderer when they finish.

mod draw;
mod input;

use crate::{
    client::{
        App, http_app,
        app::StatusBar,
        export::FileSaver,
        fetch::{FetchError, VectorFetcher},
        render::LoadRequest,
        source::CatalogSource,
    },
    config::AppConfig,
    core, logger,
};
use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use draw::{CHROME_ROWS, Frame};
use futures_util::{
    FutureExt, StreamExt,
    future::LocalBoxFuture,
    stream::FuturesUnordered,
};
use input::{Action, View};
use std::{
    future::Future,
    io::{self, Stdout, Write},
    pin::pin,
    time::{Duration, Instant},
};

const TICK: Duration = Duration::from_millis(50);

type Load = LocalBoxFuture<'static, (LoadRequest, Result<String, FetchError>)>;

pub fn run_browse(config: &AppConfig) -> Result<()> {
    let mut app = http_app(&config.client.server, &config.client.output)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    core::set_interactive(true);
    logger::set_quiet(true);
    let result = TerminalSession::new().and_then(|mut session| {
        runtime.block_on(event_loop(&mut app, &mut session))
    });
    logger::set_quiet(false);
    core::set_interactive(false);

    result.context("terminal session failed")
}

/// Raw mode plus alternate screen, restored on drop.
struct TerminalSession {
    stdout: Stdout,
}

impl TerminalSession {
    fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        Ok(Self { stdout })
    }

    fn size() -> (usize, usize) {
        terminal::size().map_or((80, 24), |(w, h)| (w as usize, h as usize))
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

async fn event_loop<S, F, V>(app: &mut App<S, F, V>, session: &mut TerminalSession) -> io::Result<()>
where
    S: CatalogSource,
    F: VectorFetcher + Clone + 'static,
    V: FileSaver,
{
    let mut view = View::default();
    let mut loads: FuturesUnordered<Load> = FuturesUnordered::new();
    let status = app.status().clone();

    // failures surface in the banner
    let _ = busy(&mut session.stdout, &status, app.init()).await?;

    while !core::is_shutdown() {
        app.renderer_mut().process_mutations();
        for request in app.renderer_mut().pending_loads() {
            loads.push(start_load(app.fetcher().clone(), request));
        }

        let (width, height) = TerminalSession::size();
        let len = app.renderer().container().len();
        view.scroll(height.saturating_sub(CHROME_ROWS), len);
        draw::draw(
            &mut session.stdout,
            &Frame {
                cards: app.renderer().container().cards(),
                counter: app.counter(),
                status: &status,
                cursor: view.cursor,
                offset: view.offset,
                width,
                height,
            },
        )?;

        let tick = app
            .renderer()
            .next_deadline(Instant::now())
            .map_or(TICK, |d| d.min(TICK));
        if !loads.is_empty()
            && let Ok(Some((request, result))) = tokio::time::timeout(tick, loads.next()).await
        {
            app.renderer_mut().complete_load(&request, result);
            continue;
        }

        let wait = if loads.is_empty() { tick } else { Duration::ZERO };
        if event::poll(wait)? {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(action) = input::action(key) {
                        if action == Action::Quit {
                            break;
                        }
                        apply(app, &mut view, action, height, &mut session.stdout).await?;
                    }
                }
                Event::Resize(..) => app.renderer_mut().on_resize(Instant::now()),
                _ => {}
            }
        }

        let now = Instant::now();
        app.renderer_mut().poll(now);
        status.tick(now);
    }
    Ok(())
}

/// Drive `work` to completion, redrawing the status row every tick.
async fn busy<T>(
    out: &mut impl Write,
    status: &StatusBar,
    work: impl Future<Output = T>,
) -> io::Result<T> {
    let mut work = pin!(work);
    let mut ticker = tokio::time::interval(TICK);
    loop {
        tokio::select! {
            biased;
            value = &mut work => return Ok(value),
            _ = ticker.tick() => draw::draw_status(out, status)?,
        }
    }
}

fn start_load<F: VectorFetcher + 'static>(fetcher: F, request: LoadRequest) -> Load {
    async move {
        let result = fetcher.fetch(&request.location).await;
        (request, result)
    }
    .boxed_local()
}

async fn apply<S, F, V>(
    app: &mut App<S, F, V>,
    view: &mut View,
    action: Action,
    height: usize,
    out: &mut impl Write,
) -> io::Result<()>
where
    S: CatalogSource,
    F: VectorFetcher,
    V: FileSaver,
{
    let len = app.renderer().container().len();
    let page = height.saturating_sub(CHROME_ROWS).max(1) as isize;
    match action {
        Action::Up => view.move_by(-1, len),
        Action::Down => view.move_by(1, len),
        Action::PageUp => view.move_by(-page, len),
        Action::PageDown => view.move_by(page, len),
        Action::Toggle => {
            app.toggle(view.cursor);
        }
        Action::Click => {
            app.click(view.cursor);
        }
        Action::SelectAll => {
            app.select_all(true);
        }
        Action::ClearAll => {
            app.select_all(false);
        }
        Action::Refresh => {
            let status = app.status().clone();
            let _ = busy(out, &status, app.refresh()).await?;
        }
        Action::Download => {
            let status = app.status().clone();
            let _ = busy(out, &status, app.download_selected()).await?;
        }
        Action::Quit => {}
    }
    Ok(())
}
