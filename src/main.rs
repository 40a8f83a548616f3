use anyhow::Result;
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use crypto_news::api::{FetchError, RawArticle};
use crypto_news::app::{App, PageRequest};
use crypto_news::config::{self, Config, NewsCategory};
use crypto_news::ui;
use ratatui::prelude::*;
use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing_subscriber::EnvFilter;

type FetchDone = (PageRequest, Result<Vec<RawArticle>, FetchError>);

#[derive(Clone, Copy, ValueEnum)]
enum CategoryArg {
    All,
    Bitcoin,
    Ethereum,
}

impl From<CategoryArg> for NewsCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::All => NewsCategory::All,
            CategoryArg::Bitcoin => NewsCategory::Bitcoin,
            CategoryArg::Ethereum => NewsCategory::Ethereum,
        }
    }
}

#[derive(Parser)]
#[command(name = "crypto-news")]
#[command(about = "Terminal reader for cryptocurrency news", long_about = None)]
struct Cli {
    /// News category to open with
    #[arg(short, long, value_enum)]
    category: Option<CategoryArg>,

    /// API key for the news service (overrides the config file)
    #[arg(long)]
    api_key: Option<String>,

    /// Print the latest headlines and exit
    #[arg(long)]
    latest: bool,
}

fn init_logging() -> Result<()> {
    let path = config::data_dir()?.join("crypto-news.log");
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("crypto_news=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let mut config = Config::load()?;
    if let Some(key) = cli.api_key {
        config.api_key = Some(key);
    }
    if let Some(category) = cli.category {
        config.default_category = category.into();
    }

    let mut app = App::new(config)?;

    if cli.latest {
        return print_latest(&mut app).await;
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

async fn print_latest(app: &mut App) -> Result<()> {
    let label = app.category.label();
    let articles = app.try_load_latest().await?;
    println!("Latest {} news", label);
    for article in articles {
        println!(
            "{:>10}  {:<20}  {}",
            article.relative_time(),
            ui::formatters::truncate_str(&article.source_name, 20),
            article.title
        );
    }
    Ok(())
}

/// Run the fetch off the UI task; the result comes back through `tx`.
fn spawn_fetch(app: &App, request: PageRequest, tx: &UnboundedSender<FetchDone>) {
    let fetcher = app.fetcher();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = fetcher.fetch_page(&request.query, request.page).await;
        let _ = tx.send((request, result));
    });
}

fn apply_finished(app: &mut App, rx: &mut UnboundedReceiver<FetchDone>) {
    while let Ok((request, result)) = rx.try_recv() {
        app.complete(&request, result);
    }
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<FetchDone>();
    let request = app.begin_load_all();
    spawn_fetch(app, request, &tx);

    loop {
        apply_finished(app, &mut rx);

        terminal.draw(|frame| ui::draw(frame, app))?;

        // Short poll keeps in-flight results and the clock flowing
        let timeout = Duration::from_millis(100);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char('r') => {
                        app.remember_position();
                        let request = app.begin_load_all();
                        spawn_fetch(app, request, &tx);
                    }
                    KeyCode::Char('c') => {
                        app.saved_scroll_id = None;
                        let request = app.begin_select_category(app.category.next());
                        spawn_fetch(app, request, &tx);
                    }
                    KeyCode::Char('b') => app.toggle_view(),
                    KeyCode::Char('s') => app.toggle_selected_bookmark(),
                    KeyCode::Char('m') => app.toggle_selected_read(),
                    KeyCode::Enter => app.open_selected(),
                    KeyCode::Up | KeyCode::Char('k') => app.move_up(),
                    KeyCode::Down | KeyCode::Char('j') => {
                        app.move_down();
                        if app.is_at_last() {
                            if let Some(request) = app.begin_load_more() {
                                spawn_fetch(app, request, &tx);
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
    }
}
