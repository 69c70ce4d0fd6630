//! quill - a terminal arXiv preprint tracker
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize logging (RUST_LOG=debug for verbose output)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse CLI arguments
    match parse_args()? {
        Command::Run => run_tui(),
        Command::Fetch { today } => fetch_cli(today),
        Command::Download { paper_id } => download_cli(&paper_id),
        Command::Projects => list_projects(),
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Version => {
            print_version();
            Ok(())
        }
    }
}

/// CLI commands
enum Command {
    Run,
    Fetch { today: bool },
    Download { paper_id: String },
    Projects,
    Help,
    Version,
}

fn parse_args() -> Result<Command> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() == 1 {
        return Ok(Command::Run);
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help),
        "-v" | "--version" | "version" => Ok(Command::Version),

        "fetch" => {
            let today = args.iter().any(|a| a == "--today" || a == "-t");
            Ok(Command::Fetch { today })
        }

        "download" | "dl" => {
            let paper_id = args
                .get(2)
                .ok_or_else(|| anyhow::anyhow!("Missing paper id (e.g. 2403.12345)"))?
                .clone();
            Ok(Command::Download { paper_id })
        }

        "projects" => Ok(Command::Projects),

        other => Err(anyhow::anyhow!(
            "Unknown command: {other}\nRun 'quill --help' for usage"
        )),
    }
}

fn print_help() {
    let config_path = quill::Config::default_path()
        .map_or_else(|_| "Unknown".to_string(), |p| p.display().to_string());

    println!(
        r"{}
📜 quill - a terminal arXiv preprint tracker

USAGE:
    quill                              Launch TUI
    quill [COMMAND]

COMMANDS:
    fetch [OPTIONS]                    Fetch the feed and list new articles
      Options:
        -t, --today                    Only today's entries
      Examples:
        quill fetch
        quill fetch --today

    download <paper-id>                Download a paper's PDF
      Example:
        quill download 2403.12345

    projects                           List projects

OPTIONS:
    -h, --help                         Show this help message
    -v, --version                      Show version information

KEYBINDINGS (TUI, remappable in config):
    Navigation
      j/↓           Move down
      k/↑           Move up
      h/l, Tab      Switch pane
      g/G           Jump to top/bottom

    Actions
      b             Toggle bookmark
      d             Download PDF
      o             Open in browser
      r/R           Refresh feed (all/today)
      p             Create project
      x             Delete selected project
      n             Link/unlink article to project
      /             Search
      D             Date range

    View
      a             Toggle detail pane
      ?             Help

CONFIG:
    {}

HOMEPAGE:
    https://github.com/quill-tui/quill
",
        quill::LOGO,
        config_path
    );
}

fn print_version() {
    println!("quill {}", quill::VERSION);
}

fn run_tui() -> Result<()> {
    quill::app::run()
}

fn fetch_cli(today: bool) -> Result<()> {
    let config = quill::Config::load()?;
    let db = quill::Database::open()?;
    let fetcher = quill::Fetcher::new(config.topics.clone(), &config.download_dir()?)?;

    let mut core = quill::AppCore::new(db, Box::new(fetcher));
    if today {
        core.refresh_today();
    } else {
        core.refresh_from_feed();
    }

    let articles = core.current_articles();
    println!("{} articles stored", articles.len());
    for article in articles {
        println!(
            "  {} {} ({})",
            article.date.format("%Y-%m-%d"),
            article.title,
            article.id()
        );
    }

    Ok(())
}

fn download_cli(paper_id: &str) -> Result<()> {
    use quill::ArticleSource;

    let config = quill::Config::load()?;
    let download_dir = config.download_dir()?;
    let fetcher = quill::Fetcher::new(config.topics, &download_dir)?;

    println!("Downloading {paper_id}...");
    let filename = format!("{paper_id}.pdf");
    if fetcher.download_paper(paper_id, &filename) {
        println!("✓ Saved to {}", download_dir.join(&filename).display());
        Ok(())
    } else {
        Err(anyhow::anyhow!("Download failed"))
    }
}

fn list_projects() -> Result<()> {
    let db = quill::Database::open()?;
    let mut projects = db.get_projects()?;
    projects.sort();

    if projects.is_empty() {
        println!("No projects yet. Create one in the TUI with 'p'.");
        return Ok(());
    }

    println!("Projects:\n");
    for project in &projects {
        let count = db.articles_for_project(project)?.len();
        println!("  {project} ({count} articles)");
    }

    Ok(())
}
