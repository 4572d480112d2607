use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};

use booksum::ai::{HttpTransport, SummaryClient, Transport, adapter_for};
use booksum::app::{App, Field, InputMode, Panel, View};
use booksum::catalog::CatalogClient;
use booksum::catalog::client::{MIN_QUERY_CHARS, is_searchable};
use booksum::core::config::AppConfig;
use booksum::core::models::SelectedBook;
use booksum::core::storage::FileStorage;

#[derive(Parser, Debug)]
#[command(
    name = "booksum",
    about = "Spoiler-free book summaries up to a chosen chapter",
    version
)]
pub struct Cli {
    /// Answer yes to confirmation prompts.
    #[arg(long, short = 'y', global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage the stored API key.
    #[command(subcommand)]
    Key(KeyCommand),
    /// Search the public book catalog and pick a result.
    Search {
        /// Free-text query, at least three characters.
        query: String,
    },
    /// Inspect or forget the selected catalog book.
    #[command(subcommand)]
    Selection(SelectionCommand),
    /// Summarize a book up to and including a chapter.
    Summarize {
        /// Book title. Omit to use the selected catalog book.
        #[arg(long, requires = "author")]
        title: Option<String>,
        /// Book author. Omit to use the selected catalog book.
        #[arg(long, requires = "title")]
        author: Option<String>,
        /// Last chapter to cover.
        #[arg(long, short, default_value = "")]
        chapter: String,
    },
    /// Fill in the form line by line; Enter on the chapter submits.
    Interactive,
}

#[derive(Subcommand, Debug)]
enum KeyCommand {
    /// Store an API key. Reads it from stdin when omitted.
    Set { key: Option<String> },
    /// Remove the stored API key and selection.
    Clear,
}

#[derive(Subcommand, Debug)]
enum SelectionCommand {
    Show,
    Clear,
}

/// Terminal rendition of the page: notices on stderr, markup on stdout.
struct TerminalView {
    assume_yes: bool,
}

impl View for TerminalView {
    fn show_panel(&mut self, panel: Panel) {
        if panel == Panel::CredentialEntry {
            eprintln!("No API key stored. Run `booksum key set` first.");
        }
    }

    fn notify(&mut self, message: &str) {
        eprintln!("{message}");
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{prompt} [y/N] ");
        let _ = io::stderr().flush();
        read_line()
            .map(|answer| matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
            .unwrap_or(false)
    }

    fn set_loading(&mut self, visible: bool) {
        if visible {
            eprintln!("Generating summary...");
        }
    }

    fn show_result(&mut self, html: &str) {
        println!("{html}");
    }

    fn clear_result(&mut self) {}

    fn show_search_results(&mut self, items: &[booksum::catalog::CatalogItem]) {
        for (i, item) in items.iter().enumerate() {
            println!("{:>2}. {} by {}", i + 1, item.title, item.author_line());
        }
    }

    fn show_selection(&mut self, book: Option<&SelectedBook>) {
        match book {
            Some(book) => {
                println!("Selected: {} by {}", book.title, book.author_line());
                println!("{}", book.description);
            }
            None => println!("No book selected."),
        }
    }

    fn reset_form(&mut self) {}
}

fn read_line() -> Option<String> {
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
    }
}

fn prompt(label: &str) -> Result<String> {
    eprint!("{label}: ");
    io::stderr().flush()?;
    read_line().ok_or_else(|| anyhow!("input closed"))
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env().map_err(|e| anyhow!(e))?;
    let storage = Arc::new(
        FileStorage::open(&config.data_dir)
            .with_context(|| format!("opening store in {}", config.data_dir.display()))?,
    );
    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new());
    let summaries = SummaryClient::new(adapter_for(&config), Arc::clone(&transport));
    let view = TerminalView {
        assume_yes: cli.yes,
    };

    let mode = match &cli.command {
        Command::Summarize { title: Some(_), .. } | Command::Interactive => InputMode::Manual,
        _ => InputMode::Catalog,
    };
    let mut app = App::new(mode, storage, summaries, view)
        .with_catalog(Arc::new(CatalogClient::new(transport)));

    match cli.command {
        Command::Key(KeyCommand::Set { key }) => {
            let key = match key {
                Some(key) => key,
                None => prompt("API key")?,
            };
            app.save_key(&key);
        }
        Command::Key(KeyCommand::Clear) => app.clear_key(),
        Command::Search { query } => handle_search(&mut app, &query).await?,
        Command::Selection(SelectionCommand::Show) => {
            app.start();
        }
        Command::Selection(SelectionCommand::Clear) => app.clear_selection(),
        Command::Summarize {
            title,
            author,
            chapter,
        } => {
            if let (Some(title), Some(author)) = (title, author) {
                app.set_field(Field::Title, &title);
                app.set_field(Field::Author, &author);
            }
            app.set_field(Field::Chapter, &chapter);
            app.submit().await;
        }
        Command::Interactive => {
            if app.start() == Panel::CredentialEntry {
                return Ok(());
            }
            let title = prompt("Title")?;
            app.set_field(Field::Title, &title);
            let author = prompt("Author")?;
            app.set_field(Field::Author, &author);
            let chapter = prompt("Chapter")?;
            app.on_key(Field::Chapter, "Enter", &chapter).await;
        }
    }

    Ok(())
}

async fn handle_search(app: &mut App<TerminalView>, query: &str) -> Result<()> {
    if !is_searchable(query) {
        eprintln!("Type at least {MIN_QUERY_CHARS} characters to search.");
        return Ok(());
    }

    app.search_input(query);
    let count = app.next_search_results().await.map_or(0, <[_]>::len);
    if count == 0 {
        eprintln!("No books found.");
        return Ok(());
    }

    let choice = prompt(&format!("Select 1-{count} (Enter to skip)"))?;
    if choice.trim().is_empty() {
        return Ok(());
    }
    let index: usize = choice
        .trim()
        .parse()
        .ok()
        .filter(|n| (1..=count).contains(n))
        .ok_or_else(|| anyhow!("invalid choice '{}'", choice.trim()))?;
    app.select_result(index - 1);
    Ok(())
}
