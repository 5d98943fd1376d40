mod api;
mod cli;
mod config;
mod error;
mod ops;
mod prompt;
mod store;
mod tui;
mod view;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use api::client::ApiClient;
use api::models::SearchQuery;
use cli::{Cli, Commands};
use ops::AppContext;
use store::session::SessionStore;
use view::controller::{Notice, SearchPanel, StatusPanel, UploadResult};

const LOG_ENV: &str = "DOCDESK_LOG";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, None | Some(Commands::Ui));
    init_logging(interactive)?;

    let mut ctx = build_context(cli.base_url.as_deref())?;

    let ok = match cli.command {
        None | Some(Commands::Ui) => {
            tui::app::run_tui(ctx).await?;
            true
        }
        Some(Commands::Login { username, password }) => {
            let password = password_or_prompt(password)?;
            handle_login(&mut ctx, &username, &password).await
        }
        Some(Commands::Register {
            username,
            password,
            email,
        }) => {
            let password = password_or_prompt(password)?;
            handle_register(&mut ctx, &username, &password, &email).await
        }
        Some(Commands::Logout) => handle_logout(&mut ctx),
        Some(Commands::Whoami) => handle_whoami(&ctx),
        Some(Commands::Upload { file }) => handle_upload(&mut ctx, &file).await,
        Some(Commands::Search {
            query,
            category,
            doc_type,
        }) => {
            let query = SearchQuery {
                text: query.join(" "),
                category,
                doc_type,
            };
            handle_search(&mut ctx, &query).await
        }
        Some(Commands::Status { document_id }) => {
            handle_status(&mut ctx, document_id.unwrap_or_default()).await
        }
        Some(Commands::Download {
            document_id,
            no_open,
        }) => {
            if no_open {
                ctx.open_browser = false;
            }
            handle_download(&mut ctx, &document_id).await
        }
        Some(Commands::Recent) => {
            print_recent(&ctx);
            true
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging(to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    // The TUI owns the terminal, so its logs go to a file.
    if to_file {
        config::settings::ensure_docdesk_dir()?;
        let path = config::settings::log_path()?;
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
    Ok(())
}

fn build_context(base_url_flag: Option<&str>) -> Result<AppContext> {
    let cfg = config::settings::load_config()?;
    let api = ApiClient::new(cfg.resolve_base_url(base_url_flag));
    match api.base_url() {
        Some(url) => tracing::debug!(%url, "using API"),
        None => tracing::warn!(
            "no API base URL configured; set api.base_url in config.toml or {}",
            config::settings::API_URL_ENV
        ),
    }

    config::settings::ensure_docdesk_dir()?;
    let db_path = config::settings::state_db_path()?;
    let store = SessionStore::open(&db_path)
        .with_context(|| format!("Failed to open local state at {}", db_path.display()))?;

    let mut ctx = AppContext::new(Arc::new(api), store);
    ctx.open_browser = cfg.ui.open_browser;
    Ok(ctx)
}

fn password_or_prompt(password: Option<String>) -> Result<String> {
    match password {
        Some(p) => Ok(p),
        None => prompt::password("Password"),
    }
}

async fn handle_login(ctx: &mut AppContext, username: &str, password: &str) -> bool {
    let ok = ops::auth::login(ctx, username, password).await.is_ok();
    print_auth_notice(ctx);
    ok
}

async fn handle_register(
    ctx: &mut AppContext,
    username: &str,
    password: &str,
    email: &str,
) -> bool {
    let ok = ops::auth::register(ctx, username, password, email)
        .await
        .is_ok();
    print_auth_notice(ctx);
    ok
}

fn handle_logout(ctx: &mut AppContext) -> bool {
    let ok = ops::auth::logout(ctx).is_ok();
    print_auth_notice(ctx);
    ok
}

fn handle_whoami(ctx: &AppContext) -> bool {
    match &ctx.session {
        Some(session) => {
            println!(
                "\n  {} {}  {}\n",
                "●".green(),
                session.user.username.bold(),
                session.user.user_id.dimmed()
            );
            true
        }
        None => {
            println!("\n  {} {}\n", "●".dimmed(), "Not logged in.".dimmed());
            false
        }
    }
}

async fn handle_upload(ctx: &mut AppContext, file: &Path) -> bool {
    ctx.view.on_progress(|stage| {
        if let Some(stage) = stage {
            eprintln!(
                "  {} {} {}",
                "◌".cyan(),
                stage.label(),
                format!("{}%", stage.percent()).dimmed()
            );
        }
    });
    let ok = ops::upload::upload_file(ctx, file).await.is_ok();
    if !print_guard(ctx) {
        print_upload_result(ctx);
    }
    ok
}

async fn handle_search(ctx: &mut AppContext, query: &SearchQuery) -> bool {
    let ok = ops::search::search(ctx, query).await.is_ok();
    if !print_guard(ctx) {
        print_search(ctx, query);
    }
    ok
}

async fn handle_status(ctx: &mut AppContext, document_id: String) -> bool {
    ctx.view.status_input = document_id;
    let ok = ops::status::check_status(ctx).await.is_ok();
    if !print_guard(ctx) {
        print_alerts(ctx);
        print_status(ctx);
    }
    ok
}

async fn handle_download(ctx: &mut AppContext, document_id: &str) -> bool {
    let result = ops::download::download(ctx, document_id).await;
    if !print_guard(ctx) {
        print_alerts(ctx);
        if let Ok(url) = &result {
            println!();
            println!("  {} {}", "⇩".green(), "Download link".bold());
            println!("  {}", url.cyan());
            println!();
        }
    }
    result.is_ok()
}

// ─── Rich output helpers ────────────────────────────────────

/// Prints the login prompt when an operation bounced off the session guard.
fn print_guard(ctx: &AppContext) -> bool {
    if ctx.view.is_authenticated() {
        return false;
    }
    println!(
        "\n  {} {}\n",
        "●".yellow(),
        "Please log in first: docdesk login <username>".yellow()
    );
    true
}

fn print_alerts(ctx: &mut AppContext) {
    for alert in ctx.view.drain_alerts() {
        println!("\n  {} {}", "!".red().bold(), alert.red());
    }
}

fn print_auth_notice(ctx: &AppContext) {
    match &ctx.view.auth_notice {
        Some(Notice::Success(msg)) => println!("\n  {} {}\n", "✓".green(), msg.green()),
        Some(Notice::Error(msg)) => println!("\n  {} {}\n", "✗".red(), msg.red()),
        None => {}
    }
}

fn print_header(title: &str, detail: &str) {
    println!();
    println!("  {} {}  {}", "◉".cyan(), title.bold(), detail.dimmed());
    println!("  {}", "─".repeat(60).dimmed());
}

fn print_upload_result(ctx: &AppContext) {
    match &ctx.view.upload_result {
        Some(UploadResult::Success {
            document_id,
            filename,
        }) => {
            print_header("Upload Successful!", filename);
            println!("  {} {}", "Document ID:".dimmed(), document_id.cyan().bold());
            println!("  {} {}", "Filename:   ".dimmed(), filename);
            println!(
                "  {}",
                format!("Processing started. Track it with `docdesk status {}`.", document_id)
                    .dimmed()
            );
            println!();
        }
        Some(UploadResult::Failed(msg)) => {
            print_header("Upload Failed", "");
            println!("  {} {}", "✗".red(), msg.red());
            println!();
        }
        None => {}
    }
}

fn print_recent(ctx: &AppContext) {
    if ctx.recent_uploads.is_empty() {
        println!("\n  {} {}\n", "●".dimmed(), "No upload history".dimmed());
        return;
    }
    print_header(
        "Recent uploads",
        &format!("{} documents", ctx.recent_uploads.len()),
    );
    for upload in &ctx.recent_uploads {
        println!(
            "  {} {}  {}  {}",
            "│".dimmed(),
            upload.filename.bold(),
            format!("ID: {}...", upload.short_id()).cyan(),
            upload.upload_time.dimmed()
        );
    }
    println!();
}

fn print_search(ctx: &AppContext, query: &SearchQuery) {
    let title = if query.text.trim().is_empty() {
        "Search".to_string()
    } else {
        format!("Search: \"{}\"", query.text.trim())
    };
    match &ctx.view.search {
        SearchPanel::Empty => {
            println!(
                "\n  {} {}\n",
                "●".dimmed(),
                "No matching documents found".dimmed()
            );
        }
        SearchPanel::Failed(msg) => {
            println!("\n  {} {}\n", "✗".red(), format!("Search failed: {}", msg).red());
        }
        SearchPanel::Results(cards) => {
            print_header(&title, &format!("{} documents", cards.len()));
            for card in cards {
                println!("\n  {} {}", "┌".dimmed(), card.title.white().bold());
                println!(
                    "  {} {}  {}  {}  {}",
                    "│".dimmed(),
                    card.category.blue(),
                    card.file_type.magenta(),
                    card.document_type.dimmed(),
                    card.date.dimmed()
                );
                if !card.document_id.is_empty() {
                    println!("  {} {}", "│".dimmed(), format!("ID: {}", card.document_id).cyan());
                }
                println!("  {} {}", "│".dimmed(), card.summary);
                if !card.tags.is_empty() {
                    let tags: Vec<String> = card.tags.iter().map(|t| format!("#{}", t)).collect();
                    println!("  {} {}", "└".dimmed(), tags.join(" ").green());
                } else {
                    println!("  {}", "└".dimmed());
                }
            }
            println!();
        }
        SearchPanel::Idle | SearchPanel::Searching => {}
    }
}

fn print_status(ctx: &AppContext) {
    match &ctx.view.status {
        StatusPanel::Empty => {
            println!("\n  {} {}\n", "●".dimmed(), "No status records found".dimmed());
        }
        StatusPanel::Failed(msg) => {
            println!("\n  {} {}\n", "✗".red(), msg.red());
        }
        StatusPanel::History { current, timeline } => {
            print_header(
                &format!("Current Status: {}", current.label),
                &current.when,
            );
            if !current.message.is_empty() {
                println!("  {}", current.message);
            }
            println!("\n  {}", "Status History".bold());
            for (i, entry) in timeline.iter().enumerate() {
                let connector = if i + 1 == timeline.len() { "└" } else { "│" };
                println!(
                    "  {} {:<24} {}  {}",
                    connector.dimmed(),
                    entry.label.cyan(),
                    entry.when.dimmed(),
                    entry.message
                );
            }
            println!();
        }
        StatusPanel::Idle | StatusPanel::Checking => {}
    }
}
