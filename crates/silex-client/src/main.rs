//! `silex` — command-line front end for the Silex review service.
//!
//! Drives the same components the landing page uses: the public feed, the
//! one-shot submission widget, the admin moderation panel, and the lead
//! form.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use silex_client::api::{HttpApi, ReviewsApi};
use silex_client::endpoints::Endpoints;
use silex_client::error::{PanelError, SubmitError};
use silex_client::feed::ReviewFeed;
use silex_client::lead::LeadForm;
use silex_client::panel::AdminPanel;
use silex_client::review::Review;
use silex_client::submission::SubmissionWidget;
use silex_core::review::{ModerationAction, ReviewState};

// ── ANSI color helpers ───────────────────────────────────────────────

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";

// ── CLI structure ────────────────────────────────────────────────────

/// Silex — reviews and leads for the Silex block landing page.
#[derive(Parser)]
#[command(
    name = "silex",
    version,
    about = "Silex CLI — read and submit reviews, moderate them, send leads",
    long_about = None,
    after_help = format!(
        "{DIM}Environment variables:{RESET}\n  \
         SILEX_ADDR            Server address (default: http://127.0.0.1:8300)\n  \
         SILEX_ADMIN_PASSWORD  Admin password for `silex admin`\n\n\
         {DIM}Examples:{RESET}\n  \
         silex reviews\n  \
         silex submit --author 'Иван' --text 'Отличные блоки' --stars 5\n  \
         silex admin list\n  \
         silex admin approve 7\n  \
         silex lead --name 'Анна' --phone '+7 900 000-00-00'"
    ),
)]
struct Cli {
    /// Silex server address.
    #[arg(long, env = "SILEX_ADDR", default_value = "http://127.0.0.1:8300")]
    addr: String,

    /// JSON endpoint table (`reviews`, `admin-reviews`, `send-email`); overrides --addr.
    #[arg(long)]
    endpoints: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the public review feed.
    Reviews,
    /// Submit a review for moderation.
    Submit {
        /// Your name.
        #[arg(long, default_value = "")]
        author: String,
        /// Review text.
        #[arg(long, default_value = "")]
        text: String,
        /// Rating from 1 to 5.
        #[arg(long, default_value = "0")]
        stars: i64,
    },
    /// Moderate reviews (requires the admin password).
    Admin {
        /// Admin password.
        #[arg(long, env = "SILEX_ADMIN_PASSWORD", hide_env_values = true, global = true)]
        password: Option<String>,
        #[command(subcommand)]
        action: AdminCommands,
    },
    /// Send a call-back request.
    Lead {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        message: String,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// List pending and approved reviews.
    List,
    /// Publish a review.
    Approve { id: u64 },
    /// Return a review to pending.
    Reject { id: u64 },
    /// Delete a review permanently.
    Delete { id: u64 },
}

// ── Output helpers ───────────────────────────────────────────────────

fn header(icon: &str, title: &str) {
    println!("{BOLD}{CYAN}{icon} {title}{RESET}");
    println!("{DIM}─────────────────────────────────────────{RESET}");
}

fn success(msg: &str) {
    println!("{GREEN}{BOLD}✓{RESET} {msg}");
}

fn warning(msg: &str) {
    println!("{YELLOW}{BOLD}!{RESET} {msg}");
}

fn stars(count: u8) -> String {
    let filled = usize::from(count.min(5));
    format!("{YELLOW}{}{DIM}{}{RESET}", "★".repeat(filled), "☆".repeat(5 - filled))
}

fn print_review_line(review: &Review) {
    let state = review.state();
    let label = match state {
        ReviewState::Pending => format!("{YELLOW}pending{RESET}"),
        ReviewState::Approved => format!("{GREEN}approved{RESET}"),
    };
    let actions = state
        .available_actions()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" | ");
    println!(
        "  {BOLD}#{:<5}{RESET} {WHITE}{}{RESET} {} {label} {DIM}{}{RESET}",
        review.id,
        review.author,
        stars(review.stars),
        review.created_at.display(),
    );
    println!("         {DIM}{}{RESET}", review.text);
    println!("         {DIM}[{actions}]{RESET}");
}

// ── Command dispatch ─────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("SILEX_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!();
            eprintln!("  {RED}{BOLD}✗ Error:{RESET} {e:#}");
            eprintln!();
            ExitCode::FAILURE
        }
    }
}

fn load_endpoints(cli: &Cli) -> Result<Endpoints> {
    match &cli.endpoints {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Endpoints::from_json(&json).context("failed to load endpoint table")
        }
        None => Ok(Endpoints::from_base(&cli.addr)),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let endpoints = load_endpoints(&cli)?;
    let api: Arc<dyn ReviewsApi> = Arc::new(HttpApi::new(endpoints)?);

    match cli.command {
        Commands::Reviews => cmd_reviews(api).await,
        Commands::Submit {
            author,
            text,
            stars,
        } => cmd_submit(api, author, text, stars).await,
        Commands::Admin { password, action } => {
            let Some(password) = password else {
                bail!("admin password required (--password or SILEX_ADMIN_PASSWORD)");
            };
            cmd_admin(api, &password, action).await
        }
        Commands::Lead {
            name,
            phone,
            message,
        } => cmd_lead(api, &name, &phone, &message).await,
    }
}

async fn cmd_reviews(api: Arc<dyn ReviewsApi>) -> Result<()> {
    let feed = ReviewFeed::new(api).load().await;

    println!();
    header("💬", "Отзывы клиентов");
    for item in &feed {
        let rating = item.stars.map(stars).unwrap_or_default();
        println!("  {WHITE}{BOLD}{}{RESET} {rating}", item.author);
        if !item.company.is_empty() {
            println!("  {DIM}{}{RESET}", item.company);
        }
        println!("  \"{}\"", item.text);
        println!();
    }
    Ok(())
}

async fn cmd_submit(api: Arc<dyn ReviewsApi>, author: String, text: String, rating: i64) -> Result<()> {
    let widget = SubmissionWidget::new(api);
    widget.set_stars(rating)?;
    widget.set_author(author)?;
    widget.set_text(text)?;

    match widget.submit().await {
        Ok(()) => {
            success("Спасибо за отзыв! Он появится после проверки модератором.");
            Ok(())
        }
        Err(SubmitError::Incomplete) => {
            bail!("review is incomplete: --stars (1-5), --author, and --text are required")
        }
        Err(e) => Err(e.into()),
    }
}

async fn cmd_admin(api: Arc<dyn ReviewsApi>, password: &str, command: AdminCommands) -> Result<()> {
    let mut panel = AdminPanel::new(api);
    if let Err(e) = panel.login(password).await {
        match e {
            PanelError::WrongPassword | PanelError::Unavailable(_) => {
                let message = panel.error().unwrap_or_default();
                return Err(anyhow::Error::new(e).context(message));
            }
            PanelError::NotAuthenticated => return Err(e.into()),
        }
    }

    if let Some(error) = panel.load_error() {
        warning(&format!("could not load reviews: {error}"));
    }

    let (id, action) = match command {
        AdminCommands::List => {
            print_panel(&panel);
            return Ok(());
        }
        AdminCommands::Approve { id } => (id, ModerationAction::Approve),
        AdminCommands::Reject { id } => (id, ModerationAction::Reject),
        AdminCommands::Delete { id } => (id, ModerationAction::Delete),
    };

    let report = panel.perform_action(id, action).await?;
    if let Some(error) = report.error {
        bail!("{action} #{id} failed: {error}");
    }
    success(&format!("{action} #{id}"));
    if let Some(error) = report.reload_error {
        warning(&format!("list below may be stale: {error}"));
    }
    println!();
    print_panel(&panel);
    Ok(())
}

fn print_panel(panel: &AdminPanel) {
    let pending = panel.pending();
    let approved = panel.approved();

    println!();
    header("⏳", &format!("На модерации ({})", pending.len()));
    for review in &pending {
        print_review_line(review);
    }
    println!();
    header("✅", &format!("Одобренные ({})", approved.len()));
    for review in &approved {
        print_review_line(review);
    }
    println!();
}

async fn cmd_lead(api: Arc<dyn ReviewsApi>, name: &str, phone: &str, message: &str) -> Result<()> {
    let outcome = LeadForm::new(api).send(name, phone, message).await;
    if !outcome.ok {
        bail!("{}", outcome.message);
    }
    success(outcome.message);
    Ok(())
}
