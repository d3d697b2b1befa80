mod app;
mod dashboard;
mod followup;
mod lead;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "leaddesk")]
#[command(about = "Lead and follow-up tracker", long_about = None)]
struct Cli {
    /// Directory holding the JSON data files.
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show totals, recent leads and upcoming follow-ups
    Dashboard(dashboard::DashboardArgs),
    /// Manage leads
    Lead {
        #[command(subcommand)]
        action: lead::LeadCommands,
    },
    /// Manage follow-ups
    #[command(alias = "fu")]
    Followup {
        #[command(subcommand)]
        action: followup::FollowUpCommands,
    },
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let mut app = app::App::open(cli.data_dir);

    match cli.command {
        Commands::Dashboard(args) => dashboard::handle_dashboard_command(&app, args),
        Commands::Lead { action } => lead::handle_lead_command(&mut app, action),
        Commands::Followup { action } => followup::handle_follow_up_command(&mut app, action),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}
