use crate::app::{parse_page_size, App};
use crate::render;
use anyhow::Result;
use clap::{Args, Subcommand};
use leaddesk_core::records::{LeadDraft, LeadStatus};
use leaddesk_core::views::{self, DEFAULT_PAGE_SIZE};

#[derive(Subcommand)]
pub enum LeadCommands {
    /// Add a lead
    Add(LeadAddArgs),
    /// Update an existing lead
    Update(LeadUpdateArgs),
    /// Remove a lead
    #[command(alias = "rm")]
    Remove {
        /// Lead id to remove.
        id: String,
    },
    /// List leads, optionally filtered by name or email
    List(LeadListArgs),
}

#[derive(Args, Debug)]
pub struct LeadFieldArgs {
    /// Full name.
    #[arg(long)]
    pub name: String,

    /// Email address, unique across leads.
    #[arg(long)]
    pub email: String,

    /// Phone number, 7 to 15 digits when given.
    #[arg(long, default_value = "")]
    pub phone: String,

    /// Lead status (new|contacted|qualified|lost).
    #[arg(long, default_value = "new")]
    pub status: LeadStatus,

    /// Free-form notes.
    #[arg(long, default_value = "")]
    pub notes: String,
}

impl LeadFieldArgs {
    fn into_draft(self) -> LeadDraft {
        LeadDraft {
            name: self.name,
            email: self.email,
            phone: self.phone,
            status: self.status,
            notes: self.notes,
        }
    }
}

#[derive(Args, Debug)]
pub struct LeadAddArgs {
    #[command(flatten)]
    pub fields: LeadFieldArgs,
}

#[derive(Args, Debug)]
pub struct LeadUpdateArgs {
    /// Lead id to update.
    pub id: String,

    #[command(flatten)]
    pub fields: LeadFieldArgs,
}

#[derive(Args, Debug)]
pub struct LeadListArgs {
    /// Page number, clamped to the available range.
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page (5|10|25).
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = parse_page_size)]
    pub page_size: usize,

    /// Print the page as JSON instead of text rows.
    #[arg(long)]
    pub json: bool,

    /// Optional text query (matches name/email).
    #[arg(value_name = "QUERY", num_args = 0..)]
    pub query: Vec<String>,
}

pub fn handle_lead_command(app: &mut App, command: LeadCommands) -> Result<()> {
    match command {
        LeadCommands::Add(args) => handle_add(app, args),
        LeadCommands::Update(args) => handle_update(app, args),
        LeadCommands::Remove { id } => handle_remove(app, &id),
        LeadCommands::List(args) => handle_list(app, args),
    }
}

fn handle_add(app: &mut App, args: LeadAddArgs) -> Result<()> {
    app.begin_add_lead();
    match app.leads.add(args.fields.into_draft()) {
        Ok(lead) => {
            println!("Added lead {} ({})", lead.name, lead.id);
            Ok(())
        }
        Err(errors) => render::fail_validation(errors),
    }
}

fn handle_update(app: &mut App, args: LeadUpdateArgs) -> Result<()> {
    app.begin_edit_lead(&args.id);
    let outcome = app.leads.update(&args.id, args.fields.into_draft());
    app.end_edit_lead();
    match outcome {
        Ok(Some(lead)) => {
            println!("Updated lead {} ({})", lead.name, lead.id);
            Ok(())
        }
        Ok(None) => {
            println!("No lead matched id {}", args.id);
            Ok(())
        }
        Err(errors) => render::fail_validation(errors),
    }
}

fn handle_remove(app: &mut App, id: &str) -> Result<()> {
    if app.leads.delete(id) {
        println!("Removed lead {id}");
    } else {
        println!("No lead matched id {id}");
    }
    Ok(())
}

fn handle_list(app: &App, args: LeadListArgs) -> Result<()> {
    let query = app.search_leads(&args.query.join(" "));
    let page = views::lead_page(app.leads.leads(), &query, args.page, args.page_size);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        render::print_lead_page(&page);
    }
    Ok(())
}
