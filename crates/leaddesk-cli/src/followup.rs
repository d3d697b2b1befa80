use crate::app::{parse_page_size, today_local, App};
use crate::render;
use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use leaddesk_core::records::{FollowUpDraft, FollowUpStatus};
use leaddesk_core::views::{self, FollowUpQuery, SortDirection, SortField, DEFAULT_PAGE_SIZE};

#[derive(Subcommand)]
pub enum FollowUpCommands {
    /// Add a follow-up for a lead
    Add(FollowUpAddArgs),
    /// Update an existing follow-up
    Update(FollowUpUpdateArgs),
    /// Remove a follow-up
    #[command(alias = "rm")]
    Remove {
        /// Follow-up id to remove.
        id: String,
    },
    /// List follow-ups due in the next seven days
    List(FollowUpListArgs),
}

#[derive(Args, Debug)]
pub struct FollowUpFieldArgs {
    /// Lead id this follow-up belongs to.
    #[arg(long = "lead")]
    pub lead_id: String,

    /// Due date (YYYY-MM-DD); the creation date stands in when omitted.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Follow-up status (pending|done|reschedule).
    #[arg(long, default_value = "pending")]
    pub status: FollowUpStatus,

    /// Free-form notes.
    #[arg(long, default_value = "")]
    pub notes: String,
}

impl FollowUpFieldArgs {
    fn into_draft(self) -> FollowUpDraft {
        FollowUpDraft {
            lead_id: self.lead_id,
            date: self.date.map(|date| date.to_string()),
            status: self.status,
            notes: self.notes,
        }
    }
}

#[derive(Args, Debug)]
pub struct FollowUpAddArgs {
    #[command(flatten)]
    pub fields: FollowUpFieldArgs,
}

#[derive(Args, Debug)]
pub struct FollowUpUpdateArgs {
    /// Follow-up id to update.
    pub id: String,

    #[command(flatten)]
    pub fields: FollowUpFieldArgs,
}

#[derive(Args, Debug)]
pub struct FollowUpListArgs {
    /// Include every follow-up, not just the next seven days.
    #[arg(long)]
    pub all: bool,

    /// Sort field (date|status).
    #[arg(long, default_value_t = SortField::Date)]
    pub sort: SortField,

    /// Sort order (asc|desc).
    #[arg(long, default_value_t = SortDirection::Desc)]
    pub order: SortDirection,

    /// Page number, clamped to the available range.
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page (5|10|25).
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = parse_page_size)]
    pub page_size: usize,

    /// Evaluate the seven-day window against this date instead of today.
    #[arg(long, value_name = "DATE")]
    pub today: Option<NaiveDate>,

    /// Print the page as JSON instead of text rows.
    #[arg(long)]
    pub json: bool,

    /// Optional text query (matches notes).
    #[arg(value_name = "QUERY", num_args = 0..)]
    pub query: Vec<String>,
}

pub fn handle_follow_up_command(app: &mut App, command: FollowUpCommands) -> Result<()> {
    match command {
        FollowUpCommands::Add(args) => handle_add(app, args),
        FollowUpCommands::Update(args) => handle_update(app, args),
        FollowUpCommands::Remove { id } => handle_remove(app, &id),
        FollowUpCommands::List(args) => handle_list(app, args),
    }
}

fn ensure_lead_exists(app: &App, lead_id: &str) -> Result<()> {
    let lead_id = lead_id.trim();
    if !lead_id.is_empty() && views::find_lead(app.leads.leads(), lead_id).is_none() {
        bail!("no lead found with id {lead_id}");
    }
    Ok(())
}

fn handle_add(app: &mut App, args: FollowUpAddArgs) -> Result<()> {
    ensure_lead_exists(app, &args.fields.lead_id)?;
    match app.follow_ups.add(args.fields.into_draft()) {
        Ok(follow_up) => {
            println!("Added follow-up {}", follow_up.id);
            Ok(())
        }
        Err(errors) => render::fail_validation(errors),
    }
}

fn handle_update(app: &mut App, args: FollowUpUpdateArgs) -> Result<()> {
    // Updates skip the lead lookup; a follow-up may outlive its lead.
    match app.follow_ups.update(&args.id, args.fields.into_draft()) {
        Ok(Some(follow_up)) => {
            println!("Updated follow-up {}", follow_up.id);
            Ok(())
        }
        Ok(None) => {
            println!("No follow-up matched id {}", args.id);
            Ok(())
        }
        Err(errors) => render::fail_validation(errors),
    }
}

fn handle_remove(app: &mut App, id: &str) -> Result<()> {
    if app.follow_ups.delete(id) {
        println!("Removed follow-up {id}");
    } else {
        println!("No follow-up matched id {id}");
    }
    Ok(())
}

fn handle_list(app: &App, args: FollowUpListArgs) -> Result<()> {
    let today = args.today.unwrap_or_else(today_local);
    let params = FollowUpQuery {
        query: args.query.join(" "),
        upcoming_only: !args.all,
        sort: args.sort,
        direction: args.order,
        page: args.page,
        page_size: args.page_size,
    };
    let page = views::follow_up_page(app.follow_ups.follow_ups(), &params, today);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        render::print_follow_up_page(&page, app.leads.leads());
    }
    Ok(())
}
