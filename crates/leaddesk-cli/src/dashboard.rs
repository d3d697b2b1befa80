use crate::app::{today_local, App};
use crate::render;
use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use leaddesk_core::views::{self, DASHBOARD_PREVIEW_LIMIT};

#[derive(Args, Debug)]
pub struct DashboardArgs {
    /// Evaluate the seven-day window against this date instead of today.
    #[arg(long, value_name = "DATE")]
    pub today: Option<NaiveDate>,
}

pub fn handle_dashboard_command(app: &App, args: DashboardArgs) -> Result<()> {
    let today = args.today.unwrap_or_else(today_local);
    let leads = app.leads.leads();
    let follow_ups = app.follow_ups.follow_ups();

    let stats = views::dashboard_stats(leads, follow_ups);
    let recent = views::recent_leads(leads, DASHBOARD_PREVIEW_LIMIT);
    let upcoming = views::upcoming_preview(follow_ups, today, DASHBOARD_PREVIEW_LIMIT);
    render::print_dashboard(&stats, &recent, &upcoming, leads);
    Ok(())
}
