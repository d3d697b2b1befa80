use anyhow::{bail, Result};
use leaddesk_core::records::{FollowUp, Lead};
use leaddesk_core::validate::ValidationErrors;
use leaddesk_core::views::{self, DashboardStats, Page, UPCOMING_WINDOW_DAYS};

pub const UNKNOWN_LEAD: &str = "Unknown Lead";
const EMPTY_CELL: &str = "—";
const NOTES_PREVIEW_CHARS: usize = 80;
const DATE_ONLY: &str = "%Y-%m-%d";

pub fn print_lead_page(page: &Page<&Lead>) {
    println!("Lead List ({})", page.total);
    if page.items.is_empty() {
        println!("No leads yet");
        return;
    }
    for (idx, lead) in page.items.iter().enumerate() {
        println!("{:>3}. {}", page.start + idx, render_lead_row(lead));
    }
    println!("Showing {} - {} of {}", page.start, page.end, page.total);
    println!("page {} / {}", page.page, page.page_count);
}

pub fn print_follow_up_page(page: &Page<&FollowUp>, leads: &[Lead]) {
    println!("Follow-ups ({})", page.total);
    if page.items.is_empty() {
        println!("No follow-ups yet");
        return;
    }
    for follow_up in &page.items {
        println!("{}", render_follow_up_row(follow_up, leads));
    }
    println!("Showing {} - {} of {}", page.start, page.end, page.total);
    println!("page {} / {}", page.page, page.page_count);
}

pub fn print_dashboard(
    stats: &DashboardStats,
    recent: &[&Lead],
    upcoming: &[&FollowUp],
    leads: &[Lead],
) {
    println!("Total Leads: {}", stats.total_leads);
    println!("Pending Follow-ups: {}", stats.pending_follow_ups);

    println!();
    println!("Status Breakdown");
    if stats.total_leads == 0 {
        println!("No leads yet");
    } else {
        for (status, count) in &stats.status_counts {
            if *count > 0 {
                println!("{status}: {count}");
            }
        }
    }

    println!();
    println!("Recent Leads");
    if recent.is_empty() {
        println!("No leads yet");
    } else {
        for lead in recent {
            println!("{}", render_lead_row(lead));
        }
    }

    println!();
    println!("Upcoming Follow-ups ({UPCOMING_WINDOW_DAYS} days)");
    if upcoming.is_empty() {
        println!("No follow-ups in the next {UPCOMING_WINDOW_DAYS} days.");
    } else {
        for follow_up in upcoming {
            println!("{}", render_follow_up_row(follow_up, leads));
        }
    }
}

pub fn fail_validation(errors: ValidationErrors) -> Result<()> {
    for (field, message) in errors.iter() {
        eprintln!("{field}: {message}");
    }
    bail!("validation failed")
}

fn render_lead_row(lead: &Lead) -> String {
    let phone = if lead.phone.is_empty() {
        EMPTY_CELL
    } else {
        lead.phone.as_str()
    };
    format!(
        "{} <{}> {} [{}] created {} ({})",
        lead.name,
        lead.email,
        phone,
        lead.status,
        lead.created_at.format(DATE_ONLY),
        lead.id
    )
}

fn render_follow_up_row(follow_up: &FollowUp, leads: &[Lead]) -> String {
    let lead_name = views::find_lead(leads, &follow_up.lead_id)
        .map(|lead| lead.name.as_str())
        .unwrap_or(UNKNOWN_LEAD);
    let mut row = format!(
        "{} [{}] {} {}",
        follow_up.id,
        follow_up.status,
        date_cell(follow_up),
        lead_name
    );
    let notes = notes_preview(&follow_up.notes);
    if !notes.is_empty() {
        row.push_str(&format!(" - {notes}"));
    }
    row
}

fn date_cell(follow_up: &FollowUp) -> String {
    match views::effective_date(follow_up) {
        Some(date) => date.format(DATE_ONLY).to_string(),
        None => EMPTY_CELL.to_string(),
    }
}

fn notes_preview(notes: &str) -> String {
    let trimmed = notes.trim();
    let mut preview: String = trimmed.chars().take(NOTES_PREVIEW_CHARS).collect();
    if trimmed.chars().count() > NOTES_PREVIEW_CHARS {
        preview.push('…');
    }
    preview
}
