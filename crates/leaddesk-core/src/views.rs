use crate::records::{FollowUp, FollowUpStatus, Lead, LeadStatus};
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

pub const PAGE_SIZES: [usize; 3] = [5, 10, 25];
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const UPCOMING_WINDOW_DAYS: i64 = 7;
pub const DASHBOARD_PREVIEW_LIMIT: usize = 5;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Date,
    Status,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Date => "date",
            SortField::Status => "status",
        }
    }
}

impl Default for SortField {
    fn default() -> Self {
        Self::Date
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_lowercase().as_str() {
            "date" => Ok(SortField::Date),
            "status" => Ok(SortField::Status),
            other => Err(format!("Unknown sort field: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl Default for SortDirection {
    fn default() -> Self {
        Self::Desc
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(format!("Unknown sort order: {other}")),
        }
    }
}

pub fn filter_leads<'a>(leads: &'a [Lead], query: &str) -> Vec<&'a Lead> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return leads.iter().collect();
    }
    leads
        .iter()
        .filter(|lead| {
            lead.name.to_lowercase().contains(&needle)
                || lead.email.to_lowercase().contains(&needle)
        })
        .collect()
}

pub fn filter_follow_ups<'a>(follow_ups: &'a [FollowUp], query: &str) -> Vec<&'a FollowUp> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return follow_ups.iter().collect();
    }
    follow_ups
        .iter()
        .filter(|follow_up| follow_up.notes.to_lowercase().contains(&needle))
        .collect()
}

// Due date when set and parseable; the createdAt calendar date when the due
// date is absent; None when the due date is present but malformed.
pub fn effective_date(follow_up: &FollowUp) -> Option<NaiveDate> {
    match follow_up.date.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => NaiveDate::parse_from_str(raw, DATE_FORMAT).ok(),
        _ => Some(follow_up.created_at.date_naive()),
    }
}

pub fn in_upcoming_window(follow_up: &FollowUp, today: NaiveDate) -> bool {
    match effective_date(follow_up) {
        Some(date) => {
            let diff = (date - today).num_days();
            (0..=UPCOMING_WINDOW_DAYS).contains(&diff)
        }
        None => false,
    }
}

pub fn upcoming_follow_ups<'a>(
    follow_ups: &'a [FollowUp],
    today: NaiveDate,
) -> Vec<&'a FollowUp> {
    follow_ups
        .iter()
        .filter(|follow_up| in_upcoming_window(follow_up, today))
        .collect()
}

// Stable in both directions: reversing the comparator leaves equal keys in
// their original relative order.
pub fn sort_follow_ups(rows: &mut [&FollowUp], field: SortField, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let ordering = match field {
            SortField::Date => effective_date(a).cmp(&effective_date(b)),
            SortField::Status => a
                .status
                .as_str()
                .to_lowercase()
                .cmp(&b.status.as_str().to_lowercase()),
        };
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
    pub start: usize,
    pub end: usize,
}

pub fn paginate<T>(rows: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    let size = page_size.max(1);
    let total = rows.len();
    let page_count = total.div_ceil(size).max(1);
    let page = page.clamp(1, page_count);
    let offset = (page - 1) * size;
    let items: Vec<T> = rows.into_iter().skip(offset).take(size).collect();
    let start = if items.is_empty() { 0 } else { offset + 1 };
    let end = offset + items.len();
    Page {
        items,
        page,
        page_count,
        total,
        start,
        end,
    }
}

pub fn find_lead<'a>(leads: &'a [Lead], lead_id: &str) -> Option<&'a Lead> {
    leads.iter().find(|lead| lead.id == lead_id)
}

#[derive(Debug, Clone, PartialEq)]
pub struct FollowUpQuery {
    pub query: String,
    pub upcoming_only: bool,
    pub sort: SortField,
    pub direction: SortDirection,
    pub page: usize,
    pub page_size: usize,
}

impl Default for FollowUpQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            upcoming_only: true,
            sort: SortField::Date,
            direction: SortDirection::Desc,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

pub fn follow_up_page<'a>(
    follow_ups: &'a [FollowUp],
    params: &FollowUpQuery,
    today: NaiveDate,
) -> Page<&'a FollowUp> {
    let mut rows = filter_follow_ups(follow_ups, &params.query);
    if params.upcoming_only {
        rows.retain(|follow_up| in_upcoming_window(follow_up, today));
    }
    sort_follow_ups(&mut rows, params.sort, params.direction);
    paginate(rows, params.page, params.page_size)
}

pub fn lead_page<'a>(
    leads: &'a [Lead],
    query: &str,
    page: usize,
    page_size: usize,
) -> Page<&'a Lead> {
    paginate(filter_leads(leads, query), page, page_size)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_leads: usize,
    pub status_counts: Vec<(LeadStatus, usize)>,
    pub pending_follow_ups: usize,
}

pub fn dashboard_stats(leads: &[Lead], follow_ups: &[FollowUp]) -> DashboardStats {
    let status_counts = LeadStatus::ALL
        .into_iter()
        .map(|status| {
            let count = leads.iter().filter(|lead| lead.status == status).count();
            (status, count)
        })
        .collect();
    let pending_follow_ups = follow_ups
        .iter()
        .filter(|follow_up| follow_up.status == FollowUpStatus::Pending)
        .count();
    DashboardStats {
        total_leads: leads.len(),
        status_counts,
        pending_follow_ups,
    }
}

pub fn recent_leads<'a>(leads: &'a [Lead], limit: usize) -> Vec<&'a Lead> {
    let mut rows: Vec<&Lead> = leads.iter().collect();
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    rows.truncate(limit);
    rows
}

pub fn upcoming_preview<'a>(
    follow_ups: &'a [FollowUp],
    today: NaiveDate,
    limit: usize,
) -> Vec<&'a FollowUp> {
    let mut rows = upcoming_follow_ups(follow_ups, today);
    sort_follow_ups(&mut rows, SortField::Date, SortDirection::Asc);
    rows.truncate(limit);
    rows
}
