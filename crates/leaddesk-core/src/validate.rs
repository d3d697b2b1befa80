use crate::records::{normalize_email, FollowUpDraft, Lead, LeadDraft};
use regex::Regex;
use std::collections::btree_map;
use std::collections::BTreeMap;
use thiserror::Error;

const EMAIL_PATTERN: &str = r"^\S+@\S+\.\S+$";
const PHONE_MIN_DIGITS: usize = 7;
const PHONE_MAX_DIGITS: usize = 15;

#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("validation failed: {}", render(.errors))]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &str, message: &str) {
        self.errors.insert(field.to_string(), message.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.errors.iter()
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn render(errors: &BTreeMap<String, String>) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

// The duplicate check excludes `exclude_id` so a lead can keep its own email
// across an update.
pub fn validate_lead(
    draft: &LeadDraft,
    existing: &[Lead],
    exclude_id: Option<&str>,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if draft.name.trim().is_empty() {
        errors.insert("name", "Name is required");
    }

    let email = draft.email.trim();
    if email.is_empty() {
        errors.insert("email", "Email is required");
    } else {
        let pattern = Regex::new(EMAIL_PATTERN).expect("valid email pattern");
        if !pattern.is_match(email) {
            errors.insert("email", "Invalid email");
        }
    }

    let normalized = normalize_email(&draft.email);
    if !normalized.is_empty() {
        let taken = existing.iter().any(|lead| {
            normalize_email(&lead.email) == normalized
                && exclude_id.map_or(true, |id| lead.id != id)
        });
        if taken {
            errors.insert("email", "A lead with this email already exists");
        }
    }

    if !draft.phone.trim().is_empty() {
        let digits = draft.phone.chars().filter(|c| c.is_ascii_digit()).count();
        if !(PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits) {
            errors.insert("phone", "Phone should be 7-15 digits");
        }
    }

    errors
}

pub fn validate_follow_up(draft: &FollowUpDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    if draft.lead_id.trim().is_empty() {
        errors.insert("leadId", "Please select a lead.");
    }
    errors
}
