use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

const UID_SUFFIX_LEN: usize = 6;
const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUp {
    pub id: String,
    pub lead_id: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: FollowUpStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: LeadStatus,
    pub notes: String,
}

impl LeadDraft {
    pub fn materialize(self, id: String, created_at: DateTime<Utc>) -> Lead {
        Lead {
            id,
            name: self.name.trim().to_string(),
            email: normalize_email(&self.email),
            phone: self.phone.trim().to_string(),
            status: self.status,
            notes: self.notes.trim().to_string(),
            created_at,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FollowUpDraft {
    pub lead_id: String,
    pub date: Option<String>,
    pub notes: String,
    pub status: FollowUpStatus,
}

impl FollowUpDraft {
    pub fn materialize(self, id: String, created_at: DateTime<Utc>) -> FollowUp {
        let date = self
            .date
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty());
        FollowUp {
            id,
            lead_id: self.lead_id.trim().to_string(),
            date,
            notes: self.notes,
            status: self.status,
            created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Lost,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 4] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::Qualified,
        LeadStatus::Lost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::Qualified => "Qualified",
            LeadStatus::Lost => "Lost",
        }
    }
}

impl Default for LeadStatus {
    fn default() -> Self {
        Self::New
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_lowercase();
        match normalized.as_str() {
            "new" => Ok(LeadStatus::New),
            "contacted" => Ok(LeadStatus::Contacted),
            "qualified" => Ok(LeadStatus::Qualified),
            "lost" => Ok(LeadStatus::Lost),
            other => Err(format!("Unknown lead status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FollowUpStatus {
    Pending,
    Done,
    Reschedule,
}

impl FollowUpStatus {
    pub const ALL: [FollowUpStatus; 3] = [
        FollowUpStatus::Pending,
        FollowUpStatus::Done,
        FollowUpStatus::Reschedule,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FollowUpStatus::Pending => "Pending",
            FollowUpStatus::Done => "Done",
            FollowUpStatus::Reschedule => "Reschedule",
        }
    }
}

impl Default for FollowUpStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for FollowUpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FollowUpStatus {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_lowercase();
        match normalized.as_str() {
            "pending" => Ok(FollowUpStatus::Pending),
            "done" => Ok(FollowUpStatus::Done),
            "reschedule" | "rescheduled" => Ok(FollowUpStatus::Reschedule),
            other => Err(format!("Unknown follow-up status: {other}")),
        }
    }
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

// Base-36 millis plus random base-36 suffix. Unique in practice for a
// single-writer, low-volume store; no formal collision guarantee.
pub fn uid() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u128;
    let mut id = base36(millis);
    let mut entropy = Uuid::new_v4().as_u128();
    for _ in 0..UID_SUFFIX_LEN {
        id.push(BASE36_ALPHABET[(entropy % 36) as usize] as char);
        entropy /= 36;
    }
    id
}

fn base36(mut value: u128) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = String::new();
    while value > 0 {
        digits.push(BASE36_ALPHABET[(value % 36) as usize] as char);
        value /= 36;
    }
    digits.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn uid_uses_base36_alphabet() {
        let id = uid();
        assert!(id.len() > UID_SUFFIX_LEN);
        assert!(id
            .bytes()
            .all(|byte| BASE36_ALPHABET.contains(&byte)));
    }

    #[test]
    fn uid_is_distinct_across_calls() {
        let ids: HashSet<String> = (0..200).map(|_| uid()).collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn base36_renders_known_values() {
        assert_eq!(base36(0), "0");
        assert_eq!(base36(35), "z");
        assert_eq!(base36(36), "10");
        assert_eq!(base36(1_700_000_000_000), "loyw3v28");
    }

    #[test]
    fn base36_orders_same_length_values_lexically() {
        // Keeps uid prefixes sortable by creation time.
        assert!(base36(1_700_000_000_000) < base36(1_700_000_000_001));
        assert!(base36(1_700_000_000_000) < base36(1_799_999_999_999));
    }

    #[test]
    fn lead_serializes_with_camel_case_fields() {
        let lead = LeadDraft {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            ..Default::default()
        }
        .materialize("lead-1".to_string(), ts());
        let json = serde_json::to_string(&lead).expect("serialize lead");
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"status\":\"New\""));
    }

    #[test]
    fn follow_up_serializes_with_camel_case_fields() {
        let follow_up = FollowUpDraft {
            lead_id: "lead-1".to_string(),
            date: Some("2024-06-12".to_string()),
            ..Default::default()
        }
        .materialize("fu-1".to_string(), ts());
        let json = serde_json::to_string(&follow_up).expect("serialize follow-up");
        assert!(json.contains("\"leadId\":\"lead-1\""));
        assert!(json.contains("\"status\":\"Pending\""));
    }

    #[test]
    fn lead_materialize_trims_fields_and_lowercases_email() {
        let lead = LeadDraft {
            name: "  Ada Lovelace  ".to_string(),
            email: " ADA@Example.COM ".to_string(),
            phone: " 0123 456 789 ".to_string(),
            status: LeadStatus::Contacted,
            notes: " first contact ".to_string(),
        }
        .materialize("lead-1".to_string(), ts());
        assert_eq!(lead.name, "Ada Lovelace");
        assert_eq!(lead.email, "ada@example.com");
        assert_eq!(lead.phone, "0123 456 789");
        assert_eq!(lead.notes, "first contact");
        assert_eq!(lead.created_at, ts());
    }

    #[test]
    fn follow_up_materialize_drops_blank_dates() {
        let blank = FollowUpDraft {
            lead_id: "lead-1".to_string(),
            date: Some("   ".to_string()),
            ..Default::default()
        }
        .materialize("fu-1".to_string(), ts());
        assert_eq!(blank.date, None);

        let padded = FollowUpDraft {
            lead_id: "lead-1".to_string(),
            date: Some(" 2024-06-12 ".to_string()),
            ..Default::default()
        }
        .materialize("fu-2".to_string(), ts());
        assert_eq!(padded.date.as_deref(), Some("2024-06-12"));
    }

    #[test]
    fn statuses_round_trip_through_from_str() {
        for status in LeadStatus::ALL {
            let parsed: LeadStatus = status.as_str().parse().expect("parse lead status");
            assert_eq!(parsed, status);
        }
        for status in FollowUpStatus::ALL {
            let parsed: FollowUpStatus =
                status.as_str().parse().expect("parse follow-up status");
            assert_eq!(parsed, status);
        }
        assert_eq!("CONTACTED".parse::<LeadStatus>(), Ok(LeadStatus::Contacted));
        assert!("archived".parse::<LeadStatus>().is_err());
        assert!("later".parse::<FollowUpStatus>().is_err());
    }

    #[test]
    fn deserialize_tolerates_missing_optional_fields() {
        let lead: Lead = serde_json::from_str(
            r#"{"id":"l1","name":"Ada","email":"ada@example.com","createdAt":"2024-06-10T12:00:00Z"}"#,
        )
        .expect("deserialize lead");
        assert_eq!(lead.phone, "");
        assert_eq!(lead.status, LeadStatus::New);

        let follow_up: FollowUp = serde_json::from_str(
            r#"{"id":"f1","leadId":"l1","createdAt":"2024-06-10T12:00:00Z"}"#,
        )
        .expect("deserialize follow-up");
        assert_eq!(follow_up.date, None);
        assert_eq!(follow_up.status, FollowUpStatus::Pending);
    }
}
