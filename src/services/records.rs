//! Typed views of backend list payloads, plus search filtering.
//!
//! DESIGN
//! ======
//! Payloads are passed through the JSON API untouched; only page rendering
//! deserialises them. Every field defaults so a backend that omits one
//! still renders.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPreferences {
    pub coordinates_notification: bool,
    pub frequency: Option<i64>,
    pub proofs_notification: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnboardingData {
    pub current_country: Option<String>,
    pub target_country: Option<String>,
    pub days_in_current_country: Option<i64>,
    pub days_in_target_country: Option<i64>,
    pub minimum_days_in_current_country: Option<i64>,
    pub minimum_days_in_target_country: Option<i64>,
    pub notifications_frequency: Option<i64>,
    pub onboarding_done: bool,
    #[serde(rename = "proofList")]
    pub proof_list: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub membership_status: String,
    pub provider: Option<String>,
    pub referrer_id: Option<String>,
    pub last_seen: Option<String>,
    pub registration_date: Option<String>,
    pub used_campaign_codes: Vec<String>,
    pub notification_preferences: NotificationPreferences,
    pub onboarding_data: OnboardingData,
}

impl User {
    #[must_use]
    pub fn is_premium(&self) -> bool {
        self.membership_status.eq_ignore_ascii_case("premium")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Proof {
    pub id: String,
    pub user_id: Option<String>,
    pub proof_type: Option<String>,
    pub kind: Option<String>,
    pub title: Option<String>,
    pub country_code: Option<String>,
    pub noted_at: Option<String>,
    pub inserted_at: Option<String>,
    pub url: Option<String>,
    pub file_storage_id: Option<String>,
}

/// Decode a list payload. Anything other than a JSON array is an empty list;
/// array elements that do not decode are skipped.
#[must_use]
pub fn parse_list<T: DeserializeOwned>(value: serde_json::Value) -> Vec<T> {
    let serde_json::Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}

// Missing fields search as the empty string, so an empty query matches all.
fn contains_folded(haystack: Option<&str>, needle: &str) -> bool {
    haystack
        .unwrap_or_default()
        .to_lowercase()
        .contains(needle)
}

/// Users whose name or email contains `query`, case-insensitively.
#[must_use]
pub fn filter_users<'a>(users: &'a [User], query: &str) -> Vec<&'a User> {
    let needle = query.trim().to_lowercase();
    users
        .iter()
        .filter(|u| contains_folded(Some(&u.name), &needle) || contains_folded(Some(&u.email), &needle))
        .collect()
}

/// Proofs whose title, type or country code contains `query`, case-insensitively.
#[must_use]
pub fn filter_proofs<'a>(proofs: &'a [Proof], query: &str) -> Vec<&'a Proof> {
    let needle = query.trim().to_lowercase();
    proofs
        .iter()
        .filter(|p| {
            contains_folded(p.title.as_deref(), &needle)
                || contains_folded(p.proof_type.as_deref(), &needle)
                || contains_folded(p.country_code.as_deref(), &needle)
        })
        .collect()
}

/// Date part of an ISO timestamp (`2024-02-18T10:00:00Z` -> `2024-02-18`).
#[must_use]
pub fn display_date(raw: Option<&str>) -> Option<&str> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    Some(raw.split('T').next().unwrap_or(raw))
}

#[cfg(test)]
#[path = "records_test.rs"]
mod tests;
