//! Domain entities and user projections.
//!
//! Every struct here crosses the HTTP boundary, so field names follow the
//! JSON convention of the API (camelCase) while the Rust side stays
//! snake_case.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// Access level attached to a user account. New registrations always get
/// [`Role::Member`]; admin accounts are provisioned out of band.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Member => "member",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "admin" => Some(Role::Admin),
            "member" => Some(Role::Member),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// The client-safe projection of a user account. Never carries the
/// password or its hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: Uuid,
    pub user_name: String,
    pub email: String,
    pub role: Role,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Categories an event may carry. Membership is checked client-side only;
/// the server stores whatever string it is given, including the empty one.
pub const EVENT_CATEGORIES: &[&str] = &["workshop", "talk", "social", "competition", "outreach"];

/// Returns true for the empty category or any entry of [`EVENT_CATEGORIES`].
pub fn is_known_category(category: &str) -> bool {
    category.is_empty() || EVENT_CATEGORIES.contains(&category)
}

/// A public event published on the site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    /// URL of the event image, if one was attached.
    pub image: Option<String>,
    pub title: String,
    pub description: String,
    /// Calendar date, stored as text (e.g. `2025-03-01`).
    pub date: String,
    /// Free-text time descriptor (e.g. `6pm`).
    pub time: String,
    pub location: String,
    /// One of [`EVENT_CATEGORIES`], or empty.
    pub category: String,
    /// Free-text audience descriptor.
    pub for_whom: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Meetings
// ---------------------------------------------------------------------------

/// An internal meeting record. Same shape as [`Event`] minus the category;
/// the image is non-null and defaults to the empty string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: Uuid,
    pub image: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub for_whom: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Create / update payloads
// ---------------------------------------------------------------------------

/// Partial field set accepted by the create and update endpoints of both
/// resources. Every field is optional; which ones are required at creation
/// is decided by the resource's schema descriptor, and how absent or empty
/// values merge on update is decided by its merge policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub for_whom: Option<String>,
}

impl ResourceFields {
    /// Look up a field value by its column name.
    pub fn get(&self, field: &str) -> Option<&str> {
        let value = match field {
            "image" => &self.image,
            "title" => &self.title,
            "description" => &self.description,
            "date" => &self.date,
            "time" => &self.time,
            "location" => &self.location,
            "category" => &self.category,
            "for_whom" => &self.for_whom,
            _ => &None,
        };
        value.as_deref()
    }

    /// Project the payload onto an ordered column list, yielding one
    /// `Option<String>` per column.
    pub fn values_for(&self, fields: &[&str]) -> Vec<Option<String>> {
        fields
            .iter()
            .map(|name| self.get(name).map(str::to_owned))
            .collect()
    }

    /// Names from `required` that are absent or empty in this payload.
    pub fn missing_required(&self, required: &'static [&'static str]) -> Vec<&'static str> {
        required
            .iter()
            .copied()
            .filter(|name| !matches!(self.get(name), Some(value) if !value.is_empty()))
            .collect()
    }
}
