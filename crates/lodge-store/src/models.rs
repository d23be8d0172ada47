//! Store-side models and the schema descriptors binding the shared wire
//! entities to their tables.
//!
//! [`User`] lives only on this side of the wire because it carries the
//! password hash; it projects into [`UserInfo`] before leaving the server.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use lodge_shared::{Event, Meeting, Role, UserInfo};

use crate::resource::{MergePolicy, Resource};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A registered account as stored in the `users` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub user_name: String,
    pub email: String,
    /// bcrypt hash (cost factor 12), never serialized to the wire.
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Project into the client-safe shape.
    pub fn to_info(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            user_name: self.user_name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

// ---------------------------------------------------------------------------
// Resource descriptors
// ---------------------------------------------------------------------------

impl Resource for Event {
    const NAME: &'static str = "Event";
    const TABLE: &'static str = "events";
    const FIELDS: &'static [&'static str] = &[
        "image",
        "title",
        "description",
        "date",
        "time",
        "location",
        "category",
        "for_whom",
    ];
    // Nothing is enforced server-side for events; the client validates.
    const REQUIRED: &'static [&'static str] = &[];
    const MERGE_POLICY: MergePolicy = MergePolicy::KeepPriorOnEmpty;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn field_values(&self) -> Vec<Option<String>> {
        vec![
            self.image.clone(),
            Some(self.title.clone()),
            Some(self.description.clone()),
            Some(self.date.clone()),
            Some(self.time.clone()),
            Some(self.location.clone()),
            Some(self.category.clone()),
            Some(self.for_whom.clone()),
        ]
    }

    fn from_parts(
        id: Uuid,
        values: Vec<Option<String>>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let mut values = values.into_iter();
        Event {
            id,
            image: values.next().flatten(),
            title: values.next().flatten().unwrap_or_default(),
            description: values.next().flatten().unwrap_or_default(),
            date: values.next().flatten().unwrap_or_default(),
            time: values.next().flatten().unwrap_or_default(),
            location: values.next().flatten().unwrap_or_default(),
            category: values.next().flatten().unwrap_or_default(),
            for_whom: values.next().flatten().unwrap_or_default(),
            created_at,
            updated_at,
        }
    }
}

impl Resource for Meeting {
    const NAME: &'static str = "Meeting";
    const TABLE: &'static str = "meetings";
    const FIELDS: &'static [&'static str] = &[
        "image",
        "title",
        "description",
        "date",
        "time",
        "location",
        "for_whom",
    ];
    const REQUIRED: &'static [&'static str] =
        &["title", "description", "date", "time", "location", "for_whom"];
    const MERGE_POLICY: MergePolicy = MergePolicy::Overwrite;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn field_values(&self) -> Vec<Option<String>> {
        vec![
            Some(self.image.clone()),
            Some(self.title.clone()),
            Some(self.description.clone()),
            Some(self.date.clone()),
            Some(self.time.clone()),
            Some(self.location.clone()),
            Some(self.for_whom.clone()),
        ]
    }

    fn from_parts(
        id: Uuid,
        values: Vec<Option<String>>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let mut values = values.into_iter();
        Meeting {
            id,
            // The schema defaults a missing image to the empty string.
            image: values.next().flatten().unwrap_or_default(),
            title: values.next().flatten().unwrap_or_default(),
            description: values.next().flatten().unwrap_or_default(),
            date: values.next().flatten().unwrap_or_default(),
            time: values.next().flatten().unwrap_or_default(),
            location: values.next().flatten().unwrap_or_default(),
            for_whom: values.next().flatten().unwrap_or_default(),
            created_at,
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_projection_drops_the_hash() {
        let user = User {
            id: Uuid::new_v4(),
            user_name: "alice".into(),
            email: "a@x.com".into(),
            password_hash: "$2b$12$hash".into(),
            role: Role::Member,
            created_at: Utc::now(),
        };

        let info = user.to_info();
        assert_eq!(info.id, user.id);
        assert_eq!(info.email, "a@x.com");
        // UserInfo has no hash field at all; this projection is the only
        // path user data takes to the wire.
    }

    #[test]
    fn event_field_round_trip() {
        let now = Utc::now();
        let event = Event::from_parts(
            Uuid::new_v4(),
            vec![
                None,
                Some("Hack Night".into()),
                Some("Bring a laptop".into()),
                Some("2025-03-01".into()),
                Some("6pm".into()),
                Some("Lab1".into()),
                Some("workshop".into()),
                Some("members".into()),
            ],
            now,
            now,
        );

        assert_eq!(event.image, None);
        assert_eq!(event.title, "Hack Night");
        assert_eq!(event.field_values()[3], Some("2025-03-01".to_string()));
    }
}
