//! Contact models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::record::{Fields, FromRecord, ToRecord};
use super::UserId;

/// Name shown for contacts without a display name.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Generic avatar used when a contact has no photo.
pub const PLACEHOLDER_PHOTO: &str = "about:blank#avatar-placeholder";

/// A user record as listed in the contact list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// User ID.
    pub uid: UserId,
    /// Display name.
    pub display_name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Avatar URL.
    pub photo_url: Option<String>,
}

impl Contact {
    /// Create a contact with only an ID.
    pub fn new(uid: impl Into<UserId>) -> Self {
        Self {
            uid: uid.into(),
            ..Default::default()
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Set the email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Get the display name, falling back to "Unknown".
    pub fn display_name_or_default(&self) -> &str {
        self.display_name.as_deref().unwrap_or(UNKNOWN_NAME)
    }

    /// Get the photo URL, falling back to the placeholder.
    pub fn photo_or_placeholder(&self) -> &str {
        self.photo_url.as_deref().unwrap_or(PLACEHOLDER_PHOTO)
    }

    /// Case-insensitive match on display name or email.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        [&self.display_name, &self.email]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

impl FromRecord for Contact {
    fn from_record(key: &str, value: &Value) -> Option<Self> {
        let fields = Fields::of(value)?;

        Some(Self {
            uid: fields
                .string_opt("uid")
                .unwrap_or_else(|| key.to_owned())
                .into(),
            display_name: fields.string_opt("displayName"),
            email: fields.string_opt("email"),
            photo_url: fields.string_opt("photoUrl"),
        })
    }
}

impl ToRecord for Contact {
    fn to_record(&self) -> Value {
        let mut record = Map::new();
        record.insert("uid".into(), Value::from(self.uid.as_str()));
        let optional = [
            ("displayName", &self.display_name),
            ("email", &self.email),
            ("photoUrl", &self.photo_url),
        ];
        for (name, field) in optional {
            if let Some(v) = field {
                record.insert(name.into(), Value::from(v.as_str()));
            }
        }
        Value::Object(record)
    }
}
