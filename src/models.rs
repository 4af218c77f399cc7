use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    M,
    F,
}

#[derive(Debug, Error)]
#[error("unknown gender {0:?}")]
pub struct UnknownGender(String);

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::M => "M",
            Gender::F => "F",
        }
    }
}

impl TryFrom<String> for Gender {
    type Error = UnknownGender;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "M" => Ok(Gender::M),
            "F" => Ok(Gender::F),
            _ => Err(UnknownGender(value)),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every flag is replaced at once; a missing form checkbox means `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct PrivacySettings {
    #[serde(default)]
    pub allow_new_messages: bool,
    #[serde(default)]
    pub allow_sending_images: bool,
    #[serde(default)]
    pub allow_anonymous_users_messages: bool,
    #[serde(default)]
    pub allow_notifications: bool,
    #[serde(default)]
    pub hide_visitors_count: bool,
    #[serde(default)]
    pub hide_last_seen: bool,
    #[serde(default)]
    pub appear_in_search_results: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            allow_new_messages: true,
            allow_sending_images: true,
            allow_anonymous_users_messages: true,
            allow_notifications: true,
            hide_visitors_count: false,
            hide_last_seen: false,
            appear_in_search_results: true,
        }
    }
}

#[derive(Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub hashed_password: String,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub gender: Gender,
    pub bio: String,
    pub joined_at: OffsetDateTime,
    pub num_of_visitors: i64,
    #[sqlx(flatten)]
    pub privacy: PrivacySettings,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub gender: Gender,
    pub hashed_password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub gender: Option<Gender>,
    #[serde(default)]
    pub bio: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Message {
    pub id: Uuid,
    pub content: String,
    pub sender_id: Option<Uuid>,
    pub receiver_id: Uuid,
    pub is_anonymous: bool,
    pub is_public: bool,
    pub is_featured: bool,
    pub is_seen: bool,
    pub sent_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub content: String,
    pub sender_id: Option<Uuid>,
    pub receiver_id: Uuid,
    pub is_anonymous: bool,
}

/// A message joined with the name of the other party: the sender for
/// received and public listings, the receiver for sent ones.
#[derive(Debug, Clone, FromRow)]
pub struct MessageRow {
    #[sqlx(flatten)]
    pub message: Message,
    pub peer_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sender {
    /// Flagged anonymous; the identity is withheld even when known.
    Hidden,
    /// Sent without a session.
    Guest,
    Known(UserRef),
}

/// How a received or public message is shown. Holds no sender id unless the
/// sender chose to be seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboxEntry {
    pub id: Uuid,
    pub content: String,
    pub sender: Sender,
    pub is_public: bool,
    pub is_featured: bool,
    pub is_seen: bool,
    pub sent_at: OffsetDateTime,
}

impl From<MessageRow> for InboxEntry {
    fn from(MessageRow { message, peer_name }: MessageRow) -> Self {
        let sender = match (message.is_anonymous, message.sender_id) {
            (true, _) => Sender::Hidden,
            (false, None) => Sender::Guest,
            (false, Some(id)) => Sender::Known(UserRef {
                id,
                name: peer_name.unwrap_or_default(),
            }),
        };

        InboxEntry {
            id: message.id,
            content: message.content,
            sender,
            is_public: message.is_public,
            is_featured: message.is_featured,
            is_seen: message.is_seen,
            sent_at: message.sent_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEntry {
    pub id: Uuid,
    pub content: String,
    pub receiver: UserRef,
    pub is_anonymous: bool,
    pub is_seen: bool,
    pub sent_at: OffsetDateTime,
}

impl From<MessageRow> for SentEntry {
    fn from(MessageRow { message, peer_name }: MessageRow) -> Self {
        SentEntry {
            id: message.id,
            content: message.content,
            receiver: UserRef {
                id: message.receiver_id,
                name: peer_name.unwrap_or_default(),
            },
            is_anonymous: message.is_anonymous,
            is_seen: message.is_seen,
            sent_at: message.sent_at,
        }
    }
}
