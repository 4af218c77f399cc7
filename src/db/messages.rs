use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::{Message, MessageRow, NewMessage};

use super::{Db, Page};

const MESSAGE_COLUMNS: &str = "m.id AS id, m.content AS content, m.sender_id AS sender_id, \
    m.receiver_id AS receiver_id, m.is_anonymous AS is_anonymous, m.is_public AS is_public, \
    m.is_featured AS is_featured, m.is_seen AS is_seen, m.sent_at AS sent_at";

/// Which messages a listing covers, and which party's name is joined in.
enum Listing {
    Received(Uuid),
    Sent(Uuid),
    Featured(Uuid),
    Public(Uuid),
}

impl Listing {
    fn sql(&self) -> String {
        let (peer, filter) = match self {
            Listing::Received(_) => ("m.sender_id", "m.receiver_id=?"),
            Listing::Sent(_) => ("m.receiver_id", "m.sender_id=?"),
            Listing::Featured(_) => ("m.sender_id", "m.receiver_id=? AND m.is_featured=1"),
            Listing::Public(_) => ("m.sender_id", "m.receiver_id=? AND m.is_public=1"),
        };
        format!(
            "SELECT {MESSAGE_COLUMNS}, u.name AS peer_name FROM messages m \
             LEFT JOIN users u ON u.id={peer} WHERE {filter} \
             ORDER BY julianday(m.sent_at) DESC, m.rowid DESC LIMIT ? OFFSET ?"
        )
    }

    fn user_id(&self) -> Uuid {
        match self {
            Listing::Received(id)
            | Listing::Sent(id)
            | Listing::Featured(id)
            | Listing::Public(id) => *id,
        }
    }
}

impl Db {
    async fn list_messages(&self, listing: Listing, page: Page) -> sqlx::Result<Vec<MessageRow>> {
        let sql = listing.sql();
        sqlx::query_as(&sql)
            .bind(listing.user_id())
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
    }

    pub async fn received_messages(
        &self,
        user_id: Uuid,
        page: Page,
    ) -> sqlx::Result<Vec<MessageRow>> {
        self.list_messages(Listing::Received(user_id), page).await
    }

    pub async fn sent_messages(&self, user_id: Uuid, page: Page) -> sqlx::Result<Vec<MessageRow>> {
        self.list_messages(Listing::Sent(user_id), page).await
    }

    pub async fn fav_messages(&self, user_id: Uuid, page: Page) -> sqlx::Result<Vec<MessageRow>> {
        self.list_messages(Listing::Featured(user_id), page).await
    }

    pub async fn public_messages(
        &self,
        user_id: Uuid,
        page: Page,
    ) -> sqlx::Result<Vec<MessageRow>> {
        self.list_messages(Listing::Public(user_id), page).await
    }

    /// Marks every unseen message of the receiver as seen in one statement.
    /// Returns the ids that changed.
    pub async fn set_user_messages_seen(&self, user_id: Uuid) -> sqlx::Result<Vec<Uuid>> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            "UPDATE messages SET is_seen=1 WHERE receiver_id=? AND is_seen=0 RETURNING id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    pub async fn get_message(&self, message_id: Uuid) -> sqlx::Result<Option<Message>> {
        sqlx::query_as("SELECT * FROM messages WHERE id=?")
            .bind(message_id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn create_message(&self, message: &NewMessage) -> sqlx::Result<Message> {
        sqlx::query_as(
            "INSERT INTO messages (id,content,sender_id,receiver_id,is_anonymous,sent_at) \
             VALUES (?,?,?,?,?,?) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(&message.content)
        .bind(message.sender_id)
        .bind(message.receiver_id)
        .bind(message.is_anonymous)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(&self.pool)
        .await
    }

    /// Sets whichever flags are given, leaving the others untouched.
    pub async fn update_message_flags(
        &self,
        message_id: Uuid,
        is_public: Option<bool>,
        is_featured: Option<bool>,
    ) -> sqlx::Result<Option<Message>> {
        sqlx::query_as(
            "UPDATE messages SET is_public=COALESCE(?, is_public), \
             is_featured=COALESCE(?, is_featured) WHERE id=? RETURNING *",
        )
        .bind(is_public)
        .bind(is_featured)
        .bind(message_id)
        .fetch_optional(&self.pool)
        .await
    }
}
