use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::{Gender, NewUser, PrivacySettings, User};

use super::{Db, Page};

impl Db {
    pub async fn get_user(&self, user_id: Uuid) -> sqlx::Result<Option<User>> {
        sqlx::query_as("SELECT * FROM users WHERE id=?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn get_user_by_email(&self, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as("SELECT * FROM users WHERE email=?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn create_user(&self, user: &NewUser) -> sqlx::Result<User> {
        sqlx::query_as(
            "INSERT INTO users (id,email,hashed_password,name,gender,joined_at) \
             VALUES (?,?,?,?,?,?) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(&user.email)
        .bind(&user.hashed_password)
        .bind(&user.name)
        .bind(user.gender.as_str())
        .bind(OffsetDateTime::now_utc())
        .fetch_one(&self.pool)
        .await
    }

    /// Case-insensitive substring match on name or email, limited to users
    /// who opted into search. The query is matched literally.
    pub async fn search_users(&self, q: &str, page: Page) -> sqlx::Result<Vec<User>> {
        sqlx::query_as(
            "SELECT * FROM users WHERE appear_in_search_results=1 \
             AND (instr(lower(name), lower(?)) > 0 OR instr(lower(email), lower(?)) > 0) \
             ORDER BY name, rowid LIMIT ? OFFSET ?",
        )
        .bind(q)
        .bind(q)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
    }

    pub async fn update_user_info(
        &self,
        user_id: Uuid,
        name: &str,
        email: &str,
        gender: Gender,
        bio: &str,
    ) -> sqlx::Result<Option<User>> {
        sqlx::query_as("UPDATE users SET name=?, email=?, gender=?, bio=? WHERE id=? RETURNING *")
            .bind(name)
            .bind(email)
            .bind(gender.as_str())
            .bind(bio)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn update_privacy_settings(
        &self,
        user_id: Uuid,
        settings: &PrivacySettings,
    ) -> sqlx::Result<Option<User>> {
        sqlx::query_as(
            "UPDATE users SET allow_new_messages=?, allow_sending_images=?, \
             allow_anonymous_users_messages=?, allow_notifications=?, hide_visitors_count=?, \
             hide_last_seen=?, appear_in_search_results=? WHERE id=? RETURNING *",
        )
        .bind(settings.allow_new_messages)
        .bind(settings.allow_sending_images)
        .bind(settings.allow_anonymous_users_messages)
        .bind(settings.allow_notifications)
        .bind(settings.hide_visitors_count)
        .bind(settings.hide_last_seen)
        .bind(settings.appear_in_search_results)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Adds one visit in a single statement and returns the updated user.
    pub async fn increase_user_visitors(&self, user_id: Uuid) -> sqlx::Result<Option<User>> {
        sqlx::query_as(
            "UPDATE users SET num_of_visitors = num_of_visitors + 1 WHERE id=? RETURNING *",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }
}
