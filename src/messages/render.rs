use time::{macros::format_description, OffsetDateTime};
use uuid::Uuid;

use crate::{
    include_res,
    models::{InboxEntry, SentEntry, Sender},
    res,
};

fn when(at: OffsetDateTime) -> String {
    at.format(format_description!("[year]-[month]-[day] [hour]:[minute]"))
        .unwrap_or_default()
}

fn sender_html(sender: &Sender) -> String {
    match sender {
        Sender::Hidden => "Anonymous".to_string(),
        Sender::Guest => "Visitor".to_string(),
        Sender::Known(user) => format!(
            r#"<a href="/users/{}">{}</a>"#,
            user.id,
            res::escape(&user.name)
        ),
    }
}

fn toggle_button(api: &str, message_id: Uuid, field: &str, value: bool, label: &str) -> String {
    include_res!(str, "/pages/components/toggle_btn.html")
        .replace("{url}", &format!("{api}/messages/{message_id}"))
        .replace("{field}", field)
        .replace("{value}", if value { "true" } else { "false" })
        .replace("{label}", label)
}

/// Button offering the opposite of the current public state.
pub fn public_button(api: &str, message_id: Uuid, is_public: bool) -> String {
    if is_public {
        toggle_button(api, message_id, "is_public", false, "Hide from profile")
    } else {
        toggle_button(api, message_id, "is_public", true, "Show on profile")
    }
}

pub fn fav_button(api: &str, message_id: Uuid, is_featured: bool) -> String {
    if is_featured {
        toggle_button(api, message_id, "is_featured", false, "Unfavorite")
    } else {
        toggle_button(api, message_id, "is_featured", true, "Favorite")
    }
}

/// `api` is set for the receiver's own listings, which carry the toggles.
pub fn inbox_item(entry: &InboxEntry, api: Option<&str>) -> String {
    let actions = match api {
        Some(api) => {
            public_button(api, entry.id, entry.is_public)
                + &fav_button(api, entry.id, entry.is_featured)
        }
        None => String::new(),
    };

    include_res!(str, "/pages/components/message.html")
        .replace("{id}", &entry.id.to_string())
        .replace("{state}", if entry.is_seen { "seen" } else { "new" })
        .replace("{actions}", &actions)
        .replace("{sent_at}", &when(entry.sent_at))
        .replace("{from}", &sender_html(&entry.sender))
        .replace("{content}", &res::markdown(&entry.content))
}

pub fn inbox_list(entries: &[InboxEntry], api: Option<&str>) -> String {
    entries.iter().map(|entry| inbox_item(entry, api)).collect()
}

pub fn sent_item(entry: &SentEntry) -> String {
    let to = format!(
        r#"<a href="/users/{}">{}</a>{}"#,
        entry.receiver.id,
        res::escape(&entry.receiver.name),
        if entry.is_anonymous { " (anonymously)" } else { "" },
    );

    include_res!(str, "/pages/components/sent_message.html")
        .replace("{id}", &entry.id.to_string())
        .replace("{state}", if entry.is_seen { "seen" } else { "unseen" })
        .replace("{sent_at}", &when(entry.sent_at))
        .replace("{to}", &to)
        .replace("{content}", &res::markdown(&entry.content))
}

pub fn sent_list(entries: &[SentEntry]) -> String {
    entries.iter().map(sent_item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRef;

    fn entry(sender: Sender) -> InboxEntry {
        InboxEntry {
            id: Uuid::now_v7(),
            content: "hello *there*".to_string(),
            sender,
            is_public: false,
            is_featured: true,
            is_seen: false,
            sent_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn hidden_sender_leaves_no_trace() {
        let html = inbox_item(&entry(Sender::Hidden), None);
        assert!(html.contains("Anonymous"));
        assert!(!html.contains("/users/"));
        assert!(html.contains("<em>there</em>"));
    }

    #[test]
    fn known_sender_links_to_profile() {
        let id = Uuid::now_v7();
        let sender = Sender::Known(UserRef { id, name: "<Sam>".to_string() });
        let html = inbox_item(&entry(sender), None);
        assert!(html.contains(&format!("/users/{id}")));
        assert!(html.contains("&lt;Sam&gt;"));
    }

    #[test]
    fn owner_listing_carries_toggles() {
        let e = entry(Sender::Guest);
        let html = inbox_item(&e, Some("/api/v1"));
        assert!(html.contains(&format!("/api/v1/messages/{}", e.id)));
        assert!(html.contains("Show on profile"));
        assert!(html.contains("Unfavorite"));
    }
}
