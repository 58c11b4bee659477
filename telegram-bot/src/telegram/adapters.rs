//! teloxide types to core types. Documents keep their file id for a later download.

use qbot_core::{Chat, DocumentAttachment, Message, ToCoreMessage, ToCoreUser, User};

/// Converts a Telegram user to a core user.
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> ToCoreUser for TelegramUserWrapper<'a> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
        }
    }
}

/// Converts a Telegram message to a core message. Content is the text, or the caption for
/// document messages.
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> ToCoreMessage for TelegramMessageWrapper<'a> {
    fn to_core(&self) -> Message {
        let msg = self.0;
        let document = self.document();
        let message_type = if document.is_some() {
            "document"
        } else if msg.text().is_some() {
            "text"
        } else {
            "other"
        };
        Message {
            id: msg.id.to_string(),
            user: msg
                .from
                .as_ref()
                .map(|u| TelegramUserWrapper(u).to_core())
                .unwrap_or_else(|| User {
                    id: 0,
                    username: None,
                    first_name: None,
                    last_name: None,
                }),
            chat: Chat {
                id: msg.chat.id.0,
                chat_type: if msg.chat.is_private() {
                    "private".to_string()
                } else {
                    "group".to_string()
                },
            },
            content: msg.text().or_else(|| msg.caption()).unwrap_or("").to_string(),
            message_type: message_type.to_string(),
            created_at: chrono::Utc::now(),
            document,
        }
    }
}

impl<'a> TelegramMessageWrapper<'a> {
    fn document(&self) -> Option<DocumentAttachment> {
        self.0.document().map(|doc| DocumentAttachment {
            file_id: doc.file.id.0.clone(),
            file_name: doc.file_name.clone(),
            mime_type: doc.mime_type.as_ref().map(|m| m.to_string()),
            file_size: u64::from(doc.file.size),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telegram_user_wrapper_to_core() {
        let user = teloxide::types::User {
            id: teloxide::types::UserId(123),
            is_bot: false,
            first_name: "Test".to_string(),
            last_name: Some("User".to_string()),
            username: Some("testuser".to_string()),
            language_code: Some("en".to_string()),
            is_premium: false,
            added_to_attachment_menu: false,
        };

        let core_user = TelegramUserWrapper(&user).to_core();

        assert_eq!(core_user.id, 123);
        assert_eq!(core_user.username, Some("testuser".to_string()));
        assert_eq!(core_user.first_name, Some("Test".to_string()));
        assert_eq!(core_user.last_name, Some("User".to_string()));
    }
}
