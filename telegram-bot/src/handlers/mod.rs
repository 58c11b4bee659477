//! Handlers: bot commands and the chapter PDF flow.

mod command;
mod study_pack;

use handler_chain::HandlerChain;
use qbot_core::{Bot, Message};
use tracing::error;

pub use command::{CommandHandler, HELP_TEXT, WELCOME_TEXT};
pub use study_pack::{replies, StudyPackHandler};

/// Runs the chain for one message. A handler error is logged and the user gets
/// [`replies::GENERIC_FAILURE`].
pub async fn dispatch(chain: &HandlerChain, bot: &dyn Bot, message: &Message) {
    if let Err(e) = chain.handle(message).await {
        error!(
            error = %e,
            user_id = message.user.id,
            chat_id = message.chat.id,
            "Handler chain failed"
        );
        if let Err(e) = bot.reply_to(message, replies::GENERIC_FAILURE).await {
            error!(error = %e, chat_id = message.chat.id, "Failure reply not sent");
        }
    }
}
