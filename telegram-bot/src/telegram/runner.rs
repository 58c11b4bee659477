//! REPL runner: converts teloxide messages to core messages and passes them to the
//! HandlerChain, one spawned task per message.

use std::sync::Arc;

use anyhow::Result;
use handler_chain::HandlerChain;
use qbot_core::{Bot as CoreBot, ToCoreMessage};
use teloxide::prelude::*;
use tracing::{info, instrument};

use super::adapters::TelegramMessageWrapper;
use crate::handlers::dispatch;

/// Starts the REPL with the given teloxide Bot and HandlerChain. `reply_bot` answers handler
/// failures. Returns when the REPL stops (Ctrl-C).
#[instrument(skip(bot, reply_bot, handler_chain))]
pub async fn run_repl(
    bot: teloxide::Bot,
    reply_bot: Arc<dyn CoreBot>,
    handler_chain: HandlerChain,
) -> Result<()> {
    if let Ok(me) = bot.get_me().await {
        info!(username = ?me.user.username, "Bot identity resolved");
    }

    teloxide::repl(bot, move |_bot: Bot, msg: teloxide::types::Message| {
        let chain = handler_chain.clone();
        let reply_bot = reply_bot.clone();

        async move {
            let core_msg = TelegramMessageWrapper(&msg).to_core();

            match &core_msg.document {
                Some(doc) => info!(
                    user_id = core_msg.user.id,
                    chat_id = core_msg.chat.id,
                    file_name = ?doc.file_name,
                    file_size = doc.file_size,
                    "Received document"
                ),
                None => info!(
                    user_id = core_msg.user.id,
                    chat_id = core_msg.chat.id,
                    message_content = %core_msg.content,
                    "Received message"
                ),
            }

            // A document can take minutes; the REPL must keep serving other chats.
            tokio::spawn(async move {
                dispatch(&chain, reply_bot.as_ref(), &core_msg).await;
            });

            Ok(())
        }
    })
    .await;

    Ok(())
}
