//! Chapter PDF flow: validate the upload, download it, run the pipeline, deliver the pack.

use std::sync::Arc;

use async_trait::async_trait;
use chapter::{Document, DocumentError};
use qa::{
    render_markdown, render_messages, Pipeline, PipelineError, StudyPack,
    TELEGRAM_MAX_MESSAGE_CHARS,
};
use qbot_core::{Bot, Handler, HandlerError, HandlerResponse, Message, Result};
use tracing::{error, info, instrument, warn};

use crate::config::DeliveryMode;

/// User-facing replies of the PDF flow.
pub mod replies {
    pub const NOT_PDF: &str = "Please send a PDF file.";
    pub const PROCESSING: &str = "Got it! Processing your chapter… ⏳";
    pub const UNREADABLE: &str =
        "Couldn't extract text from this PDF. Is it scanned? Try a text-based PDF.";
    pub const DOWNLOAD_FAILED: &str = "Couldn't download the file. Please send it again.";
    pub const TIMED_OUT: &str =
        "Processing took too long and was stopped. Try a shorter chapter or send it again later.";
    pub const NOTHING_GENERATED: &str =
        "Couldn't generate any Q&A for this chapter right now. Please try again later.";
    pub const PACK_CAPTION: &str = "Here's your Q&A pack. ✅";
    pub const GENERIC_FAILURE: &str =
        "Something went wrong while handling your message. Please try again.";
}

/// Handles document messages; everything else passes through.
pub struct StudyPackHandler {
    bot: Arc<dyn Bot>,
    pipeline: Pipeline,
    max_file_bytes: u64,
    delivery: DeliveryMode,
}

impl StudyPackHandler {
    pub fn new(
        bot: Arc<dyn Bot>,
        pipeline: Pipeline,
        max_file_bytes: u64,
        delivery: DeliveryMode,
    ) -> Self {
        Self {
            bot,
            pipeline,
            max_file_bytes,
            delivery,
        }
    }

    fn too_large_reply(&self, size: u64) -> String {
        let err = HandlerError::FileTooLarge {
            size,
            limit: self.max_file_bytes,
        };
        warn!(error = %err, "upload rejected");
        format!(
            "That file is too large ({:.1} MB). The limit is {:.1} MB.",
            size as f64 / 1_048_576.0,
            self.max_file_bytes as f64 / 1_048_576.0
        )
    }

    /// Reply text for a pipeline failure.
    fn failure_reply(err: &PipelineError) -> &'static str {
        match err {
            PipelineError::Document(DocumentError::UnreadableDocument(_)) => replies::UNREADABLE,
            PipelineError::DocumentTimedOut(_) => replies::TIMED_OUT,
        }
    }

    async fn deliver(&self, message: &Message, file_stem: &str, pack: &StudyPack) -> Result<()> {
        if self.delivery.sends_messages() {
            for text in render_messages(pack, TELEGRAM_MAX_MESSAGE_CHARS) {
                self.bot.send_message(&message.chat, &text).await?;
            }
        }
        if self.delivery.sends_document() {
            let markdown = render_markdown(pack);
            self.bot
                .send_document(
                    &message.chat,
                    &format!("{}_QA.md", file_stem),
                    markdown.into_bytes(),
                    Some(replies::PACK_CAPTION),
                )
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Handler for StudyPackHandler {
    #[instrument(skip(self, message), fields(chat_id = message.chat.id, user_id = message.user.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let Some(doc) = &message.document else {
            return Ok(HandlerResponse::Continue);
        };

        if !doc.is_pdf() {
            let err = HandlerError::UnsupportedDocument(
                doc.mime_type.clone().unwrap_or_else(|| "unknown".to_string()),
            );
            info!(error = %err, file_name = ?doc.file_name, "upload rejected");
            self.bot.reply_to(message, replies::NOT_PDF).await?;
            return Ok(HandlerResponse::Reply(replies::NOT_PDF.to_string()));
        }
        if doc.file_size > self.max_file_bytes {
            let reply = self.too_large_reply(doc.file_size);
            self.bot.reply_to(message, &reply).await?;
            return Ok(HandlerResponse::Reply(reply));
        }

        self.bot.reply_to(message, replies::PROCESSING).await?;

        let bytes = match self.bot.download_file(&doc.file_id).await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(error = %e, file_id = %doc.file_id, "download failed");
                self.bot.reply_to(message, replies::DOWNLOAD_FAILED).await?;
                return Ok(HandlerResponse::Reply(replies::DOWNLOAD_FAILED.to_string()));
            }
        };
        if bytes.len() as u64 > self.max_file_bytes {
            let reply = self.too_large_reply(bytes.len() as u64);
            self.bot.reply_to(message, &reply).await?;
            return Ok(HandlerResponse::Reply(reply));
        }

        let document = Document::new(bytes, doc.file_name.clone(), doc.mime_type.clone());
        let file_stem = document.stem().unwrap_or("chapter").to_string();
        let pack = match self.pipeline.run(document).await {
            Ok(pack) => pack,
            Err(e) => {
                warn!(error = %e, "chapter could not be processed");
                let reply = Self::failure_reply(&e);
                self.bot.reply_to(message, reply).await?;
                return Ok(HandlerResponse::Reply(reply.to_string()));
            }
        };

        if pack.is_empty() {
            warn!(sections = pack.outcomes.len(), "every generation failed");
            self.bot.reply_to(message, replies::NOTHING_GENERATED).await?;
            return Ok(HandlerResponse::Reply(replies::NOTHING_GENERATED.to_string()));
        }

        self.deliver(message, &file_stem, &pack).await?;
        info!(
            title = %pack.title,
            sections = pack.outcomes.len(),
            failed = pack.failed_sections(),
            items = pack.item_count(),
            delivery = ?self.delivery,
            "study pack delivered"
        );
        Ok(HandlerResponse::Reply(format!(
            "study pack: {} ({} sections, {} items)",
            pack.title,
            pack.outcomes.len(),
            pack.item_count()
        )))
    }
}
