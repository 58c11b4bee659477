//! Handler chain tests with MockBot and a canned completion client: commands, upload
//! validation, unreadable PDFs and study-pack delivery. Does not call Telegram or OpenAI.

mod common;

use std::sync::Arc;
use std::time::Duration;

use chapter::SplitterConfig;
use common::{document_message, minimal_pdf, text_message, CannedLlm, MockBot, Sent, CANNED_QA};
use handler_chain::HandlerChain;
use qa::{GeneratorConfig, Pipeline, PipelineConfig, QaGenerator};
use telegram_bot::{
    dispatch, replies, CommandHandler, DeliveryMode, HandlerResponse, StudyPackHandler,
    HELP_TEXT, WELCOME_TEXT,
};

const LIMIT: u64 = 1024 * 1024;

fn chain(bot: Arc<MockBot>, llm: Arc<CannedLlm>, delivery: DeliveryMode) -> HandlerChain {
    let generator = QaGenerator::new(
        llm,
        GeneratorConfig {
            max_retries: 0,
            extra_qa_count: 0,
            request_timeout: Duration::from_secs(5),
            ..GeneratorConfig::default()
        },
    );
    let pipeline = Pipeline::new(
        generator,
        PipelineConfig {
            splitter: SplitterConfig::default(),
            section_concurrency: 2,
            document_timeout: Duration::from_secs(30),
        },
    );
    HandlerChain::new()
        .add_handler(Arc::new(CommandHandler::new(bot.clone())))
        .add_handler(Arc::new(StudyPackHandler::new(bot, pipeline, LIMIT, delivery)))
}

/// **Test: /start and /help answer with the welcome and usage texts.**
#[tokio::test]
async fn start_and_help_commands() {
    let bot = MockBot::new();
    let chain = chain(bot.clone(), CannedLlm::new(CANNED_QA), DeliveryMode::Messages);

    chain.handle(&text_message("/start")).await.unwrap();
    chain.handle(&text_message("/help@qa_bot")).await.unwrap();

    assert_eq!(bot.texts(), vec![WELCOME_TEXT.to_string(), HELP_TEXT.to_string()]);
}

/// **Test: plain text gets the usage hint.**
#[tokio::test]
async fn plain_text_gets_help_hint() {
    let bot = MockBot::new();
    let chain = chain(bot.clone(), CannedLlm::new(CANNED_QA), DeliveryMode::Messages);

    let response = chain.handle(&text_message("hello?")).await.unwrap();

    assert_eq!(response, HandlerResponse::Reply(HELP_TEXT.to_string()));
    assert_eq!(bot.texts(), vec![HELP_TEXT.to_string()]);
}

/// **Test: a non-PDF upload is rejected without downloading it.**
#[tokio::test]
async fn non_pdf_is_rejected() {
    let bot = MockBot::new();
    let llm = CannedLlm::new(CANNED_QA);
    let chain = chain(bot.clone(), llm.clone(), DeliveryMode::Messages);

    chain
        .handle(&document_message("notes.docx", "application/msword", 100))
        .await
        .unwrap();

    assert_eq!(bot.texts(), vec![replies::NOT_PDF.to_string()]);
    assert_eq!(bot.downloads(), 0);
    assert_eq!(llm.calls(), 0);
}

/// **Test: an upload above the size limit is rejected without downloading it.**
#[tokio::test]
async fn oversized_pdf_is_rejected() {
    let bot = MockBot::new();
    let chain = chain(bot.clone(), CannedLlm::new(CANNED_QA), DeliveryMode::Messages);

    chain
        .handle(&document_message("big.pdf", "application/pdf", LIMIT + 1))
        .await
        .unwrap();

    let texts = bot.texts();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].starts_with("That file is too large"));
    assert_eq!(bot.downloads(), 0);
}

/// **Test: a failed download is reported to the user.**
#[tokio::test]
async fn download_failure_is_reported() {
    let bot = MockBot::new();
    let chain = chain(bot.clone(), CannedLlm::new(CANNED_QA), DeliveryMode::Messages);

    chain
        .handle(&document_message("missing.pdf", "application/pdf", 10))
        .await
        .unwrap();

    assert_eq!(
        bot.texts(),
        vec![
            replies::PROCESSING.to_string(),
            replies::DOWNLOAD_FAILED.to_string()
        ]
    );
}

/// **Scenario: a PDF without extractable text gets the unreadable notice; no completion calls.**
#[tokio::test]
async fn unreadable_pdf_is_reported() {
    let bot = MockBot::new();
    let llm = CannedLlm::new(CANNED_QA);
    let chain = chain(bot.clone(), llm.clone(), DeliveryMode::Messages);
    bot.add_file("file-scan.pdf", b"%PDF-1.4 not really a pdf".to_vec());

    chain
        .handle(&document_message("scan.pdf", "application/pdf", 26))
        .await
        .unwrap();

    assert_eq!(
        bot.texts(),
        vec![replies::PROCESSING.to_string(), replies::UNREADABLE.to_string()]
    );
    assert_eq!(llm.calls(), 0);
}

/// **Scenario: a text PDF is turned into a study pack and delivered as messages and a file.**
#[tokio::test]
async fn text_pdf_delivers_study_pack() {
    let bot = MockBot::new();
    let llm = CannedLlm::new(CANNED_QA);
    let chain = chain(bot.clone(), llm.clone(), DeliveryMode::Both);
    let pdf = minimal_pdf(&[
        "Chapter 1 Cells",
        "Cells are the basic unit of life.",
        "They are surrounded by a membrane.",
    ]);
    let size = pdf.len() as u64;
    bot.add_file("file-ch1_cells.pdf", pdf);

    let response = chain
        .handle(&document_message("ch1_cells.pdf", "application/pdf", size))
        .await
        .unwrap();

    assert!(matches!(response, HandlerResponse::Reply(ref s) if s.starts_with("study pack:")));
    assert!(llm.calls() >= 1);

    let sent = bot.sent();
    assert_eq!(sent[0], Sent::Text(replies::PROCESSING.to_string()));
    let pack_text = bot.texts()[1..].join("\n");
    assert!(pack_text.contains("📘 1."));
    assert!(pack_text.contains("• Cells are the unit of life"));
    assert!(pack_text.contains("Q1. Why do cells need membranes?"));

    match sent.last().unwrap() {
        Sent::Document {
            file_name,
            content,
            caption,
        } => {
            assert_eq!(file_name, "ch1_cells_QA.md");
            assert!(content.starts_with("# "));
            assert!(content.contains("**Q1. What surrounds a cell?**"));
            assert_eq!(caption.as_deref(), Some(replies::PACK_CAPTION));
        }
        other => panic!("expected a document last, got {:?}", other),
    }
}

/// **Failure: a send error mid-delivery is answered with the generic failure reply.**
#[tokio::test]
async fn delivery_error_gets_failure_reply() {
    let bot = MockBot::new();
    let chain = chain(bot.clone(), CannedLlm::new(CANNED_QA), DeliveryMode::Messages);
    let pdf = minimal_pdf(&["Chapter 1 Cells", "Cells are the basic unit of life."]);
    let size = pdf.len() as u64;
    bot.add_file("file-ch1.pdf", pdf);
    // Call 0 is the processing notice; call 1 is the first pack message.
    bot.fail_text_call(1);

    let message = document_message("ch1.pdf", "application/pdf", size);
    dispatch(&chain, &*bot, &message).await;

    assert_eq!(
        bot.texts(),
        vec![
            replies::PROCESSING.to_string(),
            replies::GENERIC_FAILURE.to_string()
        ]
    );
}

/// **Test: a successful message gets no failure reply.**
#[tokio::test]
async fn dispatch_without_error_sends_no_failure_reply() {
    let bot = MockBot::new();
    let chain = chain(bot.clone(), CannedLlm::new(CANNED_QA), DeliveryMode::Messages);

    dispatch(&chain, &*bot, &text_message("/start")).await;

    assert_eq!(bot.texts(), vec![WELCOME_TEXT.to_string()]);
}
