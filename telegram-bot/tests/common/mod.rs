//! Test doubles for the handler tests: a recording Bot, a canned completion client, a tiny PDF
//! builder and message constructors. No network.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use llm_client::{CompletionRequest, CompletionResponse, LlmClient};
use telegram_bot::{Bot, Chat, DocumentAttachment, Message, QbotError, Result, User};

/// One recorded outgoing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text(String),
    Document {
        file_name: String,
        content: String,
        caption: Option<String>,
    },
}

/// Mock Bot: records outgoing texts and documents, serves downloads from a map. Can be set to
/// fail one `send_message` call.
#[derive(Default)]
pub struct MockBot {
    sent: Mutex<Vec<Sent>>,
    files: Mutex<HashMap<String, Vec<u8>>>,
    downloads: AtomicUsize,
    text_calls: AtomicUsize,
    fail_text_call: Mutex<Option<usize>>,
}

impl MockBot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The `n`-th `send_message` call (0-based) fails and is not recorded.
    pub fn fail_text_call(&self, n: usize) {
        *self.fail_text_call.lock().unwrap() = Some(n);
    }

    pub fn add_file(&self, file_id: &str, bytes: Vec<u8>) {
        self.files.lock().unwrap().insert(file_id.to_string(), bytes);
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text(t) => Some(t),
                Sent::Document { .. } => None,
            })
            .collect()
    }

    pub fn downloads(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, _chat: &Chat, text: &str) -> Result<()> {
        let call = self.text_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_text_call.lock().unwrap() == Some(call) {
            return Err(QbotError::Bot("Too Many Requests: retry after 5".to_string()));
        }
        self.sent.lock().unwrap().push(Sent::Text(text.to_string()));
        Ok(())
    }

    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.send_message(&message.chat, text).await
    }

    async fn send_document(
        &self,
        _chat: &Chat,
        file_name: &str,
        bytes: Vec<u8>,
        caption: Option<&str>,
    ) -> Result<()> {
        self.sent.lock().unwrap().push(Sent::Document {
            file_name: file_name.to_string(),
            content: String::from_utf8_lossy(&bytes).into_owned(),
            caption: caption.map(str::to_string),
        });
        Ok(())
    }

    async fn download_file(&self, file_id: &str) -> Result<Vec<u8>> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        self.files
            .lock()
            .unwrap()
            .get(file_id)
            .cloned()
            .ok_or_else(|| QbotError::Download(format!("no such file: {}", file_id)))
    }
}

/// Completion client that answers every call with the same text and counts calls.
pub struct CannedLlm {
    text: String,
    calls: AtomicUsize,
}

impl CannedLlm {
    pub fn new(text: &str) -> Arc<Self> {
        Arc::new(Self {
            text: text.to_string(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for CannedLlm {
    async fn complete(&self, _request: CompletionRequest) -> anyhow::Result<CompletionResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(CompletionResponse::text(self.text.clone()))
    }
}

pub const CANNED_QA: &str = "BULLET: Cells are the unit of life\n\
COMPREHENSION: Why do cells need membranes?\n\
ANSWER: - To control what enters\n\
REVISION: What surrounds a cell?\n\
ANSWER: A membrane\n\
TOPICS: cells, membranes";

fn user() -> User {
    User {
        id: 123,
        username: Some("student".to_string()),
        first_name: Some("Student".to_string()),
        last_name: None,
    }
}

fn chat() -> Chat {
    Chat {
        id: 456,
        chat_type: "private".to_string(),
    }
}

pub fn text_message(content: &str) -> Message {
    Message {
        id: "1".to_string(),
        user: user(),
        chat: chat(),
        content: content.to_string(),
        message_type: "text".to_string(),
        created_at: Utc::now(),
        document: None,
    }
}

pub fn document_message(file_name: &str, mime_type: &str, file_size: u64) -> Message {
    Message {
        id: "2".to_string(),
        user: user(),
        chat: chat(),
        content: String::new(),
        message_type: "document".to_string(),
        created_at: Utc::now(),
        document: Some(DocumentAttachment {
            file_id: format!("file-{}", file_name),
            file_name: Some(file_name.to_string()),
            mime_type: Some(mime_type.to_string()),
            file_size,
        }),
    }
}

fn escape_pdf_text(s: &str) -> String {
    s.replace('\\', "\\\\").replace('(', "\\(").replace(')', "\\)")
}

/// Builds a one-page PDF with one Helvetica text line per entry, with a correct xref table.
pub fn minimal_pdf(lines: &[&str]) -> Vec<u8> {
    let mut content = String::new();
    for (i, line) in lines.iter().enumerate() {
        content.push_str(&format!(
            "BT /F1 12 Tf 72 {} Td ({}) Tj ET\n",
            720 - 20 * i as i32,
            escape_pdf_text(line)
        ));
    }

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R \
         /Resources << /Font << /F1 5 0 R >> >> >>"
            .to_string(),
        format!(
            "<< /Length {} >>\nstream\n{}endstream",
            content.len(),
            content
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::new();
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
    }
    let xref_at = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for offset in offsets {
        pdf.push_str(&format!("{:010} 00000 n \n", offset));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_at
    ));
    pdf.into_bytes()
}
