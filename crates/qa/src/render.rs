//! Response formatting: chat messages within the transport size limit, and a Markdown study
//! pack for document delivery.

use crate::{ChapterExtras, QAItem, QAKind, SectionOutcome, SectionQa, StudyPack};

/// Telegram's message text limit, in UTF-16 code units.
pub const TELEGRAM_MAX_MESSAGE_CHARS: usize = 4096;

const SECTION_FAILED_NOTICE: &str =
    "⚠️ Couldn't generate Q&A for this section. Send the chapter again later to retry.";
const EXTRAS_FAILED_NOTICE: &str = "⚠️ Couldn't generate the whole-chapter questions this time.";

/// Length as Telegram counts it.
fn text_len(s: &str) -> usize {
    s.encode_utf16().count()
}

fn kind_heading(kind: QAKind) -> &'static str {
    match kind {
        QAKind::Bullet => "Key facts",
        QAKind::Comprehension => "Comprehension",
        QAKind::Revision => "Revision",
    }
}

fn push_questions(out: &mut Vec<String>, heading: &str, items: &[&QAItem]) {
    if items.is_empty() {
        return;
    }
    out.push(String::new());
    out.push(heading.to_string());
    for (i, item) in items.iter().enumerate() {
        out.push(format!("Q{}. {}", i + 1, item.question));
        if let Some(answer) = &item.answer {
            out.extend(answer.lines().map(str::to_string));
        }
    }
}

fn qa_lines(qa_items: &[QAItem], key_topics: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    let bullets: Vec<_> = qa_items.iter().filter(|i| i.kind == QAKind::Bullet).collect();
    if !bullets.is_empty() {
        out.push(String::new());
        out.push(kind_heading(QAKind::Bullet).to_string());
        for b in bullets {
            match &b.answer {
                Some(a) => out.push(format!("• {}: {}", b.question, a.replace('\n', " "))),
                None => out.push(format!("• {}", b.question)),
            }
        }
    }
    for kind in [QAKind::Comprehension, QAKind::Revision] {
        let items: Vec<_> = qa_items.iter().filter(|i| i.kind == kind).collect();
        push_questions(&mut out, kind_heading(kind), &items);
    }
    if !key_topics.is_empty() {
        out.push(String::new());
        out.push(format!("Key topics: {}", key_topics.join(", ")));
    }
    out
}

fn section_block(outcome: &SectionOutcome) -> String {
    let mut lines = vec![format!(
        "📘 {}. {}",
        outcome.section.index + 1,
        outcome.section.display_title()
    )];
    match &outcome.result {
        Ok(SectionQa { items, key_topics }) => lines.extend(qa_lines(items, key_topics)),
        Err(_) => lines.push(SECTION_FAILED_NOTICE.to_string()),
    }
    lines.join("\n")
}

fn extras_block(extras: &Result<ChapterExtras, crate::GenerationError>) -> String {
    let mut lines = vec!["🧠 Whole-chapter questions".to_string()];
    match extras {
        Ok(extras) => lines.extend(qa_lines(&extras.items, &[])),
        Err(_) => lines.push(EXTRAS_FAILED_NOTICE.to_string()),
    }
    lines.join("\n")
}

fn header_block(pack: &StudyPack) -> String {
    let mut header = format!(
        "📚 {}\n{} section(s), {} item(s)",
        pack.title,
        pack.outcomes.len(),
        pack.item_count()
    );
    let failed = pack.failed_sections();
    if failed > 0 {
        header.push_str(&format!("\n⚠️ {} section(s) could not be processed.", failed));
    }
    header
}

/// Splits `text` into pieces of at most `max` units, at line boundaries where possible and
/// at character boundaries inside lines that are longer than `max`.
fn split_oversize(text: &str, max: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.lines() {
        let mut line = line;
        while text_len(line) > max {
            if !current.is_empty() {
                pieces.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let mut cut = 0;
            let mut units = 0;
            for (i, ch) in line.char_indices() {
                if units + ch.len_utf16() > max {
                    break;
                }
                units += ch.len_utf16();
                cut = i + ch.len_utf8();
            }
            if cut == 0 {
                // A surrogate pair does not fit a one-unit limit; emit it alone.
                cut = line.chars().next().map_or(line.len(), char::len_utf8);
            }
            pieces.push(line[..cut].to_string());
            line = &line[cut..];
        }

        let len = text_len(line);
        let needed = if current.is_empty() { len } else { current_len + 1 + len };
        if needed > max {
            pieces.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(line);
        current_len += len;
    }
    if !current.trim().is_empty() {
        pieces.push(current);
    }
    pieces.retain(|p| !p.trim().is_empty());
    pieces
}

/// Renders the pack as chat messages, each at most `max_chars` UTF-16 units.
///
/// Blocks (header, one per section, whole-chapter extras) are packed greedily in order; a block
/// larger than one message is split across several.
pub fn render_messages(pack: &StudyPack, max_chars: usize) -> Vec<String> {
    let max = max_chars.max(1);
    let mut blocks = vec![header_block(pack)];
    blocks.extend(pack.outcomes.iter().map(section_block));
    if let Some(extras) = &pack.extras {
        blocks.push(extras_block(extras));
    }

    let mut messages = Vec::new();
    let mut current = String::new();
    for block in blocks {
        let len = text_len(&block);
        if len > max {
            if !current.is_empty() {
                messages.push(std::mem::take(&mut current));
            }
            messages.extend(split_oversize(&block, max));
            continue;
        }
        if !current.is_empty() && text_len(&current) + 2 + len > max {
            messages.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push_str("\n\n");
        }
        current.push_str(&block);
    }
    if !current.is_empty() {
        messages.push(current);
    }
    messages
}

fn markdown_answer(out: &mut String, answer: &str) {
    for line in answer.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line.starts_with("- ") || line.starts_with("* ") {
            out.push_str(line);
        } else {
            out.push_str("- ");
            out.push_str(line);
        }
        out.push('\n');
    }
}

fn markdown_items(out: &mut String, items: &[QAItem], key_topics: &[String]) {
    let bullets: Vec<_> = items.iter().filter(|i| i.kind == QAKind::Bullet).collect();
    if !bullets.is_empty() {
        out.push_str("### Key facts\n");
        for b in bullets {
            let line = match &b.answer {
                Some(a) => format!("- {}: {}\n", b.question, a.replace('\n', " ")),
                None => format!("- {}\n", b.question),
            };
            out.push_str(&line);
        }
        out.push('\n');
    }
    for kind in [QAKind::Comprehension, QAKind::Revision] {
        let questions: Vec<_> = items.iter().filter(|i| i.kind == kind).collect();
        if questions.is_empty() {
            continue;
        }
        out.push_str(&format!("### {}\n", kind_heading(kind)));
        for (i, q) in questions.iter().enumerate() {
            out.push_str(&format!("**Q{}. {}**\n", i + 1, q.question));
            if let Some(answer) = &q.answer {
                markdown_answer(out, answer);
            }
            out.push('\n');
        }
    }
    if !key_topics.is_empty() {
        out.push_str(&format!("_Key topics: {}_\n\n", key_topics.join(", ")));
    }
}

/// Renders the pack as one Markdown document.
pub fn render_markdown(pack: &StudyPack) -> String {
    let mut out = format!("# {}\n\n", pack.title);
    for outcome in &pack.outcomes {
        out.push_str(&format!(
            "## {}. {}\n\n",
            outcome.section.index + 1,
            outcome.section.display_title()
        ));
        match &outcome.result {
            Ok(qa) => markdown_items(&mut out, &qa.items, &qa.key_topics),
            Err(_) => out.push_str(&format!("> {}\n\n", SECTION_FAILED_NOTICE)),
        }
    }
    if let Some(extras) = &pack.extras {
        out.push_str("## Whole-chapter questions\n\n");
        match extras {
            Ok(extras) => markdown_items(&mut out, &extras.items, &[]),
            Err(_) => out.push_str(&format!("> {}\n\n", EXTRAS_FAILED_NOTICE)),
        }
    }
    format!("{}\n", out.trim_end())
}
