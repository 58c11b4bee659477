//! QaGenerator against a scripted completion client: caps, retries, timeouts, extras.

mod common;

use std::sync::Arc;
use std::time::Duration;

use chapter::Section;
use common::{valid_output, FakeLlm, Step};
use qa::{FailureCause, GenerationError, GeneratorConfig, QAKind, QaGenerator};

fn config() -> GeneratorConfig {
    GeneratorConfig {
        max_qa_per_section: 4,
        request_timeout: Duration::from_secs(5),
        max_retries: 2,
        retry_backoff: Duration::from_millis(1),
        ..GeneratorConfig::default()
    }
}

fn section(title: &str, text: &str) -> Section {
    Section {
        index: 0,
        title: Some(title.to_string()),
        text: text.to_string(),
        span: 0..text.len(),
    }
}

/// **Test: output with more items than allowed is capped per kind.**
#[tokio::test]
async fn caps_items_per_kind() {
    let mut output = String::new();
    for i in 0..6 {
        output.push_str(&format!("BULLET: fact {i}\n"));
    }
    for i in 0..5 {
        output.push_str(&format!("COMPREHENSION: question {i}?\nANSWER: answer {i}\n"));
    }
    output.push_str("REVISION: recall?\nANSWER: yes\n");

    let generator = QaGenerator::new(Arc::new(FakeLlm::always(&output)), config());
    let qa = generator.generate(&section("Cells", "Cells are small.")).await.unwrap();

    assert_eq!(qa.count(QAKind::Bullet), 4);
    assert_eq!(qa.count(QAKind::Comprehension), 4);
    assert_eq!(qa.count(QAKind::Revision), 1);
    assert_eq!(qa.items[0].question, "fact 0");
}

/// **Test: the prompt carries the section title, text and the per-kind cap.**
#[tokio::test]
async fn prompt_carries_section() {
    let llm = Arc::new(FakeLlm::always(&valid_output("cells")));
    let generator = QaGenerator::new(llm.clone(), config());
    generator
        .generate(&section("Cell Structure", "Membranes surround cells."))
        .await
        .unwrap();

    let prompts = llm.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("SECTION_TITLE: Cell Structure"));
    assert!(prompts[0].contains("Membranes surround cells."));
    assert!(prompts[0].contains("Give up to 4 BULLET"));
}

/// **Test: a service failure followed by success yields the items.**
#[tokio::test]
async fn retries_after_service_error() {
    let llm = Arc::new(FakeLlm::new(|_, n| {
        if n == 0 {
            Step::Fail("rate limited".to_string())
        } else {
            Step::Reply(valid_output("retry"))
        }
    }));
    let generator = QaGenerator::new(llm.clone(), config());
    let qa = generator.generate(&section("A", "text")).await.unwrap();

    assert_eq!(llm.calls(), 2);
    assert_eq!(qa.key_topics, vec!["retry", "basics"]);
}

/// **Test: unparseable output is retried like a service failure.**
#[tokio::test]
async fn retries_after_malformed_output() {
    let llm = Arc::new(FakeLlm::new(|_, n| {
        if n == 0 {
            Step::Reply("I'd be happy to help!".to_string())
        } else {
            Step::Reply(valid_output("ok"))
        }
    }));
    let generator = QaGenerator::new(llm.clone(), config());
    assert!(generator.generate(&section("A", "text")).await.is_ok());
    assert_eq!(llm.calls(), 2);
}

/// **Test: persistent failure surfaces GenerationFailed after max_retries + 1 attempts.**
#[tokio::test]
async fn persistent_failure_reports_attempts_and_cause() {
    let llm = Arc::new(FakeLlm::new(|_, _| Step::Fail("boom".to_string())));
    let generator = QaGenerator::new(llm.clone(), config());
    let err = generator.generate(&section("A", "text")).await.unwrap_err();

    assert_eq!(llm.calls(), 3);
    assert_eq!(
        err,
        GenerationError::GenerationFailed {
            attempts: 3,
            cause: FailureCause::Service("boom".to_string()),
        }
    );
}

/// **Test: persistently malformed output surfaces a Malformed cause.**
#[tokio::test]
async fn persistent_malformed_output() {
    let llm = Arc::new(FakeLlm::always("ANSWER: no question here"));
    let generator = QaGenerator::new(
        llm,
        GeneratorConfig {
            max_retries: 1,
            ..config()
        },
    );
    let err = generator.generate(&section("A", "text")).await.unwrap_err();
    assert!(matches!(
        err,
        GenerationError::GenerationFailed {
            attempts: 2,
            cause: FailureCause::Malformed(_)
        }
    ));
}

/// **Test: a call that never answers is cut by the request timeout.**
#[tokio::test]
async fn hanging_call_times_out() {
    let llm = Arc::new(FakeLlm::new(|_, _| Step::Hang));
    let generator = QaGenerator::new(
        llm.clone(),
        GeneratorConfig {
            request_timeout: Duration::from_millis(20),
            max_retries: 1,
            ..config()
        },
    );
    let err = generator.generate(&section("A", "text")).await.unwrap_err();

    assert_eq!(llm.calls(), 2);
    assert_eq!(
        err.cause(),
        &FailureCause::Timeout(Duration::from_millis(20))
    );
}

/// **Test: chapter extras keep only questions, capped at extra_qa_count per kind.**
#[tokio::test]
async fn extras_keep_questions_only() {
    let output = "BULLET: ignored\n\
                  COMPREHENSION: c1?\nANSWER: a\n\
                  COMPREHENSION: c2?\nANSWER: a\n\
                  COMPREHENSION: c3?\nANSWER: a\n\
                  REVISION: r1?\nANSWER: a";
    let llm = Arc::new(FakeLlm::always(output));
    let generator = QaGenerator::new(
        llm.clone(),
        GeneratorConfig {
            extra_qa_count: 2,
            ..config()
        },
    );
    let sections = vec![section("One", "first part"), section("Two", "second part")];
    let extras = generator.generate_extras(&sections).await.unwrap();

    let kinds: Vec<_> = extras.items.iter().map(|i| i.kind).collect();
    assert_eq!(
        kinds,
        vec![QAKind::Comprehension, QAKind::Comprehension, QAKind::Revision]
    );
    let prompt = &llm.prompts()[0];
    assert!(prompt.contains("first part\n\nsecond part"));
    assert!(prompt.contains("2 COMPREHENSION"));
}

/// **Test: extras output with only bullets counts as malformed.**
#[tokio::test]
async fn extras_without_questions_fail() {
    let generator = QaGenerator::new(
        Arc::new(FakeLlm::always("BULLET: only a fact")),
        GeneratorConfig {
            max_retries: 0,
            ..config()
        },
    );
    let err = generator
        .generate_extras(&[section("One", "text")])
        .await
        .unwrap_err();
    assert!(matches!(err.cause(), FailureCause::Malformed(_)));
}
