//! Question-to-answer scenarios.

use super::fakes::{article, hit, BrokenStore, FakeDelegate, FakeGateway, Reply};
use crate::context::{ContextStore, InMemoryContextStore};
use crate::engine::{AnswerEngine, EngineOptions};
use crate::types::{AnswerPath, MAX_ANSWER_CHARS, NO_CONTENT_MESSAGE, NO_RESULTS_MESSAGE};
use std::sync::Arc;

const ML_EXTRACT: &str = "Machine learning is a field of study in artificial intelligence. It develops statistical algorithms that learn from data. Machine learning approaches have been applied to many fields.";

struct Harness {
    gateway: Arc<FakeGateway>,
    delegate: Arc<FakeDelegate>,
    store: Arc<InMemoryContextStore>,
    engine: AnswerEngine,
}

fn harness(gateway: FakeGateway, delegate: FakeDelegate) -> Harness {
    let gateway = Arc::new(gateway);
    let delegate = Arc::new(delegate);
    let store = Arc::new(InMemoryContextStore::new());
    let engine = AnswerEngine::new(gateway.clone(), delegate.clone(), store.clone());
    Harness {
        gateway,
        delegate,
        store,
        engine,
    }
}

fn ml_gateway() -> FakeGateway {
    FakeGateway::default()
        .with_results(vec![
            hit("Machine learning", "<span class=\"searchmatch\">Machine learning</span> (ML) is a field", 233488),
            hit("Deep learning", "Deep learning is a subset of machine learning", 32472154),
            hit("Statistics", "Statistics is the discipline", 26685),
        ])
        .with_article(article("Machine learning", ML_EXTRACT, 233488))
        .with_article(article(
            "Deep learning",
            "Deep learning is a subset of machine learning methods based on neural networks.",
            32472154,
        ))
        .with_article(article("Statistics", "Statistics is a discipline.", 26685))
}

#[tokio::test]
async fn test_no_search_results() {
    let h = harness(FakeGateway::default(), FakeDelegate::replying("unused"));

    let answer = h
        .engine
        .answer_question("asdkjhqwe zxcmnb", Some("T1-C1"), Some(1))
        .await;

    assert_eq!(answer.text, NO_RESULTS_MESSAGE);
    assert!(answer.citations.is_empty());
    assert_eq!(answer.path, AnswerPath::NoResults);
    assert_eq!(answer.conversation_id.as_deref(), Some("T1-C1"));
    assert!(h.delegate.summarize_calls().is_empty());
    assert!(h.store.get("T1-C1", 1).await.unwrap().is_none());
}

#[tokio::test]
async fn test_hits_without_articles_cite_search_results() {
    let gateway = FakeGateway::default().with_results(vec![
        hit("Alpha", "<b>Alpha</b> &amp; omega", 1),
        hit("Beta", "Beta snippet", 2),
        hit("Gamma", "Gamma snippet", 3),
    ]);
    let h = harness(gateway, FakeDelegate::replying("unused"));

    let answer = h.engine.answer_question("Tell me about alpha", None, None).await;

    assert_eq!(answer.text, NO_CONTENT_MESSAGE);
    assert_eq!(answer.path, AnswerPath::NoContent);
    assert_eq!(answer.citations.len(), 2);
    assert_eq!(answer.citations[0].title, "Alpha");
    assert_eq!(answer.citations[0].snippet, "Alpha & omega");
    assert_eq!(answer.citations[1].title, "Beta");
    assert!(h.delegate.summarize_calls().is_empty());
}

#[tokio::test]
async fn test_delegate_answer_with_citations() {
    let h = harness(
        ml_gateway(),
        FakeDelegate::replying("Machine learning lets computers learn patterns from data."),
    );

    let answer = h
        .engine
        .answer_question("What is machine learning?", Some("T1-C1"), Some(1))
        .await;

    assert_eq!(answer.path, AnswerPath::Delegated);
    assert_eq!(answer.text, "Machine learning lets computers learn patterns from data.");
    assert_eq!(answer.citations.len(), 2);
    assert_eq!(answer.citations[0].title, "Machine learning");
    assert_eq!(answer.citations[0].page_id, 233488);
    assert_eq!(answer.citations[0].snippet, "Machine learning (ML) is a field");
    assert_eq!(answer.citations[1].title, "Deep learning");

    // Only the first two hits are fetched
    assert_eq!(h.gateway.fetched(), vec!["Machine learning", "Deep learning"]);

    let calls = h.delegate.summarize_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].url, "https://en.wikipedia.org/wiki/Machine_learning");
    assert!(calls[0].context.is_none());

    let context = h.store.get("T1-C1", 1).await.unwrap().unwrap();
    assert_eq!(context.turn_count, 1);
    assert_eq!(context.last_question, "What is machine learning?");
    assert_eq!(context.last_answer, answer.text);
}

#[tokio::test]
async fn test_search_uses_configured_limit() {
    let gateway = ml_gateway();
    let gateway = Arc::new(gateway);
    let engine = AnswerEngine::new(
        gateway.clone(),
        Arc::new(FakeDelegate::replying("ok answer")),
        Arc::new(InMemoryContextStore::new()),
    )
    .with_options(EngineOptions { search_limit: 5 });

    engine.answer_question("What is machine learning?", None, None).await;

    assert_eq!(gateway.queries.lock().unwrap()[0].1, 5);
}

#[tokio::test]
async fn test_delegate_failure_falls_back_to_extractive() {
    let h = harness(ml_gateway(), FakeDelegate::failing());

    let answer = h
        .engine
        .answer_question("What is machine learning?", Some("T1-C1"), Some(1))
        .await;

    assert_eq!(answer.path, AnswerPath::Extractive);
    assert!(answer.text.contains("Machine learning is a field of study in artificial intelligence"));
    assert_eq!(answer.citations.len(), 2);
    assert_eq!(h.delegate.summarize_calls().len(), 2);

    let context = h.store.get("T1-C1", 1).await.unwrap().unwrap();
    assert_eq!(context.last_answer, answer.text);
}

#[tokio::test]
async fn test_second_article_used_when_first_summary_fails() {
    let delegate = FakeDelegate::new(
        vec![Reply::Fail, Reply::Text("Deep learning uses neural networks.".to_string())],
        Reply::Fail,
    );
    let h = harness(ml_gateway(), delegate);

    let answer = h.engine.answer_question("What is deep learning?", None, None).await;

    assert_eq!(answer.text, "Deep learning uses neural networks.");
    let calls = h.delegate.summarize_calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].url, "https://en.wikipedia.org/wiki/Deep_learning");
}

#[tokio::test]
async fn test_blank_summary_counts_as_failure() {
    let h = harness(ml_gateway(), FakeDelegate::replying("   "));

    let answer = h.engine.answer_question("What is machine learning?", None, None).await;

    assert_eq!(answer.path, AnswerPath::Extractive);
    assert!(!answer.text.trim().is_empty());
}

#[tokio::test]
async fn test_delegate_receives_first_full_content_lines() {
    let content = (1..=15)
        .map(|i| format!("Line {}", i))
        .collect::<Vec<_>>()
        .join("\n\n");
    let gateway = ml_gateway().with_full_content("Machine learning", &content);
    let h = harness(gateway, FakeDelegate::replying("answer text"));

    h.engine.answer_question("What is machine learning?", None, None).await;

    let calls = h.delegate.summarize_calls();
    assert_eq!(calls[0].lines.len(), 10);
    assert_eq!(calls[0].lines[0], "Line 1");
    assert_eq!(calls[0].lines[9], "Line 10");
}

#[tokio::test]
async fn test_delegate_falls_back_to_extract_lines() {
    let h = harness(ml_gateway(), FakeDelegate::replying("answer text"));

    h.engine.answer_question("What is machine learning?", None, None).await;

    let calls = h.delegate.summarize_calls();
    assert_eq!(calls[0].lines, vec![ML_EXTRACT.to_string()]);
}

#[tokio::test]
async fn test_article_without_lines_is_skipped() {
    let gateway = FakeGateway::default()
        .with_results(vec![hit("Empty", "", 1), hit("Full", "Full snippet", 2)])
        .with_article(article("Empty", "   ", 1))
        .with_article(article("Full", "Full article text here.", 2));
    let h = harness(gateway, FakeDelegate::replying("From the full article."));

    let answer = h.engine.answer_question("What is full?", None, None).await;

    assert_eq!(answer.text, "From the full article.");
    let calls = h.delegate.summarize_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].url, "https://en.wikipedia.org/wiki/Full");
}

#[tokio::test]
async fn test_long_delegate_answer_is_truncated() {
    let long = "Machine learning ".repeat(200);
    let h = harness(ml_gateway(), FakeDelegate::replying(&long));

    let answer = h.engine.answer_question("What is machine learning?", None, None).await;

    assert_eq!(answer.text.chars().count(), MAX_ANSWER_CHARS);
    assert!(answer.text.ends_with("..."));
}

#[tokio::test]
async fn test_follow_up_is_rewritten_with_context() {
    let delegate = FakeDelegate::new(
        vec![Reply::Text("Oxford has taught students since 1096.".to_string())],
        Reply::Text("What is the history of the University of Oxford?".to_string()),
    );
    let gateway = FakeGateway::default()
        .with_results(vec![hit("University of Oxford", "Oxford snippet", 31797)])
        .with_article(article(
            "University of Oxford",
            "The University of Oxford is a collegiate research university. Teaching existed there in 1096.",
            31797,
        ));
    let h = harness(gateway, delegate);
    h.store
        .upsert("T1-C1", 1, "What is Oxford?", "Oxford is a university city.")
        .await
        .unwrap();

    let answer = h
        .engine
        .answer_question("What about its history?", Some("T1-C1"), Some(1))
        .await;

    assert_eq!(h.delegate.rewrite_calls(), vec!["What about its history?"]);
    assert_eq!(
        h.gateway.queries(),
        vec!["What is the history of the University of Oxford?"]
    );
    assert_eq!(answer.text, "Oxford has taught students since 1096.");

    let calls = h.delegate.summarize_calls();
    assert!(calls[0].context.as_deref().unwrap().contains("Oxford is a university city."));

    let context = h.store.get("T1-C1", 1).await.unwrap().unwrap();
    assert_eq!(context.turn_count, 2);
    assert_eq!(context.last_question, "What about its history?");
}

#[tokio::test]
async fn test_failed_rewrite_keeps_original_question() {
    let h = harness(ml_gateway(), FakeDelegate::replying("answer text"));
    h.store.upsert("T1-C1", 1, "What is AI?", "AI is...").await.unwrap();

    h.engine
        .answer_question("What about it?", Some("T1-C1"), Some(1))
        .await;

    assert_eq!(h.delegate.rewrite_calls().len(), 1);
    assert_eq!(h.gateway.queries(), vec!["What about it?"]);
}

#[tokio::test]
async fn test_no_rewrite_without_context() {
    let delegate = FakeDelegate::new(
        vec![Reply::Text("answer text".to_string())],
        Reply::Text("rewritten".to_string()),
    );
    let h = harness(ml_gateway(), delegate);

    h.engine
        .answer_question("What about it?", Some("T1-C1"), Some(1))
        .await;

    assert!(h.delegate.rewrite_calls().is_empty());
    assert_eq!(h.gateway.queries(), vec!["What about it?"]);
}

#[tokio::test]
async fn test_standalone_question_not_rewritten() {
    let delegate = FakeDelegate::new(
        vec![Reply::Text("answer text".to_string())],
        Reply::Text("rewritten".to_string()),
    );
    let h = harness(ml_gateway(), delegate);
    h.store.upsert("T1-C1", 1, "q", "a").await.unwrap();

    h.engine
        .answer_question("What is the capital city of France?", Some("T1-C1"), Some(1))
        .await;

    assert!(h.delegate.rewrite_calls().is_empty());
}

#[tokio::test]
async fn test_missing_installation_skips_memory() {
    let h = harness(ml_gateway(), FakeDelegate::replying("answer text"));

    let answer = h
        .engine
        .answer_question("What is machine learning?", Some("T1-C1"), None)
        .await;

    assert_eq!(answer.conversation_id.as_deref(), Some("T1-C1"));
    assert!(h.store.get("T1-C1", 0).await.unwrap().is_none());
}

#[tokio::test]
async fn test_broken_store_still_answers() {
    let engine = AnswerEngine::new(
        Arc::new(ml_gateway()),
        Arc::new(FakeDelegate::replying("Still answered.")),
        Arc::new(BrokenStore),
    );

    let answer = engine
        .answer_question("What is machine learning?", Some("T1-C1"), Some(1))
        .await;

    assert_eq!(answer.text, "Still answered.");
    assert_eq!(answer.citations.len(), 2);
}

#[tokio::test]
async fn test_repeated_answers_count_turns() {
    let h = harness(ml_gateway(), FakeDelegate::replying("answer text"));

    for _ in 0..3 {
        h.engine
            .answer_question("What is machine learning today?", Some("T1-C1"), Some(9))
            .await;
    }

    assert_eq!(h.store.get("T1-C1", 9).await.unwrap().unwrap().turn_count, 3);
}
