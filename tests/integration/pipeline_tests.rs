/*!
 * End-to-end pipeline tests over mock collaborators
 */

use std::sync::Arc;

use vertaalbrug::errors::GatewayError;
use vertaalbrug::evaluator::{ConfidenceBreakdown, Evaluator};
use vertaalbrug::glossary::Glossary;
use vertaalbrug::pipeline::{Pipeline, TranslationRequest};

use crate::common::mock_backends::{MockChatBackend, MockGatewayFailure, MockTranslator};

fn request(text: &str) -> TranslationRequest {
    TranslationRequest {
        text: text.to_string(),
    }
}

#[tokio::test]
async fn test_run_withSuccessfulTranslationAndScoring_shouldCombineBoth() {
    let translator = MockTranslator::replying("Hallo wereld");
    let backend = MockChatBackend::scoring(0.9, 0.85, 0.8, 0.9, 0.95, 0.88);
    let pipeline = Pipeline::new(
        Arc::new(translator),
        Evaluator::new(Arc::new(backend)),
        Arc::new(Glossary::builtin()),
    );

    let response = pipeline.run(request("Hello world")).await.unwrap();
    assert_eq!(response.dutch, "Hallo wereld");
    assert_eq!(response.confidence.overall, 0.88);
}

#[tokio::test]
async fn test_run_withUnavailableProvider_shouldNotInvokeEvaluator() {
    let translator = MockTranslator::replying("unused");
    translator.fail_next_call(MockGatewayFailure::Unavailable);

    let backend = MockChatBackend::scoring(0.9, 0.9, 0.9, 0.9, 0.9, 0.9);
    let evaluator_tracker = backend.tracker();
    let pipeline = Pipeline::new(
        Arc::new(translator),
        Evaluator::new(Arc::new(backend)),
        Arc::new(Glossary::builtin()),
    );

    let result = pipeline.run(request("Hello")).await;
    assert!(matches!(result, Err(GatewayError::Unavailable(_))));
    assert_eq!(evaluator_tracker.lock().unwrap().call_count, 0);
}

#[tokio::test]
async fn test_run_withProviderApiError_shouldPropagate() {
    let translator = MockTranslator::replying("unused");
    translator.fail_next_call(MockGatewayFailure::Api);
    let pipeline = Pipeline::new(
        Arc::new(translator),
        Evaluator::disabled(),
        Arc::new(Glossary::builtin()),
    );

    let result = pipeline.run(request("Hello")).await;
    assert!(matches!(result, Err(GatewayError::Api { status: 456, .. })));
}

#[tokio::test]
async fn test_run_withDegradedEvaluator_shouldStillReturnTranslation() {
    let translator = MockTranslator::replying("Hallo");
    let backend = MockChatBackend::replying("```json not even json```");
    let pipeline = Pipeline::new(
        Arc::new(translator),
        Evaluator::new(Arc::new(backend)),
        Arc::new(Glossary::builtin()),
    );

    let response = pipeline.run(request("Hello")).await.unwrap();
    assert_eq!(response.dutch, "Hallo");
    assert_eq!(response.confidence, ConfidenceBreakdown::zero());
}

#[tokio::test]
async fn test_run_withDisabledEvaluator_shouldReturnZeroConfidence() {
    let translator = MockTranslator::replying("Hallo");
    let pipeline = Pipeline::new(
        Arc::new(translator),
        Evaluator::disabled(),
        Arc::new(Glossary::builtin()),
    );

    let response = pipeline.run(request("Hello")).await.unwrap();
    assert_eq!(response.dutch, "Hallo");
    assert_eq!(response.confidence, ConfidenceBreakdown::zero());
}

#[tokio::test]
async fn test_run_shouldPassOriginalSourceTextToEvaluator() {
    // The evaluator sees the caller's original text, not the
    // glossary-preprocessed form the provider received.
    let translator = MockTranslator::replying("Bijwerkingen waren vergelijkbaar");
    let backend = MockChatBackend::scoring(0.9, 0.9, 0.9, 0.9, 0.9, 0.9);
    let tracker = backend.tracker();
    let pipeline = Pipeline::new(
        Arc::new(translator),
        Evaluator::new(Arc::new(backend)),
        Arc::new(Glossary::builtin()),
    );

    let source = "Adverse events were comparable";
    pipeline.run(request(source)).await.unwrap();

    let payload = tracker.lock().unwrap().last_input.clone().unwrap();
    let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
    assert_eq!(value["source_en"], source);
    assert_eq!(value["candidate_nl"], "Bijwerkingen waren vergelijkbaar");
}

#[tokio::test]
async fn test_backTranslate_shouldBypassGlossaryAndScoring() {
    let translator = MockTranslator::replying("unused");
    let backend = MockChatBackend::scoring(0.9, 0.9, 0.9, 0.9, 0.9, 0.9);
    let evaluator_tracker = backend.tracker();
    let pipeline = Pipeline::new(
        Arc::new(translator),
        Evaluator::new(Arc::new(backend)),
        Arc::new(Glossary::builtin()),
    );

    let english = pipeline.back_translate("Hallo wereld").await.unwrap();
    assert_eq!(english, "english: Hallo wereld");
    assert_eq!(evaluator_tracker.lock().unwrap().call_count, 0);
}

#[tokio::test]
async fn test_run_concurrentRequests_shouldShareStateWithoutInterference() {
    let translator = MockTranslator::replying("Hallo");
    let backend = MockChatBackend::scoring(0.8, 0.8, 0.8, 0.8, 0.8, 0.8);
    let pipeline = Arc::new(Pipeline::new(
        Arc::new(translator),
        Evaluator::new(Arc::new(backend)),
        Arc::new(Glossary::builtin()),
    ));

    let mut handles = Vec::new();
    for i in 0..8 {
        let pipeline = Arc::clone(&pipeline);
        handles.push(tokio::spawn(async move {
            pipeline.run(request(&format!("Hello {}", i))).await
        }));
    }

    for handle in handles {
        let response = handle.await.unwrap().unwrap();
        assert_eq!(response.dutch, "Hallo");
        assert_eq!(response.confidence.overall, 0.8);
    }
}
