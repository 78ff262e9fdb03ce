use super::*;

#[test]
fn test_no_script_proceeds_immediately() {
    let mut exit = ExitResultExtractor::new(None);
    assert_eq!(exit.on_close_requested(), CloseDecision::Proceed);
    assert_eq!(exit.capture(), ExitCapture::NotStarted);
}

#[test]
fn test_two_phase_close() {
    let mut exit = ExitResultExtractor::new(Some("document.title".to_string()));

    // First attempt defers and hands back the script.
    assert_eq!(
        exit.on_close_requested(),
        CloseDecision::Defer("document.title".to_string())
    );
    assert_eq!(exit.capture(), ExitCapture::InProgress);

    // The value arrives and is emitted exactly once.
    assert_eq!(
        exit.on_result(Ok("\"Dashboard\"".to_string())),
        Some("\"Dashboard\"".to_string())
    );
    assert_eq!(exit.capture(), ExitCapture::Done);

    // Second attempt proceeds.
    assert_eq!(exit.on_close_requested(), CloseDecision::Proceed);
}

#[test]
fn test_close_during_evaluation_stays_cancelled() {
    let mut exit = ExitResultExtractor::new(Some("x".to_string()));
    assert!(matches!(exit.on_close_requested(), CloseDecision::Defer(_)));

    // A close delivered before the evaluation finishes must neither proceed
    // nor start a second evaluation.
    assert_eq!(exit.on_close_requested(), CloseDecision::AlreadyPending);
    assert_eq!(exit.on_close_requested(), CloseDecision::AlreadyPending);

    assert_eq!(exit.on_result(Ok("1".to_string())), Some("1".to_string()));
    assert_eq!(exit.on_close_requested(), CloseDecision::Proceed);
}

#[test]
fn test_failed_evaluation_completes_capture_without_value() {
    let mut exit = ExitResultExtractor::new(Some("boom()".to_string()));
    exit.on_close_requested();
    assert_eq!(exit.on_result(Err("TypeError".to_string())), None);
    assert_eq!(exit.capture(), ExitCapture::Done);
    assert_eq!(exit.on_close_requested(), CloseDecision::Proceed);
}

#[test]
fn test_stray_result_without_pending_capture_is_ignored() {
    let mut exit = ExitResultExtractor::new(Some("x".to_string()));
    assert_eq!(exit.on_result(Ok("ignored".to_string())), None);
    assert_eq!(exit.capture(), ExitCapture::NotStarted);
}
