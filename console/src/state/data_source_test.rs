use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

fn echo_source(calls: Arc<AtomicUsize>) -> DataSource<String, String> {
    DataSource::new(String::new(), move |query: String| {
        let calls = Arc::clone(&calls);
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            // Longer queries answer faster so an older query can arrive last.
            let delay = 500_u64.saturating_sub(query.len() as u64 * 100);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(vec![query])
        }
    })
}

// =============================================================================
// Immediate loads
// =============================================================================

#[tokio::test(start_paused = true)]
async fn refresh_marks_loading_then_ready() {
    let calls = Arc::new(AtomicUsize::new(0));
    let source = echo_source(calls.clone());
    assert_eq!(source.state(), LoadState::Idle);

    let handle = source.set_query("ab".to_owned());
    assert!(source.state().is_loading());
    settle(handle).await;

    assert_eq!(source.state(), LoadState::Ready(vec!["ab".to_owned()]));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn newer_query_wins_over_slower_older_response() {
    let source = echo_source(Arc::new(AtomicUsize::new(0)));

    let first = source.set_query("a".to_owned());
    let second = source.set_query("abcd".to_owned());
    settle(second).await;
    settle(first).await;
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(source.items(), vec!["abcd".to_owned()]);
    assert_eq!(source.generation(), 2);
}

#[tokio::test(start_paused = true)]
async fn failed_fetch_reports_alert_text() {
    let source: DataSource<(), String> = DataSource::new((), |()| async {
        Err(ApiError::Status { status: 500, detail: None })
    });
    settle(source.refresh()).await;
    assert_eq!(source.state(), LoadState::Failed("No se pudieron cargar los registros.".to_owned()));
    assert!(source.items().is_empty());
}

#[tokio::test(start_paused = true)]
async fn clear_discards_in_flight_load() {
    let source = echo_source(Arc::new(AtomicUsize::new(0)));
    let handle = source.set_query("a".to_owned());
    source.clear();
    settle(handle).await;
    assert_eq!(source.state(), LoadState::Idle);
}

// =============================================================================
// Debounced loads
// =============================================================================

#[tokio::test(start_paused = true)]
async fn debounce_collapses_bursts_into_one_fetch() {
    let calls = Arc::new(AtomicUsize::new(0));
    let source = echo_source(calls.clone());
    let delay = Duration::from_millis(300);

    let mut last = None;
    for ch in ["a", "b", "c"] {
        last = Some(source.update_query_debounced(delay, |query| query.push_str(ch)));
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(source.state(), LoadState::Idle);

    settle(last.unwrap()).await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(source.items(), vec!["abc".to_owned()]);
}

#[tokio::test(start_paused = true)]
async fn debounced_load_keeps_previous_rows_until_it_fires() {
    let source = echo_source(Arc::new(AtomicUsize::new(0)));
    settle(source.set_query("ab".to_owned())).await;

    let handle = source.update_query_debounced(Duration::from_millis(300), |query| query.push('c'));
    tokio::time::sleep(Duration::from_millis(299)).await;
    assert_eq!(source.items(), vec!["ab".to_owned()]);

    settle(handle).await;
    assert_eq!(source.items(), vec!["abc".to_owned()]);
}
