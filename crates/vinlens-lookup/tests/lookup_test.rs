use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use vinlens_lookup::{
    FailureReason, FetchError, FetchedPage, LookupError, LookupOrchestrator, Pacer, PacingPolicy,
    PageFetcher, ProviderAdapter, ProviderRequest, UserAgentPool,
};
use vinlens_provider::{ProviderError, ProviderLoader, ProviderRegistry, ProviderSpec};

const VIN: &str = "1HGCM82633A004352";

const EQUIPMENT_PAGE: &str = r#"
<html><body>
  <h1>Equipment</h1>
  <table class="table table-striped table-hover">
    <tr><td>A1</td><td>desc1</td></tr>
    <tr><td>B2</td></tr>
  </table>
</body></html>
"#;

/// Serves canned pages keyed by host and counts every call.
#[derive(Default)]
struct MockFetcher {
    pages: HashMap<String, Result<FetchedPage, String>>,
    calls: AtomicUsize,
    user_agents: Mutex<Vec<String>>,
}

impl MockFetcher {
    fn page(mut self, host: &str, status: u16, body: &str) -> Self {
        self.pages.insert(
            host.to_string(),
            Ok(FetchedPage {
                status,
                body: body.to_string(),
            }),
        );
        self
    }

    fn unreachable(mut self, host: &str) -> Self {
        self.pages
            .insert(host.to_string(), Err("connection refused".to_string()));
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, request: &ProviderRequest) -> Result<FetchedPage, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.user_agents
            .lock()
            .unwrap()
            .push(request.user_agent.clone());

        let host = request.url.host_str().unwrap_or_default();
        match self.pages.get(host) {
            Some(Ok(page)) => Ok(page.clone()),
            Some(Err(message)) => Err(FetchError::Network(message.clone())),
            None => Ok(FetchedPage {
                status: 404,
                body: String::new(),
            }),
        }
    }
}

/// Records requested pauses instead of sleeping.
#[derive(Default)]
struct RecordingPacer {
    delays: Mutex<Vec<Duration>>,
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, delay: Duration) {
        self.delays.lock().unwrap().push(delay);
    }
}

fn table_provider(id: &str) -> ProviderSpec {
    let toml = format!(
        r#"
[provider]
id = "{id}"
name = "{id}"

[request]
endpoint = "https://{id}.test/EN/check-lookup/{{vin}}"

[[field_rules]]
kind = "table-rows"
field = "equipment"
table_selector = "table.table.table-striped.table-hover"
"#
    );
    ProviderLoader::parse_str(id, &toml).expect("valid definition")
}

struct Harness {
    orchestrator: LookupOrchestrator,
    fetcher: Arc<MockFetcher>,
    pacer: Arc<RecordingPacer>,
}

fn harness(providers: Vec<ProviderSpec>, fetcher: MockFetcher) -> Harness {
    let registry = Arc::new(ProviderRegistry::new(providers).expect("valid registry"));
    let fetcher = Arc::new(fetcher);
    let pacer = Arc::new(RecordingPacer::default());
    let adapter = ProviderAdapter::new(
        fetcher.clone(),
        UserAgentPool::new(["agent-a", "agent-b"]).expect("valid pool"),
        Duration::from_secs(20),
    );

    let orchestrator = LookupOrchestrator::new(registry, adapter)
        .with_pacing(PacingPolicy::new(
            Duration::from_millis(1000),
            Duration::from_millis(3000),
        ))
        .with_pacer(pacer.clone());

    Harness {
        orchestrator,
        fetcher,
        pacer,
    }
}

#[tokio::test]
async fn test_invalid_vin_makes_no_requests() {
    let h = harness(
        vec![table_provider("alpha"), table_provider("bravo")],
        MockFetcher::default().page("alpha.test", 200, EQUIPMENT_PAGE),
    );

    for vin in ["", "ABC", "1HGCM82633A0043521"] {
        let result = h.orchestrator.lookup_all(vin).await;
        assert!(
            matches!(result, Err(LookupError::InvalidVin(_))),
            "{vin:?} should be rejected"
        );
    }

    assert_eq!(h.fetcher.calls(), 0);
    assert!(h.pacer.delays.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_end_to_end_equipment_lookup() {
    let page = r#"
        <table class="table table-striped table-hover">
          <tr><td>101</td><td>Power Steering</td></tr>
          <tr><td>202</td><td>Air Conditioning</td></tr>
        </table>
    "#;
    let h = harness(
        vec![table_provider("vindecoderz")],
        MockFetcher::default().page("vindecoderz.test", 200, page),
    );

    let report = h.orchestrator.lookup_all(VIN).await.expect("lookup runs");
    let json = serde_json::to_value(&report).expect("serialize");

    assert_eq!(
        json,
        serde_json::json!({
            "vindecoderz": {
                "success": true,
                "source": "https://vindecoderz.test/EN/check-lookup/1HGCM82633A004352",
                "data": {
                    "equipment": [
                        {"code": "101", "description": "Power Steering"},
                        {"code": "202", "description": "Air Conditioning"}
                    ]
                }
            }
        })
    );
    assert!(h.pacer.delays.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_short_rows_are_skipped() {
    let h = harness(
        vec![table_provider("alpha")],
        MockFetcher::default().page("alpha.test", 200, EQUIPMENT_PAGE),
    );

    let report = h.orchestrator.lookup_all(VIN).await.expect("lookup runs");
    let data = report
        .get("alpha")
        .and_then(|outcome| outcome.data())
        .expect("alpha succeeded");

    assert_eq!(
        serde_json::to_value(data).expect("serialize"),
        serde_json::json!({"equipment": [{"code": "A1", "description": "desc1"}]})
    );
}

#[tokio::test]
async fn test_no_providers_empty_report() {
    let h = harness(vec![], MockFetcher::default());

    let report = h.orchestrator.lookup(VIN, &[]).await.expect("lookup runs");
    assert!(report.is_empty());
    assert_eq!(h.fetcher.calls(), 0);
}

#[tokio::test]
async fn test_repeated_provider_queried_once() {
    let alpha = table_provider("alpha");
    let bravo = table_provider("bravo");
    let h = harness(
        vec![alpha.clone(), bravo.clone()],
        MockFetcher::default()
            .page("alpha.test", 200, EQUIPMENT_PAGE)
            .page("bravo.test", 200, EQUIPMENT_PAGE),
    );

    let report = h
        .orchestrator
        .lookup(VIN, &[alpha.clone(), bravo, alpha])
        .await
        .expect("lookup runs");

    assert_eq!(report.providers().collect::<Vec<_>>(), vec!["alpha", "bravo"]);
    assert_eq!(report.len(), 2);
    assert_eq!(h.fetcher.calls(), 2);
    assert_eq!(h.pacer.delays.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_one_entry_per_provider_in_order() {
    let h = harness(
        vec![
            table_provider("alpha"),
            table_provider("bravo"),
            table_provider("charlie"),
        ],
        MockFetcher::default()
            .page("alpha.test", 200, EQUIPMENT_PAGE)
            .page("bravo.test", 200, EQUIPMENT_PAGE)
            .page("charlie.test", 200, EQUIPMENT_PAGE),
    );

    let report = h.orchestrator.lookup_all(VIN).await.expect("lookup runs");

    assert_eq!(
        report.providers().collect::<Vec<_>>(),
        vec!["alpha", "bravo", "charlie"]
    );
    assert_eq!(report.succeeded(), 3);
    assert_eq!(h.fetcher.calls(), 3);
}

#[tokio::test]
async fn test_pauses_between_providers_only() {
    let h = harness(
        vec![
            table_provider("alpha"),
            table_provider("bravo"),
            table_provider("charlie"),
        ],
        MockFetcher::default(),
    );

    h.orchestrator.lookup_all(VIN).await.expect("lookup runs");

    let delays = h.pacer.delays.lock().unwrap();
    assert_eq!(delays.len(), 2);
    for delay in delays.iter() {
        assert!(*delay >= Duration::from_secs(1));
        assert!(*delay < Duration::from_secs(3));
    }
}

#[tokio::test]
async fn test_provider_failures_are_isolated() {
    let h = harness(
        vec![
            table_provider("alpha"),
            table_provider("bravo"),
            table_provider("charlie"),
            table_provider("delta"),
        ],
        MockFetcher::default()
            .page("alpha.test", 503, "Service Unavailable")
            .unreachable("bravo.test")
            .page("charlie.test", 200, "<html><body>No records found</body></html>")
            .page("delta.test", 200, EQUIPMENT_PAGE),
    );

    let report = h.orchestrator.lookup_all(VIN).await.expect("lookup runs");
    assert_eq!(report.len(), 4);

    let alpha = report.get("alpha").expect("alpha entry");
    assert_eq!(alpha.reason(), Some(FailureReason::HttpError));
    assert_eq!(alpha.error_message().as_deref(), Some("HttpError: 503"));

    let bravo = report.get("bravo").expect("bravo entry");
    assert_eq!(bravo.reason(), Some(FailureReason::NetworkError));

    let charlie = report.get("charlie").expect("charlie entry");
    assert_eq!(charlie.reason(), Some(FailureReason::ExtractionError));
    assert_eq!(
        charlie.source(),
        "https://charlie.test/EN/check-lookup/1HGCM82633A004352"
    );

    let delta = report.get("delta").expect("delta entry");
    assert!(delta.is_success());

    // Every provider was still attempted, with pauses between them
    assert_eq!(h.fetcher.calls(), 4);
    assert_eq!(h.pacer.delays.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn test_lookup_selected_subset() {
    let h = harness(
        vec![
            table_provider("alpha"),
            table_provider("bravo"),
            table_provider("charlie"),
        ],
        MockFetcher::default().page("charlie.test", 200, EQUIPMENT_PAGE),
    );

    let report = h
        .orchestrator
        .lookup_selected(VIN, &["charlie", "alpha"])
        .await
        .expect("lookup runs");

    // Registry order, not request order
    assert_eq!(report.providers().collect::<Vec<_>>(), vec!["alpha", "charlie"]);
    assert_eq!(h.fetcher.calls(), 2);
}

#[tokio::test]
async fn test_lookup_selected_unknown_provider() {
    let h = harness(vec![table_provider("alpha")], MockFetcher::default());

    let result = h.orchestrator.lookup_selected(VIN, &["missing"]).await;
    assert!(matches!(
        result,
        Err(LookupError::Provider(ProviderError::NotFound { .. }))
    ));
    assert_eq!(h.fetcher.calls(), 0);
}

#[tokio::test]
async fn test_empty_selection_means_all() {
    let h = harness(
        vec![table_provider("alpha"), table_provider("bravo")],
        MockFetcher::default(),
    );

    let report = h
        .orchestrator
        .lookup_selected::<&str>(VIN, &[])
        .await
        .expect("lookup runs");
    assert_eq!(report.len(), 2);
}

#[tokio::test]
async fn test_user_agent_drawn_from_pool() {
    let h = harness(
        vec![
            table_provider("alpha"),
            table_provider("bravo"),
            table_provider("charlie"),
        ],
        MockFetcher::default(),
    );

    h.orchestrator.lookup_all(VIN).await.expect("lookup runs");

    let agents = h.fetcher.user_agents.lock().unwrap();
    assert_eq!(agents.len(), 3);
    assert!(agents
        .iter()
        .all(|agent| agent == "agent-a" || agent == "agent-b"));
}
