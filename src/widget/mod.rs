use crate::render::render;
use crate::search::{SearchError, SearchService};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info};

/// The element whose content the widget replaces
pub trait ResultsContainer: Send + Sync {
    /// Replace the whole content with an HTML fragment
    fn replace_content(&self, html: String);
}

/// What a single input edit ended up doing to the container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Search results (or the empty-state message) were rendered
    Rendered { records: usize },
    /// The field was cleared and the initial view put back
    Restored,
    /// A newer edit was issued while this one was in flight
    Stale,
}

/// Live search over a text field and a results container.
///
/// Each edit takes a ticket from a counter. A response is applied only if its
/// ticket is still the latest one issued, so a slow response can never
/// overwrite the results of a later edit.
pub struct SearchWidget {
    service: Arc<dyn SearchService>,
    container: Arc<dyn ResultsContainer>,
    latest: AtomicU64,
    apply: Mutex<()>,
}

impl SearchWidget {
    pub fn new(service: Arc<dyn SearchService>, container: Arc<dyn ResultsContainer>) -> Self {
        Self {
            service,
            container,
            latest: AtomicU64::new(0),
            apply: Mutex::new(()),
        }
    }

    /// Bind the widget to a stream of field values, one per edit.
    ///
    /// Edits are ticketed in arrival order, then each gets its own handler
    /// task; handlers overlap freely. The returned task finishes once `input` is closed and every handler has
    /// completed.
    pub fn initialize(
        service: Arc<dyn SearchService>,
        container: Arc<dyn ResultsContainer>,
        mut input: mpsc::UnboundedReceiver<String>,
    ) -> (Arc<Self>, JoinHandle<()>) {
        let widget = Arc::new(Self::new(service, container));
        let listener_widget = Arc::clone(&widget);

        let listener = tokio::spawn(async move {
            let mut handlers = JoinSet::new();

            loop {
                tokio::select! {
                    edit = input.recv() => match edit {
                        Some(value) => {
                            // Ticketed here so arrival order, not task
                            // scheduling, decides which edit is latest.
                            let ticket = listener_widget.next_ticket();
                            let widget = Arc::clone(&listener_widget);
                            handlers.spawn(async move { widget.handle(ticket, value).await });
                        }
                        None => break,
                    },
                    Some(joined) = handlers.join_next(), if !handlers.is_empty() => {
                        if let Err(e) = joined {
                            error!("Search handler panicked: {}", e);
                        }
                    }
                }
            }

            while let Some(joined) = handlers.join_next().await {
                if let Err(e) = joined {
                    error!("Search handler panicked: {}", e);
                }
            }

            debug!("Search input closed");
        });

        (widget, listener)
    }

    async fn handle(&self, ticket: u64, value: String) {
        match self.run(ticket, &value).await {
            Ok(Outcome::Rendered { records }) => {
                info!("Rendered {} units for {:?}", records, value.trim())
            }
            Ok(Outcome::Restored) => info!("Restored initial view"),
            Ok(Outcome::Stale) => {}
            Err(e) => error!("Search for {:?} failed: {}", value.trim(), e),
        }
    }

    /// React to the field's new value.
    ///
    /// An empty (after trimming) value restores the server-rendered initial
    /// view; anything else is sent to the search service and rendered.
    /// Failures leave the container as it was.
    pub async fn on_input(&self, raw: &str) -> Result<Outcome, SearchError> {
        let ticket = self.next_ticket();
        self.run(ticket, raw).await
    }

    /// Claim the ticket of a new edit, making every earlier one stale
    fn next_ticket(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn run(&self, ticket: u64, raw: &str) -> Result<Outcome, SearchError> {
        let term = raw.trim();

        let (html, outcome) = if term.is_empty() {
            debug!("Search #{} cleared; restoring initial view", ticket);
            (self.service.initial_view().await?, Outcome::Restored)
        } else {
            debug!("Search #{} for {:?}", ticket, term);
            let records = self.service.search(term).await?;
            let outcome = Outcome::Rendered {
                records: records.len(),
            };
            (render(&records), outcome)
        };

        // Held across check and replace so an older ticket cannot slip in
        // between them.
        let _guard = self.apply.lock().await;
        if self.latest.load(Ordering::SeqCst) != ticket {
            debug!("Discarding stale response for search #{}", ticket);
            return Ok(Outcome::Stale);
        }

        self.container.replace_content(html);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SearchRecord;
    use crate::render::NO_RESULTS;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    const INITIAL: &str = r#"<div class="resultado-container">initial</div>"#;

    /// Canned service; terms starting with "slow" answer after a delay
    struct FakeService {
        searches: StdMutex<Vec<String>>,
    }

    impl FakeService {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                searches: StdMutex::new(Vec::new()),
            })
        }

        fn searches(&self) -> Vec<String> {
            self.searches.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SearchService for FakeService {
        async fn search(&self, term: &str) -> Result<Vec<SearchRecord>, SearchError> {
            self.searches.lock().unwrap().push(term.to_string());

            if term.starts_with("slow") {
                tokio::time::sleep(Duration::from_millis(200)).await;
            }

            match term {
                "Silva" => Ok(vec![SearchRecord::new("Ana Silva", "A", "101")
                    .with_lease("João", "01/01/2024", "31/12/2024")]),
                "zzz" => Ok(vec![]),
                "broken" => Err(SearchError::Status(StatusCode::INTERNAL_SERVER_ERROR)),
                other => Ok(vec![SearchRecord::new(other, "B", "202")]),
            }
        }

        async fn initial_view(&self) -> Result<String, SearchError> {
            Ok(INITIAL.to_string())
        }
    }

    #[derive(Default)]
    struct RecordingContainer {
        history: StdMutex<Vec<String>>,
    }

    impl RecordingContainer {
        fn content(&self) -> Option<String> {
            self.history.lock().unwrap().last().cloned()
        }

        fn updates(&self) -> usize {
            self.history.lock().unwrap().len()
        }
    }

    impl ResultsContainer for RecordingContainer {
        fn replace_content(&self, html: String) {
            self.history.lock().unwrap().push(html);
        }
    }

    fn widget() -> (Arc<SearchWidget>, Arc<FakeService>, Arc<RecordingContainer>) {
        let service = FakeService::new();
        let container = Arc::new(RecordingContainer::default());
        let widget = Arc::new(SearchWidget::new(service.clone(), container.clone()));
        (widget, service, container)
    }

    #[tokio::test]
    async fn test_search_renders_leased_unit() {
        let (widget, service, container) = widget();

        let outcome = widget.on_input("  Silva ").await.unwrap();

        assert_eq!(outcome, Outcome::Rendered { records: 1 });
        assert_eq!(service.searches(), vec!["Silva"]);
        let html = container.content().unwrap();
        for expected in ["Ana Silva", "A | 101", "✅ LOCADO", "João", "01/01/2024 a 31/12/2024"] {
            assert!(html.contains(expected), "missing {:?} in {}", expected, html);
        }
    }

    #[tokio::test]
    async fn test_no_match_shows_only_message() {
        let (widget, _, container) = widget();

        let outcome = widget.on_input("zzz").await.unwrap();

        assert_eq!(outcome, Outcome::Rendered { records: 0 });
        assert_eq!(
            container.content().unwrap(),
            format!(r#"<p style="text-align: center;">{}</p>"#, NO_RESULTS)
        );
    }

    #[tokio::test]
    async fn test_cleared_field_restores_initial_view() {
        let (widget, service, container) = widget();

        widget.on_input("Silva").await.unwrap();
        let outcome = widget.on_input("   ").await.unwrap();

        assert_eq!(outcome, Outcome::Restored);
        assert_eq!(container.content().unwrap(), INITIAL);
        assert_eq!(service.searches(), vec!["Silva"]);
    }

    #[tokio::test]
    async fn test_slow_response_does_not_overwrite_newer_one() {
        let (widget, _, container) = widget();

        let slow = {
            let widget = Arc::clone(&widget);
            tokio::spawn(async move { widget.on_input("slowpoke").await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        let fast = widget.on_input("Silva").await.unwrap();

        assert_eq!(fast, Outcome::Rendered { records: 1 });
        assert_eq!(slow.await.unwrap().unwrap(), Outcome::Stale);
        assert_eq!(container.updates(), 1);
        assert!(container.content().unwrap().contains("Ana Silva"));
    }

    #[tokio::test]
    async fn test_clearing_discards_in_flight_search() {
        let (widget, _, container) = widget();

        let slow = {
            let widget = Arc::clone(&widget);
            tokio::spawn(async move { widget.on_input("slowpoke").await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        widget.on_input("").await.unwrap();

        assert_eq!(slow.await.unwrap().unwrap(), Outcome::Stale);
        assert_eq!(container.content().unwrap(), INITIAL);
    }

    #[tokio::test]
    async fn test_failure_leaves_container_untouched() {
        let (widget, _, container) = widget();

        widget.on_input("zzz").await.unwrap();
        let err = widget.on_input("broken").await.unwrap_err();

        assert!(matches!(err, SearchError::Status(_)));
        assert_eq!(container.updates(), 1);
    }

    #[tokio::test]
    async fn test_initialize_handles_every_edit() {
        let service = FakeService::new();
        let container = Arc::new(RecordingContainer::default());
        let (edits, input) = mpsc::unbounded_channel();

        let (_widget, listener) = SearchWidget::initialize(service.clone(), container.clone(), input);

        edits.send("S".to_string()).unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        edits.send("Silva".to_string()).unwrap();
        drop(edits);
        listener.await.unwrap();

        assert_eq!(service.searches(), vec!["S", "Silva"]);
        assert!(container.content().unwrap().contains("João"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_back_to_back_edits_show_last_term() {
        for _ in 0..20 {
            let service = FakeService::new();
            let container = Arc::new(RecordingContainer::default());
            let (edits, input) = mpsc::unbounded_channel();

            let (_widget, listener) =
                SearchWidget::initialize(service.clone(), container.clone(), input);

            for i in 0..20 {
                edits.send(format!("owner-{}", i)).unwrap();
            }
            drop(edits);
            listener.await.unwrap();

            let html = container.content().unwrap();
            assert!(
                html.contains("<span>owner-19</span>"),
                "last edit not shown: {}",
                html
            );
        }
    }
}
