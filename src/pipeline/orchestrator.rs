use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use opentelemetry::KeyValue;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::inventory::InventorySource;
use crate::models::{
    AnalysisSource, GeneratedReport, InventoryRecord, ReportRequest, ReportSnapshot,
};
use crate::telemetry::metrics::{
    ANALYSIS_FALLBACK_COUNT, REPORT_CRITICAL_ITEMS, REPORT_GENERATION_DURATION, REPORT_ITEMS,
    REPORT_SOURCE_ERROR_COUNT,
};

use super::analyze::{AnalysisClient, AnalysisFailure, AnalysisOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPhase {
    Idle,
    Generating,
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationFailure {
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug)]
pub enum GenerateOutcome {
    Completed(Arc<GeneratedReport>),
    /// Another generation was already running; nothing was started.
    AlreadyInFlight,
    /// The session was reset while this generation ran; its result was dropped.
    Discarded,
}

/// Renderer-facing copy of the session state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportView {
    pub phase: ReportPhase,
    pub selection: Option<ReportRequest>,
    pub report: Option<GeneratedReport>,
    pub failure: Option<GenerationFailure>,
}

#[derive(Debug)]
enum GenerationState {
    Idle,
    Generating { epoch: u64 },
    Ready(Arc<GeneratedReport>),
    Failed(GenerationFailure),
}

impl GenerationState {
    fn phase(&self) -> ReportPhase {
        match self {
            Self::Idle => ReportPhase::Idle,
            Self::Generating { .. } => ReportPhase::Generating,
            Self::Ready(_) => ReportPhase::Ready,
            Self::Failed(_) => ReportPhase::Failed,
        }
    }

    fn is_generating(&self, epoch: u64) -> bool {
        matches!(self, Self::Generating { epoch: current } if *current == epoch)
    }
}

#[derive(Debug)]
struct Session {
    selection: Option<ReportRequest>,
    state: GenerationState,
    epoch: u64,
    /// Epoch of the pipeline currently running. Survives `reset`, which only
    /// detaches the session from that pipeline's result.
    in_flight: Option<u64>,
}

impl Session {
    fn finish(&mut self, epoch: u64) {
        if self.in_flight == Some(epoch) {
            self.in_flight = None;
        }
    }
}

/// Lifecycle of one report session: selection, a single in-flight
/// generation, and the resulting report.
///
/// The mutex only guards state transitions and is never held across an
/// await, so a second `generate` is answered immediately instead of queueing.
pub struct ReportOrchestrator {
    source: Arc<dyn InventorySource>,
    analysis: AnalysisClient,
    analysis_timeout: Duration,
    session: Mutex<Session>,
}

/// Returns the session to Idle if a generation future is dropped before it
/// finishes, so an abandoned request cannot leave the session stuck.
struct InFlightGuard<'a> {
    orchestrator: &'a ReportOrchestrator,
    epoch: u64,
    armed: bool,
}

impl InFlightGuard<'_> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut session = self.orchestrator.session();
        session.finish(self.epoch);
        if session.state.is_generating(self.epoch) {
            session.state = GenerationState::Idle;
            tracing::warn!(epoch = self.epoch, "report generation abandoned");
        }
    }
}

impl ReportOrchestrator {
    pub fn new(
        source: Arc<dyn InventorySource>,
        analysis: AnalysisClient,
        analysis_timeout: Duration,
    ) -> Self {
        Self {
            source,
            analysis,
            analysis_timeout,
            session: Mutex::new(Session {
                selection: None,
                state: GenerationState::Idle,
                epoch: 0,
                in_flight: None,
            }),
        }
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn phase(&self) -> ReportPhase {
        self.session().state.phase()
    }

    pub fn selection(&self) -> Option<ReportRequest> {
        self.session().selection.clone()
    }

    /// The report of the last completed generation, if the session is Ready.
    pub fn current_report(&self) -> Option<Arc<GeneratedReport>> {
        match &self.session().state {
            GenerationState::Ready(report) => Some(report.clone()),
            _ => None,
        }
    }

    pub fn view(&self) -> ReportView {
        let session = self.session();
        let (report, failure) = match &session.state {
            GenerationState::Ready(report) => (Some(GeneratedReport::clone(report)), None),
            GenerationState::Failed(failure) => (None, Some(failure.clone())),
            GenerationState::Idle | GenerationState::Generating { .. } => (None, None),
        };

        ReportView {
            phase: session.state.phase(),
            selection: session.selection.clone(),
            report,
            failure,
        }
    }

    /// Makes `request` the active selection. Re-selecting the request a
    /// Ready report was built from keeps that report; anything else clears it.
    pub fn select_report(&self, request: ReportRequest) -> AppResult<()> {
        if request.report_type.is_reserved() {
            return Err(AppError::Validation(format!(
                "report type {} is not available",
                request.report_type
            )));
        }

        let mut session = self.session();
        match &session.state {
            GenerationState::Generating { .. } => {
                return Err(AppError::Conflict(
                    "cannot change the report while it is being generated".to_string(),
                ));
            }
            GenerationState::Ready(report) if report.request == request => {
                return Ok(());
            }
            _ => {}
        }

        tracing::info!(report.type = %request.report_type, "report selected");
        session.selection = Some(request);
        session.state = GenerationState::Idle;
        Ok(())
    }

    pub fn reset(&self) {
        let mut session = self.session();
        session.selection = None;
        session.state = GenerationState::Idle;
        tracing::info!("report session reset");
    }

    /// Runs fetch, aggregation and analysis for the current selection.
    ///
    /// A call made while another generation is running returns
    /// [`GenerateOutcome::AlreadyInFlight`] without side effects, including
    /// after a `reset` that detached the session from that generation. Analysis
    /// problems never fail the call; an inventory source failure does, and
    /// leaves the session in the Failed phase.
    pub async fn generate(&self) -> AppResult<GenerateOutcome> {
        let (request, epoch) = {
            let mut session = self.session();
            if let Some(epoch) = session.in_flight {
                tracing::debug!(epoch, "generation already in flight, ignoring request");
                return Ok(GenerateOutcome::AlreadyInFlight);
            }
            let Some(request) = session.selection.clone() else {
                return Err(AppError::Validation("no report selected".to_string()));
            };
            session.epoch += 1;
            let epoch = session.epoch;
            session.state = GenerationState::Generating { epoch };
            session.in_flight = Some(epoch);
            (request, epoch)
        };

        let mut guard = InFlightGuard {
            orchestrator: self,
            epoch,
            armed: true,
        };
        let result = self.run_pipeline(&request).await;
        guard.disarm();

        let mut session = self.session();
        session.finish(epoch);
        if !session.state.is_generating(epoch) {
            tracing::info!(epoch, "session reset during generation, result discarded");
            return Ok(GenerateOutcome::Discarded);
        }

        match result {
            Ok(report) => {
                session.state = GenerationState::Ready(report.clone());
                Ok(GenerateOutcome::Completed(report))
            }
            Err(err) => {
                session.state = GenerationState::Failed(GenerationFailure {
                    message: err.to_string(),
                    occurred_at: Utc::now(),
                });
                Err(err)
            }
        }
    }

    #[tracing::instrument(
        name = "pipeline report",
        skip(self, request),
        fields(
            report.type = %request.report_type,
            report.id,
            report.items,
            report.critical_items,
            report.analysis_source,
            report.duration_ms,
        )
    )]
    async fn run_pipeline(&self, request: &ReportRequest) -> AppResult<Arc<GeneratedReport>> {
        let start = Instant::now();
        let type_kv = KeyValue::new("report.type", request.report_type.as_str());

        // Stage 1: fetch inventory records
        let records = self.fetch(request).await.inspect_err(|_| {
            REPORT_SOURCE_ERROR_COUNT.add(1, &[type_kv.clone()]);
        })?;

        // Stage 2: aggregate into a snapshot
        let snapshot = tracing::info_span!("pipeline_stage aggregate", pipeline.stage = "aggregate")
            .in_scope(|| {
                let snapshot = ReportSnapshot::new(Utc::now(), records);
                let summary = snapshot.summary();
                tracing::debug!(
                    total_items = summary.total_items,
                    total_value = summary.total_value,
                    critical_items = summary.critical_items_count,
                    "snapshot aggregated"
                );
                snapshot
            });
        let summary = *snapshot.summary();

        // Stage 3: AI analysis, bounded by the session's timeout
        let outcome = match tokio::time::timeout(
            self.analysis_timeout,
            self.analysis
                .analyze_outcome(request.report_type, &snapshot),
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.analysis_timeout.as_millis() as u64,
                    "AI analysis timed out, using fallback"
                );
                AnalysisOutcome::Fallback(AnalysisFailure::TimedOut)
            }
        };

        if let AnalysisOutcome::Fallback(failure) = &outcome {
            ANALYSIS_FALLBACK_COUNT.add(
                1,
                &[type_kv.clone(), KeyValue::new("failure", failure.kind())],
            );
        }

        let source = outcome.source();
        let duration = start.elapsed();
        let report = GeneratedReport::new(
            request.clone(),
            snapshot,
            outcome.into_result(),
            source,
            duration,
        );

        REPORT_GENERATION_DURATION.record(duration.as_secs_f64(), &[type_kv.clone()]);
        REPORT_ITEMS.record(summary.total_items as f64, &[type_kv.clone()]);
        REPORT_CRITICAL_ITEMS.record(summary.critical_items_count as f64, &[type_kv]);

        let span = tracing::Span::current();
        span.record("report.id", report.id.to_string());
        span.record("report.items", summary.total_items);
        span.record("report.critical_items", summary.critical_items_count);
        span.record(
            "report.analysis_source",
            match source {
                AnalysisSource::Model => "model",
                AnalysisSource::Fallback => "fallback",
            },
        );
        span.record("report.duration_ms", report.generation_duration_ms);

        Ok(Arc::new(report))
    }

    #[tracing::instrument(
        name = "pipeline_stage fetch",
        skip(self, request),
        fields(
            pipeline.stage = "fetch",
            inventory.source = %self.source.name(),
            inventory.records,
        )
    )]
    async fn fetch(&self, request: &ReportRequest) -> AppResult<Vec<InventoryRecord>> {
        let records = self.source.fetch_snapshot(request).await?;
        tracing::Span::current().record("inventory.records", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::NaiveDate;
    use tokio::sync::Notify;
    use tokio_test::{assert_err, assert_ok};

    use super::*;
    use crate::inventory::{MockInventorySource, SourceError};
    use crate::models::{
        AnalysisResult, InventoryStatus, ReportFilters, ReportType, RiskLevel,
    };
    use crate::pipeline::analyze::tests::{StubProvider, VALID_REPLY, client_with};

    fn record(value: f64, status: InventoryStatus) -> InventoryRecord {
        InventoryRecord {
            id: format!("ITEM-{value}"),
            name: format!("Item {value}"),
            sku: "SKU-1".to_string(),
            quantity: 1,
            category: "Tools".to_string(),
            last_updated: NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
            status,
            value,
            turnover_rate: None,
            expiration_date: None,
        }
    }

    struct FixedSource {
        records: Vec<InventoryRecord>,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl InventorySource for FixedSource {
        async fn fetch_snapshot(
            &self,
            _request: &ReportRequest,
        ) -> Result<Vec<InventoryRecord>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.records.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    /// Blocks inside `fetch_snapshot` until released.
    struct GatedSource {
        entered: Notify,
        release: Notify,
        calls: AtomicUsize,
    }

    impl GatedSource {
        fn new() -> Self {
            Self {
                entered: Notify::new(),
                release: Notify::new(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl InventorySource for GatedSource {
        async fn fetch_snapshot(
            &self,
            _request: &ReportRequest,
        ) -> Result<Vec<InventoryRecord>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.entered.notify_one();
            self.release.notified().await;
            Ok(vec![record(10.0, InventoryStatus::InStock)])
        }

        fn name(&self) -> &str {
            "gated"
        }
    }

    struct DownSource;

    #[async_trait::async_trait]
    impl InventorySource for DownSource {
        async fn fetch_snapshot(
            &self,
            _request: &ReportRequest,
        ) -> Result<Vec<InventoryRecord>, SourceError> {
            Err(SourceError::Unavailable("warehouse backend offline".to_string()))
        }

        fn name(&self) -> &str {
            "down"
        }
    }

    fn orchestrator(source: Arc<dyn InventorySource>, provider: StubProvider) -> ReportOrchestrator {
        let (analysis, _) = client_with(provider);
        ReportOrchestrator::new(source, analysis, Duration::from_secs(5))
    }

    fn three_record_source() -> Arc<FixedSource> {
        Arc::new(FixedSource {
            records: vec![
                record(100.0, InventoryStatus::InStock),
                record(0.0, InventoryStatus::OutOfStock),
                record(50.0, InventoryStatus::LowStock),
            ],
            calls: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_generate_reaches_ready_with_summary_and_analysis() {
        let orch = orchestrator(three_record_source(), StubProvider::replying(VALID_REPLY));
        assert_ok!(orch.select_report(ReportRequest::new(ReportType::InventoryBalance)));

        let outcome = assert_ok!(orch.generate().await);
        let GenerateOutcome::Completed(report) = outcome else {
            panic!("expected a completed report");
        };

        assert_eq!(report.summary().total_items, 3);
        assert_eq!(report.summary().total_value, 150.0);
        assert_eq!(report.summary().critical_items_count, 2);
        assert_eq!(report.analysis.risk_assessment, RiskLevel::Low);
        assert_eq!(report.analysis_source, AnalysisSource::Model);
        assert_eq!(report.breakdown.status_distribution.len(), 3);

        assert_eq!(orch.phase(), ReportPhase::Ready);
        let view = orch.view();
        assert!(view.report.is_some());
        assert!(view.failure.is_none());
    }

    #[tokio::test]
    async fn test_analysis_failure_still_reaches_ready_with_fallback() {
        let orch = orchestrator(three_record_source(), StubProvider::failing("503 service unavailable"));
        orch.select_report(ReportRequest::new(ReportType::ExpiryRisk)).unwrap();

        let outcome = orch.generate().await.unwrap();
        assert!(matches!(outcome, GenerateOutcome::Completed(_)));
        assert_eq!(orch.phase(), ReportPhase::Ready);

        let report = orch.current_report().unwrap();
        assert_eq!(report.analysis, AnalysisResult::fallback());
        assert_eq!(report.analysis_source, AnalysisSource::Fallback);
    }

    #[tokio::test]
    async fn test_analysis_timeout_yields_fallback() {
        let (analysis, _) = client_with(
            StubProvider::replying(VALID_REPLY).with_delay(Duration::from_secs(10)),
        );
        let orch = ReportOrchestrator::new(
            three_record_source(),
            analysis,
            Duration::from_millis(50),
        );
        orch.select_report(ReportRequest::new(ReportType::DemandForecast)).unwrap();

        let outcome = orch.generate().await.unwrap();
        let GenerateOutcome::Completed(report) = outcome else {
            panic!("expected a completed report");
        };

        assert_eq!(orch.phase(), ReportPhase::Ready);
        assert_eq!(report.analysis.risk_assessment, RiskLevel::Medium);
        assert_eq!(report.analysis.recommendations.len(), 2);
        assert_eq!(report.analysis_source, AnalysisSource::Fallback);
    }

    #[tokio::test]
    async fn test_generate_without_selection_is_rejected() {
        let orch = orchestrator(three_record_source(), StubProvider::replying(VALID_REPLY));
        let err = assert_err!(orch.generate().await);
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(orch.phase(), ReportPhase::Idle);
    }

    #[tokio::test]
    async fn test_second_generate_while_in_flight_is_a_no_op() {
        let source = Arc::new(GatedSource::new());
        let orch = Arc::new(orchestrator(source.clone(), StubProvider::replying(VALID_REPLY)));
        orch.select_report(ReportRequest::new(ReportType::MovementHistory)).unwrap();

        let first = {
            let orch = orch.clone();
            tokio::spawn(async move { orch.generate().await })
        };
        source.entered.notified().await;
        assert_eq!(orch.phase(), ReportPhase::Generating);

        let second = orch.generate().await.unwrap();
        assert!(matches!(second, GenerateOutcome::AlreadyInFlight));
        assert_eq!(orch.phase(), ReportPhase::Generating);

        let conflict = orch.select_report(ReportRequest::new(ReportType::ExpiryRisk));
        assert!(matches!(conflict, Err(AppError::Conflict(_))));

        source.release.notify_one();
        let first = first.await.unwrap().unwrap();
        assert!(matches!(first, GenerateOutcome::Completed(_)));
        assert_eq!(orch.phase(), ReportPhase::Ready);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            orch.selection().map(|s| s.report_type),
            Some(ReportType::MovementHistory)
        );
    }

    #[tokio::test]
    async fn test_source_failure_is_observable() {
        let orch = orchestrator(Arc::new(DownSource), StubProvider::replying(VALID_REPLY));
        orch.select_report(ReportRequest::new(ReportType::InventoryBalance)).unwrap();

        let err = orch.generate().await.unwrap_err();
        assert!(matches!(err, AppError::Source(SourceError::Unavailable(_))));
        assert_eq!(orch.phase(), ReportPhase::Failed);

        let view = orch.view();
        let failure = view.failure.unwrap();
        assert!(failure.message.contains("warehouse backend offline"));
        assert!(view.report.is_none());

        orch.reset();
        assert_eq!(orch.phase(), ReportPhase::Idle);
        assert!(orch.selection().is_none());
    }

    #[tokio::test]
    async fn test_select_a_then_b_before_generate() {
        let orch = orchestrator(three_record_source(), StubProvider::replying(VALID_REPLY));
        orch.select_report(ReportRequest::new(ReportType::InventoryBalance)).unwrap();
        orch.select_report(ReportRequest::new(ReportType::ExpiryRisk)).unwrap();

        assert_eq!(
            orch.selection().map(|s| s.report_type),
            Some(ReportType::ExpiryRisk)
        );
        assert_eq!(orch.phase(), ReportPhase::Idle);
        assert!(orch.current_report().is_none());
    }

    #[tokio::test]
    async fn test_reselecting_ready_report_keeps_it_and_other_selection_clears_it() {
        let orch = orchestrator(three_record_source(), StubProvider::replying(VALID_REPLY));
        let request = ReportRequest::new(ReportType::InventoryBalance);
        orch.select_report(request.clone()).unwrap();
        orch.generate().await.unwrap();

        orch.select_report(request).unwrap();
        assert_eq!(orch.phase(), ReportPhase::Ready);
        assert!(orch.current_report().is_some());

        let filtered = ReportRequest {
            report_type: ReportType::InventoryBalance,
            filters: ReportFilters {
                warehouse: None,
                category: Some("Tools".to_string()),
            },
        };
        orch.select_report(filtered).unwrap();
        assert_eq!(orch.phase(), ReportPhase::Idle);
        assert!(orch.current_report().is_none());
    }

    #[tokio::test]
    async fn test_reserved_report_type_cannot_be_selected() {
        let orch = orchestrator(three_record_source(), StubProvider::replying(VALID_REPLY));
        let err = orch
            .select_report(ReportRequest::new(ReportType::AbcAnalysis))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(orch.selection().is_none());
    }

    #[tokio::test]
    async fn test_abandoned_generation_returns_to_idle() {
        let source = Arc::new(GatedSource::new());
        let orch = orchestrator(source.clone(), StubProvider::replying(VALID_REPLY));
        orch.select_report(ReportRequest::new(ReportType::InventoryBalance)).unwrap();

        let abandoned = tokio::time::timeout(Duration::from_millis(20), orch.generate()).await;
        assert!(abandoned.is_err());

        assert_eq!(orch.phase(), ReportPhase::Idle);
        assert!(orch.selection().is_some());
    }

    #[tokio::test]
    async fn test_reset_during_generation_discards_result() {
        let source = Arc::new(GatedSource::new());
        let orch = Arc::new(orchestrator(source.clone(), StubProvider::replying(VALID_REPLY)));
        orch.select_report(ReportRequest::new(ReportType::InventoryBalance)).unwrap();

        let pending = {
            let orch = orch.clone();
            tokio::spawn(async move { orch.generate().await })
        };
        source.entered.notified().await;

        orch.reset();
        source.release.notify_one();

        let outcome = pending.await.unwrap().unwrap();
        assert!(matches!(outcome, GenerateOutcome::Discarded));
        assert_eq!(orch.phase(), ReportPhase::Idle);
        assert!(orch.current_report().is_none());
    }

    #[tokio::test]
    async fn test_reset_does_not_allow_a_second_concurrent_pipeline() {
        let source = Arc::new(GatedSource::new());
        let orch = Arc::new(orchestrator(source.clone(), StubProvider::replying(VALID_REPLY)));
        orch.select_report(ReportRequest::new(ReportType::InventoryBalance)).unwrap();

        let orphaned = {
            let orch = orch.clone();
            tokio::spawn(async move { orch.generate().await })
        };
        source.entered.notified().await;

        orch.reset();
        orch.select_report(ReportRequest::new(ReportType::ExpiryRisk)).unwrap();

        let second = orch.generate().await.unwrap();
        assert!(matches!(second, GenerateOutcome::AlreadyInFlight));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(orch.phase(), ReportPhase::Idle);

        source.release.notify_one();
        let first = orphaned.await.unwrap().unwrap();
        assert!(matches!(first, GenerateOutcome::Discarded));

        source.release.notify_one();
        let next = orch.generate().await.unwrap();
        let GenerateOutcome::Completed(report) = next else {
            panic!("expected a completed report");
        };
        assert_eq!(report.request.report_type, ReportType::ExpiryRisk);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_abandoned_generation_releases_single_flight() {
        let source = Arc::new(GatedSource::new());
        let orch = orchestrator(source.clone(), StubProvider::replying(VALID_REPLY));
        orch.select_report(ReportRequest::new(ReportType::InventoryBalance)).unwrap();

        let abandoned = tokio::time::timeout(Duration::from_millis(20), orch.generate()).await;
        assert!(abandoned.is_err());

        source.release.notify_one();
        let outcome = orch.generate().await.unwrap();
        assert!(matches!(outcome, GenerateOutcome::Completed(_)));
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_regenerate_replaces_previous_report() {
        let source: Arc<dyn InventorySource> =
            Arc::new(MockInventorySource::new(12).with_seed(1));
        let orch = orchestrator(source, StubProvider::replying(VALID_REPLY));
        orch.select_report(ReportRequest::new(ReportType::InventoryBalance)).unwrap();

        let GenerateOutcome::Completed(first) = orch.generate().await.unwrap() else {
            panic!("expected a completed report");
        };
        let GenerateOutcome::Completed(second) = orch.generate().await.unwrap() else {
            panic!("expected a completed report");
        };

        assert_ne!(first.id, second.id);
        assert_eq!(second.snapshot.items().len(), 12);
        assert_eq!(orch.current_report().map(|r| r.id), Some(second.id));
    }
}
