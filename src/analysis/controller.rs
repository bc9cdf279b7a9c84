//! Prevention plan fetching on the tokio runtime.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;

use super::{PlanSelector, PlanState, Risk};
use crate::client::AnalysisApi;

/// Fetches the plan for the selected risk. Selecting again aborts the
/// request in flight; the selector's generation check covers a response
/// that was already on its way.
pub struct PlanController {
    api: Arc<dyn AnalysisApi>,
    selector: Arc<Mutex<PlanSelector>>,
    inflight: Option<JoinHandle<()>>,
}

impl PlanController {
    pub fn new(api: Arc<dyn AnalysisApi>) -> Self {
        Self {
            api,
            selector: Arc::new(Mutex::new(PlanSelector::new())),
            inflight: None,
        }
    }

    /// Select a risk and start fetching its plan
    pub fn select(&mut self, risk: &Risk) {
        if let Some(handle) = self.inflight.take() {
            handle.abort();
        }

        let request = lock(&self.selector).select(risk);
        let api = Arc::clone(&self.api);
        let selector = Arc::clone(&self.selector);

        self.inflight = Some(tokio::spawn(async move {
            let outcome = api
                .prevention_plan(&request.body)
                .await
                .map_err(|e| e.to_string());
            lock(&selector).resolve(request.generation, outcome);
        }));
    }

    /// Wait for the current request (if any) and return the panel state
    pub async fn settle(&mut self) -> PlanState {
        if let Some(handle) = self.inflight.take() {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    tracing::warn!("Prevention plan task failed: {}", e);
                }
            }
        }
        self.state()
    }

    pub fn state(&self) -> PlanState {
        lock(&self.selector).state().clone()
    }

    pub fn selected(&self) -> Option<Risk> {
        lock(&self.selector).selected().cloned()
    }
}

impl Drop for PlanController {
    fn drop(&mut self) {
        if let Some(handle) = self.inflight.take() {
            handle.abort();
        }
    }
}

fn lock(selector: &Mutex<PlanSelector>) -> MutexGuard<'_, PlanSelector> {
    selector.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisResult, PreventionPlan, PreventionRequest};
    use crate::client::ClientError;
    use crate::upload::UploadFile;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Slow for "Diabetes", fast for everything else; fails for "Broken"
    #[derive(Default)]
    struct MockApi {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AnalysisApi for MockApi {
        async fn predict_risk(&self, _: &UploadFile) -> Result<AnalysisResult, ClientError> {
            Err(ClientError::Unavailable)
        }

        async fn prevention_plan(&self, request: &PreventionRequest) -> Result<PreventionPlan, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            let delay = if request.disease == "Diabetes" { 5000 } else { 100 };
            tokio::time::sleep(Duration::from_millis(delay)).await;

            if request.disease == "Broken" {
                return Err(ClientError::Api {
                    status: 500,
                    message: None,
                });
            }

            let mut plan = PreventionPlan::default();
            plan.lifestyle_plan.exercise = format!("Plan for {}", request.disease);
            Ok(plan)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_plan_for_selection() {
        let api = Arc::new(MockApi::default());
        let mut controller = PlanController::new(api.clone());

        controller.select(&Risk::new("Asthma", 0.2, ""));
        assert_eq!(controller.state(), PlanState::Loading);

        match controller.settle().await {
            PlanState::Ready(plan) => assert_eq!(plan.lifestyle_plan.exercise, "Plan for Asthma"),
            other => panic!("expected plan, got {:?}", other),
        }
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reselect_before_first_plan_arrives() {
        let api = Arc::new(MockApi::default());
        let mut controller = PlanController::new(api.clone());

        controller.select(&Risk::new("Diabetes", 0.7, ""));
        tokio::task::yield_now().await;
        controller.select(&Risk::new("Hypertension", 0.45, ""));

        let state = controller.settle().await;
        assert_eq!(controller.selected().unwrap().risk_name, "Hypertension");

        // Long after the slow request would have answered
        tokio::time::sleep(Duration::from_secs(10)).await;

        for observed in [state, controller.state()] {
            match observed {
                PlanState::Ready(plan) => {
                    assert_eq!(plan.lifestyle_plan.exercise, "Plan for Hypertension")
                }
                other => panic!("expected plan, got {:?}", other),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_leaves_panel_empty() {
        let api = Arc::new(MockApi::default());
        let mut controller = PlanController::new(api);

        controller.select(&Risk::new("Broken", 0.5, ""));
        assert_eq!(controller.settle().await, PlanState::Empty);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_without_selection() {
        let api = Arc::new(MockApi::default());
        let mut controller = PlanController::new(api);
        assert_eq!(controller.settle().await, PlanState::Idle);
    }
}
