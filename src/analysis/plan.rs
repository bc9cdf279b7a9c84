//! Prevention plan selection.
//!
//! Every selection bumps a generation counter; a response is only accepted
//! when it carries the current generation, so a slow answer for an earlier
//! selection can never replace the plan for a newer one.

use super::{PreventionPlan, PreventionRequest, Risk};

/// A plan request issued for one selection
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    pub generation: u64,
    pub body: PreventionRequest,
}

/// What the plan panel shows
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PlanState {
    /// Nothing selected yet
    #[default]
    Idle,
    Loading,
    Ready(PreventionPlan),
    /// The fetch failed; the panel stays empty
    Empty,
}

#[derive(Debug, Clone, Default)]
pub struct PlanSelector {
    generation: u64,
    selected: Option<Risk>,
    state: PlanState,
}

impl PlanSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a risk and get the request to send for it
    pub fn select(&mut self, risk: &Risk) -> PlanRequest {
        self.generation += 1;
        self.selected = Some(risk.clone());
        self.state = PlanState::Loading;

        tracing::debug!(
            risk = %risk.risk_name,
            generation = self.generation,
            "Prevention plan requested"
        );

        PlanRequest {
            generation: self.generation,
            body: risk.prevention_request(),
        }
    }

    /// Apply a response. Returns `false` when the response belongs to a
    /// superseded selection and was dropped.
    pub fn resolve(&mut self, generation: u64, outcome: Result<PreventionPlan, String>) -> bool {
        if generation != self.generation {
            tracing::debug!(
                generation,
                current = self.generation,
                "Dropping prevention plan for superseded selection"
            );
            return false;
        }

        self.state = match outcome {
            Ok(plan) => PlanState::Ready(plan),
            Err(e) => {
                // Plan failures are not shown to the user
                tracing::warn!("Failed to fetch prevention plan: {}", e);
                PlanState::Empty
            }
        };
        true
    }

    /// Current generation (the one a response must carry to be accepted)
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn selected(&self) -> Option<&Risk> {
        self.selected.as_ref()
    }

    pub fn state(&self) -> &PlanState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, PlanState::Loading)
    }

    pub fn plan(&self) -> Option<&PreventionPlan> {
        match &self.state {
            PlanState::Ready(plan) => Some(plan),
            _ => None,
        }
    }

    /// Forget the selection (leaving the results view)
    pub fn clear(&mut self) {
        self.generation += 1;
        self.selected = None;
        self.state = PlanState::Idle;
    }
}
