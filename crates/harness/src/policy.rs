//! Action selection strategies.
//!
//! The harness only needs one valid [`Action`] per tick; how it is chosen is
//! up to the [`Policy`] the caller injects.

use crate::action::{Action, ActionSet};
use engine::ObservationSnapshot;

pub trait Policy {
    fn name(&self) -> &str;
    fn choose_action(&mut self, snapshot: &ObservationSnapshot) -> Action;
}

/// Uniform choice from a fixed action set.
pub struct RandomPolicy {
    actions: ActionSet,
    rng: fastrand::Rng,
}

impl RandomPolicy {
    /// Seeded from the global generator.
    #[must_use]
    pub fn new(actions: ActionSet) -> Self {
        Self { actions, rng: fastrand::Rng::new() }
    }

    /// Reproducible choices.
    #[must_use]
    pub fn with_seed(actions: ActionSet, seed: u64) -> Self {
        Self { actions, rng: fastrand::Rng::with_seed(seed) }
    }

    #[must_use]
    pub fn actions(&self) -> &ActionSet {
        &self.actions
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &str {
        "random"
    }

    fn choose_action(&mut self, _snapshot: &ObservationSnapshot) -> Action {
        let index = self.rng.usize(..self.actions.len());
        // Index is in range: `ActionSet` is never empty.
        self.actions.get(index).cloned().unwrap_or_else(|| Action::none(self.actions.width()))
    }
}

/// Submits the same action every tick.
pub struct ConstantPolicy {
    action: Action,
}

impl ConstantPolicy {
    #[must_use]
    pub fn new(action: impl Into<Action>) -> Self {
        Self { action: action.into() }
    }
}

impl Policy for ConstantPolicy {
    fn name(&self) -> &str {
        "constant"
    }

    fn choose_action(&mut self, _snapshot: &ObservationSnapshot) -> Action {
        self.action.clone()
    }
}

/// Adapts a closure into a [`Policy`].
pub struct FnPolicy<F> {
    name: String,
    f: F,
}

impl<F> FnPolicy<F>
where
    F: FnMut(&ObservationSnapshot) -> Action,
{
    #[must_use]
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self { name: name.into(), f }
    }
}

impl<F> Policy for FnPolicy<F>
where
    F: FnMut(&ObservationSnapshot) -> Action,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_action(&mut self, snapshot: &ObservationSnapshot) -> Action {
        (self.f)(snapshot)
    }
}
