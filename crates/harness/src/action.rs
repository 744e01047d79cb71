use crate::HarnessError;
use serde::Serialize;

/// One boolean per enabled button, in the configured order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Action(Vec<bool>);

impl Action {
    #[must_use]
    pub fn new(pressed: Vec<bool>) -> Self {
        Self(pressed)
    }

    /// Nothing pressed.
    #[must_use]
    pub fn none(channels: usize) -> Self {
        Self(vec![false; channels])
    }

    /// Only channel `index` pressed.
    #[must_use]
    pub fn single(channels: usize, index: usize) -> Self {
        let mut pressed = vec![false; channels];
        if let Some(p) = pressed.get_mut(index) {
            *p = true;
        }
        Self(pressed)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }
}

impl From<Vec<bool>> for Action {
    fn from(pressed: Vec<bool>) -> Self {
        Self(pressed)
    }
}

impl<const N: usize> From<[bool; N]> for Action {
    fn from(pressed: [bool; N]) -> Self {
        Self(pressed.to_vec())
    }
}

/// Fixed, non-empty menu of actions of equal width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSet {
    actions: Vec<Action>,
}

impl ActionSet {
    /// # Errors
    ///
    /// Returns `HarnessError::InvalidActionSet` if `actions` is empty or the
    /// actions do not all have the same width.
    pub fn new(actions: Vec<Action>) -> Result<Self, HarnessError> {
        let Some(first) = actions.first() else {
            return Err(HarnessError::InvalidActionSet("no actions"));
        };
        if actions.iter().any(|a| a.len() != first.len()) {
            return Err(HarnessError::InvalidActionSet("actions differ in width"));
        }
        Ok(Self { actions })
    }

    /// One action per channel, each pressing only that channel.
    ///
    /// For three channels this is `[[T,F,F], [F,T,F], [F,F,T]]`.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::InvalidActionSet` if `channels` is zero.
    pub fn one_hot(channels: usize) -> Result<Self, HarnessError> {
        Self::new((0..channels).map(|i| Action::single(channels, i)).collect())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Number of channels every action in the set covers.
    #[must_use]
    pub fn width(&self) -> usize {
        self.actions[0].len()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Action> {
        self.actions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }
}

/// Outcome of one action submission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepResult {
    /// Reward accrued over the submitted ticks, living reward included.
    pub reward: f64,
    /// Whether the episode is finished after this submission.
    pub finished: bool,
    /// Ticks actually advanced.
    pub tics: u32,
    /// Agent ticks elapsed in the episode after this submission.
    pub episode_time: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_hot_matches_reference_menu() {
        let set = ActionSet::one_hot(3).unwrap();
        let menu: Vec<_> = set.iter().map(|a| a.as_slice().to_vec()).collect();
        assert_eq!(
            menu,
            vec![
                vec![true, false, false],
                vec![false, true, false],
                vec![false, false, true]
            ]
        );
        assert_eq!(set.width(), 3);
    }

    #[test]
    fn action_set_rejects_empty_and_ragged() {
        assert_eq!(
            ActionSet::new(vec![]),
            Err(HarnessError::InvalidActionSet("no actions"))
        );
        assert_eq!(
            ActionSet::new(vec![Action::none(2), Action::none(3)]),
            Err(HarnessError::InvalidActionSet("actions differ in width"))
        );
        assert!(ActionSet::one_hot(0).is_err());
    }

    #[test]
    fn single_out_of_range_presses_nothing() {
        assert_eq!(Action::single(2, 5), Action::none(2));
    }
}
