use crate::*;
use rand::prelude::*;

/// Picks one of the four actions uniformly at random, ignoring the state.
#[derive(Debug, Clone)]
pub struct RandomPolicy<R = StdRng> {
    rng: R,
}

impl RandomPolicy<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomPolicy<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Policy for RandomPolicy<R> {
    fn policy(&mut self, _s: GridState) -> Action {
        Action::ALL[self.rng.gen_range(0..Action::ALL.len())]
    }
}

/// Fixed state -> action lookup table.
#[derive(Debug, Clone, PartialEq)]
pub struct TabularPolicy {
    actions: Vec<Action>,
}

impl TabularPolicy {
    /// Every state the agent can be asked to act in (not an obstacle, not the
    /// goal) must have an action.
    pub fn new<R>(env: &Gridworld<R>, table: &[Option<Action>]) -> Result<Self, GridworldError> {
        if table.len() != env.n_s() {
            return Err(GridworldError::PolicyShape {
                expected: env.n_s(),
                actual: table.len(),
            });
        }

        let actions = table
            .iter()
            .enumerate()
            .map(|(s, a)| match a {
                Some(a) => Ok(*a),
                None if env.is_obstacle(s) || s == env.end_state() => Ok(Action::Up),
                None => Err(GridworldError::MissingAction(s)),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { actions })
    }

    /// Integer table as used in the course notes: 0..=3 are actions, -1 marks
    /// states without one.
    pub fn from_indices<R>(env: &Gridworld<R>, table: &[i32]) -> Result<Self, GridworldError> {
        let table = table
            .iter()
            .enumerate()
            .map(|(state, &index)| match index {
                -1 => Ok(None),
                _ => Action::from_index(index)
                    .map(Some)
                    .ok_or(GridworldError::InvalidAction { state, index }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(env, &table)
    }

    pub fn action(&self, s: GridState) -> Action {
        self.actions[s]
    }
}

impl Policy for TabularPolicy {
    fn policy(&mut self, s: GridState) -> Action {
        self.action(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_policy_covers_all_actions() {
        let mut pi = RandomPolicy::seeded(2718);
        let mut counts = [0; 4];
        for _ in 0..4000 {
            counts[pi.policy(0).index()] += 1;
        }

        assert!(counts.iter().all(|&c| c > 850 && c < 1150), "{counts:?}");
    }

    #[test]
    fn closures_are_policies() {
        let mut pi = |s: GridState| if s < 20 { Action::Down } else { Action::Right };

        assert_eq!(Policy::policy(&mut pi, 3), Action::Down);
        assert_eq!(Policy::policy(&mut pi, 21), Action::Right);
    }

    #[test]
    fn tabular_from_indices() {
        let env = Gridworld::seeded(&GridworldConfig::default(), 0).unwrap();
        let mut table = vec![1; 25];
        table[12] = -1;
        table[17] = -1;
        table[24] = -1;
        table[3] = 2;
        let mut pi = TabularPolicy::from_indices(&env, &table).unwrap();

        assert_eq!(pi.policy(0), Action::Right);
        assert_eq!(pi.policy(3), Action::Down);
    }

    #[test]
    fn tabular_rejects_bad_tables() {
        let env = Gridworld::seeded(&GridworldConfig::default(), 0).unwrap();

        assert!(matches!(
            TabularPolicy::from_indices(&env, &[0; 24]),
            Err(GridworldError::PolicyShape {
                expected: 25,
                actual: 24
            })
        ));

        let mut table = vec![0; 25];
        table[5] = 4;
        assert!(matches!(
            TabularPolicy::from_indices(&env, &table),
            Err(GridworldError::InvalidAction { state: 5, index: 4 })
        ));

        let mut table = vec![0; 25];
        table[7] = -1;
        assert!(matches!(
            TabularPolicy::from_indices(&env, &table),
            Err(GridworldError::MissingAction(7))
        ));
    }
}
