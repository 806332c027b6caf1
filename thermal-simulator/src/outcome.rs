//! Sources of simulated print verdicts.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Result of one simulated print attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Success,
    Failure,
}

/// Decides whether a simulated print succeeds.
pub trait OutcomeSource: Send + Sync {
    fn draw(&self) -> Verdict;
}

/// Weighted coin flip.
#[derive(Debug)]
pub struct RandomOutcomes {
    success_rate: f64,
    rng: Option<Mutex<StdRng>>,
}

impl RandomOutcomes {
    /// Uses the thread-local generator. `success_rate` is clamped to `[0, 1]`.
    pub fn new(success_rate: f64) -> Self {
        Self {
            success_rate: clamp_rate(success_rate),
            rng: None,
        }
    }

    /// Reproducible sequence for a given seed.
    pub fn seeded(success_rate: f64, seed: u64) -> Self {
        Self {
            success_rate: clamp_rate(success_rate),
            rng: Some(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    #[inline]
    pub fn success_rate(&self) -> f64 {
        self.success_rate
    }
}

fn clamp_rate(rate: f64) -> f64 {
    if rate.is_nan() {
        0.0
    } else {
        rate.clamp(0.0, 1.0)
    }
}

impl OutcomeSource for RandomOutcomes {
    fn draw(&self) -> Verdict {
        let success = match &self.rng {
            Some(rng) => rng
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .random_bool(self.success_rate),
            None => rand::rng().random_bool(self.success_rate),
        };
        if success {
            Verdict::Success
        } else {
            Verdict::Failure
        }
    }
}

/// Replays a fixed list of verdicts, then succeeds forever.
#[derive(Debug, Default)]
pub struct ScriptedOutcomes {
    script: Mutex<VecDeque<Verdict>>,
}

impl ScriptedOutcomes {
    pub fn new(script: impl IntoIterator<Item = Verdict>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
        }
    }

    /// Queue another verdict at the end of the script.
    pub fn push(&self, verdict: Verdict) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(verdict);
    }
}

impl OutcomeSource for ScriptedOutcomes {
    fn draw(&self) -> Verdict {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(Verdict::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_rate_approximates_weight() {
        let source = RandomOutcomes::seeded(0.8, 7);
        let samples = 10_000;
        let successes = (0..samples)
            .filter(|_| source.draw() == Verdict::Success)
            .count();
        let rate = successes as f64 / samples as f64;
        assert!((rate - 0.8).abs() < 0.03, "observed success rate {rate}");
    }

    #[test]
    fn extreme_rates_are_deterministic() {
        let always = RandomOutcomes::new(1.0);
        let never = RandomOutcomes::new(0.0);
        for _ in 0..100 {
            assert_eq!(always.draw(), Verdict::Success);
            assert_eq!(never.draw(), Verdict::Failure);
        }
        assert_eq!(RandomOutcomes::new(3.0).success_rate(), 1.0);
        assert_eq!(RandomOutcomes::new(f64::NAN).success_rate(), 0.0);
    }

    #[test]
    fn script_replays_then_defaults_to_success() {
        let source = ScriptedOutcomes::new([Verdict::Failure, Verdict::Success]);
        source.push(Verdict::Failure);
        assert_eq!(source.draw(), Verdict::Failure);
        assert_eq!(source.draw(), Verdict::Success);
        assert_eq!(source.draw(), Verdict::Failure);
        assert_eq!(source.draw(), Verdict::Success);
    }
}
