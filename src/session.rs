use std::time::{Duration, Instant};

use crate::mode::{generate_sequence, mode_key, Difficulty, Mode};
use crate::placement::{assign_positions, Shuffler, Target};

/// What a session was started with; replay reuses it unchanged
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub mode: Mode,
    pub difficulty: Difficulty,
}

impl SessionConfig {
    pub fn new(mode: Mode, difficulty: Difficulty) -> Self {
        Self {
            mode,
            difficulty: mode.effective_difficulty(difficulty),
        }
    }

    pub fn mode_key(&self) -> String {
        mode_key(&self.mode, self.difficulty)
    }
}

/// Result of validating a single tap against the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// Matched the expected value, more to go
    Advanced,
    /// Matched the last expected value
    Finished,
    /// Wrong value, or a value that was already completed
    Rejected,
}

/// One game in progress. Built fresh for every start and replay.
#[derive(Debug, Clone)]
pub struct Session {
    pub config: SessionConfig,
    pub sequence: Vec<u32>,
    pub targets: Vec<Target>,
    pub cursor: usize,
    pub started_at: Option<Instant>,
    pub ended_at: Option<Instant>,
    /// Distinguishes this session from any earlier one
    pub generation: u64,
}

impl Session {
    pub fn new(config: SessionConfig, shuffler: &mut dyn Shuffler, generation: u64) -> Self {
        let sequence = generate_sequence(&config.mode, config.difficulty);
        let targets = assign_positions(&sequence, shuffler);
        Self {
            config,
            sequence,
            targets,
            cursor: 0,
            started_at: None,
            ended_at: None,
            generation,
        }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Value the next correct tap must carry, `None` once finished
    pub fn expected(&self) -> Option<u32> {
        self.sequence.get(self.cursor).copied()
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn has_finished(&self) -> bool {
        self.cursor == self.sequence.len()
    }

    /// Check `value` against the expected one and advance on a match.
    ///
    /// The start instant is taken on the first correct tap only; a miss never
    /// touches the cursor, the targets or the timestamps.
    pub fn validate(&mut self, value: u32, now: Instant) -> Validation {
        let Some(expected) = self.expected() else {
            return Validation::Rejected;
        };
        if value != expected {
            return Validation::Rejected;
        }

        if self.cursor == 0 && self.started_at.is_none() {
            self.started_at = Some(now);
        }

        if let Some(target) = self
            .targets
            .iter_mut()
            .find(|t| t.value == value && !t.completed)
        {
            target.completed = true;
        }
        self.cursor += 1;

        if self.has_finished() {
            if self.started_at.is_some() {
                self.ended_at = Some(now);
            }
            Validation::Finished
        } else {
            Validation::Advanced
        }
    }

    /// Running time while playing, frozen once finished, zero before start
    pub fn elapsed(&self, now: Instant) -> Duration {
        match (self.started_at, self.ended_at) {
            (Some(start), Some(end)) => end.saturating_duration_since(start),
            (Some(start), None) => now.saturating_duration_since(start),
            _ => Duration::ZERO,
        }
    }

    pub fn completed_count(&self) -> usize {
        self.targets.iter().filter(|t| t.completed).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::{base_mode, multiples_mode};
    use crate::placement::ThreadRngShuffler;

    fn base_session() -> Session {
        Session::new(
            SessionConfig::new(base_mode(), Difficulty::Small),
            &mut ThreadRngShuffler,
            1,
        )
    }

    #[test]
    fn test_new_session_state() {
        let session = base_session();
        assert_eq!(session.len(), 9);
        assert_eq!(session.cursor, 0);
        assert_eq!(session.expected(), Some(1));
        assert!(!session.has_started());
        assert!(!session.has_finished());
        assert_eq!(session.completed_count(), 0);
    }

    #[test]
    fn test_base_mode_forces_small() {
        let config = SessionConfig::new(base_mode(), Difficulty::Large);
        assert_eq!(config.difficulty, Difficulty::Small);
        assert_eq!(config.mode_key(), "Basic (1-9)");
    }

    #[test]
    fn test_correct_tap_advances_by_one() {
        let mut session = base_session();
        let now = Instant::now();
        assert_eq!(session.validate(1, now), Validation::Advanced);
        assert_eq!(session.cursor, 1);
        assert_eq!(session.completed_count(), 1);
        assert!(session.targets.iter().any(|t| t.value == 1 && t.completed));
        assert_eq!(session.started_at, Some(now));
    }

    #[test]
    fn test_wrong_first_tap_does_not_start_timer() {
        let mut session = base_session();
        assert_eq!(session.validate(5, Instant::now()), Validation::Rejected);
        assert!(session.started_at.is_none());
        assert_eq!(session.cursor, 0);
        assert_eq!(session.completed_count(), 0);
    }

    #[test]
    fn test_completed_value_is_rejected() {
        let mut session = base_session();
        let now = Instant::now();
        session.validate(1, now);
        let before = session.targets.clone();
        assert_eq!(session.validate(1, now), Validation::Rejected);
        assert_eq!(session.cursor, 1);
        assert_eq!(session.targets, before);
    }

    #[test]
    fn test_finish_freezes_elapsed() {
        let mode = multiples_mode(5).unwrap();
        let mut session = Session::new(
            SessionConfig::new(mode, Difficulty::Small),
            &mut ThreadRngShuffler,
            1,
        );
        let start = Instant::now();
        let values = session.sequence.clone();
        let last = values.len() - 1;
        for (i, v) in values.into_iter().enumerate() {
            let at = start + Duration::from_millis(100 * i as u64);
            let expected = if i == last {
                Validation::Finished
            } else {
                Validation::Advanced
            };
            assert_eq!(session.validate(v, at), expected);
        }
        assert!(session.has_finished());
        assert_eq!(session.expected(), None);
        let frozen = session.elapsed(start + Duration::from_secs(60));
        assert_eq!(frozen, Duration::from_millis(800));
        assert_eq!(session.validate(45, start), Validation::Rejected);
    }

    #[test]
    fn test_elapsed_before_start_is_zero() {
        let session = base_session();
        assert_eq!(session.elapsed(Instant::now()), Duration::ZERO);
    }
}
