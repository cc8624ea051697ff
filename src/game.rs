use std::time::{Duration, Instant};

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::mode::{Difficulty, Mode};
use crate::placement::{Shuffler, ThreadRngShuffler};
use crate::runtime::RefreshTimer;
use crate::scores::{KeyValueStore, ScoreBoard, ScoreRecord};
use crate::session::{Session, SessionConfig, Validation};

/// Shortest time that can be recorded; a finish can never score zero
const MIN_ELAPSED_SECS: f64 = 0.001;

/// Which screen the game is on
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameScreen {
    Menu,
    /// Waiting for the player to pick a grid size for this mode
    Difficulty(Mode),
    Playing,
    Finished,
}

/// Summary of a finished session, shown on the results screen
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub mode_key: String,
    pub elapsed_secs: f64,
    pub previous_best: Option<f64>,
    pub is_new_record: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TapOutcome {
    /// Not playing, nothing happened
    Ignored,
    Correct,
    Incorrect,
    Completed(Completion),
}

/// Transient "wrong number" flash tied to the session that raised it
#[derive(Debug, Clone, Copy, PartialEq)]
struct MissFeedback {
    generation: u64,
    expires_at: Instant,
}

/// Owns the screen flow, the live session and the score board.
///
/// It is the only mutator of game state; the display reads from it after
/// every call.
pub struct GameController {
    screen: GameScreen,
    session: Option<Session>,
    board: ScoreBoard,
    store: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
    shuffler: Box<dyn Shuffler>,
    timer: RefreshTimer,
    feedback: Option<MissFeedback>,
    feedback_duration: Duration,
    last_generation: u64,
    last_completion: Option<Completion>,
}

impl GameController {
    /// Controller on the menu screen with scores read from `store`
    pub fn new(store: Box<dyn KeyValueStore>, config: &Config) -> Self {
        let board = ScoreBoard::load(store.as_ref());
        Self {
            screen: GameScreen::Menu,
            session: None,
            board,
            store,
            clock: Box::new(SystemClock),
            shuffler: Box::new(ThreadRngShuffler),
            timer: RefreshTimer::new(config.tick_interval()),
            feedback: None,
            feedback_duration: config.feedback_duration(),
            last_generation: 0,
            last_completion: None,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_shuffler(mut self, shuffler: impl Shuffler + 'static) -> Self {
        self.shuffler = Box::new(shuffler);
        self
    }

    pub fn screen(&self) -> GameScreen {
        self.screen
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn board(&self) -> &ScoreBoard {
        &self.board
    }

    pub fn best_for(&self, mode_key: &str) -> Option<f64> {
        self.board.best_for(mode_key)
    }

    pub fn last_completion(&self) -> Option<&Completion> {
        self.last_completion.as_ref()
    }

    pub fn generation(&self) -> Option<u64> {
        self.session.as_ref().map(|s| s.generation)
    }

    pub fn timer_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Elapsed time of the current session for the readout
    pub fn elapsed(&self) -> Duration {
        self.session
            .as_ref()
            .map(|s| s.elapsed(self.clock.now()))
            .unwrap_or_default()
    }

    pub fn feedback_active(&self) -> bool {
        match (self.feedback, self.generation()) {
            (Some(fb), Some(generation)) => {
                fb.generation == generation && self.clock.now() < fb.expires_at
            }
            _ => false,
        }
    }

    /// Clear the miss flash raised by session `generation`. Late calls for an
    /// older session leave the current flag alone.
    pub fn clear_feedback(&mut self, generation: u64) {
        if self.feedback.is_some_and(|fb| fb.generation == generation) {
            self.feedback = None;
        }
    }

    /// Menu: pick a mode. The base mode starts right away at 3x3, the others
    /// ask for a grid size first.
    pub fn select_mode(&mut self, mode: Mode) -> bool {
        if self.screen != GameScreen::Menu {
            return false;
        }

        log::info!("mode selected: {}", mode.name);
        if mode.offers_difficulty() {
            self.screen = GameScreen::Difficulty(mode);
        } else {
            self.start_session(SessionConfig::new(mode, Difficulty::Small));
        }
        true
    }

    pub fn choose_difficulty(&mut self, difficulty: Difficulty) -> bool {
        let GameScreen::Difficulty(mode) = self.screen else {
            return false;
        };
        self.start_session(SessionConfig::new(mode, difficulty));
        true
    }

    /// Register a tap on `value`
    pub fn tap(&mut self, value: u32) -> TapOutcome {
        if self.screen != GameScreen::Playing {
            return TapOutcome::Ignored;
        }
        let now = self.clock.now();
        let Some(session) = self.session.as_mut() else {
            return TapOutcome::Ignored;
        };

        match session.validate(value, now) {
            Validation::Advanced => TapOutcome::Correct,
            Validation::Rejected => {
                log::debug!(
                    "miss: tapped {} expecting {:?}",
                    value,
                    session.expected()
                );
                self.feedback = Some(MissFeedback {
                    generation: session.generation,
                    expires_at: now + self.feedback_duration,
                });
                TapOutcome::Incorrect
            }
            Validation::Finished => {
                let mode_key = session.config.mode_key();
                let started = session.has_started();
                let elapsed_secs = session.elapsed(now).as_secs_f64().max(MIN_ELAPSED_SECS);
                self.finish(mode_key, elapsed_secs, started)
            }
        }
    }

    /// Enter/Space shortcut: submit whatever value is expected next
    pub fn confirm(&mut self) -> TapOutcome {
        if self.screen != GameScreen::Playing {
            return TapOutcome::Ignored;
        }
        match self.session.as_ref().and_then(|s| s.expected()) {
            Some(expected) => self.tap(expected),
            None => TapOutcome::Ignored,
        }
    }

    /// Back to the menu, dropping any session without scoring it
    pub fn menu(&mut self) -> bool {
        if self.screen == GameScreen::Menu {
            return false;
        }
        if self.screen == GameScreen::Playing {
            log::info!("session abandoned");
        }
        self.timer.cancel();
        self.feedback = None;
        self.session = None;
        self.screen = GameScreen::Menu;
        true
    }

    /// Finished: play the same mode and grid size again on a fresh board
    pub fn replay(&mut self) -> bool {
        if self.screen != GameScreen::Finished {
            return false;
        }
        let Some(config) = self.session.as_ref().map(|s| s.config) else {
            return false;
        };
        self.start_session(config);
        true
    }

    /// Periodic housekeeping. Returns true when the display should redraw.
    pub fn on_tick(&mut self) -> bool {
        let now = self.clock.now();
        let mut redraw = false;

        if let Some(fb) = self.feedback {
            if now >= fb.expires_at {
                self.clear_feedback(fb.generation);
                redraw = true;
            }
        }

        if let Some(session) = self.session.as_ref() {
            if self.timer.poll(session.generation, now) && session.has_started() {
                redraw = true;
            }
        }

        redraw
    }

    fn start_session(&mut self, config: SessionConfig) {
        self.timer.cancel();
        self.feedback = None;
        self.last_completion = None;
        self.last_generation += 1;

        let session = Session::new(config, self.shuffler.as_mut(), self.last_generation);
        log::info!(
            "session {} started: {} ({} targets)",
            session.generation,
            config.mode_key(),
            session.len()
        );
        self.timer.start(session.generation, self.clock.now());
        self.session = Some(session);
        self.screen = GameScreen::Playing;
    }

    fn finish(&mut self, mode_key: String, elapsed_secs: f64, started: bool) -> TapOutcome {
        self.timer.cancel();
        self.feedback = None;
        self.screen = GameScreen::Finished;

        if !started {
            log::warn!("session finished without a start time, not scoring it");
            return TapOutcome::Ignored;
        }

        let insertion = self
            .board
            .insert(ScoreRecord::today(mode_key.clone(), elapsed_secs));
        if let Err(e) = self.board.save(self.store.as_ref()) {
            log::warn!("could not save scores: {}", e);
        }

        log::info!(
            "finished {} in {:.2}s{}",
            mode_key,
            elapsed_secs,
            if insertion.is_new_record {
                " (new record)"
            } else {
                ""
            }
        );

        let completion = Completion {
            mode_key,
            elapsed_secs,
            previous_best: insertion.previous_best,
            is_new_record: insertion.is_new_record,
        };
        self.last_completion = Some(completion.clone());
        TapOutcome::Completed(completion)
    }
}
