use crate::question::{build_set, AnswerLabel, Question, RawQuestion, ValidationError};
use crate::session::{PerQuestion, SessionConfig, SessionResult};
use crate::timer::CountdownTimer;
use crate::TICK_RATE_MS;
use std::time::SystemTime;

/// How long an expired question stays on screen (correct answer revealed)
/// before the session advances on its own.
pub const REVEAL_DELAY_MS: u64 = 2_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    InProgress,
    Completed,
}

/// Mutable per-question record. Owned by the session; everything else reads
/// snapshots. `viewed` is sticky, and `time_expired` implies `viewed`.
#[derive(Clone, Debug, PartialEq)]
pub struct QuestionState {
    pub user_answer: Option<AnswerLabel>,
    pub time_expired: bool,
    pub viewed: bool,
    pub time_left_at_entry: u64,
}

impl QuestionState {
    fn new(seconds_per_question: u64) -> Self {
        Self {
            user_answer: None,
            time_expired: false,
            viewed: false,
            time_left_at_entry: seconds_per_question,
        }
    }

    /// Locked means the answer can never change again. The lock is
    /// time-based: an answer alone leaves the question correctable until
    /// its clock runs out.
    pub fn is_locked(&self) -> bool {
        self.time_expired
    }
}

/// One quiz run: cursor, per-question states, countdown, and the final
/// result snapshot. All mutation happens through the methods below, on the
/// event loop; duplicate transition triggers within a tick window are dropped
/// by the `transitioning` latch rather than queued.
#[derive(Debug)]
pub struct Quiz {
    pub config: SessionConfig,
    questions: Vec<Question>,
    states: Vec<QuestionState>,
    current: usize,
    phase: Phase,
    timer: CountdownTimer,
    reveal_delay_ms: Option<u64>,
    transitioning: bool,
    started_at: Option<SystemTime>,
    result: Option<SessionResult>,
}

impl Quiz {
    pub fn new(config: SessionConfig) -> Self {
        let timer = CountdownTimer::new(config.seconds_per_question);
        Self {
            config,
            questions: vec![],
            states: vec![],
            current: 0,
            phase: Phase::NotStarted,
            timer,
            reveal_delay_ms: None,
            transitioning: false,
            started_at: None,
            result: None,
        }
    }

    /// Validate and accept a question set, arm the first question's clock and
    /// enter `InProgress`. A malformed set is rejected wholesale and the
    /// session stays `NotStarted`. Calling this on anything but a fresh
    /// session is a stale trigger and is ignored.
    pub fn start(&mut self, raw: &[RawQuestion]) -> Result<(), ValidationError> {
        if self.phase != Phase::NotStarted {
            return Ok(());
        }
        let questions = build_set(raw)?;
        self.states = questions
            .iter()
            .map(|_| QuestionState::new(self.config.seconds_per_question))
            .collect();
        self.questions = questions;
        self.current = 0;
        self.started_at = Some(SystemTime::now());
        self.timer.start();
        self.phase = Phase::InProgress;
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn has_started(&self) -> bool {
        self.phase != Phase::NotStarted
    }

    pub fn has_finished(&self) -> bool {
        self.phase == Phase::Completed
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn states(&self) -> &[QuestionState] {
        &self.states
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    pub fn current_state(&self) -> Option<&QuestionState> {
        self.states.get(self.current)
    }

    pub fn is_last_question(&self) -> bool {
        !self.questions.is_empty() && self.current == self.questions.len() - 1
    }

    /// The expired question is held on screen, answer revealed, until the
    /// delayed auto-advance fires.
    pub fn is_revealing(&self) -> bool {
        self.reveal_delay_ms.is_some()
    }

    /// Seconds to show on the countdown display. Frozen questions (expired,
    /// or revisited via navigation) show zero.
    pub fn display_seconds(&self) -> u64 {
        if self.phase != Phase::InProgress {
            return 0;
        }
        if self.timer.is_running() {
            self.timer.seconds_remaining()
        } else {
            0
        }
    }

    /// Record (or correct) the answer for the current question. Rejected once
    /// the clock has stopped: after expiry, during the reveal window, on a
    /// frozen revisited question, and in any phase but `InProgress` (stale
    /// UI callbacks land here and are dropped silently).
    pub fn select_answer(&mut self, label: AnswerLabel) -> bool {
        if self.phase != Phase::InProgress || !self.timer.is_running() {
            return false;
        }
        let time_left = self.timer.seconds_remaining();
        let state = &mut self.states[self.current];
        if state.is_locked() {
            return false;
        }
        state.user_answer = Some(label);
        state.viewed = true;
        state.time_left_at_entry = time_left;
        true
    }

    /// User-initiated "Next". Requires the current question to be viewed
    /// (answered or expired). On the last index this completes the session.
    /// A previously-viewed target is shown frozen; an unvisited target gets
    /// a full clock.
    pub fn advance(&mut self) -> bool {
        if self.phase != Phase::InProgress || self.transitioning {
            return false;
        }
        if !self.states[self.current].viewed {
            return false;
        }
        self.transitioning = true;
        self.timer.stop();

        if self.current == self.questions.len() - 1 {
            self.complete();
        } else {
            self.current += 1;
            if !self.states[self.current].viewed {
                self.timer.restart();
            }
        }
        true
    }

    /// User-initiated "Previous". The target is always viewed by
    /// construction, so it is shown frozen; navigation never touches
    /// recorded answers.
    pub fn retreat(&mut self) -> bool {
        if self.phase != Phase::InProgress || self.transitioning || self.current == 0 {
            return false;
        }
        self.timer.stop();
        self.current -= 1;
        true
    }

    /// Explicit "Finish Quiz", valid only on the last question. Same path as
    /// `advance` so completion can never double-count.
    pub fn finish(&mut self) -> bool {
        if self.phase != Phase::InProgress || !self.is_last_question() {
            return false;
        }
        self.advance()
    }

    /// Advance the session clock by one event-loop tick. Releases the
    /// transition latch (outside the reveal window), counts down the reveal
    /// delay, and fires question expiry.
    pub fn on_tick(&mut self) {
        if self.phase != Phase::InProgress {
            self.transitioning = false;
            return;
        }

        if let Some(ms) = self.reveal_delay_ms {
            let remaining = ms.saturating_sub(TICK_RATE_MS);
            if remaining == 0 {
                self.reveal_delay_ms = None;
                self.advance_after_expiry();
            } else {
                self.reveal_delay_ms = Some(remaining);
            }
            return;
        }

        self.transitioning = false;

        if self.timer.tick(TICK_RATE_MS) {
            self.expire_current();
        }
    }

    /// Stop the clock and drop any pending transition so a torn-down session
    /// can never receive a late expiry.
    pub fn dispose(&mut self) {
        self.timer.stop();
        self.reveal_delay_ms = None;
        self.transitioning = false;
    }

    /// Completed-session snapshot; consumers get a copy, never a live view.
    pub fn result(&self) -> Option<SessionResult> {
        self.result.clone()
    }

    fn expire_current(&mut self) {
        let state = &mut self.states[self.current];
        state.time_expired = true;
        state.viewed = true;
        if state.user_answer.is_none() {
            state.time_left_at_entry = 0;
        }
        // Latch held for the whole reveal window; manual triggers during it
        // are dropped, the delayed transition below is the only exit.
        self.transitioning = true;
        self.reveal_delay_ms = Some(REVEAL_DELAY_MS);
    }

    fn advance_after_expiry(&mut self) {
        if self.current == self.questions.len() - 1 {
            self.complete();
        } else {
            self.current += 1;
            if !self.states[self.current].viewed {
                self.timer.restart();
            }
        }
        self.transitioning = false;
    }

    fn complete(&mut self) {
        self.timer.stop();
        self.phase = Phase::Completed;

        let score = self
            .questions
            .iter()
            .zip(self.states.iter())
            .filter(|(q, s)| s.user_answer == Some(q.correct))
            .count();
        let per_question = self
            .questions
            .iter()
            .zip(self.states.iter())
            .map(|(q, s)| PerQuestion::new(q, s.user_answer))
            .collect();
        let time_spent_ms = self
            .started_at
            .and_then(|t| t.elapsed().ok())
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        self.result = Some(SessionResult {
            score,
            total_questions: self.questions.len(),
            per_question,
            time_spent_ms,
            difficulty: self.config.difficulty,
            course: self.config.course.clone(),
        });
    }
}
