//! Falling words: pick the translation before the word hits the floor.
//!
//! Every word is asked `repeats_per_word` times, each pass in a fresh order.
//! Correct answers and words that reach the floor speed the game up; the
//! multiplier never goes down.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::{GameKind, GameSetup, GameSummary};
use crate::navigation::AppContext;
use crate::words::WordPair;

#[derive(Debug, Clone, Copy)]
pub struct FallingConfig {
    pub repeats_per_word: usize,
    pub options: usize,
    pub base_secs: f64,
    pub min_secs: f64,
    pub accel_step: f64,
    /// Granularity of the elapsed-time display.
    pub clock_resolution: Duration,
}

impl Default for FallingConfig {
    fn default() -> Self {
        Self {
            repeats_per_word: 3,
            options: 4,
            base_secs: 4.0,
            min_secs: 1.8,
            accel_step: 0.10 / 3.0,
            clock_resolution: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    pub text: String,
    pub correct: bool,
}

#[derive(Debug, Clone)]
pub struct Round {
    /// 1-based.
    pub number: usize,
    pub target: WordPair,
    pub options: Vec<AnswerOption>,
    pub spawned_at: Instant,
    pub fall: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceOutcome {
    Correct,
    Wrong,
    Ignored,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FallingSummary {
    pub duration: Duration,
    pub errors: u32,
    pub speed: f64,
    pub rounds_played: usize,
}

enum Phase {
    Empty,
    Playing(Round),
    Finished(FallingSummary),
}

pub struct FallingGame {
    config: FallingConfig,
    words: Vec<WordPair>,
    queue: Vec<WordPair>,
    next: usize,
    errors: u32,
    speed: f64,
    started_at: Instant,
    clock: Duration,
    phase: Phase,
    lesson_id: Option<String>,
    rng: StdRng,
}

impl FallingGame {
    pub fn start(
        words: &[WordPair],
        config: FallingConfig,
        setup: GameSetup,
        ctx: &mut AppContext,
    ) -> Self {
        let mut game = Self {
            config,
            words: words.to_vec(),
            queue: Vec::new(),
            next: 0,
            errors: 0,
            speed: 1.0,
            started_at: setup.now,
            clock: Duration::ZERO,
            phase: Phase::Empty,
            lesson_id: setup.lesson_id,
            rng: setup.rng,
        };
        game.begin(setup.now, ctx);
        game
    }

    fn begin(&mut self, now: Instant, ctx: &mut AppContext) {
        self.next = 0;
        self.errors = 0;
        self.speed = 1.0;
        self.started_at = now;
        self.clock = Duration::ZERO;

        if self.words.is_empty() {
            self.queue.clear();
            self.phase = Phase::Empty;
            return;
        }

        ctx.analytics
            .game_start(GameKind::Falling.analytics_name(), self.lesson_id.as_deref());
        self.queue = self.build_queue();
        self.next_round(now, ctx);
    }

    pub fn restart(&mut self, now: Instant, ctx: &mut AppContext) {
        self.begin(now, ctx);
    }

    fn build_queue(&mut self) -> Vec<WordPair> {
        let mut queue = Vec::with_capacity(self.words.len() * self.config.repeats_per_word);
        for _ in 0..self.config.repeats_per_word {
            let mut batch = self.words.clone();
            batch.shuffle(&mut self.rng);
            queue.extend(batch);
        }
        queue
    }

    /// The correct translation plus distinct distractors taken from the other
    /// pairs, shuffled.
    fn build_options(&mut self, target: &WordPair) -> Vec<AnswerOption> {
        let pool: BTreeSet<&str> = self
            .words
            .iter()
            .map(|p| p.back.as_str())
            .filter(|b| *b != target.back)
            .collect();
        let mut pool: Vec<&str> = pool.into_iter().collect();
        pool.shuffle(&mut self.rng);

        let mut options: Vec<AnswerOption> = pool
            .into_iter()
            .take(self.config.options.saturating_sub(1))
            .map(|text| AnswerOption {
                text: text.to_string(),
                correct: false,
            })
            .collect();
        options.push(AnswerOption {
            text: target.back.clone(),
            correct: true,
        });
        options.shuffle(&mut self.rng);
        options
    }

    pub fn fall_duration(&self) -> Duration {
        Duration::from_secs_f64((self.config.base_secs / self.speed).max(self.config.min_secs))
    }

    fn next_round(&mut self, now: Instant, ctx: &mut AppContext) {
        let Some(target) = self.queue.get(self.next).cloned() else {
            self.finish(now, ctx);
            return;
        };
        self.next += 1;
        let options = self.build_options(&target);
        self.phase = Phase::Playing(Round {
            number: self.next,
            target,
            options,
            spawned_at: now,
            fall: self.fall_duration(),
        });
    }

    fn accelerate(&mut self) {
        self.speed += self.config.accel_step;
    }

    fn miss(&mut self, ctx: &mut AppContext) {
        self.errors += 1;
        ctx.analytics.game_error();
    }

    pub fn choose(&mut self, option: usize, now: Instant, ctx: &mut AppContext) -> ChoiceOutcome {
        let Phase::Playing(round) = &self.phase else {
            return ChoiceOutcome::Ignored;
        };
        let Some(correct) = round.options.get(option).map(|o| o.correct) else {
            return ChoiceOutcome::Ignored;
        };

        self.update_clock(now);
        if correct {
            self.accelerate();
        } else {
            self.miss(ctx);
        }
        self.next_round(now, ctx);

        if correct {
            ChoiceOutcome::Correct
        } else {
            ChoiceOutcome::Wrong
        }
    }

    /// Advances the clock and lands the falling word once its time is up.
    /// Returns true when the word reached the floor unanswered.
    pub fn tick(&mut self, now: Instant, ctx: &mut AppContext) -> bool {
        if matches!(self.phase, Phase::Finished(_)) {
            return false;
        }
        self.update_clock(now);

        let landed = match &self.phase {
            Phase::Playing(round) => now.duration_since(round.spawned_at) >= round.fall,
            _ => false,
        };
        if landed {
            self.miss(ctx);
            self.accelerate();
            self.next_round(now, ctx);
        }
        landed
    }

    fn update_clock(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.started_at);
        let step = self.config.clock_resolution.as_millis().max(1);
        let steps = elapsed.as_millis() / step;
        self.clock = Duration::from_millis((steps * step) as u64);
    }

    fn finish(&mut self, now: Instant, ctx: &mut AppContext) {
        self.update_clock(now);
        let summary = FallingSummary {
            duration: now.saturating_duration_since(self.started_at),
            errors: self.errors,
            speed: self.speed,
            rounds_played: self.queue.len(),
        };
        ctx.analytics.game_end(GameSummary::Falling {
            errors: summary.errors,
            speed: summary.speed,
            time_shown: self.clock_display(),
            rounds_played: summary.rounds_played,
        });
        self.phase = Phase::Finished(summary);
    }

    pub fn round(&self) -> Option<&Round> {
        match &self.phase {
            Phase::Playing(round) => Some(round),
            _ => None,
        }
    }

    /// How far the current word has fallen, 0.0 at the top, 1.0 on the floor.
    pub fn fall_progress(&self, now: Instant) -> f32 {
        match &self.phase {
            Phase::Playing(round) => {
                let t = now.saturating_duration_since(round.spawned_at).as_secs_f32();
                (t / round.fall.as_secs_f32()).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    pub fn summary(&self) -> Option<&FallingSummary> {
        match &self.phase {
            Phase::Finished(summary) => Some(summary),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.phase, Phase::Empty)
    }

    pub fn errors(&self) -> u32 {
        self.errors
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn speed_display(&self) -> String {
        format!("{:.1}x", self.speed)
    }

    pub fn clock_display(&self) -> String {
        format!("{:.1}s", self.clock.as_secs_f64())
    }

    pub fn rounds_total(&self) -> usize {
        self.queue.len()
    }

    pub fn queue(&self) -> &[WordPair] {
        &self.queue
    }
}
