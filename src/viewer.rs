//! Self-check flashcards over the active word set.

use std::rc::Rc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::gesture::{Gesture, GestureConfig, GestureTracker};
use crate::hard_words::HardWordStore;
use crate::navigation::AppContext;
use crate::word_set::{ActiveWordSet, HardWordKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    FrontFirst,
    BackFirst,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::FrontFirst => Direction::BackFirst,
            Direction::BackFirst => Direction::FrontFirst,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::FrontFirst => "EN→RU",
            Direction::BackFirst => "RU→EN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerCommand {
    Next,
    Prev,
    Reveal,
    Shuffle,
    ToggleDirection,
    ToggleHard,
}

/// What the current card shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFace<'a> {
    pub shown: &'a str,
    pub hidden: &'a str,
    pub revealed: bool,
    /// 1-based.
    pub position: usize,
    pub total: usize,
}

pub struct FlashcardViewer {
    set: Rc<ActiveWordSet>,
    order: Vec<usize>,
    cursor: usize,
    revealed: bool,
    direction: Direction,
    gestures: GestureTracker,
    rng: StdRng,
}

impl FlashcardViewer {
    pub fn open(set: Rc<ActiveWordSet>, ctx: &mut AppContext, rng: StdRng) -> Self {
        ctx.analytics.self_check_start(set.mode(), set.lesson_id());
        Self {
            order: (0..set.len()).collect(),
            set,
            cursor: 0,
            revealed: false,
            direction: Direction::FrontFirst,
            gestures: GestureTracker::new(GestureConfig::default()),
            rng,
        }
    }

    pub fn close(self, ctx: &mut AppContext) -> Rc<ActiveWordSet> {
        ctx.analytics.self_check_end();
        self.set
    }

    pub fn word_set(&self) -> &Rc<ActiveWordSet> {
        &self.set
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// `None` for an empty set.
    pub fn card(&self) -> Option<CardFace<'_>> {
        let pair = self.set.pairs().get(*self.order.get(self.cursor)?)?;
        let (shown, hidden) = match self.direction {
            Direction::FrontFirst => (pair.front.as_str(), pair.back.as_str()),
            Direction::BackFirst => (pair.back.as_str(), pair.front.as_str()),
        };
        Some(CardFace {
            shown,
            hidden,
            revealed: self.revealed,
            position: self.cursor + 1,
            total: self.set.len(),
        })
    }

    pub fn current_key(&self) -> Option<HardWordKey> {
        self.set.key_at(*self.order.get(self.cursor)?)
    }

    pub fn is_current_hard(&self, store: &HardWordStore) -> bool {
        self.current_key().is_some_and(|k| store.contains(&k))
    }

    pub fn next(&mut self) {
        let len = self.set.len();
        if len == 0 {
            return;
        }
        self.cursor = (self.cursor + 1) % len;
        self.revealed = false;
    }

    pub fn prev(&mut self) {
        let len = self.set.len();
        if len == 0 {
            return;
        }
        self.cursor = (self.cursor + len - 1) % len;
        self.revealed = false;
    }

    /// No-op once the current card is revealed.
    pub fn reveal(&mut self) {
        if !self.set.is_empty() {
            self.revealed = true;
        }
    }

    pub fn shuffle(&mut self) {
        if self.set.is_empty() {
            return;
        }
        self.order.shuffle(&mut self.rng);
        self.cursor = 0;
        self.revealed = false;
    }

    pub fn toggle_direction(&mut self) {
        self.direction = self.direction.flipped();
        self.revealed = false;
    }

    /// Flags or unflags the current card. Returns the new membership.
    pub fn toggle_hard(&mut self, ctx: &mut AppContext) -> Option<bool> {
        let key = self.current_key()?;
        Some(ctx.hard_words.toggle(&key))
    }

    pub fn handle(&mut self, command: ViewerCommand, ctx: &mut AppContext) {
        match command {
            ViewerCommand::Next => self.next(),
            ViewerCommand::Prev => self.prev(),
            ViewerCommand::Reveal => self.reveal(),
            ViewerCommand::Shuffle => self.shuffle(),
            ViewerCommand::ToggleDirection => self.toggle_direction(),
            ViewerCommand::ToggleHard => {
                self.toggle_hard(ctx);
            }
        }
    }

    pub fn apply_gesture(&mut self, gesture: Gesture, ctx: &mut AppContext) {
        match gesture {
            Gesture::Tap if self.revealed => self.next(),
            Gesture::Tap => self.reveal(),
            Gesture::LongPress => {
                self.toggle_hard(ctx);
            }
            Gesture::SwipeLeft => self.next(),
            Gesture::SwipeRight => self.prev(),
            Gesture::SwipeUp => self.reveal(),
            Gesture::SwipeDown => self.toggle_direction(),
        }
    }

    pub fn touch_start(&mut self, x: f32, y: f32, now: Instant) {
        self.gestures.press(x, y, now);
    }

    pub fn touch_move(&mut self, x: f32, y: f32) {
        self.gestures.moved(x, y);
    }

    pub fn touch_end(&mut self, now: Instant, ctx: &mut AppContext) -> Option<Gesture> {
        let gesture = self.gestures.release(now)?;
        self.apply_gesture(gesture, ctx);
        Some(gesture)
    }

    /// Drives the long-press timer; called from the frontend tick.
    pub fn tick(&mut self, now: Instant, ctx: &mut AppContext) {
        if let Some(gesture) = self.gestures.poll(now) {
            self.apply_gesture(gesture, ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rand::SeedableRng;

    use super::*;
    use crate::words::{Lesson, WordPair};

    fn viewer(words: &[(&str, &str)]) -> (FlashcardViewer, AppContext) {
        let lesson = Lesson {
            id: "L1".into(),
            title: "Animals".into(),
            words: words.iter().map(|(f, b)| WordPair::new(*f, *b)).collect(),
        };
        let mut ctx = AppContext::detached();
        let set = Rc::new(ActiveWordSet::from_lesson("1", &lesson));
        let v = FlashcardViewer::open(set, &mut ctx, StdRng::seed_from_u64(7));
        (v, ctx)
    }

    #[test]
    fn front_first_card_reveals_translation() {
        let (mut v, _ctx) = viewer(&[("cat", "кот"), ("dog", "пёс")]);
        let card = v.card().unwrap();
        assert_eq!((card.shown, card.revealed, card.position, card.total), ("cat", false, 1, 2));
        v.reveal();
        let card = v.card().unwrap();
        assert!(card.revealed);
        assert_eq!(card.hidden, "кот");
    }

    #[test]
    fn navigation_wraps_both_ways() {
        let (mut v, _ctx) = viewer(&[("a", "1"), ("b", "2"), ("c", "3")]);
        for start in 0..3 {
            while v.cursor() != start {
                v.next();
            }
            v.next();
            v.prev();
            assert_eq!(v.cursor(), start);
        }
        while v.cursor() != 0 {
            v.next();
        }
        v.prev();
        assert_eq!(v.cursor(), 2);
        v.next();
        assert_eq!(v.cursor(), 0);
    }

    #[test]
    fn reveal_is_idempotent_and_reset_by_moves() {
        let (mut v, _ctx) = viewer(&[("a", "1"), ("b", "2")]);
        v.reveal();
        let once = format!("{:?}", v.card());
        v.reveal();
        assert_eq!(format!("{:?}", v.card()), once);
        v.next();
        assert!(!v.is_revealed());
        v.reveal();
        v.toggle_direction();
        assert!(!v.is_revealed());
        assert_eq!(v.card().unwrap().shown, "2");
    }

    #[test]
    fn shuffle_keeps_a_permutation_and_rewinds() {
        let words: Vec<(String, String)> =
            (0..20).map(|i| (format!("w{}", i), format!("t{}", i))).collect();
        let refs: Vec<(&str, &str)> = words.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
        let (mut v, _ctx) = viewer(&refs);
        v.next();
        v.next();
        v.reveal();
        v.shuffle();
        assert_eq!(v.cursor(), 0);
        assert!(!v.is_revealed());
        let mut sorted = v.order().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn hard_flag_uses_stable_key_after_shuffle() {
        let (mut v, mut ctx) = viewer(&[("a", "1"), ("b", "2"), ("c", "3"), ("d", "4")]);
        v.shuffle();
        let key = v.current_key().unwrap();
        assert_eq!(key.index, v.order()[0]);

        assert_eq!(v.toggle_hard(&mut ctx), Some(true));
        assert!(v.is_current_hard(&ctx.hard_words));
        assert_eq!(ctx.hard_words.len(), 1);
        v.handle(ViewerCommand::ToggleHard, &mut ctx);
        assert!(ctx.hard_words.is_empty());
    }

    #[test]
    fn empty_set_has_no_card() {
        let (mut v, mut ctx) = viewer(&[]);
        assert!(v.card().is_none());
        v.next();
        v.prev();
        v.reveal();
        v.shuffle();
        assert_eq!(v.toggle_hard(&mut ctx), None);
        assert!(!v.is_revealed());
    }

    #[test]
    fn gestures_drive_the_card() {
        let (mut v, mut ctx) = viewer(&[("a", "1"), ("b", "2")]);
        let t0 = Instant::now();

        v.touch_start(10.0, 10.0, t0);
        assert_eq!(v.touch_end(t0, &mut ctx), Some(Gesture::Tap));
        assert!(v.is_revealed());

        v.touch_start(10.0, 10.0, t0);
        assert_eq!(v.touch_end(t0, &mut ctx), Some(Gesture::Tap));
        assert_eq!(v.cursor(), 1);

        v.touch_start(10.0, 10.0, t0);
        v.tick(t0 + Duration::from_millis(600), &mut ctx);
        assert_eq!(ctx.hard_words.len(), 1);
        assert_eq!(v.touch_end(t0 + Duration::from_millis(700), &mut ctx), None);

        v.touch_start(100.0, 10.0, t0);
        v.touch_move(20.0, 12.0);
        v.touch_end(t0, &mut ctx);
        assert_eq!(v.cursor(), 0);

        v.touch_start(10.0, 10.0, t0);
        v.touch_move(10.0, 90.0);
        v.touch_end(t0, &mut ctx);
        assert_eq!(v.direction(), Direction::BackFirst);
    }
}
