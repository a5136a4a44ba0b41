//! Unscramble: type the word back from its shuffled letters.

use rand::rngs::StdRng;
use rand::seq::{index, SliceRandom};
use rand::Rng;

use super::{GameKind, GameSetup, GameSummary};
use crate::navigation::AppContext;
use crate::words::WordPair;

/// Words shorter than this are shown as-is.
pub const MIN_SCRAMBLE_LEN: usize = 3;
pub const ATTEMPTS_PER_WORD: u32 = 2;
const SCRAMBLE_FRACTION: f64 = 0.6;
const MAX_SCRAMBLE_ATTEMPTS: usize = 8;

/// Shuffles a share of the letters inside each space-delimited token.
/// Spaces stay where they are. Output differs from the input whenever some
/// token has two different letters.
pub fn scramble<R: Rng + ?Sized>(word: &str, rng: &mut R) -> String {
    if word.chars().count() < MIN_SCRAMBLE_LEN {
        return word.to_string();
    }
    for _ in 0..MAX_SCRAMBLE_ATTEMPTS {
        let candidate = word
            .split(' ')
            .map(|token| scramble_token(token, rng))
            .collect::<Vec<_>>()
            .join(" ");
        if candidate != word {
            return candidate;
        }
    }
    swap_first_difference(word).unwrap_or_else(|| word.to_string())
}

fn scramble_token<R: Rng + ?Sized>(token: &str, rng: &mut R) -> String {
    let mut chars: Vec<char> = token.chars().collect();
    let len = chars.len();
    if len < 2 {
        return token.to_string();
    }
    let amount = ((len as f64 * SCRAMBLE_FRACTION).round() as usize).clamp(2, len);
    let positions = index::sample(rng, len, amount).into_vec();
    let mut letters: Vec<char> = positions.iter().map(|&p| chars[p]).collect();
    letters.shuffle(rng);
    for (&p, c) in positions.iter().zip(letters) {
        chars[p] = c;
    }
    chars.into_iter().collect()
}

fn swap_first_difference(word: &str) -> Option<String> {
    let mut tokens: Vec<Vec<char>> = word.split(' ').map(|t| t.chars().collect()).collect();
    let token = tokens
        .iter_mut()
        .find(|t| t.iter().any(|c| Some(c) != t.first()))?;
    let j = token.iter().position(|c| Some(c) != token.first())?;
    token.swap(0, j);
    Some(
        tokens
            .into_iter()
            .map(|t| t.into_iter().collect::<String>())
            .collect::<Vec<_>>()
            .join(" "),
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Correct,
    Wrong { attempts_left: u32 },
    /// Second miss; the game moved on to the next word.
    OutOfAttempts { answer: String },
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnscrambleSummary {
    pub words_total: usize,
    pub errors: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle<'a> {
    /// 1-based.
    pub number: usize,
    pub total: usize,
    pub scrambled: &'a str,
    pub translation: &'a str,
    pub attempts_left: u32,
}

pub struct UnscrambleGame {
    words: Vec<WordPair>,
    index: usize,
    scrambled: String,
    attempts_left: u32,
    word_had_error: bool,
    errors: u32,
    summary: Option<UnscrambleSummary>,
    lesson_id: Option<String>,
    rng: StdRng,
}

impl UnscrambleGame {
    pub fn start(words: &[WordPair], setup: GameSetup, ctx: &mut AppContext) -> Self {
        let mut game = Self {
            words: words.to_vec(),
            index: 0,
            scrambled: String::new(),
            attempts_left: ATTEMPTS_PER_WORD,
            word_had_error: false,
            errors: 0,
            summary: None,
            lesson_id: setup.lesson_id,
            rng: setup.rng,
        };
        game.begin(ctx);
        game
    }

    fn begin(&mut self, ctx: &mut AppContext) {
        self.index = 0;
        self.errors = 0;
        self.summary = None;
        if !self.words.is_empty() {
            ctx.analytics
                .game_start(GameKind::Unscramble.analytics_name(), self.lesson_id.as_deref());
        }
        self.present();
    }

    pub fn restart(&mut self, ctx: &mut AppContext) {
        self.begin(ctx);
    }

    fn present(&mut self) {
        self.attempts_left = ATTEMPTS_PER_WORD;
        self.word_had_error = false;
        self.scrambled = match self.words.get(self.index) {
            Some(pair) => scramble(&pair.front, &mut self.rng),
            None => String::new(),
        };
    }

    fn advance(&mut self, ctx: &mut AppContext) {
        self.index += 1;
        if self.index >= self.words.len() {
            let summary = UnscrambleSummary {
                words_total: self.words.len(),
                errors: self.errors,
            };
            ctx.analytics.game_end(GameSummary::Unscramble {
                words_total: summary.words_total,
                errors: summary.errors,
            });
            self.summary = Some(summary);
            self.scrambled.clear();
        } else {
            self.present();
        }
    }

    pub fn submit(&mut self, input: &str, ctx: &mut AppContext) -> AttemptOutcome {
        if self.summary.is_some() {
            return AttemptOutcome::Ignored;
        }
        let Some(pair) = self.words.get(self.index) else {
            return AttemptOutcome::Ignored;
        };

        if input.trim().to_lowercase() == pair.front.trim().to_lowercase() {
            self.advance(ctx);
            return AttemptOutcome::Correct;
        }

        self.attempts_left = self.attempts_left.saturating_sub(1);
        if !self.word_had_error {
            self.word_had_error = true;
            self.errors += 1;
            ctx.analytics.game_error();
        }
        if self.attempts_left == 0 {
            let answer = pair.front.clone();
            self.advance(ctx);
            AttemptOutcome::OutOfAttempts { answer }
        } else {
            AttemptOutcome::Wrong {
                attempts_left: self.attempts_left,
            }
        }
    }

    pub fn puzzle(&self) -> Option<Puzzle<'_>> {
        if self.summary.is_some() {
            return None;
        }
        let pair = self.words.get(self.index)?;
        Some(Puzzle {
            number: self.index + 1,
            total: self.words.len(),
            scrambled: &self.scrambled,
            translation: &pair.back,
            attempts_left: self.attempts_left,
        })
    }

    pub fn summary(&self) -> Option<&UnscrambleSummary> {
        self.summary.as_ref()
    }

    pub fn errors(&self) -> u32 {
        self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use rand::SeedableRng;

    use super::*;

    fn sorted(s: &str) -> Vec<char> {
        let mut v: Vec<char> = s.chars().collect();
        v.sort_unstable();
        v
    }

    #[test]
    fn short_words_are_untouched() {
        let mut rng = StdRng::seed_from_u64(1);
        for w in ["", "a", "at", "ёж"] {
            assert_eq!(scramble(w, &mut rng), w);
        }
    }

    #[test]
    fn longer_words_always_change() {
        let mut rng = StdRng::seed_from_u64(2);
        for w in ["cat", "dog", "ab c", "heavy", "ice cream", "молоко", "look after", "aab"] {
            for _ in 0..50 {
                let s = scramble(w, &mut rng);
                assert_ne!(s, w, "{} was not scrambled", w);
                assert_eq!(sorted(&s), sorted(w));
            }
        }
    }

    #[test]
    fn spaces_stay_in_place() {
        let mut rng = StdRng::seed_from_u64(3);
        let word = "give up on it";
        for _ in 0..20 {
            let s = scramble(word, &mut rng);
            let spaces: Vec<usize> = s.match_indices(' ').map(|(i, _)| i).collect();
            assert_eq!(spaces, vec![4, 7, 10]);
            for (a, b) in s.split(' ').zip(word.split(' ')) {
                assert_eq!(sorted(a), sorted(b));
            }
        }
    }

    #[test]
    fn identical_letters_cannot_change() {
        let mut rng = StdRng::seed_from_u64(4);
        assert_eq!(scramble("aaa", &mut rng), "aaa");
        assert_eq!(scramble("a b c", &mut rng), "a b c");
    }

    #[test]
    fn fallback_swap_changes_word() {
        assert_eq!(swap_first_difference("aab").as_deref(), Some("baa"));
        assert_eq!(swap_first_difference("zz xy").as_deref(), Some("zz yx"));
        assert_eq!(swap_first_difference("aa a"), None);
    }

    fn game(words: &[(&str, &str)], ctx: &mut AppContext) -> UnscrambleGame {
        let words: Vec<WordPair> = words.iter().map(|(f, b)| WordPair::new(*f, *b)).collect();
        let setup = GameSetup {
            lesson_id: None,
            rng: StdRng::seed_from_u64(5),
            now: Instant::now(),
        };
        UnscrambleGame::start(&words, setup, ctx)
    }

    #[test]
    fn answers_are_trimmed_and_case_insensitive() {
        let mut ctx = AppContext::detached();
        let mut g = game(&[("Heavy", "тяжёлый"), ("light", "лёгкий")], &mut ctx);
        assert_eq!(g.puzzle().unwrap().translation, "тяжёлый");
        assert_eq!(g.submit("  hEAVY ", &mut ctx), AttemptOutcome::Correct);
        assert_eq!(g.puzzle().unwrap().number, 2);
        assert_eq!(g.errors(), 0);
    }

    #[test]
    fn first_miss_is_charged_once() {
        let mut ctx = AppContext::detached();
        let mut g = game(&[("heavy", "тяжёлый"), ("light", "лёгкий")], &mut ctx);

        assert_eq!(
            g.submit("heavvy", &mut ctx),
            AttemptOutcome::Wrong { attempts_left: 1 }
        );
        assert_eq!(g.errors(), 1);
        assert_eq!(ctx.analytics.game_errors(), Some(1));

        assert_eq!(
            g.submit("hevay", &mut ctx),
            AttemptOutcome::OutOfAttempts {
                answer: "heavy".to_string()
            }
        );
        assert_eq!(g.errors(), 1);
        assert_eq!(ctx.analytics.game_errors(), Some(1));

        let p = g.puzzle().unwrap();
        assert_eq!((p.number, p.attempts_left), (2, 2));
    }

    #[test]
    fn game_ends_after_last_word() {
        let mut ctx = AppContext::detached();
        let mut g = game(&[("cat", "кот"), ("dog", "пёс")], &mut ctx);
        g.submit("cat", &mut ctx);
        g.submit("x", &mut ctx);
        g.submit("y", &mut ctx);

        assert!(g.puzzle().is_none());
        assert_eq!(
            g.summary(),
            Some(&UnscrambleSummary {
                words_total: 2,
                errors: 1
            })
        );
        assert_eq!(g.submit("dog", &mut ctx), AttemptOutcome::Ignored);

        g.restart(&mut ctx);
        assert_eq!(g.puzzle().unwrap().number, 1);
        assert!(g.summary().is_none());
    }

    #[test]
    fn empty_word_set_has_no_puzzle() {
        let mut ctx = AppContext::detached();
        let mut g = game(&[], &mut ctx);
        assert!(g.is_empty());
        assert!(g.puzzle().is_none());
        assert_eq!(g.submit("anything", &mut ctx), AttemptOutcome::Ignored);
    }
}
