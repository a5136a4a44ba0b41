//! Pair wall: find the two tiles that belong to the same word pair.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::{GameKind, GameSetup, GameSummary};
use crate::navigation::AppContext;
use crate::words::WordPair;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub pair_id: usize,
    pub side: Side,
    pub text: String,
    pub matched: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickState {
    Idle,
    FirstPicked(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    /// Matched tile, out of range, or the already selected tile.
    Ignored,
    Selected(usize),
    Matched { first: usize, second: usize, won: bool },
    Mismatched { first: usize, second: usize },
}

pub struct MatchingGame {
    pairs: Vec<WordPair>,
    tiles: Vec<Tile>,
    state: PickState,
    errors: u32,
    lesson_id: Option<String>,
    rng: StdRng,
}

impl MatchingGame {
    pub fn start(words: &[WordPair], setup: GameSetup, ctx: &mut AppContext) -> Self {
        let mut game = Self {
            pairs: words.to_vec(),
            tiles: Vec::new(),
            state: PickState::Idle,
            errors: 0,
            lesson_id: setup.lesson_id,
            rng: setup.rng,
        };
        game.deal(ctx);
        game
    }

    fn deal(&mut self, ctx: &mut AppContext) {
        self.tiles = self
            .pairs
            .iter()
            .enumerate()
            .flat_map(|(pair_id, pair)| {
                [
                    Tile {
                        pair_id,
                        side: Side::Front,
                        text: pair.front.clone(),
                        matched: false,
                    },
                    Tile {
                        pair_id,
                        side: Side::Back,
                        text: pair.back.clone(),
                        matched: false,
                    },
                ]
            })
            .collect();
        self.tiles.shuffle(&mut self.rng);
        self.state = PickState::Idle;
        self.errors = 0;

        if !self.pairs.is_empty() {
            ctx.analytics
                .game_start(GameKind::Matching.analytics_name(), self.lesson_id.as_deref());
        }
    }

    /// Deals the same pairs again.
    pub fn restart(&mut self, ctx: &mut AppContext) {
        self.deal(ctx);
    }

    pub fn pick(&mut self, index: usize, ctx: &mut AppContext) -> PickOutcome {
        match self.tiles.get(index) {
            Some(tile) if !tile.matched => {}
            _ => return PickOutcome::Ignored,
        }

        let first = match self.state {
            PickState::Idle => {
                self.state = PickState::FirstPicked(index);
                return PickOutcome::Selected(index);
            }
            PickState::FirstPicked(first) if first == index => return PickOutcome::Ignored,
            PickState::FirstPicked(first) => first,
        };
        self.state = PickState::Idle;

        let (a, b) = (&self.tiles[first], &self.tiles[index]);
        if a.pair_id == b.pair_id && a.side != b.side {
            self.tiles[first].matched = true;
            self.tiles[index].matched = true;
            let won = self.is_won();
            if won {
                ctx.analytics.game_end(GameSummary::Matching {
                    pairs_total: self.pairs.len(),
                    errors: self.errors,
                });
            }
            PickOutcome::Matched {
                first,
                second: index,
                won,
            }
        } else {
            self.errors += 1;
            ctx.analytics.game_error();
            PickOutcome::Mismatched {
                first,
                second: index,
            }
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn state(&self) -> PickState {
        self.state
    }

    pub fn errors(&self) -> u32 {
        self.errors
    }

    pub fn pairs_total(&self) -> usize {
        self.pairs.len()
    }

    pub fn unmatched(&self) -> usize {
        self.tiles.iter().filter(|t| !t.matched).count()
    }

    pub fn pairs_left(&self) -> usize {
        self.unmatched() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn is_won(&self) -> bool {
        !self.is_empty() && self.unmatched() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use rand::SeedableRng;

    use super::*;
    use crate::analytics::testing::MemoryBackend;
    use crate::analytics::{Analytics, Record};
    use crate::hard_words::HardWordStore;

    fn setup(seed: u64) -> GameSetup {
        GameSetup {
            lesson_id: Some("L1".to_string()),
            rng: StdRng::seed_from_u64(seed),
            now: Instant::now(),
        }
    }

    fn partner(game: &MatchingGame, index: usize) -> usize {
        let tile = &game.tiles()[index];
        game.tiles()
            .iter()
            .position(|t| t.pair_id == tile.pair_id && t.side != tile.side)
            .unwrap()
    }

    #[test]
    fn one_pair_wins_without_errors() {
        let backend = MemoryBackend::default();
        let mut ctx = AppContext::new(
            HardWordStore::in_memory(),
            Analytics::spawn(backend.clone(), Some("u1".to_string())),
        );
        let mut game = MatchingGame::start(&[WordPair::new("cat", "кот")], setup(3), &mut ctx);
        assert_eq!(game.tiles().len(), 2);

        assert_eq!(game.pick(1, &mut ctx), PickOutcome::Selected(1));
        assert_eq!(
            game.pick(0, &mut ctx),
            PickOutcome::Matched {
                first: 1,
                second: 0,
                won: true
            }
        );
        assert_eq!(game.unmatched(), 0);
        assert_eq!(game.errors(), 0);
        assert!(game.is_won());

        drop(ctx);
        assert_eq!(
            backend.records(),
            vec![Record::GameRun {
                game_name: "brick-match".to_string(),
                lesson_id: Some("L1".to_string()),
                duration_sec: 0,
                errors: 0,
                summary: GameSummary::Matching {
                    pairs_total: 1,
                    errors: 0
                },
            }]
        );
    }

    #[test]
    fn tiles_are_two_per_pair() {
        let words: Vec<WordPair> = (0..6)
            .map(|i| WordPair::new(format!("f{}", i), format!("b{}", i)))
            .collect();
        let mut ctx = AppContext::detached();
        let game = MatchingGame::start(&words, setup(9), &mut ctx);
        assert_eq!(game.tiles().len(), 12);
        for pair_id in 0..6 {
            let sides: Vec<Side> = game
                .tiles()
                .iter()
                .filter(|t| t.pair_id == pair_id)
                .map(|t| t.side)
                .collect();
            assert_eq!(sides.len(), 2);
            assert_ne!(sides[0], sides[1]);
        }
    }

    #[test]
    fn mismatch_counts_an_error_and_resets_pick() {
        let words = vec![WordPair::new("cat", "кот"), WordPair::new("dog", "пёс")];
        let mut ctx = AppContext::detached();
        let mut game = MatchingGame::start(&words, setup(5), &mut ctx);

        let first = 0;
        let wrong = (0..4)
            .find(|&i| i != first && i != partner(&game, first))
            .unwrap();
        game.pick(first, &mut ctx);
        assert_eq!(
            game.pick(wrong, &mut ctx),
            PickOutcome::Mismatched {
                first,
                second: wrong
            }
        );
        assert_eq!(game.errors(), 1);
        assert_eq!(ctx.analytics.game_errors(), Some(1));
        assert_eq!(game.state(), PickState::Idle);
        assert_eq!(game.unmatched(), 4);
    }

    #[test]
    fn repeated_and_matched_picks_are_ignored() {
        let words = vec![WordPair::new("cat", "кот"), WordPair::new("dog", "пёс")];
        let mut ctx = AppContext::detached();
        let mut game = MatchingGame::start(&words, setup(11), &mut ctx);

        game.pick(2, &mut ctx);
        assert_eq!(game.pick(2, &mut ctx), PickOutcome::Ignored);
        let other = partner(&game, 2);
        assert!(matches!(
            game.pick(other, &mut ctx),
            PickOutcome::Matched { won: false, .. }
        ));
        assert_eq!(game.pick(other, &mut ctx), PickOutcome::Ignored);
        assert_eq!(game.pick(99, &mut ctx), PickOutcome::Ignored);
        assert_eq!(game.pairs_left(), 1);
    }

    #[test]
    fn restart_deals_fresh_tiles() {
        let words = vec![WordPair::new("cat", "кот"), WordPair::new("dog", "пёс")];
        let mut ctx = AppContext::detached();
        let mut game = MatchingGame::start(&words, setup(13), &mut ctx);
        let p = partner(&game, 0);
        game.pick(0, &mut ctx);
        game.pick(p, &mut ctx);
        game.restart(&mut ctx);
        assert_eq!(game.unmatched(), 4);
        assert_eq!(game.errors(), 0);
        assert!(!game.is_won());
    }

    #[test]
    fn empty_word_set_is_never_won() {
        let mut ctx = AppContext::detached();
        let game = MatchingGame::start(&[], setup(1), &mut ctx);
        assert!(game.is_empty());
        assert!(!game.is_won());
    }
}
