//! The three word games and the table used to launch them.

pub mod falling;
pub mod matching;
pub mod unscramble;

use std::time::Instant;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::navigation::AppContext;
use crate::words::WordPair;

pub use falling::{FallingConfig, FallingGame};
pub use matching::MatchingGame;
pub use unscramble::UnscrambleGame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKind {
    Matching = 0,
    Falling = 1,
    Unscramble = 2,
}

impl GameKind {
    pub const ALL: [GameKind; 3] = [GameKind::Matching, GameKind::Falling, GameKind::Unscramble];

    pub fn id(self) -> &'static str {
        match self {
            GameKind::Matching => "brick",
            GameKind::Falling => "falling",
            GameKind::Unscramble => "unscr",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }

    pub fn title(self) -> &'static str {
        match self {
            GameKind::Matching => "Pair wall",
            GameKind::Falling => "Falling words",
            GameKind::Unscramble => "Unscramble",
        }
    }

    /// Name recorded in the analytics trail.
    pub fn analytics_name(self) -> &'static str {
        match self {
            GameKind::Matching => "brick-match",
            GameKind::Falling => "falling-words",
            GameKind::Unscramble => "unscramble",
        }
    }

    pub fn launcher(self) -> Launcher {
        LAUNCHERS[self as usize].1
    }
}

/// Everything a game needs besides the words.
pub struct GameSetup {
    pub lesson_id: Option<String>,
    pub rng: StdRng,
    pub now: Instant,
}

pub type Launcher = fn(&[WordPair], GameSetup, &mut AppContext) -> GameSession;

const LAUNCHERS: [(GameKind, Launcher); 3] = [
    (GameKind::Matching, launch_matching),
    (GameKind::Falling, launch_falling),
    (GameKind::Unscramble, launch_unscramble),
];

fn launch_matching(words: &[WordPair], setup: GameSetup, ctx: &mut AppContext) -> GameSession {
    GameSession::Matching(MatchingGame::start(words, setup, ctx))
}

fn launch_falling(words: &[WordPair], setup: GameSetup, ctx: &mut AppContext) -> GameSession {
    GameSession::Falling(FallingGame::start(words, FallingConfig::default(), setup, ctx))
}

fn launch_unscramble(words: &[WordPair], setup: GameSetup, ctx: &mut AppContext) -> GameSession {
    GameSession::Unscramble(UnscrambleGame::start(words, setup, ctx))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "snake_case")]
pub enum GameSummary {
    Matching {
        pairs_total: usize,
        errors: u32,
    },
    Falling {
        errors: u32,
        speed: f64,
        time_shown: String,
        rounds_played: usize,
    },
    Unscramble {
        words_total: usize,
        errors: u32,
    },
}

pub enum GameSession {
    Matching(MatchingGame),
    Falling(FallingGame),
    Unscramble(UnscrambleGame),
}

impl GameSession {
    pub fn kind(&self) -> GameKind {
        match self {
            GameSession::Matching(_) => GameKind::Matching,
            GameSession::Falling(_) => GameKind::Falling,
            GameSession::Unscramble(_) => GameKind::Unscramble,
        }
    }

    pub fn is_finished(&self) -> bool {
        match self {
            GameSession::Matching(g) => g.is_won(),
            GameSession::Falling(g) => g.summary().is_some(),
            GameSession::Unscramble(g) => g.summary().is_some(),
        }
    }

    pub fn tick(&mut self, now: Instant, ctx: &mut AppContext) {
        if let GameSession::Falling(g) = self {
            g.tick(now, ctx);
        }
    }

    pub fn restart(&mut self, now: Instant, ctx: &mut AppContext) {
        match self {
            GameSession::Matching(g) => g.restart(ctx),
            GameSession::Falling(g) => g.restart(now, ctx),
            GameSession::Unscramble(g) => g.restart(ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_and_table_is_aligned() {
        for kind in GameKind::ALL {
            assert_eq!(GameKind::from_id(kind.id()), Some(kind));
            assert_eq!(LAUNCHERS[kind as usize].0, kind);
        }
        assert_eq!(GameKind::from_id("chess"), None);
    }

    #[test]
    fn launchers_produce_their_own_kind() {
        use rand::SeedableRng;

        let words = vec![WordPair::new("cat", "кот"), WordPair::new("dog", "пёс")];
        let mut ctx = AppContext::detached();
        for kind in GameKind::ALL {
            let setup = GameSetup {
                lesson_id: Some("L1".to_string()),
                rng: StdRng::seed_from_u64(1),
                now: Instant::now(),
            };
            let session = kind.launcher()(&words, setup, &mut ctx);
            assert_eq!(session.kind(), kind);
            assert!(!session.is_finished());
        }
    }
}
