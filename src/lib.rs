//! Vocabulary trainer core.
//!
//! Books of lessons are loaded from a JSON word source. A lesson (or the
//! whole book, or the words flagged as hard) becomes the active word set,
//! which can be listed, studied as flashcards or played in one of three
//! games. The GUI (`vocab`) and terminal (`vocab-tui`) binaries drive the
//! [`navigation::Navigator`] and render whatever screen it holds.

pub mod analytics;
pub mod config;
pub mod error;
pub mod games;
pub mod gesture;
pub mod hard_words;
pub mod list_view;
pub mod logging;
pub mod navigation;
pub mod viewer;
pub mod word_set;
pub mod words;

pub use error::{Result, VocabError};
pub use games::{GameKind, GameSession};
pub use navigation::{AppContext, HomeAction, HomeTarget, Navigator, Screen, ScreenKind};
pub use word_set::{ActiveWordSet, HardWordKey, WordSetMode};
pub use words::{JsonFileSource, WordPair, WordSource};

use std::path::PathBuf;

use analytics::{Analytics, JsonLinesBackend};
use config::Settings;
use hard_words::HardWordStore;

/// Builds the navigator both frontends start from: settings, persisted hard
/// words, the analytics writer and the word file. Settings are saved back so
/// a generated user id survives restarts.
pub fn bootstrap(words_arg: Option<PathBuf>) -> (Navigator, Settings) {
    if let Err(e) = config::ensure_config_dir() {
        log::warn!("could not create config dir: {}", e);
    }
    let mut settings = Settings::load();
    let analytics = if settings.analytics {
        let user_id = settings.ensure_user_id();
        Analytics::spawn(
            JsonLinesBackend::new(config::analytics_file()),
            Some(user_id),
        )
    } else {
        Analytics::disabled()
    };

    let words_path = settings.resolve_words_path(words_arg);
    settings.words_path = Some(words_path.clone());
    settings.save();

    let ctx = AppContext::new(HardWordStore::open(config::hard_words_file()), analytics);
    let mut nav = Navigator::new(Box::new(JsonFileSource::new(words_path)), ctx);
    nav.boot(settings.last_book.as_deref());
    (nav, settings)
}
