//! Which screen is visible and which word set is active.
//!
//! The [`Navigator`] owns the active set and the [`AppContext`]; the mode on
//! screen only borrows the set (through an `Rc`) and receives the context on
//! each call. Leaving a screen drops its mode, which closes its analytics
//! spans and discards its timers.

use std::mem;
use std::rc::Rc;
use std::time::Instant;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::analytics::Analytics;
use crate::error::Result;
use crate::games::{GameKind, GameSession, GameSetup};
use crate::hard_words::HardWordStore;
use crate::list_view::ListView;
use crate::viewer::FlashcardViewer;
use crate::word_set::{ActiveWordSet, WordSetMode};
use crate::words::{BookInfo, Lesson, WordSource};

/// Shared services handed to every mode.
pub struct AppContext {
    pub hard_words: HardWordStore,
    pub analytics: Analytics,
}

impl AppContext {
    pub fn new(hard_words: HardWordStore, analytics: Analytics) -> Self {
        Self {
            hard_words,
            analytics,
        }
    }

    /// In-memory hard words, no analytics.
    pub fn detached() -> Self {
        Self::new(HardWordStore::in_memory(), Analytics::disabled())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeTarget {
    Menu,
    LessonList,
    ListView,
}

/// The "back" affordance shown next to the title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HomeAction {
    pub label: &'static str,
    pub target: HomeTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    Menu,
    LessonList,
    ListView,
    CardViewer,
    Game(GameKind),
}

pub enum Screen {
    Menu,
    LessonList,
    ListView(ListView),
    CardViewer(FlashcardViewer),
    Game(GameSession),
}

impl Screen {
    pub fn kind(&self) -> ScreenKind {
        match self {
            Screen::Menu => ScreenKind::Menu,
            Screen::LessonList => ScreenKind::LessonList,
            Screen::ListView(_) => ScreenKind::ListView,
            Screen::CardViewer(_) => ScreenKind::CardViewer,
            Screen::Game(g) => ScreenKind::Game(g.kind()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Screen::Menu => "menu",
            Screen::LessonList => "lessons",
            Screen::ListView(_) => "word list",
            Screen::CardViewer(_) => "cards",
            Screen::Game(g) => g.kind().title(),
        }
    }
}

pub struct Navigator {
    source: Box<dyn WordSource>,
    books: Vec<BookInfo>,
    book_id: String,
    lessons: Vec<Lesson>,
    active: Option<Rc<ActiveWordSet>>,
    screen: Screen,
    home: Option<HomeAction>,
    /// One-shot subscription to the next lesson selection.
    pending_game: Option<GameKind>,
    load_error: Option<String>,
    ctx: AppContext,
    rng: StdRng,
}

impl Navigator {
    pub fn new(source: Box<dyn WordSource>, ctx: AppContext) -> Self {
        Self::with_rng(source, ctx, StdRng::from_os_rng())
    }

    pub fn with_rng(source: Box<dyn WordSource>, ctx: AppContext, rng: StdRng) -> Self {
        Self {
            source,
            books: Vec::new(),
            book_id: String::new(),
            lessons: Vec::new(),
            active: None,
            screen: Screen::Menu,
            home: None,
            pending_game: None,
            load_error: None,
            ctx,
            rng,
        }
    }

    /// Loads the book list, opens `preferred_book` (or the first book) and
    /// shows the menu. Load failures are kept in [`Navigator::load_error`].
    pub fn boot(&mut self, preferred_book: Option<&str>) {
        self.ctx.analytics.start_session();
        self.books.clear();
        self.lessons.clear();
        info!("loading words from {}", self.source.describe());

        match self.source.fetch() {
            Ok(library) => {
                self.books = library.books();
                let book_id = preferred_book
                    .filter(|id| self.books.iter().any(|b| b.id == *id))
                    .map(str::to_string)
                    .or_else(|| self.books.first().map(|b| b.id.clone()))
                    .unwrap_or_else(|| "1".to_string());
                match library.lessons(&book_id) {
                    Ok(lessons) => {
                        self.lessons = lessons;
                        self.load_error = None;
                    }
                    Err(e) => self.fail_load(&e.to_string()),
                }
                self.book_id = book_id;
            }
            Err(e) => self.fail_load(&e.to_string()),
        }
        self.go_menu();
    }

    /// Switches to another word source and boots from it.
    pub fn reload_from(&mut self, source: Box<dyn WordSource>, preferred_book: Option<&str>) {
        self.source = source;
        self.active = None;
        self.pending_game = None;
        self.boot(preferred_book);
    }

    pub fn select_book(&mut self, book_id: &str) -> Result<()> {
        let result = self
            .source
            .fetch()
            .and_then(|library| library.lessons(book_id));
        match result {
            Ok(lessons) => {
                debug!("book {} selected, {} lessons", book_id, lessons.len());
                self.book_id = book_id.to_string();
                self.lessons = lessons;
                self.load_error = None;
                self.go_menu();
                Ok(())
            }
            Err(e) => {
                self.fail_load(&e.to_string());
                self.go_menu();
                Err(e)
            }
        }
    }

    fn fail_load(&mut self, message: &str) {
        warn!("failed to load word source: {}", message);
        self.load_error = Some(format!("Could not load words: {}", message));
    }

    fn leave_screen(&mut self) {
        match mem::replace(&mut self.screen, Screen::Menu) {
            Screen::ListView(view) => {
                view.close(&mut self.ctx);
            }
            Screen::CardViewer(viewer) => {
                viewer.close(&mut self.ctx);
            }
            Screen::Game(game) => {
                if !game.is_finished() {
                    self.ctx.analytics.game_abandon();
                }
            }
            Screen::Menu | Screen::LessonList => {}
        }
        self.home = None;
    }

    fn child_rng(&mut self) -> StdRng {
        StdRng::from_rng(&mut self.rng)
    }

    pub fn go_menu(&mut self) {
        self.leave_screen();
        debug!("screen: menu");
    }

    pub fn go_lessons(&mut self) {
        self.leave_screen();
        self.screen = Screen::LessonList;
        debug!("screen: lessons");
    }

    pub fn open_lesson(&mut self, index: usize) {
        let Some(lesson) = self.lessons.get(index) else {
            return;
        };
        let set = Rc::new(ActiveWordSet::from_lesson(&self.book_id, lesson));
        self.ctx.analytics.lesson_opened(&lesson.id);
        self.active = Some(set);
        self.enter_list_view();

        if let Some(kind) = self.pending_game.take() {
            if self.active.as_ref().is_some_and(|s| !s.is_empty()) {
                self.launch(kind);
            }
        }
    }

    pub fn open_lesson_by_id(&mut self, lesson_id: &str) {
        if let Some(index) = self.lessons.iter().position(|l| l.id == lesson_id) {
            self.open_lesson(index);
        }
    }

    fn enter_list_view(&mut self) {
        let Some(set) = self.active.clone() else {
            self.go_menu();
            return;
        };
        self.leave_screen();
        self.screen = Screen::ListView(ListView::open(set, &mut self.ctx));
        self.home = Some(HomeAction {
            label: "Back to lessons",
            target: HomeTarget::LessonList,
        });
        debug!("screen: list view");
    }

    /// Flashcards for the lesson currently on screen.
    pub fn start_self_check(&mut self) {
        if let Some(set) = self.active.clone() {
            self.enter_viewer(set);
        }
    }

    pub fn play_all(&mut self) {
        let set = Rc::new(ActiveWordSet::all(&self.book_id, &self.lessons));
        self.active = Some(set.clone());
        self.enter_viewer(set);
    }

    pub fn play_hard(&mut self) {
        let set = Rc::new(ActiveWordSet::hard(
            &self.book_id,
            &self.lessons,
            &self.ctx.hard_words,
        ));
        self.active = Some(set.clone());
        self.enter_viewer(set);
    }

    fn enter_viewer(&mut self, set: Rc<ActiveWordSet>) {
        self.leave_screen();
        self.home = Some(match set.mode() {
            WordSetMode::Lesson => HomeAction {
                label: "Back to list",
                target: HomeTarget::ListView,
            },
            WordSetMode::All | WordSetMode::Hard => HomeAction {
                label: "Back to menu",
                target: HomeTarget::Menu,
            },
        });
        let rng = self.child_rng();
        self.screen = Screen::CardViewer(FlashcardViewer::open(set, &mut self.ctx, rng));
        debug!("screen: cards");
    }

    /// Starts a game on the active set, or parks the request and asks for a
    /// lesson first. Returns true if the game started.
    pub fn request_game(&mut self, kind: GameKind) -> bool {
        if self.active.as_ref().is_some_and(|s| !s.is_empty()) {
            self.launch(kind);
            return true;
        }
        debug!("game {} waits for a lesson", kind.id());
        self.pending_game = Some(kind);
        self.go_lessons();
        false
    }

    fn launch(&mut self, kind: GameKind) {
        let Some(set) = self.active.clone() else {
            return;
        };
        self.leave_screen();
        let setup = GameSetup {
            lesson_id: set.lesson_id().map(str::to_string),
            rng: self.child_rng(),
            now: Instant::now(),
        };
        let session = kind.launcher()(set.pairs(), setup, &mut self.ctx);
        self.screen = Screen::Game(session);
        self.home = Some(HomeAction {
            label: "Back to menu",
            target: HomeTarget::Menu,
        });
        debug!("screen: game {}", kind.id());
    }

    pub fn go_home(&mut self) {
        let Some(home) = self.home else {
            return;
        };
        match home.target {
            HomeTarget::Menu => self.go_menu(),
            HomeTarget::LessonList => self.go_lessons(),
            HomeTarget::ListView => self.enter_list_view(),
        }
    }

    pub fn tick(&mut self, now: Instant) {
        match &mut self.screen {
            Screen::CardViewer(viewer) => viewer.tick(now, &mut self.ctx),
            Screen::Game(game) => game.tick(now, &mut self.ctx),
            _ => {}
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_kind(&self) -> ScreenKind {
        self.screen.kind()
    }

    /// The mode on screen together with the context its operations need.
    pub fn screen_and_context(&mut self) -> (&mut Screen, &mut AppContext) {
        (&mut self.screen, &mut self.ctx)
    }

    pub fn home(&self) -> Option<HomeAction> {
        self.home
    }

    pub fn books(&self) -> &[BookInfo] {
        &self.books
    }

    pub fn book_id(&self) -> &str {
        &self.book_id
    }

    pub fn book_title(&self) -> &str {
        self.books
            .iter()
            .find(|b| b.id == self.book_id)
            .map(|b| b.title.as_str())
            .unwrap_or("")
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn active(&self) -> Option<&Rc<ActiveWordSet>> {
        self.active.as_ref()
    }

    pub fn pending_game(&self) -> Option<GameKind> {
        self.pending_game
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn hard_count(&self) -> usize {
        self.ctx.hard_words.len()
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    /// Closes the current mode and ends the analytics session. Safe to call
    /// more than once.
    pub fn close(&mut self) {
        self.leave_screen();
        self.ctx.analytics.end_session();
    }

    pub fn shutdown(mut self) {
        self.close();
        let Navigator { ctx, .. } = self;
        ctx.analytics.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::words::InlineSource;

    const WORDS: &str = r#"{ "books": [
        { "id": 1, "title": "Starter", "lessons": [
            { "id": "L1", "title": "Pets", "words": [["cat", "кот"], ["dog", "пёс"]] },
            { "title": "Empty" }
        ] },
        { "id": "2", "title": "Second", "lessons": [
            { "words": [["sun", "солнце"]] }
        ] }
    ] }"#;

    fn navigator() -> Navigator {
        let mut nav = Navigator::with_rng(
            Box::new(InlineSource::new(WORDS)),
            AppContext::detached(),
            StdRng::seed_from_u64(17),
        );
        nav.boot(None);
        nav
    }

    #[test]
    fn boot_lands_on_menu_with_first_book() {
        let nav = navigator();
        assert_eq!(nav.screen_kind(), ScreenKind::Menu);
        assert_eq!(nav.book_id(), "1");
        assert_eq!(nav.book_title(), "Starter");
        assert_eq!(nav.lessons().len(), 2);
        assert_eq!(nav.lessons()[1].id, "L2");
        assert!(nav.home().is_none());
        assert!(nav.load_error().is_none());
    }

    #[test]
    fn preferred_book_is_used_when_present() {
        let mut nav = Navigator::with_rng(
            Box::new(InlineSource::new(WORDS)),
            AppContext::detached(),
            StdRng::seed_from_u64(1),
        );
        nav.boot(Some("2"));
        assert_eq!(nav.book_id(), "2");
        assert_eq!(nav.lessons()[0].title, "Урок 1");
    }

    #[test]
    fn broken_source_reports_and_stays_on_menu() {
        let mut nav = Navigator::with_rng(
            Box::new(InlineSource::new(r#"{ "nope": true }"#)),
            AppContext::detached(),
            StdRng::seed_from_u64(1),
        );
        nav.boot(None);
        assert_eq!(nav.screen_kind(), ScreenKind::Menu);
        assert!(nav.load_error().is_some());
        assert!(nav.lessons().is_empty());
    }

    #[test]
    fn selecting_unknown_book_keeps_previous_lessons() {
        let mut nav = navigator();
        nav.go_lessons();
        assert!(nav.select_book("404").is_err());
        assert_eq!(nav.screen_kind(), ScreenKind::Menu);
        assert!(nav.load_error().unwrap().contains("404"));
        assert_eq!(nav.book_id(), "1");

        nav.select_book("2").unwrap();
        assert!(nav.load_error().is_none());
        assert_eq!(nav.lessons().len(), 1);
    }

    #[test]
    fn home_targets_follow_the_mode() {
        let mut nav = navigator();
        nav.open_lesson(0);
        assert_eq!(nav.screen_kind(), ScreenKind::ListView);
        assert_eq!(nav.home().unwrap().target, HomeTarget::LessonList);

        nav.start_self_check();
        assert_eq!(nav.screen_kind(), ScreenKind::CardViewer);
        assert_eq!(nav.home().unwrap().target, HomeTarget::ListView);
        nav.go_home();
        assert_eq!(nav.screen_kind(), ScreenKind::ListView);
        nav.go_home();
        assert_eq!(nav.screen_kind(), ScreenKind::LessonList);

        nav.play_all();
        assert_eq!(nav.home().unwrap().target, HomeTarget::Menu);
        assert_eq!(nav.active().unwrap().len(), 2);
        nav.go_home();
        assert_eq!(nav.screen_kind(), ScreenKind::Menu);
    }

    #[test]
    fn pending_game_launches_once_on_next_lesson() {
        let mut nav = navigator();
        assert!(!nav.request_game(GameKind::Unscramble));
        assert_eq!(nav.screen_kind(), ScreenKind::LessonList);
        assert_eq!(nav.pending_game(), Some(GameKind::Unscramble));

        nav.open_lesson(0);
        assert_eq!(nav.screen_kind(), ScreenKind::Game(GameKind::Unscramble));
        assert_eq!(nav.pending_game(), None);

        nav.go_lessons();
        nav.open_lesson(0);
        assert_eq!(nav.screen_kind(), ScreenKind::ListView);
    }

    #[test]
    fn pending_game_is_dropped_when_lesson_is_empty() {
        let mut nav = navigator();
        nav.request_game(GameKind::Matching);
        nav.open_lesson(1);
        assert_eq!(nav.screen_kind(), ScreenKind::ListView);
        assert_eq!(nav.pending_game(), None);
    }

    #[test]
    fn lesson_lookup_by_id() {
        let mut nav = navigator();
        nav.open_lesson_by_id("missing");
        assert_eq!(nav.screen_kind(), ScreenKind::Menu);

        nav.open_lesson_by_id("L2");
        assert_eq!(nav.screen_kind(), ScreenKind::ListView);
        assert_eq!(nav.active().unwrap().lesson_id(), Some("L2"));
    }

    #[test]
    fn game_with_active_lesson_starts_immediately() {
        let mut nav = navigator();
        nav.open_lesson(0);
        assert!(nav.request_game(GameKind::Falling));
        assert_eq!(nav.screen_kind(), ScreenKind::Game(GameKind::Falling));
        assert_eq!(nav.home().unwrap().target, HomeTarget::Menu);
        nav.go_home();
        assert_eq!(nav.screen_kind(), ScreenKind::Menu);
    }

    #[test]
    fn hard_mode_uses_flagged_words_only() {
        let mut nav = navigator();
        nav.play_all();
        {
            let (screen, ctx) = nav.screen_and_context();
            let Screen::CardViewer(viewer) = screen else {
                panic!("expected card viewer");
            };
            while viewer.current_key().unwrap().index != 1 {
                viewer.next();
            }
            viewer.toggle_hard(ctx);
        }
        assert_eq!(nav.hard_count(), 1);

        nav.go_menu();
        nav.play_hard();
        let set = nav.active().unwrap();
        assert_eq!(set.mode(), WordSetMode::Hard);
        assert_eq!(set.pairs()[0].front, "dog");
        assert_eq!(set.len(), set.origins().len());
    }
}
