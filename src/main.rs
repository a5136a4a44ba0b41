//! Vocab Trainer - desktop GUI
//!
//! Keyboard shortcuts:
//!   L / A / X     - Lessons, all words, hard words (menu)
//!   1 / 2 / 3     - Pair wall, falling words, unscramble
//!   C             - Self-check the open lesson
//!   Space         - Reveal card
//!   Left/Right    - Previous/next card (Enter: next)
//!   S / D / H     - Shuffle, switch direction, mark hard
//!   R             - Play again (finished game)
//!   O             - Open words file
//!   Escape        - Back; quits from the menu

use iced::event::{self, Event};
use iced::keyboard::{self, Key};
use iced::theme::{self, Theme};
use iced::widget::{
    button, column, container, mouse_area, pick_list, row, scrollable, text, text_input, Column,
    Row, Space,
};
use iced::{
    executor, mouse, time, touch, window, Application, Color, Command, Element, Length, Point,
    Settings, Subscription,
};
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use vocab::config;
use vocab::games::falling::FallingGame;
use vocab::games::matching::{MatchingGame, PickState};
use vocab::games::unscramble::{AttemptOutcome, UnscrambleGame};
use vocab::games::{GameKind, GameSession};
use vocab::list_view::ListView;
use vocab::viewer::{FlashcardViewer, ViewerCommand};
use vocab::{logging, JsonFileSource, Navigator, Screen, ScreenKind};

const TILE_COLUMNS: usize = 4;

pub fn main() -> iced::Result {
    logging::init_stderr();
    let words_arg = std::env::args().nth(1).map(PathBuf::from);
    VocabApp::run(Settings {
        flags: words_arg,
        window: iced::window::Settings {
            size: iced::Size::new(900.0, 640.0),
            min_size: Some(iced::Size::new(640.0, 480.0)),
            exit_on_close_request: false,
            ..Default::default()
        },
        antialiasing: true,
        ..Default::default()
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct BookChoice {
    id: String,
    title: String,
}

impl fmt::Display for BookChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

#[derive(Debug, Clone)]
enum Message {
    Tick(Instant),
    KeyPressed(Key),
    PointerMoved(Point),
    CardPressed,
    TouchStarted(Point),
    PointerReleased,
    OpenFile,
    FileOpened(Option<PathBuf>),
    BookSelected(BookChoice),
    GoMenu,
    GoLessons,
    GoHome,
    OpenLesson(usize),
    PlayAll,
    PlayHard,
    SelfCheck,
    RequestGame(GameKind),
    Viewer(ViewerCommand),
    PickTile(usize),
    ChooseOption(usize),
    AnswerChanged(String),
    SubmitAnswer,
    Restart,
    Quit,
}

struct VocabApp {
    nav: Navigator,
    settings: config::Settings,
    cursor: Point,
    card_pressed: bool,
    answer: String,
    feedback: Option<(String, Color)>,
    status_message: Option<String>,
}

impl Application for VocabApp {
    type Executor = executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = Option<PathBuf>;

    fn new(words_arg: Option<PathBuf>) -> (Self, Command<Message>) {
        let (nav, settings) = vocab::bootstrap(words_arg);
        let status_message = nav
            .load_error()
            .map(|_| "Press O to open a words file".to_string());
        let app = Self {
            nav,
            settings,
            cursor: Point::ORIGIN,
            card_pressed: false,
            answer: String::new(),
            feedback: None,
            status_message,
        };
        (app, Command::none())
    }

    fn title(&self) -> String {
        let book = self.nav.book_title();
        if book.is_empty() {
            "Vocab Trainer".to_string()
        } else {
            format!("Vocab Trainer - {}", book)
        }
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        let kind_before = self.nav.screen_kind();
        let command = self.handle(message);
        if self.nav.screen_kind() != kind_before {
            self.answer.clear();
            self.feedback = None;
            self.card_pressed = false;
        }
        command
    }

    fn view(&self) -> Element<Message> {
        let body: Element<Message> = match self.nav.screen() {
            Screen::Menu => self.view_menu(),
            Screen::LessonList => self.view_lessons(),
            Screen::ListView(view) => view_word_list(view),
            Screen::CardViewer(viewer) => {
                let hard = viewer.is_current_hard(&self.nav.context().hard_words);
                view_cards(viewer, hard)
            }
            Screen::Game(GameSession::Matching(game)) => view_matching(game),
            Screen::Game(GameSession::Falling(game)) => view_falling(game, Instant::now()),
            Screen::Game(GameSession::Unscramble(game)) => {
                view_unscramble(game, &self.answer, self.feedback.as_ref())
            }
        };

        let status_bar = container(
            text(self.status_message.as_deref().unwrap_or(""))
                .size(14)
                .style(Color::from_rgb(0.7, 0.7, 0.3)),
        )
        .width(Length::Fill)
        .padding(5)
        .center_x();

        let content = column![
            self.view_header(),
            container(body)
                .width(Length::Fill)
                .height(Length::Fill)
                .padding(20),
            status_bar,
        ]
        .spacing(0);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(theme::Container::Custom(Box::new(DarkContainer)))
            .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        let needs_clock = matches!(
            self.nav.screen_kind(),
            ScreenKind::CardViewer | ScreenKind::Game(GameKind::Falling)
        );
        let tick = if needs_clock {
            time::every(Duration::from_millis(50)).map(Message::Tick)
        } else {
            Subscription::none()
        };

        let keys = keyboard::on_key_press(|key, _modifiers| Some(Message::KeyPressed(key)));
        let pointer = event::listen_with(pointer_event);

        Subscription::batch([tick, keys, pointer])
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Pointer tracking and window close. Presses only count when they land on
/// the card face, see `view_cards`.
fn pointer_event(event: Event, _status: event::Status) -> Option<Message> {
    match event {
        Event::Window(_, window::Event::CloseRequested) => Some(Message::Quit),
        Event::Mouse(mouse::Event::CursorMoved { position }) => {
            Some(Message::PointerMoved(position))
        }
        Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
            Some(Message::PointerReleased)
        }
        Event::Touch(touch::Event::FingerPressed { position, .. }) => {
            Some(Message::TouchStarted(position))
        }
        Event::Touch(touch::Event::FingerMoved { position, .. }) => {
            Some(Message::PointerMoved(position))
        }
        Event::Touch(touch::Event::FingerLifted { .. }) => Some(Message::PointerReleased),
        _ => None,
    }
}

impl VocabApp {
    fn handle(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::Tick(now) => self.nav.tick(now),
            Message::KeyPressed(key) => return self.handle_key(key),
            Message::PointerMoved(position) => {
                self.cursor = position;
                if self.card_pressed {
                    self.with_viewer(|v, _| v.touch_move(position.x, position.y));
                }
            }
            Message::CardPressed => {
                self.card_pressed = true;
                let p = self.cursor;
                self.with_viewer(|v, _| v.touch_start(p.x, p.y, Instant::now()));
            }
            // The card press arrives before the finger position; restart at the finger.
            Message::TouchStarted(position) => {
                self.cursor = position;
                if self.card_pressed {
                    self.with_viewer(|v, _| {
                        v.touch_start(position.x, position.y, Instant::now())
                    });
                }
            }
            Message::PointerReleased => {
                if std::mem::take(&mut self.card_pressed) {
                    self.with_viewer(|v, ctx| {
                        v.touch_end(Instant::now(), ctx);
                    });
                }
            }
            Message::OpenFile => {
                return Command::perform(
                    async {
                        rfd::AsyncFileDialog::new()
                            .add_filter("Word files", &["json"])
                            .pick_file()
                            .await
                            .map(|f| f.path().to_path_buf())
                    },
                    Message::FileOpened,
                );
            }
            Message::FileOpened(path) => {
                if let Some(path) = path {
                    self.open_words_file(path);
                }
            }
            Message::BookSelected(choice) => match self.nav.select_book(&choice.id) {
                Ok(()) => {
                    self.settings.last_book = Some(choice.id);
                    self.settings.save();
                    self.status_message = Some(format!("Book: {}", choice.title));
                }
                Err(e) => self.status_message = Some(e.to_string()),
            },
            Message::GoMenu => self.nav.go_menu(),
            Message::GoLessons => self.nav.go_lessons(),
            Message::GoHome => self.nav.go_home(),
            Message::OpenLesson(index) => self.nav.open_lesson(index),
            Message::PlayAll => self.nav.play_all(),
            Message::PlayHard => {
                if self.nav.hard_count() > 0 {
                    self.nav.play_hard();
                }
            }
            Message::SelfCheck => self.nav.start_self_check(),
            Message::RequestGame(kind) => {
                if !self.nav.request_game(kind) {
                    self.status_message = Some(format!("Pick a lesson to play {}", kind.title()));
                }
            }
            Message::Viewer(command) => self.with_viewer(|v, ctx| v.handle(command, ctx)),
            Message::PickTile(index) => {
                let (screen, ctx) = self.nav.screen_and_context();
                if let Screen::Game(GameSession::Matching(game)) = screen {
                    game.pick(index, ctx);
                }
            }
            Message::ChooseOption(option) => {
                let (screen, ctx) = self.nav.screen_and_context();
                if let Screen::Game(GameSession::Falling(game)) = screen {
                    game.choose(option, Instant::now(), ctx);
                }
            }
            Message::AnswerChanged(value) => self.answer = value,
            Message::SubmitAnswer => self.submit_answer(),
            Message::Restart => {
                let (screen, ctx) = self.nav.screen_and_context();
                if let Screen::Game(session) = screen {
                    session.restart(Instant::now(), ctx);
                }
                self.feedback = None;
            }
            Message::Quit => {
                self.save_settings();
                self.nav.close();
                return window::close(window::Id::MAIN);
            }
        }
        Command::none()
    }

    fn handle_key(&mut self, key: Key) -> Command<Message> {
        let kind = self.nav.screen_kind();
        let message = match key.as_ref() {
            Key::Named(keyboard::key::Named::Escape) => match kind {
                ScreenKind::Menu => Message::Quit,
                ScreenKind::LessonList => Message::GoMenu,
                _ => Message::GoHome,
            },
            Key::Named(keyboard::key::Named::ArrowLeft) if kind == ScreenKind::CardViewer => {
                Message::Viewer(ViewerCommand::Prev)
            }
            Key::Named(keyboard::key::Named::ArrowRight) if kind == ScreenKind::CardViewer => {
                Message::Viewer(ViewerCommand::Next)
            }
            Key::Named(keyboard::key::Named::Enter) if kind == ScreenKind::CardViewer => {
                Message::Viewer(ViewerCommand::Next)
            }
            Key::Named(keyboard::key::Named::Space) if kind == ScreenKind::CardViewer => {
                Message::Viewer(ViewerCommand::Reveal)
            }
            Key::Character(c) => {
                let s: &str = c.as_ref();
                match self.char_message(kind, &s.to_lowercase()) {
                    Some(message) => message,
                    None => return Command::none(),
                }
            }
            _ => return Command::none(),
        };
        self.handle(message)
    }

    fn char_message(&self, kind: ScreenKind, s: &str) -> Option<Message> {
        let game = match s {
            "1" => Some(GameKind::Matching),
            "2" => Some(GameKind::Falling),
            "3" => Some(GameKind::Unscramble),
            _ => None,
        };
        match kind {
            ScreenKind::Menu => match s {
                "l" => Some(Message::GoLessons),
                "a" => Some(Message::PlayAll),
                "x" => Some(Message::PlayHard),
                "o" => Some(Message::OpenFile),
                _ => game.map(Message::RequestGame),
            },
            ScreenKind::ListView => match s {
                "c" => Some(Message::SelfCheck),
                _ => game.map(Message::RequestGame),
            },
            ScreenKind::CardViewer => match s {
                "s" => Some(Message::Viewer(ViewerCommand::Shuffle)),
                "d" => Some(Message::Viewer(ViewerCommand::ToggleDirection)),
                "h" => Some(Message::Viewer(ViewerCommand::ToggleHard)),
                _ => None,
            },
            ScreenKind::Game(GameKind::Falling) => match s {
                "r" if self.game_finished() => Some(Message::Restart),
                _ => s
                    .parse::<usize>()
                    .ok()
                    .filter(|n| (1..=9).contains(n))
                    .map(|n| Message::ChooseOption(n - 1)),
            },
            ScreenKind::Game(_) => match s {
                "r" if self.game_finished() => Some(Message::Restart),
                _ => None,
            },
            ScreenKind::LessonList => None,
        }
    }

    fn game_finished(&self) -> bool {
        matches!(self.nav.screen(), Screen::Game(g) if g.is_finished())
    }

    fn with_viewer(&mut self, f: impl FnOnce(&mut FlashcardViewer, &mut vocab::AppContext)) {
        let (screen, ctx) = self.nav.screen_and_context();
        if let Screen::CardViewer(viewer) = screen {
            f(viewer, ctx);
        }
    }

    fn submit_answer(&mut self) {
        let (screen, ctx) = self.nav.screen_and_context();
        let Screen::Game(GameSession::Unscramble(game)) = screen else {
            return;
        };
        let outcome = game.submit(&self.answer, ctx);
        self.answer.clear();
        self.feedback = match outcome {
            AttemptOutcome::Correct => Some(("Correct!".to_string(), Color::from_rgb(0.3, 0.8, 0.4))),
            AttemptOutcome::Wrong { attempts_left } => Some((
                format!("Not quite, {} attempt(s) left", attempts_left),
                Color::from_rgb(0.9, 0.8, 0.3),
            )),
            AttemptOutcome::OutOfAttempts { answer } => Some((
                format!("The word was: {}", answer),
                Color::from_rgb(0.9, 0.3, 0.3),
            )),
            AttemptOutcome::Ignored => None,
        };
    }

    fn open_words_file(&mut self, path: PathBuf) {
        self.nav
            .reload_from(Box::new(JsonFileSource::new(path.clone())), None);
        match self.nav.load_error() {
            Some(err) => self.status_message = Some(err.to_string()),
            None => {
                self.settings.words_path = Some(path);
                self.save_settings();
                self.status_message =
                    Some(format!("Loaded {} lessons", self.nav.lessons().len()));
            }
        }
    }

    fn save_settings(&mut self) {
        if !self.nav.book_id().is_empty() {
            self.settings.last_book = Some(self.nav.book_id().to_string());
        }
        self.settings.save();
    }

    fn view_header(&self) -> Element<Message> {
        let choices: Vec<BookChoice> = self
            .nav
            .books()
            .iter()
            .map(|b| BookChoice {
                id: b.id.clone(),
                title: b.title.clone(),
            })
            .collect();
        let selected = choices.iter().find(|c| c.id == self.nav.book_id()).cloned();

        let mut header = row![
            text("Vocab Trainer")
                .size(22)
                .style(Color::from_rgb(0.4, 0.8, 0.9)),
            Space::with_width(Length::Fill),
        ]
        .spacing(10)
        .padding(10)
        .align_items(iced::Alignment::Center);

        if let Some(home) = self.nav.home() {
            header = header.push(button(text(home.label).size(14)).on_press(Message::GoHome));
        }
        header = header
            .push(pick_list(choices, selected, Message::BookSelected).placeholder("Book"))
            .push(button(text("Open").size(14)).on_press(Message::OpenFile));
        header.into()
    }

    fn view_menu(&self) -> Element<Message> {
        let all_words: usize = self.nav.lessons().iter().map(|l| l.words.len()).sum();
        let hard = self.nav.hard_count();

        let mut menu = column![
            menu_button(format!("Lessons ({})", self.nav.lessons().len()), Some(Message::GoLessons)),
            menu_button(format!("Study all words ({})", all_words), Some(Message::PlayAll)),
            menu_button(
                format!("Study HARD words ({})", hard),
                (hard > 0).then_some(Message::PlayHard)
            ),
            Space::with_height(10),
        ]
        .spacing(10)
        .align_items(iced::Alignment::Center);

        for kind in GameKind::ALL {
            menu = menu.push(menu_button(kind.title().to_string(), Some(Message::RequestGame(kind))));
        }

        if let Some(err) = self.nav.load_error() {
            menu = menu.push(Space::with_height(10)).push(
                text(err)
                    .size(16)
                    .style(Color::from_rgb(0.9, 0.3, 0.3)),
            );
        }

        container(menu)
            .width(Length::Fill)
            .center_x()
            .into()
    }

    fn view_lessons(&self) -> Element<Message> {
        let heading = match self.nav.pending_game() {
            Some(kind) => format!("Pick a lesson for {}", kind.title()),
            None => "Lessons".to_string(),
        };

        let mut list = Column::new().spacing(6);
        if self.nav.lessons().is_empty() {
            list = list.push(text("No lessons in this book.").style(dim()));
        }
        for (i, lesson) in self.nav.lessons().iter().enumerate() {
            list = list.push(
                button(
                    row![
                        text(&lesson.title).size(18),
                        Space::with_width(Length::Fill),
                        text(format!("{} words", lesson.words.len()))
                            .size(14)
                            .style(dim()),
                    ]
                    .align_items(iced::Alignment::Center),
                )
                .width(Length::Fill)
                .padding(10)
                .style(theme::Button::Secondary)
                .on_press(Message::OpenLesson(i)),
            );
        }

        column![text(heading).size(24), scrollable(list).height(Length::Fill)]
            .spacing(15)
            .into()
    }
}

fn dim() -> Color {
    Color::from_rgb(0.5, 0.5, 0.5)
}

fn menu_button(label: String, message: Option<Message>) -> Element<'static, Message> {
    button(container(text(label).size(18)).width(Length::Fill).center_x())
        .width(Length::Fixed(320.0))
        .padding(12)
        .on_press_maybe(message)
        .into()
}

fn game_buttons<'a>() -> Row<'a, Message> {
    GameKind::ALL.into_iter().fold(row![].spacing(10), |r, kind| {
        r.push(button(text(kind.title()).size(14)).on_press(Message::RequestGame(kind)))
    })
}

fn view_word_list(view: &ListView) -> Element<Message> {
    let mut rows = Column::new().spacing(4);
    if view.rows().is_empty() {
        rows = rows.push(text("This lesson has no words.").style(dim()));
    }
    for pair in view.rows() {
        rows = rows.push(row![
            text(&pair.front).size(18).width(Length::FillPortion(1)),
            text(&pair.back)
                .size(18)
                .width(Length::FillPortion(1))
                .style(Color::from_rgb(0.4, 0.8, 0.9)),
        ]);
    }

    let actions = game_buttons().push(
        button(text("Self-check").size(14))
            .style(theme::Button::Positive)
            .on_press(Message::SelfCheck),
    );

    column![
        text(view.meta()).size(22),
        scrollable(rows).height(Length::Fill),
        actions,
    ]
    .spacing(15)
    .into()
}

fn view_cards(viewer: &FlashcardViewer, hard: bool) -> Element<Message> {
    let Some(card) = viewer.card() else {
        return container(text("No words to study.").size(24).style(dim()))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x()
            .center_y()
            .into();
    };

    let mut info = row![
        text(format!("{}/{}", card.position, card.total)).size(16),
        text(viewer.direction().label()).size(16).style(dim()),
    ]
    .spacing(15);
    if hard {
        info = info.push(text("HARD").size(16).style(Color::from_rgb(0.9, 0.3, 0.3)));
    }

    let hidden = if card.revealed {
        text(card.hidden).size(36).style(Color::from_rgb(0.4, 0.8, 0.9))
    } else {
        text("tap to reveal").size(20).style(dim())
    };

    let face = mouse_area(
        container(
            column![text(card.shown).size(56), hidden]
                .spacing(20)
                .align_items(iced::Alignment::Center),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x()
        .center_y(),
    )
    .on_press(Message::CardPressed);

    let controls = row![
        button(text("◀").size(20)).on_press(Message::Viewer(ViewerCommand::Prev)).padding(10),
        button(text("Reveal").size(16)).on_press(Message::Viewer(ViewerCommand::Reveal)).padding(10),
        button(text("▶").size(20)).on_press(Message::Viewer(ViewerCommand::Next)).padding(10),
        Space::with_width(20),
        button(text("Shuffle").size(16)).on_press(Message::Viewer(ViewerCommand::Shuffle)).padding(10),
        button(text("Direction").size(16))
            .on_press(Message::Viewer(ViewerCommand::ToggleDirection))
            .padding(10),
        button(text(if hard { "Unmark hard" } else { "Mark hard" }).size(16))
            .style(theme::Button::Destructive)
            .on_press(Message::Viewer(ViewerCommand::ToggleHard))
            .padding(10),
    ]
    .spacing(10)
    .align_items(iced::Alignment::Center);

    column![
        container(info).width(Length::Fill).center_x(),
        face,
        container(controls).width(Length::Fill).center_x(),
    ]
    .spacing(10)
    .into()
}

fn view_matching(game: &MatchingGame) -> Element<Message> {
    let stats = text(format!(
        "Pairs left: {}  │  Errors: {}",
        game.pairs_left(),
        game.errors()
    ))
    .size(16)
    .style(dim());

    if game.is_won() {
        return finished_view(
            format!(
                "All {} pairs matched with {} errors",
                game.pairs_total(),
                game.errors()
            ),
            stats.into(),
        );
    }

    let selected = match game.state() {
        PickState::FirstPicked(i) => Some(i),
        PickState::Idle => None,
    };
    let mut grid = Column::new().spacing(10);
    for (r, chunk) in game.tiles().chunks(TILE_COLUMNS).enumerate() {
        let mut line = Row::new().spacing(10);
        for (c, tile) in chunk.iter().enumerate() {
            let index = r * TILE_COLUMNS + c;
            let style = if Some(index) == selected {
                theme::Button::Primary
            } else {
                theme::Button::Secondary
            };
            let label = if tile.matched { "" } else { tile.text.as_str() };
            line = line.push(
                button(container(text(label).size(18)).width(Length::Fill).center_x())
                    .width(Length::FillPortion(1))
                    .height(Length::Fixed(64.0))
                    .style(style)
                    .on_press_maybe((!tile.matched).then_some(Message::PickTile(index))),
            );
        }
        grid = grid.push(line);
    }

    column![stats, scrollable(grid).height(Length::Fill)]
        .spacing(15)
        .into()
}

fn view_falling(game: &FallingGame, now: Instant) -> Element<Message> {
    let stats = text(format!(
        "Errors: {}  │  Speed: {}  │  Time: {}",
        game.errors(),
        game.speed_display(),
        game.clock_display()
    ))
    .size(16)
    .style(dim());

    if let Some(summary) = game.summary() {
        return finished_view(
            format!(
                "{} rounds, {} errors, final speed {:.1}x",
                summary.rounds_played, summary.errors, summary.speed
            ),
            stats.into(),
        );
    }
    let Some(round) = game.round() else {
        return text("No words to play with.").style(dim()).into();
    };

    let top = 1 + (game.fall_progress(now) * 98.0) as u16;
    let field = container(
        column![
            Space::with_height(Length::FillPortion(top)),
            text(&round.target.front).size(36),
            Space::with_height(Length::FillPortion(100 - top)),
        ]
        .align_items(iced::Alignment::Center),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .center_x();

    let options = round
        .options
        .iter()
        .enumerate()
        .fold(row![].spacing(10), |r, (i, option)| {
            r.push(
                button(text(format!("{}. {}", i + 1, option.text)).size(18))
                    .padding(12)
                    .on_press(Message::ChooseOption(i)),
            )
        });

    column![
        row![
            stats,
            Space::with_width(Length::Fill),
            text(format!("{}/{}", round.number, game.rounds_total())).size(16),
        ],
        field,
        container(options).width(Length::Fill).center_x(),
    ]
    .spacing(10)
    .into()
}

fn view_unscramble<'a>(
    game: &'a UnscrambleGame,
    answer: &'a str,
    feedback: Option<&'a (String, Color)>,
) -> Element<'a, Message> {
    let feedback_line = match feedback {
        Some((msg, color)) => text(msg).size(18).style(*color),
        None => text("").size(18),
    };

    if let Some(summary) = game.summary() {
        return finished_view(
            format!("Done: {} words, {} errors", summary.words_total, summary.errors),
            feedback_line.into(),
        );
    }
    let Some(puzzle) = game.puzzle() else {
        return text("No words to play with.").style(dim()).into();
    };

    let content = column![
        text(format!(
            "Word {}/{}  │  Attempts left: {}",
            puzzle.number, puzzle.total, puzzle.attempts_left
        ))
        .size(16)
        .style(dim()),
        text(puzzle.scrambled)
            .size(48)
            .style(Color::from_rgb(0.95, 0.8, 0.3)),
        text(puzzle.translation)
            .size(22)
            .style(Color::from_rgb(0.4, 0.8, 0.9)),
        text_input("Type the word and press Enter", answer)
            .on_input(Message::AnswerChanged)
            .on_submit(Message::SubmitAnswer)
            .padding(10)
            .size(20)
            .width(Length::Fixed(360.0)),
        feedback_line,
    ]
    .spacing(16)
    .align_items(iced::Alignment::Center);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x()
        .center_y()
        .into()
}

fn finished_view(headline: String, details: Element<Message>) -> Element<Message> {
    container(
        column![
            text(headline).size(28),
            details,
            button(text("Play again").size(18))
                .style(theme::Button::Positive)
                .on_press(Message::Restart)
                .padding(12),
        ]
        .spacing(20)
        .align_items(iced::Alignment::Center),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .center_x()
    .center_y()
    .into()
}

// Custom dark container style
struct DarkContainer;

impl container::StyleSheet for DarkContainer {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            background: Some(iced::Background::Color(Color::from_rgb(0.1, 0.1, 0.12))),
            text_color: Some(Color::WHITE),
            ..Default::default()
        }
    }
}
