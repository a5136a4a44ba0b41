//! Vocab Trainer - terminal frontend
//!
//! Hotkeys:
//!   Menu        l lessons, a all words, x hard words, 1/2/3 games,
//!               b switch book, o open words file, ? help, q quit
//!   Lessons     Up/Down select, Enter open
//!   Word list   c self-check, 1/2/3 games
//!   Cards       Space reveal, Right/Enter next, Left prev, s shuffle,
//!               d direction, h mark hard (mouse: tap, swipe, long press)
//!   Games       Arrows + Enter (pair wall), 1-4 (falling words),
//!               type + Enter (unscramble), r restart when finished
//!   Esc         Back (see the title bar)

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::{
    io::{self, stdout},
    path::PathBuf,
    time::{Duration, Instant},
};

use vocab::config::{self, Settings};
use vocab::games::falling::FallingGame;
use vocab::games::matching::{MatchingGame, PickOutcome, PickState};
use vocab::games::unscramble::{AttemptOutcome, UnscrambleGame};
use vocab::games::{GameKind, GameSession};
use vocab::list_view::ListView;
use vocab::viewer::{FlashcardViewer, ViewerCommand};
use vocab::{logging, JsonFileSource, Navigator, Screen, ScreenKind};

const TILE_COLUMNS: usize = 4;
/// Terminal cells are scaled to rough pixels so the gesture thresholds apply.
const CELL_WIDTH_PX: f32 = 8.0;
const CELL_HEIGHT_PX: f32 = 16.0;
const STATUS_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq)]
enum AppMode {
    Browse,
    FileInput,
    Help,
}

struct App {
    mode: AppMode,
    nav: Navigator,
    settings: Settings,

    lesson_state: ListState,
    tile_cursor: usize,
    answer: String,
    feedback: Option<(String, Color)>,

    file_input: String,
    file_input_cursor: usize,
    file_input_error: Option<String>,

    status_message: Option<(String, Instant)>,
}

impl App {
    fn new(nav: Navigator, settings: Settings) -> Self {
        Self {
            mode: AppMode::Browse,
            nav,
            settings,
            lesson_state: ListState::default(),
            tile_cursor: 0,
            answer: String::new(),
            feedback: None,
            file_input: String::new(),
            file_input_cursor: 0,
            file_input_error: None,
            status_message: None,
        }
    }

    fn show_status(&mut self, msg: &str) {
        self.status_message = Some((msg.to_string(), Instant::now()));
    }

    fn tick(&mut self) {
        self.nav.tick(Instant::now());
        if let Some((_, at)) = &self.status_message {
            if at.elapsed() > STATUS_TTL {
                self.status_message = None;
            }
        }
    }

    /// Resets per-screen widget state after the navigator changed screens.
    fn screen_changed(&mut self) {
        self.tile_cursor = 0;
        self.answer.clear();
        self.feedback = None;
        if self.nav.screen_kind() == ScreenKind::LessonList && !self.nav.lessons().is_empty() {
            let selected = self.lesson_state.selected().unwrap_or(0);
            self.lesson_state
                .select(Some(selected.min(self.nav.lessons().len() - 1)));
        }
    }

    fn go_home(&mut self) {
        match self.nav.screen_kind() {
            ScreenKind::LessonList => self.nav.go_menu(),
            _ => self.nav.go_home(),
        }
        self.screen_changed();
    }

    fn request_game(&mut self, kind: GameKind) {
        if !self.nav.request_game(kind) {
            self.show_status(&format!("Pick a lesson to play {}", kind.title()));
        }
        self.screen_changed();
    }

    fn play_hard(&mut self) {
        if self.nav.hard_count() == 0 {
            self.show_status("No hard words yet. Press 'h' on a card to mark one.");
            return;
        }
        self.nav.play_hard();
        self.screen_changed();
    }

    fn cycle_book(&mut self) {
        let books = self.nav.books();
        if books.len() < 2 {
            self.show_status("Only one book available");
            return;
        }
        let current = books
            .iter()
            .position(|b| b.id == self.nav.book_id())
            .unwrap_or(0);
        let next = books[(current + 1) % books.len()].id.clone();
        match self.nav.select_book(&next) {
            Ok(()) => {
                self.settings.last_book = Some(next);
                self.settings.save();
                self.lesson_state.select(Some(0));
                let title = self.nav.book_title().to_string();
                self.show_status(&format!("Book: {}", title));
            }
            Err(e) => self.show_status(&e.to_string()),
        }
        self.screen_changed();
    }

    fn open_words_file(&mut self, input: &str) -> bool {
        let path = config::expand_home(input.trim());
        if !path.exists() {
            self.file_input_error = Some(format!("File not found: {}", path.display()));
            return false;
        }
        self.nav
            .reload_from(Box::new(JsonFileSource::new(path.clone())), None);
        if let Some(err) = self.nav.load_error() {
            self.file_input_error = Some(err.to_string());
            return false;
        }
        self.settings.words_path = Some(path);
        self.settings.last_book = Some(self.nav.book_id().to_string());
        self.settings.save();
        self.lesson_state.select(Some(0));
        self.screen_changed();
        let count = self.nav.lessons().len();
        self.show_status(&format!("Loaded {} lessons", count));
        true
    }

    fn shutdown(self) {
        let App {
            nav, mut settings, ..
        } = self;
        if !nav.book_id().is_empty() {
            settings.last_book = Some(nav.book_id().to_string());
        }
        settings.save();
        nav.shutdown();
    }
}

// ============================================================================
// UI Rendering
// ============================================================================

fn ui(f: &mut Frame, app: &mut App) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Screen
            Constraint::Length(3), // Stats
        ])
        .split(size);

    render_title(f, app, chunks[0]);

    let now = Instant::now();
    let App {
        nav,
        lesson_state,
        tile_cursor,
        answer,
        feedback,
        ..
    } = app;
    let hard_count = nav.hard_count();
    match nav.screen() {
        Screen::Menu => render_menu(f, nav, chunks[1]),
        Screen::LessonList => render_lessons(f, nav, lesson_state, chunks[1]),
        Screen::ListView(view) => render_word_list(f, view, chunks[1]),
        Screen::CardViewer(viewer) => {
            let hard = viewer.is_current_hard(&nav.context().hard_words);
            render_cards(f, viewer, hard, chunks[1]);
        }
        Screen::Game(GameSession::Matching(game)) => {
            render_matching(f, game, *tile_cursor, chunks[1])
        }
        Screen::Game(GameSession::Falling(game)) => render_falling(f, game, now, chunks[1]),
        Screen::Game(GameSession::Unscramble(game)) => {
            render_unscramble(f, game, answer, feedback.as_ref(), chunks[1])
        }
    }

    render_stats(f, app, hard_count, chunks[2]);

    match app.mode {
        AppMode::FileInput => render_file_input(f, app, size),
        AppMode::Help => render_help(f, size),
        AppMode::Browse => {}
    }
}

fn render_title(f: &mut Frame, app: &App, area: Rect) {
    let book = app.nav.book_title();
    let mut spans = vec![Span::styled(
        if book.is_empty() {
            "Vocab Trainer".to_string()
        } else {
            format!("Vocab Trainer - {}", book)
        },
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(home) = app.nav.home() {
        spans.push(Span::styled(
            format!("   Esc: {}", home.label),
            Style::default().fg(Color::DarkGray),
        ));
    }
    let title = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::DarkGray)),
        );
    f.render_widget(title, area);
}

fn screen_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ", title))
        .title_alignment(Alignment::Center)
}

fn key_line(key: &str, label: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<6}", key), Style::default().fg(Color::Green)),
        Span::raw(label),
    ])
}

fn render_menu(f: &mut Frame, nav: &Navigator, area: Rect) {
    let all_words: usize = nav.lessons().iter().map(|l| l.words.len()).sum();
    let mut lines = vec![
        Line::from(""),
        key_line("l", format!("Lessons ({})", nav.lessons().len())),
        key_line("a", format!("Study all words ({})", all_words)),
    ];
    let hard = nav.hard_count();
    let hard_style = if hard == 0 {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Red)
    };
    lines.push(Line::from(vec![
        Span::styled("  x     ", Style::default().fg(Color::Green)),
        Span::styled(format!("Study HARD words ({})", hard), hard_style),
    ]));
    lines.push(Line::from(""));
    for (i, kind) in GameKind::ALL.iter().enumerate() {
        lines.push(key_line(DIGITS[i], kind.title().to_string()));
    }
    lines.push(Line::from(""));
    lines.push(key_line("b", format!("Switch book ({} available)", nav.books().len())));
    lines.push(key_line("o", "Open words file".to_string()));
    lines.push(key_line("?", "Help".to_string()));
    lines.push(key_line("q", "Quit".to_string()));

    if let Some(err) = nav.load_error() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            err.to_string(),
            Style::default().fg(Color::Red),
        )));
    }

    let menu = Paragraph::new(lines)
        .block(screen_block("Menu"))
        .wrap(Wrap { trim: false });
    f.render_widget(menu, area);
}

const DIGITS: [&str; 4] = ["1", "2", "3", "4"];

fn render_lessons(f: &mut Frame, nav: &Navigator, state: &mut ListState, area: Rect) {
    let title = match nav.pending_game() {
        Some(kind) => format!("Pick a lesson for {}", kind.title()),
        None => "Lessons".to_string(),
    };
    let block = screen_block(&title);

    if nav.lessons().is_empty() {
        let text = Paragraph::new("No lessons in this book.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(text, area);
        return;
    }

    let items: Vec<ListItem> = nav
        .lessons()
        .iter()
        .map(|lesson| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    lesson.title.as_str(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" ({} words)", lesson.words.len()),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("-> ");
    f.render_stateful_widget(list, area, state);
}

fn render_word_list(f: &mut Frame, view: &ListView, area: Rect) {
    let meta = view.meta();
    let block = screen_block(&meta);
    let lines: Vec<Line> = if view.rows().is_empty() {
        vec![Line::from(Span::styled(
            "This lesson has no words.",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        view.rows()
            .iter()
            .map(|pair| {
                Line::from(vec![
                    Span::styled(
                        format!("{:<24}", pair.front),
                        Style::default().fg(Color::White),
                    ),
                    Span::styled(pair.back.as_str(), Style::default().fg(Color::Cyan)),
                ])
            })
            .collect()
    };
    let mut lines = lines;
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "c: self-check | 1/2/3: games",
        Style::default().fg(Color::DarkGray),
    )));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_cards(f: &mut Frame, viewer: &FlashcardViewer, hard: bool, area: Rect) {
    let set = viewer.word_set();
    let block = screen_block(set.title());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(card) = viewer.card() else {
        let text = Paragraph::new("No words to study.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(text, Rect::new(inner.x, inner.y + inner.height / 2, inner.width, 1));
        return;
    };

    let center_y = inner.y + inner.height / 2;
    let shown = Paragraph::new(card.shown)
        .style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(shown, Rect::new(inner.x, center_y.saturating_sub(1), inner.width, 1));

    let hidden = if card.revealed {
        Paragraph::new(card.hidden).style(Style::default().fg(Color::Cyan))
    } else {
        Paragraph::new("· · ·").style(Style::default().fg(Color::DarkGray))
    }
    .alignment(Alignment::Center);
    f.render_widget(hidden, Rect::new(inner.x, center_y + 1, inner.width, 1));

    let mut info = vec![
        Span::styled(
            format!("{}/{} ", card.position, card.total),
            Style::default().fg(Color::Blue),
        ),
        Span::raw("| "),
        Span::styled(viewer.direction().label(), Style::default().fg(Color::Magenta)),
    ];
    if hard {
        info.push(Span::raw(" | "));
        info.push(Span::styled(
            "HARD",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    let info = Paragraph::new(Line::from(info)).alignment(Alignment::Center);
    f.render_widget(info, Rect::new(inner.x, inner.y, inner.width, 1));
}

fn render_matching(f: &mut Frame, game: &MatchingGame, cursor: usize, area: Rect) {
    let title = format!(
        "{} - pairs left: {} - errors: {}",
        GameKind::Matching.title(),
        game.pairs_left(),
        game.errors()
    );
    let block = screen_block(&title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if game.is_won() {
        let text = Paragraph::new(format!(
            "All {} pairs matched with {} errors. r: play again",
            game.pairs_total(),
            game.errors()
        ))
        .style(Style::default().fg(Color::Green))
        .alignment(Alignment::Center);
        f.render_widget(text, Rect::new(inner.x, inner.y + inner.height / 2, inner.width, 1));
        return;
    }
    if game.is_empty() {
        f.render_widget(Paragraph::new("No words to play with."), inner);
        return;
    }

    let rows = game.tiles().len().div_ceil(TILE_COLUMNS);
    let row_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(3); rows])
        .split(inner);
    let selected = match game.state() {
        PickState::FirstPicked(i) => Some(i),
        PickState::Idle => None,
    };

    for (r, row_area) in row_chunks.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, TILE_COLUMNS as u32); TILE_COLUMNS])
            .split(*row_area);
        for (c, cell) in cols.iter().enumerate() {
            let index = r * TILE_COLUMNS + c;
            let Some(tile) = game.tiles().get(index) else {
                break;
            };
            let border = if index == cursor {
                Color::Cyan
            } else if Some(index) == selected {
                Color::Yellow
            } else {
                Color::DarkGray
            };
            let style = if tile.matched {
                Style::default().fg(Color::DarkGray)
            } else if Some(index) == selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let label = if tile.matched { "" } else { tile.text.as_str() };
            let widget = Paragraph::new(label)
                .style(style)
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(border)),
                );
            f.render_widget(widget, *cell);
        }
    }
}

fn render_falling(f: &mut Frame, game: &FallingGame, now: Instant, area: Rect) {
    let title = format!(
        "{} - errors: {} - speed: {} - {}",
        GameKind::Falling.title(),
        game.errors(),
        game.speed_display(),
        game.clock_display()
    );
    let block = screen_block(&title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if let Some(summary) = game.summary() {
        let text = Paragraph::new(vec![
            Line::from(Span::styled(
                "Game over",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )),
            Line::from(format!(
                "{} rounds, {} errors, final speed {:.1}x, time {}",
                summary.rounds_played,
                summary.errors,
                summary.speed,
                game.clock_display()
            )),
            Line::from(Span::styled("r: play again", Style::default().fg(Color::DarkGray))),
        ])
        .alignment(Alignment::Center);
        f.render_widget(text, Rect::new(inner.x, inner.y + inner.height / 2, inner.width, 3));
        return;
    }
    let Some(round) = game.round() else {
        f.render_widget(Paragraph::new("No words to play with."), inner);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(round.options.len() as u16 + 1),
        ])
        .split(inner);

    let field = chunks[0];
    let progress = game.fall_progress(now);
    let y = field.y + ((field.height.saturating_sub(1)) as f32 * progress) as u16;
    let word = Paragraph::new(round.target.front.as_str())
        .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    f.render_widget(word, Rect::new(field.x, y, field.width, 1));

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Magenta).bg(Color::DarkGray))
        .ratio(progress as f64)
        .label(format!("{}/{}", round.number, game.rounds_total()));
    f.render_widget(gauge, chunks[1]);

    let options: Vec<Line> = round
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            Line::from(vec![
                Span::styled(format!("  {} ", i + 1), Style::default().fg(Color::Green)),
                Span::raw(option.text.as_str()),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(options), chunks[2]);
}

fn render_unscramble(
    f: &mut Frame,
    game: &UnscrambleGame,
    answer: &str,
    feedback: Option<&(String, Color)>,
    area: Rect,
) {
    let block = screen_block(GameKind::Unscramble.title());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines = Vec::new();
    if let Some(summary) = game.summary() {
        lines.push(Line::from(Span::styled(
            format!(
                "Done: {} words, {} errors",
                summary.words_total, summary.errors
            ),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            "r: play again",
            Style::default().fg(Color::DarkGray),
        )));
    } else if let Some(puzzle) = game.puzzle() {
        lines.push(Line::from(Span::styled(
            format!(
                "Word {}/{} - attempts left: {}",
                puzzle.number, puzzle.total, puzzle.attempts_left
            ),
            Style::default().fg(Color::Blue),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            puzzle.scrambled,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            puzzle.translation,
            Style::default().fg(Color::Cyan),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Green)),
            Span::raw(answer),
        ]));
    } else {
        lines.push(Line::from("No words to play with."));
    }
    if let Some((msg, color)) = feedback {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(msg.as_str(), Style::default().fg(*color))));
    }

    let height = lines.len() as u16;
    let top = inner.y + inner.height.saturating_sub(height) / 2;
    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    f.render_widget(paragraph, Rect::new(inner.x, top, inner.width, height.min(inner.height)));
}

fn render_stats(f: &mut Frame, app: &App, hard_count: usize, area: Rect) {
    let stats_text = Line::from(vec![
        Span::styled(
            format!("Book: {} ", app.nav.book_id()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("| "),
        Span::styled(
            format!("Hard: {} ", hard_count),
            Style::default().fg(Color::Red),
        ),
        Span::raw("| "),
        Span::styled(
            app.nav.screen().label(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        if let Some((msg, _)) = &app.status_message {
            Span::styled(format!(" | {}", msg), Style::default().fg(Color::Yellow))
        } else {
            Span::raw("")
        },
    ]);

    let stats = Paragraph::new(stats_text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(stats, area);
}

fn render_file_input(f: &mut Frame, app: &App, size: Rect) {
    let area = centered_rect(70, 30, size);
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(" Open Words File ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let label = Paragraph::new("Path to words JSON:").style(Style::default().fg(Color::White));
    f.render_widget(label, chunks[0]);

    let input_style = if app.file_input_error.is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::White)
    };
    let input = Paragraph::new(app.file_input.as_str()).style(input_style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue)),
    );
    f.render_widget(input, chunks[1]);

    let cursor_x = chunks[1].x + 1 + app.file_input_cursor as u16;
    let cursor_y = chunks[1].y + 1;
    f.set_cursor_position((cursor_x.min(chunks[1].x + chunks[1].width - 2), cursor_y));

    if let Some(ref error) = app.file_input_error {
        let error_text = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red));
        f.render_widget(error_text, chunks[2]);
    }

    let help = Paragraph::new("Enter: Open | Esc: Cancel")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[3]);
}

fn help_section(title: &str) -> Line<'_> {
    Line::from(Span::styled(
        title,
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

fn render_help(f: &mut Frame, size: Rect) {
    let area = centered_rect(60, 80, size);
    f.render_widget(Clear, area);

    let help_text = vec![
        Line::from(Span::styled(
            "Vocab Trainer - Keyboard Shortcuts",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        help_section("Menu:"),
        key_line("l", "Lessons".to_string()),
        key_line("a / x", "Study all / hard words".to_string()),
        key_line("1 2 3", "Pair wall, falling words, unscramble".to_string()),
        key_line("b", "Switch book".to_string()),
        key_line("o", "Open words file".to_string()),
        Line::from(""),
        help_section("Cards:"),
        key_line("Space", "Reveal".to_string()),
        key_line("<- ->", "Previous / next card (Enter: next)".to_string()),
        key_line("s", "Shuffle".to_string()),
        key_line("d", "Switch direction".to_string()),
        key_line("h", "Mark / unmark as hard".to_string()),
        key_line("mouse", "Tap, swipe, long press to mark".to_string()),
        Line::from(""),
        help_section("Games:"),
        key_line("Enter", "Pick tile / submit answer".to_string()),
        key_line("1-4", "Choose translation (falling words)".to_string()),
        key_line("r", "Play again when finished".to_string()),
        Line::from(""),
        help_section("Other:"),
        key_line("Esc", "Back".to_string()),
        key_line("q", "Quit (menu and lessons)".to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .title_alignment(Alignment::Center)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .alignment(Alignment::Left);

    f.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

// ============================================================================
// Event Handling
// ============================================================================

fn handle_events(app: &mut App) -> io::Result<bool> {
    if event::poll(Duration::from_millis(50))? {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match app.mode {
                AppMode::Browse => return Ok(handle_screen_keys(app, key)),
                AppMode::FileInput => handle_file_input_keys(app, key.code),
                AppMode::Help => app.mode = AppMode::Browse,
            },
            Event::Mouse(mouse) if app.mode == AppMode::Browse => handle_mouse(app, mouse),
            _ => {}
        }
    }
    Ok(false)
}

fn game_digit(code: KeyCode) -> Option<GameKind> {
    match code {
        KeyCode::Char('1') => Some(GameKind::Matching),
        KeyCode::Char('2') => Some(GameKind::Falling),
        KeyCode::Char('3') => Some(GameKind::Unscramble),
        _ => None,
    }
}

/// Returns true when the app should quit.
fn handle_screen_keys(app: &mut App, key: KeyEvent) -> bool {
    let code = key.code;
    let typing = app.nav.screen_kind() == ScreenKind::Game(GameKind::Unscramble);
    if code == KeyCode::Char('?') && !typing {
        app.mode = AppMode::Help;
        return false;
    }

    match app.nav.screen_kind() {
        ScreenKind::Menu => return handle_menu_keys(app, code),
        ScreenKind::LessonList => return handle_lesson_keys(app, code),
        ScreenKind::ListView => match code {
            KeyCode::Esc => app.go_home(),
            KeyCode::Char('c') => {
                app.nav.start_self_check();
                app.screen_changed();
            }
            other => {
                if let Some(kind) = game_digit(other) {
                    app.request_game(kind);
                }
            }
        },
        ScreenKind::CardViewer => handle_card_keys(app, code),
        ScreenKind::Game(GameKind::Matching) => handle_matching_keys(app, code),
        ScreenKind::Game(GameKind::Falling) => handle_falling_keys(app, code),
        ScreenKind::Game(GameKind::Unscramble) => handle_unscramble_keys(app, code),
    }
    false
}

fn handle_menu_keys(app: &mut App, code: KeyCode) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char('l') | KeyCode::Enter => {
            app.nav.go_lessons();
            app.screen_changed();
        }
        KeyCode::Char('a') => {
            app.nav.play_all();
            app.screen_changed();
        }
        KeyCode::Char('x') => app.play_hard(),
        KeyCode::Char('b') => app.cycle_book(),
        KeyCode::Char('o') => {
            app.mode = AppMode::FileInput;
            app.file_input.clear();
            app.file_input_cursor = 0;
            app.file_input_error = None;
        }
        other => {
            if let Some(kind) = game_digit(other) {
                app.request_game(kind);
            }
        }
    }
    false
}

fn handle_lesson_keys(app: &mut App, code: KeyCode) -> bool {
    let count = app.nav.lessons().len();
    match code {
        KeyCode::Char('q') => return true,
        KeyCode::Esc => app.go_home(),
        KeyCode::Up | KeyCode::Char('k') if count > 0 => {
            let i = app.lesson_state.selected().unwrap_or(0);
            let new_i = if i == 0 { count - 1 } else { i - 1 };
            app.lesson_state.select(Some(new_i));
        }
        KeyCode::Down | KeyCode::Char('j') if count > 0 => {
            let i = app.lesson_state.selected().unwrap_or(0);
            app.lesson_state.select(Some((i + 1) % count));
        }
        KeyCode::Enter => {
            if let Some(i) = app.lesson_state.selected() {
                app.nav.open_lesson(i);
                app.screen_changed();
            }
        }
        _ => {}
    }
    false
}

fn with_viewer(app: &mut App, f: impl FnOnce(&mut FlashcardViewer, &mut vocab::AppContext)) {
    let (screen, ctx) = app.nav.screen_and_context();
    if let Screen::CardViewer(viewer) = screen {
        f(viewer, ctx);
    }
}

fn handle_card_keys(app: &mut App, code: KeyCode) {
    let command = match code {
        KeyCode::Esc => {
            app.go_home();
            return;
        }
        KeyCode::Right | KeyCode::Enter => ViewerCommand::Next,
        KeyCode::Left => ViewerCommand::Prev,
        KeyCode::Char(' ') => ViewerCommand::Reveal,
        KeyCode::Char('s') => ViewerCommand::Shuffle,
        KeyCode::Char('d') => ViewerCommand::ToggleDirection,
        KeyCode::Char('h') => ViewerCommand::ToggleHard,
        _ => return,
    };
    with_viewer(app, |v, ctx| v.handle(command, ctx));
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let x = mouse.column as f32 * CELL_WIDTH_PX;
    let y = mouse.row as f32 * CELL_HEIGHT_PX;
    let now = Instant::now();
    with_viewer(app, |v, ctx| match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => v.touch_start(x, y, now),
        MouseEventKind::Drag(MouseButton::Left) => v.touch_move(x, y),
        MouseEventKind::Up(MouseButton::Left) => {
            v.touch_move(x, y);
            v.touch_end(now, ctx);
        }
        _ => {}
    });
}

fn handle_matching_keys(app: &mut App, code: KeyCode) {
    let now = Instant::now();
    let cursor = app.tile_cursor;
    let (screen, ctx) = app.nav.screen_and_context();
    let Screen::Game(session) = screen else {
        return;
    };
    let GameSession::Matching(game) = session else {
        return;
    };
    let count = game.tiles().len();

    let mut status = None;
    match code {
        KeyCode::Esc => {
            app.go_home();
            return;
        }
        KeyCode::Char('r') => session.restart(now, ctx),
        KeyCode::Left if cursor > 0 => app.tile_cursor = cursor - 1,
        KeyCode::Right if cursor + 1 < count => app.tile_cursor = cursor + 1,
        KeyCode::Up if cursor >= TILE_COLUMNS => app.tile_cursor = cursor - TILE_COLUMNS,
        KeyCode::Down if cursor + TILE_COLUMNS < count => app.tile_cursor = cursor + TILE_COLUMNS,
        KeyCode::Enter | KeyCode::Char(' ') => match game.pick(cursor, ctx) {
            PickOutcome::Mismatched { .. } => status = Some("No match".to_string()),
            PickOutcome::Matched { won: true, .. } => status = Some("All pairs matched!".to_string()),
            _ => {}
        },
        _ => {}
    }
    if let Some(msg) = status {
        app.show_status(&msg);
    }
}

fn handle_falling_keys(app: &mut App, code: KeyCode) {
    let now = Instant::now();
    let (screen, ctx) = app.nav.screen_and_context();
    let Screen::Game(session) = screen else {
        return;
    };
    match code {
        KeyCode::Esc => app.go_home(),
        KeyCode::Char('r') if session.is_finished() => session.restart(now, ctx),
        KeyCode::Char(c @ '1'..='9') => {
            if let GameSession::Falling(game) = session {
                let option = c as usize - '1' as usize;
                game.choose(option, now, ctx);
            }
        }
        _ => {}
    }
}

fn handle_unscramble_keys(app: &mut App, code: KeyCode) {
    let now = Instant::now();
    let (screen, ctx) = app.nav.screen_and_context();
    let Screen::Game(session) = screen else {
        return;
    };
    let finished = session.is_finished();
    let GameSession::Unscramble(game) = session else {
        return;
    };

    match code {
        KeyCode::Esc => app.go_home(),
        KeyCode::Char('r') if finished => {
            session.restart(now, ctx);
            app.feedback = None;
        }
        KeyCode::Char(c) if !finished => app.answer.push(c),
        KeyCode::Backspace => {
            app.answer.pop();
        }
        KeyCode::Enter if !finished => {
            let outcome = game.submit(&app.answer, ctx);
            app.answer.clear();
            app.feedback = match outcome {
                AttemptOutcome::Correct => Some(("Correct!".to_string(), Color::Green)),
                AttemptOutcome::Wrong { attempts_left } => Some((
                    format!("Not quite, {} attempt(s) left", attempts_left),
                    Color::Yellow,
                )),
                AttemptOutcome::OutOfAttempts { answer } => {
                    Some((format!("The word was: {}", answer), Color::Red))
                }
                AttemptOutcome::Ignored => None,
            };
        }
        _ => {}
    }
}

fn handle_file_input_keys(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => {
            app.mode = AppMode::Browse;
        }
        KeyCode::Enter => {
            if !app.file_input.is_empty() {
                let path = app.file_input.clone();
                if app.open_words_file(&path) {
                    app.mode = AppMode::Browse;
                }
            }
        }
        KeyCode::Char(c) => {
            app.file_input.insert(app.file_input_cursor, c);
            app.file_input_cursor += c.len_utf8();
            app.file_input_error = None;
        }
        KeyCode::Backspace => {
            if let Some(c) = app.file_input[..app.file_input_cursor].chars().next_back() {
                app.file_input_cursor -= c.len_utf8();
                app.file_input.remove(app.file_input_cursor);
                app.file_input_error = None;
            }
        }
        KeyCode::Delete => {
            if app.file_input_cursor < app.file_input.len() {
                app.file_input.remove(app.file_input_cursor);
                app.file_input_error = None;
            }
        }
        KeyCode::Left => {
            if let Some(c) = app.file_input[..app.file_input_cursor].chars().next_back() {
                app.file_input_cursor -= c.len_utf8();
            }
        }
        KeyCode::Right => {
            if let Some(c) = app.file_input[app.file_input_cursor..].chars().next() {
                app.file_input_cursor += c.len_utf8();
            }
        }
        KeyCode::Home => {
            app.file_input_cursor = 0;
        }
        KeyCode::End => {
            app.file_input_cursor = app.file_input.len();
        }
        _ => {}
    }
}

// ============================================================================
// Main
// ============================================================================

fn main() -> io::Result<()> {
    logging::init_file(&config::log_file());
    let words_arg = std::env::args().nth(1).map(PathBuf::from);
    let (nav, settings) = vocab::bootstrap(words_arg);
    let mut app = App::new(nav, settings);

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    app.shutdown();
    result
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;
        app.tick();

        if handle_events(app)? {
            break;
        }
    }
    Ok(())
}
