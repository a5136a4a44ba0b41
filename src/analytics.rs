//! Best-effort usage analytics.
//!
//! Core components talk to [`Analytics`], which forwards [`SinkEvent`]s over a
//! channel to a worker thread owning an [`AnalyticsBackend`]. Nothing in the
//! core waits on a write or looks at its outcome; failures end up in the log.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::games::GameSummary;
use crate::word_set::WordSetMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    SessionStart {
        user_agent: String,
        platform: String,
    },
    SessionEnd {
        duration_sec: u64,
    },
    LessonView {
        lesson_id: String,
    },
    ListViewStart {
        lesson_id: Option<String>,
    },
    ListViewEnd {
        lesson_id: Option<String>,
        duration_sec: u64,
    },
    SelfCheckStart {
        mode: WordSetMode,
        lesson_id: Option<String>,
    },
    SelfCheckEnd {
        mode: WordSetMode,
        lesson_id: Option<String>,
        duration_sec: u64,
    },
    GameRun {
        game_name: String,
        lesson_id: Option<String>,
        duration_sec: u64,
        errors: u32,
        summary: GameSummary,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkEvent {
    pub user_id: String,
    pub session_id: Option<String>,
    pub recorded_at: DateTime<Utc>,
    #[serde(flatten)]
    pub record: Record,
}

pub trait AnalyticsBackend: Send + 'static {
    fn write(&mut self, event: &SinkEvent) -> Result<()>;
}

/// Appends one JSON document per line.
pub struct JsonLinesBackend {
    path: PathBuf,
    file: Option<File>,
}

impl JsonLinesBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
        }
    }
}

impl AnalyticsBackend for JsonLinesBackend {
    fn write(&mut self, event: &SinkEvent) -> Result<()> {
        if self.file.is_none() {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            self.file = Some(file);
        }
        let line = serde_json::to_string(event)?;
        if let Some(file) = self.file.as_mut() {
            writeln!(file, "{}", line)?;
        }
        Ok(())
    }
}

struct SessionHandle {
    id: String,
    started: Instant,
}

struct ListViewRun {
    lesson_id: Option<String>,
    started: Instant,
}

struct SelfCheckRun {
    mode: WordSetMode,
    lesson_id: Option<String>,
    started: Instant,
}

struct GameRun {
    game_name: &'static str,
    lesson_id: Option<String>,
    started: Instant,
    errors: u32,
}

pub struct Analytics {
    tx: Option<Sender<SinkEvent>>,
    worker: Option<JoinHandle<()>>,
    user_id: Option<String>,
    session: Option<SessionHandle>,
    list_view: Option<ListViewRun>,
    self_check: Option<SelfCheckRun>,
    game: Option<GameRun>,
}

impl Analytics {
    /// Starts the writer thread. Without a user id every write is suppressed.
    pub fn spawn<B: AnalyticsBackend>(mut backend: B, user_id: Option<String>) -> Self {
        let (tx, rx) = mpsc::channel::<SinkEvent>();
        let worker = thread::Builder::new()
            .name("analytics".to_string())
            .spawn(move || {
                for event in rx {
                    if let Err(e) = backend.write(&event) {
                        warn!("analytics write failed: {}", e);
                    }
                }
            });

        match worker {
            Ok(worker) => Self::with_writer(Some(tx), Some(worker), user_id),
            Err(e) => {
                warn!("analytics disabled, could not start writer: {}", e);
                Self::with_writer(None, None, user_id)
            }
        }
    }

    pub fn disabled() -> Self {
        Self::with_writer(None, None, None)
    }

    fn with_writer(
        tx: Option<Sender<SinkEvent>>,
        worker: Option<JoinHandle<()>>,
        user_id: Option<String>,
    ) -> Self {
        Self {
            tx,
            worker,
            user_id,
            session: None,
            list_view: None,
            self_check: None,
            game: None,
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.id.as_str())
    }

    fn emit(&self, record: Record) {
        let (Some(tx), Some(user_id)) = (&self.tx, &self.user_id) else {
            return;
        };
        debug!("analytics: {:?}", record);
        let event = SinkEvent {
            user_id: user_id.clone(),
            session_id: self.session_id().map(str::to_string),
            recorded_at: Utc::now(),
            record,
        };
        if tx.send(event).is_err() {
            warn!("analytics writer has stopped; event dropped");
        }
    }

    pub fn start_session(&mut self) {
        if self.user_id.is_none() || self.session.is_some() {
            return;
        }
        let id = uuid::Uuid::new_v4().to_string();
        info!("analytics session {}", id);
        self.session = Some(SessionHandle {
            id,
            started: Instant::now(),
        });
        self.emit(Record::SessionStart {
            user_agent: format!("vocab/{}", env!("CARGO_PKG_VERSION")),
            platform: std::env::consts::OS.to_string(),
        });
    }

    pub fn end_session(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        let duration_sec = session.started.elapsed().as_secs();
        self.emit(Record::SessionEnd { duration_sec });
        self.session = None;
    }

    pub fn lesson_opened(&mut self, lesson_id: &str) {
        self.emit(Record::LessonView {
            lesson_id: lesson_id.to_string(),
        });
    }

    pub fn list_view_start(&mut self, lesson_id: Option<&str>) {
        let lesson_id = lesson_id.map(str::to_string);
        self.emit(Record::ListViewStart {
            lesson_id: lesson_id.clone(),
        });
        self.list_view = Some(ListViewRun {
            lesson_id,
            started: Instant::now(),
        });
    }

    pub fn list_view_end(&mut self) {
        if let Some(run) = self.list_view.take() {
            self.emit(Record::ListViewEnd {
                lesson_id: run.lesson_id,
                duration_sec: run.started.elapsed().as_secs(),
            });
        }
    }

    pub fn self_check_start(&mut self, mode: WordSetMode, lesson_id: Option<&str>) {
        let lesson_id = lesson_id.map(str::to_string);
        self.emit(Record::SelfCheckStart {
            mode,
            lesson_id: lesson_id.clone(),
        });
        self.self_check = Some(SelfCheckRun {
            mode,
            lesson_id,
            started: Instant::now(),
        });
    }

    pub fn self_check_end(&mut self) {
        if let Some(run) = self.self_check.take() {
            self.emit(Record::SelfCheckEnd {
                mode: run.mode,
                lesson_id: run.lesson_id,
                duration_sec: run.started.elapsed().as_secs(),
            });
        }
    }

    pub fn game_start(&mut self, game_name: &'static str, lesson_id: Option<&str>) {
        self.game = Some(GameRun {
            game_name,
            lesson_id: lesson_id.map(str::to_string),
            started: Instant::now(),
            errors: 0,
        });
    }

    pub fn game_error(&mut self) {
        if let Some(game) = self.game.as_mut() {
            game.errors += 1;
        }
    }

    pub fn game_errors(&self) -> Option<u32> {
        self.game.as_ref().map(|g| g.errors)
    }

    pub fn game_end(&mut self, summary: GameSummary) {
        let Some(game) = self.game.take() else {
            return;
        };
        self.emit(Record::GameRun {
            game_name: game.game_name.to_string(),
            lesson_id: game.lesson_id,
            duration_sec: game.started.elapsed().as_secs(),
            errors: game.errors,
            summary,
        });
    }

    /// Forgets an unfinished game; nothing is written.
    pub fn game_abandon(&mut self) {
        self.game = None;
    }

    /// Ends the session and waits for queued writes to be flushed.
    pub fn shutdown(mut self) {
        self.end_session();
    }
}

impl Drop for Analytics {
    fn drop(&mut self) {
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    pub struct MemoryBackend {
        pub events: Arc<Mutex<Vec<SinkEvent>>>,
    }

    impl MemoryBackend {
        pub fn records(&self) -> Vec<Record> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .map(|e| e.record.clone())
                .collect()
        }
    }

    impl AnalyticsBackend for MemoryBackend {
        fn write(&mut self, event: &SinkEvent) -> Result<()> {
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::MemoryBackend;
    use super::*;
    use crate::error::VocabError;

    struct FailingBackend;

    impl AnalyticsBackend for FailingBackend {
        fn write(&mut self, _event: &SinkEvent) -> Result<()> {
            Err(VocabError::from(std::io::Error::other("store unavailable")))
        }
    }

    #[test]
    fn events_carry_session_and_user() {
        let backend = MemoryBackend::default();
        let mut analytics = Analytics::spawn(backend.clone(), Some("u1".to_string()));
        analytics.start_session();
        let session = analytics.session_id().unwrap().to_string();
        analytics.lesson_opened("L1");
        analytics.shutdown();

        let events = backend.events.lock().unwrap();
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.user_id == "u1"));
        assert_eq!(events[1].session_id.as_deref(), Some(session.as_str()));
        assert_eq!(
            events[1].record,
            Record::LessonView {
                lesson_id: "L1".to_string()
            }
        );
        assert!(matches!(events[2].record, Record::SessionEnd { .. }));
    }

    #[test]
    fn no_user_means_no_writes() {
        let backend = MemoryBackend::default();
        let mut analytics = Analytics::spawn(backend.clone(), None);
        analytics.start_session();
        analytics.lesson_opened("L1");
        analytics.list_view_start(Some("L1"));
        analytics.list_view_end();
        drop(analytics);

        assert!(backend.records().is_empty());
    }

    #[test]
    fn game_run_counts_errors_until_end() {
        let backend = MemoryBackend::default();
        let mut analytics = Analytics::spawn(backend.clone(), Some("u1".to_string()));
        analytics.game_start("unscramble", Some("L2"));
        analytics.game_error();
        analytics.game_error();
        assert_eq!(analytics.game_errors(), Some(2));
        analytics.game_end(GameSummary::Unscramble {
            words_total: 4,
            errors: 2,
        });
        analytics.game_error();
        drop(analytics);

        let records = backend.records();
        assert_eq!(records.len(), 1);
        match &records[0] {
            Record::GameRun {
                game_name,
                lesson_id,
                errors,
                ..
            } => {
                assert_eq!(game_name, "unscramble");
                assert_eq!(lesson_id.as_deref(), Some("L2"));
                assert_eq!(*errors, 2);
            }
            other => panic!("unexpected record {:?}", other),
        }
    }

    #[test]
    fn backend_failures_are_swallowed() {
        let mut analytics = Analytics::spawn(FailingBackend, Some("u1".to_string()));
        analytics.start_session();
        analytics.self_check_start(WordSetMode::All, None);
        analytics.self_check_end();
        analytics.shutdown();
    }

    #[test]
    fn json_lines_backend_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trail").join("analytics.jsonl");
        let mut analytics =
            Analytics::spawn(JsonLinesBackend::new(&path), Some("u1".to_string()));
        analytics.start_session();
        analytics.self_check_start(WordSetMode::Hard, None);
        analytics.shutdown();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        let second: SinkEvent = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(
            second.record,
            Record::SelfCheckStart {
                mode: WordSetMode::Hard,
                lesson_id: None
            }
        );
        assert!(lines[0].contains(r#""kind":"session_start""#));
    }
}
