use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VocabError;
use crate::hard_words::HardWordStore;
use crate::words::{Lesson, WordPair};

/// Stable identifier of one word pair: `book|lesson:index`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HardWordKey {
    pub book_id: String,
    pub lesson_id: String,
    pub index: usize,
}

impl HardWordKey {
    pub fn new(book_id: impl Into<String>, lesson_id: impl Into<String>, index: usize) -> Self {
        Self {
            book_id: book_id.into(),
            lesson_id: lesson_id.into(),
            index,
        }
    }
}

impl fmt::Display for HardWordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}:{}", self.book_id, self.lesson_id, self.index)
    }
}

impl FromStr for HardWordKey {
    type Err = VocabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || VocabError::InvalidKey(s.to_string());
        let (book_id, rest) = s.split_once('|').ok_or_else(invalid)?;
        let (lesson_id, index) = rest.rsplit_once(':').ok_or_else(invalid)?;
        let index = index.parse().map_err(|_| invalid())?;
        Ok(Self::new(book_id, lesson_id, index))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordSetMode {
    Lesson,
    All,
    Hard,
}

impl WordSetMode {
    pub fn as_str(self) -> &'static str {
        match self {
            WordSetMode::Lesson => "lesson",
            WordSetMode::All => "all",
            WordSetMode::Hard => "hard",
        }
    }
}

/// Where a pair in an [`ActiveWordSet`] came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordOrigin {
    pub lesson_id: String,
    pub index: usize,
}

/// The working set handed to the list view, the card viewer and the games.
///
/// `pairs` and `origins` are only ever pushed together, so they stay
/// index-aligned for the lifetime of the set.
#[derive(Debug, Clone)]
pub struct ActiveWordSet {
    id: String,
    title: String,
    mode: WordSetMode,
    book_id: String,
    pairs: Vec<WordPair>,
    origins: Vec<WordOrigin>,
}

impl ActiveWordSet {
    fn empty(id: &str, title: &str, mode: WordSetMode, book_id: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            mode,
            book_id: book_id.to_string(),
            pairs: Vec::new(),
            origins: Vec::new(),
        }
    }

    fn push(&mut self, pair: &WordPair, lesson_id: &str, index: usize) {
        self.pairs.push(pair.clone());
        self.origins.push(WordOrigin {
            lesson_id: lesson_id.to_string(),
            index,
        });
    }

    pub fn from_lesson(book_id: &str, lesson: &Lesson) -> Self {
        let mut set = Self::empty(&lesson.id, &lesson.title, WordSetMode::Lesson, book_id);
        for (i, pair) in lesson.words.iter().enumerate() {
            set.push(pair, &lesson.id, i);
        }
        set
    }

    pub fn all(book_id: &str, lessons: &[Lesson]) -> Self {
        let mut set = Self::empty("all", "All words", WordSetMode::All, book_id);
        for lesson in lessons {
            for (i, pair) in lesson.words.iter().enumerate() {
                set.push(pair, &lesson.id, i);
            }
        }
        set
    }

    pub fn hard(book_id: &str, lessons: &[Lesson], store: &HardWordStore) -> Self {
        let mut set = Self::empty("hard", "Hard words", WordSetMode::Hard, book_id);
        for lesson in lessons {
            for (i, pair) in lesson.words.iter().enumerate() {
                if store.contains(&HardWordKey::new(book_id, &lesson.id, i)) {
                    set.push(pair, &lesson.id, i);
                }
            }
        }
        set
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn mode(&self) -> WordSetMode {
        self.mode
    }

    pub fn book_id(&self) -> &str {
        &self.book_id
    }

    /// Lesson id for analytics; `None` for the all/hard sets.
    pub fn lesson_id(&self) -> Option<&str> {
        match self.mode {
            WordSetMode::Lesson => Some(&self.id),
            _ => None,
        }
    }

    pub fn pairs(&self) -> &[WordPair] {
        &self.pairs
    }

    pub fn origins(&self) -> &[WordOrigin] {
        &self.origins
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn key_at(&self, index: usize) -> Option<HardWordKey> {
        self.origins
            .get(index)
            .map(|o| HardWordKey::new(&self.book_id, &o.lesson_id, o.index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lessons() -> Vec<Lesson> {
        vec![
            Lesson {
                id: "L1".into(),
                title: "One".into(),
                words: vec![WordPair::new("cat", "кот"), WordPair::new("dog", "пёс")],
            },
            Lesson {
                id: "L2".into(),
                title: "Two".into(),
                words: vec![WordPair::new("sun", "солнце")],
            },
        ]
    }

    #[test]
    fn key_format_round_trips() {
        let key = HardWordKey::new("1", "L1", 0);
        assert_eq!(key.to_string(), "1|L1:0");
        assert_eq!("1|L1:0".parse::<HardWordKey>().unwrap(), key);
        assert_eq!(
            "b|les:son:3".parse::<HardWordKey>().unwrap(),
            HardWordKey::new("b", "les:son", 3)
        );
        assert!("nonsense".parse::<HardWordKey>().is_err());
        assert!("1|L1:x".parse::<HardWordKey>().is_err());
    }

    #[test]
    fn sets_keep_pairs_and_origins_aligned() {
        let ls = lessons();
        let single = ActiveWordSet::from_lesson("1", &ls[0]);
        let all = ActiveWordSet::all("1", &ls);
        for set in [&single, &all] {
            assert_eq!(set.pairs().len(), set.origins().len());
        }
        assert_eq!(all.len(), 3);
        assert_eq!(all.key_at(2), Some(HardWordKey::new("1", "L2", 0)));
        assert_eq!(single.lesson_id(), Some("L1"));
        assert_eq!(all.lesson_id(), None);
    }

    #[test]
    fn hard_set_filters_by_store_membership() {
        let ls = lessons();
        let mut store = HardWordStore::in_memory();
        store.toggle(&HardWordKey::new("1", "L1", 1));
        store.toggle(&HardWordKey::new("2", "L2", 0));

        let hard = ActiveWordSet::hard("1", &ls, &store);
        assert_eq!(hard.pairs(), &[WordPair::new("dog", "пёс")]);
        assert_eq!(hard.origins().len(), 1);
        assert_eq!(hard.key_at(0), Some(HardWordKey::new("1", "L1", 1)));
        assert_eq!(hard.mode(), WordSetMode::Hard);
    }
}
