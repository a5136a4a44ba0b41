//! Word Source: books → lessons → word pairs, loaded from JSON.
//!
//! Accepted format:
//!
//! ```json
//! { "books": [ { "id": 1, "title": "...", "lessons": [ { "id": "L1", "title": "...", "words": [["cat", "кот"]] } ] } ] }
//! ```
//!
//! Lesson `id`/`title`/`words` are optional and defaulted by position.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, VocabError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPair {
    pub front: String,
    pub back: String,
}

impl WordPair {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub words: Vec<WordPair>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookInfo {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, Default)]
pub struct WordLibrary {
    books: Vec<Book>,
}

impl WordLibrary {
    pub fn parse(json: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(json)?;
        let books = root
            .get("books")
            .and_then(Value::as_array)
            .ok_or(VocabError::MissingBooks)?;

        Ok(Self {
            books: books.iter().map(parse_book).collect(),
        })
    }

    pub fn books(&self) -> Vec<BookInfo> {
        self.books
            .iter()
            .map(|b| BookInfo {
                id: b.id.clone(),
                title: b.title.clone(),
            })
            .collect()
    }

    pub fn book(&self, book_id: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.id == book_id)
    }

    pub fn lessons(&self, book_id: &str) -> Result<Vec<Lesson>> {
        self.book(book_id)
            .map(|b| b.lessons.clone())
            .ok_or_else(|| VocabError::BookNotFound(book_id.to_string()))
    }
}

fn id_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn parse_book(raw: &Value) -> Book {
    let id = id_string(raw.get("id")).unwrap_or_default();
    let title = raw
        .get("title")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Book {}", id));
    let lessons = raw
        .get("lessons")
        .and_then(Value::as_array)
        .map(|ls| {
            ls.iter()
                .enumerate()
                .map(|(i, l)| parse_lesson(i, l))
                .collect()
        })
        .unwrap_or_default();

    Book { id, title, lessons }
}

fn parse_lesson(position: usize, raw: &Value) -> Lesson {
    let n = position + 1;
    let id = id_string(raw.get("id")).unwrap_or_else(|| format!("L{}", n));
    let title = raw
        .get("title")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Урок {}", n));
    let words = raw
        .get("words")
        .and_then(Value::as_array)
        .map(|ws| ws.iter().filter_map(parse_pair).collect())
        .unwrap_or_default();

    Lesson { id, title, words }
}

fn parse_pair(raw: &Value) -> Option<WordPair> {
    let items = raw.as_array()?;
    let front = items.first()?.as_str()?;
    let back = items.get(1)?.as_str()?;
    Some(WordPair::new(front, back))
}

pub trait WordSource {
    fn fetch(&self) -> Result<WordLibrary>;

    fn describe(&self) -> String;
}

/// Re-reads the file on every fetch so edits show up on the next book switch.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl WordSource for JsonFileSource {
    fn fetch(&self) -> Result<WordLibrary> {
        let content = fs::read_to_string(&self.path)?;
        WordLibrary::parse(&content)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

pub struct InlineSource {
    json: String,
}

impl InlineSource {
    pub fn new(json: impl Into<String>) -> Self {
        Self { json: json.into() }
    }
}

impl WordSource for InlineSource {
    fn fetch(&self) -> Result<WordLibrary> {
        WordLibrary::parse(&self.json)
    }

    fn describe(&self) -> String {
        "inline".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lessons_are_defaulted_by_position() {
        let lib = WordLibrary::parse(
            r#"{ "books": [ { "id": 7, "lessons": [
                { "words": [["cat", "кот"]] },
                { "id": "x", "title": "Animals" },
                { "id": 12, "words": [["dog", "пёс"], ["bad"], 5] }
            ] } ] }"#,
        )
        .unwrap();

        let books = lib.books();
        assert_eq!(books[0].id, "7");
        assert_eq!(books[0].title, "Book 7");

        let lessons = lib.lessons("7").unwrap();
        assert_eq!(lessons[0].id, "L1");
        assert_eq!(lessons[0].title, "Урок 1");
        assert_eq!(lessons[0].words, vec![WordPair::new("cat", "кот")]);
        assert_eq!(lessons[1].title, "Animals");
        assert!(lessons[1].words.is_empty());
        assert_eq!(lessons[2].id, "12");
        assert_eq!(lessons[2].title, "Урок 3");
        assert_eq!(lessons[2].words.len(), 1);
    }

    #[test]
    fn missing_books_array_is_fatal() {
        assert!(matches!(
            WordLibrary::parse(r#"{ "lessons": [] }"#),
            Err(VocabError::MissingBooks)
        ));
        assert!(matches!(
            WordLibrary::parse("not json"),
            Err(VocabError::Json(_))
        ));
    }

    #[test]
    fn unknown_book_is_reported() {
        let lib = WordLibrary::parse(r#"{ "books": [] }"#).unwrap();
        assert!(matches!(
            lib.lessons("1"),
            Err(VocabError::BookNotFound(id)) if id == "1"
        ));
    }

    #[test]
    fn file_source_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.json");
        fs::write(&path, r#"{ "books": [ { "id": "1", "title": "One" } ] }"#).unwrap();

        let lib = JsonFileSource::new(&path).fetch().unwrap();
        assert_eq!(lib.books()[0].title, "One");

        let missing = JsonFileSource::new(dir.path().join("nope.json")).fetch();
        assert!(matches!(missing, Err(VocabError::Io(_))));
    }
}
