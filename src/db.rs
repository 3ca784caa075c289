// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Display;
use std::fmt::Formatter;
use std::path::Path;
use std::str::FromStr;

use dictation_core::DictionaryEntry;
use dictation_core::DrillMode;
use dictation_core::ErrorReport;
use dictation_core::Fallible;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::ToSql;
use rusqlite::params;
use rusqlite::params_from_iter;
use serde::Deserialize;
use serde::Serialize;

const SCHEMA: &str = "
create table if not exists categories (
    id integer primary key autoincrement,
    name text not null unique,
    description text,
    type text not null check (type in ('class', 'lesson', 'topic')),
    created_at timestamp default current_timestamp
);

create table if not exists letters (
    id integer primary key autoincrement,
    letter text not null unique,
    sort_order integer
);

create table if not exists words (
    id integer primary key autoincrement,
    russian_word text not null,
    english_word text,
    category_id integer,
    letter_id integer,
    difficulty integer default 1 check (difficulty between 1 and 5),
    created_at timestamp default current_timestamp,
    foreign key (category_id) references categories (id),
    foreign key (letter_id) references letters (id)
);

create index if not exists idx_words_category on words (category_id);
create index if not exists idx_words_letter on words (letter_id);
create index if not exists idx_words_russian on words (russian_word);
";

/// What a category groups words by. Classes hold plain dictation words;
/// lessons and topics hold words with translations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Class,
    Lesson,
    Topic,
}

impl CategoryType {
    pub fn as_str(self) -> &'static str {
        match self {
            CategoryType::Class => "class",
            CategoryType::Lesson => "lesson",
            CategoryType::Topic => "topic",
        }
    }

    /// The drill mode words in this category are normally parsed with.
    pub fn word_mode(self) -> DrillMode {
        match self {
            CategoryType::Class => DrillMode::PrimaryOnly,
            CategoryType::Lesson | CategoryType::Topic => DrillMode::PrimaryToSecondary,
        }
    }
}

impl Display for CategoryType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CategoryType {
    type Err = ErrorReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "class" => Ok(CategoryType::Class),
            "lesson" => Ok(CategoryType::Lesson),
            "topic" => Ok(CategoryType::Topic),
            _ => Err(ErrorReport::validation(format!(
                "unknown category type: '{s}'"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: CategoryType,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LetterCount {
    pub id: i64,
    pub letter: String,
    pub count: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DatabaseStats {
    pub categories: usize,
    pub letters: usize,
    pub total_words: usize,
    pub with_translation: usize,
}

pub struct Database {
    conn: Connection,
}

fn db_error(e: rusqlite::Error) -> ErrorReport {
    ErrorReport::storage(format!("database error: {e}"))
}

impl Database {
    /// Open (or create) the dictionary at the given path.
    pub fn new(path: &Path) -> Fallible<Self> {
        let conn = Connection::open(path).map_err(db_error)?;
        Self::with_connection(conn)
    }

    pub fn in_memory() -> Fallible<Self> {
        let conn = Connection::open_in_memory().map_err(db_error)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Fallible<Self> {
        conn.execute_batch(SCHEMA).map_err(db_error)?;
        Ok(Self { conn })
    }

    /// Run `f` inside a transaction. Everything `f` wrote is rolled back if it
    /// fails.
    pub fn transaction<T>(&self, f: impl FnOnce(&Self) -> Fallible<T>) -> Fallible<T> {
        let tx = self.conn.unchecked_transaction().map_err(db_error)?;
        let value = f(self)?;
        tx.commit().map_err(db_error)?;
        Ok(value)
    }

    /// Add a category, or return the ID of the existing one with that name.
    pub fn add_category(
        &self,
        name: &str,
        description: Option<&str>,
        kind: CategoryType,
    ) -> Fallible<i64> {
        self.conn
            .execute(
                "insert or ignore into categories (name, description, type) values (?1, ?2, ?3)",
                params![name, description, kind.as_str()],
            )
            .map_err(db_error)?;
        self.conn
            .query_row(
                "select id from categories where name = ?1",
                params![name],
                |row| row.get(0),
            )
            .map_err(db_error)
    }

    pub fn category_id(&self, name: &str) -> Fallible<Option<i64>> {
        self.conn
            .query_row(
                "select id from categories where name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_error)
    }

    /// Add a letter (upper-cased), or return the ID of the existing one.
    pub fn add_letter(&self, letter: char) -> Fallible<i64> {
        let letter: String = letter.to_uppercase().collect();
        let sort_order = letter.chars().next().map(|c| c as i64).unwrap_or_default();
        self.conn
            .execute(
                "insert or ignore into letters (letter, sort_order) values (?1, ?2)",
                params![letter, sort_order],
            )
            .map_err(db_error)?;
        self.conn
            .query_row(
                "select id from letters where letter = ?1",
                params![letter],
                |row| row.get(0),
            )
            .map_err(db_error)
    }

    /// Add a word. Its letter is derived from its first character; an unknown
    /// category name leaves the word uncategorized.
    pub fn add_word(
        &self,
        russian: &str,
        english: Option<&str>,
        category: Option<&str>,
        difficulty: u8,
    ) -> Fallible<i64> {
        let russian = russian.trim();
        let first = russian
            .chars()
            .next()
            .ok_or_else(|| ErrorReport::validation("cannot add an empty word"))?;
        if !(1..=5).contains(&difficulty) {
            return Err(ErrorReport::validation(format!(
                "difficulty must be between 1 and 5, got {difficulty}"
            )));
        }
        let letter_id = self.add_letter(first)?;
        let category_id = match category {
            Some(name) => self.category_id(name)?,
            None => None,
        };
        self.conn
            .execute(
                "insert into words (russian_word, english_word, category_id, letter_id, difficulty)
                 values (?1, ?2, ?3, ?4, ?5)",
                params![russian, english, category_id, letter_id, difficulty],
            )
            .map_err(db_error)?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn list_categories(&self, kind: Option<CategoryType>) -> Fallible<Vec<Category>> {
        let mut sql = "select id, name, description, type from categories".to_string();
        let mut args: Vec<&dyn ToSql> = Vec::new();
        let kind_str = kind.map(CategoryType::as_str);
        if let Some(kind_str) = &kind_str {
            sql.push_str(" where type = ?1");
            args.push(kind_str);
        }
        sql.push_str(" order by name");
        let mut stmt = self.conn.prepare(&sql).map_err(db_error)?;
        let rows = stmt
            .query_map(args.as_slice(), |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(db_error)?;
        let mut categories = Vec::new();
        for row in rows {
            let (id, name, description, kind) = row.map_err(db_error)?;
            categories.push(Category {
                id,
                name,
                description,
                kind: kind.parse()?,
            });
        }
        Ok(categories)
    }

    /// Every letter with the number of words filed under it, optionally
    /// restricted to one category. Letters with no words are included.
    pub fn list_letters_with_counts(&self, category_id: Option<i64>) -> Fallible<Vec<LetterCount>> {
        let mut sql = "select l.id, l.letter, count(w.id)
                       from letters l
                       left join words w on l.id = w.letter_id"
            .to_string();
        let mut args: Vec<&dyn ToSql> = Vec::new();
        if let Some(category_id) = &category_id {
            sql.push_str(" and w.category_id = ?1");
            args.push(category_id);
        }
        sql.push_str(" group by l.id, l.letter order by l.sort_order");
        let mut stmt = self.conn.prepare(&sql).map_err(db_error)?;
        let rows = stmt
            .query_map(args.as_slice(), |row| {
                Ok(LetterCount {
                    id: row.get(0)?,
                    letter: row.get(1)?,
                    count: row.get::<_, i64>(2)? as usize,
                })
            })
            .map_err(db_error)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(db_error)
    }

    /// Words matching the filters, ordered alphabetically. An empty filter
    /// list does not restrict anything.
    pub fn find_words(
        &self,
        category_ids: &[i64],
        letter_ids: &[i64],
    ) -> Fallible<Vec<DictionaryEntry>> {
        let (filter, args) = word_filter(category_ids, letter_ids);
        let sql = format!(
            "select russian_word, english_word from words w where 1=1{filter} order by w.russian_word"
        );
        let mut stmt = self.conn.prepare(&sql).map_err(db_error)?;
        let rows = stmt
            .query_map(params_from_iter(args.iter()), |row| {
                Ok(DictionaryEntry {
                    russian: row.get(0)?,
                    english: row.get(1)?,
                })
            })
            .map_err(db_error)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(db_error)
    }

    /// How many words a filter selection would load in the given mode.
    pub fn count_words(
        &self,
        category_ids: &[i64],
        letter_ids: &[i64],
        mode: DrillMode,
    ) -> Fallible<usize> {
        let (mut filter, args) = word_filter(category_ids, letter_ids);
        if mode.needs_translation() {
            filter.push_str(" and w.english_word is not null and trim(w.english_word) != ''");
        }
        let sql = format!("select count(*) from words w where 1=1{filter}");
        let count: i64 = self
            .conn
            .query_row(&sql, params_from_iter(args.iter()), |row| row.get(0))
            .map_err(db_error)?;
        Ok(count as usize)
    }

    pub fn stats(&self) -> Fallible<DatabaseStats> {
        let count = |sql: &str| -> Fallible<usize> {
            let n: i64 = self
                .conn
                .query_row(sql, [], |row| row.get(0))
                .map_err(db_error)?;
            Ok(n as usize)
        };
        Ok(DatabaseStats {
            categories: count("select count(*) from categories")?,
            letters: count("select count(*) from letters")?,
            total_words: count("select count(*) from words")?,
            with_translation: count("select count(*) from words where english_word is not null")?,
        })
    }

    /// Delete every word, keeping categories and letters.
    pub fn clear_words(&self) -> Fallible<usize> {
        self.conn.execute("delete from words", []).map_err(db_error)
    }
}

fn word_filter(category_ids: &[i64], letter_ids: &[i64]) -> (String, Vec<i64>) {
    let mut filter = String::new();
    let mut args = Vec::new();
    if !category_ids.is_empty() {
        filter.push_str(&format!(" and w.category_id in ({})", placeholders(category_ids.len())));
        args.extend_from_slice(category_ids);
    }
    if !letter_ids.is_empty() {
        filter.push_str(&format!(" and w.letter_id in ({})", placeholders(letter_ids.len())));
        args.extend_from_slice(letter_ids);
    }
    (filter, args)
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}
