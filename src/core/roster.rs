//! In-memory roster lookup.
//!
//! The roster comes from a spreadsheet export, so identifiers may arrive as
//! text or as numbers (`101`, `101.0`). Both sides of every comparison go
//! through [`normalize_identifier`] first.

use crate::errors::CaptureError;
use crate::models::Student;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

static FLOAT_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\.0+$").expect("valid identifier regex"));

/// Identifier cell as produced by the import collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum RawIdentifier {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for RawIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawIdentifier::Integer(n) => write!(f, "{n}"),
            RawIdentifier::Float(x) => write!(f, "{x:?}"),
            RawIdentifier::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for RawIdentifier {
    fn from(s: &str) -> Self {
        RawIdentifier::Text(s.to_string())
    }
}

impl From<i64> for RawIdentifier {
    fn from(n: i64) -> Self {
        RawIdentifier::Integer(n)
    }
}

/// One roster row before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterRow {
    pub identifier: RawIdentifier,
    pub display_name: String,
}

impl RosterRow {
    pub fn new(identifier: impl Into<RawIdentifier>, display_name: &str) -> Self {
        Self {
            identifier: identifier.into(),
            display_name: display_name.to_string(),
        }
    }
}

/// Canonical string form of an identifier.
pub fn normalize_identifier(raw: &str) -> String {
    let trimmed = raw.trim();
    match FLOAT_INTEGER.captures(trimmed) {
        Some(caps) => caps[1].to_string(),
        None => trimmed.to_string(),
    }
}

#[derive(Debug, Default)]
pub struct RosterIndex {
    students: Vec<Student>,
    by_id: HashMap<String, usize>,
}

impl RosterIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole index. Blank identifiers are skipped and the first
    /// row wins when an identifier repeats. Returns the number of students.
    pub fn load<I>(&mut self, rows: I) -> usize
    where
        I: IntoIterator<Item = RosterRow>,
    {
        let mut students = Vec::new();
        let mut by_id = HashMap::new();

        for row in rows {
            let identifier = normalize_identifier(&row.identifier.to_string());
            if identifier.is_empty() || by_id.contains_key(&identifier) {
                continue;
            }

            by_id.insert(identifier.clone(), students.len());
            students.push(Student {
                identifier,
                display_name: row.display_name.trim().to_string(),
            });
        }

        self.students = students;
        self.by_id = by_id;
        self.students.len()
    }

    pub fn lookup(&self, identifier: &str) -> Result<&Student, CaptureError> {
        if !self.is_loaded() {
            return Err(CaptureError::RosterNotLoaded);
        }

        let key = normalize_identifier(identifier);
        match self.by_id.get(&key) {
            Some(&i) => Ok(&self.students[i]),
            None => Err(CaptureError::UnknownStudent(key)),
        }
    }

    /// Students in roster file order.
    pub fn iter(&self) -> impl Iterator<Item = &Student> {
        self.students.iter()
    }

    pub fn is_loaded(&self) -> bool {
        !self.students.is_empty()
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}
