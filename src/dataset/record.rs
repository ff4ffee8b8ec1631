use serde::{Deserialize, Serialize};
use std::fmt;

/// Class of a text: produced by a model, or written by a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    Human,
    Ai,
}

impl Label {
    pub const ALL: [Label; 2] = [Label::Ai, Label::Human];

    pub fn from_generated(generated: bool) -> Self {
        if generated {
            Label::Ai
        } else {
            Label::Human
        }
    }

    pub fn is_generated(self) -> bool {
        matches!(self, Label::Ai)
    }

    /// Boolean literal used in the `generated` output column.
    pub fn as_literal(self) -> &'static str {
        if self.is_generated() {
            "True"
        } else {
            "False"
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Ai => write!(f, "generated=true (AI)"),
            Label::Human => write!(f, "generated=false (human)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    pub text: String,
    pub label: Label,
}

impl Record {
    pub fn new(text: impl Into<String>, generated: bool) -> Self {
        Self {
            text: text.into(),
            label: Label::from_generated(generated),
        }
    }

    pub fn generated(&self) -> bool {
        self.label.is_generated()
    }

    pub fn with_text(&self, text: String) -> Self {
        Self {
            text,
            label: self.label,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassCounts {
    pub ai: usize,
    pub human: usize,
}

impl ClassCounts {
    pub fn of(records: &[Record]) -> Self {
        let mut counts = Self::default();
        for record in records {
            counts.add(record.label, 1);
        }
        counts
    }

    pub fn get(&self, label: Label) -> usize {
        match label {
            Label::Ai => self.ai,
            Label::Human => self.human,
        }
    }

    pub fn add(&mut self, label: Label, n: usize) {
        match label {
            Label::Ai => self.ai += n,
            Label::Human => self.human += n,
        }
    }

    pub fn total(&self) -> usize {
        self.ai + self.human
    }

    pub fn both_at_least(&self, n: usize) -> bool {
        self.ai >= n && self.human >= n
    }
}

impl fmt::Display for ClassCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} AI, {} human", self.ai, self.human)
    }
}

/// A class that could not fill its per-class quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    pub label: Label,
    pub available: usize,
    pub requested: usize,
}

impl fmt::Display for Shortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "only {} of {} requested rows available for {}",
            self.available, self.requested, self.label
        )
    }
}
