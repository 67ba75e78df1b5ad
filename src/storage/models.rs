//! Core data models for quote-sync
//!
//! A quote is identified by its text. The category is the only field
//! that sync is allowed to change once a quote exists locally.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single quote and the category it is filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// The quote itself. Also the natural key used to match local and remote records.
    pub text: String,

    /// Classification label (e.g., "Inspiration").
    pub category: String,
}

impl Quote {
    /// Builds a validated quote, trimming both fields.
    pub fn new(text: &str, category: &str) -> Result<Self, ValidationError> {
        let text = text.trim();
        let category = category.trim();

        if text.is_empty() {
            return Err(ValidationError::EmptyText);
        }
        if category.is_empty() {
            return Err(ValidationError::EmptyCategory);
        }

        Ok(Self {
            text: text.to_string(),
            category: category.to_string(),
        })
    }

    /// Checks that an already-constructed quote (e.g., parsed from a file) is usable.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.text.trim().is_empty() {
            return Err(ValidationError::EmptyText);
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::EmptyCategory);
        }
        Ok(())
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" - {}", self.text, self.category)
    }
}

/// Rejected user input for a new quote.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The quote text was empty after trimming.
    #[error("Please enter both a quote and a category (quote text is empty)")]
    EmptyText,

    /// The category was empty after trimming.
    #[error("Please enter both a quote and a category (category is empty)")]
    EmptyCategory,
}

/// Which quotes are visible: everything, or a single category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    /// Returns true if the quote passes this filter.
    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(c) => quote.category == *c,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "all"),
            CategoryFilter::Category(c) => write!(f, "{c}"),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    /// Blank input and `"all"` both mean no filtering.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "all" {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Category(s.to_string()))
        }
    }
}

/// Returns the quotes that pass `filter`, in their original order.
pub fn filter_quotes<'a>(quotes: &'a [Quote], filter: &CategoryFilter) -> Vec<&'a Quote> {
    quotes.iter().filter(|q| filter.matches(q)).collect()
}

/// Distinct categories in first-seen order.
pub fn categories(quotes: &[Quote]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for quote in quotes {
        if !seen.iter().any(|c| *c == quote.category) {
            seen.push(quote.category.clone());
        }
    }
    seen
}

/// The quotes a fresh installation starts with.
pub fn default_quotes() -> Vec<Quote> {
    vec![
        Quote {
            text: "The only limit to our realization of tomorrow is our doubts of today."
                .to_string(),
            category: "Inspiration".to_string(),
        },
        Quote {
            text: "Life is 10% what happens to us and 90% how we react to it.".to_string(),
            category: "Motivation".to_string(),
        },
        Quote {
            text: "The purpose of our lives is to be happy.".to_string(),
            category: "Happiness".to_string(),
        },
    ]
}
