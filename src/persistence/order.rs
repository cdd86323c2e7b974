use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

/// A single-column sort request.
///
/// The default value has no column and stands for "no ordering configured";
/// every operation that sorts rejects it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSpec {
    column: String,
    direction: Direction,
}

impl OrderSpec {
    pub fn new(column: impl Into<String>, direction: Direction) -> OrderSpec {
        OrderSpec {
            column: column.into(),
            direction,
        }
    }

    pub fn asc(column: impl Into<String>) -> OrderSpec {
        OrderSpec::new(column, Direction::Ascending)
    }

    pub fn desc(column: impl Into<String>) -> OrderSpec {
        OrderSpec::new(column, Direction::Descending)
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_unset(&self) -> bool {
        self.column.is_empty()
    }
}

impl Display for OrderSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let direction = match self.direction {
            Direction::Ascending => "ASC",
            Direction::Descending => "DESC",
        };
        write!(f, "Order by '{}' {}", self.column, direction)
    }
}
