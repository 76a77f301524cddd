//! Constraint violations as Postgres reports them, for mapping tests

use sqlx::error::{DatabaseError, ErrorKind};
use std::{borrow::Cow, error::Error as StdError, fmt};

#[derive(Debug, Clone, Copy)]
enum Violation {
    Unique,
    ForeignKey,
}

#[derive(Debug)]
pub struct FakeDbError {
    violation: Violation,
    constraint: &'static str,
}

impl FakeDbError {
    pub fn unique(constraint: &'static str) -> Self {
        Self { violation: Violation::Unique, constraint }
    }

    pub fn foreign_key(constraint: &'static str) -> Self {
        Self { violation: Violation::ForeignKey, constraint }
    }

    pub fn into_sqlx(self) -> sqlx::Error {
        sqlx::Error::Database(Box::new(self))
    }
}

impl fmt::Display for FakeDbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "violates constraint \"{}\"", self.constraint)
    }
}

impl StdError for FakeDbError {}

impl DatabaseError for FakeDbError {
    fn message(&self) -> &str {
        "constraint violation"
    }

    fn code(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(match self.violation {
            Violation::Unique => "23505",
            Violation::ForeignKey => "23503",
        }))
    }

    fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
        self
    }

    fn constraint(&self) -> Option<&str> {
        Some(self.constraint)
    }

    fn kind(&self) -> ErrorKind {
        match self.violation {
            Violation::Unique => ErrorKind::UniqueViolation,
            Violation::ForeignKey => ErrorKind::ForeignKeyViolation,
        }
    }
}
