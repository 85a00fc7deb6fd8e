//! Book model and related types

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{enums::BookState, shared::LoanRef};
use crate::error::{AppError, AppResult};

/// Validated field set used to build a book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewBook {
    #[validate(length(min = 1, message = "Author cannot be empty"))]
    pub author: String,
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Call number cannot be empty"))]
    pub call_number: String,
}

impl NewBook {
    pub fn new(author: &str, title: &str, call_number: &str) -> Self {
        Self {
            author: author.to_string(),
            title: title.to_string(),
            call_number: call_number.to_string(),
        }
    }
}

/// A catalogued book.
///
/// Invariant: `loan` is set if and only if the state is [`BookState::OnLoan`].
#[derive(Debug)]
pub struct Book {
    id: i32,
    author: String,
    title: String,
    call_number: String,
    state: BookState,
    loan: Option<LoanRef>,
}

/// Book view for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: i32,
    pub author: String,
    pub title: String,
    pub call_number: String,
    pub state: BookState,
    pub loan_id: Option<i32>,
}

impl Book {
    pub fn new(fields: NewBook, id: i32) -> AppResult<Self> {
        fields.validate()?;
        if id <= 0 {
            return Err(AppError::Validation(format!(
                "Book id must be a positive integer, got {}",
                id
            )));
        }

        Ok(Self {
            id,
            author: fields.author,
            title: fields.title,
            call_number: fields.call_number,
            state: BookState::Available,
            loan: None,
        })
    }

    /// Put the book on loan
    pub fn borrow(&mut self, loan: LoanRef) -> AppResult<()> {
        if self.state != BookState::Available {
            return Err(AppError::InvalidState(format!(
                "Book {} is not available (state {})",
                self.id, self.state
            )));
        }
        self.loan = Some(loan);
        self.state = BookState::OnLoan;
        Ok(())
    }

    /// Active loan, only while the book is on loan
    pub fn loan(&self) -> Option<&LoanRef> {
        match self.state {
            BookState::OnLoan => self.loan.as_ref(),
            _ => None,
        }
    }

    /// Return the book. A damaged book goes to [`BookState::Damaged`] instead of
    /// back on the shelf.
    pub fn return_book(&mut self, damaged: bool) -> AppResult<()> {
        self.require(BookState::OnLoan, "returned")?;
        self.loan = None;
        self.state = if damaged {
            BookState::Damaged
        } else {
            BookState::Available
        };
        Ok(())
    }

    pub fn lose(&mut self) -> AppResult<()> {
        self.require(BookState::OnLoan, "marked as lost")?;
        self.loan = None;
        self.state = BookState::Lost;
        Ok(())
    }

    pub fn repair(&mut self) -> AppResult<()> {
        self.require(BookState::Damaged, "repaired")?;
        self.state = BookState::Available;
        Ok(())
    }

    /// Withdraw the book for good. Only available, damaged or lost books can be disposed of.
    pub fn dispose(&mut self) -> AppResult<()> {
        if !self.state.is_disposable() {
            return Err(AppError::InvalidState(format!(
                "Book {} cannot be disposed of from state {}",
                self.id, self.state
            )));
        }
        self.state = BookState::Disposed;
        Ok(())
    }

    fn require(&self, expected: BookState, action: &str) -> AppResult<()> {
        if self.state != expected {
            return Err(AppError::InvalidState(format!(
                "Book {} cannot be {} as it is {}, not {}",
                self.id, action, self.state, expected
            )));
        }
        Ok(())
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn call_number(&self) -> &str {
        &self.call_number
    }

    pub fn state(&self) -> BookState {
        self.state
    }

    pub fn summary(&self) -> BookSummary {
        BookSummary {
            id: self.id,
            author: self.author.clone(),
            title: self.title.clone(),
            call_number: self.call_number.clone(),
            state: self.state,
            loan_id: self.loan().map(|loan| loan.read().id()),
        }
    }
}
