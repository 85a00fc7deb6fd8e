//! Loan (borrow) model and related types

use chrono::{DateTime, Duration, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    book::Book,
    enums::LoanState,
    member::Member,
    shared::{BookRef, MemberRef, WeakShared},
};
use crate::error::{AppError, AppResult};

/// Lending thresholds read by members and loan callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanPolicy {
    /// Loan period in days
    pub loan_period_days: u32,
    /// Maximum number of loans a member may hold
    pub loan_limit: usize,
    /// Fine balance at which a member may no longer borrow
    pub fine_limit: Decimal,
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self {
            loan_period_days: 14,
            loan_limit: 5,
            fine_limit: Decimal::new(1000, 2),
        }
    }
}

impl LoanPolicy {
    /// Due date of a loan starting at `borrow_date`
    pub fn due_date_for(&self, borrow_date: DateTime<Utc>) -> AppResult<DateTime<Utc>> {
        borrow_date
            .checked_add_signed(Duration::days(i64::from(self.loan_period_days)))
            .ok_or_else(|| {
                AppError::OutOfRange(format!(
                    "A {} day loan from {} ends past the supported date range",
                    self.loan_period_days, borrow_date
                ))
            })
    }
}

/// A loan of one book to one member.
///
/// The borrow date is held at the start of its calendar day and the due date at
/// 23:59:59 of its calendar day, so both days count in full.
pub struct Loan {
    id: i32,
    book: WeakShared<Book>,
    borrower: WeakShared<Member>,
    // Immutable book and member fields, copied so loan queries never lock them
    book_id: i32,
    book_title: String,
    borrower_id: i32,
    borrow_date: DateTime<Utc>,
    due_date: DateTime<Utc>,
    state: LoanState,
}

/// Loan view for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanDetails {
    pub id: i32,
    pub book_id: i32,
    pub book_title: String,
    pub borrower_id: i32,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub state: LoanState,
    pub is_overdue: bool,
}

fn start_of_day(date: DateTime<Utc>) -> DateTime<Utc> {
    date.date_naive().and_time(NaiveTime::MIN).and_utc()
}

fn end_of_day(date: DateTime<Utc>) -> Option<DateTime<Utc>> {
    start_of_day(date)
        .checked_add_signed(Duration::days(1))
        .map(|next_day| next_day - Duration::seconds(1))
}

impl Loan {
    /// Build a pending loan. Reads the book and borrower, so neither may be
    /// write-locked by the caller.
    pub fn new(
        book: &BookRef,
        borrower: &MemberRef,
        borrow_date: DateTime<Utc>,
        due_date: DateTime<Utc>,
        id: i32,
    ) -> AppResult<Self> {
        if due_date < borrow_date {
            return Err(AppError::Validation(
                "The due date cannot be before the borrow date".to_string(),
            ));
        }
        if id <= 0 {
            return Err(AppError::Validation(format!(
                "Loan id must be a positive integer, got {}",
                id
            )));
        }
        let due_date = end_of_day(due_date)
            .ok_or_else(|| AppError::Validation("The due date is out of range".to_string()))?;

        let (book_id, book_title) = {
            let book = book.read();
            (book.id(), book.title().to_string())
        };
        let borrower_id = borrower.read().id();

        Ok(Self {
            id,
            book: book.downgrade(),
            borrower: borrower.downgrade(),
            book_id,
            book_title,
            borrower_id,
            borrow_date: start_of_day(borrow_date),
            due_date,
            state: LoanState::Pending,
        })
    }

    /// PENDING -> CURRENT
    pub fn commit(&mut self) -> AppResult<()> {
        if self.state != LoanState::Pending {
            return Err(AppError::InvalidState(format!(
                "Loan {} can only be committed while PENDING (state {})",
                self.id, self.state
            )));
        }
        self.state = LoanState::Current;
        Ok(())
    }

    /// CURRENT | OVERDUE -> COMPLETE
    pub fn complete(&mut self) -> AppResult<()> {
        self.require_active("completed")?;
        self.state = LoanState::Complete;
        Ok(())
    }

    pub fn is_overdue(&self) -> bool {
        self.state == LoanState::Overdue
    }

    /// Mark the loan overdue when the calendar day of `current_date` is after the
    /// due day. Returns `true` when the loan is overdue as of `current_date`;
    /// otherwise the state is left untouched and `false` is returned.
    pub fn check_overdue(&mut self, current_date: DateTime<Utc>) -> AppResult<bool> {
        self.require_active("checked for overdue")?;
        if current_date.date_naive() > self.due_date.date_naive() {
            self.state = LoanState::Overdue;
            return Ok(true);
        }
        Ok(false)
    }

    fn require_active(&self, action: &str) -> AppResult<()> {
        if !self.state.is_active() {
            return Err(AppError::InvalidState(format!(
                "Loan {} can only be {} while CURRENT or OVERDUE (state {})",
                self.id, action, self.state
            )));
        }
        Ok(())
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    /// The loaned book, unless it has been dropped everywhere else
    pub fn book(&self) -> Option<BookRef> {
        self.book.upgrade()
    }

    pub fn borrower(&self) -> Option<MemberRef> {
        self.borrower.upgrade()
    }

    pub fn is_loan_of(&self, book: &BookRef) -> bool {
        self.book.points_to(book)
    }

    pub fn is_borrowed_by(&self, borrower: &MemberRef) -> bool {
        self.borrower.points_to(borrower)
    }

    pub fn book_id(&self) -> i32 {
        self.book_id
    }

    pub fn book_title(&self) -> &str {
        &self.book_title
    }

    pub fn borrower_id(&self) -> i32 {
        self.borrower_id
    }

    pub fn borrow_date(&self) -> DateTime<Utc> {
        self.borrow_date
    }

    pub fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    pub fn state(&self) -> LoanState {
        self.state
    }

    pub fn details(&self) -> LoanDetails {
        LoanDetails {
            id: self.id,
            book_id: self.book_id,
            book_title: self.book_title.clone(),
            borrower_id: self.borrower_id,
            borrow_date: self.borrow_date,
            due_date: self.due_date,
            state: self.state,
            is_overdue: self.is_overdue(),
        }
    }
}

// Book and borrower are shown through the cached ids only.
impl std::fmt::Debug for Loan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loan")
            .field("id", &self.id)
            .field("book_id", &self.book_id)
            .field("borrower_id", &self.borrower_id)
            .field("borrow_date", &self.borrow_date)
            .field("due_date", &self.due_date)
            .field("state", &self.state)
            .finish()
    }
}
