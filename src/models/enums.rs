//! Lifecycle states shared by the lending entities

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// BookState
// ---------------------------------------------------------------------------

/// Book lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookState {
    #[default]
    Available,
    OnLoan,
    Damaged,
    Lost,
    /// Terminal
    Disposed,
}

impl BookState {
    /// States from which a book may be disposed of
    pub fn is_disposable(self) -> bool {
        matches!(self, BookState::Available | BookState::Damaged | BookState::Lost)
    }
}

impl std::fmt::Display for BookState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BookState::Available => "AVAILABLE",
            BookState::OnLoan => "ON_LOAN",
            BookState::Damaged => "DAMAGED",
            BookState::Lost => "LOST",
            BookState::Disposed => "DISPOSED",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// LoanState
// ---------------------------------------------------------------------------

/// Loan lifecycle state: PENDING -> CURRENT -> (OVERDUE) -> COMPLETE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanState {
    #[default]
    Pending,
    Current,
    Overdue,
    Complete,
}

impl LoanState {
    /// Committed and not yet completed
    pub fn is_active(self) -> bool {
        matches!(self, LoanState::Current | LoanState::Overdue)
    }
}

impl std::fmt::Display for LoanState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            LoanState::Pending => "PENDING",
            LoanState::Current => "CURRENT",
            LoanState::Overdue => "OVERDUE",
            LoanState::Complete => "COMPLETE",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// MemberState
// ---------------------------------------------------------------------------

/// Whether a member may currently borrow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberState {
    #[default]
    BorrowingAllowed,
    BorrowingDisallowed,
}

impl std::fmt::Display for MemberState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MemberState::BorrowingAllowed => "BORROWING_ALLOWED",
            MemberState::BorrowingDisallowed => "BORROWING_DISALLOWED",
        };
        write!(f, "{}", label)
    }
}
