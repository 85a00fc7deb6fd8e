//! Entity factories
//!
//! Repositories build entities through these traits only, so tests can swap in
//! mocks and callers can plug in their own construction rules.

use chrono::{DateTime, Utc};

use super::{
    book::{Book, NewBook},
    loan::{Loan, LoanPolicy},
    member::{Member, NewMember},
    shared::{BookRef, MemberRef},
};
use crate::error::AppResult;

#[cfg_attr(test, mockall::automock)]
pub trait BookFactory: Send + Sync {
    fn make_book(&self, fields: NewBook, id: i32) -> AppResult<Book>;
}

#[cfg_attr(test, mockall::automock)]
pub trait LoanFactory: Send + Sync {
    fn make_loan(
        &self,
        book: &BookRef,
        borrower: &MemberRef,
        borrow_date: DateTime<Utc>,
        due_date: DateTime<Utc>,
        id: i32,
    ) -> AppResult<Loan>;
}

#[cfg_attr(test, mockall::automock)]
pub trait MemberFactory: Send + Sync {
    fn make_member(&self, fields: NewMember, id: i32) -> AppResult<Member>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BookBuilder;

impl BookFactory for BookBuilder {
    fn make_book(&self, fields: NewBook, id: i32) -> AppResult<Book> {
        Book::new(fields, id)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoanBuilder;

impl LoanFactory for LoanBuilder {
    fn make_loan(
        &self,
        book: &BookRef,
        borrower: &MemberRef,
        borrow_date: DateTime<Utc>,
        due_date: DateTime<Utc>,
        id: i32,
    ) -> AppResult<Loan> {
        Loan::new(book, borrower, borrow_date, due_date, id)
    }
}

/// Builds members bound to the lending thresholds in effect
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberBuilder {
    policy: LoanPolicy,
}

impl MemberBuilder {
    pub fn new(policy: LoanPolicy) -> Self {
        Self { policy }
    }
}

impl MemberFactory for MemberBuilder {
    fn make_member(&self, fields: NewMember, id: i32) -> AppResult<Member> {
        Member::new(fields, id, self.policy)
    }
}
