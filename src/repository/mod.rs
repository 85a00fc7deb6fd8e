//! In-memory repositories for books, members and loans
//!
//! Each repository guards its collection with one coarse lock and is cheap to
//! clone; clones share the same collection.

pub mod books;
pub mod loans;
pub mod members;

use unicode_normalization::UnicodeNormalization;

use crate::{
    error::{AppError, AppResult},
    models::{CatalogSeed, LoanPolicy},
};

/// Main repository struct holding the three collections
#[derive(Clone)]
pub struct Repository {
    pub books: books::BooksRepository,
    pub members: members::MembersRepository,
    pub loans: loans::LoansRepository,
    policy: LoanPolicy,
}

impl Repository {
    /// Create empty repositories using the default entity builders
    pub fn new(policy: LoanPolicy) -> Self {
        Self {
            books: books::BooksRepository::new(),
            members: members::MembersRepository::new(policy),
            loans: loans::LoansRepository::new(),
            policy,
        }
    }

    pub fn policy(&self) -> LoanPolicy {
        self.policy
    }

    /// Add every book and member of a seed catalog. Stops at the first record that
    /// fails validation; records added before it are kept.
    pub fn seed(&self, catalog: &CatalogSeed) -> AppResult<(usize, usize)> {
        for book in &catalog.books {
            self.books
                .add_book(&book.author, &book.title, &book.call_number)?;
        }
        for member in &catalog.members {
            self.members.add_member(
                &member.first_name,
                &member.last_name,
                &member.contact_phone,
                &member.email_address,
            )?;
        }

        tracing::info!(
            "Seeded {} books and {} members",
            catalog.books.len(),
            catalog.members.len()
        );
        Ok((catalog.books.len(), catalog.members.len()))
    }
}

/// One greater than the largest id present, 1 for an empty collection
pub(crate) fn next_id(ids: impl Iterator<Item = i32>) -> AppResult<i32> {
    ids.max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or_else(|| AppError::OutOfRange("Identifier space exhausted".to_string()))
}

/// Case-insensitive exact match, insensitive to Unicode composition
pub(crate) fn same_text(a: &str, b: &str) -> bool {
    a.nfc()
        .flat_map(char::to_lowercase)
        .eq(b.nfc().flat_map(char::to_lowercase))
}
