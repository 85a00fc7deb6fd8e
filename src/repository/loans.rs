//! Loans repository
//!
//! Loans are staged per borrower in a pending list, then committed together.
//! Pending ids are scoped to the borrower's list and start at 1; the committed
//! collection keeps them as they were.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use super::{next_id, same_text};
use crate::{
    error::{AppError, AppResult},
    models::{BookRef, LoanBuilder, LoanFactory, LoanRef, LoanState, MemberRef},
};

#[derive(Default)]
struct LoanStore {
    // Borrower id -> staged loans, in staging order
    pending: IndexMap<i32, Vec<LoanRef>>,
    committed: Vec<LoanRef>,
}

impl LoanStore {
    fn pending_list(&self, borrower_id: i32) -> AppResult<&Vec<LoanRef>> {
        self.pending
            .get(&borrower_id)
            .ok_or(AppError::MissingPendingList(borrower_id))
    }

    fn pending_list_mut(&mut self, borrower_id: i32) -> AppResult<&mut Vec<LoanRef>> {
        self.pending
            .get_mut(&borrower_id)
            .ok_or(AppError::MissingPendingList(borrower_id))
    }
}

#[derive(Clone)]
pub struct LoansRepository {
    store: Arc<RwLock<LoanStore>>,
    factory: Arc<dyn LoanFactory>,
}

impl Default for LoansRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl LoansRepository {
    pub fn new() -> Self {
        Self::with_factory(Arc::new(LoanBuilder))
    }

    pub fn with_factory(factory: Arc<dyn LoanFactory>) -> Self {
        Self {
            store: Arc::new(RwLock::new(LoanStore::default())),
            factory,
        }
    }

    fn store(&self) -> RwLockReadGuard<'_, LoanStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn store_mut(&self) -> RwLockWriteGuard<'_, LoanStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Pending lists
    // =========================================================================

    /// Make sure `borrower` has a pending list. An existing list is left as is.
    pub fn create_new_pending_list(&self, borrower: &MemberRef) {
        let borrower_id = borrower.read().id();
        self.store_mut().pending.entry(borrower_id).or_default();
        tracing::debug!("Pending list ready for borrower {}", borrower_id);
    }

    /// Stage a new loan of `book` to `borrower`
    pub fn create_pending_loan(
        &self,
        borrower: &MemberRef,
        book: &BookRef,
        borrow_date: DateTime<Utc>,
        due_date: DateTime<Utc>,
    ) -> AppResult<LoanRef> {
        let borrower_id = borrower.read().id();
        let mut store = self.store_mut();
        let list = store.pending_list_mut(borrower_id)?;

        let id = next_id(list.iter().map(|loan| loan.read().id()))?;
        let loan = LoanRef::new(
            self.factory
                .make_loan(book, borrower, borrow_date, due_date, id)?,
        );
        list.push(loan.clone());

        tracing::debug!("Staged loan {} for borrower {}", id, borrower_id);
        Ok(loan)
    }

    pub fn get_pending_list(&self, borrower: &MemberRef) -> AppResult<Vec<LoanRef>> {
        let borrower_id = borrower.read().id();
        self.store().pending_list(borrower_id).cloned()
    }

    /// Commit every staged loan of `borrower` in staging order and drop the
    /// pending list. Nothing changes unless every staged loan is still pending.
    ///
    /// Every staged loan stays write-locked from the check to the commit.
    pub fn commit_pending_loans(&self, borrower: &MemberRef) -> AppResult<()> {
        let borrower_id = borrower.read().id();
        let mut store = self.store_mut();
        let list = store.pending_list(borrower_id)?;
        let mut staged: Vec<_> = list.iter().map(|loan| loan.write()).collect();

        if let Some(loan) = staged
            .iter()
            .find(|loan| loan.state() != LoanState::Pending)
        {
            return Err(AppError::InvalidState(format!(
                "Staged loan {} is no longer PENDING (state {})",
                loan.id(),
                loan.state()
            )));
        }

        for loan in staged.iter_mut() {
            loan.commit()?;
        }
        drop(staged);

        let committed = store.pending.shift_remove(&borrower_id).unwrap_or_default();
        let count = committed.len();
        store.committed.extend(committed);

        tracing::debug!("Committed {} loans for borrower {}", count, borrower_id);
        Ok(())
    }

    /// Empty the pending list of `borrower`; the list itself remains
    pub fn clear_pending_loans(&self, borrower: &MemberRef) -> AppResult<()> {
        let borrower_id = borrower.read().id();
        self.store_mut().pending_list_mut(borrower_id)?.clear();
        tracing::debug!("Cleared pending loans for borrower {}", borrower_id);
        Ok(())
    }

    pub fn has_pending_list(&self, borrower_id: i32) -> bool {
        self.store().pending.contains_key(&borrower_id)
    }

    // =========================================================================
    // Committed loans
    // =========================================================================

    /// Get committed loan by ID
    pub fn get_loan_by_id(&self, id: i32) -> AppResult<Option<LoanRef>> {
        if id <= 0 {
            return Err(AppError::OutOfRange(format!(
                "Loan id must be a positive integer, got {}",
                id
            )));
        }
        Ok(self
            .store()
            .committed
            .iter()
            .find(|loan| loan.read().id() == id)
            .cloned())
    }

    /// First committed loan of `book`, whatever its state
    pub fn get_loan_by_book(&self, book: Option<&BookRef>) -> Option<LoanRef> {
        let book = book?;
        self.store()
            .committed
            .iter()
            .find(|loan| loan.read().is_loan_of(book))
            .cloned()
    }

    pub fn list_loans(&self) -> Vec<LoanRef> {
        self.store().committed.clone()
    }

    pub fn find_loans_by_borrower(&self, borrower: Option<&MemberRef>) -> Vec<LoanRef> {
        match borrower {
            Some(borrower) => self.filter(|loan| loan.read().is_borrowed_by(borrower)),
            None => Vec::new(),
        }
    }

    pub fn find_loans_by_book_title(&self, title: Option<&str>) -> Vec<LoanRef> {
        match title {
            Some(title) if !title.is_empty() => {
                self.filter(|loan| same_text(loan.read().book_title(), title))
            }
            _ => Vec::new(),
        }
    }

    /// Check every active committed loan against `current_date`. Returns the
    /// number of loans overdue after the check.
    pub fn update_overdue_status(&self, current_date: DateTime<Utc>) -> AppResult<usize> {
        let store = self.store();
        let mut overdue = 0;
        for loan in &store.committed {
            let mut loan = loan.write();
            if !loan.state().is_active() {
                continue;
            }
            loan.check_overdue(current_date)?;
            if loan.is_overdue() {
                overdue += 1;
            }
        }

        tracing::debug!("Overdue check as of {}: {} overdue", current_date, overdue);
        Ok(overdue)
    }

    pub fn find_overdue_loans(&self) -> Vec<LoanRef> {
        self.filter(|loan| loan.read().is_overdue())
    }

    fn filter(&self, predicate: impl Fn(&LoanRef) -> bool) -> Vec<LoanRef> {
        self.store()
            .committed
            .iter()
            .filter(|loan| predicate(loan))
            .cloned()
            .collect()
    }
}
