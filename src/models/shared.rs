//! Shared entity handles
//!
//! Books, loans and members reference each other with no single owner, so each
//! entity is handed out behind a cloneable `Arc<RwLock<T>>` handle. A loan lives
//! as long as the longest of its holders (loans repository, book, member). A loan
//! only holds weak handles back to its book and borrower, so no cycle keeps them
//! alive.
//!
//! Lock order is always repository -> entity. Entity methods never lock a
//! repository, and loan methods never lock their book or member.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use super::{book::Book, loan::Loan, member::Member};

pub type BookRef = Shared<Book>;
pub type LoanRef = Shared<Loan>;
pub type MemberRef = Shared<Member>;

/// Identity-compared shared handle to an entity
pub struct Shared<T>(Arc<RwLock<T>>);

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Self(Arc::new(RwLock::new(value)))
    }

    /// Shared read access. A poisoned lock is recovered: entity methods check
    /// their preconditions before mutating, so the value is never half-updated.
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// True when both handles point at the same entity
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn downgrade(&self) -> WeakShared<T> {
        WeakShared(Arc::downgrade(&self.0))
    }
}

/// Non-owning counterpart of [`Shared`]
pub struct WeakShared<T>(Weak<RwLock<T>>);

impl<T> WeakShared<T> {
    /// Strong handle, or `None` once every strong handle is gone
    pub fn upgrade(&self) -> Option<Shared<T>> {
        self.0.upgrade().map(Shared)
    }

    /// True when this handle refers to the entity behind `other`
    pub fn points_to(&self, other: &Shared<T>) -> bool {
        std::ptr::eq(self.0.as_ptr(), Arc::as_ptr(&other.0))
    }
}

impl<T> Clone for WeakShared<T> {
    fn clone(&self) -> Self {
        Self(Weak::clone(&self.0))
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> PartialEq for Shared<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T> Eq for Shared<T> {}

impl<T: std::fmt::Debug> std::fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.try_read() {
            Ok(value) => std::fmt::Debug::fmt(&*value, f),
            Err(_) => f.write_str("Shared(<locked>)"),
        }
    }
}
