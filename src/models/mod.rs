//! Lending domain models

pub mod book;
pub mod catalog;
pub mod enums;
pub mod factory;
pub mod loan;
pub mod member;
pub mod shared;

// Re-export commonly used types
pub use book::{Book, BookSummary, NewBook};
pub use catalog::CatalogSeed;
pub use enums::{BookState, LoanState, MemberState};
pub use factory::{BookBuilder, BookFactory, LoanBuilder, LoanFactory, MemberBuilder, MemberFactory};
pub use loan::{Loan, LoanDetails, LoanPolicy};
pub use member::{Member, MemberSummary, NewMember};
pub use shared::{BookRef, LoanRef, MemberRef, Shared, WeakShared};
