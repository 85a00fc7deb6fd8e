//! Elidune Lending Core
//!
//! Books, members and loans of the Elidune library system with their lifecycle
//! rules, in-memory repositories that stage loans per borrower before committing
//! them, and the periodic overdue sweep.

pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult, ErrorCode};
pub use models::{BookRef, LoanPolicy, LoanRef, MemberRef};
pub use repository::Repository;
pub use services::Services;
