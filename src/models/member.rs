//! Member (borrower) model and related types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{enums::MemberState, loan::LoanPolicy, shared::LoanRef};
use crate::error::{AppError, AppResult};

/// Validated field set used to build a member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewMember {
    #[validate(length(min = 1, message = "First name cannot be empty"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name cannot be empty"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "Contact phone cannot be empty"))]
    pub contact_phone: String,
    #[validate(length(min = 1, message = "Email address cannot be empty"))]
    pub email_address: String,
}

impl NewMember {
    pub fn new(
        first_name: &str,
        last_name: &str,
        contact_phone: &str,
        email_address: &str,
    ) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            contact_phone: contact_phone.to_string(),
            email_address: email_address.to_string(),
        }
    }
}

/// A library member.
///
/// Several checks read the member's loans, so none of them may be write-locked
/// by the caller while a member method runs.
#[derive(Debug)]
pub struct Member {
    id: i32,
    first_name: String,
    last_name: String,
    contact_phone: String,
    email_address: String,
    fine_amount: Decimal,
    loans: Vec<LoanRef>,
    policy: LoanPolicy,
}

/// Member view for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberSummary {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub contact_phone: String,
    pub email_address: String,
    pub state: MemberState,
    pub fine_amount: Decimal,
    pub nb_loans: usize,
    pub nb_late_loans: usize,
}

impl Member {
    pub fn new(fields: NewMember, id: i32, policy: LoanPolicy) -> AppResult<Self> {
        fields.validate()?;
        if id <= 0 {
            return Err(AppError::Validation(format!(
                "Member id must be a positive integer, got {}",
                id
            )));
        }

        Ok(Self {
            id,
            first_name: fields.first_name,
            last_name: fields.last_name,
            contact_phone: fields.contact_phone,
            email_address: fields.email_address,
            fine_amount: Decimal::ZERO,
            loans: Vec::new(),
            policy,
        })
    }

    /// Borrowing is disallowed once the member holds the maximum number of loans,
    /// owes the fine limit or more, or has an overdue loan.
    pub fn state(&self) -> MemberState {
        if self.has_reached_loan_limit()
            || self.has_reached_fine_limit()
            || self.has_overdue_loans()
        {
            MemberState::BorrowingDisallowed
        } else {
            MemberState::BorrowingAllowed
        }
    }

    pub fn has_overdue_loans(&self) -> bool {
        self.loans.iter().any(|loan| loan.read().is_overdue())
    }

    pub fn has_reached_loan_limit(&self) -> bool {
        self.loans.len() >= self.policy.loan_limit
    }

    pub fn has_fines_payable(&self) -> bool {
        self.fine_amount > Decimal::ZERO
    }

    pub fn has_reached_fine_limit(&self) -> bool {
        self.fine_amount >= self.policy.fine_limit
    }

    pub fn fine_amount(&self) -> Decimal {
        self.fine_amount
    }

    pub fn add_fine(&mut self, amount: Decimal) -> AppResult<()> {
        if amount < Decimal::ZERO {
            return Err(AppError::OutOfRange(format!(
                "Fine amount cannot be negative, got {}",
                amount
            )));
        }
        self.fine_amount += amount;
        Ok(())
    }

    /// Deduct a payment. Partial payments are fine; the balance is not clamped,
    /// so callers must not accept more than [`Member::fine_amount`].
    pub fn pay_fine(&mut self, payment: Decimal) -> AppResult<()> {
        if payment < Decimal::ZERO {
            return Err(AppError::OutOfRange(format!(
                "Payment amount cannot be negative, got {}",
                payment
            )));
        }
        self.fine_amount -= payment;
        Ok(())
    }

    pub fn add_loan(&mut self, loan: LoanRef) -> AppResult<()> {
        if self.state() == MemberState::BorrowingDisallowed {
            return Err(AppError::InvalidState(format!(
                "Member {} is not allowed to borrow",
                self.id
            )));
        }
        self.loans.push(loan);
        Ok(())
    }

    pub fn remove_loan(&mut self, loan: &LoanRef) -> AppResult<()> {
        let position = self
            .loans
            .iter()
            .position(|held| held.ptr_eq(loan))
            .ok_or_else(|| {
                AppError::InvalidState(format!(
                    "The loan is not held by member {}",
                    self.id
                ))
            })?;
        self.loans.remove(position);
        Ok(())
    }

    pub fn loans(&self) -> &[LoanRef] {
        &self.loans
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn contact_phone(&self) -> &str {
        &self.contact_phone
    }

    pub fn email_address(&self) -> &str {
        &self.email_address
    }

    pub fn summary(&self) -> MemberSummary {
        MemberSummary {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            contact_phone: self.contact_phone.clone(),
            email_address: self.email_address.clone(),
            state: self.state(),
            fine_amount: self.fine_amount,
            nb_loans: self.loans.len(),
            nb_late_loans: self
                .loans
                .iter()
                .filter(|loan| loan.read().is_overdue())
                .count(),
        }
    }
}
