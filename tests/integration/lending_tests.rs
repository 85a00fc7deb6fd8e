//! End-to-end lending flows through the public API

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal_macros::dec;

use elidune_lending::{
    models::{BookState, CatalogSeed, LoanState, MemberState},
    AppError, BookRef, ErrorCode, LoanPolicy, LoanRef, MemberRef, Repository, Services,
};

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 10, 30, 0).unwrap()
}

fn seeded() -> Repository {
    let repository = Repository::new(LoanPolicy::default());
    let catalog = CatalogSeed::from_json(include_str!("../../data/catalog.json")).unwrap();
    repository.seed(&catalog).unwrap();
    repository
}

/// Stage and commit loans of `books` to `member`, the way a borrowing desk would
fn checkout(
    repository: &Repository,
    member: &MemberRef,
    books: &[BookRef],
    borrow_date: DateTime<Utc>,
) -> Vec<LoanRef> {
    let due_date = repository.policy().due_date_for(borrow_date).unwrap();
    repository.loans.create_new_pending_list(member);

    let loans: Vec<LoanRef> = books
        .iter()
        .map(|book| {
            let loan = repository
                .loans
                .create_pending_loan(member, book, borrow_date, due_date)
                .unwrap();
            book.write().borrow(loan.clone()).unwrap();
            member.write().add_loan(loan.clone()).unwrap();
            loan
        })
        .collect();

    repository.loans.commit_pending_loans(member).unwrap();
    loans
}

#[test]
fn test_seeded_catalog() {
    let repository = seeded();
    let ids: Vec<i32> = repository
        .books
        .list_books()
        .iter()
        .map(|book| book.read().id())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(repository.members.find_by_last_name("doe").len(), 1);
}

#[test]
fn test_checkout_and_return() {
    let repository = seeded();
    let member = repository.members.get_by_id(1).unwrap();
    let first = repository.books.get_by_id(1).unwrap();
    let second = repository.books.get_by_id(3).unwrap();

    let loans = checkout(&repository, &member, &[first.clone(), second.clone()], at(2024, 1, 1));
    assert!(!repository.loans.has_pending_list(1));
    assert_eq!(
        repository.loans.get_pending_list(&member).unwrap_err(),
        AppError::MissingPendingList(1)
    );
    assert_eq!(repository.loans.list_loans().len(), 2);
    assert!(loans.iter().all(|loan| loan.read().state() == LoanState::Current));

    assert_eq!(first.read().state(), BookState::OnLoan);
    assert!(first.read().loan().unwrap().ptr_eq(&loans[0]));
    assert_eq!(first.read().summary().loan_id, Some(1));
    assert_eq!(member.read().summary().nb_loans, 2);

    // Return the first book undamaged and the second one damaged
    first.write().return_book(false).unwrap();
    member.write().remove_loan(&loans[0]).unwrap();
    loans[0].write().complete().unwrap();

    second.write().return_book(true).unwrap();
    member.write().remove_loan(&loans[1]).unwrap();
    loans[1].write().complete().unwrap();

    assert_eq!(first.read().state(), BookState::Available);
    assert!(first.read().loan().is_none());
    assert_eq!(second.read().state(), BookState::Damaged);
    assert!(member.read().loans().is_empty());

    // Completed loans stay in the committed collection
    let by_book = repository.loans.get_loan_by_book(Some(&second)).unwrap();
    assert_eq!(by_book.read().state(), LoanState::Complete);

    let err = second.write().borrow(loans[1].clone()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidState);
    second.write().repair().unwrap();
    assert_eq!(second.read().state(), BookState::Available);
}

#[test]
fn test_unavailable_book_cannot_be_borrowed_twice() {
    let repository = seeded();
    let jane = repository.members.find_by_names("Jane", "Doe").remove(0);
    let other = repository.members.get_by_id(1).unwrap();
    let book = repository.books.get_by_id(2).unwrap();

    checkout(&repository, &jane, &[book.clone()], at(2024, 3, 1));

    repository.loans.create_new_pending_list(&other);
    let date = at(2024, 3, 2);
    let loan = repository
        .loans
        .create_pending_loan(&other, &book, date, date)
        .unwrap();
    assert!(matches!(
        book.write().borrow(loan),
        Err(AppError::InvalidState(_))
    ));

    // The desk abandons the attempt
    repository.loans.clear_pending_loans(&other).unwrap();
    assert!(repository.loans.get_pending_list(&other).unwrap().is_empty());
    assert_eq!(repository.loans.list_loans().len(), 1);
}

#[test]
fn test_overdue_sweep_blocks_member() {
    let repository = seeded();
    let member = repository.members.get_by_id(2).unwrap();
    let book = repository.books.get_by_id(1).unwrap();
    let loans = checkout(&repository, &member, &[book], at(2024, 1, 1));

    let due_date = Utc.with_ymd_and_hms(2024, 1, 15, 23, 59, 59).unwrap();
    assert_eq!(loans[0].read().due_date(), due_date);

    let services = Services::new(repository.clone());
    let report = services.overdue.sweep(at(2024, 1, 15)).unwrap();
    assert!(report.overdue.is_empty());
    assert_eq!(member.read().state(), MemberState::BorrowingAllowed);

    let report = services.overdue.sweep(at(2024, 1, 16)).unwrap();
    assert_eq!(report.overdue.len(), 1);
    assert_eq!(report.overdue[0].borrower_id, 2);
    assert!(member.read().has_overdue_loans());
    assert_eq!(member.read().state(), MemberState::BorrowingDisallowed);

    let late = repository.books.get_by_id(2).unwrap();
    let pending = {
        repository.loans.create_new_pending_list(&member);
        repository
            .loans
            .create_pending_loan(&member, &late, at(2024, 1, 16), at(2024, 1, 30))
            .unwrap()
    };
    assert!(matches!(
        member.write().add_loan(pending),
        Err(AppError::InvalidState(_))
    ));
}

#[test]
fn test_fines_block_and_unblock_borrowing() {
    let repository = seeded();
    let jane = repository.members.find_by_email_address("JANE@example.com").remove(0);

    jane.write().add_fine(dec!(12.50)).unwrap();
    assert!(jane.read().has_fines_payable());
    assert_eq!(jane.read().state(), MemberState::BorrowingDisallowed);

    jane.write().pay_fine(dec!(12.50)).unwrap();
    assert_eq!(jane.read().fine_amount(), dec!(0));
    assert!(!jane.read().has_fines_payable());
    assert_eq!(jane.read().state(), MemberState::BorrowingAllowed);

    let err = jane.write().add_fine(dec!(-5)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::OutOfRange);
}

#[test]
fn test_lost_and_disposed_books() {
    let repository = seeded();
    let member = repository.members.get_by_id(1).unwrap();
    let book = repository.books.get_by_id(3).unwrap();
    checkout(&repository, &member, &[book.clone()], at(2024, 5, 1));

    assert!(matches!(book.write().dispose(), Err(AppError::InvalidState(_))));
    book.write().lose().unwrap();
    assert!(book.read().loan().is_none());
    book.write().dispose().unwrap();
    assert_eq!(book.read().state(), BookState::Disposed);
    assert!(matches!(book.write().dispose(), Err(AppError::InvalidState(_))));
}

#[test]
fn test_entities_on_loan_are_released_with_their_holders() {
    let repository = seeded();
    let member = repository.members.get_by_id(1).unwrap();
    let book = repository.books.get_by_id(1).unwrap();
    let loans = checkout(&repository, &member, &[book.clone()], at(2024, 1, 1));

    let weak_book = book.downgrade();
    let weak_member = member.downgrade();
    let weak_loan = loans[0].downgrade();
    assert!(loans[0].read().book().is_some_and(|held| held.ptr_eq(&book)));

    drop(loans);
    drop(book);
    drop(member);
    assert!(weak_book.upgrade().is_some());

    drop(repository);
    assert!(weak_book.upgrade().is_none());
    assert!(weak_member.upgrade().is_none());
    assert!(weak_loan.upgrade().is_none());
}
