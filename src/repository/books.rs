//! Books repository

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{next_id, same_text};
use crate::{
    error::AppResult,
    models::{Book, BookBuilder, BookFactory, BookRef, NewBook},
};

#[derive(Clone)]
pub struct BooksRepository {
    items: Arc<RwLock<Vec<BookRef>>>,
    factory: Arc<dyn BookFactory>,
}

impl Default for BooksRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl BooksRepository {
    pub fn new() -> Self {
        Self::with_factory(Arc::new(BookBuilder))
    }

    pub fn with_factory(factory: Arc<dyn BookFactory>) -> Self {
        Self {
            items: Arc::new(RwLock::new(Vec::new())),
            factory,
        }
    }

    fn items(&self) -> RwLockReadGuard<'_, Vec<BookRef>> {
        self.items.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn items_mut(&self) -> RwLockWriteGuard<'_, Vec<BookRef>> {
        self.items.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a new book under the next free id
    pub fn add_book(&self, author: &str, title: &str, call_number: &str) -> AppResult<BookRef> {
        let mut items = self.items_mut();
        let id = next_id(items.iter().map(|book| book.read().id()))?;
        let book = BookRef::new(
            self.factory
                .make_book(NewBook::new(author, title, call_number), id)?,
        );
        items.push(book.clone());

        tracing::debug!("Added book {} ({})", id, call_number);
        Ok(book)
    }

    /// Get book by ID
    pub fn get_by_id(&self, id: i32) -> Option<BookRef> {
        self.items()
            .iter()
            .find(|book| book.read().id() == id)
            .cloned()
    }

    /// All books in insertion order
    pub fn list_books(&self) -> Vec<BookRef> {
        self.items().clone()
    }

    pub fn find_by_author(&self, author: &str) -> Vec<BookRef> {
        self.filter(|book| same_text(book.author(), author))
    }

    pub fn find_by_title(&self, title: &str) -> Vec<BookRef> {
        self.filter(|book| same_text(book.title(), title))
    }

    pub fn find_by_author_title(&self, author: &str, title: &str) -> Vec<BookRef> {
        self.filter(|book| same_text(book.author(), author) && same_text(book.title(), title))
    }

    fn filter(&self, predicate: impl Fn(&Book) -> bool) -> Vec<BookRef> {
        self.items()
            .iter()
            .filter(|book| predicate(&*book.read()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, models::factory::MockBookFactory};

    fn repository() -> BooksRepository {
        let repository = BooksRepository::new();
        repository.add_book("Test Author", "Learning Testing", "TAU-001").unwrap();
        repository
            .add_book("Another Author", "Writing Tests For Dummies", "AAU-001")
            .unwrap();
        repository.add_book("test author", "Second Edition", "TAU-002").unwrap();
        repository
    }

    #[test]
    fn test_first_id_is_one() {
        let repository = BooksRepository::new();
        let book = repository.add_book("Author", "Title", "CN-1").unwrap();
        assert_eq!(book.read().id(), 1);
    }

    #[test]
    fn test_get_by_id() {
        let repository = repository();
        let book = repository.get_by_id(2).unwrap();
        assert_eq!(book.read().title(), "Writing Tests For Dummies");
        assert_eq!(book.read().call_number(), "AAU-001");
        assert!(repository.get_by_id(4).is_none());
        assert!(repository.get_by_id(0).is_none());
    }

    #[test]
    fn test_invalid_book_is_not_added() {
        let repository = repository();
        assert!(matches!(
            repository.add_book("", "Title", "CN"),
            Err(AppError::Validation(_))
        ));
        assert_eq!(repository.list_books().len(), 3);
        let next = repository.add_book("Author", "Title", "CN").unwrap();
        assert_eq!(next.read().id(), 4);
    }

    #[test]
    fn test_searches_ignore_case() {
        let repository = repository();

        let by_author = repository.find_by_author("TEST AUTHOR");
        let ids: Vec<i32> = by_author.iter().map(|b| b.read().id()).collect();
        assert_eq!(ids, vec![1, 3]);

        let by_title = repository.find_by_title("writing tests for dummies");
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].read().id(), 2);

        let both = repository.find_by_author_title("test author", "second edition");
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].read().call_number(), "TAU-002");

        assert!(repository.find_by_title("Writing").is_empty());
        assert!(repository.find_by_author_title("Another Author", "Learning Testing").is_empty());
    }

    #[test]
    fn test_factory_receives_next_id() {
        let mut factory = MockBookFactory::new();
        factory
            .expect_make_book()
            .times(2)
            .returning(|fields, id| Book::new(fields, id));
        let repository = BooksRepository::with_factory(Arc::new(factory));

        let first = repository.add_book("A", "B", "C").unwrap();
        let second = repository.add_book("D", "E", "F").unwrap();
        assert_eq!(first.read().id(), 1);
        assert_eq!(second.read().id(), 2);
    }

    #[test]
    fn test_factory_error_is_propagated() {
        let mut factory = MockBookFactory::new();
        factory
            .expect_make_book()
            .returning(|_, _| Err(AppError::Validation("rejected".to_string())));
        let repository = BooksRepository::with_factory(Arc::new(factory));

        assert_eq!(
            repository.add_book("A", "B", "C").unwrap_err(),
            AppError::Validation("rejected".to_string())
        );
        assert!(repository.list_books().is_empty());
    }
}
