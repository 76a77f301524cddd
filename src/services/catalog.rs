//! Book catalog service

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{
        book::{Book, CreateBook, UpdateBook},
        user::CallerIdentity,
    },
    repository::BookCatalog,
};

#[derive(Clone)]
pub struct CatalogService {
    books: Arc<dyn BookCatalog>,
}

impl CatalogService {
    pub fn new(books: Arc<dyn BookCatalog>) -> Self {
        Self { books }
    }

    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.books.list().await
    }

    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.books.get_by_id(id).await
    }

    pub async fn create_book(&self, caller: &CallerIdentity, book: CreateBook) -> AppResult<Book> {
        caller.require_admin("Admin access required")?;
        let created = self.books.create(&book).await?;
        tracing::info!(book_id = created.id, "Book added to catalog");
        Ok(created)
    }

    pub async fn update_book(
        &self,
        caller: &CallerIdentity,
        id: i32,
        book: UpdateBook,
    ) -> AppResult<Book> {
        caller.require_admin("Admin access required")?;
        self.books.update(id, &book).await
    }

    pub async fn delete_book(&self, caller: &CallerIdentity, id: i32) -> AppResult<()> {
        caller.require_admin("Admin access required")?;
        self.books.delete(id).await?;
        tracing::info!(book_id = id, "Book removed from catalog");
        Ok(())
    }
}
