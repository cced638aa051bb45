//! # テスト用モックリポジトリ
//!
//! ハンドラテストで使用するインメモリモックリポジトリ。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! bookshelf-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use bookshelf_domain::book::{Book, BookId, NewBook};

use crate::{error::InfraError, repository::BookRepository};

// ===== MockBookRepository =====

/// インメモリの BookRepository
///
/// ID は 1 から順に採番する。[`fail_with`](Self::fail_with) を呼ぶと
/// 以降の全操作がエラーを返す（データベース障害の再現用）。
#[derive(Clone, Default)]
pub struct MockBookRepository {
    books:   Arc<Mutex<BTreeMap<i64, Book>>>,
    next_id: Arc<Mutex<i64>>,
    failing: Arc<AtomicBool>,
    message: Arc<Mutex<String>>,
}

impl MockBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 書籍を直接追加し、採番された ID を返す
    pub fn add_book(&self, book: NewBook) -> BookId {
        let id = self.allocate_id();
        self.books
            .lock()
            .unwrap()
            .insert(id.as_i64(), Book::new(id, book));
        id
    }

    /// 保持している書籍のスナップショットを ID 順で返す
    pub fn books(&self) -> Vec<Book> {
        self.books.lock().unwrap().values().cloned().collect()
    }

    /// 以降の全操作を指定メッセージのドライバエラー（`sqlx::Error::Protocol`）にする
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.message.lock().unwrap() = message.into();
        self.failing.store(true, Ordering::SeqCst);
    }

    fn allocate_id(&self) -> BookId {
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        BookId::from_i64(*next_id)
    }

    fn check_failure(&self) -> Result<(), InfraError> {
        if self.failing.load(Ordering::SeqCst) {
            let message = self.message.lock().unwrap().clone();
            return Err(sqlx::Error::Protocol(message).into());
        }
        Ok(())
    }
}

#[async_trait]
impl BookRepository for MockBookRepository {
    async fn find_all(&self) -> Result<Vec<Book>, InfraError> {
        self.check_failure()?;
        Ok(self.books())
    }

    async fn find_by_id(&self, id: &BookId) -> Result<Option<Book>, InfraError> {
        self.check_failure()?;
        Ok(self.books.lock().unwrap().get(&id.as_i64()).cloned())
    }

    async fn insert(&self, book: &NewBook) -> Result<BookId, InfraError> {
        self.check_failure()?;
        Ok(self.add_book(book.clone()))
    }

    async fn update(&self, book: &Book) -> Result<(), InfraError> {
        self.check_failure()?;
        if let Some(existing) = self.books.lock().unwrap().get_mut(&book.id().as_i64()) {
            *existing = book.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: &BookId) -> Result<(), InfraError> {
        self.check_failure()?;
        self.books.lock().unwrap().remove(&id.as_i64());
        Ok(())
    }
}
