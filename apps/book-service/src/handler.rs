//! # HTTP ハンドラ
//!
//! Book Service の HTTP エンドポイントを実装する。

pub mod book;
pub mod health;

pub use book::{
    BOOK_CREATED_MESSAGE,
    BOOK_DELETED_MESSAGE,
    BookRequest,
    BookResponse,
    BookState,
    create_book,
    delete_book,
    get_book,
    list_books,
    update_book,
};
pub use health::{ReadinessState, health_check, readiness_check};
