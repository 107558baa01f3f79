//! In-memory book collection.

use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::models::{Book, BookId, BookPatch, NewBook};

/// Source of wall-clock milliseconds used for new ids.
pub type Clock = fn() -> BookId;

/// Milliseconds since the Unix epoch.
pub fn unix_millis() -> BookId {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    BookId::try_from(millis).unwrap_or(BookId::MAX)
}

#[derive(Debug, Default)]
struct Shelf {
    books: Vec<Book>,
    last_id: BookId,
}

impl Shelf {
    fn position(&self, id: BookId) -> Option<usize> {
        self.books.iter().position(|book| book.id == id)
    }

    /// Clock time, bumped past the last issued id when the clock has not moved.
    fn next_id(&mut self, now: BookId) -> BookId {
        let id = if now > self.last_id {
            now
        } else {
            self.last_id.saturating_add(1)
        };
        self.last_id = id;
        id
    }
}

/// The book collection, in insertion order.
///
/// One lock guards the whole collection so every operation's
/// read-modify-write is atomic with respect to other requests.
#[derive(Debug)]
pub struct BookStore {
    shelf: RwLock<Shelf>,
    clock: Clock,
}

impl BookStore {
    pub fn new() -> Self {
        Self::with_clock(unix_millis)
    }

    pub fn with_clock(clock: Clock) -> Self {
        Self {
            shelf: RwLock::new(Shelf::default()),
            clock,
        }
    }

    /// Every book, in insertion order.
    pub async fn list(&self) -> Vec<Book> {
        self.shelf.read().await.books.clone()
    }

    pub async fn get(&self, id: BookId) -> Option<Book> {
        let shelf = self.shelf.read().await;
        shelf.books.iter().find(|book| book.id == id).cloned()
    }

    /// First book whose title is exactly `title`.
    pub async fn find_by_title(&self, title: &str) -> Option<Book> {
        let shelf = self.shelf.read().await;
        shelf.books.iter().find(|book| book.title == title).cloned()
    }

    /// Assign an id and append.
    pub async fn create(&self, new_book: NewBook) -> Book {
        let mut shelf = self.shelf.write().await;
        let id = shelf.next_id((self.clock)());
        let book = Book {
            id,
            title: new_book.title,
            author: new_book.author,
            year: new_book.year,
            extra: Default::default(),
        };
        shelf.books.push(book.clone());
        book
    }

    /// Merge `patch` into the first book with `id`, in place.
    pub async fn update(&self, id: BookId, patch: BookPatch) -> Option<Book> {
        let mut shelf = self.shelf.write().await;
        let index = shelf.position(id)?;
        let book = &mut shelf.books[index];
        book.apply(patch);
        Some(book.clone())
    }

    /// Remove every book with `id`. Returns whether anything was removed.
    pub async fn remove(&self, id: BookId) -> bool {
        let mut shelf = self.shelf.write().await;
        let before = shelf.books.len();
        shelf.books.retain(|book| book.id != id);
        shelf.books.len() < before
    }

    pub async fn len(&self) -> usize {
        self.shelf.read().await.books.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.shelf.read().await.books.is_empty()
    }

    /// Drop every book. Issued ids stay reserved.
    pub async fn clear(&self) {
        self.shelf.write().await.books.clear();
    }
}

impl Default for BookStore {
    fn default() -> Self {
        Self::new()
    }
}
