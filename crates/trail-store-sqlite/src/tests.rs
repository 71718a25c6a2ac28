//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, TimeZone, Utc};
use trail_core::{
  book::Book,
  info::{Info, InfoAttrs},
  resource::RatedAttrs,
  server::Server,
  store::{Queries, ResourceStore},
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn book(title: &str, minute: u32) -> Book {
  Book {
    id:          Uuid::new_v4(),
    created_at:  Utc.with_ymd_and_hms(2024, 3, 1, 12, minute, 0).unwrap(),
    updated_at:  None,
    user_id:     Uuid::new_v4(),
    title:       title.into(),
    author:      "Ursula K. Le Guin".into(),
    book_status: 1,
    book_attrs:  RatedAttrs {
      picture:     "https://example.org/cover.png".into(),
      description: "a wizard".into(),
      rating:      9,
    },
  }
}

// ─── Books ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_book() {
  let s = store().await;
  let b = book("A Wizard of Earthsea", 0);

  s.create(&b).await.unwrap();

  let fetched: Option<Book> = s.get(b.id).await.unwrap();
  assert_eq!(fetched, Some(b));
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  let fetched: Option<Book> = s.get(Uuid::new_v4()).await.unwrap();
  assert!(fetched.is_none());
}

#[tokio::test]
async fn timestamps_keep_sub_second_precision() {
  let s = store().await;
  let mut b = book("Tehanu", 0);
  b.created_at += Duration::nanoseconds(123_456_789);
  b.updated_at = Some(b.created_at + Duration::milliseconds(5));

  s.create(&b).await.unwrap();

  let fetched: Book = s.get(b.id).await.unwrap().unwrap();
  assert_eq!(fetched.created_at, b.created_at);
  assert_eq!(fetched.updated_at, b.updated_at);
}

#[tokio::test]
async fn list_is_ordered_by_creation_time() {
  let s = store().await;
  let late = book("The Farthest Shore", 30);
  let early = book("The Tombs of Atuan", 10);
  s.create(&late).await.unwrap();
  s.create(&early).await.unwrap();

  let all: Vec<Book> = s.list().await.unwrap();
  let titles: Vec<_> = all.iter().map(|b| b.title.as_str()).collect();
  assert_eq!(titles, ["The Tombs of Atuan", "The Farthest Shore"]);
}

#[tokio::test]
async fn list_empty_table() {
  let s = store().await;
  let all: Vec<Book> = s.list().await.unwrap();
  assert!(all.is_empty());
}

#[tokio::test]
async fn duplicate_id_is_rejected() {
  let s = store().await;
  let b = book("Tales from Earthsea", 0);
  s.create(&b).await.unwrap();

  let err = s.create(&b).await.unwrap_err();
  assert!(matches!(err, Error::Database(_)), "got {err:?}");
}

// ─── Updates ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_rewrites_mutable_fields_only() {
  let s = store().await;
  let original = book("The Other Wind", 0);
  s.create(&original).await.unwrap();

  let mut changed = original.clone();
  changed.created_at = Utc.with_ymd_and_hms(1999, 1, 1, 0, 0, 0).unwrap();
  changed.user_id = Uuid::new_v4();
  changed.title = "The Other Wind (revised)".into();
  changed.book_attrs.rating = 10;
  changed.updated_at = Some(Utc.with_ymd_and_hms(2024, 3, 2, 8, 0, 0).unwrap());

  s.update(original.id, &changed).await.unwrap();

  let fetched: Book = s.get(original.id).await.unwrap().unwrap();
  assert_eq!(fetched.title, "The Other Wind (revised)");
  assert_eq!(fetched.book_attrs.rating, 10);
  assert_eq!(fetched.updated_at, changed.updated_at);
  assert_eq!(fetched.created_at, original.created_at);
  assert_eq!(fetched.user_id, original.user_id);
}

#[tokio::test]
async fn update_missing_row_errors() {
  let s = store().await;
  let b = book("Never stored", 0);

  let err = ResourceStore::<Book>::update(&s, b.id, &b).await.unwrap_err();
  assert!(
    matches!(err, Error::RowMissing { table: "books", id } if id == b.id),
    "got {err:?}"
  );
}

// ─── Deletes ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_row() {
  let s = store().await;
  let b = book("Gone", 0);
  s.create(&b).await.unwrap();

  ResourceStore::<Book>::delete(&s, b.id).await.unwrap();

  let fetched: Option<Book> = s.get(b.id).await.unwrap();
  assert!(fetched.is_none());
}

#[tokio::test]
async fn delete_missing_row_errors() {
  let s = store().await;
  let err = ResourceStore::<Book>::delete(&s, Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, Error::RowMissing { table: "books", .. }), "got {err:?}");
}

#[tokio::test]
async fn tables_are_independent() {
  let s = store().await;
  let b = book("Shared id", 0);
  s.create(&b).await.unwrap();

  let err = ResourceStore::<Server>::delete(&s, b.id).await.unwrap_err();
  assert!(matches!(err, Error::RowMissing { table: "servers", .. }), "got {err:?}");

  let still_there: Option<Book> = s.get(b.id).await.unwrap();
  assert!(still_there.is_some());
}

// ─── Info and servers ────────────────────────────────────────────────────────

#[tokio::test]
async fn info_round_trip() {
  let s = store().await;
  let info = Info {
    id:          Uuid::new_v4(),
    created_at:  Utc.with_ymd_and_hms(2024, 5, 5, 5, 5, 5).unwrap(),
    updated_at:  None,
    user_id:     Uuid::new_v4(),
    name:        "Ged".into(),
    portfolio:   "https://example.org/ged".into(),
    info_status: 1,
    info_attrs:  InfoAttrs {
      picture:     String::new(),
      description: "archmage".into(),
    },
  };

  s.create(&info).await.unwrap();

  let all: Vec<Info> = s.list().await.unwrap();
  assert_eq!(all, vec![info]);
}

#[tokio::test]
async fn queries_forwards_to_each_member() {
  let s = store().await;
  let q = Queries::new(s.clone(), s.clone(), s);

  let server = Server {
    id: Uuid::new_v4(),
    created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    user_id: Uuid::new_v4(),
    title: "roke".into(),
    author: "ops".into(),
    server_status: 1,
    server_attrs: RatedAttrs { rating: 3, ..RatedAttrs::default() },
    ..Server::default()
  };
  q.create(&server).await.unwrap();
  q.create(&book("Through the facade", 0)).await.unwrap();

  let servers = ResourceStore::<Server>::list(&q).await.unwrap();
  let books = ResourceStore::<Book>::list(&q).await.unwrap();
  assert_eq!(servers, vec![server]);
  assert_eq!(books.len(), 1);
}
