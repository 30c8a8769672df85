//! End-to-end dispatch tests: scripted resolvers, an in-memory store, no
//! network anywhere.

use std::sync::Arc;

use jot_core::{
  action::{RawAction, ResolvedBy},
  note::NoteSummary,
  store::NoteStore,
};
use jot_intent::{
  ActionResult, DispatchError, Dispatcher, FallbackParser, IntentResolver,
  ResolveError,
};
use jot_store_sqlite::SqliteStore;
use uuid::Uuid;

// ─── Fake resolvers ──────────────────────────────────────────────────────────

/// Simulates an unreachable LLM endpoint.
struct Unreachable;

impl IntentResolver for Unreachable {
  async fn resolve(
    &self,
    _raw_text: &str,
    _notes: &[NoteSummary],
  ) -> Result<RawAction, ResolveError> {
    Err(ResolveError::Unavailable("connection refused".to_owned()))
  }
}

/// Replays a fixed candidate action regardless of input.
struct Scripted(RawAction);

impl IntentResolver for Scripted {
  async fn resolve(
    &self,
    _raw_text: &str,
    _notes: &[NoteSummary],
  ) -> Result<RawAction, ResolveError> {
    Ok(self.0.clone())
  }
}

// ─── Setup ───────────────────────────────────────────────────────────────────

async fn store_with_user() -> (Arc<SqliteStore>, Uuid) {
  let store = SqliteStore::open_in_memory().await.expect("store");
  let user = store
    .create_user("alice".to_owned(), "$argon2id$stub".to_owned())
    .await
    .expect("user");
  (Arc::new(store), user.user_id)
}

async fn create(
  dispatcher: &Dispatcher<SqliteStore, FallbackParser>,
  owner: Uuid,
  text: &str,
) -> i64 {
  match dispatcher.handle(owner, text).await.expect("create").result {
    ActionResult::Created { note } => note.note_id,
    other => panic!("expected a created note, got {other:?}"),
  }
}

// ─── Resolver chain policy ───────────────────────────────────────────────────

#[tokio::test]
async fn unavailable_llm_falls_back_to_keyword_resolution() {
  let (store, owner) = store_with_user().await;
  let with_dead_llm = Dispatcher::new(store.clone(), Some(Unreachable));
  let fallback_only = Dispatcher::fallback_only(store);

  create(&fallback_only, owner, "create a note about Groceries saying milk").await;

  let text = "What did I say about groceries";
  let via_chain = with_dead_llm.handle(owner, text).await.unwrap();
  let via_fallback = fallback_only.handle(owner, text).await.unwrap();

  // The chain must land on exactly what the fallback alone produces.
  assert_eq!(via_chain.operation, via_fallback.operation);
  assert_eq!(via_chain.resolved_by, ResolvedBy::Fallback);
  match (&via_chain.result, &via_fallback.result) {
    (ActionResult::Fetched { note: a }, ActionResult::Fetched { note: b }) => {
      assert_eq!(a.note_id, b.note_id);
      assert_eq!(a.title, "Groceries");
    }
    other => panic!("expected fetches, got {other:?}"),
  }
}

#[tokio::test]
async fn invalid_llm_candidate_falls_back() {
  let (store, owner) = store_with_user().await;
  // Syntactically fine, semantically junk: the validator must reject it
  // and the fallback must take over.
  let llm = Scripted(RawAction {
    operation: Some("obliterate".to_owned()),
    ..RawAction::default()
  });
  let dispatcher = Dispatcher::new(store, Some(llm));

  let outcome = dispatcher
    .handle(owner, "create a note about demo saying slides due Friday")
    .await
    .unwrap();
  assert_eq!(outcome.resolved_by, ResolvedBy::Fallback);
  assert!(matches!(outcome.result, ActionResult::Created { .. }));
}

#[tokio::test]
async fn valid_llm_candidate_is_used_directly() {
  let (store, owner) = store_with_user().await;
  let llm = Scripted(RawAction {
    operation: Some("create".to_owned()),
    title: Some("demo".to_owned()),
    body: Some("slides due Friday".to_owned()),
    ..RawAction::default()
  });
  let dispatcher = Dispatcher::new(store, Some(llm));

  let outcome = dispatcher.handle(owner, "whatever the user typed").await.unwrap();
  assert_eq!(outcome.resolved_by, ResolvedBy::Llm);
  match outcome.result {
    ActionResult::Created { note } => {
      assert_eq!(note.title, "demo");
      assert_eq!(note.body, "slides due Friday");
    }
    other => panic!("expected a created note, got {other:?}"),
  }
}

#[tokio::test]
async fn unresolvable_input_reports_intent_unresolved() {
  let (store, owner) = store_with_user().await;
  let dispatcher = Dispatcher::new(store, Some(Unreachable));

  // Empty input: the fallback declines entirely.
  let err = dispatcher.handle(owner, "   ").await.unwrap_err();
  assert!(matches!(err, DispatchError::IntentUnresolved { .. }));

  // A bare trigger word: the fallback produces a candidate the validator
  // rejects (delete with no target).
  let err = dispatcher.handle(owner, "delete").await.unwrap_err();
  match err {
    DispatchError::IntentUnresolved { raw_text } => {
      assert_eq!(raw_text, "delete");
    }
    other => panic!("expected IntentUnresolved, got {other:?}"),
  }
}

// ─── CRUD semantics through the dispatcher ───────────────────────────────────

#[tokio::test]
async fn create_then_read_by_id_round_trips() {
  let (store, owner) = store_with_user().await;
  let dispatcher = Dispatcher::fallback_only(store);

  let id = create(
    &dispatcher,
    owner,
    "Create a note about demo saying slides due Friday",
  )
  .await;

  let outcome = dispatcher
    .handle(owner, &format!("show note {id}"))
    .await
    .unwrap();
  match outcome.result {
    ActionResult::Fetched { note } => {
      assert_eq!(note.note_id, id);
      assert_eq!(note.title, "demo");
      assert_eq!(note.body, "slides due Friday");
    }
    other => panic!("expected a fetch, got {other:?}"),
  }
}

#[tokio::test]
async fn update_by_id_is_partial() {
  let (store, owner) = store_with_user().await;
  let dispatcher = Dispatcher::fallback_only(store);

  let id = create(&dispatcher, owner, "create a note about demo saying v1").await;

  let outcome = dispatcher
    .handle(owner, &format!("update note {id} saying v2"))
    .await
    .unwrap();
  match outcome.result {
    ActionResult::Updated { note } => {
      assert_eq!(note.title, "demo", "unspecified field must be untouched");
      assert_eq!(note.body, "v2");
    }
    other => panic!("expected an update, got {other:?}"),
  }
}

#[tokio::test]
async fn delete_then_read_yields_not_found() {
  let (store, owner) = store_with_user().await;
  let dispatcher = Dispatcher::fallback_only(store);

  let id = create(&dispatcher, owner, "create a note about demo saying x").await;

  let outcome = dispatcher
    .handle(owner, &format!("delete note {id}"))
    .await
    .unwrap();
  assert!(matches!(outcome.result, ActionResult::Deleted { .. }));
  assert!(outcome.notes.is_empty(), "snapshot reflects the delete");

  let err = dispatcher
    .handle(owner, &format!("show note {id}"))
    .await
    .unwrap_err();
  assert!(matches!(err, DispatchError::NotFound));
}

#[tokio::test]
async fn ambiguous_title_is_an_error_not_a_guess() {
  let (store, owner) = store_with_user().await;
  let dispatcher = Dispatcher::fallback_only(store.clone());

  create(&dispatcher, owner, "create a note about Groceries saying milk").await;
  create(&dispatcher, owner, "create a note about Groceries list saying eggs")
    .await;

  let err = dispatcher
    .handle(owner, "delete the groceries note")
    .await
    .unwrap_err();
  match err {
    DispatchError::Ambiguous { target, count } => {
      assert_eq!(target, "groceries");
      assert_eq!(count, 2);
    }
    other => panic!("expected Ambiguous, got {other:?}"),
  }

  // Neither note was deleted.
  assert_eq!(store.list_notes(owner).await.unwrap().len(), 2);
}

#[tokio::test]
async fn foreign_notes_are_invisible() {
  let (store, alice) = store_with_user().await;
  let bob = store
    .create_user("bob".to_owned(), "$argon2id$stub".to_owned())
    .await
    .unwrap()
    .user_id;
  let dispatcher = Dispatcher::fallback_only(store.clone());

  let id = create(&dispatcher, alice, "create a note about secret saying x").await;

  for text in [
    format!("show note {id}"),
    format!("update note {id} saying hijacked"),
    format!("delete note {id}"),
  ] {
    let err = dispatcher.handle(bob, &text).await.unwrap_err();
    assert!(matches!(err, DispatchError::NotFound), "{text}");
  }

  // Bob's listing shows nothing; Alice's note is intact.
  let outcome = dispatcher.handle(bob, "show all notes").await.unwrap();
  assert!(matches!(outcome.result, ActionResult::Listed { ref notes } if notes.is_empty()));
  let note = store.note(alice, id).await.unwrap().unwrap();
  assert_eq!(note.body, "x");
}

#[tokio::test]
async fn listing_snapshot_orders_most_recent_first() {
  let (store, owner) = store_with_user().await;
  let dispatcher = Dispatcher::fallback_only(store);

  let first = create(&dispatcher, owner, "create a note about one saying a").await;
  let _second = create(&dispatcher, owner, "create a note about two saying b").await;

  dispatcher
    .handle(owner, &format!("update note {first} saying a2"))
    .await
    .unwrap();

  let outcome = dispatcher.handle(owner, "show all notes").await.unwrap();
  match outcome.result {
    ActionResult::Listed { notes } => {
      assert_eq!(notes.len(), 2);
      assert_eq!(notes[0].note_id, first);
    }
    other => panic!("expected a listing, got {other:?}"),
  }
}
