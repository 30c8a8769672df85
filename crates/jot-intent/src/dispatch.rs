//! The intent dispatcher: resolver chain, validation, and owner-scoped
//! execution.
//!
//! Per request the state machine is
//! `TryLlm → {validated, TryFallback}`; `TryFallback → {validated,
//! IntentUnresolved}`. Only `Unavailable`/`Malformed` (including an LLM
//! candidate the validator rejects) move the machine to `TryFallback`;
//! every error after validation is terminal and surfaces as a structured
//! [`DispatchError`].
//!
//! No store write is issued before a candidate has been validated, so
//! dropping the request future mid-resolution (caller disconnect) commits
//! nothing.

use std::sync::Arc;

use jot_core::{
  action::{Action, Operation, ResolvedBy, Target},
  note::{NewNote, Note, NoteSummary, NoteUpdate},
  store::NoteStore,
};
use uuid::Uuid;

use crate::{
  error::{DispatchError, ResolveError},
  fallback::FallbackParser,
  resolver::IntentResolver,
  respond::{self, ActionResult, QueryOutcome},
  validate::validate,
};

/// Notes created without an explicit title land under this one.
const DEFAULT_TITLE: &str = "General";

/// Orchestrates one natural-language request from raw text to outcome.
///
/// `llm` is `None` when configured for fallback-only operation; the
/// deterministic parser is always present.
pub struct Dispatcher<S, R> {
  store:    Arc<S>,
  llm:      Option<R>,
  fallback: FallbackParser,
}

impl<S, R> Dispatcher<S, R>
where
  S: NoteStore,
  R: IntentResolver,
{
  pub fn new(store: Arc<S>, llm: Option<R>) -> Self {
    Self {
      store,
      llm,
      fallback: FallbackParser,
    }
  }

  /// Handle one request for `owner`: resolve, validate, execute, compose.
  pub async fn handle(
    &self,
    owner: Uuid,
    raw_text: &str,
  ) -> Result<QueryOutcome, DispatchError> {
    let summaries: Vec<NoteSummary> = self
      .list(owner)
      .await?
      .iter()
      .map(Note::summary)
      .collect();

    let action = self.resolve(raw_text, &summaries).await?;
    tracing::debug!(
      operation = action.operation.as_str(),
      resolved_by = ?action.resolved_by,
      "resolved intent"
    );

    let result = self.execute(owner, &action).await?;
    let snapshot = self.list(owner).await?;
    Ok(respond::compose(&action, result, snapshot))
  }

  // ── Resolution ────────────────────────────────────────────────────────────

  async fn resolve(
    &self,
    raw_text: &str,
    notes: &[NoteSummary],
  ) -> Result<Action, DispatchError> {
    if let Some(llm) = &self.llm {
      match llm.resolve(raw_text, notes).await {
        Ok(candidate) => match validate(candidate, ResolvedBy::Llm, raw_text) {
          Ok(action) => return Ok(action),
          Err(e) => {
            tracing::warn!(error = %e, "llm candidate rejected, falling back");
          }
        },
        Err(e) => {
          tracing::warn!(error = %e, "llm resolution failed, falling back");
        }
      }
    }

    let candidate = self
      .fallback
      .resolve(raw_text, notes)
      .await
      .map_err(|e| self.unresolved(raw_text, &e))?;

    validate(candidate, ResolvedBy::Fallback, raw_text).map_err(|e| {
      tracing::warn!(error = %e, "fallback candidate rejected");
      DispatchError::IntentUnresolved {
        raw_text: raw_text.to_owned(),
      }
    })
  }

  fn unresolved(&self, raw_text: &str, error: &ResolveError) -> DispatchError {
    tracing::warn!(error = %error, "no resolver produced a usable action");
    DispatchError::IntentUnresolved {
      raw_text: raw_text.to_owned(),
    }
  }

  // ── Execution ─────────────────────────────────────────────────────────────

  async fn execute(
    &self,
    owner: Uuid,
    action: &Action,
  ) -> Result<ActionResult, DispatchError> {
    match action.operation {
      Operation::Create => {
        let input = NewNote {
          title: action
            .fields
            .title
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE.to_owned()),
          body: action.fields.body.clone().unwrap_or_default(),
        };
        let note = self
          .store
          .create_note(owner, input)
          .await
          .map_err(store_error)?;
        Ok(ActionResult::Created { note })
      }

      Operation::Read => match &action.target {
        None => Ok(ActionResult::Listed {
          notes: self.list(owner).await?,
        }),
        Some(target) => {
          let note = self.resolve_target(owner, target).await?;
          Ok(ActionResult::Fetched { note })
        }
      },

      Operation::Update => {
        // Validation guarantees a target and at least one field.
        let target = action.target.as_ref().ok_or(DispatchError::NotFound)?;
        let found = self.resolve_target(owner, target).await?;
        let patch = NoteUpdate {
          title: action.fields.title.clone(),
          body:  action.fields.body.clone(),
        };
        let note = self
          .store
          .update_note(owner, found.note_id, patch)
          .await
          .map_err(store_error)?
          .ok_or(DispatchError::NotFound)?;
        Ok(ActionResult::Updated { note })
      }

      Operation::Delete => {
        let target = action.target.as_ref().ok_or(DispatchError::NotFound)?;
        let found = self.resolve_target(owner, target).await?;
        if !self
          .store
          .delete_note(owner, found.note_id)
          .await
          .map_err(store_error)?
        {
          return Err(DispatchError::NotFound);
        }
        Ok(ActionResult::Deleted {
          note_id: found.note_id,
          title:   found.title,
        })
      }
    }
  }

  /// Map a target reference to exactly one of `owner`'s notes.
  ///
  /// A title hint matching several notes is an error the caller must
  /// disambiguate with an id — never a silent pick of one of them.
  async fn resolve_target(
    &self,
    owner: Uuid,
    target: &Target,
  ) -> Result<Note, DispatchError> {
    match target {
      Target::Id(id) => self
        .store
        .note(owner, *id)
        .await
        .map_err(store_error)?
        .ok_or(DispatchError::NotFound),
      Target::Title(needle) => {
        let mut matches = self
          .store
          .find_by_title(owner, needle)
          .await
          .map_err(store_error)?;
        match matches.len() {
          0 => Err(DispatchError::NotFound),
          1 => Ok(matches.remove(0)),
          count => Err(DispatchError::Ambiguous {
            target: needle.clone(),
            count,
          }),
        }
      }
    }
  }

  async fn list(&self, owner: Uuid) -> Result<Vec<Note>, DispatchError> {
    self.store.list_notes(owner).await.map_err(store_error)
  }
}

fn store_error<E>(e: E) -> DispatchError
where
  E: std::error::Error + Send + Sync + 'static,
{
  DispatchError::Store(Box::new(e))
}

// A dispatcher with no LLM still needs a concrete resolver type; the
// fallback parser itself fills that hole.
impl<S: NoteStore> Dispatcher<S, FallbackParser> {
  /// Construct a dispatcher that only uses the deterministic parser.
  pub fn fallback_only(store: Arc<S>) -> Self {
    Self::new(store, None)
  }
}
