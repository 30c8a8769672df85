//! The schema validator: the gate every candidate action passes before
//! anything touches the store.
//!
//! Resolver output — the LLM's especially — is treated as adversarial.
//! Validation is pure: no I/O, no store access. Whether a title target is
//! unambiguous needs the store and is checked at execution time instead.

use jot_core::action::{Action, ActionFields, Operation, RawAction, ResolvedBy, Target};

use crate::error::SchemaError;

/// Check a candidate against the allowed shape for its operation and
/// produce a validated [`Action`], or reject it with the reason.
///
/// Rules, by operation:
/// - `create`: at least one of title/body must be non-blank;
/// - `read`: target optional (`list` is accepted as a target-less alias);
/// - `update`: target required, plus at least one field to set;
/// - `delete`: target required.
pub fn validate(
  raw: RawAction,
  resolved_by: ResolvedBy,
  raw_text: &str,
) -> Result<Action, SchemaError> {
  let op_name = raw
    .operation
    .as_deref()
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .ok_or(SchemaError::MissingOperation)?;

  let (operation, list_alias) = match op_name.to_lowercase().as_str() {
    "create" => (Operation::Create, false),
    "read" => (Operation::Read, false),
    "update" => (Operation::Update, false),
    "delete" => (Operation::Delete, false),
    // The older action vocabulary had a distinct `list`; it maps to a
    // target-less read, any target fields ignored.
    "list" => (Operation::Read, true),
    other => return Err(SchemaError::UnknownOperation(other.to_owned())),
  };

  let target = if list_alias { None } else { target_of(&raw)? };

  let fields = ActionFields {
    title: non_blank(raw.title),
    body:  non_blank(raw.body),
  };

  match operation {
    Operation::Create => {
      if fields.title.is_none() && fields.body.is_none() {
        return Err(SchemaError::EmptyCreate);
      }
    }
    Operation::Read => {}
    Operation::Update => {
      if target.is_none() {
        return Err(SchemaError::MissingTarget(Operation::Update.as_str()));
      }
      if fields.title.is_none() && fields.body.is_none() {
        return Err(SchemaError::EmptyUpdate);
      }
    }
    Operation::Delete => {
      if target.is_none() {
        return Err(SchemaError::MissingTarget(Operation::Delete.as_str()));
      }
    }
  }

  Ok(Action {
    operation,
    target,
    fields,
    resolved_by,
    raw_text: raw_text.to_owned(),
  })
}

/// An explicit id wins over a title hint. A `target` field that is present
/// but blank is a malformed reference, not an absent one.
fn target_of(raw: &RawAction) -> Result<Option<Target>, SchemaError> {
  if let Some(id) = raw.note_id {
    return Ok(Some(Target::Id(id)));
  }
  match &raw.target {
    None => Ok(None),
    Some(s) => {
      let trimmed = s.trim();
      if trimmed.is_empty() {
        Err(SchemaError::BlankTarget)
      } else if let Ok(id) = trimmed.parse::<i64>() {
        Ok(Some(Target::Id(id)))
      } else {
        Ok(Some(Target::Title(trimmed.to_owned())))
      }
    }
  }
}

fn non_blank(value: Option<String>) -> Option<String> {
  value
    .map(|s| s.trim().to_owned())
    .filter(|s| !s.is_empty())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn raw(operation: &str) -> RawAction {
    RawAction {
      operation: Some(operation.to_owned()),
      ..RawAction::default()
    }
  }

  fn check(raw: RawAction) -> Result<Action, SchemaError> {
    validate(raw, ResolvedBy::Fallback, "test input")
  }

  #[test]
  fn create_requires_title_or_body() {
    assert_eq!(check(raw("create")), Err(SchemaError::EmptyCreate));
    assert_eq!(
      check(RawAction {
        title: Some("   ".to_owned()),
        body: Some("".to_owned()),
        ..raw("create")
      }),
      Err(SchemaError::EmptyCreate)
    );

    let action = check(RawAction {
      body: Some("slides due Friday".to_owned()),
      ..raw("create")
    })
    .unwrap();
    assert_eq!(action.operation, Operation::Create);
    assert_eq!(action.fields.body.as_deref(), Some("slides due Friday"));
    assert_eq!(action.raw_text, "test input");
  }

  #[test]
  fn read_without_target_is_list_all() {
    let action = check(raw("read")).unwrap();
    assert_eq!(action.operation, Operation::Read);
    assert_eq!(action.target, None);
  }

  #[test]
  fn list_alias_maps_to_targetless_read() {
    let action = check(RawAction {
      target: Some("groceries".to_owned()),
      ..raw("list")
    })
    .unwrap();
    assert_eq!(action.operation, Operation::Read);
    assert_eq!(action.target, None);
  }

  #[test]
  fn note_id_takes_precedence_over_title_hint() {
    let action = check(RawAction {
      note_id: Some(4),
      target: Some("groceries".to_owned()),
      ..raw("read")
    })
    .unwrap();
    assert_eq!(action.target, Some(Target::Id(4)));
  }

  #[test]
  fn numeric_target_string_becomes_an_id() {
    let action = check(RawAction {
      target: Some(" 12 ".to_owned()),
      ..raw("delete")
    })
    .unwrap();
    assert_eq!(action.target, Some(Target::Id(12)));
  }

  #[test]
  fn update_requires_target_and_a_field() {
    assert_eq!(
      check(RawAction {
        body: Some("x".to_owned()),
        ..raw("update")
      }),
      Err(SchemaError::MissingTarget("update"))
    );
    assert_eq!(
      check(RawAction {
        note_id: Some(2),
        ..raw("update")
      }),
      Err(SchemaError::EmptyUpdate)
    );

    let action = check(RawAction {
      note_id: Some(2),
      body: Some("buy milk".to_owned()),
      ..raw("update")
    })
    .unwrap();
    assert_eq!(action.target, Some(Target::Id(2)));
    assert_eq!(action.fields.title, None);
  }

  #[test]
  fn delete_requires_target() {
    assert_eq!(
      check(raw("delete")),
      Err(SchemaError::MissingTarget("delete"))
    );
  }

  #[test]
  fn blank_target_is_rejected_not_ignored() {
    assert_eq!(
      check(RawAction {
        target: Some("  ".to_owned()),
        ..raw("delete")
      }),
      Err(SchemaError::BlankTarget)
    );
  }

  #[test]
  fn unknown_and_missing_operations_are_rejected() {
    assert_eq!(
      check(raw("destroy")),
      Err(SchemaError::UnknownOperation("destroy".to_owned()))
    );
    assert_eq!(
      check(RawAction::default()),
      Err(SchemaError::MissingOperation)
    );
  }
}
