//! Pipeline coordinator.
//!
//! Every scoped or mutating operation runs through [`Coordinator::run`],
//! which applies a fixed sequence of checks and stops at the first failure:
//!
//! 1. structural validation of the payload;
//! 2. the credential must carry a subject claim;
//! 3. referenced ids must exist, checked in declared order;
//! 4. the subject must resolve to a registered, unblocked user;
//! 5. unless the caller is a superuser: the role check, then the scope check;
//! 6. the business operation, which stages its mutations;
//! 7. the staged batch is committed atomically.
//!
//! Existence runs before authorization, so a caller without permission who
//! names a missing id gets a 404, not a 403.

use std::future::Future;

use roster_core::{
  entity::{EntityKind, EntityRef},
  roles::{self, Operation},
  scope::ScopeRequirement,
  store::{Batch, RecordStore},
  validation::Validate,
};
use uuid::Uuid;

use crate::{
  error::{ApiError, ErrorCode},
  extract::PathId,
  identity::{self, Caller, Credential},
  scope,
};

// ─── Plan ────────────────────────────────────────────────────────────────────

/// A declared reference as supplied by the caller.
#[derive(Debug, Clone)]
enum Reference {
  Id(EntityRef),
  /// Not a UUID, so it cannot name anything.
  Malformed { kind: EntityKind, raw: String },
}

/// What an operation declares up front: its identity in the role registry,
/// the ids it references, and the scope it needs.
#[derive(Debug, Clone)]
pub struct Plan {
  operation:  Operation,
  references: Vec<Reference>,
  scope:      Option<ScopeRequirement>,
}

impl Plan {
  pub fn new(operation: Operation) -> Self {
    Self { operation, references: Vec::new(), scope: None }
  }

  /// Add a referenced id. Ids are checked in the order they are added.
  pub fn reference(mut self, kind: EntityKind, id: Uuid) -> Self {
    self.references.push(Reference::Id(EntityRef::new(kind, id)));
    self
  }

  /// Add a referenced id taken from the path. A malformed segment fails the
  /// existence stage at its position in the declared order.
  pub fn reference_path(mut self, kind: EntityKind, id: &PathId) -> Self {
    let reference = match id.parse() {
      Some(id) => Reference::Id(EntityRef::new(kind, id)),
      None => Reference::Malformed { kind, raw: id.as_str().to_owned() },
    };
    self.references.push(reference);
    self
  }

  pub fn reference_opt(self, kind: EntityKind, id: Option<Uuid>) -> Self {
    match id {
      Some(id) => self.reference(kind, id),
      None => self,
    }
  }

  pub fn scope(mut self, requirement: ScopeRequirement) -> Self {
    self.scope = Some(requirement);
    self
  }

  pub fn scope_opt(mut self, requirement: Option<ScopeRequirement>) -> Self {
    self.scope = requirement;
    self
  }
}

// ─── Stage results ───────────────────────────────────────────────────────────

/// What a business operation hands back: its response value and the
/// mutations to commit.
#[derive(Debug)]
pub struct Staged<T> {
  pub value: T,
  pub batch: Batch,
}

impl<T> Staged<T> {
  /// A read: nothing to commit.
  pub fn read(value: T) -> Self { Self { value, batch: Batch::new() } }

  pub fn write(value: T, batch: Batch) -> Self { Self { value, batch } }
}

/// The result of a successful run.
#[derive(Debug)]
pub struct Outcome<T> {
  pub value:     T,
  /// `true` if the commit changed at least one row. Always `false` for reads.
  pub committed: bool,
}

// ─── Coordinator ─────────────────────────────────────────────────────────────

pub struct Coordinator<'s, S> {
  store: &'s S,
}

impl<'s, S: RecordStore> Coordinator<'s, S> {
  pub fn new(store: &'s S) -> Self { Self { store } }

  /// Run `operation` behind the full check sequence.
  ///
  /// `plan` is built from the validated payload, so body ids can be declared
  /// as references. `operation` receives the store, the resolved caller, and
  /// the validated payload.
  pub async fn run<P, T, Fut>(
    &self,
    credential: &Credential,
    payload: P,
    plan: impl FnOnce(&P::Valid) -> Plan,
    operation: impl FnOnce(&'s S, Caller, P::Valid) -> Fut,
  ) -> Result<Outcome<T>, ApiError>
  where
    P: Validate,
    Fut: Future<Output = Result<Staged<T>, ApiError>>,
  {
    let valid = payload.validate().map_err(|errors| {
      let fields: Vec<&str> = errors.fields().collect();
      tracing::debug!(stage = "validation", ?fields, "rejected");
      ApiError::Validation(errors)
    })?;
    let plan = plan(&valid);

    let subject = credential.subject().inspect_err(|_| {
      tracing::debug!(stage = "identity", "credential has no subject");
    })?;

    self.check_references(&plan.references).await?;

    let caller = identity::resolve(self.store, subject).await.inspect_err(|e| {
      tracing::debug!(stage = "identity", error = %e, "rejected");
    })?;

    self.authorize(&caller, &plan).await?;

    let Staged { value, batch } = operation(self.store, caller, valid).await?;

    let committed = if batch.is_empty() {
      false
    } else {
      let size = batch.len();
      let committed = self.store.commit(batch).await.map_err(|e| {
        let e = ApiError::store(e);
        if let ApiError::OrphanEntityConflict(msg) = &e {
          tracing::info!(operation = %plan.operation, "{msg}");
        }
        e
      })?;
      tracing::debug!(operation = %plan.operation, size, committed, "batch committed");
      committed
    };

    Ok(Outcome { value, committed })
  }

  /// The first missing reference, in declared order, fails the request.
  async fn check_references(&self, references: &[Reference]) -> Result<(), ApiError> {
    for reference in references {
      match reference {
        Reference::Id(r) => {
          let exists = self.store.entity_exists(r.kind, r.id).await.map_err(ApiError::store)?;
          if !exists {
            tracing::debug!(stage = "existence", entity = %r.kind, id = %r.id, "not found");
            return Err(ApiError::EntityIdNotFound { entity: r.kind, id: r.id.to_string() });
          }
        }
        Reference::Malformed { kind, raw } => {
          tracing::debug!(stage = "existence", entity = %kind, raw = %raw, "malformed id");
          return Err(ApiError::EntityIdNotFound { entity: *kind, id: raw.clone() });
        }
      }
    }
    Ok(())
  }

  /// Role check then scope check, both skipped for superusers.
  async fn authorize(&self, caller: &Caller, plan: &Plan) -> Result<(), ApiError> {
    if caller.is_superuser() {
      tracing::debug!(operation = %plan.operation, user = %caller.user_id, "superuser bypass");
      return Ok(());
    }

    if !roles::has_capability(&caller.roles, plan.operation.required_roles()) {
      tracing::debug!(stage = "capability", operation = %plan.operation, "rejected");
      return Err(ErrorCode::InsufficientUserRole.into());
    }

    if let Some(requirement) = plan.scope {
      scope::evaluate(self.store, caller, requirement).await.inspect_err(|e| {
        tracing::debug!(stage = "scope", ?requirement, error = %e, "rejected");
      })?;
    }
    Ok(())
  }
}
