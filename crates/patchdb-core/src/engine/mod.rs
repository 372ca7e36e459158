
use crate::{
    cancel::CancelToken,
    classify::classify,
    error::OpError,
    obs::sink::{self, MetricsEvent, OpKind},
    outcome::Outcome,
    snapshot::{Snapshot, diff_against},
    store::UnitOfWork,
    traits::{CreateView, PatchView, Record},
    value::RecordId,
};
use std::marker::PhantomData;

///
/// HookContext
///
/// Inputs exposed to before-persist hooks. The actor id is the
/// identity-lookup boundary: the caller resolves the current principal
/// and passes it in, the engine never looks it up itself.
///

#[derive(Clone, Copy, Debug)]
pub struct HookContext {
    pub actor: Option<RecordId>,
}

///
/// Reconciler
///
/// Request-scoped reconciliation engine over one unit of work. Turns a
/// payload, a target identity, and an optional before-persist hook into
/// a minimal dirty-field write, reporting every failure through the
/// closed outcome taxonomy. Holds no state beyond one operation and
/// never retries.
///

pub struct Reconciler<'a, E, U>
where
    E: Record,
    U: UnitOfWork<E>,
{
    uow: &'a mut U,
    actor: Option<RecordId>,
    cancel: CancelToken,
    debug: bool,
    _marker: PhantomData<E>,
}

impl<'a, E, U> Reconciler<'a, E, U>
where
    E: Record,
    U: UnitOfWork<E>,
{
    // ======================================================================
    // Construction & configuration
    // ======================================================================

    #[must_use]
    pub fn new(uow: &'a mut U) -> Self {
        Self {
            uow,
            actor: None,
            cancel: CancelToken::new(),
            debug: false,
            _marker: PhantomData,
        }
    }

    /// Actor identity stamped into hook contexts.
    #[must_use]
    pub const fn with_actor(mut self, actor: RecordId) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Cooperative cancellation token observed before every persist.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    fn debug_log(&self, s: impl Into<String>) {
        if self.debug {
            println!("[debug] {}", s.into());
        }
    }

    const fn hook_context(&self) -> HookContext {
        HookContext { actor: self.actor }
    }

    fn ensure_not_cancelled(&self) -> Result<(), OpError> {
        if self.cancel.is_cancelled() {
            return Err(OpError::cancelled());
        }

        Ok(())
    }

    // ======================================================================
    // Operations
    // ======================================================================

    /// Create a record from a creation payload.
    pub fn create<V>(&mut self, view: V) -> Outcome<RecordId>
    where
        V: CreateView<E>,
    {
        self.create_with(view, |_, _| Ok(()))
    }

    /// Create a record, letting `hook` mutate it before persist
    /// (audit stamping, derived fields). A hook failure aborts with
    /// zero side effects.
    pub fn create_with<V, F>(&mut self, view: V, hook: F) -> Outcome<RecordId>
    where
        V: CreateView<E>,
        F: FnOnce(&mut E, &HookContext) -> Result<(), OpError>,
    {
        let ctx = self.hook_context();
        let result: Result<(RecordId, u64), OpError> = (|| {
            view.validate()?;

            let mut entity = view.into_record();
            hook(&mut entity, &ctx)?;

            self.ensure_not_cancelled()?;
            self.uow.insert(&entity).map_err(classify)?;
            let rows = self.uow.save().map_err(classify)?;
            self.debug_log(format!("create on {} (key={})", E::PATH, entity.id()));

            Ok((entity.id(), rows))
        })();

        match &result {
            Ok((_, rows)) => sink::record(MetricsEvent::OpFinish {
                kind: OpKind::Create,
                entity_path: E::PATH,
                rows_written: *rows,
            }),
            Err(err) => sink::record(MetricsEvent::OpFailed {
                kind: OpKind::Create,
                entity_path: E::PATH,
                error_kind: err.kind,
            }),
        }

        Outcome::from_result(result.map(|(id, _)| id))
    }

    /// Apply a partial-update payload to the record with identity `id`.
    pub fn update<P>(&mut self, id: RecordId, patch: &P) -> Outcome<()>
    where
        P: PatchView<E>,
    {
        self.update_with(id, patch, |_, _| Ok(()))
    }

    /// Apply a partial-update payload, letting `hook` mutate the record
    /// further before persist. Only the dirty-field set is written; an
    /// empty set is a legal no-op that still reports success.
    pub fn update_with<P, F>(&mut self, id: RecordId, patch: &P, hook: F) -> Outcome<()>
    where
        P: PatchView<E>,
        F: FnOnce(&mut E, &HookContext) -> Result<(), OpError>,
    {
        let ctx = self.hook_context();
        let result = (|| {
            // 1. Validation runs before any mutation; the target stays
            //    untouched on failure.
            patch.validate()?;

            // 2. Attach by identity; no prior fetch round-trip.
            let mut entity = E::from_id(id);
            self.uow.attach(id).map_err(classify)?;

            // 3-4. Apply the payload, then freeze the baseline.
            let touched = patch.apply(&mut entity);
            let baseline = Snapshot::capture(&entity);

            // 5. Server-side mutations on top of the payload.
            hook(&mut entity, &ctx)?;

            // 6. Explicit intent plus post-hook drift.
            let dirty = diff_against(&entity, &baseline, &touched);
            if dirty.is_empty() {
                self.debug_log(format!("update no-op on {} (key={id})", E::PATH));
                return Ok(None);
            }

            // 7. Persist exactly the dirty attributes.
            self.ensure_not_cancelled()?;
            self.uow.mark_dirty(&entity, &dirty);
            let rows = self.uow.save().map_err(classify)?;
            if rows == 0 {
                return Err(OpError::not_found(E::PATH, id));
            }
            self.debug_log(format!(
                "update on {} (key={id}) wrote {} field(s)",
                E::PATH,
                dirty.len()
            ));

            Ok(Some(rows))
        })();

        match &result {
            Ok(Some(rows)) => sink::record(MetricsEvent::OpFinish {
                kind: OpKind::Update,
                entity_path: E::PATH,
                rows_written: *rows,
            }),
            Ok(None) => sink::record(MetricsEvent::NoOpUpdate {
                entity_path: E::PATH,
            }),
            Err(err) => sink::record(MetricsEvent::OpFailed {
                kind: OpKind::Update,
                entity_path: E::PATH,
                error_kind: err.kind,
            }),
        }

        Outcome::from_void(result.map(|_| ()))
    }

    /// Delete the record with identity `id`.
    pub fn delete(&mut self, id: RecordId) -> Outcome<()> {
        let result = (|| {
            self.ensure_not_cancelled()?;
            self.uow.attach(id).map_err(classify)?;
            self.uow.remove(id).map_err(classify)?;

            let rows = self.uow.save().map_err(classify)?;
            if rows == 0 {
                return Err(OpError::not_found(E::PATH, id));
            }
            self.debug_log(format!("delete on {} (key={id})", E::PATH));

            Ok(rows)
        })();

        match &result {
            Ok(rows) => sink::record(MetricsEvent::OpFinish {
                kind: OpKind::Delete,
                entity_path: E::PATH,
                rows_written: *rows,
            }),
            Err(err) => sink::record(MetricsEvent::OpFailed {
                kind: OpKind::Delete,
                entity_path: E::PATH,
                error_kind: err.kind,
            }),
        }

        Outcome::from_void(result.map(|_| ()))
    }
}
