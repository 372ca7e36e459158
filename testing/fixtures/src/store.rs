use patchdb::prelude::*;
use std::collections::BTreeMap;

/// Stored shape of one record, keyed by attribute name. The identity
/// key lives in the outer map, not in the row.
pub type Row = BTreeMap<&'static str, FieldValue>;

enum PendingWrite {
    Insert(RecordId, Row),
    Update(RecordId, Row),
    Remove(RecordId),
}

///
/// RecordingStore
///
/// In-memory unit of work backing the integration suite. Writes are
/// staged per operation and applied on save, so retention semantics are
/// real: an update merges only the marked attributes into the stored
/// row. Tests can inject the next save's failure and inspect the
/// dirty-set log afterwards.
///

#[derive(Default)]
pub struct RecordingStore {
    rows: BTreeMap<RecordId, Row>,
    pending: Vec<PendingWrite>,
    fail_next: Option<StoreFailure>,
    pub dirty_log: Vec<(RecordId, DirtyFields)>,
    pub saves: u64,
}

impl RecordingStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row directly, bypassing the engine.
    pub fn seed<E: Record>(&mut self, entity: &E) {
        self.rows.insert(entity.id(), capture_row(entity));
    }

    /// Make the next save fail with `failure` instead of applying.
    pub fn fail_next_save(&mut self, failure: StoreFailure) {
        self.fail_next = Some(failure);
    }

    #[must_use]
    pub fn row(&self, id: RecordId) -> Option<&Row> {
        self.rows.get(&id)
    }

    /// Stored value of one attribute, if the row exists.
    #[must_use]
    pub fn value(&self, id: RecordId, name: &str) -> Option<&FieldValue> {
        self.rows.get(&id).and_then(|row| row.get(name))
    }

    #[must_use]
    pub fn contains(&self, id: RecordId) -> bool {
        self.rows.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn capture_row<E: Record>(entity: &E) -> Row {
    E::FIELDS
        .iter()
        .map(|field| (field.name, field.read(entity)))
        .collect()
}

impl<E: Record> UnitOfWork<E> for RecordingStore {
    fn attach(&mut self, _id: RecordId) -> Result<(), StoreFailure> {
        // attach is identity-only; existence is settled at save time
        Ok(())
    }

    fn insert(&mut self, entity: &E) -> Result<(), StoreFailure> {
        self.pending
            .push(PendingWrite::Insert(entity.id(), capture_row(entity)));

        Ok(())
    }

    fn remove(&mut self, id: RecordId) -> Result<(), StoreFailure> {
        self.pending.push(PendingWrite::Remove(id));

        Ok(())
    }

    fn mark_dirty(&mut self, entity: &E, fields: &DirtyFields) {
        let values = fields.iter().map(|(k, v)| (*k, v.clone())).collect();

        self.dirty_log.push((entity.id(), fields.clone()));
        self.pending.push(PendingWrite::Update(entity.id(), values));
    }

    fn save(&mut self) -> Result<u64, StoreFailure> {
        self.saves += 1;
        let staged = std::mem::take(&mut self.pending);

        if let Some(failure) = self.fail_next.take() {
            return Err(failure);
        }

        let mut affected = 0;
        for write in staged {
            match write {
                PendingWrite::Insert(id, row) => {
                    if self.rows.contains_key(&id) {
                        return Err(StoreFailure::new(
                            FailureSignal::UniqueViolation,
                            format!("duplicate key '{id}'"),
                        ));
                    }
                    self.rows.insert(id, row);
                    affected += 1;
                }
                PendingWrite::Update(id, values) => {
                    if let Some(row) = self.rows.get_mut(&id) {
                        row.extend(values);
                        affected += 1;
                    }
                }
                PendingWrite::Remove(id) => {
                    if self.rows.remove(&id).is_some() {
                        affected += 1;
                    }
                }
            }
        }

        Ok(affected)
    }
}
