//! Generic entity table over a range store
//!
//! Every mutation except `create` is a full read of the table, an in-memory
//! change, and a full rewrite of header plus all rows. There is no version
//! check between the read and the write: two concurrent updates to the same
//! table race, and whichever rewrite lands last wins in full.

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::NaiveDateTime;
use log::{debug, info};

use super::id::{generate_id, now};
use super::record::{Record, decode_rows};
use crate::api::{RangeStore, Row};
use crate::error::{StoreError, StoreResult};

/// A typed row of one sheet
///
/// `COLUMNS` is the header in stored order. `from_record` and `to_row` are the
/// only conversions between the typed record and raw cells.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Sheet (and range) name
    const TABLE: &'static str;
    /// Header row, in column order
    const COLUMNS: &'static [&'static str];

    /// Input accepted by `create`
    type Draft: Send;
    /// Partial change accepted by `update`
    type Patch: Send;

    fn id(&self) -> &str;

    fn from_record(record: &Record) -> Self;

    /// Cells in `COLUMNS` order
    fn to_row(&self) -> Row;

    /// Build a new entity, filling table defaults
    fn from_draft(id: String, draft: Self::Draft, now: NaiveDateTime) -> Self;

    /// Shallow merge: fields set in the patch replace the current value
    fn apply(&mut self, patch: Self::Patch);
}

/// Handle to one sheet. Cheap to clone; holds no rows.
pub struct Table<E> {
    store: Arc<dyn RangeStore>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Table<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Table<E> {
    pub fn new(store: Arc<dyn RangeStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        E::TABLE
    }

    /// The schema as a header row
    pub fn header() -> Row {
        E::COLUMNS.iter().map(|c| c.to_string()).collect()
    }

    /// Every entity in stored order
    pub async fn list_all(&self) -> StoreResult<Vec<E>> {
        Ok(self.load().await?.0)
    }

    /// Linear scan for an exact `ID` match
    pub async fn find_by_id(&self, id: &str) -> StoreResult<Option<E>> {
        Ok(self.list_all().await?.into_iter().find(|e| e.id() == id))
    }

    /// All entities matching `predicate`, in stored order
    pub async fn find_where<F>(&self, predicate: F) -> StoreResult<Vec<E>>
    where
        F: Fn(&E) -> bool,
    {
        let mut entities = self.list_all().await?;
        entities.retain(|e| predicate(e));
        Ok(entities)
    }

    /// Append one new row. Returns the constructed entity, not a re-read.
    pub async fn create(&self, draft: E::Draft) -> StoreResult<E> {
        let entity = E::from_draft(generate_id(), draft, now());
        self.store
            .append_rows(E::TABLE, vec![entity.to_row()])
            .await?;
        info!("Created {} row {}", E::TABLE, entity.id());
        Ok(entity)
    }

    /// Append several rows with a single call
    pub async fn create_many(&self, drafts: Vec<E::Draft>) -> StoreResult<Vec<E>> {
        if drafts.is_empty() {
            return Ok(Vec::new());
        }

        let created_at = now();
        let entities: Vec<E> = drafts
            .into_iter()
            .map(|draft| E::from_draft(generate_id(), draft, created_at))
            .collect();
        let rows = entities.iter().map(E::to_row).collect();
        self.store.append_rows(E::TABLE, rows).await?;
        info!("Created {} {} rows", entities.len(), E::TABLE);
        Ok(entities)
    }

    /// Merge `patch` into the row with `id` and rewrite the whole table
    pub async fn update(&self, id: &str, patch: E::Patch) -> StoreResult<E> {
        let (mut entities, stored_rows) = self.load().await?;
        let index = self.position(&entities, id)?;

        entities[index].apply(patch);
        self.rewrite(&entities, stored_rows).await?;

        info!("Updated {} row {}", E::TABLE, id);
        Ok(entities.swap_remove(index))
    }

    /// Hard delete: rewrite the table without the row with `id`
    pub async fn delete(&self, id: &str) -> StoreResult<E> {
        let (mut entities, stored_rows) = self.load().await?;
        let index = self.position(&entities, id)?;

        let removed = entities.remove(index);
        self.rewrite(&entities, stored_rows).await?;

        info!("Deleted {} row {}", E::TABLE, id);
        Ok(removed)
    }

    /// Clear the sheet and write the header row
    pub async fn initialize(&self) -> StoreResult<()> {
        self.store.clear_range(E::TABLE).await?;
        self.store
            .overwrite_range(E::TABLE, vec![Self::header()])
            .await?;
        info!("Initialized {} with {} columns", E::TABLE, E::COLUMNS.len());
        Ok(())
    }

    /// Entities plus the number of raw rows (header and blanks included)
    async fn load(&self) -> StoreResult<(Vec<E>, usize)> {
        let rows = self.store.fetch_range(E::TABLE).await?;
        let entities: Vec<E> = decode_rows(&rows).iter().map(E::from_record).collect();
        debug!("Loaded {} {} rows", entities.len(), E::TABLE);
        Ok((entities, rows.len()))
    }

    fn position(&self, entities: &[E], id: &str) -> StoreResult<usize> {
        entities
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| StoreError::not_found(E::TABLE, id))
    }

    /// Overwrite with header + `entities`, padding with blank rows up to the
    /// previously stored row count so no stale row survives below the block.
    async fn rewrite(&self, entities: &[E], stored_rows: usize) -> StoreResult<()> {
        let mut rows = Vec::with_capacity(entities.len().max(stored_rows) + 1);
        rows.push(Self::header());
        rows.extend(entities.iter().map(E::to_row));
        while rows.len() < stored_rows {
            rows.push(vec![String::new(); E::COLUMNS.len()]);
        }
        self.store.overwrite_range(E::TABLE, rows).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoryRangeStore;
    use crate::store::entities::{NewPackage, Package, PackagePatch};
    use async_trait::async_trait;
    use tokio::sync::{Mutex, oneshot};

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn basic() -> NewPackage {
        NewPackage {
            name: "Basic".into(),
            speed: 10.0,
            price: 15.0,
            status: None,
            description: None,
        }
    }

    async fn seeded() -> (MemoryRangeStore, Table<Package>) {
        let memory = MemoryRangeStore::new();
        memory
            .seed(
                "Packages",
                vec![
                    row(&["ID", "Name", "Speed", "Price", "Status", "Description"]),
                    row(&["a", "Basic", "10", "15", "active", ""]),
                    row(&["b", "Pro", "50", "40", "active", "Fiber"]),
                    row(&["c", "Legacy", "2", "5", "inactive", "Copper"]),
                ],
            )
            .await;
        let table = Table::new(Arc::new(memory.clone()));
        (memory, table)
    }

    #[tokio::test]
    async fn test_create_then_find_round_trip() {
        let memory = MemoryRangeStore::new();
        let table: Table<Package> = Table::new(Arc::new(memory.clone()));
        table.initialize().await.unwrap();

        let first = table.create(basic()).await.unwrap();
        let second = table.create(basic()).await.unwrap();

        assert!(!first.id.is_empty());
        assert_ne!(first.id, second.id);
        assert_eq!(table.find_by_id(&first.id).await.unwrap(), Some(first.clone()));
        assert_eq!(first.status, "active");
        assert_eq!(first.description, "");
        assert_eq!(first.price, "15");
    }

    #[tokio::test]
    async fn test_list_all_is_idempotent() {
        let (_, table) = seeded().await;
        let first = table.list_all().await.unwrap();
        let second = table.list_all().await.unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_empty_range_lists_nothing() {
        let table: Table<Package> = Table::new(Arc::new(MemoryRangeStore::new()));
        assert!(table.list_all().await.unwrap().is_empty());
        assert_eq!(table.find_by_id("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_changes_only_target_field() {
        let (memory, table) = seeded().await;
        let before = memory.snapshot("Packages").await;

        let updated = table
            .update(
                "b",
                PackagePatch {
                    price: Some(45.0),
                    ..PackagePatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.price, "45");
        assert_eq!(updated.name, "Pro");
        assert_eq!(updated.description, "Fiber");

        let after = memory.snapshot("Packages").await;
        assert_eq!(after.len(), before.len());
        assert_eq!(after[0], before[0]);
        assert_eq!(after[1], before[1]);
        assert_eq!(after[2], row(&["b", "Pro", "50", "45", "active", "Fiber"]));
        assert_eq!(after[3], before[3]);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let (memory, table) = seeded().await;
        let before = memory.snapshot("Packages").await;

        let err = table
            .update("missing", PackagePatch::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(memory.snapshot("Packages").await, before);
    }

    #[tokio::test]
    async fn test_short_rows_default_to_empty() {
        let memory = MemoryRangeStore::new();
        memory
            .seed(
                "Packages",
                vec![
                    row(&["ID", "Name", "Speed", "Price", "Status", "Description"]),
                    row(&["a", "Basic"]),
                ],
            )
            .await;
        let table: Table<Package> = Table::new(Arc::new(memory));

        let package = table.find_by_id("a").await.unwrap().unwrap();
        assert_eq!(package.name, "Basic");
        assert_eq!(package.speed, "");
        assert_eq!(package.price, "");
        assert_eq!(package.status, "");
        assert_eq!(package.description, "");
    }

    #[tokio::test]
    async fn test_rewrite_normalizes_header_order() {
        let memory = MemoryRangeStore::new();
        memory
            .seed(
                "Packages",
                vec![
                    row(&["Name", "ID", "Price"]),
                    row(&["Basic", "a", "15"]),
                ],
            )
            .await;
        let table: Table<Package> = Table::new(Arc::new(memory.clone()));

        table
            .update(
                "a",
                PackagePatch {
                    status: Some("inactive".into()),
                    ..PackagePatch::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(
            memory.snapshot("Packages").await,
            vec![
                row(&["ID", "Name", "Speed", "Price", "Status", "Description"]),
                row(&["a", "Basic", "", "15", "inactive", ""]),
            ]
        );
    }

    #[tokio::test]
    async fn test_delete_blanks_vacated_row() {
        let (memory, table) = seeded().await;

        let removed = table.delete("a").await.unwrap();
        assert_eq!(removed.name, "Basic");

        let raw = memory.snapshot("Packages").await;
        assert_eq!(raw.len(), 4);
        assert_eq!(raw[1][0], "b");
        assert_eq!(raw[2][0], "c");
        assert!(raw[3].iter().all(String::is_empty));

        let ids: Vec<String> = table
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["b", "c"]);

        assert!(table.delete("a").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_create_many_single_append() {
        let (memory, table) = seeded().await;
        let created = table
            .create_many(vec![basic(), basic()])
            .await
            .unwrap();
        assert_eq!(created.len(), 2);
        assert_eq!(memory.snapshot("Packages").await.len(), 6);
        assert!(table.create_many(Vec::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_where_filters_in_order() {
        let (_, table) = seeded().await;
        let active = table.find_where(|p| p.status == "active").await.unwrap();
        let names: Vec<&str> = active.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Basic", "Pro"]);
    }

    /// Holds the first overwrite until released, reporting when it parks
    struct GatedStore {
        inner: MemoryRangeStore,
        parked: Mutex<Option<oneshot::Sender<()>>>,
        release: Mutex<Option<oneshot::Receiver<()>>>,
    }

    #[async_trait]
    impl RangeStore for GatedStore {
        async fn fetch_range(&self, range: &str) -> StoreResult<Vec<Row>> {
            self.inner.fetch_range(range).await
        }

        async fn append_rows(&self, range: &str, rows: Vec<Row>) -> StoreResult<()> {
            self.inner.append_rows(range, rows).await
        }

        async fn overwrite_range(&self, range: &str, rows: Vec<Row>) -> StoreResult<()> {
            let gate = self.release.lock().await.take();
            if let Some(release) = gate {
                if let Some(parked) = self.parked.lock().await.take() {
                    let _ = parked.send(());
                }
                let _ = release.await;
            }
            self.inner.overwrite_range(range, rows).await
        }

        async fn clear_range(&self, range: &str) -> StoreResult<()> {
            self.inner.clear_range(range).await
        }
    }

    #[tokio::test]
    async fn test_interleaved_updates_lose_the_earlier_write() {
        let (memory, _) = seeded().await;
        let (parked_tx, parked_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        let gated = GatedStore {
            inner: memory.clone(),
            parked: Mutex::new(Some(parked_tx)),
            release: Mutex::new(Some(release_rx)),
        };
        let table: Table<Package> = Table::new(Arc::new(gated));

        // First update reads, then parks before its overwrite
        let first = {
            let table = table.clone();
            tokio::spawn(async move {
                table
                    .update(
                        "a",
                        PackagePatch {
                            price: Some(20.0),
                            ..PackagePatch::default()
                        },
                    )
                    .await
            })
        };
        parked_rx.await.unwrap();

        // Second update reads the same snapshot and writes first
        let second = table
            .update(
                "b",
                PackagePatch {
                    name: Some("Pro Plus".into()),
                    ..PackagePatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(second.name, "Pro Plus");

        // First write lands last and carries the stale copy of row b
        release_tx.send(()).unwrap();
        let first = first.await.unwrap().unwrap();
        assert_eq!(first.price, "20");

        let reader: Table<Package> = Table::new(Arc::new(memory));
        let stored = reader.list_all().await.unwrap();
        let a = stored.iter().find(|p| p.id == "a").unwrap();
        let b = stored.iter().find(|p| p.id == "b").unwrap();
        assert_eq!(a.price, "20");
        assert_eq!(b.name, "Pro");
    }

    struct FailingStore;

    #[async_trait]
    impl RangeStore for FailingStore {
        async fn fetch_range(&self, range: &str) -> StoreResult<Vec<Row>> {
            Err(StoreError::remote(range, "fetch", anyhow::anyhow!("quota exceeded")))
        }

        async fn append_rows(&self, range: &str, _rows: Vec<Row>) -> StoreResult<()> {
            Err(StoreError::remote(range, "append", anyhow::anyhow!("quota exceeded")))
        }

        async fn overwrite_range(&self, range: &str, _rows: Vec<Row>) -> StoreResult<()> {
            Err(StoreError::remote(range, "overwrite", anyhow::anyhow!("quota exceeded")))
        }

        async fn clear_range(&self, range: &str) -> StoreResult<()> {
            Err(StoreError::remote(range, "clear", anyhow::anyhow!("quota exceeded")))
        }
    }

    #[tokio::test]
    async fn test_remote_failures_propagate() {
        let table: Table<Package> = Table::new(Arc::new(FailingStore));
        assert!(table.list_all().await.unwrap_err().is_remote());
        assert!(table.find_by_id("a").await.unwrap_err().is_remote());
        assert!(table.create(basic()).await.unwrap_err().is_remote());
        assert!(
            table
                .update("a", PackagePatch::default())
                .await
                .unwrap_err()
                .is_remote()
        );
    }
}
