use parking_lot::RwLock;

use crate::{BookingData, RoomData};

/// Identity of rows kept in an [EntityStore]
pub trait Entity: Clone {
    fn id(&self) -> &str;
}

/// An immutable copy of a store's rows, usable as an undo point
#[derive(Debug, Clone)]
pub struct StoreSnapshot<T>(Vec<T>);

/// An in-memory, insertion-ordered collection of entities, keyed by their
/// server-assigned or temporary id
#[derive(Debug)]
pub struct EntityStore<T> {
    rows: RwLock<Vec<T>>,
}

impl<T> EntityStore<T>
where
    T: Entity,
{
    pub fn list(&self) -> Vec<T> {
        self.rows.read().clone()
    }

    pub fn get(&self, id: &str) -> Option<T> {
        self.rows.read().iter().find(|row| row.id() == id).cloned()
    }

    /// Updates the row with the entity's id in place, or appends a new row
    pub fn upsert(&self, entity: T) {
        let mut rows = self.rows.write();

        match rows.iter_mut().find(|row| row.id() == entity.id()) {
            Some(row) => *row = entity,
            None => rows.push(entity),
        }
    }

    pub fn remove(&self, id: &str) -> Option<T> {
        let mut rows = self.rows.write();
        let index = rows.iter().position(|row| row.id() == id)?;

        Some(rows.remove(index))
    }

    /// The reconciliation primitive. Swaps the row keyed by `temp_id` for the
    /// confirmed entity, keeping positions stable so rows don't visibly
    /// reorder when a mutation confirms.
    ///
    /// If a row already carries the confirmed id, that row is overwritten in
    /// place and the temporary row is removed, so the store never holds the
    /// provisional and confirmed row at the same time.
    pub fn replace(&self, temp_id: &str, entity: T) {
        let mut rows = self.rows.write();

        let confirmed = (entity.id() != temp_id)
            .then(|| rows.iter().position(|row| row.id() == entity.id()))
            .flatten();

        if let Some(index) = confirmed {
            rows[index] = entity;

            if let Some(temp) = rows.iter().position(|row| row.id() == temp_id) {
                rows.remove(temp);
            }

            return;
        }

        match rows.iter().position(|row| row.id() == temp_id) {
            Some(index) => rows[index] = entity,
            None => rows.push(entity),
        }
    }

    /// Replaces the entire collection, used when refetching from the server
    pub fn set_all(&self, new_rows: Vec<T>) {
        *self.rows.write() = new_rows;
    }

    pub fn snapshot(&self) -> StoreSnapshot<T> {
        StoreSnapshot(self.rows.read().clone())
    }

    pub fn restore(&self, snapshot: StoreSnapshot<T>) {
        *self.rows.write() = snapshot.0;
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

/// All entity collections the console works with. Views hold read-only
/// copies of the rows, every mutation goes through the mutator.
#[derive(Debug, Default)]
pub struct Stores {
    pub bookings: EntityStore<BookingData>,
    pub rooms: EntityStore<RoomData>,
}

/// A consistent undo point across every collection
#[derive(Debug, Clone)]
pub struct StoresSnapshot {
    bookings: StoreSnapshot<BookingData>,
    rooms: StoreSnapshot<RoomData>,
}

impl Stores {
    pub fn snapshot(&self) -> StoresSnapshot {
        StoresSnapshot {
            bookings: self.bookings.snapshot(),
            rooms: self.rooms.snapshot(),
        }
    }

    /// All-or-nothing: both collections roll back together
    pub fn restore(&self, snapshot: StoresSnapshot) {
        self.bookings.restore(snapshot.bookings);
        self.rooms.restore(snapshot.rooms);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: String,
        value: u32,
    }

    impl Entity for Row {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn row(id: &str, value: u32) -> Row {
        Row {
            id: id.to_string(),
            value,
        }
    }

    #[test]
    fn test_upsert_preserves_insertion_order() {
        let store = EntityStore::default();

        store.upsert(row("a", 1));
        store.upsert(row("b", 2));
        store.upsert(row("a", 3));

        assert_eq!(store.list(), vec![row("a", 3), row("b", 2)]);
    }

    #[test]
    fn test_replace_keeps_position_and_never_duplicates() {
        let store = EntityStore::default();

        store.upsert(row("a", 1));
        store.upsert(row("local-1", 2));
        store.upsert(row("c", 3));

        store.replace("local-1", row("b", 2));
        assert_eq!(store.list(), vec![row("a", 1), row("b", 2), row("c", 3)]);

        // A stale row with the confirmed id must not survive next to it
        store.upsert(row("local-2", 4));
        store.replace("local-2", row("a", 5));
        assert_eq!(store.list(), vec![row("a", 5), row("b", 2), row("c", 3)]);
    }

    #[test]
    fn test_replace_in_place_for_same_id() {
        let store = EntityStore::default();

        store.upsert(row("a", 1));
        store.replace("a", row("a", 2));

        assert_eq!(store.list(), vec![row("a", 2)]);
    }

    #[test]
    fn test_snapshot_restore_roundtrip() {
        let store = EntityStore::default();
        store.upsert(row("a", 1));

        let snapshot = store.snapshot();

        store.upsert(row("b", 2));
        store.remove("a");
        store.restore(snapshot);

        assert_eq!(store.list(), vec![row("a", 1)]);
    }
}
