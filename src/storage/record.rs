//! Binding between record types and their store collections

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::model::{ParkingLot, ParkingSession, RecordId, RecordKind, Vehicle};

use super::table::{Table, TableState, Tables, TablesView};

/// A record type the store can hold.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: RecordKind;

    fn id(&self) -> RecordId;

    fn set_id(&mut self, id: RecordId);

    /// The live table holding this record type.
    fn table(tables: &Tables) -> &Table<Self>;

    /// This record type's slot in a borrowed view.
    fn view_slot<'v, 'a>(view: &'v mut TablesView<'a>) -> &'v mut &'a TableState<Self>;
}

impl Record for ParkingLot {
    const KIND: RecordKind = RecordKind::ParkingLot;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.parking_lots
    }

    fn view_slot<'v, 'a>(view: &'v mut TablesView<'a>) -> &'v mut &'a TableState<Self> {
        &mut view.parking_lots
    }
}

impl Record for Vehicle {
    const KIND: RecordKind = RecordKind::Vehicle;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.vehicles
    }

    fn view_slot<'v, 'a>(view: &'v mut TablesView<'a>) -> &'v mut &'a TableState<Self> {
        &mut view.vehicles
    }
}

impl Record for ParkingSession {
    const KIND: RecordKind = RecordKind::ParkingSession;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.parking_sessions
    }

    fn view_slot<'v, 'a>(view: &'v mut TablesView<'a>) -> &'v mut &'a TableState<Self> {
        &mut view.parking_sessions
    }
}
