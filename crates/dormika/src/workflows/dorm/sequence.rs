use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use super::domain::RoomKind;

/// Families of generated identifiers. Each family keeps its own counter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SequenceKey {
    Resident,
    Staff,
    Technician,
    Contract,
    Ticket,
    Adjustment,
    Receipt,
    Room(RoomKind),
}

/// Identifier generator owned by a [`Directory`](super::directory::Directory).
///
/// Counters start at 1 and are never shared between directories, so two registries built
/// in the same process hand out the same sequence.
#[derive(Debug, Default, Clone)]
pub struct IdSequence {
    counters: BTreeMap<SequenceKey, u32>,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self, key: SequenceKey) -> u32 {
        let counter = self.counters.entry(key).or_insert(0);
        *counter += 1;
        *counter
    }

    /// `RS-<year>-<seq:04d>`
    pub fn resident(&mut self, on: NaiveDate) -> String {
        let seq = self.next(SequenceKey::Resident);
        format!("RS-{}-{seq:04}", on.year())
    }

    /// `OS-<year>-<seq:04d>`
    pub fn operation_staff(&mut self, on: NaiveDate) -> String {
        let seq = self.next(SequenceKey::Staff);
        format!("OS-{}-{seq:04}", on.year())
    }

    /// `TC-<year>-<seq:04d>`
    pub fn technician(&mut self, on: NaiveDate) -> String {
        let seq = self.next(SequenceKey::Technician);
        format!("TC-{}-{seq:04}", on.year())
    }

    /// `LC-<year><month>-<seq:04d>`, month zero padded.
    pub fn lease_contract(&mut self, on: NaiveDate) -> String {
        let seq = self.next(SequenceKey::Contract);
        format!("LC-{}-{seq:04}", on.format("%Y%m"))
    }

    /// `MT-<yyyymmdd>-building-<seq:04d>`
    pub fn maintenance_ticket(&mut self, on: NaiveDate) -> String {
        let seq = self.next(SequenceKey::Ticket);
        format!("MT-{}-building-{seq:04}", on.format("%Y%m%d"))
    }

    /// `RM-<TYPE>-<building>-<floor>-<seq:04d>`, counted per room type.
    pub fn room(&mut self, kind: RoomKind, building: &str, floor: &str) -> String {
        let seq = self.next(SequenceKey::Room(kind));
        format!("RM-{}-{building}-{floor}-{seq:04}", kind.code())
    }

    /// `ADJ-<yyyymm>-<seq:04d>` for invoices produced by a contract change.
    pub fn adjustment_invoice(&mut self, on: NaiveDate) -> String {
        let seq = self.next(SequenceKey::Adjustment);
        format!("ADJ-{}-{seq:04}", on.format("%Y%m"))
    }

    /// `RC-<yyyymmdd>-<seq:04d>`
    pub fn receipt(&mut self, on: NaiveDate) -> String {
        let seq = self.next(SequenceKey::Receipt);
        format!("RC-{}-{seq:04}", on.format("%Y%m%d"))
    }
}
