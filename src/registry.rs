use crate::models::{
    Coach, Counter, InventoryItem, ServiceTicket, Staff, TicketSalesRecord, Transaction, Trip,
    User,
};
use crate::seed;
use std::sync::atomic::{AtomicU64, Ordering};

static ID_SEQ: AtomicU64 = AtomicU64::new(0);

/// Time-derived entity id with a short per-process sequence suffix so two
/// creations inside the same millisecond stay distinct.
pub fn time_id(prefix: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let seq = ID_SEQ.fetch_add(1, Ordering::Relaxed) % 1000;
    format!("{prefix}{millis}{seq:03}")
}

pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

pub trait HasId {
    fn id(&self) -> &str;
}

macro_rules! impl_has_id {
    ($($ty:ty),+ $(,)?) => {
        $(impl HasId for $ty {
            fn id(&self) -> &str {
                &self.id
            }
        })+
    };
}

impl_has_id!(
    User,
    Coach,
    Trip,
    InventoryItem,
    Transaction,
    Staff,
    TicketSalesRecord,
    Counter,
    ServiceTicket,
);

pub fn find_by_id<'a, T: HasId>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|item| item.id() == id)
}

pub fn find_by_id_mut<'a, T: HasId>(items: &'a mut [T], id: &str) -> Option<&'a mut T> {
    items.iter_mut().find(|item| item.id() == id)
}

/// Full-record replace; returns false when no row carries the id.
pub fn replace_by_id<T: HasId>(items: &mut Vec<T>, id: &str, updated: T) -> bool {
    match items.iter_mut().find(|item| item.id() == id) {
        Some(slot) => {
            *slot = updated;
            true
        }
        None => false,
    }
}

pub fn remove_by_id<T: HasId>(items: &mut Vec<T>, id: &str) -> Option<T> {
    let pos = items.iter().position(|item| item.id() == id)?;
    Some(items.remove(pos))
}

/// Every entity collection, owned by one controller (AppState) and handed
/// to command handlers by reference. New rows are prepended so the most
/// recent entry lists first, matching the ledger ordering clients expect.
#[derive(Debug, Default)]
pub struct Registry {
    pub users: Vec<User>,
    pub coaches: Vec<Coach>,
    pub trips: Vec<Trip>,
    pub transactions: Vec<Transaction>,
    pub inventory: Vec<InventoryItem>,
    pub staff: Vec<Staff>,
    pub ticket_sales: Vec<TicketSalesRecord>,
    pub counters: Vec<Counter>,
    pub service_tickets: Vec<ServiceTicket>,
}

impl Registry {
    pub fn seeded() -> Self {
        Self {
            users: seed::users(),
            coaches: seed::coaches(),
            trips: seed::trips(),
            transactions: seed::transactions(),
            inventory: seed::inventory(),
            staff: seed::staff(),
            ticket_sales: seed::ticket_sales(),
            counters: seed::counters(),
            service_tickets: Vec::new(),
        }
    }

    /// Super-admin data reset: every collection back to its seeded state.
    pub fn reset(&mut self) {
        *self = Self::seeded();
    }
}
