use crate::models::sweet::Sweet;
use crate::search::filter::SweetFilter;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, PartialEq)]
pub enum StoreError {
    #[error("a sweet named '{0}' already exists")]
    DuplicateName(String),

    #[error("sweet not found")]
    NotFound,

    #[error("insufficient stock: {requested} requested, {available} available")]
    InsufficientStock { requested: u32, available: u32 },
}

/// Fields to replace on an existing sweet; `None` keeps the stored value
#[derive(Debug, Default)]
pub struct SweetChanges {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<u32>,
}

struct StoredSweet {
    /// Monotonic insertion counter, used for most-recently-created ordering
    seq: u64,
    sweet: Sweet,
}

/// Concurrent in-memory catalog of sweets
///
/// The `names` index maps the case-folded name to the record id and is the
/// uniqueness authority: creates and renames claim a name through the entry
/// API, so two racing creates of the same name resolve to exactly one
/// winner without a separate existence check.
///
/// Stock mutations (`purchase`, `restock`) run under the record's shard
/// write guard, making the check-and-adjust a single indivisible operation.
/// Operations on different sweets only contend at shard granularity.
pub struct SweetStore {
    sweets: DashMap<Uuid, StoredSweet>,
    names: DashMap<String, Uuid>,
    insert_seq: AtomicU64,
}

fn fold(name: &str) -> String {
    name.to_lowercase()
}

impl SweetStore {
    pub fn new() -> Self {
        Self {
            sweets: DashMap::new(),
            names: DashMap::new(),
            insert_seq: AtomicU64::new(0),
        }
    }

    /// Insert a new sweet, failing atomically on a duplicate name
    pub fn insert(
        &self,
        name: String,
        category: String,
        price: f64,
        quantity: u32,
    ) -> Result<Sweet, StoreError> {
        match self.names.entry(fold(&name)) {
            Entry::Occupied(_) => Err(StoreError::DuplicateName(name)),
            Entry::Vacant(slot) => {
                let sweet = Sweet::new(name, category, price, quantity);
                let seq = self.insert_seq.fetch_add(1, Ordering::Relaxed);
                slot.insert(sweet.id);
                self.sweets.insert(
                    sweet.id,
                    StoredSweet {
                        seq,
                        sweet: sweet.clone(),
                    },
                );
                Ok(sweet)
            }
        }
    }

    pub fn get(&self, id: Uuid) -> Option<Sweet> {
        self.sweets.get(&id).map(|entry| entry.sweet.clone())
    }

    /// Replace any subset of fields on the identified sweet
    ///
    /// A rename claims the new name before touching the record, so it cannot
    /// race a concurrent create of the same name.
    pub fn update(&self, id: Uuid, changes: SweetChanges) -> Result<Sweet, StoreError> {
        let mut claimed: Option<String> = None;

        if let Some(new_name) = &changes.name {
            let key = fold(new_name);
            match self.names.entry(key.clone()) {
                Entry::Occupied(slot) => {
                    if *slot.get() != id {
                        return Err(StoreError::DuplicateName(new_name.clone()));
                    }
                }
                Entry::Vacant(slot) => {
                    if !self.sweets.contains_key(&id) {
                        return Err(StoreError::NotFound);
                    }
                    slot.insert(id);
                    claimed = Some(key);
                }
            }
        }

        let mut entry = match self.sweets.get_mut(&id) {
            Some(entry) => entry,
            None => {
                // Record deleted between the name claim and here
                if let Some(key) = claimed {
                    self.names.remove(&key);
                }
                return Err(StoreError::NotFound);
            }
        };

        let old_key = fold(&entry.sweet.name);
        let sweet = &mut entry.sweet;
        if let Some(name) = changes.name {
            sweet.name = name;
        }
        if let Some(category) = changes.category {
            sweet.category = category;
        }
        if let Some(price) = changes.price {
            sweet.price = price;
        }
        if let Some(quantity) = changes.quantity {
            sweet.quantity = quantity;
        }
        sweet.updated_at = Utc::now();
        let updated = sweet.clone();
        drop(entry);

        let new_key = fold(&updated.name);
        if new_key != old_key {
            self.names.remove_if(&old_key, |_, owner| *owner == id);
        }

        Ok(updated)
    }

    /// Permanently remove a sweet, returning the removed record
    pub fn remove(&self, id: Uuid) -> Result<Sweet, StoreError> {
        let (_, stored) = self.sweets.remove(&id).ok_or(StoreError::NotFound)?;
        self.names
            .remove_if(&fold(&stored.sweet.name), |_, owner| *owner == id);
        Ok(stored.sweet)
    }

    /// Atomically decrement stock by `amount` if enough is available
    ///
    /// The availability check and the decrement happen under the record's
    /// write guard: concurrent purchases serialize here and can never drive
    /// the quantity negative or overwrite each other's decrement.
    pub fn purchase(&self, id: Uuid, amount: u32) -> Result<Sweet, StoreError> {
        let mut entry = self.sweets.get_mut(&id).ok_or(StoreError::NotFound)?;
        let sweet = &mut entry.sweet;

        if sweet.quantity < amount {
            return Err(StoreError::InsufficientStock {
                requested: amount,
                available: sweet.quantity,
            });
        }

        sweet.quantity -= amount;
        sweet.updated_at = Utc::now();
        Ok(sweet.clone())
    }

    /// Atomically increment stock by `amount`
    pub fn restock(&self, id: Uuid, amount: u32) -> Result<Sweet, StoreError> {
        let mut entry = self.sweets.get_mut(&id).ok_or(StoreError::NotFound)?;
        let sweet = &mut entry.sweet;

        // Stock saturates rather than wrapping
        sweet.quantity = sweet.quantity.saturating_add(amount);
        sweet.updated_at = Utc::now();
        Ok(sweet.clone())
    }

    /// All sweets matching the filter, most-recently-created first
    pub fn search(&self, filter: &SweetFilter) -> Vec<Sweet> {
        let mut matched: Vec<(u64, Sweet)> = self
            .sweets
            .iter()
            .filter(|entry| filter.matches(&entry.sweet))
            .map(|entry| (entry.seq, entry.sweet.clone()))
            .collect();

        matched.sort_unstable_by(|a, b| b.0.cmp(&a.0));
        matched.into_iter().map(|(_, sweet)| sweet).collect()
    }

    /// All sweets, most-recently-created first
    pub fn list(&self) -> Vec<Sweet> {
        self.search(&SweetFilter::default())
    }

    pub fn len(&self) -> usize {
        self.sweets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sweets.is_empty()
    }
}

impl Default for SweetStore {
    fn default() -> Self {
        Self::new()
    }
}
