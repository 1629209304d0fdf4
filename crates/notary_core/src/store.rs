use std::collections::HashMap;

use crate::{HistoryItem, ItemDetail};

/// Outcome of merging a batch of freshly paginated items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeStats {
    pub inserted: usize,
    pub retained: usize,
}

/// Uniqueness-by-uuid container that only ever grows.
///
/// Items keep their discovery order. A uuid seen again keeps the stored item,
/// so detail obtained between refresh cycles survives the next listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemStore {
    items: Vec<HistoryItem>,
    index: HashMap<String, usize>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, uuid: &str) -> Option<&HistoryItem> {
        self.index.get(uuid).map(|&pos| &self.items[pos])
    }

    pub fn contains(&self, uuid: &str) -> bool {
        self.index.contains_key(uuid)
    }

    /// Items in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryItem> {
        self.items.iter()
    }

    pub fn merge<I>(&mut self, items: I) -> MergeStats
    where
        I: IntoIterator<Item = HistoryItem>,
    {
        let mut stats = MergeStats::default();
        for item in items {
            if self.index.contains_key(&item.uuid) {
                stats.retained += 1;
                continue;
            }
            self.index.insert(item.uuid.clone(), self.items.len());
            self.items.push(item);
            stats.inserted += 1;
        }
        stats
    }

    /// Fills in missing detail URLs. Returns how many items changed.
    ///
    /// A detail for an unknown uuid, or for an item that already has one, is ignored.
    pub fn apply_details<I>(&mut self, details: I) -> usize
    where
        I: IntoIterator<Item = ItemDetail>,
    {
        let mut applied = 0;
        for detail in details {
            let Some(&pos) = self.index.get(&detail.uuid) else {
                continue;
            };
            let item = &mut self.items[pos];
            if item.detail_url.is_none() {
                item.detail_url = Some(detail.detail_url);
                applied += 1;
            }
        }
        applied
    }

    /// Uuids still lacking a detail URL, in discovery order.
    pub fn missing_details(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|item| !item.has_detail())
            .map(|item| item.uuid.clone())
            .collect()
    }

    /// Presentation order: most recent submission first, ties by discovery order.
    pub fn newest_first(&self) -> Vec<&HistoryItem> {
        let mut rows: Vec<&HistoryItem> = self.items.iter().collect();
        rows.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        rows
    }
}

impl FromIterator<HistoryItem> for ItemStore {
    fn from_iter<T: IntoIterator<Item = HistoryItem>>(iter: T) -> Self {
        let mut store = ItemStore::new();
        store.merge(iter);
        store
    }
}

/// Additive merge of `new_items` into `existing`.
pub fn merge<I>(mut existing: ItemStore, new_items: I) -> ItemStore
where
    I: IntoIterator<Item = HistoryItem>,
{
    existing.merge(new_items);
    existing
}
