use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::rate_window::{RateWindow, WindowKey, WindowStore};

/// Rate windows in a sharded concurrent map.
///
/// `update` holds the key's shard lock for the whole closure, so concurrent
/// checks on one key are applied one at a time.
#[derive(Default)]
pub struct DashMapWindowStore {
    windows: DashMap<WindowKey, RateWindow>,
}

impl DashMapWindowStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WindowStore for DashMapWindowStore {
    fn get(&self, key: &WindowKey) -> Option<RateWindow> {
        self.windows.get(key).map(|w| *w)
    }

    fn update(&self, key: WindowKey, apply: &mut dyn FnMut(&mut Option<RateWindow>)) {
        match self.windows.entry(key) {
            Entry::Occupied(mut occupied) => {
                let mut slot = Some(*occupied.get());
                apply(&mut slot);
                match slot {
                    Some(window) => {
                        occupied.insert(window);
                    }
                    None => {
                        occupied.remove();
                    }
                }
            }
            Entry::Vacant(vacant) => {
                let mut slot = None;
                apply(&mut slot);
                if let Some(window) = slot {
                    vacant.insert(window);
                }
            }
        }
    }

    fn sweep(&self, now_ms: i64) -> usize {
        let mut evicted = 0;
        self.windows.retain(|_, window| {
            let keep = !window.is_expired_at(now_ms);
            if !keep {
                evicted += 1;
            }
            keep
        });
        evicted
    }

    fn len(&self) -> usize {
        self.windows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_inserts_and_removes() {
        let store = DashMapWindowStore::new();
        let key = WindowKey::new("1.1.1.1", "/abc");

        store.update(key.clone(), &mut |slot| {
            assert!(slot.is_none());
            *slot = Some(RateWindow { count: 1, reset_at_ms: 100 });
        });
        assert_eq!(store.get(&key).map(|w| w.count), Some(1));

        store.update(key.clone(), &mut |slot| *slot = None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_sweep_counts_evictions() {
        let store = DashMapWindowStore::new();
        for (i, reset_at_ms) in [10, 20, 30].into_iter().enumerate() {
            store.update(WindowKey::new(i.to_string(), "/x"), &mut |slot| {
                *slot = Some(RateWindow { count: 1, reset_at_ms });
            });
        }

        assert_eq!(store.sweep(20), 2);
        assert_eq!(store.len(), 1);
    }
}
