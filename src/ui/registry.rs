//! Checked component registry shared by every component kind.
//!
//! Components live in a generational arena and are addressed internally by
//! typed keys; string IDs exist only at the authoring boundary. Every failed
//! lookup or validation is logged at ERROR where it happens.

use std::collections::HashMap;

use indexmap::IndexMap;
use slotmap::{Key, SlotMap, new_key_type};

use crate::error::UiError;

use super::components::{EventKind, Signal};

new_key_type! {
    pub struct CaptionKey;
    pub struct BackgroundKey;
    pub struct ScrollBarKey;
    pub struct GroupKey;
}

pub type Callback = Box<dyn FnMut(&Signal)>;

/// Log `err` and hand it back, so callers can write `Err(fail(..))`.
pub(crate) fn fail(err: UiError) -> UiError {
    log::error!("{err}");
    err
}

struct Entry<T> {
    id: String,
    value: T,
}

pub struct Registry<K: Key, T> {
    kind: &'static str,
    items: SlotMap<K, Entry<T>>,
    /// Creation order; also the draw order within the kind.
    ids: IndexMap<String, K>,
    callbacks: HashMap<(K, EventKind), Callback>,
}

impl<K: Key, T> Registry<K, T> {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            items: SlotMap::with_key(),
            ids: IndexMap::new(),
            callbacks: HashMap::new(),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    /// Rejects blank and already-used IDs.
    pub fn insert(&mut self, id: &str, value: T) -> Result<K, UiError> {
        if id.trim().is_empty() {
            return Err(fail(UiError::InvalidId { kind: self.kind }));
        }
        if self.ids.contains_key(id) {
            return Err(fail(UiError::Duplicate { kind: self.kind, id: id.to_owned() }));
        }
        let key = self.items.insert(Entry { id: id.to_owned(), value });
        self.ids.insert(id.to_owned(), key);
        log::debug!("created {} '{id}'", self.kind);
        Ok(key)
    }

    /// Remove `id` together with every callback bound to it.
    pub fn remove(&mut self, id: &str) -> Result<T, UiError> {
        let removed = self.ids.shift_remove(id).and_then(|key| self.items.remove(key).map(|e| (key, e.value)));
        let Some((key, value)) = removed else {
            return Err(self.not_found(id));
        };
        self.callbacks.retain(|(k, _), _| *k != key);
        log::debug!("destroyed {} '{id}'", self.kind);
        Ok(value)
    }

    pub fn key(&self, id: &str) -> Result<K, UiError> {
        self.ids.get(id).copied().ok_or_else(|| self.not_found(id))
    }

    pub fn get(&self, id: &str) -> Result<&T, UiError> {
        let key = self.key(id)?;
        self.items.get(key).map(|e| &e.value).ok_or_else(|| self.not_found(id))
    }

    pub fn get_mut(&mut self, id: &str) -> Result<&mut T, UiError> {
        let key = self.key(id)?;
        match self.items.get_mut(key) {
            Some(e) => Ok(&mut e.value),
            None => Err(fail(UiError::NotFound { kind: self.kind, id: id.to_owned() })),
        }
    }

    /// Stale keys simply miss; no logging.
    pub fn get_by_key(&self, key: K) -> Option<&T> {
        self.items.get(key).map(|e| &e.value)
    }

    pub fn get_by_key_mut(&mut self, key: K) -> Option<&mut T> {
        self.items.get_mut(key).map(|e| &mut e.value)
    }

    pub fn id_of(&self, key: K) -> Option<&str> {
        self.items.get(key).map(|e| e.id.as_str())
    }

    /// Keys in creation order.
    pub fn keys(&self) -> Vec<K> {
        self.ids.values().copied().collect()
    }

    /// `(key, id, value)` in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &str, &T)> {
        self.ids
            .iter()
            .filter_map(|(id, key)| self.items.get(*key).map(|e| (*key, id.as_str(), &e.value)))
    }

    /// Bind `callback` to `(id, event)`, replacing any earlier binding.
    pub fn set_callback(&mut self, id: &str, event: EventKind, callback: Callback) -> Result<(), UiError> {
        let key = self.key(id)?;
        self.callbacks.insert((key, event), callback);
        Ok(())
    }

    pub fn has_callback(&self, key: K, event: EventKind) -> bool {
        self.callbacks.contains_key(&(key, event))
    }

    pub fn callback_count(&self) -> usize {
        self.callbacks.len()
    }

    /// Call the callback bound to `(key, signal.kind)`, if any.
    pub fn invoke(&mut self, key: K, signal: &Signal) -> bool {
        match self.callbacks.get_mut(&(key, signal.kind)) {
            Some(callback) => {
                callback(signal);
                true
            }
            None => false,
        }
    }

    fn not_found(&self, id: &str) -> UiError {
        fail(UiError::NotFound { kind: self.kind, id: id.to_owned() })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use glam::Vec2;

    use super::*;

    fn registry() -> Registry<GroupKey, u32> {
        Registry::new("Test")
    }

    #[test]
    fn stale_key_misses_after_reinsert() {
        let mut r = registry();
        let old = r.insert("a", 1).unwrap();
        r.remove("a").unwrap();
        let new = r.insert("a", 2).unwrap();
        assert_ne!(old, new);
        assert!(r.get_by_key(old).is_none());
        assert_eq!(r.get_by_key(new), Some(&2));
    }

    #[test]
    fn remove_drops_callbacks_and_misses_twice() {
        let mut r = registry();
        let key = r.insert("g", 7).unwrap();
        r.set_callback("g", EventKind::MousePressed, Box::new(|_| {})).unwrap();

        assert_eq!(r.remove("g").unwrap(), 7);
        assert!(!r.has_callback(key, EventKind::MousePressed));
        assert_eq!(r.callback_count(), 0);
        assert!(r.is_empty());
        assert!(matches!(r.remove("g"), Err(UiError::NotFound { kind: "Test", .. })));
    }

    #[test]
    fn iter_keeps_creation_order_after_removal() {
        let mut r = registry();
        for (i, id) in ["c", "a", "b"].into_iter().enumerate() {
            r.insert(id, i as u32).unwrap();
        }
        r.remove("a").unwrap();
        let ids: Vec<&str> = r.iter().map(|(_, id, _)| id).collect();
        assert_eq!(ids, ["c", "b"]);
    }

    #[test]
    fn invoke_only_matches_bound_event() {
        let mut r = registry();
        let key = r.insert("g", 0).unwrap();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        r.set_callback("g", EventKind::MousePressed, Box::new(move |_| h.set(h.get() + 1))).unwrap();

        let signal = |kind| Signal { source: "g".into(), kind, position: Vec2::ZERO };
        assert!(r.has_callback(key, EventKind::MousePressed));
        assert!(r.invoke(key, &signal(EventKind::MousePressed)));
        assert!(!r.invoke(key, &signal(EventKind::MouseReleased)));
        assert_eq!(hits.get(), 1);
    }
}
