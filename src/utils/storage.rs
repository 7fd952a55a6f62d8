//! Key-value storage shared between browser tabs.
//!
//! [`BrowserStorage`] is backed by `window.localStorage` and the `storage`
//! event. [`MemoryStorage`] keeps the same contract in memory: handles opened
//! with [`MemoryStorage::open_tab`] share one storage area, and a write through
//! one handle notifies subscribers on every *other* handle, never its own.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;
use web_sys::StorageEvent;

use super::dom;
use crate::core::error::StorageError;

/// Synchronous string storage (the `localStorage` surface we use).
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// A write to a watched key made by another tab.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageChange {
    pub key: String,
    /// `None` when the key was removed or the storage cleared.
    pub new_value: Option<String>,
}

/// Notifications of writes made by other browsing contexts.
pub trait StorageEvents {
    /// Call `handler` whenever another tab writes `key`.
    ///
    /// The handler stays registered until the returned [`Subscription`] is dropped.
    fn subscribe(&self, key: &str, handler: Rc<dyn Fn(&StorageChange)>) -> Subscription;
}

/// Unsubscribes on drop.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A subscription that was never registered.
    pub fn inert() -> Self {
        Self { cancel: None }
    }

    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

// ============================================================================
// BrowserStorage
// ============================================================================

/// `window.localStorage` plus the `storage` event.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    /// Whether localStorage can be used (fails in some private modes).
    pub fn is_available() -> bool {
        dom::local_storage().is_some()
    }
}

impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        dom::local_storage()?.get_item(key).ok()?
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = dom::local_storage().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|_| StorageError::WriteFailed(key.to_string()))
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let storage = dom::local_storage().ok_or(StorageError::Unavailable)?;
        storage
            .remove_item(key)
            .map_err(|_| StorageError::RemoveFailed(key.to_string()))
    }
}

impl StorageEvents for BrowserStorage {
    fn subscribe(&self, key: &str, handler: Rc<dyn Fn(&StorageChange)>) -> Subscription {
        let Some(window) = dom::window() else {
            return Subscription::inert();
        };

        let watched = key.to_string();
        let closure = Closure::<dyn Fn(StorageEvent)>::new(move |event: StorageEvent| {
            // A null key means localStorage.clear() in the other tab.
            match event.key() {
                Some(changed) if changed == watched => handler(&StorageChange {
                    key: changed,
                    new_value: event.new_value(),
                }),
                None => handler(&StorageChange {
                    key: watched.clone(),
                    new_value: None,
                }),
                Some(_) => {}
            }
        });

        if window
            .add_event_listener_with_callback("storage", closure.as_ref().unchecked_ref())
            .is_err()
        {
            log::warn!("failed to register storage listener for {}", key);
            return Subscription::inert();
        }

        Subscription::new(move || {
            let _ = window
                .remove_event_listener_with_callback("storage", closure.as_ref().unchecked_ref());
        })
    }
}

// ============================================================================
// MemoryStorage
// ============================================================================

struct Listener {
    id: u64,
    tab: u64,
    key: String,
    handler: Rc<dyn Fn(&StorageChange)>,
}

#[derive(Default)]
struct Area {
    items: HashMap<String, String>,
    listeners: Vec<Listener>,
    next_listener: u64,
    next_tab: u64,
}

/// In-memory storage area, used when localStorage is unavailable and in tests.
#[derive(Clone)]
pub struct MemoryStorage {
    area: Rc<RefCell<Area>>,
    tab: u64,
}

impl MemoryStorage {
    /// Create a fresh storage area with a single tab.
    pub fn new() -> Self {
        Self {
            area: Rc::new(RefCell::new(Area {
                next_tab: 1,
                ..Area::default()
            })),
            tab: 0,
        }
    }

    /// Open another tab on the same storage area.
    pub fn open_tab(&self) -> Self {
        let tab = {
            let mut area = self.area.borrow_mut();
            let tab = area.next_tab;
            area.next_tab += 1;
            tab
        };
        Self {
            area: Rc::clone(&self.area),
            tab,
        }
    }

    /// Number of listeners registered across all tabs.
    pub fn listener_count(&self) -> usize {
        self.area.borrow().listeners.len()
    }

    fn notify_other_tabs(&self, key: &str, new_value: Option<String>) {
        // Collect first: handlers may write back into the area.
        let handlers: Vec<_> = self
            .area
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.tab != self.tab && l.key == key)
            .map(|l| Rc::clone(&l.handler))
            .collect();

        let change = StorageChange {
            key: key.to_string(),
            new_value,
        };
        for handler in handlers {
            handler(&change);
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.area.borrow().items.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let previous = self
            .area
            .borrow_mut()
            .items
            .insert(key.to_string(), value.to_string());
        // Browsers skip the event when the value is unchanged.
        if previous.as_deref() != Some(value) {
            self.notify_other_tabs(key, Some(value.to_string()));
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let previous = self.area.borrow_mut().items.remove(key);
        if previous.is_some() {
            self.notify_other_tabs(key, None);
        }
        Ok(())
    }
}

impl StorageEvents for MemoryStorage {
    fn subscribe(&self, key: &str, handler: Rc<dyn Fn(&StorageChange)>) -> Subscription {
        let id = {
            let mut area = self.area.borrow_mut();
            let id = area.next_listener;
            area.next_listener += 1;
            area.listeners.push(Listener {
                id,
                tab: self.tab,
                key: key.to_string(),
                handler,
            });
            id
        };

        let area = Rc::downgrade(&self.area);
        Subscription::new(move || {
            if let Some(area) = area.upgrade() {
                area.borrow_mut().listeners.retain(|l| l.id != id);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<StorageChange>>>, Rc<dyn Fn(&StorageChange)>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, Rc::new(move |c: &StorageChange| sink.borrow_mut().push(c.clone())))
    }

    #[test]
    fn test_tabs_share_items() {
        let a = MemoryStorage::new();
        let b = a.open_tab();
        a.set_item("wallets", "[]").unwrap();
        assert_eq!(b.get_item("wallets").as_deref(), Some("[]"));
        b.remove_item("wallets").unwrap();
        assert_eq!(a.get_item("wallets"), None);
    }

    #[test]
    fn test_write_notifies_other_tabs_only() {
        let a = MemoryStorage::new();
        let b = a.open_tab();
        let (seen_a, handler_a) = recorder();
        let (seen_b, handler_b) = recorder();
        let _sub_a = a.subscribe("wallets", handler_a);
        let _sub_b = b.subscribe("wallets", handler_b);

        a.set_item("wallets", "[1]").unwrap();

        assert!(seen_a.borrow().is_empty());
        assert_eq!(
            *seen_b.borrow(),
            vec![StorageChange {
                key: "wallets".into(),
                new_value: Some("[1]".into()),
            }]
        );
    }

    #[test]
    fn test_unchanged_value_does_not_notify() {
        let a = MemoryStorage::new();
        let b = a.open_tab();
        let (seen, handler) = recorder();
        let _sub = b.subscribe("k", handler);

        a.set_item("k", "v").unwrap();
        a.set_item("k", "v").unwrap();
        a.remove_item("missing").unwrap();

        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_remove_notifies_with_none() {
        let a = MemoryStorage::new();
        let b = a.open_tab();
        a.set_item("k", "v").unwrap();
        let (seen, handler) = recorder();
        let _sub = b.subscribe("k", handler);

        a.remove_item("k").unwrap();

        assert_eq!(seen.borrow()[0].new_value, None);
    }

    #[test]
    fn test_other_keys_ignored() {
        let a = MemoryStorage::new();
        let b = a.open_tab();
        let (seen, handler) = recorder();
        let _sub = b.subscribe("wallets", handler);

        a.set_item("manualWalletAddress", "null").unwrap();

        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_drop_unsubscribes() {
        let a = MemoryStorage::new();
        let b = a.open_tab();
        let (seen, handler) = recorder();
        let sub = b.subscribe("k", handler);
        assert!(sub.is_active());
        assert_eq!(a.listener_count(), 1);

        drop(sub);
        a.set_item("k", "v").unwrap();

        assert_eq!(a.listener_count(), 0);
        assert!(seen.borrow().is_empty());
    }
}
