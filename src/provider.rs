//! Cart provider and context
//!
//! The provider owns initialization; UI components receive a cloned
//! [`CartContext`] from it and never touch the store directly. Using the
//! context before the provider is initialized is a configuration error.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::config::CartConfig;
use crate::error::{CartError, Result};
use crate::item::{NewProduct, Product};
use crate::storage::KeyValueStore;
use crate::store::CartStore;

type Listener = Rc<dyn Fn(&[Product])>;

/// Handle returned by [`CartContext::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Numeric form, for handing across an FFI boundary
    pub fn as_raw(self) -> u64 {
        self.0
    }

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

struct Shared {
    store: RefCell<CartStore<Box<dyn KeyValueStore>>>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_subscription: Cell<u64>,
}

/// Shared cart handle for UI components. Cloning is cheap; all clones see
/// the same cart.
#[derive(Clone)]
pub struct CartContext {
    inner: Rc<Shared>,
}

impl CartContext {
    fn new(store: CartStore<Box<dyn KeyValueStore>>) -> Self {
        Self {
            inner: Rc::new(Shared {
                store: RefCell::new(store),
                listeners: RefCell::new(Vec::new()),
                next_subscription: Cell::new(0),
            }),
        }
    }

    /// Snapshot of the current lines
    pub fn products(&self) -> Vec<Product> {
        self.inner.store.borrow().products().to_vec()
    }

    /// Borrow the current lines without cloning them
    pub fn with_products<R>(&self, f: impl FnOnce(&[Product]) -> R) -> R {
        f(self.inner.store.borrow().products())
    }

    pub fn total_quantity(&self) -> u64 {
        self.inner.store.borrow().cart().total_quantity()
    }

    pub fn total_price(&self) -> f64 {
        self.inner.store.borrow().cart().total_price()
    }

    pub fn add_to_cart(&self, item: NewProduct) -> Result<()> {
        self.apply(|store| store.add_to_cart(item).map(|()| true))
            .map(|_| ())
    }

    pub fn increment(&self, id: &str) -> Result<bool> {
        self.apply(|store| store.increment(id))
    }

    pub fn decrement(&self, id: &str) -> Result<bool> {
        self.apply(|store| store.decrement(id))
    }

    /// Run a store mutation, then notify subscribers if the cart changed.
    ///
    /// Apart from rejections, store errors only arise after the in-memory
    /// change, so subscribers are notified on those as well.
    fn apply(
        &self,
        op: impl FnOnce(&mut CartStore<Box<dyn KeyValueStore>>) -> Result<bool>,
    ) -> Result<bool> {
        let result = {
            let mut store = self.inner.store.borrow_mut();
            op(&mut *store)
        };
        let changed = match &result {
            Ok(changed) => *changed,
            Err(e) => !e.is_rejection(),
        };
        if changed {
            self.notify();
        }
        result
    }

    /// Register a callback invoked with the current lines after every change
    pub fn subscribe(&self, listener: impl Fn(&[Product]) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_subscription.get());
        self.inner.next_subscription.set(id.0 + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(sid, _)| *sid != id);
        listeners.len() != before
    }

    fn notify(&self) {
        // Release both borrows before calling out; listeners may use the
        // context again.
        let snapshot = self.products();
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(&snapshot);
        }
    }
}

/// Owns the cart's lifetime and hands out contexts
#[derive(Default)]
pub struct CartProvider {
    context: Option<CartContext>,
}

impl CartProvider {
    /// Uninitialized provider
    pub fn new() -> Self {
        Self { context: None }
    }

    /// Load the persisted cart and start serving contexts.
    ///
    /// The cart is loaded exactly once; calling this again returns the
    /// existing context and ignores the arguments.
    pub fn init<S>(&mut self, storage: S, config: &CartConfig) -> CartContext
    where
        S: KeyValueStore + 'static,
    {
        if let Some(context) = &self.context {
            log::warn!("Cart provider already initialized, ignoring init");
            return context.clone();
        }
        let storage: Box<dyn KeyValueStore> = Box::new(storage);
        let context = CartContext::new(CartStore::open(storage, config));
        self.context = Some(context.clone());
        context
    }

    pub fn is_initialized(&self) -> bool {
        self.context.is_some()
    }

    /// Context for a consumer, or `NotInitialized` outside an initialized
    /// provider
    pub fn use_cart(&self) -> Result<CartContext> {
        self.context.clone().ok_or(CartError::NotInitialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn item(id: &str) -> NewProduct {
        NewProduct::new(id, "T", "u", 10.0)
    }

    fn ready() -> (CartProvider, CartContext) {
        let mut provider = CartProvider::new();
        let ctx = provider.init(MemoryStorage::new(), &CartConfig::default());
        (provider, ctx)
    }

    #[test]
    fn test_use_before_init_is_configuration_error() {
        let provider = CartProvider::new();
        assert!(!provider.is_initialized());
        let err = provider.use_cart().err().unwrap();
        assert!(matches!(err, CartError::NotInitialized));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_contexts_share_state() {
        let (provider, ctx) = ready();
        let other = provider.use_cart().unwrap();
        ctx.add_to_cart(item("a")).unwrap();
        other.increment("a").unwrap();
        assert_eq!(ctx.products()[0].quantity, 2);
        assert_eq!(other.total_quantity(), 2);
        assert!((ctx.total_price() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_init_loads_persisted_cart_once() {
        let json = r#"[{"id":"a","title":"T","image_url":"u","price":1.0,"quantity":3}]"#;
        let storage = MemoryStorage::new().with_entry("@Challenge08:products", json);
        let mut provider = CartProvider::new();
        let ctx = provider.init(storage, &CartConfig::default());
        assert_eq!(ctx.products()[0].quantity, 3);

        ctx.increment("a").unwrap();
        // Second init must not reload or replace the cart
        let again = provider.init(MemoryStorage::new(), &CartConfig::default());
        assert_eq!(again.products()[0].quantity, 4);
    }

    #[test]
    fn test_subscribers_see_changes_only() {
        let (_provider, ctx) = ready();
        let seen = Rc::new(RefCell::new(Vec::<u64>::new()));
        let sink = Rc::clone(&seen);
        let id = ctx.subscribe(move |products| {
            sink.borrow_mut()
                .push(products.iter().map(|p| u64::from(p.quantity)).sum());
        });

        ctx.add_to_cart(item("a")).unwrap();
        ctx.increment("a").unwrap();
        ctx.increment("missing").unwrap();
        ctx.decrement("a").unwrap();
        ctx.decrement("a").unwrap();
        ctx.decrement("a").unwrap();
        assert_eq!(*seen.borrow(), vec![1, 2, 1, 0]);

        assert!(ctx.unsubscribe(id));
        assert!(!ctx.unsubscribe(id));
        ctx.increment("a").unwrap();
        assert_eq!(seen.borrow().len(), 4);
    }

    #[test]
    fn test_unsubscribe_by_raw_id() {
        let (_provider, ctx) = ready();
        let calls = Rc::new(Cell::new(0));
        let first = Rc::clone(&calls);
        let second = Rc::clone(&calls);
        let a = ctx.subscribe(move |_| first.set(first.get() + 1));
        let b = ctx.subscribe(move |_| second.set(second.get() + 10));
        assert_ne!(a.as_raw(), b.as_raw());

        ctx.add_to_cart(item("a")).unwrap();
        assert_eq!(calls.get(), 11);

        assert!(ctx.unsubscribe(SubscriptionId::from_raw(b.as_raw())));
        ctx.increment("a").unwrap();
        assert_eq!(calls.get(), 12);

        assert!(ctx.unsubscribe(SubscriptionId::from_raw(a.as_raw())));
        ctx.increment("a").unwrap();
        assert_eq!(calls.get(), 12);
        assert!(!ctx.unsubscribe(SubscriptionId::from_raw(99)));
    }

    #[test]
    fn test_rejected_add_does_not_notify() {
        let (_provider, ctx) = ready();
        let calls = Rc::new(Cell::new(0));
        let sink = Rc::clone(&calls);
        ctx.subscribe(move |_| sink.set(sink.get() + 1));

        let err = ctx
            .add_to_cart(NewProduct::new("a", "T", "u", f64::INFINITY))
            .unwrap_err();
        assert!(err.is_rejection());
        assert_eq!(calls.get(), 0);
        assert!(ctx.products().is_empty());
    }

    #[test]
    fn test_subscriber_may_reenter_context() {
        let (_provider, ctx) = ready();
        let totals = Rc::new(Cell::new(0u64));
        let sink = Rc::clone(&totals);
        let inner = ctx.clone();
        ctx.subscribe(move |_| sink.set(inner.total_quantity()));

        ctx.add_to_cart(item("a")).unwrap();
        ctx.add_to_cart(item("b")).unwrap();
        assert_eq!(totals.get(), 2);
    }

    #[test]
    fn test_subscribers_notified_when_save_fails() {
        let mut storage = MemoryStorage::new();
        storage.fail_writes(true);
        let mut provider = CartProvider::new();
        let ctx = provider.init(storage, &CartConfig::default());

        let calls = Rc::new(Cell::new(0));
        let sink = Rc::clone(&calls);
        ctx.subscribe(move |_| sink.set(sink.get() + 1));

        let err = ctx.add_to_cart(item("a")).unwrap_err();
        assert!(matches!(err, CartError::Persistence(_)));
        assert_eq!(calls.get(), 1);
        assert_eq!(ctx.products().len(), 1);
    }
}
