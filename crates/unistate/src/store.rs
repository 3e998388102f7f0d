//! Store - holds the state tree and runs every transition through the reducer
//!
//! The loop is:
//! 1. `dispatch` validates the action
//! 2. the reducer computes the next state from the current one
//! 3. the new state is committed
//! 4. the tracer and then every listener (in registration order) are called
//!
//! A reducer may not dispatch. Listeners run after the dispatch guard is
//! released, so they may.

use crate::action::{create_action, Action, STORE_INIT};
use crate::error::StoreError;
use crate::options::StoreOptions;
use crate::reducer::{BoxedReducer, ReducerResult};
use crate::tracer::Tracer;
use crate::value::Value;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Callback invoked after every committed dispatch
///
/// Listeners are identified by their allocation: subscribing the same `Rc`
/// twice registers it twice.
pub type Listener = Rc<dyn Fn()>;

/// Callback run once while the store is being built, before the init dispatch
pub type Setup = Box<dyn FnOnce(&StoreView)>;

struct StoreInner {
    reducer: BoxedReducer,
    state: RefCell<Option<Value>>,
    listeners: RefCell<Vec<Listener>>,
    dispatching: Cell<bool>,
    tracer: Box<dyn Tracer>,
    label: String,
}

impl StoreInner {
    fn state(&self) -> Option<Value> {
        self.state.borrow().clone()
    }

    fn subscribe(self: &Rc<Self>, listener: Listener) -> Unsubscribe {
        self.listeners.borrow_mut().push(listener.clone());
        Unsubscribe {
            store: Rc::downgrade(self),
            listener,
        }
    }

    fn dispatch(&self, action: Value) -> Result<Action, StoreError> {
        let action = Action::try_from(action)?;

        let next = {
            let _guard = DispatchGuard::acquire(&self.dispatching, &action)?;
            // No borrow is held while the reducer runs
            let current = self.state();
            let next = (self.reducer)(current.as_ref(), &action)?;
            *self.state.borrow_mut() = Some(next.clone());
            next
        };

        // Snapshot, so listeners may (un)subscribe while being notified
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        self.tracer.trace(&action, &next, listeners.len());

        for listener in &listeners {
            listener();
        }

        Ok(action)
    }
}

/// Marks a dispatch as in progress until dropped
///
/// Released on every exit path, including reducer errors and panics.
struct DispatchGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> DispatchGuard<'a> {
    fn acquire(flag: &'a Cell<bool>, action: &Action) -> Result<Self, StoreError> {
        if flag.replace(true) {
            return Err(StoreError::UnexpectedDispatch(action.to_string()));
        }
        Ok(Self { flag })
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

/// Handle to a store
///
/// Cloning the handle shares the same store. All state transitions go
/// through [`Store::dispatch`].
///
/// The reducer must be a function:
///
/// ```compile_fail
/// let store = unistate::create_store(42, None, Vec::new());
/// ```
///
/// and so must listeners:
///
/// ```compile_fail
/// # use unistate::{create_store, Action, ReducerResult, Value};
/// # fn keep(state: Option<&Value>, _: &Action) -> ReducerResult { Ok(state.cloned().unwrap_or_default()) }
/// let store = create_store(keep, None, Vec::new()).unwrap();
/// store.subscribe(42);
/// ```
#[derive(Clone)]
pub struct Store {
    inner: Rc<StoreInner>,
}

impl Store {
    /// Start building a store around `reducer`
    pub fn builder<F>(reducer: F) -> StoreBuilder
    where
        F: Fn(Option<&Value>, &Action) -> ReducerResult + 'static,
    {
        StoreBuilder {
            reducer: Box::new(reducer),
            preloaded_state: None,
            setups: Vec::new(),
            tracer: None,
            options: StoreOptions::default(),
        }
    }

    /// Apply `action` through the reducer, commit the result and notify listeners
    ///
    /// Returns the validated action. Fails when `action` is not a record, has
    /// no `type`, when called from inside a reducer, or when the reducer
    /// fails. On failure the previously committed state stays in place.
    pub fn dispatch(&self, action: impl Into<Value>) -> Result<Action, StoreError> {
        self.inner.dispatch(action.into()).inspect_err(|err| {
            log::warn!("[{}] Dispatch rejected: {}", self.inner.label, err);
        })
    }

    /// Current state
    ///
    /// The returned value shares the committed tree; it can't be changed and
    /// later dispatches never alter it.
    pub fn get_state(&self) -> Value {
        self.inner.state().unwrap_or_default()
    }

    /// Register `listener`; it is called after every committed dispatch
    pub fn subscribe(&self, listener: Listener) -> Unsubscribe {
        self.inner.subscribe(listener)
    }

    /// Read/subscribe capability that does not keep the store alive
    pub fn view(&self) -> StoreView {
        StoreView {
            store: Rc::downgrade(&self.inner),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// True while the reducer is running
    pub fn is_dispatching(&self) -> bool {
        self.inner.dispatching.get()
    }

    pub fn label(&self) -> &str {
        &self.inner.label
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("label", &self.inner.label)
            .field("state", &self.inner.state())
            .field("listeners", &self.listener_count())
            .field("dispatching", &self.is_dispatching())
            .finish()
    }
}

/// Builder for [`Store`]
pub struct StoreBuilder {
    reducer: BoxedReducer,
    preloaded_state: Option<Value>,
    setups: Vec<Setup>,
    tracer: Option<Box<dyn Tracer>>,
    options: StoreOptions,
}

impl StoreBuilder {
    /// Initial state, handed to the reducer with the init action
    pub fn preloaded_state(mut self, state: impl Into<Value>) -> Self {
        self.preloaded_state = Some(state.into());
        self
    }

    /// Run `setup` once during construction, before the init dispatch
    pub fn setup<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&StoreView) + 'static,
    {
        self.setups.push(Box::new(setup));
        self
    }

    pub fn setups(mut self, setups: impl IntoIterator<Item = Setup>) -> Self {
        self.setups.extend(setups);
        self
    }

    /// Replace the tracer derived from the options
    pub fn tracer(mut self, tracer: impl Tracer + 'static) -> Self {
        self.tracer = Some(Box::new(tracer));
        self
    }

    pub fn options(mut self, options: StoreOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the store and run the init dispatch
    ///
    /// Fails when the reducer rejects the init action, e.g. because the
    /// preloaded state is not a record.
    pub fn build(self) -> Result<Store, StoreError> {
        let tracer = self.tracer.unwrap_or_else(|| self.options.tracer());

        let store = Store {
            inner: Rc::new(StoreInner {
                reducer: self.reducer,
                state: RefCell::new(self.preloaded_state),
                listeners: RefCell::new(Vec::new()),
                dispatching: Cell::new(false),
                tracer,
                label: self.options.label,
            }),
        };

        let view = store.view();
        for setup in self.setups {
            setup(&view);
        }

        store.dispatch(create_action(STORE_INIT, None))?;

        log::debug!(
            "[{}] Store initialized with {} listener(s)",
            store.label(),
            store.listener_count()
        );

        Ok(store)
    }
}

/// Create a store and run the init dispatch
///
/// `setups` run in order before the init dispatch, each with a
/// [`StoreView`] of the new store.
///
/// ```
/// use unistate::{combine_reducers, create_store, Action, ReducerMap, ReducerResult, Value};
///
/// fn count(state: Option<&Value>, action: &Action) -> ReducerResult {
///     let count = state.and_then(Value::as_i64).unwrap_or(0);
///     Ok(Value::from(if action.is("INC") { count + 1 } else { count }))
/// }
///
/// let store = create_store(
///     combine_reducers(ReducerMap::new().with("count", count))?,
///     None,
///     Vec::new(),
/// )?;
/// store.dispatch(Action::new("INC"))?;
/// store.dispatch(Action::new("INC"))?;
/// assert_eq!(store.get_state().get("count").and_then(Value::as_i64), Some(2));
/// # Ok::<(), unistate::StoreError>(())
/// ```
pub fn create_store<F>(
    reducer: F,
    preloaded_state: Option<Value>,
    setups: Vec<Setup>,
) -> Result<Store, StoreError>
where
    F: Fn(Option<&Value>, &Action) -> ReducerResult + 'static,
{
    let mut builder = Store::builder(reducer).setups(setups);
    if let Some(state) = preloaded_state {
        builder = builder.preloaded_state(state);
    }
    builder.build()
}

/// Read and subscribe access to a store
///
/// Handed to setup callbacks. Holds only a weak reference, so listeners may
/// capture it without keeping the store alive.
#[derive(Clone)]
pub struct StoreView {
    store: Weak<StoreInner>,
}

impl StoreView {
    /// Current state; `None` before the init dispatch or once the store is gone
    pub fn get_state(&self) -> Option<Value> {
        self.store.upgrade().and_then(|store| store.state())
    }

    pub fn subscribe(&self, listener: Listener) -> Unsubscribe {
        match self.store.upgrade() {
            Some(store) => store.subscribe(listener),
            None => Unsubscribe {
                store: Weak::new(),
                listener,
            },
        }
    }
}

/// Returned by `subscribe`, removes the registration again
pub struct Unsubscribe {
    store: Weak<StoreInner>,
    listener: Listener,
}

impl Unsubscribe {
    /// Remove the first registration of the listener
    ///
    /// Returns the removed listener, or `None` when it is no longer
    /// registered. Safe to call any number of times.
    pub fn unsubscribe(&self) -> Option<Listener> {
        let store = self.store.upgrade()?;
        let mut listeners = store.listeners.borrow_mut();
        let index = listeners
            .iter()
            .position(|listener| same_listener(listener, &self.listener))?;
        Some(listeners.remove(index))
    }
}

fn same_listener(a: &Listener, b: &Listener) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}
