//! unistate
//!
//! A single-tree state container. State changes only by dispatching
//! actions through a pure reducer; listeners are notified after each
//! committed dispatch.
//!
//! This crate provides:
//! - An immutable value tree for state and actions ([`Value`])
//! - An action factory ([`create_action`])
//! - A reducer combinator ([`combine_reducers`])
//! - The store itself ([`create_store`], [`Store`])
//! - Dispatch tracing through the `log` facade ([`LogTracer`])
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use unistate::{combine_reducers, create_store, Action, ReducerMap, ReducerResult, Value};
//!
//! fn todos(state: Option<&Value>, action: &Action) -> ReducerResult {
//!     let todos = state.and_then(Value::as_list).unwrap_or_default();
//!     match action.payload() {
//!         Some(todo) if action.is("ADD_TODO") => {
//!             Ok(Value::list(todos.iter().cloned().chain([todo.clone()])))
//!         }
//!         _ => Ok(state.cloned().unwrap_or_else(|| Value::list(Vec::<Value>::new()))),
//!     }
//! }
//!
//! let store = create_store(combine_reducers(ReducerMap::new().with("todos", todos))?, None, Vec::new())?;
//! let view = store.view();
//! store.subscribe(Rc::new(move || {
//!     if let Some(state) = view.get_state() {
//!         println!("todos: {}", state);
//!     }
//! }));
//!
//! store.dispatch(Action::with_payload("ADD_TODO", "write docs"))?;
//! assert_eq!(
//!     store.get_state().get("todos").and_then(Value::as_list).map(|t| t.len()),
//!     Some(1)
//! );
//! # Ok::<(), unistate::StoreError>(())
//! ```

mod action;
mod error;
mod options;
mod reducer;
mod store;
mod tracer;
mod value;

pub use action::{create_action, Action, STORE_INIT};
pub use error::StoreError;
pub use options::StoreOptions;
pub use reducer::{combine_reducers, ReducerMap, ReducerResult};
pub use store::{create_store, Listener, Setup, Store, StoreBuilder, StoreView, Unsubscribe};
pub use tracer::{LogTracer, NoopTracer, Tracer};
pub use value::{freeze, is_plain_object, ErrorValue, Value};
