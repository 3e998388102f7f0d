//! Demo reducers
//!
//! The demo state has three fields:
//! - `count`: number changed by `INC`, `DEC` and `ADD` (payload = amount)
//! - `todos`: list of strings, `ADD_TODO` appends the payload, `CLEAR_TODOS` empties it
//! - `errors`: messages of every action flagged as an error

use unistate::{combine_reducers, Action, ReducerMap, ReducerResult, StoreError, Value};

fn empty_list() -> Value {
    Value::list(Vec::<Value>::new())
}

/// Reducer for the counter
pub fn count(state: Option<&Value>, action: &Action) -> ReducerResult {
    let current = state.and_then(Value::as_i64).unwrap_or(0);

    let next = match action.kind().as_str() {
        Some("INC") => current.checked_add(1),
        Some("DEC") => current.checked_sub(1),
        Some("ADD") => {
            let amount = action
                .payload()
                .and_then(Value::as_i64)
                .ok_or_else(|| StoreError::reducer(format!("ADD expects a number, got {}", action)))?;
            current.checked_add(amount)
        }
        _ => return Ok(state.cloned().unwrap_or(Value::from(0))),
    };

    next.map(Value::from)
        .ok_or_else(|| StoreError::reducer(format!("count overflow on {} from {}", action, current)))
}

/// Reducer for the todo list
pub fn todos(state: Option<&Value>, action: &Action) -> ReducerResult {
    match action.kind().as_str() {
        Some("ADD_TODO") => {
            let todo = action
                .payload()
                .and_then(Value::as_str)
                .ok_or_else(|| StoreError::reducer(format!("ADD_TODO expects a string, got {}", action)))?;
            let current = state.and_then(Value::as_list).unwrap_or_default();
            Ok(Value::list(current.iter().cloned().chain([Value::from(todo)])))
        }
        Some("CLEAR_TODOS") => Ok(empty_list()),
        _ => Ok(state.cloned().unwrap_or_else(empty_list)),
    }
}

/// Reducer collecting the messages of failed actions
pub fn errors(state: Option<&Value>, action: &Action) -> ReducerResult {
    let message = action
        .payload()
        .and_then(Value::as_error)
        .filter(|_| action.is_error());

    match message {
        Some(err) => {
            let current = state.and_then(Value::as_list).unwrap_or_default();
            Ok(Value::list(
                current.iter().cloned().chain([Value::from(err.message())]),
            ))
        }
        None => Ok(state.cloned().unwrap_or_else(empty_list)),
    }
}

/// Root reducer of the demo store
pub fn root_reducer() -> Result<impl Fn(Option<&Value>, &Action) -> ReducerResult, StoreError> {
    combine_reducers(
        ReducerMap::new()
            .with("count", count)
            .with("todos", todos)
            .with("errors", errors),
    )
}
