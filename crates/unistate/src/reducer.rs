//! Reducers and reducer composition
//!
//! A reducer is any `Fn(Option<&Value>, &Action) -> ReducerResult`: a pure
//! function producing the next (sub-)state from the previous one. `None`
//! stands for a state that has not been set yet.

use crate::action::{Action, STORE_INIT};
use crate::error::StoreError;
use crate::value::{is_plain_object, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Result of running a reducer
pub type ReducerResult = Result<Value, StoreError>;

pub(crate) type BoxedReducer = Box<dyn Fn(Option<&Value>, &Action) -> ReducerResult>;

/// Named sub-reducers, kept in registration order
#[derive(Default)]
pub struct ReducerMap {
    entries: Vec<(String, BoxedReducer)>,
}

impl ReducerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `reducer` for the state field `key`
    pub fn with<F>(mut self, key: impl Into<String>, reducer: F) -> Self
    where
        F: Fn(Option<&Value>, &Action) -> ReducerResult + 'static,
    {
        self.entries.push((key.into(), Box::new(reducer)));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }
}

impl fmt::Debug for ReducerMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}

/// Compose named sub-reducers into one root reducer
///
/// The root reducer works on a record with one field per key. Each field is
/// handed to its sub-reducer, and the previous state is returned unchanged
/// (same identity) when no sub-reducer produced a different value.
///
/// Fails when a key is registered twice.
///
/// ```
/// use unistate::{combine_reducers, Action, ReducerMap, ReducerResult, Value};
///
/// fn count(state: Option<&Value>, action: &Action) -> ReducerResult {
///     let count = state.and_then(Value::as_i64).unwrap_or(0);
///     Ok(Value::from(if action.is("INC") { count + 1 } else { count }))
/// }
///
/// let root = combine_reducers(ReducerMap::new().with("count", count))?;
/// let state = root(None, &Action::new("INC"))?;
/// assert_eq!(state.get("count").and_then(Value::as_i64), Some(1));
/// # Ok::<(), unistate::StoreError>(())
/// ```
pub fn combine_reducers(
    reducers: ReducerMap,
) -> Result<impl Fn(Option<&Value>, &Action) -> ReducerResult, StoreError> {
    {
        let mut seen = BTreeSet::new();
        for key in reducers.keys() {
            if !seen.insert(key) {
                return Err(StoreError::DuplicateReducerKey(key.to_string()));
            }
        }
    }

    log::debug!("Combined reducers: {:?}", reducers);

    Ok(move |state: Option<&Value>, action: &Action| reduce_combined(&reducers, state, action))
}

fn reduce_combined(reducers: &ReducerMap, state: Option<&Value>, action: &Action) -> ReducerResult {
    // Undefined state defaults to an empty record
    let state = state
        .cloned()
        .unwrap_or_else(|| Value::from(BTreeMap::new()));

    if action.is(STORE_INIT) && !is_plain_object(&state) {
        return Err(StoreError::InvalidPreloadedState(state.to_string()));
    }

    let mut next_state = BTreeMap::new();
    let mut has_changed = false;

    for (key, reducer) in &reducers.entries {
        let previous = state.get(key);
        let next = reducer(previous, action)?;
        has_changed = has_changed || previous.map_or(true, |previous| !previous.same(&next));
        next_state.insert(key.clone(), next);
    }

    if has_changed {
        Ok(Value::from(next_state))
    } else {
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn count(state: Option<&Value>, action: &Action) -> ReducerResult {
        let count = state.and_then(Value::as_i64).unwrap_or(0);
        Ok(Value::from(if action.is("INC") { count + 1 } else { count }))
    }

    fn keep(state: Option<&Value>, _action: &Action) -> ReducerResult {
        Ok(state.cloned().unwrap_or_default())
    }

    fn fail_on_boom(state: Option<&Value>, action: &Action) -> ReducerResult {
        if action.is("BOOM") {
            return Err(StoreError::reducer("boom"));
        }
        keep(state, action)
    }

    #[test]
    fn test_noop_reducers_keep_identity() {
        let root = combine_reducers(ReducerMap::new().with("a", keep).with("b", keep)).unwrap();
        let state = Value::from(json!({"a": {"x": 1}, "b": [1, 2]}));

        let next = root(Some(&state), &Action::new("ANYTHING")).unwrap();

        assert!(next.same(&state));
    }

    #[test]
    fn test_number_returned_as_float_keeps_identity() {
        let as_float = |state: Option<&Value>, _action: &Action| -> ReducerResult {
            Ok(Value::from(state.and_then(Value::as_f64).unwrap_or(0.0)))
        };
        let root = combine_reducers(ReducerMap::new().with("ratio", as_float)).unwrap();
        let state = Value::from(json!({"ratio": 1}));

        let next = root(Some(&state), &Action::new("NOOP")).unwrap();

        assert!(next.same(&state));
    }

    #[test]
    fn test_changed_field_builds_new_record() {
        let root = combine_reducers(ReducerMap::new().with("count", count).with("items", keep))
            .unwrap();
        let state = Value::from(json!({"count": 1, "items": ["a"]}));

        let next = root(Some(&state), &Action::new("INC")).unwrap();

        assert!(!next.same(&state));
        assert_eq!(next.get("count").and_then(Value::as_i64), Some(2));
        // Untouched branches are shared with the previous state
        assert!(next.get("items").unwrap().same(state.get("items").unwrap()));
    }

    #[test]
    fn test_undefined_state_defaults_to_empty_record() {
        let root = combine_reducers(ReducerMap::new().with("count", count)).unwrap();

        let next = root(None, &Action::new("NOOP")).unwrap();

        assert_eq!(next, Value::from(json!({"count": 0})));
    }

    #[test]
    fn test_missing_field_counts_as_changed() {
        let root = combine_reducers(ReducerMap::new().with("count", count)).unwrap();
        let state = Value::from(json!({}));

        let next = root(Some(&state), &Action::new("NOOP")).unwrap();

        assert!(!next.same(&state));
        assert_eq!(next.get("count").and_then(Value::as_i64), Some(0));
    }

    #[test]
    fn test_fields_without_reducer_are_dropped_on_change() {
        let root = combine_reducers(ReducerMap::new().with("count", count)).unwrap();
        let state = Value::from(json!({"count": 0, "stale": true}));

        let next = root(Some(&state), &Action::new("INC")).unwrap();

        assert_eq!(next, Value::from(json!({"count": 1})));
    }

    #[test]
    fn test_init_rejects_non_record_state() {
        let root = combine_reducers(ReducerMap::new().with("count", count)).unwrap();

        let err = root(Some(&Value::from(3)), &Action::new(STORE_INIT)).unwrap_err();

        assert_eq!(err, StoreError::InvalidPreloadedState("3".to_string()));
    }

    #[test]
    fn test_non_record_state_outside_init() {
        let root = combine_reducers(ReducerMap::new().with("count", count)).unwrap();

        let next = root(Some(&Value::from(3)), &Action::new("INC")).unwrap();

        assert_eq!(next, Value::from(json!({"count": 1})));
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let result = combine_reducers(ReducerMap::new().with("count", count).with("count", keep));

        assert_eq!(
            result.err(),
            Some(StoreError::DuplicateReducerKey("count".to_string()))
        );
    }

    #[test]
    fn test_sub_reducer_error_propagates() {
        let root = combine_reducers(ReducerMap::new().with("count", count).with("x", fail_on_boom))
            .unwrap();

        let err = root(None, &Action::new("BOOM")).unwrap_err();

        assert_eq!(err, StoreError::reducer("boom"));
    }

    #[test]
    fn test_nested_combination() {
        let inner = combine_reducers(ReducerMap::new().with("count", count)).unwrap();
        let root = combine_reducers(ReducerMap::new().with("counter", inner).with("meta", keep))
            .unwrap();

        let first = root(None, &Action::new("INC")).unwrap();
        assert_eq!(first.get("counter"), Some(&Value::from(json!({"count": 1}))));

        let second = root(Some(&first), &Action::new("NOOP")).unwrap();
        assert!(second.same(&first));
    }

    #[test]
    fn test_empty_map_returns_state() {
        let map = ReducerMap::new();
        assert!(map.is_empty());
        let root = combine_reducers(map).unwrap();
        let state = Value::from(json!({"a": 1}));

        assert!(root(Some(&state), &Action::new("X")).unwrap().same(&state));
    }

    #[test]
    fn test_debug_lists_keys() {
        let map = ReducerMap::new().with("count", count).with("items", keep);
        assert_eq!(format!("{:?}", map), r#"["count", "items"]"#);
        assert_eq!(map.len(), 2);
        assert!(!map.is_empty());
    }
}
