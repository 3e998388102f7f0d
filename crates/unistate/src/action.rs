//! Actions
//!
//! An action is a record with a mandatory `type` field, an optional `payload`
//! and an `error: true` flag when the payload is an error value. Actions are
//! immutable once built, whether they come from [`create_action`] or from a
//! caller-supplied record that passed validation.

use crate::error::StoreError;
use crate::value::{is_plain_object, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Type of the action the store dispatches once during construction
pub const STORE_INIT: &str = "STORE_INIT";

const TYPE_KEY: &str = "type";
const PAYLOAD_KEY: &str = "payload";
const ERROR_KEY: &str = "error";

/// A validated, immutable action record
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    kind: Value,
    record: Value,
}

impl Action {
    /// Action without payload
    pub fn new(kind: impl Into<Value>) -> Self {
        create_action(kind, None)
    }

    /// Action carrying `payload`
    pub fn with_payload(kind: impl Into<Value>, payload: impl Into<Value>) -> Self {
        create_action(kind, Some(payload.into()))
    }

    /// The `type` tag, stored verbatim
    pub fn kind(&self) -> &Value {
        &self.kind
    }

    /// True when the `type` tag is the string `kind`
    pub fn is(&self, kind: &str) -> bool {
        self.kind.as_str() == Some(kind)
    }

    pub fn payload(&self) -> Option<&Value> {
        self.record.get(PAYLOAD_KEY)
    }

    /// True when the action is flagged with `error: true`
    pub fn is_error(&self) -> bool {
        self.record
            .get(ERROR_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// The whole action record
    pub fn as_value(&self) -> &Value {
        &self.record
    }

    pub fn into_value(self) -> Value {
        self.record
    }
}

/// Build a normalized action from a type tag and an optional payload
///
/// Error payloads additionally set `error: true`. Never fails.
///
/// ```
/// use unistate::{create_action, Value};
///
/// let action = create_action("FETCH_FAILED", Some(Value::error("timeout")));
/// assert!(action.is("FETCH_FAILED"));
/// assert!(action.is_error());
/// ```
pub fn create_action(kind: impl Into<Value>, payload: Option<Value>) -> Action {
    let kind = kind.into();
    let mut record = BTreeMap::new();
    record.insert(TYPE_KEY.to_string(), kind.clone());

    if let Some(payload) = payload {
        if payload.is_error() {
            record.insert(ERROR_KEY.to_string(), Value::Bool(true));
        }
        record.insert(PAYLOAD_KEY.to_string(), payload);
    }

    Action {
        kind,
        record: Value::from(record),
    }
}

impl TryFrom<Value> for Action {
    type Error = StoreError;

    /// Validate a caller-supplied action record
    ///
    /// Any present `type` is accepted, including `Null`; only a missing one
    /// is rejected.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        if !is_plain_object(&value) {
            return Err(StoreError::InvalidAction(value.to_string()));
        }

        let kind = value
            .get(TYPE_KEY)
            .cloned()
            .ok_or_else(|| StoreError::InvalidActionType(value.to_string()))?;

        Ok(Action {
            kind,
            record: value,
        })
    }
}

impl From<Action> for Value {
    fn from(action: Action) -> Self {
        action.record
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.record)
    }
}
