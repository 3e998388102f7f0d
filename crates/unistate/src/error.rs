use thiserror::Error;

/// Errors that can occur while building a store or dispatching to it
///
/// Every variant is a programmer error: the triggering call is aborted and
/// the store keeps its last committed state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Actions must be plain records. Instead received action \"{0}\"")]
    InvalidAction(String),

    #[error("Actions may not have an undefined \"type\" property. In action \"{0}\"")]
    InvalidActionType(String),

    #[error("The preloaded state passed to the store should be a record. Instead received \"{0}\"")]
    InvalidPreloadedState(String),

    #[error("Not a valid reducers container, \"reducers.{0}\" is registered more than once")]
    DuplicateReducerKey(String),

    #[error("Reducers may not dispatch actions. A reducer tried to dispatch \"{0}\"")]
    UnexpectedDispatch(String),

    #[error("Reducer failed: {0}")]
    Reducer(String),
}

impl StoreError {
    /// Failure raised from inside a user reducer
    pub fn reducer(message: impl Into<String>) -> Self {
        StoreError::Reducer(message.into())
    }
}
