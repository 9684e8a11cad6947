use super::fs::RequestSink;
use super::{ActionRef, InvocationContext};
use std::collections::BTreeMap;
use std::fmt;

pub type ActionFn = Box<dyn Fn(&InvocationContext, &RequestSink) + Send + Sync>;

pub struct RegisteredAction {
    pub id: String,
    /// Display text, e.g. "Go to File..."
    pub text: String,
    perform: ActionFn,
}

impl RegisteredAction {
    pub fn to_action_ref(&self) -> ActionRef {
        ActionRef {
            id: self.id.clone(),
            text: self.text.clone(),
        }
    }

    pub fn perform(&self, context: &InvocationContext, sink: &RequestSink) {
        (self.perform)(context, sink)
    }
}

impl fmt::Debug for RegisteredAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredAction")
            .field("id", &self.id)
            .field("text", &self.text)
            .finish_non_exhaustive()
    }
}

/// Actions that links can run by id
#[derive(Debug, Default)]
pub struct ActionRegistry {
    actions: BTreeMap<String, RegisteredAction>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `perform` under `id`, replacing any previous registration
    pub fn register(
        &mut self,
        id: impl Into<String>,
        text: impl Into<String>,
        perform: impl Fn(&InvocationContext, &RequestSink) + Send + Sync + 'static,
    ) {
        let id = id.into();
        self.actions.insert(
            id.clone(),
            RegisteredAction {
                id,
                text: text.into(),
                perform: Box::new(perform),
            },
        );
    }

    pub fn get(&self, id: &str) -> Option<&RegisteredAction> {
        self.actions.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.actions.contains_key(id)
    }

    /// All actions, sorted by id
    pub fn actions(&self) -> impl Iterator<Item = &RegisteredAction> {
        self.actions.values()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
