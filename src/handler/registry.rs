//! Action registry: declared action instances keyed by action kind.
//!
//! [`ActionRegistry::wire`] runs once at session start. It validates every
//! declared action, hands each one the shared [`PluginContext`], and keeps
//! declaration order for broadcasts. The set of instances is fixed after
//! wiring; only the instances' own state changes.

use std::collections::HashMap;
use std::fmt;

use super::context::PluginContext;
use super::traits::Action;
use crate::error::SdkError;

/// Live mapping from action kind to its handler instance.
#[derive(Default)]
pub struct ActionRegistry {
    actions: Vec<Box<dyn Action>>,
    index: HashMap<String, usize>,
}

impl ActionRegistry {
    /// Validates, binds and registers the declared actions.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::MissingActionIdentifier`] if an action's
    /// [`Action::uuid`] is empty, or [`SdkError::DuplicateActionIdentifier`]
    /// if two actions share one. Nothing is bound when wiring fails.
    pub fn wire(actions: Vec<Box<dyn Action>>, cx: &PluginContext) -> Result<Self, SdkError> {
        let mut index = HashMap::with_capacity(actions.len());
        for (position, action) in actions.iter().enumerate() {
            let uuid = action.uuid();
            if uuid.is_empty() {
                tracing::error!(position, "declared action has no identifier");
                return Err(SdkError::MissingActionIdentifier(position));
            }
            if index.insert(uuid.to_string(), position).is_some() {
                tracing::error!(action = uuid, "action declared more than once");
                return Err(SdkError::DuplicateActionIdentifier(uuid.to_string()));
            }
        }

        let mut actions = actions;
        for action in &mut actions {
            action.bind(cx);
            tracing::debug!(action = action.uuid(), "action wired");
        }

        Ok(Self { actions, index })
    }

    /// Returns the instance registered for `action`.
    pub fn get_mut(&mut self, action: &str) -> Option<&mut (dyn Action + 'static)> {
        let position = *self.index.get(action)?;
        self.actions.get_mut(position).map(|boxed| &mut **boxed)
    }

    /// Iterates instances in declaration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut (dyn Action + 'static)> {
        self.actions.iter_mut().map(|boxed| &mut **boxed)
    }

    /// Returns `true` if `action` has a registered instance.
    #[must_use]
    pub fn contains(&self, action: &str) -> bool {
        self.index.contains_key(action)
    }

    /// Action kinds in declaration order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.actions.iter().map(|action| action.uuid())
    }

    /// Number of registered instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if no actions were declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("actions", &self.kinds().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::domain::RegistrationInfo;
    use crate::ws::Outbox;

    struct Named {
        uuid: String,
        bound: Arc<Mutex<Vec<String>>>,
    }

    impl Action for Named {
        fn uuid(&self) -> &str {
            &self.uuid
        }

        fn bind(&mut self, cx: &PluginContext) {
            if let Ok(mut bound) = self.bound.lock() {
                bound.push(format!("{}@{}", self.uuid, cx.plugin_uuid()));
            }
        }
    }

    fn named(uuid: &str, bound: &Arc<Mutex<Vec<String>>>) -> Box<dyn Action> {
        Box::new(Named {
            uuid: uuid.to_string(),
            bound: Arc::clone(bound),
        })
    }

    fn plugin_context() -> PluginContext {
        let (outbox, _rx) = Outbox::channel();
        PluginContext::new(outbox, "PLUGIN", Arc::new(RegistrationInfo::default()))
    }

    #[test]
    fn wire_binds_in_declaration_order() {
        let bound = Arc::new(Mutex::new(Vec::new()));
        let actions = vec![named("b", &bound), named("a", &bound), named("c", &bound)];
        let Ok(registry) = ActionRegistry::wire(actions, &plugin_context()) else {
            panic!("wiring should succeed");
        };
        assert_eq!(registry.kinds().collect::<Vec<_>>(), ["b", "a", "c"]);
        let Ok(bound) = bound.lock() else {
            panic!("lock poisoned");
        };
        assert_eq!(*bound, ["b@PLUGIN", "a@PLUGIN", "c@PLUGIN"]);
    }

    #[test]
    fn empty_identifier_aborts_wiring() {
        let bound = Arc::new(Mutex::new(Vec::new()));
        let actions = vec![named("a", &bound), named("", &bound)];
        let result = ActionRegistry::wire(actions, &plugin_context());
        assert!(matches!(result, Err(SdkError::MissingActionIdentifier(1))));
        let Ok(bound) = bound.lock() else {
            panic!("lock poisoned");
        };
        assert!(bound.is_empty());
    }

    #[test]
    fn duplicate_identifier_aborts_wiring() {
        let bound = Arc::new(Mutex::new(Vec::new()));
        let actions = vec![named("a", &bound), named("a", &bound)];
        let result = ActionRegistry::wire(actions, &plugin_context());
        let Err(SdkError::DuplicateActionIdentifier(kind)) = result else {
            panic!("expected duplicate error");
        };
        assert_eq!(kind, "a");
    }

    #[test]
    fn lookup_by_kind() {
        let bound = Arc::new(Mutex::new(Vec::new()));
        let Ok(mut registry) =
            ActionRegistry::wire(vec![named("a", &bound), named("b", &bound)], &plugin_context())
        else {
            panic!("wiring should succeed");
        };
        assert!(registry.contains("b"));
        assert!(!registry.contains("z"));
        let Some(action) = registry.get_mut("b") else {
            panic!("b should be registered");
        };
        assert_eq!(action.uuid(), "b");
        assert!(registry.get_mut("z").is_none());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn empty_registry() {
        let Ok(registry) = ActionRegistry::wire(Vec::new(), &plugin_context()) else {
            panic!("wiring should succeed");
        };
        assert!(registry.is_empty());
        assert_eq!(format!("{registry:?}"), "ActionRegistry { actions: [] }");
    }
}
