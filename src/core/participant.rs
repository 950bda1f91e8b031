use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Index of a participant in one settlement run.
///
/// Ids are dense: a group of `n` participants uses ids `0..n`, which lets
/// the settlement engine address balances by position in a plain vector.
///
/// # Examples
///
/// ```
/// use debt_settle::core::participant::ParticipantId;
///
/// let alice = ParticipantId::new(0);
/// let bob = ParticipantId::new(1);
/// assert!(alice < bob);
/// assert_eq!(bob.index(), 1);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ParticipantId(usize);

impl ParticipantId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of this participant in a balance vector.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Interns participant names into dense [`ParticipantId`]s.
///
/// The first name registered gets id 0, the next new name id 1, and so on.
/// Registering a name twice returns the id it was given the first time.
///
/// # Examples
///
/// ```
/// use debt_settle::core::participant::ParticipantRegistry;
///
/// let mut registry = ParticipantRegistry::new();
/// let alice = registry.register("alice");
/// let bob = registry.register("bob");
/// assert_eq!(registry.register("alice"), alice);
/// assert_eq!(registry.name(bob), Some("bob"));
/// assert_eq!(registry.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParticipantRegistry {
    names: Vec<String>,
    ids: HashMap<String, ParticipantId>,
}

impl ParticipantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `name`, assigning it the next free id if it is new.
    pub fn register(&mut self, name: &str) -> ParticipantId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = ParticipantId::new(self.names.len());
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    pub fn id(&self, name: &str) -> Option<ParticipantId> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, id: ParticipantId) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    /// Names in id order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_assigns_dense_ids() {
        let mut registry = ParticipantRegistry::new();
        assert_eq!(registry.register("a"), ParticipantId::new(0));
        assert_eq!(registry.register("b"), ParticipantId::new(1));
        assert_eq!(registry.register("c"), ParticipantId::new(2));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = ParticipantRegistry::new();
        let first = registry.register("alice");
        registry.register("bob");
        assert_eq!(registry.register("alice"), first);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), &["alice".to_string(), "bob".to_string()]);
    }

    #[test]
    fn test_lookup_unknown() {
        let registry = ParticipantRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.id("nobody"), None);
        assert_eq!(registry.name(ParticipantId::new(3)), None);
    }

    #[test]
    fn test_participant_display() {
        assert_eq!(format!("{}", ParticipantId::new(7)), "#7");
    }
}
