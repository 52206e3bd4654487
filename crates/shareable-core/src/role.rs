//! Sharing roles.
//!
//! Roles are traits a type opts into, not base types. A type may be a
//! [`Sharer`], a [`Shareable`], or both (a group that owns documents and is
//! itself shared with).

use crate::types::EntityRef;

/// Anything with a polymorphic identity.
pub trait Entity {
    /// The (kind, id) reference used for grants and equality.
    fn entity_ref(&self) -> EntityRef;
}

impl<T: Entity + ?Sized> Entity for &T {
    fn entity_ref(&self) -> EntityRef {
        (**self).entity_ref()
    }
}

/// Role for entities that grant access and receive it.
pub trait Sharer: Entity {}

impl<T: Sharer + ?Sized> Sharer for &T {}

/// Role for entities that can be the subject of a grant.
pub trait Shareable: Entity + Sized {
    /// Options declared for this type, chiefly the owner accessor.
    fn shareable_options() -> ShareableOptions<Self>;

    /// Resolve the owner through the configured accessor.
    ///
    /// Returns `None` when no accessor is configured or the accessor finds
    /// no owner.
    fn shareable_owner(&self) -> Option<EntityRef> {
        Self::shareable_options().owner_of(self)
    }
}

/// Per-type configuration for a [`Shareable`].
pub struct ShareableOptions<T> {
    owner: Option<fn(&T) -> Option<EntityRef>>,
}

impl<T> ShareableOptions<T> {
    /// Options with no owner accessor.
    pub const fn new() -> Self {
        Self { owner: None }
    }

    /// Name the accessor mapping a resource to its owning sharer.
    pub fn owner(mut self, accessor: fn(&T) -> Option<EntityRef>) -> Self {
        self.owner = Some(accessor);
        self
    }

    pub fn has_owner(&self) -> bool {
        self.owner.is_some()
    }

    /// Apply the owner accessor to a resource.
    pub fn owner_of(&self, resource: &T) -> Option<EntityRef> {
        self.owner.and_then(|accessor| accessor(resource))
    }
}

impl<T> Default for ShareableOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ShareableOptions<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ShareableOptions<T> {}

impl<T> std::fmt::Debug for ShareableOptions<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareableOptions")
            .field("owner", &self.owner.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Note {
        id: i64,
        author: Option<i64>,
    }

    impl Entity for Note {
        fn entity_ref(&self) -> EntityRef {
            EntityRef::new("Note", self.id)
        }
    }

    impl Shareable for Note {
        fn shareable_options() -> ShareableOptions<Self> {
            ShareableOptions::new().owner(|n: &Self| n.author.map(|id| EntityRef::new("User", id)))
        }
    }

    struct Orphan;

    impl Entity for Orphan {
        fn entity_ref(&self) -> EntityRef {
            EntityRef::new("Orphan", 1)
        }
    }

    impl Shareable for Orphan {
        fn shareable_options() -> ShareableOptions<Self> {
            ShareableOptions::default()
        }
    }

    #[test]
    fn test_owner_accessor() {
        let note = Note {
            id: 1,
            author: Some(5),
        };
        assert_eq!(note.shareable_owner(), Some(EntityRef::new("User", 5)));

        let unowned = Note { id: 2, author: None };
        assert_eq!(unowned.shareable_owner(), None);
    }

    #[test]
    fn test_no_owner_configured() {
        assert!(!Orphan::shareable_options().has_owner());
        assert_eq!(Orphan.shareable_owner(), None);
    }

    #[test]
    fn test_reference_entity() {
        let note = Note { id: 3, author: None };
        let by_ref: &Note = &note;
        assert_eq!((&by_ref).entity_ref(), EntityRef::new("Note", 3));
    }
}
