//! Proptest generators for property-based testing.

use proptest::prelude::*;

use shareable_core::{EntityRef, NewGrant};

/// How a sharer relates to a resource before an operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessLevel {
    /// No grant, not the owner.
    None,
    /// Read-only grant.
    Read,
    /// Read/write grant.
    Edit,
    /// The resource's owner. Never holds a grant.
    Owner,
}

impl AccessLevel {
    /// Expected `can_read` answer.
    pub fn can_read(self) -> bool {
        !matches!(self, AccessLevel::None)
    }

    /// Expected `can_edit` answer.
    pub fn can_edit(self) -> bool {
        matches!(self, AccessLevel::Edit | AccessLevel::Owner)
    }

    /// Whether this level is backed by a stored grant.
    pub fn has_grant(self) -> bool {
        matches!(self, AccessLevel::Read | AccessLevel::Edit)
    }
}

impl Arbitrary for AccessLevel {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        access_level().boxed()
    }
}

/// Generate any access level.
pub fn access_level() -> impl Strategy<Value = AccessLevel> {
    prop_oneof![
        Just(AccessLevel::None),
        Just(AccessLevel::Read),
        Just(AccessLevel::Edit),
        Just(AccessLevel::Owner),
    ]
}

/// Generate an access level that is not ownership.
pub fn granted_level() -> impl Strategy<Value = AccessLevel> {
    prop_oneof![
        Just(AccessLevel::None),
        Just(AccessLevel::Read),
        Just(AccessLevel::Edit),
    ]
}

/// Generate an entity kind.
pub fn kind() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{0,11}".prop_map(String::from)
}

/// Generate a valid entity reference.
pub fn entity_ref() -> impl Strategy<Value = EntityRef> {
    (kind(), 1i64..=10_000).prop_map(|(kind, id)| EntityRef::new(kind, id))
}

/// Generate a user reference from a small id pool, so collisions happen.
pub fn user_ref(max_id: i64) -> impl Strategy<Value = EntityRef> {
    (1..=max_id).prop_map(|id| EntityRef::new("User", id))
}

/// Generate a valid insert form over a small pool of resources and users.
pub fn new_grant(pool: i64) -> impl Strategy<Value = NewGrant> {
    (
        (1..=pool).prop_map(|id| EntityRef::new("Article", id)),
        user_ref(pool),
        user_ref(pool),
        any::<bool>(),
    )
        .prop_map(|(resource, grantor, grantee, edit)| {
            NewGrant::new(resource, grantor, grantee).with_edit(edit)
        })
}
