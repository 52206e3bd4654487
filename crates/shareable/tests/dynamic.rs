//! Callers holding only entity references go through the role registry.

use shareable::core::{CoreError, RoleRegistry};
use shareable::store::MemoryStore;
use shareable::{EntityRef, ShareError, Sharing, SharingConfig};
use shareable_testkit::fixtures::comment;

fn registry() -> RoleRegistry {
    RoleRegistry::new()
        .sharer_kind("User")
        .sharer_kind("Group")
        .shareable_kind("Group")
        .shareable_kind("Article")
}

fn user(id: i64) -> EntityRef {
    EntityRef::new("User", id)
}

#[test]
fn kinds_outside_a_role_are_rejected() {
    let registry = registry();

    let err: ShareError = registry.sharer(comment(1)).unwrap_err().into();
    assert!(matches!(err, ShareError::TypeMismatch { .. }));
    assert_eq!(
        err.to_string(),
        "type mismatch: Comment#1 does not support the sharer role"
    );

    let err = registry.shareable(user(1), None).unwrap_err();
    assert!(matches!(err, CoreError::TypeMismatch { .. }));
    assert!(!err.to_string().is_empty());

    assert!(registry.is_sharer("Group") && registry.is_shareable("Group"));
    assert!(!registry.is_shareable("User"));
}

async fn share_by_ref(
    sharing: &Sharing<MemoryStore>,
    registry: &RoleRegistry,
    resource: EntityRef,
    owner: EntityRef,
    from: EntityRef,
    to: EntityRef,
) -> shareable::Result<bool> {
    let resource = registry.shareable(resource, Some(owner))?;
    let from = registry.sharer(from)?;
    let to = registry.sharer(to)?;
    sharing.sharer(&from).share(&resource, &to, false).await
}

#[tokio::test]
async fn dynamic_handles_follow_the_same_rules() {
    let sharing = Sharing::new(MemoryStore::new(), SharingConfig::default());
    let registry = registry();
    let article = EntityRef::new("Article", 1);

    assert!(share_by_ref(&sharing, &registry, article.clone(), user(1), user(1), user(2))
        .await
        .unwrap());
    // A reader cannot reshare.
    assert!(!share_by_ref(&sharing, &registry, article.clone(), user(1), user(2), user(3))
        .await
        .unwrap());

    let err = share_by_ref(&sharing, &registry, article, user(1), user(1), comment(4))
        .await
        .unwrap_err();
    assert!(matches!(err, ShareError::TypeMismatch { .. }));
    assert_eq!(sharing.store().len().unwrap(), 1);
}

#[tokio::test]
async fn invalid_reference_is_a_validation_error() {
    let sharing = Sharing::new(MemoryStore::new(), SharingConfig::default());
    let registry = registry();

    let err = share_by_ref(
        &sharing,
        &registry,
        EntityRef::new("Article", 1),
        user(1),
        user(1),
        user(0),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ShareError::Validation(_)));
    assert!(sharing.store().is_empty().unwrap());
}
