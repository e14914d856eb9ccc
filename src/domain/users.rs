use tracing::info;

use super::validation::{validate_display_name, validate_new_user};
use super::{DomainError, DomainResult};
use crate::db::DiningStore;
use crate::models::{NewUser, User, UserPatch, UserProfile};

/// Register a new user profile
#[tracing::instrument(skip(store, new_user), fields(display_name = ?new_user.display_name))]
pub async fn create_user(store: &dyn DiningStore, new_user: NewUser) -> DomainResult<User> {
    validate_new_user(store, &new_user).await?;

    let user = User {
        id: 0,
        display_name: new_user.display_name.unwrap_or_default(),
        city: new_user.city,
        state: new_user.state,
        zip_code: new_user.zip_code,
        interested_in_peanut_allergies: new_user.interested_in_peanut_allergies,
        interested_in_dairy_allergies: new_user.interested_in_dairy_allergies,
        interested_in_egg_allergies: new_user.interested_in_egg_allergies,
    };

    let stored = store.save_user(user).await?;
    info!(user_id = stored.id, "User profile created");
    Ok(stored)
}

#[tracing::instrument(skip(store))]
pub async fn get_user(store: &dyn DiningStore, display_name: &str) -> DomainResult<UserProfile> {
    let display_name = validate_display_name(Some(display_name))?;

    store
        .find_user_by_display_name(display_name)
        .await?
        .map(UserProfile::from)
        .ok_or_else(|| DomainError::NotFound("User not found".to_string()))
}

/// Apply a partial update to an existing profile
#[tracing::instrument(skip(store, patch))]
pub async fn update_user(
    store: &dyn DiningStore,
    display_name: &str,
    patch: UserPatch,
) -> DomainResult<User> {
    let display_name = validate_display_name(Some(display_name))?;

    let existing = store
        .find_user_by_display_name(display_name)
        .await?
        .ok_or_else(|| DomainError::NotFound("User not found".to_string()))?;

    let updated = store.save_user(patch.apply(existing)).await?;
    info!(user_id = updated.id, "User profile updated");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryStore;
    use pretty_assertions::assert_eq;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            display_name: Some(name.to_string()),
            city: Some("Cambridge".to_string()),
            state: Some("MA".to_string()),
            zip_code: Some("02139".to_string()),
            interested_in_peanut_allergies: Some(true),
            interested_in_dairy_allergies: Some(false),
            interested_in_egg_allergies: Some(true),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let store = InMemoryStore::new();
        create_user(&store, new_user("alice")).await.unwrap();

        let profile = get_user(&store, "alice").await.unwrap();

        assert_eq!(profile.display_name, "alice");
        assert_eq!(profile.city.as_deref(), Some("Cambridge"));
        assert_eq!(profile.interested_in_egg_allergies, Some(true));
    }

    #[tokio::test]
    async fn test_duplicate_display_name_conflicts() {
        let store = InMemoryStore::new();
        create_user(&store, new_user("alice")).await.unwrap();

        let err = create_user(&store, new_user("alice")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_blank_display_name_is_invalid() {
        let store = InMemoryStore::new();

        let err = create_user(&store, new_user("   ")).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));

        let err = create_user(&store, NewUser::default()).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_get_unknown_user_is_not_found() {
        let store = InMemoryStore::new();
        let err = get_user(&store, "nobody").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_with_only_city() {
        let store = InMemoryStore::new();
        let created = create_user(&store, new_user("alice")).await.unwrap();

        let patch = UserPatch {
            city: Some("Somerville".to_string()),
            ..Default::default()
        };
        let updated = update_user(&store, "alice", patch).await.unwrap();

        assert_eq!(
            updated,
            User {
                city: Some("Somerville".to_string()),
                ..created
            }
        );
    }

    #[tokio::test]
    async fn test_update_unknown_user_is_not_found() {
        let store = InMemoryStore::new();
        let err = update_user(&store, "nobody", UserPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
