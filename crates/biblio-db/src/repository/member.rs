//! # Member Repository
//!
//! Database operations for library members.
//!
//! ## Key Operations
//! - Registration (identity format + uniqueness)
//! - Name updates (identity is immutable)
//! - Removal (not gated on outstanding loans)

use biblio_core::{CoreError, Identity, Member};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

/// Column list shared by every member query, in `Member` field order.
const MEMBER_COLUMNS: &str = "identity, given_name, family_name, created_at, updated_at";

/// Repository for member database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = MemberRepository::new(pool);
///
/// repo.register("12345678Z", "Mercè", "Rodoreda").await?;
/// let members = repo.list().await?;
/// ```
#[derive(Debug, Clone)]
pub struct MemberRepository {
    pool: SqlitePool,
}

impl MemberRepository {
    /// Creates a new MemberRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MemberRepository { pool }
    }

    /// Registers a new member.
    ///
    /// ## Returns
    /// * `Ok(Member)` - The stored record
    /// * `Err(DbError::Domain(CoreError::Validation(_)))` - Malformed identity
    /// * `Err(DbError::Domain(CoreError::DuplicateMember(_)))` - Identity taken
    ///
    /// Name fields are stored as given; rejecting blank names is up to the
    /// caller.
    pub async fn register(
        &self,
        identity: &str,
        given_name: &str,
        family_name: &str,
    ) -> DbResult<Member> {
        let identity = Identity::parse(identity).map_err(CoreError::from)?;

        debug!(identity = %identity, "Registering member");

        let now = Utc::now();
        let member = Member {
            identity,
            given_name: given_name.to_string(),
            family_name: family_name.to_string(),
            created_at: now,
            updated_at: now,
        };

        let result = sqlx::query(
            r#"
            INSERT INTO members (identity, given_name, family_name, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&member.identity)
        .bind(&member.given_name)
        .bind(&member.family_name)
        .bind(member.created_at)
        .bind(member.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                info!(identity = %member.identity, "Member registered");
                Ok(member)
            }
            Err(err) => match DbError::from(err) {
                DbError::UniqueViolation { .. } => {
                    Err(CoreError::DuplicateMember(member.identity.to_string()).into())
                }
                other => Err(other),
            },
        }
    }

    /// Removes a member.
    ///
    /// Books currently lent to this identity stay on loan to it.
    ///
    /// ## Returns
    /// * `Ok(true)` - A member was removed
    /// * `Ok(false)` - No member had this identity (nothing to do)
    pub async fn remove(&self, identity: &str) -> DbResult<bool> {
        debug!(identity = %identity, "Removing member");

        let result = sqlx::query("DELETE FROM members WHERE identity = ?1")
            .bind(identity)
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            info!(identity = %identity, "Member removed");
        }

        Ok(removed)
    }

    /// Updates a member's name fields.
    ///
    /// `None` leaves the corresponding field unchanged.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::Domain(CoreError::MemberNotFound(_)))` - Unknown identity
    pub async fn update(
        &self,
        identity: &str,
        given_name: Option<&str>,
        family_name: Option<&str>,
    ) -> DbResult<()> {
        debug!(identity = %identity, "Updating member");

        let result = sqlx::query(
            r#"
            UPDATE members SET
                given_name = COALESCE(?2, given_name),
                family_name = COALESCE(?3, family_name),
                updated_at = ?4
            WHERE identity = ?1
            "#,
        )
        .bind(identity)
        .bind(given_name)
        .bind(family_name)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::MemberNotFound(identity.to_string()).into());
        }

        Ok(())
    }

    /// Lists all members in registration order.
    pub async fn list(&self) -> DbResult<Vec<Member>> {
        let members = sqlx::query_as::<_, Member>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM members ORDER BY rowid"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = members.len(), "Listed members");
        Ok(members)
    }

    /// Gets a member by identity.
    ///
    /// ## Returns
    /// * `Ok(Some(Member))` - Member found
    /// * `Ok(None)` - Member not found
    pub async fn get(&self, identity: &str) -> DbResult<Option<Member>> {
        let member = sqlx::query_as::<_, Member>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM members WHERE identity = ?1"
        ))
        .bind(identity)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    /// Counts registered members.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use biblio_core::{CoreError, ValidationError};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_register_and_get() {
        let db = db().await;
        let members = db.members();

        let member = members
            .register("12345678Z", "Mercè", "Rodoreda")
            .await
            .unwrap();
        assert_eq!(member.identity.as_str(), "12345678Z");

        let loaded = members.get("12345678Z").await.unwrap().unwrap();
        assert_eq!(loaded.given_name, "Mercè");
        assert_eq!(loaded.family_name, "Rodoreda");
        assert!(members.get("87654321X").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_register_rejects_malformed_identity() {
        let db = db().await;

        let err = db
            .members()
            .register("1234567Z", "Pere", "Calders")
            .await
            .unwrap_err();

        assert!(matches!(
            err.domain(),
            Some(CoreError::Validation(ValidationError::InvalidFormat { .. }))
        ));
        assert_eq!(db.members().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_register_duplicate_identity() {
        let db = db().await;
        let members = db.members();

        members
            .register("12345678Z", "Mercè", "Rodoreda")
            .await
            .unwrap();
        let err = members
            .register("12345678Z", "Someone", "Else")
            .await
            .unwrap_err();

        assert!(matches!(
            err.domain(),
            Some(CoreError::DuplicateMember(identity)) if identity == "12345678Z"
        ));

        // The first registration is untouched.
        let kept = members.get("12345678Z").await.unwrap().unwrap();
        assert_eq!(kept.given_name, "Mercè");
    }

    #[tokio::test]
    async fn test_remove_reports_outcome() {
        let db = db().await;
        let members = db.members();

        members.register("12345678Z", "Joan", "Fuster").await.unwrap();

        assert!(members.remove("12345678Z").await.unwrap());
        assert!(!members.remove("12345678Z").await.unwrap());
        assert!(!members.remove("not-even-valid").await.unwrap());
        assert_eq!(members.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_partial_fields() {
        let db = db().await;
        let members = db.members();

        members.register("12345678Z", "Joan", "Fuster").await.unwrap();

        members
            .update("12345678Z", Some("Joan F."), None)
            .await
            .unwrap();
        let member = members.get("12345678Z").await.unwrap().unwrap();
        assert_eq!(member.given_name, "Joan F.");
        assert_eq!(member.family_name, "Fuster");

        members
            .update("12345678Z", None, Some("Fuster i Ortells"))
            .await
            .unwrap();
        let member = members.get("12345678Z").await.unwrap().unwrap();
        assert_eq!(member.given_name, "Joan F.");
        assert_eq!(member.family_name, "Fuster i Ortells");
    }

    #[tokio::test]
    async fn test_update_unknown_member() {
        let db = db().await;

        let err = db
            .members()
            .update("12345678Z", Some("Nobody"), None)
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_in_registration_order() {
        let db = db().await;
        let members = db.members();

        members.register("22222222B", "Second", "Alpha").await.unwrap();
        members.register("11111111A", "First", "Beta").await.unwrap();
        members.register("33333333C", "Third", "Gamma").await.unwrap();

        let listed: Vec<String> = members
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.identity.to_string())
            .collect();
        assert_eq!(listed, vec!["22222222B", "11111111A", "33333333C"]);
    }
}
