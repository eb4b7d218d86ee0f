//! Identity service: login, credential authentication, and registration.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, instrument, warn};

use quartermaster_core::{Principal, Role, authorize_role};

use super::jwt::JwtManager;
use super::password;
use crate::storage::{DatabaseError, NewUserParams, PrincipalRepository};

/// Identity & access failures.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("No token provided")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Access denied")]
    Forbidden,

    #[error("Username already exists")]
    DuplicateUsername,

    #[error("{0}")]
    Validation(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token creation failed: {0}")]
    TokenIssue(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Storage(#[from] DatabaseError),
}

/// A successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub expires_at: i64,
    pub principal: Principal,
}

/// Register request body; every field optional so gaps become validation
/// errors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDraft {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub assigned_base: Option<String>,
}

/// A validated registration.
#[derive(Clone)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub role: Role,
    pub assigned_base: Option<String>,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("role", &self.role)
            .field("assigned_base", &self.assigned_base)
            .finish_non_exhaustive()
    }
}

impl TryFrom<RegistrationDraft> for Registration {
    type Error = AuthError;

    fn try_from(draft: RegistrationDraft) -> Result<Self, AuthError> {
        let username = draft.username.unwrap_or_default();
        if username.len() < 3 {
            return Err(AuthError::Validation(
                "Username must be at least 3 characters".into(),
            ));
        }
        let password = draft.password.unwrap_or_default();
        if password.len() < 8 {
            return Err(AuthError::Validation(
                "Password must be at least 8 characters".into(),
            ));
        }
        let role = draft
            .role
            .ok_or_else(|| AuthError::Validation("Missing required field: role".into()))?
            .parse::<Role>()
            .map_err(|e| AuthError::Validation(e.to_string()))?;
        let assigned_base = draft
            .assigned_base
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty());
        if role.is_base_scoped() && assigned_base.is_none() {
            return Err(AuthError::Validation(format!(
                "A {role} requires an assignedBase"
            )));
        }

        Ok(Self {
            username,
            password,
            role,
            assigned_base,
        })
    }
}

pub struct IdentityService<R> {
    repo: R,
    jwt: Arc<JwtManager>,
}

impl<R: PrincipalRepository> IdentityService<R> {
    pub const fn new(repo: R, jwt: Arc<JwtManager>) -> Self {
        Self { repo, jwt }
    }

    /// Exchange a username and password for a session credential.
    ///
    /// Unknown usernames and wrong passwords are indistinguishable.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let Some(user) = self.repo.get_user_by_username(username).await? else {
            password::verify_decoy(password);
            warn!(username, "Login for unknown username");
            return Err(AuthError::InvalidCredentials);
        };

        let valid = password::verify_password(password, &user.password_hash)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        if !valid {
            warn!(username, "Failed login attempt");
            return Err(AuthError::InvalidCredentials);
        }

        let principal = user.to_principal()?;
        let (token, expires_at) = self.jwt.issue(&principal)?;

        info!(user_id = %principal.id, role = %principal.role, "Principal logged in");

        Ok(Session {
            token,
            expires_at,
            principal,
        })
    }

    /// Resolve a bearer credential to the principal it was issued for.
    ///
    /// The principal is re-read from storage on every call; a credential for
    /// a principal that no longer exists is invalid.
    pub async fn authenticate(&self, credential: Option<&str>) -> Result<Principal, AuthError> {
        let token = credential.ok_or(AuthError::MissingToken)?;
        let claims = self
            .jwt
            .validate(token)
            .map_err(|_| AuthError::InvalidToken)?;

        let user = self
            .repo
            .get_user(&claims.sub)
            .await?
            .ok_or(AuthError::InvalidToken)?;
        Ok(user.to_principal()?)
    }

    /// Create a principal on behalf of an admin.
    ///
    /// The requestor's role is checked before the payload is validated.
    #[instrument(skip(self, requestor, draft), fields(requestor = %requestor.id))]
    pub async fn register(
        &self,
        requestor: &Principal,
        draft: RegistrationDraft,
    ) -> Result<Principal, AuthError> {
        if !authorize_role(requestor, &[Role::Admin]) {
            warn!(role = %requestor.role, "Non-admin attempted registration");
            return Err(AuthError::Forbidden);
        }
        self.provision(Registration::try_from(draft)?).await
    }

    /// Create a principal without a requestor check. Used by seeding and by
    /// [`Self::register`] once the requestor is authorized.
    pub async fn provision(&self, registration: Registration) -> Result<Principal, AuthError> {
        if self
            .repo
            .get_user_by_username(&registration.username)
            .await?
            .is_some()
        {
            return Err(AuthError::DuplicateUsername);
        }

        let hash = password::hash_password(&registration.password)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        let id = uuid::Uuid::new_v4().to_string();
        let user = self
            .repo
            .create_user(&NewUserParams {
                id: &id,
                username: &registration.username,
                password_hash: &hash,
                role: registration.role,
                assigned_base: registration.assigned_base.as_deref(),
            })
            .await
            .map_err(|e| match e {
                DatabaseError::Conflict(_) => AuthError::DuplicateUsername,
                other => AuthError::Storage(other),
            })?;

        let principal = user.to_principal()?;
        info!(user_id = %principal.id, username = %principal.username, role = %principal.role, "Principal registered");
        Ok(principal)
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::LedgerDatabase;

    async fn setup() -> IdentityService<LedgerDatabase> {
        let db = LedgerDatabase::open_in_memory().await.unwrap();
        let jwt = Arc::new(JwtManager::new(b"test-secret", 86_400));
        IdentityService::new(db, jwt)
    }

    fn registration(username: &str, role: Role, base: Option<&str>) -> Registration {
        Registration {
            username: username.into(),
            password: "password123".into(),
            role,
            assigned_base: base.map(str::to_string),
        }
    }

    fn draft(username: &str, role: &str, base: Option<&str>) -> RegistrationDraft {
        RegistrationDraft {
            username: Some(username.into()),
            password: Some("password123".into()),
            role: Some(role.into()),
            assigned_base: base.map(str::to_string),
        }
    }

    async fn admin(svc: &IdentityService<LedgerDatabase>) -> Principal {
        svc.provision(registration("boss", Role::Admin, None))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn register_then_login_round_trip() {
        let svc = setup().await;
        let boss = admin(&svc).await;

        let created = svc
            .register(
                &boss,
                draft("commander1", "base_commander", Some("Bravo Base")),
            )
            .await
            .unwrap();

        let session = svc.login("commander1", "password123").await.unwrap();
        assert_eq!(session.principal, created);

        let principal = svc.authenticate(Some(&session.token)).await.unwrap();
        assert_eq!(principal.id, created.id);
        assert_eq!(principal.assigned_base.as_deref(), Some("Bravo Base"));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_are_invalid_credentials() {
        let svc = setup().await;
        admin(&svc).await;

        let wrong = svc.login("boss", "password124").await.unwrap_err();
        assert!(matches!(wrong, AuthError::InvalidCredentials));

        let unknown = svc.login("nobody", "password123").await.unwrap_err();
        assert!(matches!(unknown, AuthError::InvalidCredentials));

        let cased = svc.login("BOSS", "password123").await.unwrap_err();
        assert!(matches!(cased, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn unknown_user_login_does_full_password_work() {
        let svc = setup().await;
        admin(&svc).await;
        // warm the decoy hash
        let _ = svc.login("nobody", "password123").await;

        let started = std::time::Instant::now();
        let wrong = svc.login("boss", "password124").await.unwrap_err();
        let wrong_elapsed = started.elapsed();

        let started = std::time::Instant::now();
        let unknown = svc.login("nobody", "password124").await.unwrap_err();
        let unknown_elapsed = started.elapsed();

        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert!(
            unknown_elapsed * 4 >= wrong_elapsed,
            "unknown {unknown_elapsed:?} vs wrong password {wrong_elapsed:?}"
        );
    }

    #[tokio::test]
    async fn non_admin_cannot_register() {
        let svc = setup().await;
        let officer = svc
            .provision(registration("logistics1", Role::LogisticsOfficer, None))
            .await
            .unwrap();

        let err = svc
            .register(&officer, draft("newbie", "admin", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Forbidden));
        assert!(svc.login("newbie", "password123").await.is_err());
    }

    #[tokio::test]
    async fn role_check_precedes_validation() {
        let svc = setup().await;
        let commander = svc
            .provision(registration("commander1", Role::BaseCommander, Some("Bravo Base")))
            .await
            .unwrap();

        let err = svc
            .register(&commander, RegistrationDraft::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Forbidden));

        let boss = admin(&svc).await;
        let err = svc
            .register(&boss, RegistrationDraft::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn duplicate_username_rejected() {
        let svc = setup().await;
        let boss = admin(&svc).await;

        let err = svc
            .register(&boss, draft("boss", "logistics_officer", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateUsername));
    }

    #[tokio::test]
    async fn authenticate_distinguishes_missing_and_invalid() {
        let svc = setup().await;

        assert!(matches!(
            svc.authenticate(None).await.unwrap_err(),
            AuthError::MissingToken
        ));
        assert!(matches!(
            svc.authenticate(Some("garbage")).await.unwrap_err(),
            AuthError::InvalidToken
        ));
    }

    #[tokio::test]
    async fn token_for_vanished_principal_is_invalid() {
        let svc = setup().await;
        let ghost = Principal {
            id: "ghost".into(),
            username: "ghost".into(),
            role: Role::Admin,
            assigned_base: None,
        };
        let (token, _) = svc.jwt.issue(&ghost).unwrap();

        let err = svc.authenticate(Some(&token)).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn registration_draft_validation() {
        let draft = RegistrationDraft {
            username: Some("commander2".into()),
            password: Some("commander123".into()),
            role: Some("base_commander".into()),
            assigned_base: Some("  ".into()),
        };
        assert!(matches!(
            Registration::try_from(draft),
            Err(AuthError::Validation(_))
        ));

        let draft = RegistrationDraft {
            username: Some("general".into()),
            password: Some("general123".into()),
            role: Some("general".into()),
            assigned_base: None,
        };
        assert!(matches!(
            Registration::try_from(draft),
            Err(AuthError::Validation(_))
        ));

        let draft = RegistrationDraft {
            username: Some("logistics2".into()),
            password: Some("logistics123".into()),
            role: Some("logistics_officer".into()),
            assigned_base: None,
        };
        let reg = Registration::try_from(draft).unwrap();
        assert_eq!(reg.role, Role::LogisticsOfficer);
    }

    #[test]
    fn registration_debug_hides_password() {
        let reg = registration("boss", Role::Admin, None);
        assert!(!format!("{reg:?}").contains("password123"));
    }
}
