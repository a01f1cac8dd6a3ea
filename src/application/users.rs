//! User accounts: registration, login, profile and the XP leaderboard

use std::sync::Arc;

use tracing::info;

use crate::auth::password::{hash_password, verify_password};
use crate::domain::badge::Badge;
use crate::domain::reservation::Reservation;
use crate::domain::station::Station;
use crate::domain::user::{NewUser, User, UserRole};
use crate::domain::{
    BadgeRepository, DomainError, DomainResult, ReservationRepository, StationRepository,
    UserRepository,
};

/// How many recent reservations the profile view embeds.
const PROFILE_RESERVATION_LIMIT: u64 = 10;

/// Email domains whose registrations get the OPERATOR role.
#[derive(Debug, Clone)]
pub struct OperatorDomains(Vec<String>);

impl OperatorDomains {
    pub fn new(domains: Vec<String>) -> Self {
        Self(domains.into_iter().map(|d| d.to_lowercase()).collect())
    }

    fn matches(&self, email: &str) -> bool {
        match email.rsplit_once('@') {
            Some((_, domain)) => self.0.iter().any(|d| d == domain),
            None => false,
        }
    }
}

impl Default for OperatorDomains {
    fn default() -> Self {
        Self::new(vec![
            "zorlu.com".to_string(),
            "enerji.com".to_string(),
            "power.com".to_string(),
        ])
    }
}

/// Full profile payload: the user plus their badges, owned stations and
/// recent reservations.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user: User,
    pub badges: Vec<Badge>,
    pub stations: Vec<Station>,
    pub reservations: Vec<Reservation>,
}

/// User and account business logic.
pub struct UserService {
    users: Arc<dyn UserRepository>,
    badges: Arc<dyn BadgeRepository>,
    stations: Arc<dyn StationRepository>,
    reservations: Arc<dyn ReservationRepository>,
    operator_domains: OperatorDomains,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        badges: Arc<dyn BadgeRepository>,
        stations: Arc<dyn StationRepository>,
        reservations: Arc<dyn ReservationRepository>,
        operator_domains: OperatorDomains,
    ) -> Self {
        Self { users, badges, stations, reservations, operator_domains }
    }

    /// Register a new account. The role is derived from the email domain:
    /// allowlisted corporate domains become operators, everyone else a
    /// driver. Duplicate email is a Conflict.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> DomainResult<User> {
        let name = name.trim();
        let email = email.trim().to_lowercase();

        if name.is_empty() {
            return Err(DomainError::validation("name is required"));
        }
        if !email.contains('@') {
            return Err(DomainError::validation("email is invalid"));
        }
        if password.len() < 6 {
            return Err(DomainError::validation(
                "password must be at least 6 characters",
            ));
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict("Email already registered".to_string()));
        }

        let role = if self.operator_domains.matches(&email) {
            UserRole::Operator
        } else {
            UserRole::Driver
        };
        let password_hash = hash_password(password)
            .map_err(|e| DomainError::Internal(format!("Password hashing failed: {}", e)))?;

        let user = self
            .users
            .insert(NewUser { name: name.to_string(), email, password_hash, role })
            .await?;
        info!(user_id = user.id, role = %user.role, "user registered");
        Ok(user)
    }

    /// Authenticate by email and password. A missing account and a wrong
    /// password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<User> {
        let email = email.trim().to_lowercase();
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        let ok = verify_password(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(format!("Password verification failed: {}", e)))?;
        if !ok {
            return Err(DomainError::InvalidCredentials);
        }
        Ok(user)
    }

    pub async fn profile(&self, user_id: i32) -> DomainResult<UserProfile> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::not_found("User"))?;

        let badges = self.badges.find_for_user(user_id).await?;
        let stations = self.stations.find_by_owner(user_id).await?;
        let reservations = self
            .reservations
            .find_recent_for_user(user_id, PROFILE_RESERVATION_LIMIT)
            .await?;

        Ok(UserProfile { user, badges, stations, reservations })
    }

    pub async fn update_profile(
        &self,
        user_id: i32,
        name: &str,
        email: &str,
    ) -> DomainResult<User> {
        let name = name.trim();
        let email = email.trim().to_lowercase();
        if name.is_empty() {
            return Err(DomainError::validation("name is required"));
        }
        if !email.contains('@') {
            return Err(DomainError::validation("email is invalid"));
        }
        if let Some(existing) = self.users.find_by_email(&email).await? {
            if existing.id != user_id {
                return Err(DomainError::Conflict("Email already registered".to_string()));
            }
        }
        self.users.update_profile(user_id, name.to_string(), email).await
    }

    /// Top users by XP. The limit is clamped to 100.
    pub async fn leaderboard(&self, limit: u64) -> DomainResult<Vec<User>> {
        self.users.leaderboard(limit.clamp(1, 100)).await
    }

    pub async fn list_badges(&self) -> DomainResult<Vec<Badge>> {
        self.badges.find_all().await
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryStore;

    fn service(store: &Arc<InMemoryStore>) -> UserService {
        UserService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            OperatorDomains::default(),
        )
    }

    #[tokio::test]
    async fn corporate_domain_registers_as_operator() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(&store);

        let op = svc.register("Ayşe", "ayse@zorlu.com", "secret1").await.unwrap();
        assert_eq!(op.role, UserRole::Operator);

        let driver = svc.register("Mehmet", "mehmet@gmail.com", "secret1").await.unwrap();
        assert_eq!(driver.role, UserRole::Driver);
    }

    #[tokio::test]
    async fn email_is_normalized_before_storage() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(&store);

        let user = svc.register("Ali", "  Ali@Enerji.COM ", "secret1").await.unwrap();
        assert_eq!(user.email, "ali@enerji.com");
        assert_eq!(user.role, UserRole::Operator);

        // Same address in different casing is still a duplicate.
        let err = svc.register("Ali2", "ALI@enerji.com", "secret1").await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn register_validates_inputs() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(&store);

        assert!(matches!(
            svc.register("", "a@b.com", "secret1").await.unwrap_err(),
            DomainError::Validation(_)
        ));
        assert!(matches!(
            svc.register("A", "not-an-email", "secret1").await.unwrap_err(),
            DomainError::Validation(_)
        ));
        assert!(matches!(
            svc.register("A", "a@b.com", "short").await.unwrap_err(),
            DomainError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn login_checks_password() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(&store);
        svc.register("Ayşe", "ayse@gmail.com", "secret1").await.unwrap();

        let user = svc.login("ayse@gmail.com", "secret1").await.unwrap();
        assert_eq!(user.name, "Ayşe");

        assert!(matches!(
            svc.login("ayse@gmail.com", "wrong").await.unwrap_err(),
            DomainError::InvalidCredentials
        ));
        assert!(matches!(
            svc.login("nobody@gmail.com", "secret1").await.unwrap_err(),
            DomainError::InvalidCredentials
        ));
    }

    #[tokio::test]
    async fn update_profile_rejects_taken_email() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(&store);
        let a = svc.register("A", "a@gmail.com", "secret1").await.unwrap();
        svc.register("B", "b@gmail.com", "secret1").await.unwrap();

        let err = svc.update_profile(a.id, "A", "b@gmail.com").await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        // Keeping your own email is fine.
        let updated = svc.update_profile(a.id, "A2", "a@gmail.com").await.unwrap();
        assert_eq!(updated.name, "A2");
    }

    #[tokio::test]
    async fn profile_embeds_related_data() {
        let store = Arc::new(InMemoryStore::new());
        let svc = service(&store);
        let user = svc.register("Ayşe", "ayse@gmail.com", "secret1").await.unwrap();

        let profile = svc.profile(user.id).await.unwrap();
        assert_eq!(profile.user.id, user.id);
        assert!(profile.badges.is_empty());
        assert!(profile.stations.is_empty());
        assert!(profile.reservations.is_empty());
    }
}
