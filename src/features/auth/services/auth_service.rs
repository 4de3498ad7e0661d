use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{AuthResponseDto, LoginRequestDto, RegisterRequestDto};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::JwtService;
use crate::features::users::dtos::UserResponseDto;
use crate::features::users::models::{NewUser, Role, User};
use crate::modules::persistence::UserRepository;

/// Service for authentication operations (register, login)
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt: Arc<JwtService>,
    admin_emails: Vec<String>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        jwt: Arc<JwtService>,
        admin_emails: Vec<String>,
    ) -> Self {
        Self {
            users,
            jwt,
            admin_emails,
        }
    }

    /// Register a new account and sign it in.
    ///
    /// Emails listed in `ADMIN_EMAILS` receive the admin role at creation;
    /// the role is stored on the account from then on.
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<AuthResponseDto> {
        let email = normalize_email(&dto.email);

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let role = if self.admin_emails.iter().any(|e| *e == email) {
            Role::Admin
        } else {
            Role::User
        };

        let user = self
            .users
            .create(&NewUser {
                email,
                name: dto.name.trim().to_string(),
                password_hash: hash_password(&dto.password)?,
                role,
            })
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        self.auth_response(user)
    }

    /// Login with email and password
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let email = normalize_email(&dto.email);

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

        if !verify_password(&dto.password, &user.password_hash)? {
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        self.auth_response(user)
    }

    /// Get current authenticated user info
    pub async fn get_current_user(&self, user: AuthenticatedUser) -> Result<UserResponseDto> {
        self.users
            .find_by_id(user.user_id)
            .await?
            .map(UserResponseDto::from)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    fn auth_response(&self, user: User) -> Result<AuthResponseDto> {
        let access_token = self.jwt.issue_token(&user)?;
        Ok(AuthResponseDto {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.expires_in(),
            user: user.into(),
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Stored password hash is invalid: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::persistence::memory::MemoryStore;
    use std::time::Duration;

    fn service(store: Arc<MemoryStore>) -> AuthService {
        AuthService::new(
            store,
            Arc::new(JwtService::new(
                "test-secret-test-secret-test-secret!",
                Duration::from_secs(3600),
            )),
            vec!["boss@example.com".to_string()],
        )
    }

    fn register_dto(name: &str, email: &str) -> RegisterRequestDto {
        RegisterRequestDto {
            name: name.to_string(),
            email: email.to_string(),
            password: "correct horse battery".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_assigns_admin_role_from_bootstrap_list() {
        let service = service(Arc::new(MemoryStore::seeded()));

        let admin = service
            .register(register_dto("Boss", "Boss@Example.com"))
            .await
            .unwrap();
        let user = service
            .register(register_dto("Ann", "ann@example.com"))
            .await
            .unwrap();

        assert_eq!(admin.user.role, Role::Admin);
        assert_eq!(admin.user.email, "boss@example.com");
        assert_eq!(user.user.role, Role::User);
        assert_eq!(admin.token_type, "Bearer");
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let service = service(Arc::new(MemoryStore::seeded()));
        service
            .register(register_dto("Ann", "ann@example.com"))
            .await
            .unwrap();

        let result = service
            .register(register_dto("Other Ann", "ANN@example.com"))
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_login_checks_password() {
        let service = service(Arc::new(MemoryStore::seeded()));
        service
            .register(register_dto("Ann", "ann@example.com"))
            .await
            .unwrap();

        let ok = service
            .login(LoginRequestDto {
                email: "ann@example.com".to_string(),
                password: "correct horse battery".to_string(),
            })
            .await;
        assert!(ok.is_ok());

        let wrong = service
            .login(LoginRequestDto {
                email: "ann@example.com".to_string(),
                password: "wrong password".to_string(),
            })
            .await;
        assert!(matches!(wrong, Err(AppError::Unauthorized(_))));

        let unknown = service
            .login(LoginRequestDto {
                email: "nobody@example.com".to_string(),
                password: "whatever1".to_string(),
            })
            .await;
        assert!(matches!(unknown, Err(AppError::Unauthorized(_))));
    }
}
