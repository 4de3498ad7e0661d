//! Fixtures shared by service and router tests.
//!
//! `TestContext` wires every service to one in-memory store, the same way
//! `main` wires them to Postgres.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum_test::TestServer;
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::core::router::{build_router, AppServices};
use crate::features::auth::services::AuthService;
use crate::features::auth::{AuthenticatedUser, JwtService};
use crate::features::categories::services::CategoryService;
use crate::features::ideas::dtos::{CreateIdeaDto, IdeaResponseDto};
use crate::features::ideas::events::IdeaEventBus;
use crate::features::ideas::services::IdeaService;
use crate::features::notifications::services::NotificationJobService;
use crate::features::statuses::services::StatusService;
use crate::features::users::models::{NewUser, Role, User};
use crate::features::votes::services::VoteService;
use crate::modules::mail::{MailError, MailMessage, Mailer};
use crate::modules::persistence::memory::MemoryStore;
use crate::modules::persistence::UserRepository;

pub const TEST_JWT_SECRET: &str = "test-secret-test-secret-test-secret!";

pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub jwt: Arc<JwtService>,
    pub events: IdeaEventBus,
    pub auth: Arc<AuthService>,
    pub categories: Arc<CategoryService>,
    pub statuses: Arc<StatusService>,
    pub votes: Arc<VoteService>,
    pub ideas: Arc<IdeaService>,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::seeded());
        let jwt = Arc::new(JwtService::new(TEST_JWT_SECRET, Duration::from_secs(3600)));
        let events = IdeaEventBus::new();

        let auth = Arc::new(AuthService::new(
            store.clone(),
            Arc::clone(&jwt),
            vec!["admin@example.com".to_string()],
        ));
        let categories = Arc::new(CategoryService::new(store.clone()));
        let statuses = Arc::new(StatusService::new(store.clone()));
        let votes = Arc::new(VoteService::new(store.clone()));
        let jobs = Arc::new(NotificationJobService::new(store.clone()));
        let ideas = Arc::new(IdeaService::new(
            store.clone(),
            store.clone(),
            Arc::clone(&categories),
            Arc::clone(&statuses),
            Arc::clone(&votes),
            jobs,
            events.clone(),
        ));

        Self {
            store,
            jwt,
            events,
            auth,
            categories,
            statuses,
            votes,
            ideas,
        }
    }

    pub fn services(&self) -> AppServices {
        AppServices {
            auth: Arc::clone(&self.auth),
            categories: Arc::clone(&self.categories),
            statuses: Arc::clone(&self.statuses),
            ideas: Arc::clone(&self.ideas),
            votes: Arc::clone(&self.votes),
        }
    }

    pub fn server(&self) -> TestServer {
        let app = build_router(&self.services(), Arc::clone(&self.jwt));
        TestServer::new(app).unwrap()
    }

    async fn account(&self, name: &str, role: Role) -> User {
        let email = format!(
            "{}.{}@example.com",
            name.to_lowercase().replace(' ', "."),
            Uuid::now_v7().simple()
        );
        UserRepository::create(
            self.store.as_ref(),
            &NewUser {
                email,
                name: name.to_string(),
                password_hash: String::new(),
                role,
            },
        )
        .await
        .unwrap()
    }

    /// A regular account
    pub async fn user(&self, name: &str) -> AuthenticatedUser {
        AuthenticatedUser::from(&self.account(name, Role::User).await)
    }

    pub async fn admin(&self, name: &str) -> AuthenticatedUser {
        AuthenticatedUser::from(&self.account(name, Role::Admin).await)
    }

    /// Bearer token for an identity created by `user` or `admin`
    pub async fn token(&self, who: &AuthenticatedUser) -> String {
        let user = UserRepository::find_by_id(self.store.as_ref(), who.user_id)
            .await
            .unwrap()
            .unwrap();
        self.jwt.issue_token(&user).unwrap()
    }

    pub fn category_id(&self, name: &str) -> Uuid {
        self.store.category_named(name).unwrap().id
    }

    pub fn status_id(&self, name: &str) -> Uuid {
        self.store.status_named(name).unwrap().id
    }

    /// Submit an idea in "Category 1" with a generated description
    pub async fn idea(&self, author: &AuthenticatedUser, title: &str) -> IdeaResponseDto {
        let description: String = Sentence(5..12).fake();
        self.ideas
            .create(
                CreateIdeaDto {
                    title: title.to_string(),
                    category_id: Some(self.category_id("Category 1")),
                    description,
                },
                author,
            )
            .await
            .unwrap()
    }
}

/// Mailer that records messages, or fails every send while `failing` is set
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<MailMessage>>,
    failing: Mutex<bool>,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: Mutex::new(true),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }

    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        if *self.failing.lock() {
            return Err(MailError::Delivery("connection refused".to_string()));
        }
        self.sent.lock().push(message.clone());
        Ok(())
    }
}
