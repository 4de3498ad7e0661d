//! In-memory store implementing every repository trait, for tests.
//!
//! Mirrors the constraints the Postgres schema enforces: unique emails and
//! slugs, one vote per (user, idea), cascade on idea delete.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use parking_lot::Mutex;
use sqlx::types::Json;
use uuid::Uuid;

use super::{
    CategoryRepository, IdeaRepository, NotificationJobRepository, StatusRepository,
    UserRepository, VoteRepository,
};
use crate::core::error::{AppError, Result};
use crate::features::categories::models::Category;
use crate::features::ideas::models::{Idea, IdeaDetail, IdeaFilter, NewIdea};
use crate::features::notifications::models::{
    NotificationJob, NotificationJobStatus, NotifyVotersJob,
};
use crate::features::statuses::models::{Status, StatusCount};
use crate::features::users::models::{NewUser, Role, User};

/// Status names and classes seeded by the initial migration
pub const SEED_STATUSES: &[(&str, &str)] = &[
    ("Open", "bg-gray-200"),
    ("Considering", "bg-purple text-white"),
    ("In Progress", "bg-yellow text-white"),
    ("Implemented", "bg-green text-white"),
    ("Closed", "bg-red text-white"),
];

pub const SEED_CATEGORIES: &[&str] = &["Category 1", "Category 2", "Category 3", "Category 4"];

/// Width of `ideas.slug`
const SLUG_COLUMN_LEN: usize = 255;

#[derive(Default)]
struct State {
    users: Vec<User>,
    categories: Vec<Category>,
    statuses: Vec<Status>,
    /// Insertion order doubles as the tiebreak for equal timestamps
    ideas: Vec<Idea>,
    votes: BTreeSet<(Uuid, Uuid)>,
    vote_order: Vec<(Uuid, Uuid)>,
    jobs: Vec<NotificationJob>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    /// Number of upcoming `slugs_with_base` calls that report no taken slugs
    stale_slug_reads: AtomicUsize,
    fail_job_inserts: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding the reference statuses and categories
    pub fn seeded() -> Self {
        let store = Self::new();
        {
            let mut state = store.state.lock();
            let now = Utc::now();
            for (i, (name, classes)) in SEED_STATUSES.iter().enumerate() {
                state.statuses.push(Status {
                    id: Uuid::now_v7(),
                    name: name.to_string(),
                    classes: classes.to_string(),
                    display_order: i as i32 + 1,
                });
            }
            for name in SEED_CATEGORIES {
                state.categories.push(Category {
                    id: Uuid::now_v7(),
                    name: name.to_string(),
                    created_at: now,
                });
            }
        }
        store
    }

    pub fn status_named(&self, name: &str) -> Option<Status> {
        self.state
            .lock()
            .statuses
            .iter()
            .find(|s| s.name == name)
            .cloned()
    }

    pub fn category_named(&self, name: &str) -> Option<Category> {
        self.state
            .lock()
            .categories
            .iter()
            .find(|c| c.name == name)
            .cloned()
    }

    /// Make the next `n` slug lookups miss existing slugs, as if another
    /// writer inserted between lookup and insert
    pub fn simulate_stale_slug_reads(&self, n: usize) {
        self.stale_slug_reads.store(n, Ordering::SeqCst);
    }

    pub fn fail_job_inserts(&self, fail: bool) {
        self.fail_job_inserts.store(fail, Ordering::SeqCst);
    }

    /// Shift an idea's creation time, for ordering tests
    pub fn backdate_idea(&self, id: Uuid, by: Duration) {
        let mut state = self.state.lock();
        if let Some(idea) = state.ideas.iter_mut().find(|i| i.id == id) {
            idea.created_at -= by;
        }
    }

    /// Change an account's role in place, as an operator would in the database
    pub fn set_role(&self, user_id: Uuid, role: Role) {
        if let Some(user) = self.state.lock().users.iter_mut().find(|u| u.id == user_id) {
            user.role = role;
        }
    }

    pub fn jobs(&self) -> Vec<NotificationJob> {
        self.state.lock().jobs.clone()
    }

    fn detail(state: &State, idea: &Idea, viewer: Option<Uuid>) -> Option<IdeaDetail> {
        let category = state.categories.iter().find(|c| c.id == idea.category_id)?;
        let status = state.statuses.iter().find(|s| s.id == idea.status_id)?;
        let author = state.users.iter().find(|u| u.id == idea.user_id)?;
        let votes_count = state.votes.iter().filter(|(_, i)| *i == idea.id).count() as i64;
        let voted_by_user = viewer
            .map(|v| state.votes.contains(&(v, idea.id)))
            .unwrap_or(false);

        Some(IdeaDetail {
            id: idea.id,
            title: idea.title.clone(),
            slug: idea.slug.clone(),
            description: idea.description.clone(),
            category_id: category.id,
            category_name: category.name.clone(),
            status_id: status.id,
            status_name: status.name.clone(),
            status_classes: status.classes.clone(),
            spam_reports: idea.spam_reports,
            user_id: author.id,
            author_name: author.name.clone(),
            author_email: author.email.clone(),
            created_at: idea.created_at,
            votes_count,
            voted_by_user,
        })
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: &NewUser) -> Result<User> {
        let mut state = self.state.lock();
        if state.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(format!(
                "Email '{}' is already registered",
                user.email
            )));
        }
        let created = User {
            id: Uuid::now_v7(),
            email: user.email.clone(),
            name: user.name.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
            created_at: Utc::now(),
        };
        state.users.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.state.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .state
            .lock()
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Category>> {
        let mut categories = self.state.lock().categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>> {
        Ok(self
            .state
            .lock()
            .categories
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }
}

#[async_trait]
impl StatusRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Status>> {
        let mut statuses = self.state.lock().statuses.clone();
        statuses.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(statuses)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Status>> {
        Ok(self
            .state
            .lock()
            .statuses
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn idea_counts(&self) -> Result<Vec<StatusCount>> {
        let state = self.state.lock();
        let mut counts: HashMap<Uuid, i64> = HashMap::new();
        for idea in &state.ideas {
            *counts.entry(idea.status_id).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(status_id, count)| StatusCount { status_id, count })
            .collect())
    }
}

#[async_trait]
impl IdeaRepository for MemoryStore {
    async fn insert(&self, idea: &NewIdea) -> Result<Idea> {
        if idea.slug.len() > SLUG_COLUMN_LEN {
            return Err(AppError::Internal(format!(
                "slug of {} characters exceeds the column width",
                idea.slug.len()
            )));
        }
        let mut state = self.state.lock();
        if state.ideas.iter().any(|i| i.slug == idea.slug) {
            return Err(AppError::Conflict(format!(
                "Slug '{}' is already taken",
                idea.slug
            )));
        }
        let created = Idea {
            id: Uuid::now_v7(),
            user_id: idea.user_id,
            category_id: idea.category_id,
            status_id: idea.status_id,
            title: idea.title.clone(),
            slug: idea.slug.clone(),
            description: idea.description.clone(),
            spam_reports: 0,
            created_at: Utc::now(),
        };
        state.ideas.push(created.clone());
        Ok(created)
    }

    async fn slugs_with_base(&self, base: &str) -> Result<Vec<String>> {
        let stale = self
            .stale_slug_reads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if stale {
            return Ok(Vec::new());
        }

        let prefix = format!("{}-", base);
        Ok(self
            .state
            .lock()
            .ideas
            .iter()
            .filter(|i| i.slug == base || i.slug.starts_with(&prefix))
            .map(|i| i.slug.clone())
            .collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Idea>> {
        Ok(self
            .state
            .lock()
            .ideas
            .iter()
            .find(|i| i.slug == slug)
            .cloned())
    }

    async fn find_detail(&self, id: Uuid, viewer: Option<Uuid>) -> Result<Option<IdeaDetail>> {
        let state = self.state.lock();
        Ok(state
            .ideas
            .iter()
            .find(|i| i.id == id)
            .and_then(|idea| Self::detail(&state, idea, viewer)))
    }

    async fn list(
        &self,
        filter: &IdeaFilter,
        viewer: Option<Uuid>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<IdeaDetail>, i64)> {
        let state = self.state.lock();
        let mut matching: Vec<(usize, IdeaDetail)> = state
            .ideas
            .iter()
            .enumerate()
            .filter_map(|(seq, idea)| Self::detail(&state, idea, viewer).map(|d| (seq, d)))
            .filter(|(_, d)| {
                filter.status.as_deref().map_or(true, |s| d.status_name == s)
                    && filter.category.as_deref().map_or(true, |c| d.category_name == c)
            })
            .collect();

        matching.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at.cmp(&a.created_at).then(seq_b.cmp(seq_a))
        });

        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(|(_, d)| d)
            .collect();

        Ok((items, total))
    }

    async fn update_status(&self, id: Uuid, status_id: Uuid) -> Result<()> {
        if let Some(idea) = self.state.lock().ideas.iter_mut().find(|i| i.id == id) {
            idea.status_id = status_id;
        }
        Ok(())
    }

    async fn increment_spam(&self, id: Uuid) -> Result<i32> {
        let mut state = self.state.lock();
        let idea = state
            .ideas
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| AppError::NotFound("Idea not found".to_string()))?;
        idea.spam_reports += 1;
        Ok(idea.spam_reports)
    }

    async fn reset_spam(&self, id: Uuid) -> Result<()> {
        if let Some(idea) = self.state.lock().ideas.iter_mut().find(|i| i.id == id) {
            idea.spam_reports = 0;
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut state = self.state.lock();
        let before = state.ideas.len();
        state.ideas.retain(|i| i.id != id);
        if state.ideas.len() == before {
            return Ok(false);
        }
        state.votes.retain(|(_, idea_id)| *idea_id != id);
        state.vote_order.retain(|(_, idea_id)| *idea_id != id);
        state.jobs.retain(|j| j.idea_id != id);
        Ok(true)
    }
}

#[async_trait]
impl VoteRepository for MemoryStore {
    async fn insert(&self, user_id: Uuid, idea_id: Uuid) -> Result<bool> {
        let mut state = self.state.lock();
        if !state.ideas.iter().any(|i| i.id == idea_id) {
            return Err(AppError::NotFound("Idea not found".to_string()));
        }
        let inserted = state.votes.insert((user_id, idea_id));
        if inserted {
            state.vote_order.push((user_id, idea_id));
        }
        Ok(inserted)
    }

    async fn delete(&self, user_id: Uuid, idea_id: Uuid) -> Result<bool> {
        let mut state = self.state.lock();
        let removed = state.votes.remove(&(user_id, idea_id));
        state.vote_order.retain(|pair| *pair != (user_id, idea_id));
        Ok(removed)
    }

    async fn exists(&self, user_id: Uuid, idea_id: Uuid) -> Result<bool> {
        Ok(self.state.lock().votes.contains(&(user_id, idea_id)))
    }

    async fn count(&self, idea_id: Uuid) -> Result<i64> {
        Ok(self
            .state
            .lock()
            .votes
            .iter()
            .filter(|(_, i)| *i == idea_id)
            .count() as i64)
    }

    async fn voters(&self, idea_id: Uuid) -> Result<Vec<User>> {
        let state = self.state.lock();
        Ok(state
            .vote_order
            .iter()
            .filter(|(_, i)| *i == idea_id)
            .filter_map(|(u, _)| state.users.iter().find(|user| user.id == *u).cloned())
            .collect())
    }
}

#[async_trait]
impl NotificationJobRepository for MemoryStore {
    async fn create(&self, job: &NotifyVotersJob) -> Result<NotificationJob> {
        if self.fail_job_inserts.load(Ordering::SeqCst) {
            return Err(AppError::Internal("job queue unavailable".to_string()));
        }
        let created = NotificationJob {
            id: Uuid::now_v7(),
            idea_id: job.idea_id,
            idea_title: job.idea_title.clone(),
            idea_slug: job.idea_slug.clone(),
            status_name: job.status_name.clone(),
            recipients: Json(job.recipients.clone()),
            status: NotificationJobStatus::Pending,
            retry_count: 0,
            error_message: None,
            created_at: Utc::now(),
            processed_at: None,
            last_attempt_at: None,
        };
        self.state.lock().jobs.push(created.clone());
        Ok(created)
    }

    async fn fetch_pending(
        &self,
        max_retries: i32,
        batch_size: i64,
    ) -> Result<Vec<NotificationJob>> {
        Ok(self
            .state
            .lock()
            .jobs
            .iter()
            .filter(|j| j.status == NotificationJobStatus::Pending && j.retry_count < max_retries)
            .take(batch_size.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn update_status(&self, id: Uuid, status: NotificationJobStatus) -> Result<()> {
        if let Some(job) = self.state.lock().jobs.iter_mut().find(|j| j.id == id) {
            job.status = status;
            job.last_attempt_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn mark_completed(&self, id: Uuid) -> Result<()> {
        if let Some(job) = self.state.lock().jobs.iter_mut().find(|j| j.id == id) {
            let now = Utc::now();
            job.status = NotificationJobStatus::Completed;
            job.processed_at = Some(now);
            job.last_attempt_at = Some(now);
        }
        Ok(())
    }

    async fn mark_failed(
        &self,
        id: Uuid,
        status: NotificationJobStatus,
        retry_count: i32,
        error_message: &str,
    ) -> Result<()> {
        if let Some(job) = self.state.lock().jobs.iter_mut().find(|j| j.id == id) {
            job.status = status;
            job.retry_count = retry_count;
            job.error_message = Some(error_message.to_string());
            job.last_attempt_at = Some(Utc::now());
        }
        Ok(())
    }
}
