use std::sync::Arc;

use tokio::sync::broadcast;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::auth::AuthenticatedUser;
use crate::features::categories::services::CategoryService;
use crate::features::ideas::dtos::{
    CreateIdeaDto, IdeaListQuery, IdeaResponseDto, SetStatusDto, SpamReportDto,
};
use crate::features::ideas::events::{IdeaEvent, IdeaEventBus};
use crate::features::ideas::models::{Idea, NewIdea};
use crate::features::notifications::models::{NotifyVotersJob, Recipient};
use crate::features::notifications::services::NotificationJobService;
use crate::features::statuses::services::StatusService;
use crate::features::votes::services::VoteService;
use crate::modules::persistence::{IdeaRepository, UserRepository};
use crate::shared::constants::{IDEAS_PER_PAGE, MAX_SLUG_ATTEMPTS};
use crate::shared::slug::{next_available_slug, slugify};
use crate::shared::types::Meta;
use crate::shared::validation::SLUG_REGEX;

/// Idea lifecycle: submission, status workflow, spam triage, deletion
pub struct IdeaService {
    ideas: Arc<dyn IdeaRepository>,
    users: Arc<dyn UserRepository>,
    categories: Arc<CategoryService>,
    statuses: Arc<StatusService>,
    votes: Arc<VoteService>,
    jobs: Arc<NotificationJobService>,
    events: IdeaEventBus,
}

impl IdeaService {
    pub fn new(
        ideas: Arc<dyn IdeaRepository>,
        users: Arc<dyn UserRepository>,
        categories: Arc<CategoryService>,
        statuses: Arc<StatusService>,
        votes: Arc<VoteService>,
        jobs: Arc<NotificationJobService>,
        events: IdeaEventBus,
    ) -> Self {
        Self {
            ideas,
            users,
            categories,
            statuses,
            votes,
            jobs,
            events,
        }
    }

    /// Submit a new idea in the default status.
    ///
    /// The slug is derived from the title. When another writer claims the
    /// computed slug first, the next free suffix is recomputed and the
    /// insert retried.
    pub async fn create(
        &self,
        dto: CreateIdeaDto,
        user: &AuthenticatedUser,
    ) -> Result<IdeaResponseDto> {
        dto.validate()?;

        let category_id = dto
            .category_id
            .ok_or_else(|| AppError::Validation("The category field is required.".to_string()))?;
        let category = self.categories.get(category_id).await.map_err(|e| match e {
            AppError::NotFound(_) => {
                AppError::Validation("The selected category is invalid.".to_string())
            }
            other => other,
        })?;
        let status = self.statuses.default_status().await?;

        let title = dto.title.trim().to_string();
        let base = slugify(&title);

        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let taken = self.ideas.slugs_with_base(&base).await?;
            let slug = next_available_slug(&base, &taken);

            let new_idea = NewIdea {
                user_id: user.user_id,
                category_id: category.id,
                status_id: status.id,
                title: title.clone(),
                slug,
                description: dto.description.trim().to_string(),
            };

            match self.ideas.insert(&new_idea).await {
                Ok(idea) => {
                    tracing::info!(idea_id = %idea.id, slug = %idea.slug, "Idea created");
                    self.events.publish(IdeaEvent::Created {
                        idea_id: idea.id,
                        slug: idea.slug.clone(),
                    });
                    return self.detail(&idea, Some(user)).await;
                }
                Err(AppError::Conflict(msg)) => {
                    tracing::warn!("Slug collision on attempt {}: {}", attempt, msg);
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::Conflict(format!(
            "Could not allocate a unique slug for '{}'",
            title
        )))
    }

    /// Look up the raw idea by slug
    pub async fn find_idea(&self, slug: &str) -> Result<Idea> {
        if !SLUG_REGEX.is_match(slug) {
            return Err(AppError::NotFound(format!("Idea '{}' not found", slug)));
        }
        self.ideas
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Idea '{}' not found", slug)))
    }

    pub async fn get_by_slug(
        &self,
        slug: &str,
        viewer: Option<&AuthenticatedUser>,
    ) -> Result<IdeaResponseDto> {
        let idea = self.find_idea(slug).await?;
        self.detail(&idea, viewer).await
    }

    /// One page of ideas, newest first, filtered by status and category name
    pub async fn list(
        &self,
        query: &IdeaListQuery,
        viewer: Option<&AuthenticatedUser>,
    ) -> Result<(Vec<IdeaResponseDto>, Meta)> {
        let show_spam = viewer.map(|u| u.is_admin()).unwrap_or(false);

        let (rows, total) = self
            .ideas
            .list(
                &query.filter(),
                viewer.map(|u| u.user_id),
                query.offset(),
                IDEAS_PER_PAGE,
            )
            .await?;

        let items = rows
            .into_iter()
            .map(|d| IdeaResponseDto::from_detail(d, show_spam))
            .collect();

        Ok((items, Meta::paged(total, query.page(), IDEAS_PER_PAGE)))
    }

    /// Move an idea to another status (admin only).
    ///
    /// With `notify_voters`, a job addressed to every voter is queued. A
    /// failure to queue is logged; the status change stands.
    pub async fn set_status(
        &self,
        slug: &str,
        dto: SetStatusDto,
        user: &AuthenticatedUser,
    ) -> Result<IdeaResponseDto> {
        self.require_admin(user, "change the status of ideas").await?;

        let idea = self.find_idea(slug).await?;
        let new_status = self.statuses.get(dto.status_id).await?;
        let old_status = self.statuses.get(idea.status_id).await?;

        self.ideas.update_status(idea.id, new_status.id).await?;

        tracing::info!(
            idea_id = %idea.id,
            from = %old_status.name,
            to = %new_status.name,
            "Idea status changed"
        );

        if dto.notify_voters {
            self.enqueue_voter_notification(&idea, &new_status.name)
                .await;
        }

        self.events.publish(IdeaEvent::StatusChanged {
            idea_id: idea.id,
            old_status: old_status.name,
            new_status: new_status.name,
        });

        let updated = self.find_idea(slug).await?;
        self.detail(&updated, Some(user)).await
    }

    async fn enqueue_voter_notification(&self, idea: &Idea, status_name: &str) {
        let voters = match self.votes.voters(idea.id).await {
            Ok(voters) => voters,
            Err(e) => {
                tracing::error!("Failed to load voters of idea {}: {:?}", idea.id, e);
                return;
            }
        };

        if voters.is_empty() {
            tracing::debug!("Idea {} has no voters to notify", idea.id);
            return;
        }

        let job = NotifyVotersJob {
            idea_id: idea.id,
            idea_title: idea.title.clone(),
            idea_slug: idea.slug.clone(),
            status_name: status_name.to_string(),
            recipients: voters
                .into_iter()
                .map(|u| Recipient {
                    email: u.email,
                    name: u.name,
                })
                .collect(),
        };

        if let Err(e) = self.jobs.enqueue(&job).await {
            tracing::error!(
                "Failed to enqueue voter notification for idea {}: {:?}",
                idea.id,
                e
            );
        }
    }

    /// Report an idea as spam; any signed-in user may do this
    pub async fn mark_as_spam(
        &self,
        slug: &str,
        user: &AuthenticatedUser,
    ) -> Result<SpamReportDto> {
        let idea = self.find_idea(slug).await?;
        let spam_reports = self.ideas.increment_spam(idea.id).await?;

        tracing::info!(idea_id = %idea.id, reporter = %user.user_id, "Idea reported as spam");
        self.events.publish(IdeaEvent::MarkedAsSpam {
            idea_id: idea.id,
            spam_reports,
        });

        Ok(SpamReportDto { spam_reports })
    }

    /// Clear the spam counter (admin only)
    pub async fn mark_as_not_spam(
        &self,
        slug: &str,
        user: &AuthenticatedUser,
    ) -> Result<SpamReportDto> {
        self.require_admin(user, "reset spam reports").await?;

        let idea = self.find_idea(slug).await?;
        self.ideas.reset_spam(idea.id).await?;

        self.events
            .publish(IdeaEvent::MarkedAsNotSpam { idea_id: idea.id });

        Ok(SpamReportDto { spam_reports: 0 })
    }

    /// Delete an idea and its votes (admin only)
    pub async fn delete(&self, slug: &str, user: &AuthenticatedUser) -> Result<()> {
        self.require_admin(user, "delete ideas").await?;

        let idea = self.find_idea(slug).await?;
        if !self.ideas.delete(idea.id).await? {
            return Err(AppError::NotFound(format!("Idea '{}' not found", slug)));
        }

        tracing::info!(idea_id = %idea.id, admin = %user.user_id, "Idea deleted");
        self.events.publish(IdeaEvent::Deleted { idea_id: idea.id });

        Ok(())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<IdeaEvent> {
        self.events.subscribe()
    }

    async fn detail(
        &self,
        idea: &Idea,
        viewer: Option<&AuthenticatedUser>,
    ) -> Result<IdeaResponseDto> {
        let show_spam = viewer.map(|u| u.is_admin()).unwrap_or(false);
        self.ideas
            .find_detail(idea.id, viewer.map(|u| u.user_id))
            .await?
            .map(|d| IdeaResponseDto::from_detail(d, show_spam))
            .ok_or_else(|| AppError::NotFound(format!("Idea '{}' not found", idea.slug)))
    }

    /// Admin gate. The role is read from the stored account, so a demotion
    /// applies to tokens issued before it.
    async fn require_admin(&self, user: &AuthenticatedUser, action: &str) -> Result<()> {
        let account = self
            .users
            .find_by_id(user.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))?;

        if account.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Only administrators can {}",
                action
            )))
        }
    }
}
