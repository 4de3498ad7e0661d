//! Mail template rendering.
//!
//! ```ignore
//! use crate::shared::templates::render_idea_status_updated;
//!
//! let mail = render_idea_status_updated(&IdeaStatusMail { .. })?;
//! ```

pub mod engine;

pub use engine::{render_template, TemplateError};

use minijinja::context;

/// Values substituted into the "idea status updated" mail
#[derive(Debug, Clone)]
pub struct IdeaStatusMail<'a> {
    pub app_name: &'a str,
    pub idea_title: &'a str,
    pub status_name: &'a str,
    pub idea_url: &'a str,
    pub recipient_name: &'a str,
}

/// A rendered subject and body pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMail {
    pub subject: String,
    pub body: String,
}

/// Render the mail sent to voters when an idea changes status.
pub fn render_idea_status_updated(mail: &IdeaStatusMail<'_>) -> Result<RenderedMail, TemplateError> {
    let ctx = context! {
        app_name => mail.app_name,
        idea_title => mail.idea_title,
        status_name => mail.status_name,
        idea_url => mail.idea_url,
        recipient_name => mail.recipient_name,
    };

    let subject = render_template("email/idea_status_updated.subject.jinja", ctx.clone())?;
    let body = render_template("email/idea_status_updated.jinja", ctx)?;

    Ok(RenderedMail {
        subject: subject.trim().to_string(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_idea_status_updated() {
        let mail = render_idea_status_updated(&IdeaStatusMail {
            app_name: "Idea Board",
            idea_title: "Dark mode",
            status_name: "In Progress",
            idea_url: "http://localhost:3000/ideas/dark-mode",
            recipient_name: "Imran",
        })
        .unwrap();

        assert_eq!(mail.subject, "Idea Board: \"Dark mode\" is now In Progress");
        assert!(mail.body.starts_with("Idea Status Updated"));
        assert!(mail.body.contains("Hi Imran,"));
        assert!(mail.body.contains("The idea, Dark mode"));
        assert!(mail.body.contains("has been updated to In Progress."));
        assert!(mail.body.contains("View Idea: http://localhost:3000/ideas/dark-mode"));
        assert!(mail.body.trim_end().ends_with("Idea Board"));
    }
}
