use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::AppError;

// Portfolio document - the single record behind GET /api/portfolio
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Portfolio {
    pub personal: Personal,
    pub skills: Skills,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    pub contact: Contact,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Portfolio {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.personal.name.trim().is_empty() {
            return Err(AppError::BadRequest("personal.name must not be empty".into()));
        }
        if let Some(skill) = self.skills.technical.iter().find(|s| s.level > 100) {
            return Err(AppError::BadRequest(format!(
                "skill level for {} must be between 0 and 100",
                skill.name
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Personal {
    pub name: String,
    pub tagline: String,
    pub description: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub bio: String,
    #[serde(default)]
    pub education: Vec<Education>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub period: String,
    pub grade: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Skills {
    #[serde(default)]
    pub technical: Vec<Skill>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub soft: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Skill {
    pub name: String,
    pub level: u8, // percent
    pub category: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub location: String,
    pub period: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Project {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub period: String,
    pub status: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    pub period: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Contact {
    pub email: String,
    pub phone: String,
    pub location: String,
    pub availability: String,
    #[serde(default)]
    pub social: BTreeMap<String, String>,
}

// Contact form payload
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ContactMessageCreate {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
}

impl ContactMessageCreate {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("name must not be empty".into()));
        }
        if self.message.trim().is_empty() {
            return Err(AppError::BadRequest("message must not be empty".into()));
        }
        let email = self.email.trim();
        let valid_email = email
            .split_once('@')
            .is_some_and(|(user, domain)| !user.is_empty() && domain.contains('.'));
        if !valid_email {
            return Err(AppError::BadRequest("email is not a valid address".into()));
        }
        Ok(())
    }
}

// Stored contact message
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

impl From<ContactMessageCreate> for ContactMessage {
    fn from(new: ContactMessageCreate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: new.name.trim().to_string(),
            email: new.email.trim().to_string(),
            subject: new.subject,
            message: new.message,
            created_at: Utc::now(),
            read: false,
        }
    }
}
