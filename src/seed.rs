use std::path::Path;
use tracing::info;

use crate::models::Portfolio;
use crate::store::{PortfolioStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("seed file is not a valid portfolio document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("seed document rejected: {0}")]
    Invalid(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub fn parse_portfolio(raw: &str) -> Result<Portfolio, SeedError> {
    let portfolio: Portfolio = serde_json::from_str(raw)?;
    portfolio
        .validate()
        .map_err(|e| SeedError::Invalid(e.to_string()))?;
    Ok(portfolio)
}

pub async fn load_portfolio(path: &Path) -> Result<Portfolio, SeedError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::Read {
            path: path.display().to_string(),
            source,
        })?;
    parse_portfolio(&raw)
}

// Inserts the document from `path` unless the store already holds one.
// Returns whether anything was written.
pub async fn seed_if_empty(store: &dyn PortfolioStore, path: &Path) -> Result<bool, SeedError> {
    if store.portfolio().await?.is_some() {
        info!("Portfolio data already exists, skipping seed");
        return Ok(false);
    }

    let portfolio = load_portfolio(path).await?;
    store.replace_portfolio(portfolio).await?;
    info!("Portfolio data seeded from {}", path.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    const SAMPLE: &str = r##"{
        "personal": {
            "name": "Jane Doe",
            "tagline": "Data Analyst & Science Enthusiast",
            "description": "Turning raw data into insights",
            "email": "jane@example.com",
            "phone": "+91 0000000000",
            "location": "Springfield",
            "bio": "Aspiring data analyst.",
            "education": [
                {"degree": "B.Tech", "institution": "State University", "period": "2020-2024", "grade": "Completed"}
            ]
        },
        "skills": {
            "technical": [{"name": "Python", "level": 90, "category": "Programming"}],
            "tools": ["Pandas"],
            "soft": ["Teamwork"]
        },
        "projects": [{
            "name": "Private Line",
            "description": "MERN clone",
            "technologies": ["React"],
            "period": "2023",
            "status": "Completed",
            "github": "#"
        }],
        "contact": {
            "email": "jane@example.com",
            "phone": "+91 0000000000",
            "location": "Springfield",
            "availability": "Open to opportunities",
            "social": {"github": "#"}
        }
    }"##;

    #[test]
    fn parses_document_with_missing_optional_sections() {
        let portfolio = parse_portfolio(SAMPLE).unwrap();
        assert_eq!(portfolio.personal.name, "Jane Doe");
        assert!(portfolio.experience.is_empty());
        assert_eq!(portfolio.projects[0].demo, None);
    }

    #[test]
    fn rejects_out_of_range_skill_level() {
        let raw = SAMPLE.replace("\"level\": 90", "\"level\": 150");
        assert!(matches!(parse_portfolio(&raw), Err(SeedError::Invalid(_))));
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let err = load_portfolio(Path::new("/nonexistent/portfolio.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, SeedError::Read { .. }));
    }

    #[tokio::test]
    async fn existing_portfolio_is_left_alone() {
        let store = MemoryStore::new();
        let mut current = parse_portfolio(SAMPLE).unwrap();
        current.personal.tagline = "Already here".into();
        store.replace_portfolio(current).await.unwrap();

        let wrote = seed_if_empty(&store, Path::new("/nonexistent/portfolio.json"))
            .await
            .unwrap();
        assert!(!wrote);
        let kept = store.portfolio().await.unwrap().unwrap();
        assert_eq!(kept.personal.tagline, "Already here");
    }
}
