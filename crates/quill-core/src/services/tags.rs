use std::sync::Arc;

use crate::domain::Tag;
use crate::error::{DomainError, RepoError};
use crate::ports::TagRepository;

/// Tag administration.
#[derive(Clone)]
pub struct TagService {
    tags: Arc<dyn TagRepository>,
}

impl TagService {
    pub fn new(tags: Arc<dyn TagRepository>) -> Self {
        Self { tags }
    }

    pub async fn list(&self) -> Result<Vec<Tag>, DomainError> {
        Ok(self.tags.list().await?)
    }

    /// Create a tag with a unique name.
    pub async fn create(&self, name: &str) -> Result<Tag, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation("Tag name is required".to_string()));
        }
        if self.tags.exists_by_name(name).await? {
            return Err(DomainError::Duplicate(
                "This Tag Has Already Exist!".to_string(),
            ));
        }

        let tag = self.tags.create(name).await.map_err(|e| match e {
            // Lost a race with a concurrent insert of the same name.
            RepoError::Constraint(_) => {
                DomainError::Duplicate("This Tag Has Already Exist!".to_string())
            }
            other => other.into(),
        })?;

        tracing::info!(tag_id = tag.id, name = %tag.name, "Tag created");
        Ok(tag)
    }

    pub async fn delete(&self, id: i32) -> Result<(), DomainError> {
        self.tags.delete(id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("Tag not found!"),
            other => other.into(),
        })?;

        tracing::info!(tag_id = id, "Tag deleted");
        Ok(())
    }
}
