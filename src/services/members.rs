//! Member registration service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::member::{Member, NewMember},
    repository::Repository,
};

#[derive(Clone)]
pub struct MembersService {
    repository: Repository,
}

impl MembersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn register(&self, name: &str, email: &str, phone: &str) -> AppResult<Member> {
        self.add(NewMember::new(name, email, phone)).await
    }

    pub async fn add(&self, member: NewMember) -> AppResult<Member> {
        member.validate()?;
        let member = self.repository.members.create(&member).await?;
        tracing::info!(member_id = member.id, "Member registered");
        Ok(member)
    }

    pub async fn list(&self) -> AppResult<Vec<Member>> {
        self.repository.members.list().await
    }

    pub async fn get(&self, id: i64) -> AppResult<Member> {
        self.repository
            .members
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member with id {} not found", id)))
    }

    pub async fn count(&self) -> AppResult<i64> {
        self.repository.members.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn service() -> MembersService {
        MembersService::new(Repository::new(db::memory_pool().await.unwrap()))
    }

    #[tokio::test]
    async fn test_register_and_list() {
        let members = service().await;

        let john = members
            .register("John Doe", "john.doe@example.com", "555-0101")
            .await
            .unwrap();
        let jane = members
            .register("Jane Smith", "jane.smith@example.com", "")
            .await
            .unwrap();

        assert_eq!(members.list().await.unwrap(), vec![john.clone(), jane]);
        assert_eq!(members.get(john.id).await.unwrap().phone, "555-0101");
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let members = service().await;

        let err = members.register("John Doe", "john", "").await.unwrap_err();

        assert!(matches!(err, AppError::Validation(ref m) if m.contains("Invalid email format")));
        assert_eq!(members.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_unknown_member() {
        let members = service().await;

        assert!(matches!(members.get(3).await, Err(AppError::NotFound(_))));
    }
}
