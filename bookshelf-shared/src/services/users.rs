/// User profile service

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::{validate, ServiceError};
use crate::models::user::User;
use crate::repositories::{RepositoryError, UnitOfWork, UserRepository};
use crate::validation::not_blank;

/// User as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub user_name: String,
    pub is_verified: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            user_name: user.user_name,
            is_verified: user.is_verified,
        }
    }
}

/// Input for creating a user profile
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateUser {
    #[validate(
        length(max = 50, message = "User name must not exceed 50 characters"),
        custom(function = "not_blank")
    )]
    pub user_name: String,
}

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(uow: &UnitOfWork) -> Self {
        Self { users: uow.users() }
    }

    pub async fn get(&self, id: Uuid) -> Result<UserResponse, ServiceError> {
        self.users
            .find_by_id(id)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| ServiceError::not_found("User", id))
    }

    /// Creates an unverified profile
    ///
    /// # Errors
    ///
    /// `ServiceError::Conflict` if the user name is taken.
    pub async fn create(&self, request: CreateUser) -> Result<Uuid, ServiceError> {
        validate(&request)?;

        let user = User::new(request.user_name);
        match self.users.insert(&user).await {
            Ok(()) => {}
            Err(RepositoryError::UniqueViolation(_)) => {
                return Err(ServiceError::Conflict(format!(
                    "User name '{}' is already taken",
                    user.user_name
                )));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(user_id = %user.id, "User created");
        Ok(user.id)
    }
}
