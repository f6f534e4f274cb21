use serde::Deserialize;

use crate::users::repo_types::{NewUser, Role};

/// Query for `GET /user?id=`.
#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub id: i32,
}

/// Body of `POST /create-user`. Absent fields fall back to empty values;
/// unknown fields are rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct CreateUserRequest {
    pub id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

impl From<CreateUserRequest> for NewUser {
    fn from(r: CreateUserRequest) -> Self {
        Self {
            id: r.id,
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            password_hash: r.password_hash,
            role: r.role,
        }
    }
}
