//! User and signup DTOs

use serde::Serialize;

use core_kernel::{Currency, Role, UserId};
use domain_identity::UserAccount;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub role: Role,
    pub email: Option<String>,
    pub designation: Option<String>,
    pub department: Option<String>,
    pub manager_id: Option<UserId>,
    pub location: Option<String>,
    pub nationality: Option<Currency>,
}

impl From<UserAccount> for UserResponse {
    fn from(user: UserAccount) -> Self {
        Self {
            id: user.id,
            name: user.name,
            role: user.role,
            email: user.email,
            designation: user.designation,
            department: user.department,
            manager_id: user.manager_id,
            location: user.location,
            nationality: user.nationality,
        }
    }
}
