//! User directory
//!
//! Registered users with their role, organisational details, and reviewing
//! manager, plus the signup requests waiting for admin approval.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use core_kernel::{Actor, Currency, Role, SignupRequestId, UserId};

use crate::error::IdentityError;
use crate::profile::{Profile, ProfileUpdate};
use crate::validation::{CredentialValidator, SignupForm};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub name: String,
    pub role: Role,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub designation: Option<String>,
    pub department: Option<String>,
    /// Reviewing manager; only meaningful for employees
    pub manager_id: Option<UserId>,
    pub nationality: Option<Currency>,
    pub location: Option<String>,
    /// Display currency chosen on the profile page
    pub display_currency: Option<Currency>,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            id: UserId::new_v7(),
            name: name.into(),
            role,
            email: None,
            phone: None,
            designation: None,
            department: None,
            manager_id: None,
            nationality: None,
            location: None,
            display_currency: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_position(mut self, designation: impl Into<String>, department: impl Into<String>) -> Self {
        self.designation = Some(designation.into());
        self.department = Some(department.into());
        self
    }

    pub fn with_manager(mut self, manager_id: UserId) -> Self {
        self.manager_id = Some(manager_id);
        self
    }

    pub fn with_nationality(mut self, nationality: Currency) -> Self {
        self.nationality = Some(nationality);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.role)
    }
}

/// Admin edits from the "Manage Users" page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetailsUpdate {
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub manager_id: Option<UserId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignupStatus {
    /// Waiting for an admin
    PendingApproval,
    /// Approved; the user may set a password
    Approved,
    /// Password set; the user logs in normally
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub id: SignupRequestId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub nationality: Option<Currency>,
    pub status: SignupStatus,
    pub user_id: Option<UserId>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct DirectoryState {
    users: HashMap<UserId, UserAccount>,
    signups: HashMap<SignupRequestId, SignupRequest>,
}

#[derive(Debug, Default)]
pub struct UserDirectory {
    state: RwLock<DirectoryState>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = UserAccount>) -> Result<Self, IdentityError> {
        let directory = Self::new();
        for user in users {
            directory.register(user)?;
        }
        Ok(directory)
    }

    /// Adds a user; names are unique, ignoring case
    pub fn register(&self, user: UserAccount) -> Result<(), IdentityError> {
        let mut state = self.write();
        if find_by_name(&state.users, &user.name).is_some() {
            return Err(IdentityError::validation(format!(
                "A user named {} already exists",
                user.name.trim()
            )));
        }
        state.users.insert(user.id, user);
        Ok(())
    }

    pub fn get(&self, id: UserId) -> Result<UserAccount, IdentityError> {
        self.read()
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| IdentityError::user_not_found(id))
    }

    /// Case-insensitive lookup by display name
    pub fn find_by_name(&self, name: &str) -> Option<UserAccount> {
        find_by_name(&self.read().users, name).cloned()
    }

    /// All users ordered by name
    pub fn list(&self) -> Vec<UserAccount> {
        let mut users: Vec<UserAccount> = self.read().users.values().cloned().collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        users
    }

    /// Employees reviewed by `manager_id`
    pub fn team_of(&self, manager_id: UserId) -> Vec<UserAccount> {
        let mut team: Vec<UserAccount> = self
            .read()
            .users
            .values()
            .filter(|u| u.manager_id == Some(manager_id))
            .cloned()
            .collect();
        team.sort_by(|a, b| a.name.cmp(&b.name));
        team
    }

    /// Admin-only edit of designation, department, and reviewing manager
    pub fn update_details(
        &self,
        actor: &Actor,
        user_id: UserId,
        update: &UserDetailsUpdate,
    ) -> Result<UserAccount, IdentityError> {
        if actor.role != Role::Admin {
            return Err(IdentityError::unauthorized("Only admins can edit user details"));
        }

        let mut state = self.write();
        if let Some(manager_id) = update.manager_id {
            match state.users.get(&manager_id) {
                Some(manager) if manager.role == Role::Manager => {}
                _ => {
                    return Err(IdentityError::validation(format!(
                        "{} is not a manager",
                        manager_id
                    )))
                }
            }
        }

        let user = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| IdentityError::user_not_found(user_id))?;
        if let Some(designation) = &update.designation {
            user.designation = non_blank(designation);
        }
        if let Some(department) = &update.department {
            user.department = non_blank(department);
        }
        if update.manager_id.is_some() {
            user.manager_id = update.manager_id;
        }

        info!(user_id = %user_id, admin = %actor.user_id, "User details updated");
        Ok(user.clone())
    }

    /// Applies the user's own profile edits
    pub fn update_profile(&self, user_id: UserId, update: &ProfileUpdate) -> Result<UserAccount, IdentityError> {
        let mut state = self.write();
        let user = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| IdentityError::user_not_found(user_id))?;

        if let Some(location) = &update.location {
            user.location = non_blank(location);
        }
        if let Some(currency) = update.currency {
            user.display_currency = Some(currency);
        }
        Ok(user.clone())
    }

    /// Builds the profile view; `default_currency` applies when the user
    /// never picked a display currency
    pub fn profile(&self, user_id: UserId, default_currency: Currency) -> Result<Profile, IdentityError> {
        let state = self.read();
        let user = state
            .users
            .get(&user_id)
            .ok_or_else(|| IdentityError::user_not_found(user_id))?;
        let manager = user
            .manager_id
            .and_then(|id| state.users.get(&id))
            .map(|m| m.name.clone());

        Ok(Profile {
            name: user.name.clone(),
            designation: user.designation.clone(),
            department: user.department.clone(),
            location: user.location.clone(),
            manager,
            currency: user.display_currency.unwrap_or(default_currency),
        })
    }

    /// Files a signup request for admin approval
    pub fn submit_signup(&self, form: &SignupForm) -> Result<SignupRequest, IdentityError> {
        CredentialValidator::validate_signup(form).into_result()?;
        let role = Role::from_firm_code(&form.firm_code)
            .ok_or_else(|| IdentityError::validation("Firm code must start with E, M or A"))?;

        let mut state = self.write();
        if find_by_name(&state.users, &form.name).is_some() {
            return Err(IdentityError::validation(format!(
                "A user named {} already exists",
                form.name.trim()
            )));
        }

        let request = SignupRequest {
            id: SignupRequestId::new_v7(),
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.number.as_deref().and_then(non_blank),
            role,
            nationality: form
                .nationality
                .as_deref()
                .filter(|n| !n.trim().is_empty())
                .and_then(|n| Currency::new(n).ok()),
            status: SignupStatus::PendingApproval,
            user_id: None,
            submitted_at: Utc::now(),
        };
        state.signups.insert(request.id, request.clone());

        info!(request_id = %request.id, role = %request.role, "Signup request submitted");
        Ok(request)
    }

    pub fn signup(&self, id: SignupRequestId) -> Result<SignupRequest, IdentityError> {
        self.read()
            .signups
            .get(&id)
            .cloned()
            .ok_or(IdentityError::SignupNotFound(id))
    }

    /// Requests still waiting for an admin, oldest first
    pub fn pending_signups(&self) -> Vec<SignupRequest> {
        let mut pending: Vec<SignupRequest> = self
            .read()
            .signups
            .values()
            .filter(|s| s.status == SignupStatus::PendingApproval)
            .cloned()
            .collect();
        pending.sort_by_key(|s| s.submitted_at);
        pending
    }

    /// Admin approval; registers the user account
    pub fn approve_signup(&self, actor: &Actor, id: SignupRequestId) -> Result<UserAccount, IdentityError> {
        if actor.role != Role::Admin {
            return Err(IdentityError::unauthorized("Only admins can approve signups"));
        }

        let mut state = self.write();
        let request = state
            .signups
            .get(&id)
            .cloned()
            .ok_or(IdentityError::SignupNotFound(id))?;
        if request.status != SignupStatus::PendingApproval {
            return Err(IdentityError::validation("Signup request was already approved"));
        }
        if find_by_name(&state.users, &request.name).is_some() {
            return Err(IdentityError::validation(format!(
                "A user named {} already exists",
                request.name
            )));
        }

        let mut user = UserAccount::new(request.name.clone(), request.role);
        user.email = Some(request.email.clone());
        user.phone = request.phone.clone();
        user.nationality = request.nationality;
        state.users.insert(user.id, user.clone());

        if let Some(stored) = state.signups.get_mut(&id) {
            stored.status = SignupStatus::Approved;
            stored.user_id = Some(user.id);
        }

        info!(request_id = %id, user_id = %user.id, admin = %actor.user_id, "Signup approved");
        Ok(user)
    }

    /// Marks an approved request as completed
    ///
    /// The status is checked and moved under one write guard, so of two
    /// racing callers exactly one completes the request.
    pub fn complete_signup(&self, id: SignupRequestId) -> Result<SignupRequest, IdentityError> {
        let mut state = self.write();
        let request = state
            .signups
            .get_mut(&id)
            .ok_or(IdentityError::SignupNotFound(id))?;
        match request.status {
            SignupStatus::PendingApproval => Err(IdentityError::SignupAwaitingApproval(id)),
            SignupStatus::Completed => Err(IdentityError::validation("Password was already set")),
            SignupStatus::Approved => {
                request.status = SignupStatus::Completed;
                Ok(request.clone())
            }
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, DirectoryState> {
        self.state.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, DirectoryState> {
        self.state.write().unwrap_or_else(|p| p.into_inner())
    }
}

fn find_by_name<'a>(users: &'a HashMap<UserId, UserAccount>, name: &str) -> Option<&'a UserAccount> {
    let wanted = name.trim();
    users.values().find(|u| u.name.eq_ignore_ascii_case(wanted))
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// The organisation shipped with a fresh install
pub fn demo_users() -> Vec<UserAccount> {
    let manager = UserAccount::new("Jane Smith", Role::Manager)
        .with_position("Engineering Manager", "Engineering")
        .with_nationality(Currency::USD);

    vec![
        UserAccount::new("John Doe", Role::Employee)
            .with_position("Senior Developer", "Engineering")
            .with_manager(manager.id)
            .with_location("New York, USA")
            .with_nationality(Currency::USD),
        UserAccount::new("Bob Johnson", Role::Employee)
            .with_position("Sales Executive", "Sales")
            .with_manager(manager.id),
        UserAccount::new("Aprova Admin", Role::Admin).with_position("Administrator", "Finance"),
        manager,
    ]
}
