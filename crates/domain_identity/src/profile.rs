//! User profile as shown on the "Edit Profile" page
//!
//! Name, designation, department and manager are maintained by admins and
//! are read-only to the user. Location and display currency are editable.

use serde::{Deserialize, Serialize};

use core_kernel::Currency;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub designation: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
    pub manager: Option<String>,
    pub currency: Currency,
}

/// Fields a user may change on their own profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub currency: Option<Currency>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.location.is_none() && self.currency.is_none()
    }
}

impl Profile {
    /// Applies the editable fields; read-only fields are untouched
    pub fn apply(&mut self, update: &ProfileUpdate) {
        if let Some(location) = &update.location {
            let location = location.trim();
            self.location = (!location.is_empty()).then(|| location.to_string());
        }
        if let Some(currency) = update.currency {
            self.currency = currency;
        }
    }
}
