use serde::{Deserialize, Serialize};

use crate::db_types::UserProfileUpdate;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    pub full_name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PasswordResetRequest {
    pub token: Option<String>,
    pub password: Option<String>,
}

/// Profile form as submitted by a user. `profile_picture` holds the URL of a freshly uploaded picture, if any.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub username: Option<String>,
    pub bio: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub account_name: Option<String>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub profile_picture: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl ProfileUpdate {
    pub fn has_bank_details(&self) -> bool {
        [&self.account_name, &self.bank_name, &self.account_number]
            .into_iter()
            .all(|v| v.as_deref().map(|s| !s.trim().is_empty()).unwrap_or(false))
    }

    /// Converts the form into a storage update. Blank fields are dropped, and the account is marked as verified only
    /// when all three bank fields are present.
    pub fn into_update(self) -> UserProfileUpdate {
        let is_verified = self.has_bank_details().then_some(true);
        UserProfileUpdate {
            full_name: non_blank(self.full_name),
            username: non_blank(self.username),
            bio: non_blank(self.bio),
            address: non_blank(self.address),
            phone_number: non_blank(self.phone_number),
            city: non_blank(self.city),
            state: non_blank(self.state),
            country: non_blank(self.country),
            account_name: non_blank(self.account_name),
            bank_name: non_blank(self.bank_name),
            account_number: non_blank(self.account_number),
            profile_picture: non_blank(self.profile_picture),
            is_verified,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    pub bank_name: String,
    pub account_number: String,
    pub account_name: String,
}
