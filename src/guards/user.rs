use chrono::NaiveDate;
use derive_more::Display;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    model::role::Role,
    models::{blank_date_as_none, blank_str_as_none},
};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Display, PartialEq, Eq)]
pub enum UserError {
    #[display(fmt = "All fields are required")]
    MissingFields,
    #[display(fmt = "Phone number must be 10 digits")]
    InvalidPhone,
    #[display(fmt = "Password must be at least 6 characters")]
    ShortPassword,
    #[display(fmt = "Unknown role '{}'. Allowed: Admin, Employee", _0)]
    UnknownRole(String),
    #[display(fmt = "Passwords do not match")]
    PasswordMismatch,
    #[display(fmt = "Password must be at least 6 characters with at least 1 letter and 1 number")]
    WeakPassword,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UserInput {
    #[serde(default, deserialize_with = "blank_str_as_none")]
    #[schema(example = "Asha Rao")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "blank_str_as_none")]
    #[schema(example = "asha@company.com", format = "email")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "blank_str_as_none")]
    #[schema(example = "9876543210")]
    pub phone: Option<String>,
    /// Ignored on update
    #[serde(default, deserialize_with = "blank_str_as_none")]
    #[schema(example = "secret1")]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "blank_str_as_none")]
    #[schema(example = "Employee")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "blank_str_as_none")]
    #[schema(example = "Backend Engineer")]
    pub position: Option<String>,
    #[serde(default, deserialize_with = "blank_date_as_none")]
    #[schema(example = "2026-11-02", value_type = Option<String>, format = "date")]
    pub start_date: Option<NaiveDate>,
}

/// Validated profile fields shared by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub position: String,
    pub start_date: NaiveDate,
}

fn check_profile(input: &UserInput) -> Result<UserProfile, UserError> {
    let (Some(name), Some(email), Some(phone), Some(role), Some(position), Some(start_date)) = (
        &input.name,
        &input.email,
        &input.phone,
        &input.role,
        &input.position,
        input.start_date,
    ) else {
        return Err(UserError::MissingFields);
    };

    if phone.len() != 10 || !phone.bytes().all(|b| b.is_ascii_digit()) {
        return Err(UserError::InvalidPhone);
    }

    let role = role
        .parse::<Role>()
        .map_err(|_| UserError::UnknownRole(role.clone()))?;

    Ok(UserProfile {
        name: name.clone(),
        email: email.trim().to_lowercase(),
        phone: phone.clone(),
        role,
        position: position.clone(),
        start_date,
    })
}

/// Returns the profile and the plain password to hash.
pub fn check_new_user(input: &UserInput) -> Result<(UserProfile, String), UserError> {
    let password = input.password.clone().ok_or(UserError::MissingFields)?;
    let profile = check_profile(input)?;

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(UserError::ShortPassword);
    }

    Ok((profile, password))
}

pub fn check_user_update(input: &UserInput) -> Result<UserProfile, UserError> {
    check_profile(input)
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPassword {
    #[schema(example = "asha@company.com")]
    pub email: String,
    #[schema(example = "newpass1")]
    pub new_password: String,
    #[schema(example = "newpass1")]
    pub confirm_password: String,
}

pub fn check_password_reset(req: &ResetPassword) -> Result<(), UserError> {
    if req.new_password != req.confirm_password {
        return Err(UserError::PasswordMismatch);
    }

    let pw = &req.new_password;
    if pw.chars().count() < MIN_PASSWORD_LEN
        || !pw.chars().any(|c| c.is_ascii_digit())
        || !pw.chars().any(|c| c.is_ascii_alphabetic())
    {
        return Err(UserError::WeakPassword);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> UserInput {
        UserInput {
            name: Some("Asha Rao".into()),
            email: Some(" Asha@Company.com ".into()),
            phone: Some("9876543210".into()),
            password: Some("secret1".into()),
            role: Some("employee".into()),
            position: Some("Backend Engineer".into()),
            start_date: Some("2024-01-01".parse().unwrap()),
        }
    }

    #[test]
    fn valid_user_normalizes_email_and_role() {
        let (profile, password) = check_new_user(&input()).unwrap();
        assert_eq!(profile.email, "asha@company.com");
        assert_eq!(profile.role, Role::Employee);
        assert_eq!(password, "secret1");
    }

    #[test]
    fn phone_must_be_ten_digits() {
        for phone in ["98765", "98765432101", "98765x3210"] {
            let mut i = input();
            i.phone = Some(phone.into());
            assert_eq!(check_new_user(&i), Err(UserError::InvalidPhone));
        }
    }

    #[test]
    fn password_required_only_on_create() {
        let mut i = input();
        i.password = None;
        assert_eq!(check_new_user(&i), Err(UserError::MissingFields));
        assert!(check_user_update(&i).is_ok());

        i.password = Some("abc".into());
        assert_eq!(check_new_user(&i), Err(UserError::ShortPassword));
    }

    #[test]
    fn unknown_role() {
        let mut i = input();
        i.role = Some("Manager".into());
        assert_eq!(check_user_update(&i), Err(UserError::UnknownRole("Manager".into())));
    }

    #[test]
    fn reset_password_rules() {
        let reset = |new: &str, confirm: &str| ResetPassword {
            email: "a@b.c".into(),
            new_password: new.into(),
            confirm_password: confirm.into(),
        };
        assert_eq!(check_password_reset(&reset("abc123", "abc124")), Err(UserError::PasswordMismatch));
        assert_eq!(check_password_reset(&reset("abcdef", "abcdef")), Err(UserError::WeakPassword));
        assert_eq!(check_password_reset(&reset("123456", "123456")), Err(UserError::WeakPassword));
        assert_eq!(check_password_reset(&reset("ab12", "ab12")), Err(UserError::WeakPassword));
        assert!(check_password_reset(&reset("abc123", "abc123")).is_ok());
    }
}
