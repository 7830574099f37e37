//! User - Someone who signs in to browse launch data
//!
//! A user is identified by email alone.

use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::entity::{Entity, EntityKind, EntityMeta};
use super::error::{non_blank, ValidationError};

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[_A-Za-z0-9+-]+(\.[_A-Za-z0-9-]+)*@[A-Za-z0-9-]+(\.[A-Za-z0-9]+)*(\.[A-Za-z]{2,})$")
        .unwrap()
});

/// Business key of a user
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UserKey {
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(flatten)]
    meta: EntityMeta,
    first_name: Option<String>,
    last_name: Option<String>,
    email: String,
    #[serde(skip)]
    password: Option<String>,
}

impl User {
    pub fn new(email: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            meta: EntityMeta::default(),
            first_name: None,
            last_name: None,
            email: check_email(email.into())?,
            password: None,
        })
    }

    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn set_first_name(&mut self, first_name: impl Into<String>) -> Result<(), ValidationError> {
        self.first_name = Some(non_blank("firstName", first_name)?);
        Ok(())
    }

    pub fn set_last_name(&mut self, last_name: impl Into<String>) -> Result<(), ValidationError> {
        self.last_name = Some(non_blank("lastName", last_name)?);
        Ok(())
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> Result<(), ValidationError> {
        self.email = check_email(email.into())?;
        Ok(())
    }

    pub fn set_password(&mut self, password: impl Into<String>) -> Result<(), ValidationError> {
        self.password = Some(non_blank("password", password)?);
        Ok(())
    }
}

fn check_email(email: String) -> Result<String, ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::EmptyField { field: "email" });
    }
    if !EMAIL_REGEX.is_match(&email) {
        return Err(ValidationError::invalid(
            "email",
            format!("'{}' is not of the form local@domain.tld", email),
        ));
    }
    Ok(email)
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;
    type Key = UserKey;

    fn key(&self) -> UserKey {
        UserKey {
            email: self.email.clone(),
        }
    }

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.email == other.email
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.email.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_format() {
        for ok in ["abc@example.com", "first.last@mail.monash.edu", "a+b_c-d@x-y.io"] {
            assert!(User::new(ok).is_ok(), "{} should be accepted", ok);
        }
        for bad in ["abc", "abc@", "abc@example", "@example.com", "abc@example.c"] {
            assert!(
                matches!(User::new(bad), Err(ValidationError::InvalidValue { field: "email", .. })),
                "{} should be rejected",
                bad
            );
        }
        assert_eq!(User::new("").unwrap_err(), ValidationError::EmptyField { field: "email" });
    }

    #[test]
    fn test_equal_email_same_user() {
        let mut a = User::new("abc@example.com").unwrap();
        let b = User::new("abc@example.com").unwrap();
        a.set_first_name("Ada").unwrap();
        assert_eq!(a, b);

        let c = User::new("xyz@example.com").unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_password_not_blank() {
        let mut user = User::new("abc@example.com").unwrap();
        assert_eq!(
            user.set_password("   "),
            Err(ValidationError::EmptyField { field: "password" })
        );
        user.set_password("s3cret!Pass").unwrap();
        assert_eq!(user.password(), Some("s3cret!Pass"));
    }

    #[test]
    fn test_names_not_blank() {
        let mut user = User::new("abc@example.com").unwrap();
        assert!(user.set_first_name("").is_err());
        assert!(user.set_last_name(" ").is_err());
        user.set_last_name("Lovelace").unwrap();
        assert_eq!(user.last_name(), Some("Lovelace"));
    }

    #[test]
    fn test_set_email_revalidates() {
        let mut user = User::new("abc@example.com").unwrap();
        assert!(user.set_email("not-an-email").is_err());
        assert_eq!(user.email(), "abc@example.com");
    }
}
