//! Form validation.
//!
//! Every form that leads to an API call is checked here first. A form that
//! fails produces [`FieldErrors`] and no request is made.

use serde::{Deserialize, Serialize};

use crate::types::{Email, OrderStatus, Price};

/// Per-field validation messages, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(&'static str, String)>);

impl FieldErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push((field, message.into()));
    }

    /// Message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, msg)| msg.as_str())
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    /// First message, used as the alert text.
    #[must_use]
    pub fn summary(&self) -> &str {
        self.0.first().map_or("", |(_, msg)| msg.as_str())
    }

    fn require(&mut self, field: &'static str, label: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, format!("{label} is required"));
        }
    }

    fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

/// Body of `sign-in`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    /// # Errors
    ///
    /// Returns the missing fields.
    pub fn validate(&self) -> Result<Credentials, FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.require("username", "Username", &self.username);
        errors.require("password", "Password", &self.password);
        errors.finish(|| Credentials {
            username: self.username.trim().to_owned(),
            password: self.password.clone(),
        })
    }
}

/// Body of `sign-up`.
#[derive(Debug, Clone, Serialize)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignUpForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub address: String,
}

impl SignUpForm {
    /// # Errors
    ///
    /// Returns missing fields and a malformed email.
    pub fn validate(&self) -> Result<NewAccount, FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.require("username", "Username", &self.username);
        let email = if self.email.trim().is_empty() {
            errors.require("email", "Email", &self.email);
            None
        } else {
            match Email::parse(&self.email) {
                Ok(email) => Some(email),
                Err(err) => {
                    errors.push("email", err.to_string());
                    None
                }
            }
        };
        errors.require("password", "Password", &self.password);
        errors.require("address", "Address", &self.address);

        errors.finish(|| NewAccount {
            username: self.username.trim().to_owned(),
            email: email.map(Email::into_inner).unwrap_or_default(),
            password: self.password.clone(),
            address: self.address.trim().to_owned(),
        })
    }
}

/// Body of `add-book` and `update-book`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewBook {
    pub url: String,
    pub title: String,
    pub author: String,
    pub price: Price,
    pub desc: String,
    pub language: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookForm {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub language: String,
}

impl BookForm {
    /// # Errors
    ///
    /// Returns missing fields and a price that is not a non-negative number.
    pub fn validate(&self) -> Result<NewBook, FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.require("url", "Image URL", &self.url);
        errors.require("title", "Title", &self.title);
        errors.require("author", "Author", &self.author);

        let price = if self.price.trim().is_empty() {
            errors.require("price", "Price", &self.price);
            Price::ZERO
        } else {
            match self.price.parse::<Price>() {
                Ok(price) if !price.is_negative() => price,
                Ok(_) => {
                    errors.push("price", "Price cannot be negative");
                    Price::ZERO
                }
                Err(_) => {
                    errors.push("price", "Price must be a number");
                    Price::ZERO
                }
            }
        };

        errors.require("desc", "Description", &self.desc);
        errors.require("language", "Language", &self.language);

        errors.finish(|| NewBook {
            url: self.url.trim().to_owned(),
            title: self.title.trim().to_owned(),
            author: self.author.trim().to_owned(),
            price,
            desc: self.desc.trim().to_owned(),
            language: self.language.trim().to_owned(),
        })
    }
}

impl From<&crate::book::Book> for BookForm {
    fn from(book: &crate::book::Book) -> Self {
        Self {
            url: book.url.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            price: book.price.amount().to_string(),
            desc: book.desc.clone(),
            language: book.language.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressForm {
    #[serde(default)]
    pub address: String,
}

impl AddressForm {
    /// # Errors
    ///
    /// Returns an error when the address is blank.
    pub fn validate(&self) -> Result<String, FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.require("address", "Address", &self.address);
        errors.finish(|| self.address.trim().to_owned())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusForm {
    #[serde(default)]
    pub status: String,
}

impl StatusForm {
    /// # Errors
    ///
    /// Returns an error unless the status is one of [`OrderStatus::ALL`].
    pub fn validate(&self) -> Result<OrderStatus, FieldErrors> {
        let mut errors = FieldErrors::default();
        errors.require("status", "Status", &self.status);
        if !errors.is_empty() {
            return Err(errors);
        }
        OrderStatus::parse_known(&self.status).ok_or_else(|| {
            errors.push("status", format!("Unknown status: {}", self.status.trim()));
            errors
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_requires_username() {
        let form = LoginForm {
            username: "   ".into(),
            password: "secret".into(),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("username"), Some("Username is required"));
        assert_eq!(errors.get("password"), None);
    }

    #[test]
    fn test_login_trims_username() {
        let creds = LoginForm {
            username: " asha ".into(),
            password: "pw".into(),
        }
        .validate()
        .unwrap();
        assert_eq!(creds.username, "asha");
    }

    #[test]
    fn test_signup_collects_every_error() {
        let errors = SignUpForm {
            email: "not-an-email".into(),
            ..SignUpForm::default()
        }
        .validate()
        .unwrap_err();

        let fields: Vec<_> = errors.iter().map(|(field, _)| field).collect();
        assert_eq!(fields, ["username", "email", "password", "address"]);
        assert_eq!(errors.summary(), "Username is required");
    }

    #[test]
    fn test_book_form_price_rules() {
        let mut form = BookForm {
            url: "https://covers.example/x.jpg".into(),
            title: "X".into(),
            author: "Y".into(),
            price: "abc".into(),
            desc: "Z".into(),
            language: "English".into(),
        };
        assert_eq!(
            form.validate().unwrap_err().get("price"),
            Some("Price must be a number")
        );

        form.price = "-5".into();
        assert_eq!(
            form.validate().unwrap_err().get("price"),
            Some("Price cannot be negative")
        );

        form.price = "349.50".into();
        assert_eq!(form.validate().unwrap().price, "349.50".parse().unwrap());
    }

    #[test]
    fn test_status_form() {
        let ok = StatusForm { status: "delivered".into() }.validate();
        assert_eq!(ok, Ok(OrderStatus::Delivered));

        let bad = StatusForm { status: "Lost".into() }.validate().unwrap_err();
        assert!(bad.get("status").is_some());
    }
}
