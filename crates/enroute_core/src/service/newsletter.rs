//! Newsletter e-mail signups kept under `lap_newsletter_emails`.
//!
//! # Invariants
//! - Stored addresses are trimmed, valid per [`is_valid_email`] and unique.

use crate::storage::Persistence;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const NEWSLETTER_KEY: &str = "lap_newsletter_emails";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsletterError {
    InvalidEmail(String),
}

impl Display for NewsletterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEmail(value) => write!(f, "invalid email address: `{value}`"),
        }
    }
}

impl Error for NewsletterError {}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub struct NewsletterList {
    persistence: Persistence,
}

impl NewsletterList {
    pub fn new(persistence: Persistence) -> Self {
        Self { persistence }
    }

    pub fn emails(&self) -> Vec<String> {
        self.persistence.read(NEWSLETTER_KEY, Vec::new())
    }

    /// Records `email` once.
    ///
    /// Returns `Ok(true)` when newly added and `Ok(false)` when it was already
    /// subscribed.
    ///
    /// # Errors
    /// - Returns `InvalidEmail` when the trimmed input is not an address.
    pub fn subscribe(&self, email: &str) -> Result<bool, NewsletterError> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(NewsletterError::InvalidEmail(email.to_string()));
        }

        let mut emails = self.emails();
        if emails.iter().any(|existing| existing == email) {
            return Ok(false);
        }
        emails.push(email.to_string());
        self.persistence.write(NEWSLETTER_KEY, &emails);
        info!(
            "event=newsletter_subscribe module=service status=ok count={}",
            emails.len()
        );
        Ok(true)
    }
}
