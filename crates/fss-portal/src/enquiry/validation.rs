//! Enquiry form values and validation rules.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use fss_client::{CreateEnquiryRequest, ParseEnumError, Service, ValidationErrors};
use regex::Regex;

/// Minimum length of the trimmed name.
pub const MIN_NAME_CHARS: usize = 2;

/// Minimum length of the trimmed message.
pub const MIN_MESSAGE_CHARS: usize = 10;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"))
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\+?[1-9][0-9]{9,14}$").expect("phone pattern"))
}

/// A field of the enquiry form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Email,
    Phone,
    Service,
    Message,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Name,
        FormField::Email,
        FormField::Phone,
        FormField::Service,
        FormField::Message,
    ];

    /// Key used in validation error sets, identical to the wire field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::Phone => "phone",
            FormField::Service => "service",
            FormField::Message => "message",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormField {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormField::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError::new("field", s))
    }
}

/// Raw values as typed by the visitor.
///
/// `service` stays text until validation so that an empty selection can be
/// reported like any other field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnquiryForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub message: String,
}

impl EnquiryForm {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Phone => &self.phone,
            FormField::Service => &self.service,
            FormField::Message => &self.message,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Name => self.name = value,
            FormField::Email => self.email = value,
            FormField::Phone => self.phone = value,
            FormField::Service => self.service = value,
            FormField::Message => self.message = value,
        }
    }

    pub fn is_blank(&self) -> bool {
        FormField::ALL
            .iter()
            .all(|field| self.get(*field).trim().is_empty())
    }

    /// Build the create request, or the full set of field errors.
    pub fn to_request(&self) -> Result<CreateEnquiryRequest, ValidationErrors> {
        let errors = validate(self);
        if !errors.is_empty() {
            return Err(errors);
        }
        let service = self
            .service
            .parse::<Service>()
            .map_err(|_| service_error())?;

        Ok(CreateEnquiryRequest {
            name: self.name.trim().to_string(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            service,
            message: self.message.trim().to_string(),
        })
    }
}

fn service_error() -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.insert(FormField::Service.as_str(), "Please select a service");
    errors
}

/// Validate a single field.
pub fn validate_field(form: &EnquiryForm, field: FormField) -> Option<&'static str> {
    match field {
        FormField::Name => {
            let name = form.name.trim();
            if name.is_empty() {
                Some("Name is required")
            } else if name.chars().count() < MIN_NAME_CHARS {
                Some("Name must be at least 2 characters")
            } else {
                None
            }
        }
        FormField::Email => {
            if form.email.trim().is_empty() {
                Some("Email is required")
            } else if !email_pattern().is_match(&form.email) {
                Some("Please enter a valid email address")
            } else {
                None
            }
        }
        FormField::Phone => {
            if form.phone.trim().is_empty() {
                Some("Phone number is required")
            } else if !phone_pattern().is_match(&form.phone) {
                Some("Please enter a valid phone number")
            } else {
                None
            }
        }
        FormField::Service => match form.service.parse::<Service>() {
            Ok(_) => None,
            Err(_) => Some("Please select a service"),
        },
        FormField::Message => {
            let message = form.message.trim();
            if message.is_empty() {
                Some("Message is required")
            } else if message.chars().count() < MIN_MESSAGE_CHARS {
                Some("Message must be at least 10 characters")
            } else {
                None
            }
        }
    }
}

/// Validate every field. An empty set means the form can be submitted.
pub fn validate(form: &EnquiryForm) -> ValidationErrors {
    FormField::ALL
        .into_iter()
        .filter_map(|field| {
            validate_field(form, field).map(|message| (field.as_str().to_string(), message.to_string()))
        })
        .collect()
}
