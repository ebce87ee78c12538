//! Address
//!
//! Shipping-address capture: the form model, whole-form validation, and
//! the service that gates progression to payment. An address is only ever
//! persisted complete and valid; a rejected submission leaves storage
//! untouched.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::{Slot, Storage, StorageError, read_slot, write_slot};

/// Destination country pre-selected in the form.
pub const DEFAULT_COUNTRY: &str = "India";

/// The shipping address captured at checkout.
///
/// The wire shape (camelCase keys) is the persisted `shippingAddress`
/// record. Every field except `landmark` is mandatory for progression to
/// payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    /// Recipient's full name.
    pub full_name: String,

    /// Contact email.
    pub email: String,

    /// Contact phone number; any formatting, ten digits once stripped.
    pub phone: String,

    /// Street address.
    pub address: String,

    /// City.
    pub city: String,

    /// State.
    pub state: String,

    /// Six-digit postal code.
    pub pincode: String,

    /// Optional delivery landmark.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,

    /// Destination country; drives the tax lookup, never validated on its
    /// own.
    pub country: String,
}

impl Default for ShippingAddress {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            pincode: String::new(),
            landmark: None,
            country: DEFAULT_COUNTRY.to_owned(),
        }
    }
}

/// The validatable fields of the form, used to key error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AddressField {
    /// `fullName`
    FullName,

    /// `email`
    Email,

    /// `phone`
    Phone,

    /// `address`
    Address,

    /// `city`
    City,

    /// `state`
    State,

    /// `pincode`
    Pincode,
}

impl AddressField {
    /// The wire name of the field, matching the persisted record's keys.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            AddressField::FullName => "fullName",
            AddressField::Email => "email",
            AddressField::Phone => "phone",
            AddressField::Address => "address",
            AddressField::City => "city",
            AddressField::State => "state",
            AddressField::Pincode => "pincode",
        }
    }
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Field-level error messages from a rejected submission.
///
/// Each failing field carries exactly one message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    messages: BTreeMap<AddressField, &'static str>,
}

impl ValidationErrors {
    /// The message for a field, if it failed.
    #[must_use]
    pub fn message(&self, field: AddressField) -> Option<&'static str> {
        self.messages.get(&field).copied()
    }

    /// Whether the field failed validation.
    #[must_use]
    pub fn contains(&self, field: AddressField) -> bool {
        self.messages.contains_key(&field)
    }

    /// Iterate over failing fields and their messages, in field order.
    pub fn iter(&self) -> impl Iterator<Item = (AddressField, &'static str)> {
        self.messages.iter().map(|(field, message)| (*field, *message))
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether every field passed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn insert(&mut self, field: AddressField, message: &'static str) {
        self.messages.insert(field, message);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;

        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }

            write!(f, "{field}: {message}")?;
            first = false;
        }

        Ok(())
    }
}

// Patterns are compiled once and reused; a literal that failed to compile
// would reject everything rather than panic.

fn email_shape_ok(email: &str) -> bool {
    static RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").ok());

    RE.as_ref().is_some_and(|re| re.is_match(email))
}

fn phone_shape_ok(phone: &str) -> bool {
    static RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^\d{10}$").ok());

    // Shoppers type phone numbers with spaces, dashes and country codes;
    // only the digits count.
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();

    RE.as_ref().is_some_and(|re| re.is_match(&digits))
}

fn pincode_shape_ok(pincode: &str) -> bool {
    static RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^\d{6}$").ok());

    RE.as_ref().is_some_and(|re| re.is_match(pincode))
}

impl ShippingAddress {
    /// Validate the whole form.
    ///
    /// # Errors
    ///
    /// Returns the per-field error map if any rule fails; each failing
    /// field gets exactly one message.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.full_name.trim().is_empty() {
            errors.insert(AddressField::FullName, "Full name is required");
        }

        if self.email.trim().is_empty() {
            errors.insert(AddressField::Email, "Email is required");
        } else if !email_shape_ok(self.email.trim()) {
            errors.insert(AddressField::Email, "Invalid email format");
        }

        if self.phone.trim().is_empty() {
            errors.insert(AddressField::Phone, "Phone number is required");
        } else if !phone_shape_ok(&self.phone) {
            errors.insert(AddressField::Phone, "Invalid phone number");
        }

        if self.address.trim().is_empty() {
            errors.insert(AddressField::Address, "Address is required");
        }

        if self.city.trim().is_empty() {
            errors.insert(AddressField::City, "City is required");
        }

        if self.state.trim().is_empty() {
            errors.insert(AddressField::State, "State is required");
        }

        if self.pincode.trim().is_empty() {
            errors.insert(AddressField::Pincode, "Pincode is required");
        } else if !pincode_shape_ok(&self.pincode) {
            errors.insert(AddressField::Pincode, "Invalid pincode");
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Errors raised by an address submission.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The form failed validation; nothing was persisted.
    #[error("address validation failed: {0}")]
    Invalid(ValidationErrors),

    /// The backend could not be read or written.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Address capture service over a [`Storage`] backend.
///
/// Persists to the `shippingAddress` slot on full validation success only.
#[derive(Debug, Clone)]
pub struct AddressCapture<S> {
    storage: S,
}

impl<S: Storage> AddressCapture<S> {
    /// Create an address service over the given storage.
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Validate and persist an address. A resubmission overwrites the
    /// previous one.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Invalid`] with the field error map if
    /// validation fails (storage untouched), or [`SubmitError::Storage`]
    /// if the backend cannot be written.
    pub fn submit(&self, address: &ShippingAddress) -> Result<(), SubmitError> {
        address.validate().map_err(SubmitError::Invalid)?;

        write_slot(&self.storage, Slot::ShippingAddress, address)?;

        tracing::debug!(country = %address.country, "shipping address captured");

        Ok(())
    }

    /// The previously captured address, if any; pre-fills a revisited
    /// form. A corrupt slot reads as absent.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] only for backend I/O failures.
    pub fn saved(&self) -> Result<Option<ShippingAddress>, StorageError> {
        read_slot(&self.storage, Slot::ShippingAddress)
    }

    /// Delete the captured address. Called by the order finalizer after
    /// settlement.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the slot cannot be removed.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(Slot::ShippingAddress)
    }
}
