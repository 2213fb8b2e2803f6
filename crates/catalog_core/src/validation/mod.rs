//! Product field validation rules.
//!
//! # Responsibility
//! - Name the editable product fields and their synchronous constraints.
//! - Produce typed, displayable field errors.
//!
//! # Invariants
//! - Length limits count characters, not bytes.
//! - Length and date rules stay silent on empty input; `required` reports it.
//! - `date_release` is compared to `today` by calendar day only.

use crate::model::date::{parse_local_date, DateError};
use chrono::NaiveDate;
use std::fmt::{Display, Formatter};

pub mod id_check;

pub const ID_MIN_LEN: usize = 3;
pub const ID_MAX_LEN: usize = 10;
pub const NAME_MIN_LEN: usize = 6;
pub const NAME_MAX_LEN: usize = 100;
pub const DESCRIPTION_MIN_LEN: usize = 10;
pub const DESCRIPTION_MAX_LEN: usize = 200;

/// Product form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProductField {
    Id,
    Name,
    Description,
    Logo,
    DateRelease,
    DateRevision,
}

impl ProductField {
    /// All fields in display order.
    pub const ALL: [ProductField; 6] = [
        ProductField::Id,
        ProductField::Name,
        ProductField::Description,
        ProductField::Logo,
        ProductField::DateRelease,
        ProductField::DateRevision,
    ];

    /// Wire/field name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Description => "description",
            Self::Logo => "logo",
            Self::DateRelease => "date_release",
            Self::DateRevision => "date_revision",
        }
    }

    /// Resolves a wire/field name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == name.trim())
    }
}

impl Display for ProductField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One violated field constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    Required,
    MinLength { min: usize, actual: usize },
    MaxLength { max: usize, actual: usize },
    InvalidDate(DateError),
    BeforeToday { today: NaiveDate },
    IdTaken,
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required => write!(f, "this field is required"),
            Self::MinLength { min, actual } => {
                write!(f, "must be at least {min} characters (got {actual})")
            }
            Self::MaxLength { max, actual } => {
                write!(f, "must be at most {max} characters (got {actual})")
            }
            Self::InvalidDate(err) => write!(f, "{err}"),
            Self::BeforeToday { today } => {
                write!(f, "must be today ({}) or later", today.format("%Y-%m-%d"))
            }
            Self::IdTaken => write!(f, "this id is already in use"),
        }
    }
}

/// Runs the synchronous rules for `field` against `value`.
///
/// The async uniqueness rule for `id` is not included; see [`id_check`].
pub fn validate_field(field: ProductField, value: &str, today: NaiveDate) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if let Some(err) = required(value) {
        errors.push(err);
        return errors;
    }

    match field {
        ProductField::Id => errors.extend(length_between(value, ID_MIN_LEN, ID_MAX_LEN)),
        ProductField::Name => errors.extend(length_between(value, NAME_MIN_LEN, NAME_MAX_LEN)),
        ProductField::Description => errors.extend(length_between(
            value,
            DESCRIPTION_MIN_LEN,
            DESCRIPTION_MAX_LEN,
        )),
        ProductField::DateRelease => errors.extend(min_today(value, today)),
        ProductField::Logo | ProductField::DateRevision => {}
    }
    errors
}

/// Fails on the empty string only.
pub fn required(value: &str) -> Option<FieldError> {
    value.is_empty().then_some(FieldError::Required)
}

/// Character-count bounds; empty input passes.
pub fn length_between(value: &str, min: usize, max: usize) -> Option<FieldError> {
    if value.is_empty() {
        return None;
    }
    let actual = value.chars().count();
    if actual < min {
        Some(FieldError::MinLength { min, actual })
    } else if actual > max {
        Some(FieldError::MaxLength { max, actual })
    } else {
        None
    }
}

/// Release day must be `today` or later; empty input passes.
pub fn min_today(value: &str, today: NaiveDate) -> Option<FieldError> {
    if value.trim().is_empty() {
        return None;
    }
    match parse_local_date(value) {
        Ok(day) if day >= today => None,
        Ok(_) => Some(FieldError::BeforeToday { today }),
        Err(err) => Some(FieldError::InvalidDate(err)),
    }
}
