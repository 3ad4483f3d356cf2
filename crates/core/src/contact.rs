//! Contact (rider/driver) domain types and registration validation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Contact validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContactError {
    /// A required field is missing.
    #[error("{0} is required")]
    MissingField(&'static str),
    /// Unknown gender value.
    #[error("Invalid gender")]
    InvalidGender,
    /// Unknown contact type value.
    #[error("Invalid contact_type")]
    InvalidContactType,
    /// Coupon value must not be negative.
    #[error("coupon_value must be >= 0")]
    NegativeCoupon,
}

/// Whether a contact drives or rides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactType {
    /// Platform driver.
    Driver,
    /// Platform rider.
    Rider,
}

impl ContactType {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Driver => "driver",
            Self::Rider => "rider",
        }
    }
}

impl std::str::FromStr for ContactType {
    type Err = ContactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "driver" => Ok(Self::Driver),
            "rider" => Ok(Self::Rider),
            _ => Err(ContactError::InvalidContactType),
        }
    }
}

/// Contact gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
}

impl Gender {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = ContactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            _ => Err(ContactError::InvalidGender),
        }
    }
}

/// Validated registration input.
#[derive(Debug, Clone)]
pub struct Registration {
    /// External platform id, unique per company.
    pub sub_id: String,
    /// Contact name.
    pub name: String,
    /// Email address.
    pub email: Option<String>,
    /// Mobile number, unique per company.
    pub mobile: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Gender.
    pub gender: Option<Gender>,
    /// Driver or rider.
    pub contact_type: Option<ContactType>,
    /// Welcome coupon value credited to the new wallet.
    pub coupon_value: Decimal,
}

impl Registration {
    /// Validates the required fields and value ranges.
    pub fn validate(&self) -> Result<(), ContactError> {
        if self.sub_id.trim().is_empty() {
            return Err(ContactError::MissingField("sub_id"));
        }
        if self.name.trim().is_empty() {
            return Err(ContactError::MissingField("name"));
        }
        if self.coupon_value < Decimal::ZERO {
            return Err(ContactError::NegativeCoupon);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    fn registration() -> Registration {
        Registration {
            sub_id: "SUB-1".to_string(),
            name: "Amira".to_string(),
            email: None,
            mobile: Some("0912345678".to_string()),
            city: None,
            gender: None,
            contact_type: Some(ContactType::Rider),
            coupon_value: Decimal::ZERO,
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(registration().validate().is_ok());
    }

    #[test]
    fn test_sub_id_required() {
        let mut r = registration();
        r.sub_id = "  ".to_string();
        assert_eq!(r.validate(), Err(ContactError::MissingField("sub_id")));
    }

    #[test]
    fn test_name_required() {
        let mut r = registration();
        r.name = String::new();
        assert_eq!(r.validate(), Err(ContactError::MissingField("name")));
    }

    #[test]
    fn test_negative_coupon_rejected() {
        let mut r = registration();
        r.coupon_value = dec!(-1);
        assert_eq!(r.validate(), Err(ContactError::NegativeCoupon));
    }

    #[rstest::rstest]
    #[case("driver", ContactType::Driver)]
    #[case("rider", ContactType::Rider)]
    fn test_contact_type_roundtrip(#[case] raw: &str, #[case] expected: ContactType) {
        assert_eq!(ContactType::from_str(raw), Ok(expected));
        assert_eq!(expected.as_str(), raw);
    }

    #[rstest::rstest]
    #[case("male", Gender::Male)]
    #[case("female", Gender::Female)]
    fn test_gender_roundtrip(#[case] raw: &str, #[case] expected: Gender) {
        assert_eq!(Gender::from_str(raw), Ok(expected));
        assert_eq!(expected.as_str(), raw);
    }

    #[test]
    fn test_unknown_enum_values_rejected() {
        assert_eq!(
            ContactType::from_str("passenger"),
            Err(ContactError::InvalidContactType)
        );
        assert_eq!(Gender::from_str("other"), Err(ContactError::InvalidGender));
    }
}
