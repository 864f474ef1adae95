//! Customer identity and postal addresses

use serde::{Deserialize, Serialize};

/// Postal address split in its components
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street: String,
    pub civic_number: String,
    pub postal_code: String,
    pub city: String,
    /// Two-letter province code (e.g. "TV")
    pub province: String,
}

impl Address {
    /// Street and civic number: "Via Roma, 12"
    pub fn street_line(&self) -> String {
        if self.civic_number.is_empty() {
            self.street.clone()
        } else {
            format!("{}, {}", self.street, self.civic_number)
        }
    }

    /// Postal code, city and province: "31020 San Polo di Piave (TV)"
    pub fn locality_line(&self) -> String {
        let mut line = format!("{} {}", self.postal_code, self.city)
            .trim()
            .to_string();
        if !self.province.is_empty() {
            line.push_str(&format!(" ({})", self.province));
        }
        line
    }

    /// Full address on one line
    pub fn one_line(&self) -> String {
        format!("{} - {}", self.street_line(), self.locality_line())
    }
}

/// Customer operating the installation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Registered company name (ragione sociale)
    pub company_name: String,

    /// Registered office
    #[serde(default)]
    pub legal_address: Address,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Address {
        Address {
            street: "Via Roma".to_string(),
            civic_number: "12".to_string(),
            postal_code: "31020".to_string(),
            city: "San Polo di Piave".to_string(),
            province: "TV".to_string(),
        }
    }

    #[test]
    fn test_address_lines() {
        let address = sample();
        assert_eq!(address.street_line(), "Via Roma, 12");
        assert_eq!(address.locality_line(), "31020 San Polo di Piave (TV)");
        assert_eq!(
            address.one_line(),
            "Via Roma, 12 - 31020 San Polo di Piave (TV)"
        );
    }

    #[test]
    fn test_address_without_civic_or_province() {
        let address = Address {
            civic_number: String::new(),
            province: String::new(),
            ..sample()
        };
        assert_eq!(address.street_line(), "Via Roma");
        assert_eq!(address.locality_line(), "31020 San Polo di Piave");
    }
}
