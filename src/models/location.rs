use std::fmt;
use std::str::FromStr;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid location code '{0}', expected a municipality code made of digits")]
pub struct LocationCodeError(pub String);

/// Municipality code as used by AEMET and INE, e.g. "28079" for Madrid.
/// Leading zeros are significant ("08019" is Barcelona), so the code is kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct LocationCode(String);

impl LocationCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Madrid, used when nothing else has been chosen
impl Default for LocationCode {
    fn default() -> Self {
        LocationCode("28079".to_string())
    }
}

impl FromStr for LocationCode {
    type Err = LocationCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(LocationCode(s.to_string()))
        } else {
            Err(LocationCodeError(s.to_string()))
        }
    }
}

impl TryFrom<String> for LocationCode {
    type Error = LocationCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        LocationCode::from_str(&value)
    }
}

impl fmt::Display for LocationCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_leading_zeros() {
        let code: LocationCode = "08019".parse().unwrap();
        assert_eq!(code.as_str(), "08019");
        assert_eq!(code.to_string(), "08019");
    }

    #[test]
    fn test_parse_rejects_non_digits() {
        assert!("".parse::<LocationCode>().is_err());
        assert!("28079\n".parse::<LocationCode>().is_err());
        assert!("28O79".parse::<LocationCode>().is_err());
        assert!("-2807".parse::<LocationCode>().is_err());
    }
}
