//! Audience region

use serde::{Deserialize, Serialize};

/// Target audience region of a recipe video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "US")]
    Us,
    Europe,
    Asia,
}

impl Region {
    pub fn as_str(self) -> &'static str {
        match self {
            Region::Us => "US",
            Region::Europe => "Europe",
            Region::Asia => "Asia",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "US" => Ok(Region::Us),
            "Europe" => Ok(Region::Europe),
            "Asia" => Ok(Region::Asia),
            other => Err(format!(
                "Unknown region '{}'. Must be one of: US, Europe, Asia",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_wire_names() {
        assert_eq!(serde_json::to_string(&Region::Us).unwrap(), "\"US\"");
        let region: Region = serde_json::from_str("\"Europe\"").unwrap();
        assert_eq!(region, Region::Europe);
    }

    #[test]
    fn test_region_parse() {
        assert_eq!("Asia".parse::<Region>(), Ok(Region::Asia));
        assert!("asia".parse::<Region>().is_err());
    }
}
