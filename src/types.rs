use serde::{Deserialize, Serialize};

macro_rules! newtype_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

newtype_id!(UserId);
newtype_id!(SpeciesId);
newtype_id!(LostBirdId);
newtype_id!(FoundBirdId);
newtype_id!(SightingId);

/// Lifecycle of a lost-bird listing. `Reunited` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LostBirdStatus {
    Lost,
    Found,
    Reunited,
}

impl LostBirdStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LostBirdStatus::Lost => "lost",
            LostBirdStatus::Found => "found",
            LostBirdStatus::Reunited => "reunited",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "lost" => Some(LostBirdStatus::Lost),
            "found" => Some(LostBirdStatus::Found),
            "reunited" => Some(LostBirdStatus::Reunited),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoundBirdStatus {
    Found,
    Claimed,
}

impl FoundBirdStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FoundBirdStatus::Found => "found",
            FoundBirdStatus::Claimed => "claimed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lost_bird_status_roundtrip() {
        for status in [
            LostBirdStatus::Lost,
            LostBirdStatus::Found,
            LostBirdStatus::Reunited,
        ] {
            assert_eq!(LostBirdStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(LostBirdStatus::parse("claimed"), None);
        assert_eq!(LostBirdStatus::parse(""), None);
    }

    #[test]
    fn test_id_display() {
        assert_eq!(LostBirdId(42).to_string(), "42");
        assert_eq!(UserId::from(7).as_i64(), 7);
    }
}
