use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A ledger participant, identified by its legal name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Party {
    name: String,
}

impl Party {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Identifier shared by every version of one agreement.
///
/// `external_id` lets callers correlate the agreement with a reference from
/// another system; it plays no part in identity beyond being carried along.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UniqueIdentifier {
    pub external_id: Option<String>,
    pub id: Uuid,
}

impl UniqueIdentifier {
    pub fn new() -> Self {
        Self {
            external_id: None,
            id: Uuid::new_v4(),
        }
    }

    pub fn with_external_id(external_id: impl Into<String>) -> Self {
        Self {
            external_id: Some(external_id.into()),
            id: Uuid::new_v4(),
        }
    }
}

impl Default for UniqueIdentifier {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UniqueIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.external_id {
            Some(external) => write!(f, "{external}_{}", self.id),
            None => write!(f, "{}", self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_identifiers_differ() {
        let a = UniqueIdentifier::new();
        let b = UniqueIdentifier::new();
        assert_ne!(a.id, b.id);
        assert!(!a.id.is_nil());
    }

    #[test]
    fn display_prefixes_external_id() {
        let plain = UniqueIdentifier::new();
        assert_eq!(plain.to_string(), plain.id.to_string());

        let tagged = UniqueIdentifier::with_external_id("INV-42");
        assert_eq!(tagged.to_string(), format!("INV-42_{}", tagged.id));
    }

    #[test]
    fn party_displays_its_name() {
        assert_eq!(Party::new("O=Bank A, L=London, C=GB").to_string(), "O=Bank A, L=London, C=GB");
    }
}
