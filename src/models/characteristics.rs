use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entry in the trait taxonomy: a described characteristic with example
/// values the generator can draw from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Characteristic {
    pub description: String,

    #[serde(default)]
    pub examples: Vec<String>,
}

/// The characteristics taxonomy: category name → characteristic key →
/// characteristic. Referenced from schema fields as `category.key`.
///
/// Consulted only when building generation prompts and when cross-checking
/// schema references at load time; record validation never reads it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct CharacteristicsTaxonomy {
    categories: BTreeMap<String, BTreeMap<String, Characteristic>>,
}

impl CharacteristicsTaxonomy {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Resolve a `category.key` reference.
    pub fn lookup(&self, reference: &str) -> Option<&Characteristic> {
        let (category, key) = reference.split_once('.')?;
        self.categories.get(category)?.get(key)
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, Characteristic>)> {
        self.categories
            .iter()
            .map(|(name, chars)| (name.as_str(), chars))
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAXONOMY_YAML: &str = r#"
professional:
  career_path:
    description: Stage and trajectory of the person's career
    examples:
      - early-career engineer
      - mid-level manager
personal:
  religion:
    description: Religious or spiritual affiliation, if any
"#;

    #[test]
    fn test_lookup_by_dotted_reference() {
        let taxonomy = CharacteristicsTaxonomy::from_yaml(TAXONOMY_YAML).unwrap();

        let career = taxonomy.lookup("professional.career_path").unwrap();
        assert_eq!(career.examples.len(), 2);

        // examples default to empty when omitted
        let religion = taxonomy.lookup("personal.religion").unwrap();
        assert!(religion.examples.is_empty());
    }

    #[test]
    fn test_lookup_misses() {
        let taxonomy = CharacteristicsTaxonomy::from_yaml(TAXONOMY_YAML).unwrap();

        assert!(taxonomy.lookup("professional.industry").is_none());
        assert!(taxonomy.lookup("physical.height").is_none());
        assert!(taxonomy.lookup("no-dot-here").is_none());
    }
}
