use once_cell::sync::Lazy;

use crate::models::CharacteristicsTaxonomy;

// Embed the default characteristics taxonomy at compile time
const DEFAULT_CHARACTERISTICS_YAML: &str = include_str!("characteristics.yaml");

// Parse the default taxonomy once at startup
static DEFAULT_CHARACTERISTICS: Lazy<CharacteristicsTaxonomy> = Lazy::new(|| {
    CharacteristicsTaxonomy::from_yaml(DEFAULT_CHARACTERISTICS_YAML)
        .expect("Failed to parse default characteristics taxonomy - this is a bug")
});

/// The taxonomy used when a schemas directory ships no characteristics file.
pub fn default_characteristics() -> &'static CharacteristicsTaxonomy {
    &DEFAULT_CHARACTERISTICS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_taxonomy_loads() {
        let taxonomy = default_characteristics();
        assert!(!taxonomy.is_empty());
    }

    #[test]
    fn test_default_taxonomy_covers_expected_categories() {
        let taxonomy = default_characteristics();

        for reference in [
            "professional.career_path",
            "professional.education_level",
            "professional.industry",
            "personal.religion",
            "personal.cultural_background",
            "personal.family_situation",
            "personality.life_goals",
            "personality.personal_values",
            "personality.hobbies",
            "physical.height",
            "physical.body_type",
            "physical.fashion_style",
        ] {
            let characteristic = taxonomy.lookup(reference);
            assert!(characteristic.is_some(), "missing {reference}");
            assert!(
                !characteristic.unwrap().examples.is_empty(),
                "no examples for {reference}"
            );
        }
    }
}
