use std::collections::HashSet;

/// Entities that other creatures may eat.
pub const TAG_FOOD: &str = "food";
/// Entities that count as rivals to other creatures.
pub const TAG_CREATURE: &str = "creature";
pub const TAG_FISH: &str = "fish";
pub const TAG_PLANT: &str = "plant";

/// Display/lookup name. Not required to be unique; lookups return the first match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(pub String);

/// Tag membership. An entity can carry any number of tags.
#[derive(Debug, Clone, Default)]
pub struct Tags(HashSet<String>);

impl Tags {
    pub fn new(tags: &[&str]) -> Self {
        Self(tags.iter().map(|t| t.to_string()).collect())
    }

    pub fn has(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    pub fn insert(&mut self, tag: &str) {
        self.0.insert(tag.to_string());
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_a_set() {
        let mut tags = Tags::new(&[TAG_FISH, TAG_CREATURE, TAG_FISH]);
        assert!(tags.has(TAG_FISH));
        assert!(!tags.has(TAG_FOOD));
        tags.insert(TAG_FOOD);
        assert!(tags.has(TAG_FOOD));
        assert_eq!(tags.iter().count(), 3);
    }
}
