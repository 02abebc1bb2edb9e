//! Category Data

/// Category fields supplied on create and on full update.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDetails {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// New Category Data
pub type NewCategory = CategoryDetails;

/// Category Update Data
pub type CategoryUpdate = CategoryDetails;

impl CategoryDetails {
    pub(crate) fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.name.trim().is_empty() {
            problems.push("name is required".to_string());
        }

        if self.slug.is_empty() {
            problems.push("slug is required".to_string());
        } else if !is_valid_slug(&self.slug) {
            problems.push(
                "slug may only contain lowercase letters, digits and single hyphens".to_string(),
            );
        }

        problems
    }
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(slug: &str) -> CategoryDetails {
        CategoryDetails {
            name: "Apparel".to_string(),
            slug: slug.to_string(),
            description: None,
            image_url: None,
        }
    }

    #[test]
    fn slugs_follow_storage_rules() {
        assert!(details("hoodies-2026").problems().is_empty());
        assert_eq!(details("Hoodies").problems().len(), 1);
        assert_eq!(details("-hoodies").problems().len(), 1);
        assert_eq!(details("hoo--dies").problems().len(), 1);
        assert_eq!(details("").problems().len(), 1);
    }
}
