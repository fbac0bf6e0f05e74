use crate::errors::{CampusResult, CatalogError};
use crate::matcher::GENERAL_CATEGORY;
use crate::types::QuickAction;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

const GREETING: &str = "👋 Hello! I'm your Campus AI Assistant. I can help you with schedules, faculty information, dining services, library resources, and administrative procedures. What would you like to know?";

const FALLBACK: &str = "I'd be happy to help! I can assist you with:\n\n🗓️ **Schedules** - Class schedules, exam dates\n👨‍🏫 **Faculty** - Directory, office hours\n🍽️ **Dining** - Hours, menus, locations\n📚 **Library** - Services, hours, resources\n📋 **Administration** - Registration, financial aid\n\nPlease let me know what specific information you need!";

type BuiltinCategory = (&'static str, &'static str, &'static [(&'static str, &'static str)]);

const BUILTIN_CATEGORIES: &[BuiltinCategory] = &[
    (
        "schedules",
        "Schedules",
        &[
            (
                "class schedule",
                "📅 **Today's Classes**\n\n• **9:00 AM - 10:30 AM**: Computer Science 101 (Room A-204)\n• **11:00 AM - 12:30 PM**: Mathematics 201 (Room B-105)\n• **2:00 PM - 3:30 PM**: Physics Lab (Lab C-301)\n• **4:00 PM - 5:30 PM**: English Literature (Room D-202)",
            ),
            (
                "exam schedule",
                "📝 **Upcoming Exams**\n\n• **March 15**: Midterm - Computer Science 101\n• **March 18**: Quiz - Mathematics 201\n• **March 22**: Final Project Due - Physics Lab\n• **March 25**: Essay Submission - English Literature",
            ),
        ],
    ),
    (
        "faculty",
        "Faculty",
        &[
            (
                "faculty information",
                "👨‍🏫 **Faculty Directory**\n\n• **Dr. Sarah Johnson** - Computer Science Dept.\n  📧 s.johnson@university.edu | 📞 (555) 123-4567\n  🕒 Office Hours: Mon-Wed 2-4 PM\n\n• **Prof. Michael Chen** - Mathematics Dept.\n  📧 m.chen@university.edu | 📞 (555) 234-5678\n  🕒 Office Hours: Tue-Thu 10 AM-12 PM",
            ),
            (
                "office hours",
                "🕒 **Faculty Office Hours**\n\n• Most faculty hold office hours Tuesday-Thursday\n• Check individual faculty pages for specific times\n• Virtual office hours available via Zoom\n• Book appointments through the student portal",
            ),
        ],
    ),
    (
        "dining",
        "Dining",
        &[
            (
                "dining hours",
                "🍽️ **Dining Hall Hours**\n\n**Main Cafeteria**\n• Breakfast: 7:00 AM - 10:00 AM\n• Lunch: 11:30 AM - 2:30 PM\n• Dinner: 5:00 PM - 8:00 PM\n\n**Student Union Food Court**\n• Monday-Friday: 8:00 AM - 9:00 PM\n• Weekend: 10:00 AM - 8:00 PM",
            ),
            (
                "menu",
                "📋 **Today's Menu**\n\n**Lunch Special**\n• Grilled Chicken with Rice\n• Vegetarian Pasta Primavera\n• Fresh Salad Bar\n• Daily Soup: Tomato Basil\n\n**Allergen-Free Options Available**",
            ),
        ],
    ),
    (
        "library",
        "Library",
        &[
            (
                "library services",
                "📚 **Library Services**\n\n• **Study Spaces**: Individual & group study rooms\n• **Research Help**: Librarian assistance available\n• **Computer Lab**: 24/7 access with student ID\n• **Printing**: Black & white + color printing\n• **Digital Resources**: Access to academic databases",
            ),
            (
                "library hours",
                "🕒 **Library Hours**\n\n• **Monday-Thursday**: 7:00 AM - 11:00 PM\n• **Friday**: 7:00 AM - 8:00 PM\n• **Saturday**: 9:00 AM - 6:00 PM\n• **Sunday**: 11:00 AM - 10:00 PM\n• **24/7 Study Area**: Always accessible",
            ),
        ],
    ),
    (
        "admin",
        "Administration",
        &[
            (
                "registration",
                "📝 **Course Registration**\n\n1. **Log in** to the student portal\n2. **Browse** available courses by department\n3. **Check** prerequisites and availability\n4. **Add** courses to your schedule\n5. **Submit** registration before deadline\n\n**Registration Dates**: March 1-15 for Fall semester",
            ),
            (
                "financial aid",
                "💰 **Financial Aid**\n\n• **FAFSA Deadline**: March 1st annually\n• **Scholarships**: Check scholarship portal monthly\n• **Work-Study**: Applications due February 15th\n• **Emergency Funds**: Contact Student Services\n\n📞 Financial Aid Office: (555) 345-6789",
            ),
        ],
    ),
];

/// One canned response and the phrase that selects it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub phrase: String,
    pub response: String,
}

/// A named group of entries; the name doubles as a match keyword
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub entries: Vec<Entry>,
}

impl Category {
    /// Display title, falling back to the raw name
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }
}

/// Ordered lookup table of canned responses plus the quick actions offered to the user.
///
/// Declaration order matters: the matcher returns the first hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default = "default_greeting")]
    pub greeting: String,
    #[serde(default = "default_fallback")]
    pub fallback: String,
    pub categories: Vec<Category>,
    #[serde(default)]
    pub quick_actions: Vec<QuickAction>,
}

fn default_greeting() -> String {
    GREETING.to_string()
}

fn default_fallback() -> String {
    FALLBACK.to_string()
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// The built-in campus table
    pub fn builtin() -> Self {
        let categories = BUILTIN_CATEGORIES
            .iter()
            .map(|(name, title, entries)| Category {
                name: name.to_string(),
                title: Some(title.to_string()),
                entries: entries
                    .iter()
                    .map(|(phrase, response)| Entry {
                        phrase: phrase.to_string(),
                        response: response.to_string(),
                    })
                    .collect(),
            })
            .collect();

        let quick_actions = vec![
            QuickAction::new("Class Schedule", "📅", "Show me my class schedule for today", "schedules"),
            QuickAction::new("Faculty Directory", "👥", "Find faculty information", "faculty"),
            QuickAction::new("Dining Hours", "🍽️", "What are the dining hall hours?", "dining"),
            QuickAction::new("Library Services", "📚", "Tell me about library services", "library"),
            QuickAction::new("Registration Help", "📄", "How do I register for classes?", "admin"),
        ];

        Self {
            greeting: default_greeting(),
            fallback: default_fallback(),
            categories,
            quick_actions,
        }
    }

    /// Parses a catalog from TOML and validates it
    pub fn from_toml_str(content: &str) -> CampusResult<Self> {
        let catalog: Self = toml::from_str(content)?;
        Ok(catalog.normalized()?)
    }

    /// Loads and validates a catalog file
    pub fn load_from_file(path: &Path) -> CampusResult<Self> {
        let content = fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&content)?;
        info!(
            "Loaded catalog from {} ({} categories, {} quick actions)",
            path.display(),
            catalog.categories.len(),
            catalog.quick_actions.len()
        );
        Ok(catalog)
    }

    /// Serialises the catalog in the format accepted by `from_toml_str`
    pub fn to_toml_string(&self) -> CampusResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// Trims and lowercases match keys, then checks the table is usable
    pub fn normalized(mut self) -> Result<Self, CatalogError> {
        if self.categories.is_empty() {
            return Err(CatalogError::Empty);
        }
        if self.fallback.trim().is_empty() {
            return Err(CatalogError::EmptyFallback);
        }

        let mut seen = HashSet::new();
        for (index, category) in self.categories.iter_mut().enumerate() {
            category.name = category.name.trim().to_lowercase();
            if category.name.is_empty() {
                return Err(CatalogError::UnnamedCategory { index });
            }
            if category.name == GENERAL_CATEGORY {
                return Err(CatalogError::ReservedCategory(category.name.clone()));
            }
            if !seen.insert(category.name.clone()) {
                return Err(CatalogError::DuplicateCategory(category.name.clone()));
            }
            if category.entries.is_empty() {
                return Err(CatalogError::NoEntries(category.name.clone()));
            }

            for (index, entry) in category.entries.iter_mut().enumerate() {
                entry.phrase = entry.phrase.trim().to_lowercase();
                if entry.phrase.is_empty() {
                    return Err(CatalogError::EmptyPhrase {
                        category: category.name.clone(),
                        index,
                    });
                }
                if entry.response.trim().is_empty() {
                    return Err(CatalogError::EmptyResponse {
                        category: category.name.clone(),
                        phrase: entry.phrase.clone(),
                    });
                }
            }
        }

        for (index, action) in self.quick_actions.iter_mut().enumerate() {
            action.category = action.category.trim().to_lowercase();
            if action.label.trim().is_empty() || action.query.trim().is_empty() {
                return Err(CatalogError::IncompleteQuickAction { index: index + 1 });
            }
        }

        Ok(self)
    }

    /// Category names in declaration order
    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Resolves a quick action by 1-based index, label or category
    pub fn quick_action(&self, selector: &str) -> Option<&QuickAction> {
        let selector = selector.trim();
        if let Ok(n) = selector.parse::<usize>() {
            return n.checked_sub(1).and_then(|i| self.quick_actions.get(i));
        }

        self.quick_actions
            .iter()
            .find(|a| a.label.eq_ignore_ascii_case(selector))
            .or_else(|| {
                self.quick_actions
                    .iter()
                    .find(|a| a.category.eq_ignore_ascii_case(selector))
            })
    }

    /// Every (category, phrase, response) triple in declaration order
    pub fn triples(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.categories.iter().flat_map(|c| {
            c.entries
                .iter()
                .map(move |e| (c.name.as_str(), e.phrase.as_str(), e.response.as_str()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CampusError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = Catalog::builtin();
        let normalized = catalog.clone().normalized().unwrap();

        assert_eq!(catalog, normalized);
        assert_eq!(
            catalog.category_names(),
            vec!["schedules", "faculty", "dining", "library", "admin"]
        );
        assert_eq!(catalog.triples().count(), 10);
        assert_eq!(catalog.quick_actions.len(), 5);
    }

    #[test]
    fn test_quick_action_selectors() {
        let catalog = Catalog::builtin();

        assert_eq!(catalog.quick_action("1").unwrap().label, "Class Schedule");
        assert_eq!(catalog.quick_action("5").unwrap().category, "admin");
        assert!(catalog.quick_action("0").is_none());
        assert!(catalog.quick_action("6").is_none());

        assert_eq!(
            catalog.quick_action("dining hours").unwrap().query,
            "What are the dining hall hours?"
        );
        assert_eq!(catalog.quick_action("LIBRARY").unwrap().label, "Library Services");
        assert!(catalog.quick_action("parking").is_none());
    }

    #[test]
    fn test_parse_normalizes_keys() {
        let content = r#"
            [[categories]]
            name = "  Parking "

            [[categories.entries]]
            phrase = "Permit Office"
            response = "Permits are issued in Building P."
        "#;

        let catalog = Catalog::from_toml_str(content).unwrap();
        assert_eq!(catalog.category_names(), vec!["parking"]);
        assert_eq!(catalog.categories[0].entries[0].phrase, "permit office");
        assert_eq!(catalog.categories[0].display_title(), "parking");
        // Omitted texts fall back to the built-in ones
        assert_eq!(catalog.greeting, GREETING);
        assert!(catalog.quick_actions.is_empty());
    }

    #[test]
    fn test_rejects_reserved_and_duplicate_categories() {
        let reserved = r#"
            [[categories]]
            name = "General"
            [[categories.entries]]
            phrase = "anything"
            response = "text"
        "#;
        let err = Catalog::from_toml_str(reserved).unwrap_err();
        assert!(matches!(
            err,
            CampusError::Catalog(CatalogError::ReservedCategory(ref name)) if name == "general"
        ));

        let duplicate = r#"
            [[categories]]
            name = "dining"
            [[categories.entries]]
            phrase = "menu"
            response = "soup"

            [[categories]]
            name = "Dining"
            [[categories.entries]]
            phrase = "hours"
            response = "all day"
        "#;
        let err = Catalog::from_toml_str(duplicate).unwrap_err();
        assert!(matches!(
            err,
            CampusError::Catalog(CatalogError::DuplicateCategory(_))
        ));
    }

    #[test]
    fn test_rejects_incomplete_entries() {
        let empty_response = r#"
            [[categories]]
            name = "dining"
            [[categories.entries]]
            phrase = "menu"
            response = "   "
        "#;
        assert!(matches!(
            Catalog::from_toml_str(empty_response).unwrap_err(),
            CampusError::Catalog(CatalogError::EmptyResponse { .. })
        ));

        let no_categories = "categories = []";
        assert!(matches!(
            Catalog::from_toml_str(no_categories).unwrap_err(),
            CampusError::Catalog(CatalogError::Empty)
        ));

        let bad_action = r#"
            [[categories]]
            name = "dining"
            [[categories.entries]]
            phrase = "menu"
            response = "soup"

            [[quick_actions]]
            label = "Menu"
            query = ""
            category = "dining"
        "#;
        assert!(matches!(
            Catalog::from_toml_str(bad_action).unwrap_err(),
            CampusError::Catalog(CatalogError::IncompleteQuickAction { index: 1 })
        ));
    }

    #[test]
    fn test_dumped_builtin_loads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        fs::write(&path, Catalog::builtin().to_toml_string().unwrap()).unwrap();

        let loaded = Catalog::load_from_file(&path).unwrap();
        assert_eq!(loaded, Catalog::builtin());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = Catalog::load_from_file(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, CampusError::Io(_)));
    }
}
