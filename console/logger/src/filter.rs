use ves_console_common::log::LogLevel;

use crate::assets::LogFilterAsset;

/// A minimum level for all categories that start with a prefix.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FilterRule {
    category: String,
    min_level: LogLevel,
}

impl FilterRule {
    /// Creates a new rule.
    ///
    /// # Arguments
    ///
    /// * `category`: The category prefix. An empty prefix or `Default` matches every category.
    /// * `min_level`: The least severe level that is let through. [`LogLevel::None`] blocks the
    ///                categories completely.
    pub fn new(category: impl Into<String>, min_level: LogLevel) -> Self {
        let category = category.into();
        let category = if category.eq_ignore_ascii_case("default") {
            String::new()
        } else {
            category
        };
        Self { category, min_level }
    }

    /// Retrieves the category prefix. The default rule has an empty prefix.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Retrieves the minimum level.
    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    fn matches(&self, category: &str) -> bool {
        category
            .get(..self.category.len())
            .map_or(false, |prefix| prefix.eq_ignore_ascii_case(&self.category))
    }
}

/// Per-category minimum levels.
///
/// For a category, the rule with the longest matching prefix applies. Without any matching rule,
/// the filter's default minimum level applies.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CategoryFilter {
    rules: Vec<FilterRule>,
    default_min_level: LogLevel,
}

impl CategoryFilter {
    /// Creates a filter that lets everything through.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            default_min_level: LogLevel::Trace,
        }
    }

    /// Adds a rule. A later rule for the same prefix replaces an earlier one.
    pub fn with_rule(mut self, category: impl Into<String>, min_level: LogLevel) -> Self {
        self.add_rule(FilterRule::new(category, min_level));
        self
    }

    /// Sets the minimum level for categories that no rule matches.
    pub fn with_default_min_level(mut self, min_level: LogLevel) -> Self {
        self.default_min_level = min_level;
        self
    }

    fn add_rule(&mut self, rule: FilterRule) {
        match self
            .rules
            .iter_mut()
            .find(|existing| existing.category.eq_ignore_ascii_case(&rule.category))
        {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
    }

    /// Retrieves the rules.
    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }

    /// Determines the minimum level for a category.
    pub fn min_level(&self, category: &str) -> LogLevel {
        self.rules
            .iter()
            .filter(|rule| rule.matches(category))
            .max_by_key(|rule| rule.category.len())
            .map_or(self.default_min_level, |rule| rule.min_level)
    }

    /// Determines whether a message of a level in a category passes the filter.
    pub fn allows(&self, category: &str, level: LogLevel) -> bool {
        level != LogLevel::None && level >= self.min_level(category)
    }
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&LogFilterAsset> for CategoryFilter {
    fn from(asset: &LogFilterAsset) -> Self {
        asset
            .filters
            .iter()
            .fold(CategoryFilter::new(), |filter, entry| {
                filter.with_rule(entry.category.clone(), entry.log_level)
            })
    }
}
