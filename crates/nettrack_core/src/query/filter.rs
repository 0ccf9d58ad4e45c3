//! Generic predicate composition over field accessors.
//!
//! Each builder method adds one predicate when its filter value is present and
//! non-blank; otherwise the filter is returned unchanged. All predicates must
//! hold for an item to match.

type Predicate<'a, T> = Box<dyn Fn(&T) -> bool + 'a>;

/// Conjunction of optional predicates over `T`.
pub struct Filter<'a, T> {
    predicates: Vec<Predicate<'a, T>>,
}

impl<T> Default for Filter<'_, T> {
    fn default() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }
}

impl<'a, T: 'a> Filter<'a, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of active predicates.
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Adds an arbitrary predicate.
    pub fn matching(mut self, predicate: impl Fn(&T) -> bool + 'a) -> Self {
        self.predicates.push(Box::new(predicate));
        self
    }

    /// Case-insensitive substring match on one optional text field.
    ///
    /// Items whose field is absent do not match an active needle.
    pub fn contains_text<F>(self, needle: Option<&str>, field: F) -> Self
    where
        F: Fn(&T) -> Option<&str> + 'a,
    {
        let Some(needle) = lowered_needle(needle) else {
            return self;
        };
        self.matching(move |item| {
            field(item).is_some_and(|value| value.to_lowercase().contains(&needle))
        })
    }

    /// Case-insensitive substring match against several fields; any may hit.
    pub fn contains_text_any<F>(self, needle: Option<&str>, fields: F) -> Self
    where
        F: Fn(&T) -> Vec<&str> + 'a,
    {
        let Some(needle) = lowered_needle(needle) else {
            return self;
        };
        self.matching(move |item| {
            fields(item)
                .into_iter()
                .any(|value| value.to_lowercase().contains(&needle))
        })
    }

    /// Exact match for enumerated, identifier or numeric fields.
    pub fn equals<V, F>(self, expected: Option<V>, field: F) -> Self
    where
        V: PartialEq + 'a,
        F: Fn(&T) -> Option<V> + 'a,
    {
        let Some(expected) = expected else {
            return self;
        };
        self.matching(move |item| field(item).is_some_and(|value| value == expected))
    }

    /// Inclusive range match. Either bound may be open; both open is a no-op.
    pub fn in_range<V, F>(self, min: Option<V>, max: Option<V>, field: F) -> Self
    where
        V: PartialOrd + 'a,
        F: Fn(&T) -> Option<V> + 'a,
    {
        if min.is_none() && max.is_none() {
            return self;
        }
        self.matching(move |item| {
            let Some(value) = field(item) else {
                return false;
            };
            min.as_ref().map_or(true, |lower| value >= *lower)
                && max.as_ref().map_or(true, |upper| value <= *upper)
        })
    }

    /// Exact, case-sensitive membership in a list field such as tags.
    pub fn includes<F>(self, needle: Option<&str>, values: F) -> Self
    where
        F: Fn(&T) -> &[String] + 'a,
    {
        let Some(needle) = needle.map(str::trim).filter(|value| !value.is_empty()) else {
            return self;
        };
        let needle = needle.to_string();
        self.matching(move |item| values(item).iter().any(|value| *value == needle))
    }

    pub fn matches(&self, item: &T) -> bool {
        self.predicates.iter().all(|predicate| predicate(item))
    }

    /// Returns matching items in input order.
    pub fn apply<'i>(&self, items: &'i [T]) -> Vec<&'i T> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}

fn lowered_needle(needle: Option<&str>) -> Option<String> {
    let trimmed = needle?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::Filter;

    #[derive(Debug, PartialEq)]
    struct Company {
        name: &'static str,
        stage: Option<&'static str>,
        employees: u32,
        score: f64,
        tags: Vec<String>,
    }

    fn companies() -> Vec<Company> {
        vec![
            Company {
                name: "Acme Robotics",
                stage: Some("Seed"),
                employees: 12,
                score: 4.5,
                tags: vec!["hardware".to_string()],
            },
            Company {
                name: "Beacon Labs",
                stage: Some("Series A"),
                employees: 40,
                score: 7.0,
                tags: vec!["ai".to_string(), "Hardware".to_string()],
            },
            Company {
                name: "acme analytics",
                stage: None,
                employees: 12,
                score: 9.5,
                tags: Vec::new(),
            },
        ]
    }

    #[test]
    fn empty_filter_returns_everything_in_order() {
        let items = companies();
        let filter = Filter::<Company>::new()
            .contains_text(Some("   "), |company| Some(company.name))
            .equals(None::<u32>, |company| Some(company.employees))
            .in_range(None::<f64>, None, |company| Some(company.score));
        assert!(filter.is_empty());

        let matched = filter.apply(&items);
        assert_eq!(matched.len(), items.len());
        assert!(matched.iter().zip(items.iter()).all(|(a, b)| std::ptr::eq(*a, b)));
    }

    #[test]
    fn text_match_is_case_insensitive_substring() {
        let items = companies();
        let matched = Filter::<Company>::new()
            .contains_text(Some("ACME"), |company| Some(company.name))
            .apply(&items);
        let names = matched.iter().map(|c| c.name).collect::<Vec<_>>();
        assert_eq!(names, vec!["Acme Robotics", "acme analytics"]);
    }

    #[test]
    fn predicates_form_a_conjunction() {
        let items = companies();
        let matched = Filter::<Company>::new()
            .contains_text(Some("acme"), |company| Some(company.name))
            .equals(Some("Seed"), |company| company.stage)
            .apply(&items);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "Acme Robotics");
    }

    #[test]
    fn numeric_equality_and_inclusive_range() {
        let items = companies();
        let by_size = Filter::<Company>::new()
            .equals(Some(12_u32), |company| Some(company.employees))
            .apply(&items);
        assert_eq!(by_size.len(), 2);

        let by_score = Filter::<Company>::new()
            .in_range(Some(4.5), Some(7.0), |company| Some(company.score))
            .apply(&items);
        let names = by_score.iter().map(|c| c.name).collect::<Vec<_>>();
        assert_eq!(names, vec!["Acme Robotics", "Beacon Labs"]);

        let open_upper = Filter::<Company>::new()
            .in_range(Some(7.0), None, |company| Some(company.score))
            .apply(&items);
        assert_eq!(open_upper.len(), 2);
    }

    #[test]
    fn absent_field_does_not_match_active_filter() {
        let items = companies();
        let matched = Filter::<Company>::new()
            .contains_text(Some("series"), |company| company.stage)
            .apply(&items);
        assert_eq!(matched.len(), 1);
    }

    #[test]
    fn includes_is_exact_and_case_sensitive() {
        let items = companies();
        let matched = Filter::<Company>::new()
            .includes(Some("hardware"), |company| company.tags.as_slice())
            .apply(&items);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "Acme Robotics");
    }
}
