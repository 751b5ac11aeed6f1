//! Endpoint templates with `:name` placeholders.
use std::{collections::BTreeMap, fmt, sync::OnceLock};

use regex::Regex;

use crate::{Error, Result};

fn placeholder_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r":([A-Za-z_][A-Za-z0-9_]*)").expect("placeholder regex is valid")
    })
}

/// Distinct placeholder names in `template`, in order of first appearance.
pub(crate) fn placeholders(template: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for captures in placeholder_regex().captures_iter(template) {
        if let Some(name) = captures.get(1).map(|m| m.as_str()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

/// A relative endpoint path such as `:project/items/:collection/:id`.
///
/// A placeholder is a `:` followed by an identifier. A `:` that is not followed by an identifier
/// is kept literally.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Template(String);

impl Template {
    /// Wrap a template string. Placeholders are only checked at resolution time.
    pub fn new(template: impl Into<String>) -> Template {
        Template(template.into())
    }

    /// The template as given.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Distinct placeholder names, in order of first appearance.
    pub fn parameters(&self) -> Vec<&str> {
        placeholders(&self.0)
    }

    /// Substitute every placeholder in a single left-to-right pass and return the resulting path
    /// segments (not percent-encoded).
    ///
    /// Fails on the first placeholder without a binding, and on a placeholder whose value makes
    /// its segment empty, `.` or `..`. Bindings that do not appear in the template are ignored.
    pub fn resolve(&self, parameters: &BTreeMap<String, String>) -> Result<Vec<String>> {
        let path = self.0.trim_start_matches('/');
        if path.is_empty() {
            return Ok(Vec::new());
        }

        path.split('/')
            .map(|segment| self.resolve_segment(segment, parameters))
            .collect()
    }

    fn resolve_segment(
        &self,
        segment: &str,
        parameters: &BTreeMap<String, String>,
    ) -> Result<String> {
        let mut resolved = String::with_capacity(segment.len());
        let mut last = 0;
        let mut first_name = None;

        for captures in placeholder_regex().captures_iter(segment) {
            let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            let value =
                parameters
                    .get(name.as_str())
                    .ok_or_else(|| Error::UnresolvedParameter {
                        template: self.0.clone(),
                        name: name.as_str().to_owned(),
                    })?;

            resolved.push_str(&segment[last..whole.start()]);
            resolved.push_str(value);
            last = whole.end();
            first_name.get_or_insert(name.as_str());
        }
        resolved.push_str(&segment[last..]);

        // Dot segments are dropped or collapsed by URL normalization, and an empty segment
        // addresses the parent collection.
        if let Some(name) = first_name {
            if matches!(resolved.as_str(), "" | "." | "..") {
                return Err(Error::InvalidParameter {
                    template: self.0.clone(),
                    name: name.to_owned(),
                    segment: resolved,
                });
            }
        }

        Ok(resolved)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Template {
    fn from(value: &str) -> Self {
        Template::new(value)
    }
}

impl From<String> for Template {
    fn from(value: String) -> Self {
        Template::new(value)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::Error;

    use super::Template;

    fn bindings(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn lists_distinct_parameters_in_order() {
        let template = Template::new(":project/items/:collection/:id/revisions/:offset");
        assert_eq!(
            template.parameters(),
            vec!["project", "collection", "id", "offset"]
        );

        assert_eq!(Template::new(":a/:b/:a").parameters(), vec!["a", "b"]);
        assert!(Template::new("server/ping").parameters().is_empty());
    }

    #[test]
    fn resolves_all_placeholders() {
        let template = Template::new(":project/items/:collection/:id");
        let segments = template
            .resolve(&bindings(&[
                ("project", "shop"),
                ("collection", "products"),
                ("id", "42"),
            ]))
            .unwrap();

        assert_eq!(segments.join("/"), "shop/items/products/42");
    }

    #[test]
    fn keeps_trailing_empty_segment() {
        let segments = Template::new(":project/")
            .resolve(&bindings(&[("project", "shop")]))
            .unwrap();
        assert_eq!(segments, vec!["shop".to_owned(), String::new()]);
    }

    #[test]
    fn ignores_unused_bindings() {
        let segments = Template::new("server/ping")
            .resolve(&bindings(&[("project", "shop")]))
            .unwrap();
        assert_eq!(segments, vec!["server".to_owned(), "ping".to_owned()]);
    }

    #[test]
    fn substitutes_inside_a_segment() {
        let segments = Template::new("files/:name.:ext")
            .resolve(&bindings(&[("name", "logo"), ("ext", "png")]))
            .unwrap();
        assert_eq!(segments[1], "logo.png");
    }

    #[test]
    fn lone_colon_is_literal() {
        let segments = Template::new("custom/a:/b").resolve(&BTreeMap::new()).unwrap();
        assert_eq!(segments.join("/"), "custom/a:/b");
    }

    #[test]
    fn does_not_rescan_substituted_values() {
        let segments = Template::new(":collection/:id")
            .resolve(&bindings(&[("collection", ":id"), ("id", "7")]))
            .unwrap();
        assert_eq!(segments.join("/"), ":id/7");
    }

    #[test]
    fn fails_on_first_unbound_placeholder() {
        let err = Template::new(":project/items/:collection/:id")
            .resolve(&bindings(&[("project", "shop")]))
            .unwrap_err();

        match err {
            Error::UnresolvedParameter { template, name } => {
                assert_eq!(template, ":project/items/:collection/:id");
                assert_eq!(name, "collection");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_values_that_change_the_path() {
        let template = Template::new(":project/items/:collection/:id");

        for (collection, id) in [("..", "7"), (".", "7"), ("products", ""), ("products", "..")] {
            let err = template
                .resolve(&bindings(&[
                    ("project", "shop"),
                    ("collection", collection),
                    ("id", id),
                ]))
                .unwrap_err();
            assert!(
                matches!(err, Error::InvalidParameter { .. }),
                "{collection:?}/{id:?}: {err:?}"
            );
        }

        let err = Template::new("files/:name.:ext")
            .resolve(&bindings(&[("name", ""), ("ext", "")]))
            .unwrap_err();
        match err {
            Error::InvalidParameter { name, segment, .. } => {
                assert_eq!(name, "name");
                assert_eq!(segment, ".");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn dots_inside_a_value_are_kept() {
        let segments = Template::new("files/:id")
            .resolve(&bindings(&[("id", "...")]))
            .unwrap();
        assert_eq!(segments[1], "...");

        let segments = Template::new("files/:name.:ext")
            .resolve(&bindings(&[("name", "logo"), ("ext", "")]))
            .unwrap();
        assert_eq!(segments[1], "logo.");
    }

    #[test]
    fn fails_iff_a_distinct_placeholder_is_missing() {
        let template = Template::new(":a/x/:b/:a/:c");
        let all = [("a", "1"), ("b", "2"), ("c", "3")];

        assert!(template.resolve(&bindings(&all)).is_ok());
        for skip in 0..all.len() {
            let partial: Vec<_> = all
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, pair)| *pair)
                .collect();
            assert!(template.resolve(&bindings(&partial)).is_err());
        }
    }
}
