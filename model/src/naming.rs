//! Attribute name mapping.
//!
//! Field and operation names are written in `camelCase`; HTML attribute names
//! are derived by replacing every uppercase letter with `-` followed by its
//! lowercase form. No other transformation is applied.

/// Returns the HTML attribute name for a field, honouring an explicit override.
#[must_use]
pub fn attribute_name(field: &str, override_name: Option<&str>) -> String {
    match override_name {
        Some(name) => name.to_string(),
        None => kebab_case(field),
    }
}

/// Rewrites `camelCase` as `camel-case`.
#[must_use]
pub fn kebab_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 4);
    for c in field.chars() {
        if c.is_uppercase() {
            out.push('-');
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn camel_case_becomes_kebab() {
        assert_eq!(kebab_case("httpEquiv"), "http-equiv");
        assert_eq!(kebab_case("rel"), "rel");
        assert_eq!(kebab_case("getViewport"), "get-viewport");
    }

    #[test]
    fn leading_capital_gets_a_leading_dash() {
        assert_eq!(kebab_case("Content"), "-content");
    }

    #[test]
    fn override_always_wins() {
        assert_eq!(attribute_name("httpEquiv", Some("content")), "content");
        assert_eq!(attribute_name("rel", Some("rel")), "rel");
        assert_eq!(attribute_name("rel", None), "rel");
    }

    proptest! {
        #[test]
        fn lowercase_names_are_unchanged(field in "[a-z][a-z0-9]{0,16}") {
            prop_assert_eq!(kebab_case(&field), field);
        }

        #[test]
        fn one_dash_per_uppercase_letter(field in "[a-z][a-zA-Z]{0,16}") {
            let upper = field.chars().filter(|c| c.is_ascii_uppercase()).count();
            let out = kebab_case(&field);
            prop_assert_eq!(out.matches('-').count(), upper);
            prop_assert!(!out.chars().any(|c| c.is_ascii_uppercase()));
        }
    }
}
