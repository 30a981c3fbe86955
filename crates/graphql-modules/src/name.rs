//! GraphQL name derivation and case conversion.
//!
//! Declaration identifiers usually carry a type-kind suffix
//! (`UserType`, `DateTimeScalar`) that is stripped when deriving the
//! GraphQL name. Field and argument identifiers are written in
//! `snake_case` and converted to the GraphQL `camelCase` convention.

/// Recognized identifier suffixes, checked longest first so the most
/// specific pattern wins. The second element replaces the suffix:
/// `UserLevelGraphQLEnum` derives `UserLevelEnum`, `DateTimeGraphQLScalar`
/// derives `DateTime`, `UserType` derives `User`.
const NAME_SUFFIXES: &[(&str, &str)] = &[
    ("GraphQLScalar", ""),
    ("GraphQLInput", "Input"),
    ("GraphQLEnum", "Enum"),
    ("GraphQLType", ""),
    ("GraphQL", ""),
    ("Scalar", ""),
    ("Type", ""),
];

/// Derives a GraphQL type name from a declaration identifier.
///
/// Exactly one recognized suffix is removed; identifiers without a
/// recognized suffix (including already-derived names) pass through
/// unchanged, so derivation is idempotent. An identifier that is nothing
/// but a suffix is also returned unchanged.
pub fn derive_type_name(ident: &str) -> String {
    for (suffix, replacement) in NAME_SUFFIXES {
        if let Some(stem) = ident.strip_suffix(suffix) {
            let derived = format!("{stem}{replacement}");
            if derived.is_empty() {
                return ident.to_string();
            }
            return derived;
        }
    }

    ident.to_string()
}

/// Converts a `snake_case` identifier to the GraphQL `camelCase`
/// convention: the first character is lowercased, underscores are dropped
/// and the character after each underscore is uppercased.
pub fn convert_name_to_graphql(name: &str) -> String {
    let mut converted = String::with_capacity(name.len());
    let mut previous = None;

    for (i, c) in name.chars().enumerate() {
        if i == 0 {
            converted.extend(c.to_lowercase());
        } else if c == '_' {
            // dropped; the next character is uppercased
        } else if previous == Some('_') {
            converted.extend(c.to_uppercase());
        } else {
            converted.extend(c.to_lowercase());
        }
        previous = Some(c);
    }

    converted
}

/// Converts a GraphQL `camelCase` name to a `snake_case` identifier.
///
/// Handles runs of capitals (`testWWWTest` -> `test_www_test`) and
/// digit boundaries (`test134` -> `test_134`).
pub fn convert_graphql_name(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let lowered: Vec<char> = name.to_lowercase().chars().collect();

    // Bail out on the rare characters whose lowercase form has a
    // different length; such names are returned lowercased as-is.
    if chars.len() != lowered.len() {
        return name.to_lowercase();
    }

    let max_index = chars.len().saturating_sub(1);
    let mut converted = String::with_capacity(name.len() + 4);

    for i in 0..chars.len() {
        let c = lowered[i];
        if i > 0 {
            let word_start = c != chars[i] && chars[i - 1] != '_' && chars[i - 1] == lowered[i - 1];
            let run_end =
                i < max_index && chars[i] != lowered[i] && chars[i + 1] == lowered[i + 1];
            let digit_start = c.is_ascii_digit() && !chars[i - 1].is_ascii_digit();
            let digit_end = !c.is_ascii_digit() && chars[i - 1].is_ascii_digit();

            if word_start || run_end || digit_start || digit_end {
                converted.push('_');
            }
        }
        converted.push(c);
    }

    converted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_name_from_type_suffix() {
        assert_eq!(derive_type_name("UserType"), "User");
    }

    #[test]
    fn derives_name_from_scalar_suffixes() {
        assert_eq!(derive_type_name("DateTimeScalar"), "DateTime");
        assert_eq!(derive_type_name("DateTimeGraphQLScalar"), "DateTime");
    }

    #[test]
    fn derives_name_from_replacement_suffixes() {
        assert_eq!(derive_type_name("UserLevelGraphQLEnum"), "UserLevelEnum");
        assert_eq!(derive_type_name("UserGraphQLInput"), "UserInput");
        assert_eq!(derive_type_name("UserGraphQL"), "User");
    }

    #[test]
    fn longest_suffix_wins() {
        // "GraphQLType" is matched before the shorter "Type".
        assert_eq!(derive_type_name("UserGraphQLType"), "User");
    }

    #[test]
    fn unrecognized_identifier_passes_through() {
        assert_eq!(derive_type_name("User"), "User");
        assert_eq!(derive_type_name("Query"), "Query");
    }

    #[test]
    fn bare_suffix_passes_through() {
        assert_eq!(derive_type_name("Type"), "Type");
        assert_eq!(derive_type_name("Scalar"), "Scalar");
    }

    #[test]
    fn derivation_is_idempotent() {
        for ident in ["UserType", "DateTimeScalar", "UserLevelGraphQLEnum"] {
            let first = derive_type_name(ident);
            assert_eq!(derive_type_name(&first), first);
        }
    }

    #[test]
    fn converts_snake_case_to_camel_case() {
        assert_eq!(convert_name_to_graphql("test"), "test");
        assert_eq!(convert_name_to_graphql("test_name"), "testName");
        assert_eq!(convert_name_to_graphql("test_other_name"), "testOtherName");
        assert_eq!(convert_name_to_graphql("min_age"), "minAge");
        assert_eq!(convert_name_to_graphql("Test"), "test");
    }

    #[test]
    fn converts_camel_case_to_snake_case() {
        assert_eq!(convert_graphql_name("test"), "test");
        assert_eq!(convert_graphql_name("testName"), "test_name");
        assert_eq!(convert_graphql_name("testOtherName"), "test_other_name");
        assert_eq!(convert_graphql_name("minAge"), "min_age");
        assert_eq!(convert_graphql_name("testWWWTest"), "test_www_test");
        assert_eq!(convert_graphql_name("test134"), "test_134");
        assert_eq!(convert_graphql_name("134test"), "134_test");
    }
}
