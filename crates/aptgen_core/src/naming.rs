//! Naming rules shared by extraction, code generation and artifact placement.
//!
//! ## Notes
//!
//! - Getter detection is a pure, case-sensitive prefix test. There is no arity or return-type filtering here;
//!   `"get"` itself is a getter whose derived field name is empty.
//! - Field derivation removes exactly the prefix, nothing else (no case folding).

use crate::lang::conventions::{GENERATED_SUFFIX, GETTER_PREFIX};
use crate::lang::java_keywords;

/// Return true if `name` is classified as a getter.
///
/// ## Examples
/// ```rust
/// use aptgen_core::naming::is_getter_name;
///
/// assert!(is_getter_name("getGreeting"));
/// assert!(is_getter_name("get"));
/// assert!(!is_getter_name("Getter"));
/// assert!(!is_getter_name("geT"));
/// ```
pub fn is_getter_name(name: &str) -> bool {
    name.starts_with(GETTER_PREFIX)
}

/// Derive the field name for a getter by removing the getter prefix.
///
/// Names that are not getters are returned unchanged.
///
/// ## Examples
/// ```rust
/// use aptgen_core::naming::getter_field_name;
///
/// assert_eq!(getter_field_name("getGreeting"), "Greeting");
/// assert_eq!(getter_field_name("get"), "");
/// ```
pub fn getter_field_name(getter: &str) -> &str {
    getter.strip_prefix(GETTER_PREFIX).unwrap_or(getter)
}

/// Name of the type generated for an annotated type.
pub fn generated_type_name(simple_name: &str) -> String {
    format!("{simple_name}{GENERATED_SUFFIX}")
}

/// Join a package and a simple name. The unnamed package (`""`) yields the bare name.
pub fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{package}.{name}")
    }
}

/// Check whether `name` is a single identifier that may be declared in generated source.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    is_identifier_start(first) && chars.all(is_identifier_part) && !java_keywords::is_keyword(name)
}

/// Check whether `name` is a dot-separated sequence of identifiers.
pub fn is_qualified_name(name: &str) -> bool {
    !name.is_empty() && name.split('.').all(is_identifier)
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
