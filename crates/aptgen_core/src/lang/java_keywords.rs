//! Keyword vocabulary of the generated language (for identifier validation).

/// Reserved keywords and literals that can never be used as identifiers.
pub const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const", "continue",
    "default", "do", "double", "else", "enum", "extends", "final", "finally", "float", "for", "goto", "if",
    "implements", "import", "instanceof", "int", "interface", "long", "native", "new", "package", "private",
    "protected", "public", "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this",
    "throw", "throws", "transient", "try", "void", "volatile", "while", "true", "false", "null", "_",
];

/// Check whether an identifier is a reserved word.
pub fn is_keyword(name: &str) -> bool {
    JAVA_KEYWORDS.contains(&name)
}
