//! Shared processor conventions (well-known spellings).

/// Member-name prefix that marks a method as a getter. Matching is case-sensitive.
pub const GETTER_PREFIX: &str = "get";

/// Suffix appended to the annotated type's simple name to form the generated type name.
pub const GENERATED_SUFFIX: &str = "Generated";

/// Supported-annotation spelling that matches every annotation type in a round.
pub const WILDCARD_ANNOTATION: &str = "*";

/// File extension of generated source artifacts.
pub const SOURCE_EXTENSION: &str = ".java";

/// Marker annotation the generator processor claims unless configured otherwise.
pub const DEFAULT_MARKER_ANNOTATION: &str = "sample.annotation.MySampleAnnotation";

/// Field type emitted for every getter-derived field.
pub const GENERATED_FIELD_TYPE: &str = "int";

/// First line of every note-level round message.
pub const NOTE_BANNER: &str = "🚀";

/// First line of every error-level round message.
pub const ERROR_BANNER: &str = "🔥";

/// Decoration around a processor's name in its round header.
pub const PROCESSOR_HEADER_MARK: &str = "🤖";

/// Decoration in front of every element the generator picks up.
pub const FOUND_MARK: &str = "🎉";
