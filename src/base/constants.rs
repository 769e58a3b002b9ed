//! Domain constants shared across the toolchain.

/// Namespace of the built-in (prelude) shapes and traits.
pub const PRELUDE_NAMESPACE: &str = "smithy.api";

/// File extension of IDL source files.
pub const IDL_EXTENSION: &str = "smithy";

/// File extension of JSON AST files.
pub const JSON_EXTENSION: &str = "json";

/// Model version assumed when a file carries no `$version` pragma.
pub const DEFAULT_VERSION: &str = "1.0";

/// Column at which single-line documentation is wrapped.
pub const DOC_WRAP_COLUMN: usize = 100;

/// Indentation unit used by every text emitter.
pub const INDENT: &str = "    ";

/// Built-in shape names that resolve to the prelude namespace.
pub const PRELUDE_TYPES: &[&str] = &[
    "Blob",
    "Boolean",
    "String",
    "Byte",
    "Short",
    "Integer",
    "Long",
    "Float",
    "Double",
    "BigInteger",
    "BigDecimal",
    "Timestamp",
    "Document",
    "Unit",
    "PrimitiveBoolean",
    "PrimitiveByte",
    "PrimitiveShort",
    "PrimitiveInteger",
    "PrimitiveLong",
    "PrimitiveFloat",
    "PrimitiveDouble",
];

/// Prelude trait names without a dedicated visitor; they still resolve to
/// the prelude namespace rather than the file's namespace.
pub const PRELUDE_TRAITS: &[&str] = &[
    "addedDefault",
    "auth",
    "authDefinition",
    "cors",
    "default",
    "endpoint",
    "eventHeader",
    "eventPayload",
    "externalDocumentation",
    "hostLabel",
    "httpApiKeyAuth",
    "httpBasicAuth",
    "httpBearerAuth",
    "httpChecksumRequired",
    "httpDigestAuth",
    "httpPrefixHeaders",
    "httpQueryParams",
    "idRef",
    "internal",
    "jsonName",
    "mediaType",
    "mixin",
    "noReplace",
    "optionalAuth",
    "private",
    "protocolDefinition",
    "recommended",
    "references",
    "requestCompression",
    "requiresLength",
    "resourceIdentifier",
    "retryable",
    "since",
    "sparse",
    "streaming",
    "suppress",
    "uniqueItems",
    "unstable",
    "unitType",
    "xmlAttribute",
    "xmlFlattened",
    "xmlName",
    "xmlNamespace",
];

/// Well-known trait identifiers.
pub mod traits {
    pub const DOCUMENTATION: &str = "smithy.api#documentation";
    pub const TAGS: &str = "smithy.api#tags";
    pub const ENUM: &str = "smithy.api#enum";
    pub const ENUM_VALUE: &str = "smithy.api#enumValue";
    pub const EXAMPLES: &str = "smithy.api#examples";
    pub const DEFAULT: &str = "smithy.api#default";
    pub const INPUT: &str = "smithy.api#input";
    pub const OUTPUT: &str = "smithy.api#output";
    pub const REQUIRED: &str = "smithy.api#required";
    pub const HTTP: &str = "smithy.api#http";
    pub const HTTP_ERROR: &str = "smithy.api#httpError";
    pub const HTTP_LABEL: &str = "smithy.api#httpLabel";
    pub const HTTP_QUERY: &str = "smithy.api#httpQuery";
    pub const HTTP_HEADER: &str = "smithy.api#httpHeader";
    pub const HTTP_PAYLOAD: &str = "smithy.api#httpPayload";
    pub const HTTP_RESPONSE_CODE: &str = "smithy.api#httpResponseCode";
    pub const ERROR: &str = "smithy.api#error";
    pub const LENGTH: &str = "smithy.api#length";
    pub const RANGE: &str = "smithy.api#range";
    pub const PATTERN: &str = "smithy.api#pattern";
    pub const TIMESTAMP_FORMAT: &str = "smithy.api#timestampFormat";
    pub const DEPRECATED: &str = "smithy.api#deprecated";
}
