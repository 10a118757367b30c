//! TypeScript-only syntax that is removed during lowering.

/// Node kinds that carry no runtime behavior.
const ERASED_KINDS: &[&str] = &[
    "type_annotation",
    "opting_type_annotation",
    "omitting_type_annotation",
    "adding_type_annotation",
    "asserts_annotation",
    "type_predicate_annotation",
    "type_arguments",
    "type_parameters",
    "interface_declaration",
    "type_alias_declaration",
    "ambient_declaration",
    "function_signature",
    "abstract_method_signature",
    "index_signature",
    "implements_clause",
    "accessibility_modifier",
    "override_modifier",
];

/// Returns `true` if a node of `kind` is dropped entirely.
pub(super) fn is_erased(kind: &str) -> bool {
    ERASED_KINDS.contains(&kind)
}

/// Returns `true` for modifier tokens that are dropped inside `parent`.
pub(super) fn is_erased_token(parent: &str, token: &str) -> bool {
    match parent {
        "public_field_definition" => {
            matches!(token, "readonly" | "declare" | "abstract" | "?" | "!")
        }
        "abstract_class_declaration" => token == "abstract",
        "method_definition" => token == "?",
        "variable_declarator" => token == "!",
        _ => false,
    }
}
