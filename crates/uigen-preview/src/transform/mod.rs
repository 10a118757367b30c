//! Source transformation: JSX/TSX to browser-executable modules.
//!
//! Sources are parsed with tree-sitter and re-emitted through a
//! gap-preserving walk: text between syntax nodes is copied verbatim, and
//! only the nodes that need lowering are rewritten. JSX becomes
//! `createElement` calls, TypeScript-only syntax disappears, and import
//! specifiers are rewritten so the browser's import map can resolve them.
//!
//! # Examples
//!
//! ```
//! use uigen_preview::transform::{SourceTransformer, SpecifierRewrites};
//!
//! let mut transformer = SourceTransformer::new().unwrap();
//! let output = transformer
//!     .transform("/App.tsx", "const title: string = 'Hi';\nexport default () => <h1>{title}</h1>;", &SpecifierRewrites::new())
//!     .unwrap();
//!
//! assert!(output.uses_jsx);
//! assert!(output.code.contains("const title = 'Hi';"));
//! assert!(output.code.contains(r#"__jsx("h1", null, title)"#));
//! ```

mod jsx;
mod typescript;

use crate::error::PreviewError;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use thiserror::Error;
use tree_sitter::{Language, Node, Parser};

/// Prepended to every module that contains JSX.
pub const JSX_RUNTIME_IMPORT: &str =
    "import { createElement as __jsx, Fragment as __Fragment } from \"react\";\n";

/// What to do with an import specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    /// Replace the specifier
    To(String),
    /// Remove the whole import statement
    Drop,
}

/// Specifier rewrites for one module, keyed by the specifier as written.
pub type SpecifierRewrites = HashMap<String, Rewrite>;

/// A file that could not be lowered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransformError {
    /// What went wrong, including the position when known
    pub message: String,
    /// 1-based line
    pub line: Option<usize>,
    /// 1-based column
    pub column: Option<usize>,
}

impl TransformError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
            column: None,
        }
    }

    fn at(node: Node<'_>, message: &str) -> Self {
        let pos = node.start_position();
        Self {
            message: format!("{message} (line {}, column {})", pos.row + 1, pos.column + 1),
            line: Some(pos.row + 1),
            column: Some(pos.column + 1),
        }
    }
}

/// A transformed module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformOutput {
    /// Executable module text
    pub code: String,
    /// Whether JSX was lowered (and the runtime import prepended)
    pub uses_jsx: bool,
    /// Names imported with `{ ... }`, per specifier as written
    pub named_imports: BTreeMap<String, BTreeSet<String>>,
}

/// Grammar used for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// TypeScript with JSX; also used for `.js` and `.jsx`
    Tsx,
    /// Plain TypeScript, where `<T>x` is a type assertion
    TypeScript,
}

impl Dialect {
    /// Picks the grammar from a file path.
    #[must_use]
    pub fn for_path(path: &str) -> Self {
        if path.ends_with(".ts") && !path.ends_with(".d.ts") {
            Self::TypeScript
        } else {
            Self::Tsx
        }
    }
}

/// Lowers component sources to plain ES modules.
///
/// Holds a reusable parser, so transforming takes `&mut self`.
pub struct SourceTransformer {
    parser: Parser,
    tsx: Language,
    typescript: Language,
}

impl fmt::Debug for SourceTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceTransformer").finish_non_exhaustive()
    }
}

impl SourceTransformer {
    /// Creates a transformer.
    ///
    /// # Errors
    ///
    /// Returns `ParserInit` if the grammars are incompatible with the
    /// linked tree-sitter runtime.
    pub fn new() -> Result<Self, PreviewError> {
        let tsx: Language = tree_sitter_typescript::LANGUAGE_TSX.into();
        let typescript: Language = tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into();

        let mut parser = Parser::new();
        for language in [&typescript, &tsx] {
            parser
                .set_language(language)
                .map_err(|e| PreviewError::ParserInit {
                    message: e.to_string(),
                })?;
        }

        Ok(Self {
            parser,
            tsx,
            typescript,
        })
    }

    /// Transforms one module.
    ///
    /// # Errors
    ///
    /// Returns a `TransformError` for syntax errors and for constructs the
    /// preview cannot lower (TypeScript `enum` and `namespace`).
    pub fn transform(
        &mut self,
        path: &str,
        source: &str,
        rewrites: &SpecifierRewrites,
    ) -> Result<TransformOutput, TransformError> {
        let language = match Dialect::for_path(path) {
            Dialect::Tsx => &self.tsx,
            Dialect::TypeScript => &self.typescript,
        };
        self.parser
            .set_language(language)
            .map_err(|e| TransformError::new(format!("Parser setup failed: {e}")))?;

        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| TransformError::new("Parser produced no syntax tree"))?;
        let root = tree.root_node();
        if root.has_error() {
            return Err(syntax_error(root));
        }

        let mut emitter = Emitter::new(source, rewrites);
        emitter.emit(root)?;

        let mut code = emitter.out;
        if emitter.uses_jsx {
            code.insert_str(0, JSX_RUNTIME_IMPORT);
        }
        Ok(TransformOutput {
            code,
            uses_jsx: emitter.uses_jsx,
            named_imports: emitter.named_imports,
        })
    }
}

/// Import specifiers of a module in source order, without duplicates.
///
/// Covers static imports, re-exports and dynamic `import()` with a literal
/// argument, wherever they sit in the file. Type-only imports are skipped;
/// they vanish during transformation. Text that only looks like an import,
/// inside a string or template literal, is ignored.
///
/// # Errors
///
/// Returns a `TransformError` if the grammar cannot be loaded.
///
/// # Examples
///
/// ```
/// use uigen_preview::transform::import_specifiers;
///
/// let source = r#"
/// import React, { useState } from 'react';
/// import type { Props } from './types';
/// import './styles.css';
/// export { Button } from "@/components/Button";
/// const Lazy = () => import('./Lazy');
/// "#;
///
/// assert_eq!(
///     import_specifiers("/App.tsx", source).unwrap(),
///     vec!["react", "./styles.css", "@/components/Button", "./Lazy"]
/// );
/// ```
pub fn import_specifiers(path: &str, source: &str) -> Result<Vec<String>, TransformError> {
    let language: Language = match Dialect::for_path(path) {
        Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
    };
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| TransformError::new(format!("Parser setup failed: {e}")))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| TransformError::new("Parser produced no syntax tree"))?;

    let mut specifiers = Vec::new();
    collect_specifiers(tree.root_node(), source, &mut specifiers);
    Ok(specifiers)
}

fn collect_specifiers(node: Node<'_>, source: &str, found: &mut Vec<String>) {
    match node.kind() {
        "import_statement" | "export_statement"
            if has_token(node, "type") || has_token(node, "typeof") =>
        {
            return;
        }
        "string" if is_module_specifier(node) => {
            let text = source.get(node.start_byte()..node.end_byte()).unwrap_or_default();
            let value = text.get(1..text.len().saturating_sub(1)).unwrap_or_default();
            if !value.is_empty() && !found.iter().any(|s| s == value) {
                found.push(value.to_string());
            }
            return;
        }
        _ => {}
    }
    for child in named_children(node) {
        collect_specifiers(child, source, found);
    }
}

fn syntax_error(root: Node<'_>) -> TransformError {
    match first_error(root) {
        Some(node) if node.is_missing() => {
            TransformError::at(node, &format!("Syntax error: missing '{}'", node.kind()))
        }
        Some(node) => TransformError::at(node, "Syntax error: unexpected input"),
        None => TransformError::new("Syntax error"),
    }
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    children(node)
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(first_error)
}

/// All children, anonymous tokens included.
pub(crate) fn children(node: Node<'_>) -> Vec<Node<'_>> {
    (0..node.child_count())
        .filter_map(|i| node.child(i))
        .collect()
}

/// Named children without comments.
pub(crate) fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    (0..node.named_child_count())
        .filter_map(|i| node.named_child(i))
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// Returns `true` if `node` has a direct child token of `kind`.
pub(crate) fn has_token(node: Node<'_>, kind: &str) -> bool {
    children(node).iter().any(|child| child.kind() == kind)
}

/// A JavaScript string literal for `value`.
pub(crate) fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

type EmitResult = Result<(), TransformError>;

/// Gap-preserving re-emitter over one syntax tree.
pub(crate) struct Emitter<'s> {
    source: &'s str,
    rewrites: &'s SpecifierRewrites,
    out: String,
    uses_jsx: bool,
    named_imports: BTreeMap<String, BTreeSet<String>>,
}

impl<'s> Emitter<'s> {
    fn new(source: &'s str, rewrites: &'s SpecifierRewrites) -> Self {
        Self {
            source,
            rewrites,
            out: String::with_capacity(source.len() + JSX_RUNTIME_IMPORT.len()),
            uses_jsx: false,
            named_imports: BTreeMap::new(),
        }
    }

    fn slice(&self, start: usize, end: usize) -> &'s str {
        self.source.get(start..end).unwrap_or_default()
    }

    fn text(&self, node: Node<'_>) -> &'s str {
        self.slice(node.start_byte(), node.end_byte())
    }

    /// Contents of a string literal node, without its quotes.
    fn string_value(&self, node: Node<'_>) -> &'s str {
        let text = self.text(node);
        text.get(1..text.len().saturating_sub(1)).unwrap_or_default()
    }

    fn emit(&mut self, node: Node<'_>) -> EmitResult {
        match node.kind() {
            "jsx_element" | "jsx_self_closing_element" => self.emit_jsx(node),
            "string" if is_module_specifier(node) => {
                self.emit_specifier(node);
                Ok(())
            }
            "import_statement" => self.emit_import(node),
            "export_statement" => self.emit_export(node),
            "named_imports" | "export_clause" => self.emit_specifier_list(node),
            "required_parameter" | "optional_parameter" => self.emit_parameter(node),
            "as_expression" | "satisfies_expression" | "non_null_expression" => {
                match named_children(node).first() {
                    Some(inner) => self.emit(*inner),
                    None => Ok(()),
                }
            }
            "enum_declaration" => Err(TransformError::at(
                node,
                "TypeScript enums are not supported in the preview; use a plain object instead",
            )),
            "internal_module" | "module" => Err(TransformError::at(
                node,
                "TypeScript namespaces are not supported in the preview",
            )),
            kind if typescript::is_erased(kind) => Ok(()),
            _ => self.emit_children(node),
        }
    }

    fn emit_children(&mut self, node: Node<'_>) -> EmitResult {
        let mut pos = node.start_byte();
        for child in children(node) {
            self.out.push_str(self.slice(pos, child.start_byte()));
            if !typescript::is_erased_token(node.kind(), child.kind()) {
                self.emit(child)?;
            }
            pos = child.end_byte();
        }
        self.out.push_str(self.slice(pos, node.end_byte()));
        Ok(())
    }

    fn emit_specifier(&mut self, node: Node<'_>) {
        match self.rewrites.get(self.string_value(node)) {
            Some(Rewrite::To(target)) => self.out.push_str(&js_string(target)),
            _ => self.out.push_str(self.text(node)),
        }
    }

    fn source_rewrite(&self, statement: Node<'_>) -> Option<&'s Rewrite> {
        let source = statement.child_by_field_name("source")?;
        self.rewrites.get(self.string_value(source))
    }

    fn emit_import(&mut self, node: Node<'_>) -> EmitResult {
        if has_token(node, "type") || has_token(node, "typeof") {
            return Ok(());
        }
        if self.source_rewrite(node) == Some(&Rewrite::Drop) {
            return Ok(());
        }
        self.record_named_imports(node);
        self.emit_children(node)
    }

    fn record_named_imports(&mut self, node: Node<'_>) {
        let Some(source) = node.child_by_field_name("source") else {
            return;
        };
        let specifier = self.string_value(source).to_string();
        let names: Vec<String> = named_children(node)
            .into_iter()
            .filter(|child| child.kind() == "import_clause")
            .flat_map(named_children)
            .filter(|child| child.kind() == "named_imports")
            .flat_map(named_children)
            .filter(|spec| spec.kind() == "import_specifier" && !has_token(*spec, "type"))
            .filter_map(|spec| spec.child_by_field_name("name"))
            .map(|name| self.text(name).to_string())
            .collect();
        if !names.is_empty() {
            self.named_imports
                .entry(specifier)
                .or_default()
                .extend(names);
        }
    }

    fn emit_export(&mut self, node: Node<'_>) -> EmitResult {
        if has_token(node, "type") {
            return Ok(());
        }
        if let Some(declaration) = node.child_by_field_name("declaration")
            && typescript::is_erased(declaration.kind())
        {
            return Ok(());
        }
        if self.source_rewrite(node) == Some(&Rewrite::Drop) {
            return Ok(());
        }
        self.emit_children(node)
    }

    /// `{ a, type B, c as d }` with type-only entries removed.
    fn emit_specifier_list(&mut self, node: Node<'_>) -> EmitResult {
        let specs = named_children(node);
        let kept: Vec<&str> = specs
            .iter()
            .filter(|spec| !has_token(**spec, "type"))
            .map(|spec| self.text(*spec))
            .collect();
        if kept.len() == specs.len() {
            return self.emit_children(node);
        }
        if kept.is_empty() {
            self.out.push_str("{}");
        } else {
            self.out.push_str("{ ");
            self.out.push_str(&kept.join(", "));
            self.out.push_str(" }");
        }
        Ok(())
    }

    /// Parameters keep their binding pattern and default value only.
    fn emit_parameter(&mut self, node: Node<'_>) -> EmitResult {
        if let Some(pattern) = node.child_by_field_name("pattern") {
            self.emit(pattern)?;
        }
        if let Some(value) = node.child_by_field_name("value") {
            self.out.push_str(" = ");
            self.emit(value)?;
        }
        Ok(())
    }
}

/// Returns `true` for the specifier string of an import, re-export or
/// dynamic `import()`.
fn is_module_specifier(node: Node<'_>) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    match parent.kind() {
        "import_statement" | "export_statement" => parent
            .child_by_field_name("source")
            .is_some_and(|source| source.id() == node.id()),
        "arguments" => parent.parent().is_some_and(|call| {
            call.kind() == "call_expression"
                && call
                    .child_by_field_name("function")
                    .is_some_and(|function| function.kind() == "import")
        }),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(path: &str, source: &str) -> Result<TransformOutput, TransformError> {
        SourceTransformer::new()
            .unwrap()
            .transform(path, source, &SpecifierRewrites::new())
    }

    fn code(path: &str, source: &str) -> String {
        run(path, source).unwrap().code
    }

    #[test]
    fn test_plain_module_passes_through() {
        let source = "export const add = (a, b) => a + b;\n";
        let output = run("/math.js", source).unwrap();
        assert_eq!(output.code, source);
        assert!(!output.uses_jsx);
    }

    #[test]
    fn test_jsx_gets_runtime_import() {
        let out = code("/App.jsx", "export default () => <div />;");
        assert!(out.starts_with(JSX_RUNTIME_IMPORT));
        assert!(out.ends_with(r#"export default () => __jsx("div", null);"#));
    }

    #[test]
    fn test_function_signature_types_erased() {
        let out = code(
            "/math.ts",
            "function add(a: number, b?: number): number { return a + (b ?? 0); }",
        );
        assert_eq!(out, "function add(a, b) { return a + (b ?? 0); }");
    }

    #[test]
    fn test_declarations_erased() {
        let out = code(
            "/types.ts",
            "interface Props { title: string }\ntype Id = string;\nexport interface Other {}\nexport type Alias = number;\nconst x = 1;",
        );
        assert!(!out.contains("interface"));
        assert!(!out.contains("type"));
        assert!(out.contains("const x = 1;"));
    }

    #[test]
    fn test_expression_types_erased() {
        let out = code(
            "/util.ts",
            "const a = value as string;\nconst b = maybe!;\nconst c = useState<number>(0);\nconst d = { x: 1 } satisfies Point;",
        );
        assert!(out.contains("const a = value;"));
        assert!(out.contains("const b = maybe;"));
        assert!(out.contains("const c = useState(0);"));
        assert!(out.contains("const d = { x: 1 };"));
    }

    #[test]
    fn test_generic_arrow_in_tsx() {
        let out = code("/id.tsx", "const id = <T,>(x: T): T => x;");
        assert_eq!(out, "const id = (x) => x;");
    }

    #[test]
    fn test_class_members_lose_modifiers() {
        let out = code(
            "/store.ts",
            "class Store implements Source {\n  private readonly items: string[] = [];\n  public find(id: string): string { return id; }\n}",
        );
        assert!(!out.contains("implements"));
        assert!(!out.contains("private"));
        assert!(!out.contains("readonly"));
        assert!(!out.contains("public"));
        assert!(out.contains("items = [];"));
        assert!(out.contains("find(id) { return id; }"));
    }

    #[test]
    fn test_type_only_imports_removed() {
        let out = code(
            "/App.tsx",
            "import type { Props } from './types';\nimport { type Item, render } from './lib';\nexport type { Props };\nrender();",
        );
        assert!(!out.contains("./types"));
        assert!(out.contains("import { render } from './lib';"));
        assert!(!out.contains("export"));
    }

    #[test]
    fn test_specifiers_rewritten_and_stylesheets_dropped() {
        let mut rewrites = SpecifierRewrites::new();
        rewrites.insert("./Card".to_string(), Rewrite::To("@/components/Card.jsx".to_string()));
        rewrites.insert("./card.css".to_string(), Rewrite::Drop);
        rewrites.insert("./Lazy".to_string(), Rewrite::To("@/components/Lazy.jsx".to_string()));

        let source = "import Card from './Card';\nimport './card.css';\nimport { useState } from 'react';\nconst Lazy = () => import('./Lazy');\nexport { default as Card2 } from './Card';";
        let out = SourceTransformer::new()
            .unwrap()
            .transform("/components/List.jsx", source, &rewrites)
            .unwrap()
            .code;

        assert!(out.contains(r#"import Card from "@/components/Card.jsx";"#));
        assert!(!out.contains("card.css"));
        assert!(out.contains("import { useState } from 'react';"));
        assert!(out.contains(r#"import("@/components/Lazy.jsx")"#));
        assert!(out.contains(r#"export { default as Card2 } from "@/components/Card.jsx";"#));
    }

    #[test]
    fn test_named_imports_recorded() {
        let output = run(
            "/App.jsx",
            "import Main, { Header, Footer as Bottom } from './layout';\nimport * as all from './all';",
        )
        .unwrap();
        let names: Vec<_> = output.named_imports["./layout"].iter().cloned().collect();
        assert_eq!(names, vec!["Footer", "Header"]);
        assert!(!output.named_imports.contains_key("./all"));
    }

    #[test]
    fn test_specifiers_found_anywhere_in_a_line() {
        let source = "const a = 1; import B from './B';\nif (a) { import('./C').then(render); }";
        assert_eq!(import_specifiers("/App.jsx", source).unwrap(), vec!["./B", "./C"]);
    }

    #[test]
    fn test_specifiers_ignore_import_shaped_text() {
        let source = "const help = `\nimport Gone from './Gone';\n`;\nconst s = \"import './nope'\";\n// import X from './X';\nexport default help;";
        assert!(import_specifiers("/App.jsx", source).unwrap().is_empty());
    }

    #[test]
    fn test_specifiers_multiline_reexports_and_type_only() {
        let source = "import {\n  a,\n  b,\n} from './ab';\nimport type { T } from './types';\nexport * from './all';\nimport { c } from './ab';\nexport default function X() {}";
        assert_eq!(import_specifiers("/mod.ts", source).unwrap(), vec!["./ab", "./all"]);
    }

    #[test]
    fn test_enum_is_transform_failure() {
        let err = run("/colors.ts", "enum Color { Red, Green }").unwrap_err();
        assert!(err.message.contains("enums are not supported"));
        assert_eq!(err.line, Some(1));
    }

    #[test]
    fn test_syntax_error_reports_position() {
        let err = run("/App.jsx", "const a = 1;\nconst = ;").unwrap_err();
        assert!(err.message.starts_with("Syntax error"));
        assert_eq!(err.line, Some(2));
    }

    #[test]
    fn test_dialect_selection() {
        assert_eq!(Dialect::for_path("/a.ts"), Dialect::TypeScript);
        assert_eq!(Dialect::for_path("/a.tsx"), Dialect::Tsx);
        assert_eq!(Dialect::for_path("/a.js"), Dialect::Tsx);
    }

    #[test]
    fn test_type_assertion_in_typescript() {
        let out = code("/a.ts", "const n = <number>value;");
        assert_eq!(out, "const n = value;");
    }
}
