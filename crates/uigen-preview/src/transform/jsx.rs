//! JSX lowering to `createElement` calls.

use super::{EmitResult, Emitter, js_string, named_children};
use tree_sitter::Node;

impl Emitter<'_> {
    /// `<Tag a="1" {...rest}>text {expr}</Tag>` becomes
    /// `__jsx(Tag, {"a": "1", ...rest}, "text ", expr)`.
    pub(super) fn emit_jsx(&mut self, node: Node<'_>) -> EmitResult {
        self.uses_jsx = true;

        let (open, close) = if node.kind() == "jsx_self_closing_element" {
            (node, None)
        } else {
            let parts = named_children(node);
            let open = parts
                .iter()
                .copied()
                .find(|part| part.kind() == "jsx_opening_element")
                .unwrap_or(node);
            let close = parts
                .iter()
                .copied()
                .find(|part| part.kind() == "jsx_closing_element");
            (open, close)
        };

        let name = open.child_by_field_name("name");
        self.out.push_str("__jsx(");
        match name {
            Some(name) => self.out.push_str(&element_type(self.text(name))),
            None => self.out.push_str("__Fragment"),
        }
        self.out.push_str(", ");
        self.emit_props(open, name)?;

        if let Some(close) = close {
            self.emit_jsx_children(node, open, close)?;
        }
        self.out.push(')');
        Ok(())
    }

    fn emit_props(&mut self, open: Node<'_>, name: Option<Node<'_>>) -> EmitResult {
        let name_id = name.map(|n| n.id());
        let attributes: Vec<Node<'_>> = named_children(open)
            .into_iter()
            .filter(|child| Some(child.id()) != name_id)
            .filter(|child| matches!(child.kind(), "jsx_attribute" | "jsx_expression"))
            .collect();

        if attributes.is_empty() {
            self.out.push_str("null");
            return Ok(());
        }

        self.out.push('{');
        for (i, attribute) in attributes.into_iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            if attribute.kind() == "jsx_expression" {
                // `{...props}`
                for inner in named_children(attribute) {
                    self.emit(inner)?;
                }
                continue;
            }

            let parts = named_children(attribute);
            let Some(key) = parts.first() else {
                continue;
            };
            self.out.push_str(&js_string(self.text(*key)));
            self.out.push_str(": ");
            match parts.get(1) {
                Some(value) => self.emit_attribute_value(*value)?,
                None => self.out.push_str("true"),
            }
        }
        self.out.push('}');
        Ok(())
    }

    fn emit_attribute_value(&mut self, value: Node<'_>) -> EmitResult {
        match value.kind() {
            "string" => {
                let decoded = decode_entities(self.string_value(value));
                self.out.push_str(&js_string(&decoded));
                Ok(())
            }
            "jsx_expression" => {
                let inner = named_children(value);
                if inner.is_empty() {
                    self.out.push_str("undefined");
                }
                for node in inner {
                    self.emit(node)?;
                }
                Ok(())
            }
            _ => self.emit(value),
        }
    }

    /// Children are everything between the opening and closing tags. Text
    /// is taken from the raw source between non-text children so that
    /// whitespace handling does not depend on how the grammar splits it.
    fn emit_jsx_children(&mut self, node: Node<'_>, open: Node<'_>, close: Node<'_>) -> EmitResult {
        let mut cursor = open.end_byte();
        for child in named_children(node) {
            match child.kind() {
                "jsx_opening_element" | "jsx_closing_element" | "jsx_text"
                | "html_character_reference" => {}
                "jsx_expression" => {
                    self.emit_text_child(cursor, child.start_byte());
                    let inner = named_children(child);
                    for expression in inner {
                        self.out.push_str(", ");
                        self.emit(expression)?;
                    }
                    cursor = child.end_byte();
                }
                _ => {
                    self.emit_text_child(cursor, child.start_byte());
                    self.out.push_str(", ");
                    self.emit(child)?;
                    cursor = child.end_byte();
                }
            }
        }
        self.emit_text_child(cursor, close.start_byte());
        Ok(())
    }

    fn emit_text_child(&mut self, start: usize, end: usize) {
        if end <= start {
            return;
        }
        let text = clean_text(self.slice(start, end));
        if !text.is_empty() {
            self.out.push_str(", ");
            self.out.push_str(&js_string(&decode_entities(&text)));
        }
    }
}

/// Lowercase and dashed names are intrinsic elements; everything else is
/// a component reference.
fn element_type(name: &str) -> String {
    let intrinsic = (name.starts_with(|c: char| c.is_ascii_lowercase()) && !name.contains('.'))
        || name.contains('-')
        || name.contains(':');
    if intrinsic {
        js_string(name)
    } else {
        name.to_string()
    }
}

/// JSX text whitespace rules: lines are trimmed, lines that are empty
/// after trimming are dropped, and the rest are joined with one space.
/// Whitespace inside a single line is kept.
fn clean_text(raw: &str) -> String {
    let lines: Vec<&str> = raw.split('\n').collect();
    let last = lines.len().saturating_sub(1);
    let mut out = String::new();

    for (i, line) in lines.iter().enumerate() {
        let mut trimmed: &str = line;
        if i != 0 {
            trimmed = trimmed.trim_start_matches([' ', '\t', '\r']);
        }
        if i != last {
            trimmed = trimmed.trim_end_matches([' ', '\t', '\r']);
        }
        if trimmed.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(trimmed);
    }
    out
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let decoded = tail
            .find(';')
            .filter(|end| *end <= 10)
            .and_then(|end| decode_entity(&tail[1..end]).map(|c| (c, end)));
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    if let Some(dec) = name.strip_prefix('#') {
        return dec.parse::<u32>().ok().and_then(char::from_u32);
    }
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        "copy" => Some('\u{a9}'),
        "hellip" => Some('\u{2026}'),
        "mdash" => Some('\u{2014}'),
        "ndash" => Some('\u{2013}'),
        "times" => Some('\u{d7}'),
        "rarr" => Some('\u{2192}'),
        "larr" => Some('\u{2190}'),
        _ => None,
    }
}
