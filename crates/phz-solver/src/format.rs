//! Diagnostic formatting of types.
//!
//! Output follows PHPDoc spelling closely enough to read in test failures
//! and logs (`list<int>`, `array{0: 'b', 1?: int}`, `int<-9, max>`). It is
//! not a serialization format and is not meant to be parsed back.

use crate::intern::TypeInterner;
use crate::types::{
    ArrayKey, ArrayShape, CallableShapeId, ConditionalSubject, ConditionalType, IntrinsicKind,
    LiteralValue, ObjectProperty, Param, TemplateAnchor, TypeData, TypeId,
};
use crate::visitor::TypeVisitor;
use phz_common::interner::Atom;

/// Nesting below this depth is elided as `...`.
const MAX_FORMAT_DEPTH: u32 = 32;

pub struct TypeFormatter<'a> {
    interner: &'a TypeInterner,
    depth: u32,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(interner: &'a TypeInterner) -> Self {
        TypeFormatter { interner, depth: 0 }
    }

    pub fn format(&mut self, type_id: TypeId) -> String {
        if self.depth >= MAX_FORMAT_DEPTH {
            return "...".to_string();
        }
        self.depth += 1;
        let interner = self.interner;
        let result = interner.accept(type_id, self);
        self.depth -= 1;
        result
    }

    fn format_list(&mut self, types: &[TypeId]) -> String {
        types
            .iter()
            .map(|&type_id| self.format(type_id))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn format_args(&mut self, args: &[TypeId]) -> String {
        if args.is_empty() {
            String::new()
        } else {
            format!("<{}>", self.format_list(args))
        }
    }

    fn atom(&self, atom: Atom) -> std::sync::Arc<str> {
        self.interner.resolve_atom_ref(atom)
    }

    fn format_key(&self, key: ArrayKey) -> String {
        match key {
            ArrayKey::Int(value) => value.to_string(),
            ArrayKey::String(atom) => {
                let text = self.atom(atom);
                if is_plain_identifier(&text) {
                    text.to_string()
                } else {
                    quote(&text)
                }
            }
        }
    }

    fn format_signature(&mut self, keyword: &str, params: &[Param], return_type: TypeId) -> String {
        let params = params
            .iter()
            .map(|param| {
                let mut text = self.format(param.type_id);
                if param.is_by_reference() {
                    text.push('&');
                }
                if param.is_variadic() {
                    text.push_str("...");
                }
                if param.has_default() {
                    text.push('=');
                }
                text
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("{keyword}({params}): {}", self.format(return_type))
    }

    /// Format a union or intersection member, parenthesizing where the
    /// joined text would be ambiguous.
    fn format_member(&mut self, member: TypeId, in_union: bool) -> String {
        let text = self.format(member);
        let needs_parens = match self.interner.lookup(member) {
            Some(TypeData::Callable(shape) | TypeData::Closure(shape)) => {
                shape != CallableShapeId::DEFAULT
            }
            Some(TypeData::Union(_)) => !in_union,
            Some(TypeData::Intersection(_)) => in_union,
            _ => false,
        };
        if needs_parens { format!("({text})") } else { text }
    }
}

impl TypeVisitor for TypeFormatter<'_> {
    type Output = String;

    fn visit_intrinsic(&mut self, _id: TypeId, kind: IntrinsicKind) -> String {
        kind.name().to_string()
    }

    fn visit_literal(&mut self, _id: TypeId, value: LiteralValue) -> String {
        match value {
            LiteralValue::Int(value) => value.to_string(),
            LiteralValue::Float(value) => format!("{:?}", value.0),
            LiteralValue::String(atom) => quote(&self.atom(atom)),
        }
    }

    fn visit_int_range(&mut self, _id: TypeId, min: Option<i64>, max: Option<i64>) -> String {
        let min = min.map_or_else(|| "min".to_string(), |value| value.to_string());
        let max = max.map_or_else(|| "max".to_string(), |value| value.to_string());
        format!("int<{min}, {max}>")
    }

    fn visit_int_mask(&mut self, _id: TypeId, inner: TypeId) -> String {
        match self.interner.lookup(inner) {
            Some(TypeData::Union(members)) => {
                let members = self.interner.type_list(members);
                format!("int-mask<{}>", self.format_list(&members))
            }
            Some(TypeData::Literal(_)) => format!("int-mask<{}>", self.format(inner)),
            _ => format!("int-mask-of<{}>", self.format(inner)),
        }
    }

    fn visit_class_string(&mut self, _id: TypeId, object: TypeId) -> String {
        format!("class-string<{}>", self.format(object))
    }

    fn visit_array(&mut self, _id: TypeId, shape: &ArrayShape) -> String {
        let keyword = if shape.list { "list" } else { "array" };

        if shape.sealed || !shape.elements.is_empty() {
            let mut parts: Vec<String> = shape
                .elements
                .iter()
                .map(|element| {
                    let marker = if element.optional { "?" } else { "" };
                    format!(
                        "{}{marker}: {}",
                        self.format_key(element.key),
                        self.format(element.type_id)
                    )
                })
                .collect();
            if !shape.sealed {
                if shape.list {
                    parts.push(format!("...<{}>", self.format(shape.value)));
                } else if shape.key == TypeId::ARRAY_KEY && shape.value == TypeId::MIXED {
                    parts.push("...".to_string());
                } else {
                    let key = self.format(shape.key);
                    let value = self.format(shape.value);
                    parts.push(format!("...<{key}, {value}>"));
                }
            }
            let prefix = if shape.non_empty { "non-empty-" } else { "" };
            return format!("{prefix}{keyword}{{{}}}", parts.join(", "));
        }

        if shape.list {
            let value = self.format(shape.value);
            return if shape.non_empty {
                format!("non-empty-list<{value}>")
            } else {
                format!("list<{value}>")
            };
        }
        if !shape.non_empty && shape.key == TypeId::ARRAY_KEY && shape.value == TypeId::MIXED {
            return "array".to_string();
        }
        let key = self.format(shape.key);
        let value = self.format(shape.value);
        if shape.non_empty {
            format!("non-empty-array<{key}, {value}>")
        } else {
            format!("array<{key}, {value}>")
        }
    }

    fn visit_iterable(&mut self, id: TypeId, key: TypeId, value: TypeId) -> String {
        if id == TypeId::ITERABLE {
            return "iterable".to_string();
        }
        let key = self.format(key);
        let value = self.format(value);
        format!("iterable<{key}, {value}>")
    }

    fn visit_named_object(&mut self, _id: TypeId, class: Atom, args: &[TypeId]) -> String {
        format!("{}{}", self.atom(class), self.format_args(args))
    }

    fn visit_static(&mut self, _id: TypeId, class: Atom, args: &[TypeId]) -> String {
        format!("static<{}>{}", self.atom(class), self.format_args(args))
    }

    fn visit_self(&mut self, _id: TypeId, args: &[TypeId]) -> String {
        format!("self{}", self.format_args(args))
    }

    fn visit_parent(&mut self, _id: TypeId, args: &[TypeId]) -> String {
        format!("parent{}", self.format_args(args))
    }

    fn visit_object_shape(&mut self, _id: TypeId, properties: &[ObjectProperty]) -> String {
        let parts: Vec<String> = properties
            .iter()
            .map(|prop| {
                let marker = if prop.optional { "?" } else { "" };
                format!("{}{marker}: {}", self.atom(prop.name), self.format(prop.type_id))
            })
            .collect();
        format!("object{{{}}}", parts.join(", "))
    }

    fn visit_callable(&mut self, id: TypeId, params: &[Param], return_type: TypeId) -> String {
        if id == TypeId::CALLABLE {
            return "callable".to_string();
        }
        self.format_signature("callable", params, return_type)
    }

    fn visit_closure(&mut self, id: TypeId, params: &[Param], return_type: TypeId) -> String {
        if id == TypeId::CLOSURE {
            return "Closure".to_string();
        }
        self.format_signature("Closure", params, return_type)
    }

    fn visit_constant(&mut self, _id: TypeId, name: Atom) -> String {
        self.atom(name).to_string()
    }

    fn visit_class_constant(&mut self, _id: TypeId, class: TypeId, name: Atom) -> String {
        format!("{}::{}", self.format(class), self.atom(name))
    }

    fn visit_key_of(&mut self, _id: TypeId, inner: TypeId) -> String {
        format!("key-of<{}>", self.format(inner))
    }

    fn visit_value_of(&mut self, _id: TypeId, inner: TypeId) -> String {
        format!("value-of<{}>", self.format(inner))
    }

    fn visit_template(
        &mut self,
        _id: TypeId,
        name: Atom,
        anchor: TemplateAnchor,
        args: &[TypeId],
    ) -> String {
        let site = match anchor {
            TemplateAnchor::AtClass(class) => self.atom(class).to_string(),
            TemplateAnchor::AtMethod { class, method } => {
                format!("{}::{}", self.atom(class), self.atom(method))
            }
            TemplateAnchor::AtFunction(function) => self.atom(function).to_string(),
        };
        format!("{}@{site}{}", self.atom(name), self.format_args(args))
    }

    fn visit_conditional(&mut self, _id: TypeId, conditional: &ConditionalType) -> String {
        let subject = match conditional.subject {
            ConditionalSubject::Argument(name) => format!("${}", self.atom(name)),
            ConditionalSubject::Type(type_id) => self.format(type_id),
        };
        format!(
            "({subject} is {} ? {} : {})",
            self.format(conditional.if_type),
            self.format(conditional.then_type),
            self.format(conditional.else_type)
        )
    }

    fn visit_union(&mut self, _id: TypeId, members: &[TypeId]) -> String {
        members
            .iter()
            .map(|&member| self.format_member(member, true))
            .collect::<Vec<_>>()
            .join("|")
    }

    fn visit_intersection(&mut self, _id: TypeId, members: &[TypeId]) -> String {
        members
            .iter()
            .map(|&member| self.format_member(member, false))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Format `type_id` for diagnostics.
pub fn stringify(interner: &TypeInterner, type_id: TypeId) -> String {
    TypeFormatter::new(interner).format(type_id)
}

fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('\'');
    for ch in text.chars() {
        if matches!(ch, '\'' | '\\') {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('\'');
    quoted
}

fn is_plain_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
