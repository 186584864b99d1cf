//! Lowering of already-parsed type names into the algebra.
//!
//! Nothing here reads source text. Callers hand over reflection-shaped
//! native types ([`NativeType`]) or PHPDoc names with their lowered
//! arguments, and get back a [`TypeId`] or a [`LowerError`] describing why
//! the input has no meaning in the algebra.

use crate::errors::LowerError;
use crate::intern::TypeInterner;
use crate::types::TypeId;
use phz_common::interner::Atom;
use tracing::trace;

/// A native type declaration as reported by reflection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NativeType {
    /// A builtin (`int`, `self`, ...) or a class name.
    Named(String),
    /// `?T`
    Nullable(Box<NativeType>),
    /// `A|B`
    Union(Vec<NativeType>),
    /// `A&B`
    Intersection(Vec<NativeType>),
    /// A reflection type kind with no counterpart in the algebra.
    Unsupported(String),
}

/// Lowers declarations in the context of one declaring class, if any.
pub struct TypeLowering<'a> {
    interner: &'a TypeInterner,
    declaring_class: Option<Atom>,
}

impl<'a> TypeLowering<'a> {
    pub fn new(interner: &'a TypeInterner) -> Self {
        TypeLowering {
            interner,
            declaring_class: None,
        }
    }

    /// `static` in lowered types is anchored to `class`.
    pub fn with_declaring_class(mut self, class: Atom) -> Self {
        self.declaring_class = Some(class);
        self
    }

    /// Lower a native declaration. `self`, `parent` and `static` stay
    /// late-bound placeholders.
    pub fn lower_native(&self, native: &NativeType) -> Result<TypeId, LowerError> {
        match native {
            NativeType::Named(name) => self.lower_native_name(name),
            NativeType::Nullable(inner) => {
                let inner = self.lower_native(inner)?;
                Ok(self.interner.nullable(inner))
            }
            NativeType::Union(members) => {
                let members = members
                    .iter()
                    .map(|member| self.lower_native(member))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(self.interner.union(members))
            }
            NativeType::Intersection(members) => {
                let members = members
                    .iter()
                    .map(|member| self.lower_native(member))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(self.interner.intersection(members))
            }
            NativeType::Unsupported(kind) => {
                trace!(kind = %kind, "unsupported native type");
                Err(LowerError::UnsupportedType(kind.clone()))
            }
        }
    }

    fn lower_native_name(&self, name: &str) -> Result<TypeId, LowerError> {
        let lowered = match name.to_ascii_lowercase().as_str() {
            "int" => TypeId::INT,
            "float" => TypeId::FLOAT,
            "string" => TypeId::STRING,
            "bool" => TypeId::BOOL,
            "true" => TypeId::TRUE,
            "false" => TypeId::FALSE,
            "null" => TypeId::NULL,
            "void" => TypeId::VOID,
            "never" => TypeId::NEVER,
            "mixed" => TypeId::MIXED,
            "object" => TypeId::OBJECT,
            "array" => TypeId::ARRAY,
            "iterable" => TypeId::ITERABLE,
            "callable" => TypeId::CALLABLE,
            "closure" => TypeId::CLOSURE,
            "self" => self.interner.self_type(Vec::new()),
            "parent" => self.interner.parent_type(Vec::new()),
            "static" => self.static_placeholder(Vec::new())?,
            _ => self.class_type(name, Vec::new())?,
        };
        Ok(lowered)
    }

    /// Lower a PHPDoc type name applied to `args`.
    ///
    /// Builtin names are matched case-insensitively; anything else is a
    /// class name. Argument counts are validated per name: `list<K, V>` is
    /// an [`InvalidArgumentCount`](LowerError::InvalidArgumentCount) error.
    pub fn lower_named(&self, name: &str, args: &[TypeId]) -> Result<TypeId, LowerError> {
        let interner = self.interner;
        let lowered = name.to_ascii_lowercase();
        let atom = match lowered.as_str() {
            "never" | "never-return" | "never-returns" | "no-return" => Some(TypeId::NEVER),
            "void" => Some(TypeId::VOID),
            "null" => Some(TypeId::NULL),
            "false" => Some(TypeId::FALSE),
            "true" => Some(TypeId::TRUE),
            "bool" | "boolean" => Some(TypeId::BOOL),
            "float" | "double" => Some(TypeId::FLOAT),
            "string" => Some(TypeId::STRING),
            "object" => Some(TypeId::OBJECT),
            "mixed" => Some(TypeId::MIXED),
            "scalar" => Some(TypeId::SCALAR),
            "numeric" => Some(TypeId::NUMERIC),
            "array-key" => Some(TypeId::ARRAY_KEY),
            "resource" => Some(TypeId::RESOURCE),
            "closed-resource" => Some(TypeId::CLOSED_RESOURCE),
            "literal-int" => Some(TypeId::LITERAL_INT),
            "literal-string" => Some(TypeId::LITERAL_STRING),
            "non-empty-string" => Some(TypeId::NON_EMPTY_STRING),
            "truthy-string" | "non-falsy-string" => Some(TypeId::TRUTHY_STRING),
            "numeric-string" => Some(TypeId::NUMERIC_STRING),
            "callable" => Some(TypeId::CALLABLE),
            "closure" => Some(TypeId::CLOSURE),
            "positive-int" => Some(interner.int_range(Some(1), None)),
            "negative-int" => Some(interner.int_range(None, Some(-1))),
            "non-positive-int" => Some(interner.int_range(None, Some(0))),
            "non-negative-int" => Some(interner.int_range(Some(0), None)),
            _ => None,
        };
        if let Some(atom) = atom {
            expect_args(name, args, 0, 0)?;
            return Ok(atom);
        }

        match lowered.as_str() {
            "int" | "integer" => {
                expect_args(name, args, 0, 0)?;
                Ok(TypeId::INT)
            }
            "class-string" => {
                expect_args(name, args, 0, 1)?;
                Ok(interner.class_string(args.first().copied()))
            }
            "array" | "non-empty-array" => {
                expect_args(name, args, 0, 2)?;
                let (key, value) = match *args {
                    [] => (TypeId::ARRAY_KEY, TypeId::MIXED),
                    [value] => (TypeId::ARRAY_KEY, value),
                    [key, value, ..] => (key, value),
                };
                Ok(if lowered == "array" {
                    interner.array(key, value)
                } else {
                    interner.non_empty_array(key, value)
                })
            }
            "list" | "non-empty-list" => {
                expect_args(name, args, 0, 1)?;
                let value = args.first().copied().unwrap_or(TypeId::MIXED);
                Ok(if lowered == "list" {
                    interner.list(value)
                } else {
                    interner.non_empty_list(value)
                })
            }
            "iterable" => {
                expect_args(name, args, 0, 2)?;
                Ok(match *args {
                    [] => TypeId::ITERABLE,
                    [value] => interner.iterable(TypeId::MIXED, value),
                    [key, value, ..] => interner.iterable(key, value),
                })
            }
            "key-of" => {
                expect_args(name, args, 1, 1)?;
                Ok(interner.key_of(args[0]))
            }
            "value-of" => {
                expect_args(name, args, 1, 1)?;
                Ok(interner.value_of(args[0]))
            }
            "int-mask" => {
                expect_args(name, args, 1, usize::MAX)?;
                Ok(interner.int_mask_of(args.to_vec()))
            }
            "int-mask-of" => {
                expect_args(name, args, 1, 1)?;
                Ok(interner.int_mask(args[0]))
            }
            "self" => Ok(interner.self_type(args.to_vec())),
            "parent" => Ok(interner.parent_type(args.to_vec())),
            "static" => self.static_placeholder(args.to_vec()),
            _ => self.class_type(name, args.to_vec()),
        }
    }

    fn static_placeholder(&self, args: Vec<TypeId>) -> Result<TypeId, LowerError> {
        match self.declaring_class {
            Some(class) => Ok(self.interner.static_type(class, args)),
            None => Err(LowerError::UnsupportedType("static".to_string())),
        }
    }

    fn class_type(&self, name: &str, args: Vec<TypeId>) -> Result<TypeId, LowerError> {
        let name = name.strip_prefix('\\').unwrap_or(name);
        if !is_class_name(name) {
            return Err(LowerError::UnsupportedType(name.to_string()));
        }
        if args.is_empty() && name.eq_ignore_ascii_case("closure") {
            return Ok(TypeId::CLOSURE);
        }
        Ok(self.interner.named_object(name, args))
    }
}

/// `int<min, max>` from its two bound tokens: an integer, or the keywords
/// `min` / `max` for an unbounded side.
pub fn int_range_from_tokens(
    interner: &TypeInterner,
    min: &str,
    max: &str,
) -> Result<TypeId, LowerError> {
    let min = parse_bound(min, "min")?;
    let max = parse_bound(max, "max")?;
    Ok(interner.int_range(min, max))
}

fn parse_bound(token: &str, unbounded: &str) -> Result<Option<i64>, LowerError> {
    let token = token.trim();
    if token.eq_ignore_ascii_case(unbounded) {
        return Ok(None);
    }
    token
        .parse::<i64>()
        .map(Some)
        .map_err(|_| LowerError::InvalidIntRangeBound(token.to_string()))
}

fn expect_args(name: &str, args: &[TypeId], min: usize, max: usize) -> Result<(), LowerError> {
    if (min..=max).contains(&args.len()) {
        return Ok(());
    }
    let expected = match (min, max) {
        (min, max) if min == max => min.to_string(),
        (min, usize::MAX) => format!("at least {min}"),
        (min, max) => format!("{min} to {max}"),
    };
    Err(LowerError::InvalidArgumentCount {
        name: name.to_string(),
        expected,
        found: args.len(),
    })
}

/// `Foo`, `Foo\Bar`, `_Baz1`.
fn is_class_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('\\').all(|segment| {
            let mut chars = segment.chars();
            matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
                && chars.all(|c| c.is_alphanumeric() || c == '_')
        })
}

/// The two independent sources of a declaration's type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeclaredType {
    pub native: Option<TypeId>,
    pub annotated: Option<TypeId>,
}

impl DeclaredType {
    pub fn new(native: Option<TypeId>, annotated: Option<TypeId>) -> Self {
        DeclaredType { native, annotated }
    }

    /// The annotation when present, else the native type, else `mixed`.
    pub fn resolve(&self) -> TypeId {
        self.annotated.or(self.native).unwrap_or(TypeId::MIXED)
    }
}

#[cfg(test)]
#[path = "../tests/lower_tests.rs"]
mod tests;
