//! Type representation for the PHP type algebra.
//!
//! Types are hash-consed: a [`TypeData`] value is interned once into a
//! [`TypeInterner`](crate::TypeInterner) and referred to by a [`TypeId`]. Two
//! structurally equal types always receive the same id, so `TypeId` equality
//! *is* structural equality.
//!
//! Nullary atoms (`int`, `non-empty-string`, ...) and the canonical defaults
//! (`array`, `iterable`, `callable`, `Closure`) live at reserved ids so that
//! the common cases never touch the interner tables.

use bitflags::bitflags;
use phz_common::interner::Atom;
use serde::Serialize;
use std::hash::{Hash, Hasher};

/// Handle to an interned type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const NEVER: TypeId = TypeId(0);
    pub const VOID: TypeId = TypeId(1);
    pub const NULL: TypeId = TypeId(2);
    pub const FALSE: TypeId = TypeId(3);
    pub const TRUE: TypeId = TypeId(4);
    pub const BOOL: TypeId = TypeId(5);
    pub const INT: TypeId = TypeId(6);
    pub const FLOAT: TypeId = TypeId(7);
    pub const STRING: TypeId = TypeId(8);
    pub const OBJECT: TypeId = TypeId(9);
    pub const MIXED: TypeId = TypeId(10);
    pub const SCALAR: TypeId = TypeId(11);
    pub const NUMERIC: TypeId = TypeId(12);
    pub const ARRAY_KEY: TypeId = TypeId(13);
    pub const RESOURCE: TypeId = TypeId(14);
    pub const CLOSED_RESOURCE: TypeId = TypeId(15);
    pub const LITERAL_INT: TypeId = TypeId(16);
    pub const LITERAL_STRING: TypeId = TypeId(17);
    pub const NON_EMPTY_STRING: TypeId = TypeId(18);
    pub const TRUTHY_STRING: TypeId = TypeId(19);
    pub const NUMERIC_STRING: TypeId = TypeId(20);
    pub const CLASS_STRING: TypeId = TypeId(21);

    /// `array<array-key, mixed>`
    pub const ARRAY: TypeId = TypeId(22);
    /// `iterable<mixed, mixed>`
    pub const ITERABLE: TypeId = TypeId(23);
    /// `callable` with an unconstrained signature.
    pub const CALLABLE: TypeId = TypeId(24);
    /// `Closure` with an unconstrained signature.
    pub const CLOSURE: TypeId = TypeId(25);

    /// First id handed out to interned (non-reserved) types.
    pub const FIRST_USER: u32 = 32;

    /// Last reserved atom id (inclusive).
    const LAST_ATOM: u32 = 21;

    /// Returns true for the nullary atoms (`never` .. `class-string`).
    #[inline]
    pub const fn is_atom(self) -> bool {
        self.0 <= Self::LAST_ATOM
    }

    /// Returns true for any id below [`TypeId::FIRST_USER`].
    #[inline]
    pub const fn is_reserved(self) -> bool {
        self.0 < Self::FIRST_USER
    }
}

/// The nullary atoms of the algebra.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum IntrinsicKind {
    Never,
    Void,
    Null,
    False,
    True,
    Bool,
    Int,
    Float,
    String,
    Object,
    Mixed,
    Scalar,
    Numeric,
    ArrayKey,
    Resource,
    ClosedResource,
    LiteralInt,
    LiteralString,
    NonEmptyString,
    TruthyString,
    NumericString,
    ClassString,
}

impl IntrinsicKind {
    pub const ALL: [IntrinsicKind; 22] = [
        IntrinsicKind::Never,
        IntrinsicKind::Void,
        IntrinsicKind::Null,
        IntrinsicKind::False,
        IntrinsicKind::True,
        IntrinsicKind::Bool,
        IntrinsicKind::Int,
        IntrinsicKind::Float,
        IntrinsicKind::String,
        IntrinsicKind::Object,
        IntrinsicKind::Mixed,
        IntrinsicKind::Scalar,
        IntrinsicKind::Numeric,
        IntrinsicKind::ArrayKey,
        IntrinsicKind::Resource,
        IntrinsicKind::ClosedResource,
        IntrinsicKind::LiteralInt,
        IntrinsicKind::LiteralString,
        IntrinsicKind::NonEmptyString,
        IntrinsicKind::TruthyString,
        IntrinsicKind::NumericString,
        IntrinsicKind::ClassString,
    ];

    /// The reserved id of this atom. Declaration order matches the id order.
    #[inline]
    pub const fn to_type_id(self) -> TypeId {
        TypeId(self as u32)
    }

    /// Inverse of [`to_type_id`](Self::to_type_id).
    pub fn from_type_id(id: TypeId) -> Option<IntrinsicKind> {
        if id.is_atom() {
            Some(Self::ALL[id.0 as usize])
        } else {
            None
        }
    }

    /// PHPDoc spelling of the atom.
    pub const fn name(self) -> &'static str {
        match self {
            IntrinsicKind::Never => "never",
            IntrinsicKind::Void => "void",
            IntrinsicKind::Null => "null",
            IntrinsicKind::False => "false",
            IntrinsicKind::True => "true",
            IntrinsicKind::Bool => "bool",
            IntrinsicKind::Int => "int",
            IntrinsicKind::Float => "float",
            IntrinsicKind::String => "string",
            IntrinsicKind::Object => "object",
            IntrinsicKind::Mixed => "mixed",
            IntrinsicKind::Scalar => "scalar",
            IntrinsicKind::Numeric => "numeric",
            IntrinsicKind::ArrayKey => "array-key",
            IntrinsicKind::Resource => "resource",
            IntrinsicKind::ClosedResource => "closed-resource",
            IntrinsicKind::LiteralInt => "literal-int",
            IntrinsicKind::LiteralString => "literal-string",
            IntrinsicKind::NonEmptyString => "non-empty-string",
            IntrinsicKind::TruthyString => "truthy-string",
            IntrinsicKind::NumericString => "numeric-string",
            IntrinsicKind::ClassString => "class-string",
        }
    }
}

/// Float wrapper with bitwise equality so literal floats can be interned.
///
/// `-0.0` is folded into `0.0` and every NaN into a single canonical NaN at
/// construction time.
#[derive(Clone, Copy, Debug)]
pub struct OrderedFloat(pub f64);

impl OrderedFloat {
    pub fn new(value: f64) -> Self {
        if value == 0.0 {
            OrderedFloat(0.0)
        } else if value.is_nan() {
            OrderedFloat(f64::NAN)
        } else {
            OrderedFloat(value)
        }
    }
}

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for OrderedFloat {}

impl Hash for OrderedFloat {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

/// A concrete scalar carried by a literal type.
///
/// Boolean literals are not represented here: `true` and `false` are atoms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LiteralValue {
    Int(i64),
    Float(OrderedFloat),
    String(Atom),
}

/// Input accepted by `TypeInterner::literal_value`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scalar<'a> {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(&'a str),
}

impl From<bool> for Scalar<'_> {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i64> for Scalar<'_> {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<f64> for Scalar<'_> {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl<'a> From<&'a str> for Scalar<'a> {
    fn from(value: &'a str) -> Self {
        Scalar::String(value)
    }
}

/// Key of an array-shape element.
///
/// Decimal integer strings are normalized to [`ArrayKey::Int`], as PHP does
/// for array keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArrayKey {
    Int(i64),
    String(Atom),
}

/// One element of an array shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ShapeElement {
    pub key: ArrayKey,
    pub type_id: TypeId,
    pub optional: bool,
}

/// Array / list / array-shape family.
///
/// - `array<K, V>`: no elements, unsealed, catch-all `key`/`value`.
/// - `list<V>`: `list = true`, `key = int`.
/// - `array{a: int, b?: string}`: elements in declaration order, `sealed`.
///   Sealed shapes store `never` as their catch-all key and value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ArrayShape {
    pub key: TypeId,
    pub value: TypeId,
    pub elements: Vec<ShapeElement>,
    pub sealed: bool,
    pub list: bool,
    pub non_empty: bool,
}

impl ArrayShape {
    /// `array<array-key, mixed>`
    pub fn default_array() -> Self {
        ArrayShape {
            key: TypeId::ARRAY_KEY,
            value: TypeId::MIXED,
            elements: Vec::new(),
            sealed: false,
            list: false,
            non_empty: false,
        }
    }

    /// Look up an element by key value (not by position).
    pub fn element(&self, key: ArrayKey) -> Option<&ShapeElement> {
        self.elements.iter().find(|element| element.key == key)
    }

    /// True when the shape guarantees at least one entry.
    pub fn is_guaranteed_non_empty(&self) -> bool {
        self.non_empty || self.elements.iter().any(|element| !element.optional)
    }

    /// True when the element keys are exactly `0..n` in any declaration order.
    ///
    /// Optional elements must form a suffix: `list{int, 1?: string}` is a
    /// list, `list{0?: int, 1: string}` is not.
    pub fn has_sequential_keys(&self) -> bool {
        let count = self.elements.len();
        let mut seen = vec![None; count];
        for element in &self.elements {
            let ArrayKey::Int(index) = element.key else {
                return false;
            };
            if index < 0 || index as usize >= count {
                return false;
            }
            seen[index as usize] = Some(element.optional);
        }

        let mut optional_started = false;
        for slot in seen {
            match slot {
                None => return false,
                Some(true) => optional_started = true,
                Some(false) if optional_started => return false,
                Some(false) => {}
            }
        }
        true
    }
}

/// One property of an object shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectProperty {
    pub name: Atom,
    pub type_id: TypeId,
    pub optional: bool,
}

/// `object{name: string, age?: int}`
///
/// Properties are kept sorted by name so that the mapping is unordered for
/// equality purposes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct ObjectShape {
    pub properties: Vec<ObjectProperty>,
}

impl ObjectShape {
    pub fn property(&self, name: Atom) -> Option<&ObjectProperty> {
        self.properties.iter().find(|prop| prop.name == name)
    }
}

bitflags! {
    /// Modifiers of a callable parameter.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ParamFlags: u8 {
        const HAS_DEFAULT = 1 << 0;
        const VARIADIC = 1 << 1;
        const BY_REFERENCE = 1 << 2;
    }
}

/// A callable or closure parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Param {
    pub type_id: TypeId,
    pub flags: ParamFlags,
    pub name: Option<Atom>,
}

impl Param {
    pub fn new(type_id: TypeId) -> Self {
        Param {
            type_id,
            flags: ParamFlags::empty(),
            name: None,
        }
    }

    pub fn named(name: Atom, type_id: TypeId) -> Self {
        Param {
            type_id,
            flags: ParamFlags::empty(),
            name: Some(name),
        }
    }

    pub fn with_default(mut self) -> Self {
        self.flags |= ParamFlags::HAS_DEFAULT;
        self
    }

    pub fn variadic(mut self) -> Self {
        self.flags |= ParamFlags::VARIADIC;
        self
    }

    pub fn by_reference(mut self) -> Self {
        self.flags |= ParamFlags::BY_REFERENCE;
        self
    }

    #[inline]
    pub fn has_default(&self) -> bool {
        self.flags.contains(ParamFlags::HAS_DEFAULT)
    }

    #[inline]
    pub fn is_variadic(&self) -> bool {
        self.flags.contains(ParamFlags::VARIADIC)
    }

    #[inline]
    pub fn is_by_reference(&self) -> bool {
        self.flags.contains(ParamFlags::BY_REFERENCE)
    }

    /// A call may omit this argument.
    #[inline]
    pub fn is_optional(&self) -> bool {
        self.has_default() || self.is_variadic()
    }
}

/// Signature shared by `callable(...)` and `Closure(...)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CallableShape {
    pub params: Vec<Param>,
    pub return_type: TypeId,
}

impl CallableShape {
    /// The unconstrained signature of bare `callable` / `Closure`.
    pub fn unconstrained() -> Self {
        CallableShape {
            params: Vec::new(),
            return_type: TypeId::MIXED,
        }
    }
}

/// Declaration site of a template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TemplateAnchor {
    AtClass(Atom),
    AtMethod { class: Atom, method: Atom },
    AtFunction(Atom),
}

/// A free type variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TemplateInfo {
    pub name: Atom,
    pub anchor: TemplateAnchor,
    pub args: TypeListId,
}

/// Left-hand side of a conditional type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConditionalSubject {
    /// `$param is ...`
    Argument(Atom),
    /// `T is ...`
    Type(TypeId),
}

/// `subject is if_type ? then_type : else_type`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConditionalType {
    pub subject: ConditionalSubject,
    pub if_type: TypeId,
    pub then_type: TypeId,
    pub else_type: TypeId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeListId(pub u32);

impl TypeListId {
    pub const EMPTY: TypeListId = TypeListId(0);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArrayShapeId(pub u32);

impl ArrayShapeId {
    /// Pre-interned `array<array-key, mixed>`.
    pub const DEFAULT: ArrayShapeId = ArrayShapeId(0);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectShapeId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallableShapeId(pub u32);

impl CallableShapeId {
    /// Pre-interned unconstrained signature.
    pub const DEFAULT: CallableShapeId = CallableShapeId(0);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConditionalTypeId(pub u32);

/// Structural key of an interned type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    /// Nullary atoms (`int`, `non-empty-string`, `mixed`, ...).
    Intrinsic(IntrinsicKind),
    /// Exactly one int, float or string value.
    Literal(LiteralValue),
    /// `int<min, max>`; `None` is unbounded on that side.
    IntRange { min: Option<i64>, max: Option<i64> },
    /// `int-mask<...>`: bitwise ORs of the literal ints of the inner type.
    IntMask(TypeId),
    /// `class-string<T>`
    ClassString(TypeId),
    /// `array`, `list`, `non-empty-array`, `array{...}`, `list{...}`
    Array(ArrayShapeId),
    /// `iterable<K, V>`
    Iterable { key: TypeId, value: TypeId },
    /// `Foo<A, B>`
    NamedObject { class: Atom, args: TypeListId },
    /// `static` anchored at `class`.
    Static { class: Atom, args: TypeListId },
    /// `self`, unresolved.
    SelfRef(TypeListId),
    /// `parent`, unresolved.
    ParentRef(TypeListId),
    /// `object{...}`
    ObjectShape(ObjectShapeId),
    /// `callable(...): R`
    Callable(CallableShapeId),
    /// `Closure(...): R`
    Closure(CallableShapeId),
    /// Global constant reference, e.g. `PHP_INT_MAX`.
    Constant(Atom),
    /// `Foo::BAR` or `Foo::BAR_*` style class constant reference.
    ClassConstant { class: TypeId, name: Atom },
    /// `key-of<T>`
    KeyOf(TypeId),
    /// `value-of<T>`
    ValueOf(TypeId),
    /// Template type variable.
    Template(TemplateInfo),
    /// `(T is X ? Y : Z)`
    Conditional(ConditionalTypeId),
    /// `A|B|...`, at least two members.
    Union(TypeListId),
    /// `A&B&...`, at least two members.
    Intersection(TypeListId),
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
