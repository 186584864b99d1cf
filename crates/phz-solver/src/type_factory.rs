//! Normalizing constructors.
//!
//! One named constructor per variant. Every constructor returns the
//! canonical form of the type it builds, and the subtype engine relies on
//! that: `union([x])` is `x`, `int_range(5, 5)` is the literal `5`,
//! `array(array-key, mixed)` is [`TypeId::ARRAY`], and so on.

use crate::intern::TypeInterner;
use crate::types::{
    ArrayKey, ArrayShape, CallableShape, CallableShapeId, ConditionalSubject,
    ConditionalType, IntrinsicKind, LiteralValue, ObjectProperty, ObjectShape, OrderedFloat, Param,
    Scalar, ShapeElement, TemplateAnchor, TemplateInfo, TypeData, TypeId,
};
use indexmap::IndexMap;
use phz_common::interner::Atom;
use phz_common::limits::TYPE_LIST_INLINE;
use rustc_hash::{FxBuildHasher, FxHashSet};
use smallvec::SmallVec;

/// One entry of an array-shape literal as written by the user.
///
/// A `None` key takes the next free integer key, the same way PHP assigns
/// keys in `[$a, 'k' => $b, $c]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShapeField {
    pub key: Option<ArrayKey>,
    pub type_id: TypeId,
    pub optional: bool,
}

impl ShapeField {
    pub fn positional(type_id: TypeId) -> Self {
        ShapeField {
            key: None,
            type_id,
            optional: false,
        }
    }

    pub fn keyed(key: ArrayKey, type_id: TypeId) -> Self {
        ShapeField {
            key: Some(key),
            type_id,
            optional: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

impl TypeInterner {
    // =========================================================================
    // Atoms and literals
    // =========================================================================

    #[inline]
    pub fn intrinsic(&self, kind: IntrinsicKind) -> TypeId {
        kind.to_type_id()
    }

    /// The type containing exactly `value`. Booleans map to the `true` and
    /// `false` atoms.
    pub fn literal_value<'s>(&self, value: impl Into<Scalar<'s>>) -> TypeId {
        match value.into() {
            Scalar::Bool(true) => TypeId::TRUE,
            Scalar::Bool(false) => TypeId::FALSE,
            Scalar::Int(value) => self.literal_int(value),
            Scalar::Float(value) => self.literal_float(value),
            Scalar::String(value) => self.literal_string(value),
        }
    }

    pub fn literal_int(&self, value: i64) -> TypeId {
        self.intern(TypeData::Literal(LiteralValue::Int(value)))
    }

    pub fn literal_float(&self, value: f64) -> TypeId {
        self.intern(TypeData::Literal(LiteralValue::Float(OrderedFloat::new(
            value,
        ))))
    }

    pub fn literal_string(&self, value: &str) -> TypeId {
        let atom = self.intern_string(value);
        self.literal_string_atom(atom)
    }

    pub fn literal_string_atom(&self, atom: Atom) -> TypeId {
        self.intern(TypeData::Literal(LiteralValue::String(atom)))
    }

    /// `int<min, max>`, with `None` meaning unbounded on that side.
    pub fn int_range(&self, min: Option<i64>, max: Option<i64>) -> TypeId {
        match (min, max) {
            (None, None) => TypeId::INT,
            (Some(min), Some(max)) if min == max => self.literal_int(min),
            (Some(min), Some(max)) if min > max => TypeId::NEVER,
            _ => self.intern(TypeData::IntRange { min, max }),
        }
    }

    /// `int-mask<...>` over the literal ints of `inner`.
    pub fn int_mask(&self, inner: TypeId) -> TypeId {
        self.intern(TypeData::IntMask(inner))
    }

    /// `int-mask<1, 2, 4>`
    pub fn int_mask_of(&self, members: Vec<TypeId>) -> TypeId {
        let inner = self.union(members);
        self.int_mask(inner)
    }

    /// `class-string<T>`. Without an argument, or with `object`, this is the
    /// bare `class-string` atom.
    pub fn class_string(&self, object: Option<TypeId>) -> TypeId {
        match object {
            None | Some(TypeId::OBJECT) => TypeId::CLASS_STRING,
            Some(object) => self.intern(TypeData::ClassString(object)),
        }
    }

    // =========================================================================
    // Arrays
    // =========================================================================

    /// Intern an array structure, returning [`TypeId::ARRAY`] for the default.
    ///
    /// A list whose element keys are not `0..n` is kept as an array shape.
    pub fn array_from_shape(&self, mut shape: ArrayShape) -> TypeId {
        if shape.list && !shape.has_sequential_keys() {
            shape.list = false;
        }
        if shape.sealed {
            shape.key = TypeId::NEVER;
            shape.value = TypeId::NEVER;
        }
        if shape == ArrayShape::default_array() {
            return TypeId::ARRAY;
        }
        let id = self.intern_array_shape(shape);
        self.intern(TypeData::Array(id))
    }

    /// `array<K, V>`
    pub fn array(&self, key: TypeId, value: TypeId) -> TypeId {
        self.array_from_shape(ArrayShape {
            key,
            value,
            ..ArrayShape::default_array()
        })
    }

    /// `non-empty-array<K, V>`
    pub fn non_empty_array(&self, key: TypeId, value: TypeId) -> TypeId {
        self.array_from_shape(ArrayShape {
            key,
            value,
            non_empty: true,
            ..ArrayShape::default_array()
        })
    }

    /// `list<V>`
    pub fn list(&self, value: TypeId) -> TypeId {
        self.array_from_shape(ArrayShape {
            key: TypeId::INT,
            value,
            elements: Vec::new(),
            sealed: false,
            list: true,
            non_empty: false,
        })
    }

    /// `non-empty-list<V>`
    pub fn non_empty_list(&self, value: TypeId) -> TypeId {
        self.array_from_shape(ArrayShape {
            key: TypeId::INT,
            value,
            elements: Vec::new(),
            sealed: false,
            list: true,
            non_empty: true,
        })
    }

    /// Sealed `array{...}`.
    pub fn array_shape_type(&self, fields: Vec<ShapeField>) -> TypeId {
        let elements = self.shape_elements(fields);
        self.array_from_shape(ArrayShape {
            key: TypeId::NEVER,
            value: TypeId::NEVER,
            elements,
            sealed: true,
            list: false,
            non_empty: false,
        })
    }

    /// `array{..., ...<K, V>}`: known elements plus extra entries of `K => V`.
    pub fn array_shape_unsealed(
        &self,
        fields: Vec<ShapeField>,
        key: TypeId,
        value: TypeId,
    ) -> TypeId {
        let elements = self.shape_elements(fields);
        self.array_from_shape(ArrayShape {
            key,
            value,
            elements,
            sealed: false,
            list: false,
            non_empty: false,
        })
    }

    /// Sealed `list{...}`.
    pub fn list_shape(&self, fields: Vec<ShapeField>) -> TypeId {
        let elements = self.shape_elements(fields);
        self.array_from_shape(ArrayShape {
            key: TypeId::NEVER,
            value: TypeId::NEVER,
            elements,
            sealed: true,
            list: true,
            non_empty: false,
        })
    }

    /// `list{..., ...<V>}`
    pub fn list_shape_unsealed(&self, fields: Vec<ShapeField>, value: TypeId) -> TypeId {
        let elements = self.shape_elements(fields);
        self.array_from_shape(ArrayShape {
            key: TypeId::INT,
            value,
            elements,
            sealed: false,
            list: true,
            non_empty: false,
        })
    }

    /// Normalize a user-written shape key: decimal integer strings become
    /// integer keys.
    pub fn array_key(&self, key: &str) -> ArrayKey {
        match parse_int_key(key) {
            Some(value) => ArrayKey::Int(value),
            None => ArrayKey::String(self.intern_string(key)),
        }
    }

    /// The literal type of a shape key.
    pub fn array_key_type(&self, key: ArrayKey) -> TypeId {
        match key {
            ArrayKey::Int(value) => self.literal_int(value),
            ArrayKey::String(atom) => self.literal_string_atom(atom),
        }
    }

    fn shape_elements(&self, fields: Vec<ShapeField>) -> Vec<ShapeElement> {
        let mut next_key: i64 = 0;
        let mut elements: IndexMap<ArrayKey, ShapeElement, FxBuildHasher> =
            IndexMap::with_capacity_and_hasher(fields.len(), FxBuildHasher);

        for field in fields {
            let key = match field.key {
                Some(key) => key,
                None => ArrayKey::Int(next_key),
            };
            if let ArrayKey::Int(index) = key {
                next_key = next_key.max(index.saturating_add(1));
            }
            // Later duplicates win but keep the first position.
            elements.insert(
                key,
                ShapeElement {
                    key,
                    type_id: field.type_id,
                    optional: field.optional,
                },
            );
        }
        elements.into_values().collect()
    }

    // =========================================================================
    // Objects, iterables and callables
    // =========================================================================

    /// `iterable<K, V>`
    pub fn iterable(&self, key: TypeId, value: TypeId) -> TypeId {
        self.intern(TypeData::Iterable { key, value })
    }

    /// `Foo<A, B>`
    pub fn named_object(&self, class: &str, args: Vec<TypeId>) -> TypeId {
        let class = self.intern_string(class);
        self.named_object_atom(class, args)
    }

    pub fn named_object_atom(&self, class: Atom, args: Vec<TypeId>) -> TypeId {
        let args = self.intern_type_list(&args);
        self.intern(TypeData::NamedObject { class, args })
    }

    /// `static` bound late to `class`.
    pub fn static_type(&self, class: Atom, args: Vec<TypeId>) -> TypeId {
        let args = self.intern_type_list(&args);
        self.intern(TypeData::Static { class, args })
    }

    pub fn self_type(&self, args: Vec<TypeId>) -> TypeId {
        let args = self.intern_type_list(&args);
        self.intern(TypeData::SelfRef(args))
    }

    pub fn parent_type(&self, args: Vec<TypeId>) -> TypeId {
        let args = self.intern_type_list(&args);
        self.intern(TypeData::ParentRef(args))
    }

    /// `object{...}`. Duplicate names keep the last declaration.
    pub fn object_shape_type(&self, mut properties: Vec<ObjectProperty>) -> TypeId {
        properties.reverse();
        let mut seen = FxHashSet::default();
        properties.retain(|prop| seen.insert(prop.name));
        properties.sort_by_key(|prop| prop.name);
        let shape = self.intern_object_shape(ObjectShape { properties });
        self.intern(TypeData::ObjectShape(shape))
    }

    /// `callable(...): R`. An empty parameter list with a `mixed` return is
    /// the unconstrained [`TypeId::CALLABLE`].
    pub fn callable(&self, params: Vec<Param>, return_type: TypeId) -> TypeId {
        let shape = self.signature(params, return_type);
        self.intern(TypeData::Callable(shape))
    }

    /// `Closure(...): R`, normalized like [`callable`](Self::callable).
    pub fn closure(&self, params: Vec<Param>, return_type: TypeId) -> TypeId {
        let shape = self.signature(params, return_type);
        self.intern(TypeData::Closure(shape))
    }

    fn signature(&self, params: Vec<Param>, return_type: TypeId) -> CallableShapeId {
        if params.is_empty() && return_type == TypeId::MIXED {
            return CallableShapeId::DEFAULT;
        }
        self.intern_callable_shape(CallableShape {
            params,
            return_type,
        })
    }

    // =========================================================================
    // Symbolic references
    // =========================================================================

    pub fn constant(&self, name: &str) -> TypeId {
        let name = self.intern_string(name);
        self.intern(TypeData::Constant(name))
    }

    /// `Foo::BAR`; `class` is usually a named object.
    pub fn class_constant(&self, class: TypeId, name: &str) -> TypeId {
        let name = self.intern_string(name);
        self.class_constant_atom(class, name)
    }

    pub fn class_constant_atom(&self, class: TypeId, name: Atom) -> TypeId {
        self.intern(TypeData::ClassConstant { class, name })
    }

    pub fn key_of(&self, inner: TypeId) -> TypeId {
        self.intern(TypeData::KeyOf(inner))
    }

    pub fn value_of(&self, inner: TypeId) -> TypeId {
        self.intern(TypeData::ValueOf(inner))
    }

    pub fn template(&self, name: Atom, anchor: TemplateAnchor, args: Vec<TypeId>) -> TypeId {
        let args = self.intern_type_list(&args);
        self.intern(TypeData::Template(TemplateInfo { name, anchor, args }))
    }

    /// Template `name` declared on class `class`, without arguments.
    pub fn class_template(&self, name: &str, class: &str) -> TypeId {
        let name = self.intern_string(name);
        let class = self.intern_string(class);
        self.template(name, TemplateAnchor::AtClass(class), Vec::new())
    }

    pub fn conditional(
        &self,
        subject: ConditionalSubject,
        if_type: TypeId,
        then_type: TypeId,
        else_type: TypeId,
    ) -> TypeId {
        let id = self.intern_conditional(ConditionalType {
            subject,
            if_type,
            then_type,
            else_type,
        });
        self.intern(TypeData::Conditional(id))
    }

    // =========================================================================
    // Unions and intersections
    // =========================================================================

    /// `A|B|...`
    ///
    /// Nested unions are flattened, duplicates and `never` dropped, and a
    /// `mixed` member absorbs everything. Zero members is `never`, one member
    /// is that member.
    pub fn union(&self, members: Vec<TypeId>) -> TypeId {
        let mut flat: SmallVec<[TypeId; TYPE_LIST_INLINE]> = SmallVec::new();
        let mut seen = FxHashSet::default();
        for member in members {
            if member == TypeId::MIXED {
                return TypeId::MIXED;
            }
            if member == TypeId::NEVER {
                continue;
            }
            if let Some(TypeData::Union(list)) = self.lookup(member) {
                for &inner in self.type_list(list).iter() {
                    if seen.insert(inner) {
                        flat.push(inner);
                    }
                }
            } else if seen.insert(member) {
                flat.push(member);
            }
        }

        match flat.len() {
            0 => TypeId::NEVER,
            1 => flat[0],
            _ => self.union_raw(&flat),
        }
    }

    /// `A&B&...`
    ///
    /// Nested intersections are flattened and duplicates dropped; `never`
    /// absorbs everything and `mixed` members are dropped unless nothing else
    /// remains.
    pub fn intersection(&self, members: Vec<TypeId>) -> TypeId {
        let mut flat: SmallVec<[TypeId; TYPE_LIST_INLINE]> = SmallVec::new();
        let mut seen = FxHashSet::default();
        let mut had_mixed = false;
        for member in members {
            if member == TypeId::NEVER {
                return TypeId::NEVER;
            }
            if member == TypeId::MIXED {
                had_mixed = true;
                continue;
            }
            if let Some(TypeData::Intersection(list)) = self.lookup(member) {
                for &inner in self.type_list(list).iter() {
                    if seen.insert(inner) {
                        flat.push(inner);
                    }
                }
            } else if seen.insert(member) {
                flat.push(member);
            }
        }

        match flat.len() {
            0 if had_mixed => TypeId::MIXED,
            0 => TypeId::NEVER,
            1 => flat[0],
            _ => self.intersection_raw(&flat),
        }
    }

    /// Intern a union as given.
    ///
    /// # Panics
    ///
    /// Panics when fewer than two members are supplied; use
    /// [`union`](Self::union) for arbitrary input.
    pub fn union_raw(&self, members: &[TypeId]) -> TypeId {
        assert!(
            members.len() >= 2,
            "union requires at least two members, got {}",
            members.len()
        );
        let list = self.intern_type_list(members);
        self.intern(TypeData::Union(list))
    }

    /// Intern an intersection as given.
    ///
    /// # Panics
    ///
    /// Panics when fewer than two members are supplied.
    pub fn intersection_raw(&self, members: &[TypeId]) -> TypeId {
        assert!(
            members.len() >= 2,
            "intersection requires at least two members, got {}",
            members.len()
        );
        let list = self.intern_type_list(members);
        self.intern(TypeData::Intersection(list))
    }

    /// `?T`, i.e. `null|T`.
    pub fn nullable(&self, type_id: TypeId) -> TypeId {
        self.union(vec![TypeId::NULL, type_id])
    }

    /// Strengthen `type_id` to its non-empty counterpart.
    ///
    /// Arrays and lists get the non-empty flag, `string` becomes
    /// `non-empty-string`, unions are mapped member-wise. Anything else is
    /// returned unchanged.
    pub fn non_empty(&self, type_id: TypeId) -> TypeId {
        if type_id == TypeId::STRING {
            return TypeId::NON_EMPTY_STRING;
        }
        match self.lookup(type_id) {
            Some(TypeData::Array(shape_id)) => {
                let shape = self.array_shape(shape_id);
                if shape.non_empty {
                    return type_id;
                }
                let mut shape = ArrayShape::clone(&shape);
                shape.non_empty = true;
                self.array_from_shape(shape)
            }
            Some(TypeData::Union(list)) => {
                let members = self.type_list(list);
                let mapped = members.iter().map(|&member| self.non_empty(member)).collect();
                self.union(mapped)
            }
            _ => type_id,
        }
    }
}

/// Parse a PHP array key the way PHP casts string keys: canonical decimal
/// integers only (`"1"`, `"-5"`, not `"01"`, `"+1"`, `"-0"` or `"1.0"`).
fn parse_int_key(key: &str) -> Option<i64> {
    let digits = key.strip_prefix('-').unwrap_or(key);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    if key == "-0" {
        return None;
    }
    key.parse().ok()
}

#[cfg(test)]
#[path = "../tests/type_factory_tests.rs"]
mod tests;
