//! Type interning for structural deduplication.
//!
//! The interner converts [`TypeData`] structures into lightweight [`TypeId`]
//! handles. Benefits:
//! - O(1) type equality (just compare `TypeId` values)
//! - Memory efficient (each unique structure stored once)
//! - Cache-friendly (work with u32 arrays instead of heap objects)
//!
//! # Concurrency
//!
//! Type tables are split into 64 shards, each behind its own `RwLock`, so
//! independent callers constructing types concurrently rarely contend. Lists
//! and shapes live in their own interners with the same locking discipline.
//! Nothing is ever removed: an interned id stays valid for the lifetime of
//! the interner.

use crate::types::{
    ArrayShape, ArrayShapeId, CallableShape, CallableShapeId, ConditionalType, ConditionalTypeId,
    IntrinsicKind, ObjectShape, ObjectShapeId, TypeData, TypeId, TypeListId,
};
use phz_common::interner::{Atom, ShardedInterner};
use rustc_hash::{FxHashMap, FxHasher};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

const SHARD_BITS: u32 = 6;
const SHARD_COUNT: usize = 1 << SHARD_BITS;
const SHARD_MASK: u32 = (SHARD_COUNT as u32) - 1;

// Interned data is append-only, so a panic while a lock was held can never
// leave a table half-updated. Recover the guard instead of propagating.
fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
struct TypeShardState {
    key_to_index: FxHashMap<TypeData, u32>,
    index_to_key: Vec<TypeData>,
}

struct TypeShard {
    state: RwLock<TypeShardState>,
}

impl TypeShard {
    fn new() -> Self {
        TypeShard {
            state: RwLock::new(TypeShardState::default()),
        }
    }
}

struct SliceInternerState<T> {
    map: FxHashMap<Arc<[T]>, u32>,
    items: Vec<Arc<[T]>>,
}

/// Interns slices of `Copy` values. Index 0 is always the empty slice.
struct SliceInterner<T> {
    state: RwLock<SliceInternerState<T>>,
}

impl<T: Copy + Eq + Hash> SliceInterner<T> {
    fn new() -> Self {
        let empty: Arc<[T]> = Arc::from(Vec::new());
        let mut map = FxHashMap::default();
        map.insert(Arc::clone(&empty), 0);
        SliceInterner {
            state: RwLock::new(SliceInternerState {
                map,
                items: vec![empty],
            }),
        }
    }

    fn intern(&self, items: &[T]) -> u32 {
        if items.is_empty() {
            return 0;
        }
        if let Some(&id) = read_lock(&self.state).map.get(items) {
            return id;
        }

        let mut state = write_lock(&self.state);
        if let Some(&id) = state.map.get(items) {
            return id;
        }
        let id = state.items.len() as u32;
        let stored: Arc<[T]> = Arc::from(items);
        state.items.push(Arc::clone(&stored));
        state.map.insert(stored, id);
        id
    }

    fn get(&self, id: u32) -> Arc<[T]> {
        let state = read_lock(&self.state);
        state
            .items
            .get(id as usize)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&state.items[0]))
    }
}

struct ValueInternerState<T> {
    map: FxHashMap<Arc<T>, u32>,
    items: Vec<Arc<T>>,
}

/// Interns whole values (shapes, signatures). Index 0 holds the value the
/// interner was seeded with.
struct ValueInterner<T> {
    state: RwLock<ValueInternerState<T>>,
}

impl<T: Eq + Hash> ValueInterner<T> {
    fn with_first(first: T) -> Self {
        let first = Arc::new(first);
        let mut map = FxHashMap::default();
        map.insert(Arc::clone(&first), 0);
        ValueInterner {
            state: RwLock::new(ValueInternerState {
                map,
                items: vec![first],
            }),
        }
    }

    fn intern(&self, value: T) -> u32 {
        if let Some(&id) = read_lock(&self.state).map.get(&value) {
            return id;
        }

        let mut state = write_lock(&self.state);
        if let Some(&id) = state.map.get(&value) {
            return id;
        }
        let id = state.items.len() as u32;
        let stored = Arc::new(value);
        state.items.push(Arc::clone(&stored));
        state.map.insert(stored, id);
        id
    }

    fn get(&self, id: u32) -> Arc<T> {
        let state = read_lock(&self.state);
        state
            .items
            .get(id as usize)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&state.items[0]))
    }
}

/// Sharded, thread-safe type interner.
///
/// Constructors that normalize their input (the factory API) live in
/// `type_factory.rs`; this module only deals with storage and lookup.
pub struct TypeInterner {
    shards: Vec<TypeShard>,
    type_lists: SliceInterner<TypeId>,
    array_shapes: ValueInterner<ArrayShape>,
    object_shapes: ValueInterner<ObjectShape>,
    callable_shapes: ValueInterner<CallableShape>,
    conditional_types: ValueInterner<ConditionalType>,
    pub(crate) strings: ShardedInterner,
}

impl std::fmt::Debug for TypeInterner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeInterner")
            .field("types", &self.len())
            .finish_non_exhaustive()
    }
}

impl TypeInterner {
    pub fn new() -> Self {
        let strings = ShardedInterner::new();
        strings.intern_common();

        TypeInterner {
            shards: (0..SHARD_COUNT).map(|_| TypeShard::new()).collect(),
            type_lists: SliceInterner::new(),
            array_shapes: ValueInterner::with_first(ArrayShape::default_array()),
            object_shapes: ValueInterner::with_first(ObjectShape::default()),
            callable_shapes: ValueInterner::with_first(CallableShape::unconstrained()),
            conditional_types: ValueInterner::with_first(ConditionalType {
                subject: crate::types::ConditionalSubject::Type(TypeId::NEVER),
                if_type: TypeId::NEVER,
                then_type: TypeId::NEVER,
                else_type: TypeId::NEVER,
            }),
            strings,
        }
    }

    // =========================================================================
    // Strings
    // =========================================================================

    #[inline]
    pub fn intern_string(&self, s: &str) -> Atom {
        self.strings.intern(s)
    }

    #[inline]
    pub fn resolve_atom(&self, atom: Atom) -> String {
        self.strings.resolve(atom).to_string()
    }

    #[inline]
    pub fn resolve_atom_ref(&self, atom: Atom) -> Arc<str> {
        self.strings.resolve(atom)
    }

    // =========================================================================
    // Types
    // =========================================================================

    /// Intern a structural key without normalization.
    ///
    /// Reserved structures (atoms and the canonical defaults) map back to
    /// their reserved ids, so the fast identity path stays valid no matter
    /// how a type was built.
    pub fn intern(&self, key: TypeData) -> TypeId {
        if let Some(id) = get_reserved_id(&key) {
            return id;
        }

        let shard_idx = Self::shard_for(&key);
        let shard = &self.shards[shard_idx];

        if let Some(&local) = read_lock(&shard.state).key_to_index.get(&key) {
            return Self::make_id(local, shard_idx as u32);
        }

        let mut state = write_lock(&shard.state);
        if let Some(&local) = state.key_to_index.get(&key) {
            return Self::make_id(local, shard_idx as u32);
        }
        let local = state.index_to_key.len() as u32;
        debug_assert!(
            local <= (u32::MAX - TypeId::FIRST_USER) >> SHARD_BITS,
            "type interner shard overflow"
        );
        state.index_to_key.push(key);
        state.key_to_index.insert(key, local);
        Self::make_id(local, shard_idx as u32)
    }

    /// Look up the structure behind an id.
    ///
    /// Returns `None` for ids that were never produced by this interner.
    pub fn lookup(&self, id: TypeId) -> Option<TypeData> {
        if id.is_reserved() {
            return get_reserved_key(id);
        }
        let (shard_idx, local) = Self::split_id(id);
        let state = read_lock(&self.shards.get(shard_idx)?.state);
        state.index_to_key.get(local).copied()
    }

    /// Number of interned (non-reserved) types.
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| read_lock(&shard.state).index_to_key.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // =========================================================================
    // Lists and shapes
    // =========================================================================

    pub fn intern_type_list(&self, members: &[TypeId]) -> TypeListId {
        TypeListId(self.type_lists.intern(members))
    }

    pub fn type_list(&self, id: TypeListId) -> Arc<[TypeId]> {
        self.type_lists.get(id.0)
    }

    pub fn intern_array_shape(&self, shape: ArrayShape) -> ArrayShapeId {
        ArrayShapeId(self.array_shapes.intern(shape))
    }

    pub fn array_shape(&self, id: ArrayShapeId) -> Arc<ArrayShape> {
        self.array_shapes.get(id.0)
    }

    pub fn intern_object_shape(&self, shape: ObjectShape) -> ObjectShapeId {
        ObjectShapeId(self.object_shapes.intern(shape))
    }

    pub fn object_shape(&self, id: ObjectShapeId) -> Arc<ObjectShape> {
        self.object_shapes.get(id.0)
    }

    pub fn intern_callable_shape(&self, shape: CallableShape) -> CallableShapeId {
        CallableShapeId(self.callable_shapes.intern(shape))
    }

    pub fn callable_shape(&self, id: CallableShapeId) -> Arc<CallableShape> {
        self.callable_shapes.get(id.0)
    }

    pub fn intern_conditional(&self, conditional: ConditionalType) -> ConditionalTypeId {
        ConditionalTypeId(self.conditional_types.intern(conditional))
    }

    pub fn conditional_type(&self, id: ConditionalTypeId) -> Arc<ConditionalType> {
        self.conditional_types.get(id.0)
    }

    #[inline]
    fn shard_for(key: &TypeData) -> usize {
        let mut hasher = FxHasher::default();
        key.hash(&mut hasher);
        (hasher.finish() as usize) & (SHARD_COUNT - 1)
    }

    #[inline]
    fn make_id(local: u32, shard_idx: u32) -> TypeId {
        TypeId(TypeId::FIRST_USER + ((local << SHARD_BITS) | (shard_idx & SHARD_MASK)))
    }

    #[inline]
    fn split_id(id: TypeId) -> (usize, usize) {
        let raw = id.0 - TypeId::FIRST_USER;
        ((raw & SHARD_MASK) as usize, (raw >> SHARD_BITS) as usize)
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Reserved id for a structure, if it has one.
fn get_reserved_id(key: &TypeData) -> Option<TypeId> {
    match *key {
        TypeData::Intrinsic(kind) => Some(kind.to_type_id()),
        TypeData::Array(ArrayShapeId::DEFAULT) => Some(TypeId::ARRAY),
        TypeData::Iterable {
            key: TypeId::MIXED,
            value: TypeId::MIXED,
        } => Some(TypeId::ITERABLE),
        TypeData::Callable(CallableShapeId::DEFAULT) => Some(TypeId::CALLABLE),
        TypeData::Closure(CallableShapeId::DEFAULT) => Some(TypeId::CLOSURE),
        _ => None,
    }
}

/// Structure behind a reserved id.
fn get_reserved_key(id: TypeId) -> Option<TypeData> {
    if let Some(kind) = IntrinsicKind::from_type_id(id) {
        return Some(TypeData::Intrinsic(kind));
    }
    match id {
        TypeId::ARRAY => Some(TypeData::Array(ArrayShapeId::DEFAULT)),
        TypeId::ITERABLE => Some(TypeData::Iterable {
            key: TypeId::MIXED,
            value: TypeId::MIXED,
        }),
        TypeId::CALLABLE => Some(TypeData::Callable(CallableShapeId::DEFAULT)),
        TypeId::CLOSURE => Some(TypeData::Closure(CallableShapeId::DEFAULT)),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod tests;
