use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::FieldError;
use crate::value::BoxedValue;

/// Runtime type identity plus a printable name.
///
/// Equality and hashing use the `TypeId` only; the name is for logs and
/// error messages.
#[derive(Clone, Copy)]
pub struct TypeInfo {
    id: TypeId,
    name: &'static str,
}

impl TypeInfo {
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<T: Any + ?Sized>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Reads a field. `None` means the field currently holds null.
pub type Getter<R> = fn(&R) -> Option<&dyn Any>;

/// Writes a field by cloning a value of exactly the declared type.
pub type Assign<R> = fn(&mut R, Option<&dyn Any>) -> Result<(), FieldError>;

/// Writes a field by moving an owned value of exactly the declared type.
pub type Store<R> = fn(&mut R, Option<BoxedValue>) -> Result<(), FieldError>;

/// A single named, typed field of record type `R`.
///
/// `ty` is the declared value type with any `Option` wrapper removed:
/// `age: Option<i64>` is declared as `i64` with `nullable = true`. Two fields
/// whose `ty` match can exchange values without a converter, nullable or not.
pub struct Field<R> {
    pub name: &'static str,
    pub ty: TypeInfo,
    pub nullable: bool,
    pub get: Getter<R>,
    pub assign: Assign<R>,
    pub store: Store<R>,
}

impl<R> fmt::Debug for Field<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("nullable", &self.nullable)
            .finish()
    }
}

/// Ordered field table of record type `R`.
///
/// Field position is the index used by `CopyPlan` links.
pub struct Shape<R> {
    ty: TypeInfo,
    fields: Vec<Field<R>>,
}

impl<R: Any> Shape<R> {
    pub fn new(fields: Vec<Field<R>>) -> Self {
        Self {
            ty: TypeInfo::of::<R>(),
            fields,
        }
    }
}

impl<R> Shape<R> {
    pub fn ty(&self) -> TypeInfo {
        self.ty
    }

    pub fn fields(&self) -> &[Field<R>] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Exact, case-sensitive name lookup.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&Field<R>> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl<R> fmt::Debug for Shape<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("ty", &self.ty)
            .field("fields", &self.fields)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Accessor bodies shared by `#[derive(Record)]` and hand-written impls
// ---------------------------------------------------------------------------

pub fn assign_required<T: Any + Clone>(
    slot: &mut T,
    value: Option<&dyn Any>,
    field: &'static str,
) -> Result<(), FieldError> {
    let value = value.ok_or(FieldError::NotNullable { field })?;
    *slot = downcast_clone(value, field)?;
    Ok(())
}

pub fn assign_optional<T: Any + Clone>(
    slot: &mut Option<T>,
    value: Option<&dyn Any>,
    field: &'static str,
) -> Result<(), FieldError> {
    *slot = value.map(|v| downcast_clone(v, field)).transpose()?;
    Ok(())
}

pub fn store_required<T: Any>(
    slot: &mut T,
    value: Option<BoxedValue>,
    field: &'static str,
) -> Result<(), FieldError> {
    let value = value.ok_or(FieldError::NotNullable { field })?;
    *slot = downcast_owned(value, field)?;
    Ok(())
}

pub fn store_optional<T: Any>(
    slot: &mut Option<T>,
    value: Option<BoxedValue>,
    field: &'static str,
) -> Result<(), FieldError> {
    *slot = value.map(|v| downcast_owned(v, field)).transpose()?;
    Ok(())
}

fn downcast_clone<T: Any + Clone>(value: &dyn Any, field: &'static str) -> Result<T, FieldError> {
    value
        .downcast_ref::<T>()
        .cloned()
        .ok_or_else(|| FieldError::TypeMismatch {
            field,
            expected: std::any::type_name::<T>(),
        })
}

fn downcast_owned<T: Any>(value: BoxedValue, field: &'static str) -> Result<T, FieldError> {
    value
        .downcast::<T>()
        .map(|b| *b)
        .map_err(|_| FieldError::TypeMismatch {
            field,
            expected: std::any::type_name::<T>(),
        })
}
