use std::any::Any;
use std::fmt;

use crate::schema::TypeInfo;

/// Owned value produced by a converter.
///
/// The chain checks that the boxed type matches the requested target type
/// before the value reaches a field's `store` accessor.
pub type BoxedValue = Box<dyn Any>;

/// Borrowed view of a non-null field value.
///
/// Null never reaches a `Value`: absent values travel as `Option::None`
/// around it. Reading a field this way costs nothing, no clone, no boxing.
#[derive(Clone, Copy)]
pub struct Value<'a> {
    raw: &'a dyn Any,
    ty: TypeInfo,
}

impl<'a> Value<'a> {
    /// `ty` must describe the concrete type behind `raw`.
    pub fn new(raw: &'a dyn Any, ty: TypeInfo) -> Self {
        debug_assert_eq!(raw.type_id(), ty.id(), "value type does not match {ty}");
        Self { raw, ty }
    }

    pub fn of<T: Any>(value: &'a T) -> Self {
        Self {
            raw: value,
            ty: TypeInfo::of::<T>(),
        }
    }

    pub fn ty(&self) -> TypeInfo {
        self.ty
    }

    pub fn is<T: Any>(&self) -> bool {
        self.ty.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&'a T> {
        self.raw.downcast_ref::<T>()
    }

    pub fn as_any(&self) -> &'a dyn Any {
        self.raw
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value").field("ty", &self.ty.name()).finish()
    }
}
