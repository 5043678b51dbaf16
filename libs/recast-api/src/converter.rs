use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use crate::error::ConversionError;
use crate::schema::TypeInfo;
use crate::value::{BoxedValue, Value};

/// Stable identifier of a converter implementation.
///
/// Two converters with the same kind are duplicates, whatever their internal
/// state. The chain keeps only the first one registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConverterKind(&'static str);

impl ConverterKind {
    pub const fn new(tag: &'static str) -> Self {
        Self(tag)
    }

    /// Kind derived from the implementing type's name.
    pub fn of<T: ?Sized>() -> Self {
        Self(std::any::type_name::<T>())
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ConverterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Per-field context handed to `TypeConverter::convert`.
///
/// `user` is the opaque object passed to `Mapper::copy_into_with`, threaded
/// through unchanged (`&()` for plain `copy_into`).
#[derive(Clone, Copy)]
pub struct ConvertContext<'a> {
    field: &'static str,
    source: TypeInfo,
    target: TypeInfo,
    user: &'a dyn Any,
}

impl<'a> ConvertContext<'a> {
    pub fn new(field: &'static str, source: TypeInfo, target: TypeInfo, user: &'a dyn Any) -> Self {
        Self { field, source, target, user }
    }

    /// Context with no record around it, for calling a chain directly.
    pub fn detached() -> ConvertContext<'static> {
        ConvertContext {
            field: "",
            source: TypeInfo::of::<()>(),
            target: TypeInfo::of::<()>(),
            user: &(),
        }
    }

    /// Name of the field being converted.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Record type the value was read from.
    pub fn source_record(&self) -> TypeInfo {
        self.source
    }

    /// Record type the value will be written into.
    pub fn target_record(&self) -> TypeInfo {
        self.target
    }

    pub fn user<T: Any>(&self) -> Option<&'a T> {
        self.user.downcast_ref::<T>()
    }
}

impl fmt::Debug for ConvertContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertContext")
            .field("field", &self.field)
            .field("source", &self.source)
            .field("target", &self.target)
            .finish()
    }
}

/// Field-level value converter.
///
/// Solves one task: turn a value of one runtime type into a value of the
/// target type. Same-typed fields never reach a converter; the chain hands
/// those over unchanged.
///
/// `convert` is only called after `support` returned true for the same value
/// and target, and must return a value of exactly the target type.
pub trait TypeConverter: Send + Sync {
    fn kind(&self) -> ConverterKind {
        ConverterKind::of::<Self>()
    }

    fn support(&self, value: &Value<'_>, target: TypeInfo) -> bool;

    fn convert(
        &self,
        value: &Value<'_>,
        target: TypeInfo,
        ctx: &ConvertContext<'_>,
    ) -> Result<BoxedValue, ConversionError>;
}

/// Shared converters keep the kind of what they point to.
impl<T: TypeConverter + ?Sized> TypeConverter for std::sync::Arc<T> {
    fn kind(&self) -> ConverterKind {
        (**self).kind()
    }

    fn support(&self, value: &Value<'_>, target: TypeInfo) -> bool {
        (**self).support(value, target)
    }

    fn convert(
        &self,
        value: &Value<'_>,
        target: TypeInfo,
        ctx: &ConvertContext<'_>,
    ) -> Result<BoxedValue, ConversionError> {
        (**self).convert(value, target, ctx)
    }
}

// ---------------------------------------------------------------------------
// Closure-backed converters
// ---------------------------------------------------------------------------

/// Converter built from a pair of closures. See [`from_fn`].
pub struct FnConverter<S, C> {
    kind: ConverterKind,
    support: S,
    convert: C,
}

/// Build a converter from closures.
///
/// Closures have no nameable type, so the kind is always explicit.
pub fn from_fn<S, C>(kind: &'static str, support: S, convert: C) -> FnConverter<S, C>
where
    S: Fn(&Value<'_>, TypeInfo) -> bool + Send + Sync,
    C: Fn(&Value<'_>, TypeInfo, &ConvertContext<'_>) -> Result<BoxedValue, ConversionError>
        + Send
        + Sync,
{
    FnConverter {
        kind: ConverterKind::new(kind),
        support,
        convert,
    }
}

impl<S, C> TypeConverter for FnConverter<S, C>
where
    S: Fn(&Value<'_>, TypeInfo) -> bool + Send + Sync,
    C: Fn(&Value<'_>, TypeInfo, &ConvertContext<'_>) -> Result<BoxedValue, ConversionError>
        + Send
        + Sync,
{
    fn kind(&self) -> ConverterKind {
        self.kind
    }

    fn support(&self, value: &Value<'_>, target: TypeInfo) -> bool {
        (self.support)(value, target)
    }

    fn convert(
        &self,
        value: &Value<'_>,
        target: TypeInfo,
        ctx: &ConvertContext<'_>,
    ) -> Result<BoxedValue, ConversionError> {
        (self.convert)(value, target, ctx)
    }
}

/// Converter for exactly one `A → B` pair. See [`typed`].
pub struct Typed<A, B, F> {
    kind: ConverterKind,
    f: F,
    _pair: PhantomData<fn(&A) -> B>,
}

/// Build a converter that supports values of type `A` bound for fields of
/// type `B`, and nothing else.
///
/// ```ignore
/// let widen = typed("i32->i64", |v: &i32| Ok(i64::from(*v)));
/// ```
pub fn typed<A, B, F>(kind: &'static str, f: F) -> Typed<A, B, F>
where
    A: Any,
    B: Any,
    F: Fn(&A) -> Result<B, ConversionError> + Send + Sync,
{
    Typed {
        kind: ConverterKind::new(kind),
        f,
        _pair: PhantomData,
    }
}

impl<A, B, F> TypeConverter for Typed<A, B, F>
where
    A: Any,
    B: Any,
    F: Fn(&A) -> Result<B, ConversionError> + Send + Sync,
{
    fn kind(&self) -> ConverterKind {
        self.kind
    }

    fn support(&self, value: &Value<'_>, target: TypeInfo) -> bool {
        value.is::<A>() && target.is::<B>()
    }

    fn convert(
        &self,
        value: &Value<'_>,
        _target: TypeInfo,
        _ctx: &ConvertContext<'_>,
    ) -> Result<BoxedValue, ConversionError> {
        let input = value.downcast_ref::<A>().ok_or_else(|| {
            ConversionError::unsupported(format!(
                "expected {}, got {}",
                std::any::type_name::<A>(),
                value.ty()
            ))
        })?;
        Ok(Box::new((self.f)(input)?) as BoxedValue)
    }
}
