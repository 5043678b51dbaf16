use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use recast_api::converter::{ConvertContext, ConverterKind, TypeConverter};
use recast_api::error::ConversionError;
use recast_api::schema::TypeInfo;
use recast_api::value::{BoxedValue, Value};

/// A registered converter, compared by kind.
///
/// Two entries wrapping different instances of the same converter kind are
/// equal, so registering a converter twice is a no-op.
#[derive(Clone)]
pub struct ResolvedConverter {
    kind: ConverterKind,
    delegate: Arc<dyn TypeConverter>,
}

impl ResolvedConverter {
    pub fn new(delegate: Arc<dyn TypeConverter>) -> Self {
        Self {
            kind: delegate.kind(),
            delegate,
        }
    }

    pub fn kind(&self) -> ConverterKind {
        self.kind
    }

    pub fn support(&self, value: &Value<'_>, target: TypeInfo) -> bool {
        self.delegate.support(value, target)
    }

    pub fn convert(
        &self,
        value: &Value<'_>,
        target: TypeInfo,
        ctx: &ConvertContext<'_>,
    ) -> Result<BoxedValue, ConversionError> {
        self.delegate.convert(value, target, ctx)
    }
}

impl PartialEq for ResolvedConverter {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for ResolvedConverter {}

impl Hash for ResolvedConverter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
    }
}

impl fmt::Debug for ResolvedConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResolvedConverter").field(&self.kind).finish()
    }
}

impl<C: TypeConverter + 'static> From<C> for ResolvedConverter {
    fn from(converter: C) -> Self {
        Self::new(Arc::new(converter))
    }
}

/// Result of running one value through the chain.
pub enum Converted<'a> {
    /// Source value was null.
    Null,
    /// Source value already has the target type; handed back untouched.
    Same(Value<'a>),
    /// A converter produced a new value of the target type.
    Value(BoxedValue),
    /// No converter supports this value/target pair.
    Unmatched,
}

impl fmt::Debug for Converted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Converted::Null => f.write_str("Null"),
            Converted::Same(v) => f.debug_tuple("Same").field(v).finish(),
            Converted::Value(_) => f.write_str("Value(..)"),
            Converted::Unmatched => f.write_str("Unmatched"),
        }
    }
}

/// Ordered, deduplicated converter list.
///
/// Registration order is the tie-break: when several converters support the
/// same value/target pair, the one registered first wins. Entries live behind
/// an `Arc`, so cloning a chain is cheap and `register` only copies the list
/// when it is shared with another chain.
#[derive(Clone, Default)]
pub struct ConverterChain {
    entries: Arc<Vec<ResolvedConverter>>,
}

impl ConverterChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a chain from converters in order, dropping duplicate kinds.
    pub fn from_converters<I>(converters: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ResolvedConverter>,
    {
        let mut chain = Self::new();
        for converter in converters {
            chain.register(converter);
        }
        chain
    }

    /// Append a converter unless an entry of the same kind exists.
    ///
    /// Returns `false` (and leaves the chain unchanged) for a duplicate.
    pub fn register(&mut self, converter: impl Into<ResolvedConverter>) -> bool {
        let converter = converter.into();
        if self.entries.contains(&converter) {
            tracing::debug!(converter = %converter.kind(), "converter already registered, ignoring");
            return false;
        }
        Arc::make_mut(&mut self.entries).push(converter);
        true
    }

    /// New chain: this chain's entries followed by `converters`, duplicates
    /// dropped. `self` is left as is.
    pub fn extend<I>(&self, converters: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ResolvedConverter>,
    {
        let mut chain = self.clone();
        for converter in converters {
            chain.register(converter);
        }
        chain
    }

    /// Run one value through the chain.
    ///
    /// 1. `None` → `Null`, no converter consulted.
    /// 2. value already of `target` type → `Same`, no converter consulted.
    /// 3. first converter whose `support` holds → `Value`.
    /// 4. otherwise `Unmatched`.
    pub fn convert<'a>(
        &self,
        value: Option<Value<'a>>,
        target: TypeInfo,
        ctx: &ConvertContext<'_>,
    ) -> Result<Converted<'a>, ConversionError> {
        let Some(value) = value else {
            return Ok(Converted::Null);
        };
        if value.ty() == target {
            return Ok(Converted::Same(value));
        }

        let Some(entry) = self.entries.iter().find(|e| e.support(&value, target)) else {
            return Ok(Converted::Unmatched);
        };

        tracing::info!(
            converter = %entry.kind(),
            source_type = %value.ty(),
            target_type = %target,
            field = ctx.field(),
            "custom type conversion"
        );

        let converted = entry
            .convert(&value, target, ctx)
            .map_err(|e| e.with_context(entry.kind()))?;

        // Ask the boxed value, not the `Box`, for its type.
        if (*converted).type_id() != target.id() {
            return Err(ConversionError::wrong_type(target).with_context(entry.kind()));
        }
        Ok(Converted::Value(converted))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedConverter> {
        self.entries.iter()
    }

    /// Registered kinds, in chain order.
    pub fn kinds(&self) -> Vec<ConverterKind> {
        self.entries.iter().map(ResolvedConverter::kind).collect()
    }

    pub fn contains(&self, kind: ConverterKind) -> bool {
        self.entries.iter().any(|e| e.kind == kind)
    }
}

impl fmt::Debug for ConverterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}
