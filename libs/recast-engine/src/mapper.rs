use std::any::Any;
use std::sync::Arc;

use recast_api::converter::{ConvertContext, TypeConverter};
use recast_api::mapping::Strategy;
use recast_api::record::Record;
use recast_api::value::Value;

use crate::chain::{Converted, ConverterChain, ResolvedConverter};
use crate::config::MapperConfig;
use crate::error::MapperError;
use crate::plan::PlanCache;

/// Copies field values between record types of arbitrary shape.
///
/// Every destination field that has a same-named source field is overwritten,
/// including with null. Fields whose declared types match are cloned across
/// directly; the rest go through the converter chain. A field no converter
/// supports keeps its previous value (or fails the copy in strict mode).
///
/// Registration takes `&mut self`, so a mapper shared behind `&`/`Arc` can no
/// longer change its converters. To add converters at runtime, derive a new
/// mapper with [`Mapper::with_additional_converters`] and swap it in.
#[derive(Debug, Clone, Default)]
pub struct Mapper {
    chain: ConverterChain,
    plans: Arc<PlanCache>,
    config: MapperConfig,
}

impl Mapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MapperConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Mapper with the given converters, in order, duplicates dropped.
    pub fn with_converters<I>(converters: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ResolvedConverter>,
    {
        Self {
            chain: ConverterChain::from_converters(converters),
            ..Self::default()
        }
    }

    /// Append a converter (no-op for a kind already registered).
    pub fn register_converter<C: TypeConverter + 'static>(&mut self, converter: C) -> &mut Self {
        self.chain.register(converter);
        self
    }

    /// New mapper: this mapper's converters followed by `converters`,
    /// duplicates dropped. `self` is left as is; config and plan cache are
    /// shared.
    pub fn with_additional_converters<I>(&self, converters: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ResolvedConverter>,
    {
        Self {
            chain: self.chain.extend(converters),
            plans: self.plans.clone(),
            config: self.config.clone(),
        }
    }

    pub fn chain(&self) -> &ConverterChain {
        &self.chain
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Copy `source` into an existing `destination`.
    ///
    /// Not transactional: on error, fields copied before the failing one keep
    /// their new values.
    pub fn copy_into<S: Record, D: Record>(
        &self,
        source: &S,
        destination: &mut D,
    ) -> Result<(), MapperError> {
        self.copy_into_with(source, destination, &())
    }

    /// Like [`Mapper::copy_into`], handing `context` to every converter
    /// invoked (`ConvertContext::user`).
    pub fn copy_into_with<S: Record, D: Record>(
        &self,
        source: &S,
        destination: &mut D,
        context: &dyn Any,
    ) -> Result<(), MapperError> {
        let plan = self.plans.get_or_build::<S, D>();
        let from_shape = S::shape();
        let to_shape = D::shape();

        for link in plan.links() {
            let from = &from_shape.fields()[link.source];
            let to = &to_shape.fields()[link.target];
            let raw = (from.get)(source);

            if link.strategy == Strategy::Passthrough {
                (to.assign)(destination, raw)?;
                continue;
            }

            let ctx = ConvertContext::new(link.name, from_shape.ty(), to_shape.ty(), context);
            let value = raw.map(|r| Value::new(r, from.ty));
            let converted = self
                .chain
                .convert(value, to.ty, &ctx)
                .map_err(|source| MapperError::Conversion {
                    field: link.name,
                    source,
                })?;

            match converted {
                Converted::Null => (to.assign)(destination, None)?,
                Converted::Same(v) => (to.assign)(destination, Some(v.as_any()))?,
                Converted::Value(boxed) => (to.store)(destination, Some(boxed))?,
                Converted::Unmatched => {
                    if self.config.strict {
                        return Err(MapperError::Unmapped {
                            field: link.name,
                            source_type: from.ty.name(),
                            target_type: to.ty.name(),
                        });
                    }
                    if self.config.log_unmapped {
                        tracing::warn!(
                            field = link.name,
                            source_type = %from.ty,
                            target_type = %to.ty,
                            "no converter supports field, leaving destination unchanged"
                        );
                    }
                }
            }
        }
        Ok(())
    }

    /// Build a fresh `D` and copy `source` into it.
    ///
    /// Fails with `MapperError::Instantiation` when `D` has no zero-argument
    /// construction. On any error no instance is returned.
    pub fn map_to_new<S: Record, D: Record>(&self, source: &S) -> Result<D, MapperError> {
        let mut destination = D::instantiate()?;
        self.copy_into(source, &mut destination)?;
        Ok(destination)
    }

    /// Number of source/destination pairs with a cached copy plan.
    pub fn cached_plans(&self) -> usize {
        self.plans.len()
    }
}
