//! Stock converters. None of them is registered by default.

use recast_api::converter::{ConvertContext, TypeConverter};
use recast_api::error::ConversionError;
use recast_api::schema::TypeInfo;
use recast_api::value::{BoxedValue, Value};

/// Lossless primitive numeric conversions (`i32 → i64`, `u8 → f32`, ...).
///
/// Only pairs with a std `From` impl are covered, so no value is ever
/// truncated or rounded.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericWidening;

macro_rules! widening_table {
    ($($from:ty => $($to:ty),+;)+) => {
        fn can_widen(from: TypeInfo, to: TypeInfo) -> bool {
            $(
                if from.is::<$from>() {
                    return false $(|| to.is::<$to>())+;
                }
            )+
            false
        }

        fn widen(value: &Value<'_>, to: TypeInfo) -> Option<BoxedValue> {
            $(
                if let Some(v) = value.downcast_ref::<$from>() {
                    $(
                        if to.is::<$to>() {
                            return Some(Box::new(<$to>::from(*v)) as BoxedValue);
                        }
                    )+
                    return None;
                }
            )+
            None
        }
    };
}

widening_table! {
    i8 => i16, i32, i64, i128, f32, f64;
    i16 => i32, i64, i128, f32, f64;
    i32 => i64, i128, f64;
    i64 => i128;
    u8 => u16, u32, u64, u128, i16, i32, i64, i128, f32, f64;
    u16 => u32, u64, u128, i32, i64, i128, f32, f64;
    u32 => u64, u128, i64, i128, f64;
    u64 => u128, i128;
    f32 => f64;
}

impl TypeConverter for NumericWidening {
    fn support(&self, value: &Value<'_>, target: TypeInfo) -> bool {
        can_widen(value.ty(), target)
    }

    fn convert(
        &self,
        value: &Value<'_>,
        target: TypeInfo,
        _ctx: &ConvertContext<'_>,
    ) -> Result<BoxedValue, ConversionError> {
        widen(value, target).ok_or_else(|| {
            ConversionError::unsupported(format!("cannot widen {} into {target}", value.ty()))
        })
    }
}

/// `String` into integers, floats, `bool` and `char` via `FromStr`.
///
/// Surrounding whitespace is not trimmed: `" 7"` is an invalid integer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseText;

/// Integers, floats, `bool` and `char` into `String` via `Display`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayText;

macro_rules! text_scalars {
    ($($ty:ty),+ $(,)?) => {
        fn is_text_scalar(ty: TypeInfo) -> bool {
            false $(|| ty.is::<$ty>())+
        }

        fn parse_scalar(text: &str, to: TypeInfo) -> Option<Result<BoxedValue, ConversionError>> {
            $(
                if to.is::<$ty>() {
                    return Some(
                        text.parse::<$ty>()
                            .map(|v| Box::new(v) as BoxedValue)
                            .map_err(ConversionError::from),
                    );
                }
            )+
            None
        }

        fn display_scalar(value: &Value<'_>) -> Option<String> {
            $(
                if let Some(v) = value.downcast_ref::<$ty>() {
                    return Some(v.to_string());
                }
            )+
            None
        }
    };
}

text_scalars!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char,
);

impl TypeConverter for ParseText {
    fn support(&self, value: &Value<'_>, target: TypeInfo) -> bool {
        value.is::<String>() && is_text_scalar(target)
    }

    fn convert(
        &self,
        value: &Value<'_>,
        target: TypeInfo,
        _ctx: &ConvertContext<'_>,
    ) -> Result<BoxedValue, ConversionError> {
        let text = value
            .downcast_ref::<String>()
            .ok_or_else(|| ConversionError::unsupported(format!("expected String, got {}", value.ty())))?;
        parse_scalar(text, target)
            .unwrap_or_else(|| Err(ConversionError::unsupported(format!("cannot parse {target}"))))
            .map_err(|e| e.with_context(format!("{text:?} as {target}")))
    }
}

impl TypeConverter for DisplayText {
    fn support(&self, value: &Value<'_>, target: TypeInfo) -> bool {
        target.is::<String>() && is_text_scalar(value.ty())
    }

    fn convert(
        &self,
        value: &Value<'_>,
        _target: TypeInfo,
        _ctx: &ConvertContext<'_>,
    ) -> Result<BoxedValue, ConversionError> {
        display_scalar(value)
            .map(|s| Box::new(s) as BoxedValue)
            .ok_or_else(|| ConversionError::unsupported(format!("cannot display {}", value.ty())))
    }
}
