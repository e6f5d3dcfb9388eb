use crate::{Error, Result, Value};
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use std::any;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Conversion between native Rust types and the dynamically typed [`Value`].
///
/// This is what lets statements accept plain Rust values as parameters and
/// lets drivers coerce a bound value into the type the backend declared for
/// the parameter.
///
/// # Conversion contract
/// - `as_value` never loses information.
/// - `try_from_value` accepts the matching variant plus lossless widenings
///   (for example `Int16` into `i64`), range checks always happen before
///   returning a narrower integer.
/// - A NULL converts only into `Option<T>`.
///
/// ```rust
/// use slate_core::{AsValue, Value};
/// let v = 42i32.as_value();
/// assert!(matches!(v, Value::Int32(Some(42))));
/// let n: i64 = AsValue::try_from_value(v).unwrap();
/// assert_eq!(n, 42);
/// ```
pub trait AsValue {
    /// The NULL of the variant this type maps to.
    fn as_empty_value() -> Value
    where
        Self: Sized;
    fn as_value(self) -> Value;
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
}

fn conversion_error<T>(value: &Value) -> Error {
    Error::msg(format!(
        "Cannot convert `{:?}` to {}",
        value,
        any::type_name::<T>()
    ))
}

impl AsValue for Value {
    fn as_empty_value() -> Value {
        Value::Null
    }
    fn as_value(self) -> Value {
        self
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

macro_rules! impl_as_value_integer {
    ($source:ty, $variant:path) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $variant(None)
            }
            fn as_value(self) -> Value {
                $variant(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                let converted = match &value {
                    Value::Int16(Some(v)) => Self::try_from(*v).ok(),
                    Value::Int32(Some(v)) => Self::try_from(*v).ok(),
                    Value::Int64(Some(v)) => Self::try_from(*v).ok(),
                    Value::Decimal(Some(v)) if v.fract().is_zero() => {
                        v.to_i64().and_then(|v| Self::try_from(v).ok())
                    }
                    _ => None,
                };
                converted.ok_or_else(|| conversion_error::<Self>(&value))
            }
        }
    };
}

impl_as_value_integer!(i16, Value::Int16);
impl_as_value_integer!(i32, Value::Int32);
impl_as_value_integer!(i64, Value::Int64);

macro_rules! impl_as_value {
    ($source:ty, $variant:path $(, $other:path => $convert:expr)* $(,)?) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $variant(None)
            }
            fn as_value(self) -> Value {
                $variant(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                let converted: Option<Self> = match &value {
                    $variant(Some(v)) => Some(v.clone()),
                    $($other(Some(v)) => {
                        let convert: fn(_) -> Option<Self> = $convert;
                        convert(v.clone())
                    })*
                    _ => None,
                };
                converted.ok_or_else(|| conversion_error::<Self>(&value))
            }
        }
    };
}

impl_as_value!(bool, Value::Boolean);
impl_as_value!(f32, Value::Float32, Value::Int16 => |v: i16| Some(Self::from(v)));
impl_as_value!(
    f64,
    Value::Float64,
    Value::Float32 => |v: f32| Some(Self::from(v)),
    Value::Int16 => |v: i16| Some(Self::from(v)),
    Value::Int32 => |v: i32| Some(Self::from(v)),
);
impl_as_value!(
    Decimal,
    Value::Decimal,
    Value::Int16 => |v: i16| Some(Self::from(v)),
    Value::Int32 => |v: i32| Some(Self::from(v)),
    Value::Int64 => |v: i64| Some(Self::from(v)),
    Value::Float32 => Decimal::from_f32,
    Value::Float64 => Decimal::from_f64,
);
impl_as_value!(String, Value::Varchar);
impl_as_value!(Box<[u8]>, Value::Blob);
impl_as_value!(Date, Value::Date);
impl_as_value!(Time, Value::Time);
impl_as_value!(
    PrimitiveDateTime,
    Value::Timestamp,
    Value::TimestampWithTimezone => |v: OffsetDateTime| {
        let v = v.to_offset(time::UtcOffset::UTC);
        Some(PrimitiveDateTime::new(v.date(), v.time()))
    },
);
impl_as_value!(
    OffsetDateTime,
    Value::TimestampWithTimezone,
    Value::Timestamp => |v: PrimitiveDateTime| Some(v.assume_utc()),
);
impl_as_value!(
    Uuid,
    Value::Uuid,
    Value::Varchar => |v: String| Uuid::parse_str(&v).ok(),
);

impl AsValue for Vec<u8> {
    fn as_empty_value() -> Value {
        Value::Blob(None)
    }
    fn as_value(self) -> Value {
        Value::Blob(Some(self.into_boxed_slice()))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Box::<[u8]>::try_from_value(value).map(Into::into)
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            return Ok(None);
        }
        T::try_from_value(value).map(Some)
    }
}

impl AsValue for &str {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self.to_owned()))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Err(Error::msg(format!(
            "Cannot borrow a &str out of `{:?}`, convert into String instead",
            value
        )))
    }
}
