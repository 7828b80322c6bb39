/// A dynamically-typed cache payload.
///
/// Values are stored as a tagged variant so that [`increment`](crate::Cache::increment)
/// and [`decrement`](crate::Cache::decrement) can match on the numeric variants at
/// runtime. Arithmetic preserves the stored width: incrementing a [`Value::U8`] wraps
/// at the `u8` boundary, not at `i64`. The non-numeric variants ([`Value::Str`] and
/// [`Value::Bytes`]) reject arithmetic with a type mismatch.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Str(String),
    Bytes(Vec<u8>),
}

impl Value {
    /// Adds `delta` in place, truncating it to the stored width first.
    ///
    /// Returns `false` when the variant is non-numeric, leaving the value untouched.
    pub(crate) fn add(&mut self, delta: i64) -> bool {
        match self {
            Value::I8(v) => *v = v.wrapping_add(delta as i8),
            Value::I16(v) => *v = v.wrapping_add(delta as i16),
            Value::I32(v) => *v = v.wrapping_add(delta as i32),
            Value::I64(v) => *v = v.wrapping_add(delta),
            Value::U8(v) => *v = v.wrapping_add(delta as u8),
            Value::U16(v) => *v = v.wrapping_add(delta as u16),
            Value::U32(v) => *v = v.wrapping_add(delta as u32),
            Value::U64(v) => *v = v.wrapping_add(delta as u64),
            Value::F32(v) => *v += delta as f32,
            Value::F64(v) => *v += delta as f64,
            Value::Str(_) | Value::Bytes(_) => return false,
        }
        true
    }

    /// Subtracts `delta` in place, truncating it to the stored width first.
    ///
    /// Returns `false` when the variant is non-numeric, leaving the value untouched.
    pub(crate) fn sub(&mut self, delta: i64) -> bool {
        match self {
            Value::I8(v) => *v = v.wrapping_sub(delta as i8),
            Value::I16(v) => *v = v.wrapping_sub(delta as i16),
            Value::I32(v) => *v = v.wrapping_sub(delta as i32),
            Value::I64(v) => *v = v.wrapping_sub(delta),
            Value::U8(v) => *v = v.wrapping_sub(delta as u8),
            Value::U16(v) => *v = v.wrapping_sub(delta as u16),
            Value::U32(v) => *v = v.wrapping_sub(delta as u32),
            Value::U64(v) => *v = v.wrapping_sub(delta as u64),
            Value::F32(v) => *v -= delta as f32,
            Value::F64(v) => *v -= delta as f64,
            Value::Str(_) | Value::Bytes(_) => return false,
        }
        true
    }
}

macro_rules! impl_from {
    ($($from:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$from> for Value {
                fn from(value: $from) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

impl_from! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => Str,
    Vec<u8> => Bytes,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_owned())
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(value.to_owned())
    }
}
