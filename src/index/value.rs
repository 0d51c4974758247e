//! Index Value Module
//!
//! Hashable scalar produced by index extractors.

use std::fmt;

// == Index Value ==
/// Output of an extractor, compared by value equality.
///
/// Composite attributes should be mapped to a canonical scalar (usually a
/// string) inside the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndexValue {
    Bool(bool),
    /// Any integer width, signed or unsigned.
    Int(i128),
    Text(String),
}

impl fmt::Display for IndexValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexValue::Bool(b) => write!(f, "{}", b),
            IndexValue::Int(i) => write!(f, "{}", i),
            IndexValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<String> for IndexValue {
    fn from(value: String) -> Self {
        IndexValue::Text(value)
    }
}

impl From<&str> for IndexValue {
    fn from(value: &str) -> Self {
        IndexValue::Text(value.to_string())
    }
}

impl From<&String> for IndexValue {
    fn from(value: &String) -> Self {
        IndexValue::Text(value.clone())
    }
}

impl From<bool> for IndexValue {
    fn from(value: bool) -> Self {
        IndexValue::Bool(value)
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for IndexValue {
                fn from(value: $ty) -> Self {
                    IndexValue::Int(value as i128)
                }
            }
        )*
    };
}

// Every width lands in one variant so `1`, `1u32` and `1i64` compare equal
impl_from_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
