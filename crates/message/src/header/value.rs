use crate::ensure;
use crate::error::InvalidArgument;
use crate::matches::FIELD_VALUE;

/// Conversion into a single header value.
///
/// Implemented for string types and integers; numbers are rendered in decimal.
pub trait IntoHeaderValue {
    fn into_header_value(self) -> String;
}

/// Conversion into a sequence of header values.
///
/// A single string-like value becomes a one element sequence, while vectors,
/// slices and arrays contribute one value per element.
pub trait IntoHeaderValues {
    fn into_header_values(self) -> Vec<String>;
}

impl IntoHeaderValue for String {
    #[inline]
    fn into_header_value(self) -> String {
        self
    }
}

impl IntoHeaderValue for &String {
    #[inline]
    fn into_header_value(self) -> String {
        self.clone()
    }
}

impl IntoHeaderValue for &str {
    #[inline]
    fn into_header_value(self) -> String {
        self.to_string()
    }
}

macro_rules! impl_values {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoHeaderValues for $ty {
                #[inline]
                fn into_header_values(self) -> Vec<String> {
                    vec![self.into_header_value()]
                }
            }
        )*
    };
}

macro_rules! impl_numeric {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoHeaderValue for $ty {
                #[inline]
                fn into_header_value(self) -> String {
                    self.to_string()
                }
            }
        )*
        impl_values!($($ty),*);
    };
}

impl_values!(String, &String, &str);
impl_numeric!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl<T: IntoHeaderValue> IntoHeaderValues for Vec<T> {
    fn into_header_values(self) -> Vec<String> {
        self.into_iter().map(IntoHeaderValue::into_header_value).collect()
    }
}

impl<T: IntoHeaderValue + Clone> IntoHeaderValues for &[T] {
    fn into_header_values(self) -> Vec<String> {
        self.iter().cloned().map(IntoHeaderValue::into_header_value).collect()
    }
}

impl<T: IntoHeaderValue, const N: usize> IntoHeaderValues for [T; N] {
    fn into_header_values(self) -> Vec<String> {
        self.into_iter().map(IntoHeaderValue::into_header_value).collect()
    }
}

/// Validates every value against the RFC 7230 `field-value` grammar and trims
/// leading and trailing `SP / HTAB`. Inner whitespace is kept as is.
///
/// An empty sequence is rejected.
pub(crate) fn validate_and_trim(name: &str, values: Vec<String>) -> Result<Vec<String>, InvalidArgument> {
    ensure!(!values.is_empty(), InvalidArgument::empty_header_values(name));

    values
        .into_iter()
        .map(|value| {
            ensure!(value.bytes().all(|b| FIELD_VALUE[b as usize]), InvalidArgument::invalid_header_value(&value));
            Ok(trim(&value).to_string())
        })
        .collect()
}

#[inline]
fn trim(value: &str) -> &str {
    value.trim_matches([' ', '\t'])
}
