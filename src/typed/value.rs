//! Conversion of raw path, query and form strings into member types.

use uuid::Uuid;

/// A type a captured route value can be converted into.
///
/// Implemented for strings, every integer width, floats, `bool`, `char`,
/// [`Uuid`], and `Option`/`Vec` wrappers of those.
pub trait FromRouteValue: Sized {
    /// Convert `raw`, returning a human-readable reason on failure.
    fn from_route_value(raw: &str) -> Result<Self, String>;

    /// Type label used in binding errors
    fn type_label() -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl FromRouteValue for String {
    fn from_route_value(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }

    fn type_label() -> &'static str {
        "string"
    }
}

macro_rules! from_str_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromRouteValue for $ty {
                fn from_route_value(raw: &str) -> Result<Self, String> {
                    raw.trim().parse::<$ty>().map_err(|e| e.to_string())
                }
            }
        )*
    };
}

from_str_value!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl FromRouteValue for bool {
    fn from_route_value(raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("true") || raw == "1" {
            Ok(true)
        } else if raw.eq_ignore_ascii_case("false") || raw == "0" {
            Ok(false)
        } else {
            Err(format!("expected true/false, got '{raw}'"))
        }
    }
}

impl FromRouteValue for char {
    fn from_route_value(raw: &str) -> Result<Self, String> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(format!("expected a single character, got '{raw}'")),
        }
    }
}

impl FromRouteValue for Uuid {
    fn from_route_value(raw: &str) -> Result<Self, String> {
        Uuid::parse_str(raw.trim()).map_err(|e| e.to_string())
    }

    fn type_label() -> &'static str {
        "uuid"
    }
}

impl<T: FromRouteValue> FromRouteValue for Option<T> {
    fn from_route_value(raw: &str) -> Result<Self, String> {
        if raw.is_empty() {
            Ok(None)
        } else {
            T::from_route_value(raw).map(Some)
        }
    }

    fn type_label() -> &'static str {
        T::type_label()
    }
}

/// Comma-separated list, e.g. `?ids=1,2,3`.
impl<T: FromRouteValue> FromRouteValue for Vec<T> {
    fn from_route_value(raw: &str) -> Result<Self, String> {
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        raw.split(',').map(T::from_route_value).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_and_floats() {
        assert_eq!(i32::from_route_value("5").unwrap(), 5);
        assert_eq!(u64::from_route_value(" 42 ").unwrap(), 42);
        assert_eq!(f64::from_route_value("1.5").unwrap(), 1.5);
        assert!(i32::from_route_value("five").is_err());
        assert!(u8::from_route_value("300").is_err());
    }

    #[test]
    fn test_bool_is_case_insensitive() {
        assert!(bool::from_route_value("True").unwrap());
        assert!(bool::from_route_value("1").unwrap());
        assert!(!bool::from_route_value("FALSE").unwrap());
        assert!(bool::from_route_value("maybe").is_err());
    }

    #[test]
    fn test_uuid_formats() {
        let expected = Uuid::parse_str("4583b364-bbdc-427f-a289-c2923debd547").unwrap();
        assert_eq!(
            Uuid::from_route_value("4583B364-BBDC-427F-A289-C2923DEBD547").unwrap(),
            expected
        );
        assert_eq!(
            Uuid::from_route_value("4583b364bbdc427fa289c2923debd547").unwrap(),
            expected
        );
        assert!(Uuid::from_route_value("not-a-guid").is_err());
    }

    #[test]
    fn test_option_and_vec() {
        assert_eq!(Option::<i32>::from_route_value("").unwrap(), None);
        assert_eq!(Option::<i32>::from_route_value("7").unwrap(), Some(7));
        assert_eq!(Vec::<u32>::from_route_value("1,2,3").unwrap(), vec![1, 2, 3]);
        assert!(Vec::<u32>::from_route_value("1,x").is_err());
        assert_eq!(Option::<i32>::type_label(), i32::type_label());
    }

    #[test]
    fn test_char() {
        assert_eq!(char::from_route_value("x").unwrap(), 'x');
        assert!(char::from_route_value("xy").is_err());
    }
}
