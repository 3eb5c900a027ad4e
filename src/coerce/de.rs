//! Structural deserializer over normalized rows
//!
//! Rows deserialize as maps keyed by column name, or as sequences of cell
//! values for tuple targets. Each cell converts on demand to whatever
//! primitive the target field asks for:
//!
//! | target        | accepted cells                                      |
//! |---------------|-----------------------------------------------------|
//! | integers      | integral numbers in range, text that parses         |
//! | floats        | numbers, text that parses                           |
//! | bool          | booleans, `true/false/yes/no/1/0` text, 0 or 1      |
//! | strings       | text, numbers (shortest form), booleans             |
//! | `Option<T>`   | null gives `None`, anything else goes to `T`        |
//! | unit enums    | text naming the variant                             |

use crate::cell::{CellValue, integral};
use crate::row::NormalizedRow;
use serde::de::value::{MapDeserializer, SeqDeserializer, StrDeserializer};
use serde::de::{self, Deserializer, IntoDeserializer, Unexpected, Visitor};
use serde::forward_to_deserialize_any;
use std::fmt;

/// Error raised while converting one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeError(String);

impl fmt::Display for DeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for DeError {}

impl de::Error for DeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        DeError(msg.to_string())
    }
}

/// Deserializer for a whole row
pub struct RowDeserializer<'a> {
    row: &'a NormalizedRow,
}

impl<'a> RowDeserializer<'a> {
    pub fn new(row: &'a NormalizedRow) -> Self {
        Self { row }
    }
}

impl<'de, 'a> Deserializer<'de> for RowDeserializer<'a> {
    type Error = DeError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        let mut map = MapDeserializer::<_, DeError>::new(self.row.iter());
        let value = visitor.visit_map(&mut map)?;
        map.end()?;
        Ok(value)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        let mut seq = SeqDeserializer::<_, DeError>::new(self.row.values());
        let value = visitor.visit_seq(&mut seq)?;
        seq.end()?;
        Ok(value)
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value, DeError> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, DeError> {
        self.deserialize_seq(visitor)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct map struct
        enum identifier ignored_any
    }
}

impl<'de, 'a> IntoDeserializer<'de, DeError> for &'a CellValue {
    type Deserializer = CellDeserializer<'a>;

    fn into_deserializer(self) -> Self::Deserializer {
        CellDeserializer(self)
    }
}

/// Deserializer for a single cell
pub struct CellDeserializer<'a>(&'a CellValue);

impl CellDeserializer<'_> {
    fn unexpected(&self) -> Unexpected<'_> {
        match self.0 {
            CellValue::Text(s) => Unexpected::Str(s),
            CellValue::Number(n) => Unexpected::Float(*n),
            CellValue::Bool(b) => Unexpected::Bool(*b),
            CellValue::Null => Unexpected::Unit,
        }
    }

    fn invalid<E: de::Expected>(&self, expected: &E) -> DeError {
        de::Error::invalid_type(self.unexpected(), expected)
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Integer from a cell: integral numbers, or text parsed as an integer or
/// as a float with no fractional part
fn cell_i128(cell: &CellValue) -> Option<i128> {
    match cell {
        CellValue::Number(n) => integral(*n).map(i128::from),
        CellValue::Text(s) => {
            let s = s.trim();
            s.parse::<i128>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral).map(i128::from))
        }
        _ => None,
    }
}

macro_rules! deserialize_integer {
    ($($method:ident => $visit:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
                let Some(wide) = cell_i128(self.0) else {
                    return Err(self.invalid(&visitor));
                };
                match <$ty>::try_from(wide) {
                    Ok(value) => visitor.$visit(value),
                    Err(_) => Err(de::Error::invalid_value(self.unexpected(), &visitor)),
                }
            }
        )*
    };
}

impl<'de, 'a> Deserializer<'de> for CellDeserializer<'a> {
    type Error = DeError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        match self.0 {
            CellValue::Text(s) => visitor.visit_str(s),
            CellValue::Number(n) => match integral(*n) {
                Some(i) => visitor.visit_i64(i),
                None => visitor.visit_f64(*n),
            },
            CellValue::Bool(b) => visitor.visit_bool(*b),
            CellValue::Null => visitor.visit_unit(),
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        let value = match self.0 {
            CellValue::Bool(b) => Some(*b),
            CellValue::Text(s) => parse_bool(s),
            CellValue::Number(n) if *n == 0.0 => Some(false),
            CellValue::Number(n) if *n == 1.0 => Some(true),
            _ => None,
        };
        match value {
            Some(b) => visitor.visit_bool(b),
            None => Err(self.invalid(&visitor)),
        }
    }

    deserialize_integer! {
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_i128 => visit_i128: i128,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_u128 => visit_u128: u128,
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        self.deserialize_f64(visitor)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        let value = match self.0 {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match value {
            Some(n) => visitor.visit_f64(n),
            None => Err(self.invalid(&visitor)),
        }
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        match self.0 {
            CellValue::Text(s) => visitor.visit_str(s),
            _ => Err(self.invalid(&visitor)),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        match self.0 {
            CellValue::Text(s) => visitor.visit_str(s),
            CellValue::Number(_) | CellValue::Bool(_) => visitor.visit_string(self.0.to_string()),
            CellValue::Null => Err(self.invalid(&visitor)),
        }
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        match self.0 {
            CellValue::Text(s) => visitor.visit_bytes(s.as_bytes()),
            _ => Err(self.invalid(&visitor)),
        }
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        match self.0 {
            CellValue::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        match self.0 {
            CellValue::Null => visitor.visit_unit(),
            _ => Err(self.invalid(&visitor)),
        }
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DeError> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DeError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DeError> {
        match self.0 {
            CellValue::Text(s) => {
                let variant: StrDeserializer<'_, DeError> = s.as_str().into_deserializer();
                visitor.visit_enum(variant)
            }
            _ => Err(self.invalid(&visitor)),
        }
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        seq tuple tuple_struct map struct identifier
    }
}
