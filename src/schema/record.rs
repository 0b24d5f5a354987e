//! Record capability: field descriptors and typed field access
//!
//! A record type lists its fields once, at compile time, as a slice of
//! [`FieldSpec`]. The [`record!`](crate::record) macro writes that slice and the
//! `get`/`set` accessors from a struct declaration with `=> "tag"` annotations.

use crate::error::{TabulaError, TabulaResult};
use crate::types::{CellValue, FieldType};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

/// Static description of one record field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Rust field name, used for get/set
    pub field: &'static str,
    /// Export tag; `None` means the field is not exported
    pub tag: Option<&'static str>,
    pub field_type: FieldType,
}

/// A type whose tagged fields can be laid out as sheet columns
pub trait Record: Default {
    /// Fields in declaration order
    fn fields() -> &'static [FieldSpec];

    /// Current value of a field, `None` if no such field exists
    fn get(&self, field: &str) -> Option<CellValue>;

    /// Assign a coerced cell value to a field
    fn set(&mut self, field: &str, value: CellValue) -> TabulaResult<()>;
}

impl<R: Record> Record for Box<R> {
    fn fields() -> &'static [FieldSpec] {
        R::fields()
    }

    fn get(&self, field: &str) -> Option<CellValue> {
        (**self).get(field)
    }

    fn set(&mut self, field: &str, value: CellValue) -> TabulaResult<()> {
        (**self).set(field, value)
    }
}

//==============================================================================
// Field Values
//==============================================================================

/// A Rust type that can sit in a tagged record field
pub trait FieldValue: Sized {
    const FIELD_TYPE: FieldType;

    fn to_cell(&self) -> CellValue;

    /// `None` when the value has the wrong shape for this type
    fn from_cell(value: CellValue) -> Option<Self>;
}

impl FieldValue for String {
    const FIELD_TYPE: FieldType = FieldType::String;

    fn to_cell(&self) -> CellValue {
        CellValue::Text(self.clone())
    }

    fn from_cell(value: CellValue) -> Option<Self> {
        match value {
            CellValue::Text(s) => Some(s),
            CellValue::Empty => Some(String::new()),
            _ => None,
        }
    }
}

macro_rules! integer_field_value {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                const FIELD_TYPE: FieldType = FieldType::Integer;

                fn to_cell(&self) -> CellValue {
                    match i64::try_from(*self) {
                        Ok(i) => CellValue::Int(i),
                        // Only unsigned values above i64::MAX land here
                        Err(_) => CellValue::UInt(*self as u64),
                    }
                }

                fn from_cell(value: CellValue) -> Option<Self> {
                    match value {
                        // Out-of-range numbers are bad data, not a binding problem
                        CellValue::Int(i) => Some(<$ty>::try_from(i).unwrap_or_default()),
                        CellValue::UInt(u) => Some(<$ty>::try_from(u).unwrap_or_default()),
                        CellValue::Empty => Some(0),
                        _ => None,
                    }
                }
            }
        )*
    };
}

integer_field_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FieldValue for f64 {
    const FIELD_TYPE: FieldType = FieldType::Float;

    fn to_cell(&self) -> CellValue {
        CellValue::Float(*self)
    }

    fn from_cell(value: CellValue) -> Option<Self> {
        match value {
            CellValue::Float(f) => Some(f),
            CellValue::Empty => Some(0.0),
            _ => None,
        }
    }
}

impl FieldValue for f32 {
    const FIELD_TYPE: FieldType = FieldType::Float;

    fn to_cell(&self) -> CellValue {
        CellValue::Float(f64::from(*self))
    }

    fn from_cell(value: CellValue) -> Option<Self> {
        match value {
            CellValue::Float(f) => Some(f as f32),
            CellValue::Empty => Some(0.0),
            _ => None,
        }
    }
}

impl FieldValue for bool {
    const FIELD_TYPE: FieldType = FieldType::Boolean;

    fn to_cell(&self) -> CellValue {
        CellValue::Bool(*self)
    }

    fn from_cell(value: CellValue) -> Option<Self> {
        match value {
            CellValue::Bool(b) => Some(b),
            CellValue::Empty => Some(false),
            _ => None,
        }
    }
}

impl FieldValue for NaiveDateTime {
    const FIELD_TYPE: FieldType = FieldType::DateTime;

    fn to_cell(&self) -> CellValue {
        CellValue::DateTime(*self)
    }

    fn from_cell(value: CellValue) -> Option<Self> {
        match value {
            CellValue::DateTime(dt) => Some(dt),
            CellValue::Empty => Some(NaiveDateTime::default()),
            _ => None,
        }
    }
}

impl FieldValue for DateTime<Local> {
    const FIELD_TYPE: FieldType = FieldType::DateTime;

    fn to_cell(&self) -> CellValue {
        // The zero instant maps to the zero wall-clock time in every zone
        if *self == DateTime::<Local>::default() {
            CellValue::DateTime(NaiveDateTime::default())
        } else {
            CellValue::DateTime(self.naive_local())
        }
    }

    fn from_cell(value: CellValue) -> Option<Self> {
        match value {
            CellValue::DateTime(dt) if dt == NaiveDateTime::default() => {
                Some(DateTime::<Local>::default())
            }
            CellValue::DateTime(dt) => {
                Some(Local.from_local_datetime(&dt).earliest().unwrap_or_default())
            }
            CellValue::Empty => Some(DateTime::<Local>::default()),
            _ => None,
        }
    }
}

/// Error for a `set` call naming a field the record does not have
pub fn unknown_field(field: &str, record: &str) -> TabulaError {
    TabulaError::field_binding(field, format!("no such field on {}", record))
}

//==============================================================================
// record! macro
//==============================================================================

/// Declare a struct together with its [`Record`] implementation.
///
/// Fields annotated with `=> "tag"` are exported; the first whitespace-separated
/// token of the tag is the column header. Unannotated fields stay on the struct
/// but are skipped by schema extraction and may be of any type.
///
/// ```
/// royalbit_tabula::record! {
///     #[derive(Debug, Clone, Default, PartialEq)]
///     pub struct Person {
///         pub name: String => "姓名",
///         pub age: i64 => "年龄",
///         pub notes: Vec<String>,
///     }
/// }
///
/// use royalbit_tabula::schema::Record;
/// assert_eq!(Person::fields().len(), 3);
/// ```
#[macro_export]
macro_rules! record {
    (@tag) => { ::core::option::Option::None };
    (@tag $tag:literal) => { ::core::option::Option::Some($tag) };
    (@type $ty:ty) => { $crate::types::FieldType::Unsupported };
    (@type $ty:ty, $tag:literal) => {
        <$ty as $crate::schema::FieldValue>::FIELD_TYPE
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty $(=> $tag:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $ty,
            )*
        }

        impl $crate::schema::Record for $name {
            fn fields() -> &'static [$crate::schema::FieldSpec] {
                const FIELDS: &[$crate::schema::FieldSpec] = &[
                    $(
                        $crate::schema::FieldSpec {
                            field: stringify!($field),
                            tag: $crate::record!(@tag $($tag)?),
                            field_type: $crate::record!(@type $ty $(, $tag)?),
                        },
                    )*
                ];
                FIELDS
            }

            #[allow(unused_variables)]
            fn get(&self, field: &str) -> ::core::option::Option<$crate::types::CellValue> {
                $($(
                    if field == stringify!($field) {
                        let _: &str = $tag;
                        return ::core::option::Option::Some(
                            $crate::schema::FieldValue::to_cell(&self.$field),
                        );
                    }
                )?)*
                ::core::option::Option::None
            }

            #[allow(unused_variables)]
            fn set(
                &mut self,
                field: &str,
                value: $crate::types::CellValue,
            ) -> $crate::error::TabulaResult<()> {
                $($(
                    if field == stringify!($field) {
                        let _: &str = $tag;
                        return match <$ty as $crate::schema::FieldValue>::from_cell(value) {
                            ::core::option::Option::Some(v) => {
                                self.$field = v;
                                ::core::result::Result::Ok(())
                            }
                            ::core::option::Option::None => ::core::result::Result::Err(
                                $crate::error::TabulaError::field_binding(
                                    field,
                                    concat!("value does not fit a ", stringify!($ty), " field"),
                                ),
                            ),
                        };
                    }
                )?)*
                ::core::result::Result::Err($crate::schema::unknown_field(
                    field,
                    stringify!($name),
                ))
            }
        }
    };
}
