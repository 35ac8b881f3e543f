//! Field spec AST types
//!
//! `FieldSpec` is what callers write, `FieldDescriptor` is what the parser
//! produces, and `FieldType` is the semantic type carried by a descriptor.
//!
//! All types are immutable after construction and derive
//! Debug, Clone, PartialEq, Eq.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ── Types ──────────────────────────────────────────────────

/// Semantic type of a field
///
/// Scalars plus two generic containers, nested to any depth.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    #[default]
    String,
    Integer,
    Float,
    Boolean,
    Bytes,
    /// Ordered list of the inner type
    List(Box<FieldType>),
    /// Mapping from key type to value type
    Dict(Box<FieldType>, Box<FieldType>),
}

impl FieldType {
    /// Look up a scalar keyword (`str`, `int`, `float`, `bool`, `bytes`).
    ///
    /// Matching is exact: `Int` and `string` are not keywords.
    pub fn from_keyword(word: &str) -> Option<FieldType> {
        match word {
            "str" => Some(FieldType::String),
            "int" => Some(FieldType::Integer),
            "float" => Some(FieldType::Float),
            "bool" => Some(FieldType::Boolean),
            "bytes" => Some(FieldType::Bytes),
            _ => None,
        }
    }

    pub fn list(item: FieldType) -> FieldType {
        FieldType::List(Box::new(item))
    }

    pub fn dict(key: FieldType, value: FieldType) -> FieldType {
        FieldType::Dict(Box::new(key), Box::new(value))
    }

    /// The `FieldType` a Rust type maps to.
    ///
    /// ```
    /// use ergosig::FieldType;
    /// use std::collections::HashMap;
    ///
    /// assert_eq!(
    ///     FieldType::of::<Vec<HashMap<String, i64>>>(),
    ///     FieldType::list(FieldType::dict(FieldType::String, FieldType::Integer)),
    /// );
    /// ```
    pub fn of<T: HasFieldType + ?Sized>() -> FieldType {
        T::field_type()
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, FieldType::List(_) | FieldType::Dict(_, _))
    }

    /// Nesting depth: 0 for scalars, 1 for `list[int]`, 2 for `list[dict[str, int]]`.
    pub fn depth(&self) -> usize {
        match self {
            FieldType::List(item) => 1 + item.depth(),
            FieldType::Dict(key, value) => 1 + key.depth().max(value.depth()),
            _ => 0,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldType::String => write!(f, "str"),
            FieldType::Integer => write!(f, "int"),
            FieldType::Float => write!(f, "float"),
            FieldType::Boolean => write!(f, "bool"),
            FieldType::Bytes => write!(f, "bytes"),
            FieldType::List(item) => write!(f, "list[{}]", item),
            FieldType::Dict(key, value) => write!(f, "dict[{}, {}]", key, value),
        }
    }
}

/// Rust types that stand for a `FieldType`
///
/// This is the static counterpart of passing a type object in a tuple spec:
/// `FieldSpec::typed::<Vec<String>>("tags")`.
pub trait HasFieldType {
    fn field_type() -> FieldType;
}

macro_rules! impl_has_field_type {
    ($variant:ident => $($ty:ty),+ $(,)?) => {
        $(
            impl HasFieldType for $ty {
                fn field_type() -> FieldType {
                    FieldType::$variant
                }
            }
        )+
    };
}

impl_has_field_type!(String => String, str, char);
impl_has_field_type!(Integer => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_has_field_type!(Float => f32, f64);
impl_has_field_type!(Boolean => bool);
impl_has_field_type!(Bytes => [u8], Box<[u8]>);

impl<T: HasFieldType + ?Sized> HasFieldType for &T {
    fn field_type() -> FieldType {
        T::field_type()
    }
}

impl<T: HasFieldType> HasFieldType for Vec<T> {
    fn field_type() -> FieldType {
        FieldType::list(T::field_type())
    }
}

impl<K: HasFieldType, V: HasFieldType> HasFieldType for HashMap<K, V> {
    fn field_type() -> FieldType {
        FieldType::dict(K::field_type(), V::field_type())
    }
}

impl<K: HasFieldType, V: HasFieldType> HasFieldType for BTreeMap<K, V> {
    fn field_type() -> FieldType {
        FieldType::dict(K::field_type(), V::field_type())
    }
}

impl<K: HasFieldType, V: HasFieldType> HasFieldType for IndexMap<K, V> {
    fn field_type() -> FieldType {
        FieldType::dict(K::field_type(), V::field_type())
    }
}

// ── Descriptor ─────────────────────────────────────────────

/// Normalized `(name, description, type)` produced by parsing one field spec
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        FieldDescriptor {
            name: name.into(),
            description: None,
            field_type,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

// ── Specs ──────────────────────────────────────────────────

/// One field specification, as written by a caller
///
/// The two 2-tuple shapes are separate variants so the caller states which
/// one it means instead of the parser guessing from the second element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSpec {
    /// `"name"`, `"name: type"`, `"name: type; description"` or `"name: 'description'"`
    Text(String),
    /// `(name, type)`
    NameAndType { name: String, field_type: FieldType },
    /// `(name, description)`, type defaults to string
    NameAndDescription { name: String, description: String },
    /// `(name, type, description)`
    Full {
        name: String,
        field_type: FieldType,
        description: String,
    },
}

/// One element of an untyped tuple spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecValue {
    Text(String),
    Type(FieldType),
}

impl From<&str> for SpecValue {
    fn from(s: &str) -> Self {
        SpecValue::Text(s.to_string())
    }
}

impl From<FieldType> for SpecValue {
    fn from(t: FieldType) -> Self {
        SpecValue::Type(t)
    }
}

impl FieldSpec {
    /// `(name, T)` where `T` is a Rust type standing for the field type
    pub fn typed<T: HasFieldType + ?Sized>(name: impl Into<String>) -> Self {
        FieldSpec::NameAndType {
            name: name.into(),
            field_type: T::field_type(),
        }
    }

    /// Build a spec from an untyped tuple, dispatching on arity and element kinds.
    ///
    /// # Errors
    /// `MalformedSpecError` for any arity other than 2 or 3, or elements of
    /// the wrong kind (a type where a name or description belongs).
    pub fn from_tuple(items: Vec<SpecValue>) -> Result<FieldSpec> {
        let shown = format!("{:?}", items);
        let arity = items.len();
        let mut items = items.into_iter();

        match (arity, items.next(), items.next(), items.next()) {
            (2, Some(SpecValue::Text(name)), Some(SpecValue::Type(field_type)), None) => {
                Ok(FieldSpec::NameAndType { name, field_type })
            }
            (2, Some(SpecValue::Text(name)), Some(SpecValue::Text(description)), None) => {
                Ok(FieldSpec::NameAndDescription { name, description })
            }
            (
                3,
                Some(SpecValue::Text(name)),
                Some(SpecValue::Type(field_type)),
                Some(SpecValue::Text(description)),
            ) => Ok(FieldSpec::Full {
                name,
                field_type,
                description,
            }),
            (2, _, _, _) => Err(Error::malformed(
                shown,
                "expected (name, type) or (name, description)",
            )),
            (3, _, _, _) => Err(Error::malformed(shown, "expected (name, type, description)")),
            (n, _, _, _) => Err(Error::malformed(
                shown,
                format!("tuple spec must have 2 or 3 elements, found {}", n),
            )),
        }
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldSpec::Text(text) => write!(f, "{:?}", text),
            FieldSpec::NameAndType { name, field_type } => {
                write!(f, "({:?}, {})", name, field_type)
            }
            FieldSpec::NameAndDescription { name, description } => {
                write!(f, "({:?}, {:?})", name, description)
            }
            FieldSpec::Full {
                name,
                field_type,
                description,
            } => write!(f, "({:?}, {}, {:?})", name, field_type, description),
        }
    }
}

impl From<&str> for FieldSpec {
    fn from(s: &str) -> Self {
        FieldSpec::Text(s.to_string())
    }
}

impl From<String> for FieldSpec {
    fn from(s: String) -> Self {
        FieldSpec::Text(s)
    }
}

impl From<&String> for FieldSpec {
    fn from(s: &String) -> Self {
        FieldSpec::Text(s.clone())
    }
}

impl From<(&str, FieldType)> for FieldSpec {
    fn from((name, field_type): (&str, FieldType)) -> Self {
        FieldSpec::NameAndType {
            name: name.to_string(),
            field_type,
        }
    }
}

impl From<(&str, &str)> for FieldSpec {
    fn from((name, description): (&str, &str)) -> Self {
        FieldSpec::NameAndDescription {
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

impl From<(&str, FieldType, &str)> for FieldSpec {
    fn from((name, field_type, description): (&str, FieldType, &str)) -> Self {
        FieldSpec::Full {
            name: name.to_string(),
            field_type,
            description: description.to_string(),
        }
    }
}
