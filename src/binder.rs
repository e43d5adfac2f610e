//! Parameter binding.
//!
//! Caller arguments are turned into the single effective argument the
//! store's `query` call takes: a name → value map for named arguments, or
//! the whole value list for positional ones.
//!
//! Entities expose their fields through a static [`FieldDescriptor`] table,
//! usually generated with the [`entity!`](crate::entity!) macro:
//!
//! ```
//! use surreal_sql::{entity, binder::struct_to_named_args};
//!
//! struct User {
//!     id: String,
//!     name: String,
//!     age: i64,
//! }
//!
//! entity!(User {
//!     #[json = "id"] id,
//!     #[json = "name,omitempty"] name,
//!     #[json = "age"] age,
//! });
//!
//! let user = User { id: "user:mark".into(), name: "mark".into(), age: 9999 };
//! let args = struct_to_named_args(&user, &["id"]);
//! assert_eq!(args.len(), 2);
//! assert_eq!(args[0].name.as_deref(), Some("name"));
//! ```

use std::collections::BTreeMap;

use nom::{IResult, bytes::complete::take_while};

use crate::config::BinderConfig;
use crate::value::Value;

/// Tag name used when no binder configuration says otherwise.
pub const DEFAULT_TAG_NAME: &str = "json";

/// One caller-supplied argument.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedValue {
    /// Bind name, `None` for positional arguments
    pub name: Option<String>,
    /// 1-based position in the argument list
    pub ordinal: usize,
    pub value: Value,
}

/// Create a named argument, bound to `$name` in the query text.
pub fn named(name: impl Into<String>, value: impl Into<Value>) -> NamedValue {
    NamedValue {
        name: Some(name.into()),
        ordinal: 0,
        value: value.into(),
    }
}

/// Ordered argument list for a single call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    values: Vec<NamedValue>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an argument list from unnamed values.
    pub fn positional(values: Vec<Value>) -> Self {
        let mut args = Self::new();
        for value in values {
            args = args.push(value);
        }
        args
    }

    /// Append an unnamed value.
    pub fn push(mut self, value: impl Into<Value>) -> Self {
        let ordinal = self.values.len() + 1;
        self.values.push(NamedValue {
            name: None,
            ordinal,
            value: value.into(),
        });
        self
    }

    /// Append a named value.
    pub fn named(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let ordinal = self.values.len() + 1;
        self.values.push(NamedValue {
            name: Some(name.into()),
            ordinal,
            value: value.into(),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedValue> {
        self.values.iter()
    }
}

impl From<()> for Args {
    fn from(_: ()) -> Self {
        Args::new()
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        Args::positional(values)
    }
}

impl From<Vec<NamedValue>> for Args {
    fn from(values: Vec<NamedValue>) -> Self {
        let values = values
            .into_iter()
            .enumerate()
            .map(|(i, v)| NamedValue {
                ordinal: i + 1,
                ..v
            })
            .collect();
        Args { values }
    }
}

impl From<NamedValue> for Args {
    fn from(value: NamedValue) -> Self {
        Args::from(vec![value])
    }
}

/// Arguments in the shape the store's `query` call expects.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundArgs {
    Named(BTreeMap<String, Value>),
    Positional(Vec<Value>),
}

impl BoundArgs {
    /// The RPC arguments that follow the query text.
    pub fn into_wire(self) -> Vec<Value> {
        match self {
            BoundArgs::Named(map) => vec![Value::Map(map)],
            BoundArgs::Positional(values) => vec![Value::Array(values)],
        }
    }

    pub fn is_named(&self) -> bool {
        matches!(self, BoundArgs::Named(_))
    }
}

/// Resolve caller arguments into their bound form.
///
/// Named arguments win: as soon as one argument has a name, the call is
/// bound by name and unnamed values are dropped.
pub fn bind(args: &Args) -> BoundArgs {
    let any_named = args.iter().any(|a| a.name.is_some());
    if !any_named && !args.is_empty() {
        return BoundArgs::Positional(args.iter().map(|a| a.value.clone()).collect());
    }

    let mut map = BTreeMap::new();
    for arg in args.iter() {
        match &arg.name {
            Some(name) => {
                map.insert(name.clone(), arg.value.clone());
            }
            None => {
                tracing::warn!(
                    ordinal = arg.ordinal,
                    "dropping unnamed argument in a named call"
                );
            }
        }
    }
    BoundArgs::Named(map)
}

/// A field of an [`Entity`], with its serialization tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Rust field name
    pub field: &'static str,
    /// `(tag name, tag value)` pairs, e.g. `("json", "name,omitempty")`
    pub tags: &'static [(&'static str, &'static str)],
}

impl FieldDescriptor {
    /// Look up the tag value for a tag name.
    pub fn tag(&self, tag_name: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .find(|(key, _)| *key == tag_name)
            .map(|(_, value)| *value)
    }
}

/// A record type whose fields can be bound as named arguments.
///
/// Implement it with [`entity!`](crate::entity!) rather than by hand.
pub trait Entity {
    /// Field table in declaration order.
    fn fields() -> &'static [FieldDescriptor];

    /// Field values, in the same order as [`Entity::fields`].
    fn values(&self) -> Vec<Value>;
}

/// Generate an [`Entity`] implementation from a field list.
///
/// Tags are written as attributes in front of the field; fields without
/// tags are never bound. Field types must be `Clone + Into<Value>`.
#[macro_export]
macro_rules! entity {
    ($ty:ident { $( $( #[$key:ident = $tag:literal] )* $field:ident ),* $(,)? }) => {
        impl $crate::binder::Entity for $ty {
            fn fields() -> &'static [$crate::binder::FieldDescriptor] {
                const FIELDS: &[$crate::binder::FieldDescriptor] = &[
                    $(
                        $crate::binder::FieldDescriptor {
                            field: stringify!($field),
                            tags: &[ $( (stringify!($key), $tag) ),* ],
                        }
                    ),*
                ];
                FIELDS
            }

            fn values(&self) -> ::std::vec::Vec<$crate::value::Value> {
                ::std::vec![ $( $crate::value::Value::from(self.$field.clone()) ),* ]
            }
        }
    };
}

fn leading_token(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-')(input)
}

/// The bind name encoded in a tag: its leading run of `[A-Za-z0-9_-]`.
///
/// `"name,omitempty"` → `"name"`, `",omitempty"` → `""`.
pub fn tag_token(tag: &str) -> &str {
    leading_token(tag).map(|(_, token)| token).unwrap_or("")
}

/// Check whether a slice contains an element.
pub fn slice_contains<T: PartialEq>(slice: &[T], element: &T) -> bool {
    slice.iter().any(|e| e == element)
}

/// Builds named arguments from entity field tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binder {
    tag_name: String,
}

impl Default for Binder {
    fn default() -> Self {
        Self::new(DEFAULT_TAG_NAME)
    }
}

impl From<&BinderConfig> for Binder {
    fn from(config: &BinderConfig) -> Self {
        Self::new(config.tag_name.clone())
    }
}

impl Binder {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
        }
    }

    /// Tag name this binder reads.
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    /// Named arguments for every tagged field of `entity`, in declaration
    /// order, skipping untagged fields, blank tags and `excludes`.
    pub fn named_args<E: Entity>(&self, entity: &E, excludes: &[&str]) -> Vec<NamedValue> {
        let mut args = Vec::new();

        for (field, value) in E::fields().iter().zip(entity.values()) {
            let Some(tag) = field.tag(&self.tag_name) else {
                continue;
            };
            let name = tag_token(tag);
            if name.trim().is_empty() || slice_contains(excludes, &name) {
                continue;
            }

            args.push(NamedValue {
                name: Some(name.to_string()),
                ordinal: args.len() + 1,
                value,
            });
        }

        args
    }
}

/// [`Binder::named_args`] with the default `json` tag.
pub fn struct_to_named_args<E: Entity>(entity: &E, excludes: &[&str]) -> Vec<NamedValue> {
    Binder::default().named_args(entity, excludes)
}

/// [`Binder::named_args`] with an explicit tag name.
pub fn struct_to_named_args_tag_name<E: Entity>(
    entity: &E,
    tag_name: &str,
    excludes: &[&str],
) -> Vec<NamedValue> {
    Binder::new(tag_name).named_args(entity, excludes)
}
