//! Validation targets: tagged structs and bare values.

use serde::Serialize;
use serde_json::Value;

/// Rule expression that excludes a field from validation.
pub const SKIP_FIELD: &str = "-";

/// Capture a serializable value as the engine's typed field data.
///
/// Values that cannot be represented (maps with non-string keys) are
/// captured as `null`.
pub(crate) fn capture<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// A type whose fields carry rule expressions.
///
/// Fields must be returned in declaration order; failures are reported in
/// the same order.
///
/// ## Example
///
/// ```rust
/// use xvalidator::{Tagged, TaggedField};
///
/// struct Company {
///     name: String,
///     inn: String,
/// }
///
/// impl Tagged for Company {
///     fn tagged_fields(&self) -> Vec<TaggedField> {
///         vec![
///             TaggedField::new("Name", "required", &self.name),
///             TaggedField::new("INN", "required,len=12", &self.inn),
///         ]
///     }
/// }
/// ```
pub trait Tagged {
    /// List every field together with its rule expression.
    fn tagged_fields(&self) -> Vec<TaggedField>;
}

impl<T: Tagged + ?Sized> Tagged for &T {
    fn tagged_fields(&self) -> Vec<TaggedField> {
        (**self).tagged_fields()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FieldData {
    Value(Value),
    Nested(Vec<TaggedField>),
}

/// One annotated field of a [`Tagged`] target.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedField {
    pub(crate) name: String,
    pub(crate) ident: Option<String>,
    pub(crate) rules: String,
    pub(crate) data: FieldData,
}

impl TaggedField {
    /// Annotate a value with a rule expression such as `"required,email"`.
    pub fn new<T: Serialize + ?Sized>(
        name: impl Into<String>,
        rules: impl Into<String>,
        value: &T,
    ) -> Self {
        Self {
            name: name.into(),
            ident: None,
            rules: rules.into(),
            data: FieldData::Value(capture(value)),
        }
    }

    /// Set the struct field identifier when it differs from the name used
    /// in messages. Cross-field tags (`eqfield=password`) refer to fields
    /// by identifier first, then by message name.
    pub fn with_ident(mut self, ident: impl Into<String>) -> Self {
        self.ident = Some(ident.into());
        self
    }

    /// Descend into a nested struct. Its failures are reported as
    /// `name.inner_field`.
    pub fn nested<T: Tagged + ?Sized>(name: impl Into<String>, inner: &T) -> Self {
        Self {
            name: name.into(),
            ident: None,
            rules: String::new(),
            data: FieldData::Nested(inner.tagged_fields()),
        }
    }

    /// Field name as it appears in messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The struct field identifier, or the message name when none was set.
    pub fn ident(&self) -> &str {
        self.ident.as_deref().unwrap_or(&self.name)
    }

    /// The raw rule expression.
    pub fn rules(&self) -> &str {
        &self.rules
    }

    /// The captured value, `None` for nested structs.
    pub fn value(&self) -> Option<&Value> {
        match &self.data {
            FieldData::Value(v) => Some(v),
            FieldData::Nested(_) => None,
        }
    }
}

/// A bare value paired with an explicit rule expression.
#[derive(Debug, Clone, PartialEq)]
pub struct VarInput {
    pub(crate) name: Option<String>,
    pub(crate) rules: String,
    pub(crate) value: Value,
}

impl VarInput {
    /// Pair a value with a rule expression.
    pub fn new<T: Serialize + ?Sized>(rules: impl Into<String>, value: &T) -> Self {
        Self {
            name: None,
            rules: rules.into(),
            value: capture(value),
        }
    }

    /// Name used for this value in messages instead of the configured
    /// default.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Implement [`Tagged`] from a `field => "rules"` list.
///
/// Field names in messages are the Rust field identifiers; use
/// `field as "Name" => "rules"` to report a different name. Cross-field
/// tags keep referring to the identifier (`eqfield=password`).
///
/// ```rust
/// use xvalidator::tagged;
///
/// struct Signup {
///     email: String,
///     inn: String,
/// }
///
/// tagged!(Signup {
///     email => "required,email",
///     inn as "INN" => "required,len=12",
/// });
/// ```
#[macro_export]
macro_rules! tagged {
    ($ty:ty { $($field:ident $(as $alias:literal)? => $rules:expr),* $(,)? }) => {
        impl $crate::Tagged for $ty {
            fn tagged_fields(&self) -> ::std::vec::Vec<$crate::TaggedField> {
                ::std::vec![
                    $(
                        $crate::TaggedField::new(
                            $crate::__field_name!($field $(, $alias)?),
                            $rules,
                            &self.$field,
                        )
                        .with_ident(stringify!($field)),
                    )*
                ]
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_name {
    ($field:ident) => {
        stringify!($field)
    };
    ($field:ident, $alias:literal) => {
        $alias
    };
}
