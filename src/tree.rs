use crate::{Error, PropertyType, Value};

/// Behavior shared by the two property shapes held in a [`Session`]
pub trait Property {
    /// Identifier of the property. Not required to be unique within a session.
    fn id(&self) -> u32;

    /// Optional human readable name
    fn name(&self) -> Option<&str>;

    /// Declared kind. [`PropertyType::Collection`] for arrays.
    fn kind(&self) -> PropertyType;
}

/// A property holding a single scalar value
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemProperty {
    id: u32,
    name: Option<String>,
    value: Value,
}

impl ItemProperty {
    /// Create an item. The kind is the kind of the value.
    pub fn new(id: u32, value: Value) -> Self {
        ItemProperty {
            id,
            name: None,
            value,
        }
    }

    /// Create an item with an explicitly declared kind that the value must match.
    ///
    /// ```
    /// use fsgsave::{ItemProperty, PropertyType, Value};
    ///
    /// assert!(ItemProperty::with_kind(1, PropertyType::Int, Value::Int(3)).is_ok());
    /// assert!(ItemProperty::with_kind(1, PropertyType::Int, Value::Uint(3)).is_err());
    /// assert!(ItemProperty::with_kind(1, PropertyType::Collection, Value::Int(3)).is_err());
    /// ```
    pub fn with_kind(id: u32, kind: PropertyType, value: Value) -> Result<Self, Error> {
        if !kind.is_value() {
            return Err(kind.unsupported());
        }

        if value.kind() != kind {
            return Err(Error::invalid_format(format!(
                "item {} declared as {} holds a {} value",
                id,
                kind,
                value.kind()
            )));
        }

        Ok(ItemProperty::new(id, value))
    }

    /// Builder style name assignment
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }
}

impl Property for ItemProperty {
    fn id(&self) -> u32 {
        self.id
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn kind(&self) -> PropertyType {
        self.value.kind()
    }
}

impl PartialEq for ItemProperty {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.value == other.value
    }
}

/// A property holding an ordered, homogeneous sequence of values
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawArrayProperty"))]
pub struct ArrayProperty {
    id: u32,
    name: Option<String>,
    contained_type: PropertyType,
    values: Vec<Value>,
}

impl ArrayProperty {
    /// Create an empty array of the given contained kind.
    ///
    /// Arrays of arrays are not representable.
    pub fn new(id: u32, contained_type: PropertyType) -> Result<Self, Error> {
        if !contained_type.is_value() {
            return Err(Error::invalid_format(format!(
                "array {} can not contain a {}",
                id, contained_type
            )));
        }

        Ok(ArrayProperty {
            id,
            name: None,
            contained_type,
            values: Vec::new(),
        })
    }

    /// Create an array from existing values, all of which must be of the contained kind.
    ///
    /// ```
    /// use fsgsave::{ArrayProperty, PropertyType, Value};
    ///
    /// let array = ArrayProperty::from_values(4, PropertyType::Bool, vec![Value::Bool(true)]).unwrap();
    /// assert_eq!(array.len(), 1);
    /// assert!(ArrayProperty::from_values(4, PropertyType::Bool, vec![Value::Int(1)]).is_err());
    /// assert!(ArrayProperty::from_values(4, PropertyType::Collection, vec![]).is_err());
    /// ```
    pub fn from_values(
        id: u32,
        contained_type: PropertyType,
        values: Vec<Value>,
    ) -> Result<Self, Error> {
        let mut result = ArrayProperty::new(id, contained_type)?;
        result.values.reserve(values.len());
        for value in values {
            result.push(value)?;
        }
        Ok(result)
    }

    /// Builder style name assignment
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append a value that matches the contained kind
    pub fn push(&mut self, value: Value) -> Result<(), Error> {
        if value.kind() != self.contained_type {
            return Err(Error::invalid_format(format!(
                "array {} of {} can not hold a {} value",
                self.id,
                self.contained_type,
                value.kind()
            )));
        }

        self.values.push(value);
        Ok(())
    }

    pub fn contained_type(&self) -> PropertyType {
        self.contained_type
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Drop all values, keeping the contained kind
    pub fn clear(&mut self) {
        self.values.clear()
    }

    /// Number of values. Derived, never stored.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }
}

impl Property for ArrayProperty {
    fn id(&self) -> u32 {
        self.id
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn kind(&self) -> PropertyType {
        PropertyType::Collection
    }
}

impl PartialEq for ArrayProperty {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.contained_type == other.contained_type
            && self.values == other.values
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawArrayProperty {
    id: u32,
    name: Option<String>,
    contained_type: PropertyType,
    values: Vec<Value>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawArrayProperty> for ArrayProperty {
    type Error = Error;

    fn try_from(raw: RawArrayProperty) -> Result<Self, Self::Error> {
        let mut result = ArrayProperty::from_values(raw.id, raw.contained_type, raw.values)?;
        result.name = raw.name;
        Ok(result)
    }
}

/// A scope within a save holding scalar and array properties
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Session {
    pub id: u32,
    pub name: Option<String>,
    pub instance_id: u32,
    pub instance_name: Option<String>,
    pub items: Vec<ItemProperty>,
    pub arrays: Vec<ArrayProperty>,
}

impl Session {
    pub fn new(id: u32, instance_id: u32) -> Self {
        Session {
            id,
            instance_id,
            ..Session::default()
        }
    }

    pub fn with_properties(
        id: u32,
        instance_id: u32,
        items: Vec<ItemProperty>,
        arrays: Vec<ArrayProperty>,
    ) -> Self {
        Session {
            id,
            name: None,
            instance_id,
            instance_name: None,
            items,
            arrays,
        }
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn array_count(&self) -> usize {
        self.arrays.len()
    }
}

/// Names are labels only and are not part of a session's identity
impl PartialEq for Session {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.instance_id == other.instance_id
            && self.items == other.items
            && self.arrays == other.arrays
    }
}

/// Root of a save file
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaveSection {
    pub name: String,
    pub sessions: Vec<Session>,
    pub version: i32,

    /// When serializing to binary, the output is zero padded up to this many
    /// bytes. When deserializing from binary, the length of the whole input
    /// including any trailing padding.
    pub length: Option<i64>,
}

impl SaveSection {
    pub const DEFAULT_VERSION: i32 = 1;

    /// Create a section at the default version
    pub fn new(name: impl Into<String>, sessions: Vec<Session>) -> Self {
        SaveSection::with_version(name, sessions, SaveSection::DEFAULT_VERSION)
    }

    pub fn with_version(name: impl Into<String>, sessions: Vec<Session>, version: i32) -> Self {
        SaveSection {
            name: name.into(),
            sessions,
            version,
            length: None,
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

/// Structural equality: the padding target / consumed length is not compared
impl PartialEq for SaveSection {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.version == other.version && self.sessions == other.sessions
    }
}
