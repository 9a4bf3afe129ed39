//! Mapping between typed records and flat objects.
//!
//! Every record declares a static table of its wire keys. The table is checked
//! before serde builds the record so that a missing key or a value of the wrong
//! JSON kind is reported as a shape error naming the key, and compact fields
//! (access modes, secret references) are decoded with their own codec errors.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use tracing::trace;

use crate::codec::AccessModes;
use crate::ResultExt;
use crate::ShortError;

pub type FlatObject = Map<String, Value>;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FieldKind {
    String,
    Bool,
    Int,
    StringList,
    StringMap,
    Object,
    /// compact access mode list, see [`AccessModes`]
    AccessModes,
    /// compact `namespace:name` reference
    SecretRef,
}

impl FieldKind {
    pub fn expected(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Bool => "boolean",
            FieldKind::Int => "integer",
            FieldKind::StringList => "array of strings",
            FieldKind::StringMap => "dictionary of strings",
            FieldKind::Object => "dictionary",
            FieldKind::AccessModes => "comma-separated access modes",
            FieldKind::SecretRef => "secret reference string",
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldKind::String | FieldKind::AccessModes | FieldKind::SecretRef => value.is_string(),
            FieldKind::Bool => value.is_boolean(),
            FieldKind::Int => value.is_i64() || value.is_u64(),
            FieldKind::StringList => value
                .as_array()
                .map(|items| items.iter().all(Value::is_string))
                .unwrap_or(false),
            FieldKind::StringMap => value
                .as_object()
                .map(|entries| entries.values().all(Value::is_string))
                .unwrap_or(false),
            FieldKind::Object => value.is_object(),
        }
    }

    /// kind check followed by the codec hook, if the field has one
    pub fn check(&self, value: &Value) -> Result<(), ShortError> {
        if !self.accepts(value) {
            return Err(ShortError::shape(self.expected(), Some(value)));
        }

        if let (FieldKind::AccessModes, Some(raw)) = (self, value.as_str()) {
            AccessModes::decode(raw)?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct FieldSpec {
    /// field name on the rust side
    pub name: &'static str,
    /// key in the flat object
    pub key: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, key: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            key,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, key: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            key,
            kind,
            required: false,
        }
    }
}

/// Record that can be projected into a flat object.
pub trait FlatRecord: Serialize + DeserializeOwned {
    /// used in error context
    const LABEL: &'static str;

    const FIELDS: &'static [FieldSpec];

    /// checks that have to pass before the record is written out
    fn validate(&self) -> Result<(), ShortError> {
        Ok(())
    }

    fn field(key: &str) -> Option<&'static FieldSpec> {
        Self::FIELDS.iter().find(|spec| spec.key == key)
    }

    fn declares(key: &str) -> bool {
        Self::field(key).is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum FieldMode {
    /// unknown keys are ignored here and left to the caller
    #[default]
    Permissive,
    /// unknown keys are an error
    Strict,
}

pub fn to_flat<T: FlatRecord>(record: &T) -> Result<FlatObject, ShortError> {
    record.validate().context(T::LABEL)?;

    let value = serde_json::to_value(record).map_err(|err| {
        ShortError::InvalidInstance {
            instance: T::LABEL.to_owned(),
            reason: format!("couldn't convert to dictionary: {err}"),
        }
    })?;

    match value {
        Value::Object(obj) => Ok(obj),
        other => Err(ShortError::InvalidInstance {
            instance: other.to_string(),
            reason: format!("{} is not a dictionary", T::LABEL),
        }),
    }
}

pub fn from_flat<T: FlatRecord>(obj: &FlatObject, mode: FieldMode) -> Result<T, ShortError> {
    if mode == FieldMode::Strict {
        if let Some(unknown) = obj.keys().find(|key| !T::declares(key)) {
            return Err(ShortError::shape(
                format!("only keys declared by {}", T::LABEL),
                Some(&Value::String(unknown.clone())),
            ));
        }
    }

    let mut declared = FlatObject::new();
    for spec in T::FIELDS {
        match obj.get(spec.key) {
            None | Some(Value::Null) => {
                if spec.required {
                    return Err(ShortError::missing_key(spec.key)).context(T::LABEL);
                }
            }
            Some(value) => {
                spec.kind
                    .check(value)
                    .context(spec.key)
                    .context(T::LABEL)?;
                trace!(label = T::LABEL, field = spec.name, key = spec.key, "populating field");
                declared.insert(spec.key.to_owned(), value.clone());
            }
        }
    }

    let declared = Value::Object(declared);
    serde_json::from_value(declared.clone())
        .map_err(|err| serde_error(declared, err))
        .context(T::LABEL)
}

/// A nested value of the wrong kind is a shape problem, anything else serde
/// rejects is a bad value.
fn serde_error(declared: Value, err: serde_json::Error) -> ShortError {
    let message = err.to_string();
    if message.starts_with("invalid type") || message.starts_with("missing field") {
        ShortError::Shape {
            expected: message,
            found: Some(declared),
        }
    } else {
        ShortError::value(declared, message)
    }
}

pub(crate) fn is_false(b: &bool) -> bool {
    !*b
}

#[cfg(test)]
mod test {

    use serde::Deserialize;
    use serde::Serialize;
    use serde_json::json;

    use super::from_flat;
    use super::to_flat;
    use super::FieldKind;
    use super::FieldMode;
    use super::FieldSpec;
    use super::FlatObject;
    use super::FlatRecord;
    use crate::codec::AccessModes;
    use crate::ShortError;

    #[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
    struct Disk {
        image: String,
        #[serde(rename = "fs", skip_serializing_if = "Option::is_none")]
        fs_type: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        monitors: Vec<String>,
        #[serde(default, rename = "ro", skip_serializing_if = "super::is_false")]
        read_only: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        modes: Option<AccessModes>,
    }

    impl FlatRecord for Disk {
        const LABEL: &'static str = "disk";
        const FIELDS: &'static [FieldSpec] = &[
            FieldSpec::required("image", "image", FieldKind::String),
            FieldSpec::optional("fs_type", "fs", FieldKind::String),
            FieldSpec::optional("monitors", "monitors", FieldKind::StringList),
            FieldSpec::optional("read_only", "ro", FieldKind::Bool),
            FieldSpec::optional("modes", "modes", FieldKind::AccessModes),
        ];
    }

    fn flat(value: serde_json::Value) -> FlatObject {
        value.as_object().cloned().expect("object")
    }

    #[test]
    fn test_from_flat_permissive() {
        let obj = flat(json!({
            "image": "foo",
            "fs": "ext4",
            "monitors": ["10.0.0.1:6789"],
            "ro": true,
            "unknown": 5
        }));

        let disk: Disk = from_flat(&obj, FieldMode::Permissive).expect("from flat");
        assert_eq!(disk.image, "foo");
        assert_eq!(disk.fs_type.as_deref(), Some("ext4"));
        assert_eq!(disk.monitors, vec!["10.0.0.1:6789"]);
        assert!(disk.read_only);
    }

    #[test]
    fn test_from_flat_strict() {
        let obj = flat(json!({"image": "foo", "unknown": 5}));
        let err = from_flat::<Disk>(&obj, FieldMode::Strict).expect_err("unknown key");
        assert!(matches!(err, ShortError::Shape { .. }));
    }

    #[test]
    fn test_missing_required() {
        let obj = flat(json!({"fs": "ext4"}));
        let err = from_flat::<Disk>(&obj, FieldMode::Permissive).expect_err("missing");
        assert!(matches!(err.root(), ShortError::Shape { found: None, .. }));

        // null counts as missing
        let obj = flat(json!({"image": null}));
        let err = from_flat::<Disk>(&obj, FieldMode::Permissive).expect_err("missing");
        assert!(matches!(err.root(), ShortError::Shape { .. }));
    }

    #[test]
    fn test_wrong_kind() {
        let obj = flat(json!({"image": 5}));
        let err = from_flat::<Disk>(&obj, FieldMode::Permissive).expect_err("wrong kind");
        assert!(matches!(err.root(), ShortError::Shape { .. }));
        assert_eq!(err.context_chain(), vec!["disk", "image"]);

        let obj = flat(json!({"image": "foo", "monitors": ["a", 1]}));
        let err = from_flat::<Disk>(&obj, FieldMode::Permissive).expect_err("wrong kind");
        assert!(matches!(err.root(), ShortError::Shape { .. }));
    }

    #[test]
    fn test_nested_wrong_kind() {
        #[derive(Serialize, Deserialize, Debug, PartialEq)]
        struct Owner {
            name: String,
        }

        #[derive(Serialize, Deserialize, Debug, PartialEq)]
        struct Claimed {
            owner: Owner,
        }

        impl FlatRecord for Claimed {
            const LABEL: &'static str = "claimed";
            const FIELDS: &'static [FieldSpec] =
                &[FieldSpec::required("owner", "owner", FieldKind::Object)];
        }

        let obj = flat(json!({"owner": {"name": 5}}));
        let err = from_flat::<Claimed>(&obj, FieldMode::Permissive).expect_err("number name");
        assert!(matches!(err.root(), ShortError::Shape { .. }));
        assert_eq!(err.context_chain(), vec!["claimed"]);

        let obj = flat(json!({"owner": {}}));
        let err = from_flat::<Claimed>(&obj, FieldMode::Permissive).expect_err("no name");
        assert!(matches!(err.root(), ShortError::Shape { .. }));
    }

    #[test]
    fn test_field_table() {
        let spec = Disk::field("fs").expect("fs");
        assert_eq!(spec.name, "fs_type");
        assert_eq!(spec.kind, FieldKind::String);
        assert!(!spec.required);
        assert!(Disk::declares("ro"));
        assert!(!Disk::declares("read_only"));
    }

    #[test]
    fn test_default_values_are_not_written_back() {
        // null reads as absent, false reads as the default, neither is written out
        let obj = flat(json!({"image": "foo", "fs": null, "ro": false}));
        let disk: Disk = from_flat(&obj, FieldMode::Permissive).expect("from flat");
        assert_eq!(disk.fs_type, None);
        assert!(!disk.read_only);
        assert_eq!(to_flat(&disk).expect("to flat"), flat(json!({"image": "foo"})));
    }

    #[test]
    fn test_codec_hook() {
        let obj = flat(json!({"image": "foo", "modes": "rw,bogus"}));
        let err = from_flat::<Disk>(&obj, FieldMode::Permissive).expect_err("bad mode");
        assert!(matches!(err.root(), ShortError::Value { value, .. } if value == "bogus"));
        assert_eq!(err.context_chain(), vec!["disk", "modes"]);
    }

    #[test]
    fn test_to_flat_omits_defaults() {
        let disk = Disk {
            image: "foo".to_owned(),
            ..Default::default()
        };
        assert_eq!(to_flat(&disk).expect("to flat"), flat(json!({"image": "foo"})));

        let disk = Disk {
            image: "foo".to_owned(),
            read_only: true,
            monitors: vec!["m1".to_owned()],
            ..Default::default()
        };
        assert_eq!(
            to_flat(&disk).expect("to flat"),
            flat(json!({"image": "foo", "ro": true, "monitors": ["m1"]}))
        );
    }
}
