use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use super::next_segment;
use super::VolumeVariant;
use super::VOL_TYPE_FLEX;
use super::VOL_TYPE_HOST_PATH;
use crate::codec::SecretReference;
use crate::field::is_false;
use crate::field::FieldKind;
use crate::field::FieldSpec;
use crate::field::FlatRecord;
use crate::SelectorArity;
use crate::ShortError;

/// See: https://kubernetes.io/docs/concepts/storage/volumes/#hostpath
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum HostPathType {
    DirectoryOrCreate,
    Directory,
    FileOrCreate,
    File,
    Socket,
    CharDevice,
    BlockDevice,
}

impl HostPathType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostPathType::DirectoryOrCreate => "dir-or-create",
            HostPathType::Directory => "dir",
            HostPathType::FileOrCreate => "file-or-create",
            HostPathType::File => "file",
            HostPathType::Socket => "socket",
            HostPathType::CharDevice => "char-dev",
            HostPathType::BlockDevice => "block-dev",
        }
    }
}

impl FromStr for HostPathType {
    type Err = ShortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dir-or-create" => Ok(HostPathType::DirectoryOrCreate),
            "dir" => Ok(HostPathType::Directory),
            "file-or-create" => Ok(HostPathType::FileOrCreate),
            "file" => Ok(HostPathType::File),
            "socket" => Ok(HostPathType::Socket),
            "char-dev" => Ok(HostPathType::CharDevice),
            "block-dev" => Ok(HostPathType::BlockDevice),
            other => Err(ShortError::value(other, "unknown host path type")),
        }
    }
}

impl fmt::Display for HostPathType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `vol_id: <path>` or `vol_id: <path>:<type>`
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct HostPathVolume {
    #[serde(skip)]
    pub path: String,
    #[serde(skip)]
    pub path_type: Option<HostPathType>,
}

impl FlatRecord for HostPathVolume {
    const LABEL: &'static str = VOL_TYPE_HOST_PATH;
    const FIELDS: &'static [FieldSpec] = &[];
}

impl VolumeVariant for HostPathVolume {
    const VOL_TYPE: &'static str = VOL_TYPE_HOST_PATH;
    const SELECTOR: SelectorArity = SelectorArity::Between(1, 2);

    fn apply_selector(&mut self, selector: Vec<String>) -> Result<(), ShortError> {
        let mut segments = selector.into_iter();
        self.path = next_segment(&mut segments);
        self.path_type = segments.next().map(|raw| raw.parse::<HostPathType>()).transpose()?;
        Ok(())
    }

    fn selector(&self) -> Vec<String> {
        let mut selector = vec![self.path.clone()];
        if let Some(path_type) = self.path_type {
            selector.push(path_type.as_str().to_owned());
        }
        selector
    }
}

/// out of tree driver, `vol_id: <driver>`
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct FlexVolume {
    #[serde(skip)]
    pub driver: String,
    #[serde(rename = "fs", skip_serializing_if = "Option::is_none")]
    pub fs_type: Option<String>,
    #[serde(rename = "secret", skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<SecretReference>,
    #[serde(rename = "ro", skip_serializing_if = "is_false")]
    pub read_only: bool,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub options: HashMap<String, String>,
}

impl FlatRecord for FlexVolume {
    const LABEL: &'static str = VOL_TYPE_FLEX;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("fs_type", "fs", FieldKind::String),
        FieldSpec::optional("secret_ref", "secret", FieldKind::SecretRef),
        FieldSpec::optional("read_only", "ro", FieldKind::Bool),
        FieldSpec::optional("options", "options", FieldKind::StringMap),
    ];
}

impl VolumeVariant for FlexVolume {
    const VOL_TYPE: &'static str = VOL_TYPE_FLEX;
    const SELECTOR: SelectorArity = SelectorArity::Exactly(1);

    fn apply_selector(&mut self, selector: Vec<String>) -> Result<(), ShortError> {
        self.driver = next_segment(&mut selector.into_iter());
        Ok(())
    }

    fn selector(&self) -> Vec<String> {
        vec![self.driver.clone()]
    }
}

#[cfg(test)]
mod test {

    use serde_json::json;

    use super::FlexVolume;
    use super::HostPathType;
    use super::HostPathVolume;
    use crate::codec::SecretReference;
    use crate::field::FieldMode;
    use crate::field::FlatObject;
    use crate::volume::marshal;
    use crate::volume::unmarshal;
    use crate::ShortError;

    #[test]
    fn test_host_path() {
        let volume: HostPathVolume = unmarshal(
            &FlatObject::new(),
            vec!["/var/data".to_owned(), "dir-or-create".to_owned()],
            FieldMode::Permissive,
        )
        .expect("host path");
        assert_eq!(volume.path, "/var/data");
        assert_eq!(volume.path_type, Some(HostPathType::DirectoryOrCreate));

        let marshalled = marshal(&volume).expect("marshal");
        assert_eq!(marshalled.selector, vec!["/var/data", "dir-or-create"]);
        assert!(marshalled.fields.is_empty());
    }

    #[test]
    fn test_host_path_unknown_type() {
        let err = unmarshal::<HostPathVolume>(
            &FlatObject::new(),
            vec!["/var/data".to_owned(), "pipe".to_owned()],
            FieldMode::Permissive,
        )
        .expect_err("unknown type");
        assert!(matches!(err.root(), ShortError::Value { value, .. } if value == "pipe"));
        assert_eq!(err.context_chain(), vec!["host_path"]);
    }

    #[test]
    fn test_flex() {
        let obj = json!({
            "fs": "ext4",
            "secret": "kube-system:flex-creds",
            "options": {"mode": "fast"}
        })
        .as_object()
        .cloned()
        .expect("object");

        let volume: FlexVolume =
            unmarshal(&obj, vec!["vendor/driver".to_owned()], FieldMode::Permissive)
                .expect("flex");
        assert_eq!(volume.driver, "vendor/driver");
        assert_eq!(
            volume.secret_ref,
            Some(SecretReference::namespaced("kube-system", "flex-creds"))
        );
        assert_eq!(volume.options.get("mode").map(String::as_str), Some("fast"));
        assert_eq!(marshal(&volume).expect("marshal").fields, obj);
    }

    #[test]
    fn test_flex_options_must_be_strings() {
        let obj = json!({"options": {"retries": 3}})
            .as_object()
            .cloned()
            .expect("object");
        let err = unmarshal::<FlexVolume>(&obj, vec!["d".to_owned()], FieldMode::Permissive)
            .expect_err("number option");
        assert!(matches!(err.root(), ShortError::Shape { .. }));
    }
}
