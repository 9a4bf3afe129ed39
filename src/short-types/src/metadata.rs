use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use crate::codec::AccessModes;
use crate::field::FieldKind;
use crate::field::FieldSpec;
use crate::field::FlatRecord;
use crate::ResultExt;
use crate::ShortError;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum PersistentVolumeReclaimPolicy {
    Recycle,
    Delete,
    Retain,
}

/// points at the claim bound to this volume
#[derive(Deserialize, Serialize, Debug, Default, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectReference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_path: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Eq, PartialEq)]
pub enum PersistentVolumePhase {
    Pending,
    Available,
    Bound,
    Released,
    Failed,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, Eq, PartialEq)]
#[serde(default)]
pub struct PersistentVolumeStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<PersistentVolumePhase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Fields shared by every volume source.
///
/// They live in the same flat object as the source's own keys and win when
/// both use the same key.
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct PersistentVolumeMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub annotations: HashMap<String, String>,

    /// quantity such as `10Gi`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
    #[serde(rename = "modes", skip_serializing_if = "Option::is_none")]
    pub access_modes: Option<AccessModes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim: Option<ObjectReference>,
    #[serde(rename = "reclaim", skip_serializing_if = "Option::is_none")]
    pub reclaim_policy: Option<PersistentVolumeReclaimPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,

    /// comma-separated list of options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mount_options: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PersistentVolumeStatus>,
}

impl PersistentVolumeMeta {
    pub fn named<S: Into<String>>(name: S) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// mount options split on commas
    pub fn mount_option_list(&self) -> Vec<&str> {
        match &self.mount_options {
            Some(options) if !options.is_empty() => options.split(',').collect(),
            _ => vec![],
        }
    }
}

impl FlatRecord for PersistentVolumeMeta {
    const LABEL: &'static str = "persistent volume metadata";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("version", "version", FieldKind::String),
        FieldSpec::optional("cluster", "cluster", FieldKind::String),
        FieldSpec::optional("name", "name", FieldKind::String),
        FieldSpec::optional("namespace", "namespace", FieldKind::String),
        FieldSpec::optional("labels", "labels", FieldKind::StringMap),
        FieldSpec::optional("annotations", "annotations", FieldKind::StringMap),
        FieldSpec::optional("storage", "storage", FieldKind::String),
        FieldSpec::optional("access_modes", "modes", FieldKind::AccessModes),
        FieldSpec::optional("claim", "claim", FieldKind::Object),
        FieldSpec::optional("reclaim_policy", "reclaim", FieldKind::String),
        FieldSpec::optional("storage_class", "storage_class", FieldKind::String),
        FieldSpec::optional("mount_options", "mount_options", FieldKind::String),
        FieldSpec::optional("status", "status", FieldKind::Object),
    ];

    // serde would only report a bad mode as a string, surface the typed error instead
    fn validate(&self) -> Result<(), ShortError> {
        if let Some(modes) = &self.access_modes {
            modes.encode().context("modes")?;
        }
        Ok(())
    }
}
