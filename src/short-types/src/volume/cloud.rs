use serde::Deserialize;
use serde::Serialize;

use super::next_segment;
use super::VolumeVariant;
use super::VOL_TYPE_AWS_EBS;
use super::VOL_TYPE_AZURE_DISK;
use super::VOL_TYPE_CINDER;
use super::VOL_TYPE_GCE_PD;
use super::VOL_TYPE_PHOTON_PD;
use super::VOL_TYPE_PORTWORX;
use super::VOL_TYPE_VSPHERE;
use crate::field::is_false;
use crate::field::FieldKind;
use crate::field::FieldSpec;
use crate::field::FlatRecord;
use crate::SelectorArity;
use crate::ShortError;

/// `vol_id: <pd_name>`
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct GcePdVolume {
    #[serde(skip)]
    pub pd_name: String,
    #[serde(rename = "fs", skip_serializing_if = "Option::is_none")]
    pub fs_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition: Option<i32>,
    #[serde(rename = "ro", skip_serializing_if = "is_false")]
    pub read_only: bool,
}

impl FlatRecord for GcePdVolume {
    const LABEL: &'static str = VOL_TYPE_GCE_PD;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("fs_type", "fs", FieldKind::String),
        FieldSpec::optional("partition", "partition", FieldKind::Int),
        FieldSpec::optional("read_only", "ro", FieldKind::Bool),
    ];
}

impl VolumeVariant for GcePdVolume {
    const VOL_TYPE: &'static str = VOL_TYPE_GCE_PD;
    const SELECTOR: SelectorArity = SelectorArity::Exactly(1);

    fn apply_selector(&mut self, selector: Vec<String>) -> Result<(), ShortError> {
        self.pd_name = next_segment(&mut selector.into_iter());
        Ok(())
    }

    fn selector(&self) -> Vec<String> {
        vec![self.pd_name.clone()]
    }
}

/// `vol_id: <volume_id>`
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct AwsEbsVolume {
    #[serde(skip)]
    pub volume_id: String,
    #[serde(rename = "fs", skip_serializing_if = "Option::is_none")]
    pub fs_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition: Option<i32>,
    #[serde(rename = "ro", skip_serializing_if = "is_false")]
    pub read_only: bool,
}

impl FlatRecord for AwsEbsVolume {
    const LABEL: &'static str = VOL_TYPE_AWS_EBS;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("fs_type", "fs", FieldKind::String),
        FieldSpec::optional("partition", "partition", FieldKind::Int),
        FieldSpec::optional("read_only", "ro", FieldKind::Bool),
    ];
}

impl VolumeVariant for AwsEbsVolume {
    const VOL_TYPE: &'static str = VOL_TYPE_AWS_EBS;
    const SELECTOR: SelectorArity = SelectorArity::Exactly(1);

    fn apply_selector(&mut self, selector: Vec<String>) -> Result<(), ShortError> {
        self.volume_id = next_segment(&mut selector.into_iter());
        Ok(())
    }

    fn selector(&self) -> Vec<String> {
        vec![self.volume_id.clone()]
    }
}

/// openstack cinder, `vol_id: <volume_id>`
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct CinderVolume {
    #[serde(skip)]
    pub volume_id: String,
    #[serde(rename = "fs", skip_serializing_if = "Option::is_none")]
    pub fs_type: Option<String>,
    #[serde(rename = "ro", skip_serializing_if = "is_false")]
    pub read_only: bool,
}

impl FlatRecord for CinderVolume {
    const LABEL: &'static str = VOL_TYPE_CINDER;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("fs_type", "fs", FieldKind::String),
        FieldSpec::optional("read_only", "ro", FieldKind::Bool),
    ];
}

impl VolumeVariant for CinderVolume {
    const VOL_TYPE: &'static str = VOL_TYPE_CINDER;
    const SELECTOR: SelectorArity = SelectorArity::Exactly(1);

    fn apply_selector(&mut self, selector: Vec<String>) -> Result<(), ShortError> {
        self.volume_id = next_segment(&mut selector.into_iter());
        Ok(())
    }

    fn selector(&self) -> Vec<String> {
        vec![self.volume_id.clone()]
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum AzureDataDiskCachingMode {
    None,
    ReadOnly,
    ReadWrite,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum AzureDataDiskKind {
    Shared,
    Dedicated,
    Managed,
}

/// The disk uri contains colons, so both identifiers are regular keys.
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct AzureDiskVolume {
    pub disk_name: String,
    pub disk_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<AzureDataDiskCachingMode>,
    #[serde(rename = "fs", skip_serializing_if = "Option::is_none")]
    pub fs_type: Option<String>,
    #[serde(rename = "ro", skip_serializing_if = "is_false")]
    pub read_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<AzureDataDiskKind>,
}

impl FlatRecord for AzureDiskVolume {
    const LABEL: &'static str = VOL_TYPE_AZURE_DISK;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("disk_name", "disk_name", FieldKind::String),
        FieldSpec::required("disk_uri", "disk_uri", FieldKind::String),
        FieldSpec::optional("cache", "cache", FieldKind::String),
        FieldSpec::optional("fs_type", "fs", FieldKind::String),
        FieldSpec::optional("read_only", "ro", FieldKind::Bool),
        FieldSpec::optional("kind", "kind", FieldKind::String),
    ];
}

impl VolumeVariant for AzureDiskVolume {
    const VOL_TYPE: &'static str = VOL_TYPE_AZURE_DISK;
    const SELECTOR: SelectorArity = SelectorArity::Exactly(0);
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, Eq, PartialEq)]
#[serde(default)]
pub struct VsphereStoragePolicy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// `vol_id: <volume_path>`
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct VsphereVolume {
    #[serde(skip)]
    pub volume_path: String,
    #[serde(rename = "fs", skip_serializing_if = "Option::is_none")]
    pub fs_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<VsphereStoragePolicy>,
}

impl FlatRecord for VsphereVolume {
    const LABEL: &'static str = VOL_TYPE_VSPHERE;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("fs_type", "fs", FieldKind::String),
        FieldSpec::optional("policy", "policy", FieldKind::Object),
    ];
}

impl VolumeVariant for VsphereVolume {
    const VOL_TYPE: &'static str = VOL_TYPE_VSPHERE;
    const SELECTOR: SelectorArity = SelectorArity::Exactly(1);

    fn apply_selector(&mut self, selector: Vec<String>) -> Result<(), ShortError> {
        self.volume_path = next_segment(&mut selector.into_iter());
        Ok(())
    }

    fn selector(&self) -> Vec<String> {
        vec![self.volume_path.clone()]
    }
}

/// `vol_id: <pd_id>` or `vol_id: <pd_id>:<fs>`
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct PhotonPdVolume {
    #[serde(skip)]
    pub pd_id: String,
    #[serde(skip)]
    pub fs_type: Option<String>,
}

impl FlatRecord for PhotonPdVolume {
    const LABEL: &'static str = VOL_TYPE_PHOTON_PD;
    const FIELDS: &'static [FieldSpec] = &[];
}

impl VolumeVariant for PhotonPdVolume {
    const VOL_TYPE: &'static str = VOL_TYPE_PHOTON_PD;
    const SELECTOR: SelectorArity = SelectorArity::Between(1, 2);

    fn apply_selector(&mut self, selector: Vec<String>) -> Result<(), ShortError> {
        let mut segments = selector.into_iter();
        self.pd_id = next_segment(&mut segments);
        self.fs_type = segments.next();
        Ok(())
    }

    fn selector(&self) -> Vec<String> {
        let mut selector = vec![self.pd_id.clone()];
        if let Some(fs_type) = &self.fs_type {
            selector.push(fs_type.clone());
        }
        selector
    }
}

/// `vol_id: <volume_id>`
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct PortworxVolume {
    #[serde(skip)]
    pub volume_id: String,
    #[serde(rename = "fs", skip_serializing_if = "Option::is_none")]
    pub fs_type: Option<String>,
    #[serde(rename = "ro", skip_serializing_if = "is_false")]
    pub read_only: bool,
}

impl FlatRecord for PortworxVolume {
    const LABEL: &'static str = VOL_TYPE_PORTWORX;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("fs_type", "fs", FieldKind::String),
        FieldSpec::optional("read_only", "ro", FieldKind::Bool),
    ];
}

impl VolumeVariant for PortworxVolume {
    const VOL_TYPE: &'static str = VOL_TYPE_PORTWORX;
    const SELECTOR: SelectorArity = SelectorArity::Exactly(1);

    fn apply_selector(&mut self, selector: Vec<String>) -> Result<(), ShortError> {
        self.volume_id = next_segment(&mut selector.into_iter());
        Ok(())
    }

    fn selector(&self) -> Vec<String> {
        vec![self.volume_id.clone()]
    }
}
