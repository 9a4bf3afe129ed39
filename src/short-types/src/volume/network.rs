use serde::Deserialize;
use serde::Serialize;

use super::next_segment;
use super::VolumeVariant;
use super::VOL_TYPE_FIBRE_CHANNEL;
use super::VOL_TYPE_FLOCKER;
use super::VOL_TYPE_GLUSTERFS;
use super::VOL_TYPE_ISCSI;
use super::VOL_TYPE_NFS;
use super::VOL_TYPE_QUOBYTE;
use super::VOL_TYPE_RBD;
use crate::codec::SecretReference;
use crate::field::is_false;
use crate::field::FieldKind;
use crate::field::FieldSpec;
use crate::field::FlatRecord;
use crate::SelectorArity;
use crate::ShortError;

const READ_ONLY_SEGMENT: &str = "ro";

/// `vol_id: <endpoints>:<path>`
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct GlusterfsVolume {
    #[serde(skip)]
    pub endpoints_name: String,
    #[serde(skip)]
    pub path: String,
    #[serde(rename = "ro", skip_serializing_if = "is_false")]
    pub read_only: bool,
}

impl FlatRecord for GlusterfsVolume {
    const LABEL: &'static str = VOL_TYPE_GLUSTERFS;
    const FIELDS: &'static [FieldSpec] =
        &[FieldSpec::optional("read_only", "ro", FieldKind::Bool)];
}

impl VolumeVariant for GlusterfsVolume {
    const VOL_TYPE: &'static str = VOL_TYPE_GLUSTERFS;
    const SELECTOR: SelectorArity = SelectorArity::Exactly(2);

    fn apply_selector(&mut self, selector: Vec<String>) -> Result<(), ShortError> {
        let mut segments = selector.into_iter();
        self.endpoints_name = next_segment(&mut segments);
        self.path = next_segment(&mut segments);
        Ok(())
    }

    fn selector(&self) -> Vec<String> {
        vec![self.endpoints_name.clone(), self.path.clone()]
    }
}

/// `vol_id: <server>:<path>` with an optional trailing `:ro`
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct NfsVolume {
    #[serde(skip)]
    pub server: String,
    #[serde(skip)]
    pub path: String,
    #[serde(skip)]
    pub read_only: bool,
}

impl FlatRecord for NfsVolume {
    const LABEL: &'static str = VOL_TYPE_NFS;
    const FIELDS: &'static [FieldSpec] = &[];
}

impl VolumeVariant for NfsVolume {
    const VOL_TYPE: &'static str = VOL_TYPE_NFS;
    const SELECTOR: SelectorArity = SelectorArity::Between(2, 3);

    fn apply_selector(&mut self, selector: Vec<String>) -> Result<(), ShortError> {
        let mut segments = selector.into_iter();
        self.server = next_segment(&mut segments);
        self.path = next_segment(&mut segments);
        self.read_only = match segments.next() {
            None => false,
            Some(flag) if flag == READ_ONLY_SEGMENT => true,
            Some(flag) => {
                return Err(ShortError::value(
                    flag,
                    "expected (ro) as the last nfs selector segment",
                ))
            }
        };
        Ok(())
    }

    fn selector(&self) -> Vec<String> {
        let mut selector = vec![self.server.clone(), self.path.clone()];
        if self.read_only {
            selector.push(READ_ONLY_SEGMENT.to_owned());
        }
        selector
    }
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct IscsiVolume {
    pub target_portal: String,
    pub iqn: String,
    pub lun: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscsi_interface: Option<String>,
    #[serde(rename = "fs", skip_serializing_if = "Option::is_none")]
    pub fs_type: Option<String>,
    #[serde(rename = "ro", skip_serializing_if = "is_false")]
    pub read_only: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub portals: Vec<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub chap_discovery: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub chap_session: bool,
    #[serde(rename = "secret", skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<SecretReference>,
    #[serde(rename = "initiator", skip_serializing_if = "Option::is_none")]
    pub initiator_name: Option<String>,
}

impl FlatRecord for IscsiVolume {
    const LABEL: &'static str = VOL_TYPE_ISCSI;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("target_portal", "target_portal", FieldKind::String),
        FieldSpec::required("iqn", "iqn", FieldKind::String),
        FieldSpec::required("lun", "lun", FieldKind::Int),
        FieldSpec::optional("iscsi_interface", "iscsi_interface", FieldKind::String),
        FieldSpec::optional("fs_type", "fs", FieldKind::String),
        FieldSpec::optional("read_only", "ro", FieldKind::Bool),
        FieldSpec::optional("portals", "portals", FieldKind::StringList),
        FieldSpec::optional("chap_discovery", "chap_discovery", FieldKind::Bool),
        FieldSpec::optional("chap_session", "chap_session", FieldKind::Bool),
        FieldSpec::optional("secret_ref", "secret", FieldKind::SecretRef),
        FieldSpec::optional("initiator_name", "initiator", FieldKind::String),
    ];
}

impl VolumeVariant for IscsiVolume {
    const VOL_TYPE: &'static str = VOL_TYPE_ISCSI;
    const SELECTOR: SelectorArity = SelectorArity::Exactly(0);
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct FibreChannelVolume {
    #[serde(rename = "wwn", skip_serializing_if = "Vec::is_empty")]
    pub target_wwns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lun: Option<i32>,
    #[serde(rename = "fs", skip_serializing_if = "Option::is_none")]
    pub fs_type: Option<String>,
    #[serde(rename = "ro", skip_serializing_if = "is_false")]
    pub read_only: bool,
    #[serde(rename = "wwid", skip_serializing_if = "Vec::is_empty")]
    pub wwids: Vec<String>,
}

impl FlatRecord for FibreChannelVolume {
    const LABEL: &'static str = VOL_TYPE_FIBRE_CHANNEL;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("target_wwns", "wwn", FieldKind::StringList),
        FieldSpec::optional("lun", "lun", FieldKind::Int),
        FieldSpec::optional("fs_type", "fs", FieldKind::String),
        FieldSpec::optional("read_only", "ro", FieldKind::Bool),
        FieldSpec::optional("wwids", "wwid", FieldKind::StringList),
    ];
}

impl VolumeVariant for FibreChannelVolume {
    const VOL_TYPE: &'static str = VOL_TYPE_FIBRE_CHANNEL;
    const SELECTOR: SelectorArity = SelectorArity::Exactly(0);
}

/// `vol_id: <dataset_uuid>`
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct FlockerVolume {
    #[serde(skip)]
    pub dataset_uuid: String,
}

impl FlatRecord for FlockerVolume {
    const LABEL: &'static str = VOL_TYPE_FLOCKER;
    const FIELDS: &'static [FieldSpec] = &[];
}

impl VolumeVariant for FlockerVolume {
    const VOL_TYPE: &'static str = VOL_TYPE_FLOCKER;
    const SELECTOR: SelectorArity = SelectorArity::Exactly(1);

    fn apply_selector(&mut self, selector: Vec<String>) -> Result<(), ShortError> {
        self.dataset_uuid = next_segment(&mut selector.into_iter());
        Ok(())
    }

    fn selector(&self) -> Vec<String> {
        vec![self.dataset_uuid.clone()]
    }
}

/// `vol_id: <registry>:<volume>`
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct QuobyteVolume {
    #[serde(skip)]
    pub registry: String,
    #[serde(skip)]
    pub volume: String,
    #[serde(rename = "ro", skip_serializing_if = "is_false")]
    pub read_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl FlatRecord for QuobyteVolume {
    const LABEL: &'static str = VOL_TYPE_QUOBYTE;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional("read_only", "ro", FieldKind::Bool),
        FieldSpec::optional("user", "user", FieldKind::String),
        FieldSpec::optional("group", "group", FieldKind::String),
    ];
}

impl VolumeVariant for QuobyteVolume {
    const VOL_TYPE: &'static str = VOL_TYPE_QUOBYTE;
    const SELECTOR: SelectorArity = SelectorArity::Exactly(2);

    fn apply_selector(&mut self, selector: Vec<String>) -> Result<(), ShortError> {
        let mut segments = selector.into_iter();
        self.registry = next_segment(&mut segments);
        self.volume = next_segment(&mut segments);
        Ok(())
    }

    fn selector(&self) -> Vec<String> {
        vec![self.registry.clone(), self.volume.clone()]
    }
}

/// ceph block device
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct RbdPersistentVolume {
    #[serde(rename = "monitors")]
    pub ceph_monitors: Vec<String>,
    #[serde(rename = "image")]
    pub rbd_image: String,
    #[serde(rename = "fs", skip_serializing_if = "Option::is_none")]
    pub fs_type: Option<String>,
    #[serde(rename = "pool", skip_serializing_if = "Option::is_none")]
    pub rbd_pool: Option<String>,
    #[serde(rename = "user", skip_serializing_if = "Option::is_none")]
    pub rados_user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyring: Option<String>,
    #[serde(rename = "secret", skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<SecretReference>,
    #[serde(rename = "ro", skip_serializing_if = "is_false")]
    pub read_only: bool,
}

impl FlatRecord for RbdPersistentVolume {
    const LABEL: &'static str = VOL_TYPE_RBD;
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("ceph_monitors", "monitors", FieldKind::StringList),
        FieldSpec::required("rbd_image", "image", FieldKind::String),
        FieldSpec::optional("fs_type", "fs", FieldKind::String),
        FieldSpec::optional("rbd_pool", "pool", FieldKind::String),
        FieldSpec::optional("rados_user", "user", FieldKind::String),
        FieldSpec::optional("keyring", "keyring", FieldKind::String),
        FieldSpec::optional("secret_ref", "secret", FieldKind::SecretRef),
        FieldSpec::optional("read_only", "ro", FieldKind::Bool),
    ];
}

impl VolumeVariant for RbdPersistentVolume {
    const VOL_TYPE: &'static str = VOL_TYPE_RBD;
    const SELECTOR: SelectorArity = SelectorArity::Exactly(0);
}
