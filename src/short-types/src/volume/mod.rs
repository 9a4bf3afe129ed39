mod cloud;
mod local;
mod network;

pub use self::cloud::*;
pub use self::local::*;
pub use self::network::*;

use crate::field;
use crate::field::FieldMode;
use crate::field::FlatObject;
use crate::field::FlatRecord;
use crate::ResultExt;
use crate::SelectorArity;
use crate::ShortError;

pub const VOL_TYPE_GCE_PD: &str = "gce_pd";
pub const VOL_TYPE_AWS_EBS: &str = "aws_ebs";
pub const VOL_TYPE_HOST_PATH: &str = "host_path";
pub const VOL_TYPE_GLUSTERFS: &str = "glusterfs";
pub const VOL_TYPE_NFS: &str = "nfs";
pub const VOL_TYPE_ISCSI: &str = "iscsi";
pub const VOL_TYPE_CINDER: &str = "cinder";
pub const VOL_TYPE_FIBRE_CHANNEL: &str = "fc";
pub const VOL_TYPE_FLOCKER: &str = "flocker";
pub const VOL_TYPE_FLEX: &str = "flex";
pub const VOL_TYPE_VSPHERE: &str = "vsphere";
pub const VOL_TYPE_QUOBYTE: &str = "quobyte";
pub const VOL_TYPE_AZURE_DISK: &str = "azure_disk";
pub const VOL_TYPE_PHOTON_PD: &str = "photon";
pub const VOL_TYPE_PORTWORX: &str = "portworx";
pub const VOL_TYPE_RBD: &str = "rbd";

/// One shape of persistent volume source.
///
/// Fields that travel in `vol_id` are `#[serde(skip)]` on the record and are
/// moved in and out through `apply_selector` and `selector`.
pub trait VolumeVariant: FlatRecord + Into<PersistentVolumeSource> {
    const VOL_TYPE: &'static str;

    const SELECTOR: SelectorArity;

    /// fill selector fields, segment count has already been checked against `SELECTOR`
    fn apply_selector(&mut self, _selector: Vec<String>) -> Result<(), ShortError> {
        Ok(())
    }

    fn selector(&self) -> Vec<String> {
        vec![]
    }
}

/// variant written out as its parts, before the engine assembles the flat object
#[derive(Debug, Clone, PartialEq)]
pub struct MarshalledVolume {
    pub vol_type: &'static str,
    pub selector: Vec<String>,
    pub fields: FlatObject,
}

pub fn unmarshal<V: VolumeVariant>(
    obj: &FlatObject,
    selector: Vec<String>,
    mode: FieldMode,
) -> Result<V, ShortError> {
    if !V::SELECTOR.accepts(selector.len()) {
        return Err(ShortError::SelectorArity {
            vol_type: V::VOL_TYPE,
            expected: V::SELECTOR,
            found: selector,
        });
    }

    let mut volume: V = field::from_flat(obj, mode)?;
    volume.apply_selector(selector).context(V::VOL_TYPE)?;
    Ok(volume)
}

pub fn marshal<V: VolumeVariant>(volume: &V) -> Result<MarshalledVolume, ShortError> {
    Ok(MarshalledVolume {
        vol_type: V::VOL_TYPE,
        selector: volume.selector(),
        fields: field::to_flat(volume)?,
    })
}

/// take the next selector segment, empty if the selector ran out
pub(crate) fn next_segment<I: Iterator<Item = String>>(segments: &mut I) -> String {
    segments.next().unwrap_or_default()
}

/// The single active source of a persistent volume.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistentVolumeSource {
    GcePd(GcePdVolume),
    AwsEbs(AwsEbsVolume),
    HostPath(HostPathVolume),
    Glusterfs(GlusterfsVolume),
    Nfs(NfsVolume),
    Iscsi(IscsiVolume),
    Cinder(CinderVolume),
    FibreChannel(FibreChannelVolume),
    Flocker(FlockerVolume),
    Flex(FlexVolume),
    Vsphere(VsphereVolume),
    Quobyte(QuobyteVolume),
    AzureDisk(AzureDiskVolume),
    PhotonPd(PhotonPdVolume),
    Portworx(PortworxVolume),
    Rbd(RbdPersistentVolume),
}

impl PersistentVolumeSource {
    pub fn vol_type(&self) -> &'static str {
        match self {
            Self::GcePd(_) => GcePdVolume::VOL_TYPE,
            Self::AwsEbs(_) => AwsEbsVolume::VOL_TYPE,
            Self::HostPath(_) => HostPathVolume::VOL_TYPE,
            Self::Glusterfs(_) => GlusterfsVolume::VOL_TYPE,
            Self::Nfs(_) => NfsVolume::VOL_TYPE,
            Self::Iscsi(_) => IscsiVolume::VOL_TYPE,
            Self::Cinder(_) => CinderVolume::VOL_TYPE,
            Self::FibreChannel(_) => FibreChannelVolume::VOL_TYPE,
            Self::Flocker(_) => FlockerVolume::VOL_TYPE,
            Self::Flex(_) => FlexVolume::VOL_TYPE,
            Self::Vsphere(_) => VsphereVolume::VOL_TYPE,
            Self::Quobyte(_) => QuobyteVolume::VOL_TYPE,
            Self::AzureDisk(_) => AzureDiskVolume::VOL_TYPE,
            Self::PhotonPd(_) => PhotonPdVolume::VOL_TYPE,
            Self::Portworx(_) => PortworxVolume::VOL_TYPE,
            Self::Rbd(_) => RbdPersistentVolume::VOL_TYPE,
        }
    }

    pub fn marshal(&self) -> Result<MarshalledVolume, ShortError> {
        match self {
            Self::GcePd(volume) => marshal(volume),
            Self::AwsEbs(volume) => marshal(volume),
            Self::HostPath(volume) => marshal(volume),
            Self::Glusterfs(volume) => marshal(volume),
            Self::Nfs(volume) => marshal(volume),
            Self::Iscsi(volume) => marshal(volume),
            Self::Cinder(volume) => marshal(volume),
            Self::FibreChannel(volume) => marshal(volume),
            Self::Flocker(volume) => marshal(volume),
            Self::Flex(volume) => marshal(volume),
            Self::Vsphere(volume) => marshal(volume),
            Self::Quobyte(volume) => marshal(volume),
            Self::AzureDisk(volume) => marshal(volume),
            Self::PhotonPd(volume) => marshal(volume),
            Self::Portworx(volume) => marshal(volume),
            Self::Rbd(volume) => marshal(volume),
        }
    }
}

macro_rules! impl_from_volume {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        $(
            impl From<$ty> for PersistentVolumeSource {
                fn from(volume: $ty) -> Self {
                    Self::$variant(volume)
                }
            }
        )+
    };
}

impl_from_volume!(
    GcePd(GcePdVolume),
    AwsEbs(AwsEbsVolume),
    HostPath(HostPathVolume),
    Glusterfs(GlusterfsVolume),
    Nfs(NfsVolume),
    Iscsi(IscsiVolume),
    Cinder(CinderVolume),
    FibreChannel(FibreChannelVolume),
    Flocker(FlockerVolume),
    Flex(FlexVolume),
    Vsphere(VsphereVolume),
    Quobyte(QuobyteVolume),
    AzureDisk(AzureDiskVolume),
    PhotonPd(PhotonPdVolume),
    Portworx(PortworxVolume),
    Rbd(RbdPersistentVolume),
);

/// Volume sources as independent optional slots.
///
/// Useful when a source is assembled from several inputs. Only a set with
/// exactly one slot filled converts into a [`PersistentVolumeSource`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VolumeSourceSet {
    pub gce_pd: Option<GcePdVolume>,
    pub aws_ebs: Option<AwsEbsVolume>,
    pub host_path: Option<HostPathVolume>,
    pub glusterfs: Option<GlusterfsVolume>,
    pub nfs: Option<NfsVolume>,
    pub iscsi: Option<IscsiVolume>,
    pub cinder: Option<CinderVolume>,
    pub fibre_channel: Option<FibreChannelVolume>,
    pub flocker: Option<FlockerVolume>,
    pub flex: Option<FlexVolume>,
    pub vsphere: Option<VsphereVolume>,
    pub quobyte: Option<QuobyteVolume>,
    pub azure_disk: Option<AzureDiskVolume>,
    pub photon_pd: Option<PhotonPdVolume>,
    pub portworx: Option<PortworxVolume>,
    pub rbd: Option<RbdPersistentVolume>,
}

impl VolumeSourceSet {
    /// every source that is set, in declaration order
    pub fn into_sources(self) -> Vec<PersistentVolumeSource> {
        let slots: [Option<PersistentVolumeSource>; 16] = [
            self.gce_pd.map(Into::into),
            self.aws_ebs.map(Into::into),
            self.host_path.map(Into::into),
            self.glusterfs.map(Into::into),
            self.nfs.map(Into::into),
            self.iscsi.map(Into::into),
            self.cinder.map(Into::into),
            self.fibre_channel.map(Into::into),
            self.flocker.map(Into::into),
            self.flex.map(Into::into),
            self.vsphere.map(Into::into),
            self.quobyte.map(Into::into),
            self.azure_disk.map(Into::into),
            self.photon_pd.map(Into::into),
            self.portworx.map(Into::into),
            self.rbd.map(Into::into),
        ];
        slots.into_iter().flatten().collect()
    }
}

impl TryFrom<VolumeSourceSet> for PersistentVolumeSource {
    type Error = ShortError;

    fn try_from(set: VolumeSourceSet) -> Result<Self, Self::Error> {
        let mut sources = set.into_sources();
        match sources.len() {
            0 => Err(ShortError::EmptyVariant),
            1 => Ok(sources.remove(0)),
            _ => Err(ShortError::MultipleVariants(
                sources.iter().map(|source| source.vol_type()).collect(),
            )),
        }
    }
}

impl From<PersistentVolumeSource> for VolumeSourceSet {
    fn from(source: PersistentVolumeSource) -> Self {
        let mut set = Self::default();
        match source {
            PersistentVolumeSource::GcePd(volume) => set.gce_pd = Some(volume),
            PersistentVolumeSource::AwsEbs(volume) => set.aws_ebs = Some(volume),
            PersistentVolumeSource::HostPath(volume) => set.host_path = Some(volume),
            PersistentVolumeSource::Glusterfs(volume) => set.glusterfs = Some(volume),
            PersistentVolumeSource::Nfs(volume) => set.nfs = Some(volume),
            PersistentVolumeSource::Iscsi(volume) => set.iscsi = Some(volume),
            PersistentVolumeSource::Cinder(volume) => set.cinder = Some(volume),
            PersistentVolumeSource::FibreChannel(volume) => set.fibre_channel = Some(volume),
            PersistentVolumeSource::Flocker(volume) => set.flocker = Some(volume),
            PersistentVolumeSource::Flex(volume) => set.flex = Some(volume),
            PersistentVolumeSource::Vsphere(volume) => set.vsphere = Some(volume),
            PersistentVolumeSource::Quobyte(volume) => set.quobyte = Some(volume),
            PersistentVolumeSource::AzureDisk(volume) => set.azure_disk = Some(volume),
            PersistentVolumeSource::PhotonPd(volume) => set.photon_pd = Some(volume),
            PersistentVolumeSource::Portworx(volume) => set.portworx = Some(volume),
            PersistentVolumeSource::Rbd(volume) => set.rbd = Some(volume),
        }
        set
    }
}

#[cfg(test)]
mod test {

    use super::CinderVolume;
    use super::NfsVolume;
    use super::PersistentVolumeSource;
    use super::VolumeSourceSet;
    use crate::ShortError;

    #[test]
    fn test_set_with_one_source() {
        let set = VolumeSourceSet {
            cinder: Some(CinderVolume {
                volume_id: "vol-1".to_owned(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let source = PersistentVolumeSource::try_from(set.clone()).expect("one source");
        assert_eq!(source.vol_type(), "cinder");
        assert_eq!(VolumeSourceSet::from(source), set);
    }

    #[test]
    fn test_empty_set() {
        let err = PersistentVolumeSource::try_from(VolumeSourceSet::default())
            .expect_err("no source");
        assert!(matches!(err, ShortError::EmptyVariant));
    }

    #[test]
    fn test_multiple_sources() {
        let set = VolumeSourceSet {
            cinder: Some(CinderVolume::default()),
            nfs: Some(NfsVolume::default()),
            ..Default::default()
        };
        let err = PersistentVolumeSource::try_from(set).expect_err("two sources");
        match err {
            ShortError::MultipleVariants(tags) => assert_eq!(tags, vec!["nfs", "cinder"]),
            other => panic!("unexpected error: {other}"),
        }
    }
}
