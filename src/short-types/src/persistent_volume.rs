use serde::de::Error as DeError;
use serde::ser::Error as SerError;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde_json::Value;

use crate::field::FlatObject;
use crate::volume::PersistentVolumeSource;
use crate::volume::VolumeSourceSet;
use crate::PersistentVolumeMeta;
use crate::ShortError;
use crate::VariantEngine;

/// Persistent volume in short form: metadata plus exactly one source.
///
/// Serializes to a single flat object, e.g.
/// ```yaml
/// name: pv0001
/// storage: 5Gi
/// modes: rw-once
/// vol_type: nfs
/// vol_id: fileserver:/exports
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PersistentVolume {
    pub meta: PersistentVolumeMeta,
    pub source: PersistentVolumeSource,
    /// keys this crate doesn't know about, written back out unchanged
    pub extra: FlatObject,
}

impl PersistentVolume {
    pub fn new<S: Into<PersistentVolumeSource>>(meta: PersistentVolumeMeta, source: S) -> Self {
        Self {
            meta,
            source: source.into(),
            extra: FlatObject::new(),
        }
    }

    pub fn from_parts(
        meta: PersistentVolumeMeta,
        sources: VolumeSourceSet,
    ) -> Result<Self, ShortError> {
        Ok(Self::new(meta, PersistentVolumeSource::try_from(sources)?))
    }

    pub fn vol_type(&self) -> &'static str {
        self.source.vol_type()
    }
}

impl Serialize for PersistentVolume {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let obj = VariantEngine::standard()
            .encode(self)
            .map_err(S::Error::custom)?;
        obj.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PersistentVolume {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        VariantEngine::standard()
            .decode_value(&value)
            .map_err(D::Error::custom)
    }
}

/// document form, `persistent_volume:` at the top
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PersistentVolumeWrapper {
    pub persistent_volume: PersistentVolume,
}

impl From<PersistentVolume> for PersistentVolumeWrapper {
    fn from(persistent_volume: PersistentVolume) -> Self {
        Self { persistent_volume }
    }
}

#[cfg(test)]
mod test {

    use serde_json::json;

    use super::PersistentVolume;
    use super::PersistentVolumeWrapper;
    use crate::volume::FlockerVolume;
    use crate::volume::HostPathType;
    use crate::volume::HostPathVolume;
    use crate::volume::PersistentVolumeSource;
    use crate::volume::VolumeSourceSet;
    use crate::PersistentVolumeMeta;
    use crate::ShortError;

    #[test]
    fn test_json_serde() {
        let pv = PersistentVolume::new(
            PersistentVolumeMeta::named("local-pv"),
            HostPathVolume {
                path: "/mnt/data".to_owned(),
                path_type: Some(HostPathType::Directory),
            },
        );

        let value = serde_json::to_value(&pv).expect("serialize");
        assert_eq!(
            value,
            json!({"name": "local-pv", "vol_type": "host_path", "vol_id": "/mnt/data:dir"})
        );

        let back: PersistentVolume = serde_json::from_value(value).expect("deserialize");
        assert_eq!(back, pv);
    }

    #[test]
    fn test_wrapper_json() {
        let wrapper: PersistentVolumeWrapper = serde_json::from_value(json!({
            "persistent_volume": {
                "name": "pv0003",
                "storage": "5Gi",
                "vol_type": "flocker",
                "vol_id": "dataset-1"
            }
        }))
        .expect("wrapper");
        assert_eq!(wrapper.persistent_volume.vol_type(), "flocker");
        assert!(matches!(
            wrapper.persistent_volume.source,
            PersistentVolumeSource::Flocker(ref flocker) if flocker.dataset_uuid == "dataset-1"
        ));
    }

    #[test]
    fn test_from_parts() {
        let flocker = FlockerVolume {
            dataset_uuid: "dataset-1".to_owned(),
        };
        let pv = PersistentVolume::from_parts(
            PersistentVolumeMeta::named("pv1"),
            VolumeSourceSet {
                flocker: Some(flocker.clone()),
                ..Default::default()
            },
        )
        .expect("one source");
        assert_eq!(pv.source, PersistentVolumeSource::Flocker(flocker));
        assert!(pv.extra.is_empty());

        let err = PersistentVolume::from_parts(
            PersistentVolumeMeta::named("pv1"),
            VolumeSourceSet::default(),
        )
        .expect_err("no source");
        assert!(matches!(err, ShortError::EmptyVariant));
    }

    #[test]
    fn test_deserialize_error_keeps_message() {
        let err = serde_json::from_value::<PersistentVolume>(json!({"vol_type": "bogus"}))
            .expect_err("unknown type");
        assert!(err.to_string().contains("unsupported volume type (bogus)"));

        serde_json::from_value::<PersistentVolume>(json!("rbd")).expect_err("not a dictionary");
    }
}
