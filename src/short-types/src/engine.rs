use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use serde_json::Value;
use tracing::debug;
use tracing::trace;

use crate::codec::selector;
use crate::field;
use crate::field::FieldMode;
use crate::field::FieldSpec;
use crate::field::FlatObject;
use crate::field::FlatRecord;
use crate::volume::*;
use crate::PersistentVolume;
use crate::PersistentVolumeMeta;
use crate::ResultExt;
use crate::SelectorArity;
use crate::ShortError;

/// key holding the volume type
pub const VOL_TYPE_KEY: &str = "vol_type";
/// key holding the colon-joined selector
pub const VOL_ID_KEY: &str = "vol_id";

const SOURCE_CONTEXT: &str = "volume source";

type DecodeFn =
    fn(&FlatObject, Vec<String>, FieldMode) -> Result<PersistentVolumeSource, ShortError>;

fn decode_variant<V: VolumeVariant>(
    obj: &FlatObject,
    selector: Vec<String>,
    mode: FieldMode,
) -> Result<PersistentVolumeSource, ShortError> {
    unmarshal::<V>(obj, selector, mode).map(Into::into)
}

/// what the engine knows about one volume type
#[derive(Clone, Copy)]
pub struct VariantEntry {
    pub vol_type: &'static str,
    pub selector: SelectorArity,
    pub fields: &'static [FieldSpec],
    decode: DecodeFn,
}

impl VariantEntry {
    pub fn of<V: VolumeVariant>() -> Self {
        Self {
            vol_type: V::VOL_TYPE,
            selector: V::SELECTOR,
            fields: V::FIELDS,
            decode: decode_variant::<V>,
        }
    }

    pub fn declares(&self, key: &str) -> bool {
        self.fields.iter().any(|spec| spec.key == key)
    }

    /// key read by either this volume type or the metadata
    fn recognizes(&self, key: &str) -> bool {
        key == VOL_TYPE_KEY
            || key == VOL_ID_KEY
            || self.declares(key)
            || PersistentVolumeMeta::declares(key)
    }
}

impl fmt::Debug for VariantEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantEntry")
            .field("vol_type", &self.vol_type)
            .field("selector", &self.selector)
            .field("fields", &self.fields.len())
            .finish()
    }
}

/// Volume types by tag. Built once and then only read.
#[derive(Debug, Default)]
pub struct VariantRegistry {
    entries: HashMap<&'static str, VariantEntry>,
}

impl VariantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<V: VolumeVariant>(mut self) -> Self {
        self.entries.insert(V::VOL_TYPE, VariantEntry::of::<V>());
        self
    }

    /// every persistent volume source
    pub fn persistent_volumes() -> Self {
        Self::new()
            .register::<GcePdVolume>()
            .register::<AwsEbsVolume>()
            .register::<HostPathVolume>()
            .register::<GlusterfsVolume>()
            .register::<NfsVolume>()
            .register::<IscsiVolume>()
            .register::<CinderVolume>()
            .register::<FibreChannelVolume>()
            .register::<FlockerVolume>()
            .register::<FlexVolume>()
            .register::<VsphereVolume>()
            .register::<QuobyteVolume>()
            .register::<AzureDiskVolume>()
            .register::<PhotonPdVolume>()
            .register::<PortworxVolume>()
            .register::<RbdPersistentVolume>()
    }

    /// process wide registry of every persistent volume source
    pub fn standard() -> &'static Self {
        static STANDARD: OnceLock<VariantRegistry> = OnceLock::new();
        STANDARD.get_or_init(Self::persistent_volumes)
    }

    pub fn get(&self, vol_type: &str) -> Option<&VariantEntry> {
        self.entries.get(vol_type)
    }

    pub fn vol_types(&self) -> Vec<&'static str> {
        let mut tags: Vec<_> = self.entries.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct DecodeOptions {
    /// how keys that nobody recognizes are treated
    pub mode: FieldMode,
}

impl DecodeOptions {
    pub fn strict() -> Self {
        Self {
            mode: FieldMode::Strict,
        }
    }
}

/// Overlay `overlay` onto `base`. Keys of `overlay` win.
pub fn merge(mut base: FlatObject, overlay: FlatObject) -> FlatObject {
    for (key, value) in overlay {
        if base.contains_key(&key) {
            trace!(%key, "overriding key");
        }
        base.insert(key, value);
    }
    base
}

/// Converts persistent volumes between the flat short form and [`PersistentVolume`].
#[derive(Debug, Clone, Copy)]
pub struct VariantEngine<'a> {
    registry: &'a VariantRegistry,
    options: DecodeOptions,
}

impl VariantEngine<'static> {
    pub fn standard() -> Self {
        Self::new(VariantRegistry::standard(), DecodeOptions::default())
    }
}

impl<'a> VariantEngine<'a> {
    pub fn new(registry: &'a VariantRegistry, options: DecodeOptions) -> Self {
        Self { registry, options }
    }

    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &'a VariantRegistry {
        self.registry
    }

    pub fn decode_value(&self, value: &Value) -> Result<PersistentVolume, ShortError> {
        match value {
            Value::Object(obj) => self.decode(obj),
            other => Err(ShortError::shape(
                "dictionary for persistent volume",
                Some(other),
            )),
        }
    }

    pub fn decode(&self, obj: &FlatObject) -> Result<PersistentVolume, ShortError> {
        let vol_type = match obj.get(VOL_TYPE_KEY) {
            None | Some(Value::Null) => return Err(ShortError::UnsupportedVariant(String::new())),
            Some(Value::String(vol_type)) => vol_type.as_str(),
            Some(other) => {
                return Err(ShortError::shape(
                    format!("string for key \"{VOL_TYPE_KEY}\""),
                    Some(other),
                ))
            }
        };

        let entry = self
            .registry
            .get(vol_type)
            .ok_or_else(|| ShortError::UnsupportedVariant(vol_type.to_owned()))?;

        let segments = match obj.get(VOL_ID_KEY) {
            None => vec![],
            Some(Value::String(vol_id)) => selector::parse(vol_id),
            Some(other) => {
                return Err(ShortError::shape(
                    format!("string for key \"{VOL_ID_KEY}\""),
                    Some(other),
                ))
            }
        };

        debug!(vol_type, selector = ?segments, "decoding persistent volume");

        let extra = self.extra_keys(entry, obj)?;

        let source = (entry.decode)(obj, segments, FieldMode::Permissive).context(SOURCE_CONTEXT)?;
        let meta: PersistentVolumeMeta = field::from_flat(obj, FieldMode::Permissive)?;

        Ok(PersistentVolume {
            meta,
            source,
            extra,
        })
    }

    /// keys that neither the volume type nor the metadata declare
    fn extra_keys(&self, entry: &VariantEntry, obj: &FlatObject) -> Result<FlatObject, ShortError> {
        let mut extra = FlatObject::new();
        for (key, value) in obj {
            if entry.recognizes(key) {
                continue;
            }

            if self.options.mode == FieldMode::Strict {
                return Err(ShortError::shape(
                    format!("only keys known to {}", entry.vol_type),
                    Some(&Value::String(key.clone())),
                ));
            }

            trace!(%key, vol_type = entry.vol_type, "keeping unrecognized key");
            extra.insert(key.clone(), value.clone());
        }
        Ok(extra)
    }

    /// flat form of the source alone, `vol_type` and `vol_id` included
    pub fn encode_source(&self, source: &PersistentVolumeSource) -> Result<FlatObject, ShortError> {
        let entry = self.entry(source)?;

        let MarshalledVolume {
            vol_type,
            selector: segments,
            mut fields,
        } = source.marshal().context(SOURCE_CONTEXT)?;

        debug!(vol_type, selector = ?segments, "encoding persistent volume");

        fields.insert(VOL_TYPE_KEY.to_owned(), Value::String(vol_type.to_owned()));
        if !segments.is_empty() {
            let vol_id = selector::format(&segments)
                .context(vol_type)
                .context(SOURCE_CONTEXT)?;
            if vol_id.is_empty() && !entry.selector.accepts(0) {
                return Err(ShortError::invalid_instance(
                    &segments,
                    format!("empty selector for {vol_type}"),
                ))
                .context(SOURCE_CONTEXT);
            }
            fields.insert(VOL_ID_KEY.to_owned(), Value::String(vol_id));
        }

        Ok(fields)
    }

    fn entry(&self, source: &PersistentVolumeSource) -> Result<&'a VariantEntry, ShortError> {
        self.registry
            .get(source.vol_type())
            .ok_or_else(|| ShortError::UnsupportedVariant(source.vol_type().to_owned()))
    }

    /// Extras are written first and lose to source and metadata keys.
    /// An extra under a key the volume type or the metadata reads is dropped,
    /// otherwise it would come back as part of the record on the next decode.
    pub fn encode(&self, volume: &PersistentVolume) -> Result<FlatObject, ShortError> {
        let entry = self.entry(&volume.source)?;
        let source = self.encode_source(&volume.source)?;
        let meta = field::to_flat(&volume.meta)?;

        let mut extra = FlatObject::new();
        for (key, value) in &volume.extra {
            if entry.recognizes(key) {
                trace!(%key, vol_type = entry.vol_type, "dropping extra key shadowing a known key");
                continue;
            }
            extra.insert(key.clone(), value.clone());
        }

        Ok(merge(merge(extra, source), meta))
    }

    /// encode from independent source slots, exactly one of them has to be set
    pub fn encode_parts(
        &self,
        meta: &PersistentVolumeMeta,
        sources: VolumeSourceSet,
    ) -> Result<FlatObject, ShortError> {
        let source = PersistentVolumeSource::try_from(sources)?;
        let source = self.encode_source(&source)?;
        let meta = field::to_flat(meta)?;
        Ok(merge(source, meta))
    }
}
