use std::fs::File;
use std::path::Path;
use std::path::PathBuf;

use dirs::home_dir;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use tracing::debug;

use short_types::field::FieldMode;
use short_types::DecodeOptions;
use short_types::PersistentVolume;
use short_types::ShortError;
use short_types::VariantEngine;

use crate::ConfigError;

/// env var pointing at a config file
pub const SHORT_CONFIG: &str = "SHORT_CONFIG";

/// top level key of a persistent volume document
pub const PERSISTENT_VOLUME_KEY: &str = "persistent_volume";

#[derive(Debug, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ShortConfig {
    #[serde(skip)]
    pub path: PathBuf,
    /// reject keys that neither the volume source nor the metadata know
    pub strict: bool,
    /// indent json output
    pub pretty: bool,
}

impl ShortConfig {
    /// `$SHORT_CONFIG` if set, then `~/.short/config`, defaults otherwise
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(SHORT_CONFIG) {
            return Self::from_file(path);
        }

        match Self::home_path() {
            Some(path) if path.exists() => Self::from_file(path),
            _ => {
                debug!("no short config found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn home_path() -> Option<PathBuf> {
        home_dir().map(|home| home.join(".short").join("config"))
    }

    /// read from default home directory
    pub fn from_home() -> Result<Self, ConfigError> {
        let path = Self::home_path()
            .ok_or_else(|| ConfigError::Other("no home directory".to_owned()))?;
        Self::from_file(path)
    }

    pub fn from_file<T: AsRef<Path>>(path: T) -> Result<Self, ConfigError> {
        debug!("loading short config from: {}", path.as_ref().display());
        let file = File::open(path.as_ref())?;
        let mut config: Self = serde_yaml::from_reader(file)?;
        config.path = path.as_ref().to_path_buf();
        Ok(config)
    }

    pub fn to_file<T: AsRef<Path>>(&self, path: T) -> Result<(), ConfigError> {
        let file = File::create(path)?;
        Ok(serde_yaml::to_writer(file, self)?)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.to_file(&self.path)
    }

    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            mode: if self.strict {
                FieldMode::Strict
            } else {
                FieldMode::Permissive
            },
        }
    }

    pub fn engine(&self) -> VariantEngine<'static> {
        VariantEngine::standard().with_options(self.decode_options())
    }

    /// read a yaml or json document holding a `persistent_volume`
    pub fn read_volume<T: AsRef<Path>>(&self, path: T) -> Result<PersistentVolume, ConfigError> {
        debug!("reading persistent volume from: {}", path.as_ref().display());
        let file = File::open(path.as_ref())?;
        let document: Value = serde_yaml::from_reader(file)?;
        self.volume_from_document(&document)
    }

    pub fn volume_from_document(&self, document: &Value) -> Result<PersistentVolume, ConfigError> {
        let volume = document
            .get(PERSISTENT_VOLUME_KEY)
            .ok_or_else(|| ShortError::missing_key(PERSISTENT_VOLUME_KEY))?;
        Ok(self.engine().decode_value(volume)?)
    }

    pub fn volume_to_document(&self, volume: &PersistentVolume) -> Result<Value, ConfigError> {
        let mut document = Map::new();
        document.insert(
            PERSISTENT_VOLUME_KEY.to_owned(),
            Value::Object(self.engine().encode(volume)?),
        );
        Ok(Value::Object(document))
    }

    pub fn volume_to_json(&self, volume: &PersistentVolume) -> Result<String, ConfigError> {
        let document = self.volume_to_document(volume)?;
        let json = if self.pretty {
            serde_json::to_string_pretty(&document)
        } else {
            serde_json::to_string(&document)
        };
        json.map_err(|err| ConfigError::Other(format!("couldn't write json: {err}")))
    }

    pub fn volume_to_yaml(&self, volume: &PersistentVolume) -> Result<String, ConfigError> {
        let document = self.volume_to_document(volume)?;
        Ok(serde_yaml::to_string(&document)?)
    }
}

#[cfg(test)]
mod test {

    use serde_json::json;

    use short_types::field::FieldMode;
    use short_types::volume::NfsVolume;
    use short_types::PersistentVolumeSource;
    use short_types::ShortError;

    use super::ShortConfig;
    use crate::ConfigError;

    #[test]
    fn test_decode_config() {
        let config = ShortConfig::from_file("data/short.yaml").expect("read");
        assert!(config.strict);
        assert!(!config.pretty);
        assert_eq!(config.decode_options().mode, FieldMode::Strict);
    }

    #[test]
    fn test_default_config() {
        let config: ShortConfig = serde_yaml::from_str("pretty: true").expect("parse");
        assert!(!config.strict);
        assert!(config.pretty);
        assert_eq!(config.decode_options().mode, FieldMode::Permissive);
    }

    #[test]
    fn test_config_ser() {
        let config = ShortConfig {
            strict: true,
            ..Default::default()
        };
        let serialized = serde_yaml::to_string(&config).expect("serialized");
        assert_eq!(serialized, "strict: true\npretty: false\n");
    }

    #[test]
    fn test_read_volume() {
        let config = ShortConfig::default();
        let pv = config.read_volume("data/pv.yaml").expect("read");
        assert_eq!(pv.meta.name.as_deref(), Some("pv0003"));
        assert_eq!(
            pv.source,
            PersistentVolumeSource::Nfs(NfsVolume {
                server: "172.17.0.2".to_owned(),
                path: "/tmp".to_owned(),
                read_only: false,
            })
        );

        let document = config.volume_to_document(&pv).expect("document");
        assert_eq!(document["persistent_volume"]["vol_id"], json!("172.17.0.2:/tmp"));
        assert_eq!(config.volume_from_document(&document).expect("reread"), pv);
    }

    #[test]
    fn test_strict_document() {
        let config = ShortConfig {
            strict: true,
            ..Default::default()
        };
        let document = json!({
            "persistent_volume": {"vol_type": "flocker", "vol_id": "dataset", "colour": "blue"}
        });
        let err = config.volume_from_document(&document).expect_err("unknown key");
        assert!(matches!(err, ConfigError::Short(ShortError::Shape { .. })));

        let permissive = ShortConfig::default();
        let pv = permissive.volume_from_document(&document).expect("permissive");
        assert_eq!(pv.extra.get("colour"), Some(&json!("blue")));
    }

    #[test]
    fn test_missing_document_key() {
        let err = ShortConfig::default()
            .volume_from_document(&json!({"volume": {}}))
            .expect_err("no persistent_volume");
        assert!(matches!(err, ConfigError::Short(ShortError::Shape { found: None, .. })));
    }

    #[test]
    fn test_json_output() {
        let config = ShortConfig {
            pretty: true,
            ..Default::default()
        };
        let pv = config.read_volume("data/pv.yaml").expect("read");
        let json = config.volume_to_json(&pv).expect("json");
        assert!(json.starts_with("{\n"));
        let reread: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(config.volume_from_document(&reread).expect("decode"), pv);
    }
}
