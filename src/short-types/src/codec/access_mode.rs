use std::fmt;
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::ser::Error as SerError;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use crate::ShortError;

/// See: https://kubernetes.io/docs/concepts/storage/persistent-volumes/#access-modes
/// Verbose names are the ones used by the Kubernetes API.
/// Anything else read through that form is kept as `Unrecognized` and can't be written in short form.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum PersistentVolumeAccessMode {
    ReadWriteOnce,
    ReadOnlyMany,
    ReadWriteMany,
    Unrecognized(String),
}

impl PersistentVolumeAccessMode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::ReadWriteOnce => "ReadWriteOnce",
            Self::ReadOnlyMany => "ReadOnlyMany",
            Self::ReadWriteMany => "ReadWriteMany",
            Self::Unrecognized(other) => other,
        }
    }

    /// short token, none for values outside of the closed set
    pub fn token(&self) -> Option<&'static str> {
        ACCESS_MODE_TOKENS
            .iter()
            .find(|(_, mode)| mode == self)
            .map(|(token, _)| *token)
    }

    pub fn from_token(token: &str) -> Option<Self> {
        ACCESS_MODE_TOKENS
            .iter()
            .find(|(candidate, _)| *candidate == token)
            .map(|(_, mode)| mode.clone())
    }
}

impl FromStr for PersistentVolumeAccessMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<&str> for PersistentVolumeAccessMode {
    fn from(s: &str) -> Self {
        match s {
            "ReadWriteOnce" => Self::ReadWriteOnce,
            "ReadOnlyMany" => Self::ReadOnlyMany,
            "ReadWriteMany" => Self::ReadWriteMany,
            other => Self::Unrecognized(other.to_owned()),
        }
    }
}

impl fmt::Display for PersistentVolumeAccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for PersistentVolumeAccessMode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PersistentVolumeAccessMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}

static ACCESS_MODE_TOKENS: [(&str, PersistentVolumeAccessMode); 3] = [
    ("rw", PersistentVolumeAccessMode::ReadWriteMany),
    ("ro", PersistentVolumeAccessMode::ReadOnlyMany),
    ("rw-once", PersistentVolumeAccessMode::ReadWriteOnce),
];

/// comma-separated list of modes, e.g. `ro,rw-once`
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct AccessModes {
    pub modes: Vec<PersistentVolumeAccessMode>,
}

impl AccessModes {
    pub fn new(modes: Vec<PersistentVolumeAccessMode>) -> Self {
        Self { modes }
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn decode(s: &str) -> Result<Self, ShortError> {
        if s.is_empty() {
            return Ok(Self::default());
        }

        let mut modes = Vec::new();
        for token in s.split(',') {
            match PersistentVolumeAccessMode::from_token(token) {
                Some(mode) => modes.push(mode),
                None => {
                    return Err(ShortError::value(
                        token,
                        format!("unknown access mode in ({s}), expected one of rw, ro, rw-once"),
                    ))
                }
            }
        }

        Ok(Self { modes })
    }

    pub fn encode(&self) -> Result<String, ShortError> {
        let mut tokens = Vec::with_capacity(self.modes.len());
        for mode in &self.modes {
            match mode.token() {
                Some(token) => tokens.push(token),
                None => {
                    return Err(ShortError::invalid_instance(
                        mode,
                        "access mode has no short form",
                    ))
                }
            }
        }
        Ok(tokens.join(","))
    }
}

impl FromStr for AccessModes {
    type Err = ShortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl From<Vec<PersistentVolumeAccessMode>> for AccessModes {
    fn from(modes: Vec<PersistentVolumeAccessMode>) -> Self {
        Self { modes }
    }
}

impl Serialize for AccessModes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let encoded = self.encode().map_err(S::Error::custom)?;
        serializer.serialize_str(&encoded)
    }
}

impl<'de> Deserialize<'de> for AccessModes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::decode(&raw).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod test {

    use serde_json::json;

    use super::AccessModes;
    use super::PersistentVolumeAccessMode as Mode;
    use crate::ShortError;

    #[test]
    fn test_decode() {
        assert!(AccessModes::decode("").expect("empty").is_empty());

        let modes = AccessModes::decode("ro,rw,rw-once").expect("decode");
        assert_eq!(
            modes.modes,
            vec![Mode::ReadOnlyMany, Mode::ReadWriteMany, Mode::ReadWriteOnce]
        );
    }

    #[test]
    fn test_decode_unknown_token() {
        let err = AccessModes::decode("bogus").expect_err("unknown token");
        assert!(matches!(err, ShortError::Value { ref value, .. } if value == "bogus"));

        let err = AccessModes::decode("rw,,ro").expect_err("empty token");
        assert!(matches!(err, ShortError::Value { ref value, .. } if value.is_empty()));
    }

    #[test]
    fn test_encode() {
        assert_eq!(AccessModes::default().encode().expect("encode"), "");
        let modes = AccessModes::new(vec![Mode::ReadWriteOnce, Mode::ReadOnlyMany]);
        assert_eq!(modes.encode().expect("encode"), "rw-once,ro");
    }

    #[test]
    fn test_encode_unrecognized() {
        let modes = AccessModes::new(vec![
            Mode::ReadWriteMany,
            Mode::from("ReadWriteOncePod"),
        ]);
        let err = modes.encode().expect_err("not representable");
        assert!(matches!(err, ShortError::InvalidInstance { .. }));
    }

    #[test]
    fn test_serde() {
        let modes: AccessModes = serde_json::from_value(json!("rw,ro")).expect("deserialize");
        assert_eq!(modes.modes, vec![Mode::ReadWriteMany, Mode::ReadOnlyMany]);
        assert_eq!(serde_json::to_value(&modes).expect("serialize"), json!("rw,ro"));

        serde_json::from_value::<AccessModes>(json!(["rw"])).expect_err("not a string");
    }

    #[test]
    fn test_verbose_mode_serde() {
        let mode: Mode = serde_json::from_value(json!("ReadOnlyMany")).expect("deserialize");
        assert_eq!(mode, Mode::ReadOnlyMany);
        let other: Mode = serde_json::from_value(json!("ReadWriteOncePod")).expect("deserialize");
        assert_eq!(other, Mode::Unrecognized("ReadWriteOncePod".to_owned()));
        assert_eq!(other.token(), None);
    }
}
