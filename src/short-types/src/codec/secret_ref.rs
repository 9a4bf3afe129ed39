use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

/// Reference to a secret, written as `namespace:name` or just `name`.
///
/// The split happens at the last colon, everything before it is the namespace.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct SecretReference {
    pub name: String,
    pub namespace: Option<String>,
}

impl SecretReference {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            namespace: None,
        }
    }

    pub fn namespaced<S: Into<String>>(namespace: S, name: S) -> Self {
        let namespace = namespace.into();
        Self {
            name: name.into(),
            namespace: if namespace.is_empty() {
                None
            } else {
                Some(namespace)
            },
        }
    }

    pub fn decode(s: &str) -> Self {
        match s.rsplit_once(':') {
            Some((namespace, name)) => Self::namespaced(namespace, name),
            None => Self::new(s),
        }
    }

    pub fn encode(&self) -> String {
        match self.namespace.as_deref() {
            Some(namespace) if !namespace.is_empty() => format!("{}:{}", namespace, self.name),
            _ => self.name.clone(),
        }
    }
}

impl FromStr for SecretReference {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::decode(s))
    }
}

impl fmt::Display for SecretReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

impl Serialize for SecretReference {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for SecretReference {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::decode(&raw))
    }
}

#[cfg(test)]
mod test {

    use serde_json::json;

    use super::SecretReference;

    #[test]
    fn test_decode() {
        assert_eq!(
            SecretReference::decode("ns:name"),
            SecretReference {
                name: "name".to_owned(),
                namespace: Some("ns".to_owned())
            }
        );
        assert_eq!(SecretReference::decode("name"), SecretReference::new("name"));
        assert_eq!(SecretReference::decode(""), SecretReference::new(""));
    }

    #[test]
    fn test_decode_last_colon_wins() {
        let secret = SecretReference::decode("a:b:name");
        assert_eq!(secret.namespace.as_deref(), Some("a:b"));
        assert_eq!(secret.name, "name");

        let secret = SecretReference::decode("ns:");
        assert_eq!(secret.namespace.as_deref(), Some("ns"));
        assert_eq!(secret.name, "");

        // empty namespace is the same as no namespace
        assert_eq!(SecretReference::decode(":name"), SecretReference::new("name"));
    }

    #[test]
    fn test_encode() {
        assert_eq!(SecretReference::namespaced("ns", "name").encode(), "ns:name");
        assert_eq!(SecretReference::new("name").encode(), "name");
        let empty_ns = SecretReference {
            name: "name".to_owned(),
            namespace: Some(String::new()),
        };
        assert_eq!(empty_ns.encode(), "name");
    }

    #[test]
    fn test_serde() {
        let secret: SecretReference =
            serde_json::from_value(json!("kube-system:ceph")).expect("deserialize");
        assert_eq!(secret, SecretReference::namespaced("kube-system", "ceph"));
        assert_eq!(
            serde_json::to_value(&secret).expect("serialize"),
            json!("kube-system:ceph")
        );
        serde_json::from_value::<SecretReference>(json!({"name": "x"}))
            .expect_err("secret ref should be a string");
    }
}
