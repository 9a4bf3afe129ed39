use serde_yaml::Error as SerdeYamlError;
use short_types::ShortError;
use std::io::Error as IoError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] IoError),
    #[error("Yaml error: {0}")]
    SerdeError(#[from] SerdeYamlError),
    #[error("Short form error: {0}")]
    Short(#[from] ShortError),
    #[error("Unknown error: {0}")]
    Other(String),
}
