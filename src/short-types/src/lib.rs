mod engine;
mod error;
mod metadata;
mod persistent_volume;
pub mod codec;
pub mod field;
pub mod volume;

pub use self::engine::*;
pub use self::error::*;
pub use self::metadata::*;
pub use self::persistent_volume::*;
pub use self::volume::PersistentVolumeSource;
pub use self::volume::VolumeSourceSet;
