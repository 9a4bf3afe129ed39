pub mod access_mode;
pub mod secret_ref;
pub mod selector;

pub use self::access_mode::AccessModes;
pub use self::access_mode::PersistentVolumeAccessMode;
pub use self::secret_ref::SecretReference;
