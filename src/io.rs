//! Loading and saving native data files (JSON).

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::error::{AeroError, Result};

/// Load a value from a JSON file.
///
/// # Errors
/// `Io` if the file cannot be read, `Parse` if it does not describe a `T`.
pub fn load<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| AeroError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| AeroError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Save a value as pretty-printed JSON, replacing any existing file.
pub fn save<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    let contents = serde_json::to_string_pretty(value).map_err(|source| AeroError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, contents + "\n").map_err(|source| AeroError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vehicle;
    use crate::regression::reference_vehicle;
    use crate::settings::Settings;
    use std::path::PathBuf;

    fn scratch_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("fidelity_zero_{}_{name}", std::process::id()))
    }

    #[test]
    fn test_vehicle_file_matches_reference_vehicle() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/boeing_737.json");
        let mut vehicle: Vehicle = load(&path).unwrap();
        vehicle.apply_area_convention();
        assert_eq!(vehicle, reference_vehicle());
    }

    #[test]
    fn test_save_then_load_settings() {
        let path = scratch_file("settings.json");
        let settings = Settings {
            spoiler_drag_increment: 0.01,
            ..Default::default()
        };
        save(&path, &settings).unwrap();
        let loaded: Settings = load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_errors_carry_path() {
        let missing = scratch_file("does_not_exist.json");
        match load::<Settings>(&missing).unwrap_err() {
            AeroError::Io { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error {other:?}"),
        }

        let garbage = scratch_file("garbage.json");
        fs::write(&garbage, "{ not json").unwrap();
        let err = load::<Settings>(&garbage).unwrap_err();
        fs::remove_file(&garbage).unwrap();
        assert!(matches!(err, AeroError::Parse { .. }));
    }
}
