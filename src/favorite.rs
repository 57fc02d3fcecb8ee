use std::fs;
use std::path::PathBuf;
use log::{info, warn};
use crate::errors::FavoriteError;
use crate::models::location::LocationCode;

/// Keeps the favorite location in a plain text file holding just the code
pub struct FavoriteStore {
    path: PathBuf,
    default: LocationCode,
}

impl FavoriteStore {
    /// Returns a FavoriteStore
    ///
    /// # Arguments
    ///
    /// * 'path' - the favorite file
    /// * 'default' - location to use when no valid favorite has been saved
    pub fn new(path: impl Into<PathBuf>, default: LocationCode) -> FavoriteStore {
        FavoriteStore { path: path.into(), default }
    }

    /// Loads the favorite location, falling back to the default if the file is
    /// missing, unreadable or doesn't hold a valid code
    pub fn load(&self) -> LocationCode {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(_) => return self.default.clone(),
        };

        let line = content.lines().next().unwrap_or("").trim();
        match line.parse::<LocationCode>() {
            Ok(code) => code,
            Err(e) => {
                warn!("ignoring favorite file {}: {}, using {}", self.path.display(), e, self.default);
                self.default.clone()
            }
        }
    }

    /// Saves the favorite location, overwriting any previous one
    ///
    /// # Arguments
    ///
    /// * 'code' - the location to save
    pub fn save(&self, code: &LocationCode) -> Result<(), FavoriteError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, code.as_str())?;
        info!("favorite location set to {}", code);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> LocationCode {
        s.parse().unwrap()
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FavoriteStore::new(dir.path().join("res/poblacion_favorita.txt"), code("28079"));

        store.save(&code("08019")).unwrap();
        assert_eq!(store.load(), code("08019"));

        store.save(&code("15030")).unwrap();
        assert_eq!(store.load(), code("15030"));
        assert_eq!(fs::read_to_string(dir.path().join("res/poblacion_favorita.txt")).unwrap(), "15030");
    }

    #[test]
    fn test_load_missing_file_gives_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = FavoriteStore::new(dir.path().join("missing.txt"), code("28079"));

        assert_eq!(store.load(), code("28079"));
    }

    #[test]
    fn test_load_malformed_file_gives_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fav.txt");
        let store = FavoriteStore::new(&path, code("28079"));

        fs::write(&path, "Madrid").unwrap();
        assert_eq!(store.load(), code("28079"));

        fs::write(&path, "").unwrap();
        assert_eq!(store.load(), code("28079"));
    }

    #[test]
    fn test_load_tolerates_line_terminator() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fav.txt");
        fs::write(&path, "41091\n").unwrap();

        assert_eq!(FavoriteStore::new(&path, code("28079")).load(), code("41091"));
    }

    #[test]
    fn test_save_into_unwritable_location() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, "x").unwrap();
        let store = FavoriteStore::new(blocker.join("fav.txt"), code("28079"));

        assert!(store.save(&code("08019")).is_err());
    }
}
