use directories::ProjectDirs;

const PROJECT_ROOT: &str = env!("CARGO_MANIFEST_DIR");

/// Root directory for mutable application data (database, uploads, logs).
///
/// Debug builds keep everything under `dev_assets/` in the repo so a
/// developer database never collides with a real install.
pub fn asset_dir() -> std::path::PathBuf {
    let path = if let Ok(dir) = std::env::var("ZAC_ASSET_DIR") {
        crate::path::expand_tilde(&dir)
    } else if cfg!(debug_assertions) {
        std::path::PathBuf::from(PROJECT_ROOT).join("../../dev_assets")
    } else {
        ProjectDirs::from("org", "zac", "zac-scheduler")
            .expect("OS didn't give us a home directory")
            .data_dir()
            .to_path_buf()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).expect("Failed to create asset directory");
    }

    path
}

/// Database file path. Respects `ZAC_DATABASE_PATH` (tilde expanded).
pub fn database_path() -> std::path::PathBuf {
    if let Ok(path) = std::env::var("ZAC_DATABASE_PATH") {
        return crate::path::expand_tilde(&path);
    }
    asset_dir().join("db.sqlite")
}

/// Directory for uploaded files, one subdirectory per feature
/// (`profiles/pictures`, `profiles/posts`, `slides`, `announcements`,
/// `journals`, `tools`).
pub fn upload_dir(feature: &str) -> std::path::PathBuf {
    let dir = asset_dir().join("uploads").join(feature);
    if !dir.exists() {
        std::fs::create_dir_all(&dir).expect("Failed to create upload directory");
    }
    dir
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    #[serial]
    fn database_path_default() {
        // SAFETY: Tests run serially via #[serial] attribute
        unsafe { env::remove_var("ZAC_DATABASE_PATH") };
        let path = database_path();
        assert!(path.ends_with("db.sqlite"));
    }

    #[test]
    #[serial]
    fn database_path_env_override() {
        // SAFETY: Tests run serially via #[serial] attribute
        unsafe { env::set_var("ZAC_DATABASE_PATH", "/custom/path/test.db") };
        let path = database_path();
        unsafe { env::remove_var("ZAC_DATABASE_PATH") };
        assert_eq!(path, std::path::PathBuf::from("/custom/path/test.db"));
    }

    #[test]
    #[serial]
    fn database_path_tilde_expansion() {
        // SAFETY: Tests run serially via #[serial] attribute
        unsafe { env::set_var("ZAC_DATABASE_PATH", "~/zac/db.sqlite") };
        let path = database_path();
        unsafe { env::remove_var("ZAC_DATABASE_PATH") };
        assert!(!path.to_string_lossy().contains('~'));
        assert!(path.is_absolute());
    }

    #[test]
    #[serial]
    fn upload_dir_is_namespaced() {
        let temp = tempfile::tempdir().unwrap();
        // SAFETY: Tests run serially via #[serial] attribute
        unsafe { env::set_var("ZAC_ASSET_DIR", temp.path().to_str().unwrap()) };
        let dir = upload_dir("slides");
        unsafe { env::remove_var("ZAC_ASSET_DIR") };
        assert!(dir.ends_with("uploads/slides"));
        assert!(dir.exists());
    }
}
