use crate::config::{Backend, CONFIG_FILENAME, ConfigFile, SPRINTDECK_DIR, STORE_FILENAME};
use crate::error::{Result, SprintError};
use crate::store::LocalStore;
use std::fs;
use std::path::Path;

/// Execute the init command.
///
/// # Errors
///
/// Returns an error if the workspace already exists (without `--force`) or
/// files cannot be created.
pub fn execute(backend: &str, force: bool, root_dir: Option<&Path>) -> Result<()> {
    let backend: Backend = backend.parse()?;
    let base_dir = root_dir.unwrap_or_else(|| Path::new("."));
    let sprintdeck_dir = base_dir.join(SPRINTDECK_DIR);

    if sprintdeck_dir.exists() {
        let config_path = sprintdeck_dir.join(CONFIG_FILENAME);
        if config_path.exists() && !force {
            return Err(SprintError::AlreadyInitialized { path: config_path });
        }
    } else {
        fs::create_dir(&sprintdeck_dir)?;
    }

    let config = ConfigFile {
        backend,
        ..Default::default()
    };
    config.save(&sprintdeck_dir)?;

    if backend == Backend::Local {
        LocalStore::create(&sprintdeck_dir.join(STORE_FILENAME), force)?;
    }

    let gitignore_path = sprintdeck_dir.join(".gitignore");
    if !gitignore_path.exists() {
        fs::write(gitignore_path, "*.tmp\n")?;
    }

    println!("Initialized sprintdeck workspace in {SPRINTDECK_DIR}/ ({} backend)", backend.as_str());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_creates_workspace_files() {
        let temp = TempDir::new().unwrap();
        execute("local", false, Some(temp.path())).unwrap();

        assert!(temp.path().join(".sprintdeck/config.toml").exists());
        assert!(temp.path().join(".sprintdeck/store.json").exists());
        assert!(temp.path().join(".sprintdeck/.gitignore").exists());
    }

    #[test]
    fn init_http_backend_skips_store_file() {
        let temp = TempDir::new().unwrap();
        execute("http", false, Some(temp.path())).unwrap();

        assert!(temp.path().join(".sprintdeck/config.toml").exists());
        assert!(!temp.path().join(".sprintdeck/store.json").exists());
    }

    #[test]
    fn init_fails_when_already_initialized() {
        let temp = TempDir::new().unwrap();
        execute("local", false, Some(temp.path())).unwrap();

        let result = execute("local", false, Some(temp.path()));
        assert!(matches!(
            result,
            Err(SprintError::AlreadyInitialized { .. })
        ));

        // --force overwrites.
        execute("local", true, Some(temp.path())).unwrap();
    }

    #[test]
    fn init_rejects_unknown_backend() {
        let temp = TempDir::new().unwrap();
        assert!(execute("sqlite", false, Some(temp.path())).is_err());
    }
}
