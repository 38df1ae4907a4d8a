use std::env;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Diretório base do aplicativo: o diretório do executável quando há um
/// config.toml ao lado dele, senão o diretório de trabalho atual.
pub fn get_base_dir() -> PathBuf {
    let exe_dir = env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    if has_config_candidate(&exe_dir) {
        return exe_dir;
    }

    if let Ok(cwd) = env::current_dir() {
        if has_config_candidate(&cwd) {
            return cwd;
        }
    }

    exe_dir
}

pub fn resolve_config_path(raw: Option<String>, base_dir: &Path) -> PathBuf {
    if let Some(path) = raw {
        let path = PathBuf::from(path);
        if path.is_absolute() {
            return path;
        }
        if let Ok(cwd) = env::current_dir() {
            return cwd.join(path);
        }
        return path;
    }

    let candidates = [
        base_dir.join(CONFIG_FILE_NAME),
        base_dir.join("config").join(CONFIG_FILE_NAME),
    ];
    for path in candidates {
        if path.exists() {
            return path;
        }
    }

    base_dir.join(CONFIG_FILE_NAME)
}

fn has_config_candidate(base_dir: &Path) -> bool {
    base_dir.join(CONFIG_FILE_NAME).exists()
        || base_dir.join("config").join(CONFIG_FILE_NAME).exists()
}

#[cfg(test)]
mod tests {
    use super::resolve_config_path;
    use std::path::{Path, PathBuf};

    #[test]
    fn explicit_absolute_path_wins() {
        let base = Path::new("/tmp/base");
        let resolved = resolve_config_path(Some("/etc/editor/config.toml".to_string()), base);
        assert_eq!(resolved, PathBuf::from("/etc/editor/config.toml"));
    }

    #[test]
    fn defaults_to_config_beside_base_dir() {
        let base = std::env::temp_dir().join("ope_path_utils_none");
        let resolved = resolve_config_path(None, &base);
        assert_eq!(resolved, base.join("config.toml"));
    }
}
