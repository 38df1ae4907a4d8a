use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use toml::Value;

/// Preferências do aplicativo lidas de um config.toml opcional. Sem arquivo,
/// valem os padrões; um arquivo malformado é erro de inicialização. As
/// constantes do domínio (id do contêiner, rótulos, modelo de URL) não são
/// configuráveis.
#[derive(Debug)]
pub struct ConfigStore {
    pub path: PathBuf,
    doc: Value,
}

impl ConfigStore {
    pub fn load(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self {
                path,
                doc: Value::Table(toml::map::Map::new()),
            });
        }

        let text = fs::read_to_string(&path)
            .with_context(|| format!("falha ao ler configuração: {}", path.display()))?;
        let doc: Value = toml::from_str(&text)
            .with_context(|| format!("falha ao interpretar TOML: {}", path.display()))?;

        Ok(Self { path, doc })
    }

    pub fn server_port(&self) -> u16 {
        self.app_table()
            .and_then(|t| t.get("server_port"))
            .and_then(value_to_i64)
            .and_then(|v| u16::try_from(v).ok())
            .filter(|v| *v > 0)
            .unwrap_or(3560)
    }

    pub fn copy_debounce_sec(&self) -> f64 {
        self.app_table()
            .and_then(|t| t.get("copy_debounce_sec"))
            .and_then(value_to_f64)
            .filter(|v| *v >= 0.0)
            .unwrap_or(2.0)
    }

    pub fn confirm_remove(&self) -> bool {
        self.app_table()
            .and_then(|t| t.get("confirm_remove"))
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }

    fn app_table(&self) -> Option<&toml::map::Map<String, Value>> {
        self.doc.as_table()?.get("app")?.as_table()
    }
}

fn value_to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(v) => Some(*v),
        Value::Float(v) if v.fract() == 0.0 => Some(*v as i64),
        _ => None,
    }
}

fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(v) => Some(*v as f64),
        Value::Float(v) => Some(*v),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::ConfigStore;
    use std::fs;
    use std::path::PathBuf;

    fn fixture_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "ope_config_store_test_{}_{}.toml",
            name,
            std::process::id()
        ));
        path
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = fixture_path("missing");
        fs::remove_file(&path).ok();

        let store = ConfigStore::load(path).expect("load defaults");

        assert_eq!(store.server_port(), 3560);
        assert_eq!(store.copy_debounce_sec(), 2.0);
        assert!(store.confirm_remove());
    }

    #[test]
    fn reads_app_table_values() {
        let path = fixture_path("values");
        fs::write(
            &path,
            r#"
[app]
server_port = 4100
copy_debounce_sec = 0.5
confirm_remove = false
"#,
        )
        .expect("fixture write");

        let store = ConfigStore::load(path.clone()).expect("load store");
        assert_eq!(store.server_port(), 4100);
        assert_eq!(store.copy_debounce_sec(), 0.5);
        assert!(!store.confirm_remove());

        fs::remove_file(path).ok();
    }

    #[test]
    fn out_of_range_values_fall_back_to_defaults() {
        let path = fixture_path("range");
        fs::write(
            &path,
            r#"
[app]
server_port = 0
copy_debounce_sec = -3.0
"#,
        )
        .expect("fixture write");

        let store = ConfigStore::load(path.clone()).expect("load store");
        assert_eq!(store.server_port(), 3560);
        assert_eq!(store.copy_debounce_sec(), 2.0);

        fs::remove_file(path).ok();
    }

    #[test]
    fn malformed_toml_is_a_startup_error() {
        let path = fixture_path("broken");
        fs::write(&path, "[app\nserver_port = ").expect("fixture write");

        assert!(ConfigStore::load(path.clone()).is_err());

        fs::remove_file(path).ok();
    }
}
