use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use dialprep_core::pipeline::DEFAULT_FIRST_ID;
use dialprep_core::{AreaCode, ColumnRole, ColumnRules, NormalizePolicy};
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "dialprep";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_PREVIEW_ROWS: usize = 5;
pub const DEFAULT_DEDUPE_ENCODING: &str = "windows-1252";

const AUTO: &str = "auto";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub input: InputConfig,
    pub columns: ColumnRules,
    pub normalize: NormalizePolicy,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputConfig {
    /// `None` sniffs the delimiter from the header line.
    pub delimiter: Option<u8>,
    /// Encoding label; `None` detects UTF-8 and falls back to latin1.
    pub encoding: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub dedupe: DedupeMode,
    pub first_id: u64,
    pub preview_rows: usize,
    pub dedupe_encoding: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DedupeMode {
    None,
    #[default]
    Subscriber,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            columns: ColumnRules::default(),
            normalize: NormalizePolicy::default(),
            output: OutputConfig {
                dedupe: DedupeMode::default(),
                first_id: DEFAULT_FIRST_ID,
                preview_rows: DEFAULT_PREVIEW_ROWS,
                dedupe_encoding: DEFAULT_DEDUPE_ENCODING.to_string(),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("invalid delimiter: {0:?} (expected \"auto\" or a single character)")]
    InvalidDelimiter(String),
    #[error("invalid fallback_area_code value: {0}")]
    InvalidFallbackAreaCode(String),
    #[error("invalid {0} keywords: list must contain a non-blank keyword")]
    InvalidKeywords(ColumnRole),
    #[error("invalid {field}: must not be empty")]
    EmptyValue { field: &'static str },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    input: Option<InputFile>,
    columns: Option<ColumnsFile>,
    normalize: Option<NormalizeFile>,
    output: Option<OutputFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct InputFile {
    delimiter: Option<String>,
    encoding: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ColumnsFile {
    phone_keywords: Option<Vec<String>>,
    area_code_keywords: Option<Vec<String>>,
    name_keywords: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct NormalizeFile {
    reject_landline_prefix: Option<bool>,
    strip_country_code: Option<bool>,
    fallback_area_code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutputFile {
    dedupe: Option<DedupeMode>,
    first_id: Option<u64>,
    preview_rows: Option<usize>,
    dedupe_encoding: Option<String>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path.clone()) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(input) = parsed.input {
        if let Some(delimiter) = input.delimiter {
            config.input.delimiter = parse_delimiter(&delimiter)?;
        }
        if let Some(encoding) = input.encoding {
            let trimmed = encoding.trim();
            if trimmed.is_empty() {
                return Err(ConfigError::EmptyValue {
                    field: "input.encoding",
                });
            }
            if !trimmed.eq_ignore_ascii_case(AUTO) {
                config.input.encoding = Some(trimmed.to_string());
            }
        }
    }

    if let Some(columns) = parsed.columns {
        let overrides = [
            (ColumnRole::Phone, columns.phone_keywords),
            (ColumnRole::AreaCode, columns.area_code_keywords),
            (ColumnRole::Name, columns.name_keywords),
        ];
        for (role, keywords) in overrides {
            if let Some(keywords) = keywords {
                config.columns = config
                    .columns
                    .with_keywords(role, keywords)
                    .map_err(|_| ConfigError::InvalidKeywords(role))?;
            }
        }
    }

    if let Some(normalize) = parsed.normalize {
        if let Some(reject) = normalize.reject_landline_prefix {
            config.normalize.reject_landline_prefix = reject;
        }
        if let Some(strip) = normalize.strip_country_code {
            config.normalize.strip_country_code = strip;
        }
        if let Some(area_code) = normalize.fallback_area_code {
            let area_code = AreaCode::new(&area_code)
                .map_err(|_| ConfigError::InvalidFallbackAreaCode(area_code.clone()))?;
            config.normalize.fallback_area_code = Some(area_code);
        }
    }

    if let Some(output) = parsed.output {
        if let Some(dedupe) = output.dedupe {
            config.output.dedupe = dedupe;
        }
        if let Some(first_id) = output.first_id {
            config.output.first_id = first_id;
        }
        if let Some(preview_rows) = output.preview_rows {
            config.output.preview_rows = preview_rows;
        }
        if let Some(encoding) = output.dedupe_encoding {
            let trimmed = encoding.trim();
            if trimmed.is_empty() {
                return Err(ConfigError::EmptyValue {
                    field: "output.dedupe_encoding",
                });
            }
            config.output.dedupe_encoding = trimmed.to_string();
        }
    }

    Ok(config)
}

/// `"auto"` means sniff; `"\t"` and `"tab"` both select a tab.
pub fn parse_delimiter(raw: &str) -> Result<Option<u8>> {
    if raw.eq_ignore_ascii_case(AUTO) {
        return Ok(None);
    }
    if raw == "\t" || raw.eq_ignore_ascii_case("tab") {
        return Ok(Some(b'\t'));
    }
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if ch.is_ascii() && !matches!(ch, '"' | '\n' | '\r') => Ok(Some(ch as u8)),
        _ => Err(ConfigError::InvalidDelimiter(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        load, load_at_path, merge_config, parse_delimiter, ColumnsFile, ConfigError, ConfigFile,
        DedupeMode, InputFile, NormalizeFile, OutputFile,
    };
    use dialprep_core::ColumnRole;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn merge_config_applies_values() {
        let parsed = ConfigFile {
            input: Some(InputFile {
                delimiter: Some(";".to_string()),
                encoding: Some("latin1".to_string()),
            }),
            columns: None,
            normalize: Some(NormalizeFile {
                reject_landline_prefix: Some(false),
                strip_country_code: None,
                fallback_area_code: Some("11".to_string()),
            }),
            output: Some(OutputFile {
                dedupe: Some(DedupeMode::None),
                first_id: Some(100),
                preview_rows: Some(0),
                dedupe_encoding: None,
            }),
        };
        let merged = merge_config(parsed).expect("merge");
        assert_eq!(merged.input.delimiter, Some(b';'));
        assert_eq!(merged.input.encoding.as_deref(), Some("latin1"));
        assert!(!merged.normalize.reject_landline_prefix);
        assert!(merged.normalize.strip_country_code);
        assert_eq!(
            merged
                .normalize
                .fallback_area_code
                .as_ref()
                .map(|code| code.as_str()),
            Some("11")
        );
        assert_eq!(merged.output.dedupe, DedupeMode::None);
        assert_eq!(merged.output.first_id, 100);
        assert_eq!(merged.output.preview_rows, 0);
        assert_eq!(merged.output.dedupe_encoding, "windows-1252");
    }

    #[test]
    fn merge_config_rejects_bad_fallback_area_code() {
        let parsed = ConfigFile {
            normalize: Some(NormalizeFile {
                fallback_area_code: Some("011".to_string()),
                ..NormalizeFile::default()
            }),
            ..ConfigFile::default()
        };
        let err = merge_config(parsed).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFallbackAreaCode(_)));
    }

    #[test]
    fn merge_config_rejects_blank_keywords() {
        let parsed = ConfigFile {
            columns: Some(ColumnsFile {
                name_keywords: Some(vec![" ".to_string()]),
                ..ColumnsFile::default()
            }),
            ..ConfigFile::default()
        };
        let err = merge_config(parsed).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidKeywords(ColumnRole::Name)));
    }

    #[test]
    fn parse_delimiter_accepts_auto_and_single_chars() {
        assert_eq!(parse_delimiter("auto").unwrap(), None);
        assert_eq!(parse_delimiter(",").unwrap(), Some(b','));
        assert_eq!(parse_delimiter("tab").unwrap(), Some(b'\t'));
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("\"").is_err());
        assert!(parse_delimiter("").is_err());
    }

    #[test]
    fn load_at_path_requires_file_when_requested() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("config.toml");
        let err = load_at_path(&missing, true).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("config file not found"));
    }

    #[test]
    fn load_at_path_parses_toml() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "[columns]\nphone_keywords = [\"whatsapp\"]\n[output]\ndedupe = \"none\"\n",
        )
        .expect("write config");

        let config = load(Some(path)).expect("load");
        let map = config.columns.resolve(&["TELEFONE", "WhatsApp"]);
        assert_eq!(map.phone_column.as_deref(), Some("WhatsApp"));
        assert_eq!(config.output.dedupe, DedupeMode::None);
    }

    #[test]
    fn load_at_path_rejects_unknown_keys() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "[output]\nformat = \"xlsx\"\n").expect("write config");
        let err = load_at_path(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
