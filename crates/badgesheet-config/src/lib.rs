use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use badgesheet_core::{
    builtin_template, CoreError, DomainAliases, FieldSelection, ImageSize, LabelTemplate,
};
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "badgesheet";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_TOKEN_ENV: &str = "SLACK_USER_TOKEN";
pub const DEFAULT_API_BASE: &str = "https://slack.com/api";
pub const DEFAULT_CONCURRENCY: usize = 8;
pub const MAX_CONCURRENCY: usize = 64;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TEMPLATE: &str = "avery5395";
pub const DEFAULT_TEXT_PADDING: f64 = 5.0;
pub const DEFAULT_BASE_FONT_SIZE: f64 = 10.0;
pub const DEFAULT_IMAGES_DIR: &str = "dist/images";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub directory: DirectoryConfig,
    pub selection: FieldSelection,
    pub sheet: SheetConfig,
    pub fonts: FontsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub token: Option<String>,
    pub token_env: String,
    pub api_base: String,
    pub domain_aliases: Option<DomainAliases>,
    pub concurrency: usize,
    pub timeout_secs: u64,
}

impl DirectoryConfig {
    /// The configured token, else the one in the named environment variable.
    pub fn resolve_token(&self) -> Option<String> {
        if let Some(token) = self.token.as_deref() {
            return Some(token.to_string());
        }
        env::var(&self.token_env)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct SheetConfig {
    pub template_name: String,
    pub template: LabelTemplate,
    pub text_padding: f64,
    pub base_font_size: f64,
    pub watermark: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct FontsConfig {
    pub regular: Option<PathBuf>,
    pub bold: Option<PathBuf>,
    pub alt: Option<PathBuf>,
    pub italic: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub images_dir: PathBuf,
    /// Directory holding the pdfium shared library; system search path if unset.
    pub pdfium_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            directory: DirectoryConfig {
                token: None,
                token_env: DEFAULT_TOKEN_ENV.to_string(),
                api_base: DEFAULT_API_BASE.to_string(),
                domain_aliases: None,
                concurrency: DEFAULT_CONCURRENCY,
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
            selection: FieldSelection::default(),
            sheet: SheetConfig {
                template_name: DEFAULT_TEMPLATE.to_string(),
                template: LabelTemplate::avery5395(),
                text_padding: DEFAULT_TEXT_PADDING,
                base_font_size: DEFAULT_BASE_FONT_SIZE,
                watermark: None,
            },
            fonts: FontsConfig::default(),
            output: OutputConfig {
                images_dir: PathBuf::from(DEFAULT_IMAGES_DIR),
                pdfium_dir: None,
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
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid directory.concurrency value: {0}")]
    InvalidConcurrency(usize),
    #[error("invalid directory.timeout_secs value: {0}")]
    InvalidTimeout(u64),
    #[error("invalid directory.{field} value")]
    InvalidDirectoryField { field: &'static str },
    #[error("directory.domain_aliases must list exactly two domains, got {0}")]
    InvalidDomainAliasCount(usize),
    #[error("invalid sheet.{field} value: {value}")]
    InvalidSheetValue { field: &'static str, value: f64 },
    #[error("invalid config value: {0}")]
    Core(#[from] CoreError),
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
    directory: Option<DirectoryFile>,
    profile: Option<ProfileFile>,
    sheet: Option<SheetFile>,
    fonts: Option<FontsFile>,
    output: Option<OutputFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DirectoryFile {
    token: Option<String>,
    token_env: Option<String>,
    api_base: Option<String>,
    domain_aliases: Option<Vec<String>>,
    concurrency: Option<usize>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileFile {
    pronoun_field: Option<String>,
    image_size: Option<u32>,
    #[serde(default)]
    fields: Vec<ProfileFieldFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileFieldFile {
    name: String,
    id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SheetFile {
    template: Option<String>,
    show_outline: Option<bool>,
    text_padding: Option<f64>,
    base_font_size: Option<f64>,
    watermark: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FontsFile {
    regular: Option<PathBuf>,
    bold: Option<PathBuf>,
    alt: Option<PathBuf>,
    italic: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutputFile {
    images_dir: Option<PathBuf>,
    pdfium_dir: Option<PathBuf>,
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

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config = merge_config(parsed)?;
    resolve_relative_paths(&mut config, path.parent());
    Ok(Some(config))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(directory) = parsed.directory {
        merge_directory(&mut config.directory, directory)?;
    }

    if let Some(profile) = parsed.profile {
        let image_size = profile
            .image_size
            .map(ImageSize::from_pixels)
            .unwrap_or_default();
        let mut selection = FieldSelection::new(profile.pronoun_field, image_size);
        for field in profile.fields {
            selection.push_field(&field.name, &field.id)?;
        }
        config.selection = selection;
    }

    if let Some(sheet) = parsed.sheet {
        merge_sheet(&mut config.sheet, sheet)?;
    }

    if let Some(fonts) = parsed.fonts {
        config.fonts = FontsConfig {
            regular: fonts.regular,
            bold: fonts.bold,
            alt: fonts.alt,
            italic: fonts.italic,
        };
    }

    if let Some(output) = parsed.output {
        if let Some(images_dir) = output.images_dir {
            config.output.images_dir = images_dir;
        }
        if output.pdfium_dir.is_some() {
            config.output.pdfium_dir = output.pdfium_dir;
        }
    }

    Ok(config)
}

fn merge_directory(config: &mut DirectoryConfig, file: DirectoryFile) -> Result<()> {
    if let Some(token) = file.token {
        let token = token.trim().to_string();
        if token.is_empty() {
            return Err(ConfigError::InvalidDirectoryField { field: "token" });
        }
        config.token = Some(token);
    }

    if let Some(token_env) = file.token_env {
        let token_env = token_env.trim().to_string();
        if token_env.is_empty() {
            return Err(ConfigError::InvalidDirectoryField { field: "token_env" });
        }
        config.token_env = token_env;
    }

    if let Some(api_base) = file.api_base {
        let api_base = api_base.trim().trim_end_matches('/').to_string();
        if !(api_base.starts_with("https://") || api_base.starts_with("http://")) {
            return Err(ConfigError::InvalidDirectoryField { field: "api_base" });
        }
        config.api_base = api_base;
    }

    if let Some(domains) = file.domain_aliases {
        match domains.as_slice() {
            [first, second] => config.domain_aliases = Some(DomainAliases::new(first, second)?),
            [] => config.domain_aliases = None,
            other => return Err(ConfigError::InvalidDomainAliasCount(other.len())),
        }
    }

    if let Some(concurrency) = file.concurrency {
        if concurrency == 0 || concurrency > MAX_CONCURRENCY {
            return Err(ConfigError::InvalidConcurrency(concurrency));
        }
        config.concurrency = concurrency;
    }

    if let Some(timeout) = file.timeout_secs {
        if timeout == 0 {
            return Err(ConfigError::InvalidTimeout(timeout));
        }
        config.timeout_secs = timeout;
    }

    Ok(())
}

fn merge_sheet(config: &mut SheetConfig, file: SheetFile) -> Result<()> {
    if let Some(name) = file.template {
        config.template = builtin_template(&name)?;
        config.template_name = name.trim().to_ascii_lowercase();
    }

    if let Some(show_outline) = file.show_outline {
        config.template.show_outline = show_outline;
    }

    if let Some(padding) = file.text_padding {
        if !padding.is_finite() || padding < 0.0 {
            return Err(ConfigError::InvalidSheetValue {
                field: "text_padding",
                value: padding,
            });
        }
        config.text_padding = padding;
    }

    if let Some(size) = file.base_font_size {
        if !size.is_finite() || size <= 0.0 {
            return Err(ConfigError::InvalidSheetValue {
                field: "base_font_size",
                value: size,
            });
        }
        config.base_font_size = size;
    }

    config.watermark = file.watermark;
    Ok(())
}

/// Relative paths in the file are relative to the file's own directory.
fn resolve_relative_paths(config: &mut AppConfig, base: Option<&Path>) {
    let Some(base) = base.filter(|base| !base.as_os_str().is_empty()) else {
        return;
    };
    let anchor = |path: &mut PathBuf| {
        if path.is_relative() {
            *path = base.join(&*path);
        }
    };

    for path in [
        &mut config.fonts.regular,
        &mut config.fonts.bold,
        &mut config.fonts.alt,
        &mut config.fonts.italic,
        &mut config.sheet.watermark,
        &mut config.output.pdfium_dir,
    ]
    .into_iter()
    .flatten()
    {
        anchor(path);
    }
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
