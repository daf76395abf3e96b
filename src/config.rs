// config.rs - 配置管理模块
// 遵循 Unix 风格：优先从 ~/.config/bingwall/config.toml 读取配置

use crate::resolve::{ImageSize, SIZE_1K, SIZE_4K};
use rust_i18n::t;
use schemars::JsonSchema; // 引入用于生成 JSON Schema 的 trait
use serde::{Deserialize, Serialize}; // 引入序列化与反序列化 trait
use shellexpand::tilde; // 用于展开 ~ 和环境变量
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// 缓存目录的环境变量，优先级高于配置文件
pub const DIR_ENV: &str = "BINGWALL_DIR";

/// 展开路径中的 ~ 和环境变量 ($HOME 等)
fn expand_path(path_str: &str) -> PathBuf {
    PathBuf::from(tilde(path_str).into_owned())
}

/// 用户主目录，Windows 下回退到 USERPROFILE
fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

/// 映射 config.toml 文件内容的嵌套结构体
#[derive(Debug, Deserialize, Serialize, Default, JsonSchema)]
pub(crate) struct ConfigFile {
    #[serde(default)]
    common: CommonConfig,
    #[serde(default)]
    source: SourceConfig,
}

#[derive(Debug, Deserialize, Serialize, Default, JsonSchema)]
struct CommonConfig {
    /// 壁纸缓存目录 (支持 ~、$HOME 等环境变量，相对路径则相对于 $HOME)
    cache_dir: Option<String>,
    /// 当日壁纸的尺寸 (0k / 1k / 2k / 4k 或 WxH)，默认 4k
    #[serde(default)]
    today_size: Option<String>,
    /// 历史壁纸的尺寸，默认 1k
    #[serde(default)]
    archive_size: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct SourceConfig {
    /// 搜索引擎主页地址
    #[serde(default = "default_homepage_url")]
    pub homepage_url: String,
    /// 历史壁纸列表第一页地址，翻页时替换其中的 p=1
    #[serde(default = "default_archive_url")]
    pub archive_url: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            homepage_url: default_homepage_url(),
            archive_url: default_archive_url(),
        }
    }
}

fn default_homepage_url() -> String {
    "https://cn.bing.com".to_string()
}
fn default_archive_url() -> String {
    "https://bing.ioliu.cn/?p=1".to_string()
}

/// 解析尺寸配置，无法识别时使用默认值
fn size_or(value: Option<&str>, default: ImageSize) -> ImageSize {
    match value {
        Some(v) => ImageSize::parse(v).unwrap_or_else(|| {
            tracing::warn!(value = v, "unrecognized size, using {}", default);
            default
        }),
        None => default,
    }
}

/// 应用全局配置项
pub struct AppConfig {
    /// 实际使用的壁纸缓存目录 (优先级：ENV > TOML > 默认值)
    pub cache_dir: PathBuf,
    /// 当日壁纸尺寸
    pub today_size: ImageSize,
    /// 历史壁纸尺寸
    pub archive_size: ImageSize,
    /// 页面地址
    pub source: SourceConfig,
    /// 配置文件所在路径
    pub config_path: PathBuf,
    /// 用户主目录，相对路径以它为基准
    home: PathBuf,
    /// 配置文件里写的缓存目录，原样保存回文件
    configured_dir: Option<String>,
    /// 来自环境变量的缓存目录，只在本次运行中生效
    dir_override: Option<String>,
}

impl AppConfig {
    /// 读取配置
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let home = home_dir().ok_or(t!("error_no_home"))?;
        let config_path = home.join(".config").join("bingwall").join("config.toml");
        let config_file = Self::load_config_from_file(&config_path).unwrap_or_default();
        let dir_override = env::var(DIR_ENV).ok();
        let dir_override = dir_override.as_deref();

        let config = Self::from_parts(&home, config_path, config_file, dir_override);
        Ok(config)
    }

    /// 由配置文件内容和环境变量组装配置
    pub(crate) fn from_parts(
        home: &Path,
        config_path: PathBuf,
        file: ConfigFile,
        dir_override: Option<&str>,
    ) -> Self {
        let mut config = Self {
            cache_dir: PathBuf::new(),
            today_size: size_or(file.common.today_size.as_deref(), SIZE_4K),
            archive_size: size_or(file.common.archive_size.as_deref(), SIZE_1K),
            source: file.source,
            config_path,
            home: home.to_path_buf(),
            configured_dir: file.common.cache_dir,
            dir_override: dir_override.map(str::to_string),
        };
        config.cache_dir = config.effective_dir();
        config
    }

    /// 缓存目录：
    /// 1. 环境变量或配置文件给出的路径先展开 ~ 和环境变量
    /// 2. 相对路径则相对于 $HOME
    /// 3. 都未配置时默认使用 $HOME/Pictures/bingwall
    fn effective_dir(&self) -> PathBuf {
        let dir = self.dir_override.as_deref();
        match dir.or(self.configured_dir.as_deref()) {
            Some(dir_str) => self.under_home(dir_str),
            None => self.home.join("Pictures").join("bingwall"),
        }
    }

    fn under_home(&self, dir_str: &str) -> PathBuf {
        let p = expand_path(dir_str);
        if p.is_absolute() {
            p
        } else {
            self.home.join(p)
        }
    }

    /// 辅助函数：解析 TOML 配置文件
    fn load_config_from_file(path: &Path) -> Option<ConfigFile> {
        let content = fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(file) => Some(file),
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring invalid config: {}", e);
                None
            }
        }
    }

    /// 确保缓存目录存在
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.cache_dir)
    }

    /// 修改一个配置项，返回规范化后的值
    ///
    /// 设置了环境变量时，新的缓存目录只写入文件，本次运行仍用环境变量给出的目录。
    pub fn set(&mut self, key: &str, value: &str) -> Result<String, Box<dyn std::error::Error>> {
        match key {
            "dir" | "cache_dir" => {
                let resolved = self.under_home(value);
                self.configured_dir = Some(value.to_string());
                self.cache_dir = self.effective_dir();
                Ok(resolved.display().to_string())
            }
            "today_size" | "archive_size" => {
                let size = ImageSize::parse(value)
                    .ok_or_else(|| t!("config_error_bad_size", value => value))?;
                if key == "today_size" {
                    self.today_size = size;
                } else {
                    self.archive_size = size;
                }
                Ok(size_value(&size))
            }
            _ => Err(t!("config_error_unknown_key", key => key).into()),
        }
    }

    fn to_file(&self) -> ConfigFile {
        ConfigFile {
            common: CommonConfig {
                cache_dir: self.configured_dir.clone(),
                today_size: Some(size_value(&self.today_size)),
                archive_size: Some(size_value(&self.archive_size)),
            },
            source: SourceConfig {
                homepage_url: self.source.homepage_url.clone(),
                archive_url: self.source.archive_url.clone(),
            },
        }
    }

    /// 将配置保存回文件
    pub fn save(&self) -> std::io::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.config_path, self.to_toml())
    }

    /// 获取配置文件的 JSON Schema
    pub fn get_schema() -> Result<String, serde_json::Error> {
        let schema = schemars::schema_for!(ConfigFile);
        serde_json::to_string_pretty(&schema)
    }

    /// 将当前配置转换为 TOML 字符串
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(&self.to_file())
            .unwrap_or_else(|_| "# Error serializing config".to_string())
    }
}

/// 尺寸写回配置文件时的形式：有标签写标签，否则写 WxH
fn size_value(size: &ImageSize) -> String {
    if size.label.is_empty() {
        size.dims()
    } else {
        size.label.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::SIZE_2K;

    fn parse(toml_str: &str) -> ConfigFile {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn defaults_without_file() {
        let home = Path::new("/home/me");
        let file = ConfigFile::default();
        let cfg = AppConfig::from_parts(home, home.join("c.toml"), file, None);

        assert_eq!(cfg.cache_dir, Path::new("/home/me/Pictures/bingwall"));
        assert_eq!(cfg.today_size, SIZE_4K);
        assert_eq!(cfg.archive_size, SIZE_1K);
        assert_eq!(cfg.source.homepage_url, "https://cn.bing.com");
        assert_eq!(cfg.source.archive_url, "https://bing.ioliu.cn/?p=1");
    }

    #[test]
    fn file_values_are_used() {
        let file = parse(
            r#"
            [common]
            cache_dir = "walls"
            today_size = "2k"
            archive_size = "1366x768"

            [source]
            homepage_url = "https://www.bing.com"
            "#,
        );
        let home = Path::new("/home/me");
        let cfg = AppConfig::from_parts(home, home.join("c.toml"), file, None);

        assert_eq!(cfg.cache_dir, Path::new("/home/me/walls"));
        assert_eq!(cfg.today_size, SIZE_2K);
        assert_eq!(cfg.archive_size.dims(), "1366x768");
        assert_eq!(cfg.source.homepage_url, "https://www.bing.com");
        assert_eq!(cfg.source.archive_url, "https://bing.ioliu.cn/?p=1");
    }

    #[test]
    fn env_dir_overrides_file() {
        let file = parse("[common]\ncache_dir = \"/srv/walls\"\n");
        let home = Path::new("/home/me");
        let cfg = AppConfig::from_parts(home, home.join("c.toml"), file, Some("/tmp/override"));
        assert_eq!(cfg.cache_dir, Path::new("/tmp/override"));
    }

    #[test]
    fn bad_size_falls_back_to_default() {
        let file = parse("[common]\ntoday_size = \"huge\"\n");
        let home = Path::new("/home/me");
        let cfg = AppConfig::from_parts(home, home.join("c.toml"), file, None);
        assert_eq!(cfg.today_size, SIZE_4K);
    }

    #[test]
    fn set_and_save_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("bingwall").join("config.toml");
        let file = ConfigFile::default();
        let mut cfg = AppConfig::from_parts(dir.path(), config_path.clone(), file, None);

        assert_eq!(cfg.set("today_size", "2K").unwrap(), "2k");
        assert_eq!(cfg.set("archive_size", "800x600").unwrap(), "800x600");
        assert!(cfg.set("today_size", "nope").is_err());
        assert!(cfg.set("colour", "blue").is_err());
        cfg.save().unwrap();

        let reloaded = AppConfig::load_config_from_file(&config_path).unwrap();
        let again = AppConfig::from_parts(dir.path(), config_path, reloaded, None);
        assert_eq!(again.today_size, SIZE_2K);
        assert_eq!(again.archive_size.dims(), "800x600");
        assert_eq!(again.cache_dir, cfg.cache_dir);
    }

    #[test]
    fn env_dir_is_not_written_back() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        let file = parse("[common]\ncache_dir = \"walls\"\n");
        let mut cfg =
            AppConfig::from_parts(dir.path(), config_path.clone(), file, Some("/tmp/one-off"));
        assert_eq!(cfg.cache_dir, Path::new("/tmp/one-off"));

        cfg.set("today_size", "2k").unwrap();
        cfg.save().unwrap();

        let reloaded = AppConfig::load_config_from_file(&config_path).unwrap();
        assert_eq!(reloaded.common.cache_dir.as_deref(), Some("walls"));
        let again = AppConfig::from_parts(dir.path(), config_path, reloaded, None);
        assert_eq!(again.cache_dir, dir.path().join("walls"));
        assert_eq!(again.today_size, SIZE_2K);
    }

    #[test]
    fn default_dir_is_not_pinned_by_save() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        let file = ConfigFile::default();
        let cfg = AppConfig::from_parts(dir.path(), config_path.clone(), file, None);
        cfg.save().unwrap();

        let reloaded = AppConfig::load_config_from_file(&config_path).unwrap();
        assert_eq!(reloaded.common.cache_dir, None);
    }

    #[test]
    fn set_relative_dir_resolves_under_home() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        let file = ConfigFile::default();
        let mut cfg = AppConfig::from_parts(dir.path(), config_path.clone(), file, None);

        let shown = cfg.set("dir", "walls").unwrap();
        assert_eq!(shown, dir.path().join("walls").display().to_string());
        assert_eq!(cfg.cache_dir, dir.path().join("walls"));
        cfg.save().unwrap();

        let reloaded = AppConfig::load_config_from_file(&config_path).unwrap();
        let again = AppConfig::from_parts(dir.path(), config_path, reloaded, None);
        assert_eq!(again.cache_dir, cfg.cache_dir);
    }

    #[test]
    fn set_dir_under_env_override_keeps_override_for_this_run() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        let file = ConfigFile::default();
        let mut cfg = AppConfig::from_parts(dir.path(), config_path, file, Some("/tmp/one-off"));

        cfg.set("dir", "/srv/walls").unwrap();
        assert_eq!(cfg.cache_dir, Path::new("/tmp/one-off"));
        let saved = cfg.to_file().common.cache_dir;
        assert_eq!(saved.as_deref(), Some("/srv/walls"));
    }

    #[test]
    fn schema_mentions_sections() {
        let schema = AppConfig::get_schema().unwrap();
        assert!(schema.contains("common"));
        assert!(schema.contains("archive_url"));
    }
}
