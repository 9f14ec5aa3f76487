use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::DEFAULT_POOL_SIZE;

/// 应用程序配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 搜索相关配置
    pub search: SearchConfig,
    /// 性能相关配置
    pub performance: PerformanceConfig,
    /// 缓存配置
    pub cache: CacheConfig,
    /// 排除规则配置
    pub exclude: ExcludeConfig,
}

/// 搜索配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// 搜索根目录
    pub root_path: PathBuf,
    /// 是否按路径排序结果
    pub sort_results: bool,
}

/// 性能配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceConfig {
    /// 工作线程数，0 表示使用CPU核心数
    pub pool_size: usize,
}

/// 缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// 最多缓存的搜索词数量，0 表示不限制
    pub capacity: usize,
}

/// 排除规则配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeConfig {
    /// 不进入的目录名
    pub dirs: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchConfig {
                root_path: dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")),
                sort_results: false,
            },
            performance: PerformanceConfig {
                pool_size: DEFAULT_POOL_SIZE,
            },
            cache: CacheConfig { capacity: 0 },
            exclude: ExcludeConfig::default(),
        }
    }
}

impl Config {
    /// 以指定根目录创建默认配置
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let mut config = Self::default();
        config.search.root_path = root.into();
        config
    }

    /// 从配置文件加载配置，如果文件不存在则创建默认配置文件
    pub fn load_or_create(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            let config = Self::default();
            config.save_to_file(config_path)?;
            println!("已创建默认配置文件: {}", config_path.display());
            Ok(config)
        }
    }

    /// 从文件加载配置
    pub fn load_from_file(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("无法读取配置文件: {}", config_path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("无法解析配置文件: {}", config_path.display()))?;

        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("无法创建配置目录: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("无法序列化配置")?;

        fs::write(config_path, content)
            .with_context(|| format!("无法写入配置文件: {}", config_path.display()))?;

        Ok(())
    }

    /// 获取配置文件的默认路径
    pub fn default_config_path() -> Result<PathBuf> {
        let exe_path = std::env::current_exe().context("无法获取程序路径")?;

        let exe_dir = exe_path.parent().context("无法获取程序目录")?;

        Ok(exe_dir.join("findname.toml"))
    }

    /// 实际使用的工作线程数
    pub fn effective_pool_size(&self) -> usize {
        match self.performance.pool_size {
            0 => num_cpus::get(),
            n => n,
        }
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.search.root_path.as_os_str().is_empty() {
            anyhow::bail!("root_path 不能为空");
        }

        if self.performance.pool_size > 256 {
            anyhow::bail!("pool_size 不能超过 256");
        }

        if self.cache.capacity > 1_000_000 {
            anyhow::bail!("cache.capacity 不能超过 1000000");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.performance.pool_size, 8);
        assert_eq!(config.cache.capacity, 0);
        assert!(!config.search.sort_results);
        assert!(config.exclude.dirs.is_empty());
        assert!(!config.search.root_path.as_os_str().is_empty());
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::with_root("/srv/files");
        config.exclude.dirs.push(".git".to_string());

        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(deserialized.search.root_path, PathBuf::from("/srv/files"));
        assert_eq!(deserialized.exclude.dirs, vec![".git".to_string()]);
    }

    #[test]
    fn test_config_file_operations() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("findname.toml");

        let created = Config::load_or_create(&config_path).unwrap();
        assert!(config_path.exists());

        let loaded = Config::load_from_file(&config_path).unwrap();
        assert_eq!(created.search.root_path, loaded.search.root_path);
        assert_eq!(created.performance.pool_size, loaded.performance.pool_size);
    }

    #[test]
    fn test_effective_pool_size() {
        let mut config = Config::default();
        assert_eq!(config.effective_pool_size(), 8);

        config.performance.pool_size = 0;
        assert!(config.effective_pool_size() >= 1);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.performance.pool_size = 1000;
        assert!(config.validate().is_err());

        config = Config::with_root("");
        assert!(config.validate().is_err());

        config = Config::default();
        config.cache.capacity = 2_000_000;
        assert!(config.validate().is_err());
    }
}
