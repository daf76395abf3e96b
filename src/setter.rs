// setter.rs - 系统壁纸设置模块

use rust_i18n::t;
use std::path::Path;

/// 把本地图片应用为桌面背景的能力
pub trait WallpaperApplier {
    /// `path` 必须是绝对路径
    fn apply(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>>;
}

/// 调用当前操作系统接口设置壁纸
///
/// Windows 下由 wallpaper 库调用 SystemParametersInfoW，
/// 并带上「立即生效」和「写入用户配置」两个标志。
pub struct SystemApplier;

impl WallpaperApplier for SystemApplier {
    fn apply(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        // wallpaper 只接受 &str
        let Some(image) = path.to_str() else {
            return Err(t!("error_utf8").into());
        };

        tracing::debug!(image, "setting desktop background");
        wallpaper::set_from_path(image)
            .map_err(|e| format!("{}: {}", t!("error_set_failed"), e))?;
        Ok(())
    }
}
