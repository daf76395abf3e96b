// app.rs - 主流程
// 有日期参数时翻历史列表，没有时取主页当日背景图，最后设置为桌面壁纸

use crate::config::AppConfig;
use crate::fetch::Fetcher;
use crate::resolve::{SIZE_0K, resolve_save_path};
use crate::setter::WallpaperApplier;
use crate::source::archive::ArchiveClient;
use crate::source::homepage::HomepageClient;
use crate::store;
use chrono::NaiveDate;
use rust_i18n::t;
use std::path::{Path, PathBuf};

/// 历史列表最多翻到第几页
pub const MAX_ARCHIVE_PAGES: u32 = 10;

/// 日期参数规范化：取前 8 个字符，不足 8 个字符时使用今天
pub fn target_day(arg: &str, today: NaiveDate) -> String {
    if arg.chars().count() >= 8 {
        arg.chars().take(8).collect()
    } else {
        today.format("%Y%m%d").to_string()
    }
}

/// 执行一次完整流程，返回最终使用的图片路径
///
/// 缓存目录不存在时先创建。
/// 没找到图片时返回 `Ok(None)`；`apply` 为 false 时只下载不设置。
pub async fn run(
    fetcher: &dyn Fetcher,
    applier: &dyn WallpaperApplier,
    config: &AppConfig,
    date_arg: Option<&str>,
    today: NaiveDate,
    apply: bool,
) -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    config.ensure_dirs()?;

    let found = match date_arg {
        Some(arg) => {
            let day = target_day(arg, today);
            tracing::info!(day = %day, "searching archive");
            let archive = ArchiveClient::new(
                fetcher,
                config.source.archive_url.as_str(),
                SIZE_0K,
                config.archive_size,
            );
            find_archived(&archive, fetcher, &config.cache_dir, &day).await?
        }
        None => {
            let day = today.format("%Y%m%d").to_string();
            fetch_today(fetcher, config, &day).await?
        }
    };

    let Some(path) = found else {
        println!("{}", t!("not_found"));
        return Ok(None);
    };

    if apply {
        println!("{}", t!("setting_wallpaper"));
        applier.apply(&path)?;
        println!("{}", t!("set_done"));
    } else {
        println!("{}", t!("save_path", path => path.display()));
    }

    Ok(Some(path))
}

/// 在历史列表中查找指定日期的壁纸
///
/// 逐页扫描，沿途遇到的每一张图都会下载到缓存目录，
/// 找到目标日期后立即返回。
pub async fn find_archived(
    archive: &ArchiveClient<'_>,
    fetcher: &dyn Fetcher,
    cache_dir: &Path,
    target: &str,
) -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    for page in 1..=MAX_ARCHIVE_PAGES {
        let list = match archive.list_page(page).await {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!(page, "listing failed: {}", e);
                continue;
            }
        };

        // 列表页按日期倒序排列，这里也从最新的开始
        let size = archive.target_size();
        for (day, entry) in list.iter().rev() {
            let url = entry.image_url.as_str();
            let Some(image) = resolve_save_path(cache_dir, day, url, size, false) else {
                continue;
            };

            let is_target = day == target;
            match store::save_image(fetcher, &image.url, &image.path).await {
                Ok(path) if is_target => {
                    println!("{}", t!("found_entry", date => day, title => entry.title));
                    return Ok(Some(path));
                }
                Ok(_) => {}
                Err(e) if is_target => {
                    return Err(format!("{}: {}", t!("error_download"), e).into());
                }
                Err(e) => println!("{}: {}", t!("error_download"), e),
            }
        }
    }

    Ok(None)
}

/// 获取主页当日背景图并缓存
pub async fn fetch_today(
    fetcher: &dyn Fetcher,
    config: &AppConfig,
    today: &str,
) -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    println!("{}", t!("fetching_today"));
    let homepage = HomepageClient::new(fetcher, config.source.homepage_url.as_str());
    let url = homepage
        .background_url()
        .await
        .map_err(|e| format!("{}: {}", t!("error_background"), e))?;
    println!("{}", t!("background_found", url => url));

    let size = &config.today_size;
    let Some(image) = resolve_save_path(&config.cache_dir, today, &url, size, true) else {
        return Ok(None);
    };

    let path = store::save_image(fetcher, &image.url, &image.path)
        .await
        .map_err(|e| format!("{}: {}", t!("error_download"), e))?;
    Ok(Some(path))
}
