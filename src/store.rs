// store.rs - 本地缓存模块
// 文件已存在就直接复用，否则下载一次并写入磁盘

use crate::fetch::Fetcher;
use rust_i18n::t;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// 找到已保存的图片，或者下载并保存图片
///
/// 返回图片的绝对路径。文件已存在时不发起任何网络请求，
/// 也不校验文件内容是否对应 `url`。
pub async fn save_image(
    fetcher: &dyn Fetcher,
    url: &str,
    path: &Path,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let save_path = std::path::absolute(path)?;

    if tokio::fs::try_exists(&save_path).await? {
        println!("{}", t!("image_exists", path => save_path.display()));
        return Ok(save_path);
    }

    println!("{}", t!("downloading", url => url));
    let bytes = fetcher.fetch_bytes(url).await?;
    write_image(&save_path, &bytes).await?;
    let len = bytes.len();
    tracing::info!(path = %save_path.display(), len, "image saved");

    Ok(save_path)
}

/// 先写到同目录下的 `.part` 文件，写完再改名为正式文件名
///
/// 缓存命中只看正式文件是否存在，中途失败时不能留下半截的 jpg。
async fn write_image(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let part_path = partial_path(path);
    let written = match write_file(&part_path, bytes).await {
        Ok(()) => tokio::fs::rename(&part_path, path).await,
        Err(e) => Err(e),
    };

    if written.is_err() {
        let _ = tokio::fs::remove_file(&part_path).await;
    }
    written
}

async fn write_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o755);

    let mut file = options.open(path).await?;
    file.write_all(bytes).await?;
    file.flush().await
}

/// 下载中的临时文件：`foo.jpg` -> `foo.jpg.part`
fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}

/// 列出缓存目录下的所有 jpg 文件，按文件名排序
pub fn list_cached(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg"))
        })
        .collect();
    files.sort();
    Ok(files)
}
