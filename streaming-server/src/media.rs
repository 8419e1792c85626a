// 视频流服务 - 媒体文件访问
//
// 本模块将存储记录中的相对路径解析为媒体根目录下的文件，
// 并以固定大小分片流式读取文件内容。
//
// # 特性
//
// - 路径解析拒绝越出媒体根目录（`..`、绝对路径、符号链接逃逸）
// - 打开与元数据探测带超时，挂起的文件句柄不会占满服务器
// - 分片读取，整个文件永远不会一次性载入内存

use crate::error::StreamServiceError;
use bytes::{Bytes, BytesMut};
use futures::Stream;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio::time::timeout;

/// 分片大小（64KB）
pub const CHUNK_SIZE: usize = 64 * 1024;

/// 打开文件与探测元数据的超时
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// 单次分片读取的超时
pub const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// 媒体存储
///
/// 持有配置的媒体根目录，按请求解析并打开其中的视频文件。
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

/// 已打开的媒体文件
///
/// 请求作用域内的派生值：解析后的绝对路径加上探测到的文件大小。
pub struct MediaFile {
    file: File,
    /// 解析后的绝对路径
    pub path: PathBuf,
    /// 文件大小（字节）
    pub size: u64,
}

impl MediaStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// 打开相对路径指向的媒体文件并探测其大小
    ///
    /// 解析顺序：先做纯词法检查（只允许普通路径段），再规范化
    /// 并校验仍位于根目录之下，最后打开文件读取元数据。
    pub async fn open(&self, relative: &str) -> Result<MediaFile, StreamServiceError> {
        let relative_path = Path::new(relative);
        if !is_clean_relative(relative_path) {
            return Err(StreamServiceError::PathOutsideRoot {
                path: relative.to_string(),
            });
        }

        let joined = self.root.join(relative_path);

        let root = canonicalize_with_timeout(&self.root).await?;
        let path = canonicalize_with_timeout(&joined).await?;

        // 符号链接可能把规范化结果带出根目录
        if !path.starts_with(&root) {
            return Err(StreamServiceError::PathOutsideRoot {
                path: path.display().to_string(),
            });
        }

        let file = timeout(PROBE_TIMEOUT, File::open(&path))
            .await
            .map_err(|_| media_unavailable(&path, "open timed out"))?
            .map_err(|e| media_unavailable(&path, &e.to_string()))?;

        let metadata = timeout(PROBE_TIMEOUT, file.metadata())
            .await
            .map_err(|_| media_unavailable(&path, "metadata probe timed out"))?
            .map_err(|e| media_unavailable(&path, &e.to_string()))?;

        if !metadata.is_file() {
            return Err(media_unavailable(&path, "not a regular file"));
        }

        Ok(MediaFile {
            file,
            size: metadata.len(),
            path,
        })
    }
}

impl MediaFile {
    /// 将文件内容转为分片字节流
    ///
    /// 从偏移 0 顺序读到 EOF，单次读取超时或出错即终止流，
    /// 由 HTTP 层以连接中断的方式向客户端传播。
    pub fn into_stream(self) -> impl Stream<Item = io::Result<Bytes>> {
        let mut file = self.file;
        async_stream::stream! {
            let mut buf = BytesMut::with_capacity(CHUNK_SIZE);
            loop {
                buf.reserve(CHUNK_SIZE);
                match timeout(READ_TIMEOUT, file.read_buf(&mut buf)).await {
                    Err(_) => {
                        yield Err(io::Error::new(
                            io::ErrorKind::TimedOut,
                            "chunk read timed out",
                        ));
                        break;
                    }
                    Ok(Err(e)) => {
                        yield Err(e);
                        break;
                    }
                    Ok(Ok(0)) => break,
                    Ok(Ok(_)) => yield Ok(buf.split().freeze()),
                }
            }
        }
    }
}

async fn canonicalize_with_timeout(path: &Path) -> Result<PathBuf, StreamServiceError> {
    timeout(PROBE_TIMEOUT, tokio::fs::canonicalize(path))
        .await
        .map_err(|_| media_unavailable(path, "path resolution timed out"))?
        .map_err(|e| media_unavailable(path, &e.to_string()))
}

/// 相对路径只允许普通路径段
fn is_clean_relative(path: &Path) -> bool {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(_)) => components.all(|c| matches!(c, Component::Normal(_))),
        _ => false,
    }
}

fn media_unavailable(path: &Path, reason: &str) -> StreamServiceError {
    StreamServiceError::MediaUnavailable {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use tempfile::TempDir;

    fn create_store() -> (TempDir, MediaStore) {
        let dir = TempDir::new().unwrap();
        let store = MediaStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    fn write_video(dir: &TempDir, name: &str, size: usize) -> Vec<u8> {
        let data: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
        std::fs::write(dir.path().join(name), &data).unwrap();
        data
    }

    async fn collect_stream(file: MediaFile) -> Vec<u8> {
        let stream = file.into_stream();
        futures::pin_mut!(stream);

        let mut bytes = Vec::new();
        while let Some(chunk) = stream.next().await {
            bytes.extend_from_slice(&chunk.unwrap());
        }
        bytes
    }

    #[tokio::test]
    async fn test_open_probes_file_size() {
        let (dir, store) = create_store();
        write_video(&dir, "clip.mp4", 100_000);

        let file = store.open("clip.mp4").await.unwrap();

        assert_eq!(file.size, 100_000);
        assert!(file.path.is_absolute());
        assert!(file.path.ends_with("clip.mp4"));
    }

    #[tokio::test]
    async fn test_stream_yields_exact_file_bytes() {
        let (dir, store) = create_store();
        // 跨多个分片边界
        let data = write_video(&dir, "clip.mp4", CHUNK_SIZE * 3 + 777);

        let file = store.open("clip.mp4").await.unwrap();
        let streamed = collect_stream(file).await;

        assert_eq!(streamed, data);
    }

    #[tokio::test]
    async fn test_open_supports_subdirectories() {
        let (dir, store) = create_store();
        std::fs::create_dir(dir.path().join("archive")).unwrap();
        let data: Vec<u8> = vec![7u8; 1024];
        std::fs::write(dir.path().join("archive/old.mp4"), &data).unwrap();

        let file = store.open("archive/old.mp4").await.unwrap();

        assert_eq!(file.size, 1024);
    }

    #[tokio::test]
    async fn test_rejects_parent_traversal() {
        let dir = TempDir::new().unwrap();
        let media_root = dir.path().join("media");
        std::fs::create_dir(&media_root).unwrap();
        // 根目录之外确实存在的文件也不允许访问
        std::fs::write(dir.path().join("secret.mp4"), b"x").unwrap();
        let store = MediaStore::new(media_root);

        let result = store.open("../secret.mp4").await;

        assert!(matches!(
            result,
            Err(StreamServiceError::PathOutsideRoot { .. })
        ));
    }

    #[tokio::test]
    async fn test_rejects_absolute_path() {
        let (_dir, store) = create_store();

        let result = store.open("/etc/passwd").await;

        assert!(matches!(
            result,
            Err(StreamServiceError::PathOutsideRoot { .. })
        ));
    }

    #[tokio::test]
    async fn test_rejects_empty_path() {
        let (_dir, store) = create_store();

        let result = store.open("").await;

        assert!(matches!(
            result,
            Err(StreamServiceError::PathOutsideRoot { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let (_dir, store) = create_store();

        let result = store.open("missing.mp4").await;

        assert!(matches!(
            result,
            Err(StreamServiceError::MediaUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_directory_is_unavailable() {
        let (dir, store) = create_store();
        std::fs::create_dir(dir.path().join("folder.mp4")).unwrap();

        let result = store.open("folder.mp4").await;

        assert!(matches!(
            result,
            Err(StreamServiceError::MediaUnavailable { .. })
        ));
    }
}
