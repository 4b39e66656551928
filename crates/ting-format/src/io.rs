//! 字节流 I/O 抽象.
//!
//! WAVE 源只需要三种操作: 从头部开始顺序读取、定位到数据起点、
//! 以及"能读多少读多少"的块读取. `IoContext` 在任意 `IoBackend`
//! 之上提供这三种操作, 并自行跟踪当前字节位置.

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use log::debug;
use ting_core::TingResult;

/// 文件后端的读缓冲大小 (64 KB)
const FILE_BUFFER_SIZE: usize = 64 * 1024;

/// 字节流后端
///
/// 实现此 trait 以接入新的数据来源 (文件、内存等).
pub trait IoBackend: Send {
    /// 读取最多 `buf.len()` 字节, 返回 0 表示已无数据
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
    /// 定位, 返回新的绝对位置
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64>;
    /// 总字节数 (如果可知)
    fn size(&self) -> Option<u64>;
}

/// 字节流上下文
pub struct IoContext {
    inner: Box<dyn IoBackend>,
    /// 当前绝对位置
    pos: u64,
}

impl IoContext {
    /// 从后端创建, 假定后端位于流起点
    pub fn new(backend: Box<dyn IoBackend>) -> Self {
        Self {
            inner: backend,
            pos: 0,
        }
    }

    /// 以只读方式打开文件
    pub fn open_read(path: impl AsRef<Path>) -> TingResult<Self> {
        let path = path.as_ref();
        let backend = FileBackend::open(path)?;
        debug!("打开文件 {}, 大小={:?}", path.display(), backend.size());
        Ok(Self::new(Box::new(backend)))
    }

    /// 从内存数据创建
    pub fn from_memory(data: Vec<u8>) -> Self {
        Self::new(Box::new(MemoryBackend::from_data(data)))
    }

    /// 尽量读满 `buf`, 返回实际读取的字节数
    ///
    /// 返回值小于 `buf.len()` 表示数据源已耗尽, 不视为错误.
    pub fn read_up_to(&mut self, buf: &mut [u8]) -> TingResult<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        self.pos += filled as u64;
        Ok(filled)
    }

    /// 定位, 返回新的绝对位置
    pub fn seek(&mut self, pos: SeekFrom) -> TingResult<u64> {
        self.pos = self.inner.seek(pos)?;
        Ok(self.pos)
    }

    /// 当前绝对位置
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// 总字节数 (如果可知)
    pub fn size(&self) -> Option<u64> {
        self.inner.size()
    }
}

/// 文件后端, 带读缓冲
struct FileBackend {
    reader: BufReader<File>,
    size: Option<u64>,
}

impl FileBackend {
    fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        let size = file.metadata().ok().map(|m| m.len());
        Ok(Self {
            reader: BufReader::with_capacity(FILE_BUFFER_SIZE, file),
            size,
        })
    }
}

impl IoBackend for FileBackend {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }

    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.reader.seek(pos)
    }

    fn size(&self) -> Option<u64> {
        self.size
    }
}

/// 内存后端
///
/// 用于测试和已整体载入内存的文件.
pub struct MemoryBackend {
    cursor: Cursor<Vec<u8>>,
}

impl MemoryBackend {
    /// 从已有数据创建
    pub fn from_data(data: Vec<u8>) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }
}

impl IoBackend for MemoryBackend {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }

    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }

    fn size(&self) -> Option<u64> {
        Some(self.cursor.get_ref().len() as u64)
    }
}
