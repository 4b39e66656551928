//! WAVE PCM 源.
//!
//! 状态机: `Closed → HeaderParsed → Streaming → Eof`.
//!
//! 使用流程:
//! 1. `WaveSource::open()` 或 `WaveSource::from_io()` 解析头部、解析读取区间并定位到起点
//! 2. 用 `new_block()` 分配输出块
//! 3. 每个调度步调用一次 `read_block()`, 返回本次产出的帧数
//! 4. `is_eof()` 为真后不再产出数据, 底层流已释放

use std::io::SeekFrom;

use log::{debug, error, info, warn};
use ting_core::{AudioBlock, TingError, TingResult};

use super::{PcmStreamParams, ReadRange, read_wave_header};
use crate::config::WaveSourceConfig;
use crate::io::IoContext;
use crate::pcm::decode_interleaved;

/// 输出字段名
pub const OUTPUT_FIELD_NAME: &str = "pcm";

/// 源状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceState {
    /// 尚未解析头部
    Closed,
    /// 头部已解析, 读取区间未就绪
    HeaderParsed,
    /// 可以读取数据块
    Streaming,
    /// 已到达末尾 (终态)
    Eof,
}

/// 解码游标
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeCursor {
    /// 下一次读取的起始帧 (单调递增)
    pub current_frame: u32,
    /// EOF 锁存, 一旦置位不再复位
    pub eof: bool,
}

/// WAVE PCM 源
pub struct WaveSource {
    /// 底层流, EOF 后释放
    io: Option<IoContext>,
    /// 流参数
    params: PcmStreamParams,
    /// 读取区间
    range: ReadRange,
    /// 解码游标
    cursor: DecodeCursor,
    /// 当前状态
    state: SourceState,
    /// 是否混为单声道
    mono_mixdown: bool,
    /// 每块帧数
    block_frames: usize,
    /// 原始字节缓冲, 跨调用复用
    buffer: Vec<u8>,
}

impl WaveSource {
    /// 按配置中的 `filename` 打开文件
    pub fn open(config: &WaveSourceConfig) -> TingResult<Self> {
        let filename = config
            .filename
            .as_ref()
            .ok_or_else(|| TingError::Config("缺少必填配置项 filename".into()))?;
        let io = IoContext::open_read(filename).map_err(|e| {
            error!("打开输入文件 '{}' 失败: {e}", filename.display());
            e
        })?;
        info!("打开 WAVE 文件: {}", filename.display());
        Self::from_io(config, io)
    }

    /// 从任意 I/O 上下文创建 (不要求 `filename`)
    pub fn from_io(config: &WaveSourceConfig, io: IoContext) -> TingResult<Self> {
        let mut source = Self {
            io: Some(io),
            params: PcmStreamParams::default(),
            range: ReadRange::default(),
            cursor: DecodeCursor::default(),
            state: SourceState::Closed,
            mono_mixdown: config.mono_mixdown,
            block_frames: 1,
            buffer: Vec::new(),
        };
        source.parse_header()?;
        source.start_streaming(config)?;
        Ok(source)
    }

    /// Closed → HeaderParsed
    fn parse_header(&mut self) -> TingResult<()> {
        let io = self.io_mut()?;
        let header = read_wave_header(io)?;
        self.params = PcmStreamParams::from(&header);
        self.state = SourceState::HeaderParsed;
        debug!("WAVE 流参数: {:?}", self.params);
        Ok(())
    }

    /// HeaderParsed → Streaming
    fn start_streaming(&mut self, config: &WaveSourceConfig) -> TingResult<()> {
        self.range = ReadRange::resolve(
            &config.range_request(),
            self.params.total_frames,
            self.params.sample_rate,
        );
        self.block_frames = config.block_frames(self.params.sample_rate);

        if self.range.start_frame > 0 {
            let offset = self.params.data_offset
                + u64::from(self.range.start_frame) * u64::from(self.params.block_align);
            self.io_mut()?.seek(SeekFrom::Start(offset))?;
            debug!("定位到起始帧 {}, 字节偏移={}", self.range.start_frame, offset);
        }
        self.cursor.current_frame = self.range.start_frame;
        self.state = SourceState::Streaming;

        debug!(
            "WAVE 源就绪: 区间=[{}, {}), 块大小={} 帧, 混音={}",
            self.range.start_frame, self.range.end_frame, self.block_frames, self.mono_mixdown,
        );
        if let Ok(Some(encoding)) = self.params.encoding() {
            debug!("样本编码: {encoding}");
        }
        Ok(())
    }

    fn io_mut(&mut self) -> TingResult<&mut IoContext> {
        self.io
            .as_mut()
            .ok_or_else(|| TingError::Internal("底层流已释放".into()))
    }

    /// 置位 EOF 锁存并释放底层流
    fn latch_eof(&mut self) {
        self.cursor.eof = true;
        self.state = SourceState::Eof;
        if self.io.take().is_some() {
            debug!("底层流已关闭, 当前帧={}", self.cursor.current_frame);
        }
    }

    /// 读取并转换一个数据块
    ///
    /// 每次最多读取 `min(块大小, out.capacity())` 帧, 且不超过区间终点.
    ///
    /// # 返回
    /// - `Ok(n)`: 写入 `out` 的帧数; EOF 之后恒为 0
    /// - `Err(TingError::Config)`: `out` 行数与输出声道数不一致
    /// - `Err(TingError::Unsupported)`: 3 字节紧凑打包的样本
    pub fn read_block(&mut self, out: &mut AudioBlock) -> TingResult<usize> {
        if self.cursor.eof {
            debug!("已到达 EOF, 不再读取");
            out.set_nb_frames(0);
            return Ok(0);
        }

        let expected = self.output_channels();
        if out.channels() != expected {
            return Err(TingError::Config(format!(
                "输出块行数 {} 与期望 {} 不一致 (声道数={}, 混音={})",
                out.channels(),
                expected,
                self.params.channels,
                self.mono_mixdown,
            )));
        }
        if out.capacity() == 0 {
            return Err(TingError::InvalidArgument("输出块容量为 0".into()));
        }

        let align = usize::from(self.params.block_align);
        let block = self.block_frames.min(out.capacity());
        let remaining = (self.range.end_frame - self.cursor.current_frame) as usize;
        let frames = block.min(remaining);
        let want = frames * align;

        self.buffer.resize(want, 0);
        let io = self
            .io
            .as_mut()
            .ok_or_else(|| TingError::Internal("底层流已释放".into()))?;
        let n_read = io.read_up_to(&mut self.buffer[..want])?;

        let mut produced = frames;
        if n_read < block * align {
            if n_read < want {
                warn!("读取 {n_read} 字节, 少于请求的 {want} 字节, 视为 EOF");
            } else {
                debug!("到达读取终点, 帧={}", self.range.end_frame);
            }
            produced = n_read / align;
            self.cursor.current_frame += produced as u32;
            self.latch_eof();
        } else {
            self.cursor.current_frame += produced as u32;
        }

        if produced == 0 {
            out.set_nb_frames(0);
            return Ok(0);
        }

        let Some(encoding) = self.params.encoding()? else {
            error!(
                "无法将未知采样格式转换为浮点 (每样本字节={}, 位深={}, 每帧字节={})",
                self.params.bytes_per_sample, self.params.bits_per_sample, self.params.block_align
            );
            out.set_nb_frames(0);
            return Ok(0);
        };
        let channels = usize::from(self.params.channels);

        decode_interleaved(
            &self.buffer[..produced * align],
            encoding,
            channels,
            produced,
            self.mono_mixdown,
            out,
        )?;
        Ok(produced)
    }

    /// 按块大小和输出声道数分配输出块
    pub fn new_block(&self) -> AudioBlock {
        AudioBlock::new(self.output_channels(), self.block_frames)
    }

    /// 输出声道数: 混音时为 1
    pub fn output_channels(&self) -> usize {
        if self.mono_mixdown {
            1
        } else {
            usize::from(self.params.channels)
        }
    }

    /// 输出字段描述 (名称, 元素数)
    pub fn output_field(&self) -> (&'static str, usize) {
        (OUTPUT_FIELD_NAME, self.output_channels())
    }

    /// 流参数
    pub fn params(&self) -> &PcmStreamParams {
        &self.params
    }

    /// 读取区间
    pub fn range(&self) -> ReadRange {
        self.range
    }

    /// 解码游标
    pub fn cursor(&self) -> DecodeCursor {
        self.cursor
    }

    /// 当前状态
    pub fn state(&self) -> SourceState {
        self.state
    }

    /// 是否已到达 EOF
    pub fn is_eof(&self) -> bool {
        self.cursor.eof
    }

    /// 每块帧数
    pub fn block_frames(&self) -> usize {
        self.block_frames
    }

    /// 区间内剩余帧数
    pub fn frames_remaining(&self) -> u32 {
        if self.cursor.eof {
            0
        } else {
            self.range.end_frame - self.cursor.current_frame
        }
    }

    /// 采样周期 (秒)
    pub fn sample_period(&self) -> f64 {
        1.0 / f64::from(self.params.sample_rate.max(1))
    }

    /// data 块总时长 (秒)
    pub fn duration(&self) -> f64 {
        f64::from(self.params.total_frames) * self.sample_period()
    }
}
