//! RIFF/WAVE 文件头解析.
//!
//! 只接受规范的 44 字节 PCM 头:
//! ```text
//! 0   "RIFF" + riff_size + "WAVE"
//! 12  "fmt " + 16 + audio_format(1) + channels + sample_rate
//!     + byte_rate + block_align + bits_per_sample
//! 36  子块 id + 子块大小 (期望为 "data", 否则跳过并继续查找)
//! ```

use byteorder::{ByteOrder, LittleEndian};
use log::{debug, error, warn};
use ting_core::{TingError, TingResult};

use crate::io::IoContext;

/// 规范 PCM WAVE 头长度
pub const CANONICAL_HEADER_SIZE: usize = 44;
/// "RIFF" 的小端字段值
pub const RIFF_MAGIC: u32 = 0x4646_4952;
/// "WAVE" 的小端字段值
pub const WAVE_MAGIC: u32 = 0x4556_4157;
/// "fmt " 的小端字段值
pub const FMT_MAGIC: u32 = 0x2074_6D66;
/// "data" 的小端字段值
pub const DATA_MAGIC: u32 = 0x6174_6164;
/// 整数 PCM 格式码
pub const WAV_FORMAT_PCM: u16 = 0x0001;
/// fmt 块的固定大小
pub const PCM_FMT_CHUNK_SIZE: u32 = 16;
/// 查找 data 块时允许跳过的块数
pub const MAX_SKIPPED_CHUNKS: usize = 20;
/// 单个被跳过块的最大大小 (字节), 超过视为损坏文件
pub const MAX_SKIP_CHUNK_SIZE: u32 = 99_999;

/// 解析后的 WAVE 头
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveHeader {
    /// RIFF 块大小 (文件大小 - 8)
    pub riff_size: u32,
    /// 音频格式码 (恒为 1)
    pub audio_format: u16,
    /// 声道数
    pub channels: u16,
    /// 采样率 (Hz)
    pub sample_rate: u32,
    /// 字节率
    pub byte_rate: u32,
    /// 块对齐 (每帧字节数)
    pub block_align: u16,
    /// 位深
    pub bits_per_sample: u16,
    /// data 块大小 (字节)
    pub data_size: u32,
    /// 第一个 PCM 样本在流中的偏移
    pub data_offset: u64,
}

/// 从流起始处读取并校验 WAVE 头, 读取结束后流位于第一个 PCM 样本
pub fn read_wave_header(io: &mut IoContext) -> TingResult<WaveHeader> {
    io.seek(std::io::SeekFrom::Start(0))?;

    let mut head = [0u8; CANONICAL_HEADER_SIZE];
    let n = io.read_up_to(&mut head)?;
    if n != CANONICAL_HEADER_SIZE {
        return Err(TingError::InvalidData(format!(
            "读取 WAVE 头失败: 期望 {CANONICAL_HEADER_SIZE} 字节, 实际 {n} 字节, 文件过短"
        )));
    }

    let riff = LittleEndian::read_u32(&head[0..4]);
    let riff_size = LittleEndian::read_u32(&head[4..8]);
    let format = LittleEndian::read_u32(&head[8..12]);
    let fmt_id = LittleEndian::read_u32(&head[12..16]);
    let fmt_size = LittleEndian::read_u32(&head[16..20]);
    let audio_format = LittleEndian::read_u16(&head[20..22]);
    let channels = LittleEndian::read_u16(&head[22..24]);
    let sample_rate = LittleEndian::read_u32(&head[24..28]);
    let byte_rate = LittleEndian::read_u32(&head[28..32]);
    let block_align = LittleEndian::read_u16(&head[32..34]);
    let bits_per_sample = LittleEndian::read_u16(&head[34..36]);
    let mut chunk_id = LittleEndian::read_u32(&head[36..40]);
    let mut chunk_size = LittleEndian::read_u32(&head[40..44]);

    if riff != RIFF_MAGIC
        || format != WAVE_MAGIC
        || fmt_id != FMT_MAGIC
        || audio_format != WAV_FORMAT_PCM
        || fmt_size != PCM_FMT_CHUNK_SIZE
    {
        error!(
            "WAVE 头字段: riff={riff:#x}, format={format:#x}, fmt={fmt_id:#x}, \
             subchunk2={chunk_id:#x}, audio_format={audio_format:#x}, fmt_size={fmt_size:#x}"
        );
        return Err(TingError::InvalidData(
            "无效的 WAVE/RIFF 头或文件格式不正确".into(),
        ));
    }

    if channels == 0 || block_align == 0 {
        return Err(TingError::InvalidData(format!(
            "无效的声道数或块对齐: channels={channels}, block_align={block_align}"
        )));
    }

    let mut skipped = 0usize;
    while chunk_id != DATA_MAGIC {
        if skipped == MAX_SKIPPED_CHUNKS {
            return Err(TingError::InvalidData(format!(
                "前 {MAX_SKIPPED_CHUNKS} 个块中未找到 'data' 块, 文件可能已损坏"
            )));
        }
        if chunk_size > MAX_SKIP_CHUNK_SIZE {
            return Err(TingError::InvalidData(format!(
                "待跳过的块大小 {chunk_size} 超过 {MAX_SKIP_CHUNK_SIZE} 字节, 文件可能已损坏"
            )));
        }

        warn!(
            "跳过非 data 块: '{}', 大小={}",
            String::from_utf8_lossy(&chunk_id.to_le_bytes()),
            chunk_size
        );
        let mut payload = vec![0u8; chunk_size as usize];
        let n = io.read_up_to(&mut payload)?;
        if n != payload.len() {
            return Err(TingError::InvalidData(format!(
                "块数据不足: 读取 {n} 字节, 块声明 {chunk_size} 字节, 文件已损坏"
            )));
        }

        let mut chunk_head = [0u8; 8];
        let n = io.read_up_to(&mut chunk_head)?;
        if n != chunk_head.len() {
            return Err(TingError::InvalidData(format!(
                "读取子块头时数据不足: 读取 {n} 字节, 期望 8 字节, 文件已损坏"
            )));
        }
        chunk_id = LittleEndian::read_u32(&chunk_head[0..4]);
        chunk_size = LittleEndian::read_u32(&chunk_head[4..8]);
        skipped += 1;
    }

    let data_offset = io.position();
    debug!(
        "WAVE 头: channels={}, rate={}, block_align={}, bits={}, data_size={}, data_offset={}",
        channels, sample_rate, block_align, bits_per_sample, chunk_size, data_offset,
    );

    Ok(WaveHeader {
        riff_size,
        audio_format,
        channels,
        sample_rate,
        byte_rate,
        block_align,
        bits_per_sample,
        data_size: chunk_size,
        data_offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wav::testutil::{WavSpec, make_wav, make_wav_with_chunks};

    fn parse(data: Vec<u8>) -> TingResult<WaveHeader> {
        let mut io = IoContext::from_memory(data);
        read_wave_header(&mut io)
    }

    #[test]
    fn test_魔数常量与字节序列一致() {
        assert_eq!(RIFF_MAGIC.to_le_bytes(), *b"RIFF");
        assert_eq!(WAVE_MAGIC.to_le_bytes(), *b"WAVE");
        assert_eq!(FMT_MAGIC.to_le_bytes(), *b"fmt ");
        assert_eq!(DATA_MAGIC.to_le_bytes(), *b"data");
    }

    #[test]
    fn test_解析规范头() {
        let wav = make_wav(WavSpec::mono_s16(8000), &[0u8; 8]);
        let head = parse(wav).unwrap();
        assert_eq!(head.channels, 1);
        assert_eq!(head.sample_rate, 8000);
        assert_eq!(head.block_align, 2);
        assert_eq!(head.bits_per_sample, 16);
        assert_eq!(head.data_size, 8);
        assert_eq!(head.data_offset, 44);
    }

    #[test]
    fn test_wave_魔数错误() {
        let mut wav = make_wav(WavSpec::mono_s16(8000), &[0u8; 8]);
        wav[8..12].copy_from_slice(b"WAVX");
        assert!(matches!(parse(wav), Err(TingError::InvalidData(_))));
    }

    #[test]
    fn test_fmt_块大小必须为_16() {
        let mut wav = make_wav(WavSpec::mono_s16(8000), &[0u8; 8]);
        wav[16..20].copy_from_slice(&18u32.to_le_bytes());
        assert!(matches!(parse(wav), Err(TingError::InvalidData(_))));
    }

    #[test]
    fn test_非_pcm_格式码() {
        let mut wav = make_wav(WavSpec::mono_s16(8000), &[0u8; 8]);
        wav[20..22].copy_from_slice(&3u16.to_le_bytes());
        assert!(matches!(parse(wav), Err(TingError::InvalidData(_))));
    }

    #[test]
    fn test_文件过短() {
        let wav = make_wav(WavSpec::mono_s16(8000), &[]);
        assert!(matches!(
            parse(wav[..30].to_vec()),
            Err(TingError::InvalidData(_))
        ));
    }

    #[test]
    fn test_跳过_list_块后找到_data() {
        let wav = make_wav_with_chunks(
            WavSpec::mono_s16(8000),
            &[(*b"LIST", vec![1u8; 26]), (*b"fact", vec![0u8; 4])],
            &[0u8; 6],
        );
        let head = parse(wav).unwrap();
        assert_eq!(head.data_size, 6);
        assert_eq!(head.data_offset, 44 + 26 + 8 + 4 + 8);
    }

    #[test]
    fn test_跳过块过大() {
        let wav = make_wav_with_chunks(
            WavSpec::mono_s16(8000),
            &[(*b"junk", vec![0u8; 100_000])],
            &[0u8; 2],
        );
        assert!(matches!(parse(wav), Err(TingError::InvalidData(_))));
    }

    #[test]
    fn test_超过跳过次数上限() {
        let chunks: Vec<([u8; 4], Vec<u8>)> = (0..21).map(|_| (*b"junk", vec![0u8; 2])).collect();
        let wav = make_wav_with_chunks(WavSpec::mono_s16(8000), &chunks, &[0u8; 2]);
        assert!(matches!(parse(wav), Err(TingError::InvalidData(_))));
    }

    #[test]
    fn test_恰好跳过上限次数仍可找到_data() {
        let chunks: Vec<([u8; 4], Vec<u8>)> = (0..20).map(|_| (*b"junk", vec![0u8; 2])).collect();
        let wav = make_wav_with_chunks(WavSpec::mono_s16(8000), &chunks, &[0u8; 2]);
        assert_eq!(parse(wav).unwrap().data_size, 2);
    }

    #[test]
    fn test_被跳过块数据截断() {
        let mut wav = make_wav_with_chunks(
            WavSpec::mono_s16(8000),
            &[(*b"LIST", vec![0u8; 64])],
            &[],
        );
        wav.truncate(44 + 10);
        assert!(matches!(parse(wav), Err(TingError::InvalidData(_))));
    }

    #[test]
    fn test_零声道() {
        let mut wav = make_wav(WavSpec::mono_s16(8000), &[0u8; 2]);
        wav[22..24].copy_from_slice(&0u16.to_le_bytes());
        assert!(matches!(parse(wav), Err(TingError::InvalidData(_))));
    }
}
