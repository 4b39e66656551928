//! 整数 PCM → 归一化浮点转换.
//!
//! 输入为交错格式的小端字节, 输出写入平面格式的 `AudioBlock`.
//! 不混音时每个声道独立写入对应行; 混音时对同一帧所有声道求和,
//! 除以声道数后写入唯一一行.

use byteorder::{ByteOrder, LittleEndian};
use ting_core::{AudioBlock, PcmEncoding, TingError, TingResult};

/// 读取一个原始整数样本
#[inline]
fn read_raw(encoding: PcmEncoding, data: &[u8]) -> i32 {
    match encoding {
        PcmEncoding::S8 => i32::from(data[0] as i8),
        PcmEncoding::S16 => i32::from(LittleEndian::read_i16(data)),
        PcmEncoding::S24In32 => {
            // 取低 24 位并做符号扩展
            let v = LittleEndian::read_u32(data) & 0x00FF_FFFF;
            ((v << 8) as i32) >> 8
        }
        PcmEncoding::S32 => LittleEndian::read_i32(data),
    }
}

/// 将 `nb_frames` 帧交错 PCM 转换为浮点写入 `out`
///
/// # 参数
/// - `input`: 交错 PCM 字节, 至少 `nb_frames * channels * bytes_per_sample` 字节
/// - `encoding`: 采样编码
/// - `channels`: 输入声道数
/// - `mixdown`: 是否混为单声道
/// - `out`: 输出块, 行数须为 1 (混音) 或 `channels`
pub fn decode_interleaved(
    input: &[u8],
    encoding: PcmEncoding,
    channels: usize,
    nb_frames: usize,
    mixdown: bool,
    out: &mut AudioBlock,
) -> TingResult<()> {
    let bps = encoding.bytes_per_sample();
    let expected_rows = if mixdown { 1 } else { channels };
    if out.channels() != expected_rows {
        return Err(TingError::Config(format!(
            "输出行数 {} 与期望 {} 不一致",
            out.channels(),
            expected_rows
        )));
    }
    if nb_frames > out.capacity() {
        return Err(TingError::InvalidArgument(format!(
            "输出容量不足: 需要 {nb_frames} 帧, 容量 {} 帧",
            out.capacity()
        )));
    }
    let needed = nb_frames * channels * bps;
    if input.len() < needed {
        return Err(TingError::InvalidArgument(format!(
            "数据不足: 期望 {needed} 字节, 实际 {} 字节",
            input.len()
        )));
    }

    let divisor = encoding.divisor();
    let frame_size = channels * bps;

    if mixdown {
        for (i, frame) in input[..needed].chunks_exact(frame_size).enumerate() {
            let sum: f64 = frame
                .chunks_exact(bps)
                .map(|s| f64::from(read_raw(encoding, s)))
                .sum();
            out.set(0, i, ((sum / channels as f64) / divisor) as f32);
        }
    } else {
        for (i, frame) in input[..needed].chunks_exact(frame_size).enumerate() {
            for (c, s) in frame.chunks_exact(bps).enumerate() {
                out.set(c, i, (f64::from(read_raw(encoding, s)) / divisor) as f32);
            }
        }
    }

    out.set_nb_frames(nb_frames);
    Ok(())
}
