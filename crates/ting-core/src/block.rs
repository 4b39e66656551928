//! 解码输出块.
//!
//! `AudioBlock` 是 `声道 × 帧` 的二维浮点缓冲, 由调用方分配,
//! 解码器只负责写入并记录本次产出的帧数.

/// 平面格式的归一化浮点音频块
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBlock {
    /// 每声道一个平面, 长度均为 `capacity`
    planes: Vec<Vec<f32>>,
    /// 每声道可容纳的帧数
    capacity: usize,
    /// 最近一次写入产出的有效帧数
    nb_frames: usize,
}

impl AudioBlock {
    /// 创建指定声道数和容量的块, 样本初始化为 0
    pub fn new(channels: usize, capacity: usize) -> Self {
        Self {
            planes: vec![vec![0.0; capacity]; channels],
            capacity,
            nb_frames: 0,
        }
    }

    /// 声道 (行) 数
    pub fn channels(&self) -> usize {
        self.planes.len()
    }

    /// 每声道容量 (帧)
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 有效帧数
    pub fn nb_frames(&self) -> usize {
        self.nb_frames
    }

    /// 设置有效帧数, 超过容量时截断到容量
    pub fn set_nb_frames(&mut self, nb_frames: usize) {
        self.nb_frames = nb_frames.min(self.capacity);
    }

    /// 是否没有有效帧
    pub fn is_empty(&self) -> bool {
        self.nb_frames == 0
    }

    /// 获取某声道的有效样本
    ///
    /// # Panics
    /// `channel` 越界时 panic.
    pub fn channel(&self, channel: usize) -> &[f32] {
        &self.planes[channel][..self.nb_frames]
    }

    /// 写入单个样本
    #[inline]
    pub fn set(&mut self, channel: usize, frame: usize, value: f32) {
        self.planes[channel][frame] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_新建块() {
        let block = AudioBlock::new(2, 16);
        assert_eq!(block.channels(), 2);
        assert_eq!(block.capacity(), 16);
        assert!(block.is_empty());
        assert!(block.channel(1).is_empty());
    }

    #[test]
    fn test_有效帧数截断到容量() {
        let mut block = AudioBlock::new(1, 4);
        block.set(0, 0, 0.5);
        block.set_nb_frames(10);
        assert_eq!(block.nb_frames(), 4);
        assert_eq!(block.channel(0), &[0.5, 0.0, 0.0, 0.0]);
    }
}
