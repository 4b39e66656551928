//! 读取区间解析.
//!
//! 在第一次读取前, 将按秒或按采样数给出的起止位置解析为帧区间.
//! 优先级 (高 → 低):
//! - 起点: `startSamples` > `start` (秒, 向下取整) > 0
//! - 终点: `endSamples` > `end` (秒, 向上取整) > `endrelSamples` > `endrel` (秒) > 文件末尾

use log::{debug, warn};

/// 读取区间请求, 各字段为 `None` 表示未显式设置
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RangeRequest {
    /// 起点 (秒)
    pub start: f64,
    /// 起点 (采样数), 覆盖 `start`
    pub start_samples: Option<i64>,
    /// 终点 (秒), 负数等同于未设置
    pub end: Option<f64>,
    /// 终点 (采样数), 覆盖其余所有终点设置; 负数等同于未设置
    pub end_samples: Option<i64>,
    /// 距文件末尾的秒数
    pub endrel: Option<f64>,
    /// 距文件末尾的采样数, 覆盖 `endrel`
    pub endrel_samples: Option<i64>,
}

/// 已解析的读取区间 `[start_frame, end_frame)`
///
/// 满足 `0 <= start_frame <= end_frame <= total_frames`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadRange {
    /// 起始帧
    pub start_frame: u32,
    /// 结束帧 (不含)
    pub end_frame: u32,
}

impl ReadRange {
    /// 根据请求、总帧数和采样率解析区间
    ///
    /// 采样率为 0 时按 1.0 换算.
    pub fn resolve(request: &RangeRequest, total_frames: u32, sample_rate: u32) -> Self {
        let srate = if sample_rate == 0 {
            1.0
        } else {
            f64::from(sample_rate)
        };
        let total = i64::from(total_frames);

        let start = request
            .start_samples
            .unwrap_or_else(|| (request.start * srate).floor() as i64)
            .clamp(0, total);

        let mut end = match request.end_samples {
            Some(samples) => samples,
            None => match request.end {
                Some(seconds) if seconds >= 0.0 => (seconds * srate).ceil() as i64,
                _ => -1,
            },
        };

        if end < 0 {
            end = if let Some(rel) = request.endrel_samples {
                (total - rel.max(0)).max(0)
            } else if let Some(rel) = request.endrel {
                (total - (rel * srate).floor() as i64).max(0)
            } else {
                total
            };
        }
        end = end.min(total);

        if end < start {
            warn!("读取终点 {end} 早于起点 {start}, 区间置空");
            end = start;
        }

        debug!("读取区间: start={start}, end={end}, total={total}");
        Self {
            start_frame: start as u32,
            end_frame: end as u32,
        }
    }

    /// 区间内的帧数
    pub fn len(&self) -> u32 {
        self.end_frame - self.start_frame
    }

    /// 区间是否为空
    pub fn is_empty(&self) -> bool {
        self.start_frame == self.end_frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_默认读取整个文件() {
        let range = ReadRange::resolve(&RangeRequest::default(), 100, 8000);
        assert_eq!(range, ReadRange { start_frame: 0, end_frame: 100 });
        assert_eq!(range.len(), 100);
    }

    #[test]
    fn test_起点采样数覆盖秒数() {
        let req = RangeRequest {
            start: 0.5,
            start_samples: Some(2),
            ..Default::default()
        };
        let range = ReadRange::resolve(&req, 10, 8000);
        assert_eq!(range.start_frame, 2);
        assert_eq!(range.end_frame, 10);
    }

    #[test]
    fn test_起点秒数向下取整并截断() {
        let req = RangeRequest {
            start: 0.00026,
            ..Default::default()
        };
        // 0.00026 * 8000 = 2.08
        assert_eq!(ReadRange::resolve(&req, 10, 8000).start_frame, 2);

        let req = RangeRequest {
            start: 10.0,
            ..Default::default()
        };
        let range = ReadRange::resolve(&req, 10, 8000);
        assert_eq!(range.start_frame, 10);
        assert!(range.is_empty());
    }

    #[test]
    fn test_终点秒数向上取整() {
        let req = RangeRequest {
            end: Some(0.00026),
            ..Default::default()
        };
        assert_eq!(ReadRange::resolve(&req, 10, 8000).end_frame, 3);
    }

    #[test]
    fn test_终点采样数优先于相对终点() {
        let req = RangeRequest {
            end_samples: Some(7),
            end: Some(0.0005),
            endrel_samples: Some(1),
            ..Default::default()
        };
        assert_eq!(ReadRange::resolve(&req, 10, 8000).end_frame, 7);
    }

    #[test]
    fn test_相对终点采样数() {
        let req = RangeRequest {
            endrel_samples: Some(3),
            endrel: Some(1.0),
            ..Default::default()
        };
        assert_eq!(ReadRange::resolve(&req, 10, 8000).end_frame, 7);

        let req = RangeRequest {
            endrel_samples: Some(30),
            ..Default::default()
        };
        assert_eq!(ReadRange::resolve(&req, 10, 8000).end_frame, 0);
    }

    #[test]
    fn test_相对终点秒数() {
        let req = RangeRequest {
            endrel: Some(0.0005),
            ..Default::default()
        };
        // 10 - floor(4.0) = 6
        assert_eq!(ReadRange::resolve(&req, 10, 8000).end_frame, 6);
    }

    #[test]
    fn test_负的终点采样数回退到相对终点() {
        let req = RangeRequest {
            end_samples: Some(-1),
            endrel_samples: Some(2),
            ..Default::default()
        };
        assert_eq!(ReadRange::resolve(&req, 10, 8000).end_frame, 8);
    }

    #[test]
    fn test_终点超出文件长度被截断() {
        let req = RangeRequest {
            end_samples: Some(1000),
            ..Default::default()
        };
        assert_eq!(ReadRange::resolve(&req, 10, 8000).end_frame, 10);
    }

    #[test]
    fn test_终点早于起点时区间置空() {
        let req = RangeRequest {
            start_samples: Some(6),
            end_samples: Some(4),
            ..Default::default()
        };
        let range = ReadRange::resolve(&req, 10, 8000);
        assert_eq!(range, ReadRange { start_frame: 6, end_frame: 6 });
    }

    #[test]
    fn test_采样率为零按_1_换算() {
        let req = RangeRequest {
            start: 3.0,
            ..Default::default()
        };
        assert_eq!(ReadRange::resolve(&req, 10, 0).start_frame, 3);
    }
}
