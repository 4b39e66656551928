//! 基于秩的百分位估计.

/// 百分位估计方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Estimator {
    /// 取四舍五入后的秩
    NearestRank,
    /// 相邻两个秩之间线性插值
    #[default]
    Interpolated,
}

/// 最近秩下标: `round(p * (n - 1))`, 截断到 `[0, n - 1]`
///
/// `n` 必须大于 0.
pub fn nearest_rank_index(p: f64, n: usize) -> usize {
    let last = n.saturating_sub(1);
    let idx = (p * last as f64).round();
    if idx.is_nan() || idx <= 0.0 {
        0
    } else if idx >= last as f64 {
        last
    } else {
        idx as usize
    }
}

/// 将浮点秩截断为合法下标
fn clamp_index(pos: f64, last: usize) -> usize {
    if pos.is_nan() || pos <= 0.0 {
        0
    } else if pos >= last as f64 {
        last
    } else {
        pos as usize
    }
}

/// 线性插值百分位
///
/// `sorted` 必须升序且非空.
pub fn interpolated(p: f64, sorted: &[f32]) -> f32 {
    let last = sorted.len().saturating_sub(1);
    let pos = p * last as f64;
    let i1 = clamp_index(pos.floor(), last);
    let i2 = clamp_index(pos.ceil(), last);
    if i1 == i2 {
        return sorted[i1];
    }
    let w1 = pos - i1 as f64;
    let w2 = i2 as f64 - pos;
    (f64::from(sorted[i1]) * w2 + f64::from(sorted[i2]) * w1) as f32
}

impl Estimator {
    /// 从是否插值的开关构造
    pub fn from_interp(interp: bool) -> Self {
        if interp {
            Self::Interpolated
        } else {
            Self::NearestRank
        }
    }

    /// 在升序序列上估计百分位 `p`
    ///
    /// `sorted` 必须非空.
    pub fn estimate(self, p: f64, sorted: &[f32]) -> f32 {
        match self {
            Self::NearestRank => sorted[nearest_rank_index(p, sorted.len())],
            Self::Interpolated => interpolated(p, sorted),
        }
    }
}
