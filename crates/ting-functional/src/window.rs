//! 统计窗口.

/// 一个统计窗口: 原始顺序视图与升序视图
///
/// 排序由调用方负责, 统计量从不排序.
#[derive(Debug, Clone, Copy)]
pub struct SampleWindow<'a> {
    raw: &'a [f32],
    sorted: Option<&'a [f32]>,
}

impl<'a> SampleWindow<'a> {
    /// 构造同时带有升序视图的窗口
    pub fn new(raw: &'a [f32], sorted: &'a [f32]) -> Self {
        debug_assert_eq!(raw.len(), sorted.len());
        Self {
            raw,
            sorted: Some(sorted),
        }
    }

    /// 构造只有原始视图的窗口
    pub fn unsorted(raw: &'a [f32]) -> Self {
        Self { raw, sorted: None }
    }

    /// 原始顺序视图
    pub fn raw(&self) -> &'a [f32] {
        self.raw
    }

    /// 升序视图
    pub fn sorted(&self) -> Option<&'a [f32]> {
        self.sorted
    }

    /// 窗口长度
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// 升序排序 (NaN 排在最后)
pub fn sort_ascending(values: &mut [f32]) {
    values.sort_by(|a, b| a.total_cmp(b));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_窗口视图() {
        let raw = [3.0f32, 1.0, 2.0];
        let mut sorted = raw;
        sort_ascending(&mut sorted);
        assert_eq!(sorted, [1.0, 2.0, 3.0]);

        let w = SampleWindow::new(&raw, &sorted);
        assert_eq!(w.len(), 3);
        assert_eq!(w.raw(), &raw);
        assert_eq!(w.sorted(), Some(&sorted[..]));

        let w = SampleWindow::unsorted(&raw);
        assert!(w.sorted().is_none());
        assert!(!w.is_empty());
    }
}
