//! 窗口统计量接口.

use ting_core::TingResult;

use crate::window::SampleWindow;

/// 窗口统计量
///
/// 每个实现对一个窗口产生固定数量的输出值, 输出名称与输出下标一一对应.
pub trait Functional {
    /// 统计量名称
    fn name(&self) -> &'static str;

    /// 每个窗口的输出数量
    fn output_count(&self) -> usize;

    /// 第 `index` 个输出的名称
    fn value_name(&self, index: usize) -> Option<String>;

    /// 全部输出名称
    fn value_names(&self) -> Vec<String> {
        (0..self.output_count())
            .filter_map(|i| self.value_name(i))
            .collect()
    }

    /// 处理一个窗口, 将结果写入 `out`, 返回写入数量
    fn process(&self, window: &SampleWindow<'_>, out: &mut [f32]) -> TingResult<usize>;
}
