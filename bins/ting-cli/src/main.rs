//! ting-cli - 音频分位数统计命令行工具
//!
//! 逐块读取 PCM WAVE 文件, 对每个声道的全部样本计算四分位数、
//! 四分位距、百分位数及百分位距.

mod analyze;
mod logging;

use clap::Parser;
use log::error;
use std::path::PathBuf;
use std::process;

use analyze::{CliConfig, Report};

#[derive(Parser, Debug)]
#[command(name = "ting-cli", version, about = "纯 Rust 音频分位数统计工具")]
struct Cli {
    /// 输入 WAVE 文件路径 (覆盖配置文件中的 source.filename)
    input: Option<PathBuf>,

    /// JSON 配置文件, 含 source 和 percentiles 两段
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 将所有声道混为单声道
    #[arg(long)]
    mono: bool,

    /// 读取起点 (采样数)
    #[arg(long)]
    start_samples: Option<i64>,

    /// 读取终点 (采样数)
    #[arg(long)]
    end_samples: Option<i64>,

    /// 每次读取的帧数
    #[arg(long)]
    blocksize: Option<u32>,

    /// 百分位 (0..1), 可重复; 指定后替换配置文件中的列表
    #[arg(short, long = "percentile")]
    percentile: Vec<f64>,

    /// 百分位距 "A-B" (百分位下标), 可重复
    #[arg(long = "pctlrange")]
    pctlrange: Vec<String>,

    /// 使用最近秩而非线性插值
    #[arg(long)]
    no_interp: bool,

    /// 输出 JSON 格式
    #[arg(long)]
    json: bool,

    /// 日志级别 (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// 命令行参数覆盖配置文件
    fn apply(&self, config: &mut CliConfig) {
        if let Some(input) = &self.input {
            config.source.filename = Some(input.clone());
        }
        if self.mono {
            config.source.mono_mixdown = true;
        }
        if self.start_samples.is_some() {
            config.source.start_samples = self.start_samples;
        }
        if self.end_samples.is_some() {
            config.source.end_samples = self.end_samples;
        }
        if self.blocksize.is_some() {
            config.source.blocksize = self.blocksize;
        }
        if !self.percentile.is_empty() {
            config.percentiles.percentile = self.percentile.clone();
        }
        if !self.pctlrange.is_empty() {
            config.percentiles.pctlrange = self.pctlrange.clone();
        }
        if self.no_interp {
            config.percentiles.interp = false;
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = logging::init("ting-cli", cli.verbose) {
        eprintln!("警告: 日志初始化失败: {e:#}");
    }

    if cli.input.is_none() && cli.config.is_none() {
        print_banner();
        return;
    }

    let mut config = match CliConfig::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            error!("{e:#}");
            eprintln!("错误: {e:#}");
            process::exit(1);
        }
    };
    cli.apply(&mut config);

    let report = match analyze::run(&config) {
        Ok(r) => r,
        Err(e) => {
            error!("{e:#}");
            eprintln!("错误: {e:#}");
            process::exit(1);
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("错误: JSON 序列化失败: {e}");
                process::exit(1);
            }
        }
    } else {
        print_report_text(&report);
    }
}

/// 打印横幅
fn print_banner() {
    eprintln!(
        "ting-cli 版本 {} -- 纯 Rust 音频分位数统计工具",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!("用法: ting-cli <文件.wav> [--config cfg.json] [选项]");
    eprintln!("使用 --help 查看全部选项");
}

/// 文本格式输出
fn print_report_text(report: &Report) {
    println!("[FILE]");
    println!("filename={}", report.filename);
    println!("sample_rate={}", report.sample_rate);
    println!("channels={}", report.channels);
    println!("bits_per_sample={}", report.bits_per_sample);
    if let Some(format) = &report.sample_format {
        println!("sample_format={format}");
    }
    println!("mono_mixdown={}", report.mono_mixdown);
    println!("start_frame={}", report.start_frame);
    println!("end_frame={}", report.end_frame);
    println!("duration={:.6}", report.duration);
    println!("[/FILE]");

    for d in &report.diagnostics {
        println!("# {d}");
    }

    for stats in &report.stats {
        println!("[CHANNEL]");
        println!("index={}", stats.channel);
        println!("frames={}", stats.frames);
        for v in &stats.values {
            println!("{} = {:.6}", v.name, v.value);
        }
        println!("[/CHANNEL]");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_命令行覆盖配置() {
        let cli = Cli::parse_from([
            "ting-cli",
            "a.wav",
            "--mono",
            "--start-samples",
            "10",
            "-p",
            "0.1",
            "-p",
            "0.9",
            "--pctlrange",
            "0-1",
            "--no-interp",
        ]);
        let mut config = CliConfig::default();
        config.percentiles.percentile = vec![0.5];
        cli.apply(&mut config);

        assert_eq!(config.source.filename, Some(PathBuf::from("a.wav")));
        assert!(config.source.mono_mixdown);
        assert_eq!(config.source.start_samples, Some(10));
        assert_eq!(config.source.end_samples, None);
        assert_eq!(config.percentiles.percentile, vec![0.1, 0.9]);
        assert_eq!(config.percentiles.pctlrange, vec!["0-1".to_string()]);
        assert!(!config.percentiles.interp);
    }

    #[test]
    fn test_未指定时保留配置文件() {
        let cli = Cli::parse_from(["ting-cli"]);
        let mut config = CliConfig::default();
        config.source.end_samples = Some(100);
        config.percentiles.percentile = vec![0.5];
        cli.apply(&mut config);
        assert_eq!(config.source.end_samples, Some(100));
        assert_eq!(config.percentiles.percentile, vec![0.5]);
        assert!(config.percentiles.interp);
    }
}
