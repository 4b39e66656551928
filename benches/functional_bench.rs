//! Ting 性能基准测试.
//!
//! 覆盖块解码 (含混音) 与分位数统计两条核心路径.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ting::core::{AudioBlock, PcmEncoding};
use ting::format::pcm::decode_interleaved;
use ting::format::{IoContext, WaveSource, WaveSourceConfig};
use ting::functional::{Functional, Percentiles, PercentilesConfig, SampleWindow, sort_ascending};

/// 生成交错的 S16LE 数据
fn make_s16_interleaved(nb_frames: usize, channels: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(nb_frames * channels * 2);
    for i in 0..nb_frames {
        for c in 0..channels {
            let v = (((i + c * 37) % 256) as i16).wrapping_mul(100);
            data.extend_from_slice(&v.to_le_bytes());
        }
    }
    data
}

/// 封装为单声道 S16 WAVE 文件
fn make_wav_s16_mono(sample_rate: u32, pcm: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(44 + pcm.len());
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&((36 + pcm.len()) as u32).to_le_bytes());
    buf.extend_from_slice(b"WAVEfmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes());
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    buf.extend_from_slice(&2u16.to_le_bytes());
    buf.extend_from_slice(&16u16.to_le_bytes());
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&(pcm.len() as u32).to_le_bytes());
    buf.extend_from_slice(pcm);
    buf
}

fn bench_decode(c: &mut Criterion) {
    let data = make_s16_interleaved(4096, 2);

    c.bench_function("decode_4096_s16_stereo", |b| {
        let mut out = AudioBlock::new(2, 4096);
        b.iter(|| {
            decode_interleaved(black_box(&data), PcmEncoding::S16, 2, 4096, false, &mut out)
                .unwrap();
        });
    });

    c.bench_function("decode_4096_s16_stereo_mixdown", |b| {
        let mut out = AudioBlock::new(1, 4096);
        b.iter(|| {
            decode_interleaved(black_box(&data), PcmEncoding::S16, 2, 4096, true, &mut out)
                .unwrap();
        });
    });
}

fn bench_wave_source(c: &mut Criterion) {
    let wav = make_wav_s16_mono(16000, &make_s16_interleaved(16000, 1));
    let config = WaveSourceConfig {
        blocksize: Some(1600),
        ..Default::default()
    };

    c.bench_function("wave_source_1s_16k_mono", |b| {
        b.iter(|| {
            let io = IoContext::from_memory(wav.clone());
            let mut source = WaveSource::from_io(&config, io).unwrap();
            let mut block = source.new_block();
            let mut total = 0;
            while !source.is_eof() {
                total += source.read_block(&mut block).unwrap();
            }
            black_box(total);
        });
    });
}

fn bench_percentiles(c: &mut Criterion) {
    let raw: Vec<f32> = (0..16000)
        .map(|i| ((i * 7919) % 16000) as f32 / 16000.0 - 0.5)
        .collect();
    let mut sorted = raw.clone();
    sort_ascending(&mut sorted);

    let stat = Percentiles::new(&PercentilesConfig {
        percentile: vec![0.01, 0.05, 0.5, 0.95, 0.99],
        pctlrange: vec!["0-4".into(), "1-3".into()],
        ..Default::default()
    });
    let mut out = vec![0.0f32; stat.output_count()];

    c.bench_function("percentiles_16000_interp", |b| {
        b.iter(|| {
            let window = SampleWindow::new(black_box(&raw), black_box(&sorted));
            stat.process(&window, &mut out).unwrap();
        });
    });

    c.bench_function("sort_window_16000", |b| {
        b.iter(|| {
            let mut s = black_box(&raw).clone();
            sort_ascending(&mut s);
            s
        });
    });
}

criterion_group!(benches, bench_decode, bench_wave_source, bench_percentiles);
criterion_main!(benches);
