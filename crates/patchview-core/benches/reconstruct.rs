use criterion::Criterion;
use criterion::black_box;
use criterion::criterion_group;
use criterion::criterion_main;
use patchview_core::engine::process;
use patchview_core::minimap::ContentGeometry;
use patchview_core::minimap::MinimapOptions;
use patchview_core::minimap::layout;
use patchview_core::patch::parse_unified_diff;
use patchview_core::segments::SegmentGranularity;

fn sample_file(lines: usize) -> String {
    let mut s = String::new();
    for i in 0..lines {
        s.push_str(&format!("    let value_{i} = compute({i}, \"payload\");\n"));
    }
    s
}

/// One modified line every `every` lines, each in its own hunk.
fn sample_patch(lines: usize, every: usize) -> String {
    let mut s = String::from("--- a/big.rs\n+++ b/big.rs\n");
    for n in (1..=lines).step_by(every) {
        let i = n - 1;
        s.push_str(&format!("@@ -{n},1 +{n},1 @@\n"));
        s.push_str(&format!("-    let value_{i} = compute({i}, \"old\");\n"));
        s.push_str(&format!("+    let value_{i} = compute({i}, \"payload\");\n"));
    }
    s
}

fn bench_reconstruct(c: &mut Criterion) {
    for lines in [10_000usize, 100_000] {
        let full = sample_file(lines);
        let patch = parse_unified_diff(&sample_patch(lines, 50));
        c.bench_function(&format!("process/full_file/{lines}"), |b| {
            b.iter(|| {
                let out = process(
                    black_box(&patch.lines),
                    Some(black_box(&full)),
                    SegmentGranularity::Chars,
                );
                black_box(out.lines.len());
            })
        });
    }
}

fn bench_parse(c: &mut Criterion) {
    let text = sample_patch(100_000, 10);
    c.bench_function("parse/10k_hunks", |b| {
        b.iter(|| {
            let parsed = parse_unified_diff(black_box(&text));
            black_box(parsed.lines.len());
        })
    });
}

fn bench_minimap_layout(c: &mut Criterion) {
    let full = sample_file(100_000);
    let patch = parse_unified_diff(&sample_patch(100_000, 7));
    let out = process(&patch.lines, Some(&full), SegmentGranularity::Chars);
    let geometry = ContentGeometry {
        line_count: out.lines.len(),
        line_height: 20.0,
        container_h: 800.0,
    };
    let opts = MinimapOptions::default();
    c.bench_function("minimap/layout/100k", |b| {
        b.iter(|| {
            let l = layout(&out.blocks, &geometry, black_box(12_345.0), &opts);
            black_box(l.bars.len());
        })
    });
}

criterion_group!(benches, bench_reconstruct, bench_parse, bench_minimap_layout);
criterion_main!(benches);
