//! Benchmarks for alert conversion and rendering.
//!
//! Run with: cargo bench
//! Results are saved to target/criterion/

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tickgen::pipeline::{AlertNode, EmailHandler, SlackHandler, SnmpData, SnmpTrapHandler};
use tickgen::{convert_alert, serialize, Lambda, Node};

/// An alert with `n` handlers of each benchmarked kind.
fn alert_with_handlers(n: usize) -> AlertNode {
    AlertNode {
        id: "{{ .Name }}:{{ .Group }}".into(),
        crit: Some(Lambda::new("\"usage_idle\" < 10")),
        state_changes_only: true,
        email_handlers: (0..n)
            .map(|i| EmailHandler {
                to_list: vec![format!("oncall{}@example.com", i)],
            })
            .collect(),
        slack_handlers: (0..n)
            .map(|i| SlackHandler {
                channel: format!("#alerts-{}", i),
                ..Default::default()
            })
            .collect(),
        snmp_trap_handlers: (0..n)
            .map(|i| SnmpTrapHandler {
                trap_oid: format!("1.3.6.1.4.1.{}", i),
                data_list: vec![SnmpData {
                    oid: "1.3.6.1.4.1.1.5".into(),
                    data_type: "s".into(),
                    value: "{{ .Level }}".into(),
                }],
            })
            .collect(),
        ..Default::default()
    }
}

fn bench_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert_alert");

    for n in [1usize, 10, 100] {
        let alert = alert_with_handlers(n);
        group.throughput(Throughput::Elements((n * 3) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &alert, |b, alert| {
            b.iter(|| convert_alert(Node::identifier("stream"), black_box(alert)))
        });
    }

    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let alert = alert_with_handlers(100);
    let node = convert_alert(Node::identifier("stream"), &alert).expect("conversion failed");

    c.bench_function("serialize_100_handlers", |b| {
        b.iter(|| serialize(black_box(&node)))
    });
}

criterion_group!(benches, bench_convert, bench_serialize);
criterion_main!(benches);
