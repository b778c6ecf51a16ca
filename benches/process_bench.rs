use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use hostwatch::app::{App, Tab};
use hostwatch::client::{DomainSnapshot, PollPayload, PollUpdate};
use hostwatch::config::Config;
use hostwatch::metrics::format_processes;
use hostwatch::system::snapshot::{ProcessEntry, ProcessList};
use hostwatch::ui;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use std::hint::black_box;

fn make_processes(n: usize) -> ProcessList {
    let list = (0..n)
        .map(|i| ProcessEntry {
            pid: i as u32 + 1,
            name: format!("proc_{i}"),
            cpu_percent: Some(((i * 37) % 1000) as f64 / 10.0),
            mem_percent: Some((i % 100) as f64 / 10.0),
            threads: Some((i % 64) as u32 + 1),
            priority: Some(20),
            state: Some("Sleeping".to_string()),
            user: Some(format!("u{}", i % 8)),
        })
        .collect();
    ProcessList { all: n, list }
}

fn bench_format_processes(c: &mut Criterion) {
    let mut group = c.benchmark_group("format_processes_500_1000_2000");

    for size in [500usize, 1000, 2000] {
        let processes = make_processes(size);
        group.bench_with_input(
            BenchmarkId::from_parameter(size),
            &processes,
            |b, processes| {
                b.iter(|| {
                    let top = format_processes(black_box(processes.clone()));
                    black_box(top);
                })
            },
        );
    }

    group.finish();
}

fn bench_dashboard_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("dashboard_render_overview_processes");
    let mut config = Config::default();
    config.colors.color_support = "truecolor".to_string();
    let mut app = App::new(&config);
    app.on_poll(PollUpdate {
        generation: 0,
        payload: PollPayload::Single {
            domain: hostwatch::domain::Domain::Process,
            result: Ok(DomainSnapshot::Process(format_processes(make_processes(
                2000,
            )))),
        },
    });

    for tab in [Tab::Overview, Tab::Processes] {
        app.tab = tab;
        group.bench_function(tab.title(), |b| {
            b.iter(|| {
                let backend = TestBackend::new(160, 50);
                let mut terminal = Terminal::new(backend).expect("bench terminal init failed");
                terminal
                    .draw(|frame| ui::draw(frame, black_box(&app)))
                    .expect("bench draw failed");
                black_box(terminal.backend());
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_format_processes, bench_dashboard_render);
criterion_main!(benches);
