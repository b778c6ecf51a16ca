use chrono::{Local, TimeZone};
use ratatui::Terminal;
use ratatui::backend::TestBackend;

use crate::action::Action;
use crate::app::{App, Tab};
use crate::client::{BatchFailure, ClientError, DomainSnapshot, PollPayload, PollUpdate};
use crate::config::Config;
use crate::domain::Domain;
use crate::metrics::{
    DiskAggregation, ProcessSample, SlotPolicy, format_disk, format_gpu, format_memory,
};
use crate::system::snapshot::{
    DiskDevice, FsUsage, GpuController, MemoryModule, MemoryTotals, ProcessEntry,
};

const GB: u64 = 1024 * 1024 * 1024;

fn buffer_to_string(buf: &ratatui::buffer::Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            let cell = buf.cell((x, y)).unwrap();
            out.push_str(cell.symbol());
        }
        if y + 1 < area.height {
            out.push('\n');
        }
    }
    out
}

fn render_app(app: &App, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|frame| super::draw(frame, app)).unwrap();
    buffer_to_string(terminal.backend().buffer())
}

fn make_app() -> App {
    let mut config = Config::default();
    config.colors.color_support = "truecolor".to_string();
    config.dashboard.server_url = "http://10.0.0.5:5000".to_string();
    App::new(&config)
}

fn feed(app: &mut App, snapshot: DomainSnapshot) {
    let now = Local.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
    let domain = snapshot.domain();
    app.on_poll_at(
        PollUpdate {
            generation: 0,
            payload: PollPayload::Single {
                domain,
                result: Ok(snapshot),
            },
        },
        now,
    );
}

fn fail(app: &mut App, domain: Domain) {
    let error = ClientError::Status {
        url: format!("http://10.0.0.5:5000{}", domain.path()),
        status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
    };
    app.on_poll(PollUpdate {
        generation: 0,
        payload: PollPayload::Single {
            domain,
            result: Err(error),
        },
    });
}

fn processes() -> DomainSnapshot {
    let entry = |pid: u32, name: &str, cpu: f64| {
        ProcessSample::from(ProcessEntry {
            pid,
            name: name.to_string(),
            cpu_percent: Some(cpu),
            mem_percent: Some(1.5),
            threads: Some(12),
            user: Some("alice".to_string()),
            state: Some("Running".to_string()),
            ..ProcessEntry::default()
        })
    };
    DomainSnapshot::Process(vec![
        entry(4242, "postgres", 63.0),
        entry(17, "sshd", 2.0),
    ])
}

fn memory() -> DomainSnapshot {
    let totals = MemoryTotals {
        total: 16 * GB,
        free: 12 * GB,
        used: 4 * GB,
        available: 12 * GB,
        swap_total: 2 * GB,
        swap_used: 0,
    };
    let module = MemoryModule {
        size: 8 * GB,
        bank: Some("BANK 0".to_string()),
        kind: Some("DDR4".to_string()),
        clock_speed: Some(3200),
        ..MemoryModule::default()
    };
    DomainSnapshot::Memory(format_memory(totals, vec![module], SlotPolicy::Modules))
}

fn disk() -> DomainSnapshot {
    let layout = [DiskDevice {
        name: "nvme0n1".to_string(),
        kind: Some("NVMe".to_string()),
        size: 500 * GB,
        ..DiskDevice::default()
    }];
    let fs = [FsUsage {
        fs: "/dev/nvme0n1p2".to_string(),
        mount: "/".to_string(),
        size: 500 * GB,
        used: 125 * GB,
        available: 375 * GB,
    }];
    DomainSnapshot::Disk(format_disk(&layout, &fs, DiskAggregation::PrimaryVolume))
}

fn gpu() -> DomainSnapshot {
    let controller = GpuController {
        model: Some("GeForce RTX 3060".to_string()),
        vendor: Some("NVIDIA".to_string()),
        memory_total_mb: Some(12288.0),
        memory_used_mb: Some(3072.0),
        utilization_gpu: Some(37.0),
        ..GpuController::default()
    };
    DomainSnapshot::Gpu(format_gpu(&[controller]).unwrap())
}

#[test]
fn header_shows_tabs_and_server() {
    let app = make_app();
    let output = render_app(&app, 140, 20);
    let header: Vec<&str> = output.lines().take(3).collect();
    let header = header.join("\n");
    assert!(header.contains(" hostwatch "));
    assert!(header.contains("1 Overview"));
    assert!(header.contains("6 GPU"));
    assert!(header.contains("http://10.0.0.5:5000"));
    assert!(header.contains("parallel"));
}

#[test]
fn overview_before_first_response_is_loading() {
    let app = make_app();
    let output = render_app(&app, 120, 30);
    assert!(output.contains("Loading..."));
    assert!(!output.contains("N/A"));
    assert!(output.contains("waiting for data"));
}

#[test]
fn overview_lists_processes_and_gauges() {
    let mut app = make_app();
    feed(&mut app, processes());
    feed(&mut app, memory());
    feed(&mut app, disk());
    let output = render_app(&app, 120, 30);

    assert!(output.contains("postgres"));
    assert!(output.contains("4242"));
    assert!(output.contains("High"));
    assert!(output.contains("25.0%"));
    assert!(output.contains("updated 09:26:53"));
    // detail columns stay on the Processes view
    assert!(!output.contains("alice"));
}

#[test]
fn processes_view_shows_detail_columns() {
    let mut app = make_app();
    feed(&mut app, processes());
    app.dispatch(Action::SelectTab(Tab::Processes));
    let output = render_app(&app, 120, 20);

    assert!(output.contains("Threads"));
    assert!(output.contains("alice"));
    assert!(output.contains("running"));
}

#[test]
fn memory_view_shows_totals_and_modules() {
    let mut app = make_app();
    feed(&mut app, memory());
    app.dispatch(Action::SelectTab(Tab::Memory));
    let output = render_app(&app, 120, 40);

    assert!(output.contains("16.0 GB"));
    assert!(output.contains("25.0%"));
    assert!(output.contains("BANK 0"));
    assert!(output.contains("3200 MHz"));
    assert!(output.contains("1 of 1"));
}

#[test]
fn disk_view_shows_capacity() {
    let mut app = make_app();
    feed(&mut app, disk());
    app.dispatch(Action::SelectTab(Tab::Disk));
    let output = render_app(&app, 120, 40);

    assert!(output.contains("NVMe"));
    assert!(output.contains("500.0 GB"));
    assert!(output.contains("25.0%"));
}

#[test]
fn gpu_view_shows_adapter() {
    let mut app = make_app();
    feed(&mut app, gpu());
    app.dispatch(Action::SelectTab(Tab::Gpu));
    let output = render_app(&app, 120, 40);

    assert!(output.contains("GeForce RTX 3060"));
    assert!(output.contains("NVIDIA"));
    assert!(output.contains("37%"));
}

#[test]
fn failed_domain_replaces_its_widget_only() {
    let mut app = make_app();
    feed(&mut app, gpu());
    fail(&mut app, Domain::Gpu);
    feed(&mut app, processes());

    app.dispatch(Action::SelectTab(Tab::Gpu));
    let output = render_app(&app, 120, 40);
    assert!(output.contains("Failed to fetch GPU data"));
    assert!(!output.contains("GeForce RTX 3060"));

    app.dispatch(Action::SelectTab(Tab::Processes));
    let output = render_app(&app, 120, 20);
    assert!(output.contains("postgres"));
}

#[test]
fn overview_gauge_shows_error_instead_of_stale_value() {
    let mut app = make_app();
    feed(&mut app, memory());
    feed(&mut app, disk());
    assert!(render_app(&app, 120, 30).contains("25.0%"));

    fail(&mut app, Domain::Memory);
    let output = render_app(&app, 120, 30);
    assert!(output.contains("Failed to fetch memory data"));
    // the disk gauge keeps its value
    assert!(output.contains("Disk"));
    assert_eq!(output.matches("25.0%").count(), 1);
}

#[test]
fn failed_cycle_shows_in_statusbar() {
    let mut app = make_app();
    app.on_poll(PollUpdate {
        generation: 0,
        payload: PollPayload::Batch(Err(BatchFailure {
            domain: Domain::Disk,
            error: ClientError::Status {
                url: "http://10.0.0.5:5000/DiskInfo".to_string(),
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            },
        })),
    });
    let output = render_app(&app, 120, 30);
    let last = output.lines().last().unwrap_or_default();
    assert!(last.contains("Failed to fetch disk data"));
    assert!(!last.contains("Quit"));
}

#[test]
fn help_overlay_lists_keybinds() {
    let mut app = make_app();
    app.dispatch(Action::ToggleHelp);
    let output = render_app(&app, 100, 30);
    assert!(output.contains("Keybinds"));
    assert!(output.contains("Cycle theme"));
    assert!(output.contains("Jump to view"));
}

#[test]
fn every_view_renders_in_a_tiny_terminal() {
    let mut app = make_app();
    feed(&mut app, processes());
    feed(&mut app, memory());
    feed(&mut app, disk());
    feed(&mut app, gpu());
    for tab in Tab::ALL {
        app.dispatch(Action::SelectTab(tab));
        let _ = render_app(&app, 20, 6);
    }
}
