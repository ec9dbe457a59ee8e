//! Chart generation for swarm performance data.

use crate::metrics::{format_value, PerformanceData};
use anyhow::{anyhow, bail, Context, Result};
use clap::ValueEnum;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::register_font;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Figure size in pixels (a 15x10 figure at 100 dpi)
pub const DEFAULT_SIZE: (u32, u32) = (1500, 1000);

const DEFAULT_STEM: &str = "swarm_performance";

const FIGURE_TITLE: &str = "Aprio Swarm System Performance Metrics";

// Embedded so rendering never depends on system fonts
static SANS: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");
static SANS_BOLD: &[u8] = include_bytes!("../assets/fonts/DejaVuSans-Bold.ttf");
static MONO: &[u8] = include_bytes!("../assets/fonts/DejaVuSansMono.ttf");

/// Sea green, royal blue, crimson; cycled when there are more task types
const BAR_COLORS: [RGBColor; 3] = [
    RGBColor(0x2E, 0x8B, 0x57),
    RGBColor(0x41, 0x69, 0xE1),
    RGBColor(0xDC, 0x14, 0x3C),
];

const PANEL_FILL: RGBColor = RGBColor(0xAD, 0xD8, 0xE6);

/// Chart file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ChartFormat {
    /// Raster image
    #[default]
    Png,
    /// Vector image
    Svg,
}

impl ChartFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ChartFormat::Png => "png",
            ChartFormat::Svg => "svg",
        }
    }

    /// Format implied by the file extension, if any
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(ChartFormat::Png),
            "svg" => Some(ChartFormat::Svg),
            _ => None,
        }
    }
}

/// Pick the chart file and format from the optional CLI values.
///
/// An explicit format wins; otherwise the output extension decides, and
/// PNG is the fallback. Without an output the file is
/// `swarm_performance.<ext>` in the working directory.
pub fn resolve_output(output: Option<PathBuf>, format: Option<ChartFormat>) -> (PathBuf, ChartFormat) {
    match (output, format) {
        (Some(path), Some(format)) => (path, format),
        (Some(path), None) => {
            let format = ChartFormat::from_path(&path).unwrap_or_default();
            (path, format)
        }
        (None, format) => {
            let format = format.unwrap_or_default();
            (
                PathBuf::from(format!("{}.{}", DEFAULT_STEM, format.extension())),
                format,
            )
        }
    }
}

type Area<DB> = DrawingArea<DB, Shift>;

/// One bar chart of the figure
struct BarPanel<'a> {
    title: &'a str,
    y_desc: &'a str,
    values: &'a [f64],
    /// Fixed upper bound of the y axis, otherwise derived from the values
    y_max: Option<f64>,
    label: fn(f64) -> String,
}

impl BarPanel<'_> {
    fn y_upper(&self) -> f64 {
        self.y_max.unwrap_or_else(|| {
            self.values
                .iter()
                .cloned()
                .fold(0.0_f64, f64::max)
                .max(1.0)
                * 1.15
        })
    }
}

fn register_fonts() -> Result<()> {
    for (family, style, bytes) in [
        ("sans-serif", FontStyle::Normal, SANS),
        ("sans-serif", FontStyle::Bold, SANS_BOLD),
        ("monospace", FontStyle::Normal, MONO),
    ] {
        register_font(family, style, bytes)
            .map_err(|_| anyhow!("embedded {} font is not a valid font file", family))?;
    }
    Ok(())
}

/// Render the 2x2 performance figure to `path` in the given format
pub fn generate_performance_chart<P: AsRef<Path>>(
    data: &PerformanceData,
    path: P,
    size: (u32, u32),
    format: ChartFormat,
) -> Result<()> {
    let path = path.as_ref();
    if format == ChartFormat::Png && ChartFormat::from_path(path) != Some(ChartFormat::Png) {
        bail!("PNG charts need a .png file name: {}", path.display());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create chart directory: {}", parent.display()))?;
    }
    register_fonts()?;

    let drawn = match format {
        ChartFormat::Png => draw_figure(BitMapBackend::new(path, size).into_drawing_area(), data),
        ChartFormat::Svg => draw_figure(SVGBackend::new(path, size).into_drawing_area(), data),
    };
    drawn.with_context(|| format!("Failed to write chart: {}", path.display()))?;

    tracing::debug!(path = %path.display(), ?format, "chart written");
    Ok(())
}

/// Command that opens `path` in the desktop's default viewer
fn viewer_command(path: &Path) -> Command {
    #[cfg(target_os = "macos")]
    let mut cmd = Command::new("open");
    #[cfg(target_os = "windows")]
    let mut cmd = {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]);
        cmd
    };
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let mut cmd = Command::new("xdg-open");

    cmd.arg(path);
    cmd
}

/// Hand a saved chart to the system image viewer
pub fn open_in_viewer(path: &Path) -> Result<()> {
    let mut cmd = viewer_command(path);
    let program = cmd.get_program().to_string_lossy().into_owned();
    tracing::debug!(command = ?cmd, "opening chart");

    let status = cmd
        .stdin(Stdio::null())
        .status()
        .with_context(|| format!("Failed to launch viewer '{}'", program))?;
    if !status.success() {
        bail!("viewer '{}' exited with {}", program, status);
    }
    Ok(())
}

fn draw_figure<DB>(root: Area<DB>, data: &PerformanceData) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let body = root.titled(
        FIGURE_TITLE,
        TextStyle::from(("sans-serif", 32, FontStyle::Bold).into_font()),
    )?;
    let areas = body.split_evenly((2, 2));

    draw_bar_panel(
        &areas[0],
        &data.task_types,
        &BarPanel {
            title: "Processing Time by Task Type",
            y_desc: "Time (ms)",
            values: &data.processing_times_ms,
            y_max: None,
            label: |v| format!("{}ms", format_value(v)),
        },
    )?;

    draw_bar_panel(
        &areas[1],
        &data.task_types,
        &BarPanel {
            title: "Success Rate by Task Type",
            y_desc: "Success Rate (%)",
            values: &data.success_rates,
            y_max: Some(110.0),
            label: |v| format!("{}%", format_value(v)),
        },
    )?;

    draw_bar_panel(
        &areas[2],
        &data.task_types,
        &BarPanel {
            title: "Throughput by Task Type",
            y_desc: "Tasks/Second",
            values: &data.throughput,
            y_max: None,
            label: |v| format!("{}/s", format_value(v)),
        },
    )?;

    draw_summary_panel(&areas[3], data)?;

    root.present()?;
    Ok(())
}

fn draw_bar_panel<DB>(area: &Area<DB>, task_types: &[String], panel: &BarPanel<'_>) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let n = task_types.len() as i32;
    let y_max = panel.y_upper();

    let label_for = |v: &SegmentValue<i32>| match v {
        SegmentValue::CenterOf(i) => task_types.get(*i as usize).cloned().unwrap_or_default(),
        _ => String::new(),
    };

    let mut chart = ChartBuilder::on(area)
        .caption(panel.title, ("sans-serif", 22, FontStyle::Bold))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d((0..n).into_segmented(), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(task_types.len())
        .x_label_formatter(&label_for)
        .x_desc("Task Type")
        .y_desc(panel.y_desc)
        .draw()?;

    chart.draw_series(panel.values.iter().enumerate().map(|(i, &v)| {
        let color = BAR_COLORS[i % BAR_COLORS.len()];
        let i = i as i32;
        let mut bar = Rectangle::new(
            [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), v)],
            color.mix(0.7).filled(),
        );
        bar.set_margin(0, 0, 18, 18);
        bar
    }))?;

    // Value labels sit just above each bar
    let offset = y_max * 0.02;
    let label_style = TextStyle::from(("sans-serif", 16, FontStyle::Bold).into_font())
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    chart.draw_series(panel.values.iter().enumerate().map(|(i, &v)| {
        Text::new(
            (panel.label)(v),
            (SegmentValue::CenterOf(i as i32), v + offset),
            label_style.clone(),
        )
    }))?;

    Ok(())
}

fn draw_summary_panel<DB>(area: &Area<DB>, data: &PerformanceData) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (w, h) = area.dim_in_pixel();
    let (w, h) = (w as i32, h as i32);
    let (left, top, right, bottom) = (w / 10, h / 10, w - w / 20, h - h / 20);

    area.draw(&Rectangle::new(
        [(left, top), (right, bottom)],
        PANEL_FILL.mix(0.5).filled(),
    ))?;
    area.draw(&Rectangle::new(
        [(left, top), (right, bottom)],
        PANEL_FILL.stroke_width(2),
    ))?;

    let lines = summary_lines(data);
    let usable = (bottom - top - 30).max(1) as f64;
    let font_size = (usable / (lines.len() as f64 * 1.4)).min(18.0);
    let line_height = (font_size * 1.4).round() as i32;
    let style = TextStyle::from(("monospace", font_size).into_font()).color(&BLACK);

    for (row, line) in lines.iter().enumerate() {
        area.draw_text(line, &style, (left + 20, top + 15 + row as i32 * line_height))?;
    }

    Ok(())
}

/// Text of the summary panel, one entry per line
pub fn summary_lines(data: &PerformanceData) -> Vec<String> {
    let summary = &data.summary;
    let mut lines = vec![
        "Aprio Swarm System".to_string(),
        String::new(),
        "Performance Summary:".to_string(),
        format!("  • Total Tasks Processed: {}", summary.total_tasks),
        format!("  • Workers Active: {}", summary.workers_active),
        format!(
            "  • Average Processing Time: {}ms",
            format_value(summary.avg_processing_ms)
        ),
        format!("  • System Uptime: {}%", format_value(summary.uptime_percent)),
        format!(
            "  • Error Rate: {}% ({}/{} tasks)",
            format_value(summary.error_rate_percent()),
            summary.failed_tasks,
            summary.total_tasks
        ),
        String::new(),
        "Key Metrics:".to_string(),
    ];

    lines.extend(
        data.task_types
            .iter()
            .zip(data.processing_times_ms.iter())
            .map(|(task, &ms)| format!("  • {} Tasks: {}ms avg", task, format_value(ms))),
    );

    lines.extend([
        String::new(),
        "Performance Goals:".to_string(),
        "  • Target: 10,000+ docs/sec".to_string(),
        "  • Latency: <10ms".to_string(),
        "  • Scalability: Linear".to_string(),
    ]);

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::RunSummary;

    #[test]
    fn default_chart_is_a_png() {
        let dir = tempfile::tempdir().unwrap();
        let (name, format) = resolve_output(None, None);
        let path = dir.path().join(name);

        generate_performance_chart(&PerformanceData::default(), &path, DEFAULT_SIZE, format).unwrap();

        assert!(path.ends_with("swarm_performance.png"));
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn svg_chart_has_every_panel() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swarm_performance.svg");

        generate_performance_chart(&PerformanceData::default(), &path, DEFAULT_SIZE, ChartFormat::Svg)
            .unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("Processing Time by Task Type"));
        assert!(svg.contains("Success Rate by Task Type"));
        assert!(svg.contains("Throughput by Task Type"));
        assert!(svg.contains("102ms"));
        assert!(svg.contains("9.8/s"));
        assert!(svg.contains("Latency: &lt;10ms"));
    }

    #[test]
    fn sample_chart_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.png");
        let second = dir.path().join("b.png");
        let data = PerformanceData::default();

        generate_performance_chart(&data, &first, DEFAULT_SIZE, ChartFormat::Png).unwrap();
        generate_performance_chart(&data, &second, DEFAULT_SIZE, ChartFormat::Png).unwrap();

        assert_eq!(
            std::fs::read(&first).unwrap(),
            std::fs::read(&second).unwrap()
        );
    }

    #[test]
    fn creates_missing_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("perf").join("chart.png");

        generate_performance_chart(&PerformanceData::default(), &path, (800, 600), ChartFormat::Png)
            .unwrap();

        assert!(path.exists());
    }

    #[test]
    fn png_needs_png_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.jpg");

        let err = generate_performance_chart(&PerformanceData::default(), &path, DEFAULT_SIZE, ChartFormat::Png)
            .unwrap_err();

        assert!(err.to_string().contains(".png"));
        assert!(!path.exists());
    }

    #[test]
    fn output_and_format_resolution() {
        assert_eq!(
            resolve_output(None, Some(ChartFormat::Svg)),
            (PathBuf::from("swarm_performance.svg"), ChartFormat::Svg)
        );
        assert_eq!(
            resolve_output(Some(PathBuf::from("out/chart.SVG")), None),
            (PathBuf::from("out/chart.SVG"), ChartFormat::Svg)
        );
        assert_eq!(
            resolve_output(Some(PathBuf::from("chart")), None),
            (PathBuf::from("chart"), ChartFormat::Png)
        );
        assert_eq!(
            resolve_output(Some(PathBuf::from("chart.png")), Some(ChartFormat::Svg)),
            (PathBuf::from("chart.png"), ChartFormat::Svg)
        );
    }

    #[test]
    fn cycles_colors_for_larger_datasets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.svg");
        let data = PerformanceData {
            task_types: ["Echo", "Compute", "Error", "Index", "Embed"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            processing_times_ms: vec![102.0, 200.0, 50.0, 75.0, 310.0],
            success_rates: vec![100.0, 100.0, 0.0, 95.5, 80.0],
            throughput: vec![9.8, 5.0, 20.0, 13.3, 3.2],
            summary: RunSummary {
                total_tasks: 40,
                workers_active: 4,
                avg_processing_ms: 147.4,
                uptime_percent: 99.9,
                failed_tasks: 6,
            },
        };

        generate_performance_chart(&data, &path, DEFAULT_SIZE, ChartFormat::Svg).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("310ms"));
        assert!(svg.contains("95.5%"));
    }

    #[test]
    fn summary_lists_sample_run_figures() {
        let lines = summary_lines(&PerformanceData::default());
        assert!(lines.contains(&"  • Total Tasks Processed: 5".to_string()));
        assert!(lines.contains(&"  • Workers Active: 2".to_string()));
        assert!(lines.contains(&"  • Average Processing Time: 118ms".to_string()));
        assert!(lines.contains(&"  • Error Rate: 20% (1/5 tasks)".to_string()));
        assert!(lines.contains(&"  • Compute Tasks: 200ms avg".to_string()));
        assert!(lines.contains(&"  • Latency: <10ms".to_string()));
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    #[test]
    fn viewer_is_xdg_open_with_chart_path() {
        let cmd = viewer_command(Path::new("swarm_performance.png"));
        assert_eq!(cmd.get_program(), "xdg-open");
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, vec![std::ffi::OsStr::new("swarm_performance.png")]);
    }
}
