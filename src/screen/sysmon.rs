//! Rolling CPU and memory charts, or the history of a 0-100 value read from a file.

use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use sysinfo::System;

use super::{seconds_option, FrameContext, Screen};
use crate::config::defaults;
use crate::error::{ScreenError, ScreenResult};
use crate::layout::TextLayout;
use crate::terminal::{Geometry, TerminalGeometry};

#[derive(Debug, Clone, Args)]
pub struct SysmonArgs {
    /// Seconds between samples
    #[arg(short, long, default_value_t = defaults::SYSMON_SAMPLE.as_secs_f64())]
    pub delay: f64,

    /// Always chart 0-100% instead of scaling to the highest value seen
    #[arg(short, long = "no-adjust")]
    pub no_adjust: bool,

    /// Chart a file holding a single integer between 0 and 100
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Draw with ASCII characters only
    #[arg(short, long)]
    pub ascii: bool,
}

struct Symbols {
    pie: [&'static str; 5],
    full: &'static str,
    baseline: &'static str,
    corner: &'static str,
    horizontal: &'static str,
    vertical: &'static str,
}

const UNICODE: Symbols = Symbols {
    pie: ["○", "◔", "◑", "◕", "●"],
    full: "█",
    baseline: "▁",
    corner: "└",
    horizontal: "─",
    vertical: "│",
};

const ASCII: Symbols = Symbols {
    pie: [" ", "|", "(", "C", "O"],
    full: "#",
    baseline: "_",
    corner: "+",
    horizontal: "-",
    vertical: "|",
};

/// Source of the charted values. `prime` runs before the sampling pause, `read` after.
pub trait Sampler {
    fn prime(&mut self) {}

    fn read(&mut self) -> ScreenResult<Reading>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    System { cpu: f64, mem: f64, total_mb: u64 },
    Value(f64),
}

pub struct SystemSampler {
    sys: System,
}

impl SystemSampler {
    pub fn new() -> Self {
        Self { sys: System::new() }
    }
}

impl Default for SystemSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler for SystemSampler {
    fn prime(&mut self) {
        self.sys.refresh_cpu_usage();
    }

    fn read(&mut self) -> ScreenResult<Reading> {
        self.sys.refresh_cpu_usage();
        self.sys.refresh_memory();
        let total = self.sys.total_memory();
        let mem = if total == 0 {
            0.0
        } else {
            self.sys.used_memory() as f64 * 100.0 / total as f64
        };
        Ok(Reading::System {
            cpu: f64::from(self.sys.global_cpu_usage()),
            mem,
            total_mb: total / (1024 * 1024),
        })
    }
}

pub struct FileSampler {
    path: PathBuf,
}

impl FileSampler {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Sampler for FileSampler {
    fn read(&mut self) -> ScreenResult<Reading> {
        let name = self.path.display().to_string();
        let content = fs::read_to_string(&self.path)
            .map_err(|e| ScreenError::path_not_found(&self.path, e.to_string()))?;
        let value: i64 = content.trim().parse().map_err(|_| {
            ScreenError::parse(&name, "The file does not contain an integer as expected.")
        })?;
        if !(0..=100).contains(&value) {
            return Err(ScreenError::parse(
                &name,
                "The file contains invalid data (must be between 0 and 100).",
            ));
        }
        Ok(Reading::Value(value as f64))
    }
}

struct Sample {
    at: Instant,
    reading: Reading,
}

pub struct SysmonScreen {
    delay: Duration,
    adjust: bool,
    symbols: &'static Symbols,
    title: Option<String>,
    sampler: Box<dyn Sampler>,
    history: VecDeque<Sample>,
    geometry: TerminalGeometry,
    layout: TextLayout,
}

impl SysmonScreen {
    pub fn from_args(args: SysmonArgs) -> ScreenResult<Self> {
        let delay = seconds_option("delay", args.delay)?;
        let (sampler, title): (Box<dyn Sampler>, _) = match args.path {
            Some(path) => {
                if !path.is_file() {
                    return Err(ScreenError::path_not_found(
                        path,
                        "Make sure the file exists.",
                    ));
                }
                let title = path.display().to_string();
                (Box::new(FileSampler::new(path)), Some(title))
            }
            None => (Box::new(SystemSampler::new()), None),
        };
        Ok(Self::new(
            sampler,
            title,
            delay,
            !args.no_adjust,
            args.ascii,
            TerminalGeometry::new(),
        ))
    }

    pub fn new(
        sampler: Box<dyn Sampler>,
        title: Option<String>,
        delay: Duration,
        adjust: bool,
        ascii: bool,
        geometry: TerminalGeometry,
    ) -> Self {
        let layout = TextLayout::new(geometry.current());
        Self {
            delay,
            adjust,
            symbols: if ascii { &ASCII } else { &UNICODE },
            title,
            sampler,
            history: VecDeque::new(),
            geometry,
            layout,
        }
    }

    fn record(&mut self, reading: Reading, size: Geometry) {
        self.history.push_back(Sample {
            at: Instant::now(),
            reading,
        });
        let keep = size.width().saturating_sub(5).max(1);
        while self.history.len() > keep {
            self.history.pop_front();
        }
    }

    fn pie(&self, percent: f64) -> &'static str {
        let pos = (percent * 5.0 / 100.0) as usize;
        self.symbols.pie.get(pos).copied().unwrap_or("")
    }

    /// One bar chart of `values`, oldest on the left.
    fn chart(&self, title: &str, values: &[f64], size: Geometry) -> String {
        let width = size.width().saturating_sub(5);
        let rows = (size.height().saturating_sub(13) / 2).max(1);
        let ceiling = if self.adjust {
            values.iter().copied().fold(0.0, f64::max)
        } else {
            100.0
        };

        let mut txt = self.layout.align_right(title);
        txt.push('\n');
        txt.push_str(&format!("{ceiling:.0}%\n"));
        for y in (0..rows).rev() {
            txt.push(' ');
            txt.push_str(self.symbols.vertical);
            for x in 0..width {
                let Some(value) = values.get(x) else {
                    txt.push(' ');
                    continue;
                };
                let height = if ceiling > 0.0 {
                    (value * rows as f64 / ceiling) as usize
                } else {
                    1
                };
                if height > y {
                    txt.push_str(self.symbols.full);
                } else if y == 0 {
                    txt.push_str(self.symbols.baseline);
                } else {
                    txt.push(' ');
                }
            }
            txt.push('\n');
        }
        txt.push(' ');
        txt.push_str(self.symbols.corner);
        txt.push_str(&self.symbols.horizontal.repeat(width));
        txt.push('\n');

        let since = self
            .history
            .front()
            .map(|s| elapsed_label(s.at.elapsed()))
            .unwrap_or_default();
        let gap = values.len().saturating_sub(since.len() + 3);
        txt.push_str(&format!("  {since}{}now\n", " ".repeat(gap)));
        txt
    }

    pub fn frame_text(&mut self, size: Geometry) -> String {
        self.layout.set_geometry(size);
        let Some(last) = self.history.back().map(|s| s.reading) else {
            return String::new();
        };

        match last {
            Reading::System { cpu, mem, total_mb } => {
                let (cpus, mems): (Vec<f64>, Vec<f64>) = self
                    .history
                    .iter()
                    .filter_map(|s| match s.reading {
                        Reading::System { cpu, mem, .. } => Some((cpu, mem)),
                        Reading::Value(_) => None,
                    })
                    .unzip();
                let mut txt = self.chart("CPU Monitor", &cpus, size);
                txt.push('\n');
                txt.push_str(&self.chart("MEM Monitor", &mems, size));
                txt.push_str(&self.layout.center_horizontally(&format!(
                    "\n{}  CPU: {:.1}%   {}  MEM: {:.0}% (total {}MB)",
                    self.pie(cpu),
                    cpu,
                    self.pie(mem),
                    mem,
                    total_mb
                )));
                txt
            }
            Reading::Value(value) => {
                let values: Vec<f64> = self
                    .history
                    .iter()
                    .filter_map(|s| match s.reading {
                        Reading::Value(v) => Some(v),
                        Reading::System { .. } => None,
                    })
                    .collect();
                let title = format!(
                    "Monitoring: {}",
                    self.title.as_deref().unwrap_or("file")
                );
                let mut txt = self.chart(&title, &values, size);
                txt.push_str(&self.layout.center_horizontally(&format!(
                    "\n  Load: {:02}%   {} ",
                    value as i64,
                    self.pie(value)
                )));
                txt
            }
        }
    }
}

/// How long ago, in the largest sensible unit ("1.5h", "2.0m", "12.3s"); empty under 1s.
fn elapsed_label(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs > 3600.0 {
        format!("{:.1}h", secs / 3600.0)
    } else if secs > 60.0 {
        format!("{:.1}m", secs / 60.0)
    } else if secs > 1.0 {
        format!("{secs:.1}s")
    } else {
        String::new()
    }
}

impl Screen for SysmonScreen {
    fn name(&self) -> &'static str {
        "sysmon"
    }

    fn description(&self) -> &'static str {
        "displays a graphical system monitor"
    }

    fn render_frame(&mut self, ctx: &mut FrameContext<'_>) -> ScreenResult<()> {
        self.sampler.prime();
        ctx.pause(self.delay)?;
        let reading = self.sampler.read()?;

        let size = self.geometry.refresh();
        self.record(reading, size);
        let text = self.frame_text(size);
        ctx.clear()?;
        ctx.print(&text)
    }
}
