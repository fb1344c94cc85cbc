use std::time::Duration;

use web_time::Instant;

use mosaic_core::PassReport;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Metrics {
    pub pass: u64,
    pub pass_ms: f32,
    pub items: usize,
    pub inserted: usize,
    pub reused: usize,
    pub resurrected: usize,
    pub removed: usize,
    pub pending_removals: usize,
}

impl Metrics {
    pub fn from_report(report: &PassReport, items: usize, elapsed: Duration) -> Self {
        Self {
            pass: report.pass,
            pass_ms: elapsed.as_secs_f32() * 1000.0,
            items,
            inserted: report.inserted,
            reused: report.reused,
            resurrected: report.resurrected,
            removed: report.removed + report.removing,
            pending_removals: report.pending_removals,
        }
    }
}

/// Pass counter and timing for a render host.
pub struct Inspector {
    pub enabled: bool,
    pass_count: u64,
    last_pass: Option<Instant>,
    passes_per_sec: f32,
    pass_ms_smooth: f32,
    pub metrics: Option<Metrics>,
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new()
    }
}

impl Inspector {
    pub fn new() -> Self {
        Self {
            enabled: true,
            pass_count: 0,
            last_pass: None,
            passes_per_sec: 0.0,
            pass_ms_smooth: 0.0,
            metrics: None,
        }
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    pub fn record(&mut self, report: &PassReport, items: usize, elapsed: Duration) {
        if !self.enabled {
            return;
        }
        self.pass_count += 1;

        let now = Instant::now();
        if let Some(prev) = self.last_pass.replace(now) {
            let dt = (now - prev).as_secs_f32();
            if dt > 0.0 {
                self.passes_per_sec = ema(self.passes_per_sec, 1.0 / dt);
            }
        }

        let m = Metrics::from_report(report, items, elapsed);
        self.pass_ms_smooth = ema(self.pass_ms_smooth, m.pass_ms);
        log::debug!("inspector: {}", Self::line(self.pass_count, self.pass_ms_smooth, &m));
        self.metrics = Some(m);
    }

    pub fn pass_count(&self) -> u64 {
        self.pass_count
    }

    /// Smoothed pass duration in milliseconds.
    pub fn pass_ms(&self) -> f32 {
        self.pass_ms_smooth
    }

    pub fn passes_per_sec(&self) -> f32 {
        self.passes_per_sec
    }

    pub fn summary(&self) -> String {
        match &self.metrics {
            Some(m) => Self::line(self.pass_count, self.pass_ms_smooth, m),
            None => format!("passes: {}", self.pass_count),
        }
    }

    fn line(count: u64, ms: f32, m: &Metrics) -> String {
        [
            format!("passes: {count}"),
            format!("pass: {:.2} ms", ms),
            format!("items: {}", m.items),
            format!("+{} ={} ~{} -{}", m.inserted, m.reused, m.resurrected, m.removed),
            format!("removing: {}", m.pending_removals),
        ]
        .join("  |  ")
    }
}

// simple EMA
fn ema(prev: f32, sample: f32) -> f32 {
    let a = 0.2;
    if prev == 0.0 {
        sample
    } else {
        (1.0 - a) * prev + a * sample
    }
}
