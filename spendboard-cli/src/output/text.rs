//! Text output formatting with bars and colors.

use spendboard_core::{
    CostEstimate, CostSample, DateRange, EstimatorInputs, LoadStatus, ResourceRecord,
    UsageBreakdown, ViewModel, format_usd, resources_total, series_peak, series_total,
};
use spendboard_store::{EditBuffer, LoadReport, RangeOutcome};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

// Bar characters
const BAR_FULL: char = '█';
const BAR_EMPTY: char = '░';

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
    bar_width: usize,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self {
            use_colors,
            bar_width: 10,
        }
    }

    /// Set the bar width.
    pub fn with_bar_width(mut self, width: usize) -> Self {
        self.bar_width = width;
        self
    }

    /// Formats every panel of the view model.
    pub fn format_view(&self, view: &ViewModel) -> String {
        let mut sections = vec![self.format_status(&view.status)];

        if view.is_empty() {
            sections.push(self.dim("No data"));
            return sections.join("\n");
        }

        sections.push(self.format_cost_series(&view.cost_series));
        sections.push(self.format_breakdown("Service Usage Breakdown", &view.service_usage));
        sections.push(self.format_breakdown("Daily Cost Variation", &view.daily_costs));
        sections.push(self.format_resources(&view.resources));
        sections.join("\n\n")
    }

    /// Formats the load status line.
    pub fn format_status(&self, status: &LoadStatus) -> String {
        match status {
            LoadStatus::Idle => self.dim("Idle"),
            LoadStatus::Loading => self.yellow("Loading..."),
            LoadStatus::Ready => self.green("✓ Loaded"),
            LoadStatus::Failed(message) => self.red(&format!("✗ Load failed: {message}")),
        }
    }

    /// Formats the monthly cost trend with bars scaled to the peak month.
    pub fn format_cost_series(&self, series: &[CostSample]) -> String {
        let mut lines = vec![self.bold("Monthly Cost Trend"), "─".repeat(40)];

        if series.is_empty() {
            lines.push(self.dim("  (empty)"));
            return lines.join("\n");
        }

        let peak = series_peak(series).map_or(0.0, |s| s.cost);
        for sample in series {
            let bar = self.bar(percent_of(sample.cost, peak));
            lines.push(format!(
                "  {:<10} {} {:>12}",
                sample.month,
                bar,
                format!("${}", format_usd(sample.cost))
            ));
        }

        lines.push(format!(
            "  {:<10} {} {}",
            "Total",
            " ".repeat(self.bar_width),
            self.green(&format!("{:>12}", format!("${}", format_usd(series_total(series)))))
        ));
        lines.join("\n")
    }

    /// Formats a labelled breakdown with each entry's share of the total.
    pub fn format_breakdown(&self, title: &str, breakdown: &UsageBreakdown) -> String {
        let mut lines = vec![self.bold(title), "─".repeat(40)];

        if breakdown.is_empty() {
            lines.push(self.dim("  (empty)"));
            return lines.join("\n");
        }

        let values = breakdown.entries().map(|(_, v)| v);
        for ((label, share), value) in breakdown.shares().into_iter().zip(values) {
            lines.push(format!(
                "  {:<10} {} {:>10.2} {}",
                label,
                self.bar(share),
                value,
                self.dim(&format!("({share:.0}%)"))
            ));
        }

        if breakdown.labels.len() != breakdown.data.len() {
            lines.push(self.yellow(&format!(
                "  ⚠ {} labels, {} values",
                breakdown.labels.len(),
                breakdown.data.len()
            )));
        }

        lines.join("\n")
    }

    /// Formats the resource tracker table.
    pub fn format_resources(&self, resources: &[ResourceRecord]) -> String {
        let mut lines = vec![self.bold("Cloud Resource Tracker"), "─".repeat(40)];

        if resources.is_empty() {
            lines.push(self.dim("  (empty)"));
            return lines.join("\n");
        }

        lines.push(self.dim(&format!("  {:<20} {:<10} {:>10}", "Name", "Type", "Cost")));
        for resource in resources {
            lines.push(format!(
                "  {:<20} {:<10} {:>10}",
                resource.name,
                resource.kind,
                format!("${}", format_usd(resource.cost))
            ));
        }

        let total = resources_total(resources);
        lines.push(format!(
            "  {:<31} {}",
            "Total",
            self.green(&format!("{:>10}", format!("${}", format_usd(total))))
        ));
        lines.join("\n")
    }

    /// Formats the outcome of a range filter.
    pub fn format_range_outcome(&self, range: &DateRange, outcome: &RangeOutcome) -> String {
        let header = format!(
            "Range {} → {} ({} days)",
            self.cyan(&range.start().to_string()),
            self.cyan(&range.end().to_string()),
            range.days()
        );

        let detail = match outcome {
            RangeOutcome::Applied { samples } => self.green(&format!("✓ {samples} months")),
            RangeOutcome::Stale => self.yellow("Superseded by a newer update"),
            RangeOutcome::Failed(message) => {
                self.red(&format!("✗ Range request failed: {message}"))
            }
            RangeOutcome::Unmounted => self.dim("Dashboard closed"),
        };

        format!("{header}\n{detail}")
    }

    /// Formats an estimate next to its inputs.
    pub fn format_estimate(&self, inputs: &EstimatorInputs, estimate: Option<&CostEstimate>) -> String {
        let mut lines = vec![self.bold("Monthly Cost Estimate"), "─".repeat(40)];
        lines.push(format!("  Instances:      {}", inputs.instance_count));
        lines.push(format!("  Hours per day:  {}", inputs.hours_per_day));
        lines.push(format!("  Days per month: {}", inputs.days_per_month));
        lines.push(format!("  Cost per hour:  ${}", inputs.cost_per_hour));
        lines.push(String::new());

        match estimate {
            Some(estimate) => {
                lines.push(format!(
                    "Estimated Monthly Cost: {}",
                    self.green(&format!("${}", estimate.display()))
                ));
                if !estimate.matches(inputs) {
                    lines.push(self.yellow(&format!(
                        "⚠ Local formula gives ${}",
                        format_usd(inputs.monthly_cost())
                    )));
                }
            }
            None => lines.push(format!(
                "Estimated Monthly Cost: {} {}",
                self.green(&format!("${}", format_usd(inputs.monthly_cost()))),
                self.dim("(local)")
            )),
        }

        lines.join("\n")
    }

    /// Formats an edit buffer as an indexed table.
    pub fn format_edit_buffer(&self, buffer: &EditBuffer) -> String {
        let mut lines = Vec::new();
        match buffer {
            EditBuffer::CostSeries(series) => {
                lines.push(self.dim(&format!("  {:>3}  {:<10} {:>12}", "#", "month", "cost")));
                for (i, sample) in series.iter().enumerate() {
                    lines.push(format!("  {i:>3}  {:<10} {:>12.2}", sample.month, sample.cost));
                }
            }
            EditBuffer::ServiceUsage(usage) => {
                lines.push(self.dim(&format!("  {:>3}  {:<10} {:>12}", "#", "label", "value")));
                for (i, (label, value)) in usage.entries().enumerate() {
                    lines.push(format!("  {i:>3}  {label:<10} {value:>12.2}"));
                }
            }
        }
        lines.join("\n")
    }

    /// Formats a commit notice.
    pub fn format_notice(&self, ok: bool, notice: &str) -> String {
        if ok {
            self.green(&format!("✓ {notice}"))
        } else {
            self.red(&format!("✗ {notice}"))
        }
    }

    /// Formats the endpoint check report.
    pub fn format_report(&self, report: &LoadReport) -> String {
        let mut lines = Vec::new();
        for entry in &report.endpoints {
            let status = match &entry.result {
                Ok(items) => format!("{} {items} items", self.green("✓")),
                Err(message) => self.red(&format!("✗ {message}")),
            };
            lines.push(format!(
                "{:<22} {} {}",
                entry.endpoint.path(),
                status,
                self.dim(&format!("({} ms)", entry.elapsed.as_millis()))
            ));
        }
        lines.join("\n")
    }

    /// Formats a bar for a 0-100 percentage.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn bar(&self, percent: f64) -> String {
        let percent = percent.clamp(0.0, 100.0);
        let filled = ((percent / 100.0) * self.bar_width as f64).round() as usize;
        let empty = self.bar_width.saturating_sub(filled);

        let bar = format!(
            "{}{}",
            BAR_FULL.to_string().repeat(filled),
            BAR_EMPTY.to_string().repeat(empty)
        );

        self.cyan(&bar)
    }

    // ========================================================================
    // Color Helpers
    // ========================================================================

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

fn percent_of(value: f64, peak: f64) -> f64 {
    if peak > 0.0 { value / peak * 100.0 } else { 0.0 }
}
