//! Colorful console output for the weight assignment pipeline.
//!
//! Provides a custom `tracing` layer that formats pipeline events with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Stage summaries (load, classify, build, solve, validate)
//! - **WARN**: Skipped rows, skipped compounds, constraint violations
//! - **DEBUG**: Per-row and backend details (only with `-vv`)

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static RUN_START_NANOS: AtomicU64 = AtomicU64::new(0);

/// Package version for banner display.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initializes console output at INFO.
///
/// Safe to call multiple times - only the first call has effect.
pub fn init() {
    init_with_level(LevelFilter::INFO);
}

/// Initializes console output with `level` as the default filter.
///
/// `RUST_LOG` still overrides the default. Only the first call has effect.
pub fn init_with_level(level: LevelFilter) {
    INIT.get_or_init(|| {
        print_banner();
        mark_run_start();

        let filter = EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy();

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(WeightConsoleLayer)
            .try_init();
    });
}

fn mark_run_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    RUN_START_NANOS.store(nanos, Ordering::Relaxed);
}

fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = RUN_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

fn print_banner() {
    let banner = r#"
 ___ _           __      __   _      _   _
/ __(_)__ _ _ _  \ \    / /__(_)__ _| |_| |_
\__ \ / _` | ' \  \ \/\/ / -_) / _` | ' \  _|
|___/_\__, |_||_|  \_/\_/\___|_\__, |_||_\__|
      |___/                    |___/
"#;

    let version_line = format!("            v{} - Sign Weight Assignment by LP\n", VERSION);

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats pipeline events with colors.
pub struct WeightConsoleLayer;

impl<S: Subscriber> Layer<S> for WeightConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("signweight") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    message: Option<String>,
    status: Option<String>,
    verdict: Option<String>,
    path: Option<String>,
    objective: Option<f64>,
    duration_ms: Option<u64>,
    time_limit_ms: Option<u64>,
    inscription_count: Option<u64>,
    sign_count: Option<u64>,
    token_count: Option<u64>,
    skipped: Option<u64>,
    compound_count: Option<u64>,
    modifier_count: Option<u64>,
    authority_count: Option<u64>,
    commodity_count: Option<u64>,
    numeral_count: Option<u64>,
    standard_count: Option<u64>,
    variable_count: Option<u64>,
    constraint_count: Option<u64>,
    curvature_count: Option<u64>,
    hierarchy_count: Option<u64>,
    efficiency_count: Option<u64>,
    warning_count: Option<u64>,
    checked: Option<u64>,
    violation_count: Option<u64>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.record_str(field, s.trim_matches('"'));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        let slot = match field.name() {
            "duration_ms" => &mut self.duration_ms,
            "time_limit_ms" => &mut self.time_limit_ms,
            "inscription_count" => &mut self.inscription_count,
            "sign_count" => &mut self.sign_count,
            "token_count" => &mut self.token_count,
            "skipped" => &mut self.skipped,
            "compound_count" => &mut self.compound_count,
            "modifier_count" => &mut self.modifier_count,
            "authority_count" => &mut self.authority_count,
            "commodity_count" => &mut self.commodity_count,
            "numeral_count" => &mut self.numeral_count,
            "standard_count" => &mut self.standard_count,
            "variable_count" => &mut self.variable_count,
            "constraint_count" => &mut self.constraint_count,
            "curvature_count" => &mut self.curvature_count,
            "hierarchy_count" => &mut self.hierarchy_count,
            "efficiency_count" => &mut self.efficiency_count,
            "warning_count" => &mut self.warning_count,
            "checked" => &mut self.checked,
            "violation_count" => &mut self.violation_count,
            _ => return,
        };
        *slot = Some(value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if field.name() == "objective" {
            self.objective = Some(value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "message" => self.message = Some(value.to_string()),
            "status" => self.status = Some(value.to_string()),
            "verdict" => self.verdict = Some(value.to_string()),
            "path" => self.path = Some(value.to_string()),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    if level == Level::WARN {
        return format_warning(v);
    }

    match v.event.as_deref().unwrap_or("") {
        "load_end" => format_load_end(v),
        "tables_end" => format_tables_end(v),
        "classify_end" => format_classify_end(v),
        "build_end" => format_build_end(v),
        "solve_start" => format_solve_start(v),
        "solve_end" => format_solve_end(v),
        "validate_end" => format_validate_end(v),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn count(n: Option<u64>) -> String {
    n.unwrap_or(0)
        .to_formatted_string(&Locale::en)
        .bright_yellow()
        .to_string()
}

fn format_warning(v: &EventVisitor) -> String {
    let message = v.message.as_deref().unwrap_or("");
    format!("{} {} {}", format_elapsed(), "⚠".yellow().bold(), message.yellow())
}

fn format_load_end(v: &EventVisitor) -> String {
    let mut output = format!(
        "{} {} Corpus loaded │ {} inscriptions │ {} signs │ {} tokens",
        format_elapsed(),
        "◆".bright_green(),
        count(v.inscription_count),
        count(v.sign_count),
        count(v.token_count),
    );
    if let Some(skipped) = v.skipped.filter(|s| *s > 0) {
        output.push_str(&format!(" │ {} rows skipped", skipped.bright_red()));
    }
    if let Some(ref path) = v.path {
        output.push_str(&format!(" │ {}", path.bright_black()));
    }
    output
}

fn format_tables_end(v: &EventVisitor) -> String {
    format!(
        "{} {} Tables loaded │ {} compounds │ {} modifiers",
        format_elapsed(),
        "◆".bright_green(),
        count(v.compound_count),
        count(v.modifier_count),
    )
}

fn format_classify_end(v: &EventVisitor) -> String {
    format!(
        "{} {} Classified {} signs │ authority {} │ commodity {} │ numeral {} │ standard {}",
        format_elapsed(),
        "◆".bright_green(),
        count(v.sign_count),
        count(v.authority_count),
        count(v.commodity_count),
        count(v.numeral_count),
        count(v.standard_count),
    )
}

fn format_build_end(v: &EventVisitor) -> String {
    let mut output = format!(
        "{} {} Built {} constraints │ curvature {} │ hierarchy {} │ compound {} │ efficiency {}",
        format_elapsed(),
        "◆".bright_green(),
        count(v.constraint_count),
        count(v.curvature_count),
        count(v.hierarchy_count),
        count(v.compound_count),
        count(v.efficiency_count),
    );
    if let Some(warnings) = v.warning_count.filter(|w| *w > 0) {
        output.push_str(&format!(" │ {} warnings", warnings.yellow()));
    }
    output
}

fn format_solve_start(v: &EventVisitor) -> String {
    let mut output = format!(
        "{} {} Solving │ {} variables │ {} constraints",
        format_elapsed(),
        "▶".bright_green().bold(),
        count(v.variable_count),
        count(v.constraint_count),
    );
    if let Some(limit) = v.time_limit_ms {
        output.push_str(&format!(" │ {} limit", format_duration_ms(limit).bright_yellow()));
    }
    output
}

fn format_solve_end(v: &EventVisitor) -> String {
    let status = v.status.as_deref().unwrap_or("unknown");
    let solved = matches!(status, "optimal" | "feasible");
    let status_colored = if solved {
        status.to_uppercase().bright_green().bold().to_string()
    } else {
        status.to_uppercase().bright_red().bold().to_string()
    };

    let mut output = format!(
        "{} {} Solving complete │ {} │ {}",
        format_elapsed(),
        "■".bright_cyan().bold(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        status_colored,
    );
    if let Some(objective) = v.objective {
        output.push_str(&format!(" │ objective {}", format!("{:.4}", objective).bright_white()));
    }
    output
}

fn format_validate_end(v: &EventVisitor) -> String {
    let verdict = v.verdict.as_deref().unwrap_or("unknown");
    let verdict_colored = match verdict {
        "consistent" => verdict.bright_green().bold().to_string(),
        "inconsistent" => verdict.yellow().bold().to_string(),
        _ => verdict.bright_red().bold().to_string(),
    };

    let mut output = format!(
        "{} {} Validation │ {}",
        format_elapsed(),
        "✓".bright_cyan(),
        verdict_colored,
    );
    if v.checked.is_some() {
        output.push_str(&format!(
            " │ {} checked │ {} violations",
            count(v.checked),
            count(v.violation_count),
        ));
    }
    output
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}
