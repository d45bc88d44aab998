use crate::eval::Verdict;
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::io::Write;

const LOG_DIR: &str = "~/.local/share/agent-shellgate";

/// Route `log` records to stderr. Warnings only unless `verbose`.
///
/// Stdout carries the verdict, so nothing may log there.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let _ = TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

/// Append a decision record to ~/.local/share/agent-shellgate/decisions.log.
/// Best-effort: failures are ignored (logging must never block the gate).
pub fn log_decision(command: &str, verdict: &Verdict) {
    let dir = shellexpand::tilde(LOG_DIR);
    if dir.starts_with('~') {
        return;
    }
    let log_dir = std::path::Path::new(&*dir);
    let _ = std::fs::create_dir_all(log_dir);

    let Ok(mut file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("decisions.log"))
    else {
        return;
    };

    if let Err(e) = writeln!(file, "{}", format_record(command, verdict, &timestamp_now())) {
        log::debug!("decision log write failed: {e}");
    }
}

/// One tab-separated line: timestamp, decision, command, reason.
fn format_record(command: &str, verdict: &Verdict, ts: &str) -> String {
    let decision = if verdict.allowed { "allow" } else { "block" };
    let cmd: String = command
        .chars()
        .take(200)
        .map(|c| if c == '\n' || c == '\t' { ' ' } else { c })
        .collect();
    let reason = verdict.reason.replace('\n', "; ");
    format!("{ts}\t{decision}\t{cmd}\t{reason}")
}

/// UTC timestamp, second precision.
fn timestamp_now() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let (year, month, day) = civil_from_days(secs / 86_400);
    let rem = secs % 86_400;
    format!(
        "{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}Z",
        rem / 3600,
        (rem % 3600) / 60,
        rem % 60
    )
}

/// Days since 1970-01-01 to (year, month, day), Howard Hinnant's algorithm.
fn civil_from_days(days: u64) -> (u64, u64, u64) {
    let z = days + 719_468;
    let era = z / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + u64::from(month <= 2);
    (year, month, day)
}
