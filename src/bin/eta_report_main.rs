use signal_eta::monitoring::eta_log::{summarize, EtaLog};
use std::path::PathBuf;

fn main() {
    env_logger::init();
    let path = match std::env::args().nth(1) {
        Some(path) => PathBuf::from(path),
        None => {
            eprintln!("Usage: eta_report_main <eta_log.csv>");
            std::process::exit(2);
        }
    };

    let eta_log = EtaLog::new(path);
    let records = match eta_log.read() {
        Ok(records) => records,
        Err(e) => {
            eprintln!("Error reading {}: {}", eta_log.path().display(), e);
            std::process::exit(1);
        }
    };

    println!("ETA history:");
    for record in &records {
        println!(
            "{} route {}{}: base {:.0}s + {} red ({:.0}s) = {:.1} min",
            record.timestamp,
            record.route_index + 1,
            if record.active { " (active)" } else { "" },
            record.base_seconds,
            record.red_signals,
            record.penalty_seconds,
            record.total_seconds / 60.0
        );
    }

    let report = summarize(&records);
    println!("Report Summary:");
    println!("Records: {}", report.records);
    println!("Active route records: {}", report.active_records);
    println!(
        "Mean active ETA: {:.1} min",
        report.mean_active_total_seconds / 60.0
    );
    println!("Most red lights on a route: {}", report.max_red_signals);
}
