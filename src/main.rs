use anyhow::Result;
use free_text_explorer::app;
use free_text_explorer::cli::Cli;
use std::io;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    if let Some(report) = app::run(&cli, stdin.lock(), &mut stdout)? {
        eprintln!(
            "Session {}: {} error(s), {} warning(s), log at {:?}",
            report.session_id, report.errors, report.warnings, report.log_file
        );
    }

    Ok(())
}
