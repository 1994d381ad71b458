//! scanstage - CLI for staging a scanner wrapper and handing build properties
//! between build steps
//!
//! ## Commands
//!
//! - `scanstage stage` - Copy the wrapper to a node under a stable name
//! - `scanstage props write|read|delete` - Manage the job's handoff file
//! - `scanstage clean` - Remove a staged directory
//! - `scanstage completions` - Generate shell completions
//!
//! ## Quick Start
//!
//! ```bash
//! # Stage the wrapper into an agent workspace
//! scanstage stage --source /opt/veracode --dest /agent/ws/.veracode
//!
//! # Hand values to a later step of the same job
//! scanstage props write --build-dir "$JENKINS_HOME/jobs/app/builds/42" scan_name=demo
//! scanstage props read --build-dir "$JENKINS_HOME/jobs/app/builds/42" --format json
//! ```

use std::process::ExitCode;

mod cli;

fn main() -> ExitCode {
    match cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if std::env::var("SCANSTAGE_VERBOSE").is_ok() {
                eprintln!("{:?}", e);
            }
            ExitCode::FAILURE
        }
    }
}
