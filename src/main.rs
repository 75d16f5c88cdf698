//! Shuttle Ledger CLI
//!
//! Keeps the school-year payment ledger of a school-shuttle operator:
//! schools, students, monthly fee payments and operating expenses.
//!
//! # Usage
//!
//! ```bash
//! shuttle-ledger add-school "Atatürk İlkokulu" --location Merkez
//! shuttle-ledger add-student --school <ID> --name "Ali Yılmaz" --parent "Ayşe Yılmaz" --fee 1500
//! shuttle-ledger toggle <STUDENT_ID> 10
//! shuttle-ledger overdue > overdue.csv
//! shuttle-ledger --sqlite ledger.db migrate
//! ```
//!
//! Data lives in a local JSON document (`--data`, default `ledger.json`)
//! unless a SQLite database is configured with `--sqlite` or `LEDGER_SQLITE`.
//! Listings and reports are written as CSV to stdout; logs go to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (unknown id, invalid month, storage failure, etc.)

use shuttle_ledger::{cli, logging};
use std::process;

fn main() {
    let args = cli::parse_args();
    logging::init(args.log_json);

    let mut output = std::io::stdout();
    if let Err(e) = cli::run(&args, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
