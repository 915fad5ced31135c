//! rDayDone main entrypoint.

use rdaydone::errors::AppError;
use rdaydone::run;

fn main() {
    println!();
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        if let AppError::Store(cause) = &e {
            eprintln!("  caused by {}", cause);
        }
        std::process::exit(1);
    }
}
