//! Render and parse timestamps with the platform's `strftime` and `strptime`.
//!
//! A thin command line front end over [`strtime::TimeFormatter`]: render a Unix timestamp (or the
//! current time) with a format pattern, or parse text with a pattern and print the Unix timestamp.
//! Output matches the C library exactly, since that is what does the work.
//!
//! # Command Line Arguments
//!
//! General form: `timefmt [options...] [seconds]`
//!
//! | Short form | Long form  | Argument         | Default               | Description                        |
//! | ---------- | ---------- | ---------------- | --------------------- | ---------------------------------- |
//! | `-f`       | `--format` | Format pattern   | `%Y-%m-%dT%H:%M:%S%z` | The `strftime`/`strptime` pattern  |
//! | `-m`       | `--mode`   | `local` or `utc` | `local`               | Which timezone rules apply         |
//! | `-u`       | `--utc`    |                  |                       | Shorthand for `--mode utc`         |
//! | `-p`       | `--parse`  | Text             | None                  | Parse text instead of rendering    |
//!
//! The optional positional argument is the timestamp to render, in seconds since the Unix epoch.
//! Without it, the current time is rendered. Local time follows the `TZ` environment variable.
//!
//! Set `RUST_LOG=debug` (or `trace`) to see why a conversion failed.
//!
//! # Examples
//!
//! ```sh
//! timefmt
//! timefmt -u 1705329025
//! timefmt -f "%A %d %B %Y" -1
//! TZ=Asia/Tokyo timefmt -f "%H:%M %Z"
//! timefmt -u -f "%Y-%m-%d %H:%M:%S" -p "2024-01-15 14:30:25"
//! ```

use std::error::Error;
use std::process::ExitCode;
use strtime::{TimeFormatter, Timestamp};

use args::{Action, Arguments, ArgumentsError};

mod args;

/// Render or parse according to `args`, printing the result to stdout.
///
/// # Errors
///
/// All errors are wrapped in `Box<dyn Error>`:
/// - [`strtime::FormatError`] if the conversion fails.
/// - `&str` if the current system time cannot be read.
fn run(args: Arguments) -> Result<ExitCode, Box<dyn Error>> {
	let formatter = TimeFormatter::with_pattern(args.pattern, args.mode);
	log::debug!("using {:?} in {} time", formatter.pattern(), formatter.mode());

	match args.action {
		Action::Parse(text) => {
			let time = formatter.parse(&text)?;
			println!("{}", time.sec);
		},
		Action::Render(time) => {
			let time = match time {
				Some(t) => t,
				None => Timestamp::now().ok_or("Failed to get current system time")?
			};
			println!("{}", formatter.render(time)?);
		}
	}

	Ok(ExitCode::SUCCESS)
}

/// Main program entry point.
///
/// Parses input arguments and renders or parses a timestamp. See [`crate`] documentation for
/// details.
fn main() -> ExitCode {
	env_logger::init();

	let args = match Arguments::parse(std::env::args_os().skip(1)) {
		Ok(a) => a,
		Err(e) => {
			return if let ArgumentsError::Help = e {
				println!("\
Render and parse timestamps with the C library's strftime and strptime.

Usage: timefmt [OPTIONS] [SECONDS]

Options:
  -f, --format <FORMAT>  the format pattern, default %Y-%m-%dT%H:%M:%S%z
  -m, --mode <MODE>      local or utc, default local
  -u, --utc              same as --mode utc
  -p, --parse <TEXT>     parse TEXT and print the Unix timestamp
  -h, --help             print this help

Without SECONDS or --parse, the current time is rendered.

Examples:
  timefmt -u 1705329025
  timefmt -f \"%A %d %B %Y\" -1
  timefmt -u -f \"%Y-%m-%d %H:%M:%S\" -p \"2024-01-15 14:30:25\"\n");
				ExitCode::SUCCESS
			} else {
				eprintln!("{}", e);
				ExitCode::FAILURE
			}
		}
	};

	run(args)
		.inspect_err(|e| eprintln!("{}", e))
		.unwrap_or(ExitCode::FAILURE)
}
