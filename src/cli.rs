use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::Parser;

use crate::error::CopyError;

pub const DEFAULT_DAY_OFFSET: &str = "2";

/// Copy every time entry of one day to the following day
#[derive(Parser, Debug)]
#[command(name = "toggl-shift", version, about, long_about = None)]
pub struct Cli {
    /// Days from today of the day to copy (may be negative)
    #[arg(value_name = "DAYS", allow_negative_numbers = true, default_value = DEFAULT_DAY_OFFSET)]
    pub days: String,
}

impl Cli {
    pub fn day_offset(&self) -> Result<i64, CopyError> {
        self.days.parse().map_err(|source| CopyError::ArgumentParse {
            input: self.days.clone(),
            source,
        })
    }
}

/// Resolves the day offset from the full argument list (program name first).
///
/// `--help` and `--version` print and exit here.
pub fn parse_day_offset<I, T>(args: I) -> Result<i64, CopyError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args).map_err(|err| match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
        _ => {
            let rendered = err.to_string();
            let line = rendered.lines().next().unwrap_or_default();
            CopyError::Usage(line.trim_start_matches("error: ").to_string())
        }
    })?;
    cli.day_offset()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset(args: &[&str]) -> Result<i64, CopyError> {
        parse_day_offset(std::iter::once("toggl-shift").chain(args.iter().copied()))
    }

    #[test]
    fn no_arguments_defaults_to_two() {
        assert_eq!(offset(&[]).unwrap(), 2);
    }

    #[test]
    fn explicit_offsets() {
        assert_eq!(offset(&["5"]).unwrap(), 5);
        assert_eq!(offset(&["-3"]).unwrap(), -3);
        assert_eq!(offset(&["0"]).unwrap(), 0);
    }

    #[test]
    fn non_integer_is_a_parse_error() {
        let err = offset(&["abc"]).unwrap_err();
        assert!(matches!(err, CopyError::ArgumentParse { ref input, .. } if input == "abc"));

        assert!(matches!(offset(&["1.5"]), Err(CopyError::ArgumentParse { .. })));
    }

    #[test]
    fn extra_arguments_are_a_usage_error() {
        let err = offset(&["1", "2"]).unwrap_err();
        assert!(matches!(err, CopyError::Usage(_)), "{err}");

        let err = offset(&["--bogus"]).unwrap_err();
        assert!(matches!(err, CopyError::Usage(_)), "{err}");
    }
}
