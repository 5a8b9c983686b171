//! Common types shared across CLI commands.

use clap::ValueEnum;
use geocam::CoordinateFormat;

/// Coordinate format selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FormatArg {
    /// Decimal degrees (40.446195, -79.948862)
    Dd,
    /// Degrees, minutes, seconds (40° 26' 46.302" N)
    Dms,
    /// Degrees and decimal minutes (40° 26.77170' N)
    Ddm,
}

impl From<FormatArg> for CoordinateFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Dd => CoordinateFormat::Dd,
            FormatArg::Dms => CoordinateFormat::Dms,
            FormatArg::Ddm => CoordinateFormat::Ddm,
        }
    }
}
