use core::fmt;

/// Errors reported by the toggler library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The command channel stayed full for the whole bounded wait.
    ChannelFull,
    /// The configuration cannot be used to build the context (empty period
    /// table or a zero period).
    InvalidConfig,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ChannelFull => f.write_str("command channel full"),
            Error::InvalidConfig => f.write_str("invalid toggler configuration"),
        }
    }
}

impl core::error::Error for Error {}
