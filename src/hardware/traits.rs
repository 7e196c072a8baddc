use crate::command::LedPattern;

/// A group of discrete outputs latched as one [`LedPattern`].
pub trait OutputPort {
    fn write(&mut self, pattern: LedPattern);
    /// Reads back what is currently latched on the outputs.
    fn read(&mut self) -> LedPattern;
}

/// A discrete input that can be sampled at any time.
pub trait MonitoredLine {
    fn is_asserted(&self) -> bool;
}
