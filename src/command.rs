//! Commands accepted over the serial line, the LED patterns they map to and
//! the status lines printed back to the user.

/// A colour command. The discriminant is the byte that selects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    Red = b'r',
    Blue = b'b',
    Green = b'g',
}

impl Command {
    /// Filters a raw byte to the command alphabet. Anything else is `None`.
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'r' => Some(Self::Red),
            b'b' => Some(Self::Blue),
            b'g' => Some(Self::Green),
            _ => None,
        }
    }

    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    pub const fn pattern(self) -> LedPattern {
        match self {
            Self::Red => LedPattern::RED,
            Self::Blue => LedPattern::BLUE,
            Self::Green => LedPattern::GREEN,
        }
    }

    /// Status line announced once the command has been applied.
    pub const fn notice(self) -> Notice {
        match self {
            Self::Red => Notice::RedOn,
            Self::Blue => Notice::BlueOn,
            Self::Green => Notice::GreenOn,
        }
    }
}

/// Bit pattern latched on the three LED outputs.
///
/// Bit 1 is red, bit 2 blue and bit 3 green; bits outside [`LedPattern::MASK`]
/// are always clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedPattern(u8);

impl LedPattern {
    pub const MASK: u8 = 0b0000_1110;

    pub const OFF: Self = Self(0);
    pub const RED: Self = Self(1 << 1);
    pub const BLUE: Self = Self(1 << 2);
    pub const GREEN: Self = Self(1 << 3);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::MASK)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_off(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Bitwise complement restricted to the LED bits.
    pub const fn toggled(self) -> Self {
        Self(!self.0 & Self::MASK)
    }
}

/// Human-readable status lines written to the serial console.
///
/// All three colour lines share the "The <COLOUR> LED should be ON." form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Notice {
    Prompt,
    RedOn,
    BlueOn,
    GreenOn,
    AllOff,
    CommandDropped,
    SystemFault,
}

impl Notice {
    pub const fn text(self) -> &'static str {
        match self {
            Self::Prompt => "Please enter r, g or b at any given moment: \n\r",
            Self::RedOn => "The RED LED should be ON. \n\r",
            Self::BlueOn => "The BLUE LED should be ON. \n\r",
            Self::GreenOn => "The GREEN LED should be ON. \n\r",
            Self::AllOff => "All LEDS should be OFF. \n\r",
            Self::CommandDropped => "The last color preference will be unable to be used. \n\r",
            Self::SystemFault => {
                "An error has occurred that ruins the system, Please Debug and then Reset. \n\r"
            }
        }
    }
}
