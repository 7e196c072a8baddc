use core::convert::Infallible;

use embedded_hal::digital::{PinState, StatefulOutputPin};

use super::traits::OutputPort;
use crate::command::LedPattern;

/// Red, blue and green LEDs on three active-high push-pull pins.
pub struct RgbLed<R, B, G> {
    red: R,
    blue: B,
    green: G,
}

impl<R, B, G> RgbLed<R, B, G>
where
    R: StatefulOutputPin<Error = Infallible>,
    B: StatefulOutputPin<Error = Infallible>,
    G: StatefulOutputPin<Error = Infallible>,
{
    pub fn new(red: R, blue: B, green: G) -> Self {
        Self { red, blue, green }
    }
}

fn drive(pin: &mut impl StatefulOutputPin<Error = Infallible>, on: bool) {
    let Ok(()) = pin.set_state(PinState::from(on));
}

fn sample(pin: &mut impl StatefulOutputPin<Error = Infallible>, colour: LedPattern) -> u8 {
    let Ok(high) = pin.is_set_high();
    if high { colour.bits() } else { 0 }
}

impl<R, B, G> OutputPort for RgbLed<R, B, G>
where
    R: StatefulOutputPin<Error = Infallible>,
    B: StatefulOutputPin<Error = Infallible>,
    G: StatefulOutputPin<Error = Infallible>,
{
    fn write(&mut self, pattern: LedPattern) {
        drive(&mut self.red, pattern.contains(LedPattern::RED));
        drive(&mut self.blue, pattern.contains(LedPattern::BLUE));
        drive(&mut self.green, pattern.contains(LedPattern::GREEN));
    }

    fn read(&mut self) -> LedPattern {
        LedPattern::from_bits(
            sample(&mut self.red, LedPattern::RED)
                | sample(&mut self.blue, LedPattern::BLUE)
                | sample(&mut self.green, LedPattern::GREEN),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::{ErrorType, OutputPin};

    #[derive(Default)]
    struct Pin {
        high: bool,
    }

    impl ErrorType for Pin {
        type Error = Infallible;
    }

    impl OutputPin for Pin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            Ok(())
        }
    }

    impl StatefulOutputPin for Pin {
        fn is_set_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.high)
        }

        fn is_set_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.high)
        }
    }

    fn leds() -> RgbLed<Pin, Pin, Pin> {
        RgbLed::new(Pin::default(), Pin::default(), Pin::default())
    }

    #[test]
    fn write_drives_only_the_selected_colour() {
        let mut led = leds();
        led.write(LedPattern::BLUE);
        assert!(!led.red.high);
        assert!(led.blue.high);
        assert!(!led.green.high);
        assert_eq!(led.read(), LedPattern::BLUE);
    }

    #[test]
    fn readback_reflects_pins_set_elsewhere() {
        let mut led = leds();
        led.write(LedPattern::RED);
        led.green.high = true;
        assert_eq!(led.read(), LedPattern::from_bits(0b1010));
        let next = led.read().toggled();
        led.write(next);
        assert_eq!(led.read(), LedPattern::BLUE);
    }
}
