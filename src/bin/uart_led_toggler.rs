//! STM32F103 Blue Pill UART LED Toggler
//! =============================================================================================
//!
//! Colour commands typed on the serial console select the RGB LED; two buttons
//! drive a periodic, debounced toggle of the same LEDs.
//!
//! Hardware Connections:
//!   USB-serial adapter -> Blue Pill (128000 8N1)
//!      TX   -> PA10 (USART1_RX)
//!      RX   -> PA9  (USART1_TX)
//!
//!   RGB LED (active high, with series resistors):
//!      R    -> PA4
//!      B    -> PA5
//!      G    -> PA6
//!
//!   Buttons (to GND, internal pull-up):
//!      SW1  -> PB12  cycle: start toggling, then step the period 1s..5s
//!      SW2  -> PB13  clear: all LEDs off immediately
//!
//! Behaviour:
//! 1. 'r', 'g' or 'b' on the console lights that colour; anything else is ignored
//! 2. SW1 starts a 1 s toggle timer; each further press moves to the next period
//! 3. While SW1 is held across a firing, the LEDs toggle (300 ms debounce)
//! 4. SW2 forces all LEDs off, bypassing the command queue
//! 5. Onboard LED (PC13) heartbeat

#![no_std]
#![no_main]

use defmt::{error, info, unwrap};
use defmt_rtt as _; // Global logger
use embassy_executor::Spawner;
use embassy_stm32::{
    bind_interrupts,
    exti::ExtiInput,
    gpio::{Level, Output, Pull, Speed},
    mode::Async,
    peripherals,
    usart::{self, Uart, UartRx, UartTx},
};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Duration, Ticker};
use panic_probe as _; // Panic handler
use static_cell::StaticCell;

use uart_led_toggler::{
    Config, Toggler,
    edge::Line,
    hardware::{gpio_button::GpioButton, gpio_led::RgbLed},
    tasks,
};

type Leds = RgbLed<Output<'static>, Output<'static>, Output<'static>>;
type Board = Toggler<CriticalSectionRawMutex, Leds>;

// Context shared by every task, created once in main
static BOARD: StaticCell<Board> = StaticCell::new();

bind_interrupts!(struct Irqs {
    USART1 => usart::InterruptHandler<peripherals::USART1>;
});

/// Main application entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // Initialize peripherals with default configuration
    let p = embassy_stm32::init(Default::default());
    let config = Config::new();

    // Configure USART1 with DMA for the command console
    let mut uart_config = usart::Config::default();
    uart_config.baudrate = config.baud_rate;
    let uart = match Uart::new(
        p.USART1,
        p.PA10,
        p.PA9,
        Irqs,
        p.DMA1_CH4,
        p.DMA1_CH5,
        uart_config,
    ) {
        Ok(uart) => uart,
        Err(e) => {
            // Nothing to report the failure on but RTT
            error!("USART1 configuration failed: {}", e);
            tasks::park().await
        }
    };
    let (mut tx, rx) = uart.split();

    // RGB LED outputs, all off
    let leds = RgbLed::new(
        Output::new(p.PA4, Level::Low, Speed::Low),
        Output::new(p.PA5, Level::Low, Speed::Low),
        Output::new(p.PA6, Level::Low, Speed::Low),
    );

    let board: &'static Board = match Toggler::new(leds, config) {
        Ok(toggler) => BOARD.init(toggler),
        Err(e) => {
            error!("toggler setup failed: {}", e);
            tasks::report_fault(&mut tx).await;
            tasks::park().await
        }
    };

    // Buttons with external interrupt (pull-up configuration)
    let cycle = GpioButton::new(ExtiInput::new(p.PB12, p.EXTI12, Pull::Up), Line::Cycle);
    let clear = GpioButton::new(ExtiInput::new(p.PB13, p.EXTI13, Pull::Up), Line::Clear);

    unwrap!(spawner.spawn(console_writer(board, tx)));
    unwrap!(spawner.spawn(edge_watch(board, cycle, clear)));
    unwrap!(spawner.spawn(timer_service(board)));
    unwrap!(spawner.spawn(output_apply(board)));
    unwrap!(spawner.spawn(input_filter(board, rx)));

    info!("toggler running, flow control {}", board.config.flow);

    // Configure onboard LED (PC13) as heartbeat indicator
    let mut led = Output::new(p.PC13, Level::High, Speed::Low);
    let mut ticker = Ticker::every(Duration::from_millis(500));

    // Main heartbeat loop - blinks onboard LED
    loop {
        led.set_low(); // LED on
        ticker.next().await;
        led.set_high(); // LED off
        ticker.next().await;
    }
}

/// Serial Receive Task
///
/// Filters console bytes to r/g/b and queues them for the LED task.
#[embassy_executor::task]
async fn input_filter(board: &'static Board, mut rx: UartRx<'static, Async>) {
    tasks::input_filter(board, &mut rx).await
}

/// LED Apply Task
///
/// Polls the command queue and drives the RGB LED.
#[embassy_executor::task]
async fn output_apply(board: &'static Board) {
    tasks::output_apply(board).await
}

/// Toggle Timer Service Task
///
/// Runs the debounced toggle each time the periodic signal fires.
#[embassy_executor::task]
async fn timer_service(board: &'static Board) {
    tasks::timer_service(board).await
}

/// Button Edge Task
///
/// Turns EXTI edges on SW1/SW2 into edge handler runs.
#[embassy_executor::task]
async fn edge_watch(
    board: &'static Board,
    mut cycle: GpioButton<ExtiInput<'static>>,
    mut clear: GpioButton<ExtiInput<'static>>,
) {
    tasks::watch_edges(board, &mut cycle, &mut clear).await
}

/// Console Task
///
/// Writes queued status lines to USART1.
#[embassy_executor::task]
async fn console_writer(board: &'static Board, mut tx: UartTx<'static, Async>) {
    tasks::console_writer(board, &mut tx).await
}
