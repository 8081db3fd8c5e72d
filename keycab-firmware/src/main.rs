//! Keycab - Operator Panel Firmware
//!
//! Firmware binary for an RP2040 hand-held cab: a 5x4 keypad, a 20x4
//! I2C character LCD and a speed knob drive a DCC++ base station over
//! a serial link, with two enable lines switching the track outputs.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc, Channel};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::{Delay, Instant, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use keycab_core::{Controller, ControllerConfig, Peripherals};
use keycab_drivers::{GpioTrackPower, Hd44780I2c, MatrixKeypad, SerialStation};
use keycab_protocol::DEFAULT_KEYMAP;

use crate::knob::AdcKnob;

mod board;
mod knob;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Keycab firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("RP2040 initialized");

    // Character LCD behind a PCF8574 backpack
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = board::I2C_FREQUENCY_HZ;
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config);
    let mut lcd = Hd44780I2c::new(i2c, Delay, board::LCD_ADDRESS);
    match lcd.init() {
        Ok(()) => info!("LCD ready at {=u8:#x}", board::LCD_ADDRESS),
        Err(e) => warn!("LCD init failed: {}", e),
    }

    // Keypad: rows driven, columns pulled up
    let rows = [
        Output::new(p.PIN_6, Level::High),
        Output::new(p.PIN_7, Level::High),
        Output::new(p.PIN_8, Level::High),
        Output::new(p.PIN_9, Level::High),
        Output::new(p.PIN_10, Level::High),
    ];
    let cols = [
        Input::new(p.PIN_11, Pull::Up),
        Input::new(p.PIN_12, Pull::Up),
        Input::new(p.PIN_13, Pull::Up),
        Input::new(p.PIN_14, Pull::Up),
    ];
    let keypad = MatrixKeypad::new(rows, cols, DEFAULT_KEYMAP, board::DEBOUNCE_SCANS);

    // Speed knob
    let adc = Adc::new_blocking(p.ADC, adc::Config::default());
    let knob = AdcKnob::new(adc, Channel::new_pin(p.PIN_26, Pull::None));

    // Track enables, both off until the operator powers on
    let power = GpioTrackPower::new(
        Output::new(p.PIN_15, Level::Low),
        Output::new(p.PIN_16, Level::Low),
    );

    // Base station link
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = board::STATION_BAUD;

    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let station = SerialStation::with_timeout(uart, Delay, board::REPLY_TIMEOUT_MS);
    info!("Station link at {} baud", board::STATION_BAUD);

    let mut config = ControllerConfig::default();
    config.sensor_full_scale = board::ADC_FULL_SCALE;

    let mut controller = Controller::new(
        config,
        Peripherals {
            keypad,
            sensor: knob,
            station,
            power,
            display: lcd,
        },
    );

    if let Err(e) = controller.start() {
        warn!("Splash failed: {}", e);
    }

    info!("Entering dispatch loop");

    let boot = Instant::now();
    loop {
        let now_ms = boot.elapsed().as_millis() as u32;
        match controller.poll(now_ms) {
            Ok(Some(key)) => debug!("Key {} -> {}", key, controller.mode()),
            Ok(None) => {}
            Err(e) => warn!("Display update failed: {}", e),
        }
        Timer::after_millis(board::POLL_PERIOD_MS).await;
    }
}
