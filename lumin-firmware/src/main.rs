//! Lumin Bridge firmware
//!
//! RP2040 board with a rotary encoder, a mode button and a 128x64 OLED.
//! Talks to the host over UART0. Everything runs in one cooperative loop:
//! sample inputs, feed them to the bridge, drain the UART, redraw.

#![no_std]
#![no_main]

mod button;
mod encoder;
mod serial;
mod ssd1306;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::{Duration, Instant, Ticker, Timer};
use heapless::Vec;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use lumin_core::{Bridge, BridgeConfig, InputEvent, TurnClassifier};
use lumin_display::ScreenRenderer;

use crate::button::{Button, Edge};
use crate::encoder::Encoder;
use crate::serial::{UartReceiver, UartSender};
use crate::ssd1306::Ssd1306;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main loop period
const TICK_MS: u64 = 1;

/// How long the splash stays up
const SPLASH_MS: u64 = 2000;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Lumin Bridge starting...");

    let p = embassy_rp::init(Default::default());

    // OLED on I2C0 (GPIO4=SDA, GPIO5=SCL)
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = 400_000;
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config);

    let mut display = Ssd1306::new(i2c);
    if let Err(e) = display.init() {
        defmt::panic!("Failed to initialize display: {:?}", e);
    }
    info!("OLED initialized");

    let mut renderer = ScreenRenderer::new(display);
    if let Err(e) = renderer.splash() {
        warn!("Splash not shown: {:?}", e);
    }
    Timer::after(Duration::from_millis(SPLASH_MS)).await;

    // UART0 to the host (GPIO0=TX, GPIO1=RX)
    let link_config = lumin_hal::UartConfig::default();
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = link_config.baudrate;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("UART initialized at {} baud", link_config.baudrate);

    // Encoder (GPIO11=A, GPIO12=B, GPIO10=button) and mode button (GPIO8)
    let mut encoder = Encoder::new(Input::new(p.PIN_11, Pull::Up), Input::new(p.PIN_12, Pull::Up));
    let mut encoder_button = Button::new(Input::new(p.PIN_10, Pull::Up));
    let mut mode_button = Button::new(Input::new(p.PIN_8, Pull::Up));

    let config = BridgeConfig::default();
    let mut classifier = TurnClassifier::new(&config);
    let mut bridge = Bridge::new(UartReceiver::new(rx), UartSender::new(tx), config);

    info!("Waiting for host");

    let mut ticker = Ticker::every(Duration::from_millis(TICK_MS));
    loop {
        let now = Instant::now().as_millis();
        let mut events: Vec<InputEvent, 4> = Vec::new();

        // Detents are classified against the button level from the last tick
        if let Some(direction) = encoder.poll() {
            if let Some(event) = classifier.on_detent(direction, encoder_button.is_held(), now as u32) {
                let _ = events.push(event);
            }
        }

        if let Some(Edge::Released) = encoder_button.poll(now) {
            if let Some(event) = classifier.on_release() {
                let _ = events.push(event);
            }
        }

        if let Some(Edge::Released) = mode_button.poll(now) {
            let _ = events.push(InputEvent::ButtonPress);
        }

        bridge.tick(events);

        if let Err(e) = bridge.render(&mut renderer) {
            warn!("Display update failed: {:?}", e);
        }

        ticker.next().await;
    }
}
