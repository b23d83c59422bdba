//! FM Radio Main Application
//!
//! Entry point for the STM32G474 FM receiver firmware.
//! Brings up the tuner and display, then runs the radio loop: the seek
//! button triggers a hardware seek, the preset button steps through the
//! stored stations, and in between the RDS registers are polled and the
//! status screen refreshed.

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_futures::select::{select3, Either3};
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::{Level, Output, Pull, Speed};
use embassy_stm32::i2c::I2c;
use embassy_stm32::mode::Blocking;
use embassy_stm32::time::Hertz;
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use fm_radio::hal::i2c::{scan, I2cAddress};
use fm_radio::prelude::*;

type Tuner = Rda5807m<I2c<'static, Blocking>, Delay>;
type Screen = Display<I2c<'static, Blocking>>;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("FM Radio Firmware v{}", env!("CARGO_PKG_VERSION"));

    let config = embassy_stm32::Config::default();
    let p = embassy_stm32::init(config);

    info!("Peripherals initialized");

    let led = Output::new(p.PA5, Level::Low, Speed::Low);
    let seek_button = ExtiInput::new(p.PA2, p.EXTI2, Pull::Up);
    let preset_button = ExtiInput::new(p.PA3, p.EXTI3, Pull::Up);

    // PB8 = SCL, PB9 = SDA
    let mut tuner_i2c = I2c::new_blocking(
        p.I2C1,
        p.PB8,
        p.PB9,
        Hertz(I2C_FREQUENCY_HZ),
        Default::default(),
    );

    // PA9 = SCL, PA8 = SDA
    let display_i2c = I2c::new_blocking(
        p.I2C2,
        p.PA9,
        p.PA8,
        Hertz(I2C_FREQUENCY_HZ),
        Default::default(),
    );

    for addr in scan(&mut tuner_i2c) {
        info!("I2C1 device at {}", addr);
    }

    spawner.must_spawn(heartbeat_task(led));

    let mut tuner: Tuner = match Rda5807m::new(tuner_i2c, Delay, TunerConfig::default()) {
        Ok(tuner) => tuner,
        Err(e) => {
            error!("tuner init failed: {}", e);
            loop {
                Timer::after(Duration::from_secs(1)).await;
            }
        }
    };

    match tuner.chip_id() {
        Ok(id) if (id >> 8) as u8 == RDA5807M_CHIP_ID => info!("chip ID {:04X}", id),
        Ok(id) => warn!("unexpected chip ID {:04X}", id),
        Err(e) => warn!("chip ID read failed: {}", e),
    }

    let mut display = Display::new(display_i2c, I2cAddress::new(DISPLAY_I2C_ADDR));
    if let Err(e) = display.init() {
        warn!("display init failed: {}", e);
    }

    spawner.must_spawn(radio_task(tuner, display, seek_button, preset_button));
}

/// Heartbeat task - blinks LED to show system is running
#[embassy_executor::task]
async fn heartbeat_task(mut led: Output<'static>) {
    loop {
        led.set_high();
        Timer::after(Duration::from_millis(100)).await;
        led.set_low();
        Timer::after(Duration::from_millis(900)).await;
    }
}

/// Radio task - seek or step presets on button press, otherwise poll RDS and redraw
#[embassy_executor::task]
async fn radio_task(
    mut tuner: Tuner,
    mut display: Screen,
    mut seek_button: ExtiInput<'static>,
    mut preset_button: ExtiInput<'static>,
) {
    let mut rds = RdsDecoder::new()
        .with_text_callback(|text: &str| info!("RDS text: {}", text));

    redraw(&mut tuner, &mut display, &rds);

    loop {
        let poll = Timer::after(Duration::from_millis(RDS_POLL_INTERVAL_MS));
        match select3(
            seek_button.wait_for_falling_edge(),
            preset_button.wait_for_falling_edge(),
            poll,
        )
        .await
        {
            Either3::First(()) => {
                Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;
                if seek_button.is_high() {
                    continue;
                }

                match tuner.seek_up() {
                    Ok(freq) => {
                        info!("seek stopped at {}", freq);
                        rds.clear();
                    }
                    Err(e) => error!("seek failed: {}", e),
                }
                redraw(&mut tuner, &mut display, &rds);
            }
            Either3::Second(()) => {
                Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;
                if preset_button.is_high() {
                    continue;
                }

                let index = next_preset(tuner.state().frequency());
                match tuner.tune_preset(index) {
                    Ok(freq) => {
                        info!("preset {} at {}", index, freq);
                        rds.clear();
                    }
                    Err(e) => error!("preset tune failed: {}", e),
                }
                redraw(&mut tuner, &mut display, &rds);
            }
            Either3::Third(()) => match tuner.check_rds(&mut rds) {
                Ok(true) => redraw(&mut tuner, &mut display, &rds),
                Ok(false) => {}
                Err(e) => warn!("RDS read failed: {}", e),
            },
        }
    }
}

fn redraw<F: FnMut(&str)>(tuner: &mut Tuner, display: &mut Screen, rds: &RdsDecoder<F>) {
    let status = match tuner.status() {
        Ok(status) => status,
        Err(e) => {
            warn!("status read failed: {}", e);
            return;
        }
    };

    let state = tuner.state();
    // fall back to the preset label until RDS delivers a name
    let station_name = match (rds.station_name(), preset_at(state.frequency())) {
        ("", Some(i)) => PRESETS[i].name,
        (name, _) => name,
    };
    let screen = ScreenStatus {
        rssi: status.rssi,
        stereo: status.stereo,
        station_name,
        radio_text: rds.radio_text(),
    };
    if let Err(e) = display.show(&state, &screen) {
        warn!("display update failed: {}", e);
    }
}
