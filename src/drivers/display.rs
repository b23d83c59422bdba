//! OLED Display Driver
//!
//! Status screen for the FM receiver on an SSD1306 128x64 panel over I2C.
//! Drawing happens in a RAM framebuffer; [`Display::flush`] pushes it out.

use core::fmt::Write;

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use embedded_hal::i2c::I2c;
use heapless::String;

use crate::config::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::error::{Error, Result};
use crate::hal::i2c::I2cAddress;
use crate::radio::state::RadioState;
use crate::types::Band;

/// Framebuffer size (one bit per pixel)
const BUFFER_LEN: usize = (DISPLAY_WIDTH * DISPLAY_HEIGHT / 8) as usize;

/// Bytes of pixel data per I2C write
const DATA_CHUNK: usize = 32;

/// Characters of radio text that fit on one line in the small font
const TEXT_COLUMNS: usize = 21;

/// SSD1306 commands
mod cmd {
    pub const SET_CONTRAST: u8 = 0x81;
    pub const DISPLAY_ALL_ON_RESUME: u8 = 0xA4;
    pub const NORMAL_DISPLAY: u8 = 0xA6;
    pub const INVERT_DISPLAY: u8 = 0xA7;
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_DISPLAY_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MULTIPLEX: u8 = 0xA8;
    pub const SET_START_LINE: u8 = 0x40;
    pub const MEMORY_MODE: u8 = 0x20;
    pub const COLUMN_ADDR: u8 = 0x21;
    pub const PAGE_ADDR: u8 = 0x22;
    pub const COM_SCAN_DEC: u8 = 0xC8;
    pub const SEG_REMAP: u8 = 0xA0;
    pub const CHARGE_PUMP: u8 = 0x8D;
}

/// Control byte prefixes
mod control {
    pub const COMMAND: u8 = 0x00;
    pub const DATA: u8 = 0x40;
}

/// Display buffer (1 bit per pixel, page-major like the controller RAM)
pub struct DisplayBuffer {
    buffer: [u8; BUFFER_LEN],
}

impl DisplayBuffer {
    /// Create a new empty display buffer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: [0; BUFFER_LEN],
        }
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.buffer.fill(0);
    }

    /// Set a pixel; out-of-range coordinates are ignored
    pub fn set_pixel(&mut self, x: u32, y: u32, on: bool) {
        if x >= DISPLAY_WIDTH || y >= DISPLAY_HEIGHT {
            return;
        }

        let byte_idx = (y / 8 * DISPLAY_WIDTH + x) as usize;
        let bit = 1 << (y % 8);

        if on {
            self.buffer[byte_idx] |= bit;
        } else {
            self.buffer[byte_idx] &= !bit;
        }
    }

    /// Read a pixel back
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> bool {
        if x >= DISPLAY_WIDTH || y >= DISPLAY_HEIGHT {
            return false;
        }
        let byte_idx = (y / 8 * DISPLAY_WIDTH + x) as usize;
        self.buffer[byte_idx] & (1 << (y % 8)) != 0
    }

    /// Number of lit pixels inside a rectangle
    #[must_use]
    pub fn lit_in(&self, x: u32, y: u32, width: u32, height: u32) -> usize {
        (y..y + height)
            .flat_map(|row| (x..x + width).map(move |col| (col, row)))
            .filter(|&(col, row)| self.pixel(col, row))
            .count()
    }

    /// Get the raw buffer
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }
}

impl Default for DisplayBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawTarget for DisplayBuffer {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if let (Ok(x), Ok(y)) = (u32::try_from(coord.x), u32::try_from(coord.y)) {
                self.set_pixel(x, y, color.is_on());
            }
        }
        Ok(())
    }
}

impl OriginDimensions for DisplayBuffer {
    fn size(&self) -> Size {
        Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }
}

/// SSD1306 OLED driver
pub struct Display<I2C> {
    i2c: I2C,
    address: I2cAddress,
    buffer: DisplayBuffer,
}

impl<I2C: I2c> Display<I2C> {
    /// Create a driver for a panel at `address`
    #[must_use]
    pub const fn new(i2c: I2C, address: I2cAddress) -> Self {
        Self {
            i2c,
            address,
            buffer: DisplayBuffer::new(),
        }
    }

    /// Run the power-up sequence and blank the panel
    pub fn init(&mut self) -> Result<()> {
        let init_cmds = [
            cmd::DISPLAY_OFF,
            cmd::SET_DISPLAY_CLOCK_DIV,
            0x80,
            cmd::SET_MULTIPLEX,
            0x3F, // 64 lines
            cmd::SET_DISPLAY_OFFSET,
            0x00,
            cmd::SET_START_LINE,
            cmd::CHARGE_PUMP,
            0x14, // internal charge pump on
            cmd::MEMORY_MODE,
            0x00, // horizontal addressing
            cmd::SEG_REMAP | 0x01,
            cmd::COM_SCAN_DEC,
            cmd::SET_COM_PINS,
            0x12,
            cmd::SET_CONTRAST,
            0xCF,
            cmd::SET_PRECHARGE,
            0xF1,
            cmd::SET_VCOM_DETECT,
            0x40,
            cmd::DISPLAY_ALL_ON_RESUME,
            cmd::NORMAL_DISPLAY,
            cmd::DISPLAY_ON,
        ];

        for &c in &init_cmds {
            self.send_command(c)?;
        }

        self.buffer.clear();
        self.flush()
    }

    /// Push the framebuffer to the panel
    pub fn flush(&mut self) -> Result<()> {
        self.send_command(cmd::COLUMN_ADDR)?;
        self.send_command(0)?;
        self.send_command((DISPLAY_WIDTH - 1) as u8)?;
        self.send_command(cmd::PAGE_ADDR)?;
        self.send_command(0)?;
        self.send_command((DISPLAY_HEIGHT / 8 - 1) as u8)?;

        let mut buf = [0u8; DATA_CHUNK + 1];
        buf[0] = control::DATA;
        for chunk in self.buffer.as_bytes().chunks(DATA_CHUNK) {
            buf[1..=chunk.len()].copy_from_slice(chunk);
            self.i2c
                .write(self.address.addr(), &buf[..=chunk.len()])
                .map_err(Error::transaction)?;
        }
        Ok(())
    }

    /// Draw the receiver status and push it out
    pub fn show(&mut self, state: &RadioState, status: &ScreenStatus<'_>) -> Result<()> {
        self.buffer.clear();
        StatusRenderer::render(&mut self.buffer, state, status);
        self.flush()
    }

    /// Framebuffer for custom drawing
    #[must_use]
    pub fn buffer_mut(&mut self) -> &mut DisplayBuffer {
        &mut self.buffer
    }

    /// Framebuffer contents
    #[must_use]
    pub const fn buffer(&self) -> &DisplayBuffer {
        &self.buffer
    }

    /// Clear the framebuffer
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Set display contrast
    pub fn set_contrast(&mut self, contrast: u8) -> Result<()> {
        self.send_command(cmd::SET_CONTRAST)?;
        self.send_command(contrast)
    }

    /// Invert display colors
    pub fn invert(&mut self, invert: bool) -> Result<()> {
        if invert {
            self.send_command(cmd::INVERT_DISPLAY)
        } else {
            self.send_command(cmd::NORMAL_DISPLAY)
        }
    }

    /// Hand the bus back
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn send_command(&mut self, cmd: u8) -> Result<()> {
        self.i2c
            .write(self.address.addr(), &[control::COMMAND, cmd])
            .map_err(Error::transaction)
    }
}

/// Live readings shown alongside the cached settings
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScreenStatus<'a> {
    /// Signal strength (0-127)
    pub rssi: u8,
    /// Stereo pilot detected
    pub stereo: bool,
    /// RDS programme service name
    pub station_name: &'a str,
    /// RDS radio text
    pub radio_text: &'a str,
}

/// Radio status screen renderer
pub struct StatusRenderer;

impl StatusRenderer {
    /// Top edge of the RSSI bar
    pub const RSSI_BAR_Y: i32 = 46;

    /// Left edge of the RSSI bar
    pub const RSSI_BAR_X: i32 = 14;

    /// Full-scale width of the RSSI bar
    pub const RSSI_BAR_WIDTH: u32 = 100;

    /// Height of the RSSI bar
    pub const RSSI_BAR_HEIGHT: u32 = 6;

    /// Render the whole status screen
    pub fn render(buffer: &mut DisplayBuffer, state: &RadioState, status: &ScreenStatus<'_>) {
        Self::render_band(buffer, state.band());
        Self::render_audio(buffer, state, status.stereo);
        Self::render_frequency(buffer, state);
        Self::render_station(buffer, status.station_name);
        Self::render_rssi(buffer, status.rssi);
        Self::render_text(buffer, status.radio_text);
    }

    /// Render tuned frequency (large)
    pub fn render_frequency(buffer: &mut DisplayBuffer, state: &RadioState) {
        let freq = state.frequency();
        let mut s: String<16> = String::new();
        write!(s, "{:>3}.{} MHz", freq.mhz(), freq.tenths_mhz()).ok();

        let style = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);
        let _ = Text::with_baseline(&s, Point::new(4, 12), style, Baseline::Top).draw(buffer);
    }

    /// Render band indicator
    pub fn render_band(buffer: &mut DisplayBuffer, band: Band) {
        let band_str = match band {
            Band::UsEurope => "US/EU",
            Band::Japan => "JP",
            Band::World => "WORLD",
            Band::EastEurope => "OIRT",
        };

        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        let _ = Text::with_baseline(band_str, Point::new(0, 0), style, Baseline::Top).draw(buffer);
    }

    /// Render stereo/mute flags and volume
    pub fn render_audio(buffer: &mut DisplayBuffer, state: &RadioState, stereo: bool) {
        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);

        if state.is_muted() {
            // White on black box
            let rect = Rectangle::new(Point::new(46, 0), Size::new(28, 10));
            let _ = rect
                .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                .draw(buffer);
            let inverted = MonoTextStyle::new(&FONT_6X10, BinaryColor::Off);
            let _ = Text::with_baseline("MUTE", Point::new(48, 0), inverted, Baseline::Top)
                .draw(buffer);
        } else {
            let mode = if stereo && !state.is_mono() { "ST" } else { "MO" };
            let _ = Text::with_baseline(mode, Point::new(52, 0), style, Baseline::Top).draw(buffer);
        }

        let mut s: String<8> = String::new();
        write!(s, "V{:02}", state.volume().level()).ok();
        let _ = Text::with_baseline(&s, Point::new(104, 0), style, Baseline::Top).draw(buffer);
    }

    /// Render programme service name
    pub fn render_station(buffer: &mut DisplayBuffer, name: &str) {
        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        let _ = Text::with_baseline(name, Point::new(40, 34), style, Baseline::Top).draw(buffer);
    }

    /// Render signal strength bar, 0-127 mapped to the full bar width
    pub fn render_rssi(buffer: &mut DisplayBuffer, rssi: u8) {
        let y = Self::RSSI_BAR_Y;
        let max_width = Self::RSSI_BAR_WIDTH;
        let bar_width = u32::from(rssi.min(127)) * max_width / 127;

        let outline = Rectangle::new(
            Point::new(Self::RSSI_BAR_X, y),
            Size::new(max_width, Self::RSSI_BAR_HEIGHT),
        );
        let _ = outline
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(buffer);

        if bar_width > 0 {
            let fill = Rectangle::new(
                Point::new(Self::RSSI_BAR_X, y),
                Size::new(bar_width, Self::RSSI_BAR_HEIGHT),
            );
            let _ = fill
                .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
                .draw(buffer);
        }

        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        let _ = Text::with_baseline("S", Point::new(2, y - 2), style, Baseline::Top).draw(buffer);
    }

    /// Render the first line of radio text
    pub fn render_text(buffer: &mut DisplayBuffer, text: &str) {
        let end = text
            .char_indices()
            .nth(TEXT_COLUMNS)
            .map_or(text.len(), |(idx, _)| idx);

        let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        let _ = Text::with_baseline(&text[..end], Point::new(0, 54), style, Baseline::Top)
            .draw(buffer);
    }
}
