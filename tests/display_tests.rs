//! Tests for the status display
//!
//! Framebuffer addressing, SSD1306 bus framing and the status screen layout.

mod common;

use common::RecordingI2c;
use fm_radio::drivers::display::{Display, DisplayBuffer, ScreenStatus, StatusRenderer};
use fm_radio::hal::i2c::I2cAddress;
use fm_radio::radio::state::RadioState;

const BAR_X: u32 = StatusRenderer::RSSI_BAR_X as u32;
const BAR_Y: u32 = StatusRenderer::RSSI_BAR_Y as u32;

/// Lit pixels inside the RSSI bar outline
fn bar_interior(buffer: &DisplayBuffer) -> usize {
    buffer.lit_in(
        BAR_X + 1,
        BAR_Y + 1,
        StatusRenderer::RSSI_BAR_WIDTH - 2,
        StatusRenderer::RSSI_BAR_HEIGHT - 2,
    )
}

// ============================================================================
// Framebuffer Tests
// ============================================================================

#[test]
fn buffer_starts_blank() {
    let buffer = DisplayBuffer::new();
    assert_eq!(buffer.as_bytes().len(), 1024);
    assert!(buffer.as_bytes().iter().all(|&b| b == 0));
}

#[test]
fn set_pixel_is_page_major() {
    let mut buffer = DisplayBuffer::new();
    buffer.set_pixel(3, 9, true);
    // page 1, column 3, bit 1
    assert_eq!(buffer.as_bytes()[128 + 3], 0b10);
    assert!(buffer.pixel(3, 9));

    buffer.set_pixel(3, 9, false);
    assert!(!buffer.pixel(3, 9));
}

#[test]
fn out_of_range_pixels_are_ignored() {
    let mut buffer = DisplayBuffer::new();
    buffer.set_pixel(128, 0, true);
    buffer.set_pixel(0, 64, true);
    assert!(buffer.as_bytes().iter().all(|&b| b == 0));
    assert!(!buffer.pixel(500, 500));
}

// ============================================================================
// Renderer Tests
// ============================================================================

#[test]
fn rssi_zero_draws_empty_bar() {
    let mut buffer = DisplayBuffer::new();
    StatusRenderer::render_rssi(&mut buffer, 0);
    assert_eq!(bar_interior(&buffer), 0);
    // outline is still there
    assert!(buffer.pixel(BAR_X, BAR_Y));
}

#[test]
fn rssi_full_scale_fills_bar() {
    let mut buffer = DisplayBuffer::new();
    StatusRenderer::render_rssi(&mut buffer, 127);
    let interior = (StatusRenderer::RSSI_BAR_WIDTH - 2) * (StatusRenderer::RSSI_BAR_HEIGHT - 2);
    assert_eq!(bar_interior(&buffer), interior as usize);
}

#[test]
fn rssi_bar_grows_with_level() {
    let mut low = DisplayBuffer::new();
    let mut high = DisplayBuffer::new();
    StatusRenderer::render_rssi(&mut low, 30);
    StatusRenderer::render_rssi(&mut high, 90);
    assert!(bar_interior(&low) > 0);
    assert!(bar_interior(&high) > bar_interior(&low));
}

#[test]
fn frequency_is_drawn() {
    let mut buffer = DisplayBuffer::new();
    StatusRenderer::render_frequency(&mut buffer, &RadioState::default());
    assert!(buffer.lit_in(0, 12, 128, 20) > 0);
}

#[test]
fn mute_draws_inverted_box() {
    let state = RadioState::default();
    let mut plain = DisplayBuffer::new();
    let mut muted = DisplayBuffer::new();

    StatusRenderer::render_audio(&mut plain, &state, true);
    StatusRenderer::render_audio(&mut muted, &state.with_mute(true), true);

    assert!(muted.lit_in(46, 0, 28, 10) > plain.lit_in(46, 0, 28, 10));
}

#[test]
fn long_radio_text_is_cut_to_one_line() {
    let mut buffer = DisplayBuffer::new();
    let text = "THIS RADIO TEXT IS FAR TOO LONG FOR ONE LINE OF THE SCREEN";
    StatusRenderer::render_text(&mut buffer, text);
    assert!(buffer.lit_in(0, 54, 128, 10) > 0);
    // nothing wraps above the text line
    assert_eq!(buffer.lit_in(0, 0, 128, 54), 0);
}

#[test]
fn full_screen_render() {
    let mut buffer = DisplayBuffer::new();
    let status = ScreenStatus {
        rssi: 64,
        stereo: true,
        station_name: "RADIO 1",
        radio_text: "NOW PLAYING",
    };
    StatusRenderer::render(&mut buffer, &RadioState::default(), &status);

    assert!(buffer.lit_in(0, 0, 128, 10) > 0);
    assert!(buffer.lit_in(40, 34, 88, 10) > 0);
    assert!(bar_interior(&buffer) > 0);
}

// ============================================================================
// Driver Tests
// ============================================================================

#[test]
fn init_sends_commands_then_blank_frame() {
    let bus = RecordingI2c::default();
    let log = std::rc::Rc::clone(&bus.writes);
    let mut display = Display::new(bus, I2cAddress::SSD1306);

    display.init().unwrap();

    let writes = log.borrow();
    assert!(writes.iter().all(|(addr, _)| *addr == 0x3C));
    // first command turns the panel off, last init command turns it on
    assert_eq!(writes[0].1, vec![0x00, 0xAE]);
    assert!(writes.iter().any(|(_, bytes)| bytes == &vec![0x00, 0xAF]));

    let data: Vec<_> = writes.iter().filter(|(_, b)| b[0] == 0x40).collect();
    assert_eq!(data.len(), 1024 / 32);
    assert!(data.iter().all(|(_, b)| b.len() == 33 && b[1..].iter().all(|&x| x == 0)));
}

#[test]
fn show_pushes_rendered_frame() {
    let bus = RecordingI2c::default();
    let log = std::rc::Rc::clone(&bus.writes);
    let mut display = Display::new(bus, I2cAddress::SSD1306);

    display
        .show(&RadioState::default(), &ScreenStatus::default())
        .unwrap();

    assert!(display.buffer().lit_in(0, 0, 128, 64) > 0);
    let pixels: usize = log
        .borrow()
        .iter()
        .filter(|(_, b)| b[0] == 0x40)
        .map(|(_, b)| b.len() - 1)
        .sum();
    assert_eq!(pixels, 1024);
}

#[test]
fn contrast_and_invert_commands() {
    let bus = RecordingI2c::default();
    let log = std::rc::Rc::clone(&bus.writes);
    let mut display = Display::new(bus, I2cAddress::SSD1306);

    display.set_contrast(0x7F).unwrap();
    display.invert(true).unwrap();

    let writes: Vec<Vec<u8>> = log.borrow().iter().map(|(_, b)| b.clone()).collect();
    assert_eq!(
        writes,
        vec![vec![0x00, 0x81], vec![0x00, 0x7F], vec![0x00, 0xA7]]
    );
}
