// Reactor Core - Text Screen
//
// 128×64 monochrome framebuffer in SSD1306 page order (8 vertical pixels per
// byte), with four centered text lines drawn through embedded-graphics.  The
// firmware's OLED driver flushes `buffer()` over I2C.

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use crate::config::*;

pub struct TextScreen {
    buffer: [u8; DISPLAY_BUFFER_SIZE],
}

impl TextScreen {
    pub fn new() -> Self {
        Self {
            buffer: [0; DISPLAY_BUFFER_SIZE],
        }
    }

    pub fn clear(&mut self) {
        self.buffer.fill(0);
    }

    /// Replace the frame with up to four lines; empty lines are skipped.
    pub fn render(&mut self, lines: [&str; 4]) {
        self.clear();

        let character_style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
        let text_style = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Middle)
            .build();
        let center_x = (SCREEN_WIDTH / 2) as i32;

        for (line, y) in lines.iter().zip(DISPLAY_LINE_Y) {
            if line.is_empty() {
                continue;
            }
            // Drawing into RAM cannot fail.
            let _ = Text::with_text_style(line, Point::new(center_x, y), character_style, text_style)
                .draw(self);
        }
    }

    /// Raw frame, page by page.
    pub fn buffer(&self) -> &[u8; DISPLAY_BUFFER_SIZE] {
        &self.buffer
    }

    pub fn is_on(&self, x: u32, y: u32) -> bool {
        if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
            return false;
        }
        let (index, bit) = Self::locate(x, y);
        self.buffer[index] & bit != 0
    }

    fn locate(x: u32, y: u32) -> (usize, u8) {
        let index = (x + (y / 8) * SCREEN_WIDTH) as usize;
        (index, 1 << (y % 8))
    }
}

impl Default for TextScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for TextScreen {
    fn size(&self) -> Size {
        Size::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl DrawTarget for TextScreen {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) else {
                continue;
            };
            if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
                continue;
            }
            let (index, bit) = Self::locate(x, y);
            if color.is_on() {
                self.buffer[index] |= bit;
            } else {
                self.buffer[index] &= !bit;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(screen: &TextScreen) -> Vec<(u32, u32)> {
        (0..SCREEN_HEIGHT)
            .flat_map(|y| (0..SCREEN_WIDTH).map(move |x| (x, y)))
            .filter(|&(x, y)| screen.is_on(x, y))
            .collect()
    }

    #[test]
    fn blank_lines_draw_nothing() {
        let mut screen = TextScreen::new();
        screen.render(["", "", "", ""]);
        assert!(screen.buffer().iter().all(|&b| b == 0));
    }

    #[test]
    fn line_lands_in_its_band() {
        let mut screen = TextScreen::new();
        screen.render(["", "", "> QUAKE <", ""]);
        let pixels = lit(&screen);
        assert!(!pixels.is_empty());
        assert!(pixels.iter().all(|&(_, y)| (32..=48).contains(&y)));
    }

    #[test]
    fn text_is_horizontally_centered() {
        let mut screen = TextScreen::new();
        screen.render(["GAME OVER", "", "", ""]);
        let pixels = lit(&screen);
        let min_x = pixels.iter().map(|p| p.0).min().unwrap();
        let max_x = pixels.iter().map(|p| p.0).max().unwrap();
        let middle = (min_x + max_x) / 2;
        assert!((60..=68).contains(&middle), "middle at {middle}");
    }

    #[test]
    fn render_replaces_previous_frame() {
        let mut screen = TextScreen::new();
        screen.render(["MELTDOWN!", "", "", ""]);
        screen.render(["", "", "", "Btn to Reset"]);
        assert!(lit(&screen).iter().all(|&(_, y)| y >= 48));
    }
}
