pub mod adxl345;
pub mod button;
pub mod encoder;
pub mod oled;
pub mod pixel;
