// Reactor Core - Rotary Encoder Driver
//
// Quadrature decoder on two pull-up inputs, driven by any-edge GPIO
// interrupts.  Every edge on either channel reads both levels and looks the
// transition up in a table; contact bounce adds and removes the same quarter
// step, so it cancels out.  `position()` only reads the accumulated count.
// One detent is four quarter steps.

use std::sync::atomic::{AtomicI32, AtomicU8, Ordering};
use std::sync::Arc;

use esp_idf_hal::gpio::{AnyIOPin, Input, InterruptType, PinDriver};

use reactor_core::peripherals::RotaryEncoder;
use reactor_core::rotary::quadrature_step;

/// State shared with the interrupt callbacks.
struct Decoder {
    gpio_a: i32,
    gpio_b: i32,
    state: AtomicU8,
    quarters: AtomicI32,
}

impl Decoder {
    fn read_ab(&self) -> u8 {
        // SAFETY: reading an input level has no side effects and is ISR-safe.
        let (a, b) = unsafe {
            (
                esp_idf_sys::gpio_get_level(self.gpio_a) != 0,
                esp_idf_sys::gpio_get_level(self.gpio_b) != 0,
            )
        };
        (u8::from(a) << 1) | u8::from(b)
    }

    /// Runs in interrupt context.
    fn on_edge(&self) {
        let ab = self.read_ab();
        let previous = self.state.swap(ab, Ordering::Relaxed);
        let step = quadrature_step(previous, ab);
        if step != 0 {
            self.quarters.fetch_add(i32::from(step), Ordering::Relaxed);
        }
    }
}

pub struct QuadratureEncoder<'d> {
    // Held so the subscriptions stay alive.
    _a: PinDriver<'d, AnyIOPin, Input>,
    _b: PinDriver<'d, AnyIOPin, Input>,
    decoder: Arc<Decoder>,
}

impl<'d> QuadratureEncoder<'d> {
    pub fn new(
        mut a: PinDriver<'d, AnyIOPin, Input>,
        mut b: PinDriver<'d, AnyIOPin, Input>,
    ) -> anyhow::Result<Self> {
        let decoder = Arc::new(Decoder {
            gpio_a: a.pin(),
            gpio_b: b.pin(),
            state: AtomicU8::new(0),
            quarters: AtomicI32::new(0),
        });
        decoder.state.store(decoder.read_ab(), Ordering::Relaxed);

        for pin in [&mut a, &mut b] {
            pin.set_interrupt_type(InterruptType::AnyEdge)?;

            let gpio = pin.pin();
            let decoder = Arc::clone(&decoder);
            let callback = move || {
                decoder.on_edge();
                // The HAL disarms a pin interrupt once it fires.
                // SAFETY: re-enabling this pin's own interrupt from its ISR.
                unsafe {
                    esp_idf_sys::gpio_intr_enable(gpio);
                }
            };
            // SAFETY: the callback only touches atomics and GPIO registers.
            unsafe { pin.subscribe(callback)? };
            pin.enable_interrupt()?;
        }

        log::info!("Encoder on GPIO{}/GPIO{} (any-edge interrupts)", a.pin(), b.pin());
        Ok(Self {
            _a: a,
            _b: b,
            decoder,
        })
    }
}

impl RotaryEncoder for QuadratureEncoder<'_> {
    fn position(&mut self) -> i32 {
        self.decoder.quarters.load(Ordering::Relaxed).div_euclid(4)
    }
}
