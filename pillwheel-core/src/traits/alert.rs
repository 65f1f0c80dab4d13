//! Alert output trait (audio + LED)

/// Audible and visual alert lines
///
/// The alarm raises both at once; the flash timer then toggles only the
/// LED while audio keeps sounding until acknowledgment.
pub trait AlertOutput {
    /// Switch the audio alert
    fn set_audio(&mut self, on: bool);

    /// Switch the LED
    fn set_led(&mut self, on: bool);

    /// Switch audio and LED together
    fn set_alert(&mut self, on: bool) {
        self.set_audio(on);
        self.set_led(on);
    }
}
