/// Viewports narrower than this are treated as touch-primary
pub const NARROW_VIEWPORT: u32 = 768;

/// Coarse input class of the device the board is shown on.
///
/// Only decides which instructions are shown and whether digit keys count as
/// taps; game rules never look at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Pointer,
    TouchPrimary,
}

impl DeviceClass {
    pub fn detect(viewport_width: u32, touch_capable: bool) -> Self {
        if viewport_width < NARROW_VIEWPORT || touch_capable {
            DeviceClass::TouchPrimary
        } else {
            DeviceClass::Pointer
        }
    }

    pub fn accepts_keyboard_taps(&self) -> bool {
        matches!(self, DeviceClass::Pointer)
    }

    pub fn instructions(&self) -> &'static str {
        match self {
            DeviceClass::Pointer => "Click the numbers in order!",
            DeviceClass::TouchPrimary => "Tap the numbers in order!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect() {
        assert_eq!(DeviceClass::detect(1280, false), DeviceClass::Pointer);
        assert_eq!(DeviceClass::detect(767, false), DeviceClass::TouchPrimary);
        assert_eq!(DeviceClass::detect(1280, true), DeviceClass::TouchPrimary);
        assert_eq!(DeviceClass::detect(768, false), DeviceClass::Pointer);
    }

    #[test]
    fn test_keyboard_only_on_pointer_devices() {
        assert!(DeviceClass::Pointer.accepts_keyboard_taps());
        assert!(!DeviceClass::TouchPrimary.accepts_keyboard_taps());
    }
}
