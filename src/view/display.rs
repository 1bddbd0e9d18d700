/// Physical size of the surface the scene is shown on.
pub trait DisplayMetrics {
    fn size_px(&self) -> (u32, u32);
    fn size_mm(&self) -> (f32, f32);
}

const MM_PER_DIP: f32 = 25.4 / 96.0;

/// Converts device independent pixels into physical pixels along one axis.
/// Falls back to the dip value when the physical size is unknown.
pub fn dpi_to_px(pixels: u32, millimetres: f32, dips: f32) -> f32 {
    if millimetres <= 0.0 {
        return dips;
    }
    dips * MM_PER_DIP * pixels as f32 / millimetres
}

/// The larger of the horizontal and vertical conversions of `dips`.
pub fn drag_threshold_px(display: &dyn DisplayMetrics, dips: f32) -> f32 {
    let (width_px, height_px) = display.size_px();
    let (width_mm, height_mm) = display.size_mm();
    dpi_to_px(width_px, width_mm, dips).max(dpi_to_px(height_px, height_mm, dips))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedDisplay {
    size_px: (u32, u32),
    size_mm: (f32, f32),
}

impl FixedDisplay {
    pub fn new(size_px: (u32, u32), size_mm: (f32, f32)) -> Self {
        Self { size_px, size_mm }
    }

    pub fn from_dpi(width: u32, height: u32, dpi: f32) -> Self {
        let to_mm = |pixels: u32| pixels as f32 / dpi * 25.4;
        Self::new((width, height), (to_mm(width), to_mm(height)))
    }
}

impl Default for FixedDisplay {
    fn default() -> Self {
        Self::from_dpi(1280, 720, 96.0)
    }
}

impl DisplayMetrics for FixedDisplay {
    fn size_px(&self) -> (u32, u32) {
        self.size_px
    }

    fn size_mm(&self) -> (f32, f32) {
        self.size_mm
    }
}
