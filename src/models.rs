use crate::error::PipelineError;

/// The four corners of the display region in source-image pixel coordinates.
///
/// This is a calibration constant tied to one physical camera mounting; it is
/// not derived per image. Corners are listed clockwise from the upper left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointQuad {
    pub upper_left: (f32, f32),
    pub upper_right: (f32, f32),
    pub lower_right: (f32, f32),
    pub lower_left: (f32, f32),
}

fn edge_length(a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

impl PointQuad {
    pub fn new(
        upper_left: (f32, f32),
        upper_right: (f32, f32),
        lower_right: (f32, f32),
        lower_left: (f32, f32),
    ) -> Self {
        Self {
            upper_left,
            upper_right,
            lower_right,
            lower_left,
        }
    }

    /// Width of the rectified rectangle: the longer of the two horizontal
    /// edges, truncated to an integer.
    pub fn target_width(&self) -> u32 {
        edge_length(self.upper_left, self.upper_right)
            .max(edge_length(self.lower_right, self.lower_left)) as u32
    }

    /// Height of the rectified rectangle: the longer of the two vertical
    /// edges, truncated to an integer.
    pub fn target_height(&self) -> u32 {
        edge_length(self.upper_right, self.lower_right)
            .max(edge_length(self.lower_left, self.upper_left)) as u32
    }

    /// Corners in the order expected as control points: UL, UR, LR, LL.
    pub fn source_points(&self) -> [(f32, f32); 4] {
        [
            self.upper_left,
            self.upper_right,
            self.lower_right,
            self.lower_left,
        ]
    }

    /// Corners of the target rectangle, in the same order as
    /// [`source_points`](Self::source_points).
    pub fn target_points(&self) -> [(f32, f32); 4] {
        let w = self.target_width() as f32;
        let h = self.target_height() as f32;
        [(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)]
    }

    /// Reject quads that cannot produce a usable rectified image.
    ///
    /// A zero target width or height means the transform is singular; this is
    /// a calibration error and must abort the run, never silently yield a
    /// 0x0 image.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let w = self.target_width();
        let h = self.target_height();
        if w == 0 || h == 0 {
            return Err(PipelineError::Geometry(format!(
                "target rectangle is {}x{}",
                w, h
            )));
        }
        Ok(())
    }
}

/// Final output of one pipeline run, already scaled to physical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    /// OCR produced parseable text; the value is the reading in volts.
    Value(f64),
    /// OCR produced no parseable text this cycle. Not an error: the
    /// instrument was simply unreadable.
    NoReading,
}

impl Reading {
    /// The calibrated value, with the defined 0.0 fallback for
    /// [`Reading::NoReading`].
    pub fn calibrated(&self) -> f64 {
        match self {
            Reading::Value(v) => *v,
            Reading::NoReading => 0.0,
        }
    }

    pub fn is_reading(&self) -> bool {
        matches!(self, Reading::Value(_))
    }
}
