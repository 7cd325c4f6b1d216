//! Segment and trace types for captured signatures

use serde::{Deserialize, Serialize};

/// One straight stroke segment, in input (unscaled) units
///
/// Field names follow the capture widget's output: `l` is where the pen was,
/// `m` is where it moved to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub lx: f64,
    pub ly: f64,
    pub mx: f64,
    pub my: f64,
}

impl LineSegment {
    pub fn new(lx: f64, ly: f64, mx: f64, my: f64) -> Self {
        Self { lx, ly, mx, my }
    }

    /// Multiply every coordinate by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            lx: self.lx * factor,
            ly: self.ly * factor,
            mx: self.mx * factor,
            my: self.my * factor,
        }
    }
}

/// Largest x and y reached by a trace
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingSize {
    pub width: f64,
    pub height: f64,
}

impl BoundingSize {
    /// Whole-pixel output size, truncating fractional bounds
    pub fn to_pixels(self) -> (u32, u32) {
        (self.width as u32, self.height as u32)
    }
}

/// An ordered list of segments; later segments paint over earlier ones
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignatureTrace {
    pub segments: Vec<LineSegment>,
}

impl SignatureTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment at the end of the draw order
    pub fn push(&mut self, segment: LineSegment) {
        self.segments.push(segment);
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineSegment> {
        self.segments.iter()
    }

    /// Maximum x and y over every segment endpoint
    ///
    /// Both maxima start at zero, so a trace lying entirely in negative
    /// coordinates reports a zero size.
    pub fn bounding_size(&self) -> BoundingSize {
        self.segments
            .iter()
            .fold(BoundingSize::default(), |acc, seg| BoundingSize {
                width: acc.width.max(seg.lx.max(seg.mx)),
                height: acc.height.max(seg.ly.max(seg.my)),
            })
    }
}

impl From<Vec<LineSegment>> for SignatureTrace {
    fn from(segments: Vec<LineSegment>) -> Self {
        Self { segments }
    }
}

impl FromIterator<LineSegment> for SignatureTrace {
    fn from_iter<I: IntoIterator<Item = LineSegment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SignatureTrace {
    type Item = &'a LineSegment;
    type IntoIter = std::slice::Iter<'a, LineSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}
