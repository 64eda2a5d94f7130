//! Carriageway and pavement edges of a centre line.
//!
//! Each edge is an [`OffsetCurve`]: a parallel of the centre line at a fixed
//! distance on one side, trimmed at the break points junction arcs record
//! on it.
use tracing::warn;

use crate::error::Result;
use crate::geometry::{Curve, GeometryType, Segment, Side};
use crate::math::Point2;
use crate::operations::modification::Trim;
use crate::surface::{CurveId, DrawingSurface};

/// A point where an offset curve must be cut.
///
/// `is_before == true` means the retained curve lies before the point (its
/// trailing portion is trimmed); `false` means it lies after it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetIntersect {
    pub point: Point2,
    pub is_before: bool,
}

/// What a pavement is used as; junction fillets treat like kinds alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PavementKind {
    Footway,
    ServiceStrip,
}

/// Generator for one parallel curve of a centre line.
#[derive(Debug, Clone)]
pub struct OffsetCurve {
    side: Side,
    distance: f64,
    intersects: Vec<OffsetIntersect>,
    generated: Vec<CurveId>,
}

impl OffsetCurve {
    #[must_use]
    pub fn new(side: Side, distance: f64) -> Self {
        Self {
            side,
            distance,
            intersects: Vec::new(),
            generated: Vec::new(),
        }
    }

    /// Returns `true` if a parallel at `distance` from `segment` is
    /// geometrically sound: any positive distance for a line, strictly less
    /// than the radius for an arc.
    #[must_use]
    pub fn is_valid(segment: &Segment, distance: f64) -> bool {
        if !distance.is_finite() || distance <= 0.0 {
            return false;
        }
        match segment.geometry_type() {
            GeometryType::Line => true,
            GeometryType::Arc => segment.radius().is_some_and(|r| distance < r),
        }
    }

    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub(crate) fn set_distance(&mut self, distance: f64) {
        self.distance = distance;
    }

    /// Break points recorded since the last [`OffsetCurve::clear`].
    #[must_use]
    pub fn intersects(&self) -> &[OffsetIntersect] {
        &self.intersects
    }

    pub fn add_intersect(&mut self, intersect: OffsetIntersect) {
        self.intersects.push(intersect);
    }

    /// Curves produced by the last [`OffsetCurve::create`].
    #[must_use]
    pub fn generated(&self) -> &[CurveId] {
        &self.generated
    }

    /// Untrimmed parallel curve, or `None` if the offset is degenerate.
    pub fn curve<S: DrawingSurface + ?Sized>(&self, segment: &Segment, surface: &S) -> Option<Curve> {
        if !Self::is_valid(segment, self.distance) {
            return None;
        }
        surface.offset(segment.curve(), self.side, self.distance)
    }

    /// Creates the trimmed parallel curve(s) on the surface.
    ///
    /// Returns `false` if the offset is degenerate; nothing is created then.
    pub fn create<S: DrawingSurface + ?Sized>(&mut self, segment: &Segment, surface: &mut S) -> bool {
        let Some(full) = self.curve(segment, surface) else {
            warn!(side = ?self.side, distance = self.distance, "degenerate offset skipped");
            return false;
        };
        for piece in Trim::new(&full, &self.intersects).execute() {
            self.generated.push(surface.create_curve(piece));
        }
        true
    }

    /// Erases generated curves and forgets break points.
    ///
    /// # Errors
    ///
    /// Returns an error if a generated curve is no longer on the surface.
    pub fn clear<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) -> Result<()> {
        self.intersects.clear();
        surface.erase_all(&mut self.generated)
    }
}

/// Pavement edge beyond a carriageway.
#[derive(Debug, Clone)]
pub struct Pavement {
    offset: OffsetCurve,
    width: f64,
    kind: PavementKind,
}

impl Pavement {
    #[must_use]
    pub fn offset(&self) -> &OffsetCurve {
        &self.offset
    }

    pub fn offset_mut(&mut self) -> &mut OffsetCurve {
        &mut self.offset
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn kind(&self) -> PavementKind {
        self.kind
    }
}

/// Carriageway edge of one side of a centre line, owning its pavement.
#[derive(Debug, Clone)]
pub struct CarriageWay {
    offset: OffsetCurve,
    width: f64,
    pavement: Pavement,
    ignore: bool,
}

impl CarriageWay {
    #[must_use]
    pub fn new(side: Side, width: f64, pavement_width: f64, kind: PavementKind) -> Self {
        Self {
            offset: OffsetCurve::new(side, width),
            width,
            pavement: Pavement {
                offset: OffsetCurve::new(side, width + pavement_width),
                width: pavement_width,
                kind,
            },
            ignore: false,
        }
    }

    #[must_use]
    pub fn offset(&self) -> &OffsetCurve {
        &self.offset
    }

    pub fn offset_mut(&mut self) -> &mut OffsetCurve {
        &mut self.offset
    }

    #[must_use]
    pub fn pavement(&self) -> &Pavement {
        &self.pavement
    }

    pub fn pavement_mut(&mut self) -> &mut Pavement {
        &mut self.pavement
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Suppressed sides produce no curves; a junction arc covers them.
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        self.ignore
    }

    pub fn set_ignore(&mut self, ignore: bool) {
        self.ignore = ignore;
    }

    /// Updates both edge distances after a width change.
    pub(crate) fn set_widths(&mut self, width: f64, pavement_width: f64) {
        self.width = width;
        self.offset.set_distance(width);
        self.pavement.width = pavement_width;
        self.pavement.offset.set_distance(width + pavement_width);
    }

    pub(crate) fn set_pavement_kind(&mut self, kind: PavementKind) {
        self.pavement.kind = kind;
    }

    /// Generates carriageway and pavement edges unless ignored.
    ///
    /// Returns `false` if either edge was degenerate.
    pub fn create<S: DrawingSurface + ?Sized>(&mut self, segment: &Segment, surface: &mut S) -> bool {
        if self.ignore {
            return true;
        }
        let carriageway = self.offset.create(segment, surface);
        let pavement = self.pavement.offset.create(segment, surface);
        carriageway && pavement
    }

    /// Clears both edges. The ignore flag is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if a generated curve is no longer on the surface.
    pub fn clear<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) -> Result<()> {
        let carriageway = self.offset.clear(surface);
        let pavement = self.pavement.offset.clear(surface);
        carriageway.and(pavement)
    }
}
