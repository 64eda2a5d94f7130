use std::collections::VecDeque;
use std::f64::consts::FRAC_PI_2;

use tracing::debug;

use crate::config::HighwayConfig;
use crate::error::{ConnectivityError, Result};
use crate::geometry::Segment;
use crate::math::{cross, Point2};

/// Groups unordered segments into directed chains.
///
/// Each chain is seeded with the first remaining segment. Remaining
/// segments are then scanned in insertion order and the first one touching
/// either chain end, and meeting it under the transition rule, is attached
/// (reversed if needed). When a full scan attaches nothing, a new chain
/// is started.
pub struct ConnectivityBuilder<'a> {
    segments: Vec<Segment>,
    config: &'a HighwayConfig,
}

enum Attach {
    Append(Segment),
    Prepend(Segment),
}

impl<'a> ConnectivityBuilder<'a> {
    #[must_use]
    pub fn new(segments: Vec<Segment>, config: &'a HighwayConfig) -> Self {
        Self { segments, config }
    }

    /// Executes the grouping.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectivityError::InvalidCentreLine`] if any segment is
    /// shorter than the position tolerance.
    pub fn execute(self) -> Result<Vec<Vec<Segment>>> {
        for (index, segment) in self.segments.iter().enumerate() {
            if segment.length() <= self.config.position_tolerance {
                return Err(ConnectivityError::InvalidCentreLine {
                    index,
                    reason: format!("length {} is below tolerance", segment.length()),
                }
                .into());
            }
        }

        let config = self.config;
        let mut pool = self.segments;
        let mut chains = Vec::new();
        while !pool.is_empty() {
            let mut chain = VecDeque::from([pool.remove(0)]);
            while let Some((index, attach)) = find_attachment(&chain, &pool, config) {
                pool.remove(index);
                match attach {
                    Attach::Append(s) => chain.push_back(s),
                    Attach::Prepend(s) => chain.push_front(s),
                }
            }
            debug!(segments = chain.len(), remaining = pool.len(), "chain closed");
            chains.push(Vec::from(chain));
        }
        Ok(chains)
    }
}

/// First pool segment that extends the chain at either end.
fn find_attachment(chain: &VecDeque<Segment>, pool: &[Segment], config: &HighwayConfig) -> Option<(usize, Attach)> {
    let (first, last) = (chain.front()?, chain.back()?);
    let (head, tail) = (first.start_point(), last.end_point());
    let eps = config.position_tolerance;
    let near = |a: Point2, b: Point2| (a - b).norm() < eps;
    if chain.len() > 1 && near(head, tail) {
        return None;
    }

    pool.iter().enumerate().find_map(|(index, candidate)| {
        let attach = if near(candidate.start_point(), tail) {
            Attach::Append(candidate.clone())
        } else if near(candidate.end_point(), tail) {
            Attach::Append(candidate.reversed())
        } else if near(candidate.end_point(), head) {
            Attach::Prepend(candidate.clone())
        } else if near(candidate.start_point(), head) {
            Attach::Prepend(candidate.reversed())
        } else {
            return None;
        };
        let fits = match &attach {
            Attach::Append(s) => transition_allowed(last, s, &tail, config.angle_tolerance),
            Attach::Prepend(s) => transition_allowed(s, first, &head, config.angle_tolerance),
        };
        fits.then_some((index, attach))
    })
}

/// Type-transition rule at the shared point `at`.
///
/// Compares reference directions (a line's direction, an arc's radial
/// vector). Line/arc pairs must be perpendicular; like pairs must be
/// parallel or anti-parallel.
#[must_use]
pub fn transition_allowed(from: &Segment, to: &Segment, at: &Point2, angle_tolerance: f64) -> bool {
    let a = from.reference_direction(at);
    let b = to.reference_direction(at);
    // Angle between the undirected reference lines, in [0, π/2].
    let angle = cross(&a, &b).abs().atan2(a.dot(&b).abs());
    let expected = if from.geometry_type() == to.geometry_type() {
        0.0
    } else {
        FRAC_PI_2
    };
    (angle - expected).abs() <= angle_tolerance
}
