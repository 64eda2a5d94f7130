use crate::geometry::Curve;
use crate::network::OffsetIntersect;

/// Trims a curve against a set of break points.
///
/// Break points are swept along the curve in arc-length order. A point with
/// `is_before == true` ends a retained span (the kept curve lies before it);
/// one with `is_before == false` starts a span. When several cuts of the same
/// kind follow each other, the outermost one wins, so the retained span is as
/// long as the cuts allow.
pub struct Trim<'a> {
    curve: &'a Curve,
    breaks: &'a [OffsetIntersect],
}

impl<'a> Trim<'a> {
    /// Creates a new `Trim` operation.
    #[must_use]
    pub fn new(curve: &'a Curve, breaks: &'a [OffsetIntersect]) -> Self {
        Self { curve, breaks }
    }

    /// Executes the trim, returning the retained pieces in curve order.
    #[must_use]
    pub fn execute(&self) -> Vec<Curve> {
        if self.breaks.is_empty() {
            return vec![self.curve.clone()];
        }

        let mut cuts: Vec<(f64, bool)> = self
            .breaks
            .iter()
            .map(|b| (self.curve.project(&b.point), b.is_before))
            .collect();
        cuts.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let spans = retained_spans(&cuts, self.curve.length());
        spans
            .into_iter()
            .filter_map(|(s0, s1)| self.curve.sub_curve(s0, s1))
            .collect()
    }
}

/// Computes retained `(start, end)` arc-length spans from sorted cuts.
fn retained_spans(cuts: &[(f64, bool)], length: f64) -> Vec<(f64, f64)> {
    let mut spans = Vec::new();

    // The curve start is retained unless the first cut opens a span.
    let mut open_from = match cuts.first() {
        Some(&(_, false)) => None,
        _ => Some(0.0),
    };
    let mut close_at: Option<f64> = None;

    for &(s, is_before) in cuts {
        if is_before {
            if open_from.is_some() {
                close_at = Some(s);
            }
            continue;
        }
        match (open_from, close_at) {
            (Some(start), Some(end)) => {
                spans.push((start, end));
                open_from = Some(s);
                close_at = None;
            }
            (Some(_), None) => {}
            (None, _) => open_from = Some(s),
        }
    }

    if let Some(start) = open_from {
        spans.push((start, close_at.unwrap_or(length)));
    }
    spans
}
