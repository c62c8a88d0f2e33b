// Copyright 2025 the LogikSim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `SegmentInfo`: one straight wire segment plus its endpoint classification.

use logiksim_geometry::{OrderedLine, Point, SegmentPointType};

/// One straight segment of a wire, with its two endpoints classified.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SegmentInfo {
    line: OrderedLine,
    p0_type: SegmentPointType,
    p1_type: SegmentPointType,
}

impl SegmentInfo {
    /// Creates a segment with both endpoints freshly classified as unknown.
    #[must_use]
    pub fn new(line: OrderedLine) -> Self {
        Self {
            line,
            p0_type: SegmentPointType::NewUnknown,
            p1_type: SegmentPointType::NewUnknown,
        }
    }

    /// Creates a segment with explicit endpoint classifications.
    #[must_use]
    pub fn with_types(
        line: OrderedLine,
        p0_type: SegmentPointType,
        p1_type: SegmentPointType,
    ) -> Self {
        Self {
            line,
            p0_type,
            p1_type,
        }
    }

    /// The segment's geometry.
    #[must_use]
    pub fn line(self) -> OrderedLine {
        self.line
    }

    /// The classification of `line.p0()`.
    #[must_use]
    pub fn p0_type(self) -> SegmentPointType {
        self.p0_type
    }

    /// The classification of `line.p1()`.
    #[must_use]
    pub fn p1_type(self) -> SegmentPointType {
        self.p1_type
    }

    /// Returns the classification of whichever endpoint sits at `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is neither endpoint of `line()`.
    #[must_use]
    pub fn point_type_at(self, position: Point) -> SegmentPointType {
        if position == self.line.p0() {
            self.p0_type
        } else if position == self.line.p1() {
            self.p1_type
        } else {
            panic!("position is not an endpoint of this segment");
        }
    }

    /// Returns a copy with the endpoint at `position` reclassified.
    ///
    /// # Panics
    ///
    /// Panics if `position` is neither endpoint of `line()`.
    #[must_use]
    pub fn with_point_type(self, position: Point, new_type: SegmentPointType) -> Self {
        if position == self.line.p0() {
            Self {
                p0_type: new_type,
                ..self
            }
        } else if position == self.line.p1() {
            Self {
                p1_type: new_type,
                ..self
            }
        } else {
            panic!("position is not an endpoint of this segment");
        }
    }

    /// Returns both endpoints paired with their classification, `p0` first.
    #[must_use]
    pub fn to_point_and_type(self) -> [(Point, SegmentPointType); 2] {
        [(self.line.p0(), self.p0_type), (self.line.p1(), self.p1_type)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logiksim_geometry::{Grid, Point};

    fn line(x0: i32, y0: i32, x1: i32, y1: i32) -> OrderedLine {
        OrderedLine::new(
            Point::new(Grid::new(x0).unwrap(), Grid::new(y0).unwrap()),
            Point::new(Grid::new(x1).unwrap(), Grid::new(y1).unwrap()),
        )
        .unwrap()
    }

    #[test]
    fn fresh_segment_is_unclassified() {
        let info = SegmentInfo::new(line(0, 0, 5, 0));
        assert_eq!(info.p0_type(), SegmentPointType::NewUnknown);
        assert_eq!(info.p1_type(), SegmentPointType::NewUnknown);
    }

    #[test]
    fn point_type_at_looks_up_the_matching_endpoint() {
        let info = SegmentInfo::with_types(
            line(0, 0, 5, 0),
            SegmentPointType::Output,
            SegmentPointType::Input,
        );
        assert_eq!(info.point_type_at(Point::new(Grid::new(0).unwrap(), Grid::ZERO)), SegmentPointType::Output);
        assert_eq!(info.point_type_at(Point::new(Grid::new(5).unwrap(), Grid::ZERO)), SegmentPointType::Input);
    }

    #[test]
    #[should_panic(expected = "not an endpoint")]
    fn point_type_at_panics_on_unrelated_point() {
        let info = SegmentInfo::new(line(0, 0, 5, 0));
        let _ = info.point_type_at(Point::new(Grid::new(9).unwrap(), Grid::ZERO));
    }

    #[test]
    fn with_point_type_reclassifies_only_the_matching_endpoint() {
        let info = SegmentInfo::new(line(0, 0, 5, 0));
        let updated = info.with_point_type(Point::new(Grid::new(0).unwrap(), Grid::ZERO), SegmentPointType::Output);
        assert_eq!(updated.p0_type(), SegmentPointType::Output);
        assert_eq!(updated.p1_type(), SegmentPointType::NewUnknown);
    }
}
