//! Contour extraction and contour geometry.
//!
//! Borders come from `imageproc`'s Suzuki–Abe border following, which scans the
//! image top-to-bottom, left-to-right and reports borders in discovery order. That
//! order is what "first contour" means everywhere in this crate.

use image::{imageops, GrayImage};
use imageproc::{
    contours::{find_contours, BorderType},
    geometry::convex_hull,
    point::Point,
};

use crate::mask::Mask;

/// One traced border of a mask region.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    /// Ordered boundary pixels as `(x, y)`.
    pub points: Vec<(i32, i32)>,
    /// Whether this border encloses a region or a hole.
    pub kind: BorderKind,
    /// Index of the enclosing border in the contour list, if any.
    pub parent: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderKind {
    Outer,
    Hole,
}

impl Contour {
    /// Outer border with no enclosing border.
    pub fn is_external(&self) -> bool {
        self.kind == BorderKind::Outer && self.parent.is_none()
    }

    /// Absolute polygon area of the border (shoelace formula).
    pub fn area(&self) -> f64 {
        self.moments().m00.abs()
    }

    /// Spatial moments of the polygon traced by the border.
    pub fn moments(&self) -> Moments {
        Moments::of_polygon(&self.points)
    }
}

/// All borders of the selected region in raster discovery order.
///
/// The mask is traced inside a one-pixel unselected frame, so regions touching
/// the image edge get outer borders like any other region. Points are reported
/// in mask coordinates.
pub fn trace_contours(mask: &Mask) -> Vec<Contour> {
    let (width, height) = mask.dimensions();
    let mut framed = GrayImage::new(width + 2, height + 2);
    imageops::replace(&mut framed, mask.as_gray(), 1, 1);

    find_contours::<i32>(&framed)
        .into_iter()
        .map(|contour| Contour {
            points: contour.points.iter().map(|p| (p.x - 1, p.y - 1)).collect(),
            kind: match contour.border_type {
                BorderType::Outer => BorderKind::Outer,
                BorderType::Hole => BorderKind::Hole,
            },
            parent: contour.parent,
        })
        .collect()
}

/// Polygon moments up to first order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl Moments {
    /// Moments of a closed polygon via Green's theorem, normalized to a
    /// non-negative `m00` regardless of winding direction.
    pub fn of_polygon(points: &[(i32, i32)]) -> Self {
        if points.len() < 3 {
            return Self::default();
        }

        let mut moments = Self::default();
        for (i, &(xi, yi)) in points.iter().enumerate() {
            let (xj, yj) = points[(i + 1) % points.len()];
            let (xi, yi, xj, yj) = (f64::from(xi), f64::from(yi), f64::from(xj), f64::from(yj));
            let cross = xi * yj - xj * yi;
            moments.m00 += cross;
            moments.m10 += (xi + xj) * cross;
            moments.m01 += (yi + yj) * cross;
        }
        moments.m00 /= 2.0;
        moments.m10 /= 6.0;
        moments.m01 /= 6.0;

        if moments.m00 < 0.0 {
            moments.m00 = -moments.m00;
            moments.m10 = -moments.m10;
            moments.m01 = -moments.m01;
        }
        moments
    }

    /// Centroid `(x, y)`, or `None` for a zero-area polygon.
    pub fn centroid(&self) -> Option<(f64, f64)> {
        (self.m00 != 0.0).then(|| (self.m10 / self.m00, self.m01 / self.m00))
    }
}

/// Set every pixel on or inside the polygon traced by `points` to `selected`.
///
/// Interior pixels are found by an even-odd scanline through pixel centers.
/// Border points are integer and consecutive points are 8-neighbours, so every
/// scanline crossing lands on a border pixel.
pub fn fill_contour(mask: &mut Mask, points: &[(i32, i32)], selected: bool) {
    let Some(&(_, first_y)) = points.first() else {
        return;
    };
    let (min_y, max_y) = points
        .iter()
        .fold((first_y, first_y), |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)));

    let mut crossings = Vec::new();
    for y in min_y..=max_y {
        crossings.clear();
        for (i, &(xi, yi)) in points.iter().enumerate() {
            let (xj, yj) = points[(i + 1) % points.len()];
            if (yi > y) != (yj > y) {
                let t = f64::from(y - yi) / f64::from(yj - yi);
                crossings.push(f64::from(xi) + t * f64::from(xj - xi));
            }
        }
        crossings.sort_by(f64::total_cmp);

        for pair in crossings.chunks_exact(2) {
            let start = pair[0].ceil() as i32;
            let end = pair[1].floor() as i32;
            for x in start..=end {
                set_signed(mask, x, y, selected);
            }
        }
    }

    for &(x, y) in points {
        set_signed(mask, x, y, selected);
    }
}

fn set_signed(mask: &mut Mask, x: i32, y: i32, selected: bool) {
    if let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) {
        mask.set(x, y, selected);
    }
}

/// Smallest circle `(center_x, center_y, radius)` enclosing every point.
///
/// Runs the incremental Welzl construction over the convex hull of the input,
/// so the result depends only on the point set. Returns `None` for no points.
pub fn min_enclosing_circle(points: &[(i32, i32)]) -> Option<(f64, f64, f64)> {
    let mut distinct = points.to_vec();
    distinct.sort_unstable();
    distinct.dedup();
    let distinct: Vec<Point<i32>> = distinct.into_iter().map(|(x, y)| Point::new(x, y)).collect();

    let hull: Vec<(f64, f64)> = convex_hull(distinct)
        .into_iter()
        .map(|p| (f64::from(p.x), f64::from(p.y)))
        .collect();
    let (&first, rest) = hull.split_first()?;

    let mut circle = (first.0, first.1, 0.0);
    for (i, &p) in rest.iter().enumerate() {
        if encloses(circle, p) {
            continue;
        }
        circle = (p.0, p.1, 0.0);
        for (j, &q) in hull[..=i].iter().enumerate() {
            if encloses(circle, q) {
                continue;
            }
            circle = circle_from_two(p, q);
            for &r in &hull[..j] {
                if !encloses(circle, r) {
                    circle = circle_from_three(p, q, r);
                }
            }
        }
    }
    Some(circle)
}

fn encloses((cx, cy, radius): (f64, f64, f64), (x, y): (f64, f64)) -> bool {
    (x - cx).hypot(y - cy) <= radius * (1.0 + 1e-9) + 1e-9
}

fn circle_from_two(a: (f64, f64), b: (f64, f64)) -> (f64, f64, f64) {
    let cx = (a.0 + b.0) / 2.0;
    let cy = (a.1 + b.1) / 2.0;
    (cx, cy, (a.0 - b.0).hypot(a.1 - b.1) / 2.0)
}

fn circle_from_three(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> (f64, f64, f64) {
    let (bx, by) = (b.0 - a.0, b.1 - a.1);
    let (cx, cy) = (c.0 - a.0, c.1 - a.1);
    let d = 2.0 * (bx * cy - by * cx);

    if d.abs() < f64::EPSILON {
        // Collinear: the widest pair spans the circle.
        return [circle_from_two(a, b), circle_from_two(a, c), circle_from_two(b, c)]
            .into_iter()
            .fold((0.0, 0.0, f64::NEG_INFINITY), |best, candidate| {
                if candidate.2 > best.2 {
                    candidate
                } else {
                    best
                }
            });
    }

    let b2 = bx * bx + by * by;
    let c2 = cx * cx + cy * cy;
    let ux = (cy * b2 - by * c2) / d;
    let uy = (bx * c2 - cx * b2) / d;
    (a.0 + ux, a.1 + uy, ux.hypot(uy))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rstest::*;

    use super::*;

    fn rectangle(width: u32, height: u32, x0: u32, y0: u32, w: u32, h: u32) -> Mask {
        Mask::from_fn(width, height, |x, y| {
            (x0..x0 + w).contains(&x) && (y0..y0 + h).contains(&y)
        })
    }

    #[test]
    fn contours_are_reported_in_raster_order() {
        let mut mask = rectangle(20, 20, 12, 1, 4, 4);
        for y in 10..15 {
            for x in 1..5 {
                mask.set(x, y, true);
            }
        }

        let contours = trace_contours(&mask);
        assert_eq!(contours.len(), 2);
        assert!(contours[0].points.contains(&(12, 1)));
        assert!(contours[1].points.contains(&(1, 10)));
        assert!(contours.iter().all(Contour::is_external));
    }

    #[test]
    fn ring_has_an_outer_and_a_hole_border() {
        let mut mask = rectangle(12, 12, 2, 2, 8, 8);
        for y in 4..8 {
            for x in 4..8 {
                mask.set(x, y, false);
            }
        }

        let contours = trace_contours(&mask);
        assert_eq!(contours.len(), 2);
        assert_eq!(contours[0].kind, BorderKind::Outer);
        assert_eq!(contours[1].kind, BorderKind::Hole);
        assert_eq!(contours[1].parent, Some(0));
    }

    #[rstest]
    #[case(10, 5, 36.0)]
    #[case(50, 10, 441.0)]
    #[case(1, 1, 0.0)]
    #[case(7, 1, 0.0)]
    fn rectangle_border_area_is_the_polygon_through_pixel_centers(
        #[case] w: u32,
        #[case] h: u32,
        #[case] expected: f64,
    ) {
        let mask = rectangle(64, 32, 3, 4, w, h);
        let contours = trace_contours(&mask);

        assert_eq!(contours.len(), 1);
        assert_relative_eq!(contours[0].area(), expected);
    }

    #[test]
    fn centroid_of_rectangle_is_its_center() {
        let mask = rectangle(64, 64, 10, 20, 11, 5);
        let contour = &trace_contours(&mask)[0];
        let (cx, cy) = contour.moments().centroid().unwrap();

        assert_relative_eq!(cx, 15.0, epsilon = 1e-9);
        assert_relative_eq!(cy, 22.0, epsilon = 1e-9);
    }

    #[test]
    fn degenerate_polygon_has_no_centroid() {
        assert_eq!(Moments::of_polygon(&[(1, 1), (2, 1), (3, 1)]).centroid(), None);
        assert_eq!(Moments::of_polygon(&[(4, 4)]).centroid(), None);
    }

    #[test]
    fn filling_an_outer_border_restores_the_region_and_its_holes() {
        let solid = rectangle(16, 16, 2, 3, 9, 7);
        let mut ring = solid.clone();
        ring.set(6, 6, false);
        ring.set(7, 6, false);

        let contour = trace_contours(&ring)
            .into_iter()
            .find(Contour::is_external)
            .unwrap();
        let mut filled = Mask::new(16, 16);
        fill_contour(&mut filled, &contour.points, true);

        assert_eq!(filled, solid);
    }

    #[test]
    fn filling_a_diagonal_shape_stays_inside_it() {
        let diamond = Mask::from_fn(21, 21, |x, y| {
            (i64::from(x) - 10).abs() + (i64::from(y) - 10).abs() <= 6
        });
        let contour = &trace_contours(&diamond)[0];
        let mut filled = Mask::new(21, 21);
        fill_contour(&mut filled, &contour.points, true);

        assert_eq!(filled, diamond);
    }

    #[rstest]
    #[case::left_column(0, 6)]
    #[case::right_column(16, 6)]
    #[case::top_row(6, 0)]
    #[case::bottom_row(6, 16)]
    #[case::top_left_corner(0, 0)]
    #[case::bottom_right_corner(16, 16)]
    fn regions_on_the_image_edge_have_outer_borders(#[case] x0: u32, #[case] y0: u32) {
        let mask = rectangle(20, 20, x0, y0, 4, 4);
        let contours = trace_contours(&mask);

        assert_eq!(contours.len(), 1);
        assert!(contours[0].is_external());
        assert_relative_eq!(contours[0].area(), 9.0);
        let (x0, y0) = (x0 as i32, y0 as i32);
        assert!(contours[0].points.contains(&(x0, y0)));
        assert!(contours[0].points.contains(&(x0 + 3, y0 + 3)));
    }

    #[test]
    fn left_edge_region_comes_before_later_regions() {
        let mut mask = rectangle(40, 40, 0, 0, 20, 20);
        for y in 30..33 {
            for x in 30..33 {
                mask.set(x, y, true);
            }
        }

        let contours = trace_contours(&mask);
        assert_eq!(contours.len(), 2);
        assert!(contours.iter().all(Contour::is_external));
        assert_relative_eq!(contours[0].area(), 361.0);
        assert_relative_eq!(contours[1].area(), 4.0);
    }

    #[test]
    fn single_column_mask_is_traced() {
        let mask = Mask::from_fn(1, 20, |_, y| (5..15).contains(&y));
        let contours = trace_contours(&mask);

        assert_eq!(contours.len(), 1);
        assert!(contours[0].is_external());
        assert!(contours[0].points.contains(&(0, 5)));
        assert!(contours[0].points.contains(&(0, 14)));
        assert!(contours[0].points.iter().all(|&(x, _)| x == 0));
    }

    #[test]
    fn enclosing_circle_ignores_interior_and_repeated_points() {
        let points = [(0, 0), (2, 0), (4, 0), (4, 4), (0, 4), (2, 2), (1, 3), (4, 4), (0, 0)];
        let (cx, cy, r) = min_enclosing_circle(&points).unwrap();

        assert_relative_eq!(cx, 2.0, epsilon = 1e-9);
        assert_relative_eq!(cy, 2.0, epsilon = 1e-9);
        assert_relative_eq!(r, 8f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn enclosing_circle_of_square_corners() {
        let (cx, cy, r) = min_enclosing_circle(&[(0, 0), (10, 0), (10, 10), (0, 10), (5, 5)])
            .unwrap();

        assert_relative_eq!(cx, 5.0, epsilon = 1e-9);
        assert_relative_eq!(cy, 5.0, epsilon = 1e-9);
        assert_relative_eq!(r, 50f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn enclosing_circle_of_collinear_points_spans_the_extremes() {
        let (cx, cy, r) = min_enclosing_circle(&[(2, 3), (6, 3), (4, 3), (10, 3)]).unwrap();

        assert_relative_eq!(cx, 6.0);
        assert_relative_eq!(cy, 3.0);
        assert_relative_eq!(r, 4.0);
    }

    #[test]
    fn enclosing_circle_of_nothing_is_none() {
        assert_eq!(min_enclosing_circle(&[]), None);
        assert_eq!(min_enclosing_circle(&[(3, 4)]), Some((3.0, 4.0, 0.0)));
    }
}
