//! Coordinate parsing and polygon overlap.
//!
//! Matching an external polygon against an imported region uses the ratio
//! `area(query ∩ region) / area(query)`. A region matches when the ratio is
//! strictly greater than [`MATCH_THRESHOLD`].

use geo::{Area, BooleanOps, LineString, MultiPolygon, Polygon};

use crate::error::{Error, Result};
use crate::model::Point;

/// Minimum overlap ratio (exclusive) for a query polygon to match a region.
pub const MATCH_THRESHOLD: f64 = 0.95;

/// Minimum number of points in a query polygon.
pub const MIN_QUERY_POINTS: usize = 3;

/// Parse PAGE `points` notation: whitespace-separated `x,y` integer pairs.
///
/// # Example
///
/// ```
/// use pagexml::geometry::parse_points;
/// use pagexml::Point;
///
/// let points = parse_points("30,35 944,35 944,1575").unwrap();
/// assert_eq!(points[1], Point::new(944, 35));
/// ```
pub fn parse_points(value: &str) -> Result<Vec<Point>> {
    value.split_whitespace().map(parse_point).collect()
}

fn parse_point(pair: &str) -> Result<Point> {
    let (x, y) = pair
        .split_once(',')
        .ok_or_else(|| Error::InvalidCoords(format!("expected 'x,y', got '{}'", pair)))?;

    let parse = |v: &str| {
        v.trim()
            .parse::<i32>()
            .map_err(|_| Error::InvalidCoords(format!("'{}' is not an integer in '{}'", v, pair)))
    };

    Ok(Point::new(parse(x)?, parse(y)?))
}

/// Parse a query polygon, requiring at least [`MIN_QUERY_POINTS`] points.
pub fn parse_query(value: &str) -> Result<Vec<Point>> {
    let points = parse_points(value)?;
    if points.len() < MIN_QUERY_POINTS {
        return Err(Error::InvalidCoords(format!(
            "query polygon needs at least {} points, got {}",
            MIN_QUERY_POINTS,
            points.len()
        )));
    }
    Ok(points)
}

/// Drop consecutive duplicates and a repeated closing point.
pub fn normalize(points: &[Point]) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if out.last() != Some(&p) {
            out.push(p);
        }
    }
    while out.len() > 1 && out.first() == out.last() {
        out.pop();
    }
    out
}

fn to_polygon(points: &[Point]) -> Polygon<f64> {
    let ring: Vec<(f64, f64)> = points
        .iter()
        .map(|p| (f64::from(p.x), f64::from(p.y)))
        .collect();
    Polygon::new(LineString::from(ring), vec![])
}

/// Area covered by a polygon given by its outline.
///
/// Self-intersecting outlines are resolved the same way as in
/// [`intersection_area`]: the lobes of a bow-tie add up instead of
/// cancelling out.
pub fn polygon_area(points: &[Point]) -> f64 {
    let points = normalize(points);
    if points.len() < 3 {
        return 0.0;
    }
    MultiPolygon::new(vec![to_polygon(&points)])
        .union(&MultiPolygon::new(Vec::new()))
        .unsigned_area()
}

/// Area of the intersection of two polygons.
pub fn intersection_area(a: &[Point], b: &[Point]) -> f64 {
    let a = normalize(a);
    let b = normalize(b);
    if a.len() < 3 || b.len() < 3 {
        return 0.0;
    }
    to_polygon(&a).intersection(&to_polygon(&b)).unsigned_area()
}

/// Overlap of `region` with `query`, relative to the query's area.
///
/// Both areas come from the same boolean-ops geometry, so the ratio stays
/// within `0.0..=1.0` for self-intersecting queries too. Fails with
/// [`Error::DegeneratePolygon`] when the query has zero area.
pub fn overlap_ratio(query: &[Point], region: &[Point]) -> Result<f64> {
    let query_area = polygon_area(query);
    if query_area <= 0.0 {
        return Err(Error::DegeneratePolygon);
    }
    Ok(intersection_area(query, region) / query_area)
}

/// Check whether `region` covers more than [`MATCH_THRESHOLD`] of `query`.
pub fn is_match(query: &[Point], region: &[Point]) -> Result<bool> {
    Ok(overlap_ratio(query, region)? > MATCH_THRESHOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(v: &[(i32, i32)]) -> Vec<Point> {
        v.iter().copied().map(Point::from).collect()
    }

    fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<Point> {
        pts(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1)])
    }

    #[test]
    fn test_parse_points() {
        let points = parse_points("30,35 944,35\t944,1575\n30,1575").unwrap();
        assert_eq!(points, rect(30, 35, 944, 1575));
        assert!(parse_points("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_points_invalid() {
        assert!(matches!(parse_points("30;35"), Err(Error::InvalidCoords(_))));
        assert!(matches!(parse_points("30,a"), Err(Error::InvalidCoords(_))));
        assert!(matches!(parse_points("1.5,2"), Err(Error::InvalidCoords(_))));
    }

    #[test]
    fn test_parse_query_requires_three_points() {
        assert!(matches!(parse_query("0,0 10,10"), Err(Error::InvalidCoords(_))));
        assert_eq!(parse_query("0,0 10,0 10,10").unwrap().len(), 3);
    }

    #[test]
    fn test_normalize() {
        let p = pts(&[(0, 0), (0, 0), (5, 0), (5, 5), (0, 0)]);
        assert_eq!(normalize(&p), pts(&[(0, 0), (5, 0), (5, 5)]));
        assert_eq!(normalize(&pts(&[(1, 1), (1, 1)])), pts(&[(1, 1)]));
    }

    #[test]
    fn test_polygon_area() {
        assert!((polygon_area(&rect(0, 0, 10, 20)) - 200.0).abs() < 1e-9);
        assert!((polygon_area(&pts(&[(0, 0), (4, 0), (0, 3)])) - 6.0).abs() < 1e-9);
        assert_eq!(polygon_area(&pts(&[(0, 0), (4, 0)])), 0.0);
    }

    #[test]
    fn test_self_intersecting_area_counts_both_lobes() {
        // Lobes of 200/3 and 50/3 cross at (20/3, 20/3)
        let bow_tie = pts(&[(0, 0), (10, 10), (10, 0), (0, 20)]);
        assert!((polygon_area(&bow_tie) - 250.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_self_intersecting_query_ratio_stays_in_range() {
        let bow_tie = pts(&[(0, 0), (10, 10), (10, 0), (0, 20)]);

        let ratio = overlap_ratio(&bow_tie, &rect(0, 0, 10, 20)).unwrap();
        assert!((ratio - 1.0).abs() < 1e-6);

        // Only the left lobe lies in this region
        let ratio = overlap_ratio(&bow_tie, &rect(0, 0, 6, 20)).unwrap();
        assert!(ratio < 1.0);
    }

    #[test]
    fn test_overlap_ratio_identical() {
        let r = rect(30, 35, 944, 1575);
        let ratio = overlap_ratio(&r, &r).unwrap();
        assert!((ratio - 1.0).abs() < 1e-9);
        assert!(is_match(&r, &r).unwrap());
    }

    #[test]
    fn test_overlap_ratio_partial() {
        let query = rect(0, 0, 10, 10);
        let region = rect(5, 0, 20, 10);
        let ratio = overlap_ratio(&query, &region).unwrap();
        assert!((ratio - 0.5).abs() < 1e-9);
        assert!(!is_match(&query, &region).unwrap());
    }

    #[test]
    fn test_overlap_ratio_contained_query() {
        // Query fully inside the region
        let ratio = overlap_ratio(&rect(10, 10, 20, 20), &rect(0, 0, 100, 100)).unwrap();
        assert!((ratio - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_overlap_ratio_disjoint() {
        let ratio = overlap_ratio(&rect(0, 0, 10, 10), &rect(50, 50, 60, 60)).unwrap();
        assert_eq!(ratio, 0.0);
    }

    #[test]
    fn test_threshold_boundary() {
        let query = rect(0, 0, 100, 10);
        assert!(!is_match(&query, &rect(10, 0, 100, 10)).unwrap());
        assert!(is_match(&query, &rect(3, 0, 100, 10)).unwrap());
    }

    #[test]
    fn test_ratio_at_threshold_does_not_match() {
        let query = rect(0, 0, 100, 10);
        let region = rect(5, 0, 100, 10);

        let ratio = overlap_ratio(&query, &region).unwrap();
        assert!((ratio - MATCH_THRESHOLD).abs() < 1e-9);
        assert!(!is_match(&query, &region).unwrap());
    }

    #[test]
    fn test_degenerate_query() {
        let line = pts(&[(0, 0), (10, 0), (20, 0)]);
        assert!(matches!(
            overlap_ratio(&line, &rect(0, 0, 10, 10)),
            Err(Error::DegeneratePolygon)
        ));
    }

    #[test]
    fn test_degenerate_region_never_matches() {
        let ratio = overlap_ratio(&rect(0, 0, 10, 10), &pts(&[(0, 0), (10, 10)])).unwrap();
        assert_eq!(ratio, 0.0);
    }
}
