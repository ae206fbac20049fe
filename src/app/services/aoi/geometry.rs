//! Planar polygon primitives
//!
//! Everything here operates on projected coordinates in meters. Rings are
//! open vertex lists (last vertex does not repeat the first).

/// A polygon ring in projected plane coordinates
pub type Ring = Vec<[f64; 2]>;

/// Signed shoelace area; positive for counter-clockwise rings
pub fn signed_area(ring: &[[f64; 2]]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for (i, a) in ring.iter().enumerate() {
        let b = ring[(i + 1) % ring.len()];
        sum += a[0] * b[1] - b[0] * a[1];
    }
    sum / 2.0
}

/// Absolute ring area
pub fn area(ring: &[[f64; 2]]) -> f64 {
    signed_area(ring).abs()
}

/// Convex hull of a point set, counter-clockwise (Andrew's monotone chain).
///
/// Swath corner rings occasionally arrive self-intersecting when the corner
/// order degrades near the pole; taking the hull of the four corners yields
/// the valid convex footprint those corners describe.
pub fn convex_hull(points: &[[f64; 2]]) -> Ring {
    let mut pts: Vec<[f64; 2]> = points.to_vec();
    pts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }

    let cross = |o: [f64; 2], a: [f64; 2], b: [f64; 2]| {
        (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
    };

    let mut lower: Ring = Vec::new();
    for &p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Ring = Vec::new();
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Clip a subject ring against a convex counter-clockwise clip ring
/// (Sutherland-Hodgman). The subject may be any simple polygon; the result
/// is the intersection ring, possibly empty.
pub fn clip_convex(subject: &[[f64; 2]], clip: &[[f64; 2]]) -> Ring {
    if clip.len() < 3 {
        return Vec::new();
    }
    let mut output: Ring = subject.to_vec();

    for (i, &edge_start) in clip.iter().enumerate() {
        if output.is_empty() {
            break;
        }
        let edge_end = clip[(i + 1) % clip.len()];
        let input = std::mem::take(&mut output);

        // signed distance from the (directed) clip edge; >= 0 is inside
        let side = |p: [f64; 2]| {
            (edge_end[0] - edge_start[0]) * (p[1] - edge_start[1])
                - (edge_end[1] - edge_start[1]) * (p[0] - edge_start[0])
        };
        let intersect = |a: [f64; 2], b: [f64; 2]| {
            let da = side(a);
            let db = side(b);
            let t = da / (da - db);
            [a[0] + t * (b[0] - a[0]), a[1] + t * (b[1] - a[1])]
        };

        for (j, &current) in input.iter().enumerate() {
            let previous = input[(j + input.len() - 1) % input.len()];
            let current_in = side(current) >= 0.0;
            let previous_in = side(previous) >= 0.0;
            if current_in {
                if !previous_in {
                    output.push(intersect(previous, current));
                }
                output.push(current);
            } else if previous_in {
                output.push(intersect(previous, current));
            }
        }
    }
    output
}
