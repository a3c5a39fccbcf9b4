//! Binary region masks.
//!
//! All regions are filled onto a canvas of the native page size, which is
//! then resampled to the requested size with nearest-neighbour filtering so
//! every pixel stays 0 (background) or 1 (region).

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};
use imageproc::drawing::{draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point as CanvasPoint;
use ndarray::Array3;

use crate::geometry::normalize;
use crate::model::{Point, Region};

/// Pixel value for region pixels.
pub const FOREGROUND: u8 = 1;

/// Pixel value for background pixels.
pub const BACKGROUND: u8 = 0;

/// Number of channels in the returned mask array.
pub const MASK_CHANNELS: usize = 3;

/// Rasterize regions at page size and resample to `width` x `height`.
pub fn regions_mask_image(
    regions: &[Region],
    page_width: u32,
    page_height: u32,
    width: u32,
    height: u32,
) -> GrayImage {
    if width == 0 || height == 0 || page_width == 0 || page_height == 0 {
        return GrayImage::new(width, height);
    }

    let mut canvas = GrayImage::from_pixel(page_width, page_height, Luma([BACKGROUND]));
    for region in regions {
        fill_polygon(&mut canvas, &region.polygon);
    }

    if (width, height) == (page_width, page_height) {
        return canvas;
    }
    imageops::resize(&canvas, width, height, FilterType::Nearest)
}

/// Rasterize regions into a `(height, width, 3)` array of 0/1 values.
pub fn regions_mask(
    regions: &[Region],
    page_width: u32,
    page_height: u32,
    width: u32,
    height: u32,
) -> Array3<u8> {
    let image = regions_mask_image(regions, page_width, page_height, width, height);
    image_to_mask(&image)
}

/// Replicate a single-channel image across three channels.
pub fn image_to_mask(image: &GrayImage) -> Array3<u8> {
    let (width, height) = image.dimensions();
    Array3::from_shape_fn(
        (height as usize, width as usize, MASK_CHANNELS),
        |(y, x, _)| image.get_pixel(x as u32, y as u32)[0],
    )
}

/// Fill a polygon including its outline.
///
/// Outlines reaching past the canvas are clipped to it first, so far-away
/// coordinates never reach the rasterizer.
fn fill_polygon(canvas: &mut GrayImage, polygon: &[Point]) {
    let points = normalize(polygon);
    let bounds = ClipBounds::around(canvas);

    if points.iter().all(|p| bounds.contains(p)) {
        draw_outline(canvas, &points);
        return;
    }

    let clipped = match points.len() {
        0 | 1 => return,
        2 => bounds.clip_segment(&points[0], &points[1]),
        _ => bounds.clip_ring(&points),
    };
    let clipped: Vec<Point> = clipped
        .into_iter()
        .map(|(x, y)| Point::new(x.round() as i32, y.round() as i32))
        .collect();
    draw_outline(canvas, &normalize(&clipped));
}

fn draw_outline(canvas: &mut GrayImage, points: &[Point]) {
    let color = Luma([FOREGROUND]);

    match points {
        [] => {}
        [p] => {
            if p.x >= 0 && p.y >= 0 && (p.x as u32) < canvas.width() && (p.y as u32) < canvas.height()
            {
                canvas.put_pixel(p.x as u32, p.y as u32, color);
            }
        }
        [a, b] => {
            draw_line_segment_mut(
                canvas,
                (a.x as f32, a.y as f32),
                (b.x as f32, b.y as f32),
                color,
            );
        }
        _ => {
            let poly: Vec<CanvasPoint<i32>> = points
                .iter()
                .map(|p| CanvasPoint::new(p.x, p.y))
                .collect();
            draw_polygon_mut(canvas, &poly, color);
        }
    }
}

type Vertex = (f64, f64);

/// Canvas rectangle grown by one pixel on every side.
struct ClipBounds {
    min: f64,
    max_x: f64,
    max_y: f64,
}

#[derive(Clone, Copy)]
enum ClipEdge {
    Left,
    Right,
    Top,
    Bottom,
}

impl ClipBounds {
    const EDGES: [ClipEdge; 4] = [ClipEdge::Left, ClipEdge::Right, ClipEdge::Top, ClipEdge::Bottom];

    fn around(canvas: &GrayImage) -> Self {
        Self {
            min: -1.0,
            max_x: f64::from(canvas.width()) + 1.0,
            max_y: f64::from(canvas.height()) + 1.0,
        }
    }

    fn contains(&self, p: &Point) -> bool {
        self.inside(vertex(p), ClipEdge::Left)
            && self.inside(vertex(p), ClipEdge::Right)
            && self.inside(vertex(p), ClipEdge::Top)
            && self.inside(vertex(p), ClipEdge::Bottom)
    }

    fn inside(&self, (x, y): Vertex, edge: ClipEdge) -> bool {
        match edge {
            ClipEdge::Left => x >= self.min,
            ClipEdge::Right => x <= self.max_x,
            ClipEdge::Top => y >= self.min,
            ClipEdge::Bottom => y <= self.max_y,
        }
    }

    /// Point where segment `a`-`b` crosses `edge`; the endpoints must lie on
    /// opposite sides of it.
    fn crossing(&self, a: Vertex, b: Vertex, edge: ClipEdge) -> Vertex {
        let vertical = |limit: f64| {
            let t = (limit - a.0) / (b.0 - a.0);
            (limit, a.1 + t * (b.1 - a.1))
        };
        let horizontal = |limit: f64| {
            let t = (limit - a.1) / (b.1 - a.1);
            (a.0 + t * (b.0 - a.0), limit)
        };
        match edge {
            ClipEdge::Left => vertical(self.min),
            ClipEdge::Right => vertical(self.max_x),
            ClipEdge::Top => horizontal(self.min),
            ClipEdge::Bottom => horizontal(self.max_y),
        }
    }

    /// Sutherland-Hodgman clipping of a closed outline.
    fn clip_ring(&self, points: &[Point]) -> Vec<Vertex> {
        let mut ring: Vec<Vertex> = points.iter().map(vertex).collect();

        for edge in Self::EDGES {
            if ring.is_empty() {
                break;
            }
            let mut out = Vec::with_capacity(ring.len() + 1);
            for (i, &current) in ring.iter().enumerate() {
                let previous = ring[(i + ring.len() - 1) % ring.len()];
                match (self.inside(previous, edge), self.inside(current, edge)) {
                    (true, true) => out.push(current),
                    (true, false) => out.push(self.crossing(previous, current, edge)),
                    (false, true) => {
                        out.push(self.crossing(previous, current, edge));
                        out.push(current);
                    }
                    (false, false) => {}
                }
            }
            ring = out;
        }

        ring
    }

    fn clip_segment(&self, a: &Point, b: &Point) -> Vec<Vertex> {
        let (mut a, mut b) = (vertex(a), vertex(b));

        for edge in Self::EDGES {
            match (self.inside(a, edge), self.inside(b, edge)) {
                (true, true) => {}
                (false, false) => return Vec::new(),
                (true, false) => b = self.crossing(a, b, edge),
                (false, true) => a = self.crossing(a, b, edge),
            }
        }

        vec![a, b]
    }
}

fn vertex(p: &Point) -> Vertex {
    (f64::from(p.x), f64::from(p.y))
}
