//! Edge-function triangle rasterization with depth testing.
//!
//! Scan conversion tests every pixel center in the triangle's clipped
//! bounding box against three edge functions. For an edge from A to B the
//! edge function at P is
//!
//! ```text
//! E(P) = (B.x - A.x) * (P.y - A.y) - (B.y - A.y) * (P.x - A.x)
//! ```
//!
//! the 2D cross product (B - A) × (P - A). Its sign tells which side of the
//! edge P lies on, and the three values are proportional to the barycentric
//! coordinates used for interpolation.
//!
//! # Shared-edge tie-break
//!
//! Pixel centers that land exactly on an edge get weight zero there. To keep
//! two triangles sharing that edge from either both writing the pixel or
//! both skipping it, a zero-weight pixel is covered only when its edge is a
//! *top* edge (horizontal, pointing +x) or a *left* edge (pointing -y),
//! evaluated after the winding has been normalized to positive area. Each
//! physical edge is a top/left edge in exactly one of the two triangles.
//!
//! # Perspective correction
//!
//! Screen-space barycentric weights are linear in screen space, but vertex
//! attributes vary linearly in *view* space. Each attribute is therefore
//! weighted by its vertex's 1/w and renormalized by the interpolated 1/w;
//! depth is the view-space w reconstructed from that same interpolation.
//!
//! # References
//!
//! - Juan Pineda, "A Parallel Algorithm for Polygon Rasterization" (1988)
//! - Scratchapixel: <https://www.scratchapixel.com/lessons/3d-basic-rendering/rasterization-practical-implementation>

use super::framebuffer::FrameBuffer;
use crate::math::{Vec2, Vec3};

/// Triangles with less screen area than this are skipped as degenerate.
const DEGENERATE_AREA: f32 = 1e-6;

/// One triangle corner after the viewport transform.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScreenVertex {
    /// Pixel-space position (x right, y down).
    pub screen: Vec2,
    /// Reciprocal of the clip-space w (view-space depth). Positive for
    /// anything in front of the eye.
    pub inv_w: f32,
    /// World-space position, for lighting.
    pub world: Vec3,
    pub normal: Vec3,
    pub texcoord: Vec2,
}

/// Interpolated values handed to the shading callback for one covered,
/// depth-passing pixel.
#[derive(Clone, Copy, Debug)]
pub struct Fragment {
    /// World-space position.
    pub position: Vec3,
    /// Interpolated unit normal.
    pub normal: Vec3,
    pub texcoord: Vec2,
    /// View-space depth that won the depth test.
    pub depth: f32,
}

/// Owns the framebuffer and scan-converts triangles into it.
pub struct Rasterizer {
    framebuffer: FrameBuffer,
}

impl Rasterizer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            framebuffer: FrameBuffer::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.framebuffer.width()
    }

    pub fn height(&self) -> u32 {
        self.framebuffer.height()
    }

    /// Fills the color buffer with `color` and resets the depth buffer.
    pub fn clear(&mut self, color: Vec3) {
        self.framebuffer.clear(color);
    }

    /// Read-only view of the rendered colors (row-major RGB f32).
    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.framebuffer
    }

    /// Rasterizes one screen-space triangle.
    ///
    /// `shade` runs once per covered pixel that passes the depth test, and
    /// its result is written to the framebuffer along with the fragment's
    /// depth. The depth test is strict less-than: the nearest fragment wins
    /// regardless of submission order, and an exact tie keeps the pixel
    /// already written (first writer wins).
    ///
    /// Degenerate (near-zero area) triangles are skipped silently; pixels
    /// outside the framebuffer are never visited.
    pub fn rasterize_triangle<F>(&mut self, vertices: &[ScreenVertex; 3], mut shade: F)
    where
        F: FnMut(&Fragment) -> Vec3,
    {
        let [v0, mut v1, mut v2] = *vertices;

        let mut area = edge_function(v0.screen, v1.screen, v2.screen);
        if area.abs() < DEGENERATE_AREA {
            return;
        }
        // Normalize the winding so all interior edge values are positive;
        // the tie-break rule below assumes it.
        if area < 0.0 {
            std::mem::swap(&mut v1, &mut v2);
            area = -area;
        }
        let inv_area = 1.0 / area;

        // Bounding box clipped to the framebuffer. An empty intersection
        // produces an empty pixel range and we fall straight through.
        let min_x = v0.screen.x.min(v1.screen.x).min(v2.screen.x).floor().max(0.0) as i64;
        let max_x = (v0.screen.x.max(v1.screen.x).max(v2.screen.x).ceil() as i64)
            .min(self.framebuffer.width() as i64 - 1);
        let min_y = v0.screen.y.min(v1.screen.y).min(v2.screen.y).floor().max(0.0) as i64;
        let max_y = (v0.screen.y.max(v1.screen.y).max(v2.screen.y).ceil() as i64)
            .min(self.framebuffer.height() as i64 - 1);

        // Edge i is the one opposite vertex i, so its value is proportional
        // to that vertex's barycentric weight.
        let tie0 = is_top_left(v1.screen, v2.screen);
        let tie1 = is_top_left(v2.screen, v0.screen);
        let tie2 = is_top_left(v0.screen, v1.screen);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                // Sample at the pixel center.
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);

                let w0 = edge_function(v1.screen, v2.screen, p);
                let w1 = edge_function(v2.screen, v0.screen, p);
                let w2 = edge_function(v0.screen, v1.screen, p);

                let covered = (w0 > 0.0 || (w0 == 0.0 && tie0))
                    && (w1 > 0.0 || (w1 == 0.0 && tie1))
                    && (w2 > 0.0 || (w2 == 0.0 && tie2));
                if !covered {
                    continue;
                }

                let l0 = w0 * inv_area;
                let l1 = w1 * inv_area;
                let l2 = w2 * inv_area;

                // 1/w interpolates linearly in screen space.
                let inv_w = l0 * v0.inv_w + l1 * v1.inv_w + l2 * v2.inv_w;
                let depth = 1.0 / inv_w;

                let (x, y) = (x as u32, y as u32);
                if depth >= self.framebuffer.depth_at(x, y) {
                    continue;
                }

                // Perspective-correct weights for the vertex attributes.
                let p0 = l0 * v0.inv_w * depth;
                let p1 = l1 * v1.inv_w * depth;
                let p2 = l2 * v2.inv_w * depth;

                let fragment = Fragment {
                    position: v0.world * p0 + v1.world * p1 + v2.world * p2,
                    normal: (v0.normal * p0 + v1.normal * p1 + v2.normal * p2).normalize(),
                    texcoord: Vec2::new(
                        p0 * v0.texcoord.x + p1 * v1.texcoord.x + p2 * v2.texcoord.x,
                        p0 * v0.texcoord.y + p1 * v1.texcoord.y + p2 * v2.texcoord.y,
                    ),
                    depth,
                };

                let color = shade(&fragment);
                self.framebuffer.write(x, y, depth, color);
            }
        }
    }
}

/// Signed parallelogram area of (b - a) × (p - a).
///
/// With y growing downward, interior points of a clockwise-on-screen
/// triangle give positive values for all three edges.
#[inline]
fn edge_function(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Tie-break classification for the edge a→b of a positive-area triangle.
#[inline]
fn is_top_left(a: Vec2, b: Vec2) -> bool {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dy == 0.0 && dx > 0.0) || dy < 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const WHITE: Vec3 = Vec3::ONE;

    fn flat(screen: Vec2) -> ScreenVertex {
        ScreenVertex {
            screen,
            inv_w: 1.0,
            ..Default::default()
        }
    }

    fn vertex_at_depth(screen: Vec2, depth: f32) -> ScreenVertex {
        ScreenVertex {
            screen,
            inv_w: 1.0 / depth,
            ..Default::default()
        }
    }

    #[test]
    fn offscreen_triangle_writes_nothing() {
        let mut raster = Rasterizer::new(16, 16);
        raster.clear(Vec3::ZERO);

        let mut shaded = 0;
        raster.rasterize_triangle(
            &[
                flat(Vec2::new(100.0, 100.0)),
                flat(Vec2::new(120.0, 100.0)),
                flat(Vec2::new(110.0, 120.0)),
            ],
            |_| {
                shaded += 1;
                WHITE
            },
        );

        assert_eq!(shaded, 0);
        for y in 0..16 {
            for x in 0..16 {
                assert_eq!(raster.framebuffer().color_at(x, y), Vec3::ZERO);
            }
        }
    }

    #[test]
    fn degenerate_triangle_is_skipped() {
        let mut raster = Rasterizer::new(16, 16);
        let mut shaded = 0;
        // All three vertices on one line: zero signed area.
        raster.rasterize_triangle(
            &[
                flat(Vec2::new(1.0, 1.0)),
                flat(Vec2::new(8.0, 8.0)),
                flat(Vec2::new(4.0, 4.0)),
            ],
            |_| {
                shaded += 1;
                WHITE
            },
        );
        assert_eq!(shaded, 0);
    }

    #[test]
    fn split_quad_covers_each_pixel_once() {
        // A screen-space quad split along its diagonal: together the two
        // halves must cover every interior pixel exactly once, with no seam
        // on the shared edge.
        let mut raster = Rasterizer::new(32, 32);
        raster.clear(Vec3::ZERO);

        let mut counts = [[0u32; 32]; 32];
        let (a, b, c, d) = (
            Vec2::new(10.0, 10.0),
            Vec2::new(20.0, 10.0),
            Vec2::new(20.0, 20.0),
            Vec2::new(10.0, 20.0),
        );

        // Carry the screen position through the world slot: under flat depth
        // it interpolates to the pixel center, telling the closure which
        // pixel it was invoked for. The second triangle sits nearer than the
        // first so the depth test cannot hide an overlap on the shared edge.
        let tag = |screen: Vec2, depth: f32| ScreenVertex {
            screen,
            inv_w: 1.0 / depth,
            world: Vec3::new(screen.x, screen.y, 0.0),
            ..Default::default()
        };
        for (tri, depth) in [([a, b, c], 2.0), ([a, c, d], 1.0)] {
            raster.rasterize_triangle(
                &[tag(tri[0], depth), tag(tri[1], depth), tag(tri[2], depth)],
                |frag| {
                    counts[frag.position.y as usize][frag.position.x as usize] += 1;
                    WHITE
                },
            );
        }

        let mut total = 0;
        for (y, row) in counts.iter().enumerate() {
            for (x, &count) in row.iter().enumerate() {
                let inside = (10..20).contains(&x) && (10..20).contains(&y);
                assert_eq!(
                    count,
                    u32::from(inside),
                    "pixel ({x}, {y}) written {count} times"
                );
                total += count;
            }
        }
        assert_eq!(total, 100);
    }

    #[test]
    fn nearer_fragment_wins_regardless_of_order() {
        let tri = [
            Vec2::new(0.0, 0.0),
            Vec2::new(16.0, 0.0),
            Vec2::new(0.0, 16.0),
        ];
        let at_depth = |d: f32| {
            [
                vertex_at_depth(tri[0], d),
                vertex_at_depth(tri[1], d),
                vertex_at_depth(tri[2], d),
            ]
        };
        let red = Vec3::new(1.0, 0.0, 0.0);
        let blue = Vec3::new(0.0, 0.0, 1.0);

        // Far then near: near overwrites.
        let mut raster = Rasterizer::new(16, 16);
        raster.clear(Vec3::ZERO);
        raster.rasterize_triangle(&at_depth(5.0), |_| red);
        raster.rasterize_triangle(&at_depth(2.0), |_| blue);
        assert_eq!(raster.framebuffer().color_at(4, 4), blue);

        // Near then far: far is rejected and must not even be shaded.
        let mut raster = Rasterizer::new(16, 16);
        raster.clear(Vec3::ZERO);
        raster.rasterize_triangle(&at_depth(2.0), |_| blue);
        let mut far_shaded = 0;
        raster.rasterize_triangle(&at_depth(5.0), |_| {
            far_shaded += 1;
            red
        });
        assert_eq!(far_shaded, 0);
        assert_eq!(raster.framebuffer().color_at(4, 4), blue);
    }

    #[test]
    fn exact_depth_tie_keeps_first_writer() {
        let tri = [
            Vec2::new(0.0, 0.0),
            Vec2::new(16.0, 0.0),
            Vec2::new(0.0, 16.0),
        ];
        let verts = [
            vertex_at_depth(tri[0], 3.0),
            vertex_at_depth(tri[1], 3.0),
            vertex_at_depth(tri[2], 3.0),
        ];
        let red = Vec3::new(1.0, 0.0, 0.0);

        let mut raster = Rasterizer::new(16, 16);
        raster.clear(Vec3::ZERO);
        raster.rasterize_triangle(&verts, |_| red);
        raster.rasterize_triangle(&verts, |_| WHITE);
        assert_eq!(raster.framebuffer().color_at(4, 4), red);
    }

    #[test]
    fn interpolation_is_perspective_correct() {
        // v1 sits four times farther than v0/v2; at pixel (3, 0) the
        // screen-linear weight of v1 is 0.4375, but weighting by 1/w drags
        // the texcoord toward the near vertices: u = (0.4375 * 0.25) / 0.671875.
        let verts = [
            ScreenVertex {
                screen: Vec2::new(0.0, 0.0),
                inv_w: 1.0,
                texcoord: Vec2::new(0.0, 0.0),
                ..Default::default()
            },
            ScreenVertex {
                screen: Vec2::new(8.0, 0.0),
                inv_w: 0.25,
                texcoord: Vec2::new(1.0, 0.0),
                ..Default::default()
            },
            ScreenVertex {
                screen: Vec2::new(0.0, 8.0),
                inv_w: 1.0,
                texcoord: Vec2::new(0.0, 1.0),
                ..Default::default()
            },
        ];

        // Every fragment in column x = 3 shares inv_w = 0.671875 and the
        // same corrected u; grab one by its reconstructed depth.
        let mut at_pixel = None;
        let mut raster = Rasterizer::new(16, 16);
        raster.clear(Vec3::ZERO);
        raster.rasterize_triangle(&verts, |frag| {
            if (frag.depth - 1.0 / 0.671875).abs() < 1e-4 {
                at_pixel = Some(*frag);
            }
            WHITE
        });
        let frag = at_pixel.expect("column x = 3 should be covered");
        assert_relative_eq!(frag.texcoord.x, 0.109375 / 0.671875, epsilon = 1e-5);
        assert!(frag.texcoord.x < 0.4375); // strictly nearer than screen-linear
    }
}
