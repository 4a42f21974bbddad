use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use raster_core::buffer::{ColorLayout, ColorView, DepthView, RenderTarget};
use raster_core::graphics::{Rgb, FAR_DEPTH};
use raster_core::raster::{draw_triangle, fill_background, Triangle, Vertex};

const W: usize = 24;
const H: usize = 18;

/// Owned packed-RGB colour plus row-major depth
struct Canvas {
    pixels: Vec<u8>,
    depth: Vec<f32>,
}

impl Canvas {
    fn new(background: Rgb) -> Self {
        let mut canvas = Self {
            pixels: vec![0; W * H * 3],
            depth: vec![FAR_DEPTH; W * H],
        };
        fill_background(&mut canvas.target(), background);
        canvas
    }

    fn target(&mut self) -> RenderTarget<'_> {
        RenderTarget::new(
            ColorView::packed_rgb(&mut self.pixels, W, H).unwrap(),
            DepthView::packed(&mut self.depth, W, H).unwrap(),
        )
        .unwrap()
    }

    fn draw(&mut self, tri: &Triangle) -> usize {
        draw_triangle(&mut self.target(), tri)
    }

    fn pixel(&self, x: usize, y: usize) -> Rgb {
        let o = (y * W + x) * 3;
        Rgb::new(self.pixels[o], self.pixels[o + 1], self.pixels[o + 2])
    }

    fn depth_at(&self, x: usize, y: usize) -> f32 {
        self.depth[y * W + x]
    }
}

fn flat(a: (f32, f32), b: (f32, f32), c: (f32, f32), z: f32, color: Rgb) -> Triangle {
    Triangle::new(
        Vertex::new(a.0, a.1, z),
        Vertex::new(b.0, b.1, z),
        Vertex::new(c.0, c.1, z),
        color,
    )
}

fn random_scene(rng: &mut StdRng, count: usize) -> Vec<Triangle> {
    // Coordinates reach past the viewport on every side; each triangle gets
    // its own constant depth so the nearest one at any pixel is unambiguous
    (0..count)
        .map(|i| {
            let mut v = || {
                (
                    rng.gen_range(-8.0..W as f32 + 8.0),
                    rng.gen_range(-8.0..H as f32 + 8.0),
                )
            };
            let (a, b, c) = (v(), v(), v());
            let color = Rgb::new(rng.gen(), rng.gen(), rng.gen());
            flat(a, b, c, i as f32 + 0.5, color)
        })
        .collect()
}

#[test]
fn test_draw_order_does_not_matter_for_distinct_depths() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut scene = random_scene(&mut rng, 40);

    let mut reference = Canvas::new(Rgb::BLACK);
    for tri in &scene {
        reference.draw(tri);
    }

    for _ in 0..5 {
        scene.shuffle(&mut rng);
        let mut shuffled = Canvas::new(Rgb::BLACK);
        for tri in &scene {
            shuffled.draw(tri);
        }
        assert_eq!(shuffled.pixels, reference.pixels);
        assert_eq!(shuffled.depth, reference.depth);
    }
}

#[test]
fn test_right_triangle_coverage() {
    let mut canvas = Canvas::new(Rgb::BLACK);
    let tri = flat((0.0, 0.0), (10.0, 0.0), (0.0, 10.0), 1.0, Rgb::RED);
    assert!(canvas.draw(&tri) > 0);

    assert_eq!(canvas.pixel(2, 2), Rgb::RED);
    assert_eq!(canvas.depth_at(2, 2), 1.0);

    // Beyond the hypotenuse
    assert_eq!(canvas.pixel(9, 9), Rgb::BLACK);
    assert_eq!(canvas.depth_at(9, 9), FAR_DEPTH);
}

#[test]
fn test_nearer_triangle_wins_and_ties_keep_first() {
    let mut canvas = Canvas::new(Rgb::BLACK);
    let near = flat((0.0, 0.0), (12.0, 0.0), (0.0, 12.0), 1.0, Rgb::RED);
    let far = flat((0.0, 0.0), (12.0, 0.0), (0.0, 12.0), 2.0, Rgb::GREEN);
    let tie = flat((0.0, 0.0), (12.0, 0.0), (0.0, 12.0), 1.0, Rgb::BLUE);

    let covered = canvas.draw(&near);
    assert!(covered > 0);
    assert_eq!(canvas.draw(&far), 0);
    assert_eq!(canvas.draw(&tie), 0);
    assert_eq!(canvas.pixel(3, 3), Rgb::RED);

    // Drawn the other way round the nearer one still ends on top
    let mut canvas = Canvas::new(Rgb::BLACK);
    canvas.draw(&far);
    assert_eq!(canvas.draw(&near), covered);
    assert_eq!(canvas.pixel(3, 3), Rgb::RED);
    assert_eq!(canvas.depth_at(3, 3), 1.0);
}

#[test]
fn test_huge_triangle_stays_inside_padded_surface() {
    // 3 bytes per pixel plus 5 padding bytes per row, and a guard tail
    let row = W * 3 + 5;
    let mut pixels = vec![0xAAu8; row * H + 16];
    let mut depth = vec![FAR_DEPTH; W * H];
    let written = {
        let color = ColorView::new(&mut pixels, W, H, ColorLayout::padded(3, row)).unwrap();
        let depth = DepthView::packed(&mut depth, W, H).unwrap();
        let mut target = RenderTarget::new(color, depth).unwrap();
        let tri = flat((-500.0, -500.0), (900.0, -500.0), (-500.0, 900.0), 0.0, Rgb::WHITE);
        draw_triangle(&mut target, &tri)
    };

    assert_eq!(written, W * H);
    for y in 0..H {
        let line = &pixels[y * row..(y + 1) * row];
        assert!(line[..W * 3].iter().all(|&b| b == 0xFF));
        assert!(line[W * 3..].iter().all(|&b| b == 0xAA), "padding in row {y}");
    }
    assert!(pixels[row * H..].iter().all(|&b| b == 0xAA));
    assert!(depth.iter().all(|&d| d == 0.0));
}

#[test]
fn test_degenerate_and_offscreen_triangles_are_noops() {
    let mut canvas = Canvas::new(Rgb::PURPLE);
    let before = (canvas.pixels.clone(), canvas.depth.clone());

    let collinear = flat((1.0, 1.0), (5.0, 5.0), (9.0, 9.0), 0.0, Rgb::RED);
    let repeated = flat((4.0, 4.0), (4.0, 4.0), (10.0, 2.0), 0.0, Rgb::RED);
    let left = flat((-30.0, 0.0), (-10.0, 0.0), (-20.0, 10.0), 0.0, Rgb::RED);
    let below = flat((0.0, 40.0), (10.0, 40.0), (5.0, 60.0), 0.0, Rgb::RED);

    for tri in [collinear, repeated, left, below] {
        assert_eq!(canvas.draw(&tri), 0);
    }
    assert_eq!((canvas.pixels, canvas.depth), before);
}

#[test]
fn test_background_fill_is_idempotent_and_ignores_depth() {
    let mut canvas = Canvas::new(Rgb::BLACK);
    canvas.draw(&flat((0.0, 0.0), (12.0, 0.0), (0.0, 12.0), 3.0, Rgb::RED));
    let depth = canvas.depth.clone();

    fill_background(&mut canvas.target(), Rgb::YELLOW);
    let once = canvas.pixels.clone();
    fill_background(&mut canvas.target(), Rgb::YELLOW);

    assert_eq!(canvas.pixels, once);
    assert!(canvas.pixels.chunks(3).all(|px| px == [255, 255, 0]));
    assert_eq!(canvas.depth, depth);
}

#[test]
fn test_vertex_coordinates_truncate() {
    let mut exact = Canvas::new(Rgb::BLACK);
    let mut fractional = Canvas::new(Rgb::BLACK);

    let a = Triangle::new(
        Vertex::new(2.0, 2.0, 1.0),
        Vertex::new(17.0, 3.0, 4.0),
        Vertex::new(5.0, 15.0, 2.0),
        Rgb::GREEN,
    );
    let b = Triangle::new(
        Vertex::new(2.9, 2.9, 1.0),
        Vertex::new(17.5, 3.99, 4.0),
        Vertex::new(5.1, 15.7, 2.0),
        Rgb::GREEN,
    );

    assert_eq!(exact.draw(&a), fractional.draw(&b));
    assert_eq!(exact.pixels, fractional.pixels);
    assert_eq!(exact.depth, fractional.depth);
}
