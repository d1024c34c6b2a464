extern crate gloss;
extern crate rand;

use gloss::errors::Error;
use gloss::viewport::*;
use rand::Rng;

#[test]
fn tiled() {
    let switcher = ViewportSwitcher::tiled(0, 0, 100, 50, 4, true);
    assert_eq!(switcher.len(), 4);

    let xs: Vec<_> = switcher.iter().map(|v| v.x).collect();
    assert_eq!(xs, vec![0, 100, 200, 300]);
    assert!(switcher.iter().all(|v| v.y == 0 && v.width == 100 && v.height == 50));

    match switcher.get(4) {
        Err(Error::OutOfBounds) => {}
        _ => panic!(),
    }

    let switcher = ViewportSwitcher::tiled(10, 20, 100, 50, 3, false);
    assert_eq!(*switcher.get(2).unwrap(), Viewport::new(10, 120, 100, 50));
}

#[test]
fn tiled_random() {
    let mut rng = rand::thread_rng();
    for _ in 0..64 {
        let x = rng.gen_range(-500..500);
        let y = rng.gen_range(-500..500);
        let w = rng.gen_range(1..512);
        let h = rng.gen_range(1..512);
        let n = rng.gen_range(0..16);
        let horizontal = rng.gen::<bool>();

        let switcher = ViewportSwitcher::tiled(x, y, w, h, n, horizontal);
        assert_eq!(switcher.len(), n);

        for (i, v) in switcher.iter().enumerate() {
            let i = i as i32;
            if horizontal {
                assert_eq!(*v, Viewport::new(x + i * w, y, w, h));
            } else {
                assert_eq!(*v, Viewport::new(x, y + i * h, w, h));
            }
        }
    }
}

#[test]
fn push() {
    let mut switcher = ViewportSwitcher::default();
    assert!(switcher.is_empty());
    assert!(!switcher.switch_to(0));

    switcher.push(1, 2, 3, 4);
    assert_eq!(switcher.len(), 1);
    assert_eq!(*switcher.get(0).unwrap(), Viewport::new(1, 2, 3, 4));

    let switcher = ViewportSwitcher::new(640, 480, 2, true);
    assert_eq!(*switcher.get(1).unwrap(), Viewport::new(640, 0, 640, 480));
}

#[test]
fn fit_non_fullscreen() {
    // Wide image into a 4:3 viewport is letterboxed vertically.
    let v = compute_viewport_by_match_image(800, 600, 1600, 900, ViewportMatchMode::NonFullscreen);
    assert_eq!(v, Viewport::new(0, 75, 800, 450));

    // Tall image is pillarboxed.
    let v = compute_viewport_by_match_image(800, 600, 300, 600, ViewportMatchMode::NonFullscreen);
    assert_eq!(v, Viewport::new(250, 0, 300, 600));
}

#[test]
fn fit_fullscreen() {
    let v = compute_viewport_by_match_image(800, 600, 1600, 900, ViewportMatchMode::Fullscreen);
    assert_eq!(v, Viewport::new(-133, 0, 1066, 600));

    let v = compute_viewport_by_match_image(800, 600, 300, 600, ViewportMatchMode::Fullscreen);
    assert_eq!(v, Viewport::new(0, -500, 800, 1600));
}

#[test]
fn fit_same_ratio() {
    for &mode in &[ViewportMatchMode::NonFullscreen, ViewportMatchMode::Fullscreen] {
        let v = compute_viewport_by_match_image(800, 600, 400, 300, mode);
        assert_eq!(v, Viewport::new(0, 0, 800, 600));
    }
}

#[test]
fn fit_empty_image() {
    let v = compute_viewport_by_match_image(800, 600, 0, 300, ViewportMatchMode::Fullscreen);
    assert_eq!(v, Viewport::new(0, 0, 800, 600));

    let v = compute_viewport_by_match_image(800, 600, 300, 0, ViewportMatchMode::NonFullscreen);
    assert_eq!(v, Viewport::new(0, 0, 800, 600));
}
