use image::{GrayImage, Rgba, RgbaImage};

use gold_locator::annotate::SEARCH_AREA_COLOR;
use gold_locator::{
    to_gray, GoldMineralLocator, ImageprocKernel, LocatorConfig, LocatorSession, Point, Rect, Zone,
};

const GOLD: Rgba<u8> = Rgba([255, 200, 0, 255]);
const FIELD_GRAY: Rgba<u8> = Rgba([128, 128, 128, 255]);
const SILVER: Rgba<u8> = Rgba([210, 210, 215, 255]);

/// Middle band of an 864x480 frame: full width, 30% to 70% of the height.
fn band() -> Rect {
    Rect::from_fractions(864, 480, (0.0, 0.3), (1.0, 0.7))
}

fn open_session() -> LocatorSession<ImageprocKernel> {
    GoldMineralLocator::new(LocatorConfig::default())
        .with_search_area(band())
        .open(ImageprocKernel::new())
        .expect("open locator session")
}

/// Gray field with gold filled over `gold` rects.
fn frame(gold: &[Rect]) -> (RgbaImage, GrayImage) {
    let color = RgbaImage::from_fn(864, 480, |x, y| {
        let p = Point::new(x as i32, y as i32);
        if gold.iter().any(|g| g.contains(p)) {
            GOLD
        } else {
            FIELD_GRAY
        }
    });
    let gray = to_gray(&color);
    (color, gray)
}

#[test]
fn band_matches_fractional_corners() {
    assert_eq!(band(), Rect::new(0, 143, 863, 192));
}

#[test]
fn blob_at_left_edge_is_left() {
    let mut session = open_session();
    let (color, gray) = frame(&[Rect::new(10, 200, 61, 51)]);

    assert!(session.locate(&color, &gray).expect("locate"));
    assert_eq!(session.current_zone(), Zone::Left);
    assert_eq!(session.current_bounding_box(), Some(Rect::new(10, 200, 61, 51)));
    assert_eq!(session.current_contour_area(), 3000.0);
    assert!(session.candidates().is_empty());
    assert_eq!(session.last_known_zone(), Zone::Left);
}

#[test]
fn gray_frame_detects_nothing_and_keeps_memory() {
    let mut session = open_session();
    let (color, gray) = frame(&[Rect::new(700, 200, 61, 51)]);
    assert!(session.locate(&color, &gray).unwrap());
    assert_eq!(session.current_zone(), Zone::Right);

    let (color, gray) = frame(&[]);
    for _ in 0..3 {
        assert!(!session.locate(&color, &gray).unwrap());
        assert_eq!(session.current_zone(), Zone::Unknown);
        assert_eq!(session.current_bounding_box(), None);
        assert_eq!(session.current_contour_area(), 0.0);
        assert!(session.candidates().is_empty());
        assert!(session.mask().pixels().all(|p| p[0] == 0));
    }
    assert_eq!(session.last_known_zone(), Zone::Right);
    assert_eq!(
        session.last_known_bounding_box(),
        Some(Rect::new(700, 200, 61, 51))
    );
    assert_eq!(session.last_known_contour_area(), 3000.0);
}

#[test]
fn blob_in_middle_is_center() {
    let mut session = open_session();
    let (color, gray) = frame(&[Rect::new(400, 220, 61, 51)]);
    assert!(session.locate(&color, &gray).unwrap());
    assert_eq!(session.current_zone(), Zone::Center);
}

#[test]
fn gold_outside_search_area_is_ignored() {
    let mut session = open_session();
    let (color, gray) = frame(&[Rect::new(400, 20, 80, 80), Rect::new(400, 380, 80, 80)]);
    assert!(!session.locate(&color, &gray).unwrap());
    assert_eq!(session.current_zone(), Zone::Unknown);
    assert!(session.candidates().is_empty());
    assert!(session.mask().pixels().all(|p| p[0] == 0));
}

#[test]
fn small_blob_is_below_selection_floor() {
    let mut session = open_session();
    // 30x30 traces to a 29x29 polygon, far under 2000.
    let (color, gray) = frame(&[Rect::new(400, 220, 30, 30)]);
    assert!(!session.locate(&color, &gray).unwrap());
    assert_eq!(session.current_detection(), None);
    assert!(session.candidates().is_empty());
}

#[test]
fn disjoint_sizable_blobs_become_candidates() {
    let mut session = open_session();
    let (color, gray) = frame(&[
        Rect::new(100, 200, 61, 51),
        Rect::new(700, 200, 40, 40),
        Rect::new(500, 200, 20, 20),
    ]);
    assert!(session.locate(&color, &gray).unwrap());
    assert_eq!(session.current_zone(), Zone::Left);
    assert_eq!(session.current_bounding_box(), Some(Rect::new(100, 200, 61, 51)));
    // The 20x20 blob's box (400) is under the 1000 candidate floor.
    assert_eq!(session.candidates(), &[Rect::new(700, 200, 40, 40)]);
}

#[test]
fn blobs_nested_in_the_detection_are_not_candidates() {
    let mut session = open_session();
    let ring = Rect::new(300, 150, 101, 101);
    let hole = Rect::new(310, 160, 81, 81);
    let inner = Rect::new(330, 180, 40, 40);
    let color = RgbaImage::from_fn(864, 480, |x, y| {
        let p = Point::new(x as i32, y as i32);
        if inner.contains(p) || (ring.contains(p) && !hole.contains(p)) {
            GOLD
        } else {
            FIELD_GRAY
        }
    });
    let gray = to_gray(&color);

    assert!(session.locate(&color, &gray).unwrap());
    assert_eq!(session.current_bounding_box(), Some(ring));
    assert_eq!(session.current_contour_area(), 10000.0);
    assert_eq!(session.current_zone(), Zone::Center);
    assert!(session.candidates().is_empty());
}

#[test]
fn locating_twice_is_idempotent() {
    let mut session = open_session();
    let (color, gray) = frame(&[Rect::new(100, 200, 61, 51), Rect::new(700, 200, 40, 40)]);

    session.locate(&color, &gray).unwrap();
    let first = (
        session.current_detection().copied(),
        session.candidates().to_vec(),
        session.mask().clone(),
        session.annotated_image().cloned(),
    );
    session.locate(&color, &gray).unwrap();
    let second = (
        session.current_detection().copied(),
        session.candidates().to_vec(),
        session.mask().clone(),
        session.annotated_image().cloned(),
    );
    assert_eq!(first, second);
}

#[test]
fn silver_minerals_do_not_match() {
    let mut session = open_session();
    let color = RgbaImage::from_fn(864, 480, |x, y| {
        if Rect::new(400, 200, 80, 80).contains(Point::new(x as i32, y as i32)) {
            SILVER
        } else {
            FIELD_GRAY
        }
    });
    let gray = to_gray(&color);
    assert!(!session.locate(&color, &gray).unwrap());
}

#[test]
fn annotated_image_shows_gold_over_gray() {
    let mut session = open_session();
    let (color, gray) = frame(&[Rect::new(100, 200, 61, 51)]);
    session.locate(&color, &gray).unwrap();

    let annotated = session.annotated_image().expect("annotation enabled");
    assert_eq!(*annotated.get_pixel(130, 225), GOLD);
    assert_eq!(*annotated.get_pixel(600, 300), Rgba([128, 128, 128, 255]));
    assert_eq!(*annotated.get_pixel(600, 143), SEARCH_AREA_COLOR);

    let texts: Vec<&str> = session.labels().iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["LEFT", "130, 225", "3000 / 3111"]);
}

#[test]
fn moving_the_search_area_changes_the_zone() {
    let mut session = open_session();
    let (color, gray) = frame(&[Rect::new(400, 220, 61, 51)]);
    assert!(session.locate(&color, &gray).unwrap());
    assert_eq!(session.current_zone(), Zone::Center);

    session.set_search_area(Rect::new(380, 143, 483, 192)).unwrap();
    assert!(session.locate(&color, &gray).unwrap());
    assert_eq!(session.current_zone(), Zone::Left);
}

#[test]
fn blob_touching_frame_edge_is_found() {
    let mut session = open_session();
    let (color, gray) = frame(&[Rect::new(0, 200, 61, 51)]);
    assert!(session.locate(&color, &gray).unwrap());
    assert_eq!(session.current_zone(), Zone::Left);
    assert_eq!(session.current_bounding_box(), Some(Rect::new(0, 200, 61, 51)));
    assert_eq!(session.current_contour_area(), 3000.0);
}

#[test]
fn region_spanning_full_width_is_found() {
    let mut session = GoldMineralLocator::new(LocatorConfig::default())
        .with_search_area(Rect::new(0, 0, 864, 480))
        .open(ImageprocKernel::new())
        .unwrap();
    let (color, gray) = frame(&[Rect::new(0, 200, 864, 40)]);
    assert!(session.locate(&color, &gray).unwrap());
    assert_eq!(session.current_bounding_box(), Some(Rect::new(0, 200, 864, 40)));
    assert_eq!(session.current_contour_area(), 863.0 * 39.0);
    assert_eq!(session.current_zone(), Zone::Center);
}

#[test]
fn blob_cut_by_search_area_edge_is_clipped() {
    let mut session = open_session();
    // Rows 120..171; the band starts at row 143.
    let (color, gray) = frame(&[Rect::new(400, 120, 61, 51)]);
    assert!(!session.locate(&color, &gray).unwrap());
    assert_eq!(session.candidates(), &[Rect::new(400, 143, 61, 28)]);
}

#[test]
fn below_floor_frame_lists_largest_blob_as_candidate() {
    let mut session = open_session();
    let (color, gray) = frame(&[Rect::new(100, 200, 61, 51)]);
    assert!(session.locate(&color, &gray).unwrap());

    // 40x40 traces to 1521, under the 2000 floor, but its box clears 1000.
    let (color, gray) = frame(&[Rect::new(400, 220, 40, 40)]);
    assert!(!session.locate(&color, &gray).unwrap());
    assert_eq!(session.current_detection(), None);
    assert_eq!(session.candidates(), &[Rect::new(400, 220, 40, 40)]);
    assert_eq!(session.last_known_bounding_box(), Some(Rect::new(100, 200, 61, 51)));
}

#[test]
fn search_area_wider_than_any_frame_does_not_panic() {
    let mut session = open_session();
    session
        .set_search_area(Rect::new(0, 143, i32::MAX, 192))
        .unwrap();
    let (color, gray) = frame(&[Rect::new(400, 220, 61, 51)]);
    assert!(session.locate(&color, &gray).unwrap());
    assert_eq!(session.current_zone(), Zone::Left);
    assert_eq!(
        session.annotated_image().map(|i| *i.get_pixel(600, 143)),
        Some(SEARCH_AREA_COLOR)
    );
}
