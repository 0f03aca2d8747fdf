//! Tests for BoundingBox operations.

use dashboard_common::bbox::{wrap_longitude, BboxParseError, BoundingBox};

// ============================================================================
// Constructor tests
// ============================================================================

#[test]
fn test_bbox_new() {
    let bbox = BoundingBox::new(230.0, 35.0, 250.0, 50.0);
    assert_eq!(bbox.min_x, 230.0);
    assert_eq!(bbox.min_y, 35.0);
    assert_eq!(bbox.max_x, 250.0);
    assert_eq!(bbox.max_y, 50.0);
    assert_eq!(bbox.width(), 20.0);
    assert_eq!(bbox.height(), 15.0);
}

#[test]
fn test_bbox_validity() {
    assert!(BoundingBox::pacific_northwest().is_valid());
    assert!(!BoundingBox::new(10.0, 0.0, 5.0, 1.0).is_valid());
    assert!(!BoundingBox::new(0.0, 0.0, 0.0, 1.0).is_valid());
    assert!(!BoundingBox::new(0.0, f64::NAN, 1.0, 1.0).is_valid());
}

// ============================================================================
// from_csv tests
// ============================================================================

#[test]
fn test_parse_csv_with_spaces() {
    let bbox = BoundingBox::from_csv(" 230.5, 35.25 ,250,50 ").unwrap();
    assert!((bbox.min_x - 230.5).abs() < 1e-12);
    assert!((bbox.min_y - 35.25).abs() < 1e-12);
}

#[test]
fn test_parse_csv_too_few() {
    let result = BoundingBox::from_csv("0,0,100");
    assert!(matches!(result, Err(BboxParseError::InvalidFormat(_))));
}

#[test]
fn test_parse_csv_bad_number() {
    let result = BoundingBox::from_csv("0,north,100,100");
    assert!(matches!(result, Err(BboxParseError::InvalidNumber(_))));
}

// ============================================================================
// Containment and extent tests
// ============================================================================

#[test]
fn test_enclosing_ignores_nan() {
    let bbox = BoundingBox::enclosing(&[231.0, f64::NAN, 249.0], &[49.0, 36.0]).unwrap();
    assert_eq!(bbox, BoundingBox::new(231.0, 36.0, 249.0, 49.0));
    assert!(BoundingBox::enclosing(&[], &[1.0]).is_none());
}

#[test]
fn test_signed_longitudes() {
    let bbox = BoundingBox::pacific_northwest().to_signed_longitudes();
    assert_eq!(bbox.min_x, -130.0);
    assert_eq!(bbox.max_x, -110.0);
    assert_eq!(bbox.min_y, 35.0);

    let straddling = BoundingBox::new(170.0, 0.0, 190.0, 10.0).to_signed_longitudes();
    assert_eq!(straddling.min_x, 170.0);
    assert_eq!(straddling.max_x, 190.0);
}

#[test]
fn test_wrap_longitude_range() {
    for lon in [0.0, 90.0, 179.0, 181.0, 270.0, 359.75, -45.0] {
        let wrapped = wrap_longitude(lon);
        assert!((-180.0..=180.0).contains(&wrapped), "{} -> {}", lon, wrapped);
    }
}
