//! EXIF orientation codes.

pub fn rotation_degrees(code: i64) -> i32 {
    match code {
        3 | 4 => 180,
        5 | 8 => 270,
        6 | 7 => 90,
        _ => 0,
    }
}

/// Codes whose transform includes a mirror.
pub fn is_flipped(code: i64) -> bool {
    matches!(code, 2 | 4 | 5 | 7)
}
