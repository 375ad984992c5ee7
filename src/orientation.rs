//! Orientation Resolver: enumerates allowed `(w, h, rotated)`
//! triples for an item from its rotation and pattern-direction
//! constraints.

use crate::error::{PackError, Result};
use crate::model::{PatternDirection, Rotation};

/// One allowed placement orientation for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrientedSize {
    /// Width in this orientation.
    pub w: i64,
    /// Height in this orientation.
    pub h: i64,
    /// Whether this orientation is the item rotated 90 degrees from its declared `(w, h)`.
    pub rotated: bool,
}

/// Returns the non-empty ordered list of orientations allowed for
/// `(w, h)` under `rotation` and `pattern`.
///
/// Fails with `Validation` if `pattern` requires a rotation that
/// `rotation` forbids.
pub fn resolve_orientations(
    w: i64,
    h: i64,
    rotation: Rotation,
    pattern: PatternDirection,
) -> Result<Vec<OrientedSize>> {
    if w == h {
        return Ok(vec![OrientedSize { w, h, rotated: false }]);
    }

    let mut base = vec![OrientedSize { w, h, rotated: false }];
    if rotation == Rotation::Allow90 {
        base.push(OrientedSize { w: h, h: w, rotated: true });
    }

    let larger_is_width = w >= h;

    match pattern {
        PatternDirection::None => Ok(base),
        PatternDirection::AlongWidth => {
            if larger_is_width {
                Ok(vec![OrientedSize { w, h, rotated: false }])
            } else if rotation == Rotation::Allow90 {
                Ok(vec![OrientedSize { w: h, h: w, rotated: true }])
            } else {
                Err(PackError::validation(
                    "pattern_direction requires rotation but rotation is forbidden",
                ))
            }
        }
        PatternDirection::AlongHeight => {
            if !larger_is_width {
                Ok(vec![OrientedSize { w, h, rotated: false }])
            } else if rotation == Rotation::Allow90 {
                Ok(vec![OrientedSize { w: h, h: w, rotated: true }])
            } else {
                Err(PackError::validation(
                    "pattern_direction requires rotation but rotation is forbidden",
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_item_has_single_orientation() {
        let orientations =
            resolve_orientations(40, 40, Rotation::Forbid, PatternDirection::None).unwrap();
        assert_eq!(orientations, vec![OrientedSize { w: 40, h: 40, rotated: false }]);
    }

    #[test]
    fn no_rotation_forbidden_gives_single_orientation() {
        let orientations =
            resolve_orientations(30, 80, Rotation::Forbid, PatternDirection::None).unwrap();
        assert_eq!(orientations, vec![OrientedSize { w: 30, h: 80, rotated: false }]);
    }

    #[test]
    fn rotation_allowed_gives_both_orientations() {
        let orientations =
            resolve_orientations(30, 80, Rotation::Allow90, PatternDirection::None).unwrap();
        assert_eq!(
            orientations,
            vec![
                OrientedSize { w: 30, h: 80, rotated: false },
                OrientedSize { w: 80, h: 30, rotated: true },
            ]
        );
    }

    #[test]
    fn along_width_keeps_non_rotated_when_already_wider() {
        let orientations =
            resolve_orientations(80, 30, Rotation::Allow90, PatternDirection::AlongWidth).unwrap();
        assert_eq!(orientations, vec![OrientedSize { w: 80, h: 30, rotated: false }]);
    }

    #[test]
    fn along_width_requires_rotation_when_narrower() {
        let orientations =
            resolve_orientations(30, 80, Rotation::Allow90, PatternDirection::AlongWidth).unwrap();
        assert_eq!(orientations, vec![OrientedSize { w: 80, h: 30, rotated: true }]);
    }

    #[test]
    fn along_width_fails_when_rotation_forbidden_and_narrower() {
        let result = resolve_orientations(30, 80, Rotation::Forbid, PatternDirection::AlongWidth);
        assert!(result.is_err());
    }

    #[test]
    fn along_height_symmetric_to_along_width() {
        let orientations =
            resolve_orientations(30, 80, Rotation::Allow90, PatternDirection::AlongHeight).unwrap();
        assert_eq!(orientations, vec![OrientedSize { w: 30, h: 80, rotated: false }]);

        let orientations =
            resolve_orientations(80, 30, Rotation::Allow90, PatternDirection::AlongHeight).unwrap();
        assert_eq!(orientations, vec![OrientedSize { w: 30, h: 80, rotated: true }]);
    }
}
