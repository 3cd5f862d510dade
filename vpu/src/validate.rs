//! Overlay geometry validation.
//!
//! The overlay block is a pass-through scanout engine: it can position a
//! plane anywhere on the output but cannot scale, so a request's source and
//! destination sizes must match pixel for pixel. Validation clips the
//! destination against the output bounds (placing a plane partially
//! off-screen is allowed) and produces an [`ApprovedUpdate`] - the only
//! thing the commit engine accepts, so unvalidated geometry can never reach
//! the register-programming path.

use glint_abi::{int_to_fixed16, OutputMode, OverlayFrame, OverlayRequest, ValidateError};

/// A validated overlay update, ready to commit.
///
/// Carries the request with its rectangles clipped to the output bounds,
/// the buffer that passed validation, and the scanout mode properties the
/// commit path needs.
#[derive(Clone, Copy, Debug)]
pub struct ApprovedUpdate {
    request: OverlayRequest,
    frame: OverlayFrame,
    interlaced: bool,
}

impl ApprovedUpdate {
    /// The clipped request.
    #[inline]
    pub fn request(&self) -> &OverlayRequest {
        &self.request
    }

    /// The scanout buffer bound by the request.
    #[inline]
    pub fn frame(&self) -> &OverlayFrame {
        &self.frame
    }

    /// Whether the target scans out interlaced.
    #[inline]
    pub fn interlaced(&self) -> bool {
        self.interlaced
    }
}

/// Validate a proposed overlay placement against hardware constraints.
///
/// Checks, in order:
/// - the plane has a destination target and a bound buffer (`NoTarget`);
/// - source size after 16.16 truncation equals destination size exactly
///   (`UnsupportedScaling`);
/// - the destination overlaps the output bounds at all (`OutOfBounds`);
///   partial overlap is accepted and the rectangles are clipped.
pub fn validate(
    request: &OverlayRequest,
    mode: &OutputMode,
) -> Result<ApprovedUpdate, ValidateError> {
    let (Some(_), Some(frame)) = (request.target, request.frame) else {
        return Err(ValidateError::NoTarget);
    };

    if request.src.int_width() != request.dst.width()
        || request.src.int_height() != request.dst.height()
    {
        return Err(ValidateError::UnsupportedScaling);
    }

    let clipped_dst = request.dst.intersect(&mode.bounds);
    if clipped_dst.is_empty() {
        return Err(ValidateError::OutOfBounds);
    }

    // 1:1 scanout: move the source crop by the same amount the clip moved
    // the destination.
    let mut clipped = *request;
    clipped.src.x1 += int_to_fixed16(clipped_dst.x1 - request.dst.x1);
    clipped.src.y1 += int_to_fixed16(clipped_dst.y1 - request.dst.y1);
    clipped.src.x2 += int_to_fixed16(clipped_dst.x2 - request.dst.x2);
    clipped.src.y2 += int_to_fixed16(clipped_dst.y2 - request.dst.y2);
    clipped.dst = clipped_dst;

    Ok(ApprovedUpdate {
        request: clipped,
        frame,
        interlaced: mode.interlaced,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_abi::{
        OutputId, OverlayFrame, PhysAddr, PixelFormat, Rect, SrcRect,
    };

    fn frame() -> OverlayFrame {
        OverlayFrame {
            addr: PhysAddr::new(0x2000_0000),
            stride: 512,
            width: 128,
            height: 128,
        }
    }

    fn request(dst: Rect) -> OverlayRequest {
        OverlayRequest::passthrough(OutputId(0), dst, PixelFormat::Argb8888, frame())
    }

    fn mode() -> OutputMode {
        OutputMode::progressive(1920, 1080)
    }

    #[test]
    fn no_target_is_rejected() {
        let mut req = request(Rect::from_xywh(0, 0, 100, 50));
        req.target = None;
        assert_eq!(validate(&req, &mode()).unwrap_err(), ValidateError::NoTarget);

        let mut req = request(Rect::from_xywh(0, 0, 100, 50));
        req.frame = None;
        assert_eq!(validate(&req, &mode()).unwrap_err(), ValidateError::NoTarget);
    }

    #[test]
    fn scaling_is_rejected() {
        let mut req = request(Rect::from_xywh(0, 0, 100, 50));
        req.src = SrcRect::from_int_xywh(0, 0, 50, 50);
        assert_eq!(
            validate(&req, &mode()).unwrap_err(),
            ValidateError::UnsupportedScaling
        );

        // Sub-pixel source offsets that truncate to the same size pass.
        let mut req = request(Rect::from_xywh(0, 0, 100, 50));
        req.src = SrcRect::new(0x8000, 0x4000, 0x64_8000, 0x32_4000);
        assert!(validate(&req, &mode()).is_ok());
    }

    #[test]
    fn fully_outside_is_rejected() {
        let req = request(Rect::from_xywh(1920, 0, 64, 64));
        assert_eq!(
            validate(&req, &mode()).unwrap_err(),
            ValidateError::OutOfBounds
        );
    }

    #[test]
    fn partial_overlap_is_clipped() {
        let req = request(Rect::from_xywh(1900, -10, 64, 64));
        let approved = validate(&req, &mode()).unwrap();
        let r = approved.request();
        assert_eq!(r.dst, Rect::new(1900, 0, 1920, 54));
        // Source crop follows the clip 1:1.
        assert_eq!(r.src.int_width(), r.dst.width());
        assert_eq!(r.src.int_height(), r.dst.height());
        assert_eq!(r.src.x1 >> 16, 0);
        assert_eq!(r.src.y1 >> 16, 10);
    }

    #[test]
    fn interlace_flag_rides_along() {
        let req = request(Rect::from_xywh(0, 0, 100, 50));
        let mut interlaced = mode();
        interlaced.interlaced = true;
        assert!(validate(&req, &interlaced).unwrap().interlaced());
    }
}
