//! Overlay request and scanout buffer descriptors.
//!
//! An [`OverlayRequest`] is the unit of negotiation between the compositor
//! and the overlay core: the compositor builds one each time it wants to
//! change what a plane shows, submits it for validation, and either commits
//! the approved result or corrects and resubmits. Requests are immutable
//! once submitted.

use bitflags::bitflags;

use crate::addr::PhysAddr;
use crate::pixel::PixelFormat;
use crate::rect::{Rect, SrcRect};

/// Identifier of an output (sync generator / encoder path) a plane targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(transparent)]
pub struct OutputId(pub u8);

/// Scanout buffer descriptor.
///
/// Produced by the buffer-allocation collaborator; the overlay core only
/// forwards these values into the canvas registers and never touches the
/// memory behind them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(C)]
pub struct OverlayFrame {
    /// Physical base address of the buffer
    pub addr: PhysAddr,
    /// Bytes per scanline
    pub stride: u32,
    /// Buffer width in pixels
    pub width: u32,
    /// Buffer height in pixels
    pub height: u32,
}

/// Per-pixel blend equation selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum BlendMode {
    /// Source colors are already multiplied by alpha
    #[default]
    Premultiplied,
    /// Source colors are multiplied by alpha in the blend stage
    Coverage,
    /// Alpha is ignored, plane is opaque
    Opaque,
}

bitflags! {
    /// Plane rotation/reflection, mirroring the property bits a compositor
    /// hands through. The overlay block only scans out `ROTATE_0`; the rest
    /// ride along for the fast-path state swap.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Rotation: u8 {
        const ROTATE_0 = 1 << 0;
        const ROTATE_90 = 1 << 1;
        const ROTATE_180 = 1 << 2;
        const ROTATE_270 = 1 << 3;
        const REFLECT_X = 1 << 4;
        const REFLECT_Y = 1 << 5;
    }
}

impl Default for Rotation {
    #[inline]
    fn default() -> Self {
        Rotation::ROTATE_0
    }
}

/// Color encoding of YUV content; pass-through for RGB overlays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum ColorEncoding {
    Bt601,
    #[default]
    Bt709,
    Bt2020,
}

/// Quantization range of the content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum ColorRange {
    #[default]
    Limited,
    Full,
}

/// Output mode a request is validated against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C)]
pub struct OutputMode {
    /// Addressable destination bounds, origin at (0, 0)
    pub bounds: Rect,
    /// Interlaced scanout (field-sequential latching)
    pub interlaced: bool,
}

impl OutputMode {
    /// Progressive mode covering `width` x `height`.
    #[inline]
    pub const fn progressive(width: i32, height: i32) -> Self {
        Self {
            bounds: Rect::new(0, 0, width, height),
            interlaced: false,
        }
    }
}

/// Proposed state for one overlay plane.
///
/// `target` is `None` when the plane is not assigned to any output - there
/// is nothing to show and nothing to validate the geometry against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayRequest {
    /// Output this plane should appear on, if any
    pub target: Option<OutputId>,
    /// Source crop in 16.16 fixed point
    pub src: SrcRect,
    /// Destination placement in integer pixels
    pub dst: Rect,
    /// Pixel format of the bound buffer
    pub format: PixelFormat,
    /// Scanout buffer, if one is bound
    pub frame: Option<OverlayFrame>,
    /// Global plane alpha, 0x0000 (transparent) to 0xFFFF (opaque)
    pub alpha: u16,
    /// Blend equation for the per-pixel alpha channel
    pub blend_mode: BlendMode,
    /// Requested rotation/reflection
    pub rotation: Rotation,
    /// Stacking position within the blend unit
    pub zpos: u8,
    /// Color encoding of the content
    pub color_encoding: ColorEncoding,
    /// Quantization range of the content
    pub color_range: ColorRange,
    /// Whether the plane should be visible after commit
    pub visible: bool,
}

impl OverlayRequest {
    /// The state of a plane bound to nothing: no target, no buffer,
    /// invisible. This is what a plane holds before its first commit.
    pub const fn unbound() -> Self {
        Self {
            target: None,
            src: SrcRect::new(0, 0, 0, 0),
            dst: Rect::new(0, 0, 0, 0),
            format: PixelFormat::Argb8888,
            frame: None,
            alpha: u16::MAX,
            blend_mode: BlendMode::Premultiplied,
            rotation: Rotation::ROTATE_0,
            zpos: 0,
            color_encoding: ColorEncoding::Bt709,
            color_range: ColorRange::Limited,
            visible: false,
        }
    }

    /// A request showing `frame` 1:1 at `dst` on `target`.
    pub fn passthrough(
        target: OutputId,
        dst: Rect,
        format: PixelFormat,
        frame: OverlayFrame,
    ) -> Self {
        Self {
            target: Some(target),
            src: SrcRect::from_int_xywh(0, 0, dst.width(), dst.height()),
            dst,
            format,
            frame: Some(frame),
            alpha: u16::MAX,
            blend_mode: BlendMode::Premultiplied,
            rotation: Rotation::ROTATE_0,
            zpos: 0,
            color_encoding: ColorEncoding::Bt709,
            color_range: ColorRange::Limited,
            visible: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough_request_matches_geometry() {
        let frame = OverlayFrame {
            addr: PhysAddr::new(0x1000_0000),
            stride: 256,
            width: 64,
            height: 64,
        };
        let req = OverlayRequest::passthrough(
            OutputId(0),
            Rect::from_xywh(30, 40, 64, 64),
            PixelFormat::Argb8888,
            frame,
        );
        assert_eq!(req.src.int_width(), req.dst.width());
        assert_eq!(req.src.int_height(), req.dst.height());
        assert!(req.visible);
    }
}
