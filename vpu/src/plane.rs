//! Per-plane shadow state and register word computation.
//!
//! The shadow is the driver-held mirror of the last-programmed register
//! values for one overlay plane. Commits recompute it and mark register
//! groups dirty; the vsync flush pushes dirty groups to hardware and clears
//! the mask. All shadow access happens under the pipeline lock.

use bitflags::bitflags;

use glint_abi::{fixed16_to_int, OverlayFrame, OverlayRequest, PixelFormat, Rect, SrcRect};

use crate::hw::osd_regs::*;

/// Idle window after the last commit before a plane counts as idle.
pub const OSD_IDLE_NS: u64 = 10 * 1000 * 1000 * 1000;

bitflags! {
    /// Dirty register groups of a plane shadow.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Dirty: u32 {
        /// Canvas/buffer descriptor registers
        const FRAME = 0x01;
        /// Scaler registers (pass-through pipeline, never set)
        const SCALE = 0x02;
        /// Control word, block configuration and blend scope registers
        const CONFIG = 0x04;
    }
}

/// The two overlay planes of the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaneId {
    /// Primary full-featured overlay
    Osd1,
    /// Cursor overlay, the hardware-designated fast-update plane
    Osd2,
}

impl PlaneId {
    #[inline]
    pub(crate) const fn index(self) -> usize {
        match self {
            PlaneId::Osd1 => 0,
            PlaneId::Osd2 => 1,
        }
    }

    /// Register assignment for this plane.
    #[inline]
    pub(crate) const fn regs(self) -> &'static PlaneRegs {
        match self {
            PlaneId::Osd1 => &OSD1_REGS,
            PlaneId::Osd2 => &OSD2_REGS,
        }
    }
}

/// Capability tag: which commit routes a plane supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaneKind {
    /// Full atomic commits only
    Full,
    /// Full commits plus the reduced-latency fast update path
    Fast,
}

/// Driver-held mirror of one plane's pipeline-relevant registers.
#[derive(Clone, Copy, Debug)]
pub struct PlaneShadow {
    /// Control word: enable, global alpha, block enable
    pub ctrl_stat: u32,
    /// Control word 2: alpha replace
    pub ctrl_stat2: u32,
    /// Block 0 configuration: canvas/format, source and dest windows
    pub blk0_cfg: [u32; 5],
    /// Blend scope words derived from the destination window
    pub blend_scope_h: u32,
    pub blend_scope_v: u32,
    /// Last-programmed scanout buffer descriptor
    pub frame: OverlayFrame,
    /// Register groups that differ from what hardware holds
    pub dirty: Dirty,
    /// Plane is live between a successful commit and the next disable
    pub enabled: bool,
    /// Shadow was reset and must re-latch everything
    pub needs_reset: bool,
    /// A commit is waiting for the vsync flush
    pub commit_pending: bool,
    /// Target scans out interlaced
    pub interlaced: bool,
    /// Timestamp of the last commit, for the idle heuristic
    pub last_commit_ns: u64,
}

impl PlaneShadow {
    pub(crate) const fn new() -> Self {
        Self {
            ctrl_stat: 0,
            ctrl_stat2: 0,
            blk0_cfg: [0; 5],
            blend_scope_h: 0,
            blend_scope_v: 0,
            frame: OverlayFrame {
                addr: glint_abi::PhysAddr::NULL,
                stride: 0,
                width: 0,
                height: 0,
            },
            dirty: Dirty::empty(),
            enabled: false,
            needs_reset: true,
            commit_pending: false,
            interlaced: false,
            last_commit_ns: 0,
        }
    }

    /// Back to the post-init state: disabled, nothing committed,
    /// progressive, everything to be re-latched.
    pub(crate) fn reset(&mut self) {
        *self = Self::new();
    }

    /// True once the idle window has elapsed since the last commit.
    #[inline]
    pub(crate) fn is_idle(&self, now_ns: u64) -> bool {
        now_ns.saturating_sub(self.last_commit_ns) >= OSD_IDLE_NS
    }
}

/// One plane of the pipeline: shadow, capability and current state.
pub(crate) struct Plane {
    pub shadow: PlaneShadow,
    /// Last committed request; what the fast path swaps against
    pub current: OverlayRequest,
    pub kind: PlaneKind,
    /// Fixed stacking position advertised to the compositor
    pub zpos: u8,
}

impl Plane {
    pub(crate) const fn new(kind: PlaneKind, zpos: u8) -> Self {
        Self {
            shadow: PlaneShadow::new(),
            current: OverlayRequest::unbound(),
            kind,
            zpos,
        }
    }
}

/// Pack a window axis into one register word.
///
/// The hardware format is `(end << 16) | start` with an inclusive end,
/// e.g. +30x1920 becomes `(1949 << 16) | 30`.
#[inline]
pub(crate) fn window_word(start: i32, end: i32) -> u32 {
    (((end - 1) as u32 & 0xffff) << 16) | (start as u32 & 0xffff)
}

/// Source window words from the 16.16 source rectangle.
#[inline]
pub(crate) fn src_window_words(src: &SrcRect) -> (u32, u32) {
    (
        window_word(fixed16_to_int(src.x1), fixed16_to_int(src.x2)),
        window_word(fixed16_to_int(src.y1), fixed16_to_int(src.y2)),
    )
}

/// Destination window words from the integer destination rectangle.
#[inline]
pub(crate) fn dst_window_words(dst: &Rect) -> (u32, u32) {
    (window_word(dst.x1, dst.x2), window_word(dst.y1, dst.y2))
}

/// Block mode and channel order bits for a scanout format.
pub(crate) const fn blk0_format_bits(format: PixelFormat) -> u32 {
    match format {
        PixelFormat::Xrgb8888 | PixelFormat::Argb8888 => {
            OSD_BLK_MODE_32 | OSD_COLOR_ORDER_32_ARGB
        }
        PixelFormat::Xbgr8888 | PixelFormat::Abgr8888 => {
            OSD_BLK_MODE_32 | OSD_COLOR_ORDER_32_ABGR
        }
        PixelFormat::Rgb888 => OSD_BLK_MODE_24 | OSD_COLOR_ORDER_24_RGB,
        PixelFormat::Rgb565 => OSD_BLK_MODE_16 | OSD_COLOR_ORDER_16_RGB565,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_word_packs_exclusive_end_minus_one() {
        // x spanning [30, 1950): (1949 << 16) | 30
        assert_eq!(window_word(30, 1950), (1949 << 16) | 30);
        assert_eq!(window_word(0, 1), 0);
        assert_eq!(window_word(0, 0x10000), 0xffff_0000);
    }

    #[test]
    fn window_word_law_over_sample_grid() {
        let samples = [1, 2, 30, 99, 1024, 4095, 65535, 65536];
        for &x2 in &samples {
            for &x1 in &samples {
                if x1 >= x2 {
                    continue;
                }
                let word = window_word(x1, x2);
                assert_eq!(word >> 16, (x2 - 1) as u32 & 0xffff);
                assert_eq!(word & 0xffff, x1 as u32);
            }
        }
    }

    #[test]
    fn src_windows_truncate_fixed_point() {
        let src = SrcRect::new(0x8000, 0x4000, 0x64_8000, 0x32_4000);
        let (h, v) = src_window_words(&src);
        assert_eq!(h, 99 << 16); // [0, 100) after truncation
        assert_eq!(v, 49 << 16); // [0, 50)
    }

    #[test]
    fn format_bits_table() {
        for format in PixelFormat::SUPPORTED {
            let bits = blk0_format_bits(format);
            let mode = bits & (0xf << 8);
            match format.bytes_per_pixel() {
                4 => assert_eq!(mode, OSD_BLK_MODE_32),
                3 => assert_eq!(mode, OSD_BLK_MODE_24),
                2 => assert_eq!(mode, OSD_BLK_MODE_16),
                _ => unreachable!(),
            }
        }
        assert_eq!(
            blk0_format_bits(PixelFormat::Argb8888),
            blk0_format_bits(PixelFormat::Xrgb8888)
        );
        assert_eq!(
            blk0_format_bits(PixelFormat::Abgr8888),
            OSD_BLK_MODE_32 | OSD_COLOR_ORDER_32_ABGR
        );
        assert_eq!(
            blk0_format_bits(PixelFormat::Rgb565),
            OSD_BLK_MODE_16 | OSD_COLOR_ORDER_16_RGB565
        );
    }

    #[test]
    fn idle_window() {
        let mut shadow = PlaneShadow::new();
        shadow.last_commit_ns = 5_000_000_000;
        assert!(!shadow.is_idle(6_000_000_000));
        assert!(shadow.is_idle(15_000_000_000));
        // Clock going backwards must not underflow.
        assert!(!shadow.is_idle(0));
    }
}
