//! The overlay pipeline: shared state, commit engine and initializer.
//!
//! One [`Pipeline`] owns the register file, the once-written
//! [`PipelineConfig`] and the lock-guarded mutable state of both planes.
//! Two execution contexts meet here: driver-call context performing
//! validate + commit, and the vsync interrupt handler calling [`flush`] to
//! latch pending register groups. Everything mutable is serialized through
//! one interrupt-masking lock, and all lock-held work is short,
//! allocation-free and non-blocking.
//!
//! [`flush`]: Pipeline::flush

use glint_abi::{OutputMode, OverlayRequest, PixelFormat, ValidateError};
use glint_lib::{klog_debug, klog_info, now_ns, IrqMutex};

use crate::hw::osd_regs::*;
use crate::matrix::{ColorMatrix, OSD1_MATRIX, OSD2_MATRIX, RGB709_TO_YUV709L};
use crate::plane::{
    blk0_format_bits, dst_window_words, src_window_words, Dirty, Plane, PlaneId, PlaneKind,
    PlaneShadow,
};
use crate::regio::RegisterFile;
use crate::validate::{validate, ApprovedUpdate};
use crate::vsync::VsyncGate;

/// Scanout FIFO tuning for one overlay path.
///
/// These are fixed fetch-engine constants, not derived from any runtime
/// input; both paths get the same word.
#[derive(Clone, Copy, Debug)]
pub struct FifoConfig {
    /// FIFO depth in 8-word units
    pub depth: u32,
    /// Words fetched per burst
    pub words_per_burst: u32,
    /// Lines held in the FIFO before scanout starts
    pub hold_lines: u32,
    /// Refill threshold in 16-word units
    pub fifo_limits: u32,
    /// Use 32-unit bursts
    pub burst_length_32: bool,
    /// Urgent DDR arbitration priority
    pub ddr_priority_urgent: bool,
}

impl FifoConfig {
    /// The fetch tuning both paths ship with: fifo_depth 32*8=256, 4 words
    /// in 1 burst, fifo_lim 2*16=32, 31 hold lines, urgent priority.
    pub const DEFAULT: FifoConfig = FifoConfig {
        depth: 32,
        words_per_burst: 4,
        hold_lines: 31,
        fifo_limits: 2,
        burst_length_32: true,
        ddr_priority_urgent: true,
    };

    /// Pack into the FIFO control register format.
    pub const fn ctrl_word(&self) -> u32 {
        let mut word = osd_fifo_depth_val(self.depth)
            | osd_words_per_burst(self.words_per_burst)
            | osd_hold_fifo_lines(self.hold_lines)
            | osd_fifo_limits(self.fifo_limits);
        if self.burst_length_32 {
            word |= OSD_BURST_LENGTH_32;
        }
        if self.ddr_priority_urgent {
            word |= OSD_DDR_PRIORITY_URGENT;
        }
        word
    }
}

impl Default for FifoConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Process-wide pipeline configuration, written once by [`Pipeline::init`]
/// and read-only afterwards.
#[derive(Clone, Copy, Debug)]
pub struct PipelineConfig {
    /// The fixed RGB to YUV conversion both overlay paths run through
    pub matrix: ColorMatrix,
    /// Enable the conversion stage
    pub csc_enable: bool,
    /// Scanout FIFO tuning
    pub fifo: FifoConfig,
    /// Default alpha replace value (full opacity)
    pub replace_alpha: u8,
}

impl PipelineConfig {
    /// The stock configuration: BT.709 conversion enabled, default FIFO
    /// tuning, opaque alpha replacement.
    pub const DEFAULT: PipelineConfig = PipelineConfig {
        matrix: RGB709_TO_YUV709L,
        csc_enable: true,
        fifo: FifoConfig::DEFAULT,
        replace_alpha: 0xFF,
    };
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Lock-guarded mutable pipeline state.
struct PipelineShared {
    planes: [Plane; 2],
    vsync: VsyncGate,
}

/// The overlay pipeline driver core.
pub struct Pipeline<R: RegisterFile> {
    regs: R,
    config: PipelineConfig,
    shared: IrqMutex<PipelineShared>,
}

impl<R: RegisterFile> Pipeline<R> {
    /// Pipeline over `regs` with the stock configuration.
    pub const fn new(regs: R) -> Self {
        Self::with_config(regs, PipelineConfig::DEFAULT)
    }

    /// Pipeline over `regs` with an explicit configuration.
    pub const fn with_config(regs: R, config: PipelineConfig) -> Self {
        Self {
            regs,
            config,
            shared: IrqMutex::new(PipelineShared {
                // OSD1 sits at the bottom of the blend stack, the cursor
                // overlay always on the front.
                planes: [
                    Plane::new(PlaneKind::Full, 0),
                    Plane::new(PlaneKind::Fast, 2),
                ],
                vsync: VsyncGate::new(),
            }),
        }
    }

    /// The register file this pipeline drives.
    #[inline]
    pub fn regs(&self) -> &R {
        &self.regs
    }

    /// The once-written pipeline configuration.
    #[inline]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Formats both overlay planes advertise to the compositor.
    #[inline]
    pub fn supported_formats(&self) -> &'static [PixelFormat] {
        &PixelFormat::SUPPORTED
    }

    // ------------------------------------------------------------------
    // Initializer
    // ------------------------------------------------------------------

    /// Bring the whole pixel pipeline into a known state.
    ///
    /// Runs once at startup, before any commit and before interrupts are
    /// wired, so no locking is needed for the register sequence. The order
    /// is load-bearing: planes are disabled before the shared blend routing
    /// is touched (a visible garbage frame otherwise), and matrix
    /// coefficients are fully written before the enable bit.
    pub fn init(&self) {
        klog_debug!("vpu: overlay pipeline init");

        // Disable OSDs
        for pr in [&OSD1_REGS, &OSD2_REGS] {
            self.regs
                .write_bits(pr.ctrl_stat, OSD_BLK0_ENABLE | OSD_ENABLE, 0);
        }

        self.config
            .matrix
            .program(&self.regs, &OSD1_MATRIX, self.config.csc_enable);
        self.config
            .matrix
            .program(&self.regs, &OSD2_MATRIX, self.config.csc_enable);

        // Fix green/pink color distortion inherited from the boot firmware
        self.regs.write_bits(
            OSD1_HDR2_CTRL,
            OSD1_HDR2_CTRL_REG_ONLY_MAT | OSD1_HDR2_CTRL_VDIN0_HDR2_TOP_EN,
            0,
        );

        // Initialize both scanout FIFOs
        let fifo = self.config.fifo.ctrl_word();
        self.regs.write(OSD1_FIFO_CTRL_STAT, fifo);
        self.regs.write(OSD2_FIFO_CTRL_STAT, fifo);

        // Set the OSD alpha replace value
        let replace = (self.config.replace_alpha as u32) << OSD_REPLACE_SHIFT;
        for pr in [&OSD1_REGS, &OSD2_REGS] {
            self.regs
                .write_bits(pr.ctrl_stat2, 0xff << OSD_REPLACE_SHIFT, replace);
        }

        // Disable VD1 decompression: deinterlace fetch off, no routing to
        // the pipeline, global decompression engine off
        self.regs.write_bits(VPU_MISC_CTRL0, VPU_MISC_VD1_DCMP_MASK, 0);
        self.regs.write(DCMP_ENABLE, 0);

        self.regs.write(VD1_IF0_LUMA_FIFO_SIZE, 0x00FF_00C0);
        self.regs.write(VD2_IF0_LUMA_FIFO_SIZE, 0x00FF_00C0);

        let blend = osd_blend_reorder(0, 1)
            | osd_blend_reorder(1, 4)
            | osd_blend_reorder(2, 4)
            | osd_blend_reorder(3, 2)
            | osd_blend_din_en(9)
            | OSD_BLEND_DIN0_BYPASS_TO_DOUT0
            | osd_blend_blen2_premult_en(1)
            | osd_blend_hold_lines(4);
        self.regs.write(OSD_BLEND_CTRL, blend);

        self.regs.write(OSD1_BLEND_SRC_CTRL, OSD_BLEND_PATH_SEL_ENABLE);
        self.regs.write(OSD2_BLEND_SRC_CTRL, OSD_BLEND_PATH_SEL_ENABLE);
        self.regs.write(VD1_BLEND_SRC_CTRL, 0);
        self.regs.write(VD2_BLEND_SRC_CTRL, 0);
        self.regs.write(OSD_BLEND_DUMMY_DATA0, 0);
        self.regs.write(OSD_BLEND_DUMMY_ALPHA, 0);

        // Keep the downstream processing block out of the signal path
        self.regs
            .write_bits(BYPASS_PATH_CTRL, bypass_path_en(0xc), bypass_path_en(0xc));

        self.dcmp_disable();

        let mut shared = self.shared.lock();
        for plane in &mut shared.planes {
            plane.shadow.reset();
            plane.current = OverlayRequest::unbound();
        }
        drop(shared);

        klog_info!("vpu: overlay pipeline ready");
    }

    /// Workaround hook for the alpha-blend erratum on earlier SoC
    /// revisions. Nothing to do on this one.
    pub fn osd1_reset(&self) {}

    /// Route OSD1 fetches through the decompression engine, with channel
    /// reordering selected by the scanout format.
    pub fn dcmp_enable(&self, format: PixelFormat) {
        self.regs
            .write_bits(OSD1_UNPACK_CTRL, OSD_UNPACK_EN, OSD_UNPACK_EN);

        let order = match format {
            PixelFormat::Xbgr8888 | PixelFormat::Abgr8888 => OSD_UNPACK_ORDER_ABGR,
            _ => OSD_UNPACK_ORDER_ARGB,
        };
        self.regs
            .write_bits(OSD1_UNPACK_CTRL, OSD_UNPACK_REORDER_MASK, order);

        self.regs
            .write_bits(OSD_PATH_MISC_CTRL, OSD_PATH_SEL_OSD1_DCMP, OSD_PATH_SEL_OSD1_DCMP);
    }

    /// Take OSD1 off the decompression path and stop the unpack engine.
    pub fn dcmp_disable(&self) {
        self.regs
            .write_bits(OSD_PATH_MISC_CTRL, OSD_PATH_SEL_OSD1_DCMP, 0);
        self.regs.write_bits(OSD1_UNPACK_CTRL, OSD_UNPACK_EN, 0);
    }

    // ------------------------------------------------------------------
    // Commit engine
    // ------------------------------------------------------------------

    /// Validate `request` for the fast update path on `plane`.
    ///
    /// Only the hardware-designated fast-update overlay qualifies, and only
    /// while it is already showing a buffer on a target; everything else
    /// must take the full path. On success the request has also passed full
    /// geometry validation.
    pub fn validate_fast(
        &self,
        plane: PlaneId,
        request: &OverlayRequest,
        mode: &OutputMode,
    ) -> Result<ApprovedUpdate, ValidateError> {
        {
            let shared = self.shared.lock();
            let state = &shared.planes[plane.index()];
            if state.kind != PlaneKind::Fast
                || request.target.is_none()
                || state.current.target.is_none()
                || state.current.frame.is_none()
            {
                return Err(ValidateError::FastPathIneligible);
            }
        }
        validate(request, mode)
    }

    /// Full atomic commit of a validated update.
    ///
    /// Updates coordinates, format, buffer and enables the plane; the
    /// register writes themselves happen at the next vsync edge via
    /// [`flush`](Self::flush).
    pub fn commit(&self, plane: PlaneId, update: &ApprovedUpdate) {
        let mut shared = self.shared.lock();
        shared.planes[plane.index()].current = *update.request();
        self.program_locked(&mut shared, plane, update);
    }

    /// Fast-path commit for the designated overlay.
    ///
    /// Atomically swaps the visible buffer reference and all placement and
    /// blend attributes into the plane's current state, then runs the same
    /// register-programming routine as the full path. Safe only because
    /// [`validate_fast`](Self::validate_fast) confirmed eligibility.
    pub fn commit_fast(&self, plane: PlaneId, update: &ApprovedUpdate) {
        let mut shared = self.shared.lock();
        let req = update.request();
        let current = &mut shared.planes[plane.index()].current;
        current.frame = req.frame;
        current.format = req.format;
        current.target = req.target;
        current.dst = req.dst;
        current.src = req.src;
        current.alpha = req.alpha;
        current.blend_mode = req.blend_mode;
        current.rotation = req.rotation;
        current.zpos = req.zpos;
        current.color_encoding = req.color_encoding;
        current.color_range = req.color_range;
        current.visible = req.visible;

        self.program_locked(&mut shared, plane, update);
    }

    /// Recompute the plane shadow from an approved update and mark dirty
    /// register groups. Caller holds the pipeline lock.
    fn program_locked(
        &self,
        shared: &mut PipelineShared,
        plane: PlaneId,
        update: &ApprovedUpdate,
    ) {
        let req = update.request();
        let pr = plane.regs();
        let frame = *update.frame();

        let state = &mut shared.planes[plane.index()];
        let shadow = &mut state.shadow;

        if !shadow.enabled {
            klog_debug!("vpu: {:?} enabling", plane);
        }

        // Enable OSD and BLK0, set max global alpha
        shadow.ctrl_stat =
            OSD_ENABLE | (0x100 << OSD_GLOBAL_ALPHA_SHIFT) | OSD_BLK0_ENABLE;

        shadow.ctrl_stat2 = self.regs.read(pr.ctrl_stat2);

        // Point BLK0 at this plane's canvas
        shadow.blk0_cfg[0] = (pr.canvas_index << OSD_CANVAS_SEL)
            | OSD_ENDIANNESS_LE
            | blk0_format_bits(req.format);

        if req.format.has_alpha() {
            // For ARGB, use the pixel's alpha
            shadow.ctrl_stat2 &= !OSD_REPLACE_EN;
        } else {
            // For XRGB, replace the pixel's alpha by the opaque default
            shadow.ctrl_stat2 |= OSD_REPLACE_EN;
        }

        let (src_h, src_v) = src_window_words(&req.src);
        let (dst_h, dst_v) = dst_window_words(&req.dst);
        shadow.blk0_cfg[1] = src_h;
        shadow.blk0_cfg[2] = src_v;
        shadow.blk0_cfg[3] = dst_h;
        shadow.blk0_cfg[4] = dst_v;
        shadow.blend_scope_h = dst_h;
        shadow.blend_scope_v = dst_v;

        // Format and geometry re-latch on every commit
        shadow.dirty |= Dirty::CONFIG;

        if shadow.needs_reset || shadow.frame != frame {
            shadow.dirty |= Dirty::FRAME;
            shadow.frame = frame;
        }

        shadow.interlaced = update.interlaced();
        if update.interlaced() {
            // Field-sequential latching would need per-field window
            // adjustment; only progressive targets are driven today.
        }

        shadow.needs_reset = false;
        shadow.enabled = true;
        shadow.commit_pending = true;
        shadow.last_commit_ns = now_ns();

        shared.vsync.ensure_enabled(&self.regs);
    }

    /// Turn a plane invisible at the blend stage.
    ///
    /// Clears this plane's blend source routing without tearing down the
    /// rest of its state, and suppresses the vsync signal once no active
    /// plane needs it. Disabling an already-disabled plane is a no-op
    /// observable only as redundant register writes.
    pub fn disable(&self, plane: PlaneId) {
        let mut shared = self.shared.lock();
        let pr = plane.regs();

        self.regs
            .write_bits(pr.blend_src_ctrl, OSD_BLEND_POSTBLD_SRC_MASK, 0);

        let state = &mut shared.planes[plane.index()];
        state.shadow.enabled = false;
        state.current.visible = false;

        if !shared.planes.iter().any(|p| p.shadow.enabled) {
            shared.vsync.ensure_disabled(&self.regs);
        }

        klog_debug!("vpu: {:?} disabled", plane);
    }

    /// Push pending dirty register groups to hardware.
    ///
    /// This is the shadow-flush entry point the vsync interrupt handler
    /// invokes at the vsync edge. Bounded and allocation-free; the lock is
    /// held for the duration so a concurrent commit cannot observe a
    /// half-latched transaction.
    pub fn flush(&self) {
        let mut shared = self.shared.lock();

        for plane in [PlaneId::Osd1, PlaneId::Osd2] {
            let pr = plane.regs();
            let shadow = &mut shared.planes[plane.index()].shadow;
            if !shadow.commit_pending {
                continue;
            }

            if shadow.dirty.contains(Dirty::CONFIG) {
                self.regs.write(pr.ctrl_stat, shadow.ctrl_stat);
                self.regs.write(pr.ctrl_stat2, shadow.ctrl_stat2);
                for (reg, value) in pr.blk0_cfg.iter().zip(shadow.blk0_cfg) {
                    self.regs.write(*reg, value);
                }
                self.regs.write(pr.blend_scope_h, shadow.blend_scope_h);
                self.regs.write(pr.blend_scope_v, shadow.blend_scope_v);
                self.regs
                    .write(pr.blend_src_ctrl, OSD_BLEND_PATH_SEL_ENABLE | pr.postbld_src);
            }

            if shadow.dirty.contains(Dirty::FRAME) {
                self.regs
                    .write(pr.canvas_addr, shadow.frame.addr.as_u64() as u32);
                self.regs.write(pr.canvas_stride, shadow.frame.stride);
                self.regs.write(
                    pr.canvas_size,
                    ((shadow.frame.width & 0xffff) << 16) | (shadow.frame.height & 0xffff),
                );
            }

            shadow.dirty = Dirty::empty();
            shadow.commit_pending = false;
        }
    }

    // ------------------------------------------------------------------
    // Observability
    // ------------------------------------------------------------------

    /// Whether a plane is live (committed and not disabled).
    pub fn plane_enabled(&self, plane: PlaneId) -> bool {
        self.shared.lock().planes[plane.index()].shadow.enabled
    }

    /// Fixed stacking position a plane advertises.
    pub fn plane_zpos(&self, plane: PlaneId) -> u8 {
        self.shared.lock().planes[plane.index()].zpos
    }

    /// Snapshot of a plane's shadow state.
    pub fn shadow(&self, plane: PlaneId) -> PlaneShadow {
        self.shared.lock().planes[plane.index()].shadow
    }

    /// Whether a plane has gone the idle window without a commit.
    pub fn plane_is_idle(&self, plane: PlaneId) -> bool {
        self.shared.lock().planes[plane.index()]
            .shadow
            .is_idle(now_ns())
    }

    /// Whether the vsync signal is currently suppressed.
    pub fn vsync_suppressed(&self) -> bool {
        self.shared.lock().vsync.suppressed()
    }
}
