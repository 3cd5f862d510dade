//! Overlay (OSD) block register map and field definitions.
//!
//! Offsets are byte offsets into the VPU register window. The two overlay
//! planes expose identical register blocks at different offsets; the
//! per-plane [`PlaneRegs`] tables below keep the commit engine free of
//! plane-number arithmetic.

use crate::regio::Reg;

// ============================================================================
// OSD1 (primary overlay) block
// ============================================================================

/// OSD1 control/status: enable, global alpha, block enable
pub const OSD1_CTRL_STAT: Reg = Reg(0x000);
/// OSD1 control/status 2: alpha replace value and enable
pub const OSD1_CTRL_STAT2: Reg = Reg(0x004);
/// OSD1 block 0 configuration word 0: canvas, endianness, format
pub const OSD1_BLK0_CFG_W0: Reg = Reg(0x010);
/// OSD1 block 0 configuration word 1: source window, x axis
pub const OSD1_BLK0_CFG_W1: Reg = Reg(0x014);
/// OSD1 block 0 configuration word 2: source window, y axis
pub const OSD1_BLK0_CFG_W2: Reg = Reg(0x018);
/// OSD1 block 0 configuration word 3: destination window, x axis
pub const OSD1_BLK0_CFG_W3: Reg = Reg(0x01C);
/// OSD1 block 0 configuration word 4: destination window, y axis
pub const OSD1_BLK0_CFG_W4: Reg = Reg(0x020);
/// OSD1 scanout FIFO tuning
pub const OSD1_FIFO_CTRL_STAT: Reg = Reg(0x024);
/// OSD1 decompression unpack control
pub const OSD1_UNPACK_CTRL: Reg = Reg(0x028);

// ============================================================================
// OSD2 (cursor overlay) block
// ============================================================================

/// OSD2 control/status
pub const OSD2_CTRL_STAT: Reg = Reg(0x080);
/// OSD2 control/status 2
pub const OSD2_CTRL_STAT2: Reg = Reg(0x084);
/// OSD2 block 0 configuration word 0
pub const OSD2_BLK0_CFG_W0: Reg = Reg(0x090);
/// OSD2 block 0 configuration word 1
pub const OSD2_BLK0_CFG_W1: Reg = Reg(0x094);
/// OSD2 block 0 configuration word 2
pub const OSD2_BLK0_CFG_W2: Reg = Reg(0x098);
/// OSD2 block 0 configuration word 3
pub const OSD2_BLK0_CFG_W3: Reg = Reg(0x09C);
/// OSD2 block 0 configuration word 4
pub const OSD2_BLK0_CFG_W4: Reg = Reg(0x0A0);
/// OSD2 scanout FIFO tuning
pub const OSD2_FIFO_CTRL_STAT: Reg = Reg(0x0A4);
/// OSD2 decompression unpack control
pub const OSD2_UNPACK_CTRL: Reg = Reg(0x0A8);

// ============================================================================
// Canvas blocks (scanout buffer descriptors)
// ============================================================================

/// OSD1 canvas physical base address
pub const OSD1_CANVAS_ADDR: Reg = Reg(0x100);
/// OSD1 canvas stride in bytes
pub const OSD1_CANVAS_STRIDE: Reg = Reg(0x104);
/// OSD1 canvas size, width in the high half, height in the low half
pub const OSD1_CANVAS_SIZE: Reg = Reg(0x108);
/// OSD2 canvas physical base address
pub const OSD2_CANVAS_ADDR: Reg = Reg(0x110);
/// OSD2 canvas stride in bytes
pub const OSD2_CANVAS_STRIDE: Reg = Reg(0x114);
/// OSD2 canvas size
pub const OSD2_CANVAS_SIZE: Reg = Reg(0x118);

// ============================================================================
// Blend unit
// ============================================================================

/// Blend stage reorder/enable/hold-lines control
pub const OSD_BLEND_CTRL: Reg = Reg(0x180);
/// Dummy blend color for disabled inputs
pub const OSD_BLEND_DUMMY_DATA0: Reg = Reg(0x184);
/// Dummy blend alpha for disabled inputs
pub const OSD_BLEND_DUMMY_ALPHA: Reg = Reg(0x188);
/// OSD1 blend source routing
pub const OSD1_BLEND_SRC_CTRL: Reg = Reg(0x18C);
/// OSD2 blend source routing
pub const OSD2_BLEND_SRC_CTRL: Reg = Reg(0x190);
/// Video plane 1 blend source routing
pub const VD1_BLEND_SRC_CTRL: Reg = Reg(0x194);
/// Video plane 2 blend source routing
pub const VD2_BLEND_SRC_CTRL: Reg = Reg(0x198);
/// Blend input 0 horizontal scope
pub const OSD_BLEND_DIN0_SCOPE_H: Reg = Reg(0x19C);
/// Blend input 0 vertical scope
pub const OSD_BLEND_DIN0_SCOPE_V: Reg = Reg(0x1A0);
/// Blend input 1 horizontal scope
pub const OSD_BLEND_DIN1_SCOPE_H: Reg = Reg(0x1A4);
/// Blend input 1 vertical scope
pub const OSD_BLEND_DIN1_SCOPE_V: Reg = Reg(0x1A8);

// ============================================================================
// Color conversion matrix blocks
// ============================================================================

/// OSD1 matrix pre-offsets 0 and 1
pub const OSD1_MATRIX_PRE_OFFSET0_1: Reg = Reg(0x200);
/// OSD1 matrix pre-offset 2
pub const OSD1_MATRIX_PRE_OFFSET2: Reg = Reg(0x204);
/// OSD1 matrix coefficients 00 and 01
pub const OSD1_MATRIX_COEF00_01: Reg = Reg(0x208);
/// OSD1 matrix coefficients 02 and 10
pub const OSD1_MATRIX_COEF02_10: Reg = Reg(0x20C);
/// OSD1 matrix coefficients 11 and 12
pub const OSD1_MATRIX_COEF11_12: Reg = Reg(0x210);
/// OSD1 matrix coefficients 20 and 21
pub const OSD1_MATRIX_COEF20_21: Reg = Reg(0x214);
/// OSD1 matrix coefficient 22
pub const OSD1_MATRIX_COEF22: Reg = Reg(0x218);
/// OSD1 matrix post-offsets 0 and 1
pub const OSD1_MATRIX_OFFSET0_1: Reg = Reg(0x21C);
/// OSD1 matrix post-offset 2
pub const OSD1_MATRIX_OFFSET2: Reg = Reg(0x220);
/// OSD1 matrix enable
pub const OSD1_MATRIX_EN_CTRL: Reg = Reg(0x224);
/// OSD2 matrix pre-offsets 0 and 1
pub const OSD2_MATRIX_PRE_OFFSET0_1: Reg = Reg(0x240);
/// OSD2 matrix pre-offset 2
pub const OSD2_MATRIX_PRE_OFFSET2: Reg = Reg(0x244);
/// OSD2 matrix coefficients 00 and 01
pub const OSD2_MATRIX_COEF00_01: Reg = Reg(0x248);
/// OSD2 matrix coefficients 02 and 10
pub const OSD2_MATRIX_COEF02_10: Reg = Reg(0x24C);
/// OSD2 matrix coefficients 11 and 12
pub const OSD2_MATRIX_COEF11_12: Reg = Reg(0x250);
/// OSD2 matrix coefficients 20 and 21
pub const OSD2_MATRIX_COEF20_21: Reg = Reg(0x254);
/// OSD2 matrix coefficient 22
pub const OSD2_MATRIX_COEF22: Reg = Reg(0x258);
/// OSD2 matrix post-offsets 0 and 1
pub const OSD2_MATRIX_OFFSET0_1: Reg = Reg(0x25C);
/// OSD2 matrix post-offset 2
pub const OSD2_MATRIX_OFFSET2: Reg = Reg(0x260);
/// OSD2 matrix enable
pub const OSD2_MATRIX_EN_CTRL: Reg = Reg(0x264);

// ============================================================================
// Shared pipeline registers
// ============================================================================

/// OSD1 HDR stage control
pub const OSD1_HDR2_CTRL: Reg = Reg(0x280);
/// Overlay path routing miscellanea
pub const OSD_PATH_MISC_CTRL: Reg = Reg(0x284);
/// Pipeline misc control 0 (video deinterlace/decompression routing)
pub const VPU_MISC_CTRL0: Reg = Reg(0x288);
/// Global decompression enable
pub const DCMP_ENABLE: Reg = Reg(0x28C);
/// Video plane 1 luma fetch FIFO size
pub const VD1_IF0_LUMA_FIFO_SIZE: Reg = Reg(0x290);
/// Video plane 2 luma fetch FIFO size
pub const VD2_IF0_LUMA_FIFO_SIZE: Reg = Reg(0x294);
/// Downstream processing block bypass control
pub const BYPASS_PATH_CTRL: Reg = Reg(0x298);
/// Sync generator interrupt control
pub const SYNC_INT_CTRL: Reg = Reg(0x29C);

// ============================================================================
// OSD_CTRL_STAT fields
// ============================================================================

/// Overlay enable
pub const OSD_ENABLE: u32 = 1 << 0;
/// Block 0 enable
pub const OSD_BLK0_ENABLE: u32 = 1 << 4;
/// Global alpha field position (9 bits, 0x100 = fully opaque)
pub const OSD_GLOBAL_ALPHA_SHIFT: u32 = 12;

// ============================================================================
// OSD_CTRL_STAT2 fields
// ============================================================================

/// Replace the per-pixel alpha byte with the replace value
pub const OSD_REPLACE_EN: u32 = 1 << 14;
/// Alpha replace value field position (8 bits)
pub const OSD_REPLACE_SHIFT: u32 = 6;

// ============================================================================
// OSD_BLK0_CFG_W0 fields
// ============================================================================

/// Canvas selector field position (8 bits)
pub const OSD_CANVAS_SEL: u32 = 16;
/// Little-endian scanout
pub const OSD_ENDIANNESS_LE: u32 = 1 << 15;
/// 16-bit block mode
pub const OSD_BLK_MODE_16: u32 = 4 << 8;
/// 32-bit block mode
pub const OSD_BLK_MODE_32: u32 = 5 << 8;
/// 24-bit block mode
pub const OSD_BLK_MODE_24: u32 = 7 << 8;
/// Channel order: 32-bit ARGB
pub const OSD_COLOR_ORDER_32_ARGB: u32 = 1 << 2;
/// Channel order: 32-bit ABGR
pub const OSD_COLOR_ORDER_32_ABGR: u32 = 2 << 2;
/// Channel order: 24-bit RGB
pub const OSD_COLOR_ORDER_24_RGB: u32 = 0 << 2;
/// Channel order: 16-bit RGB565
pub const OSD_COLOR_ORDER_16_RGB565: u32 = 4 << 2;

// ============================================================================
// OSD_FIFO_CTRL_STAT fields
// ============================================================================

/// Urgent DDR arbitration priority for scanout fetches
pub const OSD_DDR_PRIORITY_URGENT: u32 = 1 << 0;
/// 32-unit burst length selector
pub const OSD_BURST_LENGTH_32: u32 = 1 << 11;

/// FIFO limit field (4 bits).
pub const fn osd_fifo_limits(limits: u32) -> u32 {
    (limits & 0xf) << 2
}

/// Lines of FIFO to hold before scanout starts (5 bits).
pub const fn osd_hold_fifo_lines(lines: u32) -> u32 {
    (lines & 0x1f) << 6
}

/// FIFO depth in 8-word units (7 bits).
pub const fn osd_fifo_depth_val(depth: u32) -> u32 {
    (depth & 0x7f) << 13
}

/// Words fetched per burst, encoded as words/2 (2 bits).
pub const fn osd_words_per_burst(words: u32) -> u32 {
    ((words >> 1) & 0x3) << 22
}

// ============================================================================
// OSD_UNPACK_CTRL fields
// ============================================================================

/// Decompression unpack enable
pub const OSD_UNPACK_EN: u32 = 1 << 31;
/// All four channel reorder fields
pub const OSD_UNPACK_REORDER_MASK: u32 = 0xffff;
/// Channel selector values for the reorder fields
pub const OSD_UNPACK_SEL_R: u32 = 1;
pub const OSD_UNPACK_SEL_G: u32 = 2;
pub const OSD_UNPACK_SEL_B: u32 = 3;
pub const OSD_UNPACK_SEL_A: u32 = 4;

/// Compose a reorder word from per-slot channel selectors.
pub const fn osd_unpack_order(r: u32, g: u32, b: u32, a: u32) -> u32 {
    (r & 0xf) | (g & 0xf) << 4 | (b & 0xf) << 8 | (a & 0xf) << 12
}

/// Straight ARGB unpack order
pub const OSD_UNPACK_ORDER_ARGB: u32 = osd_unpack_order(
    OSD_UNPACK_SEL_R,
    OSD_UNPACK_SEL_G,
    OSD_UNPACK_SEL_B,
    OSD_UNPACK_SEL_A,
);
/// R/B-swapped unpack order
pub const OSD_UNPACK_ORDER_ABGR: u32 = osd_unpack_order(
    OSD_UNPACK_SEL_B,
    OSD_UNPACK_SEL_G,
    OSD_UNPACK_SEL_R,
    OSD_UNPACK_SEL_A,
);

// ============================================================================
// Blend unit fields
// ============================================================================

/// Premultiply/reorder selector for one blend input (4 bits per input).
pub const fn osd_blend_reorder(input: u32, sel: u32) -> u32 {
    (sel & 0xf) << (input * 4)
}

/// Blend input enable bits (one per input).
pub const fn osd_blend_din_en(inputs: u32) -> u32 {
    (inputs & 0xf) << 20
}

/// Route blend input 0 straight to output 0
pub const OSD_BLEND_DIN0_BYPASS_TO_DOUT0: u32 = 1 << 26;

/// Premultiplied alpha enable for the second blender.
pub const fn osd_blend_blen2_premult_en(premult: u32) -> u32 {
    (premult & 0x1) << 27
}

/// Lines the blend stage holds before release (3 bits).
pub const fn osd_blend_hold_lines(lines: u32) -> u32 {
    (lines & 0x7) << 29
}

/// Post-blend source selector field
pub const OSD_BLEND_POSTBLD_SRC_MASK: u32 = 0xf << 8;
/// Post-blend source: OSD1
pub const OSD_BLEND_POSTBLD_SRC_OSD1: u32 = 3 << 8;
/// Post-blend source: OSD2
pub const OSD_BLEND_POSTBLD_SRC_OSD2: u32 = 4 << 8;
/// Blend path select enable
pub const OSD_BLEND_PATH_SEL_ENABLE: u32 = 1 << 20;

// ============================================================================
// Shared pipeline fields
// ============================================================================

/// HDR stage: matrix-only mode
pub const OSD1_HDR2_CTRL_REG_ONLY_MAT: u32 = 1 << 16;
/// HDR stage: VDIN0 top enable
pub const OSD1_HDR2_CTRL_VDIN0_HDR2_TOP_EN: u32 = 1 << 13;

/// Route OSD1 fetches through the decompression engine
pub const OSD_PATH_SEL_OSD1_DCMP: u32 = 1 << 4;

/// Video plane 1 deinterlace/decompression routing bits
pub const VPU_MISC_VD1_DCMP_MASK: u32 = 0x17 << 16;

/// Matrix enable bit in the EN_CTRL registers
pub const OSD_MATRIX_EN: u32 = 1 << 0;

/// Downstream block bypass enable field.
pub const fn bypass_path_en(bits: u32) -> u32 {
    bits & 0xf
}

/// Vsync interrupt enable
pub const SYNC_INT_VSYNC_EN: u32 = 1 << 0;

// ============================================================================
// Per-plane register tables
// ============================================================================

/// Register assignment for one overlay plane.
///
/// Both planes run the same commit engine; only the registers, the blend
/// input and the canvas index differ.
pub struct PlaneRegs {
    pub ctrl_stat: Reg,
    pub ctrl_stat2: Reg,
    pub blk0_cfg: [Reg; 5],
    pub fifo_ctrl_stat: Reg,
    pub unpack_ctrl: Reg,
    pub canvas_addr: Reg,
    pub canvas_stride: Reg,
    pub canvas_size: Reg,
    pub blend_src_ctrl: Reg,
    pub blend_scope_h: Reg,
    pub blend_scope_v: Reg,
    /// Post-blend source selector for this plane
    pub postbld_src: u32,
    /// Fixed canvas index this plane scans out of
    pub canvas_index: u32,
}

/// OSD1 register assignment (blend input 0).
pub const OSD1_REGS: PlaneRegs = PlaneRegs {
    ctrl_stat: OSD1_CTRL_STAT,
    ctrl_stat2: OSD1_CTRL_STAT2,
    blk0_cfg: [
        OSD1_BLK0_CFG_W0,
        OSD1_BLK0_CFG_W1,
        OSD1_BLK0_CFG_W2,
        OSD1_BLK0_CFG_W3,
        OSD1_BLK0_CFG_W4,
    ],
    fifo_ctrl_stat: OSD1_FIFO_CTRL_STAT,
    unpack_ctrl: OSD1_UNPACK_CTRL,
    canvas_addr: OSD1_CANVAS_ADDR,
    canvas_stride: OSD1_CANVAS_STRIDE,
    canvas_size: OSD1_CANVAS_SIZE,
    blend_src_ctrl: OSD1_BLEND_SRC_CTRL,
    blend_scope_h: OSD_BLEND_DIN0_SCOPE_H,
    blend_scope_v: OSD_BLEND_DIN0_SCOPE_V,
    postbld_src: OSD_BLEND_POSTBLD_SRC_OSD1,
    canvas_index: 0x40,
};

/// OSD2 register assignment (blend input 1).
pub const OSD2_REGS: PlaneRegs = PlaneRegs {
    ctrl_stat: OSD2_CTRL_STAT,
    ctrl_stat2: OSD2_CTRL_STAT2,
    blk0_cfg: [
        OSD2_BLK0_CFG_W0,
        OSD2_BLK0_CFG_W1,
        OSD2_BLK0_CFG_W2,
        OSD2_BLK0_CFG_W3,
        OSD2_BLK0_CFG_W4,
    ],
    fifo_ctrl_stat: OSD2_FIFO_CTRL_STAT,
    unpack_ctrl: OSD2_UNPACK_CTRL,
    canvas_addr: OSD2_CANVAS_ADDR,
    canvas_stride: OSD2_CANVAS_STRIDE,
    canvas_size: OSD2_CANVAS_SIZE,
    blend_src_ctrl: OSD2_BLEND_SRC_CTRL,
    blend_scope_h: OSD_BLEND_DIN1_SCOPE_H,
    blend_scope_v: OSD_BLEND_DIN1_SCOPE_V,
    postbld_src: OSD_BLEND_POSTBLD_SRC_OSD2,
    canvas_index: 0x41,
};
