//! End-to-end pipeline scenario against the RAM-backed register file:
//! init, full commit, vsync flush, fast update, disable.

use glint_abi::{OutputId, OutputMode, OverlayFrame, OverlayRequest, PhysAddr, PixelFormat, Rect};
use glint_vpu::hw::osd_regs::*;
use glint_vpu::{validate, MemRegs, Pipeline, PlaneId, RegisterFile};

fn cursor_frame() -> OverlayFrame {
    OverlayFrame {
        addr: PhysAddr::new(0x3f80_0000),
        stride: 400,
        width: 100,
        height: 50,
    }
}

fn cursor_request(dst: Rect) -> OverlayRequest {
    OverlayRequest::passthrough(OutputId(0), dst, PixelFormat::Argb8888, cursor_frame())
}

fn mode() -> OutputMode {
    OutputMode::progressive(1920, 1080)
}

#[test]
fn init_programs_matrix_fifo_and_blend() {
    let pipeline = Pipeline::new(MemRegs::new());
    pipeline.init();
    let regs = pipeline.regs();

    // Matrix fully programmed on both paths, enable bit set.
    for en_ctrl in [OSD1_MATRIX_EN_CTRL, OSD2_MATRIX_EN_CTRL] {
        assert_eq!(regs.read(en_ctrl) & OSD_MATRIX_EN, OSD_MATRIX_EN);
    }
    assert_eq!(regs.read(OSD1_MATRIX_COEF00_01), regs.read(OSD2_MATRIX_COEF00_01));
    assert_ne!(regs.read(OSD1_MATRIX_COEF00_01), 0);

    // Both FIFOs get the same fixed tuning word.
    let fifo = pipeline.config().fifo.ctrl_word();
    assert_eq!(regs.read(OSD1_FIFO_CTRL_STAT), fifo);
    assert_eq!(regs.read(OSD2_FIFO_CTRL_STAT), fifo);
    assert_eq!(fifo & OSD_DDR_PRIORITY_URGENT, OSD_DDR_PRIORITY_URGENT);
    assert_eq!(fifo & OSD_BURST_LENGTH_32, OSD_BURST_LENGTH_32);

    // Alpha replace value defaults to full opacity on both planes.
    for ctrl_stat2 in [OSD1_CTRL_STAT2, OSD2_CTRL_STAT2] {
        assert_eq!(regs.read(ctrl_stat2) >> OSD_REPLACE_SHIFT & 0xff, 0xff);
    }

    // Blend path select enabled for the overlay sources, video sources off.
    assert_eq!(regs.read(OSD1_BLEND_SRC_CTRL), OSD_BLEND_PATH_SEL_ENABLE);
    assert_eq!(regs.read(OSD2_BLEND_SRC_CTRL), OSD_BLEND_PATH_SEL_ENABLE);
    assert_eq!(regs.read(VD1_BLEND_SRC_CTRL), 0);
    assert_eq!(regs.read(VD2_BLEND_SRC_CTRL), 0);

    // Decompression is fully off.
    assert_eq!(regs.read(DCMP_ENABLE), 0);
    assert_eq!(regs.read(OSD1_UNPACK_CTRL) & OSD_UNPACK_EN, 0);

    // Planes start disabled, vsync suppressed.
    assert!(!pipeline.plane_enabled(PlaneId::Osd1));
    assert!(!pipeline.plane_enabled(PlaneId::Osd2));
    assert!(pipeline.vsync_suppressed());
    assert!(!pipeline.shadow(PlaneId::Osd2).interlaced);
}

#[test]
fn commit_flush_disable_lifecycle() {
    let pipeline = Pipeline::new(MemRegs::new());
    pipeline.init();

    let update = validate(&cursor_request(Rect::from_xywh(0, 0, 100, 50)), &mode()).unwrap();
    pipeline.commit(PlaneId::Osd2, &update);

    assert!(pipeline.plane_enabled(PlaneId::Osd2));
    assert!(!pipeline.vsync_suppressed());
    assert_eq!(pipeline.regs().read(SYNC_INT_CTRL) & SYNC_INT_VSYNC_EN, SYNC_INT_VSYNC_EN);

    pipeline.flush();
    let regs = pipeline.regs();

    // Control word: enabled, max global alpha, block 0 on.
    assert_eq!(
        regs.read(OSD2_CTRL_STAT),
        OSD_ENABLE | (0x100 << OSD_GLOBAL_ALPHA_SHIFT) | OSD_BLK0_ENABLE
    );

    // ARGB keeps the buffer's alpha: replace bit clear.
    assert_eq!(regs.read(OSD2_CTRL_STAT2) & OSD_REPLACE_EN, 0);

    // Canvas, endianness and format selection.
    assert_eq!(
        regs.read(OSD2_BLK0_CFG_W0),
        (0x41 << OSD_CANVAS_SEL) | OSD_ENDIANNESS_LE | OSD_BLK_MODE_32 | OSD_COLOR_ORDER_32_ARGB
    );

    // Window words pack ((end - 1) << 16) | start on both axes.
    assert_eq!(regs.read(OSD2_BLK0_CFG_W1), 99 << 16);
    assert_eq!(regs.read(OSD2_BLK0_CFG_W2), 49 << 16);
    assert_eq!(regs.read(OSD2_BLK0_CFG_W3), 99 << 16);
    assert_eq!(regs.read(OSD2_BLK0_CFG_W4), 49 << 16);
    assert_eq!(regs.read(OSD_BLEND_DIN1_SCOPE_H), 99 << 16);
    assert_eq!(regs.read(OSD_BLEND_DIN1_SCOPE_V), 49 << 16);

    // Buffer descriptor latched into the canvas block.
    assert_eq!(regs.read(OSD2_CANVAS_ADDR), 0x3f80_0000);
    assert_eq!(regs.read(OSD2_CANVAS_STRIDE), 400);
    assert_eq!(regs.read(OSD2_CANVAS_SIZE), (100 << 16) | 50);

    // Blend routing feeds this plane into the post-blend stage.
    assert_eq!(
        regs.read(OSD2_BLEND_SRC_CTRL),
        OSD_BLEND_PATH_SEL_ENABLE | OSD_BLEND_POSTBLD_SRC_OSD2
    );

    pipeline.disable(PlaneId::Osd2);
    assert!(!pipeline.plane_enabled(PlaneId::Osd2));
    assert!(pipeline.vsync_suppressed());
    assert_eq!(pipeline.regs().read(SYNC_INT_CTRL) & SYNC_INT_VSYNC_EN, 0);
    // Routing bit cleared, path select preserved.
    assert_eq!(
        pipeline.regs().read(OSD2_BLEND_SRC_CTRL),
        OSD_BLEND_PATH_SEL_ENABLE
    );
}

#[test]
fn fast_update_moves_cursor_without_revalidation() {
    let pipeline = Pipeline::new(MemRegs::new());
    pipeline.init();

    let update = validate(&cursor_request(Rect::from_xywh(0, 0, 100, 50)), &mode()).unwrap();
    pipeline.commit(PlaneId::Osd2, &update);
    pipeline.flush();
    let canvas_addr = pipeline.regs().read(OSD2_CANVAS_ADDR);

    // Same buffer, new position: only the config group re-latches.
    let moved = cursor_request(Rect::from_xywh(640, 360, 100, 50));
    let approved = pipeline.validate_fast(PlaneId::Osd2, &moved, &mode()).unwrap();
    pipeline.commit_fast(PlaneId::Osd2, &approved);
    pipeline.flush();

    let regs = pipeline.regs();
    assert_eq!(regs.read(OSD2_BLK0_CFG_W3), (739 << 16) | 640);
    assert_eq!(regs.read(OSD2_BLK0_CFG_W4), (409 << 16) | 360);
    assert_eq!(regs.read(OSD2_CANVAS_ADDR), canvas_addr);
}

#[test]
fn partially_offscreen_cursor_is_clipped_to_bounds() {
    let pipeline = Pipeline::new(MemRegs::new());
    pipeline.init();

    let update = validate(
        &cursor_request(Rect::from_xywh(1870, 1040, 100, 50)),
        &mode(),
    )
    .unwrap();
    pipeline.commit(PlaneId::Osd2, &update);
    pipeline.flush();

    let regs = pipeline.regs();
    // Destination clipped to [1870, 1920) x [1040, 1080).
    assert_eq!(regs.read(OSD2_BLK0_CFG_W3), (1919 << 16) | 1870);
    assert_eq!(regs.read(OSD2_BLK0_CFG_W4), (1079 << 16) | 1040);
    // Source window shrinks to the visible 50x40.
    assert_eq!(regs.read(OSD2_BLK0_CFG_W1), 49 << 16);
    assert_eq!(regs.read(OSD2_BLK0_CFG_W2), 39 << 16);
}
