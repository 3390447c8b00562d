//! Canvas-2d render adapter
//!
//! Consumes the per-tick `RenderSnapshot` and draws it. The snapshot is the
//! whole contract: nothing here reads or mutates simulation state directly.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::*;
use crate::sim::RenderSnapshot;

const SKY_COLOR: &str = "#10141f";
const SKY_DANGER_COLOR: &str = "#2a1018";
const GROUND_COLOR: &str = "#2e2a3a";
const PLAYER_COLOR: &str = "#7ecb6a";
const PURSUER_COLOR: &str = "#c0392b";
const SPIKE_COLOR: &str = "#8892a8";

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            ctx,
            width: canvas.width() as f64,
            height: canvas.height() as f64,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width as f64;
        self.height = height as f64;
    }

    /// Draw one frame from the snapshot
    pub fn render(&self, snap: &RenderSnapshot) {
        let ctx = &self.ctx;
        let sx = self.width / VIEW_WIDTH as f64;
        let sy = self.height / VIEW_HEIGHT as f64;
        ctx.save();
        let _ = ctx.scale(sx, sy);

        // Sky, tinted when the pursuer is close
        ctx.set_fill_style_str(if snap.danger { SKY_DANGER_COLOR } else { SKY_COLOR });
        ctx.fill_rect(0.0, 0.0, VIEW_WIDTH as f64, VIEW_HEIGHT as f64);

        // Ground
        ctx.set_fill_style_str(GROUND_COLOR);
        ctx.fill_rect(
            0.0,
            GROUND_Y as f64,
            VIEW_WIDTH as f64,
            (VIEW_HEIGHT - GROUND_Y) as f64,
        );

        // Spikes: triangles on their bounding box
        ctx.set_fill_style_str(SPIKE_COLOR);
        for spike in &snap.obstacles {
            ctx.begin_path();
            ctx.move_to(spike.x as f64, (spike.y + spike.h) as f64);
            ctx.line_to((spike.x + spike.w / 2.0) as f64, spike.y as f64);
            ctx.line_to((spike.x + spike.w) as f64, (spike.y + spike.h) as f64);
            ctx.close_path();
            ctx.fill();
        }

        // Pursuer (may be partly off-screen left)
        if snap.pursuer_x + PLAYER_WIDTH > 0.0 {
            ctx.set_fill_style_str(PURSUER_COLOR);
            ctx.fill_rect(
                snap.pursuer_x as f64,
                (GROUND_Y - PLAYER_HEIGHT) as f64,
                PLAYER_WIDTH as f64,
                PLAYER_HEIGHT as f64,
            );
        }

        // Player, hidden behind the burst once the run is over
        if !snap.game_over {
            ctx.set_fill_style_str(PLAYER_COLOR);
            ctx.fill_rect(
                snap.player.x as f64,
                snap.player.y as f64,
                snap.player.w as f64,
                snap.player.h as f64,
            );
        }

        // Particles fade with remaining life
        for &(pos, life, color) in &snap.particles {
            let alpha = life.clamp(0.0, 1.0);
            let r = (color >> 16) & 0xff;
            let g = (color >> 8) & 0xff;
            let b = color & 0xff;
            ctx.set_fill_style_str(&format!("rgba({r},{g},{b},{alpha:.2})"));
            ctx.fill_rect(pos.x as f64 - 3.0, pos.y as f64 - 3.0, 6.0, 6.0);
        }

        ctx.restore();
    }
}
