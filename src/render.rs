//! Canvas-2D renderer
//!
//! Consumes the engine's [`FrameParams`] and draws with plain canvas
//! primitives. All geometry is in a coordinate space centered on the
//! canvas midpoint; only this module knows about pixels.

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::engine::frame::Rgb;
use crate::engine::{chain, FractureView, FrameParams, HeartParams};

const CHAIN_COLOR: &str = "rgb(100, 100, 120)";

/// Rainbow ray palette, red deliberately excluded
const RAY_COLORS: [(f32, f32, f32); 6] = [
    (255.0, 165.0, 0.0),
    (255.0, 220.0, 50.0),
    (100.0, 200.0, 100.0),
    (50.0, 200.0, 200.0),
    (100.0, 150.0, 255.0),
    (180.0, 100.0, 255.0),
];

fn rgba(c: Rgb, a: f32) -> String {
    format!(
        "rgba({}, {}, {}, {})",
        c.r.round(),
        c.g.round(),
        c.b.round(),
        a.clamp(0.0, 1.0)
    )
}

pub struct Renderer {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl Renderer {
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

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Draw one frame from the engine's descriptor.
    pub fn render(&self, params: &FrameParams, now_ms: f64) {
        let ctx = &self.ctx;

        ctx.set_fill_style_str(&rgba(params.background, 1.0));
        ctx.fill_rect(0.0, 0.0, self.width, self.height);

        ctx.save();
        let _ = ctx.translate(self.width / 2.0, self.height / 2.0);

        if params.rays_alpha > 0.0 {
            self.draw_rays(params.rays_alpha, now_ms);
        }
        if let Some(glow) = &params.ambient_glow {
            self.draw_ambient_glow(glow.alpha, glow.size, params.heart.map_or(1.0, |h| h.scale));
        }
        if params.freedom_glow_alpha > 0.0 {
            self.draw_freedom_glow(params.freedom_glow_alpha, now_ms);
        }
        if let Some(heart) = &params.heart {
            self.draw_heart(heart);
            if params.chain_intact {
                // Chain scales with the beating heart it binds
                ctx.save();
                let _ = ctx.scale(heart.scale as f64, heart.scale as f64);
                self.draw_chain();
                ctx.restore();
            }
        }
        if let Some(fx) = &params.fracture {
            self.draw_fracture(fx);
        }

        ctx.restore();

        self.draw_text(params);

        if params.overlay_alpha > 0.0 {
            ctx.set_fill_style_str(&rgba(Rgb::new(0.0, 0.0, 0.0), params.overlay_alpha));
            ctx.fill_rect(0.0, 0.0, self.width, self.height);
        }
    }

    fn ellipse(&self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.begin_path();
        let _ = self
            .ctx
            .ellipse(x, y, w / 2.0, h / 2.0, 0.0, 0.0, TAU);
        self.ctx.fill();
    }

    /// Dull red glow that intensifies with tension
    fn draw_ambient_glow(&self, alpha: f32, size: f32, heart_scale: f32) {
        for i in (1..=4).rev() {
            let f = i as f32 / 4.0;
            self.ctx
                .set_fill_style_str(&rgba(Rgb::new(139.0, 0.0, 23.0), alpha * f));
            self.ellipse(0.0, 0.0, (size * f) as f64, (size * f) as f64);
        }
        // Pulsing core synchronized with the heartbeat
        self.ctx.set_fill_style_str(&rgba(
            Rgb::new(200.0, 50.0, 60.0),
            alpha * 0.5 * heart_scale,
        ));
        self.ellipse(0.0, 0.0, 300.0, 300.0);
    }

    /// Six spiral-edged wedges rotating slowly behind the freed heart
    fn draw_rays(&self, alpha: f32, now_ms: f64) {
        let ctx = &self.ctx;
        let num_rays = RAY_COLORS.len();
        let time = now_ms * 0.0003;
        let max_dist = self.width.max(self.height);

        for (i, &(r, g, b)) in RAY_COLORS.iter().enumerate() {
            let base_angle = TAU / num_rays as f64 * i as f64 + time;
            let next_angle = TAU / num_rays as f64 * (i + 1) as f64 + time;

            ctx.set_fill_style_str(&rgba(Rgb::new(r, g, b), 40.0 / 255.0 * alpha));
            ctx.begin_path();
            ctx.move_to(0.0, 0.0);

            // Spiral edge out
            let mut rr = 0.0;
            while rr <= 1.0 {
                let angle = base_angle + rr * 0.3;
                ctx.line_to(angle.cos() * rr * max_dist, angle.sin() * rr * max_dist);
                rr += 0.05;
            }
            // Outer arc
            let mut a = 0.0;
            while a <= 1.0 {
                let angle = base_angle + 0.3 + (next_angle - base_angle) * a;
                ctx.line_to(angle.cos() * max_dist, angle.sin() * max_dist);
                a += 0.1;
            }
            // Spiral edge back in
            let mut rr = 1.0;
            while rr >= 0.0 {
                let angle = next_angle + rr * 0.3;
                ctx.line_to(angle.cos() * rr * max_dist, angle.sin() * rr * max_dist);
                rr -= 0.05;
            }
            ctx.close_path();
            ctx.fill();
        }
    }

    /// Warm golden glow around the freed heart
    fn draw_freedom_glow(&self, alpha: f32, now_ms: f64) {
        for i in (1..=5).rev() {
            let f = i as f32 / 5.0;
            self.ctx.set_fill_style_str(&rgba(
                Rgb::new(255.0, 215.0, 100.0),
                8.0 / 255.0 * f * alpha,
            ));
            self.ellipse(0.0, 0.0, (500.0 * f) as f64, (500.0 * f) as f64);
        }
        let pulse = (80.0 + ((now_ms * 0.002).sin() * 10.0) as f32) / 255.0;
        self.ctx
            .set_fill_style_str(&rgba(Rgb::new(255.0, 240.0, 200.0), pulse * alpha));
        self.ellipse(0.0, 0.0, 350.0, 350.0);
    }

    fn heart_path(&self, top: f64, cx: f64, cy: f64, wx: f64, wy: f64, bottom: f64) {
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(0.0, top);
        ctx.bezier_curve_to(cx, cy, wx, wy, 0.0, bottom);
        ctx.bezier_curve_to(-wx, wy, -cx, cy, 0.0, top);
        ctx.close_path();
        ctx.fill();
    }

    fn draw_heart(&self, heart: &HeartParams) {
        let ctx = &self.ctx;
        ctx.save();
        let _ = ctx.scale(heart.scale as f64, heart.scale as f64);

        let a = heart.alpha;
        if heart.healthy {
            ctx.set_fill_style_str(&rgba(Rgb::new(255.0, 59.0, 71.0), a));
            self.heart_path(-130.0, 100.0, -200.0, 220.0, -40.0, 160.0);

            ctx.set_fill_style_str(&rgba(Rgb::new(255.0, 100.0, 110.0), 100.0 / 255.0 * a));
            self.heart_path(-110.0, 70.0, -150.0, 140.0, -40.0, 130.0);

            ctx.set_fill_style_str(&rgba(Rgb::new(255.0, 200.0, 200.0), 60.0 / 255.0 * a));
            self.heart_path(-135.0, 105.0, -205.0, 225.0, -45.0, 165.0);

            // Golden highlight
            ctx.set_fill_style_str(&rgba(Rgb::new(255.0, 240.0, 150.0), 80.0 / 255.0 * a));
            self.ellipse(-50.0, -50.0, 30.0, 50.0);
        } else {
            let b = heart.brightness;
            ctx.set_fill_style_str(&rgba(Rgb::new(109.0 + b, 0.0, 23.0 + b), a));
            self.heart_path(-130.0, 100.0, -200.0, 220.0, -40.0, 160.0);

            ctx.set_fill_style_str(&rgba(Rgb::new(138.0 + b, 0.0, 34.0 + b), 114.0 / 255.0 * a));
            self.heart_path(-110.0, 70.0, -150.0, 140.0, -40.0, 130.0);

            ctx.set_fill_style_str(&rgba(
                Rgb::new(255.0, 60.0, 80.0),
                (10.0 + b) / 255.0 * a,
            ));
            self.heart_path(-135.0, 105.0, -205.0, 225.0, -45.0, 165.0);

            // Pale highlight, brightening as tension climbs
            ctx.set_fill_style_str(&rgba(
                Rgb::new(255.0, 255.0, 255.0),
                (10.0 + b / 3.0) / 255.0 * a,
            ));
            self.ellipse(-50.0, -50.0, 30.0, 50.0);
        }
        ctx.restore();
    }

    fn draw_bead(&self, x: f64, y: f64, size: f64, alpha: f32) {
        // Shadow, base, highlight
        self.ctx
            .set_fill_style_str(&rgba(Rgb::new(50.0, 50.0, 50.0), 200.0 / 255.0 * alpha));
        self.ellipse(x + 2.0, y + 2.0, size, size);
        self.ctx
            .set_fill_style_str(&rgba(Rgb::new(217.0, 217.0, 217.0), alpha));
        self.ellipse(x, y, size, size);
        self.ctx
            .set_fill_style_str(&rgba(Rgb::new(255.0, 255.0, 255.0), 150.0 / 255.0 * alpha));
        self.ellipse(x - size * 0.2, y - size * 0.2, size * 0.3, size * 0.3);
    }

    fn draw_cross(&self, alpha: f32) {
        let ctx = &self.ctx;
        // Shadow
        ctx.set_fill_style_str(&rgba(Rgb::new(30.0, 30.0, 40.0), 200.0 / 255.0 * alpha));
        ctx.fill_rect(-1.0, -13.0, 6.0, 30.0);
        ctx.fill_rect(-8.0, -3.0, 20.0, 6.0);
        // Base
        ctx.set_fill_style_str(&rgba(Rgb::new(100.0, 100.0, 120.0), alpha));
        ctx.fill_rect(-3.0, -15.0, 6.0, 30.0);
        ctx.fill_rect(-10.0, -5.0, 20.0, 6.0);
        // Highlight
        ctx.set_fill_style_str(&rgba(Rgb::new(150.0, 150.0, 170.0), alpha));
        ctx.fill_rect(-2.0, -15.0, 2.0, 28.0);
    }

    /// Intact ornament: two strands in an X, pendant drop, cross
    fn draw_chain(&self) {
        let ctx = &self.ctx;

        ctx.set_stroke_style_str(CHAIN_COLOR);
        ctx.set_line_width(2.0);
        for strand in 0..2 {
            let (from, to) = chain::strand_curve(strand);
            ctx.begin_path();
            ctx.move_to(from.x as f64, from.y as f64);
            ctx.line_to(to.x as f64, to.y as f64);
            ctx.stroke();

            for bead in chain::strand_beads(strand) {
                self.draw_bead(bead.pos.x as f64, bead.pos.y as f64, bead.size as f64, 1.0);
            }
        }

        // Pendant cord down to the cross
        ctx.set_stroke_style_str(CHAIN_COLOR);
        ctx.begin_path();
        ctx.move_to(0.0, 5.0);
        ctx.line_to(0.0, chain::CROSS_ANCHOR.y as f64);
        ctx.stroke();

        for bead in chain::pendant_beads() {
            self.draw_bead(bead.pos.x as f64, bead.pos.y as f64, bead.size as f64, 1.0);
        }

        ctx.save();
        let _ = ctx.translate(chain::CROSS_ANCHOR.x as f64, chain::CROSS_ANCHOR.y as f64);
        self.draw_cross(1.0);
        ctx.restore();
    }

    /// Scattering debris while the chain breaks
    fn draw_fracture(&self, fx: &FractureView) {
        if fx.fade <= 0.0 {
            return;
        }
        let ctx = &self.ctx;
        for bead in fx.beads {
            ctx.save();
            let _ = ctx.translate(bead.pos.x as f64, bead.pos.y as f64);
            let _ = ctx.rotate(bead.rotation as f64);
            self.draw_bead(0.0, 0.0, bead.size as f64, fx.fade);
            ctx.restore();
        }
        if let Some(cross) = fx.cross {
            ctx.save();
            let _ = ctx.translate(cross.pos.x as f64, cross.pos.y as f64);
            let _ = ctx.rotate(cross.rotation as f64);
            self.draw_cross(fx.fade);
            ctx.restore();
        }
    }

    fn draw_text(&self, params: &FrameParams) {
        let ctx = &self.ctx;

        if params.instruction_visible {
            ctx.set_fill_style_str("rgb(255, 255, 255)");
            ctx.set_font("48px Georgia, serif");
            ctx.set_text_align("center");
            let _ = ctx.fill_text(
                "Click fast to break free",
                self.width / 2.0,
                self.height / 2.0 - 300.0,
            );
        }

        ctx.set_fill_style_str(if params.dark_text {
            "rgb(0, 0, 0)"
        } else {
            "rgb(255, 255, 255)"
        });
        ctx.set_font("11px Helvetica, sans-serif");
        ctx.set_text_align("left");
        let _ = ctx.fill_text("Procedural audio - no samples", 10.0, self.height - 10.0);
    }
}
