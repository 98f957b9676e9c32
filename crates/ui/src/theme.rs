use mapscale_protocol::{Density, ScaleState};

// ── Typography scale (unscaled) ────────────────────────────────────────────

pub const FONT_TITLE: f32 = 18.0;
pub const FONT_BODY: f32 = 12.0;
pub const FONT_CAPTION: f32 = 11.0;

// ── Spacing (unscaled) ─────────────────────────────────────────────────────

pub const ITEM_SPACING: egui::Vec2 = egui::vec2(8.0, 6.0);
pub const BUTTON_PADDING: egui::Vec2 = egui::vec2(8.0, 4.0);
pub const INTERACT_HEIGHT: f32 = 24.0;

/// Extra spacing multiplier for each density tier.
pub fn density_spacing(density: Density) -> f32 {
    match density {
        Density::Compact => 0.75,
        Density::Normal => 1.0,
        Density::Spacious => 1.25,
    }
}

pub fn density_color(density: Density) -> egui::Color32 {
    match density {
        Density::Compact => egui::Color32::from_rgb(0xf9, 0xe2, 0xaf), // Yellow
        Density::Normal => egui::Color32::from_rgb(0xa6, 0xe3, 0xa1),  // Green
        Density::Spacious => egui::Color32::from_rgb(0x89, 0xdc, 0xeb), // Sky
    }
}

/// Text sizes for `state`: base sizes times the font scale.
pub fn scaled_text_styles(state: &ScaleState) -> [(egui::TextStyle, egui::FontId); 5] {
    let font = state.font_scale as f32;
    [
        (
            egui::TextStyle::Heading,
            egui::FontId::proportional(FONT_TITLE * font),
        ),
        (
            egui::TextStyle::Body,
            egui::FontId::proportional(FONT_BODY * font),
        ),
        (
            egui::TextStyle::Button,
            egui::FontId::proportional(FONT_BODY * font),
        ),
        (
            egui::TextStyle::Small,
            egui::FontId::proportional(FONT_CAPTION * font),
        ),
        (
            egui::TextStyle::Monospace,
            egui::FontId::monospace(FONT_CAPTION * font),
        ),
    ]
}

/// Re-derive egui typography and spacing from the published scale.
pub fn apply_scaled_style(ctx: &egui::Context, state: &ScaleState) {
    let ui = state.effective_scale as f32;
    let spacing = ui * density_spacing(state.density);

    let mut style = (*ctx.style()).clone();
    for (text_style, font_id) in scaled_text_styles(state) {
        style.text_styles.insert(text_style, font_id);
    }
    style.spacing.item_spacing = ITEM_SPACING * spacing;
    style.spacing.button_padding = BUTTON_PADDING * ui;
    style.spacing.interact_size.y = (INTERACT_HEIGHT * ui).round();
    ctx.set_style(style);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_scales_with_font_scale() {
        let state = ScaleState {
            effective_scale: 2.0,
            font_scale: 1.5,
            density: Density::Spacious,
        };
        let styles = scaled_text_styles(&state);
        let (style, heading) = &styles[0];
        assert_eq!(*style, egui::TextStyle::Heading);
        assert!((heading.size - 27.0).abs() < 1e-4);
    }

    #[test]
    fn neutral_state_keeps_base_sizes() {
        let styles = scaled_text_styles(&ScaleState::NEUTRAL);
        assert!((styles[1].1.size - FONT_BODY).abs() < f32::EPSILON);
    }

    #[test]
    fn denser_tiers_tighten_spacing() {
        assert!(density_spacing(Density::Compact) < density_spacing(Density::Normal));
        assert!(density_spacing(Density::Normal) < density_spacing(Density::Spacious));
    }
}
