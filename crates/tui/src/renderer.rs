use mapscale_core::{Density, derive_breakdown};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::host::App;

/// Base padding (in cells) of the sample panel before scaling.
const SAMPLE_PADDING: f64 = 2.0;

fn density_color(density: Density) -> Color {
    match density {
        Density::Compact => Color::Yellow,
        Density::Normal => Color::Green,
        Density::Spacious => Color::Cyan,
    }
}

fn label(name: &str) -> Span<'static> {
    Span::styled(format!("{name:<16}"), Style::default().fg(Color::Gray))
}

fn value(text: String) -> Span<'static> {
    Span::styled(text, Style::default().fg(Color::White))
}

pub fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(8),
        Constraint::Length(14),
    ])
    .areas(area);
    let [inputs, outputs] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(body);

    let title = Block::default()
        .title(" mapscale | m mode | +/- dpi | [ ] fixed | b breakpoints | r recompute | q quit ")
        .style(Style::default().fg(Color::White).bg(Color::DarkGray));
    frame.render_widget(title, header);

    draw_inputs(frame, app, inputs);
    draw_outputs(frame, app, outputs);
    draw_changes(frame, app, footer);
}

fn draw_inputs(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let config = app.engine.configuration();
    let metrics = app.engine.metrics();
    let (cols, rows) = app.terminal_cells();

    let mut lines = vec![
        Line::from(vec![label("terminal"), value(format!("{cols}×{rows} cells"))]),
        Line::from(vec![
            label("window"),
            value(format!(
                "{:.0}×{:.0} px",
                metrics.window_width, metrics.window_height
            )),
        ]),
        Line::from(vec![label("dpi"), value(format!("{:.0}", metrics.monitor_dpi))]),
        Line::from(""),
        Line::from(vec![label("mode"), value(config.mode.to_string())]),
        Line::from(vec![label("fixed scale"), value(format!("{:.2}", config.fixed_scale))]),
        Line::from(vec![
            label("design"),
            value(format!("{:.0}×{:.0}", config.design_width, config.design_height)),
        ]),
        Line::from(vec![
            label("scale bounds"),
            value(format!("{:.2} – {:.2}", config.min_scale, config.max_scale)),
        ]),
        Line::from(vec![
            label("font bounds"),
            value(format!(
                "{:.2} – {:.2}",
                config.min_font_scale, config.max_font_scale
            )),
        ]),
        Line::from(vec![
            label("breakpoints"),
            value(String::from(if config.breakpoints_enabled {
                "on"
            } else {
                "off"
            })),
        ]),
    ];
    if app.settle_pending {
        lines.push(Line::from(Span::styled(
            "waiting for resize to settle…",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let panel = Paragraph::new(lines).block(
        Block::default()
            .title(" Inputs ")
            .borders(Borders::ALL),
    );
    frame.render_widget(panel, area);
}

fn draw_outputs(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let state = app.engine.state();
    let breakdown = derive_breakdown(app.engine.configuration(), &app.engine.metrics());
    let density_style = Style::default()
        .fg(density_color(state.density))
        .add_modifier(Modifier::BOLD);

    let lines = vec![
        Line::from(vec![
            label("width factor"),
            value(format!("{:.3}", breakdown.width_factor)),
        ]),
        Line::from(vec![
            label("height factor"),
            value(format!("{:.3}", breakdown.height_factor)),
        ]),
        Line::from(vec![
            label("physical"),
            value(format!("{:.3}", breakdown.physical_scale)),
        ]),
        Line::from(vec![label("dpi scale"), value(format!("{:.3}", breakdown.dpi_scale))]),
        Line::from(vec![label("candidate"), value(format!("{:.3}", breakdown.candidate))]),
        Line::from(""),
        Line::from(vec![
            label("effective"),
            value(format!("{:.3}", state.effective_scale)),
        ]),
        Line::from(vec![label("font"), value(format!("{:.3}", state.font_scale))]),
        Line::from(vec![
            label("density"),
            Span::styled(state.density.to_string(), density_style),
        ]),
    ];

    let [numbers, sample] =
        Layout::vertical([Constraint::Length(11), Constraint::Min(3)]).areas(area);
    let panel = Paragraph::new(lines).block(
        Block::default()
            .title(" Published ")
            .borders(Borders::ALL),
    );
    frame.render_widget(panel, numbers);

    // A consumer re-deriving its own geometry from the published scale.
    let padding = (SAMPLE_PADDING * state.effective_scale).round() as u16;
    let sample_panel = Paragraph::new(Line::from(Span::styled(
        format!("padding {padding} cells"),
        density_style,
    )))
    .block(
        Block::default()
            .title(" Sample ")
            .borders(Borders::ALL)
            .padding(Padding::horizontal(padding)),
    );
    frame.render_widget(sample_panel, sample);
}

fn draw_changes(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let lines: Vec<Line<'_>> = app
        .changes
        .borrow()
        .iter()
        .map(|change| Line::from(change.to_string()))
        .collect();
    let panel = Paragraph::new(lines).block(
        Block::default()
            .title(" Changes ")
            .borders(Borders::ALL),
    );
    frame.render_widget(panel, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_tiers_are_told_apart() {
        assert_ne!(density_color(Density::Compact), density_color(Density::Normal));
        assert_ne!(density_color(Density::Normal), density_color(Density::Spacious));
    }
}
