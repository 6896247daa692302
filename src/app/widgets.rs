use ratatui::{prelude::*, style::palette::tailwind};

use crate::{
    app::view::{FlowState, FlowView, MeterView, Size},
    mapper::Rgb,
};

const TRACK: Color = Color::DarkGray;

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb(rgb.0, rgb.1, rgb.2)
    }
}

/// Label line followed by one bar line.
pub struct MeterBar<'a> {
    view: &'a MeterView,
}

impl<'a> MeterBar<'a> {
    pub const HEIGHT: u16 = 2;

    pub fn new(view: &'a MeterView) -> Self {
        Self { view }
    }

    fn label_style(&self) -> Style {
        let mut style = Style::default().fg(self.view.color.into());
        if self.view.size == Size::Large {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.view.warning {
            style = style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
        }
        style
    }

    fn column(percent: f64, width: u16) -> u16 {
        let col = (percent.clamp(0.0, 100.0) * f64::from(width) / 100.0).round();
        col as u16
    }
}

impl Widget for MeterBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let label = if self.view.warning {
            format!("! {}", self.view.label)
        } else {
            self.view.label.clone()
        };
        buf.set_stringn(area.x, area.y, label, area.width as usize, self.label_style());

        if area.height < Self::HEIGHT {
            return;
        }
        let y = area.y + 1;
        let bar = &self.view.bar;
        let start = Self::column(bar.offset_percent, area.width);
        let end = Self::column(bar.offset_percent + bar.fill_percent, area.width);
        let zero = bar.zero_percent.map(|z| Self::column(z, area.width));
        let fill: Color = self.view.color.into();

        // Negative fills are striped pointing back towards zero.
        let stripe = if bar.inverse { "◂" } else { " " };
        for dx in 0..area.width {
            let cell = &mut buf[(area.x + dx, y)];
            let filled = dx >= start && dx < end;
            if zero == Some(dx) {
                cell.set_symbol("│").set_fg(tailwind::ZINC.c100);
                if filled {
                    cell.set_bg(fill);
                }
            } else if filled {
                cell.set_symbol(stripe).set_fg(Color::Black).set_bg(fill);
            } else {
                cell.set_symbol("─").set_fg(TRACK);
            }
        }
    }
}

fn flow_color(state: FlowState) -> Color {
    match state {
        FlowState::Positive => tailwind::LIME.c400,
        FlowState::Negative => tailwind::RED.c400,
        FlowState::Off => TRACK,
    }
}

fn link(state: FlowState) -> Span<'static> {
    let symbol = match state {
        FlowState::Positive => " ▶▶▶ ",
        FlowState::Negative => " ◀◀◀ ",
        FlowState::Off => " ─── ",
    };
    Span::styled(symbol, Style::default().fg(flow_color(state)))
}

fn node(symbol: &'static str, state: FlowState) -> Span<'static> {
    Span::styled(symbol, Style::default().fg(flow_color(state)).add_modifier(Modifier::BOLD))
}

pub fn flow_line(flow: &FlowView) -> Line<'static> {
    Line::from(vec![
        node("☀ PV", flow.solar),
        link(flow.solar_home),
        node("⌂ HOME", flow.home),
        link(flow.home_grid),
        node("⚡ GRID", flow.grid),
    ])
    .centered()
}
