use super::model::{self, DialGeometry, Point, State};
use super::{ARC_WIDTH, DOT_INSET, DOT_RADIUS, LABEL_OFFSET, START_ANGLE, TICK_LENGTH};
use crate::config::{FontConfig, FontSlant, FontWeight};
use crate::gui::theme::{self, KnobStyle};
use cairo::Context;
use palette::Srgba;
use std::f64::consts::{FRAC_PI_2, PI};

/// Paints the whole dial: ticks and labels, the progress arc, the shaded cap,
/// the pointer dot, the selected value and the caption. Draw order matters.
pub fn draw(
    cr: &Context,
    state: &State,
    style: &KnobStyle,
    geometry: &DialGeometry,
) -> Result<(), cairo::Error> {
    draw_ticks(cr, state, style, geometry)?;
    draw_arc(cr, state, style, geometry)?;
    draw_cap(cr, style, geometry)?;
    draw_dot(cr, state, style, geometry)?;

    set_source(cr, style.foreground);
    show_centered_text(
        cr,
        state.selected_value(),
        geometry.center,
        &style.value_font,
        geometry.scale,
    )?;
    show_centered_text(
        cr,
        &style.caption,
        geometry.caption_center,
        &style.caption_font,
        geometry.scale,
    )
}

fn draw_ticks(
    cr: &Context,
    state: &State,
    style: &KnobStyle,
    geometry: &DialGeometry,
) -> Result<(), cairo::Error> {
    let count = state.labels().len();
    if count < 2 {
        return Ok(());
    }

    set_source(cr, style.foreground);
    cr.set_line_width(1.0);

    for (i, label) in state.labels().iter().enumerate() {
        let angle = model::canonical_angle(i, count);

        let inner = geometry.point_at(geometry.dial_radius, angle);
        let outer = geometry.point_at(
            geometry.dial_radius + TICK_LENGTH * geometry.scale,
            angle,
        );
        cr.move_to(inner.x, inner.y);
        cr.line_to(outer.x, outer.y);
        cr.stroke()?;

        let anchor = geometry.point_at(
            geometry.dial_radius + (TICK_LENGTH + LABEL_OFFSET) * geometry.scale,
            angle,
        );
        show_centered_text(cr, label.as_str(), anchor, &style.label_font, geometry.scale)?;
    }
    Ok(())
}

fn draw_arc(
    cr: &Context,
    state: &State,
    style: &KnobStyle,
    geometry: &DialGeometry,
) -> Result<(), cairo::Error> {
    let count = state.labels().len();
    let sweep = state.angle() - START_ANGLE;
    if count < 2 || sweep <= 0.0 {
        return Ok(());
    }

    // arc color reflects the committed selection, not the transient angle
    let t = state.value() as f64 / (count - 1) as f64;
    set_source(cr, theme::lerp(style.arc_neutral, style.arc_accent, t));
    cr.set_line_width(ARC_WIDTH * geometry.scale);
    cr.set_line_cap(cairo::LineCap::Round);

    // cairo's 0 angle points right; the dial's points up
    cr.new_path();
    cr.arc(
        geometry.center.x,
        geometry.center.y,
        geometry.dial_radius,
        -FRAC_PI_2,
        -FRAC_PI_2 + sweep.to_radians(),
    );
    cr.stroke()
}

fn draw_cap(cr: &Context, style: &KnobStyle, geometry: &DialGeometry) -> Result<(), cairo::Error> {
    let r = geometry.cap_radius;
    if r <= 0.0 {
        return Ok(());
    }

    let gradient = cairo::LinearGradient::new(
        geometry.center.x,
        geometry.center.y - r,
        geometry.center.x,
        geometry.center.y + r,
    );
    let (tr, tg, tb, ta) = style.cap_top.into_components();
    gradient.add_color_stop_rgba(0.0, tr, tg, tb, ta);
    let (br, bg, bb, ba) = style.cap_bottom.into_components();
    gradient.add_color_stop_rgba(1.0, br, bg, bb, ba);

    cr.set_source(&gradient)?;
    cr.arc(geometry.center.x, geometry.center.y, r, 0.0, 2.0 * PI);
    cr.fill()
}

fn draw_dot(
    cr: &Context,
    state: &State,
    style: &KnobStyle,
    geometry: &DialGeometry,
) -> Result<(), cairo::Error> {
    let orbit = (geometry.cap_radius - DOT_INSET * geometry.scale).max(0.0);
    let dot = geometry.point_at(orbit, state.angle());

    set_source(cr, style.pointer);
    cr.arc(dot.x, dot.y, DOT_RADIUS * geometry.scale, 0.0, 2.0 * PI);
    cr.fill()
}

fn show_centered_text(
    cr: &Context,
    text: &str,
    at: Point,
    font: &FontConfig,
    scale: f64,
) -> Result<(), cairo::Error> {
    if text.is_empty() {
        return Ok(());
    }

    cr.select_font_face(&font.family, slant(font.slant), weight(font.weight));
    cr.set_font_size(font.size * scale);
    if let Ok(ext) = cr.text_extents(text) {
        cr.move_to(at.x - ext.width() / 2.0, at.y + ext.height() / 2.0);
        cr.show_text(text)?;
    }
    Ok(())
}

fn set_source(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

fn slant(slant: FontSlant) -> cairo::FontSlant {
    match slant {
        FontSlant::Normal => cairo::FontSlant::Normal,
        FontSlant::Italic => cairo::FontSlant::Italic,
        FontSlant::Oblique => cairo::FontSlant::Oblique,
    }
}

fn weight(weight: FontWeight) -> cairo::FontWeight {
    match weight {
        FontWeight::Normal => cairo::FontWeight::Normal,
        FontWeight::Bold => cairo::FontWeight::Bold,
    }
}
