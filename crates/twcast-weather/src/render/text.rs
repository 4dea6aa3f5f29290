//! Terminal rendering of a [`DashboardView`].

use super::{DashboardView, ForecastCard};

pub fn render_text(view: &DashboardView) -> String {
    let hero = &view.hero;
    let temp = hero
        .average_temp
        .map(|t| format!("{t}°"))
        .unwrap_or_else(|| "--°".to_string());

    let mut lines = vec![
        format!("{} {} · {}", view.theme.particle, view.city, view.update_time),
        String::new(),
        format!("  {}  {} {}  {}", hero.period, hero.icon, temp, hero.description),
        format!(
            "  {} {}  (降雨率 {})    {} {}  (最高溫 {}°)",
            hero.advice.rain_icon,
            hero.advice.rain_text,
            hero.rain,
            hero.advice.cloth_icon,
            hero.advice.cloth_text,
            hero.max_temp
        ),
        format!("  {} {}{}", hero.food.icon, view.theme.food_heading, hero.food.text),
    ];

    if !view.upcoming.is_empty() {
        lines.push(String::new());
        lines.extend(view.upcoming.iter().map(card_line));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn card_line(card: &ForecastCard) -> String {
    format!(
        "  {:<8} {} {:>3}° - {:>3}°  💧{}",
        card.label, card.icon, card.min_temp, card.max_temp, card.rain
    )
}
