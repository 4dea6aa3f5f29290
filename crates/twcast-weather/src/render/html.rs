//! Bind a [`DashboardView`] to a standalone HTML page.

use maud::{html, Markup, PreEscaped, DOCTYPE};

use super::{DashboardView, ForecastCard, HeroCard};
use crate::cities::CityEntry;
use crate::decoration::Star;
use crate::theme::Ornament;

const CSS: &str = r#"
body { margin: 0; font-family: sans-serif; min-height: 100vh; color: #333; }
body.sunny { background: linear-gradient(to bottom, #87CEFA, #7DE1A9); }
body.cloudy { background: linear-gradient(to bottom, #B0C4DE, #E0E5EC); }
body.rainy { background: linear-gradient(to bottom, #4B79A1, #283E51); }
body.night { background: linear-gradient(to bottom, #001f3f, #000); color: #eee; }
#loading { position: fixed; inset: 0; display: flex; align-items: center; justify-content: center; overflow: hidden; }
.star { position: fixed; background: #fff; border-radius: 50%; animation: twinkle ease-in-out infinite; }
@keyframes twinkle { 50% { opacity: .2; } }
.hero-card, .mini-card { background: rgba(255,255,255,.85); border-radius: 16px; padding: 16px; margin: 12px; color: #333; }
#futureForecasts { display: flex; overflow-x: auto; }
.advice-grid { display: flex; gap: 12px; }
"#;

/// Render the full page. `cities` fills the selector; `stars` are drawn on a
/// night background; the loading placeholder is swapped for the main content
/// `reveal_delay_ms` after load.
pub fn render_html(
    view: &DashboardView,
    cities: &[CityEntry],
    stars: &[Star],
    reveal_delay_ms: u64,
) -> String {
    render_page(view, cities, stars, reveal_delay_ms).into_string()
}

pub fn render_page(
    view: &DashboardView,
    cities: &[CityEntry],
    stars: &[Star],
    reveal_delay_ms: u64,
) -> Markup {
    let theme = &view.theme;
    let accent = format!(
        ".hero-period, .update-time, .food-heading {{ color: {}; }}",
        theme.accent
    );

    html! {
        (DOCTYPE)
        html lang="zh-Hant" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (theme.title) " · " (view.city) }
                style { (PreEscaped(CSS)) (PreEscaped(accent)) }
            }
            body class=(view.background.css_class()) {
                div #loading style={ "background: " (view.background.loading_gradient()) } {
                    div.loading-text { (theme.particle) " 載入中…" }
                }
                div.main #mainContent style="display: none" {
                    select #citySelect {
                        @for city in cities {
                            option value=(city.slug) selected[city.slug == view.slug] {
                                (city.display_name)
                            }
                        }
                    }
                    div.update-time #updateTime { (view.update_time) }
                    (ornament(view, Ornament::ChristmasTree, "christmasTree", "🎄"))
                    (ornament(view, Ornament::NewYear, "newYear", "🧧"))
                    div.hero #heroCard { (hero_card(&view.hero, theme.food_heading)) }
                    div.future-forecasts #futureForecasts {
                        @for card in &view.upcoming {
                            (mini_card(card))
                        }
                    }
                }
                @for s in stars {
                    (star(s))
                }
                script { (PreEscaped(reveal_script(reveal_delay_ms))) }
            }
        }
    }
}

fn ornament(view: &DashboardView, which: Ornament, id: &str, glyph: &str) -> Markup {
    let display = if view.theme.ornament == Some(which) {
        "block"
    } else {
        "none"
    };
    html! {
        div.ornament id=(id) style={ "display: " (display) } { (glyph) }
    }
}

fn hero_card(hero: &HeroCard, food_heading: &str) -> Markup {
    let temp = hero
        .average_temp
        .map(|t| format!("{t}°"))
        .unwrap_or_else(|| "--°".to_string());
    let rain = format!("降雨率 {}", hero.rain);
    let max_temp = format!("最高溫 {}°", hero.max_temp);

    html! {
        div.hero-card {
            div.hero-period { (hero.period) }
            div.hero-temp-container {
                div.hero-icon { (hero.icon) }
                div.hero-temp { (temp) }
            }
            div.hero-desc { (hero.description) }
            div.advice-grid {
                (advice_item(hero.advice.rain_icon, hero.advice.rain_text, &rain))
                (advice_item(hero.advice.cloth_icon, hero.advice.cloth_text, &max_temp))
            }
            div.food-advice-box {
                div.food-icon { (hero.food.icon) }
                div.food-text {
                    span.food-heading { (food_heading) }
                    br;
                    (hero.food.text)
                }
            }
        }
    }
}

fn advice_item(icon: &str, text: &str, detail: &str) -> Markup {
    html! {
        div.advice-item {
            div.advice-icon { (icon) }
            div.advice-text { (text) }
            div.advice-detail { (detail) }
        }
    }
}

fn mini_card(card: &ForecastCard) -> Markup {
    html! {
        div.mini-card {
            div.mini-time { (card.label) }
            div.mini-icon { (card.icon) }
            div.mini-temp { (card.min_temp) "° - " (card.max_temp) "°" }
            div.mini-rain { "💧" (card.rain) }
        }
    }
}

fn star(star: &Star) -> Markup {
    let style = format!(
        "top: {:.2}%; left: {:.2}%; width: {:.2}px; height: {:.2}px; animation-duration: {:.2}s",
        star.top, star.left, star.size, star.size, star.twinkle
    );
    html! {
        div.star style=(style) {}
    }
}

fn reveal_script(delay_ms: u64) -> String {
    format!(
        "setTimeout(function () {{\n\
         document.getElementById('loading').style.display = 'none';\n\
         document.getElementById('mainContent').style.display = 'block';\n\
         }}, {delay_ms});"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cities::CityRegistry;
    use crate::decoration::Starfield;
    use crate::render::test_support::sample_forecast;
    use crate::theme::{Theme, ThemeMode};
    use chrono::NaiveDateTime;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn view(mode: ThemeMode) -> (DashboardView, CityRegistry) {
        let registry = CityRegistry::taiwan().unwrap();
        let city = registry.lookup("taichung").unwrap().clone();
        let now = NaiveDateTime::parse_from_str("2025-12-20 11:30", "%Y-%m-%d %H:%M").unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let view = DashboardView::build(
            &city,
            &sample_forecast(),
            Theme::for_mode(mode),
            now,
            &mut rng,
        )
        .unwrap();
        (view, registry)
    }

    /// The opening tag that contains `needle`.
    fn tag_with<'a>(html: &'a str, needle: &str) -> &'a str {
        let at = html.find(needle).unwrap();
        let start = html[..at].rfind('<').unwrap();
        let end = at + html[at..].find('>').unwrap();
        &html[start..=end]
    }

    #[test]
    fn test_page_has_all_element_ids() {
        let (view, registry) = view(ThemeMode::Christmas);
        let html = render_html(&view, registry.entries(), &[], 3000);

        for id in [
            "citySelect",
            "loading",
            "mainContent",
            "heroCard",
            "futureForecasts",
            "updateTime",
            "christmasTree",
            "newYear",
        ] {
            assert!(html.contains(&format!("id=\"{id}\"")), "missing #{id}");
        }
    }

    #[test]
    fn test_selected_city_and_options() {
        let (view, registry) = view(ThemeMode::Daily);
        let html = render_html(&view, registry.entries(), &[], 3000);

        assert!(tag_with(&html, "value=\"taichung\"").contains("selected"));
        assert!(!tag_with(&html, "value=\"tainan\"").contains("selected"));
        assert_eq!(html.matches("<option").count(), 22);
    }

    #[test]
    fn test_ornament_visibility_follows_theme() {
        let (view, registry) = view(ThemeMode::NewYear);
        let html = render_html(&view, registry.entries(), &[], 3000);

        assert!(tag_with(&html, "id=\"newYear\"").contains("display: block"));
        assert!(tag_with(&html, "id=\"christmasTree\"").contains("display: none"));
        assert!(html.contains("新年美食建議："));
        assert!(html.contains("color: #c0392b;"));
    }

    #[test]
    fn test_cards_and_reveal_delay() {
        let (view, registry) = view(ThemeMode::Christmas);
        let html = render_html(&view, registry.entries(), &[], 4000);

        assert_eq!(html.matches("class=\"mini-card\"").count(), 2);
        assert!(html.contains("明天早晨"));
        assert!(html.contains("降雨率 20%"));
        assert!(html.contains("}, 4000);"));
        assert!(html.contains("<body class=\"sunny\">"));
        assert!(tag_with(&html, "id=\"mainContent\"").contains("display: none"));
    }

    #[test]
    fn test_stars_rendered() {
        let (view, registry) = view(ThemeMode::Christmas);
        let mut stars = Starfield::new(5);
        stars.generate(&mut StdRng::seed_from_u64(2));

        let html = render_html(&view, registry.entries(), stars.stars(), 3000);
        assert_eq!(html.matches("class=\"star\"").count(), 5);
    }

    #[test]
    fn test_text_is_escaped() {
        let (mut view, registry) = view(ThemeMode::Daily);
        view.hero.description = "<b>晴</b>".to_string();

        let html = render_html(&view, registry.entries(), &[], 3000);
        assert!(html.contains("&lt;b&gt;晴&lt;/b&gt;"));
    }
}
