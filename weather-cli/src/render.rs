//! Plain-text rendering of reports and the recent-search list.

use std::fmt;
use weather_core::{RecentSearches, TemperatureUnit, WeatherReport, to_display_unit};

fn temp(celsius: f64, unit: TemperatureUnit) -> String {
    format!("{}{}", to_display_unit(celsius, unit), unit.symbol())
}

/// A report laid out for the terminal in one temperature unit.
pub struct ReportView<'a> {
    pub report: &'a WeatherReport,
    pub unit: TemperatureUnit,
}

impl fmt::Display for ReportView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { report, unit } = *self;
        let now = &report.current;
        let class = &now.classification;

        let (marker, period) = if report.is_daytime() { ("🌞", "day") } else { ("🌙", "night") };

        writeln!(f, "📍 {}", report.location.name)?;
        writeln!(f, "🕒 {} (local) {marker} {period}", now.observed_at.format("%a %d %b %H:%M"))?;
        writeln!(f)?;
        writeln!(f, "{}  {} [{}]", class.icon(), class.condition, class.theme())?;
        writeln!(
            f,
            "🌡️  {}, feels like {}",
            temp(now.temperature_c, unit),
            temp(now.feels_like_c, unit)
        )?;
        writeln!(
            f,
            "💧 {}%  💨 {:.1} km/h  🌧️ {:.1} mm  ☁️ {}%",
            now.humidity_pct, now.wind_speed_kmh, now.precipitation_mm, now.cloud_cover_pct
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "{} {} [{}]",
            report.advisory.icon,
            report.advisory.text,
            report.advisory.color.as_str()
        )?;

        if report.daily.is_empty() {
            return Ok(());
        }

        writeln!(f)?;
        writeln!(f, "Forecast")?;
        for day in &report.daily {
            writeln!(
                f,
                "  {:<4}{}  {:<7} {:>8} / {:<8} {:>5.1} mm",
                day.day,
                day.classification.icon(),
                day.classification.condition.label(),
                temp(day.min_temp_c, unit),
                temp(day.max_temp_c, unit),
                day.precipitation_mm
            )?;
        }

        Ok(())
    }
}

pub fn report_text(report: &WeatherReport, unit: TemperatureUnit) -> String {
    ReportView { report, unit }.to_string()
}

pub fn recent_text(recent: &RecentSearches) -> String {
    if recent.is_empty() {
        return "No recent searches.\n".to_string();
    }

    recent.iter().enumerate().map(|(i, name)| format!("{}. {name}\n", i + 1)).collect()
}
