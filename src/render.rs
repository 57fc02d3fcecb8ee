use std::fmt;
use std::fmt::Formatter;
use crate::models::location::LocationCode;
use crate::projector::{PastSlots, ProjectedDay, ProjectedForecast, ProjectedSlot};

/// Prefix of the slot identifiers shown in front of every slot line
const SLOT_TAG: &str = "#";

/// Text view of a projected forecast, hidden days and slots are left out
pub struct ForecastView<'a> {
    pub code: &'a LocationCode,
    pub forecast: &'a ProjectedForecast,
}

/// Numbered list of locations, as shown after filtering
pub struct SearchView<'a>(pub &'a [(LocationCode, String)]);

impl fmt::Display for ForecastView<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let caption = format!("{} ({}) [{}] ", self.forecast.name, self.forecast.province, self.code);
        writeln!(f, "{:=<72}", caption)?;
        if let Some(issued) = &self.forecast.issued {
            writeln!(f, "Issued {}", issued)?;
        }

        write_past(f, &self.forecast.past)?;

        let today = self.forecast.effective_today();
        for day in self.forecast.days.iter().filter(|d| !d.hidden) {
            write_day(f, day, today == Some(day.index))?;
        }

        Ok(())
    }
}

fn write_day(f: &mut Formatter, day: &ProjectedDay, today: bool) -> fmt::Result {
    let min_max = match (day.min, day.max) {
        (Some(min), Some(max)) => format!("{} / {}", min, max),
        _ => String::new(),
    };
    let uv = day.uv.map(|uv| uv.to_string()).unwrap_or_default();

    let label = if today { format!("{} (today)", day.label) } else { day.label.clone() };

    writeln!(f)?;
    writeln!(f, "{:<24} {} [col {:>2}] min/max {:<9} UV {}", label, day.date, day.column, min_max, uv)?;

    for slot in day.slots.iter().filter(|s| !s.hidden) {
        write_slot(f, slot)?;
    }

    Ok(())
}

fn write_past(f: &mut Formatter, past: &PastSlots) -> fmt::Result {
    if past.whole_day {
        writeln!(f, "First forecast day is over and not shown")
    } else if past.count > 0 {
        writeln!(f, "{} past period(s) of today not shown", past.count)
    } else {
        Ok(())
    }
}

fn write_slot(f: &mut Formatter, slot: &ProjectedSlot) -> fmt::Result {
    let (icon, description) = match &slot.sky {
        Some(sky) => (sky.icon.as_str(), sky.description.as_str()),
        None => ("", ""),
    };
    let temperature = slot.temperature.map(|t| format!("{}ºC", t)).unwrap_or_default();
    let precipitation = slot.precipitation.as_ref().map(|p| format!("{}%", p)).unwrap_or_default();
    let snow_level = slot.snow_level.clone().unwrap_or_default();
    let wind = slot.wind.as_ref().map(|w| format!("{} {}", w.speed, w.direction)).unwrap_or_default();

    writeln!(f, "  {} {:<6} {:<8} {:<38} {:>5} {:>5} {:>6} {:>7}",
             slot.id.widget_name(SLOT_TAG),
             slot.period.as_deref().unwrap_or(""),
             icon,
             description,
             temperature,
             precipitation,
             snow_level,
             wind)
}

impl fmt::Display for SearchView<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for (i, (code, name)) in self.0.iter().enumerate() {
            writeln!(f, "{:>4}. {} [{}]", i + 1, name, code)?;
        }
        write!(f, "Results: {}", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::models::aemet_forecast::{ForecastRecord, MunicipalityForecast};
    use crate::projector::{project, IconCatalog};

    const DOCUMENT: &str = include_str!("../tests/fixtures/prediccion.json");

    struct AllIcons;

    impl IconCatalog for AllIcons {
        fn contains(&self, _code: &str) -> bool {
            true
        }
    }

    fn projected(hour: u32, day: u32) -> ProjectedForecast {
        let mut document: Vec<MunicipalityForecast> = serde_json::from_str(DOCUMENT).unwrap();
        let record = ForecastRecord::from(document.remove(0));
        project(&record, &AllIcons, NaiveDate::from_ymd_opt(2024, 1, day).unwrap().and_hms_opt(hour, 0, 0).unwrap())
    }

    #[test]
    fn test_forecast_view_leaves_out_hidden_slots() {
        let forecast = projected(13, 15);
        let code: LocationCode = "28079".parse().unwrap();
        let text = ForecastView { code: &code, forecast: &forecast }.to_string();

        assert!(text.starts_with("Madrid (Madrid) [28079] ="));
        assert!(text.contains("Lunes 15                 2024-01-15 [col  0] min/max 1 / 12"));
        assert!(text.contains("Martes 16                2024-01-16 [col  4]"));
        assert!(text.contains("2 past period(s) of today not shown"));
        // today's first two slots are past
        assert!(!text.contains("#11 ") && !text.contains("#12 "));
        assert!(text.contains("  #13 12-18"));
        assert!(text.contains("  #71 "));
        assert_eq!(text.matches("00-06").count(), 1);
        assert_eq!(text.matches("06-12").count(), 1);
        assert_eq!(text.matches("18-24").count(), 2);
        assert!(text.contains("11ºC"));
        assert!(text.contains("10 E"));
    }

    #[test]
    fn test_forecast_view_leaves_out_stale_day() {
        let forecast = projected(9, 16);
        let code: LocationCode = "28079".parse().unwrap();
        let text = ForecastView { code: &code, forecast: &forecast }.to_string();

        assert!(!text.contains("Lunes 15"));
        assert!(text.contains("Martes 16 (today)"));
        assert!(text.contains("min/max 3 / 11"));
        assert!(text.contains("First forecast day is over and not shown"));
        assert!(!text.contains("#11 "));
    }

    #[test]
    fn test_forecast_view_early_morning_shows_all_slots() {
        let forecast = projected(3, 15);
        let code: LocationCode = "28079".parse().unwrap();
        let text = ForecastView { code: &code, forecast: &forecast }.to_string();

        assert!(!text.contains("not shown"));
        assert!(text.contains("  #11 00-06"));
        assert!(text.contains("Domingo 21"));
    }

    #[test]
    fn test_search_view() {
        let list: Vec<(LocationCode, String)> = vec![
            ("15030".parse().unwrap(), "Coruña (A)".to_string()),
            ("28079".parse().unwrap(), "Madrid".to_string()),
        ];
        let text = SearchView(&list).to_string();

        assert_eq!(text, "   1. Coruña (A) [15030]\n   2. Madrid [28079]\nResults: 2");
    }
}
