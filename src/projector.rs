use std::fmt;
use std::path::PathBuf;
use chrono::{Locale, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use crate::models::aemet_forecast::{DayForecast, ForecastRecord};

/// Placeholder icon for sky states without an image
pub const UNKNOWN_ICON: &str = "unknown";

/// Description used when AEMET gives none
pub const SKY_UNAVAILABLE: &str = "Estado de cielo no disponible";

/// Locale of the weekday names in day labels
const LABEL_LOCALE: Locale = Locale::es_ES;

/// Number of leading days reported in 6-hour slots, later days are coarser
const FINE_GRAINED_DAYS: usize = 2;

/// Slot positions covering 00-06 and 18-24 on the fine grained days
const NIGHT_POSITIONS: [usize; 2] = [0, 3];

/// Identifier of a display slot, the tens tell the day (1-based) and the units the slot
/// within that day, e.g. 13 is the third slot of today
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotId(u8);

impl SlotId {
    /// Name of the display widget showing this slot, e.g. "labelCielo13"
    ///
    /// # Arguments
    ///
    /// * 'prefix' - widget family, e.g. "labelCielo" or "labelTemp"
    pub fn widget_name(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.0)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How one forecast day maps on to the display
pub struct DayLayout {
    /// Display slots of the day, in time order
    pub slots: &'static [SlotId],
    /// Index of the first slot's value in the day's per period arrays. AEMET lists whole
    /// day and half day periods ahead of the 6-hour ones, so the arrays don't start
    /// with the first slot.
    pub base_offset: usize,
    /// Display column of the values given once per day (min/max temperature, UV)
    pub column: usize,
}

pub const DAY_LAYOUT: [DayLayout; 7] = [
    DayLayout { slots: &[SlotId(11), SlotId(12), SlotId(13), SlotId(14)], base_offset: 3, column: 0 },
    DayLayout { slots: &[SlotId(21), SlotId(22), SlotId(23), SlotId(24)], base_offset: 3, column: 4 },
    DayLayout { slots: &[SlotId(31), SlotId(32)], base_offset: 1, column: 8 },
    DayLayout { slots: &[SlotId(41), SlotId(42)], base_offset: 1, column: 10 },
    DayLayout { slots: &[SlotId(51)], base_offset: 0, column: 12 },
    DayLayout { slots: &[SlotId(61)], base_offset: 0, column: 13 },
    DayLayout { slots: &[SlotId(71)], base_offset: 0, column: 14 },
];

/// Tells whether a sky state code has an image
pub trait IconCatalog {
    fn contains(&self, code: &str) -> bool;
}

/// Sky state images stored as '<code>.png' in a directory
pub struct DirIconCatalog {
    dir: PathBuf,
}

impl DirIconCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> DirIconCatalog {
        DirIconCatalog { dir: dir.into() }
    }

    pub fn icon_path(&self, code: &str) -> PathBuf {
        self.dir.join(format!("{}.png", code))
    }
}

impl IconCatalog for DirIconCatalog {
    fn contains(&self, code: &str) -> bool {
        !code.is_empty() && self.icon_path(code).is_file()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sky {
    pub icon: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindValue {
    pub speed: String,
    pub direction: String,
}

#[derive(Debug, Clone)]
pub struct ProjectedSlot {
    pub id: SlotId,
    pub period: Option<String>,
    pub sky: Option<Sky>,
    pub temperature: Option<i32>,
    pub precipitation: Option<String>,
    pub snow_level: Option<String>,
    pub wind: Option<WindValue>,
    pub hidden: bool,
}

#[derive(Debug, Clone)]
pub struct ProjectedDay {
    pub index: usize,
    pub date: NaiveDate,
    pub label: String,
    pub column: usize,
    pub min: Option<i32>,
    pub max: Option<i32>,
    pub uv: Option<u8>,
    pub slots: Vec<ProjectedSlot>,
    pub hidden: bool,
}

/// Per slot display values of a forecast
#[derive(Debug, Clone)]
pub struct ProjectedForecast {
    pub name: String,
    pub province: String,
    pub issued: Option<String>,
    pub days: Vec<ProjectedDay>,
    pub past: PastSlots,
}

impl ProjectedForecast {
    /// Index of the first day still shown, i.e. the day acting as today
    pub fn effective_today(&self) -> Option<usize> {
        self.days.iter().find(|d| !d.hidden).map(|d| d.index)
    }
}

/// Leading slots of the first forecast day that already lie in the past
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PastSlots {
    pub count: usize,
    pub whole_day: bool,
}

impl PastSlots {
    /// If the forecast still starts yesterday the whole first day is past, otherwise
    /// every full 6 hours passed today hides one more slot
    ///
    /// # Arguments
    ///
    /// * 'first_day' - date of the forecast's first day
    /// * 'now' - current local date and time
    pub fn compute(first_day: NaiveDate, now: NaiveDateTime) -> PastSlots {
        if now.date() > first_day {
            PastSlots { count: DAY_LAYOUT[0].slots.len(), whole_day: true }
        } else {
            PastSlots { count: (now.hour() / 6) as usize, whole_day: false }
        }
    }
}

/// Projects a forecast on to the display slots
///
/// # Arguments
///
/// * 'record' - the forecast as retrieved from AEMET
/// * 'icons' - available sky state images
/// * 'now' - current local date and time, used to hide slots already passed
pub fn project(record: &ForecastRecord, icons: &impl IconCatalog, now: NaiveDateTime) -> ProjectedForecast {
    let past = record.days
        .first()
        .map(|d| PastSlots::compute(d.fecha, now))
        .unwrap_or_default();

    let days = record.days
        .iter()
        .zip(DAY_LAYOUT.iter())
        .enumerate()
        .map(|(i, (day, layout))| {
            let mut projected = project_day(i, day, layout, icons);
            if i == 0 {
                projected.hidden = past.whole_day;
                projected.slots.iter_mut().take(past.count).for_each(|s| s.hidden = true);
            }
            projected
        })
        .collect::<Vec<ProjectedDay>>();

    ProjectedForecast {
        name: record.name.clone(),
        province: record.province.clone(),
        issued: record.issued.clone(),
        days,
        past,
    }
}

fn project_day(index: usize, day: &DayForecast, layout: &DayLayout, icons: &impl IconCatalog) -> ProjectedDay {
    let slots = layout.slots
        .iter()
        .enumerate()
        .map(|(position, id)| {
            let raw = layout.base_offset + position;
            let sky_state = day.estado_cielo.get(raw);

            ProjectedSlot {
                id: *id,
                period: sky_state
                    .and_then(|s| s.periodo.clone())
                    .or_else(|| day.prob_precipitacion.get(raw).and_then(|p| p.periodo.clone()))
                    .or_else(|| day.viento.get(raw).and_then(|w| w.periodo.clone())),
                sky: sky_state.map(|s| Sky {
                    icon: resolve_icon(icons, &s.value, index, position),
                    description: if s.descripcion.is_empty() {
                        SKY_UNAVAILABLE.to_string()
                    } else {
                        s.descripcion.clone()
                    },
                }),
                // Hourly temperatures are listed for the slot instants only, no offset
                temperature: day.temperatura.dato.get(position).and_then(|t| t.value),
                precipitation: day.prob_precipitacion.get(raw).map(|p| p.value.clone()),
                snow_level: day.cota_nieve_prov.get(raw).map(|c| c.value.clone()),
                wind: day.viento.get(raw).map(|w| WindValue {
                    speed: w.velocidad.clone(),
                    direction: w.direccion.clone(),
                }),
                hidden: false,
            }
        })
        .collect::<Vec<ProjectedSlot>>();

    ProjectedDay {
        index,
        date: day.fecha,
        label: day_label(day.fecha),
        column: layout.column,
        min: day.temperatura.minima,
        max: day.temperatura.maxima,
        uv: day.uv_max,
        slots,
        hidden: false,
    }
}

/// Weekday and day of month in Spanish, title cased as in "Miércoles 17"
fn day_label(date: NaiveDate) -> String {
    let label = date
        .and_time(NaiveTime::MIN)
        .and_utc()
        .format_localized("%A %d", LABEL_LOCALE)
        .to_string();

    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => label,
    }
}

/// Returns the icon to show for a sky state code.
///
/// AEMET marks night variants with a trailing 'n' on the fine grained days, but doesn't
/// publish an image for all of them (e.g. 54n). Those fall back on the day image.
/// Anything still without an image gets the unknown placeholder.
///
/// # Arguments
///
/// * 'icons' - available images
/// * 'code' - sky state code
/// * 'day' - index of the forecast day
/// * 'position' - slot position within the day
pub fn resolve_icon(icons: &impl IconCatalog, code: &str, day: usize, position: usize) -> String {
    if icons.contains(code) {
        return code.to_string();
    }

    if day < FINE_GRAINED_DAYS && NIGHT_POSITIONS.contains(&position) {
        let day_code = code.trim_end_matches('n');
        if icons.contains(day_code) {
            return day_code.to_string();
        }
    }

    UNKNOWN_ICON.to_string()
}
