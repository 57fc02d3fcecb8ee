use std::str::FromStr;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde::de::Error;
use serde_json::Value;

/// First response from AEMET OpenData, pointing to where the actual data lives
#[derive(Deserialize, Debug)]
pub struct Envelope {
    pub estado: i64,
    #[serde(default)]
    pub descripcion: String,
    pub datos: Option<String>,
}

/// One element of the data document, the document itself is an array of these
#[derive(Deserialize, Debug)]
pub struct MunicipalityForecast {
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub provincia: String,
    pub elaborado: Option<String>,
    pub prediccion: Prediction,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Prediction {
    pub dia: Vec<DayForecast>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PeriodValue {
    #[serde(default, deserialize_with = "text_value")]
    pub value: String,
    pub periodo: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SkyState {
    #[serde(default, deserialize_with = "text_value")]
    pub value: String,
    pub periodo: Option<String>,
    #[serde(default)]
    pub descripcion: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Wind {
    #[serde(default)]
    pub direccion: String,
    #[serde(default, deserialize_with = "text_value")]
    pub velocidad: String,
    pub periodo: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct HourValue {
    #[serde(default, deserialize_with = "lenient_number")]
    pub value: Option<i32>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Temperature {
    #[serde(default, deserialize_with = "lenient_number")]
    pub maxima: Option<i32>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub minima: Option<i32>,
    #[serde(default)]
    pub dato: Vec<HourValue>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DayForecast {
    #[serde(deserialize_with = "calendar_date")]
    pub fecha: NaiveDate,
    #[serde(default)]
    pub estado_cielo: Vec<SkyState>,
    #[serde(default)]
    pub prob_precipitacion: Vec<PeriodValue>,
    #[serde(default)]
    pub cota_nieve_prov: Vec<PeriodValue>,
    #[serde(default)]
    pub viento: Vec<Wind>,
    #[serde(default)]
    pub temperatura: Temperature,
    #[serde(default, deserialize_with = "lenient_number")]
    pub uv_max: Option<u8>,
}

/// A retrieved forecast, replaced as a whole whenever another municipality is chosen
#[derive(Debug, Clone)]
pub struct ForecastRecord {
    pub name: String,
    pub province: String,
    pub issued: Option<String>,
    pub days: Vec<DayForecast>,
}

impl From<MunicipalityForecast> for ForecastRecord {
    fn from(m: MunicipalityForecast) -> Self {
        ForecastRecord {
            name: m.nombre,
            province: m.provincia,
            issued: m.elaborado,
            days: m.prediccion.dia,
        }
    }
}

/// AEMET mixes numbers and strings (often empty) for the same fields, so values are kept as text
fn text_value<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Numbers may come as json numbers or as text, empty text or anything unparsable is no value
fn lenient_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let value = Value::deserialize(deserializer)?;
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return Ok(None),
    };

    Ok(text.parse::<T>().ok().or_else(|| {
        text.parse::<f64>().ok().and_then(|f| format!("{}", f.round() as i64).parse::<T>().ok())
    }))
}

/// Accepts both "2024-01-15" and "2024-01-15T00:00:00"
fn calendar_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let date = s.get(0..10).unwrap_or(&s);
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(D::Error::custom)
}
