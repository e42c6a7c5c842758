//! YDF (Yahoo! Data Format) document model as returned with `output=json`.
//!
//! Every field defaults when absent so partial documents from the different
//! endpoints decode into the same tree.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::Deserialize;

/// Root of a YDF document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Ydf {
    pub result_info: ResultInfo,
    pub feature: Vec<Feature>,
    pub dictionary: Dictionary,
}

impl Ydf {
    /// Resolve the style a feature refers to.
    pub fn style_for(&self, feature: &Feature) -> Option<&Style> {
        let id = &feature.style.as_ref()?.id;
        self.dictionary.style.iter().find(|s| &s.id == id)
    }
}

/// Response metadata. API level failures are reported in `status`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ResultInfo {
    pub count: u64,
    pub total: u64,
    pub start: u64,
    pub latency: f64,
    pub status: u64,
    pub description: String,
    pub copyright: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Feature {
    pub id: String,
    pub name: String,
    pub category: Vec<String>,
    pub description: String,
    pub geometry: Option<Geometry>,
    pub property: Property,
    /// Key into the document's [`Dictionary`], see [`Ydf::style_for`].
    pub style: Option<StyleRef>,
    pub route_info: Vec<Route>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Geometry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub bounding_box: String,
    #[serde(default)]
    pub datum: Option<Datum>,
    #[serde(default)]
    pub compress: String,
    #[serde(default)]
    pub compress_type: String,
    #[serde(flatten)]
    pub shape: Shape,
}

impl Geometry {
    /// The `Type` tag this geometry was decoded from.
    pub fn kind(&self) -> &'static str {
        match self.shape {
            Shape::Point { .. } => "point",
            Shape::LineString { .. } => "linestring",
            Shape::Polygon { .. } => "polygon",
            Shape::Circle { .. } => "circle",
            Shape::Ellipse { .. } => "ellipse",
            Shape::MultiGeometry { .. } => "multigeometry",
        }
    }
}

/// Shape payload of a [`Geometry`], selected by its `Type` field.
///
/// Coordinates are kept as the raw `"lon,lat lon,lat ..."` strings the API sends.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "Type", rename_all = "lowercase", rename_all_fields = "PascalCase")]
pub enum Shape {
    Point {
        #[serde(default)]
        coordinates: String,
    },
    LineString {
        #[serde(default)]
        coordinates: String,
    },
    Polygon {
        #[serde(default)]
        coordinates: String,
        #[serde(default)]
        exterior: Option<Ring>,
        #[serde(default)]
        interior: Option<Ring>,
    },
    Circle {
        #[serde(default)]
        coordinates: String,
        #[serde(default)]
        radius: String,
    },
    Ellipse {
        #[serde(default)]
        coordinates: String,
        #[serde(default)]
        radius: String,
    },
    MultiGeometry {
        #[serde(default)]
        geometry: Vec<Geometry>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Ring {
    pub coordinates: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Datum {
    Wgs,
    #[serde(alias = "tkw")]
    Tky,
    #[serde(other)]
    Unknown,
}

/// Area and weather details of a feature.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Property {
    pub weather_area_code: i64,
    pub weather_list: WeatherList,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct WeatherList {
    pub weather: Vec<Weather>,
}

/// One observed or forecast rainfall record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Weather {
    #[serde(rename = "Type")]
    pub kind: WeatherType,
    /// Local time formatted as `YYYYMMDDHHmm`.
    pub date: String,
    /// Rainfall intensity in mm/h.
    pub rainfall: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherType {
    Observation,
    Forecast,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Weather {
    pub fn is_observation(&self) -> bool {
        self.kind == WeatherType::Observation
    }

    pub fn is_forecast(&self) -> bool {
        self.kind == WeatherType::Forecast
    }

    pub fn is_raining(&self) -> bool {
        self.rainfall > 0.0
    }

    /// Parse [`Weather::date`] as local time.
    ///
    /// Anything after the leading `YYYYMMDDHHmm` is ignored. Out of range
    /// fields roll over, so month 13 is January of the next year. A malformed
    /// date yields the Unix epoch rather than an error.
    pub fn time(&self) -> DateTime<Local> {
        parse_weather_date(&self.date)
            .and_then(|naive| Local.from_local_datetime(&naive).earliest())
            .unwrap_or_default()
    }
}

fn parse_weather_date(date: &str) -> Option<NaiveDateTime> {
    let digits = date.get(..12).filter(|d| d.bytes().all(|b| b.is_ascii_digit()))?;
    let field = |from: usize, to: usize| digits[from..to].parse::<i64>().ok();

    let months = field(0, 4)? * 12 + field(4, 6)? - 1;
    let year = i32::try_from(months.div_euclid(12)).ok()?;
    let month = u32::try_from(months.rem_euclid(12) + 1).ok()?;

    let offset = Duration::days(field(6, 8)? - 1)
        + Duration::hours(field(8, 10)?)
        + Duration::minutes(field(10, 12)?);

    NaiveDate::from_ymd_opt(year, month, 1)?
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(offset)
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Route {
    pub edge: Vec<Edge>,
    pub property: Property,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Edge {
    pub id: String,
    pub vertex: Vec<Vertex>,
    pub property: Property,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Vertex {
    #[serde(rename = "Type")]
    pub kind: Option<VertexType>,
    pub property: Property,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum VertexType {
    Start,
    End,
}

/// Container of the styles features refer to.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Dictionary {
    pub style: Vec<Style>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct StyleRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Style {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub target: String,
    #[serde(flatten)]
    pub kind: StyleKind,
}

/// Rendering hint of a [`Style`], selected by its `Type` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "Type", rename_all = "lowercase", rename_all_fields = "PascalCase")]
pub enum StyleKind {
    Icon {
        #[serde(default)]
        image: String,
        #[serde(default)]
        size: String,
        #[serde(default)]
        anchor: String,
    },
    Line {
        #[serde(default)]
        color: String,
        #[serde(default)]
        size: String,
        #[serde(default)]
        opacity: Option<f32>,
        #[serde(default)]
        start_line: Option<LineEnd>,
        #[serde(default)]
        end_line: Option<LineEnd>,
    },
    Fill {
        #[serde(default)]
        color: String,
        #[serde(default)]
        opacity: Option<f32>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnd {
    Arrow,
}
