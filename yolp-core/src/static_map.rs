//! Options of the static map API and their query string encoding.
//!
//! API document: <https://developer.yahoo.co.jp/webapi/map/openlocalplatform/v1/static.html>

use std::{collections::BTreeMap, fmt, ops::RangeInclusive};

use chrono::NaiveDate;
use url::form_urlencoded;

use crate::error::ValidationError;

/// Query parameters of a single request. Order is irrelevant to the API.
pub type QueryParams = BTreeMap<String, String>;

const PIN_NUMBERS: RangeInclusive<i32> = 0..=99;
const PIN_LETTERS: RangeInclusive<char> = 'a'..='z';
const RAINFALL_MAX_ZOOM: i32 = 15;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MapMode {
    #[default]
    Normal,
    Photo,
    /// Underground shopping street map.
    Underground,
    Hd,
    Hybrid,
    /// Map without labels.
    Blank,
    Osm,
}

impl MapMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MapMode::Normal => "",
            MapMode::Photo => "photo",
            MapMode::Underground => "map-b1",
            MapMode::Hd => "hd",
            MapMode::Hybrid => "hybrid",
            MapMode::Blank => "blankmap",
            MapMode::Osm => "osm",
        }
    }

    /// Zoom levels the API renders in this mode.
    pub fn zoom_range(&self) -> RangeInclusive<i32> {
        match self {
            MapMode::Underground => 19..=21,
            MapMode::Blank => 11..=20,
            _ => 1..=20,
        }
    }
}

impl fmt::Display for MapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendering options of a static map.
///
/// Zero `width`, `height` and `zoom` are left out of the request so the API
/// defaults apply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticOptions {
    pub mode: MapMode,
    pub width: i32,
    pub height: i32,
    /// Draw a cross at the map center.
    pub pointer: bool,
    pub zoom: i32,
    pub pins: Vec<Pin>,
    pub overlay: Option<Overlay>,
}

impl StaticOptions {
    /// Check the options against the API constraints, reporting the first
    /// violation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.width < 0 {
            return Err(ValidationError::Width(self.width));
        }
        if self.height < 0 {
            return Err(ValidationError::Height(self.height));
        }
        if self.zoom != 0 {
            let range = self.mode.zoom_range();
            if !range.contains(&self.zoom) {
                return Err(ValidationError::Zoom {
                    zoom: self.zoom,
                    min: *range.start(),
                    max: *range.end(),
                });
            }
        }
        for pin in &self.pins {
            pin.validate()?;
        }
        if let Some(overlay) = &self.overlay {
            // Only an explicit rainfall type is capped, an untyped overlay is not.
            if overlay.kind == Some(OverlayType::Rainfall) && self.zoom > RAINFALL_MAX_ZOOM {
                return Err(ValidationError::RainfallZoom(self.zoom));
            }
        }

        Ok(())
    }

    /// Validate and encode the options as query parameters.
    pub fn to_query(&self) -> Result<QueryParams, ValidationError> {
        self.validate()?;

        let mut query = QueryParams::new();
        if self.mode != MapMode::Normal {
            query.insert("mode".into(), query_escape(self.mode.as_str()));
        }
        if self.width > 0 {
            query.insert("width".into(), self.width.to_string());
        }
        if self.height > 0 {
            query.insert("height".into(), self.height.to_string());
        }
        if self.pointer {
            query.insert("pointer".into(), "on".into());
        }
        if self.zoom > 0 {
            query.insert("z".into(), self.zoom.to_string());
        }
        for pin in &self.pins {
            query.insert(pin.query_key(), pin.query_value());
        }
        if let Some(overlay) = &self.overlay {
            query.insert("overlay".into(), overlay.query_value());
        }

        Ok(query)
    }
}

/// Marker style. Numbered and lettered pins each get their own query key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PinStyle {
    #[default]
    Normal,
    /// Pin labelled with a number in `0..=99`.
    Numbered(i32),
    /// Pin labelled with a letter in `'a'..='z'`.
    Lettered(char),
    Star,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PinColor {
    #[default]
    Default,
    Red,
    Blue,
    Green,
    Yellow,
}

impl PinColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            PinColor::Default => "",
            PinColor::Red => "red",
            PinColor::Blue => "blue",
            PinColor::Green => "green",
            PinColor::Yellow => "yellow",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pin {
    pub style: PinStyle,
    pub latitude: f64,
    pub longitude: f64,
    pub label: Option<String>,
    pub color: PinColor,
}

impl Pin {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude, ..Default::default() }
    }

    pub fn with_style(mut self, style: PinStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_color(mut self, color: PinColor) -> Self {
        self.color = color;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.style {
            PinStyle::Numbered(n) if !PIN_NUMBERS.contains(&n) => {
                Err(ValidationError::PinNumber(n))
            }
            PinStyle::Lettered(c) if !PIN_LETTERS.contains(&c) => {
                Err(ValidationError::PinLetter(c))
            }
            _ => Ok(()),
        }
    }

    /// Query key for this pin. Out of range numbers and letters fall back to
    /// `pin`; [`Pin::validate`] is what rejects them.
    pub fn query_key(&self) -> String {
        match self.style {
            PinStyle::Numbered(n) if PIN_NUMBERS.contains(&n) => format!("pin{n}"),
            PinStyle::Lettered(c) if PIN_LETTERS.contains(&c) => format!("pin{c}"),
            PinStyle::Star => "pindefault".to_string(),
            _ => "pin".to_string(),
        }
    }

    /// `lat,lon[,label][,color]`
    pub fn query_value(&self) -> String {
        let mut values = vec![format_coordinate(self.latitude), format_coordinate(self.longitude)];
        if let Some(label) = self.label.as_deref().filter(|l| !l.is_empty()) {
            values.push(query_escape(label));
        }
        if self.color != PinColor::Default {
            values.push(query_escape(self.color.as_str()));
        }

        values.join(",")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayType {
    Rainfall,
}

impl OverlayType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverlayType::Rainfall => "rainfall",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overlay {
    /// Unset is sent as rainfall but is exempt from the rainfall zoom limit.
    pub kind: Option<OverlayType>,
    /// Date of the overlaid data; the API picks the latest when unset.
    pub date: Option<NaiveDate>,
    /// Print the overlay date on the image.
    pub date_label: bool,
}

impl Overlay {
    pub fn rainfall() -> Self {
        Self { kind: Some(OverlayType::Rainfall), ..Default::default() }
    }

    /// The overlay type actually requested.
    pub fn kind(&self) -> OverlayType {
        self.kind.unwrap_or(OverlayType::Rainfall)
    }

    /// `type:<type>[|date:YYYYMMDD]|datelabel:on|off`
    pub fn query_value(&self) -> String {
        let mut value = format!("type:{}", query_escape(self.kind().as_str()));
        if let Some(date) = self.date {
            value.push_str(&format!("|date:{}", date.format("%Y%m%d")));
        }
        value.push_str("|datelabel:");
        value.push_str(if self.date_label { "on" } else { "off" });

        value
    }
}

/// Coordinates go out with 6 fractional digits.
pub(crate) fn format_coordinate(value: f64) -> String {
    format!("{value:.6}")
}

fn query_escape(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_zoom(mode: MapMode, zoom: i32) -> StaticOptions {
        StaticOptions { mode, zoom, ..Default::default() }
    }

    const MODES: [MapMode; 7] = [
        MapMode::Normal,
        MapMode::Photo,
        MapMode::Underground,
        MapMode::Hd,
        MapMode::Hybrid,
        MapMode::Blank,
        MapMode::Osm,
    ];

    #[test]
    fn zero_zoom_is_valid_in_every_mode() {
        for mode in MODES {
            assert_eq!(with_zoom(mode, 0).validate(), Ok(()), "mode {mode:?}");
        }
    }

    #[test]
    fn zoom_bounds_depend_on_mode() {
        for mode in MODES {
            let (min, max) = match mode {
                MapMode::Underground => (19, 21),
                MapMode::Blank => (11, 20),
                _ => (1, 20),
            };
            for zoom in -1..=25 {
                let res = with_zoom(mode, zoom).validate();
                if zoom == 0 || (min..=max).contains(&zoom) {
                    assert_eq!(res, Ok(()), "mode {mode:?} zoom {zoom}");
                } else {
                    assert_eq!(
                        res,
                        Err(ValidationError::Zoom { zoom, min, max }),
                        "mode {mode:?} zoom {zoom}"
                    );
                }
            }
        }
    }

    #[test]
    fn rainfall_overlay_caps_zoom() {
        let mut options = with_zoom(MapMode::Normal, 16);
        options.overlay = Some(Overlay::rainfall());
        assert_eq!(options.validate(), Err(ValidationError::RainfallZoom(16)));

        options.zoom = 15;
        assert_eq!(options.validate(), Ok(()));

        // In range for the mode, still too close for rainfall.
        let mut underground = with_zoom(MapMode::Underground, 19);
        underground.overlay = Some(Overlay::rainfall());
        assert_eq!(underground.validate(), Err(ValidationError::RainfallZoom(19)));
    }

    #[test]
    fn untyped_overlay_is_not_zoom_capped() {
        let mut underground = with_zoom(MapMode::Underground, 19);
        underground.overlay = Some(Overlay::default());
        assert_eq!(underground.validate(), Ok(()));

        let query = underground.to_query().expect("options are valid");
        assert_eq!(query["overlay"], "type:rainfall|datelabel:off");
    }

    #[test]
    fn negative_dimensions_are_rejected() {
        let options = StaticOptions { width: -1, height: -5, ..Default::default() };
        assert_eq!(options.validate(), Err(ValidationError::Width(-1)));

        let options = StaticOptions { width: 0, height: -5, ..Default::default() };
        assert_eq!(options.validate(), Err(ValidationError::Height(-5)));
    }

    #[test]
    fn first_violation_wins() {
        let options = StaticOptions {
            width: -1,
            zoom: 99,
            pins: vec![Pin::new(35.0, 139.0).with_style(PinStyle::Numbered(100))],
            ..Default::default()
        };
        assert_eq!(options.validate(), Err(ValidationError::Width(-1)));
    }

    #[test]
    fn pin_style_ranges() {
        let pin = |style| Pin::new(35.0, 139.0).with_style(style);

        assert_eq!(pin(PinStyle::Numbered(0)).validate(), Ok(()));
        assert_eq!(pin(PinStyle::Numbered(99)).validate(), Ok(()));
        assert_eq!(pin(PinStyle::Numbered(100)).validate(), Err(ValidationError::PinNumber(100)));
        assert_eq!(pin(PinStyle::Numbered(-1)).validate(), Err(ValidationError::PinNumber(-1)));
        assert_eq!(pin(PinStyle::Lettered('q')).validate(), Ok(()));
        assert_eq!(pin(PinStyle::Lettered('Q')).validate(), Err(ValidationError::PinLetter('Q')));

        let options = StaticOptions {
            pins: vec![pin(PinStyle::Star), pin(PinStyle::Lettered('!'))],
            ..Default::default()
        };
        assert_eq!(options.validate(), Err(ValidationError::PinLetter('!')));
    }

    #[test]
    fn pin_query_keys() {
        let pin = |style| Pin::new(35.0, 139.0).with_style(style);

        assert_eq!(pin(PinStyle::Normal).query_key(), "pin");
        assert_eq!(pin(PinStyle::Numbered(7)).query_key(), "pin7");
        assert_eq!(pin(PinStyle::Lettered('b')).query_key(), "pinb");
        assert_eq!(pin(PinStyle::Star).query_key(), "pindefault");
        assert_eq!(pin(PinStyle::Numbered(150)).query_key(), "pin");
        assert_eq!(pin(PinStyle::Lettered('B')).query_key(), "pin");
    }

    #[test]
    fn pin_query_values() {
        let pin = Pin::new(35.0, 139.0).with_style(PinStyle::Numbered(7));
        assert_eq!(pin.query_value(), "35.000000,139.000000");

        let pin = Pin::new(35.658581, 139.745433)
            .with_label("Tokyo Tower")
            .with_color(PinColor::Red);
        assert_eq!(pin.query_value(), "35.658581,139.745433,Tokyo+Tower,red");

        let pin = Pin::new(-33.5, 151.25).with_color(PinColor::Blue);
        assert_eq!(pin.query_value(), "-33.500000,151.250000,blue");
    }

    #[test]
    fn overlay_query_values() {
        let dated = Overlay {
            kind: None,
            date: NaiveDate::from_ymd_opt(2024, 3, 1),
            date_label: true,
        };
        assert_eq!(dated.query_value(), "type:rainfall|date:20240301|datelabel:on");

        let undated = Overlay::default();
        assert_eq!(undated.query_value(), "type:rainfall|datelabel:off");
    }

    #[test]
    fn query_contains_only_set_options() {
        let options = StaticOptions {
            mode: MapMode::Blank,
            width: 300,
            height: 0,
            pointer: true,
            zoom: 12,
            pins: vec![
                Pin::new(35.0, 139.0).with_style(PinStyle::Numbered(1)),
                Pin::new(35.1, 139.1).with_style(PinStyle::Star),
            ],
            overlay: Some(Overlay::rainfall()),
        };

        let query = options.to_query().expect("options are valid");

        let expected: QueryParams = [
            ("mode", "blankmap"),
            ("width", "300"),
            ("pointer", "on"),
            ("z", "12"),
            ("pin1", "35.000000,139.000000"),
            ("pindefault", "35.100000,139.100000"),
            ("overlay", "type:rainfall|datelabel:off"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(query, expected);
    }

    #[test]
    fn default_options_produce_empty_query() {
        let query = StaticOptions::default().to_query().expect("defaults are valid");
        assert!(query.is_empty());
    }

    #[test]
    fn invalid_options_produce_no_query() {
        let options = with_zoom(MapMode::Underground, 10);
        assert!(options.to_query().is_err());
    }
}
