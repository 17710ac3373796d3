use serde::Deserialize;
use serde_json::Value;

use crate::types::GeoPoint;

#[derive(Debug, Default, Deserialize)]
pub struct PhotoExif {
    #[serde(rename = "GPSLatitude")]
    pub gps_latitude: Option<Value>,
    #[serde(rename = "GPSLongitude")]
    pub gps_longitude: Option<Value>,
    #[serde(rename = "GPSLatitudeRef")]
    pub gps_latitude_ref: Option<String>,
    #[serde(rename = "GPSLongitudeRef")]
    pub gps_longitude_ref: Option<String>,
    #[serde(rename = "DateTimeOriginal")]
    pub date_time_original: Option<String>,
}

// Where the photo was taken. Only numeric coordinates are understood.
pub fn photo_location(exif: &PhotoExif) -> Option<GeoPoint> {
    let latitude = exif.gps_latitude.as_ref().and_then(Value::as_f64);
    let longitude = exif.gps_longitude.as_ref().and_then(Value::as_f64);
    let (mut latitude, mut longitude) = match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => (latitude, longitude),
        _ => {
            log::warn!("GPS data missing from EXIF or not numeric");
            return None;
        }
    };

    if exif.gps_latitude_ref.as_deref() == Some("S") {
        latitude = -latitude.abs();
    }
    if exif.gps_longitude_ref.as_deref() == Some("W") {
        longitude = -longitude.abs();
    }
    Some(GeoPoint::new(latitude, longitude))
}

// `DateTimeOriginal` ("YYYY:MM:DD HH:MM:SS") as "YYYY-MM-DDTHH:MM:SS".
pub fn photo_taken_at(exif: &PhotoExif) -> Option<String> {
    let raw = exif.date_time_original.as_deref()?.trim();
    let (date, time) = raw.split_once(' ')?;

    let date_parts: Vec<&str> = date.split(':').collect();
    let time_parts: Vec<&str> = time.split(':').collect();
    let well_formed = |parts: &[&str], widths: &[usize]| {
        parts.len() == widths.len()
            && parts
                .iter()
                .zip(widths)
                .all(|(part, width)| part.len() == *width && part.chars().all(|c| c.is_ascii_digit()))
    };
    if !well_formed(&date_parts, &[4, 2, 2]) || !well_formed(&time_parts, &[2, 2, 2]) {
        log::warn!("Unexpected DateTimeOriginal format: {}", raw);
        return None;
    }

    Some(format!("{}T{}", date_parts.join("-"), time))
}
