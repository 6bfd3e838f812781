//! Crop metadata record written as `crop_metadata.json`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::geometry::{round2, round_half_up, CropRect, CropWindow};
use crate::validation::{CropBox, Dimensions};

/// Describes where a crop came from.
///
/// The crop box extent is the extracted window, not the rounded rectangle,
/// so it always matches the pixels in `crop/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropMetadata {
    pub original_dimensions: Dimensions,
    pub crop_box: CropBox,
    pub cropped_from: CroppedFrom,
    pub remaining_area: RemainingArea,
    /// ISO-8601 UTC with milliseconds, e.g. `2024-01-15T10:30:45.123Z`.
    pub timestamp: String,
    pub folder_name: String,
}

/// Pixels removed from each edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CroppedFrom {
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
    pub left: i64,
}

/// Share of the raster that survives the crop.
///
/// Width and height are fractions (`0.55`), area is a percentage (`27.5`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemainingArea {
    pub width_percent: f64,
    pub height_percent: f64,
    pub area_percent: f64,
}

impl CropMetadata {
    /// Build the record for `window` cut from a `raster_width` x
    /// `raster_height` raster.
    pub fn new(
        raster_width: u32,
        raster_height: u32,
        rect: &CropRect,
        window: &CropWindow,
        timestamp: &DateTime<Utc>,
        folder_prefix: &str,
    ) -> Self {
        let width = raster_width as f64;
        let height = raster_height as f64;
        let crop_width = window.width();
        let crop_height = window.height();
        let x = round_half_up(rect.x) as i64;
        let y = round_half_up(rect.y) as i64;

        let timestamp = format_timestamp(timestamp);
        let folder_name = folder_name(folder_prefix, &timestamp);

        Self {
            original_dimensions: Dimensions::new(raster_width as usize, raster_height as usize),
            crop_box: CropBox {
                x,
                y,
                width: crop_width,
                height: crop_height,
                right: x + crop_width,
                bottom: y + crop_height,
            },
            cropped_from: CroppedFrom {
                top: y,
                right: round_half_up(width - (rect.x + crop_width as f64)) as i64,
                bottom: round_half_up(height - (rect.y + crop_height as f64)) as i64,
                left: x,
            },
            remaining_area: RemainingArea {
                width_percent: round2(crop_width as f64 / width),
                height_percent: round2(crop_height as f64 / height),
                area_percent: round2((crop_width * crop_height) as f64 / (width * height) * 100.0),
            },
            timestamp,
            folder_name,
        }
    }
}

/// ISO-8601 in UTC with millisecond precision and a `Z` suffix.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `<prefix><YYYY-MM-DDTHH-MM-SS>` from a formatted timestamp.
pub fn folder_name(prefix: &str, timestamp: &str) -> String {
    let stamp: String = timestamp
        .chars()
        .map(|c| if c == ':' || c == '.' { '-' } else { c })
        .take(19)
        .collect();
    format!("{prefix}{stamp}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::compute_crop_window;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 45).unwrap() + chrono::Duration::milliseconds(123)
    }

    #[test]
    fn test_timestamp_format() {
        assert_eq!(format_timestamp(&fixed_time()), "2024-01-15T10:30:45.123Z");
    }

    #[test]
    fn test_folder_name() {
        assert_eq!(
            folder_name("rgbd_crop_", "2024-01-15T10:30:45.123Z"),
            "rgbd_crop_2024-01-15T10-30-45"
        );
        assert_eq!(folder_name("scan_", "2024-01-15T10:30:45.000Z"), "scan_2024-01-15T10-30-45");
    }

    #[test]
    fn test_metadata_values() {
        let rect = CropRect::new(2.6, 3.2, 10.5, 4.9);
        let window = compute_crop_window(&rect, 20, 10);
        let meta = CropMetadata::new(20, 10, &rect, &window, &fixed_time(), "rgbd_crop_");

        assert_eq!(meta.original_dimensions, Dimensions::new(20, 10));
        assert_eq!(
            meta.crop_box,
            CropBox {
                x: 3,
                y: 3,
                width: 11,
                height: 5,
                right: 14,
                bottom: 8,
            }
        );
        assert_eq!(
            meta.cropped_from,
            CroppedFrom {
                top: 3,
                right: 6,
                bottom: 2,
                left: 3,
            }
        );
        assert_eq!(meta.remaining_area.width_percent, 0.55);
        assert_eq!(meta.remaining_area.height_percent, 0.5);
        assert_eq!(meta.remaining_area.area_percent, 27.5);
        assert_eq!(meta.folder_name, "rgbd_crop_2024-01-15T10-30-45");
    }

    #[test]
    fn test_full_frame_crop() {
        let rect = CropRect::new(0.0, 0.0, 64.0, 48.0);
        let window = compute_crop_window(&rect, 64, 48);
        let meta = CropMetadata::new(64, 48, &rect, &window, &fixed_time(), "rgbd_crop_");

        assert_eq!(
            meta.cropped_from,
            CroppedFrom {
                top: 0,
                right: 0,
                bottom: 0,
                left: 0,
            }
        );
        assert_eq!(meta.remaining_area.width_percent, 1.0);
        assert_eq!(meta.remaining_area.area_percent, 100.0);
    }

    #[test]
    fn test_json_field_names() {
        let rect = CropRect::new(1.0, 1.0, 4.0, 4.0);
        let window = compute_crop_window(&rect, 10, 10);
        let meta = CropMetadata::new(10, 10, &rect, &window, &fixed_time(), "rgbd_crop_");
        let json: serde_json::Value = serde_json::to_value(&meta).unwrap();

        assert_eq!(json["originalDimensions"]["width"], 10);
        assert_eq!(json["cropBox"]["right"], 5);
        assert_eq!(json["croppedFrom"]["left"], 1);
        assert_eq!(json["remainingArea"]["areaPercent"], 16.0);
        assert_eq!(json["timestamp"], "2024-01-15T10:30:45.123Z");
        assert_eq!(json["folderName"], "rgbd_crop_2024-01-15T10-30-45");
    }
}
