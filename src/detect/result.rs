use serde::Deserialize;

/// One object reported by the classifier for a single frame.
///
/// `label` also accepts `class` when deserialized, which is the key
/// COCO-SSD style detectors emit.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Detection {
    #[serde(alias = "class")]
    pub label: String,
    pub score: f32,
    pub bbox: BBox,
}

impl Detection {
    pub fn new(label: impl Into<String>, score: f32, bbox: BBox) -> Self {
        Self {
            label: label.into(),
            score,
            bbox,
        }
    }
}

/// Bounding box in source pixel coordinates. Serialized as `[x, y, width, height]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "[f32; 4]")]
pub struct BBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner, the point movement is measured from.
    pub fn anchor(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }
}

impl From<[f32; 4]> for BBox {
    fn from(raw: [f32; 4]) -> Self {
        Self::new(raw[0], raw[1], raw[2], raw[3])
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}
