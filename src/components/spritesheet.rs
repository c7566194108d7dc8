use serde::{Deserialize, Serialize};

/// Background descriptor for one spritesheet cell.
///
/// Offsets are already negated: cell (col, row) is shown by shifting the
/// image left by `col * width` and up by `row * height`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellBackground {
    pub url: String,
    pub offset_x: i64,
    pub offset_y: i64,
}

impl CellBackground {
    /// CSS `background` shorthand for this cell.
    pub fn css(&self) -> String {
        format!(
            "url(\"{}\") {}px {}px",
            self.url, self.offset_x, self.offset_y
        )
    }
}

/// One loaded image divided into a grid of equally sized cells.
/// Cells are stored row-major; index = frame number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteSheet {
    pub id: String,
    pub url: String,
    pub columns: u32,
    pub rows: u32,
    /// Cell width in pixels.
    pub width: u32,
    /// Cell height in pixels.
    pub height: u32,
    pub cells: Vec<CellBackground>,
}

impl SpriteSheet {
    pub fn frame_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cell(&self, frame: usize) -> Option<&CellBackground> {
        self.cells.get(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_uses_negated_offsets() {
        let cell = CellBackground {
            url: "hero.png".into(),
            offset_x: -64,
            offset_y: -32,
        };
        assert_eq!(cell.css(), "url(\"hero.png\") -64px -32px");
    }
}
