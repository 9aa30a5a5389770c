use glam::Vec3;

use crate::coords::PixelRect;
use crate::screen::{ChannelRect, ScreenInfo};

use super::grid::ZoneGrid;

/// One cell of the zone grid.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Zone {
    /// Row-major index, `row * columns + column`.
    pub index: usize,
    pub row: usize,
    pub column: usize,
    /// Zone center in tracking space.
    pub center: Vec3,
    /// Zone extents on the screen plane, screen-local physical units.
    pub bounds: ZoneBounds,
    pub viewport: PixelRect,
}

/// Edges of a zone in screen-local coordinates (x across, z up).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ZoneBounds {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

/// Rebuilds `zones` for `grid` on `screen`, reusing the vector's storage.
pub fn build_zones(grid: &ZoneGrid, screen: &ScreenInfo, zones: &mut Vec<Zone>) {
    zones.clear();

    let transform = screen.transform();
    for index in 0..grid.zone_count() {
        let (row, column) = grid.cell(index);
        let bounds = zone_bounds(grid, screen.width, screen.height, row, column);
        let local = Vec3::new(
            (bounds.left + bounds.right) / 2.0,
            0.0,
            (bounds.bottom + bounds.top) / 2.0,
        );

        zones.push(Zone {
            index,
            row,
            column,
            center: transform.transform_point3(local),
            bounds,
            viewport: zone_viewport(grid, &screen.channel, row, column),
        });
    }
}

/// Physical edges of zone `(row, column)` on a `width` x `height` screen
/// centered on the screen-local origin.
pub fn zone_bounds(grid: &ZoneGrid, width: f32, height: f32, row: usize, column: usize) -> ZoneBounds {
    let zone_width = width / grid.columns as f32;
    let zone_height = height / grid.rows as f32;
    ZoneBounds {
        left: -width / 2.0 + column as f32 * zone_width,
        right: -width / 2.0 + (column + 1) as f32 * zone_width,
        bottom: -height / 2.0 + row as f32 * zone_height,
        top: -height / 2.0 + (row + 1) as f32 * zone_height,
    }
}

/// Pixel viewport of zone `(row, column)` within `channel`.
///
/// Start and end edges are floored independently and the size is their
/// difference, so neighbouring zones share an edge exactly.
pub fn zone_viewport(grid: &ZoneGrid, channel: &ChannelRect, row: usize, column: usize) -> PixelRect {
    let zone_width = channel.width / grid.columns as f32;
    let zone_height = channel.height / grid.rows as f32;

    let x0 = (channel.left + column as f32 * zone_width).floor() as i32;
    let x1 = (channel.left + (column + 1) as f32 * zone_width).floor() as i32;
    let y0 = (channel.bottom + row as f32 * zone_height).floor() as i32;
    let y1 = (channel.bottom + (row + 1) as f32 * zone_height).floor() as i32;

    PixelRect::new(x0, y0, x1 - x0, y1 - y0)
}
