/// Shape of the zone grid for one frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ZoneGrid {
    pub rows: usize,
    pub columns: usize,
    /// The shape differs from the one applied on the previous frame.
    pub changed: bool,
}

impl ZoneGrid {
    #[inline]
    pub const fn zone_count(&self) -> usize {
        self.rows * self.columns
    }

    /// Row and column of the zone at row-major index `i`.
    #[inline]
    pub const fn cell(&self, i: usize) -> (usize, usize) {
        (i / self.columns, i % self.columns)
    }
}

/// Frame-rate driven grid control. The dead band around `target` is
/// `[target - offset, target + offset]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AdaptiveControl {
    pub enabled: bool,
    pub target: f32,
    pub offset: f32,
}

impl Default for AdaptiveControl {
    fn default() -> Self {
        Self { enabled: true, target: 20.0, offset: 4.0 }
    }
}

/// Ratio between the column budget and columns in use beyond which the
/// rebalance step trades a row for columns (and the inverse for growth).
const REBALANCE_THRESHOLD: f32 = 1.5;

/// Decides the zone grid each frame.
///
/// Holds both the requested grid (what control surfaces asked for) and the
/// current grid (what is being rendered). In adaptive mode the current grid
/// walks towards whatever keeps the frame rate inside the dead band, one
/// column or row per frame.
#[derive(Debug, Clone)]
pub struct ZoneGridPlanner {
    max_rows: usize,
    max_columns: usize,
    requested_rows: usize,
    requested_columns: usize,
    rows: usize,
    columns: usize,
    applied: Option<(usize, usize)>,
    adaptive: AdaptiveControl,
}

impl ZoneGridPlanner {
    /// Maxima below 1 are raised to 1.
    pub fn new(max_rows: usize, max_columns: usize, adaptive: AdaptiveControl) -> Self {
        Self {
            max_rows: max_rows.max(1),
            max_columns: max_columns.max(1),
            requested_rows: 1,
            requested_columns: 1,
            rows: 1,
            columns: 1,
            applied: None,
            adaptive,
        }
    }

    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    pub fn max_columns(&self) -> usize {
        self.max_columns
    }

    /// Requested columns (what `set_columns` last accepted).
    pub fn requested_columns(&self) -> usize {
        self.requested_columns
    }

    pub fn requested_rows(&self) -> usize {
        self.requested_rows
    }

    /// Grid currently being rendered.
    pub fn current(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    pub fn adaptive(&self) -> AdaptiveControl {
        self.adaptive
    }

    // ── setters ───────────────────────────────────────────────────────────

    /// Accepts `1..=max_columns`; more than one column needs multiple users.
    pub fn set_columns(&mut self, columns: usize, multiple_users: bool) -> bool {
        if columns < 1 || columns > self.max_columns || (columns != 1 && !multiple_users) {
            log::debug!("rejected zone columns {columns} (max {}, multi-user {multiple_users})", self.max_columns);
            return false;
        }
        self.requested_columns = columns;
        true
    }

    pub fn set_rows(&mut self, rows: usize, multiple_users: bool) -> bool {
        if rows < 1 || rows > self.max_rows || (rows != 1 && !multiple_users) {
            log::debug!("rejected zone rows {rows} (max {}, multi-user {multiple_users})", self.max_rows);
            return false;
        }
        self.requested_rows = rows;
        true
    }

    pub fn set_adaptive_enabled(&mut self, enabled: bool) {
        self.adaptive.enabled = enabled;
    }

    /// Target frame rate; must be positive and finite.
    pub fn set_adaptive_target(&mut self, target: f32) -> bool {
        if !(target > 0.0 && target.is_finite()) {
            log::debug!("rejected adaptive target {target}");
            return false;
        }
        self.adaptive.target = target;
        true
    }

    /// Dead-band half width; must be non-negative and finite.
    pub fn set_adaptive_offset(&mut self, offset: f32) -> bool {
        if !(offset >= 0.0 && offset.is_finite()) {
            log::debug!("rejected adaptive offset {offset}");
            return false;
        }
        self.adaptive.offset = offset;
        true
    }

    // ── planning ──────────────────────────────────────────────────────────

    /// Decides this frame's grid from the last frame duration (seconds).
    pub fn plan(&mut self, frame_duration: f64, multiple_users: bool) -> ZoneGrid {
        if !multiple_users {
            self.rows = 1;
            self.columns = 1;
        } else if !self.adaptive.enabled {
            self.rows = self.requested_rows;
            self.columns = self.requested_columns;
        } else if self.adapt(frame_duration) {
            self.rebalance();
        }

        let shape = (self.rows, self.columns);
        let changed = self.applied != Some(shape);
        if changed {
            log::info!(
                "zone grid {}x{} -> {}x{}",
                self.applied.map_or(0, |a| a.0),
                self.applied.map_or(0, |a| a.1),
                shape.0,
                shape.1
            );
            self.applied = Some(shape);
        }

        ZoneGrid { rows: self.rows, columns: self.columns, changed }
    }

    /// One step of the control loop. Returns whether the size changed.
    fn adapt(&mut self, frame_duration: f64) -> bool {
        if !(frame_duration > 0.0 && frame_duration.is_finite()) {
            log::trace!("ignoring frame duration {frame_duration} for zone adaptation");
            return false;
        }

        let rate = 1.0 / frame_duration;
        let target = self.adaptive.target as f64;
        let offset = self.adaptive.offset as f64;

        if rate < target - offset {
            if self.columns > 1 {
                self.columns -= 1;
            } else if self.rows > 1 {
                self.rows -= 1;
            } else {
                return false;
            }
            log::trace!("frame rate {rate:.1} below band, shrinking zones");
            true
        } else if rate > target + offset {
            if self.columns < self.max_columns {
                self.columns += 1;
            } else if self.rows < self.max_rows {
                self.rows += 1;
            } else {
                return false;
            }
            log::trace!("frame rate {rate:.1} above band, growing zones");
            true
        } else {
            false
        }
    }

    /// Keeps the grid proportioned relative to the configured maxima. Applied
    /// once per size change, then clamped to the maxima.
    fn rebalance(&mut self) {
        let (rows, columns) = (self.rows, self.columns);
        let (max_rows, max_columns) = (self.max_rows, self.max_columns);

        let used = (columns * rows) as f32;
        let budget = (max_columns * rows) as f32;
        let narrow = REBALANCE_THRESHOLD * (columns * max_rows) as f32;

        // `columns <= max_columns` always holds here, so the first branch
        // never fires.
        if used > REBALANCE_THRESHOLD * budget && rows < max_rows {
            self.columns = columns * rows / (rows + 1);
            self.rows = rows + 1;
        } else if narrow < budget && rows > 1 {
            self.columns = columns * rows / (rows - 1);
            self.rows = rows - 1;
        }

        self.columns = self.columns.clamp(1, max_columns);
        self.rows = self.rows.clamp(1, max_rows);
    }
}
