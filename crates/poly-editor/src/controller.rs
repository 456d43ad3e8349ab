//! Mode-switching controller.
//!
//! The editor owns the polygon collection and the one [`IdAllocator`] all
//! of them label their constraints from. It routes each [`InputEvent`] to
//! the polygon operation the current [`Mode`] calls for.
//!
//! | Mode | Pointer drag | Double-click |
//! |------|--------------|--------------|
//! | Free | drag grabbed part (Control: whole polygon) | — |
//! | CreateVertex | — | split the edge under the pointer |
//! | CreatePolygon | — | collect 3 points, then add a triangle |
//! | Delete | — | remove vertex or constraint |
//! | SetPerpendicular / SetEqualLength | — | collect 2 edges, constrain, back to Free |

use crate::config::EditorConfig;
use crate::input::InputEvent;
use crate::mode::Mode;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use poly_core::{EditError, IdAllocator, Point2d, Polygon};
use smallvec::SmallVec;

pub struct Editor {
    polygons: Vec<Polygon>,
    ids: IdAllocator,
    mode: Mode,
    /// Double-clicks collected by the current mode.
    pending: SmallVec<[Point2d; 2]>,
    /// Last pointer position seen; drags are measured from here.
    last_pointer: Option<Point2d>,
    warning: Option<String>,
    config: EditorConfig,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            polygons: Vec::new(),
            ids: IdAllocator::new(),
            mode: Mode::Free,
            pending: SmallVec::new(),
            last_pointer: None,
            warning: None,
            config,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn title(&self) -> &'static str {
        self.mode.title()
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn pending_clicks(&self) -> &[Point2d] {
        &self.pending
    }

    pub fn last_pointer(&self) -> Option<Point2d> {
        self.last_pointer
    }

    /// Most recent user-facing warning, if any.
    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn take_warning(&mut self) -> Option<String> {
        self.warning.take()
    }

    /// Add a polygon to the collection. It adopts the editor's engine config.
    pub fn add_polygon(&mut self, polygon: Polygon) {
        self.polygons.push(polygon.with_config(self.config.engine));
    }

    /// Remove the polygon at `index` and release its constraint ids.
    pub fn remove_polygon(&mut self, index: usize) -> Option<Polygon> {
        if index >= self.polygons.len() {
            return None;
        }
        let polygon = self.polygons.remove(index);
        polygon.release_ids(&mut self.ids);
        log::debug!("polygon {index} removed");
        Some(polygon)
    }

    pub fn spawn_sample(&mut self) {
        match Polygon::sample(&mut self.ids) {
            Ok(polygon) => self.add_polygon(polygon),
            Err(err) => self.warn(err),
        }
    }

    /// Switch modes, dropping any grab and any half-collected clicks.
    pub fn set_mode(&mut self, mode: Mode) {
        self.pending.clear();
        if mode != self.mode {
            log::debug!("mode: {}", mode.title());
            for polygon in &mut self.polygons {
                polygon.reset_interaction();
            }
        }
        self.mode = mode;
    }

    /// Route one event. Returns whether anything changed.
    pub fn handle(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerDown { x, y } => {
                let point = Point2d::new(*x, *y);
                self.last_pointer = Some(point);
                self.mode == Mode::Free && self.pointer_down(point)
            }
            InputEvent::PointerMove { x, y, ctrl } => {
                let current = Point2d::new(*x, *y);
                let previous = self.last_pointer.replace(current).unwrap_or(current);
                self.mode == Mode::Free && self.pointer_move(current, previous, *ctrl)
            }
            InputEvent::PointerUp { x, y } => {
                self.last_pointer = Some(Point2d::new(*x, *y));
                for polygon in &mut self.polygons {
                    polygon.on_mouse_up();
                }
                false
            }
            InputEvent::DoubleClick { x, y } => self.double_click(Point2d::new(*x, *y)),
            InputEvent::Key { key } => match ShortcutMap::resolve(key) {
                Some(ShortcutAction::SwitchMode(mode)) => {
                    self.set_mode(mode);
                    false
                }
                Some(ShortcutAction::SpawnSample) => {
                    self.spawn_sample();
                    true
                }
                None => false,
            },
        }
    }

    fn warn(&mut self, err: EditError) {
        log::warn!("{err}");
        self.warning = Some(err.to_string());
    }

    fn pointer_down(&mut self, point: Point2d) -> bool {
        let mut claimed = false;
        for polygon in &mut self.polygons {
            if claimed {
                polygon.reset_interaction();
            } else {
                claimed = polygon.on_mouse_down(point);
            }
        }
        claimed
    }

    fn pointer_move(&mut self, current: Point2d, previous: Point2d, move_whole: bool) -> bool {
        for i in 0..self.polygons.len() {
            match self.polygons[i].on_mouse_move(current, previous, move_whole) {
                Ok(false) => continue,
                Ok(true) => return true,
                Err(err) => {
                    self.warn(err);
                    return true;
                }
            }
        }
        false
    }

    fn double_click(&mut self, point: Point2d) -> bool {
        match self.mode {
            Mode::Free => false,
            Mode::CreateVertex => self.split_at(point),
            Mode::CreatePolygon => self.collect_triangle(point),
            Mode::Delete => self.remove_at(point),
            Mode::SetPerpendicular | Mode::SetEqualLength => self.constrain(point),
        }
    }

    fn split_at(&mut self, point: Point2d) -> bool {
        self.polygons
            .iter_mut()
            .any(|polygon| polygon.add_vertex(point, &mut self.ids).is_ok())
    }

    fn collect_triangle(&mut self, point: Point2d) -> bool {
        if self.pending.len() + 1 < self.mode.clicks_needed() {
            self.pending.push(point);
            return false;
        }
        let (p1, p2) = (self.pending[0], self.pending[1]);
        self.pending.clear();
        self.add_polygon(Polygon::create(p1, p2, point));
        log::debug!("triangle {p1} {p2} {point} added");
        true
    }

    /// Remove a vertex or constraint from every polygon under `point`. A
    /// triangle asked to lose a vertex leaves the collection altogether.
    fn remove_at(&mut self, point: Point2d) -> bool {
        let mut changed = false;
        let ids = &mut self.ids;
        self.polygons.retain_mut(|polygon| match polygon.remove(point, ids) {
            Err(EditError::VertexFloor) => {
                polygon.release_ids(ids);
                log::debug!("triangle at {point} removed");
                changed = true;
                false
            }
            result => {
                changed |= result.is_ok();
                true
            }
        });
        changed
    }

    fn constrain(&mut self, point: Point2d) -> bool {
        let Some(&first) = self.pending.first() else {
            self.pending.push(point);
            return false;
        };
        let perpendicular = self.mode == Mode::SetPerpendicular;
        let mut outcome = Err(EditError::Miss);
        for polygon in &mut self.polygons {
            let result = if perpendicular {
                polygon.set_perpendicular(first, point, &mut self.ids)
            } else {
                polygon.set_equal_length(first, point, &mut self.ids)
            };
            match result {
                Err(EditError::Miss) => {}
                Err(err) => outcome = Err(err),
                Ok(id) => {
                    outcome = Ok(id);
                    break;
                }
            }
        }
        match outcome {
            Ok(id) => {
                log::debug!("constraint {id} set");
                self.set_mode(Mode::Free);
                true
            }
            Err(err) => {
                if matches!(err, EditError::Unsatisfiable | EditError::Degenerate) {
                    self.warn(err);
                }
                // Start over from the latest click.
                self.pending.clear();
                self.pending.push(point);
                false
            }
        }
    }
}
