//! Octree navigation utilities for interactive visualization.

use std::collections::HashSet;

use macroquad::prelude::*;
use sledge_scene::octree::FnVisitor;
use sledge_scene::{Aabb, Octree, OctreeNode, Scene, SceneHandle, Spatial};

use crate::draw_object;

type HandleId = <SceneHandle as Spatial>::Id;

const OCTANT_KEYS: [KeyCode; 8] = [
    KeyCode::Key1,
    KeyCode::Key2,
    KeyCode::Key3,
    KeyCode::Key4,
    KeyCode::Key5,
    KeyCode::Key6,
    KeyCode::Key7,
    KeyCode::Key8,
];

/// Interactive navigator for exploring octree cells.
///
/// The path is a list of octant indices from the root.
pub struct OctreeNavigator {
    path: Vec<usize>,
}

impl Default for OctreeNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl OctreeNavigator {
    /// Creates a new navigator starting at the root.
    pub fn new() -> Self {
        Self { path: Vec::new() }
    }

    pub fn path(&self) -> &[usize] {
        &self.path
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Attempts to descend into an octant. Returns true if successful.
    pub fn go_child(&mut self, index: &Octree<SceneHandle>, octant: usize) -> bool {
        let has_child = self
            .current_node(index)
            .is_some_and(|node| node.child(octant).is_some());
        if has_child {
            self.path.push(octant);
        }
        has_child
    }

    /// Navigates to the parent cell. Returns true if not already at root.
    pub fn go_parent(&mut self) -> bool {
        self.path.pop().is_some()
    }

    pub fn go_root(&mut self) {
        self.path.clear();
    }

    /// Handles keyboard input for navigation.
    /// Returns true if navigation state changed.
    pub fn update(&mut self, index: &Octree<SceneHandle>) -> bool {
        let mut changed = false;

        for (octant, key) in OCTANT_KEYS.iter().enumerate() {
            if is_key_pressed(*key) {
                changed |= self.go_child(index, octant);
            }
        }
        if is_key_pressed(KeyCode::P) {
            changed |= self.go_parent();
        }
        if is_key_pressed(KeyCode::R) && !self.path.is_empty() {
            self.go_root();
            changed = true;
        }

        // The tree may have collapsed under us after a refresh
        while !self.path.is_empty() && self.current_node(index).is_none() {
            self.path.pop();
            changed = true;
        }

        changed
    }

    /// Returns the current cell, if the path still exists.
    pub fn current_node<'a>(&self, index: &'a Octree<SceneHandle>) -> Option<&'a OctreeNode<HandleId>> {
        get_node_at_path(index.root(), &self.path)
    }

    /// Returns the distinct ids referenced in the current subtree.
    pub fn subtree_ids(&self, index: &Octree<SceneHandle>) -> Vec<HandleId> {
        let Some(node) = self.current_node(index) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        let mut visitor = FnVisitor::new(|_: &Aabb, leaf: &[HandleId]| {
            for id in leaf {
                if seen.insert(*id) {
                    ids.push(*id);
                }
            }
        });
        node.traverse(&mut visitor);
        ids
    }

    /// Renders only the objects in the current subtree, plus the cell outline.
    pub fn render(&self, scene: &Scene, wireframe: bool) {
        let index = scene.index();
        for id in self.subtree_ids(index) {
            if let Some(object) = index.get(&id).and_then(|h| scene.resolve(h)) {
                draw_object(object, wireframe);
            }
        }

        if let Some(node) = self.current_node(index) {
            draw_cell(node.bounds(), YELLOW);
            if let Some(children) = node.children() {
                for child in children.iter().filter(|c| c.reference_count() > 0) {
                    draw_cell(child.bounds(), DARKGRAY);
                }
            }
        }
    }

    /// Draws the navigation UI overlay.
    pub fn draw_ui(&self, index: &Octree<SceneHandle>, y_offset: f32) {
        let (objects, occupied, is_leaf) = match self.current_node(index) {
            Some(node) => {
                let occupied: Vec<usize> = (0..8)
                    .filter(|&i| node.child(i).is_some_and(|c| c.reference_count() > 0))
                    .collect();
                (node.distinct_count(), occupied, node.is_leaf())
            }
            None => (0, Vec::new(), true),
        };

        let path_str = if self.path.is_empty() {
            "root".to_string()
        } else {
            self.path
                .iter()
                .map(|octant| (octant + 1).to_string())
                .collect::<Vec<_>>()
                .join(" -> ")
        };

        draw_text(
            &format!("Cell: {} objects", objects),
            10.0,
            y_offset,
            18.0,
            WHITE,
        );
        draw_text(
            &format!("Path: {} (depth {})", path_str, self.path.len()),
            10.0,
            y_offset + 20.0,
            18.0,
            YELLOW,
        );
        let children = occupied
            .iter()
            .map(|i| format!("[{}]", i + 1))
            .collect::<Vec<_>>()
            .join(" ");
        draw_text(
            &format!("Octants: {}{}", children, if is_leaf { "(leaf)" } else { "" }),
            10.0,
            y_offset + 40.0,
            18.0,
            if is_leaf { ORANGE } else { GREEN },
        );
        draw_text("[P]arent | [R]oot", 10.0, y_offset + 60.0, 16.0, DARKGRAY);
    }
}

/// Navigates to a node following the path, returns None if path is invalid.
fn get_node_at_path<'a>(
    root: &'a OctreeNode<HandleId>,
    path: &[usize],
) -> Option<&'a OctreeNode<HandleId>> {
    let mut current = root;
    for octant in path {
        current = current.child(*octant)?;
    }
    Some(current)
}

fn draw_cell(bounds: &Aabb, color: Color) {
    let center = bounds.center();
    let size = bounds.size();
    draw_cube_wires(vec3(center.x, center.y, center.z), vec3(size.x, size.y, size.z), color);
}
