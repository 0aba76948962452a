use macroquad::prelude::*;
use sledge_scene::{DocumentError, MapDocument, Scene, SceneKey, SolidId};
use sledge_viz::{demo_document, draw_object, is_translucent, OctreeNavigator, OrbitCamera};

/// Editor-side state: the document, its scene, and the current selection.
struct Viewer {
    document: MapDocument,
    scene: Scene,
    selected: Option<SolidId>,
    wireframe: bool,
    navigating: bool,
}

impl Viewer {
    fn new(document: MapDocument) -> Self {
        let mut scene = Scene::new();
        let summary = scene.refresh_all(&document);
        log::info!(
            "converted {} solids into {} objects",
            summary.converted,
            scene.index().count()
        );
        Self {
            document,
            scene,
            selected: None,
            wireframe: true,
            navigating: false,
        }
    }

    fn refresh(&mut self, id: SolidId) {
        match self.scene.refresh(&self.document, id) {
            Ok(outcome) => log::debug!("refreshed {id:?}: {outcome:?}"),
            Err(err) => log::warn!("{err}"),
        }
    }

    fn refresh_all(&mut self) {
        let summary = self.scene.refresh_all(&self.document);
        log::info!(
            "settings changed: {} updated, {} rebuilt",
            summary.updated,
            summary.rebuilt
        );
    }

    /// Moves the selection to the next solid in document order.
    fn cycle_selection(&mut self) -> Result<(), DocumentError> {
        let ids: Vec<SolidId> = self.document.solid_ids().collect();
        let next = match self.selected.and_then(|s| ids.iter().position(|id| *id == s)) {
            Some(i) if i + 1 < ids.len() => Some(ids[i + 1]),
            Some(_) => None,
            None => ids.first().copied(),
        };

        if let Some(previous) = self.selected.take() {
            self.document.solid_mut(previous)?.set_selected(false);
            self.refresh(previous);
        }
        if let Some(id) = next {
            self.document.solid_mut(id)?.set_selected(true);
            self.refresh(id);
        }
        self.selected = next;
        Ok(())
    }

    /// Toggles the hidden flag of the selected solid's first face. Changes
    /// the visible face count, so the solid is rebuilt.
    fn toggle_first_face(&mut self) -> Result<(), DocumentError> {
        let Some(id) = self.selected else {
            return Ok(());
        };
        if let Some(face) = self.document.solid_mut(id)?.faces_mut().first_mut() {
            face.set_hidden(!face.is_hidden());
        }
        self.refresh(id);
        Ok(())
    }

    /// Toggles selection of the face under the screen center.
    fn pick(&mut self, camera: &OrbitCamera) -> Result<(), DocumentError> {
        let hit = self
            .scene
            .pick(&camera.center_ray())
            .into_iter()
            .find_map(|(_, handle)| match handle.key {
                SceneKey::Face(face) => Some((handle.solid, face)),
                SceneKey::Solid(_) => None,
            });
        let Some((id, face_id)) = hit else {
            return Ok(());
        };

        if let Some(face) = self.document.solid_mut(id)?.face_mut(face_id) {
            face.set_selected(!face.is_selected());
            log::info!("face {} selected: {}", face_id.get(), face.is_selected());
        }
        self.refresh(id);
        Ok(())
    }

    fn handle_keys(&mut self, camera: &OrbitCamera) -> Result<(), DocumentError> {
        let settings = &mut self.document.settings;
        let mut settings_changed = true;
        if is_key_pressed(KeyCode::N) {
            settings.hide_null_textures = !settings.hide_null_textures;
        } else if is_key_pressed(KeyCode::D) {
            settings.hide_displacement_solids = !settings.hide_displacement_solids;
        } else if is_key_pressed(KeyCode::M) {
            settings.hide_face_mask = !settings.hide_face_mask;
        } else if is_key_pressed(KeyCode::V) {
            settings.draw_2d_vertices = !settings.draw_2d_vertices;
        } else {
            settings_changed = false;
        }
        if settings_changed {
            self.refresh_all();
        }

        if is_key_pressed(KeyCode::Space) {
            self.cycle_selection()?;
        }
        if is_key_pressed(KeyCode::H) {
            self.toggle_first_face()?;
        }
        if is_key_pressed(KeyCode::Enter) {
            self.pick(camera)?;
        }
        if is_key_pressed(KeyCode::W) {
            self.wireframe = !self.wireframe;
        }
        if is_key_pressed(KeyCode::Tab) {
            self.navigating = !self.navigating;
        }
        Ok(())
    }

    /// Draws the frustum-culled scene, translucent objects last and far to near.
    /// Returns the number of objects drawn.
    fn render(&self, camera: &OrbitCamera) -> usize {
        let eye = camera.eye_point();
        let visible = self.scene.query_frustum(&camera.frustum());
        let drawn = visible.len();

        let (mut translucent, opaque): (Vec<_>, Vec<_>) = visible
            .into_iter()
            .filter_map(|handle| self.scene.resolve(handle).map(|object| (handle, object)))
            .partition(|(_, object)| is_translucent(object));

        for (_, object) in opaque {
            draw_object(object, self.wireframe);
        }

        let distance = |h: &sledge_scene::SceneHandle| (h.bounds.center() - eye).norm_squared();
        translucent.sort_by(|a, b| distance(b.0).total_cmp(&distance(a.0)));
        for (_, object) in translucent {
            draw_object(object, self.wireframe);
        }

        drawn
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

#[macroquad::main("Sledge Scene")]
async fn main() {
    env_logger::init();

    let mut viewer = Viewer::new(demo_document());
    let mut camera = OrbitCamera::new(700.0, 0.5, 0.5).with_zoom(40.0, 64.0, 4096.0);
    let mut navigator = OctreeNavigator::new();

    loop {
        camera.update();
        if let Err(err) = viewer.handle_keys(&camera) {
            log::warn!("{err}");
        }
        if viewer.navigating {
            navigator.update(viewer.scene.index());
        }

        clear_background(Color::from_rgba(20, 20, 30, 255));
        set_camera(&camera.to_camera3d());

        let drawn = if viewer.navigating {
            navigator.render(&viewer.scene, viewer.wireframe);
            navigator.subtree_ids(viewer.scene.index()).len()
        } else {
            viewer.render(&camera)
        };

        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(64.0, 0.0, 0.0), RED);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 64.0, 0.0), GREEN);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 64.0), BLUE);

        set_default_camera();

        let index = viewer.scene.index();
        let settings = &viewer.document.settings;
        draw_text(
            &format!(
                "Sledge Scene - {} solids, {} objects indexed, {} drawn",
                viewer.document.len(),
                index.count(),
                drawn
            ),
            10.0,
            25.0,
            20.0,
            WHITE,
        );
        draw_text(
            &format!(
                "Octree depth: {} | nodes: {} | overflow: {}",
                index.depth(),
                index.node_count(),
                index.overflow().len()
            ),
            10.0,
            45.0,
            18.0,
            GRAY,
        );
        draw_text(
            &format!(
                "[N]ull textures hidden: {} | [D]isplacement solids hidden: {} | face [M]ask hidden: {} | [V]ertices: {} | [W]ireframe: {}",
                on_off(settings.hide_null_textures),
                on_off(settings.hide_displacement_solids),
                on_off(settings.hide_face_mask),
                on_off(settings.draw_2d_vertices),
                on_off(viewer.wireframe),
            ),
            10.0,
            65.0,
            16.0,
            LIGHTGRAY,
        );

        if viewer.navigating {
            navigator.draw_ui(index, 90.0);
        }

        draw_text(
            "[Space] select next solid | [H] hide first face | [Enter] pick face | [Tab] octree navigator",
            10.0,
            screen_height() - 30.0,
            16.0,
            DARKGRAY,
        );
        draw_text(&format!("FPS: {}", get_fps()), 10.0, screen_height() - 10.0, 16.0, DARKGRAY);

        next_frame().await
    }
}
